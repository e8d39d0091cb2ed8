use crate::{
    auth::{auth::AuthUser, password::hash_password},
    model::{role::Role, user::User},
    utils::db_utils::{build_update_sql, execute_update},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

const USER_COLUMNS: &str =
    "id, username, password, name, role_id, department, position, email, phone, created_at";

const UPDATABLE_COLUMNS: &[&str] = &[
    "username",
    "password",
    "name",
    "role_id",
    "department",
    "position",
    "email",
    "phone",
];

#[derive(Deserialize, ToSchema)]
pub struct CreateUser {
    #[schema(example = "budi")]
    pub username: String,
    #[schema(example = "secret")]
    pub password: String,
    #[schema(example = "Budi Santoso")]
    pub name: String,
    /// `1` = admin, `2` = employee
    #[schema(example = 2)]
    pub role_id: u8,
    #[schema(example = "Operations")]
    pub department: Option<String>,
    #[schema(example = "Field Supervisor")]
    pub position: Option<String>,
    #[schema(example = "budi@company.com", format = "email")]
    pub email: Option<String>,
    #[schema(example = "081234567891")]
    pub phone: Option<String>,
}

fn is_duplicate(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23000"))
}

/// Hashes a plaintext `password` and checks `role_id` before the update is built.
fn prepare_update(mut body: Value) -> Result<Value, HttpResponse> {
    if let Some(obj) = body.as_object_mut() {
        if let Some(role_id) = obj.get("role_id") {
            let known = role_id
                .as_u64()
                .and_then(|id| u8::try_from(id).ok())
                .and_then(Role::from_id)
                .is_some();
            if !known {
                return Err(HttpResponse::BadRequest().json(json!({"message": "Unknown role_id"})));
            }
        }

        if let Some(password) = obj.get("password") {
            let Some(plain) = password.as_str().filter(|p| !p.is_empty()) else {
                return Err(HttpResponse::BadRequest().json(json!({"message": "Password must not be empty"})));
            };
            let hashed = hash_password(plain).map_err(|e| {
                error!(error = %e, "Failed to hash password");
                HttpResponse::InternalServerError().finish()
            })?;
            obj.insert("password".into(), Value::String(hashed));
        }
    }
    Ok(body)
}

/// List accounts
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All accounts", body = [User]),
        (status = 403, description = "Forbidden")
    ),
    tag = "User",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_users(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
    let users = sqlx::query_as::<_, User>(&sql)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch users");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(users))
}

/// Get account by ID
#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(
        ("user_id" = u64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Account found", body = User),
        (status = 404, description = "User not found", body = Object, example = json!({
            "message": "User not found"
        }))
    ),
    tag = "User",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let user_id = path.into_inner();

    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(user_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "Failed to fetch user");
            ErrorInternalServerError("Internal Server Error")
        })?;

    match user {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "User not found"
        }))),
    }
}

/// Create account
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "Account created", body = Object, example = json!({
            "message": "User created successfully",
            "id": 3
        })),
        (status = 400, description = "Missing fields or unknown role"),
        (status = 409, description = "Username already exists")
    ),
    tag = "User",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateUser>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let username = payload.username.trim();
    if username.is_empty() || payload.password.is_empty() || payload.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Username, password and name are required"
        })));
    }
    if Role::from_id(payload.role_id).is_none() {
        return Ok(HttpResponse::BadRequest().json(json!({"message": "Unknown role_id"})));
    }

    let hashed = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let result = sqlx::query(
        r#"
        INSERT INTO users (username, password, name, role_id, department, position, email, phone)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(username)
    .bind(hashed)
    .bind(payload.name.trim())
    .bind(payload.role_id)
    .bind(&payload.department)
    .bind(&payload.position)
    .bind(&payload.email)
    .bind(&payload.phone)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(done) => {
            tracing::info!(user_id = done.last_insert_id(), username, "User created");
            Ok(HttpResponse::Created().json(json!({
                "message": "User created successfully",
                "id": done.last_insert_id()
            })))
        }
        Err(e) if is_duplicate(&e) => Ok(HttpResponse::Conflict().json(json!({
            "message": "Username already exists"
        }))),
        Err(e) => {
            error!(error = %e, "Failed to create user");
            Err(ErrorInternalServerError("Internal Server Error"))
        }
    }
}

/// Update account
#[utoipa::path(
    put,
    path = "/api/users/{user_id}",
    params(
        ("user_id" = u64, Path, description = "User ID")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "User updated successfully", body = Object, example = json!({
            "message": "User updated successfully"
        })),
        (status = 400, description = "Field cannot be updated"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username already exists")
    ),
    tag = "User",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let user_id = path.into_inner();

    let body = match prepare_update(body.into_inner()) {
        Ok(body) => body,
        Err(resp) => return Ok(resp),
    };
    let update = build_update_sql("users", &body, UPDATABLE_COLUMNS, "id", user_id)?;

    let affected = match execute_update(pool.get_ref(), update).await {
        Ok(n) => n,
        Err(e) if is_duplicate(&e) => {
            return Ok(HttpResponse::Conflict().json(json!({
                "message": "Username already exists"
            })));
        }
        Err(e) => {
            error!(error = %e, user_id, "Failed to update user");
            return Err(ErrorInternalServerError("Internal Server Error"));
        }
    };

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({"message": "User not found"})));
    }

    Ok(HttpResponse::Ok().json(json!({"message": "User updated successfully"})))
}

/// Delete account. Attendance and overtime history is kept.
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}",
    params(
        ("user_id" = u64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 400, description = "Cannot delete your own account"),
        (status = 404, description = "User not found")
    ),
    tag = "User",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let user_id = path.into_inner();

    if user_id == auth.user_id {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Cannot delete your own account"
        })));
    }

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "Failed to delete user");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "User not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;

    #[test]
    fn password_is_hashed_before_update() {
        let Ok(body) = prepare_update(json!({"password": "n3w", "name": "Budi"})) else {
            panic!("update was refused");
        };
        let hashed = body["password"].as_str().unwrap();
        assert_ne!(hashed, "n3w");
        assert!(verify_password("n3w", hashed).is_ok());
        assert_eq!(body["name"], "Budi");
    }

    #[test]
    fn unknown_role_and_empty_password_are_refused() {
        assert!(prepare_update(json!({"role_id": 9})).is_err());
        assert!(prepare_update(json!({"password": ""})).is_err());
        assert!(prepare_update(json!({"role_id": 1})).is_ok());
    }
}
