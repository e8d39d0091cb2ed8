use crate::{
    auth::{
        auth::{AuthUser, SESSION_COOKIE},
        jwt::generate_session_token,
        password::verify_password,
    },
    config::Config,
    model::role::Role,
    models::{LoginReqDto, UserSql},
};
use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};

fn session_cookie(token: String, ttl: usize) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(ttl as i64))
        .finish()
}

/// Sign in and open a session
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Signed in, session cookie set", body = Object, example = json!({
            "user": {"id": 2, "username": "budi", "name": "Budi Santoso", "role": "employee"},
            "token": "eyJhbGciOi..."
        })),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(pool, config, user),
    fields(username = %user.username)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return HttpResponse::BadRequest().json(json!({"message": "Username or password required"}));
    }

    let db_user = match sqlx::query_as::<_, UserSql>(
        r#"
        SELECT id, username, password, name, role_id
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(user.username.trim())
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(user)) => {
            debug!(user_id = user.id, "User found");
            user
        }
        Ok(None) => {
            info!("Invalid credentials: user not found");
            return HttpResponse::Unauthorized().json(json!({"message": "Invalid credentials"}));
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching user");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if let Err(e) = verify_password(&user.password, &db_user.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized().json(json!({"message": "Invalid credentials"}));
    }

    let Some(role) = Role::from_id(db_user.role_id) else {
        error!(user_id = db_user.id, role_id = db_user.role_id, "User has an unknown role");
        return HttpResponse::InternalServerError().finish();
    };

    let token = match generate_session_token(
        db_user.id,
        db_user.username.clone(),
        db_user.role_id,
        &config.jwt_secret,
        config.session_ttl,
    ) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to sign session token");
            return HttpResponse::InternalServerError().finish();
        }
    };

    info!(user_id = db_user.id, "Login successful");

    HttpResponse::Ok()
        .cookie(session_cookie(token.clone(), config.session_ttl))
        .json(json!({
            "user": {
                "id": db_user.id,
                "username": db_user.username,
                "name": db_user.name,
                "role": role,
            },
            "token": token
        }))
}

/// Close the session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 204, description = "Session cookie cleared")
    ),
    tag = "Auth"
)]
pub async fn logout() -> impl Responder {
    let mut expired = session_cookie(String::new(), 0);
    expired.make_removal();
    HttpResponse::NoContent().cookie(expired).finish()
}

/// Current identity
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Signed-in user", body = AuthUser),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth"
)]
pub async fn session(auth: AuthUser) -> impl Responder {
    HttpResponse::Ok().json(auth)
}
