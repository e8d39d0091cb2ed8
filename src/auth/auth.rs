use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::model::role::Role;
use actix_web::{
    FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized, web::Data,
};
use futures::future::{Ready, ready};
use serde::Serialize;
use utoipa::ToSchema;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthUser {
    #[schema(example = 2)]
    pub user_id: u64,
    #[schema(example = "budi")]
    pub username: String,
    #[schema(value_type = String, example = "employee")]
    pub role: Role,
}

/// Session token from the `session` cookie, or from a Bearer header.
pub fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

impl AuthUser {
    pub fn from_token(token: &str, config: &Config) -> Result<Self, String> {
        let claims = verify_token(token, &config.jwt_secret)?;
        let role = Role::from_id(claims.role).ok_or_else(|| "Invalid role".to_string())?;
        Ok(AuthUser {
            user_id: claims.user_id,
            username: claims.sub,
            role,
        })
    }
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Already verified by the auth middleware.
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        let token = match session_token(req) {
            Some(t) => t,
            None => return ready(Err(ErrorUnauthorized("Missing token"))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "Config missing",
                )));
            }
        };

        ready(AuthUser::from_token(&token, config).map_err(|_| ErrorUnauthorized("Invalid token")))
    }
}

impl AuthUser {
    pub fn require_admin(&self) -> actix_web::Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("Admin only"))
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whose records a listing may show: administrators choose freely
    /// (`None` means everyone), everybody else only sees their own.
    pub fn scope(&self, requested: Option<u64>) -> actix_web::Result<Option<u64>> {
        if self.is_admin() {
            return Ok(requested);
        }
        match requested {
            Some(id) if id != self.user_id => {
                Err(actix_web::error::ErrorForbidden("Employees may only view their own records"))
            }
            _ => Ok(Some(self.user_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            user_id: 7,
            username: "budi".into(),
            role,
        }
    }

    #[test]
    fn employees_are_scoped_to_themselves() {
        let employee = user(Role::Employee);
        assert_eq!(employee.scope(None).unwrap(), Some(7));
        assert_eq!(employee.scope(Some(7)).unwrap(), Some(7));
        assert!(employee.scope(Some(8)).is_err());
        assert!(employee.require_admin().is_err());
    }

    #[test]
    fn admins_may_see_anyone() {
        let admin = user(Role::Admin);
        assert_eq!(admin.scope(None).unwrap(), None);
        assert_eq!(admin.scope(Some(8)).unwrap(), Some(8));
        assert!(admin.require_admin().is_ok());
    }
}
