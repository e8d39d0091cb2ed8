use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "budi")]
    pub username: String,
    #[schema(example = "secret")]
    pub password: String,
}

/// Columns needed to authenticate a user.
#[derive(FromRow)]
pub struct UserSql {
    pub id: u64, // BIGINT UNSIGNED
    pub username: String,
    pub password: String,
    pub name: String,
    pub role_id: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,
    pub jti: String,
}
