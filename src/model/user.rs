use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct User {
    #[schema(example = 2)]
    pub id: u64,
    #[schema(example = "budi")]
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[schema(example = "Budi Santoso")]
    pub name: String,
    #[schema(example = 2)]
    pub role_id: u8,
    #[schema(example = "Operations", nullable = true)]
    pub department: Option<String>,
    #[schema(example = "Field Supervisor", nullable = true)]
    pub position: Option<String>,
    #[schema(example = "budi@company.com", nullable = true)]
    pub email: Option<String>,
    #[schema(example = "081234567891", nullable = true)]
    pub phone: Option<String>,
    #[schema(example = "2026-01-01T08:00:00", value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}

/// What the rule engine needs to know about an account.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: u64,
    pub role: Role,
    /// First calendar day the account existed; no absence is recorded before it.
    pub joined_on: NaiveDate,
}

impl Employee {
    pub fn is_employee(&self) -> bool {
        self.role == Role::Employee
    }
}
