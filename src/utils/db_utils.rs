use actix_web::error::ErrorBadRequest;
use chrono::NaiveDate;
use serde_json::Value;
use sqlx::MySqlPool;

/// A JSON scalar ready to be bound to a MySQL placeholder.
#[derive(Debug, PartialEq)]
pub enum SqlValue {
    String(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

impl TryFrom<&Value> for SqlValue {
    type Error = actix_web::Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::String(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                Ok(date) => SqlValue::Date(date),
                Err(_) => SqlValue::String(s.clone()),
            },
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => SqlValue::I64(i),
                (None, Some(f)) => SqlValue::F64(f),
                (None, None) => return Err(ErrorBadRequest("Unsupported number")),
            },
            Value::Bool(b) => SqlValue::Bool(*b),
            Value::Null => SqlValue::Null,
            Value::Array(_) | Value::Object(_) => {
                return Err(ErrorBadRequest("Unsupported JSON value type"));
            }
        })
    }
}

#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Builds `UPDATE {table} SET k = ?, ... WHERE {id_column} = ?` from a JSON object.
///
/// Keys double as column names, so only those listed in `allowed` are accepted.
pub fn build_update_sql(
    table: &str,
    payload: &Value,
    allowed: &[&str],
    id_column: &str,
    id_value: u64,
) -> Result<SqlUpdate, actix_web::Error> {
    let fields = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;
    if fields.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }
    if let Some(unknown) = fields.keys().find(|k| !allowed.contains(&k.as_str())) {
        return Err(ErrorBadRequest(format!("Field '{unknown}' cannot be updated")));
    }

    let assignments: Vec<String> = fields.keys().map(|column| format!("{column} = ?")).collect();
    let mut values = fields
        .values()
        .map(SqlValue::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    values.push(SqlValue::U64(id_value));

    Ok(SqlUpdate {
        sql: format!(
            "UPDATE {table} SET {} WHERE {id_column} = ?",
            assignments.join(", ")
        ),
        values,
    })
}

/// Runs the update and returns the number of affected rows.
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);
    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::U64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    Ok(query.execute(pool).await?.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLUMNS: &[&str] = &["name", "email", "role_id"];

    #[test]
    fn builds_one_placeholder_per_field() {
        let update =
            build_update_sql("users", &json!({"name": "Budi", "role_id": 2}), COLUMNS, "id", 7)
                .unwrap();
        assert_eq!(update.sql, "UPDATE users SET name = ?, role_id = ? WHERE id = ?");
        assert_eq!(
            update.values,
            vec![
                SqlValue::String("Budi".into()),
                SqlValue::I64(2),
                SqlValue::U64(7)
            ]
        );
    }

    #[test]
    fn rejects_columns_outside_the_whitelist() {
        let payload = json!({"name": "x", "id = 1; --": 1});
        assert!(build_update_sql("users", &payload, COLUMNS, "id", 7).is_err());
    }

    #[test]
    fn rejects_empty_and_non_object_payloads() {
        assert!(build_update_sql("users", &json!({}), COLUMNS, "id", 7).is_err());
        assert!(build_update_sql("users", &json!([1, 2]), COLUMNS, "id", 7).is_err());
    }

    #[test]
    fn null_clears_a_column() {
        let update = build_update_sql("users", &json!({"email": null}), COLUMNS, "id", 7).unwrap();
        assert_eq!(update.values[0], SqlValue::Null);
    }
}
