use anyhow::{Context, Result};
use sqlx::MySqlPool;

use crate::auth::password::hash_password;
use crate::config::Config;
use crate::model::role::Role;
use crate::model::schedule::{default_holidays, default_work_schedules};

pub async fn init_db(database_url: &str) -> Result<MySqlPool> {
    let pool = MySqlPool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}

/// First-run defaults. Existing rows are left untouched.
pub async fn seed(pool: &MySqlPool, config: &Config) -> Result<()> {
    for policy in default_work_schedules() {
        sqlx::query(
            "INSERT IGNORE INTO work_schedules (day_of_week, start_time, end_time, min_work_hours) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(policy.day_of_week)
        .bind(policy.start_time)
        .bind(policy.end_time)
        .bind(policy.min_work_hours)
        .execute(pool)
        .await
        .context("Failed to seed work schedules")?;
    }

    let holidays: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM holidays")
        .fetch_one(pool)
        .await
        .context("Failed to count holidays")?;
    if holidays == 0 {
        for holiday in default_holidays() {
            sqlx::query("INSERT IGNORE INTO holidays (date, name) VALUES (?, ?)")
                .bind(holiday.date)
                .bind(&holiday.name)
                .execute(pool)
                .await
                .context("Failed to seed holidays")?;
        }
        tracing::info!("Seeded default holiday calendar");
    }

    if let Some((username, password)) = &config.seed_admin {
        let hashed = hash_password(password)
            .map_err(|e| anyhow::anyhow!("Failed to hash seed admin password: {e}"))?;
        let result = sqlx::query(
            "INSERT IGNORE INTO users (username, password, name, role_id) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(hashed)
        .bind("Administrator")
        .bind(Role::Admin.id())
        .execute(pool)
        .await
        .context("Failed to seed admin account")?;

        if result.rows_affected() > 0 {
            tracing::info!(username = %username, "Seeded administrator account");
        }
    }

    Ok(())
}
