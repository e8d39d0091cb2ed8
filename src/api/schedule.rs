use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::model::schedule::{ResolvedSchedule, UpdateSchedule, WorkSchedule};
use crate::repository::MySqlRepository;
use crate::service::calendar;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResolveQuery {
    /// Day to resolve, defaults to today
    #[param(value_type = Option<String>, example = "2026-01-05")]
    pub date: Option<NaiveDate>,
}

/// Weekly work schedule
#[utoipa::path(
    get,
    path = "/api/schedules",
    responses(
        (status = 200, description = "One policy per weekday, Sunday first", body = [WorkSchedule]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schedule"
)]
pub async fn list_schedules(
    _auth: AuthUser,
    repo: web::Data<MySqlRepository>,
) -> actix_web::Result<impl Responder> {
    let policies = calendar::list_policies(repo.get_ref()).await?;
    Ok(HttpResponse::Ok().json(policies))
}

/// Update one weekday's policy
#[utoipa::path(
    put,
    path = "/api/schedules",
    request_body = UpdateSchedule,
    responses(
        (status = 200, description = "Policy updated", body = WorkSchedule),
        (status = 400, description = "Invalid policy", body = Object, example = json!({
            "code": "INVALID_INPUT",
            "message": "startTime must be earlier than endTime"
        })),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schedule"
)]
pub async fn update_schedule(
    auth: AuthUser,
    repo: web::Data<MySqlRepository>,
    body: web::Json<UpdateSchedule>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let policy = calendar::update_policy(repo.get_ref(), &body).await?;
    Ok(HttpResponse::Ok().json(policy))
}

/// Restore the default weekly schedule
#[utoipa::path(
    post,
    path = "/api/schedules/reset",
    responses(
        (status = 200, description = "Defaults restored", body = [WorkSchedule]),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schedule"
)]
pub async fn reset_schedules(
    auth: AuthUser,
    repo: web::Data<MySqlRepository>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let policies = calendar::reset_policies(repo.get_ref()).await?;
    Ok(HttpResponse::Ok().json(policies))
}

/// Policy and holiday flag in force on a day
#[utoipa::path(
    get,
    path = "/api/schedules/resolve",
    params(ResolveQuery),
    responses(
        (status = 200, description = "Resolved schedule", body = ResolvedSchedule),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Work schedule misconfigured")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schedule"
)]
pub async fn resolve_schedule(
    _auth: AuthUser,
    repo: web::Data<MySqlRepository>,
    config: web::Data<Config>,
    query: web::Query<ResolveQuery>,
) -> actix_web::Result<impl Responder> {
    let date = query.date.unwrap_or_else(|| config.now().date());
    let resolved = calendar::resolve(repo.get_ref(), date).await?;
    Ok(HttpResponse::Ok().json(resolved))
}
