use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::model::overtime::{OvertimeRecord, StartOvertimeRequest};
use crate::repository::{MySqlRepository, OvertimeFilter};
use crate::rules::stats::Period;
use crate::service::overtime;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OvertimeQuery {
    /// Employee whose sessions to list (administrators only)
    pub employee_id: Option<u64>,
    /// Month `1..=12`
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// List overtime sessions, newest first
#[utoipa::path(
    get,
    path = "/api/overtime",
    params(OvertimeQuery),
    responses(
        (status = 200, description = "Overtime sessions", body = [OvertimeRecord]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn list_overtime(
    auth: AuthUser,
    repo: web::Data<MySqlRepository>,
    config: web::Data<Config>,
    query: web::Query<OvertimeQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.scope(query.employee_id)?;

    let period = if query.month.is_some() || query.year.is_some() {
        Some(Period::or_current(query.month, query.year, config.now().date())?)
    } else {
        None
    };

    let filter = OvertimeFilter {
        employee_id,
        period,
    };
    let records = overtime::list(repo.get_ref(), &filter).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Start an overtime session after a qualifying check-out
#[utoipa::path(
    post,
    path = "/api/overtime",
    request_body = StartOvertimeRequest,
    responses(
        (status = 200, description = "Overtime started", body = OvertimeRecord),
        (status = 400, description = "Not eligible for overtime", body = Object, example = json!({
            "code": "NOT_CHECKED_OUT",
            "message": "Check out before starting overtime"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn start_overtime(
    auth: AuthUser,
    repo: web::Data<MySqlRepository>,
    config: web::Data<Config>,
    body: web::Json<StartOvertimeRequest>,
) -> actix_web::Result<impl Responder> {
    let record = overtime::start(repo.get_ref(), auth.user_id, &body.reason, config.now()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// End the running overtime session
#[utoipa::path(
    post,
    path = "/api/overtime/end",
    responses(
        (status = 200, description = "Overtime ended", body = OvertimeRecord),
        (status = 400, description = "No overtime is running", body = Object, example = json!({
            "code": "NO_ACTIVE_OVERTIME",
            "message": "No overtime is running"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn end_overtime(
    auth: AuthUser,
    repo: web::Data<MySqlRepository>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let record = overtime::end(repo.get_ref(), auth.user_id, config.now()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Approve an overtime session
#[utoipa::path(
    post,
    path = "/api/overtime/{overtime_id}/approve",
    params(
        ("overtime_id" = u64, Path, description = "ID of the overtime session to approve")
    ),
    responses(
        (status = 200, description = "Overtime approved", body = OvertimeRecord),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Overtime not found"),
        (status = 409, description = "Already approved or rejected", body = Object, example = json!({
            "code": "ALREADY_DECIDED",
            "message": "Overtime was already approved"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn approve_overtime(
    auth: AuthUser,
    repo: web::Data<MySqlRepository>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let record = overtime::decide(repo.get_ref(), path.into_inner(), auth.user_id, true).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Reject an overtime session
#[utoipa::path(
    post,
    path = "/api/overtime/{overtime_id}/reject",
    params(
        ("overtime_id" = u64, Path, description = "ID of the overtime session to reject")
    ),
    responses(
        (status = 200, description = "Overtime rejected", body = OvertimeRecord),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Overtime not found"),
        (status = 409, description = "Already approved or rejected")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn reject_overtime(
    auth: AuthUser,
    repo: web::Data<MySqlRepository>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let record = overtime::decide(repo.get_ref(), path.into_inner(), auth.user_id, false).await?;
    Ok(HttpResponse::Ok().json(record))
}
