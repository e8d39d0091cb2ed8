use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::model::attendance::{AttendanceRecord, EvidencePayload};
use crate::repository::{AttendanceFilter, MySqlRepository};
use crate::rules::stats::{AttendanceStats, DailyOverview, Period};
use crate::service::{attendance, stats};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Employee whose records to list (administrators only)
    pub employee_id: Option<u64>,
    /// Single day, `YYYY-MM-DD`
    #[param(value_type = Option<String>, example = "2026-01-05")]
    pub date: Option<NaiveDate>,
    /// Month `1..=12`, defaults to the current month when only `year` is given
    pub month: Option<u32>,
    /// Year, defaults to the current year when only `month` is given
    pub year: Option<i32>,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// Employee to summarize (administrators only, omit for everyone)
    pub employee_id: Option<u64>,
    /// Month `1..=12`, defaults to the current month
    pub month: Option<u32>,
    /// Year, defaults to the current year
    pub year: Option<i32>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DayQuery {
    /// Day to report on, defaults to today
    #[param(value_type = Option<String>, example = "2026-01-05")]
    pub date: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct MarkAbsences {
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date: NaiveDate,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body = EvidencePayload,
    responses(
        (status = 200, description = "Checked in successfully", body = AttendanceRecord),
        (status = 400, description = "Already checked in today", body = Object, example = json!({
            "code": "ALREADY_CHECKED_IN",
            "message": "Already checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    repo: web::Data<MySqlRepository>,
    config: web::Data<Config>,
    body: web::Json<EvidencePayload>,
) -> actix_web::Result<impl Responder> {
    let record =
        attendance::check_in(repo.get_ref(), auth.user_id, body.into_inner(), config.now()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-out",
    request_body = EvidencePayload,
    responses(
        (status = 200, description = "Checked out successfully", body = AttendanceRecord),
        (status = 400, description = "Not checked in, already checked out or minimum hours not met", body = Object, example = json!({
            "code": "MINIMUM_HOURS_NOT_MET",
            "message": "Minimum work hours (8 h) not met. Remaining: 30 minutes",
            "remainingMinutes": 30
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    repo: web::Data<MySqlRepository>,
    config: web::Data<Config>,
    body: web::Json<EvidencePayload>,
) -> actix_web::Result<impl Responder> {
    let record =
        attendance::check_out(repo.get_ref(), auth.user_id, body.into_inner(), config.now()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// List attendance records, newest first
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance records", body = [AttendanceRecord]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    repo: web::Data<MySqlRepository>,
    config: web::Data<Config>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.scope(query.employee_id)?;

    let period = if query.month.is_some() || query.year.is_some() {
        Some(Period::or_current(query.month, query.year, config.now().date())?)
    } else {
        None
    };

    let filter = AttendanceFilter {
        employee_id,
        date: query.date,
        period,
    };
    let records = attendance::list(repo.get_ref(), &filter).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Monthly attendance summary
#[utoipa::path(
    get,
    path = "/api/attendance/stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Summary for the month", body = AttendanceStats),
        (status = 400, description = "Invalid month"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn get_stats(
    auth: AuthUser,
    repo: web::Data<MySqlRepository>,
    config: web::Data<Config>,
    query: web::Query<StatsQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.scope(query.employee_id)?;
    let summary = stats::get_stats(
        repo.get_ref(),
        employee_id,
        query.month,
        query.year,
        config.now().date(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Dashboard snapshot of one day
#[utoipa::path(
    get,
    path = "/api/attendance/overview",
    params(DayQuery),
    responses(
        (status = 200, description = "Daily overview", body = DailyOverview),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn daily_overview(
    auth: AuthUser,
    repo: web::Data<MySqlRepository>,
    config: web::Data<Config>,
    query: web::Query<DayQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let date = query.date.unwrap_or_else(|| config.now().date());
    let overview = attendance::daily_overview(repo.get_ref(), date).await?;
    Ok(HttpResponse::Ok().json(overview))
}

/// Record absences for a closed working day
#[utoipa::path(
    post,
    path = "/api/attendance/absences",
    request_body = MarkAbsences,
    responses(
        (status = 200, description = "Absences recorded", body = Object, example = json!({
            "date": "2026-01-05",
            "marked": 3
        })),
        (status = 400, description = "The working day has not ended yet"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn mark_absences(
    auth: AuthUser,
    repo: web::Data<MySqlRepository>,
    config: web::Data<Config>,
    body: web::Json<MarkAbsences>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let marked = attendance::mark_absences(repo.get_ref(), body.date, config.now()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "date": body.date,
        "marked": marked
    })))
}
