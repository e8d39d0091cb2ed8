use crate::auth::auth::AuthUser;
use crate::model::schedule::{Holiday, UpdateHoliday};
use crate::repository::MySqlRepository;
use crate::service::calendar;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HolidayQuery {
    /// Only holidays of this year
    pub year: Option<i32>,
}

#[derive(Deserialize, ToSchema)]
pub struct DeleteHoliday {
    #[schema(example = "2026-10-20", format = "date", value_type = String)]
    pub date: NaiveDate,
}

/// Holiday calendar
#[utoipa::path(
    get,
    path = "/api/holidays",
    params(HolidayQuery),
    responses(
        (status = 200, description = "Holidays ordered by date", body = [Holiday]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Holiday"
)]
pub async fn list_holidays(
    _auth: AuthUser,
    repo: web::Data<MySqlRepository>,
    query: web::Query<HolidayQuery>,
) -> actix_web::Result<impl Responder> {
    let holidays = calendar::list_holidays(repo.get_ref(), query.year).await?;
    Ok(HttpResponse::Ok().json(holidays))
}

/// Add a holiday
#[utoipa::path(
    post,
    path = "/api/holidays",
    request_body = Holiday,
    responses(
        (status = 201, description = "Holiday added", body = Holiday),
        (status = 400, description = "Date already taken or name missing", body = Object, example = json!({
            "code": "INVALID_INPUT",
            "message": "A holiday already exists on 2026-08-17"
        })),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Holiday"
)]
pub async fn add_holiday(
    auth: AuthUser,
    repo: web::Data<MySqlRepository>,
    body: web::Json<Holiday>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let holiday = calendar::add_holiday(repo.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(holiday))
}

/// Move or rename a holiday
#[utoipa::path(
    put,
    path = "/api/holidays",
    request_body = UpdateHoliday,
    responses(
        (status = 200, description = "Holiday updated", body = Holiday),
        (status = 400, description = "Date already taken or name missing"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No holiday on oldDate")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Holiday"
)]
pub async fn update_holiday(
    auth: AuthUser,
    repo: web::Data<MySqlRepository>,
    body: web::Json<UpdateHoliday>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let holiday = calendar::update_holiday(repo.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(holiday))
}

/// Delete a holiday
#[utoipa::path(
    delete,
    path = "/api/holidays",
    request_body = DeleteHoliday,
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Holiday not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Holiday"
)]
pub async fn delete_holiday(
    auth: AuthUser,
    repo: web::Data<MySqlRepository>,
    body: web::Json<DeleteHoliday>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    calendar::delete_holiday(repo.get_ref(), body.date).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}

/// Restore the default holiday calendar
#[utoipa::path(
    post,
    path = "/api/holidays/reset",
    responses(
        (status = 200, description = "Defaults restored", body = [Holiday]),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Holiday"
)]
pub async fn reset_holidays(
    auth: AuthUser,
    repo: web::Data<MySqlRepository>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let holidays = calendar::reset_holidays(repo.get_ref()).await?;
    Ok(HttpResponse::Ok().json(holidays))
}
