use crate::api::attendance::MarkAbsences;
use crate::api::holiday::DeleteHoliday;
use crate::api::user::CreateUser;
use crate::auth::auth::AuthUser;
use crate::model::attendance::{
    AttendanceRecord, AttendanceStatus, Evidence, EvidencePayload, Location,
};
use crate::model::overtime::{OvertimeRecord, OvertimeStatus, StartOvertimeRequest};
use crate::model::schedule::{
    Holiday, ResolvedSchedule, UpdateHoliday, UpdateSchedule, WorkSchedule,
};
use crate::model::user::User;
use crate::models::LoginReqDto;
use crate::rules::stats::{AttendanceStats, DailyOverview};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Hub API",
        version = "1.0.0",
        description = r#"
## Attendance and Overtime

Backend for a small company's attendance system.

### Key Features
- **Attendance**
  - Daily check-in and check-out with photo and GPS evidence
  - Late detection and minimum work hours per weekday
  - Monthly statistics and a daily dashboard
- **Overtime**
  - Overtime sessions after a qualifying check-out, approved or rejected by an administrator
- **Calendar**
  - Weekly work schedule and company holidays

### Security
Protected endpoints accept the `session` cookie set by `/auth/login`
or an `Authorization: Bearer` header carrying the same token.
Calendar changes, overtime decisions and account management require the **admin** role.

### Errors
Rule violations answer with a machine-readable `code` and a human `message`.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::health::health,

        crate::auth::handlers::login,
        crate::auth::handlers::logout,
        crate::auth::handlers::session,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::list_attendance,
        crate::api::attendance::get_stats,
        crate::api::attendance::daily_overview,
        crate::api::attendance::mark_absences,

        crate::api::overtime::list_overtime,
        crate::api::overtime::start_overtime,
        crate::api::overtime::end_overtime,
        crate::api::overtime::approve_overtime,
        crate::api::overtime::reject_overtime,

        crate::api::schedule::list_schedules,
        crate::api::schedule::update_schedule,
        crate::api::schedule::reset_schedules,
        crate::api::schedule::resolve_schedule,

        crate::api::holiday::list_holidays,
        crate::api::holiday::add_holiday,
        crate::api::holiday::update_holiday,
        crate::api::holiday::delete_holiday,
        crate::api::holiday::reset_holidays,

        crate::api::user::list_users,
        crate::api::user::get_user,
        crate::api::user::create_user,
        crate::api::user::update_user,
        crate::api::user::delete_user
    ),
    components(
        schemas(
            LoginReqDto,
            AuthUser,
            Location,
            Evidence,
            EvidencePayload,
            AttendanceStatus,
            AttendanceRecord,
            AttendanceStats,
            DailyOverview,
            MarkAbsences,
            OvertimeStatus,
            OvertimeRecord,
            StartOvertimeRequest,
            WorkSchedule,
            UpdateSchedule,
            ResolvedSchedule,
            Holiday,
            UpdateHoliday,
            DeleteHoliday,
            User,
            CreateUser
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Session APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Overtime", description = "Overtime management APIs"),
        (name = "Schedule", description = "Weekly work schedule APIs"),
        (name = "Holiday", description = "Holiday calendar APIs"),
        (name = "User", description = "Account management APIs"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
