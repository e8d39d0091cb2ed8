use crate::{
    api::{attendance, health, holiday, overtime, schedule, user},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms.max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_else(|| {
            tracing::warn!(requests_per_min, "Invalid rate limit, using the default limiter");
            GovernorConfig::default()
        });
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(web::resource("/health").route(web::get().to(health::health)));
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter)
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter)
            .service(web::resource("/auth/session").route(web::get().to(handlers::session)))
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(web::resource("").route(web::get().to(attendance::list_attendance)))
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out").route(web::post().to(attendance::check_out)),
                    )
                    .service(web::resource("/stats").route(web::get().to(attendance::get_stats)))
                    .service(
                        web::resource("/overview").route(web::get().to(attendance::daily_overview)),
                    )
                    .service(
                        web::resource("/absences").route(web::post().to(attendance::mark_absences)),
                    ),
            )
            .service(
                web::scope("/overtime")
                    // /overtime
                    .service(
                        web::resource("")
                            .route(web::get().to(overtime::list_overtime))
                            .route(web::post().to(overtime::start_overtime)),
                    )
                    .service(web::resource("/end").route(web::post().to(overtime::end_overtime)))
                    // /overtime/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::post().to(overtime::approve_overtime)),
                    )
                    // /overtime/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::post().to(overtime::reject_overtime)),
                    ),
            )
            .service(
                web::scope("/schedules")
                    .service(
                        web::resource("")
                            .route(web::get().to(schedule::list_schedules))
                            .route(web::put().to(schedule::update_schedule)),
                    )
                    .service(
                        web::resource("/reset").route(web::post().to(schedule::reset_schedules)),
                    )
                    .service(
                        web::resource("/resolve").route(web::get().to(schedule::resolve_schedule)),
                    ),
            )
            .service(
                web::scope("/holidays")
                    .service(
                        web::resource("")
                            .route(web::get().to(holiday::list_holidays))
                            .route(web::post().to(holiday::add_holiday))
                            .route(web::put().to(holiday::update_holiday))
                            .route(web::delete().to(holiday::delete_holiday)),
                    )
                    .service(web::resource("/reset").route(web::post().to(holiday::reset_holidays))),
            )
            .service(
                web::scope("/users")
                    // /users
                    .service(
                        web::resource("")
                            .route(web::get().to(user::list_users))
                            .route(web::post().to(user::create_user)),
                    )
                    // /users/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(user::get_user))
                            .route(web::put().to(user::update_user))
                            .route(web::delete().to(user::delete_user)),
                    ),
            ),
    );
}
