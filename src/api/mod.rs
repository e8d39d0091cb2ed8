pub mod attendance;
pub mod health;
pub mod holiday;
pub mod overtime;
pub mod schedule;
pub mod user;
