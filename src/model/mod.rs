pub mod attendance;
pub mod overtime;
pub mod role;
pub mod schedule;
pub mod user;
