//! Attendance and overtime rules. Pure functions over snapshots; no I/O.

pub mod attendance;
pub mod clock;
pub mod overtime;
pub mod schedule;
pub mod stats;
