// Points ledger, daily cap tracking and day keys.

pub mod day_clock;
mod points_service;

pub use day_clock::CalendarClock;
pub use points_service::{PointsError, PointsService, PointsStore};
