// Calendar-day keys for the daily cap.
//
// A day key is a human-readable date string ("Mon Oct 19 2026"), stable for
// the whole day and different for every other day. By default the process's
// local date is used; a named timezone can be configured instead so the cap
// resets at midnight for the community rather than for the host.

use chrono::{DateTime, Local, TimeZone, Utc};
use chrono_tz::Tz;

const DAY_KEY_FORMAT: &str = "%a %b %d %Y";

/// Source of the current day key.
pub trait DayClock: Send + Sync {
    fn today(&self) -> String;
}

/// Wall-clock day keys, either in the host's local zone or a configured one.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarClock {
    zone: Option<Tz>,
}

impl CalendarClock {
    pub fn local() -> Self {
        Self { zone: None }
    }

    pub fn in_zone(zone: Tz) -> Self {
        Self { zone: Some(zone) }
    }

    /// The day key for an arbitrary instant, using this clock's zone.
    pub fn day_key_at(&self, instant: DateTime<Utc>) -> String {
        match self.zone {
            Some(zone) => day_key(&instant.with_timezone(&zone)),
            None => day_key(&instant.with_timezone(&Local)),
        }
    }
}

impl DayClock for CalendarClock {
    fn today(&self) -> String {
        self.day_key_at(Utc::now())
    }
}

fn day_key<Z: TimeZone>(instant: &DateTime<Z>) -> String
where
    Z::Offset: std::fmt::Display,
{
    instant.format(DAY_KEY_FORMAT).to_string()
}
