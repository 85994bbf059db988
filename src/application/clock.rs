use chrono_tz::Tz;
use time::{Date, OffsetDateTime};

use crate::util::timezone::localized_date;

/// Source of "today" for stamping new posts.
pub trait Clock: Send + Sync {
    fn today(&self) -> Date;
}

/// Wall-clock date in the site's configured time zone.
#[derive(Debug, Clone, Copy)]
pub struct SiteClock {
    timezone: Tz,
}

impl SiteClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

impl Clock for SiteClock {
    fn today(&self) -> Date {
        localized_date(OffsetDateTime::now_utc(), self.timezone)
    }
}
