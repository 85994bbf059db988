use chrono::{DateTime, Offset, TimeZone};
use chrono_tz::Tz;
use time::{Date, OffsetDateTime, UtcOffset};

/// Offset from UTC that `tz` observes at `instant`, daylight saving included.
fn zone_offset_at(instant: OffsetDateTime, tz: Tz) -> UtcOffset {
    let Some(utc) = DateTime::from_timestamp(instant.unix_timestamp(), 0) else {
        return UtcOffset::UTC;
    };
    let seconds = tz
        .offset_from_utc_datetime(&utc.naive_utc())
        .fix()
        .local_minus_utc();
    UtcOffset::from_whole_seconds(seconds).unwrap_or(UtcOffset::UTC)
}

/// Calendar date of `instant` as seen by a wall clock in `tz`.
pub fn localized_date(instant: OffsetDateTime, tz: Tz) -> Date {
    instant.to_offset(zone_offset_at(instant, tz)).date()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn date_rolls_forward_east_of_utc() {
        let instant = datetime!(2024-04-05 23:30 UTC);
        assert_eq!(
            localized_date(instant, chrono_tz::Asia::Tokyo),
            date!(2024 - 04 - 06)
        );
    }

    #[test]
    fn date_rolls_back_west_of_utc() {
        let instant = datetime!(2024-04-05 02:00 UTC);
        assert_eq!(
            localized_date(instant, chrono_tz::America::New_York),
            date!(2024 - 04 - 04)
        );
    }

    #[test]
    fn utc_keeps_the_calendar_date() {
        let instant = datetime!(2024-04-05 12:00 UTC);
        assert_eq!(localized_date(instant, chrono_tz::UTC), date!(2024 - 04 - 05));
    }

    #[test]
    fn offset_follows_daylight_saving() {
        let new_york = chrono_tz::America::New_York;
        assert_eq!(
            zone_offset_at(datetime!(2024-01-15 12:00 UTC), new_york).whole_hours(),
            -5
        );
        assert_eq!(
            zone_offset_at(datetime!(2024-07-15 12:00 UTC), new_york).whole_hours(),
            -4
        );
        assert_eq!(
            localized_date(datetime!(2024-07-05 03:30 UTC), new_york),
            date!(2024 - 07 - 04)
        );
    }
}
