//! Per-user time zones and the local calendar days derived from them.
//!
//! Timestamps are stored in UTC. A user's zone only decides which calendar
//! day an instant falls on and how form-style local times are read.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Zone assigned when registration does not name one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Parse an IANA zone name such as `America/Los_Angeles`.
///
/// A missing or blank name means [`DEFAULT_TIMEZONE`].
pub fn parse_timezone(raw: Option<&str>) -> Result<Tz, CoreError> {
    let name = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_TIMEZONE);
    name.parse::<Tz>()
        .map_err(|_| CoreError::Validation(format!("Unknown timezone '{name}'")))
}

/// The calendar day `ts` falls on in `tz`.
pub fn local_day(ts: Timestamp, tz: Tz) -> NaiveDate {
    ts.with_timezone(&tz).date_naive()
}

/// Read a wall-clock time in `tz` as a UTC instant.
///
/// Repeated times (DST fall-back) resolve to the earlier instant. Times
/// skipped by a DST jump do not exist and are rejected.
pub fn localize(naive: NaiveDateTime, tz: Tz) -> Result<Timestamp, CoreError> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            CoreError::Validation(format!("{naive} does not exist in {}", tz.name()))
        })
}

/// UTC half-open range `[start, end)` covering `day` in `tz`.
pub fn day_bounds(day: NaiveDate, tz: Tz) -> (Timestamp, Timestamp) {
    (start_of_day(day, tz), start_of_day(day + Duration::days(1), tz))
}

/// First instant of `day` in `tz`. Midnight can fall in a DST gap, in which
/// case the day starts at the first local time that exists.
pub fn start_of_day(day: NaiveDate, tz: Tz) -> Timestamp {
    let midnight = day.and_time(NaiveTime::MIN);
    (0..=24 * 4)
        .map(|step| midnight + Duration::minutes(15 * step))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn blank_or_missing_zone_is_utc() {
        assert_eq!(parse_timezone(None).unwrap(), Tz::UTC);
        assert_eq!(parse_timezone(Some("  ")).unwrap(), Tz::UTC);
        assert_eq!(
            parse_timezone(Some(" Europe/Berlin ")).unwrap(),
            Tz::Europe__Berlin
        );
    }

    #[test]
    fn unknown_zone_is_rejected() {
        assert_matches!(
            parse_timezone(Some("Mars/Olympus_Mons")),
            Err(CoreError::Validation(msg)) if msg.contains("Mars/Olympus_Mons")
        );
    }

    #[test]
    fn evening_in_los_angeles_is_still_the_previous_day() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 4, 3, 0, 0).unwrap();
        assert_eq!(local_day(ts, Tz::UTC), date(2024, 6, 4));
        assert_eq!(local_day(ts, Tz::America__Los_Angeles), date(2024, 6, 3));
    }

    #[test]
    fn localize_reads_wall_clock_in_zone() {
        let naive = date(2024, 6, 3).and_hms_opt(21, 0, 0).unwrap();
        assert_eq!(
            localize(naive, Tz::America__Los_Angeles).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 4, 4, 0, 0).unwrap()
        );
    }

    #[test]
    fn skipped_wall_clock_time_is_rejected() {
        // 02:30 does not exist in New York on the spring-forward day.
        let naive = date(2024, 3, 10).and_hms_opt(2, 30, 0).unwrap();
        assert_matches!(
            localize(naive, Tz::America__New_York),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn day_bounds_follow_the_zone_offset() {
        let (start, end) = day_bounds(date(2024, 6, 3), Tz::America__Los_Angeles);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 6, 3, 7, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 6, 4, 7, 0, 0).unwrap());
    }

    #[test]
    fn day_bounds_span_23_hours_on_spring_forward() {
        let (start, end) = day_bounds(date(2024, 3, 10), Tz::America__New_York);
        assert_eq!(end - start, Duration::hours(23));
    }
}
