//! Time source and local-calendar helpers.
//!
//! Every "now" the engine uses comes from a [`Clock`], so tests can pin the
//! current instant. Hour-of-day and calendar-day boundaries are computed in the
//! child's IANA time zone, never in UTC, so a day that crosses a daylight
//! saving change is 23 or 25 hours long.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn local_date(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

pub fn local_hour(instant: DateTime<Utc>, tz: &Tz) -> u32 {
    instant.with_timezone(tz).hour()
}

/// UTC instant of a local wall-clock time on a local date.
///
/// A repeated wall time (clocks going back) resolves to its first occurrence.
/// A skipped one (clocks going forward) is read with the offset in force
/// before the gap, which lands it the same distance past the jump.
pub fn local_to_utc(date: NaiveDate, time: NaiveTime, tz: &Tz) -> DateTime<Utc> {
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(local) => local.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let before_gap = tz.offset_from_utc_datetime(&(naive - Duration::days(1))).fix();
            let utc = naive - Duration::seconds(before_gap.local_minus_utc() as i64);
            Utc.from_utc_datetime(&utc)
        }
    }
}

/// Half-open `[start, end)` UTC range covering one local calendar day
pub fn local_day_bounds(date: NaiveDate, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_to_utc(date, NaiveTime::MIN, tz);
    let end = match date.succ_opt() {
        Some(next) => local_to_utc(next, NaiveTime::MIN, tz),
        None => start + Duration::days(1),
    };
    (start, end)
}
