//! Live dashboard states.
//!
//! These are recomputed from the wall clock, the active timers and today's
//! events on every call. Nothing is remembered between calls.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use shared::{FeedingDisplayMode, FeedingDisplayStatus, LastFeeding, SleepDisplayMode, SleepDisplayStatus};

use crate::domain::clock::{local_date, local_day_bounds, local_hour};
use crate::domain::error::AnalyticsError;
use crate::domain::last_event::Elapsed;
use crate::domain::models::events::minutes;
use crate::domain::models::{Sleep, Timer};
use crate::domain::stats::round1;
use crate::domain::time_format::format_time_since;

/// Sleeps that ended between local midnight and now
fn ended_today<'a>(sleeps: &'a [Sleep], now: DateTime<Utc>, tz: &Tz) -> Vec<&'a Sleep> {
    let (day_start, _) = local_day_bounds(local_date(now, tz), tz);
    let mut today: Vec<&Sleep> = sleeps
        .iter()
        .filter(|s| s.end >= day_start && s.end <= now)
        .collect();
    today.sort_by_key(|s| s.end);
    today
}

/// Resolve the sleep card mode.
///
/// Checked in order: an active sleep timer means `sleeping`; from
/// `good_night_hour` on it is `good_night`; before the first sleep of the day
/// has ended it is `good_morning`; otherwise `awake`.
pub fn sleep_display_status(
    active_sleep_timer: Option<&Timer>,
    sleeps: &[Sleep],
    now: DateTime<Utc>,
    tz: &Tz,
    good_night_hour: u32,
) -> Result<SleepDisplayStatus, AnalyticsError> {
    let today = ended_today(sleeps, now, tz);

    let mut naps_today = 0;
    let mut nap_minutes_today = 0.0;
    let mut last_nap_minutes = None;
    for sleep in today.iter().filter(|s| s.nap) {
        let duration = minutes(sleep.duration()?);
        naps_today += 1;
        nap_minutes_today += duration;
        last_nap_minutes = Some(duration);
    }

    let mut status = SleepDisplayStatus {
        mode: SleepDisplayMode::Awake,
        display_text: String::new(),
        elapsed_minutes: None,
        elapsed_formatted: None,
        naps_today,
        nap_minutes_today: round1(nap_minutes_today),
        last_nap_note: None,
    };

    if let Some(timer) = active_sleep_timer {
        let elapsed = Elapsed::between(timer.start, now);
        status.mode = SleepDisplayMode::Sleeping;
        status.display_text = format!("ישן כבר {}", elapsed.formatted);
        status.elapsed_minutes = Some(round1(elapsed.minutes));
        status.elapsed_formatted = Some(elapsed.formatted);
        return Ok(status);
    }

    if local_hour(now, tz) >= good_night_hour {
        status.mode = SleepDisplayMode::GoodNight;
        status.display_text = if naps_today == 0 {
            "לילה טוב! לא היו תנומות היום".to_string()
        } else {
            format!(
                "לילה טוב! היום: {} תנומות, סה״כ {}",
                naps_today,
                format_time_since(nap_minutes_today / 60.0)
            )
        };
        return Ok(status);
    }

    let Some(last) = today.last() else {
        status.mode = SleepDisplayMode::GoodMorning;
        status.display_text = "בוקר טוב!".to_string();
        return Ok(status);
    };

    let elapsed = Elapsed::between(last.end, now);
    status.display_text = format!("ער כבר {}", elapsed.formatted);
    status.elapsed_minutes = Some(round1(elapsed.minutes));
    status.elapsed_formatted = Some(elapsed.formatted);
    status.last_nap_note = last_nap_minutes
        .map(|nap| format!("התנומה האחרונה נמשכה {}", format_time_since(nap / 60.0)));
    Ok(status)
}

/// Resolve the feeding card mode: `feeding` while a feeding timer runs, else `idle`
pub fn feeding_display_status(
    active_feeding_timer: Option<&Timer>,
    last_feeding: Option<&LastFeeding>,
    now: DateTime<Utc>,
) -> FeedingDisplayStatus {
    if let Some(timer) = active_feeding_timer {
        let elapsed = Elapsed::between(timer.start, now);
        return FeedingDisplayStatus {
            mode: FeedingDisplayMode::Feeding,
            display_text: format!("האכלה פעילה כבר {}", elapsed.formatted),
            elapsed_minutes: Some(round1(elapsed.minutes)),
            elapsed_formatted: Some(elapsed.formatted),
        };
    }

    match last_feeding {
        Some(last) => FeedingDisplayStatus {
            mode: FeedingDisplayMode::Idle,
            display_text: format!("האכלה אחרונה לפני {}", last.time_since_formatted),
            elapsed_minutes: Some(round1(last.time_since_minutes)),
            elapsed_formatted: Some(last.time_since_formatted.clone()),
        },
        None => FeedingDisplayStatus {
            mode: FeedingDisplayMode::Idle,
            display_text: "אין האכלות מתועדות".to_string(),
            elapsed_minutes: None,
            elapsed_formatted: None,
        },
    }
}
