//! Hebrew phrasing for elapsed times.
//!
//! Elapsed time is rounded to the nearest five minutes before a phrase is
//! chosen, so 62 minutes reads "שעה" rather than "שעה ו-2 דקות". Phrases come
//! from ordered lookup tables; the first matching row wins.

/// Phrases for elapsed times under one hour, keyed by rounded minutes
const UNDER_AN_HOUR: &[(i64, &str)] = &[
    (0, "כמה דקות"),
    (15, "רבע שעה"),
    (30, "חצי שעה"),
    (45, "שלושת רבעים של שעה"),
];

/// Suffixes appended to the hour phrase, keyed by the minute remainder
const MINUTE_SUFFIXES: &[(i64, &str)] = &[
    (5, "וחמש דקות"),
    (10, "ועשר דקות"),
    (15, "ורבע"),
    (20, "ועשרים דקות"),
    (25, "ועשרים וחמש דקות"),
    (30, "וחצי"),
    (35, "ושלושים וחמש דקות"),
    (40, "וארבעים דקות"),
    (45, "ושלושת רבעים"),
    (50, "וחמישים דקות"),
    (55, "וחמישים וחמש דקות"),
];

fn lookup(table: &[(i64, &'static str)], key: i64) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, phrase)| *phrase)
}

/// Total minutes in `hours`, rounded to the nearest five
pub fn round_to_five_minutes(hours: f64) -> i64 {
    let minutes = (hours * 60.0).max(0.0);
    ((minutes / 5.0).round() as i64) * 5
}

fn hour_phrase(hours: i64) -> String {
    match hours {
        1 => "שעה".to_string(),
        2 => "שעתיים".to_string(),
        h => format!("{} שעות", h),
    }
}

/// Humanized phrase for an elapsed time given in (fractional) hours
///
/// ```
/// use baby_tracker_backend::domain::time_format::format_time_since;
/// assert_eq!(format_time_since(3.25), "3 שעות ורבע");
/// assert_eq!(format_time_since(2.5), "שעתיים וחצי");
/// assert_eq!(format_time_since(0.5), "חצי שעה");
/// ```
pub fn format_time_since(hours: f64) -> String {
    let total = round_to_five_minutes(hours);
    let h = total / 60;
    let m = total % 60;

    if h == 0 {
        return match lookup(UNDER_AN_HOUR, m) {
            Some(phrase) => phrase.to_string(),
            None => format!("{} דקות", m),
        };
    }

    let hour_text = hour_phrase(h);
    if m == 0 {
        return hour_text;
    }

    match lookup(MINUTE_SUFFIXES, m) {
        Some(suffix) => format!("{} {}", hour_text, suffix),
        None => format!("{} ו-{} דקות", hour_text, m),
    }
}

/// "H:MM" rendering of a minute count, truncated to whole minutes
pub fn format_clock(minutes: f64) -> String {
    let total = minutes.max(0.0) as i64;
    format!("{}:{:02}", total / 60, total % 60)
}
