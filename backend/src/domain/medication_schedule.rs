//! Which medication dose comes next today.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use log::{debug, warn};
use shared::MedicationDue;

use crate::domain::clock::{local_date, local_hour, local_to_utc};
use crate::domain::models::{Medication, MedicationDose, MedicationFrequency};

/// Doses recorded for one medication
fn doses_for<'a>(medication: &Medication, doses: &'a [MedicationDose]) -> impl Iterator<Item = &'a MedicationDose> + 'a {
    let id = medication.id.clone();
    doses.iter().filter(move |d| d.medication_id == id)
}

/// Days since the most recent dose that was actually given
fn days_since_last_given(medication: &Medication, doses: &[MedicationDose], today: NaiveDate, tz: &Tz) -> Option<i64> {
    doses_for(medication, doses)
        .filter(|d| d.given)
        .max_by_key(|d| d.time)
        .map(|d| (today - local_date(d.time, tz)).num_days())
}

/// Whether the medication still needs a dose on `today`.
///
/// Weekly and every-other-day schedules count days since the last given
/// dose. Daily schedules compare today's records, given or skipped, against
/// the doses required per day.
pub fn is_due_today(medication: &Medication, doses: &[MedicationDose], today: NaiveDate, tz: &Tz) -> bool {
    if !medication.is_active_on(today) {
        return false;
    }

    match medication.frequency {
        MedicationFrequency::AsNeeded => false,
        MedicationFrequency::Weekly => days_since_last_given(medication, doses, today, tz).map_or(true, |days| days >= 7),
        MedicationFrequency::EveryOtherDay => days_since_last_given(medication, doses, today, tz).map_or(true, |days| days >= 2),
        frequency => {
            let recorded_today = doses_for(medication, doses)
                .filter(|d| local_date(d.time, tz) == today)
                .count();
            recorded_today < frequency.doses_per_day()
        }
    }
}

/// Earliest schedule slot later than `now` today whose hour has no dose on record
pub fn next_dose_time(
    medication: &Medication,
    doses: &[MedicationDose],
    now: DateTime<Utc>,
    tz: &Tz,
) -> Option<DateTime<Utc>> {
    let today = local_date(now, tz);
    let (times, rejected) = medication.parsed_schedule();
    for entry in rejected {
        warn!("Skipping malformed schedule time '{}' for medication {}", entry, medication.id);
    }

    times.into_iter().find_map(|time| {
        let scheduled = local_to_utc(today, time, tz);
        let recorded = doses_for(medication, doses).any(|d| {
            local_date(d.time, tz) == today && local_hour(d.time, tz) == local_hour(scheduled, tz)
        });
        (!recorded && scheduled > now).then_some(scheduled)
    })
}

/// The due medication whose next dose comes first, if any
pub fn next_medication_due(
    medications: &[Medication],
    doses: &[MedicationDose],
    now: DateTime<Utc>,
    tz: &Tz,
) -> Option<MedicationDue> {
    let today = local_date(now, tz);

    let next = medications
        .iter()
        .filter(|m| is_due_today(m, doses, today, tz))
        .filter_map(|m| next_dose_time(m, doses, now, tz).map(|time| (m, time)))
        .min_by_key(|(_, time)| *time)?;

    let (medication, time) = next;
    let minutes_until = (time - now).num_minutes();
    debug!("Next medication due: {} in {} minutes", medication.name, minutes_until);

    Some(MedicationDue {
        medication_id: medication.id.clone(),
        name: medication.name.clone(),
        dosage: medication.dosage.clone(),
        next_dose_time: time,
        minutes_until,
        is_overdue: minutes_until < 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::MedicationType;
    use chrono::{Duration, TimeZone};

    fn tz() -> Tz {
        chrono_tz::Asia::Riyadh
    }

    fn local(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        tz().with_ymd_and_hms(2025, 3, day, hour, minute, 0).unwrap().with_timezone(&Utc)
    }

    fn medication(id: &str, frequency: MedicationFrequency, schedule: &str) -> Medication {
        Medication {
            id: id.to_string(),
            child_id: "c".to_string(),
            name: format!("med {}", id),
            medication_type: MedicationType::Vitamin,
            dosage: "1 drop".to_string(),
            frequency,
            schedule_times: schedule.to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: None,
            active: true,
        }
    }

    fn dose(medication_id: &str, time: DateTime<Utc>, given: bool) -> MedicationDose {
        MedicationDose {
            id: format!("{}-{}", medication_id, time.timestamp()),
            medication_id: medication_id.to_string(),
            child_id: "c".to_string(),
            time,
            given,
            skipped_reason: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_as_needed_is_never_due() {
        let med = medication("a", MedicationFrequency::AsNeeded, "09:00");
        assert!(!is_due_today(&med, &[], today(), &tz()));
    }

    #[test]
    fn test_inactive_or_out_of_range_is_not_due() {
        let mut med = medication("a", MedicationFrequency::OnceDaily, "09:00");
        med.end_date = NaiveDate::from_ymd_opt(2025, 3, 9);
        assert!(!is_due_today(&med, &[], today(), &tz()));

        let mut med = medication("a", MedicationFrequency::OnceDaily, "09:00");
        med.active = false;
        assert!(!is_due_today(&med, &[], today(), &tz()));
    }

    #[test]
    fn test_weekly_counts_days_since_given_dose() {
        let med = medication("w", MedicationFrequency::Weekly, "09:00");
        assert!(is_due_today(&med, &[], today(), &tz()));

        let recent = vec![dose("w", local(5, 9, 0), true)];
        assert!(!is_due_today(&med, &recent, today(), &tz()));

        let old = vec![dose("w", local(3, 9, 0), true)];
        assert!(is_due_today(&med, &old, today(), &tz()));

        // skipped doses do not reset the weekly clock
        let skipped = vec![dose("w", local(8, 9, 0), false), dose("w", local(2, 9, 0), true)];
        assert!(is_due_today(&med, &skipped, today(), &tz()));
    }

    #[test]
    fn test_every_other_day() {
        let med = medication("e", MedicationFrequency::EveryOtherDay, "09:00");
        assert!(!is_due_today(&med, &[dose("e", local(9, 9, 0), true)], today(), &tz()));
        assert!(is_due_today(&med, &[dose("e", local(8, 9, 0), true)], today(), &tz()));
    }

    #[test]
    fn test_daily_frequencies_count_todays_records() {
        let med = medication("t", MedicationFrequency::TwiceDaily, "09:00,21:00");
        let one = vec![dose("t", local(10, 9, 5), true)];
        assert!(is_due_today(&med, &one, today(), &tz()));

        let two = vec![dose("t", local(10, 9, 5), true), dose("t", local(10, 21, 0), false)];
        assert!(!is_due_today(&med, &two, today(), &tz()));

        let yesterday = vec![dose("t", local(9, 9, 0), true), dose("t", local(9, 21, 0), true)];
        assert!(is_due_today(&med, &yesterday, today(), &tz()));
    }

    #[test]
    fn test_next_dose_skips_recorded_hours_and_past_slots() {
        let med = medication("t", MedicationFrequency::ThreeTimesDaily, "21:00, 08:00, 14:00");
        let now = local(10, 7, 0);
        assert_eq!(next_dose_time(&med, &[], now, &tz()), Some(local(10, 8, 0)));

        let doses = vec![dose("t", local(10, 8, 20), true)];
        assert_eq!(next_dose_time(&med, &doses, now, &tz()), Some(local(10, 14, 0)));

        assert_eq!(next_dose_time(&med, &[], local(10, 22, 0), &tz()), None);
    }

    #[test]
    fn test_malformed_schedule_entries_are_skipped() {
        let med = medication("m", MedicationFrequency::OnceDaily, "nine, 25:00, 18:30");
        assert_eq!(next_dose_time(&med, &[], local(10, 12, 0), &tz()), Some(local(10, 18, 30)));
    }

    #[test]
    fn test_next_medication_due_picks_earliest() {
        let meds = vec![
            medication("late", MedicationFrequency::OnceDaily, "20:00"),
            medication("early", MedicationFrequency::OnceDaily, "12:30"),
            medication("prn", MedicationFrequency::AsNeeded, "11:00"),
        ];
        let now = local(10, 11, 0);

        let due = next_medication_due(&meds, &[], now, &tz()).unwrap();
        assert_eq!(due.medication_id, "early");
        assert_eq!(due.minutes_until, 90);
        assert!(!due.is_overdue);
        assert_eq!(due.next_dose_time, now + Duration::minutes(90));

        assert!(next_medication_due(&meds, &[], local(10, 21, 0), &tz()).is_none());
    }

    #[test]
    fn test_schedule_slots_keep_local_wall_time_across_daylight_saving() {
        let jerusalem = chrono_tz::Asia::Jerusalem;
        let med = medication("d", MedicationFrequency::OnceDaily, "09:00");

        let winter_now = Utc.with_ymd_and_hms(2025, 1, 10, 5, 0, 0).unwrap();
        assert_eq!(
            next_dose_time(&med, &[], winter_now, &jerusalem),
            Some(Utc.with_ymd_and_hms(2025, 1, 10, 7, 0, 0).unwrap())
        );

        let summer_now = Utc.with_ymd_and_hms(2025, 7, 10, 5, 0, 0).unwrap();
        assert_eq!(
            next_dose_time(&med, &[], summer_now, &jerusalem),
            Some(Utc.with_ymd_and_hms(2025, 7, 10, 6, 0, 0).unwrap())
        );
    }
}
