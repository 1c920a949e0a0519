use crate::error::{MigrationError, Result};
use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Never,
    Weekly,
}

/// Repetition settings of an occupation. Weekdays are ISO numbers, Monday = 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    pub frequency: Frequency,
    pub repeats_every: Option<u32>,
    pub weekdays: Option<Vec<u32>>,
}

/// Legacy frequency codes:
///
/// * absent: one-off, no weekdays;
/// * `DAILY`: every week on working days, plus Saturday/Sunday when flagged;
/// * `WEEKLY`: every week on the start date's weekday;
/// * `BIWEEKLY`: every two weeks on the start date's weekday.
pub fn derive_recurrence(
    frequency: Option<&str>,
    start: NaiveDateTime,
    saturday: bool,
    sunday: bool,
) -> Result<Recurrence> {
    let start_weekday = start.weekday().number_from_monday();
    let r = match frequency {
        None => Recurrence {
            frequency: Frequency::Never,
            repeats_every: None,
            weekdays: None,
        },
        Some("DAILY") => {
            let mut days: Vec<u32> = (1..=5).collect();
            if saturday {
                days.push(6);
            }
            if sunday {
                days.push(7);
            }
            Recurrence {
                frequency: Frequency::Weekly,
                repeats_every: Some(1),
                weekdays: Some(days),
            }
        }
        Some("WEEKLY") => Recurrence {
            frequency: Frequency::Weekly,
            repeats_every: Some(1),
            weekdays: Some(vec![start_weekday]),
        },
        Some("BIWEEKLY") => Recurrence {
            frequency: Frequency::Weekly,
            repeats_every: Some(2),
            weekdays: Some(vec![start_weekday]),
        },
        Some(other) => return Err(MigrationError::UnknownFrequency(other.to_string())),
    };
    Ok(r)
}
