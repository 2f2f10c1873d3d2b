//! Domain model for a child.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Average month length used for age calculations
pub const DAYS_PER_MONTH: f64 = 30.44;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

impl Child {
    /// Age in (fractional) months on the given day, `None` without a birth date
    pub fn age_in_months(&self, today: NaiveDate) -> Option<f64> {
        self.birth_date
            .map(|birth| (today - birth).num_days() as f64 / DAYS_PER_MONTH)
    }
}
