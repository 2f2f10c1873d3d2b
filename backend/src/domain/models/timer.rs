//! In-progress timers started from the dashboard.
//!
//! A timer is not an event: it only tells us that something is happening right
//! now. Saving a completed sleep or feeding deactivates it.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SLEEP_TIMER_NAMES: &[&str] = &["sleep", "שינה"];
const FEEDING_TIMER_NAMES: &[&str] = &["feeding", "האכלה"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    pub id: String,
    pub child_id: String,
    pub name: Option<String>,
    pub start: DateTime<Utc>,
    pub active: bool,
}

impl Timer {
    pub fn is_sleep_timer(&self) -> bool {
        self.name_matches(SLEEP_TIMER_NAMES)
    }

    pub fn is_feeding_timer(&self) -> bool {
        self.name_matches(FEEDING_TIMER_NAMES)
    }

    fn name_matches(&self, names: &[&str]) -> bool {
        match &self.name {
            Some(name) => {
                let name = name.trim().to_lowercase();
                names.iter().any(|candidate| name == *candidate)
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer(name: Option<&str>) -> Timer {
        Timer {
            id: "t1".to_string(),
            child_id: "c".to_string(),
            name: name.map(str::to_string),
            start: Utc::now(),
            active: true,
        }
    }

    #[test]
    fn test_timer_kind_by_name() {
        assert!(timer(Some("Sleep")).is_sleep_timer());
        assert!(timer(Some("שינה")).is_sleep_timer());
        assert!(timer(Some("Feeding")).is_feeding_timer());
        assert!(!timer(Some("Tummy time")).is_sleep_timer());
        assert!(!timer(None).is_feeding_timer());
    }
}
