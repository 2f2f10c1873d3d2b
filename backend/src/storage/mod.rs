//! # Storage Module
//!
//! Read-only access to the event log. The domain layer depends on the traits
//! in [`traits`]; two backends implement them:
//!
//! - [`memory::InMemoryEventStore`]: everything held in memory, used by tests
//!   and by callers that already have the events loaded.
//! - [`csv::CsvEventRepository`]: one directory per child with a `child.yaml`
//!   and a CSV file per event kind.

pub mod csv;
pub mod memory;
pub mod traits;

pub use csv::{CsvConnection, CsvEventRepository};
pub use memory::InMemoryEventStore;
pub use traits::{EventStore, TimerStore};

use chrono::{DateTime, Utc};

/// Entries for one child whose instant falls in `[since, until)`, sorted by that instant
pub(crate) fn select_range<T: Clone>(
    items: &[T],
    child_id: &str,
    since: DateTime<Utc>,
    until: DateTime<Utc>,
    owner: impl Fn(&T) -> &str,
    instant: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut selected: Vec<T> = items
        .iter()
        .filter(|item| owner(item) == child_id)
        .filter(|item| {
            let at = instant(item);
            at >= since && at < until
        })
        .cloned()
        .collect();
    selected.sort_by_key(|item| instant(item));
    selected
}
