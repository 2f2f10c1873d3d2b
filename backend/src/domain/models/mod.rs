//! Read-only entities the analytics core consumes.
pub mod child;
pub mod events;
pub mod medication;
pub mod timer;

pub use child::Child;
pub use events::{DiaperChange, Feeding, Sleep};
pub use medication::{Medication, MedicationDose, MedicationFrequency, MedicationType};
pub use timer::Timer;
