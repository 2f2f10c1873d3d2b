//! Predictive analytics for a baby tracker: statistics, feeding and sleep
//! predictions, and live status for each child.

pub mod config;
pub mod domain;
pub mod storage;
