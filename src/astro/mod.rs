//! Sun and Moon almanac engine.
//!
//! Pure and single-threaded: every operation is a closed-form or
//! fixed-iteration computation. [`orchestrator::compute`] is the entry point;
//! [`orchestrator::TodayCache`] keeps the last almanac between calls.

pub mod calendar;
pub mod fields;
pub mod moon;
pub mod orchestrator;
pub mod refraction;
pub mod riseset;
pub mod schedule;
pub mod seasonal;
pub mod seasons;
pub mod snapshot;
pub mod sun;
pub mod transform;
pub mod zodiac;

pub use fields::{FieldMap, FieldValue};
pub use orchestrator::{Almanac, TodayCache, compute, compute_for};
pub use riseset::{Absence, EventTime};
pub use schedule::{Partition, Schedule, ScheduledEvent};
pub use snapshot::{Attribute, ChangeFlag, DaySnapshot};

/// Default ΔT = TDT - UT in seconds.
pub const DEFAULT_DELTA_T: f64 = 65.0;
