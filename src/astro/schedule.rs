//! Time-ordered event list of one local day.

use super::riseset::EventTime;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Fractional local hour usable as an ordered map key.
#[derive(Debug, Clone, Copy)]
pub struct HourKey(pub f64);

impl PartialEq for HourKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HourKey {}

impl PartialOrd for HourKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HourKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// One schedule entry: the canonical field that fires and, for transitions
/// and seasonal hours, the value it takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub field: &'static str,
    pub value: Option<String>,
}

impl Event {
    pub fn new(field: &'static str) -> Self {
        Self { field, value: None }
    }

    pub fn with_value(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: Some(value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEvent {
    /// Local hour; the look-ahead event of the next day carries hour + 24.
    pub hour: f64,
    pub event: Event,
}

/// Events split around the current time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Partition {
    /// Already happened, most recent first.
    pub recent: Vec<ScheduledEvent>,
    /// Still to come, in chronological order, ending with the look-ahead.
    pub upcoming: Vec<ScheduledEvent>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schedule {
    entries: BTreeMap<HourKey, Vec<Event>>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, hour: f64, event: Event) {
        self.entries.entry(HourKey(hour)).or_default().push(event);
    }

    /// Insert only when the event occurs on this day.
    pub fn insert_at(&mut self, time: EventTime, event: Event) {
        if let EventTime::At(hour) = time {
            self.insert(hour, event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ScheduledEvent> + '_ {
        self.entries.iter().flat_map(|(hour, events)| {
            events.iter().map(move |event| ScheduledEvent {
                hour: hour.0,
                event: event.clone(),
            })
        })
    }

    pub fn first(&self) -> Option<ScheduledEvent> {
        self.iter().next()
    }

    /// Split at local hour `now`: events at or before `now` are recent, the
    /// rest upcoming. `lookahead` is appended to the upcoming events.
    pub fn partition(&self, now: f64, lookahead: Option<ScheduledEvent>) -> Partition {
        let (mut recent, mut upcoming): (Vec<_>, Vec<_>) =
            self.iter().partition(|entry| entry.hour <= now);
        recent.reverse();
        upcoming.extend(lookahead);
        Partition { recent, upcoming }
    }
}
