//! Five-day pass: snapshots for the requested day and its neighbours, change
//! flags between adjacent days, and the day schedule.

use super::schedule::{Event, Partition, ScheduledEvent};
use super::snapshot::{Attribute, ChangeFlag, DaySnapshot, attribute_at};
use crate::data::{DayOffset, Moment, Observer};
use chrono::Duration;
use log::{debug, trace};

/// Offsets in the order their snapshots are built.
pub const BUILD_ORDER: [i32; 5] = [2, 1, -1, -2, 0];

/// Snapshots for offsets -2..=2 around the requested day.
#[derive(Debug, Clone, PartialEq)]
pub struct Almanac {
    days: [DaySnapshot; 5],
}

impl Almanac {
    pub fn day(&self, offset: i32) -> Option<&DaySnapshot> {
        usize::try_from(offset + 2)
            .ok()
            .and_then(|index| self.days.get(index))
    }

    pub fn today(&self) -> &DaySnapshot {
        &self.days[2]
    }

    /// Snapshots ordered by offset, -2 first.
    pub fn days(&self) -> &[DaySnapshot; 5] {
        &self.days
    }

    /// Today's schedule split at the current local time, with the first
    /// event of tomorrow appended to the upcoming events.
    pub fn partition(&self) -> Partition {
        let lookahead = self.days[3].schedule.first().map(|entry| ScheduledEvent {
            hour: entry.hour + 24.0,
            event: entry.event,
        });
        let today = self.today();
        today.schedule.partition(today.moment.hour(), lookahead)
    }
}

/// Build the almanac for the local day of `moment`.
pub fn compute(observer: &Observer, moment: &Moment) -> Almanac {
    assemble(observer, moment, None).0
}

/// Five-day pass reusing `cached_today` as the offset-0 snapshot when given.
/// Also returns today's snapshot as it was before the transition pass.
fn assemble(
    observer: &Observer,
    moment: &Moment,
    mut cached_today: Option<DaySnapshot>,
) -> (Almanac, DaySnapshot) {
    let snapshot = |offset: i32| {
        if offset == 0
            && let Some(today) = cached_today.take()
        {
            return today;
        }
        let day = if offset == 0 {
            moment.clone()
        } else {
            moment.shifted_days(offset as i64)
        };
        trace!("computing snapshot for offset {} ({})", offset, day.date());
        DaySnapshot::compute(observer, &day, offset)
    };
    let [plus2, plus1, minus1, minus2, today] = BUILD_ORDER.map(snapshot);
    let fresh_today = today.clone();
    let mut days = [minus2, minus1, today, plus1, plus2];
    apply_transitions(&mut days);
    (Almanac { days }, fresh_today)
}

/// Build the almanac for the day `offset` days away from `moment`.
pub fn compute_for(observer: &Observer, moment: &Moment, offset: DayOffset) -> Almanac {
    if offset.0 == 0 {
        compute(observer, moment)
    } else {
        compute(observer, &moment.shifted_days(offset.0 as i64))
    }
}

struct Transition {
    earlier: usize,
    attribute: Attribute,
    value: String,
}

fn apply_transitions(days: &mut [DaySnapshot; 5]) {
    let values: Vec<Vec<Option<String>>> = days
        .iter()
        .map(|day| Attribute::ALL.iter().map(|a| day.attribute(*a)).collect())
        .collect();

    let mut transitions = Vec::new();
    for earlier in 0..days.len() - 1 {
        for (slot, attribute) in Attribute::ALL.into_iter().enumerate() {
            if let (Some(before), Some(after)) = (&values[earlier][slot], &values[earlier + 1][slot])
                && before != after
            {
                transitions.push(Transition {
                    earlier,
                    attribute,
                    value: after.clone(),
                });
            }
        }
    }

    for Transition {
        earlier,
        attribute,
        value,
    } in transitions
    {
        let later = earlier + 1;
        days[earlier]
            .changes
            .mark(attribute, ChangeFlag::ChangesTomorrow);
        days[later].changes.mark(attribute, ChangeFlag::ChangedToday);

        if attribute.is_day_granular() {
            days[later]
                .schedule
                .insert(0.0, Event::with_value(attribute.field(), value));
            continue;
        }

        let flip = bisect(attribute, &days[earlier].moment, &days[later].moment);
        debug!(
            "{} changes to {} at {}",
            attribute.field(),
            value,
            flip.local().format("%Y-%m-%d %H:%M")
        );
        if let Some(day) = [earlier, later]
            .into_iter()
            .find(|i| days[*i].moment.date() == flip.date())
        {
            days[day]
                .schedule
                .insert(flip.hour(), Event::with_value(attribute.field(), value));
        }
    }
}

/// First moment, to the minute, at which `attribute` differs from its value
/// at `from`.
fn bisect(attribute: Attribute, from: &Moment, to: &Moment) -> Moment {
    let before = attribute_at(attribute, from);
    let moment_at = |instant| Moment::new(instant, from.zone.clone(), from.delta_t);
    let (mut lo, mut hi) = (from.instant, to.instant);
    while hi - lo > Duration::minutes(1) {
        let mid = lo + (hi - lo) / 2;
        if attribute_at(attribute, &moment_at(mid)) == before {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    moment_at(hi)
}

/// Caller-owned state holding the most recent "today" snapshot. Neighbouring
/// days are recomputed on every refresh and never cached.
#[derive(Debug, Clone, Default)]
pub struct TodayCache {
    today: Option<DaySnapshot>,
}

impl TodayCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached offset-0 snapshot, without change flags or transitions.
    pub fn today(&self) -> Option<&DaySnapshot> {
        self.today.as_ref()
    }

    /// Whether the cached snapshot was computed for this observer and instant.
    pub fn is_current(&self, observer: &Observer, moment: &Moment) -> bool {
        self.today
            .as_ref()
            .is_some_and(|day| &day.observer == observer && &day.moment == moment)
    }

    /// The almanac for `observer` at `moment`. A current cached snapshot is
    /// reused for today; the neighbour days are always recomputed.
    pub fn almanac(&mut self, observer: &Observer, moment: &Moment) -> Almanac {
        if self.is_current(observer, moment) {
            trace!("reusing cached snapshot for {}", moment.local());
            return assemble(observer, moment, self.today.clone()).0;
        }
        self.refresh(observer, moment)
    }

    /// Recompute the whole almanac and keep its day snapshot.
    pub fn refresh(&mut self, observer: &Observer, moment: &Moment) -> Almanac {
        debug!(
            "refreshing almanac for {:.4},{:.4} on {}",
            observer.latitude,
            observer.longitude,
            moment.date()
        );
        let (almanac, today) = assemble(observer, moment, None);
        self.today = Some(today);
        almanac
    }
}
