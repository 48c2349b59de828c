//! Runs a planned job through the almanac orchestrator.

use crate::planner::ComputePlan;
use astroday::astro::{Almanac, TodayCache};

/// Compute the almanac of the planned day. The cache belongs to the caller;
/// a repeated run for the same observer and instant reuses its almanac.
pub fn calculate(plan: &ComputePlan, cache: &mut TodayCache) -> Almanac {
    let moment = if plan.offset.0 == 0 {
        plan.moment.clone()
    } else {
        plan.moment.shifted_days(plan.offset.0 as i64)
    };
    cache.almanac(&plan.observer, &moment)
}
