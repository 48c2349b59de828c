//! Execution planning: turn parsed CLI input into a compute job and output settings.

use crate::cli::CliInput;
use crate::error::PlannerError;
use astroday::data::{
    self, Command, DayOffset, Moment, Observer, OutputFormat, OutputOptions,
};
use log::debug;

pub struct ComputePlan {
    pub observer: Observer,
    pub moment: Moment,
    pub offset: DayOffset,
    pub command: Command,
}

pub struct OutputPlan {
    pub format: OutputFormat,
    pub headers: bool,
    pub labels: bool,
    pub neighbors: bool,
}

impl From<OutputOptions> for OutputPlan {
    fn from(options: OutputOptions) -> Self {
        Self {
            format: options.format,
            headers: options.headers,
            labels: options.labels,
            neighbors: options.neighbors,
        }
    }
}

pub fn build_job(input: CliInput) -> Result<(ComputePlan, OutputPlan), PlannerError> {
    let CliInput {
        datetime,
        command,
        params,
    } = input;

    params.observer.validate()?;
    let zone = data::get_zone(params.timezone.as_deref()).map_err(PlannerError::from)?;
    let instant = data::parse_datetime_string(&datetime, &zone).map_err(PlannerError::from)?;
    let moment = Moment::new(instant, zone, params.deltat);
    debug!(
        "planned {:?} for {} (offset {} days, delta T {} s)",
        command, moment.instant, params.offset.0, params.deltat
    );

    let compute_plan = ComputePlan {
        observer: params.observer,
        moment,
        offset: params.offset,
        command,
    };
    Ok((compute_plan, OutputPlan::from(params.output)))
}
