//! Sun and Moon almanac CLI - entry point.

mod cli;
mod compute;
mod error;
mod output;
mod planner;

use astroday::astro::TodayCache;
use env_logger::Env;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let args: Vec<String> = std::env::args().collect();

    match cli::parse_cli(args) {
        Ok(input) => {
            let start = if input.params.perf {
                Some(std::time::Instant::now())
            } else {
                None
            };

            let (compute_plan, output_plan) = match planner::build_job(input) {
                Ok(spec) => spec,
                Err(err) => {
                    eprintln!("Error: {}", err);
                    std::process::exit(1);
                }
            };

            let mut cache = TodayCache::new();
            let almanac = compute::calculate(&compute_plan, &mut cache);

            let record_count =
                match output::dispatch_output(&almanac, compute_plan.command, &output_plan) {
                    Ok(count) => count,
                    Err(err) if err.0.kind() == std::io::ErrorKind::BrokenPipe => {
                        std::process::exit(0);
                    }
                    Err(err) => {
                        eprintln!("Error: {}", err);
                        std::process::exit(1);
                    }
                };

            if let Some(start_time) = start {
                let elapsed = start_time.elapsed();
                eprintln!(
                    "Computed 5 days and wrote {} records in {:.3}s",
                    record_count,
                    elapsed.as_secs_f64()
                );
            }
        }
        Err(error::CliError::Exit(message)) => {
            println!("{}", message);
            std::process::exit(0);
        }
        Err(error::CliError::Message(message)) => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
    }
}
