mod cli;
mod report;

use std::process::ExitCode;

use clap::ArgMatches;

use fslx::{Dispatcher, FslxResult, Registry, RunSummary, SystemRunner};

fn main() -> ExitCode {
    let registry = Registry::builtin();
    let matches = cli::build_command(&registry).get_matches();
    match run(&registry, &matches) {
        Ok(summary) => {
            report::report_summary(&summary);
            if summary.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(error) => {
            report::report_error(&error);
            ExitCode::FAILURE
        }
    }
}

fn run(registry: &Registry, matches: &ArgMatches) -> FslxResult<RunSummary> {
    let request = cli::request_from_matches(registry, matches)?;
    let runner = SystemRunner;
    Dispatcher::new(registry, &runner).dispatch(&request)
}
