use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{FslxError, FslxResult};
use crate::paths::{derive_output_path, validate_inputs};
use crate::registry::{Operation, Registry};
use crate::runner::ToolRunner;

/// Parsed user intent for one process run: which operation, where output
/// goes, and the inputs to apply it to. Consumed immediately by
/// [`Dispatcher::dispatch`]; never persisted.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    /// The chosen operation name.
    pub operation: String,
    /// Replace each input's directory component in derived output paths.
    /// Absent means outputs stay beside their inputs.
    pub target_dir: Option<PathBuf>,
    /// Delete each input after its action succeeds.
    pub in_place: bool,
    /// The input files to operate on.
    pub inputs: Vec<PathBuf>,
    /// Value of the operation's extra argument, when it declares one.
    pub extra: Option<f64>,
}

/// What one input produced when its action succeeded.
#[derive(Debug, Clone)]
pub struct Success {
    /// The derived output path, for operations that write one.
    pub output: Option<PathBuf>,
    /// A line worth showing to the user, e.g. a volume count.
    pub note: Option<String>,
}

/// Result of processing one input.
#[derive(Debug)]
pub struct InputOutcome {
    pub input: PathBuf,
    pub result: FslxResult<Success>,
}

/// Per-input results of a whole run, in input order.
///
/// A failed input never aborts the remaining ones; callers inspect
/// [`RunSummary::is_success`] to decide the process exit status.
#[derive(Debug)]
pub struct RunSummary {
    outcomes: Vec<InputOutcome>,
}

impl RunSummary {
    pub fn outcomes(&self) -> &[InputOutcome] {
        &self.outcomes
    }

    /// Whether every input was processed without error.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }

    /// The inputs that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &FslxError)> {
        self.outcomes.iter().filter_map(|outcome| {
            outcome
                .result
                .as_ref()
                .err()
                .map(|error| (outcome.input.as_path(), error))
        })
    }
}

/// Applies a parsed [`InvocationRequest`] against a registry, once per
/// input file.
///
/// Configuration and validation problems abort the run before any per-file
/// work; external-tool failures are recorded per input. Parallel-capable
/// operations fan out across inputs with rayon, which is advisory only:
/// each input is processed independently and outcomes are collected in
/// input order either way.
pub struct Dispatcher<'a> {
    registry: &'a Registry,
    runner: &'a dyn ToolRunner,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a Registry, runner: &'a dyn ToolRunner) -> Self {
        Self { registry, runner }
    }

    /// Run the requested operation over every input.
    ///
    /// # Errors
    ///
    /// Fails with [`FslxError::UnknownOperation`],
    /// [`FslxError::TargetDirectoryMissing`], or
    /// [`FslxError::MissingInput`] before any action executes. Per-input
    /// failures are reported through the returned [`RunSummary`] instead.
    pub fn dispatch(&self, request: &InvocationRequest) -> FslxResult<RunSummary> {
        let operation = self.registry.get(&request.operation)?;

        if let Some(dir) = request.target_dir.as_deref() {
            if !dir.is_dir() {
                return Err(FslxError::TargetDirectoryMissing {
                    path: dir.to_path_buf(),
                });
            }
        }
        validate_inputs(request.inputs.iter().map(PathBuf::as_path))?;

        let outcomes = if operation.is_parallel_capable() && request.inputs.len() > 1 {
            request
                .inputs
                .par_iter()
                .map(|input| self.process(operation, request, input))
                .collect()
        } else {
            request
                .inputs
                .iter()
                .map(|input| self.process(operation, request, input))
                .collect()
        };
        Ok(RunSummary { outcomes })
    }

    fn process(
        &self,
        operation: &Operation,
        request: &InvocationRequest,
        input: &Path,
    ) -> InputOutcome {
        let result = self.process_one(operation, request, input);
        InputOutcome {
            input: input.to_path_buf(),
            result,
        }
    }

    fn process_one(
        &self,
        operation: &Operation,
        request: &InvocationRequest,
        input: &Path,
    ) -> FslxResult<Success> {
        let output = operation
            .output_suffix()
            .map(|suffix| derive_output_path(input, suffix, request.target_dir.as_deref()));
        let note = operation
            .action()
            .run(self.runner, input, request.extra, output.as_deref())?;
        // Only delete the input once its own action has reported success.
        if request.in_place {
            fs::remove_file(input)?;
        }
        Ok(Success { output, note })
    }
}
