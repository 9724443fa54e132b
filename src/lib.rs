pub mod dispatch;
pub mod error;
pub mod ops;
pub mod paths;
pub mod registry;
pub mod runner;

pub use dispatch::{Dispatcher, InputOutcome, InvocationRequest, RunSummary, Success};
pub use error::{FslxError, FslxResult};
pub use ops::{Action, read_timing_parameter};
pub use paths::{derive_output_path, validate_inputs};
pub use registry::{ExtraArgument, Operation, Registry};
pub use runner::{SystemRunner, ToolOutput, ToolRunner};

/// Environment variable consulted for the default target directory.
pub const ENV_TARGET_DIR: &str = "FSLX_TARGET_DIR";
