use crate::error::{FslxError, FslxResult};
use crate::ops::Action;

/// A named, registered unit of work mapping to one external FSL action.
///
/// Created once at startup and immutable afterwards; owned exclusively by
/// the [`Registry`].
#[derive(Debug, Clone)]
pub struct Operation {
    name: &'static str,
    about: &'static str,
    action: Action,
    extra_argument: Option<ExtraArgument>,
    output_suffix: Option<&'static str>,
    pipe_capable: bool,
    parallel_capable: bool,
}

/// The single additional positional parameter an operation may require.
#[derive(Debug, Clone, Copy)]
pub struct ExtraArgument {
    pub name: &'static str,
    pub help: &'static str,
}

impl Operation {
    /// Create an operation with no extra argument, no output file, and
    /// both capability flags off.
    pub fn new(name: &'static str, about: &'static str, action: Action) -> Self {
        Self {
            name,
            about,
            action,
            extra_argument: None,
            output_suffix: None,
            pipe_capable: false,
            parallel_capable: false,
        }
    }

    /// Require one additional numeric positional parameter.
    pub fn with_extra_argument(mut self, name: &'static str, help: &'static str) -> Self {
        self.extra_argument = Some(ExtraArgument { name, help });
        self
    }

    /// Derive an output file per input by inserting this suffix before
    /// the extension.
    pub fn with_output_suffix(mut self, suffix: &'static str) -> Self {
        self.output_suffix = Some(suffix);
        self
    }

    /// Mark the operation's output as usable as another operation's input.
    pub fn allow_pipe(mut self) -> Self {
        self.pipe_capable = true;
        self
    }

    /// Mark the operation as safe to apply to many inputs with no ordering
    /// dependency between them.
    pub fn allow_parallel(mut self) -> Self {
        self.parallel_capable = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn about(&self) -> &'static str {
        self.about
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn extra_argument(&self) -> Option<&ExtraArgument> {
        self.extra_argument.as_ref()
    }

    pub fn output_suffix(&self) -> Option<&'static str> {
        self.output_suffix
    }

    pub fn is_pipe_capable(&self) -> bool {
        self.pipe_capable
    }

    pub fn is_parallel_capable(&self) -> bool {
        self.parallel_capable
    }
}

/// Append-only, insertion-ordered mapping from operation name to
/// [`Operation`].
///
/// Built explicitly at startup and handed to the parser and dispatcher, so
/// tests can substitute their own set of operations. Read-only once
/// argument parsing begins.
#[derive(Debug, Default)]
pub struct Registry {
    operations: Vec<Operation>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard FSLX operation set.
    pub fn builtin() -> Self {
        Self {
            operations: vec![
                Operation::new(
                    "nvols",
                    "Print the number of volumes in a 4D image (1 for 3D)",
                    Action::VolumeCount,
                ),
                Operation::new(
                    "moco",
                    "Motion-correct a 4D image with mcflirt",
                    Action::MotionCorrect,
                )
                .with_output_suffix("_mcf")
                .allow_pipe()
                .allow_parallel(),
                Operation::new(
                    "tmean",
                    "Collapse a 4D image to its temporal mean",
                    Action::TemporalMean,
                )
                .with_output_suffix("_tmean")
                .allow_pipe()
                .allow_parallel(),
                Operation::new(
                    "tstd",
                    "Collapse a 4D image to its temporal standard deviation",
                    Action::TemporalStd,
                )
                .with_output_suffix("_tstd")
                .allow_pipe()
                .allow_parallel(),
                Operation::new("bet", "Skull-strip an image with bet", Action::BrainExtract)
                    .with_output_suffix("_brain")
                    .allow_pipe()
                    .allow_parallel(),
                Operation::new("bin", "Binarise an image", Action::Binarize)
                    .with_output_suffix("_bin")
                    .allow_pipe()
                    .allow_parallel(),
                Operation::new("smooth", "Gaussian-smooth an image", Action::Smooth)
                    .with_extra_argument("sigma", "Smoothing kernel sigma in millimetres")
                    .with_output_suffix("_smooth")
                    .allow_pipe()
                    .allow_parallel(),
                Operation::new(
                    "highpass",
                    "Temporal high-pass filter using the repetition time from the header",
                    Action::HighpassFilter,
                )
                .with_extra_argument("cutoff", "High-pass cutoff in seconds")
                .with_output_suffix("_hp")
                .allow_pipe()
                .allow_parallel(),
            ],
        }
    }

    /// Register an operation under its name.
    ///
    /// # Errors
    ///
    /// Fails with [`FslxError::DuplicateOperation`] when the name is
    /// already taken. There is no removal: the registry is append-only
    /// and fixed once startup completes.
    pub fn register(&mut self, operation: Operation) -> FslxResult<()> {
        if self.operations.iter().any(|op| op.name == operation.name) {
            return Err(FslxError::DuplicateOperation {
                name: operation.name.to_string(),
            });
        }
        self.operations.push(operation);
        Ok(())
    }

    /// Look up an operation by name.
    ///
    /// # Errors
    ///
    /// Fails with [`FslxError::UnknownOperation`] when absent.
    pub fn get(&self, name: &str) -> FslxResult<&Operation> {
        self.operations
            .iter()
            .find(|op| op.name == name)
            .ok_or_else(|| FslxError::UnknownOperation {
                name: name.to_string(),
            })
    }

    /// Iterate over registered operations in insertion order. The parser
    /// builds its subcommand list from this.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
