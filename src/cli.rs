use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use fslx::{ENV_TARGET_DIR, FslxError, FslxResult, InvocationRequest, Registry};

const ABOUT: &str = "\
fslx is a dumb wrapper around some of fsltools. It exists so we don't have
to remember the arbitrary names of FSL tools, nor the inconsistent parameter
naming conventions of each of them. fslx also accepts multiple images as
input to perform the same operation on each of them.";

const AFTER_HELP: &str = "\
Global options must come before the operation name.

Example: fslx --in-place --target-directory out moco run1.nii.gz run2.nii.gz";

/// Build the command surface: the shared global options plus one
/// subcommand per registry entry, with the operation's extra argument (if
/// any) preceding the input file list.
pub fn build_command(registry: &Registry) -> Command {
    let mut command = Command::new("fslx")
        .version(env!("CARGO_PKG_VERSION"))
        .about(ABOUT)
        .after_help(AFTER_HELP)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("target-directory")
                .short('t')
                .long("target-directory")
                .value_name("DIR")
                .env(ENV_TARGET_DIR)
                .value_parser(value_parser!(PathBuf))
                .help("Store output files in this directory instead of next to the inputs"),
        )
        .arg(
            Arg::new("in-place")
                .short('i')
                .long("in-place")
                .action(ArgAction::SetTrue)
                .help("After successful execution, delete the inputs"),
        );

    for operation in registry.operations() {
        let mut subcommand = Command::new(operation.name()).about(operation.about());
        if let Some(extra) = operation.extra_argument() {
            subcommand = subcommand.arg(
                Arg::new(extra.name)
                    .value_name(extra.name.to_ascii_uppercase())
                    .required(true)
                    .value_parser(value_parser!(f64))
                    .help(extra.help),
            );
        }
        subcommand = subcommand.arg(
            Arg::new("inputfiles")
                .value_name("FILE")
                .num_args(1..)
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Input images to operate on"),
        );
        command = command.subcommand(subcommand);
    }
    command
}

/// Extract the parsed user intent from clap's matches.
///
/// # Errors
///
/// Fails with [`FslxError::UnknownOperation`] when the dispatch key has no
/// registry entry. Unreachable when the matches came from
/// [`build_command`] over the same registry, but checked anyway.
pub fn request_from_matches(
    registry: &Registry,
    matches: &ArgMatches,
) -> FslxResult<InvocationRequest> {
    let (name, submatches) = match matches.subcommand() {
        Some(pair) => pair,
        None => {
            return Err(FslxError::UnknownOperation {
                name: "<missing>".to_string(),
            });
        }
    };
    let operation = registry.get(name)?;

    let extra = operation
        .extra_argument()
        .and_then(|extra| submatches.get_one::<f64>(extra.name).copied());
    let inputs = submatches
        .get_many::<PathBuf>("inputfiles")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    Ok(InvocationRequest {
        operation: operation.name().to_string(),
        target_dir: matches.get_one::<PathBuf>("target-directory").cloned(),
        in_place: matches.get_flag("in-place"),
        inputs,
        extra,
    })
}
