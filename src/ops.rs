use std::ffi::OsString;
use std::path::Path;

use crate::error::{FslxError, FslxResult};
use crate::runner::ToolRunner;

/// The external call backing a registered operation.
///
/// A fixed tagged variant per operation replaces the usual grab-bag of
/// ad-hoc wrapper scripts: every variant takes the same contract (input
/// path, optional extra argument, optional output path) and builds the
/// argv for the underlying FSL binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// `fslnvols`: print the number of volumes in a 4D image.
    VolumeCount,
    /// `mcflirt`: motion-correct a 4D image.
    MotionCorrect,
    /// `fslmaths -Tmean`: collapse a 4D image to its temporal mean.
    TemporalMean,
    /// `fslmaths -Tstd`: collapse a 4D image to its temporal standard deviation.
    TemporalStd,
    /// `bet`: skull-strip an image.
    BrainExtract,
    /// `fslmaths -bin`: binarise an image.
    Binarize,
    /// `fslmaths -s`: gaussian-smooth an image with the given sigma.
    Smooth,
    /// `fslmaths -bptf`: temporal high-pass filter with the given cutoff
    /// in seconds, converted to volumes using the repetition time from
    /// the input's header.
    HighpassFilter,
}

impl Action {
    /// Execute the action against one input, blocking until the external
    /// tool exits. Returns a line worth reporting to the user, if any.
    ///
    /// # Errors
    ///
    /// Propagates runner errors, plus [`FslxError::InvalidOperation`] when
    /// the registry metadata promised an extra argument or output path that
    /// the dispatcher did not supply.
    pub fn run(
        self,
        runner: &dyn ToolRunner,
        input: &Path,
        extra: Option<f64>,
        output: Option<&Path>,
    ) -> FslxResult<Option<String>> {
        match self {
            Self::VolumeCount => {
                let out = runner.run(&[os("fslnvols"), os_path(input)])?;
                Ok(Some(out.stdout.trim().to_string()))
            }
            Self::MotionCorrect => {
                let output = required_output(output)?;
                runner.run(&[
                    os("mcflirt"),
                    os("-in"),
                    os_path(input),
                    os("-out"),
                    os_path(output),
                ])?;
                Ok(None)
            }
            Self::TemporalMean => run_fslmaths(runner, input, &[os("-Tmean")], output),
            Self::TemporalStd => run_fslmaths(runner, input, &[os("-Tstd")], output),
            Self::BrainExtract => {
                let output = required_output(output)?;
                runner.run(&[os("bet"), os_path(input), os_path(output)])?;
                Ok(None)
            }
            Self::Binarize => run_fslmaths(runner, input, &[os("-bin")], output),
            Self::Smooth => {
                let sigma = required_extra(extra, "sigma")?;
                run_fslmaths(runner, input, &[os("-s"), os_num(sigma)], output)
            }
            Self::HighpassFilter => {
                let cutoff = required_extra(extra, "cutoff")?;
                let repetition_time = read_timing_parameter(runner, input)?;
                // fslmaths expects the cutoff as a gaussian sigma in volumes.
                let sigma_volumes = cutoff / (2.0 * repetition_time);
                run_fslmaths(
                    runner,
                    input,
                    &[os("-bptf"), os_num(sigma_volumes), os("-1")],
                    output,
                )
            }
        }
    }
}

/// Read the repetition time (seconds) from an image header via `fslval`.
///
/// # Errors
///
/// Fails with [`FslxError::UnparsableToolOutput`] when `fslval` prints
/// something non-numeric, and [`FslxError::MissingTimingParameter`] when
/// the header field is absent or zero (a 3D image has no timing axis).
pub fn read_timing_parameter(runner: &dyn ToolRunner, path: &Path) -> FslxResult<f64> {
    let out = runner.run(&[os("fslval"), os_path(path), os("pixdim4")])?;
    let text = out.stdout.trim();
    let repetition_time: f64 = text.parse().map_err(|_| FslxError::UnparsableToolOutput {
        tool: "fslval".to_string(),
        output: text.to_string(),
    })?;
    if repetition_time <= 0.0 {
        return Err(FslxError::MissingTimingParameter {
            path: path.to_path_buf(),
        });
    }
    Ok(repetition_time)
}

fn run_fslmaths(
    runner: &dyn ToolRunner,
    input: &Path,
    operators: &[OsString],
    output: Option<&Path>,
) -> FslxResult<Option<String>> {
    let output = required_output(output)?;
    let mut argv = vec![os("fslmaths"), os_path(input)];
    argv.extend_from_slice(operators);
    argv.push(os_path(output));
    runner.run(&argv)?;
    Ok(None)
}

fn required_output(output: Option<&Path>) -> FslxResult<&Path> {
    output.ok_or_else(|| FslxError::InvalidOperation {
        detail: "no output path for an operation that writes one".to_string(),
    })
}

fn required_extra(extra: Option<f64>, name: &str) -> FslxResult<f64> {
    extra.ok_or_else(|| FslxError::InvalidOperation {
        detail: format!("missing required argument `{name}`"),
    })
}

fn os(text: &str) -> OsString {
    OsString::from(text)
}

fn os_path(path: &Path) -> OsString {
    path.as_os_str().to_os_string()
}

fn os_num(value: f64) -> OsString {
    OsString::from(format!("{value}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::fake::FakeRunner;

    #[test]
    fn volume_count_reports_trimmed_stdout() {
        let runner = FakeRunner::printing("158\n");
        let note = Action::VolumeCount
            .run(&runner, Path::new("epi.nii.gz"), None, None)
            .unwrap();
        assert_eq!(note.as_deref(), Some("158"));
        assert_eq!(runner.calls(), vec![vec!["fslnvols", "epi.nii.gz"]]);
    }

    #[test]
    fn motion_correct_names_input_and_output() {
        let runner = FakeRunner::succeeding();
        Action::MotionCorrect
            .run(
                &runner,
                Path::new("run.nii.gz"),
                None,
                Some(Path::new("run_mcf.nii.gz")),
            )
            .unwrap();
        assert_eq!(
            runner.calls(),
            vec![vec!["mcflirt", "-in", "run.nii.gz", "-out", "run_mcf.nii.gz"]],
        );
    }

    #[test]
    fn smooth_forwards_the_sigma() {
        let runner = FakeRunner::succeeding();
        Action::Smooth
            .run(
                &runner,
                Path::new("t1.nii"),
                Some(2.5),
                Some(Path::new("t1_smooth.nii")),
            )
            .unwrap();
        assert_eq!(
            runner.calls(),
            vec![vec!["fslmaths", "t1.nii", "-s", "2.5", "t1_smooth.nii"]],
        );
    }

    #[test]
    fn smooth_without_sigma_is_a_misconfiguration() {
        let runner = FakeRunner::succeeding();
        let result = Action::Smooth.run(
            &runner,
            Path::new("t1.nii"),
            None,
            Some(Path::new("t1_smooth.nii")),
        );
        assert!(matches!(result, Err(FslxError::InvalidOperation { .. })));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn highpass_converts_cutoff_seconds_to_sigma_volumes() {
        let runner = FakeRunner::scripted(|argv| {
            if argv.first().map(String::as_str) == Some("fslval") {
                "2.0\n".to_string()
            } else {
                String::new()
            }
        });
        Action::HighpassFilter
            .run(
                &runner,
                Path::new("bold.nii.gz"),
                Some(100.0),
                Some(Path::new("bold_hp.nii.gz")),
            )
            .unwrap();
        let calls = runner.calls();
        assert_eq!(calls[0], vec!["fslval", "bold.nii.gz", "pixdim4"]);
        assert_eq!(
            calls[1],
            vec!["fslmaths", "bold.nii.gz", "-bptf", "25", "-1", "bold_hp.nii.gz"],
        );
    }

    mod read_timing_parameter {
        use super::*;

        #[test]
        fn parses_the_header_field() {
            let runner = FakeRunner::printing("0.720000\n");
            let tr = read_timing_parameter(&runner, Path::new("bold.nii.gz")).unwrap();
            assert!((tr - 0.72).abs() < 1e-9);
        }

        #[test]
        fn garbage_output_is_rejected() {
            let runner = FakeRunner::printing("not-a-number\n");
            let result = read_timing_parameter(&runner, Path::new("bold.nii.gz"));
            assert!(matches!(
                result,
                Err(FslxError::UnparsableToolOutput { .. })
            ));
        }

        #[test]
        fn zero_repetition_time_means_no_timing_axis() {
            let runner = FakeRunner::printing("0.000000\n");
            let result = read_timing_parameter(&runner, Path::new("t1.nii.gz"));
            assert!(matches!(
                result,
                Err(FslxError::MissingTimingParameter { .. })
            ));
        }
    }
}
