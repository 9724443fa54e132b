use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{FslxError, FslxResult};

/// Extensions that must be treated as one unit when inserting a suffix.
/// `img.nii.gz` derives to `img_mcf.nii.gz`, not `img.nii_mcf.gz`.
const COMPOUND_EXTENSIONS: [&str; 3] = ["nii.gz", "img.gz", "hdr.gz"];

/// Derive the output path for an input file by inserting `suffix` before
/// the extension.
///
/// With a target directory the input's directory component is replaced by
/// it; otherwise the output stays beside the input. Pure and deterministic:
/// the derived name is keyed off the input's own base name, so distinct
/// inputs in the same directory never collide.
pub fn derive_output_path(input: &Path, suffix: &str, target_dir: Option<&Path>) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (stem, extension) = split_image_extension(&file_name);
    let derived_name = if extension.is_empty() {
        format!("{stem}{suffix}")
    } else {
        format!("{stem}{suffix}.{extension}")
    };

    let directory = match target_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    directory.join(derived_name)
}

/// Split a file name into stem and extension, keeping compound imaging
/// extensions intact.
fn split_image_extension(file_name: &str) -> (&str, &str) {
    for extension in COMPOUND_EXTENSIONS {
        if let Some(stem) = file_name.strip_suffix(extension) {
            if let Some(stem) = stem.strip_suffix('.') {
                if !stem.is_empty() {
                    return (stem, extension);
                }
            }
        }
    }
    match file_name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => (stem, extension),
        _ => (file_name, ""),
    }
}

/// Check that every input refers to an existing, readable file.
///
/// # Errors
///
/// Fails with [`FslxError::MissingInput`] naming the first offending path.
/// Called before any operation executes so partial work is never attempted
/// against inputs that do not exist.
pub fn validate_inputs<'a, I>(paths: I) -> FslxResult<()>
where
    I: IntoIterator<Item = &'a Path>,
{
    for path in paths {
        if !path.is_file() {
            return Err(FslxError::MissingInput {
                path: path.to_path_buf(),
            });
        }
        File::open(path).map_err(|_| FslxError::MissingInput {
            path: path.to_path_buf(),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod derive_output_path {
        use super::*;
        use proptest::prelude::*;

        #[test]
        fn inserts_suffix_before_compound_extension() {
            let derived = derive_output_path(Path::new("/a/b/img.nii.gz"), "_hp", None);
            assert_eq!(derived, PathBuf::from("/a/b/img_hp.nii.gz"));
        }

        #[test]
        fn target_directory_replaces_input_directory() {
            let derived =
                derive_output_path(Path::new("/a/b/img.nii.gz"), "_hp", Some(Path::new("/out")));
            assert_eq!(derived, PathBuf::from("/out/img_hp.nii.gz"));
        }

        #[test]
        fn plain_extension_is_preserved() {
            let derived = derive_output_path(Path::new("scan.nii"), "_tmean", None);
            assert_eq!(derived, PathBuf::from("scan_tmean.nii"));
        }

        #[test]
        fn extensionless_input_just_gains_the_suffix() {
            let derived = derive_output_path(Path::new("/data/epi"), "_brain", None);
            assert_eq!(derived, PathBuf::from("/data/epi_brain"));
        }

        #[test]
        fn relative_input_without_directory_stays_relative() {
            let derived = derive_output_path(Path::new("img.nii.gz"), "_bin", None);
            assert_eq!(derived, PathBuf::from("img_bin.nii.gz"));
        }

        #[test]
        fn distinct_basenames_never_collide() {
            let out = Path::new("/out");
            let a = derive_output_path(Path::new("/x/run1.nii.gz"), "_mcf", Some(out));
            let b = derive_output_path(Path::new("/x/run2.nii.gz"), "_mcf", Some(out));
            assert_ne!(a, b);
        }

        proptest! {
            #[test]
            fn deterministic_for_any_basename(
                stem in "[a-zA-Z0-9_]{1,16}",
                suffix in "_[a-z]{1,8}",
            ) {
                let input = PathBuf::from(format!("/data/{stem}.nii.gz"));
                let first = derive_output_path(&input, &suffix, Some(Path::new("/out")));
                let second = derive_output_path(&input, &suffix, Some(Path::new("/out")));
                prop_assert_eq!(&first, &second);
                prop_assert_eq!(first, PathBuf::from(format!("/out/{stem}{suffix}.nii.gz")));
            }
        }
    }

    mod validate_inputs {
        use super::*;

        #[test]
        fn accepts_existing_files() {
            let dir = tempfile::tempdir().unwrap();
            let file = dir.path().join("scan.nii.gz");
            std::fs::write(&file, b"data").unwrap();
            assert!(validate_inputs([file.as_path()]).is_ok());
        }

        #[test]
        fn names_the_first_missing_path() {
            let dir = tempfile::tempdir().unwrap();
            let present = dir.path().join("exists.img");
            std::fs::write(&present, b"data").unwrap();
            let absent = dir.path().join("missing.img");

            let result = validate_inputs([present.as_path(), absent.as_path()]);
            match result {
                Err(FslxError::MissingInput { path }) => assert_eq!(path, absent),
                other => panic!("expected MissingInput, got {other:?}"),
            }
        }

        #[test]
        fn rejects_directories() {
            let dir = tempfile::tempdir().unwrap();
            let result = validate_inputs([dir.path()]);
            assert!(matches!(result, Err(FslxError::MissingInput { .. })));
        }
    }
}
