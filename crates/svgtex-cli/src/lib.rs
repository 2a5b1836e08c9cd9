//! CLI logic for the svgtex tool.
//!
//! This module contains the core CLI logic: resolving where each input is
//! written, and rendering or cleaning every input in turn until done or
//! interrupted.

pub mod config;
pub mod error_adapter;

mod args;

pub use args::Args;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{error, info, warn};

use svgtex::{SvgTex, SvgTexError, options::Options, renderer::CancelHandle};

use config::ConfigSearch;

/// Run the svgtex CLI application
///
/// Every input document is rendered (or cleaned, with `--clean`) and written
/// to its output path. Processing stops at the first failing document, and
/// when `cancel` fires: the running tool is killed and no further document is
/// written.
///
/// # Errors
///
/// Returns `SvgTexError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Several inputs with an output that is not a directory
/// - Unreadable documents, or documents without a usable `width`
/// - Text that cannot be placed or typeset
/// - Interruption through `cancel`
pub fn run(args: &Args, cancel: &CancelHandle) -> Result<(), SvgTexError> {
    let targets = output_targets(&args.inputs, args.output.as_deref())?;

    let app_config = ConfigSearch::for_run(args.config.as_deref(), &args.inputs).load()?;
    let svgtex = SvgTex::with_cancel_handle(app_config, cancel.clone());
    let options = args.options();

    for (index, (input, output)) in targets.iter().enumerate() {
        if cancel.is_cancelled() {
            warn!(remaining = targets.len() - index; "Interrupted, leaving remaining documents untouched");
            return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted").into());
        }
        process(&svgtex, args.clean, &options, input, output).inspect_err(|_| {
            error!(input_path = input.display().to_string(); "Failed to process document");
        })?;
    }

    Ok(())
}

fn process(
    svgtex: &SvgTex,
    clean: bool,
    options: &Options,
    input: &Path,
    output: &Path,
) -> Result<(), SvgTexError> {
    info!(
        input_path = input.display().to_string(),
        output_path = output.display().to_string();
        "Processing document"
    );

    let source = fs::read_to_string(input)?;

    let svg = if clean {
        let (svg, removed) = svgtex.clean(&source)?;
        info!(removed; "Renderings removed");
        svg
    } else {
        let (svg, summary) = svgtex.render(&source, options)?;
        info!(
            rendered = summary.rendered(),
            skipped = summary.skipped();
            "Text rendered"
        );
        svg
    };

    fs::write(output, svg)?;

    info!(output_file = output.display().to_string(); "SVG written successfully");
    Ok(())
}

/// Pairs every input with the path its result is written to.
///
/// Without an output every input is overwritten. An output directory
/// receives each result under its input's file name. A single input may
/// also be written to an output file.
fn output_targets(
    inputs: &[PathBuf],
    output: Option<&Path>,
) -> Result<Vec<(PathBuf, PathBuf)>, SvgTexError> {
    let Some(output) = output else {
        return Ok(inputs.iter().map(|input| (input.clone(), input.clone())).collect());
    };

    if output.is_dir() {
        return inputs
            .iter()
            .map(|input| {
                let name = input.file_name().ok_or_else(|| {
                    SvgTexError::Config(format!("`{}` is not a file", input.display()))
                })?;
                Ok((input.clone(), output.join(name)))
            })
            .collect();
    }

    match inputs {
        [input] => Ok(vec![(input.clone(), output.to_path_buf())]),
        _ => Err(SvgTexError::Config(format!(
            "{} inputs need an output directory, but `{}` is not one",
            inputs.len(),
            output.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_in_place() {
        let inputs = [PathBuf::from("a.svg"), PathBuf::from("b.svg")];
        let targets = output_targets(&inputs, None).expect("valid targets");
        assert_eq!(targets[1], (PathBuf::from("b.svg"), PathBuf::from("b.svg")));
    }

    #[test]
    fn test_output_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let inputs = [PathBuf::from("in/a.svg"), PathBuf::from("b.svg")];

        let targets = output_targets(&inputs, Some(dir.path())).expect("valid targets");

        assert_eq!(targets[0].1, dir.path().join("a.svg"));
        assert_eq!(targets[1].1, dir.path().join("b.svg"));
    }

    #[test]
    fn test_several_inputs_need_directory() {
        let inputs = [PathBuf::from("a.svg"), PathBuf::from("b.svg")];
        let err = output_targets(&inputs, Some(Path::new("/nonexistent/out.svg")))
            .expect_err("not a directory");
        assert!(matches!(err, SvgTexError::Config(_)));

        let targets = output_targets(&inputs[..1], Some(Path::new("/nonexistent/out.svg")))
            .expect("single input");
        assert_eq!(targets[0].1, PathBuf::from("/nonexistent/out.svg"));
    }
}
