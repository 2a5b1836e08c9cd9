use std::{fs, io, path::PathBuf};

use tempfile::tempdir;

use svgtex::{SvgTexError, document::Document, layer::LAYER_ID, renderer::CancelHandle};
use svgtex_cli::Args;

/// A drawing with shapes but no text, so rendering never invokes LaTeX.
const DRAWING: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<svg xmlns="http://www.w3.org/2000/svg" width="100mm" height="50mm" viewBox="0 0 100 50">
  <rect id="rect1" x="10" y="10" width="20" height="20"/>
</svg>
"#;

/// A drawing whose render layer still holds two artifacts.
const RENDERED: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:rendltx="http://NOTSET" width="100mm">
  <g id="ltx-render-layer" rendltx:fontsize="12">
    <g id="lx-text1"><path d="M 0 0"/></g>
    <g id="lx-text2"><path d="M 1 1"/></g>
  </g>
</svg>
"#;

fn cli_args(inputs: Vec<PathBuf>, output: Option<PathBuf>) -> Args {
    Args {
        inputs,
        output,
        preamble: None,
        packages: None,
        fontsize: None,
        scale: None,
        depth: None,
        newline: false,
        math: false,
        clean: false,
        config: None,
        log_level: "off".to_string(),
        verbose: false,
    }
}

fn run(args: &Args) -> Result<(), SvgTexError> {
    svgtex_cli::run(args, &CancelHandle::new())
}

fn read(path: &PathBuf) -> Document {
    let source = fs::read_to_string(path).expect("Failed to read output");
    Document::parse(&source).expect("Output is valid XML")
}

#[test]
fn e2e_render_creates_layer() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("drawing.svg");
    fs::write(&input, DRAWING).expect("Failed to write input");

    let mut args = cli_args(vec![input.clone()], None);
    args.fontsize = Some(12);
    run(&args).expect("Render succeeds without text");

    let document = read(&input);
    let layer = document.root().find_by_id(LAYER_ID).expect("layer created");
    assert_eq!(layer.attribute("rendltx:fontsize"), Some("12"));
    assert!(document.root().find_by_id("rect1").is_some());

    // A second run with no flags keeps the remembered font size.
    let first = fs::read_to_string(&input).expect("Failed to read output");
    run(&cli_args(vec![input.clone()], None)).expect("Rerun succeeds");
    let second = fs::read_to_string(&input).expect("Failed to read output");
    assert_eq!(first, second);
}

#[test]
fn e2e_clean_removes_artifacts() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("rendered.svg");
    let output = temp_dir.path().join("cleaned.svg");
    fs::write(&input, RENDERED).expect("Failed to write input");

    let mut args = cli_args(vec![input.clone()], Some(output.clone()));
    args.clean = true;
    run(&args).expect("Clean succeeds");

    let document = read(&output);
    let layer = document.root().find_by_id(LAYER_ID).expect("layer kept");
    assert_eq!(layer.child_elements().count(), 0);
    assert_eq!(layer.attribute("rendltx:fontsize"), Some("12"));

    // The input is untouched when an output is given.
    assert_eq!(fs::read_to_string(&input).expect("input"), RENDERED);
}

#[test]
fn e2e_output_directory() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("out");
    fs::create_dir(&out_dir).expect("Failed to create output directory");

    let inputs: Vec<PathBuf> = ["a.svg", "b.svg"]
        .iter()
        .map(|name| temp_dir.path().join(name))
        .collect();
    for input in &inputs {
        fs::write(input, DRAWING).expect("Failed to write input");
    }

    run(&cli_args(inputs.clone(), Some(out_dir.clone()))).expect("Render succeeds");

    for name in ["a.svg", "b.svg"] {
        let document = read(&out_dir.join(name));
        assert!(document.root().find_by_id(LAYER_ID).is_some());
    }
    for input in &inputs {
        assert_eq!(fs::read_to_string(input).expect("input"), DRAWING);
    }
}

#[test]
fn e2e_several_inputs_need_directory() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let inputs = vec![
        temp_dir.path().join("a.svg"),
        temp_dir.path().join("b.svg"),
    ];
    let output = temp_dir.path().join("out.svg");

    let err = run(&cli_args(inputs, Some(output.clone()))).expect_err("Output is not a directory");
    assert!(matches!(err, SvgTexError::Config(_)));
    assert!(!output.exists());
}

#[test]
fn e2e_missing_input() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("missing.svg");

    let err = run(&cli_args(vec![input], None)).expect_err("Input does not exist");
    assert!(matches!(err, SvgTexError::Io(_)));
}

#[test]
fn e2e_missing_width() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("bare.svg");
    let source = r#"<svg xmlns="http://www.w3.org/2000/svg"><rect/></svg>"#;
    fs::write(&input, source).expect("Failed to write input");

    let err = run(&cli_args(vec![input.clone()], None)).expect_err("Width is required");
    assert!(matches!(err, SvgTexError::Structural { .. }));
    assert_eq!(fs::read_to_string(&input).expect("input"), source);
}

#[test]
fn e2e_interrupted_run_writes_nothing() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("out");
    fs::create_dir(&out_dir).expect("Failed to create output directory");
    let input = temp_dir.path().join("a.svg");
    fs::write(&input, DRAWING).expect("Failed to write input");

    let cancel = CancelHandle::new();
    cancel.cancel();
    let err = svgtex_cli::run(&cli_args(vec![input], Some(out_dir.clone())), &cancel)
        .expect_err("Run is interrupted");

    assert!(matches!(err, SvgTexError::Io(ref err) if err.kind() == io::ErrorKind::Interrupted));
    assert!(!out_dir.join("a.svg").exists());
}

#[test]
fn e2e_config_next_to_drawings() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("drawing.svg");
    fs::write(&input, DRAWING).expect("Failed to write input");
    fs::write(temp_dir.path().join(".svgtex.toml"), "[defaults]\nfontsize = 14\n")
        .expect("Failed to write config");

    run(&cli_args(vec![input.clone()], None)).expect("Render succeeds without text");

    let document = read(&input);
    let layer = document.root().find_by_id(LAYER_ID).expect("layer created");
    assert_eq!(layer.attribute("rendltx:fontsize"), Some("14"));
}
