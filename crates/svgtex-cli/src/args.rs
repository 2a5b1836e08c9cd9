//! Command-line argument definitions for the svgtex CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Render flags that are not given stay unset, so the values
//! remembered in each document apply.

use std::path::PathBuf;

use clap::Parser;

use svgtex::options::Options;

/// Render the text of SVG documents with LaTeX
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// SVG files to process
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Output file, or directory when several inputs are given [default: overwrite the input]
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// LaTeX file included before the document body
    #[arg(short, long, value_name = "FILE")]
    pub preamble: Option<PathBuf>,

    /// LaTeX packages to load, separated by commas or spaces
    #[arg(long, value_name = "LIST")]
    pub packages: Option<String>,

    /// Font size in points
    #[arg(short, long)]
    pub fontsize: Option<u32>,

    /// Scale of the typeset output
    #[arg(short, long)]
    pub scale: Option<f64>,

    /// Only render text at most this many groups deep (0 renders all)
    #[arg(short, long)]
    pub depth: Option<u32>,

    /// Break lines between text runs with `\\`
    #[arg(short, long)]
    pub newline: bool,

    /// Typeset all text in math mode
    #[arg(short, long)]
    pub math: bool,

    /// Remove all renderings instead of rendering
    #[arg(short, long)]
    pub clean: bool,

    /// Path to configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log at debug level, overriding --log-level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Returns the render options given on the command line.
    pub fn options(&self) -> Options {
        let mut options = Options::new();
        if let Some(preamble) = &self.preamble {
            options = options.with_preamble(preamble);
        }
        if let Some(packages) = &self.packages {
            options = options.with_packages(packages);
        }
        if let Some(fontsize) = self.fontsize {
            options = options.with_fontsize(fontsize);
        }
        if let Some(scale) = self.scale {
            options = options.with_scale(scale);
        }
        if let Some(depth) = self.depth {
            options = options.with_depth(depth);
        }
        if self.newline {
            options = options.with_newline(true);
        }
        if self.math {
            options = options.with_math(true);
        }
        options
    }

    /// Returns the effective log level.
    pub fn log_level(&self) -> &str {
        if self.verbose { "debug" } else { &self.log_level }
    }
}
