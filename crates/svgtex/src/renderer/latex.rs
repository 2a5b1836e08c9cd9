//! [`ExternalRenderer`] backed by `pdflatex` and `pdf2svg`.

use std::{
    env::consts::EXE_SUFFIX,
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
    process::Command,
    time::Duration,
};

use log::{debug, info};
use tempfile::TempDir;

use svgtex_core::document::{Document, Element, Node};

use super::{
    ExternalRenderer, RenderError, RenderJob,
    process::{self, CancelHandle},
};
use crate::{config::RendererConfig, options::format_scale};

const TEX_FILE: &str = "tmp.tex";
const PDF_FILE: &str = "tmp.pdf";
const SVG_FILE: &str = "tmp.svg";

/// The operating system family, as far as locating and starting tools goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Other,
}

impl Platform {
    /// Returns the platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(windows) {
            Self::Windows
        } else {
            Self::Other
        }
    }

    /// Directory where the platform's TeX distribution installs its binaries
    /// when it is not on `PATH`.
    pub fn default_tex_bin_dir(self) -> Option<&'static Path> {
        match self {
            Self::MacOs => Some(Path::new("/Library/TeX/texbin")),
            Self::Windows | Self::Other => None,
        }
    }
}

/// Typesets content with `pdflatex` and converts the first page to SVG with
/// `pdf2svg`.
///
/// Each render works in a fresh temporary directory that is removed when the
/// render ends, successfully or not.
#[derive(Debug, Clone)]
pub struct LatexRenderer {
    latex: PathBuf,
    pdf2svg: PathBuf,
    work_dir: Option<PathBuf>,
    timeout: Duration,
    cancel: CancelHandle,
}

impl LatexRenderer {
    /// Creates a renderer for the platform this binary was built for.
    pub fn new(config: &RendererConfig) -> Self {
        Self::for_platform(config, Platform::current())
    }

    /// Creates a renderer locating its tools as `platform` would.
    ///
    /// Explicit tool paths win; otherwise tools are taken from the configured
    /// TeX bin directory, then the platform default directory, then `PATH`.
    pub fn for_platform(config: &RendererConfig, platform: Platform) -> Self {
        let bin_dir = config
            .tex_bin_dir()
            .map(PathBuf::as_path)
            .or_else(|| platform.default_tex_bin_dir());
        let locate = |explicit: Option<&PathBuf>, name: &str| {
            explicit.cloned().unwrap_or_else(|| match bin_dir {
                Some(dir) => dir.join(format!("{name}{EXE_SUFFIX}")),
                None => PathBuf::from(name),
            })
        };

        Self {
            latex: locate(config.latex(), "pdflatex"),
            pdf2svg: locate(config.pdf2svg(), "pdf2svg"),
            work_dir: config.work_dir().cloned(),
            timeout: config.timeout(),
            cancel: CancelHandle::new(),
        }
    }

    pub fn latex(&self) -> &Path {
        &self.latex
    }

    pub fn pdf2svg(&self) -> &Path {
        &self.pdf2svg
    }

    /// Replaces the cancellation flag with a shared one.
    pub fn with_cancel_handle(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns a handle that cancels the running and all later renders.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    fn run_tool(&self, command: &mut Command, expected: &Path) -> Result<(), RenderError> {
        let result = process::run(command, self.timeout, &self.cancel)?;
        if !result.status.success() {
            return Err(RenderError::CommandFailed {
                command: process::describe(command),
                status: result.status,
                output: result.output,
            });
        }
        if !expected.is_file() {
            return Err(RenderError::MissingOutput {
                command: process::describe(command),
                path: expected.to_path_buf(),
                output: result.output,
            });
        }
        Ok(())
    }
}

impl ExternalRenderer for LatexRenderer {
    fn render(&self, job: &RenderJob<'_>) -> Result<Element, RenderError> {
        let preamble = match job.preamble() {
            Some(path) => {
                debug!(path:? = path; "Loading preamble");
                fs::read_to_string(path).map_err(|source| RenderError::Preamble {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => String::new(),
        };

        let workdir = match &self.work_dir {
            Some(parent) => TempDir::new_in(parent)?,
            None => TempDir::new()?,
        };
        let dir = workdir.path();
        fs::write(dir.join(TEX_FILE), tex_source(job, &preamble))?;

        info!(fontsize = job.fontsize(); "Typesetting with pdflatex");
        self.run_tool(
            Command::new(&self.latex)
                .arg(TEX_FILE)
                .args(["-interaction=nonstopmode", "-halt-on-error"])
                .current_dir(dir),
            &dir.join(PDF_FILE),
        )?;

        self.run_tool(
            Command::new(&self.pdf2svg)
                .args([PDF_FILE, SVG_FILE, "1"])
                .current_dir(dir),
            &dir.join(SVG_FILE),
        )?;

        let svg = fs::read_to_string(dir.join(SVG_FILE))?;
        let artifact = into_group(Document::parse(&svg)?);
        debug!("Converted typeset page to SVG");
        Ok(artifact)
    }
}

/// Builds the LaTeX document typesetting `job`.
fn tex_source(job: &RenderJob<'_>, preamble: &str) -> String {
    let class = match job.fontsize() {
        10..=12 => "article",
        _ => "scrartcl",
    };
    let mut packages = String::new();
    for package in job.packages() {
        let _ = writeln!(packages, "\\usepackage{{{package}}}");
    }
    let scale = format_scale(job.scale());

    format!(
        "\\documentclass[{fontsize}pt]{{{class}}}\n\
         \\usepackage[a0paper]{{geometry}}\n\
         \\newlength\\tindent\n\
         \\setlength{{\\tindent}}{{\\parindent}}\n\
         \\setlength{{\\parindent}}{{0pt}}\n\
         \\renewcommand{{\\indent}}{{\\hspace*{{\\tindent}}}}\n\
         {preamble}\n\
         {packages}\
         \\pagestyle{{empty}}\n\
         \\AtBeginDocument{{\\pdfliteral {{ {scale} 0 0 {scale} 0 0 cm }}}}\n\
         \\begin{{document}}\n    \
         {content}\n\
         \\end{{document}}",
        fontsize = job.fontsize(),
        content = job.content(),
    )
}

/// Moves the children of the converted page into a new `g`.
fn into_group(mut page: Document) -> Element {
    let mut group = Element::new("g");
    group
        .children_mut()
        .extend(page.root_mut().take_children().into_iter().filter(|node| {
            !matches!(node, Node::Text(text) if text.trim().is_empty())
        }));
    group
}
