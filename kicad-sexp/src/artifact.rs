//! Reading, writing and verifying generated library files.
//!
//! Generators build a tree per part and hand it to a [`Checker`], which either
//! rewrites the file on disk when it is out of date ([`Mode::Write`]) or only
//! reports whether it is ([`Mode::Verify`]). Both sides are compared as parsed
//! trees, skipping volatile children such as `tedit`, so a file is never
//! rewritten just because its edit stamp moved on.
use log::{debug, error, info, warn};
use std::fmt::{self, Display};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::compare::first_mismatch;
use crate::node::Node;
use crate::parser::{parse, ParseError, ParseOptions};
use crate::printer::{to_string_at, GenerateError, Print, Style};

/// An error concerning one file.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}:{line}:{column}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        #[source]
        source: ParseError,
    },
    #[error("{}: {source}", .path.display())]
    Generate {
        path: PathBuf,
        #[source]
        source: GenerateError,
    },
}

impl ArtifactError {
    /// The file the error is about.
    pub fn path(&self) -> &Path {
        match self {
            ArtifactError::Io { path, .. }
            | ArtifactError::Parse { path, .. }
            | ArtifactError::Generate { path, .. } => path,
        }
    }

    fn io(path: &Path, source: io::Error) -> Self {
        ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn generate(path: &Path, source: GenerateError) -> Self {
        ArtifactError::Generate {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Shorthand for a result specialised to artifact errors.
pub type Result<T, E = ArtifactError> = std::result::Result<T, E>;

fn parse_text(path: &Path, source: &str, options: &ParseOptions) -> Result<Node> {
    parse(source, options).map_err(|source_error| {
        let (line, column) = source_error.location(source);
        ArtifactError::Parse {
            path: path.to_path_buf(),
            line,
            column,
            source: source_error,
        }
    })
}

/// Reads and parses the file at `path`.
pub fn read(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Node> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|err| ArtifactError::io(path, err))?;
    parse_text(path, &source, options)
}

/// Prints `value` and writes it to `path`.
pub fn write<T: Print>(path: impl AsRef<Path>, value: T, style: &Style) -> Result<()> {
    let path = path.as_ref();
    let text = to_string_at(value, 0, style).map_err(|err| ArtifactError::generate(path, err))?;
    fs::write(path, text).map_err(|err| ArtifactError::io(path, err))
}

/// The `(tedit HEX)` edit stamp of a footprint, in upper-case hexadecimal
/// seconds since the Unix epoch.
pub fn tedit(time: SystemTime) -> Node {
    let seconds = time
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs());
    crate::list!["tedit", format!("{:X}", seconds)]
}

/// How a file on disk relates to freshly generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    UpToDate,
    Stale,
    Missing,
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::UpToDate => f.write_str("up to date"),
            Status::Stale => f.write_str("stale"),
            Status::Missing => f.write_str("missing"),
        }
    }
}

/// Whether out of date files are rewritten or only reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Write,
    Verify,
}

/// The result of syncing one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Status of the file before anything was written.
    pub status: Status,
    pub written: bool,
}

/// Compares generated content against files on disk.
///
/// Children matching the `ignore` predicate are skipped at any depth when
/// comparing.
#[derive(Debug, Clone)]
pub struct Checker<F> {
    parse: ParseOptions,
    style: Style,
    ignore: F,
}

impl<F> Checker<F>
where
    F: Fn(&Node) -> bool,
{
    pub fn new(ignore: F) -> Self {
        Self {
            parse: ParseOptions::default(),
            style: Style::default(),
            ignore,
        }
    }

    /// Options used to parse both the file on disk and the generated text.
    pub fn parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Checks whether the file at `path` matches `value`.
    pub fn check<T: Print>(&self, path: impl AsRef<Path>, value: T) -> Result<Status> {
        let path = path.as_ref();
        let text = self.generate(path, value)?;
        self.status(path, &text)
    }

    /// Checks the file at `path` and, in [`Mode::Write`], rewrites it unless
    /// it is up to date.
    pub fn sync<T: Print>(&self, path: impl AsRef<Path>, value: T, mode: Mode) -> Result<Outcome> {
        let path = path.as_ref();
        let text = self.generate(path, value)?;
        let status = self.status(path, &text)?;
        let written = mode == Mode::Write && status != Status::UpToDate;

        if written {
            fs::write(path, &text).map_err(|err| ArtifactError::io(path, err))?;
            info!("wrote {} ({})", path.display(), status);
        } else if status != Status::UpToDate {
            warn!("{} is {}", path.display(), status);
        }

        Ok(Outcome { status, written })
    }

    /// Syncs every `(path, value)` pair in turn.
    ///
    /// A failure is recorded against its file and does not stop the files
    /// after it from being processed.
    pub fn run<I, P, T>(&self, items: I, mode: Mode) -> Report
    where
        I: IntoIterator<Item = (P, T)>,
        P: Into<PathBuf>,
        T: Print,
    {
        let mut report = Report::default();
        for (path, value) in items {
            let path = path.into();
            match self.sync(&path, value, mode) {
                Ok(outcome) => report.record(path, outcome),
                Err(err) => {
                    error!("{}", err);
                    report.failed.push(err);
                }
            }
        }
        report
    }

    fn generate<T: Print>(&self, path: &Path, value: T) -> Result<String> {
        to_string_at(value, 0, &self.style).map_err(|err| ArtifactError::generate(path, err))
    }

    fn status(&self, path: &Path, text: &str) -> Result<Status> {
        debug!("verifying {}", path.display());

        let old = match fs::read_to_string(path) {
            Ok(old) => old,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Status::Missing),
            Err(err) => return Err(ArtifactError::io(path, err)),
        };

        let old = parse_text(path, &old, &self.parse)?;
        let new = parse_text(path, text, &self.parse)?;

        match first_mismatch(&old, &new, &self.ignore) {
            None => Ok(Status::UpToDate),
            Some(at) => {
                debug!("{} differs at child path {:?}", path.display(), at);
                Ok(Status::Stale)
            }
        }
    }
}

/// Summary of a [`Checker::run`].
#[derive(Debug, Default)]
pub struct Report {
    pub up_to_date: Vec<PathBuf>,
    pub written: Vec<PathBuf>,
    pub stale: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
    pub failed: Vec<ArtifactError>,
}

impl Report {
    fn record(&mut self, path: PathBuf, outcome: Outcome) {
        let list = match (outcome.written, outcome.status) {
            (true, _) => &mut self.written,
            (false, Status::UpToDate) => &mut self.up_to_date,
            (false, Status::Stale) => &mut self.stale,
            (false, Status::Missing) => &mut self.missing,
        };
        list.push(path);
    }

    /// Whether every file was processed and nothing is left out of date.
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty() && self.stale.is_empty() && self.missing.is_empty()
    }
}
