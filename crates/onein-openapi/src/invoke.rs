//! File-level entry points: locate the input, load config, convert, write.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml_ng::Value;

use crate::config::Config;
use crate::convert::transform;
use crate::error::Result;

/// Config file looked up when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "onein.yaml";

/// Document read when the input is a directory.
pub const DEFAULT_INPUT_FILE: &str = "openapi.yaml";

/// Appended to the input stem to name the output file.
pub const OUTPUT_SUFFIX: &str = ".onein.json";

/// Stem used when the input path has no file name.
const FALLBACK_STEM: &str = "openapi";

/// One conversion run over files.
///
/// ```no_run
/// use onein_openapi::Invocation;
///
/// let written = Invocation::new("api")
///     .config("onein.yaml")
///     .out_dir("target")
///     .run()?;
/// println!("{}", written.display());
/// # Ok::<(), onein_openapi::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Invocation {
    input: PathBuf,
    config: PathBuf,
    out_dir: PathBuf,
}

/// Concrete paths an [`Invocation`] reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Document to read.
    pub document: PathBuf,
    /// Config file to read, if it exists.
    pub config: PathBuf,
    /// Output base name, without [`OUTPUT_SUFFIX`].
    pub stem: String,
}

impl Invocation {
    /// Start a run over `input`, a document file or a directory holding
    /// [`DEFAULT_INPUT_FILE`].
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            config: PathBuf::from(DEFAULT_CONFIG_FILE),
            out_dir: PathBuf::from("."),
        }
    }

    /// Set the config file path.
    #[must_use]
    pub fn config(mut self, config: impl Into<PathBuf>) -> Self {
        self.config = config.into();
        self
    }

    /// Set the directory the output is written to.
    #[must_use]
    pub fn out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    /// Work out the document, config and output stem.
    ///
    /// For a directory input, the document is `<dir>/openapi.yaml` and a
    /// relative config path is taken relative to the directory. The output
    /// stem always comes from the input itself, so `api/` gives `api` and
    /// `.` gives the name of the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the input path cannot be canonicalized
    /// (usually because it does not exist).
    pub fn resolve(&self) -> Result<ResolvedPaths> {
        let (document, config) = if self.input.is_dir() {
            let config = if self.config.is_absolute() {
                self.config.clone()
            } else {
                self.input.join(&self.config)
            };
            (self.input.join(DEFAULT_INPUT_FILE), config)
        } else {
            (self.input.clone(), self.config.clone())
        };

        let canonical = fs::canonicalize(&self.input)?;
        let stem = canonical
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(FALLBACK_STEM)
            .to_string();

        Ok(ResolvedPaths {
            document,
            config,
            stem,
        })
    }

    /// Read, convert and write. Returns the path written.
    ///
    /// Nothing is written if any step fails.
    ///
    /// # Errors
    ///
    /// Returns the first I/O, parse or conversion error.
    pub fn run(&self) -> Result<PathBuf> {
        let paths = self.resolve()?;
        let config = Config::load_or_default(&paths.config)?;
        let doc = read_document(&paths.document)?;
        let doc = transform(doc, &config)?;
        write_output(&doc, &self.out_dir, &paths.stem)
    }
}

/// Convert `input` with the config at `config`, writing into the current
/// directory.
///
/// # Errors
///
/// See [`Invocation::run`].
pub fn run(input: impl Into<PathBuf>, config: impl Into<PathBuf>) -> Result<PathBuf> {
    Invocation::new(input).config(config).run()
}

/// Read and parse a YAML (or JSON) document.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML.
pub fn read_document(path: &Path) -> Result<Value> {
    tracing::info!(path = %path.display(), "reading openapi document");
    let content = fs::read_to_string(path)?;
    Ok(serde_yaml_ng::from_str(&content)?)
}

/// Write `doc` as pretty JSON to `<out_dir>/<stem>.onein.json`.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_output(doc: &Value, out_dir: &Path, stem: &str) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(doc)?;
    let path = out_dir.join(format!("{stem}{OUTPUT_SUFFIX}"));
    tracing::info!(path = %path.display(), "writing output");
    fs::write(&path, json)?;
    Ok(path)
}
