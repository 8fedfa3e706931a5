//! Whole-tree builds
//!
//! Walks an input directory, compiles every template it finds, and writes each generated
//! class under the output directory at the path its package implies. Templates are compiled
//! independently: a failing file is reported and skipped, and the rest of the tree is still
//! built. Nothing is written for a failed file.

use bb_codegen::bb::naming;
use bb_codegen::TemplateLoader;
use bb_config::BbConfig;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Errors that stop a build before any template is compiled
#[derive(Debug)]
pub enum BuildError {
    /// The input root does not exist or is not a directory
    MissingInput(PathBuf),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::MissingInput(path) => {
                write!(f, "Input directory not found: {}", path.display())
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// A template that could not be compiled or written
#[derive(Debug)]
pub struct BuildFailure {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for BuildFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Outcome of a build
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Generated files, in the order they were written
    pub written: Vec<PathBuf>,
    pub failures: Vec<BuildFailure>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compile every template under `input` into `output`.
pub fn build(input: &Path, output: &Path, config: &BbConfig) -> Result<BuildReport, BuildError> {
    if !input.is_dir() {
        return Err(BuildError::MissingInput(input.to_path_buf()));
    }

    let options = config.emit_options();
    let marker = config.input.marker.as_str();
    let mut report = BuildReport::default();

    for entry in WalkDir::new(input)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() || !naming::is_template(path, marker) {
            tracing::trace!(path = %path.display(), "skipping non-template entry");
            continue;
        }
        let Some(name) = naming::unit_name(input, path, &config.output.package_prefix, marker)
        else {
            continue;
        };

        let target = naming::output_path(output, &name, &config.output.extension);
        let result = TemplateLoader::from_path(path)
            .and_then(|loader| loader.compile(&name, &options))
            .map_err(|err| err.to_string())
            .and_then(|java| write_output(&target, &java).map_err(|err| err.to_string()));

        match result {
            Ok(()) => {
                tracing::info!(
                    template = %path.display(),
                    class = %name.qualified(),
                    output = %target.display(),
                    "compiled template"
                );
                report.written.push(target);
            }
            Err(message) => {
                tracing::warn!(template = %path.display(), error = %message, "template failed");
                report.failures.push(BuildFailure {
                    path: path.to_path_buf(),
                    message,
                });
            }
        }
    }

    Ok(report)
}

fn write_output(target: &Path, java: &str) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(target, java)
}
