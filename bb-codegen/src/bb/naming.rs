//! Mapping from template files to Java names and output locations
//!
//!     A template file is recognised by a marker in its file name (`.bb.` by default), so
//!     `pages/Greeting.bb.html` is a template and `pages/notes.txt` is not. The class name is
//!     the part of the file name before the marker. The package is a configured prefix
//!     followed by the file's directories relative to the input root:
//!
//!         input root:  templates/
//!         file:        templates/mail/welcome/Body.bb.txt
//!         prefix:      bb.hgen
//!         unit:        bb.hgen.mail.welcome.Body
//!         output:      <out>/bb/hgen/mail/welcome/Body.java

use crate::bb::emitter::UnitName;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_MARKER: &str = ".bb.";

/// True when the file name carries the template marker.
pub fn is_template(path: &Path, marker: &str) -> bool {
    class_name(path, marker).is_some()
}

/// Class name for a template file: the file name up to the marker.
///
/// Returns `None` when the marker is absent or nothing precedes it.
pub fn class_name(path: &Path, marker: &str) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let (stem, _) = file_name.split_once(marker)?;
    if stem.is_empty() {
        return None;
    }
    Some(stem.to_string())
}

/// Package for a directory relative to the input root, under `prefix`.
///
/// Empty segments are dropped, so an empty prefix with a file at the root gives `None`.
pub fn package_name(prefix: &str, relative_dir: &Path) -> Option<String> {
    let segments: Vec<&str> = prefix
        .split('.')
        .chain(relative_dir.components().filter_map(|component| match component {
            Component::Normal(segment) => segment.to_str(),
            _ => None,
        }))
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("."))
    }
}

/// Full unit name for a template found under `root`.
pub fn unit_name(root: &Path, file: &Path, prefix: &str, marker: &str) -> Option<UnitName> {
    let class_name = class_name(file, marker)?;
    let relative_dir = file
        .parent()
        .and_then(|parent| parent.strip_prefix(root).ok())
        .unwrap_or_else(|| Path::new(""));
    let package = package_name(prefix, relative_dir);
    Some(UnitName::new(package.as_deref(), class_name))
}

/// Where the generated source for `name` goes under `out_dir`.
pub fn output_path(out_dir: &Path, name: &UnitName, extension: &str) -> PathBuf {
    let mut path = out_dir.to_path_buf();
    if let Some(package) = &name.package {
        path.extend(package.split('.'));
    }
    path.push(format!("{}.{}", name.class_name, extension));
    path
}
