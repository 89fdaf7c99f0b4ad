use std::fs;
use std::path::{Path, PathBuf};

use help_types::{Installation, Version};
use regex::Regex;

/// The `.hbk` file every qualifying installation's `bin/` directory must
/// contain — cheapest available signal that a version directory is a real
/// platform install and not stray cruft.
const MARKER_FILE: &str = "shcntx_ru.hbk";

#[cfg(target_os = "windows")]
fn search_roots() -> Vec<PathBuf> {
    vec![
        PathBuf::from(r"C:\Program Files\1cv8"),
        PathBuf::from(r"C:\Program Files (x86)\1cv8"),
    ]
}

#[cfg(not(target_os = "windows"))]
fn search_roots() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/opt/1cv8"),
        PathBuf::from("/opt/1cv8/x86_64"),
        PathBuf::from("/usr/share/1cv8"),
    ]
}

fn version_dir_pattern() -> Regex {
    Regex::new(r"^\d+\.\d+\.\d+\.\d+$").expect("static pattern is valid")
}

/// A candidate version directory with its `bin/` path already confirmed
/// to hold the marker file.
struct Candidate {
    version: Version,
    bin_path: PathBuf,
}

fn scan_root(root: &Path, pattern: &Regex) -> Vec<Candidate> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };

    let mut candidates = Vec::new();
    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if !pattern.is_match(&name) {
            continue;
        }
        let Ok(version) = Version::parse(&name) else {
            continue;
        };

        let bin_path = entry.path().join("bin");
        if !bin_path.join(MARKER_FILE).is_file() {
            continue;
        }

        candidates.push(Candidate { version, bin_path });
    }
    candidates
}

/// Scan `roots`, one level deep, for version-named directories with a
/// qualifying `bin/` subdirectory, and return the highest-versioned one.
///
/// Exposed separately from [`discover`] so tests can point it at a
/// temporary directory tree instead of the real platform search roots.
#[must_use]
pub fn scan_roots(roots: &[PathBuf]) -> Option<Installation> {
    let pattern = version_dir_pattern();
    let mut candidates: Vec<Candidate> = roots
        .iter()
        .flat_map(|root| scan_root(root, &pattern))
        .collect();

    candidates.sort_by(|a, b| b.version.cmp(&a.version));
    candidates
        .into_iter()
        .next()
        .map(|candidate| Installation::new(candidate.version, candidate.bin_path))
}

/// Find the highest-versioned 1C Platform installation under the
/// OS-appropriate standard search roots.
///
/// Returns `None` if no candidate qualifies — not an error, since a
/// missing installation is an expected startup state the caller reports
/// through its own lifecycle, not an exceptional one.
#[must_use]
pub fn discover() -> Option<Installation> {
    scan_roots(&search_roots())
}
