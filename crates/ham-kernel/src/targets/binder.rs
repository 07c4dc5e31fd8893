//! Binding target names to filesystem paths.
//!
//! The grist is dropped, then `LOCATE` places the file and `SEARCH` probes
//! for it. Target-specific values win over globals.

use std::path::{Path, PathBuf};

use ham_types::StringList;

use super::Target;
use crate::interpreter::VariableDomain;

/// Whether a bound path exists on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Exists,
    Missing,
}

/// The outcome of [`TargetBinder::bind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundTarget {
    pub path: PathBuf,
    pub status: FileStatus,
}

/// Resolves target names against `LOCATE` and `SEARCH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetBinder;

impl TargetBinder {
    pub fn new() -> Self {
        Self
    }

    pub fn bind(&self, globals: &VariableDomain, target: &Target) -> BoundTarget {
        let name = ungristed(target.name());

        let lookup = |variable: &str| -> Option<StringList> {
            target
                .variables()
                .and_then(|vars| vars.lookup(variable))
                .or_else(|| globals.lookup(variable))
                .filter(|value| !value.is_empty())
                .cloned()
        };

        if let Some(locate) = lookup("LOCATE") {
            let path = Path::new(locate.element_at(0)).join(name);
            return BoundTarget::probe(path);
        }

        if let Some(search) = lookup("SEARCH") {
            for directory in search.iter() {
                let candidate = Path::new(directory).join(name);
                if candidate.exists() {
                    return BoundTarget {
                        path: candidate,
                        status: FileStatus::Exists,
                    };
                }
            }
        }

        BoundTarget::probe(PathBuf::from(name))
    }
}

/// Strip a leading `<grist>` from a target name.
fn ungristed(name: &str) -> &str {
    match (name.starts_with('<'), name.find('>')) {
        (true, Some(close)) => &name[close + 1..],
        _ => name,
    }
}

impl BoundTarget {
    fn probe(path: PathBuf) -> BoundTarget {
        let status = if path.exists() {
            FileStatus::Exists
        } else {
            FileStatus::Missing
        };
        BoundTarget { path, status }
    }
}
