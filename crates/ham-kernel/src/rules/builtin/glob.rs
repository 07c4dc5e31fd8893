//! Glob: list directory entries matching wildcard patterns.

use std::fs;

use ham_types::StringList;
use tracing::warn;

use crate::error::EvalResult;
use crate::interpreter::EvaluationContext;
use crate::rules::RuleInstructions;
use crate::wildcard::wildcard_match;

/// `Glob directories : patterns ;` returns `directory/name` for every entry
/// whose name matches one of the patterns.
///
/// Entries are reported once each, sorted by name within a directory.
/// Directories that cannot be read are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Glob;

impl RuleInstructions for Glob {
    fn evaluate(
        &self,
        _context: &mut EvaluationContext<'_>,
        parameters: &[StringList],
    ) -> EvalResult<StringList> {
        let empty = StringList::new();
        let directories = parameters.first().unwrap_or(&empty);
        let patterns = parameters.get(1).unwrap_or(&empty);

        let mut result = StringList::new();
        for directory in directories.iter() {
            let entries = match fs::read_dir(directory) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(directory = %directory, error = %err, "cannot read directory");
                    continue;
                }
            };
            let mut names: Vec<String> = entries
                .filter_map(Result::ok)
                .filter_map(|entry| entry.file_name().into_string().ok())
                .collect();
            names.sort();

            for name in names {
                if patterns.iter().any(|pattern| wildcard_match(pattern, &name)) {
                    result.push(join_path(directory, &name));
                }
            }
        }
        Ok(result)
    }
}

fn join_path(directory: &str, name: &str) -> String {
    if directory.ends_with('/') {
        format!("{directory}{name}")
    } else {
        format!("{directory}/{name}")
    }
}
