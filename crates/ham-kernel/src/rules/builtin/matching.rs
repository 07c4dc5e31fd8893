//! Match: regular expression capture.

use ham_types::StringList;
use regex::Regex;
use tracing::warn;

use crate::error::EvalResult;
use crate::interpreter::EvaluationContext;
use crate::rules::RuleInstructions;

/// `Match patterns : strings ;` returns the capture groups of every match.
///
/// Patterns are tried in order, each against every string. A match
/// contributes groups 1 through the last group that took part in it;
/// groups in between that did not participate contribute an empty string.
/// The whole match (group 0) is never returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct Match;

impl RuleInstructions for Match {
    fn evaluate(
        &self,
        _context: &mut EvaluationContext<'_>,
        parameters: &[StringList],
    ) -> EvalResult<StringList> {
        let empty = StringList::new();
        let patterns = parameters.first().unwrap_or(&empty);
        let strings = parameters.get(1).unwrap_or(&empty);

        let mut result = StringList::new();
        for pattern in patterns.iter() {
            let regex = match Regex::new(pattern) {
                Ok(regex) => regex,
                Err(err) => {
                    warn!(pattern = %pattern, error = %err, "skipping invalid Match pattern");
                    continue;
                }
            };
            for string in strings.iter() {
                let Some(captures) = regex.captures(string) else {
                    continue;
                };
                let last = (1..captures.len()).rev().find(|&group| captures.get(group).is_some());
                if let Some(last) = last {
                    for group in 1..=last {
                        result.push(captures.get(group).map_or("", |m| m.as_str()));
                    }
                }
            }
        }
        Ok(result)
    }
}
