//! Echo: print the first argument.

use ham_types::{EchoTrailingSpace, StringList};

use crate::error::EvalResult;
use crate::interpreter::EvaluationContext;
use crate::rules::RuleInstructions;

/// `Echo words ;` writes the words separated by spaces and a newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Echo;

impl RuleInstructions for Echo {
    fn evaluate(
        &self,
        context: &mut EvaluationContext<'_>,
        parameters: &[StringList],
    ) -> EvalResult<StringList> {
        print_words(context, parameters.first())?;
        Ok(StringList::new())
    }
}

/// Write `words` the way Echo does, honoring the trailing-space behavior.
pub(super) fn print_words(
    context: &mut EvaluationContext<'_>,
    words: Option<&StringList>,
) -> EvalResult<()> {
    let empty = StringList::new();
    let words = words.unwrap_or(&empty);
    let mut line = match context.behavior().echo_trailing_space() {
        EchoTrailingSpace::EchoTrailingSpace => {
            words.iter().fold(String::new(), |mut line, word| {
                line.push_str(word);
                line.push(' ');
                line
            })
        }
        EchoTrailingSpace::EchoNoTrailingSpace => words.join_with(" "),
    };
    line.push('\n');
    let output = context.output();
    output.write_all(line.as_bytes())?;
    output.flush()?;
    Ok(())
}
