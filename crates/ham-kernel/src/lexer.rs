//! Lexer for Jam source text.
//!
//! Jam has one kind of token: a whitespace-delimited word. Double quotes
//! group text (whitespace included) and are removed; a backslash escapes the
//! next character. A `#` at the start of a word comments out the rest of the
//! line.
//!
//! Whether a word is a keyword depends on the parser's position, so the
//! lexer only records whether quoting or escaping was involved; a quoted
//! `"rule"` is never the keyword.

use logos::{Logos, Span};
use std::fmt;

/// A token with its span in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub token: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(token: T, span: Span) -> Self {
        Self { token, span }
    }
}

/// Lexer error types.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexerError {
    #[default]
    UnexpectedCharacter,
    UnterminatedString,
    DanglingEscape,
    UnterminatedActions,
}

impl fmt::Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexerError::UnexpectedCharacter => write!(f, "unexpected character"),
            LexerError::UnterminatedString => write!(f, "unterminated string"),
            LexerError::DanglingEscape => write!(f, "backslash at end of line"),
            LexerError::UnterminatedActions => write!(f, "unterminated actions block"),
        }
    }
}

/// One word of source text, quotes and escapes removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    /// True if any part of the word was quoted or escaped.
    pub quoted: bool,
}

impl Word {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexerError)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    #[regex(
        r#"([^ \t\r\n\f"\\#]|\\[^\n]|"([^"\\]|\\[^\n])*")([^ \t\r\n\f"\\]|\\[^\n]|"([^"\\]|\\[^\n])*")*"#,
        word
    )]
    Word(Word),
}

fn word(lex: &mut logos::Lexer<Token>) -> Word {
    let slice = lex.slice();
    let mut text = String::with_capacity(slice.len());
    let mut quoted = false;
    let mut chars = slice.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => quoted = true,
            '\\' => {
                quoted = true;
                if let Some(escaped) = chars.next() {
                    text.push(escaped);
                }
            }
            c => text.push(c),
        }
    }
    Word { text, quoted }
}

/// Refine the lexer's generic error using the offending text.
pub(crate) fn classify_error(error: LexerError, slice: &str) -> LexerError {
    match slice.chars().next() {
        Some('"') => LexerError::UnterminatedString,
        Some('\\') => LexerError::DanglingEscape,
        _ => error,
    }
}

/// Consume the raw body of an `actions` block.
///
/// The lexer must sit just after the opening `{`. The text up to the
/// matching `}` is returned verbatim and the lexer is left on that `}`.
pub fn action_body(lexer: &mut logos::Lexer<'_, Token>) -> Result<String, LexerError> {
    let remainder = lexer.remainder();
    let mut depth = 1usize;
    for (index, c) in remainder.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let body = remainder[..index].to_string();
                    lexer.bump(index);
                    return Ok(body);
                }
            }
            _ => {}
        }
    }
    Err(LexerError::UnterminatedActions)
}

/// Tokenize a whole source string.
pub fn tokenize(source: &str) -> Result<Vec<Spanned<Word>>, Spanned<LexerError>> {
    let mut lexer = Token::lexer(source);
    let mut words = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(Token::Word(word)) => words.push(Spanned::new(word, lexer.span())),
            Err(err) => {
                return Err(Spanned::new(classify_error(err, lexer.slice()), lexer.span()));
            }
        }
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str) -> Vec<String> {
        tokenize(source)
            .expect("lexing failed")
            .into_iter()
            .map(|spanned| spanned.token.text)
            .collect()
    }

    #[test]
    fn words_split_on_whitespace() {
        assert_eq!(texts("Echo a b ;"), vec!["Echo", "a", "b", ";"]);
        assert_eq!(texts("x=y;"), vec!["x=y;"]);
        assert_eq!(texts("\tA\n\n+=  B\r\n"), vec!["A", "+=", "B"]);
    }

    #[test]
    fn quotes_group_and_disappear() {
        let words = tokenize(r#"Echo "a b" x"y"z "" ;"#).unwrap();
        let texts: Vec<&str> = words.iter().map(|w| w.token.text.as_str()).collect();
        assert_eq!(texts, vec!["Echo", "a b", "xyz", "", ";"]);
        assert!(!words[0].token.quoted);
        assert!(words[1].token.quoted);
    }

    #[test]
    fn backslash_escapes() {
        let words = tokenize(r"a\ b \; \\").unwrap();
        assert_eq!(words[0].token, Word { text: "a b".into(), quoted: true });
        assert_eq!(words[1].token, Word { text: ";".into(), quoted: true });
        assert_eq!(words[2].token.text, "\\");
    }

    #[test]
    fn comments_only_at_word_start() {
        assert_eq!(texts("a # comment ; here\nb"), vec!["a", "b"]);
        assert_eq!(texts("a#b"), vec!["a#b"]);
    }

    #[test]
    fn spans_cover_the_word() {
        let words = tokenize("  rule Foo").unwrap();
        assert_eq!(words[0].span, 2..6);
        assert_eq!(words[1].span, 7..10);
    }

    #[test]
    fn unterminated_string() {
        let err = tokenize("Echo \"oops ;").unwrap_err();
        assert_eq!(err.token, LexerError::UnterminatedString);
        assert_eq!(err.span.start, 5);
    }

    #[test]
    fn action_body_is_raw() {
        let source = "{ cc -c $(>) { nested } -o $(<) } rest";
        let mut lexer = Token::lexer(source);
        assert!(matches!(lexer.next(), Some(Ok(Token::Word(w))) if w.text == "{"));
        let body = action_body(&mut lexer).unwrap();
        assert_eq!(body, " cc -c $(>) { nested } -o $(<) ");
        assert!(matches!(lexer.next(), Some(Ok(Token::Word(w))) if w.text == "}"));
        assert!(matches!(lexer.next(), Some(Ok(Token::Word(w))) if w.text == "rest"));
    }

    #[test]
    fn action_body_needs_closing_brace() {
        let mut lexer = Token::lexer("{ never closed");
        lexer.next();
        assert_eq!(action_body(&mut lexer), Err(LexerError::UnterminatedActions));
    }
}
