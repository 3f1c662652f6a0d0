//! Command Template Substitution
//!
//! Minimal named-placeholder templating:
//! - `${name}` and `$name` are replaced by the value mapped to `name`
//! - `$$` produces a literal `$`
//!
//! Substitution is single pass, so `$` inside substituted values is never
//! expanded again.

use std::iter::Peekable;
use std::str::CharIndices;

use indexmap::IndexMap;

use crate::error::{Result, StepError};

/// Returns the placeholder form of a name, e.g. `${genome}`.
pub fn placeholder(name: &str) -> String {
    format!("${{{}}}", name)
}

/// Replaces every placeholder in `template` with its value from `values`.
///
/// Fails with [`StepError::MissingPlaceholder`] if a name has no value and
/// with [`StepError::InvalidPlaceholder`] on a malformed `$` sequence.
pub fn substitute(template: &str, values: &IndexMap<String, String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    scan(template, |token| {
        match token {
            Token::Text(text) => out.push_str(text),
            Token::Dollar => out.push('$'),
            Token::Name(name) => {
                let value = values
                    .get(name)
                    .ok_or_else(|| StepError::MissingPlaceholder {
                        key: name.to_string(),
                    })?;
                out.push_str(value);
            }
        }
        Ok(())
    })?;
    Ok(out)
}

enum Token<'a> {
    Text(&'a str),
    Dollar,
    Name(&'a str),
}

fn is_name_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Walks the template and hands each token to `emit`.
fn scan<'a, F>(template: &'a str, mut emit: F) -> Result<()>
where
    F: FnMut(Token<'a>) -> Result<()>,
{
    let mut chars = template.char_indices().peekable();
    let mut text_start = 0;

    while let Some((pos, ch)) = chars.next() {
        if ch != '$' {
            continue;
        }
        if text_start < pos {
            emit(Token::Text(&template[text_start..pos]))?;
        }

        let (token, end) = read_placeholder(template, pos, &mut chars)?;
        emit(token)?;
        text_start = end;
    }

    if text_start < template.len() {
        emit(Token::Text(&template[text_start..]))?;
    }
    Ok(())
}

/// Reads the placeholder starting at the `$` at `dollar`, returning the token
/// and the byte offset just past it.
fn read_placeholder<'a>(
    template: &'a str,
    dollar: usize,
    chars: &mut Peekable<CharIndices<'a>>,
) -> Result<(Token<'a>, usize)> {
    let invalid = StepError::InvalidPlaceholder { position: dollar };

    match chars.peek().copied() {
        Some((pos, '$')) => {
            chars.next();
            Ok((Token::Dollar, pos + 1))
        }
        Some((open, '{')) => {
            chars.next();
            for (pos, ch) in chars.by_ref() {
                if ch == '}' {
                    let name = &template[open + 1..pos];
                    if name.is_empty() {
                        return Err(invalid);
                    }
                    return Ok((Token::Name(name), pos + 1));
                }
            }
            Err(invalid)
        }
        Some((start, ch)) if is_name_start(ch) => {
            let mut end = template.len();
            while let Some(&(pos, ch)) = chars.peek() {
                if !is_name_char(ch) {
                    end = pos;
                    break;
                }
                chars.next();
            }
            Ok((Token::Name(&template[start..end]), end))
        }
        _ => Err(invalid),
    }
}
