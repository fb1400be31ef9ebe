//! Keyword scanning.

use crate::engine::Engine;
use crate::expand::next_expanded;
use crate::mouth::Context;
use crate::token::Value;

/// Scans the provided keyword, matching letter and other tokens case
/// insensitively.
///
/// The scan is multi-token: `pt` is read as two separate tokens.
/// On a near miss (`p` followed by `c`) every consumed token is restored,
/// so the caller can try a different keyword or fall back to a looser
/// grammar.
pub fn scan_keyword(engine: &mut Engine, keyword: &str) -> bool {
    let checkpoint = engine.mouth.checkpoint();
    for expected in keyword.chars() {
        let matched = match next_expanded(engine, Context::Default) {
            Some(token) => match token.value() {
                Value::Letter(c) | Value::Other(c) => c.eq_ignore_ascii_case(&expected),
                _ => false,
            },
            None => false,
        };
        if !matched {
            engine.mouth.rewind(checkpoint);
            return false;
        }
    }
    true
}
