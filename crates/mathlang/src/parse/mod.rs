//! The numeric grammar: integers, factors, dimensions and glue.
//!
//! Every scanner here is speculative: it takes a mouth checkpoint, tries
//! to parse its grammar element from the expanded token stream, and on
//! failure rewinds to the checkpoint and returns [None].
//! The caller decides what a [None] means — usually that the enclosing
//! command is marked invalid, or that a looser grammar applies.
//!
//! Side effects performed while speculating (a `\catcode` change made by a
//! primitive that was expanded along the way) stay committed; only token
//! production is rolled back.

mod dimen;
mod glue;
mod integer;
mod keyword;

pub use dimen::{scan_dimen, scan_mu_dimen};
pub use glue::{scan_glue, scan_mu_glue};
pub use integer::scan_int;
pub use keyword::scan_keyword;

pub(crate) use dimen::scan_factor;
pub(crate) use integer::scan_optional_signs;

use crate::engine::Engine;
use crate::expand::next_expanded;
use crate::mouth::Context;
use crate::token::Value;

/// Consumes an optional equals sign (and the spaces around it).
pub fn scan_optional_equals(engine: &mut Engine) {
    match next_expanded(engine, Context::Default) {
        Some(token) if matches!(token.value(), Value::Other('=')) => (),
        Some(token) => engine.mouth.push_back(token),
        None => (),
    }
}

/// Consumes one optional space token.
pub fn scan_optional_space(engine: &mut Engine) {
    match next_expanded(engine, Context::PreSpace) {
        Some(token) if matches!(token.value(), Value::Space(_)) => (),
        Some(token) => engine.mouth.push_back(token),
        None => (),
    }
}

/// Consumes the optional terminator of a number: a single space token or a
/// command carrying the `\relax` tag.
///
/// A non-matching token is pushed back rather than rewound over, so any
/// expansion performed while looking ahead is not re-run.
pub(crate) fn scan_number_end(engine: &mut Engine) {
    match next_expanded(engine, Context::PreSpace) {
        Some(token) if matches!(token.value(), Value::Space(_)) => (),
        Some(token) if engine.tag_of_token(&token) == Some(crate::command::relax_tag()) => (),
        Some(token) => engine.mouth.push_back(token),
        None => (),
    }
}
