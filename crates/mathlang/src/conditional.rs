//! The conditional evaluator.
//!
//! Every `\if`-family primitive reduces to computing a boolean and calling
//! [true_case] or [false_case]; `\ifcase` calls [switch_case] with the
//! scanned index.
//! Skipped branches are read unexpanded, and nested `\if…\fi` pairs inside
//! them are balanced by command tag: any command carrying the if tag opens
//! a nested conditional, and the skip only ends at an `\else`/`\or`/`\fi`
//! at depth zero.
//!
//! The evaluator keeps a stack of open branches in the engine so that
//! `\else`, `\or` and `\fi` encountered during normal processing can tell
//! whether they are legitimate.
//! Mismatched ones are marked invalid and processing continues.

use crate::command::{StaticTag, Tag};
use crate::engine::Engine;
use crate::mouth::Context;
use crate::token::Token;

/// Conditional state attached to the engine: the stack of branches
/// currently being processed.
///
/// A nested conditional is further up the stack than the conditional it is
/// nested in.
#[derive(Default)]
pub struct Component {
    branches: Vec<Branch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    /// The true branch of a conditional.
    True,
    /// The false branch of a conditional, or the default branch of a
    /// switch statement.
    Else,
    /// A regular case branch of a switch statement.
    Switch,
}

static IF_TAG: StaticTag = StaticTag::new();
static ELSE_TAG: StaticTag = StaticTag::new();
static OR_TAG: StaticTag = StaticTag::new();
static FI_TAG: StaticTag = StaticTag::new();

/// The tag shared by every `\if`-family primitive.
pub fn if_tag() -> Tag {
    IF_TAG.get()
}

pub fn else_tag() -> Tag {
    ELSE_TAG.get()
}

pub fn or_tag() -> Tag {
    OR_TAG.get()
}

pub fn fi_tag() -> Tag {
    FI_TAG.get()
}

/// Invoked when a conditional evaluates to true.
///
/// The tokens of the branch flow to the caller unexpanded; the branch is
/// recorded so that the matching `\else` knows to skip the false branch.
pub fn true_case(token: Token, engine: &mut Engine) -> bool {
    let _ = token;
    engine.conditionals.branches.push(Branch::True);
    true
}

/// Invoked when a conditional evaluates to false.
///
/// Skips unexpanded tokens until the matching `\else` or `\fi`.
/// Returns false if the input ends first.
pub fn false_case(token: Token, engine: &mut Engine) -> bool {
    let _ = token;
    match skip_branch(engine, false) {
        SkipOutcome::Else => {
            engine.conditionals.branches.push(Branch::Else);
            true
        }
        SkipOutcome::Fi => true,
        SkipOutcome::Or | SkipOutcome::EndOfInput => false,
    }
}

/// Invoked by `\ifcase` with the scanned case index.
///
/// Skips `index` cases separated by `\or`; a negative or too-large index
/// selects the `\else` branch if there is one.
pub fn switch_case(token: Token, engine: &mut Engine, index: i64) -> bool {
    let _ = token;
    let mut remaining = index;
    loop {
        if remaining == 0 {
            engine.conditionals.branches.push(Branch::Switch);
            return true;
        }
        match skip_branch(engine, remaining > 0) {
            SkipOutcome::Or => remaining -= 1,
            SkipOutcome::Else => {
                engine.conditionals.branches.push(Branch::Else);
                return true;
            }
            SkipOutcome::Fi => return true,
            SkipOutcome::EndOfInput => return false,
        }
    }
}

/// The `\else` expansion primitive.
///
/// Valid only while a true or switch branch is open: the remaining tokens
/// up to the matching `\fi` are the unreached branch and are skipped.
pub fn else_fn(token: Token, engine: &mut Engine) -> bool {
    let _ = token;
    match engine.conditionals.branches.pop() {
        Some(Branch::True | Branch::Switch) => {
            matches!(skip_branch(engine, false), SkipOutcome::Fi)
        }
        Some(Branch::Else) | None => false,
    }
}

/// The `\or` expansion primitive.
///
/// Valid only while a switch branch is open.
pub fn or_fn(token: Token, engine: &mut Engine) -> bool {
    let _ = token;
    match engine.conditionals.branches.pop() {
        Some(Branch::Switch) => matches!(skip_branch(engine, false), SkipOutcome::Fi),
        _ => false,
    }
}

/// The `\fi` expansion primitive.
pub fn fi_fn(token: Token, engine: &mut Engine) -> bool {
    let _ = token;
    engine.conditionals.branches.pop().is_some()
}

enum SkipOutcome {
    Else,
    Or,
    Fi,
    EndOfInput,
}

/// Skips unexpanded tokens until an `\else`, `\or` (if requested) or `\fi`
/// at nesting depth zero.
///
/// The tokens of any nested `\if…\fi` pair are passed over without being
/// evaluated: the enclosing condition already decided this branch is dead.
fn skip_branch(engine: &mut Engine, stop_at_or: bool) -> SkipOutcome {
    let mut depth = 0_usize;
    while let Some(token) = engine.next_token(Context::Default) {
        let Some(tag) = engine.tag_of_token(&token) else {
            continue;
        };
        if tag == if_tag() {
            depth += 1;
        } else if tag == fi_tag() {
            match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return SkipOutcome::Fi,
            }
        } else if tag == else_tag() && depth == 0 {
            return SkipOutcome::Else;
        } else if tag == or_tag() && depth == 0 && stop_at_or {
            return SkipOutcome::Or;
        }
    }
    SkipOutcome::EndOfInput
}
