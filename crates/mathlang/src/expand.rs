//! The expansion engine.

use crate::command::Command;
use crate::engine::Engine;
use crate::mouth::Context;
use crate::token::{Token, Value};

/// Produces the next fully-expanded token.
///
/// Expansion primitives and macros are invoked and their output re-read;
/// everything else is returned as-is.
/// An undefined command name, a macro call whose arguments fail to match,
/// or an expansion primitive that cannot make sense of its input all yield
/// the original token marked invalid — never an error.
pub fn next_expanded(engine: &mut Engine, ctx: Context) -> Option<Token> {
    loop {
        let token = engine.next_token(ctx)?;
        let Value::CommandRef(command_ref) = token.value() else {
            return Some(token);
        };
        if token.is_invalid() {
            return Some(token);
        }
        let Some(command) = engine.resolve_command(&command_ref) else {
            return Some(token.into_invalid());
        };
        match command {
            Command::Expansion(f, _) => {
                if !f(token, engine) {
                    return Some(token.into_invalid());
                }
            }
            Command::Macro(m) => {
                if !m.call(token, engine) {
                    return Some(token.into_invalid());
                }
            }
            _ => return Some(token),
        }
    }
}
