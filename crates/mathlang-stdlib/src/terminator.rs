//! The `\)` and `\]` formula terminators.
//!
//! `$` and `$$` are category code driven and handled by the engine loop;
//! these two primitives cover the control sequence spellings.

use mathlang::command::Command;
use mathlang::prelude::*;

/// Get the `\)` command.
pub fn get_close_inline() -> Command {
    Command::new_execution(close_inline_fn)
}

fn close_inline_fn(_: Token, engine: &mut Engine) -> bool {
    match engine.current_style() {
        Some(Style::Inline) => {
            engine.terminate();
            true
        }
        _ => false,
    }
}

/// Get the `\]` command.
pub fn get_close_display() -> Command {
    Command::new_execution(close_display_fn)
}

fn close_display_fn(_: Token, engine: &mut Engine) -> bool {
    match engine.current_style() {
        Some(Style::Display) => {
            engine.terminate();
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use mathlang_testing::*;

    fn built_in_commands() -> std::collections::HashMap<&'static str, mathlang::command::Command> {
        crate::built_in_commands()
    }

    #[test]
    fn control_sequence_delimiters() {
        let outcome = run_formula(r"\(a\)rest", built_in_commands);
        assert!(outcome.ok);
        assert_eq!(outcome.list.len(), 1);
        assert_eq!(outcome.remainder, "rest");

        let outcome = run_formula(r"\[a\]rest", built_in_commands);
        assert!(outcome.ok);
        assert_eq!(outcome.remainder, "rest");
    }

    #[test]
    fn mismatched_control_sequence_terminator_is_invalid() {
        // \] in an inline formula does not terminate it.
        let outcome = run_formula(r"$a\]b$", built_in_commands);
        assert!(outcome.ok);
        assert_eq!(outcome.list.len(), 3);
        assert!(outcome.list[1].invalid);
    }
}
