//! The `\global` prefix and `\relax`.
//!
//! `\global` sets a flag on the engine that the next assignment-like
//! command consumes through [Engine::take_global].
//! Every command that can be prefixed must read the flag exactly once on
//! all of its code paths, even the ones that ignore the result; otherwise
//! the flag would leak into a later assignment.

use mathlang::command::{relax_tag, Command};
use mathlang::prelude::*;

/// Get the `\global` command.
pub fn get_global() -> Command {
    Command::new_execution(global_fn)
}

fn global_fn(_: Token, engine: &mut Engine) -> bool {
    engine.set_global_prefix();
    true
}

/// Get the `\relax` command.
///
/// Does nothing; the numeric grammar recognizes it by tag as a number
/// terminator.
pub fn get_relax() -> Command {
    Command::new_execution(relax_fn).with_tag(relax_tag())
}

fn relax_fn(_: Token, _: &mut Engine) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use mathlang_testing::*;

    fn built_in_commands() -> std::collections::HashMap<&'static str, mathlang::command::Command> {
        crate::built_in_commands()
    }

    test_suite![
        tree_equality_tests(
            (relax_is_a_no_op, r"a\relax b", r"ab"),
            (global_at_top_level_is_harmless, r"\global\count0=1 x", r"x"),
        ),
    ];
}
