//! The `\the` expansion primitive.

use mathlang::command::Command;
use mathlang::next_expanded;
use mathlang::prelude::*;
use mathlang::variable;

/// Get the `\the` command, which expands a register reference to the
/// textual form of its value.
pub fn get_the() -> Command {
    Command::new_expansion(the_fn)
}

fn the_fn(_: Token, engine: &mut Engine) -> bool {
    let Some(target) = next_expanded(engine, Context::Default) else {
        return false;
    };
    let Value::CommandRef(command_ref) = target.value() else {
        return false;
    };
    let Some(Command::Variable(cmd)) = engine.resolve_command(&command_ref) else {
        return false;
    };
    let Some(value) = variable::read(engine, &cmd) else {
        return false;
    };
    engine.push_string_tokens(&value.to_string());
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
            (the_count, r"\count0=12 \the\count0", "12"),
            // The output of \the is itself tokenized, so it can feed
            // another numeric scan; \relax stops the scan.
            (the_feeds_a_scan, r"\count0=3 \count1=\the\count0\relax \the\count1", "3"),
        ),
        invalid_token_tests((the_of_non_register, r"\the x", 1),),
    ];
}
