//! The `\let` and `\futurelet` aliasing commands.

use mathlang::command::Command;
use mathlang::prelude::*;

/// Get the `\let` command.
pub fn get_let() -> Command {
    Command::new_execution(let_fn)
}

/// Get the `\futurelet` command.
pub fn get_futurelet() -> Command {
    Command::new_execution(futurelet_fn)
}

fn let_fn(_: Token, engine: &mut Engine) -> bool {
    let scope = engine.take_global();
    let Some(target) = engine.next_token(Context::Default) else {
        return false;
    };
    let Value::CommandRef(alias_ref) = target.value() else {
        return false;
    };
    let Some(mut rhs) = engine.next_token(Context::Default) else {
        return false;
    };
    if matches!(rhs.value(), Value::Other('=')) {
        match engine.next_token(Context::Default) {
            Some(token) => rhs = token,
            None => return false,
        }
    }
    let Some(command) = command_for_token(engine, rhs) else {
        return false;
    };
    engine.scopes.define(alias_ref, command, scope);
    true
}

fn futurelet_fn(_: Token, engine: &mut Engine) -> bool {
    let scope = engine.take_global();
    let Some(target) = engine.next_token(Context::Default) else {
        return false;
    };
    let Value::CommandRef(alias_ref) = target.value() else {
        return false;
    };
    let (Some(first), Some(second)) = (
        engine.next_token(Context::Default),
        engine.next_token(Context::Default),
    ) else {
        return false;
    };
    let Some(command) = command_for_token(engine, second) else {
        return false;
    };
    engine.scopes.define(alias_ref, command, scope);
    // Both tokens are processed normally afterwards.
    engine.mouth.push_tokens(&[first, second]);
    true
}

/// The command an alias to the provided token should hold: a reference to
/// the token's command, or a character alias for a character token.
///
/// Aliases never copy behavior, only a reference, so redefining the
/// aliased name later does not affect the alias.
fn command_for_token(engine: &Engine, token: Token) -> Option<Command> {
    match token.value() {
        Value::CommandRef(command_ref) => {
            let existing = engine.scopes.lookup(&command_ref)?;
            Some(Command::new_alias(existing))
        }
        value => Some(Command::CharacterAlias(value)),
    }
}

#[cfg(test)]
mod tests {
    use mathlang_testing::*;

    fn built_in_commands() -> std::collections::HashMap<&'static str, mathlang::command::Command> {
        crate::built_in_commands()
    }

    test_suite![
        tree_equality_tests(
            (let_for_macro, r"\def\A{ab}\let\B\A \B", "ab"),
            (let_with_equals, r"\def\A{ab}\let\B=\A \B", "ab"),
            (
                alias_survives_redefinition,
                r"\def\A{a}\let\B\A \def\A{b}\B\A",
                "ab"
            ),
            (
                let_is_local_to_group,
                r"\def\A{a}\def\B{b}\let\C=\A{\let\C=\B \C}\C",
                "ba"
            ),
            (
                global_let_survives_group,
                r"\def\A{a}\def\B{b}\let\C=\A{\global\let\C=\B \C}\C",
                "bb"
            ),
            (let_to_character, r"\let\B=x \B", "x"),
            (
                futurelet_defines_and_replays,
                r"\futurelet\next ab\ifx\next b B\else C\fi",
                "abB"
            ),
        ),
        invalid_token_tests((let_to_undefined, r"\let\B=\nosuch x", 1),),
    ];
}
