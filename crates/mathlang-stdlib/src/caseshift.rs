//! The `\uppercase` and `\lowercase` commands.
//!
//! The balanced argument is read unexpanded, each character token is
//! mapped through the uppercase/lowercase code table (keeping its category
//! code), and the result is spliced back unexpanded.

use mathlang::command::Command;
use mathlang::prelude::*;
use mathlang::usermacro::finish_balanced_group;

/// Get the `\uppercase` command.
pub fn get_uppercase() -> Command {
    Command::new_execution(uppercase_fn)
}

/// Get the `\lowercase` command.
pub fn get_lowercase() -> Command {
    Command::new_execution(lowercase_fn)
}

fn uppercase_fn(_: Token, engine: &mut Engine) -> bool {
    shift_case(engine, true)
}

fn lowercase_fn(_: Token, engine: &mut Engine) -> bool {
    shift_case(engine, false)
}

fn shift_case(engine: &mut Engine, upper: bool) -> bool {
    let checkpoint = engine.mouth.checkpoint();
    let Some(open) = engine.next_token(Context::Default) else {
        return false;
    };
    if !matches!(open.value(), Value::BeginGroup(_)) {
        engine.mouth.rewind(checkpoint);
        return false;
    }
    let mut tokens = Vec::new();
    if !finish_balanced_group(engine, &mut tokens) {
        engine.mouth.rewind(checkpoint);
        return false;
    }
    let mapped: Vec<Token> = tokens
        .into_iter()
        .map(|token| match (token.char(), token.cat_code()) {
            (Some(c), Some(cat_code)) => {
                let to = match upper {
                    true => engine.scopes.uc_code(c),
                    false => engine.scopes.lc_code(c),
                };
                Token::new_from_value(mathlang::token::Value::new(to, cat_code))
            }
            // Control sequences pass through unchanged.
            _ => token,
        })
        .collect();
    engine.mouth.push_tokens(&mapped);
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
            (uppercase_letters, r"\uppercase{ab}", "AB"),
            (lowercase_letters, r"\lowercase{AB}", "ab"),
            (non_letters_unchanged, r"\uppercase{a+b}", "A+B"),
            (
                control_sequences_pass_through,
                r"\def\x{q}\uppercase{a\x b}",
                "AqB"
            ),
            (
                custom_uccode,
                r"\uccode`\x=`\y \uppercase{x}",
                "y"
            ),
        ),
        invalid_token_tests((uppercase_without_group, r"\uppercase x", 1),),
    ];
}
