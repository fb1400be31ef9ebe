//! Macro definition: `\def` and `\gdef`.

use mathlang::command::Command;
use mathlang::prelude::*;
use mathlang::usermacro::{Macro, Parameter, Replacement};
use mathcraft_stdext::collections::scopedmap::Scope;
use std::sync::Arc;

/// Get the `\def` command.
pub fn get_def() -> Command {
    Command::new_execution(def_fn)
}

/// Get the `\gdef` command.
pub fn get_gdef() -> Command {
    Command::new_execution(gdef_fn)
}

fn def_fn(_: Token, engine: &mut Engine) -> bool {
    parse_and_define(engine, false)
}

fn gdef_fn(_: Token, engine: &mut Engine) -> bool {
    parse_and_define(engine, true)
}

fn parse_and_define(engine: &mut Engine, global_override: bool) -> bool {
    let mut scope = engine.take_global();
    if global_override {
        scope = Scope::Global;
    }
    let Some(target) = engine.next_token(Context::Default) else {
        return false;
    };
    let Value::CommandRef(command_ref) = target.value() else {
        return false;
    };
    let Some((prefix, raw_parameters, end_token)) = parse_parameter_text(engine) else {
        return false;
    };
    let parameters: Vec<Parameter> = raw_parameters
        .into_iter()
        .map(|raw| match raw {
            RawParameter::Undelimited => Parameter::Undelimited,
            RawParameter::Delimited(values) => Parameter::Delimited(values),
        })
        .collect();
    let Some(replacements) = parse_replacement_text(engine, end_token, parameters.len()) else {
        return false;
    };
    engine.scopes.define(
        command_ref,
        Command::Macro(Arc::new(Macro::new(prefix, parameters, replacements))),
        scope,
    );
    true
}

enum RawParameter {
    Undelimited,
    Delimited(Vec<Value>),
}

impl RawParameter {
    fn push(&mut self, value: Value) {
        match self {
            RawParameter::Undelimited => {
                *self = RawParameter::Delimited(vec![value]);
            }
            RawParameter::Delimited(values) => {
                values.push(value);
            }
        }
    }
}

fn char_to_parameter_index(c: char) -> Option<usize> {
    match c {
        '1'..='9' => Some(c as usize - '1' as usize),
        _ => None,
    }
}

/// Parses the prefix and parameter text of a definition, up to the opening
/// brace of the replacement text.
///
/// The returned token, if any, is the extra begin-group token of the
/// special `#{` rule, which must also terminate the replacement text.
fn parse_parameter_text(
    engine: &mut Engine,
) -> Option<(Vec<Token>, Vec<RawParameter>, Option<Token>)> {
    let mut prefix = Vec::new();
    let mut parameters: Vec<RawParameter> = Vec::new();
    loop {
        let token = engine.next_token(Context::PreSpace)?;
        match token.value() {
            Value::BeginGroup(_) => {
                return Some((prefix, parameters, None));
            }
            Value::EndGroup(_) => {
                return None;
            }
            Value::Parameter(_) => {
                let parameter_token = engine.next_token(Context::PreSpace)?;
                match parameter_token.value() {
                    // The special #{ rule: the parameter text ends here and
                    // the { both delimits the last parameter and opens the
                    // replacement text.
                    Value::BeginGroup(_) => {
                        match parameters.last_mut() {
                            None => prefix.push(parameter_token),
                            Some(parameter) => parameter.push(parameter_token.value()),
                        }
                        return Some((prefix, parameters, Some(parameter_token)));
                    }
                    Value::CommandRef(_) => {
                        return None;
                    }
                    _ => {
                        let c = parameter_token.char().unwrap();
                        let index = char_to_parameter_index(c)?;
                        // Parameters must be numbered in order.
                        if index != parameters.len() {
                            return None;
                        }
                        parameters.push(RawParameter::Undelimited);
                    }
                }
            }
            value => match parameters.last_mut() {
                None => prefix.push(token),
                Some(parameter) => parameter.push(value),
            },
        }
    }
}

fn parse_replacement_text(
    engine: &mut Engine,
    end_token: Option<Token>,
    num_parameters: usize,
) -> Option<Vec<Replacement>> {
    let mut result: Vec<Replacement> = Vec::new();
    let mut depth = 0_i32;
    let push = |result: &mut Vec<Replacement>, token: Token| match result.last_mut() {
        Some(Replacement::Tokens(tokens)) => tokens.push(token),
        _ => result.push(Replacement::Tokens(vec![token])),
    };
    loop {
        let token = engine.next_token(Context::PreSpace)?;
        match token.value() {
            Value::BeginGroup(_) => depth += 1,
            Value::EndGroup(_) => {
                if depth == 0 {
                    if let Some(end_token) = end_token {
                        push(&mut result, end_token);
                    }
                    return Some(result);
                }
                depth -= 1;
            }
            Value::Parameter(_) => {
                let parameter_token = engine.next_token(Context::PreSpace)?;
                match parameter_token.value() {
                    // ## stands for a literal parameter character.
                    Value::Parameter(_) => {
                        push(&mut result, parameter_token);
                    }
                    Value::CommandRef(_) => return None,
                    _ => {
                        let index = char_to_parameter_index(parameter_token.char().unwrap())?;
                        if index >= num_parameters {
                            return None;
                        }
                        result.push(Replacement::Parameter(index));
                    }
                }
                continue;
            }
            _ => (),
        }
        push(&mut result, token);
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
            (no_parameters, r"\def\A{ab}\A", "ab"),
            (expansion_twice, r"\def\A{ab}\A\A", "abab"),
            (one_undelimited_parameter, r"\def\A#1{x#1y}\A1", "x1y"),
            (
                one_undelimited_parameter_group,
                r"\def\A#1{x#1y}\A{12}",
                "x12y"
            ),
            (
                undelimited_group_equals_bare_token,
                r"\def\A#1{[#1]}\A{z}",
                r"\def\A#1{[#1]}\A z"
            ),
            (
                parameter_used_twice,
                r"\def\A#1{#1#1}\A b",
                "bb"
            ),
            (
                two_undelimited_parameters,
                r"\def\A#1#2{#2#1}\A 56",
                "65"
            ),
            (prefix_consumed, r"\def\A ab{c}\A abd", "cd"),
            (
                one_delimited_parameter,
                r"\def\A #1x{y#1z}\A abx",
                "yabz"
            ),
            (one_delimited_parameter_empty, r"\def\A #1x{y#1z}\A x", "yz"),
            (
                delimited_parameter_multiple_units_not_stripped,
                r"\def\A #1x{#1}\A a{bx}cx",
                "a{bx}c"
            ),
            (
                delimited_parameter_brace_stripping,
                r"\def\A #1x{(#1)}\A {q}x",
                "(q)"
            ),
            (
                two_groups_are_not_stripped,
                r"\def\A #1x{#1}\A {a}{b}x",
                "{a}{b}"
            ),
            (
                parameter_brace_special_case,
                r"\def\A #{q}\A{r}",
                "q{r}"
            ),
            (
                double_parameter_char_is_literal,
                r"\def\A#1{\def\B##1{##1#1}}\A!\B{c}",
                "c!"
            ),
            (
                grouping_makes_definition_local,
                r"\def\A{a}{\def\A{b}\A}\A",
                "ba"
            ),
            (
                global_def_survives_group,
                r"\def\A{a}{\global\def\A{b}\A}\A",
                "bb"
            ),
            (
                gdef_survives_group,
                r"\def\A{a}{\gdef\A{b}\A}\A",
                "bb"
            ),
            (
                macro_expands_to_same_tree_as_its_body,
                r"\def\x{A}\x",
                "A"
            ),
            (
                texbook_puzzle,
                r"\def\a{\b}\def\b{A\def\a{B\def\a{C\def\a{\b}}}}\def\puzzle{\a\a\a\a\a}\puzzle",
                "ABCAB"
            ),
        ),
        invalid_token_tests(
            (malformed_call_marks_macro_invalid, r"\def\A ab{c}\A ax", 1),
            (end_of_input_in_argument, r"\def\A#1{#1}\A{x", 2),
        ),
    ];
}
