//! User-defined macros and TeX parameter matching.

use crate::engine::Engine;
use crate::mouth::Context;
use crate::token;
use crate::token::Token;
use crate::token::Value;
use colored::Colorize;

/// A user-defined macro.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Macro {
    prefix: Vec<Token>,
    parameters: Vec<Parameter>,
    replacements: Vec<Replacement>,
}

/// A parameter in a macro's parameter text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parameter {
    /// Absorbs exactly one token or one balanced group.
    Undelimited,
    /// Absorbs tokens until the delimiter token values match at depth zero.
    Delimited(Vec<Value>),
}

/// A token list or parameter reference in a macro's replacement text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Replacement {
    Tokens(Vec<Token>),
    /// The index is less than the number of parameters of the macro.
    Parameter(usize),
}

impl Macro {
    pub fn new(
        prefix: Vec<Token>,
        parameters: Vec<Parameter>,
        replacements: Vec<Replacement>,
    ) -> Macro {
        Macro {
            prefix,
            parameters,
            replacements,
        }
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn replacements(&self) -> &[Replacement] {
        &self.replacements
    }

    /// Calls the macro: matches the prefix and parameter text against the
    /// input and splices the substituted replacement text into the mouth.
    ///
    /// The result is spliced unexpanded; expansion of the replacement
    /// happens lazily as the caller re-consumes it.
    ///
    /// On any mismatch the mouth is rewound to its state before the call
    /// and false is returned; the caller marks the macro token invalid.
    pub fn call(&self, token: Token, engine: &mut Engine) -> bool {
        let checkpoint = engine.mouth.checkpoint();

        for prefix_token in &self.prefix {
            match engine.next_token(Context::PreSpace) {
                Some(t) if t.value() == prefix_token.value() => (),
                _ => {
                    engine.mouth.rewind(checkpoint);
                    return false;
                }
            }
        }

        let mut arguments: Vec<Vec<Token>> = Vec::with_capacity(self.parameters.len());
        for parameter in &self.parameters {
            match parameter.absorb_argument(engine) {
                Some(argument) => arguments.push(argument),
                None => {
                    engine.mouth.rewind(checkpoint);
                    return false;
                }
            }
        }

        let mut result: Vec<Token> = Vec::new();
        for replacement in &self.replacements {
            match replacement {
                Replacement::Tokens(tokens) => result.extend_from_slice(tokens),
                Replacement::Parameter(i) => result.extend_from_slice(&arguments[*i]),
            }
        }
        log::trace!(
            "expanded macro {:?} with {} argument(s) to {} token(s)",
            token.value(),
            arguments.len(),
            result.len(),
        );
        engine.mouth.push_tokens(&result);
        true
    }

    /// Renders a human-readable description of the macro.
    pub fn doc(&self, interner: &token::CsNameInterner) -> String {
        let mut d = String::from("User-defined macro\n");
        d.push_str(&format![
            " . {} `{}`\n",
            "Prefix:".italic(),
            token::write_tokens(&self.prefix, interner)
        ]);
        for (i, parameter) in self.parameters.iter().enumerate() {
            let number = format!["#{}", i + 1].bold();
            match parameter {
                Parameter::Undelimited => {
                    d.push_str(&format![" . {number}: undelimited\n"]);
                }
                Parameter::Delimited(delimiter) => {
                    let tokens: Vec<Token> = delimiter
                        .iter()
                        .map(|v| Token::new_from_value(*v))
                        .collect();
                    d.push_str(&format![
                        " . {number}: delimited by `{}`\n",
                        token::write_tokens(&tokens, interner)
                    ]);
                }
            }
        }
        d
    }
}

impl Parameter {
    fn absorb_argument(&self, engine: &mut Engine) -> Option<Vec<Token>> {
        match self {
            Parameter::Undelimited => absorb_undelimited(engine),
            Parameter::Delimited(delimiter) => absorb_delimited(engine, delimiter),
        }
    }
}

fn absorb_undelimited(engine: &mut Engine) -> Option<Vec<Token>> {
    let token = engine.next_token(Context::Default)?;
    match token.value() {
        Value::BeginGroup(_) => {
            let mut result = Vec::new();
            finish_balanced_group(engine, &mut result).then_some(result)
        }
        Value::EndGroup(_) => None,
        _ => Some(vec![token]),
    }
}

fn absorb_delimited(engine: &mut Engine, delimiter: &[Value]) -> Option<Vec<Token>> {
    // A macro whose parameter ends with the special #{ tokens finishes
    // matching with one unclosed begin-group token.
    let closing_depth = match delimiter.last() {
        Some(Value::BeginGroup(_)) => 1,
        _ => 0,
    };
    let mut result: Vec<Token> = Vec::new();
    let mut depth = 0_i32;
    loop {
        let token = engine.next_token(Context::PreSpace)?;
        match token.value() {
            Value::BeginGroup(_) => depth += 1,
            Value::EndGroup(_) => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            _ => (),
        }
        result.push(token);
        if depth == closing_depth && ends_with_values(&result, delimiter) {
            result.truncate(result.len() - delimiter.len());
            if is_single_balanced_group(&result) {
                result.pop();
                result.remove(0);
            }
            return Some(result);
        }
    }
}

fn ends_with_values(tokens: &[Token], values: &[Value]) -> bool {
    if tokens.len() < values.len() {
        return false;
    }
    tokens[tokens.len() - values.len()..]
        .iter()
        .zip(values)
        .all(|(t, v)| t.value() == *v)
}

/// Returns true iff the list is exactly one balanced group: a begin-group
/// token whose matching end-group token is the last token of the list.
fn is_single_balanced_group(tokens: &[Token]) -> bool {
    if tokens.len() < 2 || !matches!(tokens[0].value(), Value::BeginGroup(_)) {
        return false;
    }
    let mut depth = 0_i32;
    for (i, token) in tokens.iter().enumerate() {
        match token.value() {
            Value::BeginGroup(_) => depth += 1,
            Value::EndGroup(_) => {
                depth -= 1;
                if depth == 0 {
                    return i == tokens.len() - 1;
                }
            }
            _ => (),
        }
    }
    false
}

/// Absorbs tokens up to (and not including) the end-group token matching an
/// already-consumed begin-group token.
///
/// Returns false if the input ended before the group was balanced.
pub fn finish_balanced_group(engine: &mut Engine, result: &mut Vec<Token>) -> bool {
    let mut depth = 0_i32;
    loop {
        let Some(token) = engine.next_token(Context::PreSpace) else {
            return false;
        };
        match token.value() {
            Value::BeginGroup(_) => depth += 1,
            Value::EndGroup(_) => {
                if depth == 0 {
                    return true;
                }
                depth -= 1;
            }
            _ => (),
        }
        result.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters(s: &str) -> Vec<Token> {
        s.chars().map(Token::new_letter).collect()
    }

    #[test]
    fn single_balanced_group_detection() {
        let mut group = vec![Token::new_begin_group('{')];
        group.extend(letters("ab"));
        group.push(Token::new_end_group('}'));
        assert!(is_single_balanced_group(&group));

        // {a}{b} is two balanced units.
        let two_groups = vec![
            Token::new_begin_group('{'),
            Token::new_letter('a'),
            Token::new_end_group('}'),
            Token::new_begin_group('{'),
            Token::new_letter('b'),
            Token::new_end_group('}'),
        ];
        assert!(!is_single_balanced_group(&two_groups));

        assert!(!is_single_balanced_group(&letters("ab")));
        assert!(!is_single_balanced_group(&[]));
    }

    #[test]
    fn ends_with_values_checks_suffix() {
        let tokens = letters("abc");
        assert!(ends_with_values(
            &tokens,
            &[Value::Letter('b'), Value::Letter('c')]
        ));
        assert!(!ends_with_values(
            &tokens,
            &[Value::Letter('a'), Value::Letter('c')]
        ));
        assert!(!ends_with_values(&tokens[0..1], &letters("abc").iter().map(|t| t.value()).collect::<Vec<_>>()));
    }
}
