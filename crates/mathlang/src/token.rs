//! TeX tokens.

use crate::types::CatCode;
use mathcraft_stdext::collections::interner;
use std::num;

/// String type used to represent control sequence names in Mathlang.
///
/// The implementation of this type is opaque so that it can be performance
/// optimized without worrying about downstream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CsName(num::NonZeroU32);

impl interner::Key for CsName {
    fn try_from_usize(index: usize) -> Option<Self> {
        <num::NonZeroU32 as interner::Key>::try_from_usize(index).map(CsName)
    }

    fn into_usize(self) -> usize {
        <num::NonZeroU32 as interner::Key>::into_usize(self.0)
    }
}

/// String interner for control sequence names.
pub type CsNameInterner = interner::Interner<CsName>;

/// The value of a token.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    BeginGroup(char),
    EndGroup(char),
    MathShift(char),
    AlignmentTab(char),
    Parameter(char),
    Superscript(char),
    Subscript(char),
    Space(char),
    Letter(char),
    Other(char),
    CommandRef(CommandRef),
}

/// The value of a token that references a command.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandRef {
    ControlSequence(CsName),
    ActiveCharacter(char),
}

impl CommandRef {
    pub fn to_string(&self, interner: &CsNameInterner) -> String {
        match self {
            CommandRef::ControlSequence(name) => {
                format!("\\{}", interner.resolve(*name).unwrap_or("?"))
            }
            CommandRef::ActiveCharacter(c) => format!("{c}"),
        }
    }
}

impl Value {
    pub fn new(c: char, cat_code: CatCode) -> Value {
        match cat_code {
            CatCode::BeginGroup => Value::BeginGroup(c),
            CatCode::EndGroup => Value::EndGroup(c),
            CatCode::MathShift => Value::MathShift(c),
            CatCode::AlignmentTab => Value::AlignmentTab(c),
            CatCode::Parameter => Value::Parameter(c),
            CatCode::Superscript => Value::Superscript(c),
            CatCode::Subscript => Value::Subscript(c),
            CatCode::Space => Value::Space(c),
            CatCode::Letter => Value::Letter(c),
            CatCode::Other => Value::Other(c),
            CatCode::Active => Value::CommandRef(CommandRef::ActiveCharacter(c)),
            _ => panic!("raw cat code not allowed"),
        }
    }
}

/// A TeX token.
///
/// Tokens carry an `invalid` flag.
/// A token is marked invalid when the engine could not make sense of it
/// (an undefined command, a malformed macro call, a structural mismatch);
/// processing always continues, and the flag survives into the atom tree
/// so a renderer can paint the offending material.
/// The flag does not participate in token equality.
#[derive(Debug, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    value: Value,
    invalid: bool,
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl std::hash::Hash for Token {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

macro_rules! token_constructor {
    ($name: ident, $value: expr) => {
        pub fn $name(c: char) -> Token {
            Token {
                value: $value(c),
                invalid: false,
            }
        }
    };
}

impl Token {
    token_constructor!(new_begin_group, Value::BeginGroup);
    token_constructor!(new_end_group, Value::EndGroup);
    token_constructor!(new_math_shift, Value::MathShift);
    token_constructor!(new_alignment_tab, Value::AlignmentTab);
    token_constructor!(new_parameter, Value::Parameter);
    token_constructor!(new_superscript, Value::Superscript);
    token_constructor!(new_subscript, Value::Subscript);
    token_constructor!(new_space, Value::Space);
    token_constructor!(new_letter, Value::Letter);
    token_constructor!(new_other, Value::Other);

    pub fn new_active_character(c: char) -> Token {
        Token {
            value: Value::CommandRef(CommandRef::ActiveCharacter(c)),
            invalid: false,
        }
    }

    pub fn new_control_sequence(name: CsName) -> Token {
        Token {
            value: Value::CommandRef(CommandRef::ControlSequence(name)),
            invalid: false,
        }
    }

    pub fn new_from_value(value: Value) -> Token {
        Token {
            value,
            invalid: false,
        }
    }

    #[inline]
    pub fn value(&self) -> Value {
        self.value
    }

    #[inline]
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    /// Returns a copy of this token with the invalid flag set.
    pub fn into_invalid(mut self) -> Token {
        self.invalid = true;
        self
    }

    pub fn char(&self) -> Option<char> {
        match self.value {
            Value::BeginGroup(c)
            | Value::EndGroup(c)
            | Value::MathShift(c)
            | Value::AlignmentTab(c)
            | Value::Parameter(c)
            | Value::Superscript(c)
            | Value::Subscript(c)
            | Value::Space(c)
            | Value::Letter(c)
            | Value::Other(c) => Some(c),
            Value::CommandRef(CommandRef::ControlSequence(_)) => None,
            Value::CommandRef(CommandRef::ActiveCharacter(c)) => Some(c),
        }
    }

    pub fn cat_code(&self) -> Option<CatCode> {
        match self.value {
            Value::BeginGroup(_) => Some(CatCode::BeginGroup),
            Value::EndGroup(_) => Some(CatCode::EndGroup),
            Value::MathShift(_) => Some(CatCode::MathShift),
            Value::AlignmentTab(_) => Some(CatCode::AlignmentTab),
            Value::Parameter(_) => Some(CatCode::Parameter),
            Value::Superscript(_) => Some(CatCode::Superscript),
            Value::Subscript(_) => Some(CatCode::Subscript),
            Value::Space(_) => Some(CatCode::Space),
            Value::Letter(_) => Some(CatCode::Letter),
            Value::Other(_) => Some(CatCode::Other),
            Value::CommandRef(CommandRef::ControlSequence(_)) => None,
            Value::CommandRef(CommandRef::ActiveCharacter(_)) => Some(CatCode::Active),
        }
    }
}

/// Write a collection of tokens to a string.
///
/// Intended for tests and debug output.
pub fn write_tokens<'a, T>(tokens: T, interner: &CsNameInterner) -> String
where
    T: IntoIterator<Item = &'a Token>,
{
    let mut out = String::new();
    for token in tokens {
        match token.value() {
            Value::CommandRef(command_ref) => {
                out.push_str(&command_ref.to_string(interner));
                out.push(' ');
            }
            _ => out.push(token.char().unwrap()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_flag_does_not_affect_equality() {
        let a = Token::new_letter('a');
        assert_eq!(a, a.into_invalid());
        assert!(a.into_invalid().is_invalid());
        assert!(!a.is_invalid());
    }

    #[test]
    fn token_size() {
        assert_eq!(std::mem::size_of::<Value>(), 8);
        assert_eq!(std::mem::size_of::<Option<Token>>(), 12);
    }

    #[test]
    fn write_control_sequence() {
        let mut interner = CsNameInterner::default();
        let name = interner.get_or_intern("frac");
        let tokens = vec![
            Token::new_control_sequence(name),
            Token::new_letter('x'),
            Token::new_other('2'),
        ];
        assert_eq!(write_tokens(&tokens, &interner), "\\frac x2");
    }
}
