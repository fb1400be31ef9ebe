//! Integer scanning.
//!
//! An integer is an optional run of signs followed by one of: a decimal
//! constant, a `'`-prefixed octal constant, a `"`-prefixed hexadecimal
//! constant, a `` ` ``-prefixed character code, or a command that yields a
//! coercible value.

use crate::command::Command;
use crate::engine::Engine;
use crate::expand::next_expanded;
use crate::mouth::Context;
use crate::token::{CommandRef, Value};
use crate::variable;
use units::Int;

/// Scans an integer, or returns [None] leaving the mouth unchanged.
pub fn scan_int(engine: &mut Engine) -> Option<Int> {
    let checkpoint = engine.mouth.checkpoint();
    match scan_int_inner(engine) {
        Some(i) => Some(i),
        None => {
            engine.mouth.rewind(checkpoint);
            None
        }
    }
}

fn scan_int_inner(engine: &mut Engine) -> Option<Int> {
    let negative = scan_optional_signs(engine);
    let first = next_expanded(engine, Context::Default)?;
    let magnitude = match first.value() {
        // The optional trailing space (or \relax) belongs to literal
        // constants only; a value read from a register ends by itself.
        Value::Other(c @ '0'..='9') => {
            let i = scan_constant(engine, 10, digit_value(c, 10).unwrap());
            super::scan_number_end(engine);
            i
        }
        Value::Other('\'') => {
            let i = scan_constant_with_required_digit(engine, 8)?;
            super::scan_number_end(engine);
            i
        }
        Value::Other('"') => {
            let i = scan_constant_with_required_digit(engine, 16)?;
            super::scan_number_end(engine);
            i
        }
        Value::Other('`') => {
            let i = scan_character_code(engine)?;
            super::scan_number_end(engine);
            i
        }
        Value::CommandRef(command_ref) => scan_internal_int(engine, &command_ref)?,
        _ => return None,
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// Scans an optional run of `+` and `-` signs.
/// Returns true if the product of the signs is negative.
pub(crate) fn scan_optional_signs(engine: &mut Engine) -> bool {
    let mut negative = false;
    loop {
        match next_expanded(engine, Context::Default) {
            Some(token) => match token.value() {
                Value::Other('+') => (),
                Value::Other('-') => negative = !negative,
                _ => {
                    engine.mouth.push_back(token);
                    return negative;
                }
            },
            None => return negative,
        }
    }
}

fn scan_constant(engine: &mut Engine, radix: i64, first_digit: i64) -> Int {
    let mut result = Int::new(first_digit);
    loop {
        let Some(token) = next_expanded(engine, Context::PreSpace) else {
            break;
        };
        let digit = match token.value() {
            Value::Other(c) => digit_value(c, radix),
            // The A-F hexadecimal digits usually have category letter.
            Value::Letter(c) if radix == 16 => digit_value(c, radix),
            _ => None,
        };
        match digit {
            Some(d) => {
                // Clamp on overflow and keep consuming digits.
                result = result
                    .checked_append_digit(radix, d)
                    .unwrap_or(Int::new(if result >= Int::ZERO {
                        Int::MAX_MAGNITUDE
                    } else {
                        -Int::MAX_MAGNITUDE
                    }));
            }
            None => {
                // Push the token back rather than rewinding over it, so any
                // expansion performed looking ahead is not re-run.
                engine.mouth.push_back(token);
                break;
            }
        }
    }
    result
}

fn scan_constant_with_required_digit(engine: &mut Engine, radix: i64) -> Option<Int> {
    let token = next_expanded(engine, Context::Default)?;
    let first = match token.value() {
        Value::Other(c) => digit_value(c, radix),
        Value::Letter(c) if radix == 16 => digit_value(c, radix),
        _ => None,
    };
    match first {
        Some(d) => Some(scan_constant(engine, radix, d)),
        None => {
            engine.mouth.push_back(token);
            None
        }
    }
}

/// Scans the character after a backtick: a character token, or a control
/// sequence whose name is a single character.
fn scan_character_code(engine: &mut Engine) -> Option<Int> {
    let token = engine.next_token(Context::Default)?;
    let c = match token.value() {
        Value::CommandRef(CommandRef::ControlSequence(name)) => {
            let name = engine.interner.resolve(name)?;
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return None,
            }
        }
        _ => token.char()?,
    };
    Some(Int::new(c as i64))
}

/// Reads an integer from a command that yields a value: a register or code
/// table reference. Dimensions and glue coerce to their integer value.
fn scan_internal_int(engine: &mut Engine, command_ref: &CommandRef) -> Option<Int> {
    match engine.resolve_command(command_ref)? {
        Command::Variable(cmd) => variable::read(engine, &cmd)?.to_int(),
        _ => None,
    }
}

fn digit_value(c: char, radix: i64) -> Option<i64> {
    let d = match c {
        '0'..='9' => c as i64 - '0' as i64,
        'A'..='F' => c as i64 - 'A' as i64 + 10,
        _ => return None,
    };
    if d < radix {
        Some(d)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::digit_value;

    #[test]
    fn digit_values() {
        assert_eq!(digit_value('0', 10), Some(0));
        assert_eq!(digit_value('7', 8), Some(7));
        assert_eq!(digit_value('8', 8), None);
        assert_eq!(digit_value('F', 16), Some(15));
        assert_eq!(digit_value('F', 10), None);
        assert_eq!(digit_value('g', 16), None);
    }
}
