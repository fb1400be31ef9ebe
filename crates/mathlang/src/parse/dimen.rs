//! Dimension scanning.
//!
//! A dimension is a sign, a factor (or a register supplying factor and
//! unit at once), and a unit keyword.
//! The `em` and `ex` units produce font-relative dimensions; everything
//! else converts exactly to scaled points.

use crate::command::Command;
use crate::engine::Engine;
use crate::expand::next_expanded;
use crate::mouth::Context;
use crate::token::Value as TokenValue;
use crate::variable;
use units::{fixed_from_decimal_digits, Dimen, MuDimen, PhysicalUnit, Value, UNITY};

/// Scans a dimension, or returns [None] leaving the mouth unchanged.
pub fn scan_dimen(engine: &mut Engine) -> Option<Dimen> {
    let checkpoint = engine.mouth.checkpoint();
    match scan_dimen_inner(engine) {
        Some(d) => Some(d),
        None => {
            engine.mouth.rewind(checkpoint);
            None
        }
    }
}

/// Scans a mu dimension (a factor followed by the `mu` unit), or returns
/// [None] leaving the mouth unchanged.
pub fn scan_mu_dimen(engine: &mut Engine) -> Option<MuDimen> {
    let checkpoint = engine.mouth.checkpoint();
    match scan_mu_dimen_inner(engine) {
        Some(d) => Some(d),
        None => {
            engine.mouth.rewind(checkpoint);
            None
        }
    }
}

fn scan_dimen_inner(engine: &mut Engine) -> Option<Dimen> {
    let negative = super::scan_optional_signs(engine);
    // A register can supply both the factor and the unit at once.
    let factor = match scan_internal_value(engine) {
        Some(Value::Dimen(d)) => {
            return Some(if negative { -d } else { d });
        }
        Some(Value::Glue(g)) => {
            return Some(if negative { -g.start } else { g.start });
        }
        Some(Value::Int(i)) => i.get().saturating_mul(UNITY),
        Some(_) => return None,
        None => scan_factor(engine)?,
    };
    let d = scan_unit_and_apply(engine, factor)?;
    Some(if negative { -d } else { d })
}

fn scan_mu_dimen_inner(engine: &mut Engine) -> Option<MuDimen> {
    let negative = super::scan_optional_signs(engine);
    let factor = match scan_internal_value(engine) {
        Some(Value::MuDimen(d)) => {
            return Some(if negative { -d } else { d });
        }
        Some(Value::MuGlue(g)) => {
            return Some(if negative { -g.start } else { g.start });
        }
        Some(Value::Int(i)) => i.get().saturating_mul(UNITY),
        Some(_) => return None,
        None => scan_factor(engine)?,
    };
    // An internal mu value can serve as the unit: `2\thinmuskip`.
    if let Some(value) = scan_internal_value(engine) {
        let base = match value {
            Value::MuDimen(d) => d,
            Value::MuGlue(g) => g.start,
            _ => return None,
        };
        let d = MuDimen::new(units::scale_fraction(base.mu, factor, UNITY));
        return Some(if negative { -d } else { d });
    }
    if !super::scan_keyword(engine, "mu") {
        return None;
    }
    super::scan_optional_space(engine);
    let d = MuDimen::new(factor);
    Some(if negative { -d } else { d })
}

/// Scans a factor: an unsigned integer or decimal fraction, scaled by 2^16.
///
/// Octal, hexadecimal and character-code constants are accepted wherever a
/// decimal constant is.
pub(crate) fn scan_factor(engine: &mut Engine) -> Option<i64> {
    let checkpoint = engine.mouth.checkpoint();
    let token = next_expanded(engine, Context::Default)?;
    let integer_part = match token.value() {
        TokenValue::Other('.' | ',') => 0,
        TokenValue::Other('0'..='9') => {
            engine.mouth.push_back(token);
            let i = super::scan_int(engine)?;
            // scan_int consumed an optional trailing space; a fraction part
            // must be glued directly to the digits, so probe for it here.
            match probe_fraction_separator(engine) {
                true => i.get(),
                false => return Some(i.get().saturating_mul(UNITY)),
            }
        }
        TokenValue::Other('\'' | '"' | '`') => {
            engine.mouth.push_back(token);
            let i = super::scan_int(engine)?;
            return Some(i.get().saturating_mul(UNITY));
        }
        _ => {
            engine.mouth.rewind(checkpoint);
            return None;
        }
    };
    let mut digits = Vec::new();
    loop {
        match next_expanded(engine, Context::PreSpace) {
            Some(token) => match token.value() {
                TokenValue::Other(c @ '0'..='9') => digits.push(c as u8 - b'0'),
                _ => {
                    engine.mouth.push_back(token);
                    break;
                }
            },
            None => break,
        }
    }
    Some(
        integer_part
            .saturating_mul(UNITY)
            .saturating_add(fixed_from_decimal_digits(&digits)),
    )
}

fn probe_fraction_separator(engine: &mut Engine) -> bool {
    match next_expanded(engine, Context::PreSpace) {
        Some(token) if matches!(token.value(), TokenValue::Other('.' | ',')) => true,
        Some(token) => {
            engine.mouth.push_back(token);
            false
        }
        None => false,
    }
}

fn scan_unit_and_apply(engine: &mut Engine, factor: i64) -> Option<Dimen> {
    // An internal dimension can serve as the unit: `1.5\dimen0`.
    if let Some(value) = scan_internal_value(engine) {
        let base = match value {
            Value::Dimen(d) => d,
            Value::Glue(g) => g.start,
            // An internal integer in unit position means scaled points.
            Value::Int(i) => Dimen {
                sp: i.get(),
                em: 0,
            },
            _ => return None,
        };
        return Some(base.scale(factor, UNITY));
    }
    // The `true` prefix is accepted and ignored: there is no magnification
    // grid before rendering.
    let _ = super::scan_keyword(engine, "true");
    let d = if super::scan_keyword(engine, "em") {
        Dimen::from_ems(factor)
    } else if super::scan_keyword(engine, "ex") {
        Dimen::from_exes(factor)
    } else {
        use PhysicalUnit::*;
        let unit = [
            Point,
            Pica,
            Inch,
            BigPoint,
            Centimeter,
            Millimeter,
            DidotPoint,
            ScaledPoint,
        ]
        .into_iter()
        .find(|unit| super::scan_keyword(engine, unit.keyword()))?;
        Dimen::from_units(factor, unit)
    };
    super::scan_optional_space(engine);
    Some(d)
}

/// Reads a value-yielding command token, or rewinds and returns [None].
fn scan_internal_value(engine: &mut Engine) -> Option<Value> {
    let checkpoint = engine.mouth.checkpoint();
    let result = (|| {
        let token = next_expanded(engine, Context::Default)?;
        let TokenValue::CommandRef(command_ref) = token.value() else {
            return None;
        };
        match engine.resolve_command(&command_ref)? {
            Command::Variable(cmd) => variable::read(engine, &cmd),
            _ => None,
        }
    })();
    if result.is_none() {
        engine.mouth.rewind(checkpoint);
    }
    result
}
