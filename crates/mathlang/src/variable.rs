//! Variable commands.
//!
//! A variable command references a mutable cell in the scope stack: a
//! numbered register, a code-table entry, or a named value register.
//! In a numeric-grammar context a bare reference reads the cell's value;
//! at the top level it begins an assignment (`\count0=5`).

use crate::engine::Engine;
use crate::parse;
use crate::token::Token;
use crate::types::{CatCode, MathClass};
use mathcraft_stdext::collections::scopedmap::Scope;
use units::{Int, Value};

/// How a command determines the index of the register it refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    /// The index is parsed from the input, as in `\count 4`.
    Scan,
    /// The index is fixed, as in a command created by `\countdef\A 4`.
    Fixed(u16),
}

/// A command that references a mutable cell in the scope stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariableCommand {
    /// An integer register (`\count`).
    Count(Index),
    /// A dimension register (`\dimen`).
    Dimen(Index),
    /// A glue register (`\skip`).
    Skip(Index),
    /// A mu-glue register (`\muskip`).
    MuSkip(Index),
    /// A category code table entry (`\catcode`).
    CatCode,
    /// A math code table entry (`\mathcode`).
    MathCode,
    /// A lowercase code table entry (`\lccode`).
    LcCode,
    /// An uppercase code table entry (`\uccode`).
    UcCode,
    /// A named value register such as `\thinmuskip`.
    ///
    /// The default doubles as the type: assignments parse a value of the
    /// same kind as the default.
    Named { slot: u16, default: Value },
}

/// Reads the current value of the variable, scanning an index from the
/// input if the command requires one.
///
/// Returns [None] if the index fails to parse; the mouth is left wherever
/// the index scan left it (the caller holds the enclosing checkpoint).
pub fn read(engine: &mut Engine, cmd: &VariableCommand) -> Option<Value> {
    Some(match cmd {
        VariableCommand::Count(index) => {
            let i = resolve(engine, index)?;
            Value::Int(engine.scopes.count(i))
        }
        VariableCommand::Dimen(index) => {
            let i = resolve(engine, index)?;
            Value::Dimen(engine.scopes.dimen(i))
        }
        VariableCommand::Skip(index) => {
            let i = resolve(engine, index)?;
            Value::Glue(engine.scopes.skip(i))
        }
        VariableCommand::MuSkip(index) => {
            let i = resolve(engine, index)?;
            Value::MuGlue(engine.scopes.mu_skip(i))
        }
        VariableCommand::CatCode => {
            let c = resolve_char(engine)?;
            Value::Int(Int::new(engine.scopes.cat_code(c) as i64))
        }
        VariableCommand::MathCode => {
            let c = resolve_char(engine)?;
            Value::Int(Int::new(engine.scopes.math_code(c) as i64))
        }
        VariableCommand::LcCode => {
            let c = resolve_char(engine)?;
            Value::Int(Int::new(engine.scopes.lc_code(c) as i64))
        }
        VariableCommand::UcCode => {
            let c = resolve_char(engine)?;
            Value::Int(Int::new(engine.scopes.uc_code(c) as i64))
        }
        VariableCommand::Named { slot, default } => {
            engine.scopes.named_value(*slot).unwrap_or(*default)
        }
    })
}

/// Performs an assignment to the variable: scans the index if needed, an
/// optional equals sign, and a value of the variable's type.
///
/// On failure the mouth is rewound to before the first scanned token and
/// false is returned; the caller marks the command token invalid.
/// The `\global` prefix flag is consumed either way.
pub fn assign(engine: &mut Engine, token: Token, cmd: &VariableCommand) -> bool {
    let _ = token;
    let checkpoint = engine.mouth.checkpoint();
    let scope = engine.take_global();
    let ok = assign_inner(engine, cmd, scope);
    if !ok {
        engine.mouth.rewind(checkpoint);
    }
    ok
}

fn assign_inner(engine: &mut Engine, cmd: &VariableCommand, scope: Scope) -> bool {
    match cmd {
        VariableCommand::Count(index) => {
            let (Some(i), _, Some(value)) = scan_index_equals_value(engine, index, parse::scan_int)
            else {
                return false;
            };
            engine.scopes.counts.insert(i, value, scope);
        }
        VariableCommand::Dimen(index) => {
            let (Some(i), _, Some(value)) =
                scan_index_equals_value(engine, index, parse::scan_dimen)
            else {
                return false;
            };
            engine.scopes.dimens.insert(i, value, scope);
        }
        VariableCommand::Skip(index) => {
            let (Some(i), _, Some(value)) = scan_index_equals_value(engine, index, parse::scan_glue)
            else {
                return false;
            };
            engine.scopes.skips.insert(i, value, scope);
        }
        VariableCommand::MuSkip(index) => {
            let (Some(i), _, Some(value)) =
                scan_index_equals_value(engine, index, parse::scan_mu_glue)
            else {
                return false;
            };
            engine.scopes.mu_skips.insert(i, value, scope);
        }
        VariableCommand::CatCode => {
            let Some(c) = resolve_char(engine) else {
                return false;
            };
            parse::scan_optional_equals(engine);
            let Some(value) = parse::scan_int(engine) else {
                return false;
            };
            // Code values are clamped to their legal range.
            let code: CatCode = (value.get().clamp(0, 15) as u8).try_into().unwrap();
            engine.scopes.set_cat_code(c, code, scope);
        }
        VariableCommand::MathCode => {
            let Some(c) = resolve_char(engine) else {
                return false;
            };
            parse::scan_optional_equals(engine);
            let Some(value) = parse::scan_int(engine) else {
                return false;
            };
            let class: MathClass = (value.get().clamp(0, 7) as u8).try_into().unwrap();
            engine.scopes.set_math_code(c, class, scope);
        }
        VariableCommand::LcCode | VariableCommand::UcCode => {
            let Some(c) = resolve_char(engine) else {
                return false;
            };
            parse::scan_optional_equals(engine);
            let Some(to) = resolve_char(engine) else {
                return false;
            };
            match cmd {
                VariableCommand::LcCode => engine.scopes.set_lc_code(c, to, scope),
                _ => engine.scopes.set_uc_code(c, to, scope),
            }
        }
        VariableCommand::Named { slot, default } => {
            parse::scan_optional_equals(engine);
            let current = engine.scopes.named_value(*slot).unwrap_or(*default);
            let value = match current {
                Value::Int(_) => parse::scan_int(engine).map(Value::Int),
                Value::Dimen(_) => parse::scan_dimen(engine).map(Value::Dimen),
                Value::MuDimen(_) => parse::scan_mu_dimen(engine).map(Value::MuDimen),
                Value::Glue(_) => parse::scan_glue(engine).map(Value::Glue),
                Value::MuGlue(_) => parse::scan_mu_glue(engine).map(Value::MuGlue),
                Value::InfDimen(_) => None,
            };
            let Some(value) = value else {
                return false;
            };
            engine.scopes.named_values.insert(*slot, value, scope);
        }
    }
    true
}

type IndexEqualsValue<T> = (Option<u16>, (), Option<T>);

fn scan_index_equals_value<T>(
    engine: &mut Engine,
    index: &Index,
    scan_value: fn(&mut Engine) -> Option<T>,
) -> IndexEqualsValue<T> {
    let Some(i) = resolve(engine, index) else {
        return (None, (), None);
    };
    parse::scan_optional_equals(engine);
    (Some(i), (), scan_value(engine))
}

fn resolve(engine: &mut Engine, index: &Index) -> Option<u16> {
    match index {
        Index::Fixed(i) => Some(*i),
        Index::Scan => {
            let i = parse::scan_int(engine)?;
            u16::try_from(i.get()).ok()
        }
    }
}

fn resolve_char(engine: &mut Engine) -> Option<char> {
    let i = parse::scan_int(engine)?;
    u32::try_from(i.get()).ok().and_then(char::from_u32)
}
