//! Family modifiers, accents, limit controls and character commands.

use mathlang::command::Command;
use mathlang::mathlist::{Atom, AtomClass, BoxKind, Item, LimitsMode};
use mathlang::parse;
use mathlang::prelude::*;

macro_rules! family_primitive {
    ($get: ident, $fn_name: ident, $class: expr) => {
        pub fn $get() -> Command {
            Command::new_execution($fn_name)
        }

        fn $fn_name(token: Token, engine: &mut Engine) -> bool {
            engine.builder.push_marker(Item::Family($class, token));
            true
        }
    };
}

family_primitive![get_mathord, mathord_fn, AtomClass::Ord];
family_primitive![get_mathop, mathop_fn, AtomClass::Op];
family_primitive![get_mathbin, mathbin_fn, AtomClass::Bin];
family_primitive![get_mathrel, mathrel_fn, AtomClass::Rel];
family_primitive![get_mathopen, mathopen_fn, AtomClass::Open];
family_primitive![get_mathclose, mathclose_fn, AtomClass::Close];
family_primitive![get_mathpunct, mathpunct_fn, AtomClass::Punct];
family_primitive![get_mathinner, mathinner_fn, AtomClass::Inner];

/// Get the `\mathaccent` command. The accent character code is scanned
/// from the input; the accent wraps the next atom.
pub fn get_mathaccent() -> Command {
    Command::new_execution(mathaccent_fn)
}

fn mathaccent_fn(token: Token, engine: &mut Engine) -> bool {
    let Some(c) = scan_char(engine) else {
        return false;
    };
    engine.builder.push_marker(Item::Accent(c, token));
    true
}

/// Get the `\limits` command.
pub fn get_limits() -> Command {
    Command::new_execution(limits_fn)
}

fn limits_fn(token: Token, engine: &mut Engine) -> bool {
    engine
        .builder
        .push_marker(Item::Limits(LimitsMode::Limits, token));
    true
}

/// Get the `\nolimits` command.
pub fn get_nolimits() -> Command {
    Command::new_execution(nolimits_fn)
}

fn nolimits_fn(token: Token, engine: &mut Engine) -> bool {
    engine
        .builder
        .push_marker(Item::Limits(LimitsMode::NoLimits, token));
    true
}

/// Get the `\char` command: an atom for an arbitrary character code,
/// classed by its math code.
pub fn get_char() -> Command {
    Command::new_execution(char_fn)
}

fn char_fn(_: Token, engine: &mut Engine) -> bool {
    let Some(c) = scan_char(engine) else {
        return false;
    };
    engine.push_char_atom(c);
    true
}

/// Get the `\mathchar` command: an atom for a character code with an
/// explicit class, encoded as `class * 256 + character`.
pub fn get_mathchar() -> Command {
    Command::new_execution(mathchar_fn)
}

fn mathchar_fn(_: Token, engine: &mut Engine) -> bool {
    let Some(code) = parse::scan_int(engine) else {
        return false;
    };
    let code = code.get();
    if code < 0 {
        return false;
    }
    let Ok(class) = MathClass::try_from(((code / 256) % 8) as u8) else {
        return false;
    };
    let Some(c) = char::from_u32((code % 256) as u32) else {
        return false;
    };
    engine.builder.push_atom(Atom::symbol(c, class));
    true
}

/// Used by `\hbox` and `\vbox` in the structures module.
pub(crate) fn box_marker(engine: &mut Engine, kind: BoxKind, token: Token) -> bool {
    let to = match parse::scan_keyword(engine, "to") {
        true => match parse::scan_dimen(engine) {
            Some(d) => Some(d),
            None => return false,
        },
        false => None,
    };
    engine.builder.push_marker(Item::Box(kind, to, token));
    true
}

fn scan_char(engine: &mut Engine) -> Option<char> {
    let code = parse::scan_int(engine)?;
    u32::try_from(code.get()).ok().and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use mathlang_testing::*;

    fn built_in_commands() -> std::collections::HashMap<&'static str, mathlang::command::Command> {
        crate::built_in_commands()
    }

    test_suite![
        tree_equality_tests(
            // ` \char` builds the same atom as typing the character.
            (char_builds_plain_atom, r"\char`\x", "x"),
            (char_hexadecimal, "\\char\"78 ", "x"),
            (
                mathchar_class_and_code,
                // Class 2 (Bin) code of +: same atom as typing +.
                "\\mathchar\"22B ",
                "+"
            ),
        ),
        invalid_token_tests(
            (limits_without_operator, r"x\limits", 1),
            (mathaccent_without_code, r"\mathaccent x", 1),
        ),
    ];
}
