//! # The Mathlang standard library.
//!
//! The structural primitives of the math language, registered through the
//! generic command mechanism of the `mathlang` crate, plus the standard
//! format bootstrapped from a definitions script.

use mathlang::command::Command;
use std::collections::HashMap;

pub mod alias;
pub mod caseshift;
pub mod codes;
pub mod conditional;
pub mod def;
pub mod format;
pub mod mathops;
pub mod prefix;
pub mod registers;
pub mod structures;
pub mod terminator;
pub mod the;

pub use format::{parse_formula, Format};

/// The full set of built-in commands.
pub fn built_in_commands() -> HashMap<&'static str, Command> {
    HashMap::from([
        // Prefixes and assignment machinery.
        ("global", prefix::get_global()),
        ("relax", prefix::get_relax()),
        // Macros and aliases.
        ("def", def::get_def()),
        ("gdef", def::get_gdef()),
        ("let", alias::get_let()),
        ("futurelet", alias::get_futurelet()),
        // Registers and code tables.
        ("count", registers::get_count()),
        ("dimen", registers::get_dimen()),
        ("skip", registers::get_skip()),
        ("muskip", registers::get_muskip()),
        ("countdef", registers::get_countdef()),
        ("thinmuskip", registers::get_thinmuskip()),
        ("medmuskip", registers::get_medmuskip()),
        ("thickmuskip", registers::get_thickmuskip()),
        ("catcode", codes::get_catcode()),
        ("mathcode", codes::get_mathcode()),
        ("lccode", codes::get_lccode()),
        ("uccode", codes::get_uccode()),
        ("the", the::get_the()),
        // Case shifting.
        ("uppercase", caseshift::get_uppercase()),
        ("lowercase", caseshift::get_lowercase()),
        // Conditionals.
        ("iftrue", conditional::get_iftrue()),
        ("iffalse", conditional::get_iffalse()),
        ("ifnum", conditional::get_ifnum()),
        ("ifdim", conditional::get_ifdim()),
        ("ifodd", conditional::get_ifodd()),
        ("if", conditional::get_if()),
        ("ifcat", conditional::get_ifcat()),
        ("ifx", conditional::get_ifx()),
        ("ifcase", conditional::get_ifcase()),
        ("else", conditional::get_else()),
        ("or", conditional::get_or()),
        ("fi", conditional::get_fi()),
        // Math structure.
        ("over", structures::get_over()),
        ("atop", structures::get_atop()),
        ("sqrt", structures::get_sqrt()),
        ("root", structures::get_root()),
        ("of", structures::get_of()),
        ("left", structures::get_left()),
        ("right", structures::get_right()),
        ("halign", structures::get_halign()),
        ("cr", structures::get_cr()),
        ("mathchoice", structures::get_mathchoice()),
        ("hbox", structures::get_hbox()),
        ("vbox", structures::get_vbox()),
        // Families, accents, limits, characters.
        ("mathord", mathops::get_mathord()),
        ("mathop", mathops::get_mathop()),
        ("mathbin", mathops::get_mathbin()),
        ("mathrel", mathops::get_mathrel()),
        ("mathopen", mathops::get_mathopen()),
        ("mathclose", mathops::get_mathclose()),
        ("mathpunct", mathops::get_mathpunct()),
        ("mathinner", mathops::get_mathinner()),
        ("mathaccent", mathops::get_mathaccent()),
        ("limits", mathops::get_limits()),
        ("nolimits", mathops::get_nolimits()),
        ("char", mathops::get_char()),
        ("mathchar", mathops::get_mathchar()),
        // Formula terminators.
        (")", terminator::get_close_inline()),
        ("]", terminator::get_close_display()),
    ])
}
