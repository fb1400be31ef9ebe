//! The `\if` family of conditionals.
//!
//! Each flavor computes a boolean and delegates branch selection to the
//! evaluator in `mathlang::conditional`.
//! All the flavors share one command tag so that skipped branches can
//! balance nested conditionals without knowing which flavor opened them.

use mathlang::command::{commands_equal, Command};
use mathlang::conditional::{
    else_fn, else_tag, false_case, fi_fn, fi_tag, if_tag, or_fn, or_tag, switch_case, true_case,
};
use mathlang::next_expanded;
use mathlang::parse;
use mathlang::prelude::*;

pub fn get_iftrue() -> Command {
    Command::new_expansion(iftrue_fn).with_tag(if_tag())
}

pub fn get_iffalse() -> Command {
    Command::new_expansion(iffalse_fn).with_tag(if_tag())
}

pub fn get_ifnum() -> Command {
    Command::new_expansion(ifnum_fn).with_tag(if_tag())
}

pub fn get_ifdim() -> Command {
    Command::new_expansion(ifdim_fn).with_tag(if_tag())
}

pub fn get_ifodd() -> Command {
    Command::new_expansion(ifodd_fn).with_tag(if_tag())
}

pub fn get_if() -> Command {
    Command::new_expansion(if_fn).with_tag(if_tag())
}

pub fn get_ifcat() -> Command {
    Command::new_expansion(ifcat_fn).with_tag(if_tag())
}

pub fn get_ifx() -> Command {
    Command::new_expansion(ifx_fn).with_tag(if_tag())
}

pub fn get_ifcase() -> Command {
    Command::new_expansion(ifcase_fn).with_tag(if_tag())
}

pub fn get_else() -> Command {
    Command::new_expansion(else_fn).with_tag(else_tag())
}

pub fn get_or() -> Command {
    Command::new_expansion(or_fn).with_tag(or_tag())
}

pub fn get_fi() -> Command {
    Command::new_expansion(fi_fn).with_tag(fi_tag())
}

fn branch(token: Token, engine: &mut Engine, condition: bool) -> bool {
    match condition {
        true => true_case(token, engine),
        false => false_case(token, engine),
    }
}

fn iftrue_fn(token: Token, engine: &mut Engine) -> bool {
    branch(token, engine, true)
}

fn iffalse_fn(token: Token, engine: &mut Engine) -> bool {
    branch(token, engine, false)
}

fn ifnum_fn(token: Token, engine: &mut Engine) -> bool {
    let Some(a) = parse::scan_int(engine) else {
        return false;
    };
    let Some(relation) = scan_relation(engine) else {
        return false;
    };
    let Some(b) = parse::scan_int(engine) else {
        return false;
    };
    branch(token, engine, a.cmp(&b) == relation)
}

fn ifdim_fn(token: Token, engine: &mut Engine) -> bool {
    let Some(a) = parse::scan_dimen(engine) else {
        return false;
    };
    let Some(relation) = scan_relation(engine) else {
        return false;
    };
    let Some(b) = parse::scan_dimen(engine) else {
        return false;
    };
    branch(token, engine, a.to_int().cmp(&b.to_int()) == relation)
}

fn ifodd_fn(token: Token, engine: &mut Engine) -> bool {
    let Some(n) = parse::scan_int(engine) else {
        return false;
    };
    branch(token, engine, n.is_odd())
}

fn if_fn(token: Token, engine: &mut Engine) -> bool {
    let (Some(t1), Some(t2)) = (
        next_expanded(engine, Context::Default),
        next_expanded(engine, Context::Default),
    ) else {
        return false;
    };
    // Two character tokens compare by character; any two unexpandable
    // commands compare equal to each other and unequal to characters.
    branch(token, engine, t1.char() == t2.char())
}

fn ifcat_fn(token: Token, engine: &mut Engine) -> bool {
    let (Some(t1), Some(t2)) = (
        next_expanded(engine, Context::Default),
        next_expanded(engine, Context::Default),
    ) else {
        return false;
    };
    branch(token, engine, t1.cat_code() == t2.cat_code())
}

fn ifx_fn(token: Token, engine: &mut Engine) -> bool {
    let (Some(t1), Some(t2)) = (
        engine.next_token(Context::Default),
        engine.next_token(Context::Default),
    ) else {
        return false;
    };
    let equal = tokens_mean_same(engine, t1, t2);
    branch(token, engine, equal)
}

fn tokens_mean_same(engine: &Engine, t1: Token, t2: Token) -> bool {
    match (t1.value(), t2.value()) {
        (Value::CommandRef(r1), Value::CommandRef(r2)) => {
            match (engine.scopes.lookup(&r1), engine.scopes.lookup(&r2)) {
                // Two undefined names have the same (non-)meaning.
                (None, None) => true,
                (Some(a), Some(b)) => commands_equal(a, b),
                _ => false,
            }
        }
        // A character token means the same as a name \let to it.
        (Value::CommandRef(r), v) | (v, Value::CommandRef(r)) => {
            match engine.scopes.lookup(&r) {
                Some(cmd) => matches!(cmd.resolved(), Command::CharacterAlias(av) if *av == v),
                None => false,
            }
        }
        (v1, v2) => v1 == v2,
    }
}

fn ifcase_fn(token: Token, engine: &mut Engine) -> bool {
    let Some(index) = parse::scan_int(engine) else {
        return false;
    };
    switch_case(token, engine, index.get())
}

fn scan_relation(engine: &mut Engine) -> Option<std::cmp::Ordering> {
    let token = next_expanded(engine, Context::Default)?;
    match token.value() {
        Value::Other('<') => Some(std::cmp::Ordering::Less),
        Value::Other('=') => Some(std::cmp::Ordering::Equal),
        Value::Other('>') => Some(std::cmp::Ordering::Greater),
        _ => {
            engine.mouth.push_back(token);
            None
        }
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
            (iftrue_takes_true_branch, r"\iftrue A\else B\fi", "A"),
            (iffalse_takes_else_branch, r"\iffalse A\else B\fi", "B"),
            (iftrue_no_else, r"\iftrue A\fi c", "Ac"),
            (iffalse_no_else, r"\iffalse A\fi c", "c"),
            (
                skipped_branch_balances_nested_ifs,
                r"\iffalse\iftrue x\fi A\else C\fi",
                "C"
            ),
            (
                true_branch_with_nested_conditional,
                r"\iftrue a\iffalse b\else c\fi d\else e\fi f",
                "acdf"
            ),
            (ifnum_less_true, r"\ifnum 4<5 a\else b\fi", "a"),
            (ifnum_less_false, r"\ifnum 5<4 a\else b\fi", "b"),
            (ifnum_equal, r"\ifnum 4=4 a\else b\fi", "a"),
            (ifnum_greater, r"\ifnum 5>4 a\else b\fi", "a"),
            (
                ifnum_reads_registers,
                r"\count0=3 \ifnum\count0>2 a\else b\fi",
                "a"
            ),
            (ifodd_odd, r"\ifodd 3 a\else b\fi", "a"),
            (ifodd_even, r"\ifodd 4 a\else b\fi", "b"),
            (ifdim_true, r"\ifdim 1pt<1in a\else b\fi", "a"),
            (ifdim_false, r"\ifdim 1in<1pt a\else b\fi", "b"),
            (if_same_characters, r"\if aa T\else F\fi", "T"),
            (if_different_characters, r"\if ab T\else F\fi", "F"),
            (
                if_expands_its_operands,
                r"\def\x{a}\if a\x T\else F\fi",
                "T"
            ),
            (
                ifcat_same_category,
                r"\ifcat ab T\else F\fi",
                "T"
            ),
            (
                ifcat_different_category,
                r"\ifcat a1 T\else F\fi",
                "F"
            ),
            (
                ifx_equal_macros,
                r"\def\a{z}\def\b{z}\ifx\a\b T\else F\fi",
                "T"
            ),
            (
                ifx_different_macros,
                r"\def\a{z}\def\b{w}\ifx\a\b T\else F\fi",
                "F"
            ),
            (
                ifx_does_not_expand,
                r"\def\a{z}\ifx\a z T\else F\fi",
                "F"
            ),
            (
                ifx_let_alias_matches_primitive,
                r"\let\endconditional=\fi \ifx\endconditional\fi T\else F\fi",
                "T"
            ),
            (
                ifx_both_undefined,
                r"\ifx\nosucha\nosuchb T\else F\fi",
                "T"
            ),
            (ifcase_zero, r"\ifcase 0 a\or b\else c\fi", "a"),
            (ifcase_one, r"\ifcase 1 a\or b\else c\fi", "b"),
            (ifcase_else, r"\ifcase 2 a\or b\else c\fi", "c"),
            (ifcase_negative, r"\ifcase-1 a\or b\else c\fi", "c"),
            (
                ifcase_no_matching_case,
                r"\ifcase 3 a\or b\or c\fi d",
                "d"
            ),
            (
                ifcase_nested,
                r"\ifcase 1 a\or b\ifcase 1 c\or d\or e\else f\fi g\or h\fi i",
                "bdgi"
            ),
            (
                renamed_fi_balances_skip,
                r"\let\endif\fi \iffalse a\endif b",
                "b"
            ),
        ),
        invalid_token_tests(
            (stray_else, r"a\else b", 1),
            (stray_fi, r"a\fi b", 1),
            (stray_or, r"a\or b", 1),
        ),
        failure_tests(
            // The skip of the false branch swallows the terminator.
            (unterminated_if_swallows_terminator, r"$\iffalse a$"),
        ),
    ];
}
