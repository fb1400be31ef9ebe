/*!
Mathlang unit testing library.

This crate is used throughout the Mathlang standard library to write
table-style unit tests for the interpreter, and works for any code built on
the `mathlang` crate.

Each test runner takes a function producing the built-in commands to
install, so a test module controls exactly which primitives exist.
The preferred way to write a suite is the [test_suite] macro:

```ignore
fn built_in_commands() -> HashMap<&'static str, Command> { ... }

test_suite![
    tree_equality_tests(
        (case_1, r"\def\x{A}\x", "A"),
    ),
    invalid_token_tests(
        (case_2, r"\nosuch x", 1),
    ),
    failure_tests(
        (case_3, "$a"),
    ),
];
```

Tree equality tests verify that two formula bodies build identical atom
trees. Invalid-token tests verify that a body parses successfully with
exactly the expected number of invalid atoms. Failure tests verify that a
complete input (including delimiters) fails to parse, returning the
original input as the remainder.
*/

use mathlang::command::Command;
use mathlang::mathlist::{Atom, Nucleus};
use mathlang::prelude::*;
use std::collections::HashMap;

/// The type of the built-in-command providers the runners take.
pub type BuiltIns = fn() -> HashMap<&'static str, Command>;

/// Parses a complete input (with delimiters), detecting the style from the
/// opener.
pub fn run_formula(input: &str, built_ins: BuiltIns) -> Outcome {
    let style = if input.starts_with("$$") || input.starts_with("\\[") {
        Style::Display
    } else {
        Style::Inline
    };
    Engine::new(built_ins()).parse_formula(input, style)
}

/// Runs a tree equality test: both formula bodies must parse successfully
/// and build identical atom trees.
pub fn run_tree_equality_test(lhs: &str, rhs: &str, built_ins: BuiltIns) {
    let lhs_outcome = run_formula(&format!("${lhs}$"), built_ins);
    let rhs_outcome = run_formula(&format!("${rhs}$"), built_ins);
    assert!(lhs_outcome.ok, "left input failed to parse: {lhs}");
    assert!(rhs_outcome.ok, "right input failed to parse: {rhs}");
    pretty_assertions::assert_eq!(lhs_outcome.list, rhs_outcome.list);
}

/// Runs an invalid-token test: the formula body must parse successfully
/// and its tree must contain exactly the expected number of invalid atoms.
pub fn run_invalid_token_test(input: &str, expected: usize, built_ins: BuiltIns) {
    let outcome = run_formula(&format!("${input}$"), built_ins);
    assert!(outcome.ok, "input failed to parse: {input}");
    let got = count_invalid(&outcome.list);
    assert_eq!(
        got, expected,
        "expected {expected} invalid atom(s), got {got}: {:?}",
        outcome.list
    );
}

/// Runs a failure test: the complete input must fail to parse, with an
/// empty tree and the original input as the remainder.
pub fn run_failure_test(input: &str, built_ins: BuiltIns) {
    let outcome = run_formula(input, built_ins);
    assert!(!outcome.ok, "expected the parse to fail: {input}");
    assert!(outcome.list.is_empty());
    assert_eq!(outcome.remainder, input);
}

/// Runs a remainder test: the complete input must parse and leave exactly
/// the expected remainder.
pub fn run_remainder_test(input: &str, expected_remainder: &str, built_ins: BuiltIns) {
    let outcome = run_formula(input, built_ins);
    assert!(outcome.ok, "input failed to parse: {input}");
    assert_eq!(outcome.remainder, expected_remainder);
}

/// Counts invalid atoms everywhere in the tree, including inside compound
/// nuclei and scripts.
pub fn count_invalid(atoms: &[Atom]) -> usize {
    atoms.iter().map(count_invalid_in_atom).sum()
}

fn count_invalid_in_atom(atom: &Atom) -> usize {
    let mut count = usize::from(atom.invalid);
    count += count_invalid_in_nucleus(&atom.nucleus);
    if let Some(nucleus) = &atom.superscript {
        count += count_invalid_in_nucleus(nucleus);
    }
    if let Some(nucleus) = &atom.subscript {
        count += count_invalid_in_nucleus(nucleus);
    }
    count
}

fn count_invalid_in_nucleus(nucleus: &Nucleus) -> usize {
    match nucleus {
        Nucleus::Empty | Nucleus::Symbol(_) | Nucleus::Cs(_) => 0,
        Nucleus::List(list) => count_invalid(list),
        Nucleus::Fraction(f) => count_invalid(&f.numerator) + count_invalid(&f.denominator),
        Nucleus::Radical(r) => {
            r.index.as_deref().map_or(0, count_invalid) + count_invalid_in_nucleus(&r.radicand)
        }
        Nucleus::Delimited(d) => count_invalid(&d.list),
        Nucleus::Table(t) => t
            .rows
            .iter()
            .flat_map(|row| row.iter())
            .map(|cell| count_invalid(cell))
            .sum(),
        Nucleus::Choice(c) => {
            count_invalid(&c.display)
                + count_invalid(&c.text)
                + count_invalid(&c.script)
                + count_invalid(&c.script_script)
        }
        Nucleus::Boxed(b) => count_invalid(&b.list),
        Nucleus::Accented(a) => count_invalid_in_nucleus(&a.nucleus),
    }
}

/// Macro to generate a suite of unit tests.
///
/// The macro accepts any combination of the four test kinds, each holding
/// a list of cases:
///
/// - `tree_equality_tests`: cases of the form `(name, lhs, rhs)`, run by
///   [run_tree_equality_test].
/// - `invalid_token_tests`: cases of the form `(name, input, count)`, run
///   by [run_invalid_token_test].
/// - `failure_tests`: cases of the form `(name, input)`, run by
///   [run_failure_test].
/// - `remainder_tests`: cases of the form `(name, input, remainder)`, run
///   by [run_remainder_test].
///
/// A function `built_in_commands` returning the commands to install must
/// be in scope at the macro invocation.
#[macro_export]
macro_rules! test_suite {
    ( tree_equality_tests ( $( ($name: ident, $lhs: expr, $rhs: expr $(,)? ) ),* $(,)? ) $(,)? ) => (
        $(
            #[test]
            fn $name() {
                mathlang_testing::run_tree_equality_test($lhs, $rhs, built_in_commands);
            }
        )*
    );
    ( invalid_token_tests ( $( ($name: ident, $input: expr, $count: expr $(,)? ) ),* $(,)? ) $(,)? ) => (
        $(
            #[test]
            fn $name() {
                mathlang_testing::run_invalid_token_test($input, $count, built_in_commands);
            }
        )*
    );
    ( failure_tests ( $( ($name: ident, $input: expr $(,)? ) ),* $(,)? ) $(,)? ) => (
        $(
            #[test]
            fn $name() {
                mathlang_testing::run_failure_test($input, built_in_commands);
            }
        )*
    );
    ( remainder_tests ( $( ($name: ident, $input: expr, $remainder: expr $(,)? ) ),* $(,)? ) $(,)? ) => (
        $(
            #[test]
            fn $name() {
                mathlang_testing::run_remainder_test($input, $remainder, built_in_commands);
            }
        )*
    );
    ( $test_kind: ident $test_cases: tt, $( $rest_kind: ident $rest_cases: tt ),+ $(,)? ) => (
        mathlang_testing::test_suite![ $test_kind $test_cases ];
        mathlang_testing::test_suite![ $( $rest_kind $rest_cases ),+ ];
    );
}
