//! End-to-end tests against the standard format.

use mathlang::mathlist::{AtomClass, Nucleus};
use mathlang::prelude::*;
use mathlang_stdlib::{built_in_commands, parse_formula, Format};

fn inline(input: &str) -> Outcome {
    parse_formula(input, Style::Inline)
}

#[test]
fn matched_terminator_leaves_exact_suffix() {
    for (input, style, remainder) in [
        ("$x$ and so on", Style::Inline, " and so on"),
        ("$x$", Style::Inline, ""),
        ("$$x$$tail", Style::Display, "tail"),
        (r"\(x\) tail", Style::Inline, " tail"),
        (r"\[x\]tail", Style::Display, "tail"),
    ] {
        let outcome = parse_formula(input, style);
        assert!(outcome.ok, "failed to parse {input}");
        assert_eq!(outcome.remainder, remainder);
    }
}

#[test]
fn missing_terminator_returns_original_input() {
    let outcome = inline("$a");
    assert!(!outcome.ok);
    assert!(outcome.list.is_empty());
    assert_eq!(outcome.remainder, "$a");
}

#[test]
fn macro_call_builds_same_tree_as_its_body() {
    let direct = inline("$A$");
    let through_macro = inline(r"$\def\x{A}\x$");
    assert!(direct.ok && through_macro.ok);
    assert_eq!(direct.list, through_macro.list);
}

#[test]
fn braced_argument_matches_bare_argument() {
    let braced = inline(r"$\def\x#1{[#1]}\x{Y}$");
    let bare = inline(r"$\def\x#1{[#1]}\x Y$");
    assert!(braced.ok && bare.ok);
    assert_eq!(braced.list, bare.list);
}

#[test]
fn register_assignments_respect_grouping() {
    let local = inline(r"$\count0=5{\count0=7}\the\count0$");
    let five = inline("$5$");
    assert!(local.ok);
    assert_eq!(local.list, five.list);

    let global = inline(r"$\count0=5{\global\count0=7}\the\count0$");
    let seven = inline("$7$");
    assert!(global.ok);
    assert_eq!(global.list, seven.list);
}

#[test]
fn conditionals_select_branches() {
    for (input, expected) in [
        (r"$\iftrue A\else B\fi$", "$A$"),
        (r"$\iffalse A\else B\fi$", "$B$"),
        // A nested \if inside the skipped false branch must not end the
        // skip early.
        (r"$\iffalse\iftrue x\fi A\else C\fi$", "$C$"),
    ] {
        let got = inline(input);
        let want = inline(expected);
        assert!(got.ok && want.ok);
        assert_eq!(got.list, want.list, "for input {input}");
    }
}

#[test]
fn scripts_attach_order_independently() {
    let sup_first = inline("$x^2_3$");
    let sub_first = inline("$x_3^2$");
    assert!(sup_first.ok && sub_first.ok);
    assert_eq!(sup_first.list, sub_first.list);

    let atom = &sup_first.list[0];
    assert!(atom.superscript.is_some());
    assert!(atom.subscript.is_some());
}

#[test]
fn second_superscript_is_invalid_not_replacing() {
    let outcome = inline("$x^2^3$");
    assert!(outcome.ok);
    // x keeps its first superscript; the second ^ is an invalid atom and 3
    // follows as an ordinary atom.
    let x = &outcome.list[0];
    assert_eq!(
        x.superscript,
        Some(Nucleus::Symbol(mathlang::mathlist::Symbol {
            ch: '2',
            class: MathClass::Ord,
        }))
    );
    assert!(outcome.list[1].invalid);
    assert_eq!(outcome.list.len(), 3);
}

#[test]
fn integer_literals() {
    // Backtick with a one-letter control sequence gives the char code.
    // (\relax stops the scan: the space after \A belongs to the control
    // sequence and is consumed by the lexer.)
    let backtick = inline(r"$\count0=`\A\relax \the\count0$");
    let want = inline("$65$");
    assert!(backtick.ok);
    assert_eq!(backtick.list, want.list);

    // "1F parses as hexadecimal.
    let hex = inline("$\\count0=\"1F \\the\\count0$");
    let want = inline("$31$");
    assert!(hex.ok);
    assert_eq!(hex.list, want.list);

    // '17 parses as octal.
    let octal = inline(r"$\count0='17 \the\count0$");
    let want = inline("$15$");
    assert!(octal.ok);
    assert_eq!(octal.list, want.list);
}

#[test]
fn doubled_braces_collapse() {
    let doubled = inline("${{x}}$");
    let plain = inline("$x$");
    assert!(doubled.ok && plain.ok);
    assert_eq!(doubled.list, plain.list);
}

#[test]
fn scripted_group_does_not_collapse() {
    let grouped = inline("${x^2}$");
    let plain = inline("$x^2$");
    assert!(grouped.ok && plain.ok);
    assert_ne!(grouped.list, plain.list);
}

#[test]
fn unclosed_group_folds_invalid_but_parses() {
    let outcome = inline("${a$rest");
    assert!(outcome.ok);
    assert_eq!(outcome.remainder, "rest");
    assert_eq!(outcome.list.len(), 1);
    assert!(outcome.list[0].invalid);
}

#[test]
fn catcode_change_retokenizes_following_input() {
    // Making X an escape character turns Xfrac into a command.
    let outcome = inline(r"$\catcode`\X=0 Xfrac12$");
    assert!(outcome.ok);
    assert_eq!(outcome.list.len(), 1);
    assert!(matches!(outcome.list[0].nucleus, Nucleus::Fraction(_)));
}

#[test]
fn fraction_from_over_matches_frac_macro() {
    let over = inline(r"${1\over2}$");
    let frac = inline(r"$\frac12$");
    assert!(over.ok && frac.ok);
    assert_eq!(over.list, frac.list);
}

#[test]
fn left_right_group() {
    let outcome = inline(r"$\left(\frac12\right)$");
    assert!(outcome.ok);
    assert_eq!(outcome.list.len(), 1);
    assert_eq!(outcome.list[0].class, AtomClass::Inner);
}

#[test]
fn engines_from_one_format_are_independent() {
    let format = Format::standard();
    let mut a = format.engine();
    let mut b = format.engine();
    let outcome = a.parse_formula(r"$\def\z{1}\z$", Style::Inline);
    assert!(outcome.ok);
    // The definition made in engine a is invisible to engine b.
    let outcome = b.parse_formula(r"$\z$", Style::Inline);
    assert!(outcome.ok);
    assert!(outcome.list[0].invalid);
}

#[test]
fn custom_built_ins_without_format() {
    let mut engine = Engine::new(built_in_commands());
    // \frac is a format macro, not a primitive.
    let outcome = engine.parse_formula(r"$\frac12$", Style::Inline);
    assert!(outcome.ok);
    assert!(outcome.list[0].invalid);
}
