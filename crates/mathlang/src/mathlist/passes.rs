//! The rewrite pipeline applied to a list when it closes.
//!
//! The passes run once, in a fixed order, and each is a pure function from
//! one list to the next: resolve-family, resolve-accent, resolve-limits,
//! resolve-boxes, then the collapse of redundant brace wrappers.
//! A marker with no atom to act on becomes an invalid empty atom, so
//! nothing is silently dropped.

use super::{Accented, Atom, AtomClass, BoxNode, Item, Nucleus};
use crate::token::{Token, Value};

/// Runs the full pipeline over a build list, leaving only atoms.
pub fn resolve_list(items: Vec<Item>) -> Vec<Atom> {
    let items = resolve_family(items);
    let items = resolve_accents(items);
    let items = resolve_limits(items);
    let items = resolve_boxes(items);
    collapse(finish(items))
}

/// `\mathbin`-style markers reclassify the next atom.
fn resolve_family(items: Vec<Item>) -> Vec<Item> {
    let mut out = Vec::with_capacity(items.len());
    let mut pending: Option<(AtomClass, Token)> = None;
    for item in items {
        match item {
            Item::Atom(mut atom) => {
                if let Some((class, _)) = pending.take() {
                    atom.class = class;
                }
                out.push(Item::Atom(atom));
            }
            Item::Family(class, token) => {
                if let Some((_, unused)) = pending.replace((class, token)) {
                    out.push(Item::Atom(invalid_marker_atom(unused)));
                }
            }
            other => out.push(other),
        }
    }
    if let Some((_, unused)) = pending {
        out.push(Item::Atom(invalid_marker_atom(unused)));
    }
    out
}

/// Accent markers wrap the next atom.
fn resolve_accents(items: Vec<Item>) -> Vec<Item>  {
    let mut out = Vec::with_capacity(items.len());
    let mut pending: Option<(char, Token)> = None;
    for item in items {
        match item {
            Item::Atom(atom) => {
                match pending.take() {
                    Some((accent, _)) => out.push(Item::Atom(Atom::new(
                        AtomClass::Acc,
                        Nucleus::Accented(Box::new(Accented {
                            accent,
                            nucleus: nucleus_of(atom),
                        })),
                    ))),
                    None => out.push(Item::Atom(atom)),
                }
            }
            Item::Accent(accent, token) => {
                if let Some((_, unused)) = pending.replace((accent, token)) {
                    out.push(Item::Atom(invalid_marker_atom(unused)));
                }
            }
            other => out.push(other),
        }
    }
    if let Some((_, unused)) = pending {
        out.push(Item::Atom(invalid_marker_atom(unused)));
    }
    out
}

/// `\limits`/`\nolimits` markers attach to the preceding Op atom.
fn resolve_limits(items: Vec<Item>) -> Vec<Item> {
    let mut out: Vec<Item> = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Item::Limits(mode, token) => {
                match out.last_mut() {
                    Some(Item::Atom(atom)) if atom.class == AtomClass::Op => {
                        atom.limits = mode;
                    }
                    _ => out.push(Item::Atom(invalid_marker_atom(token))),
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Box markers wrap the next atom.
fn resolve_boxes(items: Vec<Item>) -> Vec<Item> {
    let mut out = Vec::with_capacity(items.len());
    let mut pending: Option<(super::BoxKind, Option<units::Dimen>, Token)> = None;
    for item in items {
        match item {
            Item::Atom(atom) => match pending.take() {
                Some((kind, to, _)) => out.push(Item::Atom(Atom::new(
                    AtomClass::Ord,
                    Nucleus::Boxed(Box::new(BoxNode {
                        kind,
                        to,
                        list: listify(atom),
                    })),
                ))),
                None => out.push(Item::Atom(atom)),
            },
            Item::Box(kind, to, token) => {
                if let Some((_, _, unused)) = pending.replace((kind, to, token)) {
                    out.push(Item::Atom(invalid_marker_atom(unused)));
                }
            }
            other => out.push(other),
        }
    }
    if let Some((_, _, unused)) = pending {
        out.push(Item::Atom(invalid_marker_atom(unused)));
    }
    out
}

fn finish(items: Vec<Item>) -> Vec<Atom> {
    items
        .into_iter()
        .map(|item| match item {
            Item::Atom(atom) => atom,
            Item::Family(_, token)
            | Item::Accent(_, token)
            | Item::Limits(_, token)
            | Item::Box(_, _, token) => invalid_marker_atom(token),
        })
        .collect()
}

/// Removes single-atom wrapper nuclei produced by doubled braces:
/// `{{x}}` builds the same tree as `{x}`, and `{x}` the same as `x`.
///
/// An atom is not collapsed if its class carries meaning (accents,
/// over/under, radicals) or if a script is already attached, on either the
/// wrapper or the wrapped atom.
fn collapse(atoms: Vec<Atom>) -> Vec<Atom> {
    atoms
        .into_iter()
        .map(|atom| {
            if atom.class != AtomClass::Ord
                || atom.superscript.is_some()
                || atom.subscript.is_some()
                || atom.invalid
            {
                return atom;
            }
            match atom.nucleus {
                Nucleus::List(mut list) if list.len() == 1 => {
                    let inner = list.pop().unwrap();
                    let collapsible = inner.class == AtomClass::Ord
                        && inner.superscript.is_none()
                        && inner.subscript.is_none();
                    if collapsible {
                        inner
                    } else {
                        list.push(inner);
                        Atom {
                            nucleus: Nucleus::List(list),
                            ..atom
                        }
                    }
                }
                nucleus => Atom { nucleus, ..atom },
            }
        })
        .collect()
}

/// The nucleus representing an atom inside a wrapper: a simple atom
/// contributes its nucleus directly, anything else becomes a one-atom
/// list.
pub(super) fn nucleus_of(atom: Atom) -> Nucleus {
    if atom.class == AtomClass::Ord && atom.is_simple() && !atom.invalid {
        atom.nucleus
    } else {
        Nucleus::List(vec![atom])
    }
}

pub(super) fn listify(atom: Atom) -> Vec<Atom> {
    match atom.nucleus {
        Nucleus::List(list)
            if atom.class == AtomClass::Ord
                && atom.superscript.is_none()
                && atom.subscript.is_none()
                && !atom.invalid =>
        {
            list
        }
        _ => vec![atom],
    }
}

/// The visible residue of a marker that had nothing to act on.
pub(super) fn invalid_marker_atom(token: Token) -> Atom {
    let nucleus = match token.value() {
        Value::CommandRef(crate::token::CommandRef::ControlSequence(name)) => Nucleus::Cs(name),
        _ => match token.char() {
            Some(c) => Nucleus::Symbol(super::Symbol {
                ch: c,
                class: crate::types::MathClass::Ord,
            }),
            None => Nucleus::Empty,
        },
    };
    Atom::new(AtomClass::Ord, nucleus).into_invalid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MathClass;

    fn x() -> Atom {
        Atom::symbol('x', MathClass::Variable)
    }

    #[test]
    fn family_reclassifies_next_atom() {
        let token = Token::new_letter('q');
        let items = vec![Item::Family(AtomClass::Rel, token), Item::Atom(x())];
        let atoms = resolve_list(items);
        assert_eq!(atoms.len(), 1);
        assert_eq!(atoms[0].class, AtomClass::Rel);
    }

    #[test]
    fn dangling_family_marker_becomes_invalid_atom() {
        let token = Token::new_letter('q');
        let items = vec![Item::Atom(x()), Item::Family(AtomClass::Rel, token)];
        let atoms = resolve_list(items);
        assert_eq!(atoms.len(), 2);
        assert!(atoms[1].invalid);
    }

    #[test]
    fn limits_attach_to_preceding_op() {
        let mut op = x();
        op.class = AtomClass::Op;
        let items = vec![
            Item::Atom(op),
            Item::Limits(super::super::LimitsMode::Limits, Token::new_letter('q')),
        ];
        let atoms = resolve_list(items);
        assert_eq!(atoms.len(), 1);
        assert_eq!(atoms[0].limits, super::super::LimitsMode::Limits);
    }

    #[test]
    fn limits_without_op_is_invalid() {
        let items = vec![
            Item::Atom(x()),
            Item::Limits(super::super::LimitsMode::Limits, Token::new_letter('q')),
        ];
        let atoms = resolve_list(items);
        assert_eq!(atoms.len(), 2);
        assert!(atoms[1].invalid);
    }

    #[test]
    fn collapse_unwraps_single_ord_wrapper() {
        let wrapper = Atom::new(AtomClass::Ord, Nucleus::List(vec![x()]));
        let atoms = collapse(vec![wrapper]);
        assert_eq!(atoms, vec![x()]);
    }

    #[test]
    fn collapse_keeps_wrapper_with_scripts() {
        let mut wrapper = Atom::new(AtomClass::Ord, Nucleus::List(vec![x()]));
        wrapper.superscript = Some(Nucleus::Empty);
        let atoms = collapse(vec![wrapper.clone()]);
        assert_eq!(atoms, vec![wrapper]);
    }

    #[test]
    fn collapse_keeps_scripted_inner_atom() {
        let mut inner = x();
        inner.subscript = Some(Nucleus::Empty);
        let wrapper = Atom::new(AtomClass::Ord, Nucleus::List(vec![inner.clone()]));
        let atoms = collapse(vec![wrapper.clone()]);
        assert_eq!(atoms, vec![wrapper]);
    }
}
