//! The math list: the atom tree produced by a parse.
//!
//! An [Atom] is a nucleus with optional superscript and subscript, plus a
//! class that drives inter-atom spacing.
//! Compound structures (fractions, radicals, tables, `\left…\right`
//! groups) are nucleus variants, so the tree is uniform: every node is an
//! atom and every sub-list is a `Vec<Atom>`.
//!
//! During assembly, lists hold [Item]s: atoms interleaved with pending
//! markers left by primitives such as `\mathbin` or `\limits`.
//! When a group closes, the rewrite pipeline in [passes] runs once over
//! its list, resolving every marker and collapsing redundant wrappers, and
//! only atoms remain.

mod builder;
mod passes;

pub use builder::{Builder, CloseOutcome};
pub use passes::resolve_list;

use crate::token::CsName;
use crate::token::Token;
use crate::types::MathClass;
use units::Dimen;

/// The class of an atom, which determines the spacing around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AtomClass {
    Ord,
    Op,
    Bin,
    Rel,
    Open,
    Close,
    Punct,
    Inner,
    Over,
    Under,
    Acc,
    Rad,
}

impl From<MathClass> for AtomClass {
    fn from(class: MathClass) -> AtomClass {
        match class {
            MathClass::Ord | MathClass::Variable => AtomClass::Ord,
            MathClass::Op => AtomClass::Op,
            MathClass::Bin => AtomClass::Bin,
            MathClass::Rel => AtomClass::Rel,
            MathClass::Open => AtomClass::Open,
            MathClass::Close => AtomClass::Close,
            MathClass::Punct => AtomClass::Punct,
        }
    }
}

/// A single character with its math class.
///
/// The class keeps the [Variable](MathClass::Variable) distinction so a
/// renderer knows to use the italic math font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Symbol {
    pub ch: char,
    pub class: MathClass,
}

/// The content of an atom.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Nucleus {
    Empty,
    Symbol(Symbol),
    /// An unrecognized command, rendered as its name.
    Cs(CsName),
    List(Vec<Atom>),
    Fraction(Box<Fraction>),
    Radical(Box<Radical>),
    Delimited(Box<Delimited>),
    Table(Table),
    Choice(Box<Choice>),
    Boxed(Box<BoxNode>),
    Accented(Box<Accented>),
}

/// A fraction produced by `\over` or `\atop`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fraction {
    pub numerator: Vec<Atom>,
    pub denominator: Vec<Atom>,
    /// True for `\over` (a fraction bar is drawn), false for `\atop`.
    pub ruled: bool,
}

/// A radical produced by `\sqrt` or `\root…\of`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Radical {
    pub index: Option<Vec<Atom>>,
    pub radicand: Nucleus,
}

/// A `\left…\right` group.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delimited {
    /// [None] for the empty delimiter `.`.
    pub left: Option<char>,
    pub right: Option<char>,
    pub list: Vec<Atom>,
}

/// An alignment produced by `\halign`: rows of cells, each cell a list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    pub rows: Vec<Vec<Vec<Atom>>>,
}

/// The four style-dependent lists of a `\mathchoice`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Choice {
    pub display: Vec<Atom>,
    pub text: Vec<Atom>,
    pub script: Vec<Atom>,
    pub script_script: Vec<Atom>,
}

/// A box produced by `\hbox` or `\vbox`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxNode {
    pub kind: BoxKind,
    /// The dimension given with `to`, if any.
    pub to: Option<Dimen>,
    pub list: Vec<Atom>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoxKind {
    Horizontal,
    Vertical,
}

/// An accented nucleus.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Accented {
    pub accent: char,
    pub nucleus: Nucleus,
}

/// Placement of limits on an Op atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LimitsMode {
    /// Above/below in display style, at the side otherwise.
    #[default]
    Default,
    Limits,
    NoLimits,
}

/// A node of the math list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Atom {
    pub class: AtomClass,
    pub nucleus: Nucleus,
    pub superscript: Option<Nucleus>,
    pub subscript: Option<Nucleus>,
    pub limits: LimitsMode,
    /// Set when the engine could not make sense of the material this atom
    /// was built from. Rendering invalid atoms distinctly is up to the
    /// renderer.
    pub invalid: bool,
}

impl Atom {
    pub fn new(class: AtomClass, nucleus: Nucleus) -> Atom {
        Atom {
            class,
            nucleus,
            superscript: None,
            subscript: None,
            limits: LimitsMode::Default,
            invalid: false,
        }
    }

    /// An atom for a single character, classed by its math code.
    pub fn symbol(ch: char, class: MathClass) -> Atom {
        Atom::new(class.into(), Nucleus::Symbol(Symbol { ch, class }))
    }

    /// The empty Ord atom synthesized when a script has nothing to attach
    /// to.
    pub fn empty() -> Atom {
        Atom::new(AtomClass::Ord, Nucleus::Empty)
    }

    pub fn into_invalid(mut self) -> Atom {
        self.invalid = true;
        self
    }

    /// True if this atom is a bare symbol or empty nucleus with no scripts.
    pub fn is_simple(&self) -> bool {
        matches!(self.nucleus, Nucleus::Symbol(_) | Nucleus::Empty)
            && self.superscript.is_none()
            && self.subscript.is_none()
    }
}

/// An entry in a list under construction: an atom, or a marker left by a
/// primitive to be resolved by the rewrite passes when the list closes.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Atom(Atom),
    /// `\mathbin` and friends: reclassify the next atom.
    Family(AtomClass, Token),
    /// An accent command: wrap the next atom.
    Accent(char, Token),
    /// `\limits`/`\nolimits`: attach to the preceding Op atom.
    Limits(LimitsMode, Token),
    /// `\hbox`/`\vbox`: wrap the next atom.
    Box(BoxKind, Option<Dimen>, Token),
}
