//! The format: the bootstrapped root scope shared by every parse.
//!
//! A format is built once by running a definitions-only script through the
//! engine in format mode: every top-level definition lands in the root
//! scope.
//! The standard format defines the usual macro layer (`\frac` in terms of
//! `\over`, named operators and symbols in terms of `\char` and the family
//! modifiers) on top of the primitives.

use crate::built_in_commands;
use mathlang::prelude::*;
use std::sync::OnceLock;

/// The script run to build the standard format.
///
/// Everything here goes through the ordinary macro and assignment
/// machinery; there is no other channel into the root scope.
const STANDARD_FORMAT_SCRIPT: &str = r#"
% The standard Mathcraft format.
\catcode`\@=11

% Fractions and binomials.
\def\frac#1#2{{#1\over#2}}
\def\binom#1#2{{#1\atop#2}}

% Accents.
\def\hat{\mathaccent"5E }
\def\acute{\mathaccent"B4 }
\def\grave{\mathaccent"60 }
\def\bar{\mathaccent"AF }
\def\tilde{\mathaccent"7E }

% Operators.
\def\sum{\mathop{\char"3A3}}
\def\prod{\mathop{\char"3A0}}
\def\int{\mathop{\char"222B}\nolimits}

% Binary operators and relations.
\def\pm{\mathbin{\char"B1}}
\def\mp{\mathbin{\char"2213}}
\def\times{\mathbin{\char"D7}}
\def\div{\mathbin{\char"F7}}
\def\cdot{\mathbin{\char"B7}}
\def\leq{\mathrel{\char"2264}}
\def\geq{\mathrel{\char"2265}}
\def\neq{\mathrel{\char"2260}}
\def\to{\mathrel{\char"2192}}
\def\in{\mathrel{\char"2208}}

% Ordinary symbols.
\def\infty{\char"221E}
\def\partial{\char"2202}
\def\ldots{{\char"2026}}

% A few Greek letters.
\def\alpha{\char"3B1}
\def\beta{\char"3B2}
\def\gamma{\char"3B3}
\def\delta{\char"3B4}
\def\pi{\char"3C0}
\def\sigma{\char"3C3}
\def\omega{\char"3C9}

% Spacing parameters consumed by the renderer.
\thinmuskip=3mu
\medmuskip=4mu plus 2mu minus 4mu
\thickmuskip=5mu plus 5mu
"#;

/// A bootstrapped root scope.
pub struct Format {
    snapshot: mathlang::engine::Snapshot,
}

impl Format {
    /// The standard format, built once per process.
    pub fn standard() -> &'static Format {
        static STANDARD: OnceLock<Format> = OnceLock::new();
        STANDARD.get_or_init(|| Format::from_script(STANDARD_FORMAT_SCRIPT))
    }

    /// Builds a format by running a definitions script on a fresh engine.
    ///
    /// The engine starts from empty macro and register tables (only the
    /// built-in primitives are present), so re-bootstrapping mid-session
    /// wipes everything a previous format defined.
    pub fn from_script(script: &str) -> Format {
        let mut engine = Engine::new(built_in_commands());
        engine.run_format_script(script);
        log::debug!("bootstrapped format from {}-byte script", script.len());
        Format {
            snapshot: engine.snapshot(),
        }
    }

    /// A fresh engine whose root scope is this format.
    pub fn engine(&self) -> Engine {
        Engine::from_snapshot(self.snapshot.clone())
    }
}

/// Parses one formula against the standard format.
///
/// The input must start with the opener matching the style
/// (`$`/`\(` or `$$`/`\[`); see [Engine::parse_formula] for the contract.
pub fn parse_formula(input: &str, style: Style) -> Outcome {
    Format::standard().engine().parse_formula(input, style)
}
