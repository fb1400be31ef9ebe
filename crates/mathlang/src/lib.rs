//! # Mathlang: an interpreter for TeX's math-mode input language.
//!
//! This crate implements the core of the Mathcraft math interpreter:
//! tokenization under a mutable category code table, command expansion with
//! TeX parameter matching, the multi-stage numeric grammar, conditional
//! evaluation, and the assembly of the final math list (atom tree).
//!
//! The standard primitive catalogue lives in the `mathlang-stdlib` crate;
//! this crate provides the mechanisms that catalogue is registered through.

extern crate mathcraft_stdext;

pub mod command;
pub mod conditional;
pub mod engine;
pub mod mathlist;
pub mod metrics;
pub mod mouth;
pub mod parse;
pub mod scope;
pub mod token;
pub mod types;
pub mod usermacro;
pub mod variable;

mod expand;
pub use expand::next_expanded;

/// Module that re-exports the types most code working with this crate needs.
pub mod prelude {
    pub use crate::command::Command;
    pub use crate::engine::{Engine, Outcome, Style};
    pub use crate::mouth::{Context, Mouth};
    pub use crate::token::{CommandRef, CsName, Token, Value};
    pub use crate::types::{CatCode, MathClass};
}
