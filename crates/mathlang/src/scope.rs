//! The scope stack: nested namespaces of definitions, registers and code
//! tables.
//!
//! A scope is opened for every group-like construct (`{...}`, `\left`
//! groups, table cells) and closed when the matching closer is found.
//! Every namespace lives in a [ScopedMap], so an inner scope sees every
//! entry of its parent until it overrides one, and a `\global` assignment
//! writes through every open scope down to the root.

use crate::command::Command;
use crate::mouth::CatCodeFn;
use crate::token::{CommandRef, CsName};
use crate::types::{CatCode, MathClass};
use mathcraft_stdext::collections::scopedmap::{NoScopeToEndError, Scope, ScopedMap};
use units::{Dimen, Glue, Int, MuGlue, Value};

/// The scope stack.
///
/// The base tables of every map form the root ("format") scope; the layers
/// above it correspond to the currently open groups.
#[derive(Clone)]
pub struct ScopeStack {
    /// Command definitions: macros, primitives, aliases, for both control
    /// sequences and active characters.
    pub commands: ScopedMap<CommandRef, Command>,
    /// Numbered integer registers (`\count`).
    pub counts: ScopedMap<u16, Int>,
    /// Numbered dimension registers (`\dimen`).
    pub dimens: ScopedMap<u16, Dimen>,
    /// Numbered glue registers (`\skip`).
    pub skips: ScopedMap<u16, Glue>,
    /// Numbered mu-glue registers (`\muskip`).
    pub mu_skips: ScopedMap<u16, MuGlue>,
    /// Named value registers (`\thinmuskip` and friends), keyed by slot.
    pub named_values: ScopedMap<u16, Value>,
    catcodes: ScopedMap<char, CatCode>,
    mathcodes: ScopedMap<char, MathClass>,
    lccodes: ScopedMap<char, char>,
    uccodes: ScopedMap<char, char>,
    depth: usize,
}

impl ScopeStack {
    /// A scope stack with the default code tables and empty registers.
    pub fn new() -> ScopeStack {
        let ascii = (0_u8..128).map(char::from);
        ScopeStack {
            commands: Default::default(),
            counts: Default::default(),
            dimens: Default::default(),
            skips: Default::default(),
            mu_skips: Default::default(),
            named_values: Default::default(),
            catcodes: ascii
                .clone()
                .map(|c| (c, CatCode::default_for(c)))
                .collect(),
            mathcodes: ascii
                .clone()
                .filter(|c| MathClass::default_for(*c) != MathClass::Ord)
                .map(|c| (c, MathClass::default_for(c)))
                .collect(),
            lccodes: ascii
                .clone()
                .filter(char::is_ascii_uppercase)
                .map(|c| (c, c.to_ascii_lowercase()))
                .chain(ascii.clone().filter(char::is_ascii_lowercase).map(|c| (c, c)))
                .collect(),
            uccodes: ascii
                .clone()
                .filter(char::is_ascii_lowercase)
                .map(|c| (c, c.to_ascii_uppercase()))
                .chain(ascii.filter(char::is_ascii_uppercase).map(|c| (c, c)))
                .collect(),
            depth: 0,
        }
    }

    /// Opens a new scope on every namespace at once.
    pub fn begin_group(&mut self) {
        self.commands.begin_scope();
        self.counts.begin_scope();
        self.dimens.begin_scope();
        self.skips.begin_scope();
        self.mu_skips.begin_scope();
        self.named_values.begin_scope();
        self.catcodes.begin_scope();
        self.mathcodes.begin_scope();
        self.lccodes.begin_scope();
        self.uccodes.begin_scope();
        self.depth += 1;
    }

    /// Closes the innermost scope, restoring every value it shadowed.
    pub fn end_group(&mut self) -> Result<(), NoScopeToEndError> {
        if self.depth == 0 {
            return Err(NoScopeToEndError {});
        }
        self.commands.end_scope()?;
        self.counts.end_scope()?;
        self.dimens.end_scope()?;
        self.skips.end_scope()?;
        self.mu_skips.end_scope()?;
        self.named_values.end_scope()?;
        self.catcodes.end_scope()?;
        self.mathcodes.end_scope()?;
        self.lccodes.end_scope()?;
        self.uccodes.end_scope()?;
        self.depth -= 1;
        Ok(())
    }

    /// The number of open scopes above the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The category code of the character, falling back to [CatCode::Other]
    /// for codepoints with no entry.
    pub fn cat_code(&self, c: char) -> CatCode {
        self.catcodes.get(&c).copied().unwrap_or_default()
    }

    pub fn set_cat_code(&mut self, c: char, code: CatCode, scope: Scope) {
        self.catcodes.insert(c, code, scope);
    }

    /// The math class of the character, falling back to [MathClass::Ord]
    /// for codepoints with no entry.
    pub fn math_code(&self, c: char) -> MathClass {
        self.mathcodes.get(&c).copied().unwrap_or_default()
    }

    pub fn set_math_code(&mut self, c: char, class: MathClass, scope: Scope) {
        self.mathcodes.insert(c, class, scope);
    }

    /// The lowercase mapping of the character, or the character itself if
    /// it has none.
    pub fn lc_code(&self, c: char) -> char {
        self.lccodes.get(&c).copied().unwrap_or(c)
    }

    pub fn set_lc_code(&mut self, c: char, to: char, scope: Scope) {
        self.lccodes.insert(c, to, scope);
    }

    /// The uppercase mapping of the character, or the character itself if
    /// it has none.
    pub fn uc_code(&self, c: char) -> char {
        self.uccodes.get(&c).copied().unwrap_or(c)
    }

    pub fn set_uc_code(&mut self, c: char, to: char, scope: Scope) {
        self.uccodes.insert(c, to, scope);
    }

    /// The value of an integer register, zero if never assigned.
    pub fn count(&self, index: u16) -> Int {
        self.counts.get(&index).copied().unwrap_or_default()
    }

    pub fn dimen(&self, index: u16) -> Dimen {
        self.dimens.get(&index).copied().unwrap_or_default()
    }

    pub fn skip(&self, index: u16) -> Glue {
        self.skips.get(&index).copied().unwrap_or_default()
    }

    pub fn mu_skip(&self, index: u16) -> MuGlue {
        self.mu_skips.get(&index).copied().unwrap_or_default()
    }

    pub fn named_value(&self, slot: u16) -> Option<Value> {
        self.named_values.get(&slot).copied()
    }

    /// Looks up the command a name currently refers to, without following
    /// aliases.
    pub fn lookup(&self, command_ref: &CommandRef) -> Option<&Command> {
        self.commands.get(command_ref)
    }

    /// Inserts a command definition for a name.
    pub fn define(&mut self, command_ref: CommandRef, command: Command, scope: Scope) {
        self.commands.insert(command_ref, command, scope);
    }

    /// Wipes the command table, for re-bootstrapping a format.
    pub fn wipe_commands(&mut self) {
        self.commands.reset(Default::default());
    }

    /// Looks up a command by control sequence name.
    pub fn lookup_cs(&self, name: CsName) -> Option<&Command> {
        self.commands.get(&CommandRef::ControlSequence(name))
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        ScopeStack::new()
    }
}

impl CatCodeFn for ScopeStack {
    fn cat_code(&self, c: char) -> CatCode {
        ScopeStack::cat_code(self, c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_code_tables() {
        let scopes = ScopeStack::new();
        assert_eq!(scopes.cat_code('\\'), CatCode::Escape);
        assert_eq!(scopes.cat_code('π'), CatCode::Other);
        assert_eq!(scopes.math_code('x'), MathClass::Variable);
        assert_eq!(scopes.math_code('8'), MathClass::Ord);
        assert_eq!(scopes.math_code('π'), MathClass::Ord);
        assert_eq!(scopes.lc_code('A'), 'a');
        assert_eq!(scopes.uc_code('a'), 'A');
        assert_eq!(scopes.lc_code('!'), '!');
    }

    #[test]
    fn register_defaults_to_zero() {
        let scopes = ScopeStack::new();
        assert_eq!(scopes.count(42), Int::ZERO);
        assert_eq!(scopes.dimen(42), Dimen::ZERO);
    }

    #[test]
    fn local_and_global_register_assignment() {
        let mut scopes = ScopeStack::new();
        scopes.counts.insert(0, Int::new(5), Scope::Local);
        scopes.begin_group();
        scopes.counts.insert(0, Int::new(7), Scope::Local);
        assert_eq!(scopes.count(0), Int::new(7));
        scopes.end_group().unwrap();
        assert_eq!(scopes.count(0), Int::new(5));

        scopes.begin_group();
        scopes.counts.insert(0, Int::new(9), Scope::Global);
        scopes.end_group().unwrap();
        assert_eq!(scopes.count(0), Int::new(9));
    }

    #[test]
    fn end_group_at_root_errors() {
        let mut scopes = ScopeStack::new();
        assert!(scopes.end_group().is_err());
    }
}
