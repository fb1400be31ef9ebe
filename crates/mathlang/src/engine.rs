//! The engine: the top-level loop that drives everything else.
//!
//! The engine owns the mouth, the scope stack, the interner and the
//! math-list builder.
//! Its main loop repeatedly asks the expansion engine for the next token
//! and decides how to mutate the builder and the scope stack: characters
//! become atoms, braces open and close scopes, primitives run, variable
//! commands perform assignments.
//! The loop ends when the required math-mode terminator is found, or the
//! input runs out (which is the only whole-parse failure).

use crate::command::{Command, Tag};
use crate::conditional;
use crate::expand;
use crate::mathlist::{Atom, AtomClass, Builder, CloseOutcome, Nucleus, Symbol};
use crate::mouth::{Context, Mouth};
use crate::scope::ScopeStack;
use crate::token::{CommandRef, CsNameInterner, Token, Value};
use crate::variable;
use mathcraft_stdext::collections::scopedmap::Scope;
use std::collections::HashMap;

/// The style of a formula, which fixes the required terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Style {
    /// Delimited by `$…$` or `\(…\)`.
    Inline,
    /// Delimited by `$$…$$` or `\[…\]`.
    Display,
}

/// The result of parsing a formula.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// The finished atom tree. Empty if the parse failed.
    pub list: Vec<Atom>,
    /// On success, the untouched suffix after the terminator; on failure,
    /// the original input.
    pub remainder: String,
    pub ok: bool,
}

/// The root-scope state of an engine: everything that survives between
/// formulas.
///
/// Cloning a snapshot and building an engine from it is how a bootstrapped
/// format is reused across parses.
#[derive(Clone)]
pub struct Snapshot {
    pub scopes: ScopeStack,
    pub interner: CsNameInterner,
}

/// The interpreter.
pub struct Engine {
    pub mouth: Mouth,
    pub scopes: ScopeStack,
    pub interner: CsNameInterner,
    pub builder: Builder,
    pub conditionals: conditional::Component,
    prefix_global: bool,
    style: Option<Style>,
    terminated: bool,
}

enum Flow {
    Continue,
    Terminated,
}

impl Engine {
    /// Creates an engine with the provided built-in commands installed in
    /// the root scope.
    pub fn new(built_ins: HashMap<&'static str, Command>) -> Engine {
        let mut interner = CsNameInterner::default();
        let mut scopes = ScopeStack::new();
        for (name, command) in built_ins {
            let cs_name = interner.get_or_intern(name);
            scopes.define(CommandRef::ControlSequence(cs_name), command, Scope::Local);
        }
        Engine {
            mouth: Mouth::new(""),
            scopes,
            interner,
            builder: Builder::new(),
            conditionals: Default::default(),
            prefix_global: false,
            style: None,
            terminated: false,
        }
    }

    /// Creates an engine from a snapshot of a bootstrapped root scope.
    pub fn from_snapshot(snapshot: Snapshot) -> Engine {
        Engine {
            mouth: Mouth::new(""),
            scopes: snapshot.scopes,
            interner: snapshot.interner,
            builder: Builder::new(),
            conditionals: Default::default(),
            prefix_global: false,
            style: None,
            terminated: false,
        }
    }

    /// Captures the root-scope state for later reuse.
    ///
    /// Meaningful only when no groups are open.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            scopes: self.scopes.clone(),
            interner: self.interner.clone(),
        }
    }

    /// Reads the next raw token under the current category code table.
    #[inline]
    pub fn next_token(&mut self, ctx: Context) -> Option<Token> {
        self.mouth.eat(ctx, &self.scopes, &mut self.interner)
    }

    /// Looks up the command a token name refers to, following aliases.
    pub fn resolve_command(&self, command_ref: &CommandRef) -> Option<Command> {
        self.scopes
            .lookup(command_ref)
            .map(|command| command.resolved().clone())
    }

    /// The tag of the command the token refers to, if any.
    pub fn tag_of_token(&self, token: &Token) -> Option<Tag> {
        match token.value() {
            Value::CommandRef(command_ref) => {
                self.scopes.lookup(&command_ref).and_then(Command::tag)
            }
            _ => None,
        }
    }

    /// Sets the `\global` prefix flag for the next assignment.
    pub fn set_global_prefix(&mut self) {
        self.prefix_global = true;
    }

    /// Reads and resets the `\global` prefix flag.
    ///
    /// Every assignment-like command must call this exactly once, even on
    /// code paths that ignore the result; otherwise the flag would leak
    /// into a later assignment.
    pub fn take_global(&mut self) -> Scope {
        match std::mem::replace(&mut self.prefix_global, false) {
            true => Scope::Global,
            false => Scope::Local,
        }
    }

    /// The style of the formula being parsed, or [None] while running a
    /// format script.
    pub fn current_style(&self) -> Option<Style> {
        self.style
    }

    /// Signals that the formula terminator was found.
    /// Called by the `\)` and `\]` primitives.
    pub fn terminate(&mut self) {
        self.terminated = true;
    }

    /// Pushes the token into the tree as an invalid atom.
    pub fn push_invalid(&mut self, token: Token) {
        let nucleus = match token.value() {
            Value::CommandRef(CommandRef::ControlSequence(name)) => Nucleus::Cs(name),
            _ => match token.char() {
                Some(c) => Nucleus::Symbol(Symbol {
                    ch: c,
                    class: self.scopes.math_code(c),
                }),
                None => Nucleus::Empty,
            },
        };
        self.builder
            .push_atom(Atom::new(AtomClass::Ord, nucleus).into_invalid());
    }

    /// Pushes an atom for a character, classed by its math code.
    pub fn push_char_atom(&mut self, c: char) {
        let class = self.scopes.math_code(c);
        self.builder.push_atom(Atom::symbol(c, class));
    }

    /// Pushes the characters of the string as tokens: letters as letter
    /// tokens, spaces as space tokens, everything else as other tokens.
    pub fn push_string_tokens(&mut self, s: &str) {
        let tokens: Vec<Token> = s
            .chars()
            .map(|c| match c {
                ' ' => Token::new_space(' '),
                c if c.is_alphabetic() => Token::new_letter(c),
                c => Token::new_other(c),
            })
            .collect();
        self.mouth.push_tokens(&tokens);
    }

    /// Parses one formula.
    ///
    /// The input must start with the opener matching the style; the parse
    /// runs until the matching terminator.
    /// If the terminator is never found the parse fails: the returned list
    /// is empty and the remainder is the whole original input.
    /// Side effects of commands executed before the failure point (a
    /// `\catcode` change, say) stay committed to the root scope.
    pub fn parse_formula(&mut self, input: &str, style: Style) -> Outcome {
        let failure = |input: &str| Outcome {
            list: Vec::new(),
            remainder: input.to_string(),
            ok: false,
        };
        let Some(body) = strip_opener(input, style) else {
            return failure(input);
        };
        self.mouth = Mouth::new(body);
        self.builder = Builder::new();
        self.conditionals = Default::default();
        self.style = Some(style);
        self.terminated = false;
        let found = self.run();
        self.style = None;
        let (list, scopes_open) = self.builder.finalize();
        self.close_scopes(scopes_open);
        while self.scopes.depth() > 0 {
            let _ = self.scopes.end_group();
        }
        if !found {
            log::debug!("formula terminator never found; discarding {} atom(s)", list.len());
            return failure(input);
        }
        log::debug!("parsed formula with {} top-level atom(s)", list.len());
        Outcome {
            list,
            remainder: self.mouth.remaining().to_string(),
            ok: true,
        }
    }

    /// Runs a definitions-only script, committing every top-level
    /// definition into the root scope.
    pub fn run_format_script(&mut self, source: &str) {
        self.mouth = Mouth::new(source);
        self.builder = Builder::new();
        self.conditionals = Default::default();
        self.style = None;
        let _ = self.run();
        let _ = self.builder.finalize();
        while self.scopes.depth() > 0 {
            let _ = self.scopes.end_group();
        }
        self.builder = Builder::new();
    }

    fn run(&mut self) -> bool {
        loop {
            let Some(token) = expand::next_expanded(self, Context::Default) else {
                return false;
            };
            match self.handle_token(token) {
                Flow::Continue => (),
                Flow::Terminated => return true,
            }
        }
    }

    fn handle_token(&mut self, token: Token) -> Flow {
        if token.is_invalid() {
            self.push_invalid(token);
            return Flow::Continue;
        }
        self.handle_value(token, token.value())
    }

    fn handle_value(&mut self, token: Token, value: Value) -> Flow {
        match value {
            Value::MathShift(_) => match self.style {
                Some(Style::Inline) => Flow::Terminated,
                Some(Style::Display) => {
                    // Display math ends with two math shift tokens.
                    let checkpoint = self.mouth.checkpoint();
                    match self.next_token(Context::Default) {
                        Some(t) if matches!(t.value(), Value::MathShift(_)) => Flow::Terminated,
                        _ => {
                            self.mouth.rewind(checkpoint);
                            self.push_invalid(token);
                            Flow::Continue
                        }
                    }
                }
                None => {
                    self.push_invalid(token);
                    Flow::Continue
                }
            },
            Value::BeginGroup(_) => {
                log::trace!("opening group at depth {}", self.scopes.depth());
                self.scopes.begin_group();
                self.builder.open_brace();
                Flow::Continue
            }
            Value::EndGroup(_) => {
                match self.builder.close_brace() {
                    CloseOutcome::Closed { scopes_closed } => {
                        log::trace!("closing {scopes_closed} group(s)");
                        self.close_scopes(scopes_closed);
                    }
                    CloseOutcome::NoGroup => self.push_invalid(token),
                }
                Flow::Continue
            }
            Value::Superscript(_) => {
                if !self.builder.script(token, true) {
                    self.push_invalid(token);
                }
                Flow::Continue
            }
            Value::Subscript(_) => {
                if !self.builder.script(token, false) {
                    self.push_invalid(token);
                }
                Flow::Continue
            }
            Value::AlignmentTab(_) => {
                if self.builder.alignment_tab() {
                    let _ = self.scopes.end_group();
                    self.scopes.begin_group();
                } else {
                    self.push_invalid(token);
                }
                Flow::Continue
            }
            Value::Parameter(_) => {
                self.push_invalid(token);
                Flow::Continue
            }
            Value::Space(_) => Flow::Continue,
            Value::Letter(c) | Value::Other(c) => {
                self.push_char_atom(c);
                Flow::Continue
            }
            Value::CommandRef(command_ref) => self.handle_command(token, command_ref),
        }
    }

    fn handle_command(&mut self, token: Token, command_ref: CommandRef) -> Flow {
        let Some(command) = self.resolve_command(&command_ref) else {
            self.push_invalid(token);
            return Flow::Continue;
        };
        match command {
            Command::Execution(f, _) => {
                if !f(token, self) {
                    self.push_invalid(token);
                }
                if self.terminated {
                    self.terminated = false;
                    return Flow::Terminated;
                }
                Flow::Continue
            }
            Command::Variable(cmd) => {
                if !variable::assign(self, token, &cmd) {
                    self.push_invalid(token);
                }
                Flow::Continue
            }
            Command::CharacterAlias(value) => self.handle_value(Token::new_from_value(value), value),
            // Expansion commands and macros were expanded before we got
            // here; seeing one means its expansion already failed.
            Command::Expansion(..) | Command::Macro(_) => {
                self.push_invalid(token);
                Flow::Continue
            }
            Command::Alias { .. } => unreachable!("aliases are resolved before dispatch"),
        }
    }

    fn close_scopes(&mut self, n: usize) {
        for _ in 0..n {
            let _ = self.scopes.end_group();
        }
    }
}

fn strip_opener(input: &str, style: Style) -> Option<&str> {
    match style {
        Style::Display => input
            .strip_prefix("$$")
            .or_else(|| input.strip_prefix("\\[")),
        Style::Inline => input
            .strip_prefix('$')
            .or_else(|| input.strip_prefix("\\(")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opener_stripping() {
        assert_eq!(strip_opener("$x$", Style::Inline), Some("x$"));
        assert_eq!(strip_opener(r"\(x\)", Style::Inline), Some(r"x\)"));
        assert_eq!(strip_opener("$$x$$", Style::Display), Some("x$$"));
        assert_eq!(strip_opener(r"\[x\]", Style::Display), Some(r"x\]"));
        assert_eq!(strip_opener("x$", Style::Inline), None);
        assert_eq!(strip_opener(r"\[x\]", Style::Inline), None);
    }

    #[test]
    fn empty_formula() {
        let mut engine = Engine::new(HashMap::new());
        let outcome = engine.parse_formula("$$ rest", Style::Inline);
        assert!(outcome.ok);
        assert!(outcome.list.is_empty());
        assert_eq!(outcome.remainder, " rest");
    }

    #[test]
    fn missing_terminator_fails_with_original_input() {
        let mut engine = Engine::new(HashMap::new());
        let outcome = engine.parse_formula("$a", Style::Inline);
        assert!(!outcome.ok);
        assert!(outcome.list.is_empty());
        assert_eq!(outcome.remainder, "$a");
    }

    #[test]
    fn simple_atoms() {
        let mut engine = Engine::new(HashMap::new());
        let outcome = engine.parse_formula("$ab$tail", Style::Inline);
        assert!(outcome.ok);
        assert_eq!(outcome.remainder, "tail");
        assert_eq!(outcome.list.len(), 2);
        assert_eq!(
            outcome.list[0].nucleus,
            Nucleus::Symbol(Symbol {
                ch: 'a',
                class: crate::types::MathClass::Variable
            })
        );
    }

    #[test]
    fn undefined_command_is_invalid_not_fatal() {
        let mut engine = Engine::new(HashMap::new());
        let outcome = engine.parse_formula(r"$\nosuch x$", Style::Inline);
        assert!(outcome.ok);
        assert_eq!(outcome.list.len(), 2);
        assert!(outcome.list[0].invalid);
        assert!(!outcome.list[1].invalid);
    }
}
