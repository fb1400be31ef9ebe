//! Commands and the command model.
//!
//! A name (control sequence or active character) maps to a [Command].
//! Primitives are Rust functions; macros are user-defined replacement
//! texts; aliases are references created by `\let` and `\futurelet`.

use crate::engine::Engine;
use crate::token;
use crate::usermacro;
use crate::variable;
use std::num;
use std::sync;
use std::sync::Arc;

/// The Rust type of expansion primitive functions.
///
/// The handler pushes its expansion into the mouth and returns true.
/// A false return means the handler could not make sense of its input;
/// the calling token is marked invalid and processing continues.
pub type ExpansionFn = fn(token: token::Token, engine: &mut Engine) -> bool;

/// The Rust type of execution primitive functions.
///
/// Same false-return convention as [ExpansionFn].
pub type ExecutionFn = fn(token: token::Token, engine: &mut Engine) -> bool;

/// A command.
pub enum Command {
    /// An expansion primitive implemented in the engine.
    ///
    /// Examples: `\the`, `\ifnum`.
    Expansion(ExpansionFn, Option<Tag>),

    /// A non-expansion primitive that operates on the engine state.
    ///
    /// Examples: `\def`, `\over`.
    Execution(ExecutionFn, Option<Tag>),

    /// A user-defined macro.
    Macro(Arc<usermacro::Macro>),

    /// A command that references a register or code-table entry.
    ///
    /// Examples: `\count`, `\catcode`.
    Variable(variable::VariableCommand),

    /// A command that aliases a character token, created by `\let\x=a`.
    CharacterAlias(token::Value),

    /// A reference to another command, created by `\let` and `\futurelet`.
    ///
    /// The target is never itself an alias: aliasing an alias collapses to
    /// the ultimate non-alias target. The `direct` flag records whether the
    /// alias was made to the target itself rather than through another
    /// alias; `\ifx` distinguishes the two.
    Alias {
        target: Arc<Command>,
        direct: bool,
    },
}

impl Command {
    /// Gets the tag associated to this command, or [None] if the command
    /// has no tag. Aliases report the tag of their target.
    pub fn tag(&self) -> Option<Tag> {
        match self {
            Command::Expansion(_, tag) => *tag,
            Command::Execution(_, tag) => *tag,
            Command::Alias { target, .. } => target.tag(),
            Command::Macro(_) | Command::Variable(_) | Command::CharacterAlias(_) => None,
        }
    }

    /// Follows an alias to its target; other commands resolve to themselves.
    pub fn resolved(&self) -> &Command {
        match self {
            Command::Alias { target, .. } => target,
            cmd => cmd,
        }
    }

    /// Creates an alias of the provided command.
    pub fn new_alias(target: &Command) -> Command {
        match target {
            Command::Alias { target, .. } => Command::Alias {
                target: target.clone(),
                direct: false,
            },
            cmd => Command::Alias {
                target: Arc::new(cmd.clone()),
                direct: true,
            },
        }
    }

    pub fn new_expansion(f: ExpansionFn) -> Command {
        Command::Expansion(f, None)
    }

    pub fn new_execution(f: ExecutionFn) -> Command {
        Command::Execution(f, None)
    }

    pub fn with_tag(mut self, tag: Tag) -> Command {
        match &mut self {
            Command::Expansion(_, t) => *t = Some(tag),
            Command::Execution(_, t) => *t = Some(tag),
            _ => panic!("cannot add a tag to this type of command"),
        }
        self
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Expansion(..) => write![f, "an expansion command"],
            Command::Execution(..) => write![f, "an execution command"],
            Command::Macro(_) => write![f, "a user-defined macro"],
            Command::Variable(_) => write![f, "a variable command"],
            Command::CharacterAlias(_) => write![f, "a character token alias"],
            Command::Alias { .. } => write![f, "an alias"],
        }
    }
}

// We implement Clone manually as the derived implementation would not
// understand the function pointer fields.
impl Clone for Command {
    fn clone(&self) -> Self {
        match self {
            Command::Expansion(f, t) => Command::Expansion(*f, *t),
            Command::Execution(f, t) => Command::Execution(*f, *t),
            Command::Macro(m) => Command::Macro(m.clone()),
            Command::Variable(v) => Command::Variable(v.clone()),
            Command::CharacterAlias(v) => Command::CharacterAlias(*v),
            Command::Alias { target, direct } => Command::Alias {
                target: target.clone(),
                direct: *direct,
            },
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Expansion(func, t) => write!(f, "Expansion({:#x}, {t:?})", *func as usize),
            Command::Execution(func, t) => write!(f, "Execution({:#x}, {t:?})", *func as usize),
            Command::Macro(m) => write!(f, "Macro({m:?})"),
            Command::Variable(v) => write!(f, "Variable({v:?})"),
            Command::CharacterAlias(v) => write!(f, "CharacterAlias({v:?})"),
            Command::Alias { target, direct } => write!(f, "Alias({target:?}, direct={direct})"),
        }
    }
}

/// Returns true if the two commands have the same meaning in the `\ifx`
/// sense.
///
/// Aliases compare by their ultimate target and their directness, so a
/// command that was `\let` to a primitive directly is distinguishable from
/// one that was `\let` through an intermediate alias.
pub fn commands_equal(a: &Command, b: &Command) -> bool {
    let directness = |cmd: &Command| match cmd {
        Command::Alias { direct, .. } => *direct,
        _ => true,
    };
    if directness(a) != directness(b) {
        return false;
    }
    match (a.resolved(), b.resolved()) {
        (Command::Expansion(f1, t1), Command::Expansion(f2, t2)) => {
            *f1 as usize == *f2 as usize && t1 == t2
        }
        (Command::Execution(f1, t1), Command::Execution(f2, t2)) => {
            *f1 as usize == *f2 as usize && t1 == t2
        }
        (Command::Macro(m1), Command::Macro(m2)) => m1 == m2,
        (Command::Variable(v1), Command::Variable(v2)) => v1 == v2,
        (Command::CharacterAlias(v1), Command::CharacterAlias(v2)) => v1 == v2,
        _ => false,
    }
}

/// A tag is a piece of metadata that is optionally attached to a command.
///
/// Tags are used where an algorithm scanning the input stream needs to
/// recognize tokens by the command they refer to rather than by name.
/// The conditional evaluator is the main example: when a condition is
/// false, the input is skipped until a command carrying the `\else` or
/// `\fi` tag appears, regardless of what the command has been renamed to.
/// The table builder recognizes `\cr` the same way, and the numeric
/// grammar recognizes `\relax` as a number terminator.
///
/// Tags are process-unique: each call to [Tag::new] returns a distinct
/// value. The same tag can be attached to multiple commands.
#[derive(PartialEq, Eq, Clone, Copy, Debug, PartialOrd, Ord, Hash)]
pub struct Tag(num::NonZeroU32);

static NEXT_TAG_VALUE: sync::Mutex<u32> = sync::Mutex::new(1);

impl Tag {
    /// Creates a new unique tag.
    // Creating a tag is a global operation and shouldn't happen without
    // explicit intention, hence no Default implementation.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Tag {
        let mut n = NEXT_TAG_VALUE.lock().unwrap();
        let tag = Tag(num::NonZeroU32::new(*n).unwrap());
        *n = n.checked_add(1).unwrap();
        tag
    }
}

/// A static tag enables creating a tag in a static variable.
///
/// ```
/// # use mathlang::command::StaticTag;
/// static TAG: StaticTag = StaticTag::new();
///
/// assert_eq!(TAG.get(), TAG.get());
/// ```
pub struct StaticTag(std::sync::OnceLock<Tag>);

impl Default for StaticTag {
    fn default() -> Self {
        StaticTag::new()
    }
}

impl StaticTag {
    pub const fn new() -> StaticTag {
        StaticTag(std::sync::OnceLock::new())
    }

    /// Get the actual [Tag] out of this [StaticTag].
    /// Repeated calls return the same tag.
    pub fn get(&self) -> Tag {
        *self.0.get_or_init(Tag::new)
    }
}

static RELAX_TAG: StaticTag = StaticTag::new();

/// The tag carried by `\relax`.
///
/// The numeric grammar consumes a trailing `\relax` after a number, so the
/// tag is defined here in the core rather than with the primitive itself.
pub fn relax_tag() -> Tag {
    RELAX_TAG.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: token::Token, _: &mut Engine) -> bool {
        true
    }

    fn other_noop(_: token::Token, _: &mut Engine) -> bool {
        true
    }

    #[test]
    fn tags_are_unique() {
        static TAG_1: StaticTag = StaticTag::new();
        static TAG_2: StaticTag = StaticTag::new();
        assert_eq!(TAG_1.get(), TAG_1.get());
        assert_ne!(TAG_1.get(), TAG_2.get());
    }

    #[test]
    fn alias_of_alias_collapses() {
        let primitive = Command::new_execution(noop);
        let direct = Command::new_alias(&primitive);
        let indirect = Command::new_alias(&direct);
        match &indirect {
            Command::Alias { target, direct } => {
                assert!(!direct);
                assert!(matches!(**target, Command::Execution(..)));
            }
            _ => panic!("expected an alias"),
        }
    }

    #[test]
    fn meaning_equality() {
        let primitive = Command::new_execution(noop);
        let other = Command::new_execution(other_noop);
        let direct = Command::new_alias(&primitive);
        let indirect = Command::new_alias(&direct);

        assert!(commands_equal(&primitive, &primitive.clone()));
        assert!(!commands_equal(&primitive, &other));
        // A direct alias means the same thing as its target.
        assert!(commands_equal(&primitive, &direct));
        // An alias made through another alias does not.
        assert!(!commands_equal(&primitive, &indirect));
        assert!(!commands_equal(&direct, &indirect));
    }
}
