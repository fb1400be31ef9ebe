//! The mouth: a speculative, rollback-capable token reader.
//!
//! The mouth reads from two sources, in priority order: a replay queue of
//! tokens pushed back during expansion, and the raw source string.
//! Because lexing is controlled by category codes that can change at
//! runtime, tokens are only produced on demand; it is an error to tokenize
//! a batch of input ahead of time.
//!
//! Every mutating operation — an [eat](Mouth::eat) or a
//! [push_tokens](Mouth::push_tokens) — appends one entry to an append-only
//! history log recording exactly how to undo it.
//! [revert](Mouth::revert) undoes the most recent operations one at a time,
//! and [checkpoint](Mouth::checkpoint)/[rewind](Mouth::rewind) name a point
//! in the log by its index and roll everything back to it.
//! Multi-token speculative parses (keyword scanning, the numeric grammar,
//! macro calls) take a checkpoint, try, and rewind on failure; the rewind
//! restores token production only, so side effects such as `\catcode`
//! changes made while speculating stay committed.
//!
//! Three substitutions happen at the source-string level, before tokens
//! exist: `^^XY`/`^^c` escapes are spliced into the string in place (so
//! rewinding and re-lexing the region is consistent), comment characters
//! discard the rest of the line silently, and an end-of-line character
//! discards the rest of the line and synthesizes a single space token.

use crate::token::{CsNameInterner, Token, Value};
use crate::types::CatCode;

/// Source of category codes during lexing.
pub trait CatCodeFn {
    fn cat_code(&self, c: char) -> CatCode;
}

impl CatCodeFn for std::collections::HashMap<char, CatCode> {
    fn cat_code(&self, c: char) -> CatCode {
        self.get(&c).copied().unwrap_or_default()
    }
}

/// Sub-grammar selector for [Mouth::eat].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Context {
    /// Skip whitespace tokens entirely.
    #[default]
    Default,
    /// Return a single whitespace token instead of skipping it.
    ///
    /// Needed wherever a space is significant, such as terminating a number
    /// or following a keyword.
    PreSpace,
}

/// A point in the mouth's history that can be rewound to.
///
/// Checkpoints are plain indices into the append-only history log, so
/// taking one is free and holding one does not borrow the mouth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

struct HistoryEntry {
    /// Source position before the operation.
    pos: usize,
    /// Queue tokens consumed by the operation, in consumption order.
    popped: Vec<Token>,
    /// Number of tokens the operation pushed onto the queue.
    pushed: usize,
}

/// The mouth.
///
/// See the module documentation for the full contract.
pub struct Mouth {
    source: String,
    pos: usize,
    // The queue is a stack: the last element is the next token.
    queue: Vec<Token>,
    history: Vec<HistoryEntry>,
    // Control sequence names are read into a shared buffer to avoid
    // allocating for each one.
    buffer: String,
}

impl Mouth {
    pub fn new<T: Into<String>>(source: T) -> Mouth {
        Mouth {
            source: source.into(),
            pos: 0,
            queue: Vec::new(),
            history: Vec::new(),
            buffer: String::new(),
        }
    }

    /// Produces the next token, or `None` if the input is exhausted.
    ///
    /// Exactly one history entry is appended per call, including calls that
    /// return `None` (trailing whitespace may still have been consumed).
    pub fn eat<F: CatCodeFn>(
        &mut self,
        ctx: Context,
        cat_codes: &F,
        interner: &mut CsNameInterner,
    ) -> Option<Token> {
        let mut entry = HistoryEntry {
            pos: self.pos,
            popped: Vec::new(),
            pushed: 0,
        };
        let result = loop {
            let token = match self.queue.pop() {
                Some(token) => {
                    entry.popped.push(token);
                    token
                }
                None => match self.lex(cat_codes, interner) {
                    Some(token) => token,
                    None => break None,
                },
            };
            if matches!(token.value(), Value::Space(_)) && ctx == Context::Default {
                continue;
            }
            break Some(token);
        };
        self.history.push(entry);
        result
    }

    /// [Mouth::eat] followed by one [Mouth::revert].
    pub fn preview<F: CatCodeFn>(
        &mut self,
        ctx: Context,
        cat_codes: &F,
        interner: &mut CsNameInterner,
    ) -> Option<Token> {
        let token = self.eat(ctx, cat_codes, interner);
        self.revert(1);
        token
    }

    /// Pushes tokens to the front of the input.
    ///
    /// The first token in the slice is the next token read.
    pub fn push_tokens(&mut self, tokens: &[Token]) {
        self.history.push(HistoryEntry {
            pos: self.pos,
            popped: Vec::new(),
            pushed: tokens.len(),
        });
        self.queue.extend(tokens.iter().rev());
    }

    /// Pushes a single token back to the front of the input.
    pub fn push_back(&mut self, token: Token) {
        self.push_tokens(&[token]);
    }

    /// Undoes the last `n` operations.
    pub fn revert(&mut self, n: usize) {
        for _ in 0..n {
            let Some(entry) = self.history.pop() else {
                return;
            };
            for _ in 0..entry.pushed {
                self.queue.pop();
            }
            for token in entry.popped.into_iter().rev() {
                self.queue.push(token);
            }
            self.pos = entry.pos;
        }
    }

    /// Names the current point in history.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.history.len())
    }

    /// Rolls back every operation performed since the checkpoint was taken.
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        let n = self.history.len().saturating_sub(checkpoint.0);
        self.revert(n);
    }

    /// The portion of the source string that has not been consumed.
    pub fn remaining(&self) -> &str {
        &self.source[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn advance(&mut self, c: char) {
        self.pos += c.len_utf8();
    }

    fn lex<F: CatCodeFn>(&mut self, cat_codes: &F, interner: &mut CsNameInterner) -> Option<Token> {
        loop {
            self.apply_caret_escapes(cat_codes);
            let c = self.peek_char()?;
            match cat_codes.cat_code(c) {
                CatCode::Escape => {
                    self.advance(c);
                    return Some(self.read_control_sequence(cat_codes, interner));
                }
                CatCode::EndOfLine => {
                    self.discard_rest_of_line();
                    return Some(Token::new_space(' '));
                }
                CatCode::Comment => {
                    self.discard_rest_of_line();
                }
                CatCode::Ignored => {
                    self.advance(c);
                }
                CatCode::Invalid => {
                    self.advance(c);
                    return Some(Token::new_other(c).into_invalid());
                }
                code => {
                    self.advance(c);
                    return Some(Token::new_from_value(Value::new(c, code)));
                }
            }
        }
    }

    fn read_control_sequence<F: CatCodeFn>(
        &mut self,
        cat_codes: &F,
        interner: &mut CsNameInterner,
    ) -> Token {
        self.buffer.clear();
        self.apply_caret_escapes(cat_codes);
        match self.peek_char() {
            // An escape character at the very end of the input names the
            // empty control sequence, which is never defined.
            None => (),
            Some(first) => {
                self.advance(first);
                self.buffer.push(first);
                if cat_codes.cat_code(first) == CatCode::Letter {
                    loop {
                        self.apply_caret_escapes(cat_codes);
                        match self.peek_char() {
                            Some(c) if cat_codes.cat_code(c) == CatCode::Letter => {
                                self.advance(c);
                                self.buffer.push(c);
                            }
                            _ => break,
                        }
                    }
                    // Whitespace after a letter-named control sequence is
                    // consumed by the lexer and invisible to every context.
                    loop {
                        match self.peek_char() {
                            Some(c) if cat_codes.cat_code(c) == CatCode::Space => self.advance(c),
                            Some(c) if cat_codes.cat_code(c) == CatCode::EndOfLine => {
                                self.discard_rest_of_line()
                            }
                            _ => break,
                        }
                    }
                }
            }
        }
        Token::new_control_sequence(interner.get_or_intern(&self.buffer))
    }

    /// Substitutes `^^XY` (hex) and `^^c` (control character) escapes into
    /// the source string at the current position.
    ///
    /// The substitution splices the string, so re-lexing the region after a
    /// rewind sees the already-substituted character.
    fn apply_caret_escapes<F: CatCodeFn>(&mut self, cat_codes: &F) {
        loop {
            let mut chars = self.source[self.pos..].chars();
            let Some(c1) = chars.next() else { return };
            if cat_codes.cat_code(c1) != CatCode::Superscript {
                return;
            }
            let Some(c2) = chars.next() else { return };
            if c2 != c1 {
                return;
            }
            let Some(c3) = chars.next() else { return };
            let (replacement, consumed) = match (hex_digit(c3), chars.next().and_then(hex_digit)) {
                (Some(high), Some(low)) => {
                    let c = char::from_u32(high * 16 + low).unwrap();
                    (c, c1.len_utf8() * 2 + 2)
                }
                _ => {
                    if !c3.is_ascii() {
                        return;
                    }
                    let u = c3 as u32;
                    let m = if u < 0x40 { u + 0x40 } else { u - 0x40 };
                    (
                        char::from_u32(m).unwrap(),
                        c1.len_utf8() * 2 + c3.len_utf8(),
                    )
                }
            };
            let mut replacement_str = [0_u8; 4];
            let replacement_str = replacement.encode_utf8(&mut replacement_str);
            self.source
                .replace_range(self.pos..self.pos + consumed, replacement_str);
        }
    }

    fn discard_rest_of_line(&mut self) {
        while let Some(c) = self.peek_char() {
            self.advance(c);
            if c == '\n' {
                break;
            }
        }
    }
}

fn hex_digit(c: char) -> Option<u32> {
    match c {
        '0'..='9' => Some(c as u32 - '0' as u32),
        'a'..='f' => Some(c as u32 - 'a' as u32 + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CatCode::*;
    use std::collections::HashMap;

    enum Expected {
        Character(char, CatCode),
        ControlSequence(&'static str),
    }
    use Expected::Character;
    use Expected::ControlSequence;

    fn cat_code_map() -> HashMap<char, CatCode> {
        let mut map: HashMap<char, CatCode> = (0_u8..128)
            .map(|u| {
                let c = char::from(u);
                (c, CatCode::default_for(c))
            })
            .collect();
        map.insert('Z', Ignored);
        map
    }

    fn mouth_test(input: &str, expected: Vec<Expected>) {
        let map = cat_code_map();
        let mut interner = CsNameInterner::default();
        let mut mouth = Mouth::new(input);
        let mut actual = Vec::new();
        while let Some(t) = mouth.eat(Context::PreSpace, &map, &mut interner) {
            actual.push(t.value());
        }
        let expected: Vec<Value> = expected
            .into_iter()
            .map(|e| match e {
                Character(c, code) => Value::new(c, code),
                ControlSequence(name) => {
                    Value::CommandRef(crate::token::CommandRef::ControlSequence(
                        interner.get_or_intern(name),
                    ))
                }
            })
            .collect();
        assert_eq!(expected, actual);
    }

    macro_rules! mouth_tests {
        ($( ( $name: ident, $input: expr, $ ( $expected: expr, ) * ), )+) => {
            $(
            #[test]
            fn $name() {
                mouth_test($input, vec![ $( $expected ),* ]);
            }
            )+
        };
    }

    mouth_tests![
        (
            control_sequence_and_group,
            r"\a{b}",
            ControlSequence("a"),
            Character('{', BeginGroup),
            Character('b', Letter),
            Character('}', EndGroup),
        ),
        (
            multi_letter_control_sequence,
            r"\frac12",
            ControlSequence("frac"),
            Character('1', Other),
            Character('2', Other),
        ),
        (
            whitespace_after_control_word_is_consumed,
            "\\a  \nb",
            ControlSequence("a"),
            Character('b', Letter),
        ),
        (
            single_non_letter_control_sequence,
            r"\{x",
            ControlSequence("{"),
            Character('x', Letter),
        ),
        (
            comment_discards_line,
            "a%ignored\nb",
            Character('a', Letter),
            Character('b', Letter),
        ),
        (
            newline_produces_space,
            "a\nb",
            Character('a', Letter),
            Character(' ', Space),
            Character('b', Letter),
        ),
        (
            ignored_character,
            "aZb",
            Character('a', Letter),
            Character('b', Letter),
        ),
        (double_superscript_hex, "^^41", Character('A', Letter),),
        (double_superscript_control, "^^I", Character('\t', Space),),
        (
            double_superscript_in_cs_name,
            r"\^^61",
            ControlSequence("a"),
        ),
        (
            incomplete_superscript_escape,
            "^^",
            Character('^', Superscript),
            Character('^', Superscript),
        ),
    ];

    #[test]
    fn default_context_skips_spaces() {
        let map = cat_code_map();
        let mut interner = CsNameInterner::default();
        let mut mouth = Mouth::new("a  b");
        let a = mouth.eat(Context::Default, &map, &mut interner).unwrap();
        let b = mouth.eat(Context::Default, &map, &mut interner).unwrap();
        assert_eq!(a.value(), Value::Letter('a'));
        assert_eq!(b.value(), Value::Letter('b'));
    }

    #[test]
    fn pre_space_context_returns_space() {
        let map = cat_code_map();
        let mut interner = CsNameInterner::default();
        let mut mouth = Mouth::new("1 2");
        mouth.eat(Context::PreSpace, &map, &mut interner).unwrap();
        let space = mouth.eat(Context::PreSpace, &map, &mut interner).unwrap();
        assert_eq!(space.value(), Value::Space(' '));
    }

    #[test]
    fn revert_restores_source_tokens() {
        let map = cat_code_map();
        let mut interner = CsNameInterner::default();
        let mut mouth = Mouth::new("ab");
        let a1 = mouth.eat(Context::Default, &map, &mut interner).unwrap();
        mouth.revert(1);
        let a2 = mouth.eat(Context::Default, &map, &mut interner).unwrap();
        assert_eq!(a1, a2);
        let b = mouth.eat(Context::Default, &map, &mut interner).unwrap();
        assert_eq!(b.value(), Value::Letter('b'));
    }

    #[test]
    fn revert_restores_queue_tokens() {
        let map = cat_code_map();
        let mut interner = CsNameInterner::default();
        let mut mouth = Mouth::new("z");
        mouth.push_tokens(&[Token::new_letter('x'), Token::new_letter('y')]);
        let x = mouth.eat(Context::Default, &map, &mut interner).unwrap();
        assert_eq!(x.value(), Value::Letter('x'));
        mouth.revert(1);
        let x_again = mouth.eat(Context::Default, &map, &mut interner).unwrap();
        assert_eq!(x_again.value(), Value::Letter('x'));
    }

    #[test]
    fn rewind_undoes_pushed_tokens() {
        let map = cat_code_map();
        let mut interner = CsNameInterner::default();
        let mut mouth = Mouth::new("ab");
        let checkpoint = mouth.checkpoint();
        mouth.eat(Context::Default, &map, &mut interner).unwrap();
        mouth.push_tokens(&[Token::new_letter('q')]);
        mouth.eat(Context::Default, &map, &mut interner).unwrap();
        mouth.rewind(checkpoint);
        let a = mouth.eat(Context::Default, &map, &mut interner).unwrap();
        assert_eq!(a.value(), Value::Letter('a'));
        let b = mouth.eat(Context::Default, &map, &mut interner).unwrap();
        assert_eq!(b.value(), Value::Letter('b'));
        assert!(mouth.eat(Context::Default, &map, &mut interner).is_none());
    }

    #[test]
    fn preview_does_not_consume() {
        let map = cat_code_map();
        let mut interner = CsNameInterner::default();
        let mut mouth = Mouth::new("a");
        let p = mouth.preview(Context::Default, &map, &mut interner).unwrap();
        let e = mouth.eat(Context::Default, &map, &mut interner).unwrap();
        assert_eq!(p, e);
    }

    #[test]
    fn remaining_source() {
        let map = cat_code_map();
        let mut interner = CsNameInterner::default();
        let mut mouth = Mouth::new("a rest");
        mouth.eat(Context::Default, &map, &mut interner).unwrap();
        assert_eq!(mouth.remaining(), " rest");
    }
}
