//! Category codes and the default category code table.

use CatCode::*;

/// Enum representing all 16 category codes in TeX.
///
/// Each variant's documentation contains an example character which is
/// mapped to that category code by default.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CatCode {
    /// Marks the beginning of a control sequence.
    /// Example: `\`.
    ///
    /// This category code is never seen outside of the mouth.
    Escape = 0,
    /// Begins a new group.
    /// Example: `{`.
    BeginGroup = 1,
    /// Ends an existing group.
    /// Example: `}`.
    EndGroup = 2,
    /// Starts or ends math mode.
    /// Example: `$`.
    MathShift = 3,
    /// Separates cells in an alignment.
    /// Example: `&`.
    AlignmentTab = 4,
    /// Marks the end of a line in the input; the rest of the line is
    /// discarded and a single space is synthesized.
    /// Example: `\n`.
    ///
    /// This category code is never seen outside of the mouth.
    EndOfLine = 5,
    /// Marks the beginning of a parameter number.
    /// Example: `#`.
    Parameter = 6,
    /// Puts the following character or group in a superscript.
    /// Also introduces `^^` character escapes.
    /// Example: `^`.
    Superscript = 7,
    /// Puts the following character or group in a subscript.
    /// Example: `_`.
    Subscript = 8,
    /// Character that is ignored by the mouth.
    /// Example: ASCII null (0).
    Ignored = 9,
    /// Whitespace. Example: ` `.
    Space = 10,
    /// A character that can be used in a control sequence name.
    /// Examples: `[a-zA-Z]`.
    Letter = 11,
    /// A character that cannot be used in a control sequence name.
    /// Example: `@`.
    #[default]
    Other = 12,
    /// A single character that behaves like a control sequence.
    /// Example: `~`.
    Active = 13,
    /// Marks the beginning of a comment.
    /// All characters until the end of the line are discarded.
    /// Example: `%`.
    ///
    /// This category code is never seen outside of the mouth.
    Comment = 14,
    /// An invalid character. The mouth produces a token marked invalid.
    /// Example: ASCII delete (127).
    Invalid = 15,
}

impl TryFrom<u8> for CatCode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Escape),
            1 => Ok(BeginGroup),
            2 => Ok(EndGroup),
            3 => Ok(MathShift),
            4 => Ok(AlignmentTab),
            5 => Ok(EndOfLine),
            6 => Ok(Parameter),
            7 => Ok(Superscript),
            8 => Ok(Subscript),
            9 => Ok(Ignored),
            10 => Ok(Space),
            11 => Ok(Letter),
            12 => Ok(Other),
            13 => Ok(Active),
            14 => Ok(Comment),
            15 => Ok(Invalid),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for CatCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ({})", self, *self as u8)
    }
}

impl CatCode {
    /// The default category code of the provided character.
    ///
    /// These are the plain TeX assignments: letters are [Letter],
    /// `\` is the escape character, `{`/`}` group, `$` is the math shift,
    /// and so on. Characters outside ASCII default to [Other].
    pub fn default_for(c: char) -> CatCode {
        match c {
            '\\' => Escape,
            '{' => BeginGroup,
            '}' => EndGroup,
            '$' => MathShift,
            '&' => AlignmentTab,
            '\r' | '\n' => EndOfLine,
            '#' => Parameter,
            '^' => Superscript,
            '_' => Subscript,
            '\0' => Ignored,
            ' ' | '\t' => Space,
            'a'..='z' | 'A'..='Z' => Letter,
            '~' => Active,
            '%' => Comment,
            '\u{7F}' => Invalid,
            _ => Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u8_round_trip() {
        for u in 0..=15_u8 {
            let cat_code: CatCode = u.try_into().unwrap();
            assert_eq!(cat_code as u8, u);
        }
        assert_eq!(CatCode::try_from(16), Err(()));
    }

    #[test]
    fn defaults() {
        assert_eq!(CatCode::default_for('\\'), Escape);
        assert_eq!(CatCode::default_for('q'), Letter);
        assert_eq!(CatCode::default_for('Q'), Letter);
        assert_eq!(CatCode::default_for('3'), Other);
        assert_eq!(CatCode::default_for('é'), Other);
        assert_eq!(CatCode::default_for('$'), MathShift);
    }
}
