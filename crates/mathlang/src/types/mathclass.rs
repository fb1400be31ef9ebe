//! Math classes and the default math code table.

use MathClass::*;

/// The classification of a character in math mode.
///
/// The class of the atom built for a character token is looked up in the
/// math code table, and drives inter-atom spacing in the renderer.
/// The numeric values are the ones accepted by `\mathcode`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MathClass {
    /// An ordinary character, like a digit.
    #[default]
    Ord = 0,
    /// A large operator, like a summation sign.
    Op = 1,
    /// A binary operator, like `+`.
    Bin = 2,
    /// A relation, like `=`.
    Rel = 3,
    /// An opening delimiter, like `(`.
    Open = 4,
    /// A closing delimiter, like `)`.
    Close = 5,
    /// Punctuation, like `,`.
    Punct = 6,
    /// A variable: an ordinary character rendered in the italic math font.
    /// Letters have this class by default.
    Variable = 7,
}

impl TryFrom<u8> for MathClass {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Ord),
            1 => Ok(Op),
            2 => Ok(Bin),
            3 => Ok(Rel),
            4 => Ok(Open),
            5 => Ok(Close),
            6 => Ok(Punct),
            7 => Ok(Variable),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for MathClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ({})", self, *self as u8)
    }
}

impl MathClass {
    /// The default math class of the provided character.
    ///
    /// Characters without an entry in the math code table get their class
    /// from here; anything unlisted is [Ord].
    pub fn default_for(c: char) -> MathClass {
        match c {
            'a'..='z' | 'A'..='Z' => Variable,
            '+' | '-' | '*' | '±' | '×' | '÷' => Bin,
            '=' | '<' | '>' | ':' => Rel,
            '(' | '[' => Open,
            ')' | ']' => Close,
            ',' | ';' | '!' | '?' => Punct,
            _ => Ord,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u8_round_trip() {
        for u in 0..=7_u8 {
            let class: MathClass = u.try_into().unwrap();
            assert_eq!(class as u8, u);
        }
        assert_eq!(MathClass::try_from(8), Err(()));
    }

    #[test]
    fn defaults() {
        assert_eq!(MathClass::default_for('x'), Variable);
        assert_eq!(MathClass::default_for('4'), Ord);
        assert_eq!(MathClass::default_for('+'), Bin);
        assert_eq!(MathClass::default_for('='), Rel);
        assert_eq!(MathClass::default_for('('), Open);
        assert_eq!(MathClass::default_for(','), Punct);
    }
}
