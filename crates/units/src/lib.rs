//! Numeric value types used in Mathcraft.
//!
//! Every mutable register in the interpreter holds one of the types defined
//! here: a clamped [Int], a [Dimen] with separate absolute and font-relative
//! parts, a [MuDimen] in math units, [Glue]/[MuGlue] with optional stretch
//! and shrink, or an [InfDimen] of some infinity order.
//! The [Value] enum is the tagged union over all of them.
//!
//! Fractional quantities are fixed point: the inner integer is the
//! represented number multiplied by 2^16, as in classic TeX arithmetic.

use std::fmt::Write;

/// Number of fixed-point units per whole unit (2^16).
pub const UNITY: i64 = 1 << 16;

/// A clamped integer.
///
/// The inner value is always in `[-Int::MAX_MAGNITUDE, Int::MAX_MAGNITUDE]`.
/// All constructors and arithmetic clamp into this range rather than wrap
/// or error.
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Int(i64);

impl Int {
    /// The largest magnitude an [Int] can hold, 2^53-1.
    pub const MAX_MAGNITUDE: i64 = 9_007_199_254_740_991;

    /// The zero integer.
    pub const ZERO: Int = Int(0);

    /// Create an integer, clamping the value into the legal range.
    pub fn new(value: i64) -> Int {
        Int(value.clamp(-Int::MAX_MAGNITUDE, Int::MAX_MAGNITUDE))
    }

    /// The inner value.
    pub fn get(self) -> i64 {
        self.0
    }

    pub fn is_odd(self) -> bool {
        self.0.rem_euclid(2) == 1
    }

    pub fn checked_append_digit(self, radix: i64, digit: i64) -> Option<Int> {
        let appended = (self.0 as i128) * (radix as i128) + digit as i128;
        if appended.unsigned_abs() > Int::MAX_MAGNITUDE as u128 {
            None
        } else {
            Some(Int(appended as i64))
        }
    }
}

impl From<i64> for Int {
    fn from(value: i64) -> Self {
        Int::new(value)
    }
}

impl std::ops::Neg for Int {
    type Output = Int;
    fn neg(self) -> Int {
        Int(-self.0)
    }
}

impl std::ops::Add<Int> for Int {
    type Output = Int;
    fn add(self, rhs: Int) -> Int {
        Int::new(self.0.saturating_add(rhs.0))
    }
}

impl std::fmt::Display for Int {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A physical unit accepted by the dimension grammar.
///
/// The `em` and `ex` units are not here: they are font-relative and target
/// the `em` part of a [Dimen] instead of the `sp` part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalUnit {
    Point,
    Pica,
    Inch,
    BigPoint,
    Centimeter,
    Millimeter,
    DidotPoint,
    ScaledPoint,
}

impl PhysicalUnit {
    /// The keyword that introduces this unit in the input.
    pub fn keyword(self) -> &'static str {
        use PhysicalUnit::*;
        match self {
            Point => "pt",
            Pica => "pc",
            Inch => "in",
            BigPoint => "bp",
            Centimeter => "cm",
            Millimeter => "mm",
            DidotPoint => "dd",
            ScaledPoint => "sp",
        }
    }

    /// Returns the fraction `(n, d)` converting this unit to points:
    /// a length of `x` in this unit is `xn/d` points.
    pub fn conversion_fraction(self) -> (i64, i64) {
        use PhysicalUnit::*;
        match self {
            Point => (1, 1),
            Pica => (12, 1),
            Inch => (7227, 100),
            BigPoint => (7227, 7200),
            Centimeter => (7227, 254),
            Millimeter => (7227, 2540),
            DidotPoint => (1238, 1157),
            ScaledPoint => (1, UNITY),
        }
    }
}

/// Multiplies a fixed-point value by the fraction `n/d`, rounding to nearest.
///
/// The intermediate product is computed at 128 bits, so the only way to get
/// a wrong answer is a result outside the i64 range, which no dimension
/// reachable from the grammar produces.
pub fn scale_fraction(value: i64, n: i64, d: i64) -> i64 {
    let wide = value as i128 * n as i128;
    let d = d as i128;
    let rounded = if wide >= 0 {
        (wide + d / 2) / d
    } else {
        (wide - d / 2) / d
    };
    rounded as i64
}

/// Converts a decimal fraction (most significant digit first) to a
/// fixed-point value in `[0, UNITY)`.
pub fn fixed_from_decimal_digits(digits: &[u8]) -> i64 {
    let mut a: i64 = 0;
    for d in digits.iter().rev() {
        a = (a + (*d as i64) * (UNITY * 2)) / 10;
    }
    (a + 1) / 2
}

/// Writes a fixed-point value as a decimal number with enough digits to
/// round-trip.
fn write_fixed(f: &mut std::fmt::Formatter<'_>, value: i64) -> std::fmt::Result {
    if value < 0 {
        write!(f, "-")?;
    }
    let value = value.abs();
    write!(f, "{}.", value / UNITY)?;
    let mut frac = (value % UNITY) * 10 + 5;
    let mut delta: i64 = 10;
    loop {
        if delta > UNITY {
            frac += UNITY / 2 - delta / 2;
        }
        f.write_char(char::from_digit((frac / UNITY) as u32, 10).unwrap())?;
        frac = (frac % UNITY) * 10;
        delta *= 10;
        if frac <= delta {
            break;
        }
    }
    Ok(())
}

/// A dimension.
///
/// The absolute part `sp` is in scaled points (2^16 sp = 1 pt).
/// The font-relative part `em` is in scaled ems (2^16 = 1 em).
/// The two parts stay separate because there is no absolute size for an em
/// until a renderer supplies font metrics.
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimen {
    pub sp: i64,
    pub em: i64,
}

impl Dimen {
    pub const ZERO: Dimen = Dimen { sp: 0, em: 0 };

    /// A dimension of `scaled` fixed-point units of the given physical unit.
    pub fn from_units(scaled: i64, unit: PhysicalUnit) -> Dimen {
        let (n, d) = unit.conversion_fraction();
        Dimen {
            sp: scale_fraction(scaled, n, d),
            em: 0,
        }
    }

    /// A dimension of `scaled` fixed-point ems.
    pub fn from_ems(scaled: i64) -> Dimen {
        Dimen { sp: 0, em: scaled }
    }

    /// A dimension of `scaled` fixed-point exes. One ex is 233/480 em.
    pub fn from_exes(scaled: i64) -> Dimen {
        Dimen {
            sp: 0,
            em: scale_fraction(scaled, 233, 480),
        }
    }

    /// Coerces the dimension to an integer.
    ///
    /// The em part is folded in at 12 pt per em, the conventional size used
    /// before any font is known.
    pub fn to_int(self) -> Int {
        Int::new(self.sp + 12 * self.em)
    }

    pub fn is_zero(self) -> bool {
        self.sp == 0 && self.em == 0
    }

    pub fn scale(self, n: i64, d: i64) -> Dimen {
        Dimen {
            sp: scale_fraction(self.sp, n, d),
            em: scale_fraction(self.em, n, d),
        }
    }
}

impl std::ops::Add<Dimen> for Dimen {
    type Output = Dimen;
    fn add(self, rhs: Dimen) -> Dimen {
        Dimen {
            sp: self.sp + rhs.sp,
            em: self.em + rhs.em,
        }
    }
}

impl std::ops::Neg for Dimen {
    type Output = Dimen;
    fn neg(self) -> Dimen {
        Dimen {
            sp: -self.sp,
            em: -self.em,
        }
    }
}

impl std::fmt::Display for Dimen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.em == 0 || self.sp != 0 {
            write_fixed(f, self.sp)?;
            write!(f, "pt")?;
        }
        if self.em != 0 {
            if self.sp != 0 {
                write!(f, " + ")?;
            }
            write_fixed(f, self.em)?;
            write!(f, "em")?;
        }
        Ok(())
    }
}

/// A dimension in math units. 18 mu = 1 em.
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MuDimen {
    pub mu: i64,
}

impl MuDimen {
    pub const ZERO: MuDimen = MuDimen { mu: 0 };

    pub fn new(mu: i64) -> MuDimen {
        MuDimen { mu }
    }

    /// Converts to an em-relative [Dimen].
    pub fn to_dimen(self) -> Dimen {
        Dimen::from_ems(scale_fraction(self.mu, 1, 18))
    }

    pub fn to_int(self) -> Int {
        self.to_dimen().to_int()
    }
}

impl std::ops::Neg for MuDimen {
    type Output = MuDimen;
    fn neg(self) -> MuDimen {
        MuDimen { mu: -self.mu }
    }
}

impl std::fmt::Display for MuDimen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_fixed(f, self.mu)?;
        write!(f, "mu")
    }
}

/// Order of infinity of a glue stretch or shrink.
///
/// Stretch of a higher order dominates: if a list contains any `fil`
/// stretch, finite stretch in the same list is not used at all.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlueOrder {
    #[default]
    Normal,
    Fil,
    Fill,
    Filll,
}

impl GlueOrder {
    /// Parses an infinite glue order from a keyword.
    pub fn parse(s: &str) -> Option<GlueOrder> {
        use GlueOrder::*;
        Some(match s {
            "fil" => Fil,
            "fill" => Fill,
            "filll" => Filll,
            _ => return None,
        })
    }
}

/// An infinite dimension: a magnitude of some fil order.
///
/// Produced by the glue grammar for `<factor> fil|fill|filll`.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfDimen {
    /// Always `Fil`, `Fill` or `Filll`.
    pub order: GlueOrder,
    /// Fixed-point magnitude.
    pub magnitude: i64,
}

/// Glue: a dimension with optional stretch and shrink.
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glue {
    pub start: Dimen,
    pub stretch: Dimen,
    pub stretch_order: GlueOrder,
    pub shrink: Dimen,
    pub shrink_order: GlueOrder,
}

impl Glue {
    pub fn from_dimen(start: Dimen) -> Glue {
        Glue {
            start,
            ..Default::default()
        }
    }
}

/// Glue in math units.
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MuGlue {
    pub start: MuDimen,
    pub stretch: MuDimen,
    pub stretch_order: GlueOrder,
    pub shrink: MuDimen,
    pub shrink_order: GlueOrder,
}

impl MuGlue {
    pub fn from_mu_dimen(start: MuDimen) -> MuGlue {
        MuGlue {
            start,
            ..Default::default()
        }
    }
}

/// The content of a register: the tagged union over every value type.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Int(Int),
    Dimen(Dimen),
    MuDimen(MuDimen),
    Glue(Glue),
    MuGlue(MuGlue),
    InfDimen(InfDimen),
}

impl Value {
    /// Coerces the value to an integer, when the value has one.
    ///
    /// Glue coerces through its start dimension; infinite dimensions have
    /// no integer value.
    pub fn to_int(self) -> Option<Int> {
        match self {
            Value::Int(i) => Some(i),
            Value::Dimen(d) => Some(d.to_int()),
            Value::MuDimen(d) => Some(d.to_int()),
            Value::Glue(g) => Some(g.start.to_int()),
            Value::MuGlue(g) => Some(g.start.to_int()),
            Value::InfDimen(_) => None,
        }
    }

    /// Coerces the value to a dimension, when the value has one.
    pub fn to_dimen(self) -> Option<Dimen> {
        match self {
            Value::Int(_) => None,
            Value::Dimen(d) => Some(d),
            Value::MuDimen(d) => Some(d.to_dimen()),
            Value::Glue(g) => Some(g.start),
            Value::MuGlue(g) => Some(g.start.to_dimen()),
            Value::InfDimen(_) => None,
        }
    }
}

fn order_suffix(order: GlueOrder) -> Option<&'static str> {
    match order {
        GlueOrder::Normal => None,
        GlueOrder::Fil => Some("fil"),
        GlueOrder::Fill => Some("fill"),
        GlueOrder::Filll => Some("filll"),
    }
}

fn write_component(
    f: &mut std::fmt::Formatter<'_>,
    magnitude: i64,
    finite: &Dimen,
    order: GlueOrder,
) -> std::fmt::Result {
    match order_suffix(order) {
        None => write!(f, "{finite}"),
        Some(suffix) => {
            write_fixed(f, magnitude)?;
            write!(f, "{suffix}")
        }
    }
}

fn write_mu_component(
    f: &mut std::fmt::Formatter<'_>,
    component: MuDimen,
    order: GlueOrder,
) -> std::fmt::Result {
    match order_suffix(order) {
        None => write!(f, "{component}"),
        Some(suffix) => {
            write_fixed(f, component.mu)?;
            write!(f, "{suffix}")
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Dimen(d) => write!(f, "{d}"),
            Value::MuDimen(d) => write!(f, "{d}"),
            Value::Glue(g) => {
                write!(f, "{}", g.start)?;
                if !g.stretch.is_zero() {
                    write!(f, " plus ")?;
                    write_component(f, g.stretch.sp, &g.stretch, g.stretch_order)?;
                }
                if !g.shrink.is_zero() {
                    write!(f, " minus ")?;
                    write_component(f, g.shrink.sp, &g.shrink, g.shrink_order)?;
                }
                Ok(())
            }
            Value::MuGlue(g) => {
                write!(f, "{}", g.start)?;
                if g.stretch.mu != 0 {
                    write!(f, " plus ")?;
                    write_mu_component(f, g.stretch, g.stretch_order)?;
                }
                if g.shrink.mu != 0 {
                    write!(f, " minus ")?;
                    write_mu_component(f, g.shrink, g.shrink_order)?;
                }
                Ok(())
            }
            Value::InfDimen(i) => {
                write_fixed(f, i.magnitude)?;
                match i.order {
                    GlueOrder::Normal | GlueOrder::Fil => write!(f, "fil"),
                    GlueOrder::Fill => write!(f, "fill"),
                    GlueOrder::Filll => write!(f, "filll"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_clamps_on_construction() {
        assert_eq!(Int::new(i64::MAX).get(), Int::MAX_MAGNITUDE);
        assert_eq!(Int::new(i64::MIN).get(), -Int::MAX_MAGNITUDE);
        assert_eq!(Int::new(42).get(), 42);
    }

    #[test]
    fn int_append_digit() {
        let i = Int::new(12);
        assert_eq!(i.checked_append_digit(10, 3), Some(Int::new(123)));
        let max = Int::new(Int::MAX_MAGNITUDE);
        assert_eq!(max.checked_append_digit(10, 0), None);
    }

    #[test]
    fn unit_conversions() {
        assert_eq!(
            Dimen::from_units(UNITY, PhysicalUnit::Point),
            Dimen { sp: UNITY, em: 0 }
        );
        assert_eq!(
            Dimen::from_units(UNITY, PhysicalUnit::Pica),
            Dimen {
                sp: 12 * UNITY,
                em: 0
            }
        );
        assert_eq!(
            Dimen::from_units(UNITY, PhysicalUnit::ScaledPoint),
            Dimen { sp: 1, em: 0 }
        );
        // 1in = 72.27pt, exactly 7227/100.
        assert_eq!(
            Dimen::from_units(UNITY, PhysicalUnit::Inch).sp,
            scale_fraction(UNITY, 7227, 100)
        );
    }

    #[test]
    fn ex_is_fraction_of_em() {
        assert_eq!(Dimen::from_exes(480 * UNITY).em, 233 * UNITY);
    }

    #[test]
    fn dimen_int_coercion() {
        let d = Dimen { sp: 40, em: 0 };
        assert_eq!(d.to_int(), Int::new(40));
        let d = Dimen { sp: 0, em: UNITY };
        assert_eq!(d.to_int(), Int::new(12 * UNITY));
    }

    #[test]
    fn mu_conversion() {
        // 18mu = 1em
        assert_eq!(MuDimen::new(18 * UNITY).to_dimen(), Dimen::from_ems(UNITY));
    }

    #[test]
    fn decimal_fraction() {
        assert_eq!(fixed_from_decimal_digits(&[5]), UNITY / 2);
        assert_eq!(fixed_from_decimal_digits(&[2, 5]), UNITY / 4);
        assert_eq!(fixed_from_decimal_digits(&[]), 0);
    }

    #[test]
    fn display_dimen() {
        assert_eq!(
            Value::Dimen(Dimen {
                sp: UNITY,
                em: 0
            })
            .to_string(),
            "1.0pt"
        );
        assert_eq!(
            Value::Dimen(Dimen {
                sp: -3 * UNITY / 2,
                em: 0
            })
            .to_string(),
            "-1.5pt"
        );
        assert_eq!(Value::Dimen(Dimen { sp: 0, em: UNITY }).to_string(), "1.0em");
    }

    #[test]
    fn display_glue() {
        let g = Glue {
            start: Dimen { sp: UNITY, em: 0 },
            stretch: Dimen { sp: UNITY / 2, em: 0 },
            stretch_order: GlueOrder::Fil,
            ..Default::default()
        };
        assert_eq!(Value::Glue(g).to_string(), "1.0pt plus 0.5fil");

        let g = Glue {
            start: Dimen { sp: UNITY, em: 0 },
            stretch: Dimen { sp: 2 * UNITY, em: 0 },
            ..Default::default()
        };
        assert_eq!(Value::Glue(g).to_string(), "1.0pt plus 2.0pt");
    }

    #[test]
    fn value_coercions() {
        let g = Glue::from_dimen(Dimen { sp: 7, em: 0 });
        assert_eq!(Value::Glue(g).to_int(), Some(Int::new(7)));
        assert_eq!(
            Value::InfDimen(InfDimen {
                order: GlueOrder::Fil,
                magnitude: UNITY
            })
            .to_int(),
            None
        );
    }
}
