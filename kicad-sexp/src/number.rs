//! Numeric atoms.
use logos::Logos;
use smol_str::SmolStr;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Logos)]
enum NumberToken {
    #[regex(r"[+-]?[0-9]+")]
    Integer,
    #[regex(r"[+-]?[0-9]+\.[0-9]*")]
    Decimal,
}

/// Shape of an atom that reads as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberKind {
    Integer,
    Decimal,
}

/// Classifies an unquoted token as an integer or a decimal, if it is either.
pub(crate) fn classify(str: &str) -> Option<NumberKind> {
    let mut lexer = NumberToken::lexer(str);
    match [lexer.next(), lexer.next()] {
        [Some(Ok(NumberToken::Integer)), None] => Some(NumberKind::Integer),
        [Some(Ok(NumberToken::Decimal)), None] => Some(NumberKind::Decimal),
        _ => None,
    }
}

/// An exact decimal number, kept as text.
///
/// The text is canonical: no leading `+`, no redundant leading zeros in the
/// integer part and no dangling `.`. Fractional digits are kept as written,
/// so `1.50` is printed back as `1.50`. Comparison is numeric, so `1.50` and
/// `1.5` are equal, as are `-0.0` and `0`.
///
/// A decimal without fractional digits prints like an integer, so it reads
/// back as [`Node::Int`](crate::Node::Int).
#[derive(Debug, Clone)]
pub struct Decimal(SmolStr);

impl Decimal {
    /// Reads a decimal from text of the form `[+-]digits[.digits]`.
    pub fn new(text: &str) -> Option<Self> {
        classify(text)?;
        Some(Self::canonical(text))
    }

    /// Builds the decimal `mantissa * 10^-scale`.
    pub fn from_scaled(mantissa: i64, scale: u32) -> Self {
        let digits = mantissa.unsigned_abs().to_string();
        let scale = scale as usize;
        let digits = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
        } else {
            digits
        };

        let mut text = String::with_capacity(digits.len() + 2);
        if mantissa < 0 {
            text.push('-');
        }
        let (int, frac) = digits.split_at(digits.len() - scale);
        text.push_str(int);
        if !frac.is_empty() {
            text.push('.');
            text.push_str(frac);
        }
        Self(text.into())
    }

    /// Canonicalizes text that is already known to be numeric.
    fn canonical(text: &str) -> Self {
        let (negative, digits) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
        let int = match int.trim_start_matches('0') {
            "" => "0",
            int => int,
        };

        let mut out = String::with_capacity(text.len());
        if negative {
            out.push('-');
        }
        out.push_str(int);
        if !frac.is_empty() {
            out.push('.');
            out.push_str(frac);
        }
        Self(out.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts to the nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        // Canonical text is always valid float syntax.
        self.0.parse().unwrap_or(f64::NAN)
    }

    /// Sign, integer digits and fractional digits without trailing zeros.
    fn key(&self) -> (bool, &str, &str) {
        let (negative, digits) = match self.0.strip_prefix('-') {
            Some(digits) => (true, digits),
            None => (false, self.0.as_str()),
        };
        let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
        let frac = frac.trim_end_matches('0');
        let zero = int == "0" && frac.is_empty();
        (negative && !zero, int, frac)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Decimal {}

impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self(value.to_string().into())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("`{0}` is not a decimal number")]
pub struct DecimalError(String);

impl FromStr for Decimal {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::new(s).ok_or_else(|| DecimalError(s.to_string()))
    }
}
