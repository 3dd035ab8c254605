//! Print values into s-expressions.
//!
//! Any type implementing [`Print`] can be written, not just [`Node`] trees, so
//! generators may print their own part descriptions directly.
//!
//! [`Node`]: crate::Node
use smol_str::SmolStr;
use std::rc::Rc;
use std::sync::Arc;

use crate::number::Decimal;

mod layout;
pub use layout::{to_string, to_string_at};

/// How strings that need quotes are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Escaping {
    /// Escape `"`, `\`, newline, carriage return and tab.
    #[default]
    Escaped,
    /// Write the string between quotes unchanged, as older library files were
    /// written. The output only reads back if the string has no `"` in it.
    Legacy,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    /// Number of fractional digits written for floats.
    pub float_precision: usize,
    pub escaping: Escaping,
    /// Deepest list nesting that may be printed.
    pub max_depth: usize,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            float_precision: 4,
            escaping: Escaping::Escaped,
            max_depth: 256,
        }
    }
}

impl Style {
    pub fn float_precision(mut self, digits: usize) -> Self {
        self.float_precision = digits;
        self
    }

    pub fn escaping(mut self, escaping: Escaping) -> Self {
        self.escaping = escaping;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// An error while printing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerateError {
    #[error("list nesting exceeds the maximum depth of {0}")]
    TooDeep(usize),
    #[error("cannot write non-finite float {0}")]
    NonFinite(f64),
}

/// Trait for types that can print s-expressions.
pub trait Printer: Sized {
    type Error;

    /// Print a string atom.
    fn atom(&mut self, atom: &str) -> Result<(), Self::Error>;

    /// Print an integer.
    fn int(&mut self, int: i64) -> Result<(), Self::Error>;

    /// Print a float.
    fn float(&mut self, float: f64) -> Result<(), Self::Error>;

    /// Print an exact decimal.
    fn decimal(&mut self, decimal: &Decimal) -> Result<(), Self::Error>;

    /// Print a list given a function that prints the contents.
    fn list<F>(&mut self, f: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Self::Error>;

    /// Print a printable value.
    fn print(&mut self, value: impl Print) -> Result<(), Self::Error> {
        value.print(self)
    }
}

/// Trait for types that can be printed as an s-expression.
pub trait Print {
    fn print<P: Printer>(&self, printer: &mut P) -> Result<(), P::Error>;
}

impl<T: Print + ?Sized> Print for &T {
    #[inline]
    fn print<P: Printer>(&self, printer: &mut P) -> Result<(), P::Error> {
        (**self).print(printer)
    }
}

impl<T: Print + ?Sized> Print for Box<T> {
    #[inline]
    fn print<P: Printer>(&self, printer: &mut P) -> Result<(), P::Error> {
        (**self).print(printer)
    }
}

impl<T: Print + ?Sized> Print for Rc<T> {
    #[inline]
    fn print<P: Printer>(&self, printer: &mut P) -> Result<(), P::Error> {
        (**self).print(printer)
    }
}

impl<T: Print + ?Sized> Print for Arc<T> {
    #[inline]
    fn print<P: Printer>(&self, printer: &mut P) -> Result<(), P::Error> {
        (**self).print(printer)
    }
}

/// Prints the items one after the other, without delimiters.
impl<T: Print> Print for [T] {
    #[inline]
    fn print<P: Printer>(&self, printer: &mut P) -> Result<(), P::Error> {
        for item in self {
            printer.print(item)?;
        }
        Ok(())
    }
}

impl<T: Print> Print for Vec<T> {
    #[inline]
    fn print<P: Printer>(&self, printer: &mut P) -> Result<(), P::Error> {
        self.as_slice().print(printer)
    }
}

impl Print for str {
    fn print<P: Printer>(&self, printer: &mut P) -> Result<(), P::Error> {
        printer.atom(self)
    }
}

impl Print for String {
    fn print<P: Printer>(&self, printer: &mut P) -> Result<(), P::Error> {
        printer.atom(self)
    }
}

impl Print for SmolStr {
    fn print<P: Printer>(&self, printer: &mut P) -> Result<(), P::Error> {
        printer.atom(self)
    }
}

impl Print for i64 {
    fn print<P: Printer>(&self, printer: &mut P) -> Result<(), P::Error> {
        printer.int(*self)
    }
}

impl Print for f64 {
    fn print<P: Printer>(&self, printer: &mut P) -> Result<(), P::Error> {
        printer.float(*self)
    }
}

impl Print for Decimal {
    fn print<P: Printer>(&self, printer: &mut P) -> Result<(), P::Error> {
        printer.decimal(self)
    }
}
