use std::fmt::Write as _;

use super::{GenerateError, Print, Printer, Style};
use crate::escape::escape_atom;
use crate::number::Decimal;

/// Printer for the line-per-list layout of KiCad library files.
///
/// Each list starts on a new line, indented by two spaces per level of
/// nesting. The first atom of a list is its tag and is written as is.
struct LayoutPrinter<'a> {
    style: &'a Style,
    string: String,
    depth: usize,
    nesting: usize,
    needs_whitespace: bool,
    at_head: bool,
}

impl<'a> LayoutPrinter<'a> {
    fn new(style: &'a Style, depth: usize) -> Self {
        Self {
            style,
            string: String::new(),
            depth,
            nesting: 0,
            needs_whitespace: false,
            at_head: false,
        }
    }

    #[inline]
    fn separate(&mut self) {
        if self.needs_whitespace {
            self.string.push(' ');
        }
        self.needs_whitespace = true;
        self.at_head = false;
    }

    /// Ends the current line, dropping trailing whitespace.
    ///
    /// Quoted atoms end in `"`, so their contents are never trimmed.
    fn break_line(&mut self) {
        let len = self.string.trim_end_matches([' ', '\t']).len();
        self.string.truncate(len);
        self.string.push('\n');
    }
}

impl<'a> Printer for LayoutPrinter<'a> {
    type Error = GenerateError;

    fn atom(&mut self, atom: &str) -> Result<(), Self::Error> {
        // An empty tag is still quoted, otherwise it would vanish.
        let literal = self.at_head && !atom.is_empty();
        self.separate();
        if literal {
            self.string.push_str(atom);
        } else {
            self.string.push_str(&escape_atom(atom, self.style.escaping));
        }
        Ok(())
    }

    fn int(&mut self, int: i64) -> Result<(), Self::Error> {
        self.separate();
        let _ = write!(&mut self.string, "{}", int);
        Ok(())
    }

    fn float(&mut self, float: f64) -> Result<(), Self::Error> {
        if !float.is_finite() {
            return Err(GenerateError::NonFinite(float));
        }

        self.separate();
        let _ = write!(
            &mut self.string,
            "{:.*}",
            self.style.float_precision,
            float
        );
        Ok(())
    }

    fn decimal(&mut self, decimal: &Decimal) -> Result<(), Self::Error> {
        self.separate();
        self.string.push_str(decimal.as_str());
        Ok(())
    }

    fn list<F>(&mut self, f: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Self::Error>,
    {
        if self.nesting >= self.style.max_depth {
            return Err(GenerateError::TooDeep(self.style.max_depth));
        }

        self.separate();
        self.break_line();
        self.string
            .extend(std::iter::repeat(' ').take(self.depth * 2));
        self.string.push('(');

        self.needs_whitespace = false;
        self.at_head = true;
        self.depth += 1;
        self.nesting += 1;
        f(self)?;
        self.depth -= 1;
        self.nesting -= 1;

        self.string.push(')');
        self.needs_whitespace = true;
        self.at_head = false;
        Ok(())
    }
}

/// Print a `T` into an s-expression string, using the default [`Style`].
///
/// Lists are printed starting at nesting depth 0, so a top-level list begins
/// with a newline and no indentation.
pub fn to_string<T: Print>(value: T) -> Result<String, GenerateError> {
    to_string_at(value, 0, &Style::default())
}

/// Print a `T` into an s-expression string, with its outermost lists indented
/// for nesting depth `depth`.
///
/// The output depends only on `value`, `depth` and `style`.
pub fn to_string_at<T: Print>(
    value: T,
    depth: usize,
    style: &Style,
) -> Result<String, GenerateError> {
    let mut printer = LayoutPrinter::new(style, depth);
    value.print(&mut printer)?;
    Ok(printer.string)
}
