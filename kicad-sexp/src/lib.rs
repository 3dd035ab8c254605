//! S-expressions as used by KiCad library files.
//!
//! # Syntax
//!
//! Documents are a single parenthesized list, as written to `.kicad_sym`,
//! `.kicad_mod`, `.kicad_pcb` and library table files.
//!
//! - **Lists** are sequences of nodes, delimited on the outside by `(` and `)`
//!   and separated by whitespace. The first element of a list is its *tag*
//!   (`module`, `pad`, `symbol`, ...).
//!
//! - **Atoms** are strings, either appearing verbatim without delimiters or
//!   enclosed within double quotes. On output, quotes are used exactly when the
//!   string is not a *bare word*: an optional leading `-` followed by one or
//!   more of `A-Z`, `a-z`, `0-9`, `_`, `*` and `.`. Within quoted strings,
//!   `\"`, `\\`, `\n`, `\r` and `\t` are escapes.
//!
//! - **Numbers** are unquoted atoms that look like integers or decimals. They
//!   are only read as numbers when [`ParseOptions`] asks for it; quoted atoms
//!   are always strings.
//!
//! # Layout
//!
//! Every list is written on its own line, indented by two spaces per level of
//! nesting, and floats are written with a fixed number of fractional digits.
//! The output is a pure function of the tree, so regenerating an unchanged
//! part gives byte-identical text.
//!
//! ```
//! use kicad_sexp::{list, to_string};
//!
//! let pad = list!["pad", 1, "smd", "rect", list!["at", 0, 0]];
//! assert_eq!(to_string(&pad).unwrap(), "\n(pad 1 smd rect\n  (at 0 0))");
//! ```

pub mod artifact;
pub mod compare;
pub(crate) mod escape;
pub(crate) mod lexer;
pub mod node;
pub mod number;
pub mod parser;
pub mod printer;

pub use compare::{equal_ignoring, first_mismatch, strip_ignored, tagged, tagged_any};
pub use escape::is_bare_word;
pub use node::{Leaves, Node};
pub use number::Decimal;
pub use parser::{from_str, parse, Numbers, ParseError, ParseOptions};
pub use printer::{to_string, to_string_at, Escaping, GenerateError, Print, Printer, Style};
