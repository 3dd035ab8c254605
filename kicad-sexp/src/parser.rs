//! Parse s-expression documents into node trees.
use logos::Logos;
use std::ops::Range;

use crate::escape::unescape;
use crate::lexer::LexerToken;
use crate::node::Node;
use crate::number::{classify, Decimal, NumberKind};

/// How unquoted atoms that look like numbers are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Numbers {
    /// Every atom is a [`Node::Str`].
    #[default]
    Strings,
    /// Integers become [`Node::Int`] and decimals become [`Node::Decimal`].
    Exact,
    /// Integers become [`Node::Int`] and decimals become [`Node::Float`].
    Native,
}

impl Numbers {
    /// Reads an unquoted token.
    fn atom(self, token: &str) -> Node {
        if self == Numbers::Strings {
            return Node::from(token);
        }

        match classify(token) {
            None => Node::from(token),
            Some(NumberKind::Integer) => match token.parse::<i64>() {
                Ok(int) => Node::Int(int),
                Err(_) => self.fractional(token),
            },
            Some(NumberKind::Decimal) => self.fractional(token),
        }
    }

    /// Reads a numeric token that is not an `i64`.
    fn fractional(self, token: &str) -> Node {
        match self {
            Numbers::Native => token
                .parse::<f64>()
                .map(Node::from)
                .unwrap_or_else(|_| Node::from(token)),
            _ => Decimal::new(token)
                .map(Node::Decimal)
                .unwrap_or_else(|| Node::from(token)),
        }
    }
}

/// Options for [`parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub numbers: Numbers,
    /// Deepest list nesting accepted, matching [`Style::max_depth`].
    ///
    /// [`Style::max_depth`]: crate::printer::Style::max_depth
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            numbers: Numbers::default(),
            max_depth: 256,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn numbers(mut self, numbers: Numbers) -> Self {
        self.numbers = numbers;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// A parse error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unbalanced input: unexpected )")]
    UnexpectedClose(Span),
    #[error("unbalanced input: ( is never closed")]
    Unclosed(Span),
    #[error("unterminated string")]
    UnterminatedString(Span),
    #[error("expected a list")]
    ExpectedList(Span),
    #[error("unexpected input after the end of the document")]
    TrailingContent(Span),
    #[error("empty document")]
    Empty(Span),
    #[error("list nesting exceeds the maximum depth")]
    TooDeep(Span),
    #[error("syntax error")]
    Syntax(Span),
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedClose(span)
            | ParseError::Unclosed(span)
            | ParseError::UnterminatedString(span)
            | ParseError::ExpectedList(span)
            | ParseError::TrailingContent(span)
            | ParseError::Empty(span)
            | ParseError::TooDeep(span)
            | ParseError::Syntax(span) => span.clone(),
        }
    }

    /// One-based line and column of the start of the error in `source`.
    pub fn location(&self, source: &str) -> (usize, usize) {
        let offset = self.span().start.min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let column = before
            .rsplit('\n')
            .next()
            .map_or(0, |line| line.chars().count())
            + 1;
        (line, column)
    }
}

/// Shorthand for a result specialised to parse errors.
pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// Span within a string.
pub type Span = Range<usize>;

/// Parse a document with the default options, keeping every atom a string.
pub fn from_str(source: &str) -> Result<Node> {
    parse(source, &ParseOptions::default())
}

/// Parse a document consisting of exactly one list.
///
/// The document is scanned once, keeping a stack of the lists that are still
/// open. Whitespace outside of the list is ignored. Nesting deeper than
/// [`ParseOptions::max_depth`] is an error.
pub fn parse(source: &str, options: &ParseOptions) -> Result<Node> {
    let mut lexer = LexerToken::lexer(source);
    let mut open: Vec<(Vec<Node>, usize)> = Vec::new();
    let mut root = None;

    while let Some(token) = lexer.next() {
        let span = lexer.span();
        let token = token.map_err(|()| ParseError::Syntax(span.clone()))?;

        if root.is_some() {
            return Err(ParseError::TrailingContent(span));
        }

        let atom = match token {
            LexerToken::OpenList => {
                if open.len() >= options.max_depth {
                    return Err(ParseError::TooDeep(span));
                }
                open.push((Vec::new(), span.start));
                continue;
            }
            LexerToken::CloseList => {
                let Some((items, _)) = open.pop() else {
                    return Err(ParseError::UnexpectedClose(span));
                };
                let list = Node::List(items);
                match open.last_mut() {
                    Some((parent, _)) => parent.push(list),
                    None => root = Some(list),
                }
                continue;
            }
            LexerToken::BareAtom => options.numbers.atom(lexer.slice()),
            LexerToken::QuotedAtom => {
                let slice = lexer.slice();
                let inner = &slice[1..slice.len() - 1];
                let unescaped = unescape(inner).ok_or(ParseError::Syntax(span.clone()))?;
                Node::from(unescaped)
            }
            LexerToken::UnterminatedAtom => {
                return Err(ParseError::UnterminatedString(span));
            }
        };

        match open.last_mut() {
            Some((items, _)) => items.push(atom),
            None => return Err(ParseError::ExpectedList(span)),
        }
    }

    if let Some((_, start)) = open.last() {
        return Err(ParseError::Unclosed(*start..*start + 1));
    }

    root.ok_or(ParseError::Empty(source.len()..source.len()))
}

#[cfg(test)]
mod test {
    use super::{from_str, parse, Numbers, ParseError, ParseOptions};
    use crate::number::Decimal;
    use crate::printer::{to_string, Escaping, Style};
    use crate::{list, to_string_at, Leaves, Node};
    use proptest::prelude::*;
    use rstest::rstest;

    const EXACT: ParseOptions = ParseOptions {
        numbers: Numbers::Exact,
        max_depth: 256,
    };
    const NATIVE: ParseOptions = ParseOptions {
        numbers: Numbers::Native,
        max_depth: 256,
    };

    #[rstest]
    #[case("()", list![])]
    #[case("  (a)\n", list!["a"])]
    #[case(r#"(a "")"#, list!["a", ""])]
    #[case(r#"(a "" b)"#, list!["a", "", "b"])]
    #[case(r#"(name "hello world")"#, list!["name", "hello world"])]
    #[case(r#"(t "say \"hi\"")"#, list!["t", "say \"hi\""])]
    #[case(r#"(t "a\\b")"#, list!["t", "a\\b"])]
    #[case("(t \"two\nlines\")", list!["t", "two\nlines"])]
    #[case(r#"(path C:\lib)"#, list!["path", r"C:\lib"])]
    #[case("(a\t(b)\r\n(c d))", list!["a", list!["b"], list!["c", "d"]])]
    #[case("(((x)))", list![list![list!["x"]]])]
    #[case("(at 1.5 -2 \"3\")", list!["at", "1.5", "-2", "3"])]
    #[case(r#"(a b"c d")"#, list!["a", "b", "c d"])]
    #[case(r#"(a "b"c)"#, list!["a", "b", "c"])]
    fn test_parse(#[case] source: &str, #[case] expected: Node) {
        assert_eq!(from_str(source).unwrap(), expected);
    }

    #[test]
    fn test_empty_string_is_an_atom() {
        let node = from_str(r#"(a "")"#).unwrap();
        assert_eq!(node.as_list().map(<[Node]>::len), Some(2));
        assert_eq!(node.get(1), Some(&Node::from("")));
    }

    #[rstest]
    #[case("1", Node::Int(1))]
    #[case("-12", Node::Int(-12))]
    #[case("+7", Node::Int(7))]
    #[case("0402", Node::Int(402))]
    #[case("1.50", Node::Decimal(Decimal::new("1.50").unwrap()))]
    #[case("3.", Node::Decimal(Decimal::new("3").unwrap()))]
    #[case(
        "99999999999999999999",
        Node::Decimal(Decimal::new("99999999999999999999").unwrap())
    )]
    #[case("1e5", Node::from("1e5"))]
    #[case("F.Cu", Node::from("F.Cu"))]
    #[case("\"42\"", Node::from("42"))]
    fn test_exact_numbers(#[case] atom: &str, #[case] expected: Node) {
        let source = format!("(n {atom})");
        assert_eq!(parse(&source, &EXACT).unwrap(), list!["n", expected]);
    }

    #[rstest]
    #[case("1", Node::Int(1))]
    #[case("-2.25", Node::from(-2.25))]
    #[case("3.", Node::from(3.0))]
    #[case("99999999999999999999", Node::from(1.0e20))]
    #[case("\"0402\"", Node::from("0402"))]
    #[case("x1", Node::from("x1"))]
    fn test_native_numbers(#[case] atom: &str, #[case] expected: Node) {
        let source = format!("(n {atom})");
        assert_eq!(parse(&source, &NATIVE).unwrap(), list!["n", expected]);
    }

    #[rstest]
    #[case("", ParseError::Empty(0..0))]
    #[case("   \n", ParseError::Empty(4..4))]
    #[case("(a", ParseError::Unclosed(0..1))]
    #[case("(a (b)", ParseError::Unclosed(0..1))]
    #[case("(a (b", ParseError::Unclosed(3..4))]
    #[case(")", ParseError::UnexpectedClose(0..1))]
    #[case("(a))", ParseError::TrailingContent(3..4))]
    #[case("(a) (b)", ParseError::TrailingContent(4..5))]
    #[case("(a) b", ParseError::TrailingContent(4..5))]
    #[case("abc", ParseError::ExpectedList(0..3))]
    #[case("abc (d)", ParseError::ExpectedList(0..3))]
    #[case(r#"(a "b)"#, ParseError::UnterminatedString(3..6))]
    fn test_parse_errors(#[case] source: &str, #[case] expected: ParseError) {
        assert_eq!(from_str(source), Err(expected));
    }

    #[rstest]
    #[case("(((x)))", 3, Ok(list![list![list!["x"]]]))]
    #[case("(((x)))", 2, Err(ParseError::TooDeep(2..3)))]
    #[case("(a (b) (c (d)))", 2, Err(ParseError::TooDeep(10..11)))]
    #[case("()", 0, Err(ParseError::TooDeep(0..1)))]
    fn test_depth_limit(
        #[case] source: &str,
        #[case] max_depth: usize,
        #[case] expected: Result<Node, ParseError>,
    ) {
        let options = ParseOptions::new().max_depth(max_depth);
        assert_eq!(parse(source, &options), expected);
    }

    #[test]
    fn test_deep_nesting_is_rejected_before_building() {
        let depth = 100_000;
        let source = "(".repeat(depth) + &")".repeat(depth);
        assert_eq!(from_str(&source), Err(ParseError::TooDeep(256..257)));
    }

    #[test]
    fn test_integral_decimal_reads_back_as_int() {
        let tree = list!["w", Decimal::from(2)];
        let text = to_string(&tree).unwrap();
        assert_eq!(text, "\n(w 2)");
        assert_eq!(parse(&text, &EXACT).unwrap(), list!["w", 2]);
        assert_ne!(parse(&text, &EXACT).unwrap(), tree);
    }

    #[test]
    fn test_error_location() {
        let source = "(module x\n  (pad 1\n";
        let error = from_str(source).unwrap_err();
        assert_eq!(error, ParseError::Unclosed(12..13));
        assert_eq!(error.location(source), (2, 3));
        assert_eq!(error.to_string(), "unbalanced input: ( is never closed");
    }

    #[test]
    fn test_symbol_scenario() {
        let source = r#"(symbol "R_0402" (at 1.5 -2.25 90))"#;
        let tree = parse(source, &NATIVE).unwrap();
        assert_eq!(tree, list!["symbol", "R_0402", list!["at", 1.5, -2.25, 90]]);
        assert_eq!(
            to_string(&tree).unwrap(),
            "\n(symbol R_0402\n  (at 1.5000 -2.2500 90))"
        );
    }

    #[test]
    fn test_empty_list_round_trip() {
        let tree = from_str("()").unwrap();
        assert_eq!(tree, Node::List(vec![]));
        let text = to_string(&tree).unwrap();
        assert_eq!(text, "\n()");
        assert_eq!(from_str(&text).unwrap(), tree);
    }

    #[test]
    fn test_legacy_output_reads_back_without_quotes_inside() {
        let style = Style::default().escaping(Escaping::Legacy);
        let tree = list!["descr", "0402 resistor, 1%"];
        let text = to_string_at(&tree, 0, &style).unwrap();
        assert_eq!(from_str(&text).unwrap(), tree);
    }

    fn approx_eq(a: &Node, b: &Node) -> bool {
        match (a, b) {
            (Node::List(a), Node::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(a, b)| approx_eq(a, b))
            }
            (Node::Float(a), Node::Float(b)) => (a.into_inner() - b.into_inner()).abs() <= 1e-4,
            (a, b) => a == b,
        }
    }

    proptest! {
        #[test]
        fn text_round_trip(tree in any_with::<Node>(Leaves::Text)) {
            let text = to_string(&tree).unwrap();
            prop_assert_eq!(from_str(&text).unwrap(), tree);
        }

        #[test]
        fn exact_round_trip(tree in any_with::<Node>(Leaves::Exact)) {
            let text = to_string(&tree).unwrap();
            prop_assert_eq!(parse(&text, &EXACT).unwrap(), tree);
        }

        #[test]
        fn native_round_trip_within_precision(tree in any_with::<Node>(Leaves::Native)) {
            let text = to_string(&tree).unwrap();
            let parsed = parse(&text, &NATIVE).unwrap();
            prop_assert!(approx_eq(&parsed, &tree), "{:?} != {:?}", parsed, tree);
        }

        #[test]
        fn generate_parse_generate_is_stable(tree: Node) {
            let text = to_string(&tree).unwrap();
            prop_assert_eq!(&text, &to_string(&tree).unwrap());
            let reparsed = from_str(&text).unwrap();
            prop_assert_eq!(&to_string(&reparsed).unwrap(), &text);
        }
    }
}
