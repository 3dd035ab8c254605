use logos::Logos;

/// Tokens of a KiCad s-expression document.
///
/// Whitespace only separates tokens. A quoted string runs to the next
/// unescaped `"` and may span lines.
#[derive(Debug, Clone, PartialEq, Logos)]
#[logos(skip r"[ \t\r\n\f]+")]
pub(crate) enum LexerToken {
    #[token("(")]
    OpenList,
    #[token(")")]
    CloseList,
    #[regex(r#"[^ \t\r\n\f\(\)"]+"#)]
    BareAtom,
    #[regex(r#""([^"\\]|\\(.|\n))*""#)]
    QuotedAtom,
    #[regex(r#""([^"\\]|\\(.|\n))*\\?"#)]
    UnterminatedAtom,
}

#[cfg(test)]
mod test {
    use super::LexerToken;
    use logos::Logos;
    use rstest::rstest;

    fn tokens(source: &str) -> Vec<(LexerToken, &str)> {
        let mut lexer = LexerToken::lexer(source);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next() {
            tokens.push((token.unwrap(), lexer.slice()));
        }
        tokens
    }

    #[test]
    fn test_list_tokens() {
        use LexerToken::*;
        assert_eq!(
            tokens("(at 1.5\t-2)\r\n"),
            vec![
                (OpenList, "("),
                (BareAtom, "at"),
                (BareAtom, "1.5"),
                (BareAtom, "-2"),
                (CloseList, ")"),
            ]
        );
    }

    #[rstest]
    #[case(r#""""#, LexerToken::QuotedAtom)]
    #[case(r#""a b""#, LexerToken::QuotedAtom)]
    #[case(r#""say \"hi\"""#, LexerToken::QuotedAtom)]
    #[case("\"two\nlines\"", LexerToken::QuotedAtom)]
    #[case(r#""open"#, LexerToken::UnterminatedAtom)]
    #[case(r#""ends in \""#, LexerToken::UnterminatedAtom)]
    #[case(r#"""#, LexerToken::UnterminatedAtom)]
    fn test_quoted_tokens(#[case] source: &str, #[case] expected: LexerToken) {
        assert_eq!(tokens(source), vec![(expected, source)]);
    }
}
