use logos::Logos;

use crate::printer::Escaping;

/// Lexer for the bare word pattern `-?[A-Za-z0-9_*.]+`.
#[derive(Debug, Clone, PartialEq, Logos)]
enum WordToken {
    #[regex(r"-?[A-Za-z0-9_*.]+")]
    Bare,
}

/// Lexer token for the contents of a quoted string.
#[derive(Debug, Clone, Logos)]
enum EscapedToken {
    #[token(r#"\n"#, |_| '\n')]
    #[token(r#"\r"#, |_| '\r')]
    #[token(r#"\t"#, |_| '\t')]
    #[token(r#"\""#, |_| '"')]
    #[token(r#"\\"#, |_| '\\')]
    Escaped(char),

    #[regex(r"\\(.|\n)", priority = 1)]
    Unknown,

    #[regex(r"[^\\]")]
    Literal,
}

/// Returns whether `str` can be written without quotes.
///
/// Bare words are non-empty, consist of `A-Z`, `a-z`, `0-9`, `_`, `*` and `.`,
/// and may start with a single `-`.
pub fn is_bare_word(str: &str) -> bool {
    let mut lexer = WordToken::lexer(str);
    matches!([lexer.next(), lexer.next()], [Some(Ok(WordToken::Bare)), None])
}

/// Replaces escape sequences with their corresponding characters.
///
/// Unknown escapes are kept as written, backslash included.
pub fn unescape(str: &str) -> Option<String> {
    let mut lexer = EscapedToken::lexer(str);
    let mut output = String::with_capacity(str.len());

    while let Some(token) = lexer.next() {
        let token = token.ok()?;

        match token {
            EscapedToken::Escaped(c) => output.push(c),
            EscapedToken::Unknown | EscapedToken::Literal => output.push_str(lexer.slice()),
        }
    }

    Some(output)
}

/// Writes `str` in double quotes.
pub fn escape_string(str: &str, escaping: Escaping) -> String {
    let mut output = String::with_capacity(str.len() + 2);
    output.push('"');

    match escaping {
        Escaping::Legacy => output.push_str(str),
        Escaping::Escaped => {
            for c in str.chars() {
                match c {
                    '\n' => output.push_str(r#"\n"#),
                    '\r' => output.push_str(r#"\r"#),
                    '\t' => output.push_str(r#"\t"#),
                    '"' => output.push_str(r#"\""#),
                    '\\' => output.push_str(r#"\\"#),
                    c => output.push(c),
                }
            }
        }
    }

    output.push('"');
    output
}

/// Writes `str` bare if it is a bare word and quoted otherwise.
pub fn escape_atom(str: &str, escaping: Escaping) -> String {
    if is_bare_word(str) {
        str.to_string()
    } else {
        escape_string(str, escaping)
    }
}
