//! Source lexer for the Go subset.
//!
//! Converts raw source text into `TokenKind` values with byte spans, applying
//! Go's automatic semicolon insertion: a newline (or end of input) after an
//! identifier, literal, `break`, `continue`, `return`, `++`, `--`, `)`, `]`
//! or `}` produces a `Semicolon` token. Comments never reach the parser;
//! they are collected on the side with a flag telling whether code precedes
//! them on the same line.

use std::fmt;

use fnmove_core::types::Span;

/// Token categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    Int(String),
    Float(String),
    Char(String),
    /// String literal in its source spelling, quotes included.
    Str(String),

    KwBreak,
    KwConst,
    KwContinue,
    KwElse,
    KwFor,
    KwFunc,
    KwIf,
    KwImport,
    KwMap,
    KwPackage,
    KwReturn,
    KwStruct,
    KwType,
    KwVar,
    /// A Go keyword outside the supported subset.
    Unsupported(String),

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Colon,
    Semicolon,
    /// `:=`
    Define,
    /// `=`
    Assign,
    /// `+=`, `<<=`, ... holding the operator without `=`.
    OpAssign(String),
    Inc,
    Dec,
    Ellipsis,
    /// Unary or binary operator.
    Op(String),
    Eof,
}

impl TokenKind {
    /// Whether a newline after this token inserts a semicolon.
    fn ends_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Ident(_)
                | TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::Char(_)
                | TokenKind::Str(_)
                | TokenKind::KwBreak
                | TokenKind::KwContinue
                | TokenKind::KwReturn
                | TokenKind::Inc
                | TokenKind::Dec
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
        )
    }

    /// Short human-readable description for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier `{}`", name),
            TokenKind::Int(v) | TokenKind::Float(v) | TokenKind::Char(v) | TokenKind::Str(v) => {
                format!("literal {}", v)
            }
            TokenKind::Unsupported(kw) => format!("keyword `{}`", kw),
            TokenKind::OpAssign(op) => format!("`{}=`", op),
            TokenKind::Op(op) => format!("`{}`", op),
            TokenKind::Semicolon => "newline or `;`".to_string(),
            TokenKind::Eof => "end of file".to_string(),
            other => format!("`{}`", other.spelling()),
        }
    }

    fn spelling(&self) -> &'static str {
        match self {
            TokenKind::KwBreak => "break",
            TokenKind::KwConst => "const",
            TokenKind::KwContinue => "continue",
            TokenKind::KwElse => "else",
            TokenKind::KwFor => "for",
            TokenKind::KwFunc => "func",
            TokenKind::KwIf => "if",
            TokenKind::KwImport => "import",
            TokenKind::KwMap => "map",
            TokenKind::KwPackage => "package",
            TokenKind::KwReturn => "return",
            TokenKind::KwStruct => "struct",
            TokenKind::KwType => "type",
            TokenKind::KwVar => "var",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Colon => ":",
            TokenKind::Define => ":=",
            TokenKind::Assign => "=",
            TokenKind::Inc => "++",
            TokenKind::Dec => "--",
            TokenKind::Ellipsis => "...",
            _ => "?",
        }
    }
}

/// A token paired with its location in the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }
}

/// A single comment as it appears in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Raw text including markers.
    pub text: String,
    pub span: Span,
    /// Code precedes the comment on its line.
    pub trailing: bool,
}

/// Errors that can occur while lexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (at {}..{})",
            self.message, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for LexError {}

/// Convenient alias for lexer results.
pub type LexResult<T> = Result<T, LexError>;

/// Multi-character operators, longest first.
const OPERATORS: &[&str] = &[
    "&^=", "<<=", ">>=", "...", "&&", "||", "<-", "++", "--", "==", "!=", "<=", ">=", ":=", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "&^",
];

/// Pull-based lexer producing tokens from a source string.
pub struct Lexer<'a> {
    source: &'a str,
    cursor: usize,
    insert_semi: bool,
    line_has_token: bool,
    finished: bool,
    comments: Vec<Comment>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer positioned at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            cursor: 0,
            insert_semi: false,
            line_has_token: false,
            finished: false,
            comments: Vec::new(),
        }
    }

    /// Lex the whole input. The token list always ends with `Eof`.
    pub fn tokenize(mut self) -> LexResult<(Vec<Token>, Vec<Comment>)> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok((tokens, self.comments))
    }

    /// Pull the next token from the stream.
    pub fn next_token(&mut self) -> LexResult<Token> {
        if self.finished {
            return Ok(Token::new(TokenKind::Eof, self.cursor, self.cursor));
        }

        if let Some(semi) = self.skip_trivia()? {
            return Ok(semi);
        }

        let start = self.cursor;
        let token = match self.peek_char() {
            None => {
                self.finished = true;
                return Ok(Token::new(TokenKind::Eof, start, start));
            }
            Some(ch) if is_ident_start(ch) => self.lex_identifier_or_keyword(),
            Some(ch) if ch.is_ascii_digit() => self.lex_number()?,
            Some('.') if self.peek_next_char().is_some_and(|c| c.is_ascii_digit()) => {
                self.lex_number()?
            }
            Some('"') => self.lex_string()?,
            Some('`') => self.lex_raw_string()?,
            Some('\'') => self.lex_char()?,
            Some(_) => self.lex_symbol()?,
        };

        self.insert_semi = token.kind.ends_statement();
        self.line_has_token = true;
        Ok(token)
    }

    /// Consume whitespace and comments, returning an inserted semicolon when
    /// a statement-ending newline is crossed.
    fn skip_trivia(&mut self) -> LexResult<Option<Token>> {
        loop {
            match self.peek_char() {
                None => {
                    if self.insert_semi {
                        self.insert_semi = false;
                        return Ok(Some(Token::new(
                            TokenKind::Semicolon,
                            self.cursor,
                            self.cursor,
                        )));
                    }
                    return Ok(None);
                }
                Some('\n') => {
                    let at = self.cursor;
                    self.bump_char();
                    self.line_has_token = false;
                    if self.insert_semi {
                        self.insert_semi = false;
                        return Ok(Some(Token::new(TokenKind::Semicolon, at, at + 1)));
                    }
                }
                Some(ch) if ch.is_whitespace() => {
                    self.bump_char();
                }
                Some('/') if self.peek_next_char() == Some('/') => {
                    self.lex_line_comment();
                }
                Some('/') if self.peek_next_char() == Some('*') => {
                    let start = self.cursor;
                    let multiline = self.lex_block_comment()?;
                    if multiline {
                        self.line_has_token = false;
                        if self.insert_semi {
                            self.insert_semi = false;
                            return Ok(Some(Token::new(TokenKind::Semicolon, start, start)));
                        }
                    }
                }
                _ => return Ok(None),
            }
        }
    }

    fn lex_line_comment(&mut self) {
        let start = self.cursor;
        while let Some(ch) = self.peek_char() {
            if ch == '\n' {
                break;
            }
            self.bump_char();
        }
        let text = self.source[start..self.cursor].trim_end().to_string();
        self.comments.push(Comment {
            text,
            span: Span::new(start, self.cursor),
            trailing: self.line_has_token,
        });
    }

    /// Returns whether the comment spanned a newline.
    fn lex_block_comment(&mut self) -> LexResult<bool> {
        let start = self.cursor;
        self.bump_char();
        self.bump_char();
        let mut multiline = false;
        loop {
            match self.peek_char() {
                Some('*') if self.peek_next_char() == Some('/') => {
                    self.bump_char();
                    self.bump_char();
                    break;
                }
                Some(ch) => {
                    if ch == '\n' {
                        multiline = true;
                    }
                    self.bump_char();
                }
                None => {
                    return Err(LexError {
                        message: "unterminated block comment".into(),
                        span: Span::new(start, self.cursor),
                    });
                }
            }
        }
        self.comments.push(Comment {
            text: self.source[start..self.cursor].to_string(),
            span: Span::new(start, self.cursor),
            trailing: self.line_has_token,
        });
        Ok(multiline)
    }

    fn lex_identifier_or_keyword(&mut self) -> Token {
        let start = self.cursor;
        while let Some(ch) = self.peek_char() {
            if is_ident_continue(ch) {
                self.bump_char();
            } else {
                break;
            }
        }
        let ident = &self.source[start..self.cursor];

        let kind = match ident {
            "break" => TokenKind::KwBreak,
            "const" => TokenKind::KwConst,
            "continue" => TokenKind::KwContinue,
            "else" => TokenKind::KwElse,
            "for" => TokenKind::KwFor,
            "func" => TokenKind::KwFunc,
            "if" => TokenKind::KwIf,
            "import" => TokenKind::KwImport,
            "map" => TokenKind::KwMap,
            "package" => TokenKind::KwPackage,
            "return" => TokenKind::KwReturn,
            "struct" => TokenKind::KwStruct,
            "type" => TokenKind::KwType,
            "var" => TokenKind::KwVar,
            "case" | "chan" | "default" | "defer" | "fallthrough" | "go" | "goto"
            | "interface" | "range" | "select" | "switch" => {
                TokenKind::Unsupported(ident.to_string())
            }
            _ => TokenKind::Ident(ident.to_string()),
        };

        Token::new(kind, start, self.cursor)
    }

    fn lex_number(&mut self) -> LexResult<Token> {
        let start = self.cursor;
        let mut is_float = false;

        if self.peek_char() == Some('0')
            && matches!(self.peek_next_char(), Some('x' | 'X' | 'b' | 'B' | 'o' | 'O'))
        {
            self.bump_char();
            self.bump_char();
            let digits = self.consume_while(|c| c.is_ascii_hexdigit() || c == '_');
            if digits == 0 {
                return Err(LexError {
                    message: "expected digits after radix prefix".into(),
                    span: Span::new(start, self.cursor),
                });
            }
        } else {
            self.consume_while(|c| c.is_ascii_digit() || c == '_');
            if self.peek_char() == Some('.') && self.peek_next_char() != Some('.') {
                is_float = true;
                self.bump_char();
                self.consume_while(|c| c.is_ascii_digit() || c == '_');
            }
            if matches!(self.peek_char(), Some('e' | 'E')) {
                is_float = true;
                self.bump_char();
                if matches!(self.peek_char(), Some('+' | '-')) {
                    self.bump_char();
                }
                if self.consume_while(|c| c.is_ascii_digit()) == 0 {
                    return Err(LexError {
                        message: "expected digits after exponent".into(),
                        span: Span::new(start, self.cursor),
                    });
                }
            }
        }

        let literal = self.source[start..self.cursor].to_string();
        let kind = if is_float {
            TokenKind::Float(literal)
        } else {
            TokenKind::Int(literal)
        };
        Ok(Token::new(kind, start, self.cursor))
    }

    fn lex_string(&mut self) -> LexResult<Token> {
        let start = self.cursor;
        self.bump_char(); // opening quote
        loop {
            match self.bump_char() {
                Some('\\') => {
                    if self.bump_char().is_none() {
                        break;
                    }
                }
                Some('"') => {
                    let raw = self.source[start..self.cursor].to_string();
                    return Ok(Token::new(TokenKind::Str(raw), start, self.cursor));
                }
                Some('\n') | None => break,
                Some(_) => {}
            }
        }
        Err(LexError {
            message: "unterminated string literal".into(),
            span: Span::new(start, self.cursor),
        })
    }

    fn lex_raw_string(&mut self) -> LexResult<Token> {
        let start = self.cursor;
        self.bump_char();
        while let Some(ch) = self.bump_char() {
            if ch == '`' {
                let raw = self.source[start..self.cursor].to_string();
                return Ok(Token::new(TokenKind::Str(raw), start, self.cursor));
            }
        }
        Err(LexError {
            message: "unterminated raw string literal".into(),
            span: Span::new(start, self.cursor),
        })
    }

    fn lex_char(&mut self) -> LexResult<Token> {
        let start = self.cursor;
        self.bump_char();
        loop {
            match self.bump_char() {
                Some('\\') => {
                    self.bump_char();
                }
                Some('\'') => {
                    let raw = self.source[start..self.cursor].to_string();
                    return Ok(Token::new(TokenKind::Char(raw), start, self.cursor));
                }
                Some('\n') | None => break,
                Some(_) => {}
            }
        }
        Err(LexError {
            message: "unterminated rune literal".into(),
            span: Span::new(start, self.cursor),
        })
    }

    fn lex_symbol(&mut self) -> LexResult<Token> {
        let start = self.cursor;
        let rest = &self.source[start..];

        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            self.cursor += op.len();
            let kind = match *op {
                ":=" => TokenKind::Define,
                "++" => TokenKind::Inc,
                "--" => TokenKind::Dec,
                "..." => TokenKind::Ellipsis,
                "==" | "!=" | "<=" | ">=" => TokenKind::Op(op.to_string()),
                assign if assign.ends_with('=') => {
                    TokenKind::OpAssign(assign[..assign.len() - 1].to_string())
                }
                other => TokenKind::Op(other.to_string()),
            };
            return Ok(Token::new(kind, start, self.cursor));
        }

        let Some(ch) = self.bump_char() else {
            return Ok(Token::new(TokenKind::Eof, start, start));
        };
        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '=' => TokenKind::Assign,
            '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '<' | '>' | '!' | '~' => {
                TokenKind::Op(ch.to_string())
            }
            other => {
                return Err(LexError {
                    message: format!("unexpected character `{}`", other),
                    span: Span::new(start, self.cursor),
                });
            }
        };
        Ok(Token::new(kind, start, self.cursor))
    }

    fn consume_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(ch) = self.peek_char() {
            if !pred(ch) {
                break;
            }
            self.bump_char();
            count += 1;
        }
        count
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.cursor..].chars().next()
    }

    fn peek_next_char(&self) -> Option<char> {
        let mut chars = self.source[self.cursor..].chars();
        chars.next()?;
        chars.next()
    }

    fn bump_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.cursor += ch.len_utf8();
        Some(ch)
    }
}

fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

fn is_ident_continue(ch: char) -> bool {
    is_ident_start(ch) || ch.is_numeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let (tokens, _) = Lexer::new(src).tokenize().unwrap();
        tokens.into_iter().map(|t| t.kind).collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Ident(name.into())
    }

    #[test]
    fn package_clause_gets_semicolon() {
        assert_eq!(
            kinds("package main\n"),
            vec![
                TokenKind::KwPackage,
                ident("main"),
                TokenKind::Semicolon,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn semicolon_inserted_at_eof() {
        assert_eq!(
            kinds("return x"),
            vec![
                TokenKind::KwReturn,
                ident("x"),
                TokenKind::Semicolon,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn no_semicolon_after_operator() {
        let got = kinds("a +\nb");
        assert_eq!(
            got,
            vec![
                ident("a"),
                TokenKind::Op("+".into()),
                ident("b"),
                TokenKind::Semicolon,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn compound_operators() {
        assert_eq!(
            kinds("x := 1; x += 2; x <<= 1; x++"),
            vec![
                ident("x"),
                TokenKind::Define,
                TokenKind::Int("1".into()),
                TokenKind::Semicolon,
                ident("x"),
                TokenKind::OpAssign("+".into()),
                TokenKind::Int("2".into()),
                TokenKind::Semicolon,
                ident("x"),
                TokenKind::OpAssign("<<".into()),
                TokenKind::Int("1".into()),
                TokenKind::Semicolon,
                ident("x"),
                TokenKind::Inc,
                TokenKind::Semicolon,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn comparison_is_not_assignment() {
        assert_eq!(
            kinds("a <= b")[1],
            TokenKind::Op("<=".into()),
        );
    }

    #[test]
    fn literals_keep_source_spelling() {
        let got = kinds(r#""a\"b" `raw` 'x' 0x1F 3.5"#);
        assert_eq!(got[0], TokenKind::Str(r#""a\"b""#.into()));
        assert_eq!(got[1], TokenKind::Str("`raw`".into()));
        assert_eq!(got[2], TokenKind::Char("'x'".into()));
        assert_eq!(got[3], TokenKind::Int("0x1F".into()));
        assert_eq!(got[4], TokenKind::Float("3.5".into()));
    }

    #[test]
    fn comments_are_collected_with_trailing_flag() {
        let src = "// doc\nfunc f() {} // after\n/* block */\n";
        let (_, comments) = Lexer::new(src).tokenize().unwrap();
        assert_eq!(comments.len(), 3);
        assert_eq!(comments[0].text, "// doc");
        assert!(!comments[0].trailing);
        assert_eq!(comments[1].text, "// after");
        assert!(comments[1].trailing);
        assert!(!comments[2].trailing);
    }

    #[test]
    fn trailing_comment_still_ends_statement() {
        let got = kinds("x // c\ny");
        assert_eq!(
            got,
            vec![
                ident("x"),
                TokenKind::Semicolon,
                ident("y"),
                TokenKind::Semicolon,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn unsupported_keywords_are_flagged() {
        assert_eq!(kinds("switch")[0], TokenKind::Unsupported("switch".into()));
    }

    #[test]
    fn unterminated_string_is_error() {
        let err = Lexer::new("\"abc\n").tokenize().unwrap_err();
        assert!(err.message.contains("unterminated string"));
    }

    #[test]
    fn unterminated_block_comment_is_error() {
        assert!(Lexer::new("/* open").tokenize().is_err());
    }
}
