use super::*;
use crate::ast::Ident;
use lexer::TokenKind;

impl Parser<'_> {
    pub(super) fn current_kind(&self) -> &TokenKind {
        &self.current_token().kind
    }

    pub(super) fn current_token(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.cursor.min(last)]
    }

    pub(super) fn current_span(&self) -> Span {
        self.current_token().span
    }

    /// End offset of the last consumed token.
    pub(super) fn previous_end(&self) -> usize {
        if self.cursor == 0 {
            return 0;
        }
        self.tokens[self.cursor - 1].span.end
    }

    pub(super) fn bump(&mut self) -> Token {
        let token = self.current_token().clone();
        if self.cursor + 1 < self.tokens.len() {
            self.cursor += 1;
        }
        token
    }

    /// Whether the current token has the same variant as `kind`.
    pub(super) fn at(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    pub(super) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(super) fn expect(&mut self, kind: TokenKind, expected: &str) -> PResult<Token> {
        if self.at(&kind) {
            return Ok(self.bump());
        }
        Err(self.error_expected(expected))
    }

    /// Statement terminator. May be omitted before a closing `)` or `}`.
    pub(super) fn expect_semi(&mut self, context: &str) -> PResult<()> {
        match self.current_kind() {
            TokenKind::Semicolon => {
                self.bump();
                Ok(())
            }
            TokenKind::RParen | TokenKind::RBrace | TokenKind::Eof => Ok(()),
            _ => Err(self.error_expected(&format!("newline after {}", context))),
        }
    }

    pub(super) fn parse_ident(&mut self, context: &str) -> PResult<Ident> {
        if let TokenKind::Ident(name) = self.current_kind() {
            let name = name.clone();
            let span = self.bump().span;
            return Ok(Ident::new(self.ids.fresh(), name, span));
        }
        Err(self.error_expected(&format!("identifier for {}", context)))
    }

    pub(super) fn error_expected(&self, expected: &str) -> SyntaxError {
        self.error(format!(
            "expected {}, found {}",
            expected,
            self.current_kind().describe()
        ))
    }

    pub(super) fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            message: message.into(),
            offset: self.current_span().start,
        }
    }

    pub(super) fn is_eof(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }
}
