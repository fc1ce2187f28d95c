//! Single-pass tokenizer with one-character lookahead.

use std::sync::OnceLock;

use regex::Regex;

use super::error::LexError;
use super::token::{Token, TokenKind};
use crate::position::Position;

fn number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("valid regex"))
}

fn is_word_start(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '*' | '?' | '\\')
}

fn is_word_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '*' | '?')
}

/// A hand-written lexer over a query string.
///
/// Tracks `(line, column, byte offset)` so every emitted token (and, later,
/// every AST node) can be pinned back to the source for diagnostics.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    pending_error: Option<LexError>,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            pending_error: None,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column, self.pos)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    /// Returns the next token. Infallible: lexical errors other than
    /// unterminated quoted strings/regexes surface as `ILLEGAL` tokens.
    /// Once `EOF` has been produced, every further call returns `EOF` again.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let start = self.position();
        let Some(c) = self.peek() else {
            return Token::new(TokenKind::Eof, "", start);
        };

        match c {
            '"' => self.lex_quoted_string(start),
            '/' => self.lex_slash(start),
            '*' if self.peek_next() == Some('/') => {
                self.advance();
                self.advance();
                Token::new(TokenKind::Illegal, "*/", start)
            }
            '(' => self.single(TokenKind::LParen, start),
            ')' => self.single(TokenKind::RParen, start),
            '[' => self.single(TokenKind::LBracket, start),
            ']' => self.single(TokenKind::RBracket, start),
            '{' => self.single(TokenKind::LBrace, start),
            '}' => self.single(TokenKind::RBrace, start),
            ':' => self.single(TokenKind::Colon, start),
            '^' => self.single(TokenKind::Caret, start),
            '~' => self.single(TokenKind::Tilde, start),
            '+' => self.single(TokenKind::Plus, start),
            '!' => self.single(TokenKind::Not, start),
            ';' => self.single(TokenKind::Illegal, start),
            '-' => self.lex_minus(start),
            '>' => self.lex_gt(start),
            '<' => self.lex_lt(start),
            '&' => self.lex_amp(start),
            '|' => self.lex_pipe(start),
            c if is_word_start(c) => self.lex_word(start),
            other => {
                self.advance();
                Token::new(TokenKind::Illegal, other.to_string(), start)
            }
        }
    }

    /// Like [`Self::next_token`], but surfaces unterminated quoted
    /// strings/regexes as `Err` instead of an `ILLEGAL` token.
    pub fn next_token_checked(&mut self) -> Result<Token, LexError> {
        let token = self.next_token();
        match self.pending_error.take() {
            Some(err) => Err(err),
            None => Ok(token),
        }
    }

    fn single(&mut self, kind: TokenKind, start: Position) -> Token {
        let c = self.advance().expect("caller already peeked a char");
        Token::new(kind, c.to_string(), start)
    }

    fn lex_minus(&mut self, start: Position) -> Token {
        self.advance();
        if self.peek() == Some('-') {
            self.advance();
            Token::new(TokenKind::Illegal, "--", start)
        } else {
            Token::new(TokenKind::Minus, "-", start)
        }
    }

    fn lex_gt(&mut self, start: Position) -> Token {
        self.advance();
        if self.peek() == Some('=') {
            self.advance();
            Token::new(TokenKind::Gte, ">=", start)
        } else {
            Token::new(TokenKind::Gt, ">", start)
        }
    }

    fn lex_lt(&mut self, start: Position) -> Token {
        self.advance();
        if self.peek() == Some('=') {
            self.advance();
            Token::new(TokenKind::Lte, "<=", start)
        } else {
            Token::new(TokenKind::Lt, "<", start)
        }
    }

    fn lex_amp(&mut self, start: Position) -> Token {
        self.advance();
        if self.peek() == Some('&') {
            self.advance();
            Token::new(TokenKind::And, "&&", start)
        } else {
            Token::new(TokenKind::Illegal, "&", start)
        }
    }

    fn lex_pipe(&mut self, start: Position) -> Token {
        self.advance();
        if self.peek() == Some('|') {
            self.advance();
            Token::new(TokenKind::Or, "||", start)
        } else {
            Token::new(TokenKind::Illegal, "|", start)
        }
    }

    fn lex_slash(&mut self, start: Position) -> Token {
        if self.peek_next() == Some('*') {
            self.advance();
            self.advance();
            return Token::new(TokenKind::Illegal, "/*", start);
        }
        self.lex_regex(start)
    }

    fn lex_regex(&mut self, start: Position) -> Token {
        self.advance(); // opening '/'
        let mut text = String::new();
        loop {
            match self.peek() {
                None => {
                    self.pending_error =
                        Some(LexError::new("unterminated regex literal", start));
                    return Token::new(TokenKind::Illegal, text, start);
                }
                Some('/') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some('/') => {
                            self.advance();
                            text.push('/');
                        }
                        Some(other) => {
                            text.push('\\');
                            text.push(other);
                            self.advance();
                        }
                        None => text.push('\\'),
                    }
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
            }
        }
        Token::new(TokenKind::Regex, text, start)
    }

    fn lex_quoted_string(&mut self, start: Position) -> Token {
        self.advance(); // opening '"'
        let mut text = String::new();
        loop {
            match self.peek() {
                None => {
                    self.pending_error =
                        Some(LexError::new("unterminated quoted string", start));
                    return Token::new(TokenKind::Illegal, text, start);
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some('"') => {
                            self.advance();
                            text.push('"');
                        }
                        Some('\\') => {
                            self.advance();
                            text.push('\\');
                        }
                        Some(other) => {
                            text.push('\\');
                            text.push(other);
                            self.advance();
                        }
                        None => text.push('\\'),
                    }
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
            }
        }
        Token::new(TokenKind::QuotedString, text, start)
    }

    fn lex_word(&mut self, start: Position) -> Token {
        let mut text = String::new();
        loop {
            match self.peek() {
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some(next) if !next.is_whitespace() => {
                            self.advance();
                            text.push(next);
                        }
                        _ => break,
                    }
                }
                Some(c) if is_word_continue(c) => {
                    self.advance();
                    text.push(c);
                }
                _ => break,
            }
        }
        Self::classify_word(text, start)
    }

    fn classify_word(text: String, position: Position) -> Token {
        if text.contains('*') || text.contains('?') {
            return Token::new(TokenKind::Wildcard, text, position);
        }
        if number_pattern().is_match(&text) {
            return Token::new(TokenKind::Number, text, position);
        }
        let kind = match text.as_str() {
            "AND" => TokenKind::And,
            "OR" => TokenKind::Or,
            "NOT" => TokenKind::Not,
            "TO" => TokenKind::To,
            "_exists_" => TokenKind::Exists,
            _ => TokenKind::String,
        };
        Token::new(kind, text, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            let done = tok.kind == TokenKind::Eof;
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn keywords_are_uppercase_only() {
        assert_eq!(kinds("AND"), vec![TokenKind::And, TokenKind::Eof]);
        assert_eq!(kinds("and"), vec![TokenKind::String, TokenKind::Eof]);
        assert_eq!(kinds("To"), vec![TokenKind::String, TokenKind::Eof]);
    }

    #[test]
    fn exists_literal() {
        assert_eq!(kinds("_exists_"), vec![TokenKind::Exists, TokenKind::Eof]);
    }

    #[test]
    fn mixed_alnum_term_is_a_single_string_token() {
        let mut lexer = Lexer::new("13w42");
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::String);
        assert_eq!(tok.lexeme, "13w42");
    }

    #[test]
    fn plain_integer_is_number() {
        let mut lexer = Lexer::new("500");
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Number);
    }

    #[test]
    fn float_is_number() {
        let mut lexer = Lexer::new("3.14");
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Number);
        assert_eq!(tok.lexeme, "3.14");
    }

    #[test]
    fn lone_wildcard_chars() {
        assert_eq!(kinds("*"), vec![TokenKind::Wildcard, TokenKind::Eof]);
        assert_eq!(kinds("?"), vec![TokenKind::Wildcard, TokenKind::Eof]);
        assert_eq!(kinds("13*"), vec![TokenKind::Wildcard, TokenKind::Eof]);
    }

    #[test]
    fn quoted_string_resolves_escapes() {
        let mut lexer = Lexer::new(r#""a \"quoted\" word""#);
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::QuotedString);
        assert_eq!(tok.lexeme, "a \"quoted\" word");
    }

    #[test]
    fn regex_strips_slashes_and_resolves_escaped_slash() {
        let mut lexer = Lexer::new(r"/a\/b/");
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Regex);
        assert_eq!(tok.lexeme, "a/b");
    }

    #[test]
    fn unterminated_string_is_lex_error() {
        let mut lexer = Lexer::new("\"unterminated");
        assert!(lexer.next_token_checked().is_err());
    }

    #[test]
    fn comparison_operators() {
        assert_eq!(kinds(">"), vec![TokenKind::Gt, TokenKind::Eof]);
        assert_eq!(kinds(">="), vec![TokenKind::Gte, TokenKind::Eof]);
        assert_eq!(kinds("<"), vec![TokenKind::Lt, TokenKind::Eof]);
        assert_eq!(kinds("<="), vec![TokenKind::Lte, TokenKind::Eof]);
    }

    #[test]
    fn double_ampersand_and_pipe_become_keywords() {
        assert_eq!(kinds("&&"), vec![TokenKind::And, TokenKind::Eof]);
        assert_eq!(kinds("||"), vec![TokenKind::Or, TokenKind::Eof]);
    }

    #[test]
    fn single_ampersand_and_pipe_are_illegal() {
        assert_eq!(kinds("&"), vec![TokenKind::Illegal, TokenKind::Eof]);
        assert_eq!(kinds("|"), vec![TokenKind::Illegal, TokenKind::Eof]);
    }

    #[test]
    fn bang_is_not_keyword() {
        assert_eq!(kinds("!"), vec![TokenKind::Not, TokenKind::Eof]);
    }

    #[test]
    fn sql_injection_defence_tokens_are_illegal() {
        assert_eq!(kinds("--"), vec![TokenKind::Illegal, TokenKind::Eof]);
        assert_eq!(kinds("/*"), vec![TokenKind::Illegal, TokenKind::Eof]);
        assert_eq!(kinds("*/"), vec![TokenKind::Illegal, TokenKind::Eof]);
        assert_eq!(kinds(";"), vec![TokenKind::Illegal, TokenKind::Eof]);
    }

    #[test]
    fn backslash_escapes_punctuation_into_a_string() {
        let mut lexer = Lexer::new(r"foo\:bar");
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::String);
        assert_eq!(tok.lexeme, "foo:bar");
    }

    #[test]
    fn eof_repeats() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn line_and_column_track_newlines() {
        let mut lexer = Lexer::new("a\nb");
        let first = lexer.next_token();
        assert_eq!(first.position.line, 1);
        let second = lexer.next_token();
        assert_eq!(second.position.line, 2);
        assert_eq!(second.position.column, 1);
    }
}
