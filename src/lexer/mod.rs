//! Hand-written, position-tracking scanner (§4.1).
//!
//! The lexer never fails: an unterminated string or an invalid character
//! literal is silently absorbed (nothing is emitted for it) and scanning
//! continues. Every other unrecognized input — a symbol character that
//! doesn't start a known token, a lone `&` or `|` with no matching partner —
//! still produces a token, but as [`TokenKind::Error`] rather than being
//! reinterpreted as something it isn't; no parser rule accepts that kind, so
//! it surfaces as a clear parse error instead of a confusing downstream one.

mod token;

pub use token::{keyword, Token, TokenKind};

use crate::ast::Position;

pub struct Lexer {
    chars: Vec<char>,
    index: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            index: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scan the whole source and return its token stream, terminated by
    /// exactly one [`TokenKind::Eof`] token.
    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = vec![];

        while let Some(token) = lexer.next_token() {
            tokens.push(token);
        }

        let eof_position = Position::new(lexer.line, lexer.column);
        tokens.push(Token::new(TokenKind::Eof, "", eof_position));
        tokens
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.index += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn make(&self, kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Token {
        Token::new(kind, lexeme, position)
    }

    /// Scans and returns the next token, or `None` once the source is
    /// exhausted. Skips whitespace (except newlines, which become
    /// [`TokenKind::Newline`] tokens) and comments before each token.
    fn next_token(&mut self) -> Option<Token> {
        loop {
            match self.peek() {
                Some(' ') | Some('\r') | Some('\t') => {
                    self.advance();
                    continue;
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    self.skip_line_comment();
                    continue;
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    self.skip_block_comment();
                    continue;
                }
                _ => break,
            }
        }

        let position = Position::new(self.line, self.column);
        let ch = self.peek()?;

        if ch == '\n' {
            self.advance();
            return Some(self.make(TokenKind::Newline, "\n", position));
        }

        if ch.is_ascii_digit() {
            return Some(self.scan_number(position));
        }

        if ch == '"' {
            return self.scan_string(position);
        }

        if ch == '\'' {
            return self.scan_char(position);
        }

        if ch.is_alphabetic() || ch == '_' {
            return Some(self.scan_ident(position));
        }

        Some(self.scan_symbol(position))
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        self.advance(); // '/'
        self.advance(); // '*'
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some('*'), Some('/')) => {
                    self.advance();
                    self.advance();
                    break;
                }
                (Some(_), _) => {
                    self.advance();
                }
                (None, _) => break, // unterminated comment tolerated to EOF
            }
        }
    }

    fn scan_number(&mut self, position: Position) -> Token {
        let mut lexeme = String::new();
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            lexeme.push(self.advance().unwrap());
        }
        if self.peek() == Some('.') && matches!(self.peek_at(1), Some(c) if c.is_ascii_digit()) {
            lexeme.push(self.advance().unwrap());
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                lexeme.push(self.advance().unwrap());
            }
        }
        self.make(TokenKind::Number, lexeme, position)
    }

    /// Scans a double-quoted string. The returned lexeme is the *raw*, un-escaped
    /// source text between the quotes (escape processing happens later when the
    /// parser builds the literal, so lexing stays a lossless byte-preserving pass —
    /// see §8's round-trip property).
    fn scan_string(&mut self, position: Position) -> Option<Token> {
        self.advance(); // opening quote
        let mut lexeme = String::new();
        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    return Some(self.make(TokenKind::Text, lexeme, position));
                }
                Some('\\') => {
                    lexeme.push(self.advance().unwrap());
                    if let Some(escaped) = self.advance() {
                        lexeme.push(escaped);
                    }
                }
                Some('\n') | None => {
                    // unterminated string: absorbed silently, emit nothing
                    return None;
                }
                Some(_) => lexeme.push(self.advance().unwrap()),
            }
        }
    }

    fn scan_char(&mut self, position: Position) -> Option<Token> {
        self.advance(); // opening quote
        let mut lexeme = String::new();
        match self.peek() {
            Some('\\') => {
                lexeme.push(self.advance().unwrap());
                if let Some(escaped) = self.advance() {
                    lexeme.push(escaped);
                }
            }
            Some('\'') | None => return None, // empty or unterminated: invalid
            Some(_) => lexeme.push(self.advance().unwrap()),
        }
        if self.peek() != Some('\'') {
            return None; // invalid character literal: absorbed silently
        }
        self.advance();
        Some(self.make(TokenKind::Character, lexeme, position))
    }

    fn scan_ident(&mut self, position: Position) -> Token {
        let mut lexeme = String::new();
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            lexeme.push(self.advance().unwrap());
        }
        let kind = keyword(&lexeme).unwrap_or(TokenKind::Ident);
        self.make(kind, lexeme, position)
    }

    fn scan_symbol(&mut self, position: Position) -> Token {
        use TokenKind::*;

        macro_rules! two {
            ($second:expr, $two:expr, $one:expr) => {{
                self.advance();
                if self.peek() == Some($second) {
                    self.advance();
                    $two
                } else {
                    $one
                }
            }};
        }

        let ch = self.peek().unwrap();
        let (kind, lexeme): (TokenKind, String) = match ch {
            ';' => {
                self.advance();
                (Semicolon, ";".into())
            }
            ',' => {
                self.advance();
                (Comma, ",".into())
            }
            '.' => {
                self.advance();
                (Dot, ".".into())
            }
            ':' => {
                self.advance();
                match self.peek() {
                    Some('d') => {
                        self.advance();
                        (FmtD, ":d".into())
                    }
                    Some('f') => {
                        self.advance();
                        (FmtF, ":f".into())
                    }
                    Some('s') => {
                        self.advance();
                        (FmtS, ":s".into())
                    }
                    _ => (Colon, ":".into()),
                }
            }
            '?' => {
                self.advance();
                (Question, "?".into())
            }
            '$' => {
                self.advance();
                (Dollar, "$".into())
            }
            '@' => {
                self.advance();
                (At, "@".into())
            }
            '[' => {
                self.advance();
                (LBracket, "[".into())
            }
            ']' => {
                self.advance();
                (RBracket, "]".into())
            }
            '{' => {
                self.advance();
                (LBrace, "{".into())
            }
            '}' => {
                self.advance();
                (RBrace, "}".into())
            }
            '(' => {
                self.advance();
                (LParen, "(".into())
            }
            ')' => {
                self.advance();
                (RParen, ")".into())
            }
            '+' => {
                self.advance();
                if self.peek() == Some('>') && self.peek_at(1) == Some('>') {
                    self.advance();
                    self.advance();
                    (Concat, "+>>".into())
                } else {
                    (Plus, "+".into())
                }
            }
            '-' => {
                self.advance();
                if self.peek() == Some('>') {
                    self.advance();
                    (Arrow, "->".into())
                } else {
                    (Minus, "-".into())
                }
            }
            '*' => {
                self.advance();
                (Star, "*".into())
            }
            '/' => {
                self.advance();
                (Slash, "/".into())
            }
            '%' => {
                self.advance();
                (Percent, "%".into())
            }
            '=' => {
                let kind = two!('=', EqEq, Eq);
                (kind, if kind == EqEq { "==" } else { "=" }.into())
            }
            '!' => {
                self.advance();
                match self.peek() {
                    Some('=') => {
                        self.advance();
                        (NotEq, "!=".into())
                    }
                    Some('!') => {
                        self.advance();
                        (NotNot, "!!".into())
                    }
                    _ => (Bang, "!".into()),
                }
            }
            '<' => {
                let kind = two!('=', Le, Lt);
                (kind, if kind == Le { "<=" } else { "<" }.into())
            }
            '>' => {
                let kind = two!('=', Ge, Gt);
                (kind, if kind == Ge { ">=" } else { ">" }.into())
            }
            '&' => {
                self.advance();
                if self.peek() == Some('&') {
                    self.advance();
                    (AndAnd, "&&".into())
                } else {
                    // No standalone `&` operator exists in the grammar.
                    (Error, "&".into())
                }
            }
            '|' => {
                self.advance();
                if self.peek() == Some('|') {
                    self.advance();
                    (OrOr, "||".into())
                } else {
                    // No standalone `|` operator exists in the grammar.
                    (Error, "|".into())
                }
            }
            other => {
                self.advance();
                (Error, other.to_string())
            }
        };

        self.make(kind, lexeme, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn ends_with_exactly_one_eof() {
        let tokens = Lexer::tokenize("@print[\"hi\"];");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
        assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
    }

    #[test]
    fn lexes_call_syntax() {
        use TokenKind::*;
        assert_eq!(
            kinds("@print[\"hi\"];"),
            vec![At, Ident, LBracket, Text, RBracket, Semicolon, Eof]
        );
    }

    #[test]
    fn distinguishes_concat_from_plus() {
        use TokenKind::*;
        assert_eq!(kinds("a +>> b"), vec![Ident, Concat, Ident, Eof]);
        assert_eq!(kinds("a + b"), vec![Ident, Plus, Ident, Eof]);
    }

    #[test]
    fn distinguishes_arrow_from_minus() {
        use TokenKind::*;
        assert_eq!(kinds("a->b"), vec![Ident, Arrow, Ident, Eof]);
        assert_eq!(kinds("a - b"), vec![Ident, Minus, Ident, Eof]);
    }

    #[test]
    fn format_specifiers_are_distinct_tokens() {
        use TokenKind::*;
        assert_eq!(kinds(":d :f :s :"), vec![FmtD, FmtF, FmtS, Colon, Eof]);
    }

    #[test]
    fn line_and_block_comments_are_skipped() {
        assert_eq!(kinds("// comment\n1"), vec![TokenKind::Newline, TokenKind::Number, TokenKind::Eof]);
        assert_eq!(kinds("/* comment */1"), vec![TokenKind::Number, TokenKind::Eof]);
    }

    #[test]
    fn unterminated_comment_is_tolerated_to_eof() {
        assert_eq!(kinds("/* never closes"), vec![TokenKind::Eof]);
    }

    #[test]
    fn unterminated_string_emits_nothing() {
        // The dangling quote absorbs the rest of the line; lexing resumes cleanly
        // on the next line.
        assert_eq!(kinds("\"unterminated\n1"), vec![TokenKind::Newline, TokenKind::Number, TokenKind::Eof]);
    }

    #[test]
    fn double_ampersand_and_pipe_are_recognized() {
        use TokenKind::*;
        assert_eq!(kinds("a && b"), vec![Ident, AndAnd, Ident, Eof]);
        assert_eq!(kinds("a || b"), vec![Ident, OrOr, Ident, Eof]);
    }

    #[test]
    fn lone_ampersand_or_pipe_is_an_error_token_not_logical_and_or() {
        use TokenKind::*;
        assert_eq!(kinds("a & b"), vec![Ident, Error, Ident, Eof]);
        assert_eq!(kinds("a | b"), vec![Ident, Error, Ident, Eof]);
    }

    #[test]
    fn unrecognized_symbols_are_error_tokens_not_identifiers() {
        use TokenKind::*;
        assert_eq!(kinds("#"), vec![Error, Eof]);
        assert_eq!(kinds("~"), vec![Error, Eof]);
        let tokens = Lexer::tokenize("#");
        assert_eq!(tokens[0].lexeme, "#");
    }

    #[test]
    fn keywords_are_recognized() {
        use TokenKind::*;
        assert_eq!(kinds("val fnc run struct"), vec![Val, Fnc, Run, Struct, Eof]);
    }

    #[test]
    fn decimal_numbers_keep_fractional_digits_in_lexeme() {
        let tokens = Lexer::tokenize("3.14");
        assert_eq!(tokens[0].lexeme, "3.14");
    }

    #[test]
    fn newline_tracks_line_and_resets_column() {
        let tokens = Lexer::tokenize("a\nb");
        assert_eq!(tokens[0].position.line, 1);
        assert_eq!(tokens[2].position.line, 2);
        assert_eq!(tokens[2].position.column, 1);
    }
}
