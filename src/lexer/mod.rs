//! Single-pass maximal-munch scanner.
//!
//! Split into a thin `Lexer` and a `Cursor`: the `Lexer` drives repeated
//! `Cursor::new(rest).advance()` calls, slicing the already-scanned prefix
//! off the remaining input after each token.

mod cursor;

use cursor::Cursor;

pub use crate::token::{Token, TokenKind};
use crate::token::{is_java_identifier_part, is_java_identifier_start, keyword_kind};

/// Scans `input` into a finite token sequence ending in exactly one `EOF`.
pub struct Lexer<'a> {
    input: &'a str,
    offset: u32,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            done: false,
        }
    }

    /// Returns the next token, or `None` once the terminating `EOF` has
    /// already been returned (further calls after that are a logic error in
    /// the driver, not a user-facing condition — callers that want "every
    /// `next()` past the end returns `EOF`" semantics get that from
    /// `ParseContext` instead, which caches and re-serves the final `EOF`).
    pub fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        if self.input.is_empty() {
            self.done = true;
            return Some(Token::eof(self.offset));
        }

        let token = Cursor::new(self.input).advance(self.offset);
        let consumed = token.length;
        self.input = &self.input[consumed as usize..];
        self.offset += consumed;
        Some(token)
    }

    /// Convenience used by tests and by `ParseContext::new` to front-load the
    /// full token vector.
    pub fn tokenize_all(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        while let Some(tok) = lexer.next() {
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

impl<'a> Cursor<'a> {
    fn advance(&mut self, start: u32) -> Token {
        let first_char = self.bump().expect("advance called on empty cursor");

        let kind = match first_char {
            c if is_java_whitespace(c) => self.whitespace(),
            '"' => return self.string_or_text_block(start),
            '\'' => return self.char_literal(start),
            c if c.is_ascii_digit() => return self.number(c, start),
            c if is_java_identifier_start(c) => return self.identifier(c, start),

            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '@' => TokenKind::At,
            '?' => TokenKind::Question,
            '~' => TokenKind::Tilde,

            ':' => {
                if self.first() == ':' {
                    self.bump();
                    TokenKind::DoubleColon
                } else {
                    TokenKind::Colon
                }
            }

            '.' => {
                if self.first() == '.' && self.second() == '.' {
                    self.bump();
                    self.bump();
                    TokenKind::Ellipsis
                } else {
                    TokenKind::Dot
                }
            }

            '+' => match self.first() {
                '+' => {
                    self.bump();
                    TokenKind::Increment
                }
                '=' => {
                    self.bump();
                    TokenKind::PlusAssign
                }
                _ => TokenKind::Plus,
            },

            '-' => match self.first() {
                '-' => {
                    self.bump();
                    TokenKind::Decrement
                }
                '=' => {
                    self.bump();
                    TokenKind::MinusAssign
                }
                '>' => {
                    self.bump();
                    TokenKind::Arrow
                }
                _ => TokenKind::Minus,
            },

            '*' => match self.first() {
                '=' => {
                    self.bump();
                    TokenKind::MultAssign
                }
                _ => TokenKind::Mult,
            },

            '/' => return self.slash(start),

            '%' => match self.first() {
                '=' => {
                    self.bump();
                    TokenKind::ModAssign
                }
                _ => TokenKind::Mod,
            },

            '=' => match self.first() {
                '=' => {
                    self.bump();
                    TokenKind::Eq
                }
                _ => TokenKind::Assign,
            },

            '!' => match self.first() {
                '=' => {
                    self.bump();
                    TokenKind::Ne
                }
                _ => TokenKind::Not,
            },

            '<' => match (self.first(), self.second()) {
                ('=', _) => {
                    self.bump();
                    TokenKind::Le
                }
                ('<', '=') => {
                    self.bump();
                    self.bump();
                    TokenKind::LShiftAssign
                }
                ('<', _) => {
                    self.bump();
                    TokenKind::LShift
                }
                _ => TokenKind::Lt,
            },

            '>' => match (self.first(), self.second(), self.nth_ahead(2)) {
                ('=', _, _) => {
                    self.bump();
                    TokenKind::Ge
                }
                ('>', '>', '=') => {
                    self.bump();
                    self.bump();
                    self.bump();
                    TokenKind::URShiftAssign
                }
                ('>', '>', _) => {
                    self.bump();
                    self.bump();
                    TokenKind::URShift
                }
                ('>', '=', _) => {
                    self.bump();
                    self.bump();
                    TokenKind::RShiftAssign
                }
                ('>', _, _) => {
                    self.bump();
                    TokenKind::RShift
                }
                _ => TokenKind::Gt,
            },

            '&' => match self.first() {
                '&' => {
                    self.bump();
                    TokenKind::LogicalAnd
                }
                '=' => {
                    self.bump();
                    TokenKind::AndAssign
                }
                _ => TokenKind::BitAnd,
            },

            '|' => match self.first() {
                '|' => {
                    self.bump();
                    TokenKind::LogicalOr
                }
                '=' => {
                    self.bump();
                    TokenKind::OrAssign
                }
                _ => TokenKind::BitOr,
            },

            '^' => match self.first() {
                '=' => {
                    self.bump();
                    TokenKind::XorAssign
                }
                _ => TokenKind::Caret,
            },

            other => {
                let length = self.len_consumed();
                return Token::new(TokenKind::Error, start, length, Some(other.to_string()));
            }
        };

        let length = self.len_consumed();
        Token::new(kind, start, length, None)
    }

    fn whitespace(&mut self) -> TokenKind {
        while is_java_whitespace(self.first()) {
            self.bump();
        }
        TokenKind::Whitespace
    }

    /// `/`, `//`, `/*`, `/**`, `/=`.
    fn slash(&mut self, start: u32) -> Token {
        match self.first() {
            '/' => {
                self.bump();
                while !self.is_eof() && self.first() != '\n' {
                    self.bump();
                }
                let length = self.len_consumed();
                let text = self.consumed_str().to_string();
                Token::new(TokenKind::LineComment, start, length, Some(text))
            }
            '*' => {
                self.bump();
                let is_javadoc = self.first() == '*';
                loop {
                    if self.is_eof() {
                        break;
                    }
                    if self.first() == '*' && self.second() == '/' {
                        self.bump();
                        self.bump();
                        break;
                    }
                    self.bump();
                }
                let length = self.len_consumed();
                let text = self.consumed_str().to_string();
                let kind = if is_javadoc {
                    TokenKind::JavadocComment
                } else {
                    TokenKind::BlockComment
                };
                Token::new(kind, start, length, Some(text))
            }
            '=' => {
                self.bump();
                let length = self.len_consumed();
                Token::new(TokenKind::DivAssign, start, length, None)
            }
            _ => {
                let length = self.len_consumed();
                Token::new(TokenKind::Div, start, length, None)
            }
        }
    }

    fn string_or_text_block(&mut self, start: u32) -> Token {
        if self.first() == '"' && self.second() == '"' {
            self.bump();
            self.bump();
            loop {
                if self.is_eof() {
                    break;
                }
                if self.first() == '"' && self.second() == '"' && self.nth_ahead(2) == '"' {
                    self.bump();
                    self.bump();
                    self.bump();
                    break;
                }
                if self.first() == '\\' {
                    self.bump();
                    self.bump();
                } else {
                    self.bump();
                }
            }
            let length = self.len_consumed();
            let text = self.consumed_str().to_string();
            return Token::new(TokenKind::TextBlockLiteral, start, length, Some(text));
        }

        while !self.is_eof() {
            match self.first() {
                '"' => {
                    self.bump();
                    break;
                }
                '\\' => {
                    self.bump();
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }
        let length = self.len_consumed();
        let text = self.consumed_str().to_string();
        Token::new(TokenKind::StringLiteral, start, length, Some(text))
    }

    fn char_literal(&mut self, start: u32) -> Token {
        while !self.is_eof() {
            match self.first() {
                '\'' => {
                    self.bump();
                    break;
                }
                '\\' => {
                    self.bump();
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }
        let length = self.len_consumed();
        let text = self.consumed_str().to_string();
        Token::new(TokenKind::CharLiteral, start, length, Some(text))
    }

    fn identifier(&mut self, first_char: char, start: u32) -> Token {
        let mut buf = String::new();
        buf.push(first_char);
        while is_java_identifier_part(self.first()) {
            buf.push(self.bump().unwrap());
        }

        // `non-sealed` is compound: after scanning `non`, peek the next 7
        // source chars; if they equal `-sealed`, consume them as one token.
        if buf == "non" && self.rest().len() >= 7 && &self.rest()[..7] == "-sealed" {
            for _ in 0..7 {
                self.bump();
            }
            let length = self.len_consumed();
            return Token::new(TokenKind::NonSealed, start, length, None);
        }

        let length = self.len_consumed();
        match keyword_kind(&buf) {
            Some(kind @ (TokenKind::BooleanLiteral | TokenKind::NullLiteral)) => {
                Token::new(kind, start, length, Some(buf))
            }
            Some(kind) => Token::new(kind, start, length, None),
            None => Token::new(TokenKind::Identifier, start, length, Some(buf)),
        }
    }

    /// Decimal/exponent numeric literals only; hex/binary/octal and
    /// underscored digit groups are left unimplemented (see `DESIGN.md`).
    fn number(&mut self, first_digit: char, start: u32) -> Token {
        let mut buf = String::new();
        buf.push(first_digit);

        let mut has_fractional = false;
        let mut has_exponent = false;

        while self.first().is_ascii_digit() {
            buf.push(self.bump().unwrap());
        }

        if self.first() == '.' && self.second().is_ascii_digit() {
            has_fractional = true;
            buf.push(self.bump().unwrap());
            while self.first().is_ascii_digit() {
                buf.push(self.bump().unwrap());
            }
        }

        if matches!(self.first(), 'e' | 'E') {
            let mut lookahead = 1;
            let mut ok = false;
            let sign = self.second();
            if sign == '+' || sign == '-' {
                lookahead = 2;
            }
            if self.nth_ahead(lookahead).is_ascii_digit() {
                ok = true;
            }
            if ok {
                has_exponent = true;
                buf.push(self.bump().unwrap());
                if matches!(self.first(), '+' | '-') {
                    buf.push(self.bump().unwrap());
                }
                while self.first().is_ascii_digit() {
                    buf.push(self.bump().unwrap());
                }
            }
        }

        let is_float_double = has_fractional || has_exponent;

        match self.first() {
            'l' | 'L' if !is_float_double => {
                self.bump();
                let length = self.len_consumed();
                Token::new(TokenKind::LongLiteral, start, length, Some(buf))
            }
            'f' | 'F' => {
                self.bump();
                let length = self.len_consumed();
                Token::new(TokenKind::FloatLiteral, start, length, Some(buf))
            }
            'd' | 'D' => {
                self.bump();
                let length = self.len_consumed();
                Token::new(TokenKind::DoubleLiteral, start, length, Some(buf))
            }
            _ => {
                let length = self.len_consumed();
                let kind = if is_float_double {
                    TokenKind::DoubleLiteral
                } else {
                    TokenKind::IntegerLiteral
                };
                Token::new(kind, start, length, Some(buf))
            }
        }
    }

}

fn is_java_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}' | '\u{000A}' | '\u{000B}' | '\u{000C}' | '\u{000D}' | '\u{0020}' | '\u{FEFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::tokenize_all(src).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn s1_urshift_assign() {
        let toks = Lexer::tokenize_all(">>>=");
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[0].kind, TokenKind::URShiftAssign);
        assert_eq!(toks[0].length, 4);
        assert_eq!(toks[1].kind, TokenKind::Eof);
    }

    #[test]
    fn s2_ellipsis_vs_dot_dot() {
        let toks = Lexer::tokenize_all("...");
        assert_eq!(toks[0].kind, TokenKind::Ellipsis);
        assert_eq!(toks[0].length, 3);

        let toks = Lexer::tokenize_all("..");
        assert_eq!(toks[0].kind, TokenKind::Dot);
        assert_eq!(toks[0].length, 1);
        assert_eq!(toks[1].kind, TokenKind::Dot);
        assert_eq!(toks[1].length, 1);
        assert_eq!(toks[2].kind, TokenKind::Eof);
    }

    #[test]
    fn s3_non_sealed_class() {
        let toks = kinds("non-sealed class C{}");
        assert_eq!(
            toks,
            vec![
                TokenKind::NonSealed,
                TokenKind::Whitespace,
                TokenKind::Class,
                TokenKind::Whitespace,
                TokenKind::Identifier,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn s4_text_block() {
        let toks = Lexer::tokenize_all(r#""""a"b""""#);
        assert_eq!(toks[0].kind, TokenKind::TextBlockLiteral);
        assert_eq!(toks[0].text.as_deref(), Some(r#""""a"b""""#));
        assert_eq!(toks[1].kind, TokenKind::Eof);
    }

    #[test]
    fn non_at_eof_is_identifier() {
        let toks = kinds("non");
        assert_eq!(toks, vec![TokenKind::Identifier, TokenKind::Eof]);
    }

    #[test]
    fn shift_family_maximal_munch() {
        assert_eq!(kinds(">"), vec![TokenKind::Gt, TokenKind::Eof]);
        assert_eq!(kinds(">>"), vec![TokenKind::RShift, TokenKind::Eof]);
        assert_eq!(kinds(">>>"), vec![TokenKind::URShift, TokenKind::Eof]);
        assert_eq!(kinds(">="), vec![TokenKind::Ge, TokenKind::Eof]);
        assert_eq!(kinds(">>="), vec![TokenKind::RShiftAssign, TokenKind::Eof]);
        assert_eq!(
            kinds(">>>="),
            vec![TokenKind::URShiftAssign, TokenKind::Eof]
        );
    }

    #[test]
    fn numeric_suffix_disambiguation() {
        let toks = Lexer::tokenize_all("10L");
        assert_eq!(toks[0].kind, TokenKind::LongLiteral);

        // fractional + L is not a valid long: classify as double, don't
        // consume the suffix.
        let toks = Lexer::tokenize_all("1.0L");
        assert_eq!(toks[0].kind, TokenKind::DoubleLiteral);
        assert_eq!(toks[0].length, 3);
        assert_eq!(toks[1].kind, TokenKind::Identifier);

        let toks = Lexer::tokenize_all("1.5f");
        assert_eq!(toks[0].kind, TokenKind::FloatLiteral);

        let toks = Lexer::tokenize_all("1e10");
        assert_eq!(toks[0].kind, TokenKind::DoubleLiteral);

        let toks = Lexer::tokenize_all("1.5e-10d");
        assert_eq!(toks[0].kind, TokenKind::DoubleLiteral);
        assert_eq!(toks[0].length, 8);
    }

    #[test]
    fn dot_leading_fraction_is_not_a_number() {
        // ".5" is not a numeric literal start: numeric literals begin with a
        // digit.
        let toks = kinds(".5");
        assert_eq!(toks, vec![TokenKind::Dot, TokenKind::IntegerLiteral, TokenKind::Eof]);
    }

    #[test]
    fn unknown_byte_becomes_error_token() {
        let toks = Lexer::tokenize_all("`");
        assert_eq!(toks[0].kind, TokenKind::Error);
        assert_eq!(toks[0].length, 1);
    }

    #[test]
    fn totality_and_coverage() {
        let src = "class Foo { int x = 1 + 2; }";
        let toks = Lexer::tokenize_all(src);
        assert_eq!(toks.last().unwrap().kind, TokenKind::Eof);
        let mut reconstructed = String::new();
        for t in &toks {
            if t.kind == TokenKind::Eof {
                continue;
            }
            reconstructed.push_str(&src[t.start as usize..t.end() as usize]);
        }
        assert_eq!(reconstructed, src);
    }
}
