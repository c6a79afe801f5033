// SDB - Simulator Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Token types produced by the tokenizer and consumed by the evaluator.

use std::{fmt::Display, ops::Index};

use super::{ExprError, Precedence};

/// Maximum number of bytes of matched text kept per token.
pub const TOKEN_TEXT_CAPACITY: usize = 31;

/// Lexical class of a token.
///
/// `Plus`, `Minus` and `Star` are produced by the tokenizer and may later be
/// rewritten by [`disambiguate`](super::disambiguate) into their unary forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Decimal integer literal, e.g. `42`
    Decimal,
    /// Hexadecimal integer literal, e.g. `0x2A`
    Hex,
    /// Register reference, e.g. `$sp`
    Register,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// Binary `+`
    Plus,
    /// Binary `-`
    Minus,
    /// Binary `*`
    Star,
    /// Binary `/`
    Slash,
    /// Unary `+`
    Positive,
    /// Unary `-`
    Negate,
    /// Unary `*`, reads a word of memory
    Deref,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `&&`
    And,
    /// `||`
    Or,
    /// Spaces and tabs; recognised by the rule table but never stored
    Whitespace,
}

impl TokenKind {
    /// Precedence level of an operator, or `None` for operands, parentheses and whitespace.
    pub fn precedence(self) -> Option<Precedence> {
        match self {
            Self::Positive | Self::Negate | Self::Deref => Some(Precedence::Unary),
            Self::Star | Self::Slash => Some(Precedence::Multiplicative),
            Self::Plus | Self::Minus => Some(Precedence::Additive),
            Self::Equal | Self::NotEqual => Some(Precedence::Equality),
            Self::And | Self::Or => Some(Precedence::Logical),
            Self::Decimal
            | Self::Hex
            | Self::Register
            | Self::LeftParen
            | Self::RightParen
            | Self::Whitespace => None,
        }
    }

    /// Whether the token is a literal or register reference.
    pub fn is_operand(self) -> bool {
        matches!(self, Self::Decimal | Self::Hex | Self::Register)
    }

    /// Whether an operand (and therefore possibly a unary operator) must follow this token.
    pub fn expects_operand_after(self) -> bool {
        matches!(self, Self::LeftParen) || self.precedence().is_some()
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Decimal => "decimal",
            Self::Hex => "hex",
            Self::Register => "register",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Positive => "pos",
            Self::Negate => "neg",
            Self::Deref => "deref",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::And => "&&",
            Self::Or => "||",
            Self::Whitespace => "space",
        };
        f.write_str(name)
    }
}

/// A classified lexical unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lexical class
    pub kind: TokenKind,
    /// Matched source text, truncated to [`TOKEN_TEXT_CAPACITY`] bytes
    pub text: String,
}

impl Token {
    /// Create a token, bounding its text.
    pub fn new(kind: TokenKind, text: &str) -> Self {
        let mut end = text.len().min(TOKEN_TEXT_CAPACITY);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        Self { kind, text: text[..end].to_string() }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.kind, self.text)
    }
}

/// Bounded, ordered token sequence owned by a single evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
    capacity: usize,
}

impl TokenBuffer {
    /// Create an empty buffer that accepts at most `capacity` tokens.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { tokens: Vec::with_capacity(capacity), capacity }
    }

    /// Append a token, failing once the buffer is full.
    pub fn push(&mut self, token: Token) -> Result<(), ExprError> {
        if self.tokens.len() >= self.capacity {
            return Err(ExprError::TooManyTokens { capacity: self.capacity });
        }
        self.tokens.push(token);
        Ok(())
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether no token was produced.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Maximum number of tokens.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Tokens as a slice.
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Iterate over the tokens in order.
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Kinds of all tokens, in order.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }

    /// Rewrite the kind of one token. Text is never modified.
    pub(crate) fn set_kind(&mut self, index: usize, kind: TokenKind) {
        self.tokens[index].kind = kind;
    }
}

impl Index<usize> for TokenBuffer {
    type Output = Token;

    fn index(&self, index: usize) -> &Self::Output {
        &self.tokens[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_text_is_bounded() {
        let long = "1".repeat(40);
        let token = Token::new(TokenKind::Decimal, &long);
        assert_eq!(token.text.len(), TOKEN_TEXT_CAPACITY);
    }

    #[test]
    fn test_buffer_rejects_overflow() {
        let mut buffer = TokenBuffer::with_capacity(2);
        buffer.push(Token::new(TokenKind::Decimal, "1")).unwrap();
        buffer.push(Token::new(TokenKind::Plus, "+")).unwrap();
        let err = buffer.push(Token::new(TokenKind::Decimal, "2")).unwrap_err();
        assert_eq!(err, ExprError::TooManyTokens { capacity: 2 });
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_operand_expectation() {
        assert!(TokenKind::LeftParen.expects_operand_after());
        assert!(TokenKind::Negate.expects_operand_after());
        assert!(TokenKind::Or.expects_operand_after());
        assert!(!TokenKind::RightParen.expects_operand_after());
        assert!(!TokenKind::Register.expects_operand_after());
    }
}
