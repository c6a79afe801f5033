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

use tracing::trace;

use super::{
    rules::{match_rule, RULES},
    ExprError, Token, TokenBuffer, TokenKind, TOKEN_TEXT_CAPACITY,
};

/// Split `expression` into tokens using the ordered rule table.
///
/// Whitespace is consumed but not stored. Fails without a partial result if
/// some position matches no rule, if a literal does not fit in
/// [`TOKEN_TEXT_CAPACITY`] bytes, or if more than `capacity` tokens are
/// produced.
pub fn tokenize(expression: &str, capacity: usize) -> Result<TokenBuffer, ExprError> {
    let mut tokens = TokenBuffer::with_capacity(capacity);
    let mut position = 0;

    while position < expression.len() {
        let rest = &expression[position..];
        let Some(m) = match_rule(rest) else {
            return Err(ExprError::NoMatch { position, remaining: rest.to_string() });
        };

        let text = &rest[..m.len];
        trace!(
            rule = m.index,
            pattern = RULES[m.index].pattern,
            position,
            len = m.len,
            text,
            "matched rule"
        );

        // Literals are parsed from the stored text, which must not be truncated.
        if matches!(m.kind, TokenKind::Decimal | TokenKind::Hex) && m.len > TOKEN_TEXT_CAPACITY {
            return Err(ExprError::InvalidLiteral { text: text.to_string() });
        }

        if m.kind != TokenKind::Whitespace {
            tokens.push(Token::new(m.kind, text))?;
        }
        position += m.len;
    }

    Ok(tokens)
}

/// Reclassify `+`, `-` and `*` that start an operand as unary operators.
///
/// A token is unary when it is first in the sequence or follows a token after
/// which an operand is expected (an operator or `(`). The pass runs once, left
/// to right, and sees earlier rewrites, so `--2` becomes two negations.
pub fn disambiguate(tokens: &mut TokenBuffer) {
    for i in 0..tokens.len() {
        if i > 0 && !tokens[i - 1].kind.expects_operand_after() {
            continue;
        }
        let unary = match tokens[i].kind {
            TokenKind::Plus => TokenKind::Positive,
            TokenKind::Minus => TokenKind::Negate,
            TokenKind::Star => TokenKind::Deref,
            _ => continue,
        };
        tokens.set_kind(i, unary);
    }
}
