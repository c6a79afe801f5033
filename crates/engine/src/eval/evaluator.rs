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

use std::ops::Range;

use sdb_common::ExprConfig;
use tracing::{trace, warn};

use super::{
    disambiguate, handlers::Machine, tokenize, ExprError, Precedence, Token, TokenBuffer,
    TokenKind, Value, DEREF_WIDTH,
};

/// Evaluates expressions against machine state.
///
/// The evaluator is stateless between calls: every call tokenizes into its own
/// [`TokenBuffer`], so evaluations may nest or interleave freely.
#[derive(Debug, Clone, Default)]
pub struct ExpressionEvaluator {
    config: ExprConfig,
}

impl ExpressionEvaluator {
    /// Create a new evaluator with the given configuration
    pub fn new(config: ExprConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &ExprConfig {
        &self.config
    }

    /// Tokenize and disambiguate an expression without evaluating it
    pub fn parse(&self, expr: &str) -> Result<TokenBuffer, ExprError> {
        let mut tokens = tokenize(expr, self.config.max_tokens)?;
        disambiguate(&mut tokens);
        trace!(count = tokens.len(), "tokenized expression");
        Ok(tokens)
    }

    /// Evaluate an expression against the given machine
    pub fn eval<M: Machine + ?Sized>(&self, expr: &str, machine: &M) -> Result<Value, ExprError> {
        let tokens = self.parse(expr)?;
        self.eval_tokens(&tokens, machine)
    }

    /// Evaluate an already disambiguated token sequence
    pub fn eval_tokens<M: Machine + ?Sized>(
        &self,
        tokens: &TokenBuffer,
        machine: &M,
    ) -> Result<Value, ExprError> {
        if tokens.is_empty() {
            return Err(ExprError::EmptyExpression);
        }
        check_balance(tokens.as_slice())?;
        self.eval_range(tokens.as_slice(), 0..tokens.len(), machine)
    }

    /// Recursive evaluation of `tokens[range]`
    fn eval_range<M: Machine + ?Sized>(
        &self,
        tokens: &[Token],
        range: Range<usize>,
        machine: &M,
    ) -> Result<Value, ExprError> {
        trace!(start = range.start, end = range.end, "eval");

        if range.is_empty() {
            return Err(ExprError::InvalidExpression("missing operand".to_string()));
        }

        if range.len() == 1 {
            return self.eval_operand(&tokens[range.start], machine);
        }

        if is_parenthesized(&tokens[range.clone()])? {
            return self.eval_range(tokens, range.start + 1..range.end - 1, machine);
        }

        let op = dominant_operator(&tokens[range.clone()])?
            .map(|offset| range.start + offset)
            .ok_or_else(|| {
                ExprError::InvalidExpression("missing operator between operands".to_string())
            })?;
        let kind = tokens[op].kind;

        match kind.precedence() {
            Some(Precedence::Unary) => {
                if op != range.start {
                    return Err(ExprError::InvalidExpression(format!(
                        "unexpected operand before `{}`",
                        tokens[op].text
                    )));
                }
                let operand = self.eval_range(tokens, op + 1..range.end, machine)?;
                self.apply_unary(kind, operand, machine)
            }
            Some(_) => {
                // Both sides are evaluated before the operator is applied, even for `&&`/`||`.
                let lhs = self.eval_range(tokens, range.start..op, machine)?;
                let rhs = self.eval_range(tokens, op + 1..range.end, machine)?;
                apply_binary(kind, lhs, rhs)
            }
            None => Err(ExprError::Internal(format!("`{kind}` selected as operator"))),
        }
    }

    fn eval_operand<M: Machine + ?Sized>(
        &self,
        token: &Token,
        machine: &M,
    ) -> Result<Value, ExprError> {
        let invalid_literal = || ExprError::InvalidLiteral { text: token.text.clone() };

        match token.kind {
            TokenKind::Decimal => token.text.parse::<Value>().map_err(|_| invalid_literal()),
            TokenKind::Hex => {
                let digits = token.text.get(2..).ok_or_else(invalid_literal)?;
                u64::from_str_radix(digits, 16).map(|v| v as Value).map_err(|_| invalid_literal())
            }
            TokenKind::Register => {
                let name = token.text.strip_prefix('$').unwrap_or(&token.text);
                match machine.register_value(name) {
                    Some(value) => Ok(value as Value),
                    None if self.config.strict_registers => {
                        Err(ExprError::UnknownRegister { name: name.to_string() })
                    }
                    None => {
                        warn!("reg name {} error, reading as 0", token.text);
                        Ok(0)
                    }
                }
            }
            _ => Err(ExprError::InvalidExpression(format!("unexpected `{}`", token.text))),
        }
    }

    fn apply_unary<M: Machine + ?Sized>(
        &self,
        kind: TokenKind,
        operand: Value,
        machine: &M,
    ) -> Result<Value, ExprError> {
        match kind {
            TokenKind::Positive => Ok(operand),
            TokenKind::Negate => Ok(operand.wrapping_neg()),
            TokenKind::Deref => {
                let address = operand as u64;
                machine
                    .read_memory(address, DEREF_WIDTH)
                    .map(|word| word as Value)
                    .ok_or(ExprError::MemoryAccess { address, width: DEREF_WIDTH })
            }
            _ => Err(ExprError::Internal(format!("`{kind}` is not a unary operator"))),
        }
    }
}

fn apply_binary(kind: TokenKind, lhs: Value, rhs: Value) -> Result<Value, ExprError> {
    let value = match kind {
        TokenKind::Plus => lhs.wrapping_add(rhs),
        TokenKind::Minus => lhs.wrapping_sub(rhs),
        TokenKind::Star => lhs.wrapping_mul(rhs),
        TokenKind::Slash => {
            if rhs == 0 {
                return Err(ExprError::DivisionByZero);
            }
            lhs.wrapping_div(rhs)
        }
        TokenKind::Equal => Value::from(lhs == rhs),
        TokenKind::NotEqual => Value::from(lhs != rhs),
        TokenKind::And => Value::from(lhs != 0 && rhs != 0),
        TokenKind::Or => Value::from(lhs != 0 || rhs != 0),
        _ => return Err(ExprError::Internal(format!("`{kind}` is not a binary operator"))),
    };
    Ok(value)
}

/// Depth never drops below zero and ends at zero.
fn check_balance(tokens: &[Token]) -> Result<(), ExprError> {
    let mut depth = 0usize;
    for token in tokens {
        match token.kind {
            TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => {
                depth = depth.checked_sub(1).ok_or(ExprError::UnbalancedParentheses)?
            }
            _ => {}
        }
    }
    if depth == 0 {
        Ok(())
    } else {
        Err(ExprError::UnbalancedParentheses)
    }
}

/// Whether the first and last tokens are a matching pair enclosing the whole slice.
fn is_parenthesized(tokens: &[Token]) -> Result<bool, ExprError> {
    let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
        return Ok(false);
    };
    if first.kind != TokenKind::LeftParen || last.kind != TokenKind::RightParen {
        return Ok(false);
    }

    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    ExprError::Internal("unbalanced parentheses in sub-expression".to_string())
                })?;
                if depth == 0 && i + 1 < tokens.len() {
                    return Ok(false);
                }
            }
            _ => {}
        }
    }
    Ok(depth == 0)
}

/// Offset of the operator that splits `tokens`, if any operator sits at depth zero.
///
/// The loosest-binding level present wins. Binary levels pick their last
/// occurrence (left associativity); the unary level picks its first.
fn dominant_operator(tokens: &[Token]) -> Result<Option<usize>, ExprError> {
    let mut levels: [Vec<usize>; Precedence::COUNT] = Default::default();
    let mut depth = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    ExprError::Internal("unbalanced parentheses in sub-expression".to_string())
                })?;
            }
            kind if depth == 0 => match kind.precedence() {
                Some(level) => levels[level.index()].push(i),
                None if kind.is_operand() => {}
                None => {
                    return Err(ExprError::Internal(format!("unexpected `{kind}` at depth 0")))
                }
            },
            _ => {}
        }
    }

    for level in [
        Precedence::Logical,
        Precedence::Equality,
        Precedence::Additive,
        Precedence::Multiplicative,
        Precedence::Unary,
    ] {
        let positions = &levels[level.index()];
        let chosen =
            if level.is_right_associative() { positions.first() } else { positions.last() };
        if let Some(&offset) = chosen {
            return Ok(Some(offset));
        }
    }
    Ok(None)
}
