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

//! The ordered lexical rule table.
//!
//! Rules are tried top to bottom and the first pattern that matches at the
//! current position wins, regardless of match length. Reordering the table
//! changes the grammar: hex must precede decimal so `0x10` is not split into
//! `0` and `x10`, and inside the register pattern `s1[01]` must precede
//! `s[0-9]` because regex alternation is leftmost-first.

use once_cell::sync::Lazy;
use regex::Regex;

use super::TokenKind;

/// One entry of the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// Regular expression, matched anchored at the scan position
    pub pattern: &'static str,
    /// Kind assigned to the matched text
    pub kind: TokenKind,
}

/// Register names accepted after `$`. Alternation order matters.
pub const REGISTER_PATTERN: &str = r"\$(\$0|zero|ra|sp|gp|tp|pc|t[0-6]|s1[01]|s[0-9]|a[0-7])";

/// The rule table, in match order.
pub const RULES: &[Rule] = &[
    Rule { pattern: r"\+", kind: TokenKind::Plus },
    Rule { pattern: r"-", kind: TokenKind::Minus },
    Rule { pattern: r"\*", kind: TokenKind::Star },
    Rule { pattern: r"/", kind: TokenKind::Slash },
    Rule { pattern: r"\(", kind: TokenKind::LeftParen },
    Rule { pattern: r"\)", kind: TokenKind::RightParen },
    Rule { pattern: r"[ \t]+", kind: TokenKind::Whitespace },
    Rule { pattern: r"==", kind: TokenKind::Equal },
    Rule { pattern: r"!=", kind: TokenKind::NotEqual },
    Rule { pattern: r"&&", kind: TokenKind::And },
    Rule { pattern: r"\|\|", kind: TokenKind::Or },
    Rule { pattern: r"0[xX][0-9a-fA-F]+", kind: TokenKind::Hex },
    Rule { pattern: r"[0-9]+", kind: TokenKind::Decimal },
    Rule { pattern: REGISTER_PATTERN, kind: TokenKind::Register },
];

// Compiled once per process; every pattern is anchored at the start of the haystack.
static COMPILED_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    RULES
        .iter()
        .map(|rule| {
            Regex::new(&format!("^(?:{})", rule.pattern))
                .unwrap_or_else(|e| panic!("invalid rule pattern {:?}: {e}", rule.pattern))
        })
        .collect()
});

/// A successful rule match at the scan position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    /// Index of the rule in [`RULES`]
    pub index: usize,
    /// Kind of the rule
    pub kind: TokenKind,
    /// Length of the matched text in bytes
    pub len: usize,
}

/// Find the first rule that matches a non-empty prefix of `input`.
pub fn match_rule(input: &str) -> Option<RuleMatch> {
    COMPILED_RULES.iter().zip(RULES).enumerate().find_map(|(index, (re, rule))| {
        re.find(input)
            .filter(|m| m.end() > 0)
            .map(|m| RuleMatch { index, kind: rule.kind, len: m.end() })
    })
}
