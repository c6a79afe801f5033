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

//! Helpers for expression text shared by the engine and its front ends.

/// Collapse every run of whitespace into a single space and trim both ends.
///
/// Watchpoint expressions are stored and displayed in this form so that
/// `$sp  + 4` and `$sp + 4` list identically.
pub fn normalize_expression(expr: &str) -> String {
    expr.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse an integer written in decimal or with a `0x`/`0X` prefix.
///
/// Used for command-line machine setup (`--reg sp=0x80000000`) and scripts,
/// never for expression literals, which go through the tokenizer.
pub fn parse_word(text: &str) -> Option<u64> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else if let Some(neg) = text.strip_prefix('-') {
        neg.parse::<i64>().ok().map(|v| v.wrapping_neg() as u64)
    } else {
        text.parse::<u64>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_expression_multiple_spaces() {
        assert_eq!(normalize_expression("$sp  +    4"), "$sp + 4");
    }

    #[test]
    fn test_normalize_expression_mixed_whitespace() {
        assert_eq!(normalize_expression("$a0  \t\n  == \r\n 1"), "$a0 == 1");
    }

    #[test]
    fn test_normalize_expression_leading_trailing_whitespace() {
        assert_eq!(normalize_expression("  *$sp  "), "*$sp");
        assert_eq!(normalize_expression("\t\n0x10\n\t"), "0x10");
    }

    #[test]
    fn test_normalize_expression_only_whitespace() {
        assert_eq!(normalize_expression(""), "");
        assert_eq!(normalize_expression("\t\n\r"), "");
    }

    #[test]
    fn test_parse_word() {
        assert_eq!(parse_word("42"), Some(42));
        assert_eq!(parse_word("0x2A"), Some(42));
        assert_eq!(parse_word(" 0X80000000 "), Some(0x8000_0000));
        assert_eq!(parse_word("-1"), Some(u64::MAX));
        assert_eq!(parse_word("0xZZ"), None);
        assert_eq!(parse_word("sp"), None);
    }
}
