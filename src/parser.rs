use crate::ast::*;

/// Parser state: tracks position in the placeholder text.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

/// Parse the inner text of a `{{ ... }}` placeholder.
///
/// Accepts `IDENT` or `IDENT OP NUMBER`. Anything else falls back to
/// `Expr::Variable` holding the trimmed input, so this never fails.
pub fn parse(raw: &str) -> Expr {
    let input = raw.trim();
    let mut parser = Parser { input, pos: 0 };
    parser
        .parse_formula()
        .unwrap_or_else(|| Expr::Variable(input.to_string()))
}

/// Parse a placeholder, splitting off an optional `.N` precision suffix
/// that directly follows the identifier.
pub fn parse_placeholder(raw: &str) -> Placeholder {
    let input = raw.trim();
    let mut parser = Parser { input, pos: 0 };
    if let Some(ident) = parser.parse_ident() {
        if parser.eat_char('.') {
            if let Some(digits) = parser.parse_digits() {
                if let Ok(precision) = digits.parse::<usize>() {
                    let rewritten = format!("{}{}", ident, parser.remaining());
                    return Placeholder {
                        expr: parse(&rewritten),
                        precision: Some(precision),
                    };
                }
            }
        }
    }
    Placeholder {
        expr: parse(input),
        precision: None,
    }
}

impl<'a> Parser<'a> {
    // ── Helpers ──────────────────────────────────────────────────────

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    fn eat_char(&mut self, ch: char) -> bool {
        if self.peek_char() == Some(ch) {
            self.advance(ch.len_utf8());
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.advance(ch.len_utf8());
            } else {
                break;
            }
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    // ── Grammar ─────────────────────────────────────────────────────

    fn parse_formula(&mut self) -> Option<Expr> {
        let name = self.parse_ident()?;
        self.skip_ws();
        if self.at_end() {
            // A bare identifier is handled by the caller's fallback.
            return None;
        }
        let op = Operator::from_char(self.peek_char()?)?;
        self.advance(1);
        self.skip_ws();
        let operand = self.parse_number()?;
        if !self.at_end() {
            return None;
        }
        Some(Expr::Formula {
            name: name.to_string(),
            op,
            operand,
        })
    }

    /// `[A-Za-z_][A-Za-z0-9_]*`
    fn parse_ident(&mut self) -> Option<&'a str> {
        let start = self.pos;
        match self.peek_char() {
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => self.advance(1),
            _ => return None,
        }
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance(1);
            } else {
                break;
            }
        }
        Some(&self.input[start..self.pos])
    }

    fn parse_digits(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() {
                self.advance(1);
            } else {
                break;
            }
        }
        if self.pos == start {
            None
        } else {
            Some(&self.input[start..self.pos])
        }
    }

    /// `-?\d+(\.\d+)?`
    fn parse_number(&mut self) -> Option<f64> {
        let start = self.pos;
        self.eat_char('-');
        self.parse_digits()?;
        if self.peek_char() == Some('.') {
            let saved = self.pos;
            self.advance(1);
            if self.parse_digits().is_none() {
                self.pos = saved;
            }
        }
        self.input[start..self.pos].parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_variable() {
        assert_eq!(parse("  basedamage "), Expr::Variable("basedamage".into()));
    }

    #[test]
    fn test_formula_with_spaces() {
        assert_eq!(
            parse("armorshredpercent * 100"),
            Expr::Formula {
                name: "armorshredpercent".into(),
                op: Operator::Mul,
                operand: 100.0,
            }
        );
    }

    #[test]
    fn test_formula_negative_operand() {
        assert_eq!(
            parse("movespeedmod*-100"),
            Expr::Formula {
                name: "movespeedmod".into(),
                op: Operator::Mul,
                operand: -100.0,
            }
        );
    }

    #[test]
    fn test_formula_trailing_zero_decimals() {
        let expr = parse("armorshredpercent*100.000000");
        assert_eq!(expr.name(), "armorshredpercent");
        assert!(expr.is_formula());
        assert_eq!(expr.apply_to(0.25), 25.0);
    }

    #[test]
    fn test_chained_operators_fall_back() {
        assert_eq!(parse("a*2+3"), Expr::Variable("a*2+3".into()));
    }

    #[test]
    fn test_operand_must_be_numeric() {
        assert_eq!(parse("a * b"), Expr::Variable("a * b".into()));
        assert_eq!(parse("a *"), Expr::Variable("a *".into()));
    }

    #[test]
    fn test_non_identifier_falls_back() {
        assert_eq!(parse("1 + 2"), Expr::Variable("1 + 2".into()));
        assert_eq!(parse(""), Expr::Variable(String::new()));
    }

    #[test]
    fn test_division_and_subtraction() {
        assert_eq!(
            parse("x/2"),
            Expr::Formula {
                name: "x".into(),
                op: Operator::Div,
                operand: 2.0
            }
        );
        assert_eq!(parse("x - 2.5").apply_to(5.0), 2.5);
    }

    #[test]
    fn test_precision_suffix() {
        let p = parse_placeholder("rcooldownreduction.0*100");
        assert_eq!(p.precision, Some(0));
        assert_eq!(
            p.expr,
            Expr::Formula {
                name: "rcooldownreduction".into(),
                op: Operator::Mul,
                operand: 100.0
            }
        );
    }

    #[test]
    fn test_no_precision_suffix() {
        let p = parse_placeholder(" e1 ");
        assert_eq!(p.precision, None);
        assert_eq!(p.expr, Expr::Variable("e1".into()));
    }
}
