use super::{is_ident_byte, Parser, RuleFn};
use crate::ast::Literal;
use crate::error::Rule;

impl<'src> Parser<'src> {
    /// A constant value. Alternatives are ordered so that the narrower
    /// numeric forms are tried first: `0x1A` must not read as `0`, and
    /// `1e3` must not read as `1`.
    pub(crate) fn literal(&mut self) -> Rule<Literal> {
        let rules: [RuleFn<'src, Literal>; 8] = [
            Self::hex_literal,
            Self::exponent_literal,
            Self::decimal_literal,
            Self::bool_literal,
            Self::string_literal,
            Self::list_literal,
            Self::map_literal,
            Self::ref_literal,
        ];
        self.choice("value", &rules)
    }

    /// Decimal or hexadecimal integer.
    pub(crate) fn integer(&mut self) -> Rule<i64> {
        let rules: [RuleFn<'src, Literal>; 2] = [Self::hex_literal, Self::int_literal];
        let literal = self.choice("integer", &rules)?;
        literal.as_i64().ok_or_else(|| self.expected("integer"))
    }

    /// `= <value>`, if present.
    pub(crate) fn assignment(&mut self) -> Option<Literal> {
        self.attempt(|p| {
            p.punct(b'=')?;
            p.literal()
        })
    }

    fn sign(&mut self) -> bool {
        if self.scanner.peek() == Some(b'-') {
            self.scanner.advance(1);
            true
        } else {
            false
        }
    }

    /// Optional `-` or `+` before a decimal or exponential number.
    fn decimal_sign(&mut self) {
        if matches!(self.scanner.peek(), Some(b'-') | Some(b'+')) {
            self.scanner.advance(1);
        }
    }

    /// Numbers must not run straight into an identifier (`12abc`).
    fn end_of_number(&mut self) -> Rule<()> {
        if self.scanner.peek().is_some_and(is_ident_byte) {
            return Err(self.expected("end of number"));
        }
        self.skip();
        Ok(())
    }

    fn hex_literal(&mut self) -> Rule<Literal> {
        let negative = self.sign();
        if !(self.scanner.starts_with("0x") || self.scanner.starts_with("0X")) {
            return Err(self.expected("hexadecimal literal"));
        }
        self.scanner.advance(2);
        let digits = self.scanner.take_while(|b| b.is_ascii_hexdigit());
        if digits.is_empty() {
            return Err(self.expected("hexadecimal digit"));
        }
        let value = match i64::from_str_radix(digits, 16) {
            Ok(v) => v,
            Err(_) => {
                let message = format!("hexadecimal literal 0x{} is out of range", digits);
                return Err(self.invalid(message));
            }
        };
        self.end_of_number()?;
        Ok(Literal::Hex(if negative { -value } else { value }))
    }

    fn exponent_literal(&mut self) -> Rule<Literal> {
        let start = self.scanner.offset();
        self.decimal_sign();
        let mantissa = self.scanner.take_while(|b| b.is_ascii_digit() || b == b'.');
        if !mantissa.bytes().any(|b| b.is_ascii_digit()) {
            return Err(self.expected("number"));
        }
        if !matches!(self.scanner.peek(), Some(b'e') | Some(b'E')) {
            return Err(self.expected("exponent"));
        }
        self.scanner.advance(1);
        if matches!(self.scanner.peek(), Some(b'-') | Some(b'+')) {
            self.scanner.advance(1);
        }
        if self.scanner.take_while(|b| b.is_ascii_digit()).is_empty() {
            return Err(self.expected("exponent digits"));
        }
        let text = self.scanner.slice(start, self.scanner.offset());
        let value: f64 = match text.parse() {
            Ok(v) => v,
            Err(_) => return Err(self.expected("number")),
        };
        self.end_of_number()?;
        Ok(Literal::Exponent(value))
    }

    fn decimal_literal(&mut self) -> Rule<Literal> {
        let start = self.scanner.offset();
        self.decimal_sign();
        let body = self.scanner.take_while(|b| b.is_ascii_digit() || b == b'.');
        if !body.bytes().any(|b| b.is_ascii_digit()) {
            return Err(self.expected("number"));
        }
        let text = self.scanner.slice(start, self.scanner.offset());
        let literal = if body.contains('.') {
            text.parse::<f64>().ok().map(Literal::Double)
        } else {
            text.parse::<i64>().ok().map(Literal::Int)
        };
        let Some(literal) = literal else {
            return Err(self.expected("number"));
        };
        self.end_of_number()?;
        Ok(literal)
    }

    fn int_literal(&mut self) -> Rule<Literal> {
        match self.decimal_literal()? {
            literal @ Literal::Int(_) => Ok(literal),
            _ => Err(self.expected("integer")),
        }
    }

    fn bool_literal(&mut self) -> Rule<Literal> {
        if self.keyword("true").is_ok() {
            return Ok(Literal::Bool(true));
        }
        self.keyword("false")?;
        Ok(Literal::Bool(false))
    }

    /// Single- or double-quoted string with backslash escapes.
    fn string_literal(&mut self) -> Rule<Literal> {
        let raw = self.quoted(true)?;
        match unescape(raw) {
            Some(s) => {
                self.skip();
                Ok(Literal::Str(s))
            }
            None => Err(self.invalid(format!("invalid escape sequence in \"{}\"", raw))),
        }
    }

    /// Raw text between matching quotes; the cursor ends after the closing
    /// quote. Backslash escapes are skipped over only when `escapes` is set.
    pub(crate) fn quoted(&mut self, escapes: bool) -> Rule<&'src str> {
        let quote = match self.scanner.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.expected("string")),
        };
        let rest = self.scanner.rest().as_bytes();
        let mut i = 1;
        while i < rest.len() && rest[i] != quote {
            i += if escapes && rest[i] == b'\\' { 2 } else { 1 };
        }
        if i >= rest.len() {
            return Err(self.expected("closing quote"));
        }
        let start = self.scanner.offset();
        self.scanner.advance(i + 1);
        Ok(self.scanner.slice(start + 1, start + i))
    }

    fn list_literal(&mut self) -> Rule<Literal> {
        self.punct(b'[')?;
        let items = self.repeat(|p| {
            let value = p.literal()?;
            p.separator();
            Ok(value)
        });
        self.close(b']')?;
        Ok(Literal::List(items))
    }

    fn map_literal(&mut self) -> Rule<Literal> {
        self.punct(b'{')?;
        let pairs = self.repeat(|p| {
            let key = p.literal()?;
            p.punct(b':')?;
            let value = p.literal()?;
            p.separator();
            Ok((key, value))
        });
        self.close(b'}')?;
        Ok(Literal::Map(pairs))
    }

    fn ref_literal(&mut self) -> Rule<Literal> {
        self.path().map(Literal::Ref)
    }
}

/// Resolve backslash escapes. Unknown escapes yield the escaped character;
/// an escaped line break is a line continuation. `None` on a malformed
/// `\x` or `\u` escape.
fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            '0' => out.push('\0'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'v' => out.push('\u{0B}'),
            'x' => {
                let hex: String = (0..2).filter_map(|_| chars.next()).collect();
                out.push(hex_char(&hex, 2)?);
            }
            'u' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    let mut hex = String::new();
                    loop {
                        match chars.next()? {
                            '}' => break,
                            h => hex.push(h),
                        }
                    }
                    if hex.is_empty() || hex.len() > 6 {
                        return None;
                    }
                    out.push(hex_char(&hex, hex.len())?);
                } else {
                    let hex: String = (0..4).filter_map(|_| chars.next()).collect();
                    out.push(hex_char(&hex, 4)?);
                }
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\n' => {}
            other => out.push(other),
        }
    }
    Some(out)
}

fn hex_char(hex: &str, len: usize) -> Option<char> {
    if hex.len() != len {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;

    fn lit(src: &str) -> Literal {
        let mut p = Parser::new(src, ParseOptions::default());
        let value = p.literal().unwrap();
        assert!(p.scanner.at_end(), "trailing input after {:?}", value);
        value
    }

    fn fails(src: &str) -> bool {
        let mut p = Parser::new(src, ParseOptions::default());
        match p.literal() {
            Ok(_) => !p.scanner.at_end(),
            Err(_) => true,
        }
    }

    #[test]
    fn hexadecimal() {
        assert_eq!(lit("0x1A"), Literal::Hex(26));
        assert_eq!(lit("-0x1A"), Literal::Hex(-26));
        assert_eq!(lit("0XfF"), Literal::Hex(255));
    }

    #[test]
    fn exponential() {
        assert_eq!(lit("1.5e3"), Literal::Exponent(1500.0));
        assert_eq!(lit("-2E-1"), Literal::Exponent(-0.2));
        assert_eq!(lit("3e+2"), Literal::Exponent(300.0));
        assert_eq!(lit("+1e3"), Literal::Exponent(1000.0));
        assert_eq!(lit("+1"), Literal::Int(1));
    }

    #[test]
    fn plain_decimal() {
        assert_eq!(lit("42"), Literal::Int(42));
        assert_eq!(lit("-7"), Literal::Int(-7));
        assert_eq!(lit("0"), Literal::Int(0));
        assert_eq!(lit("007"), Literal::Int(7));
        assert_eq!(lit("0.25"), Literal::Double(0.25));
        assert_eq!(lit("-1.5"), Literal::Double(-1.5));
    }

    #[test]
    fn malformed_numbers_do_not_match() {
        assert!(fails("1.2.3"));
        assert!(fails("12abc"));
        assert!(fails("0x"));
        assert!(fails("0xZZ"));
    }

    #[test]
    fn booleans() {
        assert_eq!(lit("true"), Literal::Bool(true));
        assert_eq!(lit("false"), Literal::Bool(false));
        // Not a keyword: reads as a reference.
        assert_eq!(lit("falsey"), Literal::Ref(vec!["falsey".into()]));
    }

    #[test]
    fn strings_with_escapes() {
        assert_eq!(lit(r#""a\"b\n""#), Literal::Str("a\"b\n".into()));
        assert_eq!(lit(r"'it\'s'"), Literal::Str("it's".into()));
        assert_eq!(lit(r#""\x41é\u{1F600}""#), Literal::Str("Aé😀".into()));
        assert_eq!(lit(r#""\q""#), Literal::Str("q".into()));
        assert!(fails(r#""unterminated"#));
        assert!(fails(r#""\xZ1""#));
    }

    #[test]
    fn list_with_mixed_separators() {
        assert_eq!(
            lit("[1, 2; 3 4]"),
            Literal::List(vec![
                Literal::Int(1),
                Literal::Int(2),
                Literal::Int(3),
                Literal::Int(4)
            ])
        );
        assert_eq!(lit("[]"), Literal::List(vec![]));
    }

    #[test]
    fn map_keeps_pair_order() {
        assert_eq!(
            lit(r#"{"b": 2, "a": [true]}"#),
            Literal::Map(vec![
                (Literal::Str("b".into()), Literal::Int(2)),
                (
                    Literal::Str("a".into()),
                    Literal::List(vec![Literal::Bool(true)])
                ),
            ])
        );
    }

    #[test]
    fn dotted_reference() {
        assert_eq!(
            lit("Color.RED"),
            Literal::Ref(vec!["Color".into(), "RED".into()])
        );
    }

    #[test]
    fn integer_rule_accepts_decimal_and_hex_only() {
        let mut p = Parser::new("0x10", ParseOptions::default());
        assert_eq!(p.integer(), Ok(16));
        let mut p = Parser::new("1.5", ParseOptions::default());
        assert!(p.integer().is_err());
        assert_eq!(p.scanner.offset(), 0);
    }

    #[test]
    fn assignment_is_optional() {
        let mut p = Parser::new("= 5", ParseOptions::default());
        assert_eq!(p.assignment(), Some(Literal::Int(5)));
        let mut p = Parser::new(", x", ParseOptions::default());
        assert_eq!(p.assignment(), None);
        assert_eq!(p.scanner.offset(), 0);
    }
}
