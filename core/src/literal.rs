//! Literal-only parsing of testcase input.
//!
//! Testcase input is plain text. Each line is read as a Python literal when it is one
//! (numbers, booleans, `None`, quoted strings, and lists/tuples/dicts/sets of those)
//! and kept as a plain string otherwise. Nothing is ever evaluated.

use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    /// Decimal digits with an optional leading `-`, kept as text so any length survives.
    Int(String),
    /// Source text of a float literal with `_` separators removed.
    Float(String),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Dict(Vec<(Value, Value)>),
    Set(Vec<Value>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    #[error("Unexpected character {0:?} at {}", .1+1)]
    Unexpected(char, usize),

    #[error("Unexpected end of input")]
    UnexpectedEnd,

    #[error("Invalid escape sequence at {}", .0+1)]
    InvalidEscape(usize),

    #[error("Invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("Unhashable key or set element in the braces at {}", .0+1)]
    Unhashable(usize),

    #[error("Nesting deeper than {} levels", Parser::MAX_DEPTH)]
    TooDeep,
}

/// Normalize raw testcase input into the value passed to the entry point.
///
/// One line becomes a single value; several lines become a `Value::List` with one
/// element per line, in order. Lines that are not literals are kept as strings.
pub fn normalize(raw: &str) -> Value {
    let lines: Vec<&str> = raw.trim().split('\n').collect();
    match lines.as_slice() {
        [line] => parse_or_string(line),
        lines => Value::List(lines.iter().map(|line| parse_or_string(line)).collect()),
    }
}

fn parse_or_string(line: &str) -> Value {
    parse(line).unwrap_or_else(|e| {
        log::trace!("Not a literal ({}), keeping as string: {:?}", e, line);
        Value::Str(line.to_owned())
    })
}

/// Parse exactly one literal. Surrounding whitespace is ignored, anything else is an error.
pub fn parse(s: &str) -> Result<Value, LiteralError> {
    let mut p = Parser {
        chars: s.chars().collect(),
        pos: 0,
    };
    p.skip_ws();
    let v = p.value(0)?;
    p.skip_ws();
    match p.peek() {
        None => Ok(v),
        Some(c) => Err(LiteralError::Unexpected(c, p.pos)),
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    const MAX_DEPTH: usize = 64;

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, want: char) -> Result<(), LiteralError> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(LiteralError::Unexpected(c, self.pos - 1)),
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    fn value(&mut self, depth: usize) -> Result<Value, LiteralError> {
        if depth > Self::MAX_DEPTH {
            return Err(LiteralError::TooDeep);
        }
        match self.peek() {
            None => Err(LiteralError::UnexpectedEnd),
            Some('[') => {
                self.pos += 1;
                self.items(']', depth).map(|(items, _)| Value::List(items))
            }
            Some('(') => {
                self.pos += 1;
                let (mut items, trailing_comma) = self.items(')', depth)?;
                if items.len() == 1 && !trailing_comma {
                    // `(x)` is just a parenthesized x
                    Ok(items.remove(0))
                } else {
                    Ok(Value::Tuple(items))
                }
            }
            Some('{') => {
                self.pos += 1;
                self.dict_or_set(depth)
            }
            Some(q @ ('\'' | '"')) => {
                self.pos += 1;
                self.string(q).map(Value::Str)
            }
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.keyword(),
            Some(c) => Err(LiteralError::Unexpected(c, self.pos)),
        }
    }

    /// Comma separated values up to `close`. Returns whether the last item had a trailing comma.
    fn items(&mut self, close: char, depth: usize) -> Result<(Vec<Value>, bool), LiteralError> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok((items, trailing_comma));
            }
            items.push(self.value(depth + 1)?);
            self.skip_ws();
            match self.bump() {
                Some(',') => trailing_comma = true,
                Some(c) if c == close => return Ok((items, false)),
                Some(c) => return Err(LiteralError::Unexpected(c, self.pos - 1)),
                None => return Err(LiteralError::UnexpectedEnd),
            }
        }
    }

    fn dict_or_set(&mut self, depth: usize) -> Result<Value, LiteralError> {
        let open = self.pos - 1;
        let hashable = |v: Value| {
            if v.is_hashable() {
                Ok(v)
            } else {
                Err(LiteralError::Unhashable(open))
            }
        };
        self.skip_ws();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(Value::Dict(Vec::new()));
        }

        let first = self.value(depth + 1)?;
        self.skip_ws();
        if self.peek() != Some(':') {
            let first = hashable(first)?;
            let (rest, _) = match self.bump() {
                Some(',') => self.items('}', depth)?,
                Some('}') => (Vec::new(), false),
                Some(c) => return Err(LiteralError::Unexpected(c, self.pos - 1)),
                None => return Err(LiteralError::UnexpectedEnd),
            };
            let mut elems = vec![first];
            for v in rest {
                elems.push(hashable(v)?);
            }
            return Ok(Value::Set(elems));
        }

        let mut entries = Vec::new();
        let mut key = hashable(first)?;
        loop {
            self.expect(':')?;
            self.skip_ws();
            let value = self.value(depth + 1)?;
            entries.push((key, value));
            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some('}') => return Ok(Value::Dict(entries)),
                Some(c) => return Err(LiteralError::Unexpected(c, self.pos - 1)),
                None => return Err(LiteralError::UnexpectedEnd),
            }
            self.skip_ws();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Value::Dict(entries));
            }
            key = hashable(self.value(depth + 1)?)?;
            self.skip_ws();
        }
    }

    fn string(&mut self, quote: char) -> Result<String, LiteralError> {
        let mut s = String::new();
        loop {
            let c = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
            match c {
                c if c == quote => return Ok(s),
                '\n' => return Err(LiteralError::Unexpected(c, self.pos - 1)),
                '\\' => self.escape(&mut s)?,
                c => s.push(c),
            }
        }
    }

    fn escape(&mut self, s: &mut String) -> Result<(), LiteralError> {
        let at = self.pos - 1;
        let c = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
        let decoded = match c {
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'a' => '\x07',
            'b' => '\x08',
            'f' => '\x0c',
            'v' => '\x0b',
            '0'..='7' => self.octal_escape(c, at)?,
            'x' => self.hex_escape(2, at)?,
            'u' => self.hex_escape(4, at)?,
            'U' => self.hex_escape(8, at)?,
            other => {
                // unknown escapes keep their backslash
                s.push('\\');
                other
            }
        };
        s.push(decoded);
        Ok(())
    }

    fn hex_escape(&mut self, len: usize, at: usize) -> Result<char, LiteralError> {
        let end = self.pos + len;
        if end > self.chars.len() {
            return Err(LiteralError::InvalidEscape(at));
        }
        let digits: String = self.chars[self.pos..end].iter().collect();
        self.pos = end;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(LiteralError::InvalidEscape(at));
        }
        u32::from_str_radix(&digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or(LiteralError::InvalidEscape(at))
    }

    /// Up to three octal digits, the first one already consumed.
    fn octal_escape(&mut self, first: char, at: usize) -> Result<char, LiteralError> {
        let mut code = first.to_digit(8).ok_or(LiteralError::InvalidEscape(at))?;
        for _ in 0..2 {
            match self.peek().and_then(|c| c.to_digit(8)) {
                Some(d) => {
                    code = code * 8 + d;
                    self.pos += 1;
                }
                None => break,
            }
        }
        char::from_u32(code).ok_or(LiteralError::InvalidEscape(at))
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let negative = match self.peek() {
            Some('-') => {
                self.pos += 1;
                true
            }
            Some('+') => {
                self.pos += 1;
                false
            }
            _ => false,
        };
        self.skip_ws();

        let body_start = self.pos;
        while let Some(c) = self.peek() {
            let after_exp = matches!(self.chars.get(self.pos.wrapping_sub(1)), Some('e' | 'E'));
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || ((c == '+' || c == '-') && after_exp)
            {
                self.pos += 1;
            } else {
                break;
            }
        }
        let body: String = self.chars[body_start..self.pos].iter().collect();
        let invalid = || {
            LiteralError::InvalidNumber(self.chars[start..self.pos].iter().collect::<String>())
        };

        if body.is_empty() || body.starts_with('_') || body.ends_with('_') || body.contains("__") {
            return Err(invalid());
        }
        let plain = body.replace('_', "");
        let sign = if negative { "-" } else { "" };

        if plain.bytes().all(|b| b.is_ascii_digit()) {
            // `007` is not a literal, `000` is
            if plain.len() > 1 && plain.starts_with('0') && plain.bytes().any(|b| b != b'0') {
                return Err(invalid());
            }
            let digits = plain.trim_start_matches('0');
            let digits = if digits.is_empty() { "0" } else { digits };
            let sign = if digits == "0" { "" } else { sign };
            return Ok(Value::Int(format!("{}{}", sign, digits)));
        }

        if is_float_literal(&plain) {
            return Ok(Value::Float(format!("{}{}", sign, plain)));
        }
        Err(invalid())
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "None" => Ok(Value::None),
            _ => Err(LiteralError::Unexpected(self.chars[start], start)),
        }
    }
}

/// `1.5`, `.5`, `5.`, `1e9`, `2.5E-3` (no sign, no `_`).
fn is_float_literal(s: &str) -> bool {
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };
    let mantissa_ok = match mantissa.split_once('.') {
        Some((int, frac)) => {
            (!int.is_empty() || !frac.is_empty())
                && int.bytes().all(|b| b.is_ascii_digit())
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => !mantissa.is_empty() && mantissa.bytes().all(|b| b.is_ascii_digit()),
    };
    let exponent_ok = match exponent {
        None => mantissa.contains('.'),
        Some(e) => {
            let digits = e.strip_prefix(['+', '-']).unwrap_or(e);
            !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
        }
    };
    mantissa_ok && exponent_ok
}

impl Value {
    /// Whether Python accepts the value as a dict key or set element.
    pub fn is_hashable(&self) -> bool {
        match self {
            Value::List(_) | Value::Dict(_) | Value::Set(_) => false,
            Value::Tuple(items) => items.iter().all(Value::is_hashable),
            _ => true,
        }
    }

    /// Render as Python source. The output is always exactly one well-formed literal,
    /// whatever characters the strings inside contain.
    pub fn to_python(&self) -> String {
        let mut out = String::new();
        self.write_python(&mut out);
        out
    }

    fn write_python(&self, out: &mut String) {
        fn seq(out: &mut String, open: char, close: char, items: &[Value]) {
            out.push(open);
            for (i, v) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                v.write_python(out);
            }
            out.push(close);
        }

        match self {
            Value::None => out.push_str("None"),
            Value::Bool(true) => out.push_str("True"),
            Value::Bool(false) => out.push_str("False"),
            Value::Int(s) | Value::Float(s) => out.push_str(s),
            Value::Str(s) => out.push_str(&python_str_literal(s)),
            Value::List(items) => seq(out, '[', ']', items),
            Value::Tuple(items) if items.len() == 1 => {
                out.push('(');
                items[0].write_python(out);
                out.push_str(",)");
            }
            Value::Tuple(items) => seq(out, '(', ')', items),
            Value::Set(items) => seq(out, '{', '}', items),
            Value::Dict(entries) => {
                out.push('{');
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    k.write_python(out);
                    out.push_str(": ");
                    v.write_python(out);
                }
                out.push('}');
            }
        }
    }
}

/// Double-quoted Python string literal using only printable ASCII.
pub fn python_str_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ' '..='~' => out.push(c),
            c if (c as u32) <= 0xff => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if (c as u32) <= 0xffff => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => {
                let _ = write!(out, "\\U{:08x}", c as u32);
            }
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod test {
    use super::*;

    fn int(s: &str) -> Value {
        Value::Int(s.to_owned())
    }

    fn string(s: &str) -> Value {
        Value::Str(s.to_owned())
    }

    #[test]
    fn parse_scalars() {
        assert_eq!(parse("9"), Ok(int("9")));
        assert_eq!(parse("  -42 "), Ok(int("-42")));
        assert_eq!(parse("+7"), Ok(int("7")));
        assert_eq!(parse("1_000_000"), Ok(int("1000000")));
        assert_eq!(parse("000"), Ok(int("0")));
        assert_eq!(parse("-0"), Ok(int("0")));
        assert_eq!(
            parse("123456789012345678901234567890"),
            Ok(int("123456789012345678901234567890"))
        );
        assert_eq!(parse("3.14"), Ok(Value::Float("3.14".into())));
        assert_eq!(parse(".5"), Ok(Value::Float(".5".into())));
        assert_eq!(parse("-2.5e-3"), Ok(Value::Float("-2.5e-3".into())));
        assert_eq!(parse("1E9"), Ok(Value::Float("1E9".into())));
        assert_eq!(parse("True"), Ok(Value::Bool(true)));
        assert_eq!(parse("False"), Ok(Value::Bool(false)));
        assert_eq!(parse("None"), Ok(Value::None));
        assert_eq!(parse("'abc'"), Ok(string("abc")));
        assert_eq!(parse(r#""a\"b\n\x41é""#), Ok(string("a\"b\nAé")));
        assert_eq!(parse(r"'\d'"), Ok(string("\\d")));
        assert_eq!(parse(r"'a\012b'"), Ok(string("a\nb")));
        assert_eq!(parse(r"'\0'"), Ok(string("\0")));
        assert_eq!(parse(r"'\08'"), Ok(string("\08")));
        assert_eq!(parse(r"'\1234'"), Ok(string("S4")));
        assert_eq!(parse(r"'\777'"), Ok(string("\u{1ff}")));
    }

    #[test]
    fn parse_containers() {
        assert_eq!(
            parse("[2, 7, 11, 15]"),
            Ok(Value::List(vec![int("2"), int("7"), int("11"), int("15")]))
        );
        assert_eq!(parse("[]"), Ok(Value::List(vec![])));
        assert_eq!(parse("[1,]"), Ok(Value::List(vec![int("1")])));
        assert_eq!(parse("(1)"), Ok(int("1")));
        assert_eq!(parse("(1,)"), Ok(Value::Tuple(vec![int("1")])));
        assert_eq!(parse("()"), Ok(Value::Tuple(vec![])));
        assert_eq!(parse("{}"), Ok(Value::Dict(vec![])));
        assert_eq!(
            parse("{'a': [1, 2], 3: None,}"),
            Ok(Value::Dict(vec![
                (string("a"), Value::List(vec![int("1"), int("2")])),
                (int("3"), Value::None),
            ]))
        );
        assert_eq!(parse("{1, 2}"), Ok(Value::Set(vec![int("1"), int("2")])));
        assert_eq!(parse("{1}"), Ok(Value::Set(vec![int("1")])));
        assert_eq!(
            parse("[[1, 'x'], (True, 2.0)]"),
            Ok(Value::List(vec![
                Value::List(vec![int("1"), string("x")]),
                Value::Tuple(vec![Value::Bool(true), Value::Float("2.0".into())]),
            ]))
        );
    }

    #[test]
    fn reject_non_literals() {
        for s in [
            "hello",
            "race a car",
            "A man a plan a canal Panama",
            "__import__('os').system('true')",
            "1 + 2",
            "abs(-1)",
            "007",
            "1__0",
            "inf",
            "[1, 2",
            "'unterminated",
            "{1: }",
            "x if True else y",
            r"'\x+1'",
            r"'\u12g4'",
            "{[1]: 2}",
            "{1: 2, {3}: 4}",
            "{[1], 2}",
            "{1, {}}",
            "{(1, [2]): 3}",
            "",
        ] {
            assert!(parse(s).is_err(), "{:?} should not parse", s);
        }
    }

    #[test]
    fn hashable_keys_and_set_elements() {
        assert_eq!(
            parse("{(1, 'a'): [2]}"),
            Ok(Value::Dict(vec![(
                Value::Tuple(vec![int("1"), string("a")]),
                Value::List(vec![int("2")]),
            )]))
        );
        assert_eq!(parse("{[1]: 2}"), Err(LiteralError::Unhashable(0)));
        assert_eq!(normalize("{[1]: 2}"), string("{[1]: 2}"));
        assert_eq!(
            parse("{None, 1.5, (True,)}"),
            Ok(Value::Set(vec![
                Value::None,
                Value::Float("1.5".into()),
                Value::Tuple(vec![Value::Bool(true)]),
            ]))
        );
    }

    #[test]
    fn reject_deep_nesting() {
        let s = format!("{}{}", "[".repeat(100), "]".repeat(100));
        assert_eq!(parse(&s), Err(LiteralError::TooDeep));
    }

    #[test]
    fn normalize_single_line() {
        assert_eq!(normalize("7"), int("7"));
        assert_eq!(normalize("  12321\n"), int("12321"));
        assert_eq!(
            normalize("A man a plan a canal Panama"),
            string("A man a plan a canal Panama")
        );
        assert_eq!(normalize(""), string(""));
        assert_eq!(normalize(" \n\t"), string(""));
    }

    #[test]
    fn normalize_multi_line_is_positional_args() {
        assert_eq!(
            normalize("[2, 7, 11, 15]\n9"),
            Value::List(vec![
                Value::List(vec![int("2"), int("7"), int("11"), int("15")]),
                int("9"),
            ])
        );
        assert_eq!(
            normalize("hello\n\n3"),
            Value::List(vec![string("hello"), string(""), int("3")])
        );
    }

    #[test]
    fn render_python() {
        assert_eq!(normalize("[2, 7, 11, 15]\n9").to_python(), "[[2, 7, 11, 15], 9]");
        assert_eq!(parse("(1,)").unwrap().to_python(), "(1,)");
        assert_eq!(parse("{'k': (1, 2)}").unwrap().to_python(), r#"{"k": (1, 2)}"#);
        assert_eq!(parse("{3, 4}").unwrap().to_python(), "{3, 4}");
        assert_eq!(normalize("True\nNone").to_python(), "[True, None]");
    }

    #[test]
    fn render_python_string_escapes_everything() {
        assert_eq!(python_str_literal("plain"), r#""plain""#);
        assert_eq!(
            python_str_literal("a\"b'c\\d\ne\r\t"),
            r#""a\"b'c\\d\ne\r\t""#
        );
        assert_eq!(python_str_literal("'''\"\"\""), r#""'''\"\"\"""#);
        assert_eq!(python_str_literal("\0é漢😀"), r#""\x00\xe9\u6f22\U0001f600""#);
        assert!(python_str_literal("x\u{7f}y").is_ascii());
    }
}
