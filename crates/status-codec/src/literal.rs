//! Literal Tree Parsing
//!
//! Recursive-descent parser for the blob syntax. It accepts both dialects
//! seen in the field: Python literals (single quotes, `True`/`False`/`None`,
//! trailing commas) and JSON. The output is a passive value tree; nothing
//! in a blob is ever evaluated.

use crate::error::CodecError;

/// Maximum container nesting before the parser refuses the input
const MAX_NESTING: usize = 32;

/// A parsed literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer number
    Int(i64),
    /// Floating-point number
    Float(f64),
    /// Quoted string
    Str(String),
    /// `True`/`False` or `true`/`false`
    Bool(bool),
    /// `None` or `null`
    None,
    /// Bracketed list
    List(Vec<Literal>),
    /// Braced dict, entries in source order
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    /// Borrow the string contents when this literal is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Parse a complete blob into a single literal value.
pub fn parse(input: &str) -> Result<Literal, CodecError> {
    let mut parser = Parser::new(input);
    parser.skip_whitespace();
    let value = parser.parse_value(0)?;
    parser.skip_whitespace();
    if parser.peek().is_some() {
        return Err(CodecError::TrailingData { offset: parser.pos });
    }
    Ok(value)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), CodecError> {
        match self.advance() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(CodecError::UnexpectedChar {
                ch,
                offset: self.pos - 1,
            }),
            None => Err(CodecError::UnexpectedEnd),
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Literal, CodecError> {
        if depth > MAX_NESTING {
            return Err(CodecError::NestingTooDeep { limit: MAX_NESTING });
        }
        match self.peek() {
            Some('[') => self.parse_list(depth),
            Some('{') => self.parse_dict(depth),
            Some('\'') | Some('"') => Ok(Literal::Str(self.parse_string()?)),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                self.parse_number()
            }
            Some(c) if c.is_ascii_alphabetic() => self.parse_keyword(),
            Some(ch) => Err(CodecError::UnexpectedChar {
                ch,
                offset: self.pos,
            }),
            None => Err(CodecError::UnexpectedEnd),
        }
    }

    fn parse_list(&mut self, depth: usize) -> Result<Literal, CodecError> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(']') {
                self.pos += 1;
                return Ok(Literal::List(items));
            }
            items.push(self.parse_value(depth + 1)?);
            self.skip_whitespace();
            match self.peek() {
                // Loop head handles a trailing comma before `]`
                Some(',') => self.pos += 1,
                Some(']') => {
                    self.pos += 1;
                    return Ok(Literal::List(items));
                }
                Some(ch) => {
                    return Err(CodecError::UnexpectedChar {
                        ch,
                        offset: self.pos,
                    })
                }
                None => return Err(CodecError::UnexpectedEnd),
            }
        }
    }

    fn parse_dict(&mut self, depth: usize) -> Result<Literal, CodecError> {
        self.expect('{')?;
        let mut entries = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Literal::Dict(entries));
            }
            let key = self.parse_value(depth + 1)?;
            self.skip_whitespace();
            self.expect(':')?;
            self.skip_whitespace();
            let value = self.parse_value(depth + 1)?;
            entries.push((key, value));
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {
                    self.pos += 1;
                    return Ok(Literal::Dict(entries));
                }
                Some(ch) => {
                    return Err(CodecError::UnexpectedChar {
                        ch,
                        offset: self.pos,
                    })
                }
                None => return Err(CodecError::UnexpectedEnd),
            }
        }
    }

    fn parse_string(&mut self) -> Result<String, CodecError> {
        let quote = self.advance().ok_or(CodecError::UnexpectedEnd)?;
        let mut out = String::new();
        loop {
            match self.advance() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => out.push(self.parse_escape()?),
                Some(c) => out.push(c),
                None => return Err(CodecError::UnexpectedEnd),
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char, CodecError> {
        match self.advance() {
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('r') => Ok('\r'),
            Some('0') => Ok('\0'),
            Some('\\') => Ok('\\'),
            Some('\'') => Ok('\''),
            Some('"') => Ok('"'),
            Some('/') => Ok('/'),
            Some('x') => self.parse_hex_escape(2),
            Some('u') => self.parse_hex_escape(4),
            Some(_) => Err(CodecError::InvalidEscape {
                offset: self.pos - 1,
            }),
            None => Err(CodecError::UnexpectedEnd),
        }
    }

    fn parse_hex_escape(&mut self, digits: u32) -> Result<char, CodecError> {
        let mut code = 0u32;
        for _ in 0..digits {
            let ch = self.advance().ok_or(CodecError::UnexpectedEnd)?;
            let digit = ch.to_digit(16).ok_or(CodecError::InvalidEscape {
                offset: self.pos - 1,
            })?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or(CodecError::InvalidEscape { offset: self.pos })
    }

    fn parse_number(&mut self) -> Result<Literal, CodecError> {
        let start = self.pos;
        if matches!(self.peek(), Some('+') | Some('-')) {
            self.pos += 1;
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => self.pos += 1,
                '.' => {
                    is_float = true;
                    self.pos += 1;
                }
                'e' | 'E' => {
                    is_float = true;
                    self.pos += 1;
                    if matches!(self.peek(), Some('+') | Some('-')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if is_float {
            match text.parse::<f64>() {
                Ok(f) => Ok(Literal::Float(f)),
                Err(_) => Err(CodecError::InvalidNumber { text }),
            }
        } else {
            match text.parse::<i64>() {
                Ok(n) => Ok(Literal::Int(n)),
                // Integers wider than i64 still parse, as floats
                Err(_) => match text.parse::<f64>() {
                    Ok(f) => Ok(Literal::Float(f)),
                    Err(_) => Err(CodecError::InvalidNumber { text }),
                },
            }
        }
    }

    fn parse_keyword(&mut self) -> Result<Literal, CodecError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "True" | "true" => Ok(Literal::Bool(true)),
            "False" | "false" => Ok(Literal::Bool(false)),
            "None" | "null" => Ok(Literal::None),
            _ => Err(CodecError::UnknownKeyword { word }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integers() {
        assert_eq!(parse("2200").unwrap(), Literal::Int(2200));
        assert_eq!(parse("-15").unwrap(), Literal::Int(-15));
        assert_eq!(parse("+7").unwrap(), Literal::Int(7));
    }

    #[test]
    fn test_parse_floats() {
        assert_eq!(parse("220.5").unwrap(), Literal::Float(220.5));
        assert_eq!(parse("-0.5").unwrap(), Literal::Float(-0.5));
        assert_eq!(parse("1e3").unwrap(), Literal::Float(1000.0));
        assert_eq!(parse("2.5e-2").unwrap(), Literal::Float(0.025));
    }

    #[test]
    fn test_oversized_integer_parses_as_float() {
        let parsed = parse("99999999999999999999").unwrap();
        assert!(matches!(parsed, Literal::Float(f) if f > 9.9e19));
    }

    #[test]
    fn test_parse_strings_both_quote_styles() {
        assert_eq!(
            parse("'cur_voltage'").unwrap(),
            Literal::Str("cur_voltage".to_string())
        );
        assert_eq!(
            parse("\"cur_voltage\"").unwrap(),
            Literal::Str("cur_voltage".to_string())
        );
    }

    #[test]
    fn test_parse_string_escapes() {
        assert_eq!(
            parse(r"'a\'b\n\t\\'").unwrap(),
            Literal::Str("a'b\n\t\\".to_string())
        );
        assert_eq!(parse(r"'\x41B'").unwrap(), Literal::Str("AB".to_string()));
    }

    #[test]
    fn test_parse_keywords_both_dialects() {
        assert_eq!(parse("True").unwrap(), Literal::Bool(true));
        assert_eq!(parse("false").unwrap(), Literal::Bool(false));
        assert_eq!(parse("None").unwrap(), Literal::None);
        assert_eq!(parse("null").unwrap(), Literal::None);
        assert!(matches!(
            parse("nil"),
            Err(CodecError::UnknownKeyword { .. })
        ));
    }

    #[test]
    fn test_parse_list_with_trailing_comma() {
        let parsed = parse("[1, 2, 3,]").unwrap();
        assert_eq!(
            parsed,
            Literal::List(vec![Literal::Int(1), Literal::Int(2), Literal::Int(3)])
        );
    }

    #[test]
    fn test_parse_nested_event_dict() {
        let parsed = parse("[{'code': 'cur_voltage', 'value': 2200}]").unwrap();
        let expected = Literal::List(vec![Literal::Dict(vec![
            (
                Literal::Str("code".to_string()),
                Literal::Str("cur_voltage".to_string()),
            ),
            (Literal::Str("value".to_string()), Literal::Int(2200)),
        ])]);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_empty_containers() {
        assert_eq!(parse("[]").unwrap(), Literal::List(vec![]));
        assert_eq!(parse("{}").unwrap(), Literal::Dict(vec![]));
    }

    #[test]
    fn test_whitespace_tolerated() {
        let parsed = parse("  [ { 'code' : 'x' , 'value' : 1 } ]  ").unwrap();
        assert!(matches!(parsed, Literal::List(items) if items.len() == 1));
    }

    #[test]
    fn test_trailing_data_rejected() {
        assert!(matches!(
            parse("[1] garbage"),
            Err(CodecError::TrailingData { .. })
        ));
    }

    #[test]
    fn test_unterminated_string_rejected() {
        assert!(matches!(parse("'open"), Err(CodecError::UnexpectedEnd)));
    }

    #[test]
    fn test_unterminated_list_rejected() {
        assert!(matches!(parse("[1, 2"), Err(CodecError::UnexpectedEnd)));
    }

    #[test]
    fn test_missing_colon_rejected() {
        assert!(matches!(
            parse("{'code' 'x'}"),
            Err(CodecError::UnexpectedChar { .. })
        ));
    }

    #[test]
    fn test_nesting_limit_enforced() {
        let deep = "[".repeat(100) + &"]".repeat(100);
        assert!(matches!(
            parse(&deep),
            Err(CodecError::NestingTooDeep { .. })
        ));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(parse(""), Err(CodecError::UnexpectedEnd)));
        assert!(matches!(parse("   "), Err(CodecError::UnexpectedEnd)));
    }
}
