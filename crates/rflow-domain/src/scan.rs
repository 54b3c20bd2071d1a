//! Scanner for the free-text command grammar.
//!
//! A cell input looks like `<commandName> <args>` where the argument text
//! mixes positional values, `key: value` pairs, bracketed lists and quoted
//! or brace-delimited objects, with both single- and double-quoted strings:
//!
//! ```text
//! splitFrame "prostate.hex", [0.25], ["a.hex","b.hex"], 123456
//! buildModel 'glm', {"model_id":"glm-1","training_frame":"a.hex"}
//! predict model: "glm-1", frame: "b.hex"
//! ```
//!
//! The scanner decodes the whole argument text into `serde_json::Value`s in
//! one pass. Decoding happens exactly once, at plan-build time; nothing is
//! re-parsed per execution.

use serde_json::{Map, Number, Value};

use crate::errors::FlowParseError;

/// One decoded argument: either positional or `key: value`.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Positional(Value),
    Keyword(String, Value),
}

/// A command name plus its decoded arguments, before per-kind typing.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandCall {
    pub name: String,
    pub args: Vec<Arg>,
}

impl CommandCall {
    /// Value of the first keyword argument with any of the given names.
    pub fn keyword(&self, names: &[&str]) -> Option<&Value> {
        self.args.iter().find_map(|a| match a {
            Arg::Keyword(k, v) if names.contains(&k.as_str()) => Some(v),
            _ => None,
        })
    }

    /// Positional arguments in order.
    pub fn positionals(&self) -> Vec<&Value> {
        self.args
            .iter()
            .filter_map(|a| match a {
                Arg::Positional(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    /// All keyword arguments folded into one JSON object, in order.
    pub fn keyword_object(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for a in &self.args {
            if let Arg::Keyword(k, v) = a {
                map.insert(k.clone(), v.clone());
            }
        }
        map
    }
}

pub fn scan_command(input: &str) -> Result<CommandCall, FlowParseError> {
    let mut s = Scanner::new(input);
    s.skip_ws();
    let name = s
        .ident()
        .ok_or_else(|| FlowParseError::Syntax("missing command name".to_string()))?;

    let mut args = Vec::new();
    loop {
        s.skip_separators();
        if s.at_end() {
            break;
        }
        // Lookahead for `ident :` which marks a keyword argument.
        let mark = s.pos;
        if let Some(key) = s.ident() {
            s.skip_ws();
            if s.eat(':') {
                s.skip_ws();
                let value = s.value()?;
                args.push(Arg::Keyword(key, value));
                continue;
            }
            // Bare word in value position: treat as a string.
            if matches!(key.as_str(), "true" | "false" | "null") {
                s.pos = mark;
            } else {
                args.push(Arg::Positional(Value::String(key)));
                continue;
            }
        }
        let value = s.value()?;
        args.push(Arg::Positional(value));
    }
    Ok(CommandCall { name, args })
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn new(input: &str) -> Self {
        Self { chars: input.chars().collect(), pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    /// Whitespace and argument-separating commas.
    fn skip_separators(&mut self) {
        loop {
            self.skip_ws();
            if !self.eat(',') {
                break;
            }
        }
    }

    fn ident(&mut self) -> Option<String> {
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return None,
        }
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        Some(self.chars[start..self.pos].iter().collect())
    }

    fn value(&mut self) -> Result<Value, FlowParseError> {
        self.skip_ws();
        match self.peek() {
            Some('"') | Some('\'') => self.quoted().map(Value::String),
            Some('[') => self.array(),
            Some('{') => self.object(),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                // `true` / `false` / `null` or a bare word used as a string.
                let word = self.ident().unwrap_or_default();
                Ok(match word.as_str() {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    "null" => Value::Null,
                    _ => Value::String(word),
                })
            }
            Some(c) => Err(FlowParseError::Syntax(format!("unexpected character `{c}`"))),
            None => Err(FlowParseError::Syntax("unexpected end of input".to_string())),
        }
    }

    fn quoted(&mut self) -> Result<String, FlowParseError> {
        let quote = self.bump().unwrap_or('"');
        let mut out = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c) => out.push(c),
                    None => {
                        return Err(FlowParseError::Syntax(
                            "dangling escape in string".to_string(),
                        ))
                    }
                },
                Some(c) => out.push(c),
                None => {
                    return Err(FlowParseError::Syntax("unterminated string".to_string()));
                }
            }
        }
    }

    fn array(&mut self) -> Result<Value, FlowParseError> {
        self.bump(); // '['
        let mut items = Vec::new();
        loop {
            self.skip_separators();
            if self.eat(']') {
                return Ok(Value::Array(items));
            }
            if self.at_end() {
                return Err(FlowParseError::Syntax("unterminated list".to_string()));
            }
            items.push(self.value()?);
        }
    }

    fn object(&mut self) -> Result<Value, FlowParseError> {
        self.bump(); // '{'
        let mut map = Map::new();
        loop {
            self.skip_separators();
            if self.eat('}') {
                return Ok(Value::Object(map));
            }
            let key = match self.peek() {
                Some('"') | Some('\'') => self.quoted()?,
                _ => self
                    .ident()
                    .ok_or_else(|| FlowParseError::Syntax("expected object key".to_string()))?,
            };
            self.skip_ws();
            if !self.eat(':') {
                return Err(FlowParseError::Syntax(format!(
                    "expected `:` after object key `{key}`"
                )));
            }
            let value = self.value()?;
            map.insert(key, value);
        }
    }

    fn number(&mut self) -> Result<Value, FlowParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()
            || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
        {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Value::Number(Number::from(i)));
        }
        let f: f64 = text
            .parse()
            .map_err(|_| FlowParseError::Syntax(format!("bad number `{text}`")))?;
        Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| FlowParseError::Syntax(format!("non-finite number `{text}`")))
    }
}
