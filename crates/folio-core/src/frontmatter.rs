//! Front matter parsing
//!
//! Splits a leading `---` delimited metadata block from a markdown body and
//! coerces each `key: value` line into a string, number, boolean or list.
//! Input without a front matter block is returned whole as the body.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use time::Date;
use time::macros::format_description;

use crate::{CoreError, Result};

lazy_static! {
    static ref BLOCK_RE: Regex =
        Regex::new(r"(?s)\A\x{FEFF}?---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n|\z)(.*)\z")
            .unwrap();
    static ref FIELD_RE: Regex = Regex::new(r"^([A-Za-z0-9_][A-Za-z0-9_-]*)[ \t]*:(.*)$").unwrap();
    static ref ITEM_RE: Regex = Regex::new(r"^[ \t]+-[ \t]*(.*)$|^-[ \t]+(.*)$").unwrap();
    static ref NUMBER_RE: Regex = Regex::new(r"^-?\d+(\.\d+)?$").unwrap();
}

/// A single coerced front matter value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Number(f64),
    Bool(bool),
    List(Vec<String>),
}

impl Value {
    /// Render the value as text; lists are joined with ", "
    pub fn to_text(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::List(items) => items.join(", "),
        }
    }
}

/// Parsed metadata block
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrontMatter {
    fields: BTreeMap<String, Value>,
}

/// A markdown document split into metadata and body
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub front_matter: FrontMatter,
    pub body: String,
}

/// Parse a markdown document with an optional front matter block
pub fn parse(input: &str) -> ParsedDocument {
    let Some(caps) = BLOCK_RE.captures(input) else {
        return ParsedDocument {
            front_matter: FrontMatter::default(),
            body: input.to_string(),
        };
    };

    let block = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    let body = caps.get(2).map(|m| m.as_str()).unwrap_or("");

    ParsedDocument {
        front_matter: FrontMatter::parse_block(block),
        body: body.trim_start_matches(['\r', '\n']).to_string(),
    }
}

impl FrontMatter {
    /// Parse the lines between the `---` delimiters
    pub fn parse_block(block: &str) -> Self {
        let mut fields = BTreeMap::new();
        // Key of a `key:` line with an empty value; following `- item` lines belong to it
        let mut open_list: Option<String> = None;

        for line in block.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some(key) = &open_list
                && let Some(caps) = ITEM_RE.captures(line)
            {
                let item = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()).unwrap_or("");
                let item = unquote(item.trim()).to_string();
                match fields.get_mut(key) {
                    Some(Value::List(items)) => items.push(item),
                    _ => {
                        fields.insert(key.clone(), Value::List(vec![item]));
                    }
                }
                continue;
            }

            let Some(caps) = FIELD_RE.captures(line.trim_end()) else {
                open_list = None;
                continue;
            };

            let key = caps[1].to_string();
            let raw = caps[2].trim();

            if raw.is_empty() {
                fields.insert(key.clone(), Value::String(String::new()));
                open_list = Some(key);
            } else {
                fields.insert(key, coerce(raw));
                open_list = None;
            }
        }

        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Text form of a field; empty strings count as absent
    pub fn str(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .map(Value::to_text)
            .filter(|s| !s.is_empty())
    }

    /// First present field among `keys`
    pub fn str_any(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.str(key))
    }

    /// A list field; a scalar string is split on commas
    pub fn string_list(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(Value::List(items)) => items.clone(),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            Some(other) => vec![other.to_text()],
            None => Vec::new(),
        }
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.fields.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "true" | "yes" => Some(true),
                "false" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.fields.get(key)? {
            Value::Number(n) => Some(*n),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Parse a date field; `None` when the field is absent
    pub fn date(&self, key: &str) -> Option<Result<Date>> {
        self.str(key).map(|s| parse_date(&s))
    }
}

/// Parse `YYYY-MM-DD`, ignoring any trailing time component
pub fn parse_date(value: &str) -> Result<Date> {
    let value = value.trim();
    let day = value.get(..10).unwrap_or(value);
    Date::parse(day, format_description!("[year]-[month]-[day]"))
        .map_err(|e| CoreError::FrontMatter(format!("invalid date '{value}': {e}")))
}

fn coerce(raw: &str) -> Value {
    if raw.starts_with('[') && raw.ends_with(']') {
        let inner = &raw[1..raw.len() - 1];
        let items = inner
            .split(',')
            .map(|item| unquote(item.trim()))
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect();
        return Value::List(items);
    }

    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if NUMBER_RE.is_match(raw)
        && let Ok(n) = raw.parse::<f64>()
    {
        return Value::Number(n);
    }

    Value::String(unquote(raw).to_string())
}

fn unquote(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2
        && ((bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[bytes.len() - 1] == b'\''))
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}
