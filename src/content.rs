//! Turning loaded bytes into something the emitter can declare.

use std::collections::BTreeMap;

use crate::cli::ParseMode;
use crate::error::{IncludeError, Result};

/// A single embeddable value from a JSON or TOML table.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(f64),
    Integer(i64),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedContent {
    Raw(Vec<u8>),
    /// Keys are kept sorted so output does not depend on input order.
    Table(BTreeMap<String, Scalar>),
}

pub fn parse(bytes: Vec<u8>, mode: ParseMode) -> Result<ParsedContent> {
    match mode {
        ParseMode::Raw => Ok(ParsedContent::Raw(bytes)),
        ParseMode::Json => parse_json(&bytes).map(ParsedContent::Table),
        ParseMode::Toml => parse_toml(&bytes).map(ParsedContent::Table),
    }
}

fn parse_json(bytes: &[u8]) -> Result<BTreeMap<String, Scalar>> {
    use serde_json::Value;

    let value: Value = serde_json::from_slice(bytes).map_err(|e| IncludeError::Parse {
        format: "json",
        message: e.to_string(),
    })?;

    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(IncludeError::NotATable {
                format: "json",
                found: json_kind(&other).to_string(),
            })
        }
    };

    object
        .into_iter()
        .map(|(key, value)| {
            let scalar = match value {
                Value::String(s) => Scalar::Text(s),
                Value::Bool(b) => Scalar::Bool(b),
                Value::Number(ref n) => match n.as_f64() {
                    Some(f) => Scalar::Number(f),
                    None => return Err(schema_error(key, format!("number {n}"))),
                },
                other => return Err(schema_error(key, json_kind(&other).to_string())),
            };
            Ok((key, scalar))
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn parse_toml(bytes: &[u8]) -> Result<BTreeMap<String, Scalar>> {
    use toml::Value;

    let text = std::str::from_utf8(bytes).map_err(|e| IncludeError::Parse {
        format: "toml",
        message: e.to_string(),
    })?;

    let table: toml::Table = toml::from_str(text).map_err(|e| IncludeError::Parse {
        format: "toml",
        message: toml_error_message(text, &e),
    })?;

    table
        .into_iter()
        .map(|(key, value)| {
            let scalar = match value {
                Value::String(s) => Scalar::Text(s),
                Value::Integer(i) => Scalar::Integer(i),
                Value::Float(f) if f.is_finite() => Scalar::Number(f),
                Value::Float(f) => return Err(schema_error(key, format!("float {f}"))),
                Value::Boolean(b) => Scalar::Bool(b),
                Value::Datetime(dt) => Scalar::Text(dt.to_string()),
                Value::Array(_) => return Err(schema_error(key, "array".to_string())),
                Value::Table(_) => return Err(schema_error(key, "table".to_string())),
            };
            Ok((key, scalar))
        })
        .collect()
}

/// toml's Display output spans several lines; keep diagnostics to one.
fn toml_error_message(text: &str, err: &toml::de::Error) -> String {
    let message = err.message().trim_end().replace('\n', " ");
    match err.span() {
        Some(span) => {
            let before = &text.as_bytes()[..span.start.min(text.len())];
            let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
            format!("{message} at line {line}")
        }
        None => message,
    }
}

fn schema_error(key: String, found: String) -> IncludeError {
    IncludeError::Schema { key, found }
}
