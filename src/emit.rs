//! Go source rendering.

use std::fmt::{self, Write as _};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::config::Config;
use crate::content::{ParsedContent, Scalar};
use crate::error::{IncludeError, Result};

pub const BANNER: &str = "// Code generated by go-include. DO NOT EDIT.";

/// One `const name = literal` line.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub literal: String,
}

impl Declaration {
    pub fn string(name: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            literal: go_string_literal(bytes),
        }
    }

    pub fn scalar(name: impl Into<String>, value: &Scalar) -> Self {
        let literal = match value {
            Scalar::Text(s) => go_string_literal(s.as_bytes()),
            Scalar::Number(f) => format!("{f:.6}"),
            Scalar::Integer(i) => i.to_string(),
            Scalar::Bool(b) => b.to_string(),
        };
        Self {
            name: name.into(),
            literal,
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "const {} = {}", self.name, self.literal)
    }
}

/// A complete generated file, ready to be written.
#[derive(Debug)]
pub struct GoFile {
    pub source: Option<String>,
    pub package: String,
    pub declarations: Vec<Declaration>,
}

impl GoFile {
    pub fn new(config: &Config, package: String, content: &ParsedContent) -> Self {
        Self {
            source: config.banner.then(|| config.source_name()),
            package,
            declarations: declarations(config, content),
        }
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if let Some(source) = &self.source {
            writeln!(out, "{BANNER}")?;
            writeln!(out, "// Source: {source}")?;
            writeln!(out)?;
        }
        writeln!(out, "package {}", self.package)?;
        writeln!(out)?;
        for declaration in &self.declarations {
            writeln!(out, "{declaration}")?;
        }
        Ok(())
    }

    /// Creates (or truncates) `path` and writes the file into it.
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .map_err(|e| IncludeError::io(format!("could not create file {}", path.display()), e))?;
        let mut out = BufWriter::new(file);
        self.write_to(&mut out)
            .and_then(|()| out.flush())
            .map_err(|e| IncludeError::io(format!("could not write file {}", path.display()), e))?;
        debug!(
            path = %path.display(),
            declarations = self.declarations.len(),
            "wrote generated file"
        );
        Ok(())
    }
}

pub fn declarations(config: &Config, content: &ParsedContent) -> Vec<Declaration> {
    match content {
        ParsedContent::Raw(bytes) => {
            let body = if config.trim {
                trim_newlines(bytes)
            } else {
                bytes
            };
            vec![Declaration::string(config.constant_name(), body)]
        }
        ParsedContent::Table(table) => table
            .iter()
            .map(|(key, value)| Declaration::scalar(key.as_str(), value))
            .collect(),
    }
}

/// Strips `\n` from both ends; `\r` and other whitespace are kept.
pub fn trim_newlines(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&b| b != b'\n')
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|&b| b != b'\n')
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Renders bytes as a Go string constant expression.
///
/// Text that a raw string can hold verbatim is emitted in backticks, with each
/// embedded backtick concatenated in as its own quoted literal. Invalid UTF-8, carriage returns
/// (which Go drops from raw strings), NUL and BOM fall back to an interpreted
/// literal: ASCII controls become `\xNN`, other control characters and the
/// BOM become `\uNNNN`, invalid bytes become `\xNN`.
pub fn go_string_literal(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) if fits_raw_string(text) => raw_string(text),
        _ => interpreted_string(bytes),
    }
}

fn fits_raw_string(text: &str) -> bool {
    !text.contains(['\r', '\0', '\u{feff}'])
}

fn raw_string(text: &str) -> String {
    text.split('`')
        .map(|part| format!("`{part}`"))
        .collect::<Vec<_>>()
        .join(" + \"`\" + ")
}

fn interpreted_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    for chunk in bytes.utf8_chunks() {
        for c in chunk.valid().chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_ascii_control() => {
                    let _ = write!(out, "\\x{:02x}", c as u32);
                }
                c if c.is_control() || c == '\u{feff}' => {
                    let _ = write!(out, "\\u{:04x}", c as u32);
                }
                c => out.push(c),
            }
        }
        for b in chunk.invalid() {
            let _ = write!(out, "\\x{b:02x}");
        }
    }
    out.push('"');
    out
}
