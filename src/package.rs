//! Working out which Go package the generated file belongs to.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{IncludeError, Result};

/// Used when the output directory holds no Go sources to ask.
pub const FALLBACK_PACKAGE: &str = "main";

static PACKAGE_CLAUSE: OnceLock<Regex> = OnceLock::new();

fn package_clause_regex() -> &'static Regex {
    PACKAGE_CLAUSE.get_or_init(|| {
        Regex::new(r"^package\s+([\p{L}_][\p{L}\p{Nd}_]*)").expect("package clause pattern is valid")
    })
}

pub fn resolve_package(config: &Config) -> Result<String> {
    if let Some(package) = &config.package {
        debug!(package = %package, "using package from command line");
        return Ok(package.trim().to_string());
    }

    find_package_name(config.output_dir(), config.output.file_name())
}

/// Reads the package clause of every non-test `.go` file in `dir`, skipping
/// names starting with `_` or `.`, `exclude` (the file about to be
/// overwritten) and files built only on `ignore`. All files must agree on one
/// name.
pub fn find_package_name(dir: &Path, exclude: Option<&OsStr>) -> Result<String> {
    let entries = fs::read_dir(dir)
        .map_err(|e| IncludeError::io(format!("could not read directory {}", dir.display()), e))?;

    let mut sources: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| IncludeError::io(format!("could not read directory {}", dir.display()), e))?;
        let path = entry.path();
        let file_name = entry.file_name();
        let is_go = path.extension().is_some_and(|ext| ext == "go");
        let name = file_name.to_string_lossy();
        let is_test = name.ends_with("_test.go");
        // the go tool ignores these too
        let is_hidden = name.starts_with('_') || name.starts_with('.');
        if !is_go || is_test || is_hidden || Some(file_name.as_os_str()) == exclude || !path.is_file() {
            continue;
        }
        sources.push(path);
    }
    sources.sort();

    let mut found: Option<(String, PathBuf)> = None;
    for path in sources {
        let bytes = fs::read(&path)
            .map_err(|e| IncludeError::io(format!("could not read file {}", path.display()), e))?;
        let source = String::from_utf8_lossy(&bytes);

        let Some(header) = parse_header(&source) else {
            return Err(IncludeError::Package(format!(
                "no package clause in {}",
                path.display()
            )));
        };
        if header.ignored {
            debug!(file = %path.display(), "skipping file with ignore build constraint");
            continue;
        }

        match found.as_ref() {
            Some((name, first_file)) => {
                if *name != header.package {
                    return Err(IncludeError::PackageConflict {
                        first: name.clone(),
                        first_file: first_file.clone(),
                        second: header.package,
                        second_file: path,
                    });
                }
            }
            None => found = Some((header.package, path)),
        }
    }

    match found {
        Some((name, file)) => {
            debug!(package = %name, file = %file.display(), "resolved package");
            Ok(name)
        }
        None => {
            info!(
                dir = %dir.display(),
                "no Go source files found, using package {FALLBACK_PACKAGE}"
            );
            Ok(FALLBACK_PACKAGE.to_string())
        }
    }
}

#[derive(Debug, PartialEq)]
struct SourceHeader {
    package: String,
    ignored: bool,
}

/// Skips leading comments and reads the package clause. Build constraint
/// lines among those comments mark the file ignored when they name `ignore`.
fn parse_header(source: &str) -> Option<SourceHeader> {
    let mut rest = source.trim_start_matches('\u{feff}');
    let mut ignored = false;

    loop {
        rest = rest.trim_start();
        if let Some(comment) = rest.strip_prefix("//") {
            let (line, tail) = comment.split_once('\n').unwrap_or((comment, ""));
            ignored |= constraint_ignores(line);
            rest = tail;
        } else if let Some(comment) = rest.strip_prefix("/*") {
            rest = comment.split_once("*/")?.1;
        } else {
            break;
        }
    }

    let captures = package_clause_regex().captures(rest)?;
    Some(SourceHeader {
        package: captures[1].to_string(),
        ignored,
    })
}

fn constraint_ignores(line: &str) -> bool {
    let line = line.trim();
    let Some(expr) = line
        .strip_prefix("go:build")
        .or_else(|| line.strip_prefix("+build"))
    else {
        return false;
    };
    expr.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '!'))
        .any(|term| term == "ignore")
}
