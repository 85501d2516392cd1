use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, CommandFactory, Parser, ValueEnum};

use crate::assets;

pub const DEFAULT_OUTPUT: &str = "generated_include.go";

/// How the input file is turned into declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ParseMode {
    /// Embed the whole file as one string constant
    Raw,
    /// Emit one constant per key of a flat JSON object
    Json,
    /// Emit one constant per key of a flat TOML table
    Toml,
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParseMode::Raw => "raw",
            ParseMode::Json => "json",
            ParseMode::Toml => "toml",
        };
        f.write_str(name)
    }
}

#[derive(Parser, Debug)]
#[command(name = "go-include", version)]
#[command(about = "Embed a file into Go source as constant declarations")]
#[command(after_long_help = assets::USAGE_EXAMPLES)]
pub struct Cli {
    /// File to embed
    #[arg(long, visible_alias = "path", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Constant name; defaults to the input file name without its extension (raw mode)
    #[arg(long, visible_alias = "key", value_name = "IDENT")]
    pub name: Option<String>,

    /// Go file to write
    #[arg(long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    pub out: PathBuf,

    /// How to parse the input file
    #[arg(long, visible_alias = "type", value_enum, default_value_t = ParseMode::Raw)]
    pub parse: ParseMode,

    /// Strip leading and trailing newlines (raw mode)
    #[arg(
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "true",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub trim: bool,

    /// Package name for the generated file; resolved from the output directory when omitted
    #[arg(long, value_name = "IDENT")]
    pub package: Option<String>,

    /// Leave out the "Code generated" banner
    #[arg(long)]
    pub no_banner: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Rewrites single-dash long options (`-file x`, `-trim=false`) into their
/// double-dash form. A token in value position (after an option that takes a
/// value) and anything after a bare `--` are passed through untouched.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    // long name -> whether the option consumes the following token
    let command = Cli::command();
    let mut longs: HashMap<String, bool> = HashMap::new();
    for arg in command.get_arguments() {
        let takes_value = arg.get_action().takes_values()
            && arg.get_num_args().map_or(true, |range| range.min_values() > 0);
        for name in arg.get_long_and_visible_aliases().into_iter().flatten() {
            longs.insert(name.to_string(), takes_value);
        }
    }
    longs.insert("help".to_string(), false);
    longs.insert("version".to_string(), false);

    let mut passthrough = false;
    let mut value_next = false;
    args.into_iter()
        .enumerate()
        .map(|(index, arg)| {
            if index == 0 || passthrough {
                return arg;
            }
            if std::mem::take(&mut value_next) {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }

            let (body, single_dash) = match text.strip_prefix("--") {
                Some(body) => (body, false),
                None => match text.strip_prefix('-') {
                    Some(body) => (body, true),
                    None => return arg,
                },
            };
            let (name, inline_value) = match body.split_once('=') {
                Some((name, _)) => (name, true),
                None => (body, false),
            };
            let Some(&takes_value) = longs.get(name) else {
                return arg;
            };
            value_next = takes_value && !inline_value;

            if single_dash && name.len() > 1 {
                OsString::from(format!("-{text}"))
            } else {
                arg
            }
        })
        .collect()
}
