//! Embedded text shown by `go-include --help`

/// Worked examples and exit status table appended to the long help
pub const USAGE_EXAMPLES: &str = include_str!("assets/usage.txt");
