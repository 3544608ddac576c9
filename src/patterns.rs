use std::sync::OnceLock;

use regex::Regex;

/// Compile `source` once into `cell`. Only used with literal patterns.
pub(crate) fn compiled(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("static pattern compiles"))
}
