//! Properties file steps
//!
//! Reads and edits over Java-style `.properties` files: `key=value`
//! lines, `#`/`!` comments, everything else passed through untouched.
//! Edits preserve the file's existing line order and comments.

mod property_exists;
mod read_property;
mod remove_property;
mod set_property;

pub use property_exists::PropertyExists;
pub use read_property::ReadProperty;
pub use remove_property::RemoveProperty;
pub use set_property::SetProperty;

/// Split a properties line into key and value, if it is a pair line
pub(crate) fn parse_pair(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
        return None;
    }
    let (key, value) = trimmed.split_once('=')?;
    Some((key.trim(), value.trim()))
}

/// Find the value of a key within file content
pub(crate) fn lookup<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    content
        .lines()
        .filter_map(parse_pair)
        .find(|(k, _)| *k == key)
        .map(|(_, value)| value)
}
