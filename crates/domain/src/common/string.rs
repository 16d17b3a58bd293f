//! String conversion utilities.

/// Name given to records created without one.
pub const DEFAULT_CHARACTER_NAME: &str = "New Character";

/// Converts a blank string to `None`, otherwise returns the trimmed value.
///
/// # Examples
///
/// ```
/// use sheetkeep_domain::common::none_if_blank;
///
/// assert_eq!(none_if_blank(" Rogue "), Some("Rogue"));
/// assert_eq!(none_if_blank(""), None);
/// assert_eq!(none_if_blank("   "), None);
/// ```
pub fn none_if_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Returns the given name, or [`DEFAULT_CHARACTER_NAME`] when it is blank.
///
/// # Examples
///
/// ```
/// use sheetkeep_domain::common::or_default_name;
///
/// assert_eq!(or_default_name("Vex"), "Vex");
/// assert_eq!(or_default_name("  "), "New Character");
/// ```
pub fn or_default_name(name: &str) -> String {
    match none_if_blank(name) {
        Some(_) => name.to_string(),
        None => DEFAULT_CHARACTER_NAME.to_string(),
    }
}
