//! Display-label conventions for presentation collaborators.

/// Turn a state or event name into a display label.
///
/// Underscores become spaces and the first character is uppercased. This is
/// a presentation convention, not engine logic; machine resolution always
/// works on the raw names.
///
/// # Example
///
/// ```rust
/// use statehood::present::humanize;
///
/// assert_eq!(humanize("open"), "Open");
/// assert_eq!(humanize("shipped_back"), "Shipped back");
/// ```
pub fn humanize(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}
