//! Tenant system-name derivation.
//!
//! A tenant's system name is the key of its actor and the value carried in
//! `tenants` claims and the tenant header. It is derived from the display name
//! by the caller, before the Tenant actor is ever addressed.

/// Derives the lower-kebab-case system name of a display name.
///
/// 1. Trim surrounding whitespace.
/// 2. Replace every character that is not an ASCII letter, digit or whitespace
///    with a space.
/// 3. Split on whitespace runs, dropping empty segments.
/// 4. Join with `-` and lowercase.
///
/// ```
/// use tenancy_core::naming::to_kebab_case;
///
/// assert_eq!(to_kebab_case("Special@#$%Characters"), "special-characters");
/// assert_eq!(to_kebab_case("  Spaces  "), "spaces");
/// assert_eq!(to_kebab_case("!!!"), "");
/// ```
pub fn to_kebab_case(display_name: &str) -> String {
    let cleaned: String = display_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_ascii_lowercase()
}
