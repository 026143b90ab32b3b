//! Slug derivation for course URLs.

/// Derive a URL slug from a title: lowercase, with every run of
/// non-alphanumeric characters collapsed to a single hyphen.
///
/// Uniqueness is not checked here; the `uq_courses_slug` constraint is the
/// arbiter.
///
/// # Examples
///
/// ```
/// use stepwise_core::naming::slugify;
///
/// assert_eq!(slugify("Intro to Rust"), "intro-to-rust");
/// assert_eq!(slugify("C++ & Beyond!"), "c-beyond");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
