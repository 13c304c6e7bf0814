//! String utility functions.

/// Escapes HTML special characters in a string.
///
/// Replaces `&`, `<`, `>`, `"`, and `'` with their HTML entity equivalents.
///
/// # Examples
///
/// ```
/// use paperwork_core::utils::text::escape_html;
///
/// assert_eq!(escape_html(r#"<b>"Q&A"</b>"#), "&lt;b&gt;&quot;Q&amp;A&quot;&lt;/b&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Removes every whitespace character from a string.
///
/// This is how user-entered column labels become registry keys.
///
/// # Examples
///
/// ```
/// use paperwork_core::utils::text::strip_whitespace;
///
/// assert_eq!(strip_whitespace(" Cost Center "), "CostCenter");
/// assert_eq!(strip_whitespace("Region\t"), "Region");
/// ```
pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Converts a camelCase or snake_case key into a human-readable label.
///
/// # Examples
///
/// ```
/// use paperwork_core::utils::text::humanize_key;
///
/// assert_eq!(humanize_key("employeeName"), "Employee name");
/// assert_eq!(humanize_key("cost_center"), "Cost center");
/// ```
pub fn humanize_key(key: &str) -> String {
    let mut words = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c == '_' || c == '-' {
            words.push(' ');
        } else if c.is_uppercase() && i > 0 {
            words.push(' ');
            words.extend(c.to_lowercase());
        } else {
            words.push(c);
        }
    }
    capfirst(words.trim())
}

/// Capitalizes the first character of a string.
pub fn capfirst(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}
