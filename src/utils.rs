// src/utils.rs

/// URL-safe anchor for a section title: lower-case, each whitespace run becomes one `-`.
/// Nothing else is altered, leading and trailing runs included.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_whitespace = false;

    for c in text.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.push(c);
            in_whitespace = false;
        }
    }

    slug
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Download-safe file stem: keeps letters (any script), digits, `-` and `_`
pub fn sanitize_filename(input: &str) -> String {
    let sanitized: String = input
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    if sanitized.is_empty() {
        "CV".to_string()
    } else {
        sanitized
    }
}

/// Text after the last `:` of a `key : value` item, trimmed
pub fn value_after_colon(item: &str) -> &str {
    item.rsplit(':').next().unwrap_or(item).trim()
}
