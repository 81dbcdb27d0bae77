/// Collapses every whitespace run to one space and trims both ends.
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-collapsed prefix of at most `max_chars` characters, or `None` when nothing is left.
pub fn preview(input: &str, max_chars: usize) -> Option<String> {
    let collapsed = collapse_whitespace(input);
    let truncated: String = collapsed.chars().take(max_chars).collect();
    let truncated = truncated.trim_end().to_string();
    if truncated.is_empty() {
        None
    } else {
        Some(truncated)
    }
}

/// Trims a text value and drops it when empty.
pub fn non_empty(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_collapses_and_truncates_on_char_boundaries() {
        assert_eq!(preview("  héllo \n\t wörld  ", 7), Some("héllo w".to_string()));
        assert_eq!(preview("a b", 2), Some("a".to_string()));
        assert_eq!(preview(" \n ", 10), None);
    }
}
