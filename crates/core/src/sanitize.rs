/// Replaces characters that are invalid on common filesystems, trims
/// surrounding spaces and dots, and collapses whitespace runs.
pub fn sanitize_filename(value: &str) -> String {
    let replaced: String = value
        .chars()
        .map(|ch| if is_disallowed_char(ch) { '_' } else { ch })
        .collect();

    replaced
        .trim_matches([' ', '.'])
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_disallowed_char(ch: char) -> bool {
    matches!(ch, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
}
