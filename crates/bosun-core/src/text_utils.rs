/// Collapses whitespace runs and truncates to `max_chars`, appending an
/// ellipsis when content was cut. Used for diagnostic dumps of tracked
/// invocation content.
pub fn preview_text(raw: &str, max_chars: usize) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let mut preview = collapsed.chars().take(max_chars).collect::<String>();
    preview.push('…');
    preview
}
