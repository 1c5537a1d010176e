//! Label and value text helpers.

/// Decimals shown by float controls unless overridden.
pub const DEFAULT_PRECISION: usize = 3;

/// Suffix marking a shortened label.
pub const ELLIPSIS: &str = "...";

/// Shorten `label` to at most `max_len` characters.
///
/// The ellipsis is appended only when there is room for at least one
/// character of the original text before it.
pub fn truncate_label(label: &str, max_len: usize) -> String {
    let len = label.chars().count();
    if len <= max_len {
        return label.to_string();
    }

    let ellipsis_len = ELLIPSIS.chars().count();
    if max_len <= ellipsis_len {
        return label.chars().take(max_len).collect();
    }

    let mut out: String = label.chars().take(max_len - ellipsis_len).collect();
    out.push_str(ELLIPSIS);
    out
}
