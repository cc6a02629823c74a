//! File name sanitization for record names

/// Longest file stem produced, in bytes
const MAX_STEM_BYTES: usize = 200;

/// Characters that are unsafe in a file name on at least one common filesystem
const RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Turns free text into a file stem that is safe to write on common filesystems
///
/// Reserved and control characters become `_`, surrounding dots and whitespace
/// are dropped, and the result is cut to at most 200 bytes on a character
/// boundary. Returns `None` when nothing usable remains.
pub fn sanitize_file_stem(name: &str) -> Option<String> {
    let replaced: String = name
        .chars()
        .map(|ch| {
            if RESERVED.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect();

    let trimmed = replaced.trim_matches(|ch: char| ch == '.' || ch.is_whitespace());

    let mut end = trimmed.len().min(MAX_STEM_BYTES);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    let stem = trimmed[..end].trim_end_matches(|ch: char| ch == '.' || ch.is_whitespace());

    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}
