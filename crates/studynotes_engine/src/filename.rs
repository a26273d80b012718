/// Local filename for a downloaded artifact: the last path segment of its URL,
/// stripped of characters that are unsafe on common filesystems.
pub fn artifact_filename(url: &url::Url) -> String {
    let last = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    let decoded = percent_decode(last);
    sanitize(&decoded)
}

fn percent_decode(segment: &str) -> String {
    percent_encoding::percent_decode_str(segment)
        .decode_utf8_lossy()
        .into_owned()
}

fn sanitize(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let mut cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        cleaned = "artifact".to_string();
    }
    if cleaned.len() > 120 {
        let mut end = 120;
        while !cleaned.is_char_boundary(end) {
            end -= 1;
        }
        cleaned.truncate(end);
    }
    if is_reserved_windows_name(&cleaned) {
        cleaned.push('_');
    }
    cleaned
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::artifact_filename;
    use url::Url;

    fn name(raw: &str) -> String {
        artifact_filename(&Url::parse(raw).unwrap())
    }

    #[test]
    fn takes_last_path_segment() {
        assert_eq!(name("http://host/api/download/notes_1.tex"), "notes_1.tex");
    }

    #[test]
    fn decodes_and_sanitizes() {
        assert_eq!(name("http://host/api/download/a%3Ab%20c.pdf"), "a_b c.pdf");
        assert_eq!(name("http://host/api/download/%2E%2E"), "artifact");
    }

    #[test]
    fn empty_segment_falls_back() {
        assert_eq!(name("http://host/api/download/"), "artifact");
    }

    #[test]
    fn reserved_windows_names_are_suffixed() {
        assert_eq!(name("http://host/CON"), "CON_");
    }
}
