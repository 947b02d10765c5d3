//! Upload file name handling

/// Repair a file name whose UTF-8 bytes were decoded as Latin-1.
///
/// Multipart parsers that assume Latin-1 turn `"报告.pdf"` into
/// `"æ\u{8a}¥å\u{91}\u{8a}.pdf"`. When every character fits in one byte, at
/// least one is outside ASCII, and those bytes form valid UTF-8, the decoded
/// text is returned. Any other input is returned unchanged.
pub fn repair_encoding(name: &str) -> String {
    if name.is_ascii() || name.chars().any(|c| (c as u32) > 0xFF) {
        return name.to_string();
    }

    let bytes: Vec<u8> = name.chars().map(|c| c as u32 as u8).collect();

    match String::from_utf8(bytes) {
        Ok(repaired) if repaired != name => repaired,
        _ => name.to_string(),
    }
}

/// Final path component of an uploaded name, or `None` when unusable as a
/// stored file name.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base.starts_with('.') || base.chars().any(char::is_control) {
        return None;
    }

    Some(base.to_string())
}

/// Extension including the leading dot, e.g. `".zip"`
pub fn file_ext(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.contains(['/', '\\']) {
        return None;
    }
    Some(format!(".{}", ext.to_ascii_lowercase()))
}
