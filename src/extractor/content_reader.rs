use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// Result of reading one source file for the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Utf8(String),
    /// The bytes were not valid UTF-8 and were decoded as ISO-8859-1.
    Latin1(String),
    /// The file could not be read; holds the error description.
    Failed(String),
}

pub fn read_source(path: &Path) -> ReadOutcome {
    match fs::read(path) {
        Ok(bytes) => decode(&bytes),
        Err(err) => ReadOutcome::Failed(err.to_string()),
    }
}

/// Decodes as UTF-8 (a BOM is kept as content), falling back to Latin-1,
/// which maps every byte and therefore cannot fail.
pub fn decode(bytes: &[u8]) -> ReadOutcome {
    match encoding_rs::UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => ReadOutcome::Utf8(normalize_newlines(text)),
        None => ReadOutcome::Latin1(normalize_newlines(encoding_rs::mem::decode_latin1(bytes))),
    }
}

/// Converts `\r\n` and lone `\r` to `\n`.
pub fn normalize_newlines(text: Cow<'_, str>) -> String {
    if !text.contains('\r') {
        return text.into_owned();
    }

    let mut normalized = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            normalized.push('\n');
        } else {
            normalized.push(c);
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_utf8_content() {
        let outcome = decode("const saludo = \"¡hola!\";".as_bytes());
        assert_eq!(outcome, ReadOutcome::Utf8("const saludo = \"¡hola!\";".to_string()));
    }

    #[test]
    fn test_latin1_fallback() {
        // "café" encoded as ISO-8859-1 is not valid UTF-8.
        let bytes = [b'c', b'a', b'f', 0xE9];
        let outcome = decode(&bytes);
        assert_eq!(outcome, ReadOutcome::Latin1("café".to_string()));
    }

    #[test]
    fn test_latin1_maps_c1_range_directly() {
        let outcome = decode(&[0x80, 0xFF]);
        assert_eq!(outcome, ReadOutcome::Latin1("\u{80}\u{FF}".to_string()));
    }

    #[test]
    fn test_newline_normalization() {
        assert_eq!(normalize_newlines(Cow::Borrowed("a\r\nb\rc\n")), "a\nb\nc\n");
        assert_eq!(normalize_newlines(Cow::Borrowed("plain\n")), "plain\n");

        let outcome = decode(b"line1\r\nline2");
        assert_eq!(outcome, ReadOutcome::Utf8("line1\nline2".to_string()));
    }

    #[test]
    fn test_read_source_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.ts");
        std::fs::write(&path, "export {};").unwrap();

        assert_eq!(read_source(&path), ReadOutcome::Utf8("export {};".to_string()));
    }

    #[test]
    fn test_unreadable_file() {
        let temp_dir = TempDir::new().unwrap();
        let outcome = read_source(&temp_dir.path().join("gone.ts"));
        assert!(matches!(outcome, ReadOutcome::Failed(_)));
    }
}
