//! Review text normalization.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Everything outside lowercase ASCII letters and digits, the Spanish
/// accented vowels, ü and ñ, a small punctuation allow-list, and whitespace.
static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^a-z0-9áéíóúüñ¡!¿?.,:;'"()\s-]"#).unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalize raw review text for analysis and display.
///
/// Line breaks become spaces, the text is lowercased, disallowed characters
/// are dropped, whitespace runs collapse to one space, and the ends are
/// trimmed. Total and idempotent.
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let text = raw.replace(['\n', '\r'], " ").to_lowercase();
    let text = DISALLOWED_RE.replace_all(&text, "");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// Undo the "UTF-8 read as Latin-1" corruption (`CafÃ©` -> `Café`).
///
/// Returns the input unchanged when it holds characters outside Latin-1 or
/// when the re-encoded bytes are not valid UTF-8, so clean text is never
/// damaged.
pub fn repair_mojibake(s: &str) -> Cow<'_, str> {
    if s.is_ascii() {
        return Cow::Borrowed(s);
    }

    let mut bytes = Vec::with_capacity(s.len());
    for c in s.chars() {
        match u8::try_from(u32::from(c)) {
            Ok(b) => bytes.push(b),
            Err(_) => return Cow::Borrowed(s),
        }
    }

    match String::from_utf8(bytes) {
        Ok(fixed) => Cow::Owned(fixed),
        Err(_) => Cow::Borrowed(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_symbols() {
        assert_eq!(
            normalize("¡EXCELENTE servicio!!! 😀 #1 @Café"),
            "¡excelente servicio!!! 1 café"
        );
    }

    #[test]
    fn keeps_spanish_letters_and_allowed_punctuation() {
        let text = "Ñandú, pingüino: ¿qué tal? (muy bien) - 'sí' \"no\";";
        assert_eq!(
            normalize(text),
            "ñandú, pingüino: ¿qué tal? (muy bien) - 'sí' \"no\";"
        );
    }

    #[test]
    fn line_breaks_become_single_spaces() {
        assert_eq!(normalize("buena\r\ncomida\n\n  rica"), "buena comida rica");
    }

    #[test]
    fn whitespace_only_input_is_empty() {
        for raw in ["", " ", "\n", "\r\n", "\t \n \r  ", "\u{a0}\n"] {
            assert_eq!(normalize(raw), "", "input {raw:?}");
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "Hola MUNDO\n¿Cómo estás?",
            "  Ñoño   ÜBER  \t café ",
            "Price: $20 -- worth it!!!",
            "İstanbul ǅ ß ΣΑΣ",
            "emoji 🍕🍕 only",
            "",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn repairs_double_encoded_text() {
        assert_eq!(repair_mojibake("CafÃ© MaÃ±ana"), "Café Mañana");
    }

    #[test]
    fn leaves_clean_text_alone() {
        assert!(matches!(repair_mojibake("Café"), Cow::Borrowed("Café")));
        assert!(matches!(repair_mojibake("plain"), Cow::Borrowed("plain")));
        assert!(matches!(repair_mojibake("precio €5"), Cow::Borrowed(_)));
    }
}
