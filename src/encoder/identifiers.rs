//! Identifier encoding for raw strings: string constants and method signatures.
//!
//! Values at or under the threshold are their own id. Longer values become a
//! hash tag. Distinct long values whose hashes collide share one id; that
//! conflation is accepted, and the hash is the JVM `String.hashCode` so ids
//! agree with consumers built against the JVM encoder.

use std::borrow::Cow;

use super::FactWriter;
use crate::facts::{Database, PredicateFile};

const STRING_HASH_TAG: &str = "HASH";
const SIGNATURE_HASH_TAG: &str = "METHOD HASH";

/// `String.hashCode` из JVM: по UTF-16 единицам, с переполнением i32
pub fn java_string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Длина в UTF-16 единицах (как `String.length()`)
fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

fn hash_if_long(raw: &str, threshold: usize, tag: &str) -> String {
    if utf16_len(raw) <= threshold {
        raw.to_string()
    } else {
        format!("<<{}:{}>>", tag, java_string_hash(raw))
    }
}

/// Оборачивает пустые строки и строки с пробелами по краям
pub fn quote_if_padded(constant: &str) -> Cow<'_, str> {
    if !constant.is_empty() && constant.trim() == constant {
        Cow::Borrowed(constant)
    } else {
        Cow::Owned(format!("<<\"{constant}\">>"))
    }
}

impl<D: Database> FactWriter<D> {
    /// Кодирует строковую константу.
    ///
    /// Always records `STRING_RAW(id, raw)` and `STRING_CONST(id)`, even
    /// when the id is the raw value itself.
    pub fn encode_string_constant(&self, constant: &str) -> String {
        let raw = if self.config.quote_padded_strings {
            quote_if_padded(constant)
        } else {
            Cow::Borrowed(constant)
        };

        let result = hash_if_long(&raw, self.config.string_hash_threshold, STRING_HASH_TAG);
        self.add(PredicateFile::StringRaw, &[&result, &raw]);
        self.add(PredicateFile::StringConst, &[&result]);
        result
    }

    /// Кодирует сигнатуру метода; записывает только `STRING_RAW`
    pub fn encode_signature(&self, raw: &str) -> String {
        let result = self.signature_id(raw);
        self.add(PredicateFile::StringRaw, &[&result, raw]);
        result
    }

    /// Идентификатор сигнатуры без записи фактов
    pub fn signature_id(&self, raw: &str) -> String {
        hash_if_long(raw, self.config.signature_hash_threshold, SIGNATURE_HASH_TAG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::EncoderConfig;
    use crate::facts::MemoryDatabase;
    use pretty_assertions::assert_eq;

    fn writer() -> FactWriter<MemoryDatabase> {
        FactWriter::new(MemoryDatabase::new())
    }

    #[test]
    fn test_java_string_hash() {
        assert_eq!(java_string_hash(""), 0);
        assert_eq!(java_string_hash("a"), 97);
        assert_eq!(java_string_hash("hello"), 99162322);
        // переполнение i32
        assert_eq!(java_string_hash("polygenelubricants"), i32::MIN);
        // суррогатная пара считается как две единицы
        assert_eq!(java_string_hash("😀"), 1772899);
    }

    #[test]
    fn test_short_string_is_its_own_id() {
        let w = writer();
        let s = "x".repeat(256);
        assert_eq!(w.encode_string_constant(&s), s);
        assert!(w.database().contains(PredicateFile::StringRaw, &[&s, &s]));
        assert!(w.database().contains(PredicateFile::StringConst, &[&s]));
    }

    #[test]
    fn test_long_string_is_hashed_with_raw_mapping() {
        let w = writer();
        let s = "y".repeat(257);
        let id = w.encode_string_constant(&s);

        assert_eq!(id, format!("<<HASH:{}>>", java_string_hash(&s)));
        assert!(w.database().contains(PredicateFile::StringRaw, &[&id, &s]));
        assert!(w.database().contains(PredicateFile::StringConst, &[&id]));
    }

    #[test]
    fn test_threshold_counts_utf16_units() {
        let w = writer();
        // 128 символов вне BMP = 256 единиц UTF-16
        let s = "😀".repeat(128);
        assert_eq!(w.encode_string_constant(&s), s);
        let longer = "😀".repeat(129);
        assert!(w.encode_string_constant(&longer).starts_with("<<HASH:"));
    }

    #[test]
    fn test_encoding_is_idempotent() {
        let w = writer();
        let long = "z".repeat(1000);
        assert_eq!(w.encode_string_constant(&long), w.encode_string_constant(&long));
        assert_eq!(w.encode_string_constant("ab"), w.encode_string_constant("ab"));
        assert_eq!(w.database().count(PredicateFile::StringConst), 2);
    }

    #[test]
    fn test_colliding_long_strings_share_an_id() {
        // "Aa" и "BB" имеют одинаковый хэш, поэтому и их повторения тоже
        let w = writer();
        let a = "Aa".repeat(200);
        let b = format!("BB{}", "Aa".repeat(199));
        assert_ne!(a, b);

        let id_a = w.encode_string_constant(&a);
        let id_b = w.encode_string_constant(&b);
        assert_eq!(id_a, id_b);
        assert_eq!(w.database().lookup(PredicateFile::StringRaw, &id_a).len(), 2);
    }

    #[test]
    fn test_signature_threshold_and_tag() {
        let w = writer();
        let short = format!("<A: void {}()>", "m".repeat(1000));
        assert_eq!(w.encode_signature(&short), short);

        let long = format!("<A: void {}()>", "m".repeat(1100));
        let id = w.encode_signature(&long);
        assert_eq!(id, format!("<<METHOD HASH:{}>>", java_string_hash(&long)));
        assert!(w.database().contains(PredicateFile::StringRaw, &[&id, &long]));
        assert_eq!(w.database().count(PredicateFile::StringConst), 0);
    }

    #[test]
    fn test_quote_padded_strings() {
        assert_eq!(quote_if_padded("abc"), "abc");
        assert_eq!(quote_if_padded(""), "<<\"\">>");
        assert_eq!(quote_if_padded(" a"), "<<\" a\">>");

        let config = EncoderConfig {
            quote_padded_strings: true,
            ..EncoderConfig::default()
        };
        let w = FactWriter::with_config(MemoryDatabase::new(), config);
        assert_eq!(w.encode_string_constant("a "), "<<\"a \">>");
        assert_eq!(w.encode_string_constant("a"), "a");
    }
}
