//! Canonical hashing of note sequences and compiled output.
//!
//! Input hashes are computed over a canonical JSON rendering (sorted keys, no
//! whitespace) so that formatting differences in the source file do not change
//! the hash:
//!
//! ```text
//! input_hash = hex(BLAKE3(canonical(sequence_json)))
//! ```

use crate::error::SpecError;
use crate::note::NoteSequence;

/// Computes the canonical BLAKE3 hash of a note sequence.
///
/// # Example
/// ```
/// use notecircuit_spec::{Note, NoteSequence};
/// use notecircuit_spec::hash::canonical_sequence_hash;
///
/// let seq = NoteSequence::new(vec![Note::new(0, 20, 12)]);
/// let hash = canonical_sequence_hash(&seq).unwrap();
/// assert_eq!(hash.len(), 64);
/// ```
pub fn canonical_sequence_hash(sequence: &NoteSequence) -> Result<String, SpecError> {
    let value = serde_json::to_value(sequence)?;
    Ok(canonical_value_hash(&value))
}

/// Computes the canonical BLAKE3 hash of a JSON value.
pub fn canonical_value_hash(value: &serde_json::Value) -> String {
    blake3_hash_str(&canonicalize_json(value))
}

/// Renders a JSON value with lexicographically sorted keys and no whitespace.
pub fn canonicalize_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => format_number(n),
        serde_json::Value::String(s) => format_string(s),
        serde_json::Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(canonicalize_json).collect();
            format!("[{}]", items.join(","))
        }
        serde_json::Value::Object(obj) => {
            let mut entries: Vec<(&String, &serde_json::Value)> = obj.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            let pairs: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{}:{}", format_string(k), canonicalize_json(v)))
                .collect();
            format!("{{{}}}", pairs.join(","))
        }
    }
}

fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", f as i64)
            } else {
                format!("{}", f)
            }
        }
        _ => "null".to_string(),
    }
}

fn format_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c < '\x20' => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

/// Computes a BLAKE3 hash of arbitrary data as lowercase hex.
pub fn blake3_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Computes a BLAKE3 hash of a string as lowercase hex.
pub fn blake3_hash_str(s: &str) -> String {
    blake3_hash(s.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Note;
    use serde_json::json;

    #[test]
    fn test_sequence_hash_stable() {
        let seq = NoteSequence::new(vec![Note::new(0, 20, 12), Note::new(40, 10, 3)]);
        let hash1 = canonical_sequence_hash(&seq).unwrap();
        let hash2 = canonical_sequence_hash(&seq).unwrap();
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_sequence_hash_ignores_formatting() {
        let compact = r#"{"notes":[{"start_tick":0,"duration_tick":20,"pitch_class":12}]}"#;
        let spaced = r#"{
            "notes": [ { "pitch_class": 12, "duration_tick": 20, "start_tick": 0 } ]
        }"#;
        let a = canonical_sequence_hash(&NoteSequence::from_json(compact).unwrap()).unwrap();
        let b = canonical_sequence_hash(&NoteSequence::from_json(spaced).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sequence_hash_sensitive_to_order() {
        let a = NoteSequence::new(vec![Note::new(0, 20, 1), Note::new(0, 20, 2)]);
        let b = NoteSequence::new(vec![Note::new(0, 20, 2), Note::new(0, 20, 1)]);
        assert_ne!(
            canonical_sequence_hash(&a).unwrap(),
            canonical_sequence_hash(&b).unwrap()
        );
    }

    #[test]
    fn test_canonicalize_sorts_keys() {
        let value = json!({"b": 1, "a": [true, null, "x\n"], "c": 1.5});
        assert_eq!(
            canonicalize_json(&value),
            r#"{"a":[true,null,"x\n"],"b":1,"c":1.5}"#
        );
    }

    #[test]
    fn test_canonicalize_integer_like_float() {
        assert_eq!(canonicalize_json(&json!(3.0)), "3");
    }
}
