//! Deterministic model label derivation.

/// Model labels a log entry can carry, indexed by the key's trailing digits.
pub const MODEL_NAMES: [&str; 5] = ["GPT-4", "GPT-3.5", "DALL-E", "Whisper", "Validation"];

/// Returns the index into [`MODEL_NAMES`] for a key.
///
/// The last two characters of the key are parsed as an unsigned integer and
/// reduced modulo the table size. Keys whose tail does not parse fall back to
/// index zero.
#[must_use]
pub fn model_index(key: &str) -> usize {
    let skip = key.chars().count().saturating_sub(2);
    let tail: String = key.chars().skip(skip).collect();

    tail.parse::<u32>()
        .map(|value| value as usize % MODEL_NAMES.len())
        .unwrap_or(0)
}

/// Returns the model label for a key.
#[must_use]
pub fn derive_model(key: &str) -> &'static str {
    MODEL_NAMES[model_index(key)]
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{MODEL_NAMES, derive_model, model_index};

    #[test]
    fn trailing_02_selects_index_two() {
        assert_eq!(model_index("1234567891002"), 2);
        assert_eq!(derive_model("1234567891002"), "DALL-E");
    }

    #[test]
    fn boundary_indices_map_to_table_ends() {
        assert_eq!(derive_model("1234567891000"), MODEL_NAMES[0]);
        assert_eq!(
            derive_model("1234567891004"),
            MODEL_NAMES[MODEL_NAMES.len() - 1]
        );
        assert_eq!(model_index("1234567891099"), 99 % MODEL_NAMES.len());
    }

    #[test]
    fn unparsable_tail_falls_back_to_first_model() {
        assert_eq!(derive_model("12345678910ab"), MODEL_NAMES[0]);
        assert_eq!(derive_model(""), MODEL_NAMES[0]);
        assert_eq!(derive_model("-5"), MODEL_NAMES[0]);
    }

    #[test]
    fn single_character_key_uses_that_character() {
        assert_eq!(model_index("3"), 3);
    }

    proptest! {
        #[test]
        fn index_is_always_in_range(key in ".{0,20}") {
            prop_assert!(model_index(&key) < MODEL_NAMES.len());
        }

        #[test]
        fn two_digit_tail_reduces_modulo_table_size(prefix in "[0-9]{11}", tail in 0_u32..100) {
            let key = format!("{prefix}{tail:02}");
            prop_assert_eq!(model_index(&key), tail as usize % MODEL_NAMES.len());
        }
    }
}
