//! HTML-safe field names
//!
//! Form submission parsing rewrites literal dots in input names, which would
//! destroy `relation.column` names. Dots are therefore swapped for a reserved
//! separator before a name is used as an input `name` attribute, and swapped
//! back when reading the submission. The JSON arrow (`->`) survives transport
//! untouched and is left alone.

/// Reserved separator standing in for `.` in encoded names.
///
/// `~` is unreserved in form-urlencoding and never legal in a column or
/// relation identifier. Being a single character, its occurrences cannot
/// overlap, so decoding is the exact inverse of encoding.
pub const SEPARATOR: char = '~';

/// Replace every `.` with [`SEPARATOR`]
///
/// # Examples
///
/// ```
/// use regulate_forms::name_codec::encode;
///
/// assert_eq!(encode("author.name"), "author~name");
/// assert_eq!(encode("settings->theme"), "settings->theme");
/// assert_eq!(encode("title"), "title");
/// ```
pub fn encode(name: &str) -> String {
	name.replace('.', &SEPARATOR.to_string())
}

/// Replace every [`SEPARATOR`] with `.`
///
/// # Examples
///
/// ```
/// use regulate_forms::name_codec::{decode, encode};
///
/// assert_eq!(decode("author~name"), "author.name");
/// assert_eq!(decode(&encode("a.b->c.d")), "a.b->c.d");
/// ```
pub fn decode(encoded: &str) -> String {
	encoded.replace(SEPARATOR, ".")
}

/// Whether `name` contains the reserved separator and therefore cannot be encoded losslessly
pub fn contains_separator(name: &str) -> bool {
	name.contains(SEPARATOR)
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	#[rstest]
	#[case("title", "title")]
	#[case("author.name", "author~name")]
	#[case("meta->seo->title", "meta->seo->title")]
	#[case("author.profile->links.0", "author~profile->links~0")]
	fn test_encode(#[case] name: &str, #[case] expected: &str) {
		// Act
		let encoded = encode(name);

		// Assert
		assert_eq!(encoded, expected);
		assert_eq!(decode(&encoded), name);
	}

	#[rstest]
	fn test_plain_name_unchanged_both_ways() {
		// Act & Assert
		assert_eq!(encode("price"), "price");
		assert_eq!(decode("price"), "price");
	}

	#[rstest]
	fn test_contains_separator() {
		assert!(contains_separator("a~b"));
		assert!(!contains_separator("a.b"));
	}

	proptest! {
		#[test]
		fn prop_decode_inverts_encode(name in "[^~]{0,40}") {
			prop_assert_eq!(decode(&encode(&name)), name);
		}

		#[test]
		fn prop_encoded_name_has_no_dots(name in "[^~]{0,40}") {
			prop_assert!(!encode(&name).contains('.'));
		}
	}
}
