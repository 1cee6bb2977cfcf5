//! HTML helpers used by rendered values

/// Escape HTML special characters
///
/// # Examples
///
/// ```
/// use regulate_core::html::escape;
///
/// assert_eq!(escape("Hello, World!"), "Hello, World!");
/// assert_eq!(escape("<script>alert('XSS')</script>"),
///            "&lt;script&gt;alert(&#x27;XSS&#x27;)&lt;/script&gt;");
/// assert_eq!(escape("5 < 10 & 10 > 5"), "5 &lt; 10 &amp; 10 &gt; 5");
/// ```
pub fn escape(text: &str) -> String {
	let mut result = String::with_capacity(text.len() + 10);
	for ch in text.chars() {
		match ch {
			'&' => result.push_str("&amp;"),
			'<' => result.push_str("&lt;"),
			'>' => result.push_str("&gt;"),
			'"' => result.push_str("&quot;"),
			'\'' => result.push_str("&#x27;"),
			_ => result.push(ch),
		}
	}
	result
}

/// Truncate `text` to at most `max_chars` characters, appending `ellipsis`
/// when anything was cut.
///
/// Counts characters, not bytes.
///
/// # Examples
///
/// ```
/// use regulate_core::html::truncate_chars;
///
/// assert_eq!(truncate_chars("Hello world", 5, "..."), "Hello...");
/// assert_eq!(truncate_chars("Hello", 5, "..."), "Hello");
/// ```
pub fn truncate_chars(text: &str, max_chars: usize, ellipsis: &str) -> String {
	match text.char_indices().nth(max_chars) {
		Some((byte_index, _)) => format!("{}{}", &text[..byte_index], ellipsis),
		None => text.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("こんにちは世界", 5, "こんにちは…")]
	#[case("", 3, "")]
	#[case("abc", 0, "…")]
	fn test_truncate_counts_characters(
		#[case] text: &str,
		#[case] max: usize,
		#[case] expected: &str,
	) {
		// Act
		let truncated = truncate_chars(text, max, "…");

		// Assert
		assert_eq!(truncated, expected);
	}
}
