use unicode_normalization::UnicodeNormalization;

/// Canonical form used for all keyword matching and embedding input: NFKC, then
/// lowercased. Hangul is unaffected by lowercasing; mixed Latin fragments (complex
/// names, station suffixes) become case-insensitive.
pub fn canonicalize(text: &str) -> String {
	text.nfkc().collect::<String>().to_lowercase()
}
