use std::cmp::Ordering;

/// One ranked candidate: `index` points back into the candidate slice passed to
/// [`rank`], so callers can re-associate scores with their records.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedCandidate {
	pub index: usize,
	pub score: f32,
}

/// Cosine similarity in [-1, 1]. Zero-norm or mismatched-length inputs score 0.0
/// rather than NaN so downstream ordering stays total.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
	if a.len() != b.len() {
		return 0.0;
	}

	let mut dot = 0.0_f32;
	let mut norm_a = 0.0_f32;
	let mut norm_b = 0.0_f32;

	for (x, y) in a.iter().zip(b) {
		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	if norm_a == 0.0 || norm_b == 0.0 {
		return 0.0;
	}

	dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Scores every candidate against the query vector, orders by score descending with
/// ties broken by original candidate index, drops scores strictly below
/// `min_similarity`, and truncates to `limit`. An empty result is a valid outcome.
pub fn rank(
	query: &[f32],
	candidates: &[Vec<f32>],
	min_similarity: Option<f32>,
	limit: usize,
) -> Vec<RankedCandidate> {
	let mut ranked: Vec<RankedCandidate> = candidates
		.iter()
		.enumerate()
		.map(|(index, vector)| RankedCandidate { index, score: cosine_similarity(query, vector) })
		.collect();

	ranked.sort_by(|a, b| {
		b.score
			.partial_cmp(&a.score)
			.unwrap_or(Ordering::Equal)
			.then_with(|| a.index.cmp(&b.index))
	});

	if let Some(min) = min_similarity {
		ranked.retain(|candidate| candidate.score >= min);
	}

	ranked.truncate(limit);

	ranked
}
