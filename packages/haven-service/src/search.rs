use std::time::Duration;

use tokio::time;

use crate::{Error, HavenService, ServiceResult};
use haven_domain::{
	analyzer::{self, KeywordMatches},
	filter::{self, FilterPredicate},
	ranker,
};
use haven_index::{
	models::HousingRecord,
	qdrant::{self, HousingStore},
};

/// Display precision for scores; the stored score is never rounded.
const DISPLAY_DECIMALS: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
	/// Unrestricted vector search; any predicate is ignored.
	Plain,
	/// Hard filter from the predicate, vector ranking within the filtered set.
	Hybrid,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchRequest {
	pub query: String,
	pub mode: SearchMode,
	/// Explicit filter parameters. When present they take precedence over whatever the
	/// analyzer extracts, with the same theme-before-location priority.
	pub district: Option<String>,
	pub dong: Option<String>,
	pub theme: Option<String>,
	pub min_similarity: Option<f32>,
	pub limit: Option<u32>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchItem {
	/// 1-based, dense, no gaps.
	pub rank: u32,
	pub score: f32,
	pub display_score: f32,
	pub record: HousingRecord,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
	pub items: Vec<SearchItem>,
	pub matches: KeywordMatches,
	pub predicate: FilterPredicate,
	/// Advisory: the hard filter selected zero candidates and was relaxed.
	pub filter_relaxed: bool,
	/// Distinguishes "the corpus is empty" from "nothing scored above the threshold".
	pub corpus_empty: bool,
}

impl HavenService {
	/// The retrieval pipeline: analyze, select a filter, retrieve candidates, rank,
	/// format. The two external calls (embedding, index query) are the only awaits
	/// that can block; both are bounded.
	pub async fn search(&self, request: SearchRequest) -> ServiceResult<SearchResponse> {
		let query = request.query.trim();

		if query.is_empty() {
			return Err(Error::InvalidQuery { message: "Query text must be non-empty.".to_string() });
		}

		let limit = request.limit.unwrap_or(self.cfg.search.limit);

		if limit == 0 {
			return Err(Error::InvalidRequest {
				message: "limit must be greater than zero.".to_string(),
			});
		}

		let min_similarity = request.min_similarity.or(self.cfg.search.min_similarity);

		if let Some(min) = min_similarity
			&& !(-1.0..=1.0).contains(&min)
		{
			return Err(Error::InvalidRequest {
				message: "min_similarity must be in the range -1.0 to 1.0.".to_string(),
			});
		}

		let matches = analyzer::analyze(query);
		let predicate = resolve_predicate(&request, &matches);
		let query_vector = self.embed_single(query).await?;
		let store = self.store().await?;
		let candidate_k =
			u64::from(limit.saturating_mul(self.cfg.search.overfetch_factor).max(limit));
		let filter = match request.mode {
			SearchMode::Plain => None,
			SearchMode::Hybrid => qdrant::predicate_filter(&predicate),
		};
		let filtered = filter.is_some();
		let mut filter_relaxed = false;
		let mut points =
			self.query_with_timeout(store, query_vector.clone(), filter, candidate_k).await?;

		if points.is_empty() && filtered {
			// A query must never fail purely because the filter over-constrained the
			// corpus; relax and retry unrestricted.
			filter_relaxed = true;

			tracing::info!(query, predicate = ?predicate, "Filter selected zero candidates; retrying unrestricted.");

			points = self.query_with_timeout(store, query_vector.clone(), None, candidate_k).await?;
		}

		let mut corpus_empty = false;

		if points.is_empty() {
			corpus_empty = store.count().await? == 0;
		}

		let mut records = Vec::with_capacity(points.len());
		let mut vectors = Vec::with_capacity(points.len());

		for point in &points {
			let Some(vector) = qdrant::point_vector(point) else {
				tracing::warn!(point_id = ?point.id, "Candidate is missing its vector; skipping.");

				continue;
			};
			let record = match qdrant::record_from_payload(&point.payload) {
				Ok(record) => record,
				Err(err) => {
					tracing::warn!(point_id = ?point.id, error = %err, "Candidate payload is malformed; skipping.");

					continue;
				},
			};

			records.push(record);
			vectors.push(vector);
		}

		let ranked = ranker::rank(&query_vector, &vectors, min_similarity, limit as usize);
		let items = ranked
			.into_iter()
			.enumerate()
			.map(|(position, candidate)| SearchItem {
				rank: position as u32 + 1,
				score: candidate.score,
				display_score: round_display(candidate.score),
				record: records[candidate.index].clone(),
			})
			.collect();

		Ok(SearchResponse { items, matches, predicate, filter_relaxed, corpus_empty })
	}

	/// One bounded index query: each attempt carries the configured timeout, and a
	/// transient transport failure is retried once before surfacing as unavailable,
	/// matching the embedding client's policy.
	async fn query_with_timeout(
		&self,
		store: &HousingStore,
		vector: Vec<f32>,
		filter: Option<qdrant_client::qdrant::Filter>,
		limit: u64,
	) -> ServiceResult<Vec<qdrant_client::qdrant::ScoredPoint>> {
		let timeout = Duration::from_millis(self.cfg.search.timeout_ms);
		let mut retried = false;

		loop {
			let attempt = time::timeout(
				timeout,
				store.query_nearest(vector.clone(), filter.clone(), limit),
			)
			.await
			.map_err(|_| Error::IndexUnavailable {
				message: "Vector index query timed out.".to_string(),
			})?;

			match attempt {
				Ok(points) => return Ok(points),
				Err(err) if retry_index_query(&err, retried) => {
					retried = true;

					tracing::warn!(error = %err, "Vector index query failed transiently; retrying.");
				},
				Err(err) => return Err(err.into()),
			}
		}
	}
}

fn resolve_predicate(request: &SearchRequest, matches: &KeywordMatches) -> FilterPredicate {
	if let Some(theme) = request.theme.as_ref().filter(|theme| !theme.trim().is_empty()) {
		return FilterPredicate::Theme { terms: vec![theme.clone()] };
	}
	if request.district.is_some() || request.dong.is_some() {
		return FilterPredicate::Location {
			district: request.district.clone(),
			dong: request.dong.clone(),
		};
	}

	filter::select(matches)
}

fn retry_index_query(err: &haven_index::Error, retried: bool) -> bool {
	!retried && err.is_transient()
}

fn round_display(score: f32) -> f32 {
	let factor = 10.0_f32.powi(DISPLAY_DECIMALS);

	(score * factor).round() / factor
}
