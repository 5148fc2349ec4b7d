use crate::{
	gazetteer::{self, Category},
	text,
};

/// Per-category keyword matches extracted from one query. Each list holds distinct
/// terms ordered by first occurrence in the query text.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeywordMatches {
	pub theme: Vec<String>,
	pub district: Vec<String>,
	pub dong: Vec<String>,
	pub subway: Vec<String>,
	pub housing_type: Vec<String>,
}
impl KeywordMatches {
	pub fn for_category(&self, category: Category) -> &[String] {
		match category {
			Category::Theme => &self.theme,
			Category::District => &self.district,
			Category::Dong => &self.dong,
			Category::Subway => &self.subway,
			Category::HousingType => &self.housing_type,
		}
	}

	pub fn is_empty(&self) -> bool {
		Category::ALL.iter().all(|category| self.for_category(*category).is_empty())
	}
}

/// Scans the query against every gazetteer table. Pure: same query text always yields
/// the same matches. Exact substring containment over the canonicalized query only.
pub fn analyze(query: &str) -> KeywordMatches {
	let canonical = text::canonicalize(query);

	KeywordMatches {
		theme: scan(&canonical, Category::Theme),
		district: scan(&canonical, Category::District),
		dong: scan(&canonical, Category::Dong),
		subway: scan(&canonical, Category::Subway),
		housing_type: scan(&canonical, Category::HousingType),
	}
}

fn scan(canonical_query: &str, category: Category) -> Vec<String> {
	let mut hits: Vec<(usize, &str)> = Vec::new();

	for term in gazetteer::terms(category) {
		if let Some(position) = canonical_query.find(term) {
			hits.push((position, term));
		}
	}

	// First-occurrence order in the query, not table order.
	hits.sort_by_key(|(position, _)| *position);

	hits.into_iter().map(|(_, term)| term.to_string()).collect()
}
