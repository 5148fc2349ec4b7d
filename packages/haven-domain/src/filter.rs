use crate::analyzer::KeywordMatches;

/// The hard filter applied to candidate retrieval. At most one kind is active per
/// query evaluation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterPredicate {
	/// A record qualifies when its theme list contains any of these terms.
	Theme { terms: Vec<String> },
	/// District and dong narrow conjunctively when both are present.
	Location { district: Option<String>, dong: Option<String> },
	None,
}
impl FilterPredicate {
	pub fn is_none(&self) -> bool {
		matches!(self, Self::None)
	}
}

/// The precedence chain, evaluated in order with early exit.
const CONSTRUCTORS: &[fn(&KeywordMatches) -> Option<FilterPredicate>] =
	&[theme_predicate, location_predicate];

/// Selects the filter for one query. Theme hits preempt location hits entirely;
/// subway and housing-type matches are informational and never become a filter.
pub fn select(matches: &KeywordMatches) -> FilterPredicate {
	CONSTRUCTORS
		.iter()
		.find_map(|construct| construct(matches))
		.unwrap_or(FilterPredicate::None)
}

fn theme_predicate(matches: &KeywordMatches) -> Option<FilterPredicate> {
	if matches.theme.is_empty() {
		return None;
	}

	// Multiple theme hits combine with OR.
	Some(FilterPredicate::Theme { terms: matches.theme.clone() })
}

fn location_predicate(matches: &KeywordMatches) -> Option<FilterPredicate> {
	if matches.district.is_empty() && matches.dong.is_empty() {
		return None;
	}

	// When several districts (or dongs) match, the first one discovered in the query
	// wins; a dong that belongs to a different district than the matched one is not
	// reconciled here and simply narrows to the empty set, which retrieval relaxes.
	Some(FilterPredicate::Location {
		district: matches.district.first().cloned(),
		dong: matches.dong.first().cloned(),
	})
}
