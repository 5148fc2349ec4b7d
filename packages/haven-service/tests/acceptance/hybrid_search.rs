use std::fs;

use haven_domain::filter::FilterPredicate;
use haven_service::{Error, LoadRequest, SearchMode, SearchRequest};
use haven_testkit::TestCollection;

fn search_request(query: &str) -> SearchRequest {
	SearchRequest {
		query: query.to_string(),
		mode: SearchMode::Hybrid,
		district: None,
		dong: None,
		theme: None,
		min_similarity: None,
		limit: None,
	}
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set HAVEN_QDRANT_URL to run."]
async fn pet_query_returns_only_pet_theme_records() {
	let Some(qdrant_url) = super::test_qdrant_url() else {
		eprintln!("Skipping pet_query_returns_only_pet_theme_records; set HAVEN_QDRANT_URL.");

		return;
	};
	let collection = TestCollection::new("haven_acceptance");
	let service = super::build_service(qdrant_url, collection.name().to_string());
	let source = super::fixture_source();

	service
		.load(LoadRequest { source: source.clone(), batch_size: None, clear: true })
		.await
		.expect("Failed to load fixtures.");

	let response = service
		.search(search_request("반려동물을 키울 수 있는 주택을 추천해줘"))
		.await
		.expect("Search failed.");

	assert_eq!(
		response.predicate,
		FilterPredicate::Theme { terms: vec!["반려동물".to_string()] }
	);
	assert!(!response.filter_relaxed);
	assert!(!response.corpus_empty);
	assert!(!response.items.is_empty());

	for item in &response.items {
		assert!(item.record.theme.contains(&"반려동물".to_string()));
	}

	for pair in response.items.windows(2) {
		assert!(pair[0].score >= pair[1].score);
	}

	assert!(response.items[0].score >= 0.3);

	let _ = fs::remove_file(source);

	collection.cleanup().await.expect("Failed to clean up collection.");
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set HAVEN_QDRANT_URL to run."]
async fn explicit_theme_parameter_matches_analyzer_branch() {
	let Some(qdrant_url) = super::test_qdrant_url() else {
		eprintln!("Skipping explicit_theme_parameter_matches_analyzer_branch; set HAVEN_QDRANT_URL.");

		return;
	};
	let collection = TestCollection::new("haven_acceptance");
	let service = super::build_service(qdrant_url, collection.name().to_string());
	let source = super::fixture_source();

	service
		.load(LoadRequest { source: source.clone(), batch_size: None, clear: true })
		.await
		.expect("Failed to load fixtures.");

	// The analyzer sees only a housing type here; the explicit parameter supplies the
	// theme filter instead.
	let request =
		SearchRequest { theme: Some("반려동물".to_string()), ..search_request("주택") };
	let response = service.search(request).await.expect("Search failed.");
	let mut returned: Vec<String> =
		response.items.iter().map(|item| item.record.id.clone()).collect();
	let mut expected: Vec<String> = haven_testkit::fixture_records()
		.into_iter()
		.filter(|record| record.theme.contains(&"반려동물".to_string()))
		.map(|record| record.id)
		.collect();

	returned.sort();
	expected.sort();

	assert_eq!(returned, expected);
	assert!(!response.filter_relaxed);

	let _ = fs::remove_file(source);

	collection.cleanup().await.expect("Failed to clean up collection.");
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set HAVEN_QDRANT_URL to run."]
async fn limit_yields_dense_gapless_ranks() {
	let Some(qdrant_url) = super::test_qdrant_url() else {
		eprintln!("Skipping limit_yields_dense_gapless_ranks; set HAVEN_QDRANT_URL.");

		return;
	};
	let collection = TestCollection::new("haven_acceptance");
	let service = super::build_service(qdrant_url, collection.name().to_string());
	let source = super::fixture_source();

	service
		.load(LoadRequest { source: source.clone(), batch_size: None, clear: true })
		.await
		.expect("Failed to load fixtures.");

	let request = SearchRequest {
		mode: SearchMode::Plain,
		limit: Some(5),
		..search_request("살기 좋은 집")
	};
	let response = service.search(request).await.expect("Search failed.");

	assert_eq!(response.items.len(), 5);

	for (position, item) in response.items.iter().enumerate() {
		assert_eq!(item.rank, position as u32 + 1);
	}

	let _ = fs::remove_file(source);

	collection.cleanup().await.expect("Failed to clean up collection.");
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set HAVEN_QDRANT_URL to run."]
async fn overconstrained_filter_relaxes_instead_of_failing() {
	let Some(qdrant_url) = super::test_qdrant_url() else {
		eprintln!("Skipping overconstrained_filter_relaxes_instead_of_failing; set HAVEN_QDRANT_URL.");

		return;
	};
	let collection = TestCollection::new("haven_acceptance");
	let service = super::build_service(qdrant_url, collection.name().to_string());
	let source = super::fixture_source();

	service
		.load(LoadRequest { source: source.clone(), batch_size: None, clear: true })
		.await
		.expect("Failed to load fixtures.");

	// No fixture lives in 도봉구, so the location filter selects zero candidates.
	let request =
		SearchRequest { district: Some("도봉구".to_string()), ..search_request("조용한 집") };
	let response = service.search(request).await.expect("Search failed.");

	assert!(response.filter_relaxed);
	assert!(!response.corpus_empty);
	assert!(!response.items.is_empty());

	let _ = fs::remove_file(source);

	collection.cleanup().await.expect("Failed to clean up collection.");
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set HAVEN_QDRANT_URL to run."]
async fn min_similarity_is_strictly_enforced() {
	let Some(qdrant_url) = super::test_qdrant_url() else {
		eprintln!("Skipping min_similarity_is_strictly_enforced; set HAVEN_QDRANT_URL.");

		return;
	};
	let collection = TestCollection::new("haven_acceptance");
	let service = super::build_service(qdrant_url, collection.name().to_string());
	let source = super::fixture_source();

	service
		.load(LoadRequest { source: source.clone(), batch_size: None, clear: true })
		.await
		.expect("Failed to load fixtures.");

	let request = SearchRequest {
		mode: SearchMode::Plain,
		min_similarity: Some(0.3),
		..search_request("반려동물 주택")
	};
	let response = service.search(request).await.expect("Search failed.");

	assert!(response.items.len() <= 10);

	for item in &response.items {
		assert!(item.score >= 0.3);
	}

	let _ = fs::remove_file(source);

	collection.cleanup().await.expect("Failed to clean up collection.");
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set HAVEN_QDRANT_URL to run."]
async fn empty_corpus_is_marked_not_erroneous() {
	let Some(qdrant_url) = super::test_qdrant_url() else {
		eprintln!("Skipping empty_corpus_is_marked_not_erroneous; set HAVEN_QDRANT_URL.");

		return;
	};
	let collection = TestCollection::new("haven_acceptance");
	let service = super::build_service(qdrant_url, collection.name().to_string());
	let source = super::empty_source();

	service
		.load(LoadRequest { source: source.clone(), batch_size: None, clear: true })
		.await
		.expect("Failed to load empty source.");

	let response = service.search(search_request("반려동물 주택")).await.expect("Search failed.");

	assert!(response.items.is_empty());
	assert!(response.corpus_empty);

	let _ = fs::remove_file(source);

	collection.cleanup().await.expect("Failed to clean up collection.");
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set HAVEN_QDRANT_URL to run."]
async fn missing_collection_surfaces_index_unavailable() {
	let Some(qdrant_url) = super::test_qdrant_url() else {
		eprintln!("Skipping missing_collection_surfaces_index_unavailable; set HAVEN_QDRANT_URL.");

		return;
	};
	let collection = TestCollection::new("haven_acceptance");
	let service = super::build_service(qdrant_url, collection.name().to_string());
	let result = service.search(search_request("반려동물 주택")).await;

	assert!(matches!(result, Err(Error::IndexUnavailable { .. })));

	collection.cleanup().await.expect("Failed to clean up collection.");
}
