use std::fs;

use haven_service::LoadRequest;
use haven_testkit::TestCollection;

#[tokio::test]
#[ignore = "Requires external Qdrant. Set HAVEN_QDRANT_URL to run."]
async fn load_with_clear_is_idempotent_on_total_count() {
	let Some(qdrant_url) = super::test_qdrant_url() else {
		eprintln!("Skipping load_with_clear_is_idempotent_on_total_count; set HAVEN_QDRANT_URL.");

		return;
	};
	let collection = TestCollection::new("haven_acceptance");
	let service = super::build_service(qdrant_url, collection.name().to_string());
	let source = super::fixture_source();
	let fixture_count = haven_testkit::fixture_records().len() as u64;

	let first = service
		.load(LoadRequest { source: source.clone(), batch_size: None, clear: true })
		.await
		.expect("First load failed.");
	let second = service
		.load(LoadRequest { source: source.clone(), batch_size: None, clear: true })
		.await
		.expect("Second load failed.");

	assert_eq!(first.total_count, fixture_count);
	assert_eq!(second.total_count, fixture_count);

	// Deterministic point ids keep even a clear-less reload duplicate-free.
	let third = service
		.load(LoadRequest { source: source.clone(), batch_size: Some(3), clear: false })
		.await
		.expect("Third load failed.");

	assert_eq!(third.total_count, fixture_count);

	let _ = fs::remove_file(source);

	collection.cleanup().await.expect("Failed to clean up collection.");
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set HAVEN_QDRANT_URL to run."]
async fn stats_reports_category_tallies() {
	let Some(qdrant_url) = super::test_qdrant_url() else {
		eprintln!("Skipping stats_reports_category_tallies; set HAVEN_QDRANT_URL.");

		return;
	};
	let collection = TestCollection::new("haven_acceptance");
	let service = super::build_service(qdrant_url, collection.name().to_string());
	let source = super::fixture_source();

	service
		.load(LoadRequest { source: source.clone(), batch_size: None, clear: true })
		.await
		.expect("Failed to load fixtures.");

	let report = service.stats().await.expect("Stats failed.");
	let records = haven_testkit::fixture_records();
	let expected_mapo =
		records.iter().filter(|record| record.district == "마포구").count() as u64;
	let expected_pet = records
		.iter()
		.filter(|record| record.theme.contains(&"반려동물".to_string()))
		.count() as u64;

	assert_eq!(report.total, records.len() as u64);
	assert_eq!(report.by_district.get("마포구"), Some(&expected_mapo));
	assert_eq!(report.by_theme.get("반려동물"), Some(&expected_pet));

	let _ = fs::remove_file(source);

	collection.cleanup().await.expect("Failed to clean up collection.");
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set HAVEN_QDRANT_URL to run."]
async fn clear_is_a_no_op_on_a_missing_collection() {
	let Some(qdrant_url) = super::test_qdrant_url() else {
		eprintln!("Skipping clear_is_a_no_op_on_a_missing_collection; set HAVEN_QDRANT_URL.");

		return;
	};
	let collection = TestCollection::new("haven_acceptance");
	let service = super::build_service(qdrant_url, collection.name().to_string());

	service.clear().await.expect("Clearing a missing collection must succeed.");
	service.clear().await.expect("Clearing twice must succeed.");

	let report = service.stats().await.expect("Stats failed.");

	assert_eq!(report.total, 0);
	assert!(report.by_district.is_empty());

	collection.cleanup().await.expect("Failed to clean up collection.");
}
