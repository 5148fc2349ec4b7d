mod error;

pub use error::{Error, Result};

use std::{env, thread, time::Duration};

use qdrant_client::Qdrant;
use tokio::{runtime::Builder, time};
use uuid::Uuid;

use haven_index::models::HousingRecord;

pub fn env_qdrant_url() -> Option<String> {
	env::var("HAVEN_QDRANT_URL").ok()
}

/// A uniquely named Qdrant collection for one test. The collection itself is created
/// by the code under test; this guard only guarantees a fresh name and deletes the
/// collection afterwards, even when the test panics.
pub struct TestCollection {
	name: String,
	cleaned: bool,
}
impl TestCollection {
	pub fn new(prefix: &str) -> Self {
		Self { name: format!("{prefix}_{}", Uuid::new_v4().simple()), cleaned: false }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub async fn cleanup(mut self) -> Result<()> {
		let result = delete_collection(&self.name).await;

		self.cleaned = true;

		result
	}
}
impl Drop for TestCollection {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let name = self.name.clone();
		let cleanup_thread = thread::spawn(move || {
			let runtime = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime,
				Err(err) => {
					eprintln!("Test collection cleanup failed: {err}.");

					return;
				},
			};

			if let Err(err) = runtime.block_on(delete_collection(&name)) {
				eprintln!("Test collection cleanup failed: {err}.");
			}
		});
		let _ = cleanup_thread.join();
	}
}

async fn delete_collection(name: &str) -> Result<()> {
	let Some(qdrant_url) = env_qdrant_url() else {
		eprintln!("Skipping Qdrant cleanup; set HAVEN_QDRANT_URL to delete test collections.");

		return Ok(());
	};
	let client = Qdrant::from_url(&qdrant_url)
		.build()
		.map_err(|err| Error::Message(format!("Failed to build Qdrant client: {err}.")))?;
	let exists = time::timeout(Duration::from_secs(10), client.collection_exists(name))
		.await
		.map_err(|_| Error::Message("Qdrant collection_exists timed out.".to_string()))??;

	if !exists {
		return Ok(());
	}

	time::timeout(Duration::from_secs(10), client.delete_collection(name))
		.await
		.map_err(|_| Error::Message(format!("Timed out deleting Qdrant collection {name:?}.")))??;

	Ok(())
}

/// A small fixture corpus covering the theme, district, and dong combinations the
/// acceptance scenarios rely on.
pub fn fixture_records() -> Vec<HousingRecord> {
	vec![
		record(
			"HV-001",
			"한울 공동체주택",
			"마포구",
			"망원동",
			&["반려동물", "청년"],
			"반려동물 환영, 옥상 마당",
			"망원역",
		),
		record(
			"HV-002",
			"다온 셰어하우스",
			"마포구",
			"연남동",
			&["청년"],
			"역세권, 공유 주방",
			"홍대입구역",
		),
		record(
			"HV-003",
			"해든 아파트",
			"강남구",
			"역삼동",
			&["신혼부부"],
			"신혼부부 특별공급",
			"강남역",
		),
		record(
			"HV-004",
			"소소한 빌라",
			"성동구",
			"성수동",
			&["반려동물"],
			"반려동물 동반 가능, 소형 평형",
			"성수역",
		),
		record(
			"HV-005",
			"푸른 원룸텔",
			"관악구",
			"신림동",
			&["청년", "1인가구"],
			"보증금 지원, 풀옵션",
			"신림역",
		),
		record(
			"HV-006",
			"어울림 주택",
			"강남구",
			"대치동",
			&["육아"],
			"단지 내 어린이집",
			"대치역",
		),
		record(
			"HV-007",
			"노을 실버홈",
			"은평구",
			"",
			&["시니어", "고령자"],
			"무장애 설계, 경로당 인접",
			"",
		),
		record(
			"HV-008",
			"바라봄 하우스",
			"마포구",
			"합정동",
			&["여성안심"],
			"여성 전용, 보안 강화",
			"합정역",
		),
	]
}

pub fn fixture_json() -> String {
	serde_json::to_string_pretty(&fixture_records()).expect("Failed to serialize fixtures.")
}

fn record(
	id: &str,
	name: &str,
	district: &str,
	dong: &str,
	themes: &[&str],
	tags: &str,
	subway: &str,
) -> HousingRecord {
	HousingRecord {
		id: id.to_string(),
		name: name.to_string(),
		address_lot: format!("서울 {district} {dong} 일대"),
		address_road: String::new(),
		district: district.to_string(),
		dong: dong.to_string(),
		tags: tags.to_string(),
		theme: themes.iter().map(|theme| theme.to_string()).collect(),
		subway: subway.to_string(),
		requirements: String::new(),
		mart: String::new(),
		hospital: String::new(),
		school: String::new(),
		facilities: String::new(),
		cafe: String::new(),
	}
}
