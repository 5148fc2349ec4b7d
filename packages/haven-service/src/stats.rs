use std::collections::BTreeMap;

use crate::{HavenService, ServiceResult};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StatsReport {
	pub total: u64,
	pub by_district: BTreeMap<String, u64>,
	pub by_theme: BTreeMap<String, u64>,
}

impl HavenService {
	/// Total record count plus per-district and per-theme tallies. A missing
	/// collection reports zeros, consistent with `clear` being a no-op on one.
	pub async fn stats(&self) -> ServiceResult<StatsReport> {
		let store = self.store().await?;

		if !store.collection_exists().await? {
			return Ok(StatsReport {
				total: 0,
				by_district: BTreeMap::new(),
				by_theme: BTreeMap::new(),
			});
		}

		let total = store.count().await?;
		let records = store.scroll_records().await?;
		let mut by_district: BTreeMap<String, u64> = BTreeMap::new();
		let mut by_theme: BTreeMap<String, u64> = BTreeMap::new();

		for record in &records {
			if !record.district.trim().is_empty() {
				*by_district.entry(record.district.clone()).or_insert(0) += 1;
			}

			for theme in &record.theme {
				*by_theme.entry(theme.clone()).or_insert(0) += 1;
			}
		}

		Ok(StatsReport { total, by_district, by_theme })
	}
}
