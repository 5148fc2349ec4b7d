use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One indexed housing listing. Created and updated by ingestion; read-only for the
/// search pipeline. The embedding vector lives next to the record in the index and is
/// always derived from [`HousingRecord::embedding_text`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HousingRecord {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub address_lot: String,
	#[serde(default)]
	pub address_road: String,
	#[serde(default)]
	pub district: String,
	#[serde(default)]
	pub dong: String,
	#[serde(default)]
	pub tags: String,
	#[serde(default)]
	pub theme: Vec<String>,
	#[serde(default)]
	pub subway: String,
	#[serde(default)]
	pub requirements: String,
	#[serde(default)]
	pub mart: String,
	#[serde(default)]
	pub hospital: String,
	#[serde(default)]
	pub school: String,
	#[serde(default)]
	pub facilities: String,
	#[serde(default)]
	pub cafe: String,
}
impl HousingRecord {
	/// Deterministic point id so re-ingesting the same source overwrites rather than
	/// duplicates.
	pub fn point_id(&self) -> Uuid {
		Uuid::new_v5(&Uuid::NAMESPACE_OID, self.id.as_bytes())
	}

	/// The canonicalized text the embedding vector is computed from. Field order is
	/// fixed; empty fields are skipped so sparse records do not embed filler.
	pub fn embedding_text(&self) -> String {
		let theme = self.theme.join(" ");
		let parts = [
			self.name.as_str(),
			self.district.as_str(),
			self.dong.as_str(),
			theme.as_str(),
			self.tags.as_str(),
			self.subway.as_str(),
			self.requirements.as_str(),
			self.mart.as_str(),
			self.hospital.as_str(),
			self.school.as_str(),
			self.facilities.as_str(),
			self.cafe.as_str(),
		];
		let composed = parts
			.iter()
			.filter(|part| !part.trim().is_empty())
			.copied()
			.collect::<Vec<_>>()
			.join(" ");

		haven_domain::text::canonicalize(&composed)
	}
}
