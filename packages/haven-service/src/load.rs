use std::{fs, path::PathBuf};

use crate::{Error, HavenService, ServiceResult};
use haven_index::models::HousingRecord;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoadRequest {
	/// Path to a JSON array of housing records.
	pub source: PathBuf,
	pub batch_size: Option<u32>,
	/// Empties the collection first. Replacing the collection wholesale keeps a
	/// concurrent search from observing a half-cleared index.
	pub clear: bool,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoadReport {
	pub loaded_count: u64,
	pub total_count: u64,
}

impl HavenService {
	/// Ingests records: parse, embed in batches, upsert with deterministic point ids.
	/// Idempotent on total count whether or not `clear` is set, because point ids are
	/// derived from record ids.
	pub async fn load(&self, request: LoadRequest) -> ServiceResult<LoadReport> {
		let raw = fs::read_to_string(&request.source).map_err(|err| Error::InvalidRequest {
			message: format!("Failed to read source file {:?}: {err}.", request.source),
		})?;
		let records: Vec<HousingRecord> =
			serde_json::from_str(&raw).map_err(|err| Error::InvalidRequest {
				message: format!("Failed to parse source file {:?}: {err}.", request.source),
			})?;
		let batch_size = match request.batch_size {
			Some(0) => {
				return Err(Error::InvalidRequest {
					message: "batch_size must be greater than zero.".to_string(),
				});
			},
			Some(size) => size as usize,
			None => self.cfg.ingest.batch_size as usize,
		};
		let store = self.store().await?;

		if request.clear {
			store.clear().await?;
		}

		store.ensure_collection().await?;

		let mut loaded_count = 0_u64;

		for chunk in records.chunks(batch_size) {
			let texts: Vec<String> = chunk.iter().map(HousingRecord::embedding_text).collect();
			let vectors = self.embed_texts(&texts).await?;
			let batch: Vec<(HousingRecord, Vec<f32>)> =
				chunk.iter().cloned().zip(vectors).collect();

			store.upsert(batch).await?;

			loaded_count += chunk.len() as u64;

			tracing::debug!(loaded_count, "Upserted ingestion batch.");
		}

		let total_count = store.count().await?;

		tracing::info!(loaded_count, total_count, "Ingestion finished.");

		Ok(LoadReport { loaded_count, total_count })
	}
}
