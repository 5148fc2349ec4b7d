use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub ingest: Ingest,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default = "default_max_retries")]
	pub max_retries: u32,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub limit: u32,
	pub overfetch_factor: u32,
	pub min_similarity: Option<f32>,
	pub timeout_ms: u64,
}
impl Default for Search {
	fn default() -> Self {
		Self { limit: 10, overfetch_factor: 3, min_similarity: None, timeout_ms: 10_000 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Ingest {
	pub batch_size: u32,
}
impl Default for Ingest {
	fn default() -> Self {
		Self { batch_size: 32 }
	}
}

fn default_max_retries() -> u32 {
	1
}
