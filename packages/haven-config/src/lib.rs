mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, Ingest, Providers, Qdrant, Search, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.url.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.url must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.collection.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.collection must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}
	if cfg.providers.embedding.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.embedding.api_key must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.search.limit == 0 {
		return Err(Error::Validation {
			message: "search.limit must be greater than zero.".to_string(),
		});
	}
	if cfg.search.overfetch_factor == 0 {
		return Err(Error::Validation {
			message: "search.overfetch_factor must be greater than zero.".to_string(),
		});
	}
	if cfg.search.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "search.timeout_ms must be greater than zero.".to_string(),
		});
	}

	if let Some(min) = cfg.search.min_similarity {
		if !min.is_finite() {
			return Err(Error::Validation {
				message: "search.min_similarity must be a finite number.".to_string(),
			});
		}
		if !(-1.0..=1.0).contains(&min) {
			return Err(Error::Validation {
				message: "search.min_similarity must be in the range -1.0 to 1.0.".to_string(),
			});
		}
	}

	if cfg.ingest.batch_size == 0 {
		return Err(Error::Validation {
			message: "ingest.batch_size must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
	if cfg.providers.embedding.path.trim().is_empty() {
		cfg.providers.embedding.path = "/embeddings".to_string();
	}
}
