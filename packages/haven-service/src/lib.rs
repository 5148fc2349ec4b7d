pub mod admin;
pub mod load;
pub mod search;
pub mod stats;

mod error;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin, sync::Arc};

use tokio::sync::OnceCell;

pub use load::{LoadReport, LoadRequest};
pub use search::{SearchItem, SearchMode, SearchRequest, SearchResponse};
pub use stats::StatsReport;

use haven_config::{Config, EmbeddingProviderConfig};
use haven_index::qdrant::HousingStore;
use haven_providers::embedding;

pub type ServiceResult<T> = Result<T, Error>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Seam for embedding inference so tests can substitute deterministic vectors.
pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders) }
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

/// Process-wide search service. The store handle is built exactly once, on first use
/// or via [`HavenService::initialize`]; concurrent first callers await the same
/// initialization. Searches after that are read-only and need no mutual exclusion.
pub struct HavenService {
	pub cfg: Config,
	pub providers: Providers,
	store: OnceCell<HousingStore>,
}
impl HavenService {
	pub fn new(cfg: Config) -> Self {
		Self { cfg, providers: Providers::default(), store: OnceCell::new() }
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		Self { cfg, providers, store: OnceCell::new() }
	}

	/// Eagerly builds the store handle so the first search does not pay for it.
	pub async fn initialize(&self) -> ServiceResult<()> {
		self.store().await?;

		Ok(())
	}

	pub(crate) async fn store(&self) -> ServiceResult<&HousingStore> {
		self.store
			.get_or_try_init(|| async { Ok(HousingStore::new(&self.cfg.storage.qdrant)?) })
			.await
	}

	pub(crate) async fn embed_texts(&self, texts: &[String]) -> ServiceResult<Vec<Vec<f32>>> {
		let vectors = self.providers.embedding.embed(&self.cfg.providers.embedding, texts).await?;

		if vectors.len() != texts.len() {
			return Err(Error::ModelUnavailable {
				message: "Embedding provider returned mismatched vector count.".to_string(),
			});
		}

		let dim = self.cfg.storage.qdrant.vector_dim as usize;

		for vector in &vectors {
			if vector.len() != dim {
				return Err(Error::ModelUnavailable {
					message: "Embedding vector dimension mismatch.".to_string(),
				});
			}
		}

		Ok(vectors)
	}

	pub(crate) async fn embed_single(&self, text: &str) -> ServiceResult<Vec<f32>> {
		let vectors = self.embed_texts(std::slice::from_ref(&text.to_string())).await?;

		vectors.into_iter().next().ok_or_else(|| Error::ModelUnavailable {
			message: "Embedding provider returned no vectors.".to_string(),
		})
	}
}
