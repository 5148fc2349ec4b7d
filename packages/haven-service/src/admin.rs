use crate::{HavenService, ServiceResult};

impl HavenService {
	/// Empties the collection. Clearing a nonexistent collection is a no-op.
	pub async fn clear(&self) -> ServiceResult<()> {
		let store = self.store().await?;

		store.clear().await?;

		tracing::info!(collection = %store.collection, "Collection cleared.");

		Ok(())
	}
}
