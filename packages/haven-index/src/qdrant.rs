use std::collections::HashMap;

use qdrant_client::{
	Qdrant,
	client::Payload,
	qdrant::{
		Condition, CountPointsBuilder, CreateCollectionBuilder, Distance, Filter, PointId,
		PointStruct, Query, QueryPointsBuilder, ScoredPoint, ScrollPointsBuilder,
		UpsertPointsBuilder, Value, VectorParamsBuilder, value::Kind,
		vectors_output::VectorsOptions,
	},
};

use crate::{Error, Result, models::HousingRecord};
use haven_domain::filter::FilterPredicate;

const SCROLL_PAGE: u32 = 256;

/// Handle to the housing collection. One per process; the underlying channel supports
/// concurrent read queries.
pub struct HousingStore {
	pub client: Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl HousingStore {
	pub fn new(cfg: &haven_config::Qdrant) -> Result<Self> {
		let client = Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	pub async fn collection_exists(&self) -> Result<bool> {
		Ok(self.client.collection_exists(self.collection.clone()).await?)
	}

	/// Creates the collection (cosine distance, single dense vector) if missing.
	pub async fn ensure_collection(&self) -> Result<()> {
		if self.collection_exists().await? {
			return Ok(());
		}

		self.client
			.create_collection(
				CreateCollectionBuilder::new(self.collection.clone()).vectors_config(
					VectorParamsBuilder::new(u64::from(self.vector_dim), Distance::Cosine),
				),
			)
			.await?;

		Ok(())
	}

	/// Drops the collection wholesale. Clearing a collection that does not exist is a
	/// no-op, not an error.
	pub async fn clear(&self) -> Result<()> {
		if !self.collection_exists().await? {
			return Ok(());
		}

		self.client.delete_collection(self.collection.clone()).await?;

		Ok(())
	}

	pub async fn upsert(&self, batch: Vec<(HousingRecord, Vec<f32>)>) -> Result<()> {
		let mut points = Vec::with_capacity(batch.len());

		for (record, vector) in batch {
			if vector.len() != self.vector_dim as usize {
				return Err(Error::InvalidArgument(format!(
					"Record {} has a vector of dimension {}, expected {}.",
					record.id,
					vector.len(),
					self.vector_dim,
				)));
			}

			let payload = record_payload(&record)?;

			points.push(PointStruct::new(record.point_id().to_string(), vector, payload));
		}

		if points.is_empty() {
			return Ok(());
		}

		self.client
			.upsert_points(UpsertPointsBuilder::new(self.collection.clone(), points).wait(true))
			.await?;

		Ok(())
	}

	pub async fn count(&self) -> Result<u64> {
		let response =
			self.client.count(CountPointsBuilder::new(self.collection.clone()).exact(true)).await?;

		Ok(response.result.map(|result| result.count).unwrap_or(0))
	}

	/// Top-`limit` nearest neighbors by embedding distance, optionally restricted by a
	/// payload filter. Payloads and vectors are returned so the ranker can rescore.
	pub async fn query_nearest(
		&self,
		vector: Vec<f32>,
		filter: Option<Filter>,
		limit: u64,
	) -> Result<Vec<ScoredPoint>> {
		let mut search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector))
			.limit(limit)
			.with_payload(true)
			.with_vectors(true);

		if let Some(filter) = filter {
			search = search.filter(filter);
		}

		let response = self.client.query(search).await?;

		Ok(response.result)
	}

	/// Scrolls every record's payload out of the collection, page by page. Used for
	/// category tallies; malformed payloads are skipped.
	pub async fn scroll_records(&self) -> Result<Vec<HousingRecord>> {
		let mut records = Vec::new();
		let mut offset: Option<PointId> = None;

		loop {
			let mut scroll = ScrollPointsBuilder::new(self.collection.clone())
				.limit(SCROLL_PAGE)
				.with_payload(true);

			if let Some(offset) = offset.take() {
				scroll = scroll.offset(offset);
			}

			let response = self.client.scroll(scroll).await?;

			for point in response.result {
				if let Ok(record) = record_from_payload(&point.payload) {
					records.push(record);
				}
			}

			match response.next_page_offset {
				Some(next) => offset = Some(next),
				None => break,
			}
		}

		Ok(records)
	}
}

/// Translates the selected predicate into a Qdrant payload filter. `Theme` matches any
/// of the terms against the record's theme list; `Location` conjoins district and dong.
pub fn predicate_filter(predicate: &FilterPredicate) -> Option<Filter> {
	match predicate {
		FilterPredicate::Theme { terms } => {
			if terms.is_empty() {
				return None;
			}

			Some(Filter::all([Condition::matches("theme", terms.clone())]))
		},
		FilterPredicate::Location { district, dong } => {
			let mut conditions = Vec::new();

			if let Some(district) = district {
				conditions.push(Condition::matches("district", district.clone()));
			}
			if let Some(dong) = dong {
				conditions.push(Condition::matches("dong", dong.clone()));
			}

			if conditions.is_empty() {
				return None;
			}

			Some(Filter::all(conditions))
		},
		FilterPredicate::None => None,
	}
}

/// Extracts the dense vector from a scored point, whichever shape the server used.
pub fn point_vector(point: &ScoredPoint) -> Option<Vec<f32>> {
	match point.vectors.as_ref()?.vectors_options.as_ref()? {
		VectorsOptions::Vector(vector) => Some(vector.data.clone()),
		VectorsOptions::Vectors(named) =>
			named.vectors.values().next().map(|vector| vector.data.clone()),
	}
}

pub fn record_from_payload(payload: &HashMap<String, Value>) -> Result<HousingRecord> {
	let mut map = serde_json::Map::with_capacity(payload.len());

	for (key, value) in payload {
		map.insert(key.clone(), value_to_json(value.clone()));
	}

	serde_json::from_value(serde_json::Value::Object(map))
		.map_err(|err| Error::InvalidArgument(format!("Malformed record payload: {err}.")))
}

fn record_payload(record: &HousingRecord) -> Result<Payload> {
	let value = serde_json::to_value(record)
		.map_err(|err| Error::InvalidArgument(format!("Failed to serialize record: {err}.")))?;

	Payload::try_from(value)
		.map_err(|err| Error::InvalidArgument(format!("Record payload is not an object: {err}.")))
}

fn value_to_json(value: Value) -> serde_json::Value {
	match value.kind {
		None | Some(Kind::NullValue(_)) => serde_json::Value::Null,
		Some(Kind::BoolValue(flag)) => serde_json::Value::Bool(flag),
		Some(Kind::IntegerValue(number)) => serde_json::Value::from(number),
		Some(Kind::DoubleValue(number)) => serde_json::Number::from_f64(number)
			.map(serde_json::Value::Number)
			.unwrap_or(serde_json::Value::Null),
		Some(Kind::StringValue(text)) => serde_json::Value::String(text),
		Some(Kind::ListValue(list)) =>
			serde_json::Value::Array(list.values.into_iter().map(value_to_json).collect()),
		Some(Kind::StructValue(fields)) => serde_json::Value::Object(
			fields.fields.into_iter().map(|(key, value)| (key, value_to_json(value))).collect(),
		),
	}
}
