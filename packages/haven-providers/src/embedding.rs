use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::Value;

/// Embeds a batch of texts through the configured inference endpoint. The request
/// carries the client-level timeout; transient failures (connect errors, timeouts)
/// are retried up to `cfg.max_retries` extra attempts, anything else fails fast.
pub async fn embed(
	cfg: &haven_config::EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let mut attempt = 0;

	loop {
		match request_embeddings(&client, cfg, texts).await {
			Ok(vectors) => return Ok(vectors),
			Err(err) if attempt < cfg.max_retries && is_transient(&err) => {
				attempt += 1;

				tracing::warn!(
					attempt,
					max_retries = cfg.max_retries,
					error = %err,
					"Embedding request failed transiently; retrying."
				);
			},
			Err(err) => return Err(err),
		}
	}
}

async fn request_embeddings(
	client: &Client,
	cfg: &haven_config::EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": texts,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(request_headers(cfg)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_embedding_response(json)
}

/// Bearer auth plus any configured extra headers. Header values must be strings.
fn request_headers(cfg: &haven_config::EmbeddingProviderConfig) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {}", cfg.api_key).parse()?);

	for (key, value) in &cfg.default_headers {
		let Some(raw) = value.as_str() else {
			return Err(eyre::eyre!("Default header values must be strings."));
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

fn is_transient(err: &color_eyre::Report) -> bool {
	err.downcast_ref::<reqwest::Error>()
		.map(|err| err.is_connect() || err.is_timeout())
		.unwrap_or(false)
}

fn parse_embedding_response(json: Value) -> Result<Vec<Vec<f32>>> {
	let data = json
		.get("data")
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Embedding response is missing data array."))?;

	let mut indexed: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());
	for (fallback_index, item) in data.iter().enumerate() {
		let index = item
			.get("index")
			.and_then(|v| v.as_u64())
			.map(|v| v as usize)
			.unwrap_or(fallback_index);
		let embedding = item
			.get("embedding")
			.and_then(|v| v.as_array())
			.ok_or_else(|| eyre::eyre!("Embedding item missing embedding array."))?;
		let mut vec = Vec::with_capacity(embedding.len());
		for value in embedding {
			let number =
				value.as_f64().ok_or_else(|| eyre::eyre!("Embedding value must be numeric."))?;
			vec.push(number as f32);
		}
		indexed.push((index, vec));
	}

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, vec)| vec).collect())
}
