pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid query: {message}")]
	InvalidQuery { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Embedding model unavailable: {message}")]
	ModelUnavailable { message: String },
	#[error("Vector index unavailable: {message}")]
	IndexUnavailable { message: String },
}
impl From<haven_index::Error> for Error {
	fn from(err: haven_index::Error) -> Self {
		match err {
			haven_index::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			haven_index::Error::NotFound(message) => Self::IndexUnavailable { message },
			haven_index::Error::Qdrant(inner) => {
				Self::IndexUnavailable { message: inner.to_string() }
			},
		}
	}
}
impl From<color_eyre::Report> for Error {
	fn from(err: color_eyre::Report) -> Self {
		Self::ModelUnavailable { message: err.to_string() }
	}
}
