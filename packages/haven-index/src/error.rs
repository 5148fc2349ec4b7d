#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Not found: {0}")]
	NotFound(String),
	#[error(transparent)]
	Qdrant(#[from] Box<qdrant_client::QdrantError>),
}
impl From<qdrant_client::QdrantError> for Error {
	fn from(err: qdrant_client::QdrantError) -> Self {
		Self::Qdrant(Box::new(err))
	}
}

// gRPC status codes for transport-level faults. Compared as raw codes so the tonic
// version stays an implementation detail of the qdrant client.
const GRPC_DEADLINE_EXCEEDED: i32 = 4;
const GRPC_UNAVAILABLE: i32 = 14;

impl Error {
	/// True for connection-level faults (server unreachable, deadline exceeded) that a
	/// single retry can plausibly clear. Anything else is final.
	pub fn is_transient(&self) -> bool {
		match self {
			Self::Qdrant(err) => match err.as_ref() {
				qdrant_client::QdrantError::ResponseError { status } => matches!(
					status.code() as i32,
					GRPC_DEADLINE_EXCEEDED | GRPC_UNAVAILABLE
				),
				_ => false,
			},
			_ => false,
		}
	}
}
