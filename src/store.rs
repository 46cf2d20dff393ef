//! Storage contract and built-in backends for the access token record.

pub mod cookie;
pub mod file;
pub mod memory;

pub use cookie::CookieTokenStore;
pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

// self
use crate::{_prelude::*, auth::AccessToken};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for the single access token record of a storefront session.
///
/// Reads never fail because of a malformed record: implementations treat unparseable data as
/// absent so the authenticator falls back to a fresh exchange.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the stored record, if one is present and readable.
	fn read(&self) -> StoreFuture<'_, Option<AccessToken>>;

	/// Replaces the stored record.
	fn write(&self, token: AccessToken) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Parses a persisted record, discarding anything that does not match the expected shape.
pub(crate) fn decode_record(raw: &str, source: &'static str) -> Option<AccessToken> {
	if raw.trim().is_empty() {
		return None;
	}

	match serde_json::from_str::<AccessToken>(raw) {
		Ok(token) => Some(token),
		Err(e) => {
			tracing::warn!(store = source, error = %e, "Discarding unreadable token record.");

			None
		},
	}
}

/// Serializes a record into the persisted JSON shape.
pub(crate) fn encode_record(token: &AccessToken) -> Result<String, StoreError> {
	serde_json::to_string(token).map_err(|e| StoreError::Serialization {
		message: format!("Failed to serialize token record: {e}"),
	})
}
