//! Thread-safe in-memory [`TokenStore`] for server-side sessions and tests.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	store::{StoreFuture, TokenStore},
};

/// Keeps the token record in-process; clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenStore(Arc<RwLock<Option<AccessToken>>>);
impl MemoryTokenStore {
	/// Creates a store pre-seeded with `token`.
	pub fn with_token(token: AccessToken) -> Self {
		Self(Arc::new(RwLock::new(Some(token))))
	}

	/// Returns the current record without going through the async contract.
	pub fn snapshot(&self) -> Option<AccessToken> {
		self.0.read().clone()
	}
}
impl TokenStore for MemoryTokenStore {
	fn read(&self) -> StoreFuture<'_, Option<AccessToken>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.read().clone()) })
	}

	fn write(&self, token: AccessToken) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = Some(token);

			Ok(())
		})
	}
}
