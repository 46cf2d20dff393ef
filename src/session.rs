//! Per-session persistence of the active cart identifier.
//!
//! The cart id is the only piece of cart state that outlives a page view. It is kept in a
//! [`SessionStorage`] under [`CART_ID_SESSION_KEY`]. A [`CartSession`] without storage
//! (e.g. during server rendering) reads nothing and silently drops writes.

// self
use crate::{_prelude::*, id::OrderId};

/// Session key holding the active cart (order) identifier.
pub const CART_ID_SESSION_KEY: &str = "mini_ecommerce_cart_id";

/// Minimal key/value contract for session-scoped storage.
pub trait SessionStorage
where
	Self: Send + Sync,
{
	/// Returns the value stored under `key`.
	fn get_item(&self, key: &str) -> Option<String>;

	/// Stores `value` under `key`, replacing any previous value.
	fn set_item(&self, key: &str, value: String);

	/// Removes the value stored under `key`.
	fn remove_item(&self, key: &str);
}

/// In-process [`SessionStorage`]; clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStorage(Arc<RwLock<HashMap<String, String>>>);
impl SessionStorage for MemorySessionStorage {
	fn get_item(&self, key: &str) -> Option<String> {
		self.0.read().get(key).cloned()
	}

	fn set_item(&self, key: &str, value: String) {
		self.0.write().insert(key.to_owned(), value);
	}

	fn remove_item(&self, key: &str) {
		self.0.write().remove(key);
	}
}

/// Cart identifier persistence bound to one browsing session.
#[derive(Clone, Default)]
pub struct CartSession {
	storage: Option<Arc<dyn SessionStorage>>,
}
impl CartSession {
	/// Binds the session to `storage`.
	pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
		Self { storage: Some(storage) }
	}

	/// Session with no backing storage.
	pub fn detached() -> Self {
		Self { storage: None }
	}

	/// Whether a storage backend is attached.
	pub fn is_attached(&self) -> bool {
		self.storage.is_some()
	}

	/// Reads the persisted cart id; invalid values are ignored.
	pub fn cart_id(&self) -> Option<OrderId> {
		let raw = self.storage.as_ref()?.get_item(CART_ID_SESSION_KEY)?;

		match OrderId::new(raw) {
			Ok(id) => Some(id),
			Err(e) => {
				tracing::warn!(error = %e, "Ignoring invalid cart id in session storage.");

				None
			},
		}
	}

	/// Persists `id` as the active cart.
	pub fn set_cart_id(&self, id: &OrderId) {
		if let Some(storage) = &self.storage {
			storage.set_item(CART_ID_SESSION_KEY, id.to_string());
		}
	}

	/// Forgets the active cart.
	pub fn clear(&self) {
		if let Some(storage) = &self.storage {
			storage.remove_item(CART_ID_SESSION_KEY);
		}
	}
}
impl Debug for CartSession {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CartSession").field("attached", &self.is_attached()).finish()
	}
}
