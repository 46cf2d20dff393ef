//! Cart synchronizer: the create-order, add, remove, and fetch protocol.
//!
//! The remote order is the source of truth. Every mutation ends with a full resync so the
//! published [`CartState`] is replaced wholesale rather than patched. Failures never escape
//! the public operations; they are logged and surfaced through [`CartState::error`].
//!
//! Mutations are serialized through one async mutex. Two overlapping adds on a session
//! without a cart therefore create a single order: the second add observes the identifier
//! persisted by the first.

// crates.io
use tokio::sync::watch;
// self
use crate::{
	_prelude::*,
	api::{CommerceApi, NewLineItem},
	auth::{AccessToken, Authenticator},
	cart::{AddToCart, CartLineItem, CartSnapshot, CartState},
	error::AuthenticationError,
	id::{LineItemId, OrderId, SkuCode},
	obs::{self, Operation},
	session::CartSession,
};

/// Owns the cart state of one browsing session and keeps it in sync with the remote order.
pub struct CartSynchronizer {
	api: CommerceApi,
	authenticator: Arc<Authenticator>,
	session: CartSession,
	state: watch::Sender<CartState>,
	mutations: AsyncMutex<()>,
}
impl CartSynchronizer {
	/// Creates a synchronizer seeded with the cart id persisted in `session`.
	pub fn new(api: CommerceApi, authenticator: Arc<Authenticator>, session: CartSession) -> Self {
		let initial = CartState { cart_id: session.cart_id(), ..Default::default() };
		let (state, _) = watch::channel(initial);

		Self { api, authenticator, session, state, mutations: AsyncMutex::new(()) }
	}

	/// Current state snapshot.
	pub fn state(&self) -> CartState {
		self.state.borrow().clone()
	}

	/// Receiver notified on every state change.
	pub fn subscribe(&self) -> watch::Receiver<CartState> {
		self.state.subscribe()
	}

	/// Session the cart id is persisted in.
	pub fn session(&self) -> &CartSession {
		&self.session
	}

	/// Active cart id; the session wins over the in-memory copy.
	pub fn cart_id(&self) -> Option<OrderId> {
		self.session.cart_id().or_else(|| self.state.borrow().cart_id.clone())
	}

	/// Resynchronizes from the remote order and returns the sku line items.
	///
	/// Without a cart id this reports an empty cart and makes no network call.
	pub async fn fetch_cart(&self) -> Vec<CartLineItem> {
		let _loading = LoadingGuard::start(&self.state);
		let result = obs::observe(Operation::FetchCart, "fetch_cart", self.resync()).await;

		match result {
			Ok(items) => items,
			Err(e) => {
				self.record_failure(Operation::FetchCart, &e);

				Vec::new()
			},
		}
	}

	/// Adds (or increments) a sku, creating the cart first when the session has none.
	pub async fn add_to_cart(&self, request: AddToCart) {
		let _loading = LoadingGuard::start(&self.state);
		let result = obs::observe(Operation::AddToCart, "add_to_cart", self.add(request)).await;

		if let Err(e) = result {
			self.record_failure(Operation::AddToCart, &e);
		}
	}

	/// Removes the first line item matching `sku_code`.
	pub async fn remove_from_cart(&self, sku_code: &SkuCode) {
		let _loading = LoadingGuard::start(&self.state);
		let result =
			obs::observe(Operation::RemoveFromCart, "remove_from_cart", self.remove(sku_code)).await;

		if let Err(e) = result {
			self.record_failure(Operation::RemoveFromCart, &e);
		}
	}

	async fn add(&self, request: AddToCart) -> Result<()> {
		let token = self.token().await?;
		let _serialized = self.mutations.lock().await;
		let cart_id = match self.cart_id() {
			Some(cart_id) => cart_id,
			// A failed creation is reported as is; there is no cart to resync.
			None => self.create_cart(&token).await?,
		};
		let body = NewLineItem::upsert(
			&cart_id,
			&request.sku_code,
			request.quantity.get(),
			request.image_url.as_deref(),
			request.name.as_deref(),
		);
		let added = self.api.add_line_item(&token, &body).await;
		let resynced = self.resync().await;

		added?;
		resynced?;

		Ok(())
	}

	async fn remove(&self, sku_code: &SkuCode) -> Result<()> {
		let cart_id = self.cart_id().ok_or(Error::MissingCart)?;
		let token = self.token().await?;
		let _serialized = self.mutations.lock().await;
		let line_item = self
			.api
			.list_line_items(&token, &cart_id, sku_code)
			.await?
			.into_iter()
			.find(|item| item.attributes.sku_code.as_deref() == Some(sku_code.as_ref()))
			.ok_or_else(|| Error::NotFound { sku: sku_code.clone() })?;
		let line_item_id = LineItemId::new(line_item.id)?;

		self.api.delete_line_item(&token, &line_item_id).await?;
		self.resync().await?;

		Ok(())
	}

	async fn resync(&self) -> Result<Vec<CartLineItem>> {
		let Some(cart_id) = self.cart_id() else {
			self.state.send_modify(|state| {
				state.items.clear();
				state.summary = None;
			});

			return Ok(Vec::new());
		};
		let token = self.token().await?;

		match self.api.fetch_order(&token, &cart_id).await {
			Ok(document) => {
				let CartSnapshot { items, summary } = CartSnapshot::from_order(&document);

				tracing::debug!(cart_id = %cart_id, items = items.len(), "Cart resynchronized.");

				self.state.send_modify(|state| {
					state.cart_id = Some(cart_id);
					state.items = items.clone();
					state.summary = summary;
				});

				Ok(items)
			},
			Err(e) => {
				self.state.send_modify(|state| {
					state.items.clear();
					state.summary = None;
				});

				Err(e)
			},
		}
	}

	async fn create_cart(&self, token: &AccessToken) -> Result<OrderId> {
		let cart_id = self.api.create_order(token).await?;

		tracing::info!(cart_id = %cart_id, "Created a new cart.");

		self.session.set_cart_id(&cart_id);
		self.state.send_modify(|state| state.cart_id = Some(cart_id.clone()));

		Ok(cart_id)
	}

	async fn token(&self) -> Result<AccessToken> {
		self.authenticator
			.ensure_token()
			.await
			.map_err(|e| AuthenticationError::Unavailable { source: Box::new(e) }.into())
	}

	fn record_failure(&self, operation: Operation, error: &Error) {
		tracing::warn!(%operation, error = %error, "Cart operation failed.");

		self.state.send_modify(|state| state.error = Some(error.to_string()));
	}
}
impl Debug for CartSynchronizer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CartSynchronizer")
			.field("session", &self.session)
			.field("state", &*self.state.borrow())
			.finish_non_exhaustive()
	}
}

/// Keeps [`CartState::loading`] raised until every in-flight operation has exited.
struct LoadingGuard<'a> {
	state: &'a watch::Sender<CartState>,
}
impl<'a> LoadingGuard<'a> {
	fn start(state: &'a watch::Sender<CartState>) -> Self {
		state.send_modify(|state| {
			state.in_flight += 1;
			state.loading = true;
			state.error = None;
		});

		Self { state }
	}
}
impl Drop for LoadingGuard<'_> {
	fn drop(&mut self) {
		self.state.send_modify(|state| {
			state.in_flight = state.in_flight.saturating_sub(1);
			state.loading = state.in_flight > 0;
		});
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn loading_stays_raised_until_the_last_guard_drops() {
		let (state, receiver) = watch::channel(CartState {
			error: Some("Failed to fetch cart items (HTTP 500).".into()),
			..Default::default()
		});
		let first = LoadingGuard::start(&state);

		assert!(receiver.borrow().loading);
		assert!(receiver.borrow().error.is_none());

		let second = LoadingGuard::start(&state);

		drop(first);

		assert!(receiver.borrow().loading);

		drop(second);

		assert!(!receiver.borrow().loading);
		assert_eq!(receiver.borrow().in_flight, 0);
	}
}
