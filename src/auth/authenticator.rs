//! Self-refreshing client-credentials authenticator.
//!
//! [`Authenticator::ensure_token`] serves the persisted token while it sits outside the
//! refresh window and otherwise performs exactly one exchange, even when many callers
//! race: the first caller holds the refresh guard while the rest wait and then observe the
//! freshly written record.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	config::CommerceConfig,
	http::ReqwestHttpClient,
	oauth::ClientCredentialsExchange,
	obs::{self, Operation},
	store::TokenStore,
};

/// Issues and caches storefront access tokens.
pub struct Authenticator {
	exchange: ClientCredentialsExchange,
	store: Arc<dyn TokenStore>,
	refresh_guard: AsyncMutex<()>,
}
impl Authenticator {
	/// Builds an authenticator that persists tokens in `store`.
	pub fn new(
		config: &CommerceConfig,
		store: Arc<dyn TokenStore>,
		http_client: ReqwestHttpClient,
	) -> Result<Self> {
		let exchange = ClientCredentialsExchange::from_config(config, http_client)?;

		Ok(Self { exchange, store, refresh_guard: AsyncMutex::new(()) })
	}

	/// Returns the token store backing this authenticator.
	pub fn store(&self) -> &Arc<dyn TokenStore> {
		&self.store
	}

	/// Returns a usable token, exchanging credentials only when the stored one is stale.
	pub async fn ensure_token(&self) -> Result<AccessToken> {
		if let Some(token) = self.fresh_token().await? {
			return Ok(token);
		}

		obs::observe(Operation::Authenticate, "ensure_token", async {
			let _singleflight = self.refresh_guard.lock().await;

			// Another caller may have refreshed while this one waited for the guard.
			if let Some(token) = self.fresh_token().await? {
				return Ok(token);
			}

			self.exchange_and_store().await
		})
		.await
	}

	/// Forces a new exchange regardless of the stored token's freshness.
	pub async fn refresh(&self) -> Result<AccessToken> {
		obs::observe(Operation::Authenticate, "refresh", async {
			let _singleflight = self.refresh_guard.lock().await;

			self.exchange_and_store().await
		})
		.await
	}

	async fn fresh_token(&self) -> Result<Option<AccessToken>> {
		let now = OffsetDateTime::now_utc();
		let token = self.store.read().await?.filter(|token| !token.is_stale_at(now));

		Ok(token)
	}

	async fn exchange_and_store(&self) -> Result<AccessToken> {
		let token = self.exchange.exchange().await?;

		tracing::debug!(
			lifetime_days = token.lifetime_days_at(OffsetDateTime::now_utc()),
			"Issued a new storefront access token."
		);

		self.store.write(token.clone()).await?;

		Ok(token)
	}
}
impl Debug for Authenticator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator").finish_non_exhaustive()
	}
}
