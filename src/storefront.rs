//! One-stop wiring of the authenticator, cart synchronizer, and catalog.

// self
use crate::{
	_prelude::*,
	api::CommerceApi,
	auth::Authenticator,
	cart::CartSynchronizer,
	catalog::Catalog,
	config::CommerceConfig,
	error::ConfigError,
	http::ReqwestHttpClient,
	session::CartSession,
	store::TokenStore,
};

/// Storefront services for one browsing session.
#[derive(Clone, Debug)]
pub struct Storefront {
	authenticator: Arc<Authenticator>,
	cart: Arc<CartSynchronizer>,
	catalog: Catalog,
}
impl Storefront {
	/// Builds the services with a default reqwest client.
	pub fn new(
		config: &CommerceConfig,
		token_store: Arc<dyn TokenStore>,
		session: CartSession,
	) -> Result<Self> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(ConfigError::from)?;

		Self::with_http_client(config, token_store, session, ReqwestHttpClient::with_client(client))
	}

	/// Builds the services on top of a caller-supplied HTTP client.
	pub fn with_http_client(
		config: &CommerceConfig,
		token_store: Arc<dyn TokenStore>,
		session: CartSession,
		http_client: ReqwestHttpClient,
	) -> Result<Self> {
		let authenticator =
			Arc::new(Authenticator::new(config, token_store, http_client.clone())?);
		let api = CommerceApi::new(http_client, config.api_endpoint.clone());
		let cart = Arc::new(CartSynchronizer::new(api.clone(), authenticator.clone(), session));
		let catalog = Catalog::new(api, authenticator.clone());

		Ok(Self { authenticator, cart, catalog })
	}

	/// Shared authenticator.
	pub fn authenticator(&self) -> &Arc<Authenticator> {
		&self.authenticator
	}

	/// Cart synchronizer bound to the session.
	pub fn cart(&self) -> &Arc<CartSynchronizer> {
		&self.cart
	}

	/// Product catalog.
	pub fn catalog(&self) -> &Catalog {
		&self.catalog
	}
}
