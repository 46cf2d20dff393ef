//! Sales channel configuration for the identity endpoint and the commerce API.
//!
//! # Environment Variables
//!
//! ## Required
//! - `COMMERCE_LAYER_CLIENT_ID` - Sales channel client identifier
//! - `COMMERCE_LAYER_SCOPE` - Token scope, e.g. `market:id:ElDkXhpEGg`
//! - `COMMERCE_LAYER_ENDPOINT` - Organization base URL, or
//! - `COMMERCE_LAYER_ORGANIZATION` - Organization slug (`https://{slug}.commercelayer.io`)
//!
//! ## Optional
//! - `COMMERCE_LAYER_CLIENT_SECRET` - Secret for integration (confidential) clients
//! - `COMMERCE_LAYER_AUTH_ENDPOINT` - Identity base URL (default: `https://auth.commercelayer.io`)

// std
use std::env;
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Identity base used when none is configured.
pub const DEFAULT_IDENTITY_ENDPOINT: &str = "https://auth.commercelayer.io";

const ENV_CLIENT_ID: &str = "COMMERCE_LAYER_CLIENT_ID";
const ENV_SCOPE: &str = "COMMERCE_LAYER_SCOPE";
const ENV_ENDPOINT: &str = "COMMERCE_LAYER_ENDPOINT";
const ENV_ORGANIZATION: &str = "COMMERCE_LAYER_ORGANIZATION";
const ENV_CLIENT_SECRET: &str = "COMMERCE_LAYER_CLIENT_SECRET";
const ENV_AUTH_ENDPOINT: &str = "COMMERCE_LAYER_AUTH_ENDPOINT";

/// Validated configuration consumed by the authenticator and the API client.
#[derive(Clone, Debug)]
pub struct CommerceConfig {
	/// OAuth client identifier of the sales channel.
	pub client_id: String,
	/// Optional client secret for integration clients.
	pub client_secret: Option<TokenSecret>,
	/// Space-delimited scope requested on every exchange.
	pub scope: String,
	/// JSON:API base, i.e. `{endpoint}/api`.
	pub api_endpoint: Url,
	/// Client-credentials token endpoint, i.e. `{identity}/oauth/token`.
	pub token_endpoint: Url,
}
impl CommerceConfig {
	/// Creates a new builder for the provided client identifier.
	pub fn builder(client_id: impl Into<String>) -> CommerceConfigBuilder {
		CommerceConfigBuilder::new(client_id)
	}

	/// Loads the configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Loads the configuration from an arbitrary variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
		let client_id = read(ENV_CLIENT_ID).ok_or(ConfigError::MissingEnvVar { name: ENV_CLIENT_ID })?;
		let scope = read(ENV_SCOPE).ok_or(ConfigError::MissingEnvVar { name: ENV_SCOPE })?;
		let mut builder = Self::builder(client_id).scope(scope);

		builder = match (read(ENV_ENDPOINT), read(ENV_ORGANIZATION)) {
			(Some(endpoint), _) => builder.endpoint(parse_url("api", &endpoint)?),
			(None, Some(organization)) => builder.organization(organization),
			(None, None) => return Err(ConfigError::MissingEnvVar { name: ENV_ENDPOINT }),
		};

		if let Some(secret) = read(ENV_CLIENT_SECRET) {
			builder = builder.client_secret(secret);
		}
		if let Some(identity) = read(ENV_AUTH_ENDPOINT) {
			builder = builder.identity_endpoint(parse_url("identity", &identity)?);
		}

		builder.build()
	}
}

/// Builder for [`CommerceConfig`] values.
#[derive(Debug)]
pub struct CommerceConfigBuilder {
	client_id: String,
	client_secret: Option<TokenSecret>,
	scope: Option<String>,
	endpoint: Option<Url>,
	organization: Option<String>,
	identity_endpoint: Option<Url>,
}
impl CommerceConfigBuilder {
	fn new(client_id: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: None,
			scope: None,
			endpoint: None,
			organization: None,
			identity_endpoint: None,
		}
	}

	/// Sets the requested token scope.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Sets the client secret for integration clients.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(TokenSecret::new(secret));

		self
	}

	/// Sets the organization base URL (the `/api` suffix is appended).
	pub fn endpoint(mut self, url: Url) -> Self {
		self.endpoint = Some(url);

		self
	}

	/// Derives the organization base URL from its slug when no endpoint is set.
	pub fn organization(mut self, slug: impl Into<String>) -> Self {
		self.organization = Some(slug.into());

		self
	}

	/// Overrides the identity base URL (the `/oauth/token` suffix is appended).
	pub fn identity_endpoint(mut self, url: Url) -> Self {
		self.identity_endpoint = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<CommerceConfig, ConfigError> {
		if self.client_id.trim().is_empty() {
			return Err(ConfigError::MissingField { field: "client id" });
		}

		let scope = self
			.scope
			.filter(|scope| !scope.trim().is_empty())
			.ok_or(ConfigError::MissingField { field: "scope" })?;
		let endpoint = match (self.endpoint, self.organization) {
			(Some(url), _) => url,
			(None, Some(slug)) => parse_url("api", &format!("https://{slug}.commercelayer.io"))?,
			(None, None) => return Err(ConfigError::MissingField { field: "API endpoint" }),
		};
		let identity = match self.identity_endpoint {
			Some(url) => url,
			None => parse_url("identity", DEFAULT_IDENTITY_ENDPOINT)?,
		};
		let api_endpoint = join_path("api", endpoint, &["api"])?;
		let token_endpoint = join_path("identity", identity, &["oauth", "token"])?;

		Ok(CommerceConfig {
			client_id: self.client_id,
			client_secret: self.client_secret,
			scope,
			api_endpoint,
			token_endpoint,
		})
	}
}

fn parse_url(endpoint: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidEndpoint { endpoint, url: raw.into() })
}

fn join_path(endpoint: &'static str, mut url: Url, segments: &[&str]) -> Result<Url, ConfigError> {
	validate_endpoint(endpoint, &url)?;

	let raw = url.to_string();

	url.path_segments_mut()
		.map_err(|_| ConfigError::InvalidEndpoint { endpoint, url: raw })?
		.pop_if_empty()
		.extend(segments);
	url.set_query(None);
	url.set_fragment(None);

	Ok(url)
}

fn validate_endpoint(endpoint: &'static str, url: &Url) -> Result<(), ConfigError> {
	let loopback = matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"));

	match url.scheme() {
		"https" => Ok(()),
		"http" if loopback => Ok(()),
		_ => Err(ConfigError::InsecureEndpoint { endpoint, url: url.to_string() }),
	}
}
