//! Client-credentials exchange against the Commerce Layer identity endpoint.

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError,
	RequestTokenError, Scope, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	config::CommerceConfig,
	error::{AuthenticationError, ConfigError, TransportError},
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;
type FacadeTokenResponse = oauth2::basic::BasicTokenResponse;

/// Pre-built `client_credentials` request for one configured sales channel.
pub(crate) struct ClientCredentialsExchange {
	oauth_client: ConfiguredBasicClient,
	scopes: Vec<String>,
	http_client: ReqwestHttpClient,
}
impl ClientCredentialsExchange {
	pub(crate) fn from_config(
		config: &CommerceConfig,
		http_client: ReqwestHttpClient,
	) -> Result<Self> {
		let token_url = TokenUrl::new(config.token_endpoint.to_string()).map_err(|_| {
			ConfigError::InvalidEndpoint {
				endpoint: "token",
				url: config.token_endpoint.to_string(),
			}
		})?;
		let mut oauth_client =
			BasicClient::new(ClientId::new(config.client_id.clone())).set_token_uri(token_url);

		// Commerce Layer expects client credentials in the form body.
		if let Some(secret) = config.client_secret.as_ref() {
			oauth_client = oauth_client
				.set_client_secret(ClientSecret::new(secret.expose().to_owned()))
				.set_auth_type(AuthType::RequestBody);
		}

		Ok(Self {
			oauth_client,
			scopes: config.scope.split_whitespace().map(str::to_owned).collect(),
			http_client,
		})
	}

	/// Performs one exchange; failures are never retried here.
	pub(crate) async fn exchange(&self) -> Result<AccessToken> {
		let meta = ResponseMetadataSlot::default();
		let handle = self.http_client.exchange_handle(meta.clone());
		let mut request = self.oauth_client.exchange_client_credentials();

		for scope in &self.scopes {
			request = request.add_scope(Scope::new(scope.clone()));
		}

		let response = request
			.request_async(&handle)
			.await
			.map_err(|err| map_request_error(meta.take(), err))?;

		map_token_response(response, OffsetDateTime::now_utc())
	}
}

fn map_token_response(
	response: FacadeTokenResponse,
	issued_at: OffsetDateTime,
) -> Result<AccessToken> {
	let expires_in = response.expires_in().ok_or(AuthenticationError::MissingExpiresIn)?.as_secs();
	let expires_in =
		i64::try_from(expires_in).map_err(|_| AuthenticationError::InvalidExpiresIn)?;

	if expires_in <= 0 {
		return Err(AuthenticationError::InvalidExpiresIn.into());
	}

	Ok(AccessToken::new(
		response.access_token().secret().to_owned(),
		issued_at + Duration::seconds(expires_in),
	))
}

fn map_request_error(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
) -> Error {
	let status = meta.and_then(|value| value.status);
	let mapped = match err {
		RequestTokenError::ServerResponse(response) => rejected(&response, status),
		RequestTokenError::Request(error) =>
			AuthenticationError::Transport { source: map_transport_error(error) },
		RequestTokenError::Parse(source, _body) =>
			AuthenticationError::MalformedResponse { source, status },
		RequestTokenError::Other(message) => AuthenticationError::Rejected { reason: message, status },
	};

	mapped.into()
}

fn rejected(response: &BasicErrorResponse, status: Option<u16>) -> AuthenticationError {
	let reason = match response.error_description() {
		Some(description) => description.clone(),
		None => response.error().as_ref().to_owned(),
	};

	AuthenticationError::Rejected { reason, status }
}

fn map_transport_error(err: HttpClientError<ReqwestError>) -> TransportError {
	match err {
		HttpClientError::Reqwest(inner) => TransportError::from(*inner),
		HttpClientError::Http(inner) => TransportError::network(inner),
		HttpClientError::Io(inner) => TransportError::Io(inner),
		HttpClientError::Other(message) => TransportError::Io(std::io::Error::other(message)),
		_ => TransportError::Io(std::io::Error::other("HTTP client error.")),
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::{AccessToken as OAuthAccessToken, EmptyExtraTokenFields, basic::BasicTokenType};
	use time::macros;
	// self
	use super::*;

	fn response(expires_in: Option<u64>) -> FacadeTokenResponse {
		let mut response = FacadeTokenResponse::new(
			OAuthAccessToken::new("issued".into()),
			BasicTokenType::Bearer,
			EmptyExtraTokenFields {},
		);

		response.set_expires_in(expires_in.map(std::time::Duration::from_secs).as_ref());

		response
	}

	#[test]
	fn expiry_is_derived_from_expires_in() {
		let issued_at = macros::datetime!(2025-01-01 00:00 UTC);
		let token = map_token_response(response(Some(14_400)), issued_at)
			.expect("Token response with expires_in should map.");

		assert_eq!(token.expose(), "issued");
		assert_eq!(token.expires, macros::datetime!(2025-01-01 04:00 UTC));
	}

	#[test]
	fn missing_or_zero_expiry_is_rejected() {
		let issued_at = OffsetDateTime::now_utc();

		assert!(matches!(
			map_token_response(response(None), issued_at),
			Err(Error::Authentication(AuthenticationError::MissingExpiresIn))
		));
		assert!(matches!(
			map_token_response(response(Some(0)), issued_at),
			Err(Error::Authentication(AuthenticationError::InvalidExpiresIn))
		));
	}
}
