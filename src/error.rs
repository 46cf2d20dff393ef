//! Crate-level error types shared by the authenticator, stores, and cart operations.

// self
use crate::{_prelude::*, api::ApiOperation, id::SkuCode};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// No usable access token could be obtained.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be understood.
	#[error(transparent)]
	Parse(#[from] ParseError),

	/// Commerce API answered with a non-success status.
	#[error("{} (HTTP {status}).", operation.failure_message())]
	Network {
		/// Request that failed.
		operation: ApiOperation,
		/// HTTP status code returned by the API.
		status: u16,
		/// First JSON:API error detail, when the body carried one.
		detail: Option<String>,
	},
	/// No line item in the cart matches the requested sku.
	#[error("Item not found in cart: {sku}.")]
	NotFound {
		/// Sku code that was looked up.
		sku: SkuCode,
	},
	/// The operation needs a cart but the session does not hold one.
	#[error("No cart found for this session.")]
	MissingCart,
}
impl From<crate::id::IdentifierError> for Error {
	fn from(e: crate::id::IdentifierError) -> Self {
		ParseError::from(e).into()
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Required environment variable is not set.
	#[error("Missing environment variable: {name}.")]
	MissingEnvVar {
		/// Variable name.
		name: &'static str,
	},
	/// Required builder field was never supplied.
	#[error("Configuration is missing the {field}.")]
	MissingField {
		/// Field label.
		field: &'static str,
	},
	/// Endpoint cannot be parsed or extended.
	#[error("The {endpoint} endpoint is invalid: {url}.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Offending value.
		url: String,
	},
	/// Endpoints must use HTTPS outside of loopback hosts.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised while obtaining an access token.
#[derive(Debug, ThisError)]
pub enum AuthenticationError {
	/// Identity endpoint rejected the client-credentials exchange.
	#[error("Failed to authenticate with Commerce Layer: {reason}.")]
	Rejected {
		/// Provider-supplied reason string.
		reason: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Identity endpoint could not be reached.
	#[error("Failed to authenticate with Commerce Layer.")]
	Transport {
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// Identity endpoint answered with malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned a zero or out-of-range `expires_in`.
	#[error("The expires_in value must be a positive number of seconds.")]
	InvalidExpiresIn,
	/// A cart operation could not obtain a token.
	#[error("No access token found. Please authenticate.")]
	Unavailable {
		/// Failure reported by the authenticator.
		#[source]
		source: Box<Error>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling Commerce Layer.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling Commerce Layer.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Response payloads that do not match the expected JSON:API shape.
#[derive(Debug, ThisError)]
pub enum ParseError {
	/// Body is not valid JSON for the expected document.
	#[error("Commerce API returned malformed JSON for {operation}.")]
	Json {
		/// Request whose response failed to parse.
		operation: ApiOperation,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Request body could not be encoded.
	#[error("Failed to encode the {operation} request body.")]
	Encode {
		/// Request whose body failed to encode.
		operation: ApiOperation,
		/// Encoder failure.
		#[source]
		source: serde_json::Error,
	},
	/// Primary resource has a different type than requested.
	#[error("Expected a `{expected}` resource but received `{found}`.")]
	UnexpectedResource {
		/// Resource type the request asked for.
		expected: crate::api::ResourceType,
		/// Resource type the API returned.
		found: crate::api::ResourceType,
	},
	/// Response carried an identifier that fails validation.
	#[error(transparent)]
	Identifier(#[from] crate::id::IdentifierError),
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::StoreError;

	#[test]
	fn store_error_converts_with_source() {
		let store_error = StoreError::Backend { message: "disk unavailable".into() };
		let error: Error = store_error.clone().into();

		assert!(matches!(error, Error::Storage(_)));
		assert!(error.to_string().contains("disk unavailable"));

		let source =
			StdError::source(&error).expect("Crate error should expose the store error as source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn network_errors_describe_the_operation() {
		let error = Error::Network { operation: ApiOperation::FetchOrder, status: 500, detail: None };

		assert_eq!(error.to_string(), "Failed to fetch cart items (HTTP 500).");
	}

	#[test]
	fn unavailable_token_uses_the_storefront_message() {
		let inner = AuthenticationError::Rejected { reason: "invalid_client".into(), status: Some(401) };
		let error: Error = AuthenticationError::Unavailable { source: Box::new(inner.into()) }.into();

		assert_eq!(error.to_string(), "No access token found. Please authenticate.");
		assert!(StdError::source(&error).is_some());
	}
}
