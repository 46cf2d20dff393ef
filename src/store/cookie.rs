//! Browser-cookie [`TokenStore`] mirroring how storefront clients persist the token.
//!
//! The record lives in a single cookie named [`AUTH_COOKIE_NAME`] whose value is the JSON
//! form of [`AccessToken`]. The cookie is `Secure`, `SameSite=Strict`, scoped to `/`, and
//! expires together with the token. Request cookies are loaded with
//! [`CookieTokenStore::from_request_header`]; pending changes are emitted with
//! [`CookieTokenStore::set_cookie_headers`].

// crates.io
use cookie::{Cookie, CookieJar, SameSite};
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	store::{self, StoreFuture, TokenStore},
};

/// Cookie that carries the serialized access token.
pub const AUTH_COOKIE_NAME: &str = "commerce_layer_auth";

/// Token store backed by a [`CookieJar`] shared between clones.
#[derive(Clone, Debug, Default)]
pub struct CookieTokenStore {
	jar: Arc<Mutex<CookieJar>>,
}
impl CookieTokenStore {
	/// Wraps an existing jar, e.g. one populated by a web framework.
	pub fn with_jar(jar: CookieJar) -> Self {
		Self { jar: Arc::new(Mutex::new(jar)) }
	}

	/// Seeds the jar from a raw `Cookie` request header; malformed pairs are skipped.
	pub fn from_request_header(header: &str) -> Self {
		let mut jar = CookieJar::new();

		for cookie in Cookie::split_parse_encoded(header.to_owned()).flatten() {
			jar.add_original(cookie.into_owned());
		}

		Self::with_jar(jar)
	}

	/// Returns a copy of the underlying jar.
	pub fn jar(&self) -> CookieJar {
		self.jar.lock().clone()
	}

	/// Returns the current auth cookie, if set.
	pub fn cookie(&self) -> Option<Cookie<'static>> {
		self.jar.lock().get(AUTH_COOKIE_NAME).cloned()
	}

	/// Encoded `Set-Cookie` values for every cookie changed since the jar was loaded.
	pub fn set_cookie_headers(&self) -> Vec<String> {
		self.jar.lock().delta().map(|cookie| cookie.encoded().to_string()).collect()
	}

	fn build_cookie(token: &AccessToken, value: String, now: OffsetDateTime) -> Cookie<'static> {
		Cookie::build((AUTH_COOKIE_NAME, value))
			.path("/")
			.secure(true)
			.same_site(SameSite::Strict)
			.max_age(token.remaining_at(now))
			.expires(token.expires)
			.build()
	}

	fn load(&self, now: OffsetDateTime) -> Option<AccessToken> {
		let jar = self.jar.lock();
		let cookie = jar.get(AUTH_COOKIE_NAME)?;

		if cookie.expires_datetime().is_some_and(|expires| expires <= now) {
			return None;
		}

		store::decode_record(cookie.value(), "cookie")
	}
}
impl TokenStore for CookieTokenStore {
	fn read(&self) -> StoreFuture<'_, Option<AccessToken>> {
		Box::pin(async move { Ok(self.load(OffsetDateTime::now_utc())) })
	}

	fn write(&self, token: AccessToken) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let value = store::encode_record(&token)?;
			let cookie = Self::build_cookie(&token, value, OffsetDateTime::now_utc());

			self.jar.lock().add(cookie);

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn written_cookie_carries_the_expected_attributes() {
		let store = CookieTokenStore::default();
		let expires = OffsetDateTime::now_utc() + Duration::hours(4);

		store.write(AccessToken::new("abc", expires)).await.expect("Cookie write should succeed.");

		let cookie = store.cookie().expect("Auth cookie should be set.");

		assert_eq!(cookie.path(), Some("/"));
		assert_eq!(cookie.secure(), Some(true));
		assert_eq!(cookie.same_site(), Some(SameSite::Strict));
		assert_eq!(
			cookie.expires_datetime().map(|value| value.unix_timestamp()),
			Some(expires.unix_timestamp())
		);

		let token = store.read().await.expect("Cookie read should succeed.");

		assert_eq!(token.map(|token| token.expose().to_owned()), Some("abc".into()));
		assert_eq!(store.set_cookie_headers().len(), 1);
	}

	#[tokio::test]
	async fn request_header_round_trips_through_set_cookie() {
		let writer = CookieTokenStore::default();
		let expires = OffsetDateTime::now_utc() + Duration::hours(1);

		writer.write(AccessToken::new("abc", expires)).await.expect("Cookie write should succeed.");

		let set_cookie = writer.set_cookie_headers().remove(0);
		let pair = set_cookie.split(';').next().expect("Set-Cookie should start with the pair.");
		let reader = CookieTokenStore::from_request_header(&format!("theme=dark; {pair}"));
		let token = reader
			.read()
			.await
			.expect("Cookie read should succeed.")
			.expect("Request cookie should decode into a token.");

		assert_eq!(token.expose(), "abc");
		assert!(reader.set_cookie_headers().is_empty());
	}

	#[tokio::test]
	async fn garbage_cookie_reads_as_absent() {
		let store = CookieTokenStore::from_request_header("commerce_layer_auth=garbage");

		assert!(store.read().await.expect("Garbage should not surface as an error.").is_none());
	}
}
