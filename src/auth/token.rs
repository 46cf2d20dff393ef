//! Client-credentials access token record and its staleness policy.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Access token issued by the Commerce Layer identity endpoint.
///
/// The serialized form (`{"accessToken": "...", "expires": "<RFC 3339>"}`) is what token
/// stores persist. Records are replaced wholesale on refresh and never mutated in place.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
	/// Bearer secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Absolute expiry instant.
	#[serde(with = "time::serde::rfc3339")]
	pub expires: OffsetDateTime,
}
impl AccessToken {
	/// Tokens are refreshed once the clock is within this window of the expiry.
	pub const REFRESH_WINDOW: Duration = Duration::minutes(5);

	/// Creates a record from a raw secret and an absolute expiry.
	pub fn new(access_token: impl Into<String>, expires: OffsetDateTime) -> Self {
		Self { access_token: TokenSecret::new(access_token), expires }
	}

	/// Returns the bearer value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		self.access_token.expose()
	}

	/// Returns `true` once `instant` falls inside the refresh window.
	pub fn is_stale_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires - Self::REFRESH_WINDOW
	}

	/// Convenience helper that checks staleness against the current UTC instant.
	pub fn is_stale(&self) -> bool {
		self.is_stale_at(OffsetDateTime::now_utc())
	}

	/// Remaining lifetime at `instant`, clamped at zero.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expires - instant;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}

	/// Remaining lifetime at `instant` expressed in fractional days.
	pub fn lifetime_days_at(&self, instant: OffsetDateTime) -> f64 {
		self.remaining_at(instant).as_seconds_f64() / 86_400.
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("access_token", &"<redacted>")
			.field("expires", &self.expires)
			.finish()
	}
}
