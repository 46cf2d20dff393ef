//! Strongly typed identifiers for Commerce Layer resources.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (order, line item, sku, product).
		kind: &'static str,
	},
	/// The identifier contains whitespace or control characters.
	#[error("{kind} identifier contains whitespace or control characters.")]
	InvalidCharacter {
		/// Kind of identifier (order, line item, sku, product).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed length.
	#[error("{kind} identifier exceeds {max} bytes.")]
	TooLong {
		/// Kind of identifier (order, line item, sku, product).
		kind: &'static str,
		/// Maximum permitted length.
		max: usize,
	},
}

def_id! { OrderId, "Remote order identifier; doubles as the cart identifier.", "Order" }
def_id! { LineItemId, "Remote line item identifier.", "LineItem" }
def_id! { SkuCode, "Stock-keeping unit code; the cart upsert key.", "Sku" }
def_id! { ProductId, "Catalog sku resource identifier.", "Product" }

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(|c| c.is_whitespace() || c.is_control()) {
		return Err(IdentifierError::InvalidCharacter { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_blank_and_spaced_values() {
		assert!(OrderId::new("").is_err());
		assert!(OrderId::new(" xYZkjABcde").is_err(), "Leading whitespace must be rejected.");
		assert!(SkuCode::new("TSHIRT\tXL").is_err());

		let order = OrderId::new("xYZkjABcde").expect("Order fixture should be valid.");

		assert_eq!(order.as_ref(), "xYZkjABcde");
		assert_eq!(format!("{order:?}"), "Order(xYZkjABcde)");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let sku: SkuCode =
			serde_json::from_str("\"TSHIRTMM000000FFFFFFXLXX\"").expect("Sku should deserialize.");

		assert_eq!(sku.as_ref(), "TSHIRTMM000000FFFFFFXLXX");
		assert!(serde_json::from_str::<SkuCode>("\"\"").is_err());
		assert!(serde_json::from_str::<LineItemId>("\"with space\"").is_err());
	}

	#[test]
	fn length_limit_is_inclusive() {
		ProductId::new("a".repeat(IDENTIFIER_MAX_LEN)).expect("Exact length should succeed.");

		assert!(ProductId::new("a".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<SkuCode, u32> = HashMap::from_iter([(
			SkuCode::new("ABC").expect("Sku used for lookup should be valid."),
			2_u32,
		)]);

		assert_eq!(map.get("ABC"), Some(&2));
	}
}
