//! Observability helpers shared by the authenticator, cart, and catalog operations.
//!
//! Every operation runs inside a structured span named `commerce_cart.operation` carrying the
//! `operation` and `stage` fields.
//!
//! # Feature Flags
//!
//! - Enable `metrics` to increment the `commerce_cart_operation_total` counter for every
//!   attempt, success, and failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Storefront operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Client-credentials token acquisition.
	Authenticate,
	/// Cart resynchronization.
	FetchCart,
	/// Add-to-cart mutation.
	AddToCart,
	/// Remove-from-cart mutation.
	RemoveFromCart,
	/// Paginated product listing.
	ListProducts,
	/// Single product lookup.
	RetrieveProduct,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Authenticate => "authenticate",
			Operation::FetchCart => "fetch_cart",
			Operation::AddToCart => "add_to_cart",
			Operation::RemoveFromCart => "remove_from_cart",
			Operation::ListProducts => "list_products",
			Operation::RetrieveProduct => "retrieve_product",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside an operation span and records attempt plus outcome.
pub(crate) async fn observe<T, Fut>(
	operation: Operation,
	stage: &'static str,
	fut: Fut,
) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = OperationSpan::new(operation, stage);

	record_operation_outcome(operation, Outcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_operation_outcome(operation, Outcome::Success),
		Err(_) => record_operation_outcome(operation, Outcome::Failure),
	}

	result
}
