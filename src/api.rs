//! Commerce Layer JSON:API surface: request catalog, document schema, and HTTP client.

pub mod client;
pub mod document;

pub use client::*;
pub use document::*;

// self
use crate::_prelude::*;

/// Requests issued against the commerce API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiOperation {
	/// `POST /orders`.
	CreateOrder,
	/// `GET /orders/{id}` with included line items.
	FetchOrder,
	/// `GET /orders/{id}/line_items` filtered by sku code.
	ListLineItems,
	/// `POST /line_items`.
	AddLineItem,
	/// `DELETE /line_items/{id}`.
	RemoveLineItem,
	/// `GET /skus`.
	ListSkus,
	/// `GET /skus/{id}`.
	RetrieveSku,
}
impl ApiOperation {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ApiOperation::CreateOrder => "create_order",
			ApiOperation::FetchOrder => "fetch_order",
			ApiOperation::ListLineItems => "list_line_items",
			ApiOperation::AddLineItem => "add_line_item",
			ApiOperation::RemoveLineItem => "remove_line_item",
			ApiOperation::ListSkus => "list_skus",
			ApiOperation::RetrieveSku => "retrieve_sku",
		}
	}

	/// Message shown to shoppers when the request fails.
	pub const fn failure_message(self) -> &'static str {
		match self {
			ApiOperation::CreateOrder => "Failed to create cart",
			ApiOperation::FetchOrder | ApiOperation::ListLineItems => "Failed to fetch cart items",
			ApiOperation::AddLineItem => "Failed to add item to cart",
			ApiOperation::RemoveLineItem => "Failed to remove item from cart",
			ApiOperation::ListSkus => "Failed to fetch products from Commerce Layer",
			ApiOperation::RetrieveSku => "Failed to fetch product",
		}
	}
}
impl Display for ApiOperation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// JSON:API resource types this crate understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
	/// Orders (carts).
	Orders,
	/// Order line items.
	LineItems,
	/// Catalog skus.
	Skus,
	/// Sku prices.
	Prices,
	/// Sku attachments (images, documents).
	Attachments,
	/// Anything else; never serialized.
	#[serde(other)]
	Unknown,
}
impl ResourceType {
	/// Returns the wire name.
	pub const fn as_str(self) -> &'static str {
		match self {
			ResourceType::Orders => "orders",
			ResourceType::LineItems => "line_items",
			ResourceType::Skus => "skus",
			ResourceType::Prices => "prices",
			ResourceType::Attachments => "attachments",
			ResourceType::Unknown => "unknown",
		}
	}
}
impl Display for ResourceType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn resource_types_use_wire_names() {
		let parsed: ResourceType =
			serde_json::from_str("\"line_items\"").expect("Known type should parse.");

		assert_eq!(parsed, ResourceType::LineItems);
		assert_eq!(parsed.to_string(), "line_items");

		let parsed: ResourceType =
			serde_json::from_str("\"shipments\"").expect("Unknown type should parse.");

		assert_eq!(parsed, ResourceType::Unknown);
	}

	#[test]
	fn operations_share_cart_failure_messages() {
		assert_eq!(
			ApiOperation::FetchOrder.failure_message(),
			ApiOperation::ListLineItems.failure_message()
		);
		assert_eq!(ApiOperation::AddLineItem.failure_message(), "Failed to add item to cart");
	}
}
