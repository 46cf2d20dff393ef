//! Cart line items, summary, and the state snapshot published to subscribers.

// std
use std::num::NonZeroU32;
// self
use crate::{
	_prelude::*,
	api::{Included, LineItemAttributes, OrderDocument},
	id::{IdentifierError, LineItemId, OrderId, SkuCode},
};

/// A sku line item as surfaced to shoppers. At most one is surfaced per sku code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
	/// Remote line item identifier.
	pub id: LineItemId,
	/// Sku code; the upsert key.
	pub sku_code: SkuCode,
	/// Positive quantity.
	pub quantity: u32,
	/// Display name.
	pub name: Option<String>,
	/// Image reference.
	pub image_url: Option<String>,
	/// Formatted unit price.
	pub formatted_unit_amount: Option<String>,
	/// Formatted line total.
	pub formatted_total_amount: String,
}
impl CartLineItem {
	fn try_from_included(
		id: &str,
		attributes: &LineItemAttributes,
	) -> Result<Self, IdentifierError> {
		Ok(Self {
			id: LineItemId::new(id)?,
			sku_code: SkuCode::new(attributes.sku_code.as_deref().unwrap_or_default())?,
			quantity: attributes.quantity,
			name: attributes.name.clone(),
			image_url: attributes.image_url.clone(),
			formatted_unit_amount: attributes.formatted_unit_amount.clone(),
			formatted_total_amount: text(&attributes.formatted_total_amount),
		})
	}

	fn from_included(id: &str, attributes: &LineItemAttributes) -> Option<Self> {
		match Self::try_from_included(id, attributes) {
			Ok(line_item) => Some(line_item),
			Err(e) => {
				tracing::warn!(line_item = id, error = %e, "Skipping malformed sku line item.");

				None
			},
		}
	}
}

/// Read-only aggregate derived from the order on every fetch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
	/// Human-facing order number.
	pub number: Option<String>,
	/// Number of distinct skus.
	pub skus_count: u32,
	/// Formatted subtotal.
	pub formatted_subtotal_amount: String,
	/// Formatted discount.
	pub formatted_discount_amount: String,
	/// Formatted shipping.
	pub formatted_shipping_amount: String,
	/// Formatted tax.
	pub formatted_total_tax_amount: String,
	/// Formatted gift card amount.
	pub formatted_gift_card_amount: String,
	/// Formatted grand total.
	pub formatted_total_amount_with_taxes: String,
}

/// Snapshot of the cart as last synchronized.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CartState {
	/// Active cart identifier.
	pub cart_id: Option<OrderId>,
	/// Sku line items in server order.
	pub items: Vec<CartLineItem>,
	/// Order summary; absent while the cart holds no sku items.
	pub summary: Option<CartSummary>,
	/// `true` while any operation is in flight.
	pub loading: bool,
	/// Message of the most recent failure, cleared when the next operation starts.
	pub error: Option<String>,
	pub(crate) in_flight: usize,
}
impl CartState {
	/// Sum of all item quantities; the cart badge count.
	pub fn total_quantity(&self) -> u32 {
		self.items.iter().map(|item| item.quantity).sum()
	}

	/// Whether the cart holds no sku items.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

/// Add-to-cart request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddToCart {
	/// Sku to add.
	pub sku_code: SkuCode,
	/// Units to add on top of any existing quantity.
	pub quantity: NonZeroU32,
	/// Image reference stored on the line item.
	pub image_url: Option<String>,
	/// Display name stored on the line item.
	pub name: Option<String>,
}
impl AddToCart {
	/// Adds `quantity` units of `sku_code` without display metadata.
	pub fn new(sku_code: SkuCode, quantity: NonZeroU32) -> Self {
		Self { sku_code, quantity, image_url: None, name: None }
	}

	/// Sets the display name.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Sets the image reference.
	pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
		self.image_url = Some(image_url.into());

		self
	}
}

/// Items and summary extracted from a fetched order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct CartSnapshot {
	pub(crate) items: Vec<CartLineItem>,
	pub(crate) summary: Option<CartSummary>,
}
impl CartSnapshot {
	pub(crate) fn from_order(document: &OrderDocument) -> Self {
		let mut items = Vec::<CartLineItem>::new();

		for included in &document.included {
			let Included::LineItems { id, attributes } = included else { continue };

			if !attributes.is_sku() {
				continue;
			}

			let Some(item) = CartLineItem::from_included(id, attributes) else { continue };

			// Removal targets the first match, so the first line item per sku is the visible one.
			if let Some(kept) = items.iter().find(|kept| kept.sku_code == item.sku_code) {
				tracing::warn!(
					sku_code = %item.sku_code,
					kept = %kept.id,
					skipped = %item.id,
					"Skipping duplicate sku line item."
				);

				continue;
			}

			items.push(item);
		}

		if items.is_empty() {
			return Self::default();
		}

		let attributes = &document.data.attributes;
		let summary = CartSummary {
			number: attributes.number.clone(),
			skus_count: attributes.skus_count.unwrap_or_default(),
			formatted_subtotal_amount: text(&attributes.formatted_subtotal_amount),
			formatted_discount_amount: text(&attributes.formatted_discount_amount),
			formatted_shipping_amount: text(&attributes.formatted_shipping_amount),
			formatted_total_tax_amount: text(&attributes.formatted_total_tax_amount),
			formatted_gift_card_amount: text(&attributes.formatted_gift_card_amount),
			formatted_total_amount_with_taxes: text(&attributes.formatted_total_amount_with_taxes),
		};

		Self { items, summary: Some(summary) }
	}
}

fn text(value: &Option<String>) -> String {
	value.clone().unwrap_or_default()
}
