//! Typed JSON:API documents exchanged with the commerce API.
//!
//! Only the attributes this crate reads are modeled. Unknown fields are ignored and
//! attributes Commerce Layer may send as `null` are optional.

// crates.io
use serde::Deserializer;
// self
use crate::{_prelude::*, api::ResourceType};

/// Top-level response document.
#[derive(Clone, Debug, Deserialize)]
pub struct Document<D> {
	/// Primary data.
	pub data: D,
	/// Compound-document side loads.
	#[serde(default)]
	pub included: Vec<Included>,
	/// Pagination metadata for collections.
	#[serde(default)]
	pub meta: Option<Meta>,
}

/// Collection metadata.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Meta {
	/// Total number of pages.
	pub page_count: Option<u32>,
	/// Total number of records.
	pub record_count: Option<u32>,
}

/// A primary resource object.
#[derive(Clone, Debug, Deserialize)]
pub struct Resource<A> {
	/// Remote identifier.
	pub id: String,
	/// Resource type.
	#[serde(rename = "type")]
	pub kind: ResourceType,
	/// Attribute set.
	pub attributes: A,
	/// Named relationships.
	#[serde(default)]
	pub relationships: HashMap<String, Relationship>,
}
impl<A> Resource<A> {
	/// Rejects resources whose type differs from `expected`.
	pub fn expect_kind(self, expected: ResourceType) -> Result<Self> {
		if self.kind == expected {
			Ok(self)
		} else {
			Err(crate::error::ParseError::UnexpectedResource { expected, found: self.kind }.into())
		}
	}

	/// Identifiers linked through the relationship `name`, in document order.
	pub fn related(&self, name: &str) -> Vec<&ResourceIdentifier> {
		match self.relationships.get(name).and_then(|relationship| relationship.data.as_ref()) {
			Some(RelationshipData::One(identifier)) => vec![identifier],
			Some(RelationshipData::Many(identifiers)) => identifiers.iter().collect(),
			None => Vec::new(),
		}
	}
}

/// Relationship object; only linkage data is read.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Relationship {
	/// Resource linkage, absent unless the relationship was included.
	#[serde(default)]
	pub data: Option<RelationshipData>,
}

/// To-one or to-many resource linkage.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
	/// To-many linkage.
	Many(Vec<ResourceIdentifier>),
	/// To-one linkage.
	One(ResourceIdentifier),
}

/// `{ "type": ..., "id": ... }` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
	/// Resource type.
	#[serde(rename = "type")]
	pub kind: ResourceType,
	/// Remote identifier.
	pub id: String,
}

/// Side-loaded resources; types this crate does not read collapse into [`Included::Other`].
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Included {
	/// Order line item.
	LineItems {
		/// Remote identifier.
		id: String,
		/// Attribute set.
		attributes: LineItemAttributes,
	},
	/// Sku price.
	Prices {
		/// Remote identifier.
		id: String,
		/// Attribute set.
		attributes: PriceAttributes,
	},
	/// Sku attachment.
	Attachments {
		/// Remote identifier.
		id: String,
		/// Attribute set.
		attributes: AttachmentAttributes,
	},
	/// Any other side-loaded type.
	#[serde(other)]
	Other,
}

/// Order attributes requested by the cart fetch.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrderAttributes {
	/// Human-facing order number; served either as a JSON number or a string.
	#[serde(deserialize_with = "order_number")]
	pub number: Option<String>,
	/// Number of distinct skus.
	pub skus_count: Option<u32>,
	/// Formatted subtotal.
	pub formatted_subtotal_amount: Option<String>,
	/// Formatted discount.
	pub formatted_discount_amount: Option<String>,
	/// Formatted shipping.
	pub formatted_shipping_amount: Option<String>,
	/// Formatted tax.
	pub formatted_total_tax_amount: Option<String>,
	/// Formatted gift card amount.
	pub formatted_gift_card_amount: Option<String>,
	/// Formatted grand total.
	pub formatted_total_amount_with_taxes: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OrderNumber {
	Number(u64),
	Text(String),
}

fn order_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	let number = Option::<OrderNumber>::deserialize(deserializer)?.map(|number| match number {
		OrderNumber::Number(value) => value.to_string(),
		OrderNumber::Text(value) => value,
	});

	Ok(number)
}

/// Line item attributes.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LineItemAttributes {
	/// `skus`, `shipments`, `payment_methods`, ...
	pub item_type: Option<String>,
	/// Sku code for sku line items.
	pub sku_code: Option<String>,
	/// Item quantity.
	pub quantity: u32,
	/// Display name.
	pub name: Option<String>,
	/// Image reference.
	pub image_url: Option<String>,
	/// Formatted unit price.
	pub formatted_unit_amount: Option<String>,
	/// Formatted line total.
	pub formatted_total_amount: Option<String>,
}
impl LineItemAttributes {
	/// Line items that represent catalog skus (as opposed to shipping, payment, ...).
	pub fn is_sku(&self) -> bool {
		self.item_type.as_deref() == Some("skus")
	}
}

/// Sku attributes.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SkuAttributes {
	/// Sku code.
	pub code: String,
	/// Display name.
	pub name: String,
	/// Long description.
	pub description: Option<String>,
	/// Primary image reference.
	pub image_url: Option<String>,
}

/// Price attributes.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PriceAttributes {
	/// Formatted amount, e.g. `€10,00`.
	pub formatted_amount: Option<String>,
	/// ISO currency code.
	pub currency_code: Option<String>,
	/// Amount in cents.
	pub amount_cents: Option<i64>,
	/// Formatted compare-at amount.
	pub formatted_compare_at_amount: Option<String>,
}

/// Attachment attributes.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AttachmentAttributes {
	/// Attachment name.
	pub name: Option<String>,
	/// Attachment URL.
	pub url: Option<String>,
}

/// Request body for `POST /orders`.
#[derive(Clone, Debug, Serialize)]
pub struct NewOrder {
	data: NewOrderData,
}
impl Default for NewOrder {
	fn default() -> Self {
		Self { data: NewOrderData { kind: ResourceType::Orders } }
	}
}

#[derive(Clone, Debug, Serialize)]
struct NewOrderData {
	#[serde(rename = "type")]
	kind: ResourceType,
}

/// Request body for `POST /line_items`, an upsert keyed by sku code.
#[derive(Clone, Debug, Serialize)]
pub struct NewLineItem {
	data: NewLineItemData,
}
impl NewLineItem {
	/// Builds an upsert of `quantity` units of `sku_code` into `order_id`.
	pub fn upsert(
		order_id: &str,
		sku_code: &str,
		quantity: u32,
		image_url: Option<&str>,
		name: Option<&str>,
	) -> Self {
		Self {
			data: NewLineItemData {
				kind: ResourceType::LineItems,
				attributes: NewLineItemAttributes {
					sku_code: sku_code.to_owned(),
					quantity,
					image_url: image_url.map(str::to_owned),
					name: name.map(str::to_owned),
					update_quantity: true,
				},
				relationships: NewLineItemRelationships {
					order: OrderLinkage {
						data: ResourceIdentifier {
							kind: ResourceType::Orders,
							id: order_id.to_owned(),
						},
					},
				},
			},
		}
	}
}

#[derive(Clone, Debug, Serialize)]
struct NewLineItemData {
	#[serde(rename = "type")]
	kind: ResourceType,
	attributes: NewLineItemAttributes,
	relationships: NewLineItemRelationships,
}

#[derive(Clone, Debug, Serialize)]
struct NewLineItemAttributes {
	sku_code: String,
	quantity: u32,
	#[serde(skip_serializing_if = "Option::is_none")]
	image_url: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	name: Option<String>,
	#[serde(rename = "_update_quantity")]
	update_quantity: bool,
}

#[derive(Clone, Debug, Serialize)]
struct NewLineItemRelationships {
	order: OrderLinkage,
}

#[derive(Clone, Debug, Serialize)]
struct OrderLinkage {
	data: ResourceIdentifier,
}

/// JSON:API error document.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorDocument {
	/// Error objects.
	#[serde(default)]
	pub errors: Vec<ErrorObject>,
}
impl ErrorDocument {
	/// First human-readable detail, falling back to the title.
	pub fn first_detail(&self) -> Option<String> {
		self.errors.iter().find_map(|error| error.detail.clone().or_else(|| error.title.clone()))
	}
}

/// A single JSON:API error object.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ErrorObject {
	/// Short summary.
	pub title: Option<String>,
	/// Human-readable explanation.
	pub detail: Option<String>,
	/// Application-specific code.
	pub code: Option<String>,
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn order_number_accepts_strings_numbers_and_null() {
		let number = |value: serde_json::Value| {
			serde_json::from_value::<OrderAttributes>(json!({ "number": value }))
				.expect("Order attributes should parse.")
				.number
		};

		assert_eq!(number(json!("2485862")).as_deref(), Some("2485862"));
		assert_eq!(number(json!(2485862)).as_deref(), Some("2485862"));
		assert_eq!(number(json!(null)), None);

		let empty: OrderAttributes =
			serde_json::from_value(json!({})).expect("Empty attributes should parse.");

		assert_eq!(empty.number, None);
	}

	#[test]
	fn order_document_separates_sku_line_items() {
		let payload = json!({
			"data": {
				"id": "xYZkjABcde",
				"type": "orders",
				"attributes": {
					"number": 2485862,
					"skus_count": 2,
					"formatted_subtotal_amount": "€20,00",
					"formatted_discount_amount": null
				},
				"relationships": { "line_items": { "links": { "self": "..." } } }
			},
			"included": [
				{
					"id": "li-1",
					"type": "line_items",
					"attributes": { "item_type": "skus", "sku_code": "ABC", "quantity": 2 }
				},
				{
					"id": "li-2",
					"type": "line_items",
					"attributes": { "item_type": "shipments", "quantity": 1 }
				},
				{ "id": "mk-1", "type": "markets", "attributes": {} }
			]
		});
		let document: Document<Resource<OrderAttributes>> =
			serde_json::from_value(payload).expect("Order document should parse.");

		assert_eq!(document.data.kind, ResourceType::Orders);
		assert_eq!(document.data.attributes.number.as_deref(), Some("2485862"));
		assert!(document.data.attributes.formatted_discount_amount.is_none());
		assert!(document.data.related("line_items").is_empty());

		let skus: Vec<_> = document
			.included
			.iter()
			.filter_map(|included| match included {
				Included::LineItems { id, attributes } if attributes.is_sku() => Some(id.as_str()),
				_ => None,
			})
			.collect();

		assert_eq!(skus, ["li-1"]);
		assert!(matches!(document.included[2], Included::Other));
	}

	#[test]
	fn line_item_body_carries_the_upsert_flag() {
		let body = NewLineItem::upsert("order-1", "ABC", 2, None, Some("Tee"));
		let value = serde_json::to_value(&body).expect("Line item body should serialize.");

		assert_eq!(
			value,
			json!({
				"data": {
					"type": "line_items",
					"attributes": {
						"sku_code": "ABC",
						"quantity": 2,
						"name": "Tee",
						"_update_quantity": true
					},
					"relationships": {
						"order": { "data": { "type": "orders", "id": "order-1" } }
					}
				}
			})
		);
		assert_eq!(
			serde_json::to_value(NewOrder::default()).expect("Order body should serialize."),
			json!({ "data": { "type": "orders" } })
		);
	}

	#[test]
	fn unexpected_primary_type_is_rejected() {
		let resource: Resource<SkuAttributes> = serde_json::from_value(json!({
			"id": "abc",
			"type": "prices",
			"attributes": {}
		}))
		.expect("Resource should parse.");
		let err = resource.expect_kind(ResourceType::Skus).expect_err("Type mismatch should fail.");

		assert_eq!(err.to_string(), "Expected a `skus` resource but received `prices`.");
	}

	#[test]
	fn error_document_prefers_detail_over_title() {
		let document: ErrorDocument = serde_json::from_value(json!({
			"errors": [{ "title": "is invalid", "detail": "quantity - must be greater than 0" }]
		}))
		.expect("Error document should parse.");

		assert_eq!(document.first_detail().as_deref(), Some("quantity - must be greater than 0"));
	}
}
