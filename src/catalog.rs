//! Read-only product catalog backed by the sku endpoints.

// self
use crate::{
	_prelude::*,
	api::{CommerceApi, Document, Included, PriceAttributes, Resource, SkuAttributes},
	auth::Authenticator,
	id::{ProductId, SkuCode},
	obs::{self, Operation},
};

/// Products per catalog page.
pub const PAGE_SIZE: u32 = 9;

/// One price entry of a product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
	/// Formatted display amount.
	pub formatted_amount: String,
	/// ISO currency code.
	pub currency_code: Option<String>,
	/// Amount in cents.
	pub amount_cents: Option<i64>,
	/// Formatted compare-at amount.
	pub formatted_compare_at_amount: Option<String>,
}
impl From<&PriceAttributes> for Price {
	fn from(attributes: &PriceAttributes) -> Self {
		Self {
			formatted_amount: attributes.formatted_amount.clone().unwrap_or_default(),
			currency_code: attributes.currency_code.clone(),
			amount_cents: attributes.amount_cents,
			formatted_compare_at_amount: attributes.formatted_compare_at_amount.clone(),
		}
	}
}

/// A catalog product (sku).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
	/// Sku resource identifier.
	pub id: ProductId,
	/// Display name.
	pub name: String,
	/// Long description.
	pub description: Option<String>,
	/// Image reference; falls back to the first attachment.
	pub image_url: Option<String>,
	/// Prices in relationship order.
	pub prices: Vec<Price>,
	/// Sku code used when adding to the cart.
	pub code: SkuCode,
}
impl Product {
	fn from_resource(sku: Resource<SkuAttributes>, included: &[Included]) -> Result<Self> {
		let prices: Vec<Price> = sku
			.related("prices")
			.into_iter()
			.filter_map(|linkage| {
				included.iter().find_map(|resource| match resource {
					Included::Prices { id, attributes } if *id == linkage.id =>
						Some(Price::from(attributes)),
					_ => None,
				})
			})
			.collect();
		let attachment_url = sku.related("attachments").into_iter().find_map(|linkage| {
			included.iter().find_map(|resource| match resource {
				Included::Attachments { id, attributes } if *id == linkage.id =>
					attributes.url.clone(),
				_ => None,
			})
		});
		let id = ProductId::new(&sku.id)?;
		let SkuAttributes { code, name, description, image_url } = sku.attributes;

		Ok(Self {
			id,
			name,
			description,
			image_url: image_url.or(attachment_url),
			prices,
			code: SkuCode::new(code)?,
		})
	}
}

/// One page of products.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductPage {
	/// Products on this page.
	pub products: Vec<Product>,
	/// One-based page number.
	pub page: u32,
	/// Whether another page follows.
	pub has_next_page: bool,
}

/// Catalog reader sharing the storefront authenticator.
#[derive(Clone, Debug)]
pub struct Catalog {
	api: CommerceApi,
	authenticator: Arc<Authenticator>,
}
impl Catalog {
	/// Creates a catalog reader.
	pub fn new(api: CommerceApi, authenticator: Arc<Authenticator>) -> Self {
		Self { api, authenticator }
	}

	/// Lists one page of products; page numbers below 1 are treated as 1.
	pub async fn products(&self, page: u32) -> Result<ProductPage> {
		let page = page.max(1);

		obs::observe(Operation::ListProducts, "products", async {
			let token = self.authenticator.ensure_token().await?;
			let document = self.api.list_skus(&token, page, PAGE_SIZE).await?;
			let has_next_page = match document.meta.as_ref().and_then(|meta| meta.page_count) {
				Some(page_count) => page < page_count,
				None => document.data.len() == PAGE_SIZE as usize,
			};
			let Document { data, included, .. } = document;
			let products = data
				.into_iter()
				.map(|sku| Product::from_resource(sku, &included))
				.collect::<Result<Vec<_>>>()?;

			Ok(ProductPage { products, page, has_next_page })
		})
		.await
	}

	/// Looks up one product; unknown identifiers yield `None`.
	pub async fn product(&self, id: &ProductId) -> Result<Option<Product>> {
		obs::observe(Operation::RetrieveProduct, "product", async {
			let token = self.authenticator.ensure_token().await?;
			let Some(document) = self.api.retrieve_sku(&token, id).await? else {
				return Ok(None);
			};

			Product::from_resource(document.data, &document.included).map(Some)
		})
		.await
	}
}
