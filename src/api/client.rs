//! Authenticated JSON:API client for the order, line item, and sku endpoints.

// crates.io
use reqwest::{
	Method, RequestBuilder, StatusCode,
	header::{ACCEPT, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	api::{
		ApiOperation, Document, ErrorDocument, LineItemAttributes, NewLineItem, NewOrder,
		OrderAttributes, Resource, ResourceType, SkuAttributes,
	},
	auth::AccessToken,
	error::{ConfigError, ParseError, TransportError},
	http::{JSON_API_MEDIA_TYPE, ReqwestHttpClient},
	id::{LineItemId, OrderId, ProductId, SkuCode},
};

const ORDER_FIELDS: &str = concat!(
	"number,skus_count,formatted_subtotal_amount,formatted_discount_amount,",
	"formatted_shipping_amount,formatted_total_tax_amount,formatted_gift_card_amount,",
	"formatted_total_amount_with_taxes,line_items",
);
const LINE_ITEM_FIELDS: &str =
	"item_type,image_url,name,sku_code,formatted_unit_amount,quantity,formatted_total_amount";
const SKU_INCLUDES: &str = "attachments,prices";
// Largest page the API serves.
const LINE_ITEM_PAGE_SIZE: u32 = 25;

/// Order document returned by [`CommerceApi::fetch_order`].
pub type OrderDocument = Document<Resource<OrderAttributes>>;
/// Sku collection returned by [`CommerceApi::list_skus`].
pub type SkuPage = Document<Vec<Resource<SkuAttributes>>>;
/// Single sku returned by [`CommerceApi::retrieve_sku`].
pub type SkuDocument = Document<Resource<SkuAttributes>>;

/// Thin client over `{endpoint}/api`; every call takes the bearer token explicitly.
#[derive(Clone, Debug)]
pub struct CommerceApi {
	http_client: ReqwestHttpClient,
	base: Url,
}
impl CommerceApi {
	/// Creates a client rooted at `base` (e.g. `https://acme.commercelayer.io/api`).
	pub fn new(http_client: ReqwestHttpClient, base: Url) -> Self {
		Self { http_client, base }
	}

	/// API base URL.
	pub fn base(&self) -> &Url {
		&self.base
	}

	/// `POST /orders`; returns the new cart identifier.
	pub async fn create_order(&self, token: &AccessToken) -> Result<OrderId> {
		const OP: ApiOperation = ApiOperation::CreateOrder;

		let request = self
			.request(Method::POST, &["orders"], token)?
			.body(encode(OP, &NewOrder::default())?);
		let document: Document<Resource<OrderAttributes>> = self.send(OP, request).await?;

		Ok(OrderId::new(document.data.expect_kind(ResourceType::Orders)?.id)?)
	}

	/// `GET /orders/{id}` with sku line items and summary fields side-loaded.
	pub async fn fetch_order(
		&self,
		token: &AccessToken,
		order_id: &OrderId,
	) -> Result<OrderDocument> {
		const OP: ApiOperation = ApiOperation::FetchOrder;

		let request = self.request(Method::GET, &["orders", order_id.as_ref()], token)?.query(&[
			("include", "line_items"),
			("fields[orders]", ORDER_FIELDS),
			("fields[line_items]", LINE_ITEM_FIELDS),
		]);
		let mut document: OrderDocument = self.send(OP, request).await?;

		document.data = document.data.expect_kind(ResourceType::Orders)?;

		Ok(document)
	}

	/// `GET /orders/{id}/line_items` filtered by sku code, following every page.
	pub async fn list_line_items(
		&self,
		token: &AccessToken,
		order_id: &OrderId,
		sku_code: &SkuCode,
	) -> Result<Vec<Resource<LineItemAttributes>>> {
		const OP: ApiOperation = ApiOperation::ListLineItems;

		let mut line_items = Vec::new();

		for page in 1.. {
			let request = self
				.request(Method::GET, &["orders", order_id.as_ref(), "line_items"], token)?
				.query(&[
					("filter[q][sku_code_eq]", sku_code.to_string()),
					("page[number]", page.to_string()),
					("page[size]", LINE_ITEM_PAGE_SIZE.to_string()),
				]);
			let document: Document<Vec<Resource<LineItemAttributes>>> =
				self.send(OP, request).await?;
			let received = document.data.len();
			let last_page = match document.meta.as_ref().and_then(|meta| meta.page_count) {
				Some(page_count) => page >= page_count,
				None => received < LINE_ITEM_PAGE_SIZE as usize,
			};

			for item in document.data {
				line_items.push(item.expect_kind(ResourceType::LineItems)?);
			}

			if last_page || received == 0 {
				break;
			}
		}

		Ok(line_items)
	}

	/// `POST /line_items`; returns the created (or updated) line item identifier.
	pub async fn add_line_item(
		&self,
		token: &AccessToken,
		body: &NewLineItem,
	) -> Result<LineItemId> {
		const OP: ApiOperation = ApiOperation::AddLineItem;

		let request = self.request(Method::POST, &["line_items"], token)?.body(encode(OP, body)?);
		let document: Document<Resource<LineItemAttributes>> = self.send(OP, request).await?;

		Ok(LineItemId::new(document.data.expect_kind(ResourceType::LineItems)?.id)?)
	}

	/// `DELETE /line_items/{id}`.
	pub async fn delete_line_item(
		&self,
		token: &AccessToken,
		line_item_id: &LineItemId,
	) -> Result<()> {
		const OP: ApiOperation = ApiOperation::RemoveLineItem;

		let request = self.request(Method::DELETE, &["line_items", line_item_id.as_ref()], token)?;
		let response = request.send().await.map_err(TransportError::from)?;
		let status = response.status();

		if status.is_success() {
			return Ok(());
		}

		let body = response.bytes().await.map_err(TransportError::from)?;

		Err(network_error(OP, status, &body))
	}

	/// `GET /skus` with prices and attachments side-loaded.
	pub async fn list_skus(
		&self,
		token: &AccessToken,
		page: u32,
		page_size: u32,
	) -> Result<SkuPage> {
		const OP: ApiOperation = ApiOperation::ListSkus;

		let request = self.request(Method::GET, &["skus"], token)?.query(&[
			("include", SKU_INCLUDES.to_owned()),
			("page[number]", page.to_string()),
			("page[size]", page_size.to_string()),
		]);
		let document: SkuPage = self.send(OP, request).await?;
		let data = document
			.data
			.into_iter()
			.map(|sku| sku.expect_kind(ResourceType::Skus))
			.collect::<Result<_>>()?;

		Ok(Document { data, ..document })
	}

	/// `GET /skus/{id}`; a 404 yields `None`.
	pub async fn retrieve_sku(
		&self,
		token: &AccessToken,
		product_id: &ProductId,
	) -> Result<Option<SkuDocument>> {
		const OP: ApiOperation = ApiOperation::RetrieveSku;

		let request = self
			.request(Method::GET, &["skus", product_id.as_ref()], token)?
			.query(&[("include", SKU_INCLUDES)]);

		match self.send::<SkuDocument>(OP, request).await {
			Ok(mut document) => {
				document.data = document.data.expect_kind(ResourceType::Skus)?;

				Ok(Some(document))
			},
			Err(Error::Network { status: 404, .. }) => Ok(None),
			Err(e) => Err(e),
		}
	}

	fn request(
		&self,
		method: Method,
		segments: &[&str],
		token: &AccessToken,
	) -> Result<RequestBuilder> {
		let mut url = self.base.clone();
		let invalid = ConfigError::InvalidEndpoint { endpoint: "api", url: self.base.to_string() };

		url.path_segments_mut().map_err(|_| invalid)?.pop_if_empty().extend(segments);

		Ok(self
			.http_client
			.request(method, url)
			.bearer_auth(token.expose())
			.header(CONTENT_TYPE, JSON_API_MEDIA_TYPE)
			.header(ACCEPT, JSON_API_MEDIA_TYPE))
	}

	async fn send<T>(&self, operation: ApiOperation, request: RequestBuilder) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = request.send().await.map_err(TransportError::from)?;
		let status = response.status();
		let body = response.bytes().await.map_err(TransportError::from)?;

		if !status.is_success() {
			return Err(network_error(operation, status, &body));
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ParseError::Json { operation, source }.into())
	}
}

fn encode<T>(operation: ApiOperation, body: &T) -> Result<Vec<u8>>
where
	T: Serialize,
{
	serde_json::to_vec(body).map_err(|source| ParseError::Encode { operation, source }.into())
}

fn network_error(operation: ApiOperation, status: StatusCode, body: &[u8]) -> Error {
	let detail = serde_json::from_slice::<ErrorDocument>(body)
		.ok()
		.and_then(|document| document.first_detail());

	tracing::debug!(%operation, status = status.as_u16(), ?detail, "Commerce API request failed.");

	Error::Network { operation, status: status.as_u16(), detail }
}
