mod common;

// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
// self
use commerce_cart::{catalog::PAGE_SIZE, id::ProductId};
use common::*;

fn sku_resource(id: &str, code: &str) -> Value {
	json!({
		"id": id,
		"type": "skus",
		"attributes": {
			"code": code,
			"name": format!("Product {code}"),
			"description": "Organic cotton.",
			"image_url": null
		},
		"relationships": {
			"prices": { "data": [{ "type": "prices", "id": format!("price-{id}") }] },
			"attachments": { "data": [] }
		}
	})
}

fn price_resource(id: &str) -> Value {
	json!({
		"id": format!("price-{id}"),
		"type": "prices",
		"attributes": {
			"currency_code": "EUR",
			"amount_cents": 1000,
			"formatted_amount": "€10,00"
		}
	})
}

fn sku_page(ids: &[&str], page_count: Option<u32>) -> String {
	let data: Vec<Value> =
		ids.iter().map(|id| sku_resource(id, &format!("CODE{}", id.to_uppercase()))).collect();
	let included: Vec<Value> = ids.iter().map(|id| price_resource(id)).collect();
	let mut body = json!({ "data": data, "included": included });

	if let Some(page_count) = page_count {
		body["meta"] = json!({ "page_count": page_count, "record_count": page_count * PAGE_SIZE });
	}

	body.to_string()
}

#[tokio::test]
async fn products_are_paged_with_prices() {
	let server = MockServer::start_async().await;
	let skus_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/skus")
				.header("authorization", BEARER)
				.query_param("include", "attachments,prices")
				.query_param("page[number]", "1")
				.query_param("page[size]", "9");
			then.status(200)
				.header("content-type", JSON_API)
				.body(sku_page(&["a", "b"], Some(3)));
		})
		.await;
	let (_, session) = session_with(None);
	let storefront = storefront(&server, session);
	let page = storefront.catalog().products(0).await.expect("First page should load.");

	assert_eq!(page.page, 1);
	assert!(page.has_next_page);
	assert_eq!(page.products.len(), 2);
	assert_eq!(&*page.products[0].code, "CODEA");
	assert_eq!(page.products[0].prices[0].formatted_amount, "€10,00");
	assert_eq!(page.products[0].prices[0].currency_code.as_deref(), Some("EUR"));

	skus_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn last_page_is_detected_from_meta() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/skus").query_param("page[number]", "3");
			then.status(200).header("content-type", JSON_API).body(sku_page(&["c"], Some(3)));
		})
		.await;

	let (_, session) = session_with(None);
	let storefront = storefront(&server, session);
	let page = storefront.catalog().products(3).await.expect("Last page should load.");

	assert_eq!(page.page, 3);
	assert!(!page.has_next_page);
}

#[tokio::test]
async fn full_page_without_meta_assumes_more() {
	let server = MockServer::start_async().await;
	let ids = ["a", "b", "c", "d", "e", "f", "g", "h", "i"];

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/skus");
			then.status(200).header("content-type", JSON_API).body(sku_page(&ids, None));
		})
		.await;

	let (_, session) = session_with(None);
	let storefront = storefront(&server, session);
	let page = storefront.catalog().products(2).await.expect("Page should load.");

	assert_eq!(page.products.len(), PAGE_SIZE as usize);
	assert!(page.has_next_page);
}

#[tokio::test]
async fn product_lookup_maps_not_found_to_none() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/skus/sku-a")
				.query_param("include", "attachments,prices");
			then.status(200)
				.header("content-type", JSON_API)
				.body(
					json!({
						"data": sku_resource("sku-a", "CODEA"),
						"included": [price_resource("sku-a")]
					})
					.to_string(),
				);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/skus/missing");
			then.status(404)
				.header("content-type", JSON_API)
				.body(json!({ "errors": [{ "title": "not found" }] }).to_string());
		})
		.await;

	let (_, session) = session_with(None);
	let storefront = storefront(&server, session);
	let catalog = storefront.catalog();
	let product = catalog
		.product(&ProductId::new("sku-a").expect("Product id should be valid."))
		.await
		.expect("Known product should load.")
		.expect("Known product should exist.");

	assert_eq!(&*product.id, "sku-a");
	assert_eq!(product.name, "Product CODEA");
	assert_eq!(product.description.as_deref(), Some("Organic cotton."));
	assert_eq!(product.prices.len(), 1);

	let missing = catalog
		.product(&ProductId::new("missing").expect("Product id should be valid."))
		.await
		.expect("Unknown product should not be an error.");

	assert!(missing.is_none());
}

#[tokio::test]
async fn server_errors_surface_from_the_catalog() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/skus");
			then.status(503);
		})
		.await;

	let (_, session) = session_with(None);
	let storefront = storefront(&server, session);
	let error = storefront.catalog().products(1).await.expect_err("Outage should surface.");

	assert_eq!(error.to_string(), "Failed to fetch products from Commerce Layer (HTTP 503).");
}
