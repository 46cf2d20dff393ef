//! Shared fixtures for the integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
use time::{Duration, OffsetDateTime};
// self
use commerce_cart::{
	auth::AccessToken,
	config::CommerceConfig,
	http::ReqwestHttpClient,
	id::OrderId,
	reqwest::Client as ReqwestClient,
	session::{CART_ID_SESSION_KEY, CartSession, MemorySessionStorage, SessionStorage},
	store::{MemoryTokenStore, TokenStore},
	storefront::Storefront,
	url::Url,
};

pub const CLIENT_ID: &str = "storefront-client";
pub const SCOPE: &str = "market:id:ElDkXhpEGg";
pub const ACCESS_TOKEN: &str = "storefront-token";
pub const BEARER: &str = "Bearer storefront-token";
pub const JSON_API: &str = "application/vnd.api+json";

/// Builds a reqwest client that accepts the self-signed certificates produced by `httpmock`.
pub fn test_http_client() -> ReqwestHttpClient {
	let client = ReqwestClient::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Points both the API and the identity endpoint at `server`.
pub fn test_config(server: &MockServer) -> CommerceConfig {
	let base = Url::parse(&server.base_url()).expect("Mock server URL should parse.");

	CommerceConfig::builder(CLIENT_ID)
		.scope(SCOPE)
		.endpoint(base.clone())
		.identity_endpoint(base)
		.build()
		.expect("Mock server config should build.")
}

pub fn fresh_token() -> AccessToken {
	AccessToken::new(ACCESS_TOKEN, OffsetDateTime::now_utc() + Duration::hours(4))
}

pub fn token_body(access_token: &str, expires_in: i64) -> String {
	json!({
		"access_token": access_token,
		"token_type": "bearer",
		"expires_in": expires_in,
		"scope": SCOPE
	})
	.to_string()
}

/// Session storage plus a cart session bound to it, optionally holding `cart_id`.
pub fn session_with(cart_id: Option<&str>) -> (Arc<MemorySessionStorage>, CartSession) {
	let storage = Arc::new(MemorySessionStorage::default());

	if let Some(cart_id) = cart_id {
		storage.set_item(CART_ID_SESSION_KEY, cart_id.to_owned());
	}

	(storage.clone(), CartSession::new(storage))
}

/// Storefront wired to `server` with a fresh token already stored.
pub fn storefront(server: &MockServer, session: CartSession) -> Storefront {
	storefront_with_store(server, session, Arc::new(MemoryTokenStore::with_token(fresh_token())))
}

pub fn storefront_with_store(
	server: &MockServer,
	session: CartSession,
	store: Arc<dyn TokenStore>,
) -> Storefront {
	Storefront::with_http_client(&test_config(server), store, session, test_http_client())
		.expect("Storefront should build against the mock server.")
}

pub fn order_id(value: &str) -> OrderId {
	OrderId::new(value).expect("Order id fixture should be valid.")
}

/// `GET /orders/{id}` body holding the given `(line item id, sku, quantity)` entries.
pub fn order_body(cart_id: &str, items: &[(&str, &str, u32)]) -> String {
	let included: Vec<Value> = items
		.iter()
		.map(|(id, sku, quantity)| {
			json!({
				"id": id,
				"type": "line_items",
				"attributes": {
					"item_type": "skus",
					"sku_code": sku,
					"quantity": quantity,
					"name": format!("Product {sku}"),
					"image_url": null,
					"formatted_unit_amount": "€10,00",
					"formatted_total_amount": format!("€{},00", 10 * quantity)
				}
			})
		})
		.chain([json!({
			"id": "shipping-1",
			"type": "line_items",
			"attributes": { "item_type": "shipments", "quantity": 1 }
		})])
		.collect();

	json!({
		"data": {
			"id": cart_id,
			"type": "orders",
			"attributes": {
				"number": 2485862,
				"skus_count": items.len(),
				"formatted_subtotal_amount": "€20,00",
				"formatted_discount_amount": "€0,00",
				"formatted_shipping_amount": "€0,00",
				"formatted_total_tax_amount": "€4,40",
				"formatted_gift_card_amount": "€0,00",
				"formatted_total_amount_with_taxes": "€24,40"
			}
		},
		"included": included
	})
	.to_string()
}

/// `GET /orders/{id}/line_items` body.
pub fn line_items_body(items: &[(&str, &str, u32)]) -> String {
	let data: Vec<Value> = items
		.iter()
		.map(|(id, sku, quantity)| {
			json!({
				"id": id,
				"type": "line_items",
				"attributes": { "item_type": "skus", "sku_code": sku, "quantity": quantity }
			})
		})
		.collect();

	json!({ "data": data }).to_string()
}

pub fn resource_body(kind: &str, id: &str) -> String {
	json!({ "data": { "id": id, "type": kind, "attributes": {} } }).to_string()
}
