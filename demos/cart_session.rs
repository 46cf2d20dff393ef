//! Walks one shopper session against a mocked Commerce Layer: the token is minted once and
//! handed back as a cookie, the first add creates the cart, and the badge count follows the
//! remote order.

// std
use std::{num::NonZeroU32, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::eyre};
use httpmock::prelude::*;
// self
use commerce_cart::{
	cart::AddToCart,
	config::CommerceConfig,
	http::ReqwestHttpClient,
	id::SkuCode,
	reqwest::Client,
	session::{CartSession, MemorySessionStorage},
	store::CookieTokenStore,
	storefront::Storefront,
	url::Url,
};

const ORDER: &str = r#"{
	"data": {
		"id": "NMWYhbGorj",
		"type": "orders",
		"attributes": {
			"number": 2485862,
			"skus_count": 1,
			"formatted_total_amount_with_taxes": "€48,80"
		}
	},
	"included": [{
		"id": "vrEAsBYJkN",
		"type": "line_items",
		"attributes": {
			"item_type": "skus",
			"sku_code": "TSHIRTMM000000FFFFFFXLXX",
			"name": "White T-shirt",
			"quantity": 2,
			"formatted_total_amount": "€40,00"
		}
	}]
}"#;

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":14400}",
			);
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/orders");
			then.status(201).body("{\"data\":{\"id\":\"NMWYhbGorj\",\"type\":\"orders\"}}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/line_items");
			then.status(201).body("{\"data\":{\"id\":\"vrEAsBYJkN\",\"type\":\"line_items\"}}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/orders/NMWYhbGorj");
			then.status(200).body(ORDER);
		})
		.await;

	let base = Url::parse(&server.base_url())?;
	let config = CommerceConfig::builder("demo-storefront")
		.scope("market:id:demo")
		.endpoint(base.clone())
		.identity_endpoint(base)
		.build()?;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let cookies = Arc::new(CookieTokenStore::default());
	let session = CartSession::new(Arc::new(MemorySessionStorage::default()));
	let storefront =
		Storefront::with_http_client(&config, cookies.clone(), session, http_client)?;
	let cart = storefront.cart();
	let quantity = NonZeroU32::new(2).ok_or_else(|| eyre!("Quantity must be positive."))?;

	cart.add_to_cart(
		AddToCart::new(SkuCode::new("TSHIRTMM000000FFFFFFXLXX")?, quantity).name("White T-shirt"),
	)
	.await;

	let state = cart.state();

	if let Some(error) = state.error {
		return Err(eyre!(error));
	}

	println!("Cart {:?} holds {} item(s).", state.cart_id, state.total_quantity());

	for header in cookies.set_cookie_headers() {
		println!("Set-Cookie: {header}");
	}

	token_mock.assert_async().await;

	Ok(())
}
