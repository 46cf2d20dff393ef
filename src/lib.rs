//! Commerce Layer storefront client.
//!
//! Client-credentials tokens refresh themselves, carts are scoped to a browsing session, and
//! cart mutations run through a serialized sync protocol over the JSON:API surface.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod id;
pub mod obs;
pub mod session;
pub mod store;
pub mod storefront;

mod oauth;

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use cookie;
pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
