//! Cursor-driven pagination for cloud SDK list operations, plus the request signing and
//! credential contracts that sit beside it.
//!
//! A [`paginate::Paginator`] turns a single "list" style remote call into a lazy sequence of
//! pages, while [`sign::Signer`] and the [`credential`] providers produce SigV4 authentication
//! material for the requests those calls issue.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod clock;
pub mod credential;
pub mod error;
pub mod ext;
pub mod id;
pub mod obs;
pub mod paginate;
pub mod sign;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Request as ReqwestRequest, header as reqwest_header};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::Result;
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use httpmock as _;
