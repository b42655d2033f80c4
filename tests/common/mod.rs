//! Fixtures shared by the integration tests: an object-listing request/response pair and a
//! scripted operation answering from a fixed cursor map.

#![allow(dead_code)]

// std
use std::{
	collections::HashMap,
	sync::atomic::{AtomicUsize, Ordering},
};
// crates.io
use serde::Deserialize;
use thiserror::Error as ThisError;
// self
use cloud_paginator::{
	credential::Credential,
	id::AccessKeyId,
	paginate::{Operation, OperationContext, OperationFuture, PaginatedInput, PaginatedOutput},
};

/// Object listing request, paged by `continuation`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListObjects {
	pub bucket: String,
	pub max_keys: u32,
	pub continuation: Option<String>,
}
impl ListObjects {
	pub fn new(bucket: &str) -> Self {
		Self { bucket: bucket.into(), max_keys: 2, continuation: None }
	}
}
impl PaginatedInput for ListObjects {
	type Token = String;

	fn pagination_token(&self) -> Option<&String> {
		self.continuation.as_ref()
	}

	fn with_pagination_token(&self, token: String) -> Self {
		Self { continuation: Some(token), ..self.clone() }
	}
}

/// One page of object keys.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ObjectPage {
	pub keys: Vec<String>,
	#[serde(default)]
	pub next_continuation: Option<String>,
	#[serde(default)]
	pub is_truncated: Option<bool>,
}
impl ObjectPage {
	pub fn new(keys: &[&str], next: Option<&str>) -> Self {
		Self {
			keys: keys.iter().map(|key| (*key).to_owned()).collect(),
			next_continuation: next.map(Into::into),
			is_truncated: None,
		}
	}

	pub fn truncated(mut self, truncated: bool) -> Self {
		self.is_truncated = Some(truncated);

		self
	}
}
impl PaginatedOutput for ObjectPage {
	type Token = String;

	fn next_token(&self) -> Option<&String> {
		self.next_continuation.as_ref()
	}

	fn more_results(&self) -> Option<bool> {
		self.is_truncated
	}
}

/// Failure surfaced by listing operations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ListError {
	#[error("Service is throttling requests.")]
	Throttled,
	#[error("No page for cursor {0:?}.")]
	UnknownCursor(Option<String>),
	#[error("Transport failed: {0}.")]
	Transport(String),
}

/// Listing operation answering from a fixed cursor → page map.
#[derive(Debug, Default)]
pub struct ScriptedLister {
	pages: HashMap<Option<String>, Result<ObjectPage, ListError>>,
	calls: AtomicUsize,
}
impl ScriptedLister {
	pub fn page(mut self, cursor: Option<&str>, page: ObjectPage) -> Self {
		self.pages.insert(cursor.map(Into::into), Ok(page));

		self
	}

	pub fn failure(mut self, cursor: Option<&str>, err: ListError) -> Self {
		self.pages.insert(cursor.map(Into::into), Err(err));

		self
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl Operation<ListObjects> for ScriptedLister {
	type Error = ListError;
	type Output = ObjectPage;

	fn call(
		&self,
		input: ListObjects,
		_ctx: OperationContext,
	) -> OperationFuture<'_, ObjectPage, ListError> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let answer = self
			.pages
			.get(&input.continuation)
			.cloned()
			.unwrap_or_else(|| Err(ListError::UnknownCursor(input.continuation.clone())));

		Box::pin(async move { answer })
	}
}

/// Credential from the public SigV4 test suite.
pub fn example_credential() -> Credential {
	let access_key_id =
		AccessKeyId::new("AKIDEXAMPLE").expect("Example access key id should be valid.");

	Credential::new(access_key_id, "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
}
