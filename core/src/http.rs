//! Request descriptors: one HTTP call described as plain data.
//!
//! # Design
//! A `RequestDescriptor` fully specifies a single call (method, validated
//! absolute URL, headers, optional body) plus how to decode a success body
//! into its model type `M`. Descriptors are immutable once constructed (the
//! builder methods consume and return the value), own no resources, and are
//! created fresh per call. URL validation happens in `new`, so a descriptor
//! that exists is always executable; a bad URL fails fast with
//! `ApiError::InvalidRequest` instead of being dropped silently later.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use ureq::http::Uri;

use crate::error::ApiError;

/// HTTP method for a described call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// A self-contained description of one HTTP call, decoding into `M`.
///
/// Bodies are sent for `Post` and `Put` only; the executor ignores a body
/// attached to a `Get` or `Delete` descriptor.
#[derive(Debug, Clone)]
pub struct RequestDescriptor<M> {
    method: HttpMethod,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    _model: PhantomData<fn() -> M>,
}

impl<M: DeserializeOwned> RequestDescriptor<M> {
    /// Describe a call to `url`.
    ///
    /// Fails with `ApiError::InvalidRequest` unless `url` parses as an
    /// absolute URL (scheme and authority present).
    pub fn new(method: HttpMethod, url: &str) -> Result<Self, ApiError> {
        let uri = url
            .parse::<Uri>()
            .map_err(|e| ApiError::InvalidRequest(format!("{url:?}: {e}")))?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(ApiError::InvalidRequest(format!("{url:?} is not an absolute URL")));
        }
        Ok(Self {
            method,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
            _model: PhantomData,
        })
    }

    /// Append one request header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Attach a request body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn method(&self) -> &HttpMethod {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Decode a success body into the model type.
    ///
    /// Every executor strategy routes through this method, so the decode
    /// rule travels with the descriptor rather than being chosen per
    /// strategy.
    pub fn decode(&self, bytes: &[u8]) -> Result<M, ApiError> {
        serde_json::from_slice(bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Probe {
        value: u32,
    }

    #[test]
    fn new_accepts_absolute_url() {
        let descriptor =
            RequestDescriptor::<Probe>::new(HttpMethod::Get, "https://api.example.com/probe")
                .unwrap();
        assert_eq!(descriptor.method(), &HttpMethod::Get);
        assert_eq!(descriptor.url(), "https://api.example.com/probe");
        assert!(descriptor.headers().is_empty());
        assert!(descriptor.body().is_none());
    }

    #[test]
    fn new_rejects_unparsable_url() {
        let err = RequestDescriptor::<Probe>::new(HttpMethod::Get, "not a url").unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn new_rejects_relative_url() {
        let err =
            RequestDescriptor::<Probe>::new(HttpMethod::Get, "/search/repositories").unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn new_rejects_scheme_only_url() {
        let err = RequestDescriptor::<Probe>::new(HttpMethod::Get, "mailto:nobody").unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn builders_accumulate_headers_and_body() {
        let descriptor =
            RequestDescriptor::<Probe>::new(HttpMethod::Post, "http://localhost:3000/probe")
                .unwrap()
                .with_header("content-type", "application/json")
                .with_header("accept", "application/json")
                .with_body(b"{\"value\":1}".to_vec());
        assert_eq!(descriptor.headers().len(), 2);
        assert_eq!(descriptor.headers()[0].0, "content-type");
        assert_eq!(descriptor.body(), Some(&b"{\"value\":1}"[..]));
    }

    #[test]
    fn decode_produces_model() {
        let descriptor =
            RequestDescriptor::<Probe>::new(HttpMethod::Get, "http://localhost:3000/probe")
                .unwrap();
        let probe = descriptor.decode(b"{\"value\":7}").unwrap();
        assert_eq!(probe.value, 7);
    }

    #[test]
    fn decode_classifies_malformed_body() {
        let descriptor =
            RequestDescriptor::<Probe>::new(HttpMethod::Get, "http://localhost:3000/probe")
                .unwrap();
        let err = descriptor.decode(b"not json").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
