//! HTTP response handling and body decoding

use crate::cookie::Cookie;
use crate::error::Result;
use crate::http::encoding::{self, ContentEncoding};
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{HeaderMap, CONTENT_ENCODING, CONTENT_TYPE};
use reqwest::{StatusCode, Version};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

const JSON_CONTENT_TYPE: &str = "application/json";

/// A fully received response. `body` holds the bytes as they came off the
/// wire, still compressed if the server compressed them.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub version: Version,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// First value of a header, if it is valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    pub fn content_encoding(&self) -> ContentEncoding {
        ContentEncoding::from_header(
            self.headers
                .get(CONTENT_ENCODING)
                .and_then(|value| value.to_str().ok()),
        )
    }

    /// True only when `Content-Type` is exactly `application/json`.
    pub fn is_json(&self) -> bool {
        self.content_type() == Some(JSON_CONTENT_TYPE)
    }

    /// Body with any `Content-Encoding` undone.
    pub fn read_body(&self) -> Result<Vec<u8>> {
        encoding::read_body(&self.body, self.content_encoding())
    }

    /// Decoded body as text, honoring the `charset` of `Content-Type`.
    pub fn text(&self) -> Result<String> {
        let body = self.read_body()?;
        Ok(decode_body_with_charset(&body, self.content_type()))
    }
}

/// The outcome of one request: the response, the merged cookie list to carry
/// into the next call, and the decoded body when a decoder produced one.
#[derive(Debug, Clone)]
pub struct Exchange<T = ()> {
    pub response: HttpResponse,
    pub cookies: Vec<Cookie>,
    pub decoded: Option<T>,
}

impl<T> Exchange<T> {
    pub fn status(&self) -> StatusCode {
        self.response.status
    }

    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|c| c.name == name)
    }
}

/// Optional decoding step run on every response.
pub trait ResponseDecoder {
    type Output;

    fn decode(&self, response: &HttpResponse) -> Result<Option<Self::Output>>;
}

/// Leaves the body alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDecode;

impl ResponseDecoder for NoDecode {
    type Output = ();

    fn decode(&self, _response: &HttpResponse) -> Result<Option<()>> {
        Ok(None)
    }
}

/// Parses JSON responses into `T`. Other content types yield `None`.
pub struct JsonInto<T>(PhantomData<fn() -> T>);

impl<T> JsonInto<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for JsonInto<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> ResponseDecoder for JsonInto<T> {
    type Output = T;

    fn decode(&self, response: &HttpResponse) -> Result<Option<T>> {
        if !response.is_json() {
            return Ok(None);
        }
        let body = response.read_body()?;
        Ok(Some(serde_json::from_slice(&body)?))
    }
}

pub(crate) fn extract_charset(content_type: Option<&str>) -> Option<String> {
    content_type?.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })
}

pub(crate) fn decode_body_with_charset(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = extract_charset(content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(body);
    text.into_owned()
}
