//! HTTP session module
//!
//! [`Session`] owns one `reqwest::Client` and runs every request through a
//! single pipeline: build, attach headers/cookies/authorization, dispatch,
//! merge cookies, read the body and optionally decode it.

use crate::config::SessionConfig;
use crate::cookie::{cookie_header, merge_cookies, Cookie};
use crate::error::{ReqHelperError, Result};
use crate::report::{FailureReporter, PanicReporter};
use crate::utils::UrlUtils;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, Method};
use serde::de::DeserializeOwned;

pub mod auth;
pub mod encoding;
pub mod request;
pub mod response;

use request::{header_value, Payload, RequestOptions};
use response::{Exchange, HttpResponse, JsonInto, NoDecode, ResponseDecoder};

/// Request session shared by the calls of one test.
pub struct Session {
    client: Client,
    config: SessionConfig,
    reporter: Box<dyn FailureReporter>,
}

impl Session {
    /// Wrap an existing client. The session takes ownership of it; `config`
    /// should describe how that client was built.
    pub fn new(
        client: Client,
        config: SessionConfig,
        reporter: impl FailureReporter + 'static,
    ) -> Self {
        Self {
            client,
            config,
            reporter: Box::new(reporter),
        }
    }

    /// Build the client from `config`.
    pub fn from_config(
        config: SessionConfig,
        reporter: impl FailureReporter + 'static,
    ) -> Result<Self> {
        let client = build_client(&config)?;
        Ok(Self {
            client,
            config,
            reporter: Box::new(reporter),
        })
    }

    /// Default configuration, failures panic. Also installs test logging.
    pub fn for_tests() -> Self {
        crate::logging::init_for_tests();
        match Self::from_config(SessionConfig::default(), PanicReporter) {
            Ok(session) => session,
            Err(err) => PanicReporter.fail(&err),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Send `body` as the raw request payload.
    pub async fn try_send_with_body(
        &self,
        method: &str,
        host: &str,
        path: &str,
        body: impl Into<Vec<u8>>,
        options: &RequestOptions,
    ) -> Result<Exchange> {
        let payload = Payload::Bytes(body.into());
        self.execute(method, host, path, payload, options, NoDecode)
            .await
    }

    /// Like [`Session::try_send_with_body`], parsing `application/json`
    /// responses into `T`.
    pub async fn try_send_with_body_json<T: DeserializeOwned>(
        &self,
        method: &str,
        host: &str,
        path: &str,
        body: impl Into<Vec<u8>>,
        options: &RequestOptions,
    ) -> Result<Exchange<T>> {
        let payload = Payload::Bytes(body.into());
        self.execute(method, host, path, payload, options, JsonInto::new())
            .await
    }

    /// Send `value` as the single `multipart/form-data` field `field_name`.
    pub async fn try_send_multipart(
        &self,
        method: &str,
        host: &str,
        path: &str,
        field_name: &str,
        value: &[u8],
        options: &RequestOptions,
    ) -> Result<Exchange> {
        let payload = multipart_payload(field_name, value);
        self.execute(method, host, path, payload, options, NoDecode)
            .await
    }

    pub async fn try_send_multipart_json<T: DeserializeOwned>(
        &self,
        method: &str,
        host: &str,
        path: &str,
        field_name: &str,
        value: &[u8],
        options: &RequestOptions,
    ) -> Result<Exchange<T>> {
        let payload = multipart_payload(field_name, value);
        self.execute(method, host, path, payload, options, JsonInto::new())
            .await
    }

    /// Send a request with no body.
    pub async fn try_send_without_body(
        &self,
        method: &str,
        host: &str,
        path: &str,
        options: &RequestOptions,
    ) -> Result<Exchange> {
        self.execute(method, host, path, Payload::Empty, options, NoDecode)
            .await
    }

    pub async fn try_send_without_body_json<T: DeserializeOwned>(
        &self,
        method: &str,
        host: &str,
        path: &str,
        options: &RequestOptions,
    ) -> Result<Exchange<T>> {
        self.execute(method, host, path, Payload::Empty, options, JsonInto::new())
            .await
    }

    pub async fn send_with_body(
        &self,
        method: &str,
        host: &str,
        path: &str,
        body: impl Into<Vec<u8>>,
        options: &RequestOptions,
    ) -> Exchange {
        let result = self
            .try_send_with_body(method, host, path, body, options)
            .await;
        self.ensure(result)
    }

    pub async fn send_with_body_json<T: DeserializeOwned>(
        &self,
        method: &str,
        host: &str,
        path: &str,
        body: impl Into<Vec<u8>>,
        options: &RequestOptions,
    ) -> Exchange<T> {
        let result = self
            .try_send_with_body_json(method, host, path, body, options)
            .await;
        self.ensure(result)
    }

    pub async fn send_multipart(
        &self,
        method: &str,
        host: &str,
        path: &str,
        field_name: &str,
        value: &[u8],
        options: &RequestOptions,
    ) -> Exchange {
        let result = self
            .try_send_multipart(method, host, path, field_name, value, options)
            .await;
        self.ensure(result)
    }

    pub async fn send_multipart_json<T: DeserializeOwned>(
        &self,
        method: &str,
        host: &str,
        path: &str,
        field_name: &str,
        value: &[u8],
        options: &RequestOptions,
    ) -> Exchange<T> {
        let result = self
            .try_send_multipart_json(method, host, path, field_name, value, options)
            .await;
        self.ensure(result)
    }

    pub async fn send_without_body(
        &self,
        method: &str,
        host: &str,
        path: &str,
        options: &RequestOptions,
    ) -> Exchange {
        let result = self.try_send_without_body(method, host, path, options).await;
        self.ensure(result)
    }

    pub async fn send_without_body_json<T: DeserializeOwned>(
        &self,
        method: &str,
        host: &str,
        path: &str,
        options: &RequestOptions,
    ) -> Exchange<T> {
        let result = self
            .try_send_without_body_json(method, host, path, options)
            .await;
        self.ensure(result)
    }

    /// Undo the response's `Content-Encoding`. Errors are returned, never
    /// reported as failures.
    pub fn read_body(&self, response: &HttpResponse) -> Result<Vec<u8>> {
        response.read_body()
    }

    fn ensure<T>(&self, result: Result<T>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => self.reporter.fail(&err),
        }
    }

    async fn execute<D: ResponseDecoder>(
        &self,
        method: &str,
        host: &str,
        path: &str,
        payload: Payload,
        options: &RequestOptions,
        decoder: D,
    ) -> Result<Exchange<D::Output>> {
        let method = Method::from_bytes(method.as_bytes()).map_err(|e| {
            ReqHelperError::RequestConstruction(format!("Invalid method '{}': {}", method, e))
        })?;
        let url = UrlUtils::validate_url(&UrlUtils::join(host, path))?;
        let extra_headers = options.header_map()?;
        let body_kind = payload.kind();

        let mut builder = self.client.request(method.clone(), url.clone());
        let mut multipart_type = None;
        match payload {
            Payload::Empty => {}
            Payload::Bytes(bytes) => builder = builder.body(bytes),
            Payload::Multipart { field_name, value } => {
                let form = Form::new().part(field_name, Part::bytes(value));
                multipart_type = Some(format!(
                    "multipart/form-data; boundary={}",
                    form.boundary()
                ));
                builder = builder.multipart(form);
            }
        }

        let mut request = builder
            .build()
            .map_err(|e| ReqHelperError::RequestConstruction(e.to_string()))?;

        let headers = request.headers_mut();
        for (name, value) in extra_headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        if let Some(content_type) = multipart_type {
            headers.insert(CONTENT_TYPE, header_value("Content-Type", &content_type)?);
        }

        if !options.cookies.is_empty() {
            let mut value = cookie_header(&options.cookies);
            if let Some(existing) = options.cookie_header() {
                value = format!("{}; {}", existing, value);
            }
            headers.insert(COOKIE, header_value("Cookie", &value)?);
        }

        if let Some(authorization) = self.authorization_for(options) {
            headers.insert(AUTHORIZATION, header_value("Authorization", authorization)?);
        }

        if let Some(timeout) = options.timeout {
            *request.timeout_mut() = Some(timeout);
        }

        log::debug!(
            "> {} {} ({} body, {} cookies)",
            method,
            url,
            body_kind,
            options.cookies.len()
        );

        let response = self.client.execute(request).await?;
        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let server_cookies: Vec<Cookie> = response.cookies().map(Cookie::from).collect();
        let body = response.bytes().await?.to_vec();

        log::debug!(
            "< {} {} ({} bytes, {} cookies set)",
            status,
            url,
            body.len(),
            server_cookies.len()
        );

        let cookies = merge_cookies(server_cookies, &options.cookies);
        let response = HttpResponse {
            status,
            version,
            headers,
            body,
        };
        let decoded = decoder.decode(&response)?;

        Ok(Exchange {
            response,
            cookies,
            decoded,
        })
    }

    /// In `auth_requires_cookies` mode the header is set whenever cookies are
    /// present, even when empty. Otherwise only a non-empty value is sent.
    fn authorization_for<'a>(&self, options: &'a RequestOptions) -> Option<&'a str> {
        let authorization = options.authorization.as_deref();
        if self.config.auth_requires_cookies {
            if options.cookies.is_empty() {
                return None;
            }
            return Some(authorization.unwrap_or_default());
        }
        authorization.filter(|value| !value.is_empty())
    }
}

/// Build a `reqwest::Client` from the session configuration
pub fn build_client(config: &SessionConfig) -> Result<Client> {
    let mut builder = ClientBuilder::new()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .redirect(if config.follow_redirects {
            reqwest::redirect::Policy::limited(config.max_redirects as usize)
        } else {
            reqwest::redirect::Policy::none()
        });

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }

    if !config.transparent_decompression {
        builder = builder.no_gzip().no_brotli().no_deflate().no_zstd();
    }

    Ok(builder.build()?)
}

fn multipart_payload(field_name: &str, value: &[u8]) -> Payload {
    Payload::Multipart {
        field_name: field_name.to_string(),
        value: value.to_vec(),
    }
}
