use crate::config::AppConfig;
use anyhow::{Context, Result};
use crux_http::{
    HttpError,
    protocol::{HttpHeader, HttpRequest, HttpResponse, HttpResult},
};
#[cfg(any(test, feature = "mock"))]
use mockall::automock;
use reqwest::{Client, Method};
use smarthome_ui_core::BASE_URL;
use std::time::Duration;
use trait_variant::make;

/// Executes the core's HTTP effects
#[make(Send + Sync)]
#[cfg_attr(any(test, feature = "mock"), automock)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest) -> HttpResult;
}

#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Self::with_base(&config.api.base_url, config.api.timeout)
    }

    pub fn with_base(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to create http client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| HttpError::Url(format!("invalid method {}: {e}", request.method)))?;
        let url = resolve_url(&request.url, &self.base_url);
        log::debug!("{method} {url}");

        let mut builder = self.client.request(method, &url);
        for HttpHeader { name, value } in request.headers {
            builder = builder.header(name, value);
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await.map_err(to_http_error)?;
        let status = response.status().as_u16();

        let mut headers = Vec::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.push((name.as_str().to_string(), value.to_string()));
            }
        }

        let body = response.bytes().await.map_err(to_http_error)?;

        let mut built = HttpResponse::status(status);
        for (name, value) in headers {
            built.header(name, value);
        }
        Ok(built.body(body.to_vec()).build())
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> HttpResult {
        match self.execute(request).await {
            Ok(response) => HttpResult::Ok(response),
            Err(e) => {
                log::warn!("http request failed: {e}");
                HttpResult::Err(e)
            }
        }
    }
}

/// Replace the core's placeholder origin with the backend address.
///
/// Absolute URLs pointing elsewhere are passed through unchanged.
pub fn resolve_url(url: &str, base_url: &str) -> String {
    match url.strip_prefix(BASE_URL) {
        Some(path) => format!("{}{path}", base_url.trim_end_matches('/')),
        None => url.to_string(),
    }
}

fn to_http_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Io(e.to_string())
    }
}
