use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::api::error::ApiError;

/// Raw HTTP response, before any payload interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Seam between the API client and the browser's fetch machinery.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, url: &str) -> Result<HttpResponse, ApiError>;
    async fn post(&self, url: &str, body: String) -> Result<HttpResponse, ApiError>;
}

/// Browser `fetch`-backed transport.
///
/// Only functional on wasm32; on native targets the wasm-bindgen imports are
/// stubs, so tests drive the client through a recording transport instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl Transport for FetchTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, ApiError> {
        self.request("GET", url, None).await
    }

    async fn post(&self, url: &str, body: String) -> Result<HttpResponse, ApiError> {
        self.request("POST", url, Some(body)).await
    }
}

impl FetchTransport {
    async fn request(
        &self,
        method: &str,
        url: &str,
        body: Option<String>,
    ) -> Result<HttpResponse, ApiError> {
        let opts = RequestInit::new();
        opts.set_method(method);
        if let Some(body) = &body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(url, &opts).map_err(transport_error)?;
        if body.is_some() {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(transport_error)?;
        }

        let window = web_sys::window()
            .ok_or_else(|| ApiError::Transport("no window object available".to_string()))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport_error)?
            .dyn_into()
            .map_err(|_| ApiError::Transport("fetch did not yield a Response".to_string()))?;

        let text = JsFuture::from(response.text().map_err(transport_error)?)
            .await
            .map_err(transport_error)?;

        Ok(HttpResponse {
            status: response.status(),
            body: text.as_string().unwrap_or_default(),
        })
    }
}

fn transport_error(value: JsValue) -> ApiError {
    let message = value.as_string().unwrap_or_else(|| format!("{value:?}"));
    ApiError::Transport(message)
}
