//! Feature collection fetching.
//!
//! Uses channel-based communication to bridge async HTTP requests with
//! egui's synchronous update loop. Every layer issues its own request: there
//! is no de-duplication, caching, retry or cancellation.

use crate::geo::{FeatureSet, GeoJsonError};
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Errors that can occur while fetching a feature collection.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request could not be sent or the connection failed.
    Request(String),
    /// The server answered with a non-success status.
    Status(u16),
    /// The response body could not be read.
    Body(String),
    /// The body is not a valid GeoJSON document.
    Parse(GeoJsonError),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Request(msg) => write!(f, "Request failed: {}", msg),
            FetchError::Status(code) => write!(f, "Server returned HTTP {}", code),
            FetchError::Body(msg) => write!(f, "Failed to read response: {}", msg),
            FetchError::Parse(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<GeoJsonError> for FetchError {
    fn from(e: GeoJsonError) -> Self {
        FetchError::Parse(e)
    }
}

/// Completed fetch for one layer.
#[derive(Debug)]
pub struct FetchResult {
    pub layer_id: String,
    pub outcome: Result<FeatureSet, FetchError>,
    /// Time from request start to parsed features
    pub elapsed_ms: f64,
}

/// Channel-based fetcher for layer feature collections.
///
/// Fetches are async but egui's update() is synchronous. Each call to
/// [`FeatureFetchChannel::fetch`] spawns an independent task whose result is
/// delivered through the channel.
pub struct FeatureFetchChannel {
    sender: Sender<FetchResult>,
    receiver: Receiver<FetchResult>,
}

impl Default for FeatureFetchChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureFetchChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Spawns a fetch of `locator` on behalf of `layer_id`.
    ///
    /// On native: a new thread with a blocking HTTP client.
    /// On WASM: `wasm_bindgen_futures::spawn_local` with the browser fetch API.
    pub fn fetch(&self, ctx: egui::Context, layer_id: String, locator: String) {
        let sender = self.sender.clone();
        log::info!("Fetching features for {}", layer_id);

        #[cfg(not(target_arch = "wasm32"))]
        {
            std::thread::spawn(move || {
                let started = web_time::Instant::now();
                let outcome = fetch_features_native(&locator);
                let result = FetchResult {
                    layer_id,
                    outcome,
                    elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
                };
                let _ = sender.send(result);
                ctx.request_repaint();
            });
        }

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let started = web_time::Instant::now();
                let outcome = fetch_features_web(&locator).await;
                let result = FetchResult {
                    layer_id,
                    outcome,
                    elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
                };
                let _ = sender.send(result);
                ctx.request_repaint();
            });
        }
    }

    /// Non-blocking check for a completed fetch.
    ///
    /// Returns Some(result) if a fetch completed, None if nothing is ready.
    pub fn try_recv(&self) -> Option<FetchResult> {
        self.receiver.try_recv().ok()
    }
}

/// Native fetch using a blocking reqwest client.
#[cfg(not(target_arch = "wasm32"))]
fn fetch_features_native(locator: &str) -> Result<FeatureSet, FetchError> {
    let response =
        reqwest::blocking::get(locator).map_err(|e| FetchError::Request(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let body = response
        .text()
        .map_err(|e| FetchError::Body(e.to_string()))?;
    log::debug!("Fetched {} bytes from {}", body.len(), locator);

    Ok(FeatureSet::from_geojson_str(&body)?)
}

/// Browser fetch through `web_sys`.
#[cfg(target_arch = "wasm32")]
async fn fetch_features_web(locator: &str) -> Result<FeatureSet, FetchError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let js_err = |e: wasm_bindgen::JsValue| format!("{:?}", e);

    let opts = web_sys::RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(web_sys::RequestMode::Cors);

    let request = web_sys::Request::new_with_str_and_init(locator, &opts)
        .map_err(|e| FetchError::Request(js_err(e)))?;

    let window =
        web_sys::window().ok_or_else(|| FetchError::Request("no window".to_string()))?;

    let response_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| FetchError::Request(js_err(e)))?;
    let response: web_sys::Response = response_value
        .dyn_into()
        .map_err(|e| FetchError::Request(js_err(e)))?;

    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    let text_promise = response.text().map_err(|e| FetchError::Body(js_err(e)))?;
    let body = JsFuture::from(text_promise)
        .await
        .map_err(|e| FetchError::Body(js_err(e)))?
        .as_string()
        .ok_or_else(|| FetchError::Body("response body is not text".to_string()))?;
    log::debug!("Fetched {} bytes from {}", body.len(), locator);

    Ok(FeatureSet::from_geojson_str(&body)?)
}
