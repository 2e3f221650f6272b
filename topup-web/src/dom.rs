use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Headers, Request, RequestInit, RequestMode, Response, Storage, Window};

/// Retrieve the global `window` object.
///
/// Always `None` outside the browser, so server-side rendering and native
/// tests never touch JavaScript bindings.
#[must_use]
pub fn window() -> Option<Window> {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

/// Retrieve the document object for DOM interactions.
#[must_use]
pub fn document() -> Option<Document> {
    window().and_then(|win| win.document())
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Log an error message to the browser console.
pub fn console_error(message: &str) {
    log::error!("{message}");
    if window().is_some() {
        web_sys::console::error_1(&JsValue::from(message));
    }
}

/// Whether the page URL carries `key=value` in its query string.
#[must_use]
pub fn query_flag(key: &str, value: &str) -> bool {
    let needle = format!("{key}={value}");
    window()
        .and_then(|win| win.location().search().ok())
        .is_some_and(|search| {
            search
                .trim_start_matches('?')
                .split('&')
                .any(|pair| pair == needle)
        })
}

/// Milliseconds since the Unix epoch from the browser clock.
#[must_use]
pub fn now_millis() -> Option<f64> {
    window().map(|_| js_sys::Date::now())
}

/// A fetched response body with its HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedText {
    pub status: u16,
    pub body: String,
}

impl FetchedText {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Perform a CORS `GET` with extra headers and read the body as text.
///
/// # Errors
/// Returns an error if no browser window is available, the request cannot be
/// built, or the fetch itself fails.
#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
pub async fn fetch_text(url: &str, headers: &[(&str, &str)]) -> Result<FetchedText, JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("window unavailable"))?;

    let init = RequestInit::new();
    init.set_method("GET");
    init.set_mode(RequestMode::Cors);
    let header_map = Headers::new()?;
    for (name, value) in headers {
        header_map.set(name, value)?;
    }
    init.set_headers(&header_map);

    let request = Request::new_with_str_and_init(url, &init)?;
    let resp_value = JsFuture::from(win.fetch_with_request(&request)).await?;
    let response: Response = resp_value.dyn_into()?;
    let status = response.status();
    let body = JsFuture::from(response.text()?).await?;
    Ok(FetchedText {
        status,
        body: body.as_string().unwrap_or_default(),
    })
}

/// Access the browser `localStorage` handle.
///
/// Returns `None` when there is no browser window or storage is blocked.
#[must_use]
pub fn local_storage() -> Option<Storage> {
    window().and_then(|win| win.local_storage().ok().flatten())
}
