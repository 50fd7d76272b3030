use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("{0} element not found, skipping")]
    MissingElement(&'static str),
    #[error("could not decode {what}: {source}")]
    Data {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for PageError {
    fn from(value: JsValue) -> Self {
        PageError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}
