// error.rs - Gallery error type
//
// Everything fallible in the crate returns `GalleryError`; it is turned into a
// `JsValue` only at the wasm boundary.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("no global window")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("missing element: {0}")]
    MissingElement(String),

    #[error("WebGL2 context unavailable")]
    ContextUnavailable,

    #[error("shader compile failed: {0}")]
    Shader(String),

    #[error("program link failed: {0}")]
    Link(String),

    #[error("could not allocate {0}")]
    Resource(&'static str),

    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for GalleryError {
    fn from(value: JsValue) -> Self {
        GalleryError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<GalleryError> for JsValue {
    fn from(err: GalleryError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl GalleryError {
    /// Errors that will repeat on every frame, so the loop should stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GalleryError::ContextUnavailable)
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            GalleryError::MissingElement(".scrollable".into()).to_string(),
            "missing element: .scrollable"
        );
        assert_eq!(GalleryError::Resource("framebuffer").to_string(), "could not allocate framebuffer");
    }

    #[test]
    fn only_context_loss_is_fatal() {
        assert!(GalleryError::ContextUnavailable.is_fatal());
        assert!(!GalleryError::Js("oops".into()).is_fatal());
        assert!(!GalleryError::Shader("bad".into()).is_fatal());
    }
}
