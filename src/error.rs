use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum VizError {
    #[error("dataset length mismatch: {sphere} sphere points, {text} text points")]
    LengthMismatch { sphere: usize, text: usize },

    #[error("{0} not available")]
    Missing(&'static str),

    #[error("element #{0} not found")]
    ElementNotFound(String),

    #[error("{0} context not supported")]
    ContextUnavailable(&'static str),

    #[error("shader compile failed: {0}")]
    ShaderCompile(String),

    #[error("program link failed: {0}")]
    ProgramLink(String),

    #[error("failed to allocate {0}")]
    Allocation(&'static str),

    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for VizError {
    fn from(value: JsValue) -> Self {
        VizError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<VizError> for JsValue {
    fn from(err: VizError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VizError>;
