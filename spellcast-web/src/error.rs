//! Errors raised at the JS boundary. The game core itself never fails.

use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Invalid landmark data: {len} floats for {hands} hand(s), expected at least {expected}")]
    InvalidLandmarkData {
        len: usize,
        hands: usize,
        expected: usize,
    },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<BridgeError> for JsValue {
    fn from(err: BridgeError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
