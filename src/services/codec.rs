//! Identifier codec used by the `encrypted=true` lookups

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::{
    config::CodecConfig,
    error::{AppError, AppResult},
};

/// Turns entity ids into opaque tokens and back.
///
/// Deployments that need real encryption plug their own implementation in
/// here; handlers only ever see this trait.
pub trait IdCodec: Send + Sync {
    fn encode(&self, id: &str) -> String;
    fn decode(&self, token: &str) -> AppResult<String>;
}

/// URL-safe base64 tokens. Opaque, not secret.
#[derive(Debug, Default, Clone, Copy)]
pub struct Base64IdCodec;

impl IdCodec for Base64IdCodec {
    fn encode(&self, id: &str) -> String {
        URL_SAFE_NO_PAD.encode(id.as_bytes())
    }

    fn decode(&self, token: &str) -> AppResult<String> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| AppError::Validation(format!("invalid id token: {}", e)))?;
        String::from_utf8(bytes).map_err(|_| AppError::Validation("invalid id token".to_string()))
    }
}

/// Build the codec named by `codec.kind`
pub fn from_config(config: &CodecConfig) -> AppResult<Arc<dyn IdCodec>> {
    match config.kind.as_str() {
        "base64" => Ok(Arc::new(Base64IdCodec)),
        other => Err(AppError::Internal(format!("unknown id codec '{}'", other))),
    }
}
