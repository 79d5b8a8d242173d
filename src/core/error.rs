use thiserror::Error;

use crate::core::types::{ForceId, HexId};

#[derive(Error, Debug)]
pub enum BattlefieldError {
    #[error("hex not found: {0}")]
    HexNotFound(HexId),

    #[error("force not found: {0}")]
    ForceNotFound(ForceId),

    #[error("empty {0} identifier")]
    EmptyIdentifier(&'static str),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, BattlefieldError>;
