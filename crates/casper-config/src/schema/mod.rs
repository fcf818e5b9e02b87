//! Configuration schema types for Casper.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod biography;
mod gemini;
mod persona;
mod storage;
mod system;

pub use biography::*;
pub use gemini::*;
pub use persona::*;
pub use storage::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration for Casper.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CasperConfig {
    pub persona: PersonaConfig,
    pub biography: BiographyConfig,
    pub gemini: GeminiSchemaConfig,
    pub secrets: SecretsConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}
