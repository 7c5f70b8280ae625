pub mod adapters;
pub mod core;
pub mod orchestration;
pub mod security;
pub mod validation;

pub use self::core::*;
pub use adapters::{AdapterLoader, DetectedPlatform};
pub use orchestration::{OrchestratorOptions, PublishOrchestrator, PublishReport};
pub use security::{
    CaptionScanner, CredentialValidator, ScanReport, SecretFinding, SecureTokenManager,
};
pub use validation::{MediaValidator, RequestValidator};
