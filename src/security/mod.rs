pub mod caption_scanner;
pub mod credential_validator;
pub mod token_manager;

pub use caption_scanner::{CaptionScanner, ScanReport, SecretFinding};
pub use credential_validator::{CredentialValidator, TokenCheck};
pub use token_manager::{SecureTokenManager, PLATFORM_TOKENS};
