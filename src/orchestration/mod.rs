pub mod publisher;

pub use publisher::{OrchestratorOptions, PublishOrchestrator, PublishReport};
