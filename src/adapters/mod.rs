// Adapters layer: concrete implementations of the domain ports.

pub mod fallback;
pub mod http_vision;
pub mod memory;

#[cfg(feature = "aws")]
pub mod aws;

pub use fallback::FallbackVisionProvider;
pub use http_vision::HttpVisionProvider;
pub use memory::InMemoryAuditRepository;
