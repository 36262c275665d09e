pub mod engine;
pub mod expiry;
pub mod integrity;
pub mod security;

pub use engine::ValidationEngine;
pub use expiry::{Clock, ExpiryResolver, FixedClock, SystemClock};
pub use integrity::IntegrityAssessor;
pub use security::SecurityAssessor;
