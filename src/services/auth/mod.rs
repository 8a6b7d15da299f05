pub mod claims;
pub mod extractor;
pub mod factory;
pub mod identity;
pub mod outcome;
pub mod pipeline;
pub mod verifier;

pub use claims::AuthClaim;
pub use factory::build_auth_pipeline;
pub use identity::{IdentityRecord, IdentityStore, PgIdentityStore};
pub use outcome::AuthOutcome;
pub use pipeline::AuthPipeline;
pub use verifier::TokenVerifier;
