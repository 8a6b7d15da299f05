/*!
 * Per-request GraphQL context
 *
 * Responsibility:
 * - Carry the authentication outcome and transport metadata into every resolver
 * - async-graphql access lives in core, the type itself in types
 *
 * Public API:
 * - RequestContext
 * - RequestContextExt
 */

mod core;
mod types;

pub use self::core::RequestContextExt;
pub use types::RequestContext;
