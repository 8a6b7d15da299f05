/*
 * Responsibility
 * - HTTP surface of the subgraph (routes() re-export)
 */
pub mod context;
pub mod handlers;
mod routes;
pub mod schema;

pub use routes::routes;
