/*
 * Responsibility
 * - Public interface of the middleware (one apply() per concern)
 */
pub mod assets;
pub mod auth;
pub mod cors;
pub mod http;
pub mod json_body;
