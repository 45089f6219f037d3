//! # Filmstore Server
//!
//! HTTP surface for the filmstore catalog. Route handlers are stateless
//! request/response transformers over the core crate's store adapter and
//! link engine; each request is an independent unit of work.

#![warn(missing_docs)]

/// HTTP API: router, handlers, response envelopes
pub mod api;
