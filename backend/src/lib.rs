//! Circle backend library: a hexagonal social-network service.
//!
//! - [`domain`]: entities, ports and services, free of framework types.
//! - [`inbound`]: the actix-web HTTP adapter.
//! - [`outbound`]: Diesel, in-memory and argon2 adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
