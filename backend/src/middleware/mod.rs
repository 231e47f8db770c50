//! Request middleware.
//!
//! [`Trace`] assigns every request a trace id, scopes it over the handler so
//! domain errors can pick it up, and echoes it in the `trace-id` header.

pub mod trace;

pub use trace::Trace;
