//! Request middleware.
//!
//! Bearer authentication lives in the `AuthenticatedUser` extractor; this
//! module only carries the request-scoped trace identifier.

pub mod trace;

pub use trace::Trace;
