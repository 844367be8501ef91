//! Provider-specific constraints and request parameter shaping.
//!
//! Everything in this crate is a pure function over request inputs; no I/O.

pub mod params;
pub mod provider;

pub use params::{NormalizedParams, RawParams};
pub use provider::{normalize_tool_choice, provider_id, ProviderPolicy};
