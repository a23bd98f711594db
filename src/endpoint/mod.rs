//! # Endpoint Module
//!
//! Capability contracts and the capability inspector.
//!
//! An endpoint exposes a mandatory **execute** capability and optional
//! **init**, **verb**, **decorators**, **display name** and **summary**
//! capabilities. Typed endpoints implement [`Endpoint`]; the optional
//! capabilities are trait methods returning `None` by default, so their
//! presence is visible without any runtime type introspection.
//! Context-level endpoints assembled from closures use [`RawEndpoint`],
//! where even execute may be missing.
//!
//! [`inspect`] resolves the capabilities once, at registration, into a
//! [`CapabilitySet`]. Order is fixed: init runs first (a failure aborts
//! registration), then the verb is validated, then decorators are read.

mod core;
mod inspect;
mod raw;

pub use self::core::Endpoint;
pub use inspect::{inspect, resolve_verb, short_type_name, CapabilitySet, KNOWN_VERBS};
pub use raw::RawEndpoint;
