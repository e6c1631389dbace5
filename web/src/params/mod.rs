//! Typed parameters for endpoint inputs.
//!
//! Query strings are deserialized into these types before reaching a
//! controller, so malformed input is rejected by the extractor.

pub(crate) mod action;
pub(crate) mod label;
pub(crate) mod partner;
pub(crate) mod sort;
