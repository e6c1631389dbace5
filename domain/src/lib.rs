//! This module re-exports various items from the `entity_api` crate.
//!
//! The purpose of this re-export is to ensure that consumers of the `domain` crate do not need to
//! directly depend on the `entity_api` crate. By re-exporting these items, we provide a clear and
//! consistent interface for working with query filters within the domain layer, while encapsulating
//! the underlying implementation details remain in the `entity_api` crate.
pub use entity_api::{query::QuerySort, IntoQueryFilterMap, QueryFilterMap};

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{
    action_type, actions, cases, labels, organizations, partners, profiles, roles, user_roles,
    users, Id, RESERVED_USER_ID,
};

pub mod action;
pub mod case;
pub mod error;
pub mod label;
pub mod organization;
pub mod partner;
pub mod permission;
pub mod user;
pub mod user_form;
pub mod validation;
