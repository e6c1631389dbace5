pub mod prelude;

// Tenancy and user administration
pub mod organizations;
pub mod profiles;
pub mod roles;
pub mod user_roles;
pub mod users;

// Case management
pub mod action_type;
pub mod actions;
pub mod cases;
pub mod cases_labels;
pub mod labels;
pub mod partners;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = i32;

/// Primary key of the system superuser record created by the initial migration.
/// This account is never listed alongside regular organization users.
pub const RESERVED_USER_ID: Id = 1;
