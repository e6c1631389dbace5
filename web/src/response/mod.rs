//! Response DTOs for endpoints whose body is shaped differently from the
//! domain type they are built from.

pub(crate) mod user;
