//! Domain primitives shared by the repository and API layers.
//!
//! Zero internal dependencies and no database access: validation, pagination
//! and the error taxonomy live here so they can be unit tested in isolation.

pub mod error;
pub mod filter;
pub mod types;
pub mod validator;
