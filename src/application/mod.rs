//! Application layer: the validation operations.
//!
//! Each operation takes an untyped record and returns either the normalized,
//! typed request or a [`ValidationError`](crate::error::ValidationError)
//! listing every field that broke its constraint.

pub mod validator;
