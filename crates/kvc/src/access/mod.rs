// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field access: accessors, address resolution, and key paths.
//!
//! All raw-pointer work of the crate lives under this module and in
//! [`crate::value`]; the public surface in [`crate::api`] is safe.

pub mod accessor;
pub(crate) mod address;
pub mod error;
pub mod path;

pub use accessor::Accessor;
pub use error::AccessError;
pub use path::KeyPath;

pub(crate) use path::{resolve, Access};
