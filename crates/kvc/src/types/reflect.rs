// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The `Reflect` contract.

use crate::types::TypeInfo;
use crate::value::AnyValue;
use std::any::Any;

/// Reflect trait: runtime layout and erased conversion contract.
///
/// Implemented by `#[derive(Reflect)]` for records and enums, and by this
/// crate for std types. The three conversion hooks have defaults that treat
/// `Self` as an exact, indivisible type; optional-shaped and existential
/// types override them so callers never observe the wrapper.
pub trait Reflect: Any + Clone + Send {
    /// Type descriptor (generated or built from std impls).
    fn type_info() -> TypeInfo;

    /// Erase a value for hand-off through the type-erased surface.
    ///
    /// `None` means "absent": an empty optional erases to nothing rather
    /// than to a wrapped empty value.
    fn into_erased(self) -> Option<AnyValue> {
        Some(AnyValue::new(self))
    }

    /// Rebuild `Self` from an erased value.
    ///
    /// # Errors
    ///
    /// Returns the rejected input if its dynamic type does not match.
    fn from_erased(value: Option<AnyValue>) -> Result<Self, Option<AnyValue>> {
        match value {
            Some(value) => value.downcast::<Self>().map_err(Some),
            None => Err(None),
        }
    }

    /// Overwrite `self` in place from an erased value.
    ///
    /// # Errors
    ///
    /// Returns the rejected input, leaving `self` untouched, if its dynamic
    /// type does not match.
    fn assign_erased(&mut self, value: Option<AnyValue>) -> Result<(), Option<AnyValue>> {
        *self = Self::from_erased(value)?;
        Ok(())
    }
}
