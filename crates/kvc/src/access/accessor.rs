// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Accessor resolver: typed read/write at a raw address behind an erased
//! signature.

use super::AccessError;
use crate::types::TypeInfo;
use crate::value::AnyValue;

/// Read/write functions specialized for one exact type.
///
/// Reads of optional-shaped types (`Option<T>`, `Deferred<T>`) unwrap every
/// level: an empty optional reads as `None`, never as a wrapped empty value.
#[derive(Debug, Clone, Copy)]
pub struct Accessor {
    info: TypeInfo,
}

impl Accessor {
    #[must_use]
    pub fn for_type(info: TypeInfo) -> Self {
        Self { info }
    }

    #[must_use]
    pub fn type_info(&self) -> &TypeInfo {
        &self.info
    }

    /// Storage size of the accessed type.
    #[must_use]
    pub fn size(&self) -> usize {
        self.info.size()
    }

    /// Clone the value at `address` out as an erased value.
    ///
    /// # Safety
    ///
    /// `address` must point to an initialized, aligned value of exactly the
    /// accessor's type.
    #[must_use]
    pub unsafe fn read(&self, address: *const u8) -> Option<AnyValue> {
        // SAFETY: forwarded from the caller.
        unsafe { (self.info.hooks.read)(address) }
    }

    /// Overwrite the value at `address`.
    ///
    /// # Safety
    ///
    /// `address` must point to an initialized, aligned value of exactly the
    /// accessor's type, valid for writes.
    ///
    /// # Errors
    ///
    /// [`AccessError::TypeMismatch`] if `value` cannot be converted to the
    /// accessor's type; the stored value is left untouched.
    pub unsafe fn write(&self, address: *mut u8, value: Option<AnyValue>) -> Result<(), AccessError> {
        // SAFETY: forwarded from the caller.
        unsafe { (self.info.hooks.write)(address, value) }.map_err(|rejected| {
            AccessError::TypeMismatch {
                expected: self.info.type_name(),
                found: rejected.as_ref().map_or("absent", AnyValue::type_name),
            }
        })
    }
}
