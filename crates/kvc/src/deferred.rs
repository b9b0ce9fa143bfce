// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `Deferred<T>`: storage whose initializer runs on first access.
//!
//! Through key-value coding a deferred field is optional-shaped: it reads
//! as absent until it has been materialized, either by [`Deferred::get`]
//! or by a write. By convention the backing field is named with the
//! [`DEFERRED_STORAGE_PREFIX`](crate::config::DEFERRED_STORAGE_PREFIX)
//! (`__deferred_total`), and is published without it (`total`).

use crate::types::{Reflect, TypeInfo, TypeKind};
use crate::value::AnyValue;
use std::fmt;

/// Lazily initialized value.
///
/// # Example
/// ```
/// use kvc::Deferred;
///
/// let mut total = Deferred::new(|| 10u32);
/// assert!(!total.is_materialized());
/// assert_eq!(*total.get(), 10);
/// assert!(total.is_materialized());
/// ```
#[derive(Clone)]
pub struct Deferred<T> {
    value: Option<T>,
    init: fn() -> T,
}

impl<T> Deferred<T> {
    #[must_use]
    pub fn new(init: fn() -> T) -> Self {
        Self { value: None, init }
    }

    /// Value, running the initializer if needed.
    pub fn get(&mut self) -> &T {
        self.value.get_or_insert_with(self.init)
    }

    /// Mutable value, running the initializer if needed.
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_or_insert_with(self.init)
    }

    /// Value if already materialized; never runs the initializer.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.value.as_ref()
    }

    #[must_use]
    pub fn is_materialized(&self) -> bool {
        self.value.is_some()
    }

    /// Materialize with an explicit value.
    pub fn set(&mut self, value: T) {
        self.value = Some(value);
    }

    /// Drop the value; the next access runs the initializer again.
    pub fn reset(&mut self) -> Option<T> {
        self.value.take()
    }
}

impl<T: Default> Default for Deferred<T> {
    fn default() -> Self {
        Self::new(T::default)
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => f.debug_tuple("Deferred").field(value).finish(),
            None => f.write_str("Deferred(<uninit>)"),
        }
    }
}

impl<T: Reflect> Reflect for Deferred<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Self>(TypeKind::Deferred(T::type_info))
    }

    fn into_erased(self) -> Option<AnyValue> {
        self.value.and_then(T::into_erased)
    }

    // Keeps `init`: absence resets, a payload materializes.
    fn assign_erased(&mut self, value: Option<AnyValue>) -> Result<(), Option<AnyValue>> {
        let Some(value) = value else {
            self.value = None;
            return Ok(());
        };
        let value = match value.downcast::<Self>() {
            Ok(other) => {
                *self = other;
                return Ok(());
            }
            Err(value) => value,
        };
        self.value = Option::<T>::from_erased(Some(value))?;
        Ok(())
    }
}
