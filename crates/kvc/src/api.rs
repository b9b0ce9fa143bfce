// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Public access surface.
//!
//! Two flavours of every operation:
//!
//! - lenient (`value_of`, `set_value`, ...): any failure reads as `None` or
//!   leaves the value unchanged, so an unknown key and an empty optional look
//!   the same;
//! - strict (`try_value_of`, `try_set_value`): the same resolution, with the
//!   reason surfaced as an [`AccessError`].
//!
//! All of them use the process-wide [`metadata::global`] cache.

use crate::access::{resolve, Access, AccessError, KeyPath};
use crate::config::PATH_DELIMITER;
use crate::metadata::{self, FieldDescriptor, TypeMetadata};
use crate::types::{Reflect, TypeInfo};
use crate::value::AnyValue;
use std::ptr;
use std::sync::Arc;

/// Cached metadata of `T`.
pub fn metadata_of<T: Reflect>() -> Arc<TypeMetadata> {
    metadata::global().metadata_for(&T::type_info())
}

/// Cached metadata of a described type.
pub fn metadata_of_info(info: &TypeInfo) -> Arc<TypeMetadata> {
    metadata::global().metadata_for(info)
}

/// Ordered stored fields of `T`.
pub fn fields_of<T: Reflect>() -> Vec<FieldDescriptor> {
    metadata::global().properties_for(&T::type_info())
}

/// Read the field at a dotted `key`.
///
/// # Example
/// ```
/// #[derive(Clone, kvc::Reflect)]
/// struct Account {
///     id: i64,
///     owner: Option<String>,
/// }
///
/// let mut account = Account { id: 1, owner: None };
/// assert!(kvc::value_of(&account, "owner").is_none());
///
/// kvc::set_value(&mut account, "owner", String::from("Bob"));
/// let owner = kvc::value_of(&account, "owner");
/// assert_eq!(owner.as_ref().and_then(|v| v.downcast_ref::<String>()).map(String::as_str), Some("Bob"));
///
/// kvc::set_value(&mut account, "id", "oops");
/// assert_eq!(account.id, 1);
/// ```
pub fn value_of<T: Reflect>(instance: &T, key: &str) -> Option<AnyValue> {
    lenient_read(try_value_of(instance, key), key)
}

/// Read the field at a pre-split path.
pub fn value_at<T: Reflect>(instance: &T, path: &KeyPath) -> Option<AnyValue> {
    let result = read_path(instance, path.segments());
    lenient_read(result, path)
}

/// Write `value` into the field at a dotted `key`; a no-op on any failure.
///
/// `None::<U>` writes absence into an optional field.
pub fn set_value<T: Reflect, V: Reflect>(instance: &mut T, key: &str, value: V) {
    lenient_write(try_set_value(instance, key, value), key);
}

/// Write `value` into the field at a pre-split path; a no-op on any failure.
pub fn set_value_at<T: Reflect, V: Reflect>(instance: &mut T, path: &KeyPath, value: V) {
    let result = write_path(instance, path.segments(), value.into_erased());
    lenient_write(result, path);
}

/// Strict read.
///
/// `Ok(None)` means the field exists and holds an empty optional.
pub fn try_value_of<T: Reflect>(instance: &T, key: &str) -> Result<Option<AnyValue>, AccessError> {
    let segments: Vec<&str> = key.split(PATH_DELIMITER).collect();
    read_path(instance, &segments)
}

/// Strict write.
///
/// On error the instance is unchanged.
pub fn try_set_value<T: Reflect, V: Reflect>(
    instance: &mut T,
    key: &str,
    value: V,
) -> Result<(), AccessError> {
    let segments: Vec<&str> = key.split(PATH_DELIMITER).collect();
    write_path(instance, &segments, value.into_erased())
}

fn read_path<T: Reflect, S: AsRef<str>>(
    instance: &T,
    segments: &[S],
) -> Result<Option<AnyValue>, AccessError> {
    let slot = ptr::from_ref(instance).cast::<u8>().cast_mut();
    let mut access = Access::Read;
    // SAFETY: `slot` is a live `T`; read access never writes through it.
    unsafe { resolve(slot, &T::type_info(), segments, &mut access, metadata::global()) }
}

fn write_path<T: Reflect, S: AsRef<str>>(
    instance: &mut T,
    segments: &[S],
    value: Option<AnyValue>,
) -> Result<(), AccessError> {
    let slot = ptr::from_mut(instance).cast::<u8>();
    let mut access = Access::Write(value);
    // SAFETY: `slot` is a live, exclusively borrowed `T`.
    unsafe { resolve(slot, &T::type_info(), segments, &mut access, metadata::global()) }
        .map(|_| ())
}

fn lenient_read(
    result: Result<Option<AnyValue>, AccessError>,
    key: impl std::fmt::Display,
) -> Option<AnyValue> {
    result.unwrap_or_else(|err| {
        log::trace!("[kvc] read '{}' failed: {}", key, err);
        None
    })
}

fn lenient_write(result: Result<(), AccessError>, key: impl std::fmt::Display) {
    if let Err(err) = result {
        log::trace!("[kvc] write '{}' ignored: {}", key, err);
    }
}

/// Key-value coding methods for every [`Reflect`] type.
///
/// # Example
/// ```
/// use kvc::KeyValueCoding;
///
/// #[derive(Clone, kvc::Reflect)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let mut p = Point { x: 1, y: 2 };
/// p.set_value("y", 5i32);
/// assert_eq!(p.value_as::<i32>("y"), Some(5));
/// assert_eq!(p.metadata().fields().len(), 2);
/// assert_eq!(p.x, 1);
/// ```
pub trait KeyValueCoding: Reflect {
    /// Cached metadata of `Self`.
    fn metadata(&self) -> Arc<TypeMetadata> {
        metadata_of::<Self>()
    }

    /// See [`value_of`].
    fn value(&self, key: &str) -> Option<AnyValue> {
        value_of(self, key)
    }

    /// Read and convert to `V`; `None` if absent or of another type.
    fn value_as<V: Reflect>(&self, key: &str) -> Option<V> {
        V::from_erased(self.value(key)).ok()
    }

    /// See [`set_value`](crate::set_value).
    fn set_value<V: Reflect>(&mut self, key: &str, value: V) {
        set_value(self, key, value);
    }

    /// See [`value_at`].
    fn value_at(&self, path: &KeyPath) -> Option<AnyValue> {
        value_at(self, path)
    }

    /// See [`set_value_at`](crate::set_value_at).
    fn set_value_at<V: Reflect>(&mut self, path: &KeyPath, value: V) {
        set_value_at(self, path, value);
    }
}

impl<T: Reflect> KeyValueCoding for T {}
