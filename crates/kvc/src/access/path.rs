// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Key paths and the path resolver.
//!
//! A path is resolved one segment at a time. Each intermediate field is read
//! out as a copy, the rest of the path is resolved against the copy, and in
//! write mode the copy is stored back when it is a value record. Reference
//! records are mutated in place through their shared payload, so they need
//! no copy-back.
//!
//! A `Shared` payload stays locked only for the single field read or write
//! that touches it, never across the descent into the next segment, so
//! threads walking cross-linked objects in opposite directions cannot
//! deadlock.

use super::address::with_record_address;
use super::AccessError;
use crate::config::PATH_DELIMITER;
use crate::metadata::{FieldDescriptor, MetadataCache, TypeMetadata};
use crate::types::{classify_info, Classification, TypeInfo};
use crate::value::AnyValue;
use std::fmt;
use std::str::FromStr;

/// Pre-split dotted key (`"department.manager.name"`).
///
/// Parse once and reuse with [`value_at`](crate::value_at) /
/// [`set_value_at`](crate::set_value_at) to avoid splitting per call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self {
            segments: key.split(PATH_DELIMITER).map(str::to_owned).collect(),
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True if there is at least one segment and none is empty.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.segments.is_empty() && self.segments.iter().all(|s| !s.is_empty())
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 {
                write!(f, "{PATH_DELIMITER}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for KeyPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for KeyPath {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(segments: Vec<String>) -> Self {
        Self { segments }
    }
}

/// What to do at the final segment.
pub(crate) enum Access {
    Read,
    /// Write the value (`None` writes absence); taken on use.
    Write(Option<AnyValue>),
}

impl Access {
    fn is_write(&self) -> bool {
        matches!(self, Self::Write(_))
    }
}

/// Resolve `segments` against the value at `slot` of type `info`.
///
/// Returns the value read (always `None` for writes).
///
/// No lock is held while descending: an intermediate is copied out under the
/// parent's lock, the lock is released, and the rest of the path is resolved
/// against the copy. Only the final read/write and a value-record copy-back
/// lock the parent again, each on its own.
///
/// # Safety
///
/// `slot` must point to an initialized value of exactly `info`'s type. For
/// [`Access::Write`] it must be valid for writes; for [`Access::Read`] it may
/// come from a shared reference and is never written.
pub(crate) unsafe fn resolve<S: AsRef<str>>(
    slot: *mut u8,
    info: &TypeInfo,
    segments: &[S],
    access: &mut Access,
    cache: &MetadataCache,
) -> Result<Option<AnyValue>, AccessError> {
    let Some((head, rest)) = segments.split_first() else {
        return Err(AccessError::unknown("", info.type_name()));
    };
    let head = head.as_ref();

    if rest.is_empty() {
        let write = access.is_write();
        // SAFETY: forwarded from the caller.
        return unsafe {
            with_record_address(slot, info, write, cache, |base, meta| {
                let field = lookup(meta, head)?;
                let address = base.add(field.offset());
                match access {
                    Access::Read => Ok(field.accessor().read(address)),
                    Access::Write(value) => {
                        if !field.is_mutable() {
                            return Err(AccessError::ReadOnly { field: field.name() });
                        }
                        field.accessor().write(address, value.take()).map(|()| None)
                    }
                }
            })
        };
    }

    // SAFETY: forwarded from the caller; this pass only reads.
    let (field, mut intermediate) = unsafe {
        with_record_address(slot, info, false, cache, |base, meta| {
            let field = *lookup(meta, head)?;
            let value = field
                .accessor()
                .read(base.add(field.offset()))
                .ok_or_else(|| AccessError::AbsentIntermediate {
                    segment: head.to_owned(),
                })?;
            Ok((field, value))
        })?
    };

    let concrete = intermediate.type_info();
    let copy_back = access.is_write() && classify_info(&concrete) == Classification::ValueRecord;
    if copy_back && !field.is_mutable() {
        return Err(AccessError::ReadOnly { field: field.name() });
    }

    // SAFETY: `intermediate` owns an initialized `concrete`.
    let result = unsafe { resolve(intermediate.payload_mut_ptr(), &concrete, rest, access, cache)? };
    if copy_back {
        // SAFETY: forwarded from the caller (write access).
        unsafe {
            with_record_address(slot, info, true, cache, |base, _| {
                field.accessor().write(base.add(field.offset()), Some(intermediate))
            })?;
        }
    }
    Ok(result)
}

fn lookup<'m>(meta: &'m TypeMetadata, name: &str) -> Result<&'m FieldDescriptor, AccessError> {
    meta.field(name)
        .ok_or_else(|| AccessError::unknown(name, meta.type_name()))
}
