// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Address resolver: the one place that knows how each representation
//! stores a record's fields.
//!
//! | Representation       | Field base address                              |
//! |----------------------|-------------------------------------------------|
//! | value record         | the slot itself                                 |
//! | reference record     | heap payload behind the slot (locked, borrowed) |
//! | polymorphic, inline  | the container's inline buffer                   |
//! | polymorphic, boxed   | heap box + header                               |
//!
//! Optional wrappers and unsupported kinds have no field base. Because a
//! reference payload is only valid while its lock is held, the resolver
//! hands the address to a continuation instead of returning it. Continuations
//! touch a single field and return; they never resolve further segments.

use super::AccessError;
use crate::metadata::{MetadataCache, TypeMetadata};
use crate::types::{classify_info, Classification, TypeInfo, TypeKind};
use crate::value;

/// Run `body` with the field base address and metadata of the record stored
/// at `slot`, a value of type `info`.
///
/// # Safety
///
/// `slot` must point to an initialized value of exactly `info`'s type. When
/// `write` is false, `slot` may be derived from a shared reference and
/// `body` must not write through the address it receives.
pub(crate) unsafe fn with_record_address<R>(
    slot: *mut u8,
    info: &TypeInfo,
    write: bool,
    cache: &MetadataCache,
    body: impl FnOnce(*mut u8, &TypeMetadata) -> Result<R, AccessError>,
) -> Result<R, AccessError> {
    match classify_info(info) {
        Classification::ValueRecord => body(slot, &cache.metadata_for(info)),
        // SAFETY: forwarded from the caller.
        Classification::ReferenceRecord => unsafe { through_reference(slot, info, write, cache, body) },
        Classification::PolymorphicContainer => {
            // SAFETY: `info` says `slot` holds an `AnyValue`.
            let (concrete, payload) = unsafe { value::open(slot) };
            match classify_info(&concrete) {
                Classification::ValueRecord => body(payload, &cache.metadata_for(&concrete)),
                Classification::ReferenceRecord => {
                    // SAFETY: the payload is an initialized `concrete`.
                    unsafe { through_reference(payload, &concrete, write, cache, body) }
                }
                _ => Err(AccessError::UnsupportedShape {
                    type_name: concrete.type_name(),
                }),
            }
        }
        Classification::OptionalWrapper | Classification::Unsupported => {
            Err(AccessError::UnsupportedShape {
                type_name: info.type_name(),
            })
        }
    }
}

/// Lock the reference at `slot` and run `body` on its heap payload.
unsafe fn through_reference<R>(
    slot: *mut u8,
    info: &TypeInfo,
    write: bool,
    cache: &MetadataCache,
    body: impl FnOnce(*mut u8, &TypeMetadata) -> Result<R, AccessError>,
) -> Result<R, AccessError> {
    let TypeKind::Shared(layout) = info.kind() else {
        return Err(AccessError::UnsupportedShape {
            type_name: info.type_name(),
        });
    };
    let busy = || AccessError::Busy {
        type_name: (layout.target)().type_name(),
    };

    let meta = cache.metadata_for(info);
    let mut body = Some(body);
    let mut result = None;
    let mut run = |payload: *mut u8| {
        if let Some(body) = body.take() {
            result = Some(body(payload, &meta));
        }
    };

    // SAFETY: `info` is the exact type of `slot`, so `payload` matches it.
    if !unsafe { (layout.payload)(slot.cast_const(), write, &mut run) } {
        return Err(busy());
    }
    result.unwrap_or_else(|| Err(busy()))
}
