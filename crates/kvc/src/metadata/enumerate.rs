// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field enumerator: walks a type's `FieldLayout` table.

use super::FieldDescriptor;
use crate::types::{FieldLayout, TypeInfo, TypeKind};

/// Ordered stored fields of a record type.
///
/// - value records (`Struct` kind) publish their own table;
/// - reference records (`Shared<T>`) publish the fields of `T`, with
///   offsets relative to the heap payload;
/// - every other kind has no fields.
///
/// `#[kvc(base)]` fields are replaced in place by the base record's fields,
/// with offsets made absolute in the enclosing record. Zero-sized fields
/// have no storage and are skipped.
#[must_use]
pub fn enumerate(info: &TypeInfo) -> Vec<FieldDescriptor> {
    match info.kind() {
        TypeKind::Struct(_) => record_fields(info),
        TypeKind::Shared(shared) => record_fields(&(shared.target)()),
        _ => Vec::new(),
    }
}

fn record_fields(info: &TypeInfo) -> Vec<FieldDescriptor> {
    let TypeKind::Struct(layouts) = info.kind() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(layouts.len());
    collect(layouts, 0, false, &mut out);
    out
}

fn collect(layouts: &[FieldLayout], base: usize, readonly: bool, out: &mut Vec<FieldDescriptor>) {
    for layout in layouts {
        let declared = (layout.field_type)();
        let offset = base + layout.offset;
        let readonly = readonly || layout.readonly;

        if layout.inherited {
            if let TypeKind::Struct(inner) = declared.kind() {
                collect(inner, offset, readonly, out);
                continue;
            }
        }
        if declared.size() == 0 {
            continue;
        }
        out.push(FieldDescriptor::new(layout.name, offset, declared, readonly));
    }
}
