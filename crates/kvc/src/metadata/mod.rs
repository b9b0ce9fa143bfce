// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field metadata: enumerated once per type, cached for the process lifetime.
//!
//! [`TypeMetadata`] pairs a type's [`Classification`] with its ordered list
//! of [`FieldDescriptor`]s. Both are immutable once built and shared through
//! `Arc` by the [`MetadataCache`].

pub mod cache;
pub mod enumerate;

pub use cache::{global, LookupStats, MetadataCache};
pub use enumerate::enumerate;

use crate::access::Accessor;
use crate::config::DEFERRED_STORAGE_PREFIX;
use crate::types::{classify_info, Classification, TypeInfo, TypeKind};
use std::fmt;

/// One stored field of a record, in the owning value's coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    name: &'static str,
    offset: usize,
    declared_type: TypeInfo,
    is_mutable: bool,
    is_reference_counted: bool,
    is_deferred_init: bool,
}

impl FieldDescriptor {
    pub(crate) fn new(
        name: &'static str,
        offset: usize,
        declared_type: TypeInfo,
        readonly: bool,
    ) -> Self {
        let is_deferred_init = matches!(declared_type.kind(), TypeKind::Deferred(_));
        let name = if is_deferred_init {
            name.strip_prefix(DEFERRED_STORAGE_PREFIX).unwrap_or(name)
        } else {
            name
        };
        Self {
            name,
            offset,
            declared_type,
            is_mutable: !readonly,
            is_reference_counted: matches!(declared_type.kind(), TypeKind::Shared(_)),
            is_deferred_init,
        }
    }

    /// Published name (storage prefix stripped for deferred fields).
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Byte offset from the start of the owning record's storage.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn declared_type(&self) -> &TypeInfo {
        &self.declared_type
    }

    /// False for `#[kvc(readonly)]` fields (and fields inherited from a
    /// read-only base).
    #[must_use]
    pub fn is_mutable(&self) -> bool {
        self.is_mutable
    }

    /// True if the field holds a [`Shared`](crate::Shared) reference.
    #[must_use]
    pub fn is_reference_counted(&self) -> bool {
        self.is_reference_counted
    }

    /// True for [`Deferred`](crate::Deferred) fields.
    #[must_use]
    pub fn is_deferred_init(&self) -> bool {
        self.is_deferred_init
    }

    #[must_use]
    pub fn classification(&self) -> Classification {
        classify_info(&self.declared_type)
    }

    /// Typed read/write functions for the declared type.
    #[must_use]
    pub fn accessor(&self) -> Accessor {
        Accessor::for_type(self.declared_type)
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Property(name: '{}', isStrong: {}, isLazy: {}, isVar: {}, offset: {})",
            self.name, self.is_reference_counted, self.is_deferred_init, self.is_mutable, self.offset
        )
    }
}

/// Cached description of one type.
#[derive(Debug, Clone)]
pub struct TypeMetadata {
    type_info: TypeInfo,
    classification: Classification,
    fields: Vec<FieldDescriptor>,
}

impl TypeMetadata {
    /// Classify and enumerate `info`. Prefer [`MetadataCache::metadata_for`].
    #[must_use]
    pub fn build(info: &TypeInfo) -> Self {
        let classification = classify_info(info);
        let fields = if classification.is_record() {
            enumerate(info)
        } else {
            Vec::new()
        };
        Self {
            type_info: *info,
            classification,
            fields,
        }
    }

    #[must_use]
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_info.type_name()
    }

    #[must_use]
    pub fn classification(&self) -> Classification {
        self.classification
    }

    /// Storage size of the type itself (a pointer slot for `Shared`).
    #[must_use]
    pub fn size(&self) -> usize {
        self.type_info.size()
    }

    /// Stored fields in declaration order, base fields in place.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// First field with the given name.
    ///
    /// When a derived record shadows a base field, the base field comes
    /// first in declaration order and wins.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(FieldDescriptor::name)
    }
}

impl fmt::Display for TypeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Metadata(type: {}, kind: .{}, size: {}, properties: [",
            self.type_name(),
            self.type_info.kind().label(),
            self.size()
        )?;
        for (idx, field) in self.fields.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}")?;
        }
        f.write_str("])")
    }
}
