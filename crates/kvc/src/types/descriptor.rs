// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Host type descriptors: the raw layout facts the field enumerator walks.
//!
//! A [`TypeInfo`] is produced by [`Reflect::type_info`] for every reflectable
//! type, either by `#[derive(Reflect)]` (records and enums) or by the impls in
//! [`super::impls`] (std types). It is plain data plus a handful of
//! monomorphized hooks, so it is `Copy` and cheap to rebuild on demand.

use crate::types::Reflect;
use crate::value::AnyValue;
use std::any::TypeId;
use std::fmt;

/// Layout of a single stored field (emitted by `#[derive(Reflect)]`).
#[derive(Clone, Copy)]
pub struct FieldLayout {
    /// Field identifier as declared.
    pub name: &'static str,
    /// Byte offset from the start of the owning value (`core::mem::offset_of!`).
    pub offset: usize,
    /// Descriptor of the declared field type.
    pub field_type: fn() -> TypeInfo,
    /// Declared `#[kvc(readonly)]`.
    pub readonly: bool,
    /// Declared `#[kvc(base)]`: the field embeds a base record whose fields
    /// are published in place of this one.
    pub inherited: bool,
}

impl fmt::Debug for FieldLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldLayout")
            .field("name", &self.name)
            .field("offset", &self.offset)
            .field("field_type", &(self.field_type)().type_name())
            .field("readonly", &self.readonly)
            .field("inherited", &self.inherited)
            .finish()
    }
}

/// Locks a shared slot and hands the body a pointer to the heap payload.
///
/// Returns `false` without calling the body when the payload is already
/// borrowed on the current thread.
pub(crate) type PayloadFn = unsafe fn(*const u8, bool, &mut dyn FnMut(*mut u8)) -> bool;

/// Layout of a [`Shared`](crate::Shared) reference slot.
#[derive(Clone, Copy)]
pub struct SharedLayout {
    /// Descriptor of the heap payload type.
    pub target: fn() -> TypeInfo,
    pub(crate) payload: PayloadFn,
}

/// Representation kind reported by the host for a type.
#[derive(Clone, Copy)]
pub enum TypeKind {
    /// Record with named, stored fields.
    Struct(&'static [FieldLayout]),
    /// Enumeration (readable and writable as a whole, no fields).
    Enum,
    /// Tuple.
    Tuple,
    /// Function pointer.
    Function,
    /// Leaf value stored inline (scalars, strings, collections).
    Opaque,
    /// `Option<T>`.
    Optional(fn() -> TypeInfo),
    /// [`Deferred<T>`](crate::Deferred): storage initialized on first access.
    Deferred(fn() -> TypeInfo),
    /// [`Shared<T>`](crate::Shared): pointer slot to a heap payload.
    Shared(SharedLayout),
    /// [`AnyValue`]: type-erased container with a type tag.
    Existential,
}

impl TypeKind {
    /// Short lowercase label used by metadata text.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Struct(_) => "struct",
            Self::Enum => "enum",
            Self::Tuple => "tuple",
            Self::Function => "function",
            Self::Opaque => "opaque",
            Self::Optional(_) => "optional",
            Self::Deferred(_) => "deferred",
            Self::Shared(_) => "class",
            Self::Existential => "existential",
        }
    }
}

impl fmt::Debug for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Struct(fields) => f.debug_tuple("Struct").field(fields).finish(),
            Self::Optional(wrapped) => f
                .debug_tuple("Optional")
                .field(&wrapped().type_name())
                .finish(),
            Self::Deferred(wrapped) => f
                .debug_tuple("Deferred")
                .field(&wrapped().type_name())
                .finish(),
            Self::Shared(layout) => f
                .debug_tuple("Shared")
                .field(&(layout.target)().type_name())
                .finish(),
            Self::Enum => f.write_str("Enum"),
            Self::Tuple => f.write_str("Tuple"),
            Self::Function => f.write_str("Function"),
            Self::Opaque => f.write_str("Opaque"),
            Self::Existential => f.write_str("Existential"),
        }
    }
}

/// Monomorphized value operations for one exact type.
#[derive(Clone, Copy)]
pub(crate) struct ValueHooks {
    pub(crate) read: unsafe fn(*const u8) -> Option<AnyValue>,
    pub(crate) write: unsafe fn(*mut u8, Option<AnyValue>) -> Result<(), Option<AnyValue>>,
    pub(crate) clone_into: unsafe fn(*const u8, *mut u8),
    pub(crate) drop_in_place: unsafe fn(*mut u8),
}

/// Runtime description of a reflectable type.
#[derive(Clone, Copy)]
pub struct TypeInfo {
    type_id: TypeId,
    type_name: &'static str,
    size: usize,
    align: usize,
    kind: TypeKind,
    pub(crate) hooks: ValueHooks,
}

impl TypeInfo {
    /// Describe `T` with the given kind.
    ///
    /// The crate builds optional, deferred, shared and existential kinds
    /// itself; external impls should prefer [`record`](Self::record),
    /// [`enumeration`](Self::enumeration) or [`opaque`](Self::opaque).
    pub(crate) fn new<T: Reflect>(kind: TypeKind) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            size: std::mem::size_of::<T>(),
            align: std::mem::align_of::<T>(),
            kind,
            hooks: ValueHooks {
                read: read_erased::<T>,
                write: write_erased::<T>,
                clone_into: clone_into::<T>,
                drop_in_place: drop_in_place::<T>,
            },
        }
    }

    /// Describe a record type with named stored fields.
    #[must_use]
    pub fn record<T: Reflect>(name: &'static str, fields: &'static [FieldLayout]) -> Self {
        Self::new::<T>(TypeKind::Struct(fields)).with_name(name)
    }

    /// Describe an enumeration.
    #[must_use]
    pub fn enumeration<T: Reflect>(name: &'static str) -> Self {
        Self::new::<T>(TypeKind::Enum).with_name(name)
    }

    /// Describe a leaf value with no reflectable fields.
    #[must_use]
    pub fn opaque<T: Reflect>() -> Self {
        Self::new::<T>(TypeKind::Opaque)
    }

    pub(crate) fn tuple<T: Reflect>() -> Self {
        Self::new::<T>(TypeKind::Tuple)
    }

    pub(crate) fn function<T: Reflect>() -> Self {
        Self::new::<T>(TypeKind::Function)
    }

    /// Replace the display name.
    #[must_use]
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.type_name = name;
        self
    }

    /// Stable identity of the type (metadata cache key).
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Storage size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn align(&self) -> usize {
        self.align
    }

    #[must_use]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// True if `T` is the described type.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeInfo {}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("type_name", &self.type_name)
            .field("size", &self.size)
            .field("align", &self.align)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

// SAFETY (all four hooks): callers pass a pointer to an initialized, aligned
// `T` (or, for `clone_into`, uninitialized aligned storage for the copy).

unsafe fn read_erased<T: Reflect>(src: *const u8) -> Option<AnyValue> {
    let value = unsafe { &*src.cast::<T>() };
    value.clone().into_erased()
}

unsafe fn write_erased<T: Reflect>(
    dst: *mut u8,
    value: Option<AnyValue>,
) -> Result<(), Option<AnyValue>> {
    let slot = unsafe { &mut *dst.cast::<T>() };
    slot.assign_erased(value)
}

unsafe fn clone_into<T: Reflect>(src: *const u8, dst: *mut u8) {
    let value = unsafe { &*src.cast::<T>() };
    unsafe { dst.cast::<T>().write(value.clone()) };
}

unsafe fn drop_in_place<T>(slot: *mut u8) {
    unsafe { std::ptr::drop_in_place(slot.cast::<T>()) };
}
