// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `AnyValue`: the polymorphic container and erased value type.
//!
//! # Layout
//!
//! ```text
//! +-----------------------------+----------------+
//! | buffer: 3 x usize           | tag: fn()      |
//! +-----------------------------+----------------+
//!
//! inline  : value bytes live in `buffer`
//! boxed   : buffer[0] = heap pointer
//!
//!           heap: +---------------+-----------------+
//!                 | BoxHeader 16B | value (aligned) |
//!                 +---------------+-----------------+
//! ```
//!
//! A value is inline when its size fits [`INLINE_BUFFER_SIZE`] and its
//! alignment does not exceed a machine word. The payload of a boxed value
//! starts at `max(BOX_HEADER_SIZE, align)`.

use crate::config::{BOX_HEADER_SIZE, INLINE_BUFFER_ALIGN, INLINE_BUFFER_SIZE, INLINE_BUFFER_WORDS};
use crate::metadata::TypeMetadata;
use crate::types::{Reflect, TypeInfo};
use std::alloc::{self, Layout};
use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;
use std::mem::{ManuallyDrop, MaybeUninit};
use std::ptr;
use std::sync::Arc;

/// Heap header preceding a boxed payload: the layout of the whole allocation.
#[repr(C, align(16))]
struct BoxHeader {
    size: usize,
    align: usize,
}

const _: () = assert!(std::mem::size_of::<BoxHeader>() == BOX_HEADER_SIZE);

/// Type-erased value with a type tag.
///
/// Every read through the engine returns an `AnyValue`; it is also the
/// container to use for fields whose concrete type varies at runtime.
/// Wrapping an `AnyValue` in another `AnyValue` flattens instead of nesting.
///
/// # Example
/// ```
/// use kvc::AnyValue;
///
/// let v = AnyValue::new(42i64);
/// assert!(v.is::<i64>());
/// assert_eq!(v.downcast_ref::<i64>(), Some(&42));
/// assert!(v.downcast_ref::<i32>().is_none());
/// ```
#[repr(C)]
pub struct AnyValue {
    buffer: [MaybeUninit<usize>; INLINE_BUFFER_WORDS],
    tag: fn() -> TypeInfo,
    // Stored values are only required to be `Send`.
    _not_sync: PhantomData<*const ()>,
}

// SAFETY: only `Reflect` types are stored, and `Reflect: Send`.
unsafe impl Send for AnyValue {}

impl AnyValue {
    /// Store `value`, inline when it fits the buffer.
    pub fn new<T: Reflect>(value: T) -> Self {
        if TypeId::of::<T>() == TypeId::of::<AnyValue>() {
            let value = ManuallyDrop::new(value);
            // SAFETY: `T` is `AnyValue`; ownership moves out of the ManuallyDrop.
            return unsafe { ptr::read(ptr::from_ref::<T>(&value).cast::<AnyValue>()) };
        }

        let info = T::type_info();
        let mut container = Self {
            buffer: [MaybeUninit::uninit(); INLINE_BUFFER_WORDS],
            tag: T::type_info,
            _not_sync: PhantomData,
        };
        let dst = if fits_inline(&info) {
            container.buffer.as_mut_ptr().cast::<u8>()
        } else {
            // SAFETY: the buffer is unused; allocate writes the heap pointer into it.
            unsafe { container.allocate(&info) }
        };
        // SAFETY: `dst` is aligned, sized storage for a `T`.
        unsafe { dst.cast::<T>().write(value) };
        container
    }

    /// Descriptor of the stored concrete type.
    #[must_use]
    pub fn type_info(&self) -> TypeInfo {
        (self.tag)()
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_info().type_name()
    }

    /// True if the stored value is a `T`.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_info().is::<T>()
    }

    /// True if the stored value lives in the inline buffer.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        fits_inline(&self.type_info())
    }

    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        if !self.is::<T>() {
            return None;
        }
        // SAFETY: the tag says the payload is a `T`.
        unsafe { Some(&*self.payload_ptr().cast::<T>()) }
    }

    #[must_use]
    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        if !self.is::<T>() {
            return None;
        }
        // SAFETY: the tag says the payload is a `T`; `self` is borrowed mutably.
        unsafe { Some(&mut *self.payload_mut_ptr().cast::<T>()) }
    }

    /// Move the stored value out.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged if the stored value is not a `T`.
    pub fn downcast<T: 'static>(self) -> Result<T, Self> {
        if !self.is::<T>() {
            return Err(self);
        }
        let mut this = ManuallyDrop::new(self);
        // SAFETY: the tag says the payload is a `T`; the payload is read once
        // and the box (if any) is released without dropping it again.
        unsafe {
            let value = this.payload_mut_ptr().cast::<T>().read();
            this.release();
            Ok(value)
        }
    }

    /// Field metadata of the stored concrete type.
    #[must_use]
    pub fn metadata(&self) -> Arc<TypeMetadata> {
        crate::metadata::global().metadata_for(&self.type_info())
    }

    pub(crate) fn payload_ptr(&self) -> *const u8 {
        // SAFETY: `self` is an initialized container.
        unsafe { open(ptr::from_ref(self).cast::<u8>()).1 }
    }

    pub(crate) fn payload_mut_ptr(&mut self) -> *mut u8 {
        // SAFETY: `self` is an initialized container.
        unsafe { open(ptr::from_mut(self).cast::<u8>()).1 }
    }

    /// Allocate a heap box for `info`, store its pointer in the buffer and
    /// return the payload address.
    unsafe fn allocate(&mut self, info: &TypeInfo) -> *mut u8 {
        let layout = box_layout(info);
        // SAFETY: layout has non-zero size (header included).
        let base = unsafe { alloc::alloc(layout) };
        if base.is_null() {
            alloc::handle_alloc_error(layout);
        }
        // SAFETY: `base` is a fresh allocation aligned to at least 16.
        unsafe {
            base.cast::<BoxHeader>().write(BoxHeader {
                size: layout.size(),
                align: layout.align(),
            });
            self.buffer.as_mut_ptr().cast::<*mut u8>().write(base);
            base.add(payload_offset(info.align()))
        }
    }

    /// Free the heap box, if any, without dropping the payload.
    unsafe fn release(&mut self) {
        if self.is_inline() {
            return;
        }
        // SAFETY: a boxed container holds the pointer returned by `alloc`.
        unsafe {
            let base = self.buffer.as_ptr().cast::<*mut u8>().read();
            let header = base.cast::<BoxHeader>().read();
            alloc::dealloc(
                base,
                Layout::from_size_align_unchecked(header.size, header.align),
            );
        }
    }
}

impl Clone for AnyValue {
    fn clone(&self) -> Self {
        let info = self.type_info();
        // Not dropped until the payload is initialized.
        let mut copy = ManuallyDrop::new(Self {
            buffer: [MaybeUninit::uninit(); INLINE_BUFFER_WORDS],
            tag: self.tag,
            _not_sync: PhantomData,
        });
        let dst = if fits_inline(&info) {
            copy.buffer.as_mut_ptr().cast::<u8>()
        } else {
            // SAFETY: the buffer of `copy` is unused.
            unsafe { copy.allocate(&info) }
        };
        // SAFETY: hooks belong to the tagged type; `dst` is sized for it.
        unsafe { (info.hooks.clone_into)(self.payload_ptr(), dst) };
        ManuallyDrop::into_inner(copy)
    }
}

impl Drop for AnyValue {
    fn drop(&mut self) {
        let info = self.type_info();
        // SAFETY: the payload is initialized and dropped exactly once here.
        unsafe {
            (info.hooks.drop_in_place)(self.payload_mut_ptr());
            self.release();
        }
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyValue")
            .field("type", &self.type_name())
            .field("inline", &self.is_inline())
            .finish_non_exhaustive()
    }
}

/// True if a value described by `info` is stored in the inline buffer.
#[must_use]
pub(crate) fn fits_inline(info: &TypeInfo) -> bool {
    info.size() <= INLINE_BUFFER_SIZE && info.align() <= INLINE_BUFFER_ALIGN
}

fn payload_offset(align: usize) -> usize {
    BOX_HEADER_SIZE.max(align)
}

fn box_layout(info: &TypeInfo) -> Layout {
    let offset = payload_offset(info.align());
    #[allow(clippy::expect_used)] // size and align come from a real Rust type
    let layout = Layout::from_size_align(offset + info.size(), offset).expect("valid box layout");
    layout
}

/// Read the type tag of the container at `slot` and locate its payload.
///
/// # Safety
///
/// `slot` must point to an initialized [`AnyValue`]. The returned pointer
/// carries the provenance of `slot`: it may only be written through when
/// `slot` may be.
pub(crate) unsafe fn open(slot: *const u8) -> (TypeInfo, *mut u8) {
    let container = slot.cast::<AnyValue>();
    // SAFETY: caller guarantees an initialized container.
    unsafe {
        let info = (ptr::addr_of!((*container).tag).read())();
        let buffer = ptr::addr_of!((*container).buffer).cast::<u8>().cast_mut();
        if fits_inline(&info) {
            (info, buffer)
        } else {
            let base = buffer.cast::<*mut u8>().read();
            (info, base.add(payload_offset(info.align())))
        }
    }
}
