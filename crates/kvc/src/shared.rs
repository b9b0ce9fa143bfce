// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `Shared<T>`: reference-record storage.
//!
//! A `Shared` slot is a single pointer to a heap payload; clones alias the
//! same payload, so a write through any clone is visible through all of them.
//! The payload sits behind a re-entrant lock, so key-value access from inside
//! a `with`/`with_mut` closure on the same thread fails the inner borrow
//! instead of deadlocking.

use crate::types::descriptor::PayloadFn;
use crate::types::{Reflect, SharedLayout, TypeInfo, TypeKind};
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::fmt;
use std::ptr;
use std::sync::Arc;

/// Shared, interior-mutable handle to a `T` (reference semantics).
///
/// # Example
/// ```
/// use kvc::Shared;
///
/// let a = Shared::new(1u32);
/// let b = a.clone();
/// b.with_mut(|v| *v = 2);
/// assert_eq!(a.get(), 2);
/// assert!(a.ptr_eq(&b));
/// ```
pub struct Shared<T>(Arc<ReentrantMutex<RefCell<T>>>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(ReentrantMutex::new(RefCell::new(value))))
    }

    /// Run `f` with shared access to the payload.
    ///
    /// # Panics
    ///
    /// Panics if the payload is mutably borrowed by the current thread.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.0.lock();
        let value = guard.borrow();
        f(&value)
    }

    /// Run `f` with exclusive access to the payload.
    ///
    /// # Panics
    ///
    /// Panics if the payload is already borrowed by the current thread.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let guard = self.0.lock();
        let mut value = guard.borrow_mut();
        f(&mut value)
    }

    /// Like [`with`](Self::with), but `None` instead of panicking.
    pub fn try_with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let guard = self.0.lock();
        let value = guard.try_borrow().ok()?;
        Some(f(&value))
    }

    /// Like [`with_mut`](Self::with_mut), but `None` instead of panicking.
    pub fn try_with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let guard = self.0.lock();
        let mut value = guard.try_borrow_mut().ok()?;
        Some(f(&mut value))
    }

    /// Replace the payload, returning the previous one.
    pub fn replace(&self, value: T) -> T {
        self.with_mut(|slot| std::mem::replace(slot, value))
    }

    /// True if both handles point to the same payload.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[must_use]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl<T: Clone> Shared<T> {
    /// Clone of the current payload.
    #[must_use]
    pub fn get(&self) -> T {
        self.with(T::clone)
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for Shared<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.0.lock();
        #[allow(clippy::let_and_return)] // the borrow must end before `guard`
        let out = match guard.try_borrow() {
            Ok(value) => f.debug_tuple("Shared").field(&*value).finish(),
            Err(_) => f.write_str("Shared(<borrowed>)"),
        };
        out
    }
}

impl<T: Reflect> Reflect for Shared<T> {
    fn type_info() -> TypeInfo {
        let payload: PayloadFn = payload::<T>;
        TypeInfo::new::<Self>(TypeKind::Shared(SharedLayout {
            target: T::type_info,
            payload,
        }))
    }
}

/// Lock the `Shared<T>` at `slot` and run `body` on its payload address.
///
/// Read access takes a shared borrow and hands out a pointer the caller must
/// not write through.
///
/// # Safety
///
/// `slot` must point to an initialized `Shared<T>`.
unsafe fn payload<T>(slot: *const u8, write: bool, body: &mut dyn FnMut(*mut u8)) -> bool {
    // SAFETY: caller guarantees `slot` holds a `Shared<T>`.
    let shared = unsafe { &*slot.cast::<Shared<T>>() };
    let guard = shared.0.lock();
    if write {
        let Ok(mut value) = guard.try_borrow_mut() else {
            return false;
        };
        body(ptr::from_mut::<T>(&mut value).cast());
    } else {
        let Ok(value) = guard.try_borrow() else {
            return false;
        };
        body(ptr::from_ref::<T>(&value).cast_mut().cast());
    }
    true
}
