// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! KVC Global Configuration - Single Source of Truth
//!
//! Every layout constant the engine depends on lives here.
//! **NEVER hardcode these elsewhere!**
//!
//! There is no runtime configuration: the only input to the engine is the
//! type being introspected.

// =======================================================================
// Key paths
// =======================================================================

/// Separator between segments of a dotted key (`"department.manager.name"`).
pub const PATH_DELIMITER: char = '.';

// =======================================================================
// AnyValue (polymorphic container) layout
// =======================================================================

/// Number of machine words in the inline buffer of an [`AnyValue`](crate::AnyValue).
pub const INLINE_BUFFER_WORDS: usize = 3;

/// Byte size of the inline buffer.
///
/// A concrete value whose size exceeds this (or whose alignment exceeds a
/// machine word) is stored behind a heap box instead.
pub const INLINE_BUFFER_SIZE: usize = INLINE_BUFFER_WORDS * core::mem::size_of::<usize>();

/// Alignment guaranteed by the inline buffer.
pub const INLINE_BUFFER_ALIGN: usize = core::mem::align_of::<usize>();

/// Size of the header that precedes a boxed value on the heap.
///
/// The payload starts at `max(BOX_HEADER_SIZE, align_of::<T>())`.
pub const BOX_HEADER_SIZE: usize = 16;

// =======================================================================
// Field enumeration
// =======================================================================

/// Storage prefix stripped from deferred-initialization fields.
///
/// A backing field named `__deferred_total` of type `Deferred<T>` is
/// published as `total`.
pub const DEFERRED_STORAGE_PREFIX: &str = "__deferred_";

// =======================================================================
// Metadata cache
// =======================================================================

/// Initial capacity of the process-wide metadata cache.
///
/// The cache never evicts; this only sizes the first allocation.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_buffer_holds_three_words() {
        assert_eq!(INLINE_BUFFER_SIZE, 3 * core::mem::size_of::<usize>());
        assert!(BOX_HEADER_SIZE >= 2 * core::mem::size_of::<usize>());
    }
}
