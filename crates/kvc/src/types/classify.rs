// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type classifier: reduces a host [`TypeKind`] to the representation the
//! address resolver branches on.

use crate::types::{Reflect, TypeInfo, TypeKind};
use std::fmt;

/// Physical representation of a type's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Aggregate stored inline at the given address.
    ValueRecord,
    /// Pointer slot to a heap payload shared by every alias.
    ReferenceRecord,
    /// Type-tagged container holding a value inline or boxed.
    PolymorphicContainer,
    /// "Value or absence"; unwrapped one level on read.
    OptionalWrapper,
    /// No field access (enums, tuples, functions).
    Unsupported,
}

impl Classification {
    /// True for the two record shapes that can own fields.
    #[must_use]
    pub fn is_record(self) -> bool {
        matches!(self, Self::ValueRecord | Self::ReferenceRecord)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ValueRecord => "value-record",
            Self::ReferenceRecord => "reference-record",
            Self::PolymorphicContainer => "polymorphic-container",
            Self::OptionalWrapper => "optional-wrapper",
            Self::Unsupported => "unsupported",
        })
    }
}

/// Classify a host kind.
///
/// Opaque leaves (integers, strings, collections) are value records with no
/// fields: they are stored inline and copied on read, which is all the path
/// resolver needs to know about them.
#[must_use]
pub fn classify_kind(kind: &TypeKind) -> Classification {
    match kind {
        TypeKind::Struct(_) | TypeKind::Opaque => Classification::ValueRecord,
        TypeKind::Shared(_) => Classification::ReferenceRecord,
        TypeKind::Existential => Classification::PolymorphicContainer,
        TypeKind::Optional(_) | TypeKind::Deferred(_) => Classification::OptionalWrapper,
        TypeKind::Enum | TypeKind::Tuple | TypeKind::Function => Classification::Unsupported,
    }
}

/// Classify a described type.
#[must_use]
pub fn classify_info(info: &TypeInfo) -> Classification {
    classify_kind(info.kind())
}

/// Classify `T`.
#[must_use]
pub fn classify<T: Reflect>() -> Classification {
    classify_info(&T::type_info())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnyValue, Deferred, Shared};

    #[test]
    fn test_classify_builtin_shapes() {
        assert_eq!(classify::<i64>(), Classification::ValueRecord);
        assert_eq!(classify::<String>(), Classification::ValueRecord);
        assert_eq!(classify::<Vec<u8>>(), Classification::ValueRecord);
        assert_eq!(classify::<Option<i64>>(), Classification::OptionalWrapper);
        assert_eq!(classify::<Deferred<i64>>(), Classification::OptionalWrapper);
        assert_eq!(classify::<Shared<i64>>(), Classification::ReferenceRecord);
        assert_eq!(classify::<AnyValue>(), Classification::PolymorphicContainer);
        assert_eq!(classify::<(i64, String)>(), Classification::Unsupported);
        assert_eq!(classify::<fn(i64) -> i64>(), Classification::Unsupported);
        assert_eq!(classify::<Result<i64, String>>(), Classification::Unsupported);
    }

    #[test]
    fn test_is_record() {
        assert!(Classification::ValueRecord.is_record());
        assert!(Classification::ReferenceRecord.is_record());
        assert!(!Classification::PolymorphicContainer.is_record());
        assert!(!Classification::OptionalWrapper.is_record());
        assert!(!Classification::Unsupported.is_record());
    }
}
