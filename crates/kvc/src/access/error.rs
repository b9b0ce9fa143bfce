// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Access errors.
//!
//! The lenient API (`value_of`, `set_value`) collapses every variant into
//! "absent" or "nothing changed"; the `try_*` twins surface them.

use thiserror::Error;

/// Why a read or write through a key path did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Unknown field '{segment}' on {type_name}")]
    UnknownField {
        segment: String,
        type_name: &'static str,
    },

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unsupported shape: {type_name} has no addressable fields")]
    UnsupportedShape { type_name: &'static str },

    #[error("Intermediate field '{segment}' is absent")]
    AbsentIntermediate { segment: String },

    #[error("Field '{field}' is read-only")]
    ReadOnly { field: &'static str },

    #[error("{type_name} is already borrowed on this thread")]
    Busy { type_name: &'static str },
}

impl AccessError {
    pub(crate) fn unknown(segment: &str, type_name: &'static str) -> Self {
        Self::UnknownField {
            segment: segment.to_owned(),
            type_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_culprit() {
        let err = AccessError::unknown("missing", "Person");
        assert_eq!(err.to_string(), "Unknown field 'missing' on Person");
        let err = AccessError::ReadOnly { field: "id" };
        assert_eq!(err.to_string(), "Field 'id' is read-only");
    }
}
