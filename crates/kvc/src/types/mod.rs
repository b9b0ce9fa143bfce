// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type system for key-value coding.
//!
//! Provides `TypeInfo` for layout facts, the `Reflect` contract every
//! introspectable type implements, and the classifier that maps a host kind
//! to one of five storage representations.

pub mod classify;
pub mod descriptor;
pub mod impls;
pub mod reflect;

pub use classify::{classify, classify_info, classify_kind, Classification};
pub use descriptor::{FieldLayout, SharedLayout, TypeInfo, TypeKind};
pub use reflect::Reflect;
