// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # KVC - Key-Value Coding for Rust
//!
//! Read and write the fields of arbitrary structs by name or dotted path,
//! through a type-erased [`AnyValue`], with no per-type glue beyond
//! `#[derive(Reflect)]`.
//!
//! ## Quick Start
//!
//! ```rust
//! use kvc::{KeyValueCoding, Reflect};
//!
//! #[derive(Clone, Reflect)]
//! struct Address {
//!     city: String,
//! }
//!
//! #[derive(Clone, Reflect)]
//! struct Person {
//!     name: String,
//!     address: Address,
//!     nickname: Option<String>,
//! }
//!
//! let mut p = Person {
//!     name: "Ada".into(),
//!     address: Address { city: "London".into() },
//!     nickname: None,
//! };
//!
//! p.set_value("address.city", String::from("Paris"));
//! assert_eq!(p.address.city, "Paris");
//! assert_eq!(p.value_as::<String>("name").as_deref(), Some("Ada"));
//! assert!(p.value("nickname").is_none());
//! assert!(p.value("missing").is_none());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  api: value_of / set_value / KeyValueCoding / try_*           |
//! +---------------------------------------------------------------+
//! |  access::path     segment walk, copy-back of value records    |
//! |  access::address  value / reference / polymorphic base addr   |
//! |  access::accessor typed read/write behind erased signatures   |
//! +---------------------------------------------------------------+
//! |  metadata  enumerator + write-once cache (TypeMetadata)       |
//! +---------------------------------------------------------------+
//! |  types     TypeInfo / FieldLayout / Reflect / classify        |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Representations
//!
//! | Type | Classification | Field access |
//! |------|----------------|--------------|
//! | `#[derive(Reflect)]` struct | value record | in place, copied when read out |
//! | [`Shared<T>`] | reference record | through the shared heap payload |
//! | [`AnyValue`] | polymorphic container | through the stored concrete value |
//! | `Option<T>`, [`Deferred<T>`] | optional wrapper | unwrapped on read |
//! | enums, tuples, `fn` | unsupported | whole-value only |

// Allow the derive macro to work inside this crate's tests
extern crate self as kvc;

/// Field access: accessors, address and path resolution, errors.
pub mod access;
/// Public access surface (free functions and `KeyValueCoding`).
pub mod api;
/// Global configuration (layout constants).
pub mod config;
/// Lazily initialized storage.
pub mod deferred;
/// Field metadata, enumerator, and cache.
pub mod metadata;
/// Reference-record storage.
pub mod shared;
/// Runtime type system (TypeInfo, Reflect, classifier).
pub mod types;
/// Polymorphic container / erased value.
pub mod value;

pub use access::{AccessError, Accessor, KeyPath};
pub use api::{
    fields_of, metadata_of, metadata_of_info, set_value, set_value_at, try_set_value,
    try_value_of, value_at, value_of, KeyValueCoding,
};
pub use deferred::Deferred;
pub use metadata::{FieldDescriptor, LookupStats, MetadataCache, TypeMetadata};
pub use shared::Shared;
pub use types::{
    classify, classify_info, Classification, FieldLayout, Reflect, SharedLayout, TypeInfo,
    TypeKind,
};
pub use value::AnyValue;

// Derive macro (for #[derive(kvc::Reflect)]); shares the trait's name.
pub use kvc_codegen::Reflect;
