// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `Reflect` impls for std types.

use crate::types::{Reflect, TypeInfo, TypeKind};
use crate::value::AnyValue;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::{Range, RangeInclusive};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Implement [`Reflect`] for leaf types that expose no fields.
///
/// The type must be `Clone + Send + 'static`.
///
/// # Example
/// ```
/// #[derive(Clone, Debug, PartialEq)]
/// struct Celsius(f64);
/// kvc::impl_reflect_opaque!(Celsius);
///
/// assert_eq!(kvc::classify::<Celsius>(), kvc::Classification::ValueRecord);
/// ```
#[macro_export]
macro_rules! impl_reflect_opaque {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::Reflect for $ty {
                fn type_info() -> $crate::TypeInfo {
                    $crate::TypeInfo::opaque::<Self>()
                }
            }
        )*
    };
}

impl_reflect_opaque!(
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    String,
    &'static str,
    Duration,
    SystemTime,
);

macro_rules! impl_reflect_container {
    ($($ty:ident<$($param:ident),+> where $($bounded:ident: $($bound:path)|+),*;)*) => {
        $(
            impl<$($param),+> Reflect for $ty<$($param),+>
            where
                $($param: Clone + Send + 'static,)+
                $($bounded: $($bound +)+ ,)*
            {
                fn type_info() -> TypeInfo {
                    TypeInfo::opaque::<Self>()
                }
            }
        )*
    };
}

impl_reflect_container! {
    Vec<T> where;
    VecDeque<T> where;
    Box<T> where;
    Range<T> where;
    RangeInclusive<T> where;
    BTreeSet<T> where T: Ord;
    HashSet<T> where T: Eq | Hash;
    BTreeMap<K, V> where K: Ord;
    HashMap<K, V> where K: Eq | Hash;
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_info() -> TypeInfo {
        TypeInfo::opaque::<Self>()
    }
}

impl<T> Reflect for Arc<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn type_info() -> TypeInfo {
        TypeInfo::opaque::<Self>()
    }
}

impl<T> Reflect for PhantomData<T>
where
    T: ?Sized + Send + 'static,
{
    fn type_info() -> TypeInfo {
        TypeInfo::opaque::<Self>()
    }
}

impl<T, E> Reflect for Result<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Self>(TypeKind::Enum)
    }
}

macro_rules! impl_reflect_tuple {
    ($(($($name:ident),*)),* $(,)?) => {
        $(
            impl<$($name),*> Reflect for ($($name,)*)
            where
                $($name: Clone + Send + 'static),*
            {
                fn type_info() -> TypeInfo {
                    TypeInfo::tuple::<Self>()
                }
            }
        )*
    };
}

impl_reflect_tuple!((), (A), (A, B), (A, B, C), (A, B, C, D));

macro_rules! impl_reflect_fn {
    ($(($($arg:ident),*)),* $(,)?) => {
        $(
            impl<R: 'static, $($arg: 'static),*> Reflect for fn($($arg),*) -> R {
                fn type_info() -> TypeInfo {
                    TypeInfo::function::<Self>()
                }
            }
        )*
    };
}

impl_reflect_fn!((), (A), (A, B));

impl<T: Reflect> Reflect for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Self>(TypeKind::Optional(T::type_info))
    }

    fn into_erased(self) -> Option<AnyValue> {
        self.and_then(T::into_erased)
    }

    fn from_erased(value: Option<AnyValue>) -> Result<Self, Option<AnyValue>> {
        let Some(value) = value else {
            return Ok(None);
        };
        match value.downcast::<Self>() {
            Ok(optional) => Ok(optional),
            Err(value) => T::from_erased(Some(value)).map(Some),
        }
    }
}

impl Reflect for AnyValue {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Self>(TypeKind::Existential)
    }

    fn into_erased(self) -> Option<AnyValue> {
        Some(self)
    }

    fn from_erased(value: Option<AnyValue>) -> Result<Self, Option<AnyValue>> {
        value.ok_or(None)
    }
}
