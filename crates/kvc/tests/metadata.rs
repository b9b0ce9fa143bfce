// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Metadata enumeration, caching, classification and text form.

use kvc::{
    classify, AnyValue, Classification, Deferred, KeyValueCoding, MetadataCache, Reflect, Shared,
};
use std::marker::PhantomData;
use std::mem::offset_of;
use std::sync::{Arc, Barrier};
use std::thread;

#[derive(Clone, Reflect)]
struct A {
    a: i64,
    b: String,
}

#[test]
fn test_metadata_text() {
    let meta = kvc::metadata_of::<A>();
    let expected = format!(
        "Metadata(type: A, kind: .struct, size: {}, properties: [\
         Property(name: 'a', isStrong: false, isLazy: false, isVar: true, offset: {}), \
         Property(name: 'b', isStrong: false, isLazy: false, isVar: true, offset: {})])",
        std::mem::size_of::<A>(),
        offset_of!(A, a),
        offset_of!(A, b),
    );
    assert_eq!(meta.to_string(), expected);
}

#[test]
fn test_property_text_flags() {
    #[derive(Clone, Reflect)]
    struct Flags {
        #[kvc(readonly)]
        handle: Shared<A>,
        __deferred_lazy: Deferred<u8>,
    }

    let fields = kvc::fields_of::<Flags>();
    assert_eq!(
        fields[0].to_string(),
        format!(
            "Property(name: 'handle', isStrong: true, isLazy: false, isVar: false, offset: {})",
            offset_of!(Flags, handle)
        )
    );
    assert_eq!(
        fields[1].to_string(),
        format!(
            "Property(name: 'lazy', isStrong: false, isLazy: true, isVar: true, offset: {})",
            offset_of!(Flags, __deferred_lazy)
        )
    );
}

#[test]
fn test_metadata_is_stable_across_calls() {
    let first = kvc::metadata_of::<A>();
    let second = A {
        a: 1,
        b: String::new(),
    }
    .metadata();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.field_names().collect::<Vec<_>>(), ["a", "b"]);
}

#[test]
fn test_reference_metadata_lists_target_fields() {
    let meta = kvc::metadata_of::<Shared<A>>();
    assert_eq!(meta.classification(), Classification::ReferenceRecord);
    assert_eq!(meta.field_names().collect::<Vec<_>>(), ["a", "b"]);
    assert_eq!(meta.fields()[1].offset(), offset_of!(A, b));
}

#[test]
fn test_unstored_fields_are_not_listed() {
    #[derive(Clone, Reflect)]
    struct Sparse {
        kept: u8,
        marker: PhantomData<String>,
        unit: (),
        #[kvc(skip)]
        hidden: u32,
    }

    let sparse = Sparse {
        kept: 1,
        marker: PhantomData,
        unit: (),
        hidden: 2,
    };
    assert_eq!(
        sparse.metadata().field_names().collect::<Vec<_>>(),
        ["kept"]
    );
    assert!(sparse.value("unit").is_none());
    assert!(sparse.value("hidden").is_none());
    let _ = (sparse.marker, sparse.unit, sparse.hidden);
}

#[test]
fn test_classification_of_std_and_derived_types() {
    #[derive(Clone, Reflect)]
    enum Mode {
        On,
        Off,
    }
    let _ = [Mode::On, Mode::Off];

    assert_eq!(classify::<A>(), Classification::ValueRecord);
    assert_eq!(classify::<String>(), Classification::ValueRecord);
    assert_eq!(classify::<Shared<A>>(), Classification::ReferenceRecord);
    assert_eq!(classify::<AnyValue>(), Classification::PolymorphicContainer);
    assert_eq!(classify::<Option<A>>(), Classification::OptionalWrapper);
    assert_eq!(classify::<Deferred<A>>(), Classification::OptionalWrapper);
    assert_eq!(classify::<Mode>(), Classification::Unsupported);
    assert_eq!(classify::<(u8, u8)>(), Classification::Unsupported);
    assert_eq!(classify::<fn(u8) -> u8>(), Classification::Unsupported);

    assert!(kvc::metadata_of::<String>().fields().is_empty());
    assert!(kvc::metadata_of::<Mode>().fields().is_empty());
}

#[test]
fn test_metadata_of_container_describes_concrete_type() {
    let any = AnyValue::new(A {
        a: 1,
        b: "b".into(),
    });
    assert_eq!(any.metadata().type_name(), "A");
    assert_eq!(
        AnyValue::new(1u8).metadata().classification(),
        Classification::ValueRecord
    );
    assert_eq!(
        any.clone().metadata().fields().len(),
        kvc::fields_of::<A>().len()
    );
    assert_eq!(any.value_as::<i64>("a"), Some(1));
}

#[test]
fn test_private_cache_enumerates_once_under_contention() {
    let cache = Arc::new(MetadataCache::new());
    let barrier = Arc::new(Barrier::new(6));

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..50)
                    .map(|_| cache.metadata_of::<A>())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut all = Vec::new();
    for handle in handles {
        let Ok(batch) = handle.join() else {
            panic!("lookup thread panicked");
        };
        all.extend(batch);
    }

    assert!(all.iter().all(|meta| Arc::ptr_eq(meta, &all[0])));
    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 6 * 50 - 1);
    assert_eq!(cache.len(), 1);
}
