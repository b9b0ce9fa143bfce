// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::float_cmp)] // Test assertions with constants

//! Reference versus value semantics, read-only fields, polymorphic fields,
//! strict errors, and key paths.

use kvc::{AccessError, AnyValue, KeyPath, KeyValueCoding, Reflect, Shared};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone, Debug, PartialEq, Reflect)]
struct Person {
    name: String,
    age: u32,
}

#[derive(Clone, Reflect)]
struct Team {
    lead: Shared<Person>,
    snapshot: Person,
}

fn person(name: &str) -> Person {
    Person {
        name: name.into(),
        age: 30,
    }
}

#[test]
fn test_write_through_reference_is_visible_to_aliases() {
    init_logging();
    let lead = Shared::new(person("Ada"));
    let mut team = Team {
        lead: lead.clone(),
        snapshot: person("Ada"),
    };
    let copy = team.clone();

    team.set_value("lead.name", String::from("Zed"));
    assert_eq!(lead.get().name, "Zed");
    assert_eq!(copy.lead.get().name, "Zed");
    assert!(team.lead.ptr_eq(&lead));
}

#[test]
fn test_write_through_value_is_local() {
    let mut team = Team {
        lead: Shared::new(person("Ada")),
        snapshot: person("Ada"),
    };
    let copy = team.clone();

    team.set_value("snapshot.name", String::from("Zed"));
    assert_eq!(team.snapshot.name, "Zed");
    assert_eq!(copy.snapshot.name, "Ada");
    assert_eq!(team.snapshot.age, 30);
}

#[test]
fn test_read_returns_copy_of_value_record() {
    let team = Team {
        lead: Shared::new(person("Ada")),
        snapshot: person("Ada"),
    };
    let Some(mut snapshot) = team.value_as::<Person>("snapshot") else {
        panic!("snapshot should be readable");
    };
    snapshot.name = "Zed".into();
    assert_eq!(team.snapshot.name, "Ada");

    let Some(lead) = team.value_as::<Shared<Person>>("lead") else {
        panic!("lead should be readable");
    };
    assert!(lead.ptr_eq(&team.lead));
}

#[test]
fn test_readonly_rules() {
    #[derive(Clone, Reflect)]
    struct Badge {
        #[kvc(readonly)]
        id: u64,
        #[kvc(readonly)]
        owner: Person,
        #[kvc(readonly)]
        manager: Shared<Person>,
    }

    let mut badge = Badge {
        id: 7,
        owner: person("Ada"),
        manager: Shared::new(person("Bob")),
    };

    assert_eq!(badge.value_as::<u64>("id"), Some(7));
    assert_eq!(
        kvc::try_set_value(&mut badge, "id", 8u64),
        Err(AccessError::ReadOnly { field: "id" })
    );
    badge.set_value("id", 8u64);
    assert_eq!(badge.id, 7);

    assert_eq!(
        kvc::try_set_value(&mut badge, "owner.name", String::from("Zed")),
        Err(AccessError::ReadOnly { field: "owner" })
    );
    assert_eq!(badge.owner.name, "Ada");

    // The field holds a handle; the record behind it is still writable.
    assert_eq!(
        kvc::try_set_value(&mut badge, "manager.name", String::from("Zed")),
        Ok(())
    );
    assert_eq!(badge.manager.get().name, "Zed");
    assert!(kvc::try_set_value(&mut badge, "manager", Shared::new(person("X"))).is_err());

    let meta = badge.metadata();
    assert!(meta.fields().iter().all(|f| !f.is_mutable()));
}

#[derive(Clone, Debug, PartialEq, Reflect)]
struct Point {
    x: i64,
    y: i64,
}

#[derive(Clone, Debug, PartialEq, Reflect)]
struct Big {
    x: i64,
    pad: [u64; 6],
}

#[derive(Clone, Reflect)]
struct Holder {
    payload: AnyValue,
}

#[test]
fn test_polymorphic_field_small_and_large() {
    init_logging();
    let mut small = Holder {
        payload: AnyValue::new(Point { x: 1, y: 2 }),
    };
    assert!(small.payload.is_inline());
    assert_eq!(small.value_as::<i64>("payload.x"), Some(1));
    small.set_value("payload.x", 10i64);
    assert_eq!(
        small.payload.downcast_ref::<Point>(),
        Some(&Point { x: 10, y: 2 })
    );

    let mut large = Holder {
        payload: AnyValue::new(Big { x: 1, pad: [9; 6] }),
    };
    assert!(!large.payload.is_inline());
    large.set_value("payload.x", 10i64);
    assert_eq!(
        large.payload.downcast_ref::<Big>(),
        Some(&Big { x: 10, pad: [9; 6] })
    );

    // The container may switch concrete type entirely.
    large.set_value("payload", AnyValue::new(Point { x: 3, y: 4 }));
    assert_eq!(large.value_as::<i64>("payload.y"), Some(4));
}

#[test]
fn test_polymorphic_field_holding_reference() {
    let shared = Shared::new(person("Ada"));
    let mut holder = Holder {
        payload: AnyValue::new(shared.clone()),
    };
    holder.set_value("payload.age", 31u32);
    assert_eq!(shared.get().age, 31);
    assert_eq!(holder.value_as::<u32>("payload.age"), Some(31));
}

#[test]
fn test_write_through_cycle_lands() {
    #[derive(Clone, Reflect)]
    struct Node {
        name: String,
        next: Option<Shared<Node>>,
    }

    let mut node = Shared::new(Node {
        name: "a".into(),
        next: None,
    });
    let alias = node.clone();
    node.with_mut(|n| n.next = Some(alias));

    assert_eq!(node.value_as::<String>("next.name").as_deref(), Some("a"));
    assert_eq!(
        kvc::try_set_value(&mut node, "next.name", String::from("b")),
        Ok(())
    );
    assert_eq!(node.with(|n| n.name.clone()), "b");

    node.set_value("next.next.next.name", String::from("c"));
    assert_eq!(node.value_as::<String>("next.next.name").as_deref(), Some("c"));

    // Access from inside a borrow held by the caller still fails softly.
    let mut handle = node.clone();
    let inside = node.with(|_| kvc::try_set_value(&mut handle, "name", String::from("d")));
    assert_eq!(inside, Err(AccessError::Busy { type_name: "Node" }));
    assert_eq!(node.with(|n| n.name.clone()), "c");

    drop(handle);
    node.with_mut(|n| n.next = None);
    assert_eq!(node.strong_count(), 1);
}

#[test]
fn test_strict_errors() {
    #[derive(Clone, Reflect)]
    struct Record {
        id: i64,
        pair: (i64, String),
        maybe: Option<Point>,
    }

    let mut r = Record {
        id: 1,
        pair: (1, "a".into()),
        maybe: None,
    };

    assert_eq!(
        kvc::try_value_of(&r, "nope").map(|v| v.is_some()),
        Err(AccessError::UnknownField {
            segment: "nope".into(),
            type_name: "Record",
        })
    );
    assert_eq!(
        kvc::try_value_of(&r, "").map(|v| v.is_some()),
        Err(AccessError::UnknownField {
            segment: String::new(),
            type_name: "Record",
        })
    );
    assert!(matches!(
        kvc::try_value_of(&r, "pair.0"),
        Err(AccessError::UnsupportedShape { .. })
    ));
    assert_eq!(
        kvc::try_value_of(&r, "maybe.x").map(|v| v.is_some()),
        Err(AccessError::AbsentIntermediate {
            segment: "maybe".into()
        })
    );
    assert_eq!(kvc::try_value_of(&r, "maybe").map(|v| v.is_some()), Ok(false));
    assert!(matches!(
        kvc::try_set_value(&mut r, "id", "x"),
        Err(AccessError::TypeMismatch { .. })
    ));
    assert!(matches!(
        kvc::try_set_value(&mut r, "id", None::<i64>),
        Err(AccessError::TypeMismatch { found: "absent", .. })
    ));
    assert_eq!(r.id, 1);

    assert_eq!(kvc::try_set_value(&mut r, "maybe", Point { x: 1, y: 1 }), Ok(()));
    assert_eq!(kvc::try_set_value(&mut r, "maybe.y", 5i64), Ok(()));
    assert_eq!(r.maybe, Some(Point { x: 1, y: 5 }));
}

#[test]
fn test_root_optional_is_unsupported() {
    let maybe = Some(Point { x: 1, y: 2 });
    assert!(matches!(
        kvc::try_value_of(&maybe, "x"),
        Err(AccessError::UnsupportedShape { .. })
    ));
    assert!(maybe.value("x").is_none());
}

#[test]
fn test_key_path_access() {
    let mut team = Team {
        lead: Shared::new(person("Ada")),
        snapshot: person("Ada"),
    };
    let path: KeyPath = "snapshot.age".parse().unwrap_or_else(|never| match never {});
    assert_eq!(path.len(), 2);
    assert!(path.is_well_formed());
    assert_eq!(path.to_string(), "snapshot.age");

    team.set_value_at(&path, 41u32);
    assert_eq!(team.value_at(&path).and_then(|v| v.downcast::<u32>().ok()), Some(41));

    let split = KeyPath::from(vec!["lead".to_owned(), "name".to_owned()]);
    assert_eq!(
        kvc::value_at(&team, &split).and_then(|v| v.downcast::<String>().ok()).as_deref(),
        Some("Ada")
    );
    assert!(!KeyPath::new("lead..name").is_well_formed());
    assert!(team.value_at(&KeyPath::new("lead..name")).is_none());
}

#[test]
fn test_randomized_round_trips() {
    init_logging();
    let mut rng = fastrand::Rng::with_seed(0x6b76_63);
    let mut team = Team {
        lead: Shared::new(person("Ada")),
        snapshot: person("Ada"),
    };

    for _ in 0..200 {
        let age = rng.u32(..);
        let name: String = (0..rng.usize(0..12)).map(|_| rng.alphanumeric()).collect();
        let key = if rng.bool() { "lead" } else { "snapshot" };

        team.set_value(&format!("{key}.age"), age);
        team.set_value(&format!("{key}.name"), name.clone());

        assert_eq!(team.value_as::<u32>(&format!("{key}.age")), Some(age));
        assert_eq!(team.value_as::<String>(&format!("{key}.name")), Some(name.clone()));

        let direct = if key == "lead" {
            team.lead.get()
        } else {
            team.snapshot.clone()
        };
        assert_eq!(direct, Person { name, age });
    }
}
