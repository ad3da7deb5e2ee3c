//! Property tests for the configuration merge algebra

use fixtura_core::{
    Callback, ConfigurationItem, CtorMemberConfiguration, FixtureConfiguration, FixtureItemId,
    FixtureKind, MemberConfiguration, TypeRef, Value,
};
use proptest::prelude::*;

const KEYS: &[&str] = &["Speed", "Owner", "Engine", "Name", ".ctor"];
const CALLBACK_KEYS: &[&str] = &["Drive", "Stop", "Honk"];
const CTOR_PARAMETERS: &[&str] = &["wheels", "name", "owner"];
const OVERLOAD_TYPES: &[&str] = &["i32", "string", "Engine"];

fn ctor_strategy() -> BoxedStrategy<MemberConfiguration> {
    let parameters = prop::collection::vec(
        (prop::sample::select(CTOR_PARAMETERS.to_vec()), any::<i32>()),
        0..3,
    );
    let overload = prop::collection::vec(prop::sample::select(OVERLOAD_TYPES.to_vec()), 0..3);

    (parameters, overload)
        .prop_map(|(parameters, overload)| {
            let ctor =
                CtorMemberConfiguration::for_overload(overload.into_iter().map(TypeRef::named));
            parameters.into_iter().fold(ctor, |ctor, (name, value)| {
                ctor.with_parameter(MemberConfiguration::raw(name, Value::I32(value)))
            })
        })
        .prop_map(MemberConfiguration::Ctor)
        .boxed()
}

fn member_strategy(name: &'static str) -> BoxedStrategy<MemberConfiguration> {
    if name == ".ctor" {
        return ctor_strategy();
    }
    prop_oneof![
        Just(MemberConfiguration::unique(name)),
        Just(MemberConfiguration::null(name)),
        any::<i32>().prop_map(move |v| MemberConfiguration::raw(name, Value::I32(v))),
        "[A-Z][a-z]{1,6}".prop_map(move |target| MemberConfiguration::link(
            name,
            FixtureItemId::named(target, TypeRef::named("Car"))
        )),
    ]
    .boxed()
}

fn item_strategy(id_name: &'static str) -> impl Strategy<Value = ConfigurationItem> {
    let members = prop::sample::subsequence(KEYS.to_vec(), 0..=KEYS.len())
        .prop_flat_map(|keys| keys.into_iter().map(member_strategy).collect::<Vec<_>>());
    let callbacks = prop::collection::vec(
        (prop::sample::select(CALLBACK_KEYS.to_vec()), 0u8..4),
        0..5,
    );
    let kind =
        prop::option::of(prop_oneof![Just(FixtureKind::Mock), Just(FixtureKind::Concrete)]);

    (members, callbacks, kind).prop_map(move |(members, callbacks, kind)| {
        let mut item = ConfigurationItem::new(FixtureItemId::named(id_name, TypeRef::named("Car")))
            .with_members(members);
        for (key, count) in callbacks {
            for _ in 0..count {
                item = item.with_callback(key, Callback::new(()));
            }
        }
        if let Some(kind) = kind {
            item = item.with_fixture_configuration(FixtureConfiguration::Kind(kind));
        }
        item
    })
}

proptest! {
    #[test]
    fn merge_with_none_is_identity(a in item_strategy("A")) {
        prop_assert_eq!(a.merge_optional(None).expect("merges"), a);
    }

    #[test]
    fn override_wins_except_for_ctor(a in item_strategy("A"), b in item_strategy("B")) {
        let merged = a.merge(&b).expect("merges");
        prop_assert_eq!(merged.id().name(), Some("B"));

        for key in KEYS {
            match (a.member(key), b.member(key)) {
                (Some(MemberConfiguration::Ctor(base)), Some(MemberConfiguration::Ctor(over))) => {
                    let ctor = merged.ctor_configuration();
                    prop_assert!(ctor.is_some());
                    for (param, value) in &base.parameters {
                        if !over.parameters.contains_key(param) {
                            prop_assert_eq!(ctor.and_then(|c| c.parameter(param)), Some(value));
                        }
                    }
                    for (param, value) in &over.parameters {
                        prop_assert_eq!(ctor.and_then(|c| c.parameter(param)), Some(value));
                    }
                    let expected_types = if over.has_overload_request() {
                        &over.parameter_types
                    } else {
                        &base.parameter_types
                    };
                    prop_assert_eq!(ctor.map(|c| &c.parameter_types), Some(expected_types));
                }
                (_, Some(over)) => prop_assert_eq!(merged.member(key), Some(over)),
                (Some(base), None) => prop_assert_eq!(merged.member(key), Some(base)),
                (None, None) => prop_assert!(merged.member(key).is_none()),
            }
        }
    }

    #[test]
    fn callbacks_concatenate(a in item_strategy("A"), b in item_strategy("B")) {
        let merged = a.merge(&b).expect("merges");
        for key in CALLBACK_KEYS {
            let mut expected = a.callbacks(key);
            expected.append(b.callbacks(key));
            prop_assert_eq!(merged.callbacks(key), expected);
        }
    }

    #[test]
    fn fixture_kind_override_wins(a in item_strategy("A"), b in item_strategy("B")) {
        let merged = a.merge(&b).expect("merges");
        prop_assert_eq!(merged.fixture_kind(), b.fixture_kind().or(a.fixture_kind()));
    }
}
