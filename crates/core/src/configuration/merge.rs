//! Configuration merge algebra
//!
//! `base.merge(override)`:
//! - member configurations: override wins per key, except that two ctor
//!   configurations merge parameter by parameter
//! - fixture configurations: dictionary union, override wins
//! - callbacks: per-key concatenation, base callbacks first
//! - the id is always the override's

use im::OrdMap;
use tracing::trace;

use super::{ConfigurationItem, CtorMemberConfiguration, MemberConfiguration};
use crate::error::{Error, Result};
use crate::types::MethodDescription;

impl ConfigurationItem {
    /// Layer `over` on top of this item
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` when either side stores something other
    /// than a ctor configuration under the reserved `.ctor` key.
    pub fn merge(&self, over: &ConfigurationItem) -> Result<ConfigurationItem> {
        check_reserved_keys(self)?;
        check_reserved_keys(over)?;

        trace!(
            base = %self.id,
            over = %over.id,
            "merging configuration items"
        );

        let member_configurations =
            merge_members(&self.member_configurations, &over.member_configurations);

        let fixture_configurations = over
            .fixture_configurations
            .clone()
            .union(self.fixture_configurations.clone());

        let mut callbacks = self.callbacks.clone();
        for (key, list) in &over.callbacks {
            let mut merged = callbacks.get(key).cloned().unwrap_or_default();
            merged.append(list.clone());
            callbacks.insert(key.clone(), merged);
        }

        Ok(ConfigurationItem {
            id: over.id.clone(),
            fixture_configurations,
            member_configurations,
            callbacks,
        })
    }

    /// Layer an optional override; an absent override leaves this item unchanged
    pub fn merge_optional(&self, over: Option<&ConfigurationItem>) -> Result<ConfigurationItem> {
        match over {
            Some(over) => self.merge(over),
            None => Ok(self.clone()),
        }
    }
}

fn check_reserved_keys(item: &ConfigurationItem) -> Result<()> {
    match item.member(MethodDescription::CTOR_NAME) {
        None | Some(MemberConfiguration::Ctor(_)) => Ok(()),
        Some(other) => Err(Error::invalid_configuration(
            item.id.path(),
            format!(
                "the reserved key {} holds a non-constructor configuration from {}",
                MethodDescription::CTOR_NAME,
                other.source()
            ),
        )),
    }
}

fn merge_members(
    base: &OrdMap<String, MemberConfiguration>,
    over: &OrdMap<String, MemberConfiguration>,
) -> OrdMap<String, MemberConfiguration> {
    let mut merged = base.clone();
    for (key, over_member) in over {
        let value = match merged.get(key) {
            Some(base_member) => base_member.merge(over_member),
            None => over_member.clone(),
        };
        merged.insert(key.clone(), value);
    }
    merged
}

impl MemberConfiguration {
    /// Merge two configurations of the same member; `over` wins unless both
    /// are ctor configurations
    pub fn merge(&self, over: &MemberConfiguration) -> MemberConfiguration {
        match (self, over) {
            (MemberConfiguration::Ctor(base), MemberConfiguration::Ctor(over)) => {
                MemberConfiguration::Ctor(base.merge(over))
            }
            _ => over.clone(),
        }
    }
}

impl CtorMemberConfiguration {
    /// Parameter-wise merge
    ///
    /// The override's overload request, when present, replaces the base's.
    pub fn merge(&self, over: &CtorMemberConfiguration) -> CtorMemberConfiguration {
        let parameter_types = if over.has_overload_request() {
            over.parameter_types.clone()
        } else {
            self.parameter_types.clone()
        };

        CtorMemberConfiguration {
            parameters: merge_members(&self.parameters, &over.parameters),
            parameter_types,
            source: over.source.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::{
        Callback, ConfigurationSource, CtorSelectionPolicy, FixtureConfiguration, FixtureKind,
    };
    use crate::fixture_item_id::FixtureItemId;
    use crate::types::TypeRef;
    use crate::value::Value;
    use im::Vector;
    use pretty_assertions::assert_eq;

    fn item(name: &str) -> ConfigurationItem {
        ConfigurationItem::new(FixtureItemId::named(name, TypeRef::named("Car")))
    }

    #[test]
    fn test_merge_with_none_is_identity() {
        let a = item("Car")
            .with_member(MemberConfiguration::unique("Speed"))
            .with_callback("Drive", Callback::new(()));
        assert_eq!(a.merge_optional(None).expect("merges"), a);
    }

    #[test]
    fn test_override_wins_for_plain_members() {
        let base = item("Base")
            .with_member(MemberConfiguration::unique("Speed"))
            .with_member(MemberConfiguration::null("Owner"));
        let over = item("Over").with_member(MemberConfiguration::raw("Speed", Value::I32(3)));

        let merged = base.merge(&over).expect("merges");
        assert_eq!(
            merged.member("Speed"),
            Some(&MemberConfiguration::raw("Speed", Value::I32(3)))
        );
        assert_eq!(merged.member("Owner"), Some(&MemberConfiguration::null("Owner")));
        assert_eq!(merged.id().name(), Some("Over"));
    }

    #[test]
    fn test_ctor_configurations_merge_per_parameter() {
        let base = item("Car").with_ctor(
            CtorMemberConfiguration::for_overload([TypeRef::named("i32"), TypeRef::named("string")])
                .with_parameter(MemberConfiguration::raw("wheels", Value::I32(4)))
                .with_parameter(MemberConfiguration::unique("name")),
        );
        let over = item("Car").with_ctor(
            CtorMemberConfiguration::new()
                .with_parameter(MemberConfiguration::raw("name", Value::String("Beetle".into())))
                .with_source(ConfigurationSource::Test),
        );

        let merged = base.merge(&over).expect("merges");
        let ctor = merged.ctor_configuration().expect("ctor survives");
        assert_eq!(
            ctor.parameter("wheels"),
            Some(&MemberConfiguration::raw("wheels", Value::I32(4)))
        );
        assert_eq!(
            ctor.parameter("name"),
            Some(&MemberConfiguration::raw("name", Value::String("Beetle".into())))
        );
        assert_eq!(ctor.parameter_types.len(), 2);
        assert_eq!(ctor.source, ConfigurationSource::Test);
    }

    #[test]
    fn test_conflicting_overloads_keep_both_parameter_sets() {
        let base = item("Car").with_ctor(
            CtorMemberConfiguration::for_overload([TypeRef::named("i32")])
                .with_parameter(MemberConfiguration::raw("wheels", Value::I32(4))),
        );
        let over = item("Car").with_ctor(
            CtorMemberConfiguration::for_overload([TypeRef::named("string")])
                .with_parameter(MemberConfiguration::unique("name")),
        );

        let merged = base.merge(&over).expect("merges");
        let ctor = merged.ctor_configuration().expect("ctor survives");
        assert_eq!(
            ctor.parameter("wheels"),
            Some(&MemberConfiguration::raw("wheels", Value::I32(4)))
        );
        assert_eq!(ctor.parameter("name"), Some(&MemberConfiguration::unique("name")));
        assert_eq!(ctor.parameter_types, Vector::from(vec![TypeRef::named("string")]));
    }

    #[test]
    fn test_fixture_configurations_union_override_wins() {
        let base = item("Car")
            .with_fixture_configuration(FixtureConfiguration::Kind(FixtureKind::Concrete))
            .with_fixture_configuration(FixtureConfiguration::CtorSelection(
                CtorSelectionPolicy::FewestParameters,
            ));
        let over =
            item("Car").with_fixture_configuration(FixtureConfiguration::Kind(FixtureKind::Mock));

        let merged = base.merge(&over).expect("merges");
        assert_eq!(merged.fixture_kind(), Some(FixtureKind::Mock));
        assert_eq!(
            merged.ctor_selection(),
            Some(CtorSelectionPolicy::FewestParameters)
        );
    }

    #[test]
    fn test_callbacks_concatenate_base_first() {
        let a1 = Callback::new("a1");
        let a2 = Callback::new("a2");
        let b1 = Callback::new("b1");
        let base = item("Car")
            .with_callback("Drive", a1.clone())
            .with_callback("Drive", a2.clone());
        let over = item("Car")
            .with_callback("Drive", b1.clone())
            .with_callback("Stop", b1.clone());

        let merged = base.merge(&over).expect("merges");
        assert_eq!(merged.callbacks("Drive"), Vector::from(vec![a1, a2, b1.clone()]));
        assert_eq!(merged.callbacks("Stop"), Vector::from(vec![b1]));
    }

    #[test]
    fn test_reserved_ctor_key_must_hold_ctor() {
        let malformed = item("Car").with_member(MemberConfiguration::unique(".ctor"));
        let err = item("Car").merge(&malformed).unwrap_err();
        assert!(err.is_invalid_configuration());
    }
}
