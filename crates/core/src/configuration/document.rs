//! Persisted user configuration (TOML or JSON)
//!
//! ```toml
//! [[fixtures]]
//! name = "Car1"
//! type = "Car"
//! kind = "concrete"
//!
//! [fixtures.members]
//! Speed = { value = 80 }
//! Name = { unique = true }
//! Owner = { null = true }
//! Engine = { link = "Engine1", type = "Engine" }
//!
//! [fixtures.ctor]
//! types = ["i32"]
//! parameters = { wheels = { value = 4 } }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::{
    ConfigurationItem, ConfigurationSource, ConfigurationStore, CtorMemberConfiguration,
    CtorSelectionPolicy, FixtureConfiguration, FixtureKind, MemberConfiguration,
};
use crate::error::{Error, Result, ResultExt};
use crate::fixture_item_id::FixtureItemId;
use crate::types::TypeRef;
use crate::value::Value;

/// Top-level persisted configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationDocument {
    #[serde(default)]
    pub fixtures: Vec<FixtureDocument>,
}

/// One named fixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub kind: Option<FixtureKind>,
    #[serde(default)]
    pub ctor_selection: Option<CtorSelectionPolicy>,
    #[serde(default)]
    pub members: BTreeMap<String, MemberDocument>,
    #[serde(default)]
    pub ctor: Option<CtorDocument>,
}

/// Constructor section of a fixture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CtorDocument {
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub parameters: BTreeMap<String, MemberDocument>,
}

/// One member entry; exactly one of `value`, `unique`, `null`, `link` is set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberDocument {
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub null: bool,
    #[serde(default)]
    pub link: Option<String>,
    /// Type of the link target; the member's declared type when absent
    #[serde(default, rename = "type")]
    pub link_type: Option<String>,
}

impl ConfigurationDocument {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse configuration TOML: {e}")))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse configuration JSON: {e}")))
    }

    /// Load a document; `.json` files are read as JSON, everything else as TOML
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read {}", path.display()))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    /// Convert every fixture into a configuration item
    pub fn to_items(&self, source: &ConfigurationSource) -> Result<Vec<ConfigurationItem>> {
        self.fixtures
            .iter()
            .map(|fixture| fixture.to_item(source))
            .collect()
    }

    pub fn into_store(self, source: &ConfigurationSource) -> Result<ConfigurationStore> {
        let mut store = ConfigurationStore::new();
        for item in self.to_items(source)? {
            store.register(item)?;
        }
        Ok(store)
    }
}

impl FixtureDocument {
    pub fn to_item(&self, source: &ConfigurationSource) -> Result<ConfigurationItem> {
        let type_ref: TypeRef = self.type_name.parse()?;
        let id = FixtureItemId::named(self.name.clone(), type_ref);
        let mut item = ConfigurationItem::new(id.clone());

        if let Some(kind) = self.kind {
            item = item.with_fixture_configuration(FixtureConfiguration::Kind(kind));
        }
        if let Some(policy) = self.ctor_selection {
            item = item.with_fixture_configuration(FixtureConfiguration::CtorSelection(policy));
        }
        for (name, member) in &self.members {
            item = item.with_member(member.to_member_configuration(&id, name, source)?);
        }
        if let Some(ctor) = &self.ctor {
            let mut configuration = CtorMemberConfiguration::for_overload(
                ctor.types
                    .iter()
                    .map(|t| t.parse::<TypeRef>())
                    .collect::<Result<Vec<_>>>()?,
            )
            .with_source(source.clone());
            for (name, parameter) in &ctor.parameters {
                configuration = configuration
                    .with_parameter(parameter.to_member_configuration(&id, name, source)?);
            }
            item = item.with_ctor(configuration);
        }
        Ok(item)
    }
}

impl MemberDocument {
    pub fn to_member_configuration(
        &self,
        owner: &FixtureItemId,
        name: &str,
        source: &ConfigurationSource,
    ) -> Result<MemberConfiguration> {
        let chosen = usize::from(self.value.is_some())
            + usize::from(self.unique)
            + usize::from(self.null)
            + usize::from(self.link.is_some());
        if chosen != 1 {
            return Err(Error::invalid_configuration(
                format!("{}.{name}", owner.path()),
                "exactly one of value, unique, null or link must be set",
            ));
        }
        if self.link_type.is_some() && self.link.is_none() {
            return Err(Error::invalid_configuration(
                format!("{}.{name}", owner.path()),
                "type is only allowed together with link",
            ));
        }

        let member = if let Some(value) = &self.value {
            MemberConfiguration::raw(name, literal_from_json(value).ok_or_else(|| {
                Error::invalid_configuration(
                    format!("{}.{name}", owner.path()),
                    format!("unsupported literal {value}"),
                )
            })?)
        } else if self.unique {
            MemberConfiguration::unique(name)
        } else if self.null {
            MemberConfiguration::null(name)
        } else if let Some(target) = &self.link {
            let target_type = match &self.link_type {
                Some(t) => t.parse()?,
                None => TypeRef::object(),
            };
            MemberConfiguration::link(name, FixtureItemId::named(target.clone(), target_type))
        } else {
            return Err(Error::invalid_configuration(
                format!("{}.{name}", owner.path()),
                "empty member entry",
            ));
        };
        Ok(member.with_source(source.clone()))
    }
}

/// Literal from a document value: integers become `i64` (or `u64` above
/// `i64::MAX`), arrays of small integers become byte arrays
fn literal_from_json(value: &serde_json::Value) -> Option<Value> {
    match value {
        serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::I64)
            .or_else(|| n.as_u64().map(Value::U64))
            .or_else(|| n.as_f64().map(Value::F64)),
        serde_json::Value::String(s) => Some(Value::String(s.clone())),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
            .collect::<Option<Vec<u8>>>()
            .map(Value::Bytes),
        serde_json::Value::Null | serde_json::Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CARS: &str = r#"
        [[fixtures]]
        name = "Car1"
        type = "Car"
        kind = "concrete"
        ctor_selection = "fewest_parameters"

        [fixtures.members]
        Speed = { value = 80 }
        Name = { unique = true }
        Owner = { null = true }
        Engine = { link = "Engine1", type = "Engine" }
        Plate = { value = [1, 2, 3] }

        [fixtures.ctor]
        types = ["i32"]
        parameters = { wheels = { value = 4 } }

        [[fixtures]]
        name = "Engine1"
        type = "Engine"
    "#;

    fn file_source() -> ConfigurationSource {
        ConfigurationSource::File {
            path: "cars.toml".into(),
        }
    }

    #[test]
    fn test_toml_document_to_items() {
        let document = ConfigurationDocument::from_toml_str(CARS).expect("valid document");
        let items = document.to_items(&file_source()).expect("converts");
        assert_eq!(items.len(), 2);

        let car = &items[0];
        assert_eq!(car.id().name(), Some("Car1"));
        assert_eq!(car.fixture_kind(), Some(FixtureKind::Concrete));
        assert_eq!(
            car.ctor_selection(),
            Some(CtorSelectionPolicy::FewestParameters)
        );
        assert_eq!(
            car.member("Speed"),
            Some(&MemberConfiguration::raw("Speed", Value::I64(80)).with_source(file_source()))
        );
        assert_eq!(
            car.member("Plate"),
            Some(
                &MemberConfiguration::raw("Plate", Value::Bytes(vec![1, 2, 3]))
                    .with_source(file_source())
            )
        );
        assert!(matches!(car.member("Name"), Some(MemberConfiguration::Unique { .. })));
        assert!(matches!(car.member("Owner"), Some(MemberConfiguration::Null { .. })));
        match car.member("Engine") {
            Some(MemberConfiguration::Link { target, .. }) => {
                assert_eq!(target.name(), Some("Engine1"));
                assert_eq!(target.type_ref(), &TypeRef::named("Engine"));
            }
            other => panic!("expected link, got {other:?}"),
        }

        let ctor = car.ctor_configuration().expect("ctor section");
        assert_eq!(ctor.parameter_types.len(), 1);
        assert!(ctor.parameter("wheels").is_some());
    }

    #[test]
    fn test_json_document() {
        let json = r#"{ "fixtures": [ { "name": "Car1", "type": "Car",
            "members": { "Speed": { "value": 3.5 } } } ] }"#;
        let store = ConfigurationDocument::from_json_str(json)
            .expect("valid json")
            .into_store(&ConfigurationSource::User)
            .expect("converts");
        let item = store
            .get(&FixtureItemId::named("Car1", TypeRef::named("Car")))
            .expect("stored");
        assert_eq!(
            item.member("Speed"),
            Some(&MemberConfiguration::raw("Speed", Value::F64(3.5)))
        );
    }

    #[test]
    fn test_member_entry_needs_exactly_one_choice() {
        let toml = r#"
            [[fixtures]]
            name = "Car1"
            type = "Car"
            [fixtures.members]
            Speed = { unique = true, null = true }
        "#;
        let err = ConfigurationDocument::from_toml_str(toml)
            .expect("parses")
            .to_items(&ConfigurationSource::User)
            .unwrap_err();
        assert!(err.is_invalid_configuration());
    }

    #[test]
    fn test_unknown_member_keys_rejected() {
        let toml = r#"
            [[fixtures]]
            name = "Car1"
            type = "Car"
            [fixtures.members]
            Speed = { uniqe = true }
        "#;
        assert!(ConfigurationDocument::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_from_file_reads_toml() {
        use std::io::Write;
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        file.write_all(CARS.as_bytes()).expect("writes");
        let document = ConfigurationDocument::from_file(file.path()).expect("loads");
        assert_eq!(document.fixtures.len(), 2);
    }
}
