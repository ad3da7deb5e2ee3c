//! Configuration of members nobody configured

use fixtura_core::{
    ConfigurationSource, FixtureItemId, MemberConfiguration, TypeDescriptionProvider, TypeRef,
};

/// Supplies the configuration of unconfigured members
pub trait SystemDefaults {
    /// Configuration for `member` of `owner`, declared with the bound type `member_type`
    fn default_for(
        &self,
        provider: &dyn TypeDescriptionProvider,
        owner: &FixtureItemId,
        member: &str,
        member_type: &TypeRef,
    ) -> MemberConfiguration;
}

/// Unique values for base types, anonymous nested fixtures for user types
///
/// Arrays other than `u8[]`, unresolved type parameters and the top type
/// have nothing to construct and default to null.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSystemDefaults;

impl SystemDefaults for DefaultSystemDefaults {
    fn default_for(
        &self,
        provider: &dyn TypeDescriptionProvider,
        owner: &FixtureItemId,
        member: &str,
        member_type: &TypeRef,
    ) -> MemberConfiguration {
        let inner = member_type.nullable_inner().unwrap_or(member_type);
        let configuration = match provider.describe(inner) {
            _ if inner.is_object() || inner.contains_parameters() => {
                MemberConfiguration::null(member)
            }
            Some(description) if description.is_base_type() => MemberConfiguration::unique(member),
            Some(_) => MemberConfiguration::link(member, owner.child(member, member_type.clone())),
            None if matches!(inner, TypeRef::Array { .. }) => MemberConfiguration::null(member),
            // unknown types surface as resolve errors when the link is built
            None => MemberConfiguration::link(member, owner.child(member, member_type.clone())),
        };
        configuration.with_source(ConfigurationSource::SystemDefault)
    }
}
