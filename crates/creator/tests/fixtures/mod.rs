//! Types and engine setup shared by the end-to-end tests
#![allow(dead_code)]

use std::sync::Once;

use fixtura_core::{
    Config, FieldDescription, FixtureItemId, MethodDescription, PropertyDescription,
    TypeDescription, TypeKind, TypeRef, TypeRegistry,
};
use fixtura_creator::Fixture;

static INIT_LOGGING: Once = Once::new();

/// Initialize test logging from `FIXTURA_TEST_LOG`, then `RUST_LOG`,
/// defaulting to errors only; safe to call from every test
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let log_level = std::env::var("FIXTURA_TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "error".to_string());

        tracing_subscriber::fmt()
            .with_env_filter(log_level)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

fn class(name: &str) -> fixtura_core::types::TypeDescriptionBuilder {
    let mut builder = TypeDescription::builder();
    builder.name(name).kind(TypeKind::Class);
    builder
}

fn build(builder: &fixtura_core::types::TypeDescriptionBuilder) -> TypeDescription {
    builder.build().expect("valid description")
}

/// Garage { IVehicle Vehicle1; IVehicle Vehicle2; string Name (field) }
/// IVehicle { i32 Speed { get; }; void Drive(i32); string Honk() }
/// Car(string name) { Engine Engine; nullable<i32> Mileage }
/// Engine { i32 Power }, A { A AProp }, Loop(Loop next)
pub fn registry() -> TypeRegistry {
    TypeRegistry::new()
        .with(build(
            class("Garage")
                .properties(vec![
                    PropertyDescription::new("Vehicle1", TypeRef::named("IVehicle")),
                    PropertyDescription::new("Vehicle2", TypeRef::named("IVehicle")),
                ])
                .fields(vec![FieldDescription::new("Name", TypeRef::named("string"))]),
        ))
        .with(build(
            TypeDescription::builder()
                .name("IVehicle")
                .kind(TypeKind::Interface)
                .properties(vec![
                    PropertyDescription::new("Speed", TypeRef::named("i32")).read_only()
                ])
                .methods(vec![
                    MethodDescription::new("Drive", TypeRef::void())
                        .with_parameters(vec![("distance", TypeRef::named("i32"))]),
                    MethodDescription::new("Honk", TypeRef::named("string")),
                ]),
        ))
        .with(build(
            class("Car")
                .constructors(vec![MethodDescription::constructor(vec![(
                    "name",
                    TypeRef::named("string"),
                )])])
                .properties(vec![
                    PropertyDescription::new("Engine", TypeRef::named("Engine")),
                    PropertyDescription::new("Mileage", TypeRef::nullable(TypeRef::named("i32"))),
                ]),
        ))
        .with(build(
            class("Engine")
                .properties(vec![PropertyDescription::new("Power", TypeRef::named("i32"))]),
        ))
        .with(build(
            class("A").properties(vec![PropertyDescription::new("AProp", TypeRef::named("A"))]),
        ))
        .with(build(class("Loop").constructors(vec![MethodDescription::constructor(vec![(
            "next",
            TypeRef::named("Loop"),
        )])])))
}

pub fn engine() -> Fixture {
    init_test_logging();
    Fixture::new(registry(), Config::default()).expect("default settings are valid")
}

pub fn named(name: &str, type_name: &str) -> FixtureItemId {
    FixtureItemId::named(name, TypeRef::named(type_name))
}
