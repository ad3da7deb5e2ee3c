//! Type descriptions shared by the definition tree tests
#![allow(dead_code)]

use std::sync::Once;

use fixtura_core::{
    FieldDescription, MethodDescription, PropertyDescription, TypeDescription, TypeKind, TypeRef,
    TypeRegistry,
};

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

pub fn i32_type() -> TypeRef {
    TypeRef::named("i32")
}

pub fn string_type() -> TypeRef {
    TypeRef::named("string")
}

/// Garage { IVehicle Vehicle1; IVehicle Vehicle2; string Name (field) }
/// IVehicle { i32 Speed { get; }; void Drive(i32); string Honk(); T Load<T>() }
/// Car(string name) / Car(string name, i32 wheels) { Engine Engine; nullable<i32> Mileage }
/// Engine { i32 Power; readonly string Serial (field) }
/// Crate<T> { T Content }, Pair<A, B> { A First; B Second }
/// A { A AProp }, Chain { Chain Next }
/// abstract Vehicle : IVehicle, Paint { Color Color }, enum Color { Red, Green }
/// ISink { i32 Put(List<i32>); i32 Put(List<string>) }
pub fn registry() -> TypeRegistry {
    TypeRegistry::new()
        .with(build(
            class("Garage")
                .properties(vec![
                    PropertyDescription::new("Vehicle1", TypeRef::named("IVehicle")),
                    PropertyDescription::new("Vehicle2", TypeRef::named("IVehicle")),
                ])
                .fields(vec![FieldDescription::new("Name", string_type())]),
        ))
        .with(build(
            TypeDescription::builder()
                .name("IVehicle")
                .kind(TypeKind::Interface)
                .properties(vec![PropertyDescription::new("Speed", i32_type()).read_only()])
                .methods(vec![
                    MethodDescription::new("Drive", TypeRef::void())
                        .with_parameters(vec![("distance", i32_type())]),
                    MethodDescription::new("Honk", string_type()),
                    MethodDescription::new("Load", TypeRef::parameter("T"))
                        .with_generic_parameters(vec!["T"]),
                ]),
        ))
        .with(build(
            class("Car")
                .constructors(vec![
                    MethodDescription::constructor(vec![("name", string_type())]),
                    MethodDescription::constructor(vec![
                        ("name", string_type()),
                        ("wheels", i32_type()),
                    ]),
                ])
                .properties(vec![
                    PropertyDescription::new("Engine", TypeRef::named("Engine")),
                    PropertyDescription::new("Mileage", TypeRef::nullable(i32_type())),
                ]),
        ))
        .with(build(
            class("Engine")
                .properties(vec![PropertyDescription::new("Power", i32_type())])
                .fields(vec![FieldDescription::new("Serial", string_type()).readonly()]),
        ))
        .with(build(
            class("Crate")
                .generic_parameters(vec!["T".to_string()])
                .properties(vec![PropertyDescription::new(
                    "Content",
                    TypeRef::parameter("T"),
                )]),
        ))
        .with(build(
            class("Pair")
                .generic_parameters(vec!["A".to_string(), "B".to_string()])
                .properties(vec![
                    PropertyDescription::new("First", TypeRef::parameter("A")),
                    PropertyDescription::new("Second", TypeRef::parameter("B")),
                ]),
        ))
        .with(build(
            class("A").properties(vec![PropertyDescription::new("AProp", TypeRef::named("A"))]),
        ))
        .with(build(
            class("Chain")
                .properties(vec![PropertyDescription::new("Next", TypeRef::named("Chain"))]),
        ))
        .with(build(
            class("Vehicle")
                .is_abstract(true)
                .interfaces(vec![TypeRef::named("IVehicle")])
                .properties(vec![PropertyDescription::new("Speed", i32_type())]),
        ))
        .with(TypeDescription::enumeration("Color", ["Red", "Green"]))
        .with(build(
            TypeDescription::builder()
                .name("ISink")
                .kind(TypeKind::Interface)
                .methods(vec![put_overload(i32_type()), put_overload(string_type())]),
        ))
        .with(build(
            class("Paint")
                .properties(vec![PropertyDescription::new("Color", TypeRef::named("Color"))]),
        ))
}

fn put_overload(element: TypeRef) -> MethodDescription {
    MethodDescription::new("Put", i32_type())
        .with_parameters(vec![("items", TypeRef::generic("List", vec![element]))])
}
