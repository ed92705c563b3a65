//! Acceptance checks for direct and wrapped imports.

use rstest::{fixture, rstest};

use plexus_types::{
    ExportDefinition, ImportDefinition, MethodDescriptor, ParameterDescriptor, PropertyDescriptor,
    TypeDescriptor, TypeIdentity,
};

use super::{plugin_type, system_type};
use crate::{CompatibilityResolver, ConnectParts, TypeCatalog, WrapperKinds};

struct Fixture {
    catalog: TypeCatalog,
    wrappers: WrapperKinds,
}

impl Fixture {
    fn accepts(&self, import: &ImportDefinition, export: &ExportDefinition) -> bool {
        CompatibilityResolver::new(&self.catalog, &self.wrappers).accepts(import, export)
    }

    fn sequence_of(&self, element: TypeIdentity) -> TypeIdentity {
        self.wrappers.sequence().instantiate(vec![element])
    }

    fn lazy_of(&self, arguments: Vec<TypeIdentity>) -> TypeIdentity {
        find_arity(self.wrappers.lazy(), arguments)
    }

    fn function_of(&self, arguments: Vec<TypeIdentity>) -> TypeIdentity {
        find_arity(self.wrappers.functions(), arguments)
    }

    fn action_of(&self, arguments: Vec<TypeIdentity>) -> TypeIdentity {
        find_arity(self.wrappers.actions(), arguments)
    }
}

fn find_arity(definitions: &[TypeIdentity], arguments: Vec<TypeIdentity>) -> TypeIdentity {
    definitions
        .iter()
        .find(|definition| definition.type_arguments().len() == arguments.len())
        .expect("wrapper of requested arity")
        .instantiate(arguments)
}

/// `FooImpl : IFoo`, plus `FooCollection : Sequence<IFoo>`.
#[fixture]
fn world() -> Fixture {
    let wrappers = WrapperKinds::default();
    let mut catalog = TypeCatalog::new();
    catalog.register(TypeDescriptor::interface(plugin_type("IFoo")));
    catalog.register(
        TypeDescriptor::class(plugin_type("FooImpl")).with_interface(plugin_type("IFoo")),
    );
    catalog.register(
        TypeDescriptor::class(plugin_type("FooCollection"))
            .with_interface(wrappers.sequence().instantiate(vec![plugin_type("IFoo")])),
    );
    Fixture { catalog, wrappers }
}

fn import_of(contract: &str, required: TypeIdentity) -> ImportDefinition {
    let property = PropertyDescriptor::new("Value", plugin_type("Consumer"), required);
    ImportDefinition::on_property(contract, property).expect("valid import")
}

fn type_export(contract: &str, name: &str) -> ExportDefinition {
    ExportDefinition::on_type(contract, plugin_type(name)).expect("valid export")
}

fn property_export(contract: &str, property_type: TypeIdentity) -> ExportDefinition {
    let property = PropertyDescriptor::new("Value", plugin_type("Provider"), property_type);
    ExportDefinition::on_property(contract, property).expect("valid export")
}

fn method_export(
    contract: &str,
    returns: Option<TypeIdentity>,
    parameters: Vec<TypeIdentity>,
) -> ExportDefinition {
    let mut method = MethodDescriptor::new("Invoke", plugin_type("Provider"));
    if let Some(return_type) = returns {
        method = method.returning(return_type);
    }
    for (position, parameter_type) in parameters.into_iter().enumerate() {
        let parameter = ParameterDescriptor::new(format!("arg{position}"), parameter_type);
        method = method.with_parameter(parameter);
    }
    ExportDefinition::on_method(contract, method).expect("valid export")
}

fn int() -> TypeIdentity {
    system_type("Int32")
}

fn boolean() -> TypeIdentity {
    system_type("Boolean")
}

fn string() -> TypeIdentity {
    system_type("String")
}

// ---------------------------------------------------------------------------
// Direct matches
// ---------------------------------------------------------------------------

#[rstest]
#[case::same_type("IFoo", true)]
#[case::subtype("FooImpl", true)]
#[case::unrelated("Bar", false)]
fn direct_match_uses_subtypes(world: Fixture, #[case] exported: &str, #[case] expected: bool) {
    let import = import_of("foo", plugin_type("IFoo"));
    assert_eq!(world.accepts(&import, &type_export("foo", exported)), expected);
}

#[rstest]
#[case("foo", "FOO", true)]
#[case("foo", "bar", false)]
fn contract_names_must_match(
    world: Fixture,
    #[case] import_contract: &str,
    #[case] export_contract: &str,
    #[case] expected: bool,
) {
    let import = import_of(import_contract, plugin_type("IFoo"));
    let export = type_export(export_contract, "FooImpl");
    assert_eq!(world.accepts(&import, &export), expected);
}

#[rstest]
fn blank_required_type_never_matches(world: Fixture) {
    let method = MethodDescriptor::new("Attach", plugin_type("Consumer"));
    let import = ImportDefinition::on_method("foo", method).expect("valid import");
    assert!(!world.accepts(&import, &type_export("foo", "FooImpl")));
}

#[rstest]
fn wrapper_search_terminates_on_cyclic_supertypes(mut world: Fixture) {
    world.catalog.register(
        TypeDescriptor::interface(plugin_type("IPing")).with_interface(plugin_type("IPong")),
    );
    world.catalog.register(
        TypeDescriptor::interface(plugin_type("IPong")).with_interface(plugin_type("IPing")),
    );

    let import = import_of("foo", plugin_type("IPing"));
    assert!(!world.accepts(&import, &type_export("foo", "FooImpl")));
    assert!(world.accepts(&import, &type_export("foo", "IPong")));
}

#[rstest]
fn void_method_export_does_not_match_plain_import(world: Fixture) {
    let import = import_of("foo", plugin_type("IFoo"));
    assert!(!world.accepts(&import, &method_export("foo", None, Vec::new())));
}

// ---------------------------------------------------------------------------
// Sequences and lazy values
// ---------------------------------------------------------------------------

#[rstest]
#[case::element_type("IFoo", true)]
#[case::element_subtype("FooImpl", true)]
#[case::unrelated("Bar", false)]
fn sequence_accepts_elements_and_their_subtypes(
    world: Fixture,
    #[case] exported: &str,
    #[case] expected: bool,
) {
    let import = import_of("foo", world.sequence_of(plugin_type("IFoo")));
    assert_eq!(world.accepts(&import, &type_export("foo", exported)), expected);
}

#[rstest]
fn sequence_is_detected_through_interfaces(world: Fixture) {
    let import = import_of("foo", plugin_type("FooCollection"));
    assert!(world.accepts(&import, &type_export("foo", "FooImpl")));
}

#[rstest]
fn sequence_of_lazy_unwraps_the_lazy_value(world: Fixture) {
    let lazy = world.lazy_of(vec![plugin_type("IFoo"), plugin_type("Metadata")]);
    let import = import_of("foo", world.sequence_of(lazy));
    assert!(world.accepts(&import, &type_export("foo", "FooImpl")));
    assert!(!world.accepts(&import, &type_export("foo", "Bar")));
}

#[rstest]
#[case::value_only(1)]
#[case::with_metadata(2)]
fn lazy_accepts_its_first_argument(world: Fixture, #[case] arity: usize) {
    let arguments = [plugin_type("IFoo"), plugin_type("Metadata")]
        .into_iter()
        .take(arity)
        .collect();
    let import = import_of("foo", world.lazy_of(arguments));
    assert!(world.accepts(&import, &type_export("foo", "FooImpl")));
    assert!(!world.accepts(&import, &type_export("foo", "Metadata")));
}

// ---------------------------------------------------------------------------
// Functions and actions
// ---------------------------------------------------------------------------

#[rstest]
fn function_accepts_matching_method(world: Fixture) {
    let import = import_of("call", world.function_of(vec![int(), boolean()]));
    let export = method_export("call", Some(boolean()), vec![int()]);
    assert!(world.accepts(&import, &export));
}

#[rstest]
#[case::wrong_parameter(method_export("call", Some(boolean()), vec![string()]))]
#[case::extra_parameter(method_export("call", Some(boolean()), vec![int(), int()]))]
#[case::wrong_return(method_export("call", Some(int()), vec![int()]))]
#[case::void_method(method_export("call", None, vec![int()]))]
#[case::property(property_export("call", boolean()))]
fn function_rejects_mismatched_exports(world: Fixture, #[case] export: ExportDefinition) {
    let import = import_of("call", world.function_of(vec![int(), boolean()]));
    assert!(!world.accepts(&import, &export));
}

#[rstest]
#[case::property(property_export("make", plugin_type("IFoo")))]
#[case::subtype_property(property_export("make", plugin_type("FooImpl")))]
#[case::factory_method(method_export("make", Some(plugin_type("FooImpl")), Vec::new()))]
fn single_argument_function_accepts_producers(world: Fixture, #[case] export: ExportDefinition) {
    let import = import_of("make", world.function_of(vec![plugin_type("IFoo")]));
    assert!(world.accepts(&import, &export));
}

#[rstest]
fn action_accepts_void_method_with_matching_parameters(world: Fixture) {
    let import = import_of("run", world.action_of(vec![string()]));
    assert!(world.accepts(&import, &method_export("run", None, vec![string()])));
}

#[rstest]
#[case::returns_value(method_export("run", Some(boolean()), vec![string()]))]
#[case::wrong_parameter(method_export("run", None, vec![int()]))]
#[case::missing_parameter(method_export("run", None, Vec::new()))]
#[case::property(property_export("run", string()))]
fn action_rejects_mismatched_exports(world: Fixture, #[case] export: ExportDefinition) {
    let import = import_of("run", world.action_of(vec![string()]));
    assert!(!world.accepts(&import, &export));
}

// ---------------------------------------------------------------------------
// Seams
// ---------------------------------------------------------------------------

#[rstest]
fn acceptance_survives_a_json_round_trip(world: Fixture) {
    let import = import_of("foo", world.sequence_of(plugin_type("IFoo")));
    let export = type_export("foo", "FooImpl");

    let import_text = serde_json::to_string(&import).expect("serialize import");
    let export_text = serde_json::to_string(&export).expect("serialize export");
    let restored_import: ImportDefinition =
        serde_json::from_str(&import_text).expect("deserialize import");
    let restored_export: ExportDefinition =
        serde_json::from_str(&export_text).expect("deserialize export");

    assert_eq!(restored_import, import);
    assert_eq!(restored_export, export);
    assert!(world.accepts(&restored_import, &restored_export));
}

#[rstest]
fn resolver_can_be_used_through_the_trait(world: Fixture) {
    fn check(
        connector: &dyn ConnectParts,
        import: &ImportDefinition,
        export: &ExportDefinition,
    ) -> bool {
        connector.accepts(import, export)
    }

    let resolver = CompatibilityResolver::new(&world.catalog, &world.wrappers);
    let import = import_of("foo", plugin_type("IFoo"));
    assert!(check(&resolver, &import, &type_export("foo", "FooImpl")));
}
