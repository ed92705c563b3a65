//! Unit tests for the plexus-catalog crate.

use plexus_types::{AssemblyName, TypeDescriptor, TypeIdentity};

mod resolver;

fn plugins() -> AssemblyName {
    AssemblyName::new("plugins", "1.0.0.0")
}

fn system() -> AssemblyName {
    AssemblyName::new("core", "4.0.0.0")
}

fn plugin_type(name: &str) -> TypeIdentity {
    TypeIdentity::new(name, "Plugins", plugins())
}

fn system_type(name: &str) -> TypeIdentity {
    TypeIdentity::new(name, "System", system())
}

mod catalog_tests {
    use rstest::{fixture, rstest};

    use super::{TypeDescriptor, plugin_type};
    use crate::{CatalogError, TypeCatalog};

    /// `Leaf : Middle : Root`
    #[fixture]
    fn chain() -> TypeCatalog {
        let mut catalog = TypeCatalog::new();
        catalog.register(TypeDescriptor::class(plugin_type("Root")));
        catalog.register(
            TypeDescriptor::class(plugin_type("Middle")).with_base_type(plugin_type("Root")),
        );
        catalog.register(
            TypeDescriptor::class(plugin_type("Leaf")).with_base_type(plugin_type("Middle")),
        );
        catalog
    }

    #[test]
    fn new_catalog_is_empty() {
        let catalog = TypeCatalog::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }

    #[rstest]
    fn register_is_idempotent(mut chain: TypeCatalog) {
        chain.register(TypeDescriptor::class(plugin_type("Root")));
        assert_eq!(chain.len(), 3);
        assert!(chain.contains(&plugin_type("ROOT")));
    }

    #[rstest]
    #[case("Root", "Middle", true)]
    #[case("Middle", "Leaf", true)]
    #[case("Root", "Leaf", true)]
    #[case("Leaf", "Root", false)]
    #[case("Root", "Root", false)]
    fn subtype_relation_is_transitive(
        chain: TypeCatalog,
        #[case] parent: &str,
        #[case] child: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(
            chain.is_subtype_of(&plugin_type(parent), &plugin_type(child)),
            expected
        );
    }

    #[test]
    fn registering_a_parent_later_links_existing_children() {
        let mut catalog = TypeCatalog::new();
        catalog.register(
            TypeDescriptor::class(plugin_type("Logger")).with_interface(plugin_type("ILogger")),
        );
        assert!(!catalog.is_subtype_of(&plugin_type("ILogger"), &plugin_type("Logger")));

        catalog.register(TypeDescriptor::interface(plugin_type("ILogger")));
        assert!(catalog.is_subtype_of(&plugin_type("ILogger"), &plugin_type("Logger")));
    }

    #[test]
    fn generic_type_definition_counts_as_supertype() {
        let assembly = super::plugins();
        let parameter = super::TypeIdentity::generic_parameter("T", assembly);
        let definition = plugin_type("Box").with_type_arguments(vec![parameter]);
        let closed = definition.instantiate(vec![plugin_type("Item")]);

        let mut catalog = TypeCatalog::new();
        catalog.register(TypeDescriptor::class(definition.clone()));
        catalog.register(
            TypeDescriptor::class(closed.clone()).with_generic_type_definition(definition.clone()),
        );

        assert!(catalog.is_subtype_of(&definition, &closed));
    }

    #[rstest]
    fn unregister_removes_edges_and_reregister_restores_them(mut chain: TypeCatalog) {
        chain.unregister(&plugin_type("Middle"));
        assert_eq!(chain.len(), 2);
        assert!(!chain.is_subtype_of(&plugin_type("Root"), &plugin_type("Leaf")));

        chain.register(
            TypeDescriptor::class(plugin_type("Middle")).with_base_type(plugin_type("Root")),
        );
        assert!(chain.is_subtype_of(&plugin_type("Root"), &plugin_type("Leaf")));
    }

    #[test]
    fn subtype_walk_terminates_on_cyclic_supertypes() {
        let mut catalog = TypeCatalog::new();
        catalog.register(
            TypeDescriptor::class(plugin_type("Ping")).with_base_type(plugin_type("Pong")),
        );
        catalog.register(
            TypeDescriptor::class(plugin_type("Pong")).with_base_type(plugin_type("Ping")),
        );
        catalog.register(TypeDescriptor::class(plugin_type("Bystander")));

        assert!(!catalog.is_subtype_of(&plugin_type("Bystander"), &plugin_type("Ping")));
        assert!(!catalog.is_subtype_of(&plugin_type("Missing"), &plugin_type("Pong")));
        assert!(catalog.is_subtype_of(&plugin_type("Pong"), &plugin_type("Ping")));
    }

    #[rstest]
    fn unregister_of_unknown_type_is_a_no_op(mut chain: TypeCatalog) {
        chain.unregister(&plugin_type("Missing"));
        assert_eq!(chain.len(), 3);
    }

    #[rstest]
    fn lookup_reports_unknown_types(chain: TypeCatalog) {
        let found = chain.lookup(&plugin_type("Leaf")).expect("registered");
        assert_eq!(found.base_type(), Some(&plugin_type("Middle")));

        let err = chain
            .lookup(&plugin_type("Missing"))
            .expect_err("missing type should fail");
        assert!(matches!(err, CatalogError::UnknownTypeDefinition { .. }));
        assert!(err.to_string().contains("Plugins.Missing"));
    }

    #[rstest]
    fn lookup_by_name_ignores_case(chain: TypeCatalog) {
        let found = chain
            .lookup_by_name("plugins.middle, PLUGINS, Version=1.0.0.0")
            .expect("registered");
        assert_eq!(found.identity(), &plugin_type("Middle"));

        assert!(chain.lookup_by_name("Plugins.Middle").is_err());
    }
}
