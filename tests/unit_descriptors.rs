/// Unit tests for type and binding descriptors
use ferrous_ioc::{
    implements, BindingDescriptor, Constructor, Factory, ImplementationDescriptor, Injectable, Lifetime, TypeDescriptor,
    TypeKind,
};
use std::collections::HashSet;

trait Shape: Send + Sync {}

#[derive(Default)]
struct Circle;
impl Shape for Circle {}
impl Injectable for Circle {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::from_default()]
    }
}
implements!(Circle => dyn Shape);

#[test]
fn test_type_descriptor_kinds() {
    assert_eq!(TypeDescriptor::of::<dyn Shape>().kind(), TypeKind::Abstract);
    assert_eq!(TypeDescriptor::of::<Circle>().kind(), TypeKind::Concrete);
    assert_eq!(TypeDescriptor::of::<String>().kind(), TypeKind::Concrete);
}

#[test]
fn test_type_descriptor_display_is_name() {
    let descriptor = TypeDescriptor::of::<Circle>();
    assert_eq!(descriptor.to_string(), std::any::type_name::<Circle>());
}

#[test]
fn test_type_descriptor_hashes_by_identity() {
    let mut set = HashSet::new();
    set.insert(TypeDescriptor::of::<dyn Shape>());
    set.insert(TypeDescriptor::of::<dyn Shape>());
    set.insert(TypeDescriptor::of::<Circle>());
    assert_eq!(set.len(), 2);
}

#[test]
fn test_describe_lists_bindings_in_registration_order() {
    let factory = Factory::new();
    factory.add_keyed::<dyn Shape, Circle>("round").unwrap();

    let bindings = factory.describe();
    assert_eq!(bindings.len(), 2);
    assert!(bindings[0].contract.contains("ResolverCore"));
    assert_eq!(
        bindings[1],
        BindingDescriptor {
            contract: std::any::type_name::<dyn Shape>(),
            implementations: vec![ImplementationDescriptor {
                key: "round".to_string(),
                type_name: std::any::type_name::<Circle>(),
                lifetime: Lifetime::Transient,
            }],
        }
    );
}

#[test]
fn test_describe_reflects_lifetime_changes() {
    let factory = Factory::new();
    let item = factory.add::<dyn Shape, Circle>().unwrap();
    item.as_singleton();

    let bindings = factory.describe();
    assert_eq!(bindings[1].implementations[0].lifetime, Lifetime::Singleton);
    assert_eq!(bindings[1].implementations[0].key, std::any::type_name::<Circle>());
}
