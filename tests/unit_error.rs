use ferrous_ioc::DiError;

#[test]
fn test_error_display_messages() {
    let invalid = DiError::InvalidArgument {
        argument: "contract",
        type_name: "app::Circle",
        reason: "type is not an abstract contract",
    };
    assert_eq!(invalid.to_string(), "Invalid contract 'app::Circle': type is not an abstract contract");

    assert_eq!(
        DiError::NoConstructor("app::Car").to_string(),
        "No constructor declared for: app::Car"
    );
    assert_eq!(
        DiError::ConstructorArity { type_name: "app::Car", arguments: 0 }.to_string(),
        "No constructor of app::Car takes 0 argument(s)"
    );
    assert_eq!(
        DiError::Unresolvable { implementation: "app::Car", parameter: "dyn app::Engine" }.to_string(),
        "Cannot inject dyn app::Engine into app::Car"
    );
    assert_eq!(
        DiError::MissingArgument("dyn app::Engine").to_string(),
        "Missing constructor argument: dyn app::Engine"
    );
    assert_eq!(DiError::TypeMismatch("dyn app::Engine").to_string(), "Type mismatch for: dyn app::Engine");
    assert_eq!(DiError::DepthExceeded(64).to_string(), "Max depth 64 exceeded");
    assert_eq!(DiError::FactoryDropped.to_string(), "Factory has been dropped");
}

#[test]
fn test_circular_display_joins_path() {
    let err = DiError::Circular(vec!["dyn A", "dyn B", "dyn A"]);
    assert_eq!(err.to_string(), "Circular dependency: dyn A -> dyn B -> dyn A");
}

#[test]
fn test_construction_helper_names_type() {
    struct Engine;
    match DiError::construction::<Engine>("seized") {
        DiError::Construction { type_name, message } => {
            assert!(type_name.ends_with("Engine"));
            assert_eq!(message, "seized");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_error_is_std_error() {
    fn assert_error<E: std::error::Error + Send + Sync + Clone + 'static>(_: &E) {}
    assert_error(&DiError::FactoryDropped);
}
