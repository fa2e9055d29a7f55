use ferrous_ioc::{implements, ConfigLogger, Constructor, Factory, Injectable};
use std::sync::Mutex;

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

#[derive(Default)]
struct Square;
impl Shape for Square {}
impl Injectable for Square {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::from_default()]
    }
}
implements!(Square => dyn Shape);

#[derive(Default)]
struct RecordingLogger {
    messages: Mutex<Vec<String>>,
}

impl ConfigLogger for RecordingLogger {
    fn log(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

#[test]
fn test_log_renders_every_binding() {
    let factory = Factory::new();
    factory.add_keyed::<dyn Shape, Circle>("circle").unwrap().as_singleton();
    factory.add_keyed::<dyn Shape, Square>("square").unwrap();

    let logger = RecordingLogger::default();
    factory.log(Some(&logger));

    let messages = logger.messages.into_inner().unwrap();
    assert_eq!(messages.len(), 1);
    let text = &messages[0];

    let contract = std::any::type_name::<dyn Shape>();
    assert!(text.starts_with("Logging the registration...\n\n"));
    assert!(text.contains(&format!("Registered type: '{}' contains...\n", contract)));
    assert!(text.contains(&format!(
        "Type: '{}' with key 'circle' as 'Singleton' lifetime\n",
        std::any::type_name::<Circle>()
    )));
    assert!(text.contains(&format!(
        "Type: '{}' with key 'square' as 'Transient' lifetime\n",
        std::any::type_name::<Square>()
    )));
    assert!(text.contains(&format!("Registered type: '{}' complete.\n\n", contract)));
    assert!(text.ends_with("Registration log complete.\n"));
}

#[test]
fn test_log_includes_self_registration() {
    let factory = Factory::new();
    let captured = Mutex::new(String::new());
    factory.log(Some(&|message: &str| captured.lock().unwrap().push_str(message)));

    let text = captured.into_inner().unwrap();
    assert!(text.contains("ResolverCore"));
    assert!(text.contains("as 'Singleton' lifetime"));
}

#[test]
fn test_log_without_logger_goes_to_tracing() {
    let subscriber = tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).with_test_writer().finish();
    tracing::subscriber::with_default(subscriber, || {
        Factory::new().log(None);
    });
}
