//! Registration logging.
//!
//! [`Factory::log`](crate::Factory::log) renders the registry as text and
//! hands it to a [`ConfigLogger`]. Without an explicit logger the text goes
//! to `tracing` at debug level.

use crate::descriptors::BindingDescriptor;

/// Receives the rendered registration log.
pub trait ConfigLogger {
    fn log(&self, message: &str);
}

/// Emits the registration log as a `tracing` debug event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingConfigLogger;

impl ConfigLogger for TracingConfigLogger {
    fn log(&self, message: &str) {
        tracing::debug!(target: "ferrous_ioc::registration", "{}", message);
    }
}

impl<F: Fn(&str)> ConfigLogger for F {
    fn log(&self, message: &str) {
        self(message)
    }
}

/// Renders bindings in registry order, one block per contract.
pub(crate) fn render(bindings: &[BindingDescriptor]) -> String {
    let mut out = String::from("Logging the registration...\n\n");
    for binding in bindings {
        out.push_str(&format!("Registered type: '{}' contains...\n", binding.contract));
        for implementation in &binding.implementations {
            out.push_str(&format!(
                "Type: '{}' with key '{}' as '{}' lifetime\n",
                implementation.type_name, implementation.key, implementation.lifetime
            ));
        }
        out.push_str(&format!("Registered type: '{}' complete.\n\n", binding.contract));
    }
    out.push_str("Registration log complete.\n");
    out
}
