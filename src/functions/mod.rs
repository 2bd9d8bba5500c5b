// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Function registry and dispatch
//!
//! Host-side functions the model may call by name with structured arguments.
//! The registry maps names to callables, executes calls on behalf of the
//! model, and exports the schema list advertised to the remote service.

pub mod builtin;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ParleyError, Result};

/// Argument object passed to a function callable
pub type FunctionArgs = Map<String, Value>;

/// Schema record advertised to the remote model for one function
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionSchema {
    /// Function name
    pub name: String,

    /// What the function does
    pub description: String,

    /// JSON Schema for the argument object
    pub parameters: Value,
}

/// Trait for host-side functions the model may invoke
pub trait HostFunction: Send + Sync {
    /// The name the model calls this function by
    fn name(&self) -> &str;

    /// Description advertised to the model
    fn description(&self) -> &str;

    /// Property schemas for the argument object
    fn parameters(&self) -> Map<String, Value>;

    /// Names of required parameters
    fn required(&self) -> Vec<&str>;

    /// Execute with a parsed argument object, returning the result text.
    ///
    /// Host-tool convention: internal failures (missing file, bad path)
    /// resolve to a descriptive result string for the model rather than an
    /// error; only programming-level failures propagate.
    fn invoke(&self, args: &FunctionArgs) -> Result<String>;

    /// The schema record for this function
    fn schema(&self) -> FunctionSchema {
        FunctionSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": Value::Object(self.parameters()),
            }),
        }
    }
}

/// Registry of callable functions
#[derive(Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn HostFunction>>,
    /// Registration order, preserved for schema export
    order: Vec<String>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function, replacing any prior entry under the same name.
    ///
    /// Replacement is explicit: the displaced definition is returned so a
    /// caller that considers an override a bug can assert on it.
    pub fn register(&mut self, function: Arc<dyn HostFunction>) -> Option<Arc<dyn HostFunction>> {
        let name = function.name().to_string();
        let displaced = self.functions.insert(name.clone(), function);
        if displaced.is_some() {
            debug!(function = %name, "replacing registered function");
        } else {
            self.order.push(name);
        }
        displaced
    }

    /// Get a function by exact name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn HostFunction>> {
        self.functions.get(name)
    }

    /// Look up `name` and invoke it with the parsed `arguments_json` object.
    ///
    /// An absent name fails with [`ParleyError::UnknownFunction`];
    /// unparseable or non-object arguments fail with
    /// [`ParleyError::MalformedArguments`]. Callable failures propagate.
    pub fn dispatch(&self, name: &str, arguments_json: &str) -> Result<String> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| ParleyError::UnknownFunction(name.to_string()))?;

        let value: Value = serde_json::from_str(arguments_json)
            .map_err(|e| ParleyError::MalformedArguments(e.to_string()))?;
        let args = value
            .as_object()
            .ok_or_else(|| {
                ParleyError::MalformedArguments("arguments must be a JSON object".to_string())
            })?;

        debug!(function = %name, "dispatching function call");
        function.invoke(args)
    }

    /// Schema records for every registered function, in registration order
    pub fn schemas(&self) -> Vec<FunctionSchema> {
        self.order
            .iter()
            .filter_map(|name| self.functions.get(name))
            .map(|f| f.schema())
            .collect()
    }

    /// Registered function names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// Read a required string argument, with a descriptive error naming it
pub(crate) fn required_str<'a>(args: &'a FunctionArgs, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ParleyError::InvalidInput(format!("{} is required", key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoFunction {
        name: String,
        reply: String,
    }

    impl EchoFunction {
        fn new(name: &str, reply: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                reply: reply.to_string(),
            })
        }
    }

    impl HostFunction for EchoFunction {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            "Echo a fixed reply"
        }

        fn parameters(&self) -> Map<String, Value> {
            let mut props = Map::new();
            props.insert(
                "text".to_string(),
                serde_json::json!({"type": "string", "description": "Text to echo"}),
            );
            props
        }

        fn required(&self) -> Vec<&str> {
            vec!["text"]
        }

        fn invoke(&self, args: &FunctionArgs) -> Result<String> {
            let text = args.get("text").and_then(Value::as_str).unwrap_or("");
            Ok(format!("{}: {}", self.reply, text))
        }
    }

    #[test]
    fn test_register_and_dispatch() {
        let mut registry = FunctionRegistry::new();
        registry.register(EchoFunction::new("echo", "heard"));

        let result = registry.dispatch("echo", r#"{"text": "hi"}"#).unwrap();
        assert_eq!(result, "heard: hi");
    }

    #[test]
    fn test_dispatch_unknown_function() {
        let registry = FunctionRegistry::new();
        let err = registry.dispatch("missing", "{}").unwrap_err();
        assert!(matches!(err, ParleyError::UnknownFunction(name) if name == "missing"));
    }

    #[test]
    fn test_dispatch_unknown_function_with_others_registered() {
        let mut registry = FunctionRegistry::new();
        registry.register(EchoFunction::new("echo", "heard"));

        assert!(matches!(
            registry.dispatch("missing", "{}").unwrap_err(),
            ParleyError::UnknownFunction(_)
        ));
    }

    #[test]
    fn test_dispatch_malformed_arguments() {
        let mut registry = FunctionRegistry::new();
        registry.register(EchoFunction::new("echo", "heard"));

        let err = registry.dispatch("echo", "{not json").unwrap_err();
        assert!(matches!(err, ParleyError::MalformedArguments(_)));
    }

    #[test]
    fn test_dispatch_non_object_arguments() {
        let mut registry = FunctionRegistry::new();
        registry.register(EchoFunction::new("echo", "heard"));

        let err = registry.dispatch("echo", r#"["a", "b"]"#).unwrap_err();
        assert!(matches!(err, ParleyError::MalformedArguments(_)));
    }

    #[test]
    fn test_reregistration_replaces_and_returns_displaced() {
        let mut registry = FunctionRegistry::new();
        assert!(registry.register(EchoFunction::new("echo", "first")).is_none());
        let displaced = registry.register(EchoFunction::new("echo", "second"));
        assert!(displaced.is_some());

        // Dispatch hits exactly the last-registered callable.
        let result = registry.dispatch("echo", r#"{"text": "x"}"#).unwrap();
        assert_eq!(result, "second: x");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_schemas_in_registration_order() {
        let mut registry = FunctionRegistry::new();
        registry.register(EchoFunction::new("charlie", "c"));
        registry.register(EchoFunction::new("alpha", "a"));
        registry.register(EchoFunction::new("bravo", "b"));

        let names: Vec<String> = registry.schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["charlie", "alpha", "bravo"]);
    }

    #[test]
    fn test_reregistration_keeps_original_order() {
        let mut registry = FunctionRegistry::new();
        registry.register(EchoFunction::new("first", "1"));
        registry.register(EchoFunction::new("second", "2"));
        registry.register(EchoFunction::new("first", "1b"));

        let names = registry.names();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_schema_shape() {
        let mut registry = FunctionRegistry::new();
        registry.register(EchoFunction::new("echo", "heard"));

        let schemas = registry.schemas();
        let json = serde_json::to_value(&schemas[0]).unwrap();
        assert_eq!(json["name"], "echo");
        assert_eq!(json["parameters"]["type"], "object");
        assert_eq!(
            json["parameters"]["properties"]["text"]["type"],
            "string"
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry = FunctionRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.schemas().is_empty());
        assert!(registry.get("anything").is_none());
    }

    #[test]
    fn test_required_str_helper() {
        let mut args = Map::new();
        args.insert("path".to_string(), Value::String("/tmp".to_string()));

        assert_eq!(required_str(&args, "path").unwrap(), "/tmp");
        assert!(matches!(
            required_str(&args, "missing").unwrap_err(),
            ParleyError::InvalidInput(_)
        ));
    }
}
