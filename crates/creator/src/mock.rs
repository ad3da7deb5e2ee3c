//! Call-recording test doubles

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;

use fixtura_core::{Callback, Error, FixtureItemId, Result, TypeRef};
use tracing::{trace, warn};

use crate::instance::Instance;

/// A callback a mock runs on every call of a method, with the call's
/// arguments
///
/// Register it with [`MethodCallback::into_callback`]; callbacks of any
/// other type are ignored by mocks.
pub struct MethodCallback(Box<dyn Fn(&[Instance]) + Send + Sync>);

impl MethodCallback {
    pub fn new(callback: impl Fn(&[Instance]) + Send + Sync + 'static) -> Self {
        Self(Box::new(callback))
    }

    pub fn into_callback(self) -> Callback {
        Callback::new(self)
    }

    pub fn call(&self, arguments: &[Instance]) {
        (self.0)(arguments)
    }
}

impl fmt::Debug for MethodCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MethodCallback")
    }
}

/// Stub of one mocked method
#[derive(Debug, Clone, Default)]
pub struct MockMethod {
    /// `None` for `void` methods
    pub return_value: Option<Instance>,
    pub callbacks: Vec<Callback>,
}

/// One recorded invocation
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub method: String,
    pub arguments: Vec<Instance>,
}

/// Dynamic test double for an interface or class
///
/// Methods are addressed by their member key (`Drive__i32`).
pub struct MockObject {
    id: FixtureItemId,
    type_ref: TypeRef,
    properties: RefCell<BTreeMap<String, Instance>>,
    methods: RefCell<BTreeMap<String, MockMethod>>,
    calls: RefCell<Vec<MockCall>>,
}

impl MockObject {
    pub fn new(id: FixtureItemId, type_ref: TypeRef) -> Self {
        Self {
            id,
            type_ref,
            properties: RefCell::new(BTreeMap::new()),
            methods: RefCell::new(BTreeMap::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &FixtureItemId {
        &self.id
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn property(&self, name: &str) -> Option<Instance> {
        self.properties.borrow().get(name).cloned()
    }

    pub(crate) fn set_property(&self, name: &str, value: Instance) {
        self.properties.borrow_mut().insert(name.to_string(), value);
    }

    pub(crate) fn set_method(&self, key: &str, method: MockMethod) {
        self.methods.borrow_mut().insert(key.to_string(), method);
    }

    pub fn method_keys(&self) -> Vec<String> {
        self.methods.borrow().keys().cloned().collect()
    }

    /// Call `method`: record the call, run its callbacks in order and return
    /// the stubbed value (`None` for `void` methods)
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the mock has no such method.
    pub fn invoke(&self, method: &str, arguments: Vec<Instance>) -> Result<Option<Instance>> {
        let stub = self.methods.borrow().get(method).cloned().ok_or_else(|| {
            Error::invalid_input(format!("mock {} has no method {method}", self.id))
        })?;
        trace!(mock = %self.id, method, "mock invoked");

        for callback in &stub.callbacks {
            match callback.downcast_ref::<MethodCallback>() {
                Some(callback) => callback.call(&arguments),
                None => warn!(mock = %self.id, method, "ignoring callback of unknown type"),
            }
        }
        self.calls.borrow_mut().push(MockCall {
            method: method.to_string(),
            arguments,
        });
        Ok(stub.return_value)
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.method == method)
            .count()
    }
}

impl fmt::Debug for MockObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockObject")
            .field("id", &self.id)
            .field("type_ref", &self.type_ref.to_string())
            .field("methods", &self.method_keys())
            .field("calls", &self.calls.borrow().len())
            .finish()
    }
}
