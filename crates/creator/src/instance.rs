//! Materialized fixture instances

use std::any::Any;
use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use fixtura_core::{FixtureItemId, TypeRef, Value};

use crate::mock::MockObject;

pub type ObjectRef = Rc<FixtureObject>;
pub type MockRef = Rc<MockObject>;

/// One node of a materialized object graph
///
/// Objects and mocks are shared handles; equality compares them by
/// identity and literal values by value.
#[derive(Clone)]
pub enum Instance {
    Value(Value),
    /// Explicit null, distinct from a missing value
    Null,
    /// A value of a `nullable<...>` member
    Nullable(Box<Instance>),
    Object(ObjectRef),
    Mock(MockRef),
}

impl Instance {
    pub fn is_null(&self) -> bool {
        matches!(self, Instance::Null)
    }

    /// The literal value, looking through the nullable wrapper
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Instance::Value(value) => Some(value),
            Instance::Nullable(inner) => inner.as_value(),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Instance::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_mock(&self) -> Option<&MockRef> {
        match self {
            Instance::Mock(mock) => Some(mock),
            _ => None,
        }
    }

    /// Member of an object (assigned member or constructor argument) or
    /// property of a mock
    pub fn member(&self, name: &str) -> Option<Instance> {
        match self {
            Instance::Object(object) => object.member(name),
            Instance::Mock(mock) => mock.property(name),
            _ => None,
        }
    }

    /// Whether both sides are the same object or mock, or equal literals
    pub fn same_instance(&self, other: &Instance) -> bool {
        match (self, other) {
            (Instance::Object(a), Instance::Object(b)) => Rc::ptr_eq(a, b),
            (Instance::Mock(a), Instance::Mock(b)) => Rc::ptr_eq(a, b),
            (Instance::Nullable(a), Instance::Nullable(b)) => a.same_instance(b),
            (Instance::Value(a), Instance::Value(b)) => a == b,
            (Instance::Null, Instance::Null) => true,
            _ => false,
        }
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
    }
}

impl fmt::Debug for Instance {
    // objects print as their id only; graphs may be cyclic
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instance::Value(value) => write!(f, "Value({value})"),
            Instance::Null => write!(f, "Null"),
            Instance::Nullable(inner) => f.debug_tuple("Nullable").field(inner).finish(),
            Instance::Object(object) => write!(f, "Object({})", object.id()),
            Instance::Mock(mock) => write!(f, "Mock({})", mock.id()),
        }
    }
}

/// An instance of a class fixture
///
/// Holds the constructor arguments and assigned members as a dynamic
/// record. When the type has a registered factory, the value it produced
/// is kept as the payload.
pub struct FixtureObject {
    id: FixtureItemId,
    type_ref: TypeRef,
    ctor_arguments: Vec<(String, Instance)>,
    members: RefCell<BTreeMap<String, Instance>>,
    payload: RefCell<Option<Box<dyn Any>>>,
}

impl FixtureObject {
    pub fn new(
        id: FixtureItemId,
        type_ref: TypeRef,
        ctor_arguments: Vec<(String, Instance)>,
        payload: Option<Box<dyn Any>>,
    ) -> Self {
        Self {
            id,
            type_ref,
            ctor_arguments,
            members: RefCell::new(BTreeMap::new()),
            payload: RefCell::new(payload),
        }
    }

    pub fn id(&self) -> &FixtureItemId {
        &self.id
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn ctor_arguments(&self) -> &[(String, Instance)] {
        &self.ctor_arguments
    }

    pub fn ctor_argument(&self, name: &str) -> Option<&Instance> {
        self.ctor_arguments
            .iter()
            .find(|(parameter, _)| parameter == name)
            .map(|(_, value)| value)
    }

    /// Assigned member, else constructor argument of the same name
    pub fn member(&self, name: &str) -> Option<Instance> {
        self.members
            .borrow()
            .get(name)
            .cloned()
            .or_else(|| self.ctor_argument(name).cloned())
    }

    pub fn member_names(&self) -> Vec<String> {
        self.members.borrow().keys().cloned().collect()
    }

    pub(crate) fn set_member(&self, name: &str, value: Instance) {
        self.members.borrow_mut().insert(name.to_string(), value);
    }

    pub fn has_payload(&self) -> bool {
        self.payload.borrow().is_some()
    }

    /// The factory-built value, if it is a `T`
    pub fn payload<T: Any>(&self) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.payload.borrow(), |payload| {
            payload.as_ref().and_then(|p| p.downcast_ref::<T>())
        })
        .ok()
    }

    pub(crate) fn payload_mut(&self) -> std::cell::RefMut<'_, Option<Box<dyn Any>>> {
        self.payload.borrow_mut()
    }
}

impl fmt::Debug for FixtureObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixtureObject")
            .field("id", &self.id)
            .field("type_ref", &self.type_ref.to_string())
            .field("members", &self.member_names())
            .field("has_payload", &self.has_payload())
            .finish()
    }
}
