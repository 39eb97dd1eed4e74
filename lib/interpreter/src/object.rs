use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::{self, Formatter},
    rc::Rc,
};

use crate::{value::Value, RuntimeError};

pub type ObjectRef = Rc<RefCell<Object>>;

/// A method registered on an object by the embedding host. Receives the
/// object it is bound to and the already-evaluated arguments.
pub type NativeMethod = Rc<dyn Fn(ObjectRef, &[Value]) -> Result<Value, RuntimeError>>;

/// The extensible object kind: named properties plus named methods.
///
/// The grammar has no literal syntax that constructs one, so objects enter
/// a program through host-seeded globals (see `Interpreter::define`).
/// Properties are freely readable and writable from scripts; methods can
/// only be called, never read as values.
#[derive(Default)]
pub struct Object {
    properties: HashMap<String, Value>,
    methods: HashMap<String, NativeMethod>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_ref(self) -> ObjectRef {
        Rc::new(RefCell::new(self))
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn set_property(&mut self, name: &str, value: Value) {
        self.properties.insert(name.to_string(), value);
    }

    pub fn method(&self, name: &str) -> Option<NativeMethod> {
        self.methods.get(name).cloned()
    }

    pub fn add_method(
        &mut self,
        name: &str,
        method: impl Fn(ObjectRef, &[Value]) -> Result<Value, RuntimeError> + 'static,
    ) {
        self.methods.insert(name.to_string(), Rc::new(method));
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("properties", &self.properties)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}
