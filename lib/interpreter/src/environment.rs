use std::collections::HashMap;

use crate::value::Value;

/// The variable store for one program run. The grammar has no blocks,
/// functions or declarations, so this is a single flat scope where
/// assignment binds or overwrites.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
}

impl Environment {
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn define_and_lookup() {
        let mut environment = Environment::default();
        assert_eq!(environment.get("a"), None);

        environment.define("a", Value::Number(1.0));
        assert_eq!(environment.get("a"), Some(&Value::Number(1.0)));

        environment.define("a", Value::from("shadowed"));
        assert_eq!(environment.get("a"), Some(&Value::from("shadowed")));
    }
}
