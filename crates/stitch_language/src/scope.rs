//! Variable bindings visible to script code.
//!
//! A [`Scope`] is a persistent map: cloning it is O(1), so a run can work on
//! its own copy and the caller keeps the previous scope untouched if the run
//! fails.

use stitch_foundation::{Error, Result, Value};

use crate::token::TypeKeyword;

/// A declared variable.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    /// Current value.
    pub value: Value,
    /// Declared type; assignments must keep to it.
    pub ty: TypeKeyword,
}

/// Variables declared so far in a session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scope(im::HashMap<String, Binding>);

impl Scope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no variables are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the variable is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Gets a variable's binding.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.0.get(name)
    }

    /// Gets a variable's value.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.0.get(name).map(|binding| &binding.value)
    }

    /// Declares (or redeclares) a variable after checking its type.
    ///
    /// # Errors
    ///
    /// Returns a type mismatch if `value` does not fit `ty`.
    pub fn declare(&mut self, name: impl Into<String>, ty: TypeKeyword, value: Value) -> Result<()> {
        let value = coerce(ty, value)?;
        self.0.insert(name.into(), Binding { value, ty });
        Ok(())
    }

    /// Assigns a new value to a declared variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is undeclared or the value does not
    /// fit its declared type.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<()> {
        let binding = self
            .0
            .get_mut(name)
            .ok_or_else(|| Error::undefined_symbol(name))?;
        binding.value = coerce(binding.ty, value)?;
        Ok(())
    }

    /// Returns an iterator over variable names and values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0
            .iter()
            .map(|(name, binding)| (name.as_str(), &binding.value))
    }
}

/// Converts `value` to the declared type, widening ints to doubles.
///
/// # Errors
///
/// Returns a type mismatch if the value cannot be stored in `ty`.
#[allow(clippy::cast_precision_loss)]
pub fn coerce(ty: TypeKeyword, value: Value) -> Result<Value> {
    match (ty, value) {
        (TypeKeyword::Var, v)
        | (TypeKeyword::Int | TypeKeyword::Long, v @ Value::Int(_))
        | (TypeKeyword::Double, v @ Value::Float(_))
        | (TypeKeyword::String, v @ (Value::String(_) | Value::Null))
        | (TypeKeyword::Bool, v @ Value::Bool(_)) => Ok(v),
        (TypeKeyword::Double, Value::Int(n)) => Ok(Value::Float(n as f64)),
        (ty, v) => Err(Error::type_mismatch(ty.keyword(), v.type_name())),
    }
}
