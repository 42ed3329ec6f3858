use std::collections::HashMap;

use crate::errors::FormError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Password,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Checkbox { checked: bool },
    Input { input_type: InputType, value: String },
}

/// In-memory stand-in for a rendered form: elements addressed by id.
#[derive(Debug, Default)]
pub struct Page {
    elements: HashMap<String, Element>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_checkbox(mut self, id: &str, checked: bool) -> Self {
        self.elements
            .insert(id.to_string(), Element::Checkbox { checked });
        self
    }

    pub fn with_input(mut self, id: &str, input_type: InputType) -> Self {
        self.elements.insert(
            id.to_string(),
            Element::Input {
                input_type,
                value: String::new(),
            },
        );
        self
    }

    pub fn require_checkbox(&self, id: &str) -> Result<(), FormError> {
        self.is_checked(id).map(|_| ())
    }

    pub fn require_input(&self, id: &str) -> Result<(), FormError> {
        self.input_type(id).map(|_| ())
    }

    pub fn is_checked(&self, id: &str) -> Result<bool, FormError> {
        match self.lookup(id)? {
            Element::Checkbox { checked } => Ok(*checked),
            Element::Input { .. } => Err(wrong_kind(id, "a checkbox")),
        }
    }

    pub fn set_checked(&mut self, id: &str, state: bool) -> Result<(), FormError> {
        match self.lookup_mut(id)? {
            Element::Checkbox { checked } => {
                *checked = state;
                Ok(())
            }
            Element::Input { .. } => Err(wrong_kind(id, "a checkbox")),
        }
    }

    pub fn input_type(&self, id: &str) -> Result<InputType, FormError> {
        match self.lookup(id)? {
            Element::Input { input_type, .. } => Ok(*input_type),
            Element::Checkbox { .. } => Err(wrong_kind(id, "an input")),
        }
    }

    pub fn set_input_type(&mut self, id: &str, kind: InputType) -> Result<(), FormError> {
        match self.lookup_mut(id)? {
            Element::Input { input_type, .. } => {
                *input_type = kind;
                Ok(())
            }
            Element::Checkbox { .. } => Err(wrong_kind(id, "an input")),
        }
    }

    pub fn value(&self, id: &str) -> Result<&str, FormError> {
        match self.lookup(id)? {
            Element::Input { value, .. } => Ok(value.as_str()),
            Element::Checkbox { .. } => Err(wrong_kind(id, "an input")),
        }
    }

    pub fn set_value(&mut self, id: &str, new_value: impl Into<String>) -> Result<(), FormError> {
        match self.lookup_mut(id)? {
            Element::Input { value, .. } => {
                *value = new_value.into();
                Ok(())
            }
            Element::Checkbox { .. } => Err(wrong_kind(id, "an input")),
        }
    }

    fn lookup(&self, id: &str) -> Result<&Element, FormError> {
        self.elements
            .get(id)
            .ok_or_else(|| FormError::MissingElement(id.to_string()))
    }

    fn lookup_mut(&mut self, id: &str) -> Result<&mut Element, FormError> {
        self.elements
            .get_mut(id)
            .ok_or_else(|| FormError::MissingElement(id.to_string()))
    }
}

fn wrong_kind(id: &str, expected: &'static str) -> FormError {
    FormError::WrongKind {
        id: id.to_string(),
        expected,
    }
}
