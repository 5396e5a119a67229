//! Registry of editable objects.
//!
//! Objects are addressed by a stable index; removing one leaves a hole so the
//! indices of the others never change while a gizmo session refers to them.

use glam::DMat4;

/// A model placed in the scene whose transform can be edited.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableObject {
    /// Display name.
    pub name: String,
    /// Model matrix in ECEF.
    pub model_matrix: DMat4,
}

impl EditableObject {
    pub fn new(name: impl Into<String>, model_matrix: DMat4) -> Self {
        Self {
            name: name.into(),
            model_matrix,
        }
    }
}

/// Registry for managing all editable objects.
#[derive(Debug, Default)]
pub struct Registry {
    objects: Vec<Option<EditableObject>>,
}

impl Registry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object and returns its index.
    pub fn register(&mut self, object: EditableObject) -> usize {
        self.objects.push(Some(object));
        self.objects.len() - 1
    }

    /// Gets an object by index.
    pub fn get(&self, index: usize) -> Option<&EditableObject> {
        self.objects.get(index).and_then(Option::as_ref)
    }

    /// Gets a mutable object by index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut EditableObject> {
        self.objects.get_mut(index).and_then(Option::as_mut)
    }

    /// Checks if an object exists at the given index.
    pub fn contains(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Removes an object, leaving its index vacant.
    pub fn remove(&mut self, index: usize) -> Option<EditableObject> {
        self.objects.get_mut(index).and_then(Option::take)
    }

    /// Returns the model matrix of an object.
    pub fn transform(&self, index: usize) -> Option<DMat4> {
        self.get(index).map(|o| o.model_matrix)
    }

    /// Sets the model matrix of an object. Returns `false` if it does not exist.
    pub fn set_transform(&mut self, index: usize, matrix: DMat4) -> bool {
        match self.get_mut(index) {
            Some(object) => {
                object.model_matrix = matrix;
                true
            }
            None => false,
        }
    }

    /// Removes all objects.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Iterates over `(index, object)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &EditableObject)> {
        self.objects
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.as_ref().map(|o| (i, o)))
    }

    /// Returns the number of registered objects.
    pub fn len(&self) -> usize {
        self.objects.iter().filter(|o| o.is_some()).count()
    }

    /// Returns true if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
