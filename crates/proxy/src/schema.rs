//! Storage layout descriptors
//!
//! Delegated execution shares one storage context across logic versions,
//! so a new implementation must keep every existing field at its
//! position and may only append. The shell validates that here before
//! activating an implementation.

use serde::Serialize;

/// One storage field: name and type, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: &'static str,
}

impl FieldDef {
    pub const fn new(name: &'static str, ty: &'static str) -> Self {
        Self { name, ty }
    }
}

/// An ordered storage layout as declared by an implementation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageLayout {
    fields: Vec<FieldDef>,
}

impl StorageLayout {
    pub fn new(fields: &[FieldDef]) -> Self {
        Self {
            fields: fields.to_vec(),
        }
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Whether `self` can replace `active` without corrupting storage:
    /// every active field must reappear unchanged at the same position;
    /// new fields may only be appended after them.
    pub fn is_append_only_extension_of(&self, active: &StorageLayout) -> bool {
        self.fields.len() >= active.fields.len()
            && active
                .fields
                .iter()
                .zip(self.fields.iter())
                .all(|(current, proposed)| current == proposed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(fields: &[(&'static str, &'static str)]) -> StorageLayout {
        StorageLayout::new(
            &fields
                .iter()
                .map(|(name, ty)| FieldDef::new(name, ty))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_identical_layout_is_compatible() {
        let v1 = layout(&[("admin", "Address"), ("close_factor", "u128")]);
        assert!(v1.is_append_only_extension_of(&v1.clone()));
    }

    #[test]
    fn test_appending_fields_is_compatible() {
        let v1 = layout(&[("admin", "Address")]);
        let v2 = layout(&[("admin", "Address"), ("borrow_caps", "map")]);
        assert!(v2.is_append_only_extension_of(&v1));
        // but never the reverse: dropping a field loses storage
        assert!(!v1.is_append_only_extension_of(&v2));
    }

    #[test]
    fn test_reordering_is_rejected() {
        let v1 = layout(&[("admin", "Address"), ("oracle", "Address")]);
        let v2 = layout(&[("oracle", "Address"), ("admin", "Address")]);
        assert!(!v2.is_append_only_extension_of(&v1));
    }

    #[test]
    fn test_retyping_is_rejected() {
        let v1 = layout(&[("close_factor", "u128")]);
        let v2 = layout(&[("close_factor", "u64"), ("extra", "bool")]);
        assert!(!v2.is_append_only_extension_of(&v1));
    }

    #[test]
    fn test_anything_extends_the_empty_layout() {
        let empty = StorageLayout::default();
        let v1 = layout(&[("admin", "Address")]);
        assert!(v1.is_append_only_extension_of(&empty));
    }
}
