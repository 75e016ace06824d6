///
/// Runtime schema description for one entity type.
///
/// Models are declared as `const` data by the entity trait stack and held
/// by reference everywhere else; nothing here is built at runtime.
///

///
/// EntityModel
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EntityModel {
    pub path: &'static str,
    pub entity_name: &'static str,
    pub primary_key: &'static str,
    pub fields: &'static [EntityFieldModel],
}

impl EntityModel {
    /// Look up a declared field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static EntityFieldModel> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// True when the entity declares the named field.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

///
/// EntityFieldModel
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EntityFieldModel {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl EntityFieldModel {
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

///
/// FieldKind
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Blob,
    Bool,
    Float64,
    Int,
    List,
    Text,
    Uint,
    Ulid,
}
