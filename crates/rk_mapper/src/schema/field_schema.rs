use core::fmt;

/// How a reference field relates to the record it points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReferenceDirection {
    /// This record stores a pointer to the child record under the field name.
    Owning,
    /// The child record stores a pointer back to this record under `owner_field`.
    OwnedBy { owner_field: &'static str },
}

/// The serialization used by a `TypedEncoding` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EncodingStrategy {
    /// The value's underlying raw scalar.
    RawValue,
    /// A self-describing byte encoding (JSON).
    OpaqueCodable,
    /// A binary archival encoding (CBOR).
    OpaqueBinary,
}

impl EncodingStrategy {
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RawValue => "raw value",
            Self::OpaqueCodable => "codable",
            Self::OpaqueBinary => "binary archive",
        }
    }
}

impl fmt::Display for EncodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Store-managed metadata exposed as a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SystemField {
    CreationDate,
    ModificationDate,
    ChangeTag,
}

impl SystemField {
    /// Resolves the field name reserved for a system field.
    pub fn from_field_name(name: &str) -> Option<Self> {
        match name {
            "creation_date" => Some(Self::CreationDate),
            "modification_date" => Some(Self::ModificationDate),
            "record_change_tag" => Some(Self::ChangeTag),
            _ => None,
        }
    }

    /// Returns the declared type a system field must have.
    pub const fn declared_type(self) -> &'static str {
        match self {
            Self::CreationDate | Self::ModificationDate => "Option<SystemTime>",
            Self::ChangeTag => "Option<String>",
        }
    }
}

/// Whether a field holds binary payloads that are staged as assets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BinaryShape {
    #[default]
    None,
    /// `Vec<u8>`: one asset.
    Single,
    /// `Vec<Vec<u8>>`: a list of assets.
    List,
}

/// The marker-derived kind of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Plain,
    RecordName,
    Reference(ReferenceDirection),
    TypedEncoding(EncodingStrategy),
    Ignored { has_default: bool },
    System(SystemField),
}

/// The compiled description of one mapped field.
///
/// # Example
///
/// ```
/// use rk_mapper::schema::{FieldKind, FieldSchema};
///
/// const NICKNAME: FieldSchema = FieldSchema::new("nickname", "Option<String>", true, FieldKind::Plain);
///
/// assert!(NICKNAME.is_optional());
/// assert_eq!(NICKNAME.storage_key(), "nickname");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldSchema {
    name: &'static str,
    declared_type: &'static str,
    optional: bool,
    binary: BinaryShape,
    kind: FieldKind,
}

impl FieldSchema {
    #[inline]
    pub const fn new(
        name: &'static str,
        declared_type: &'static str,
        optional: bool,
        kind: FieldKind,
    ) -> Self {
        Self {
            name,
            declared_type,
            optional,
            binary: BinaryShape::None,
            kind,
        }
    }

    /// Marks a plain field as holding binary payloads.
    #[inline]
    pub const fn with_binary(mut self, binary: BinaryShape) -> Self {
        self.binary = binary;
        self
    }

    /// The field name, unique within a type.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The key the field is stored under. Always the field name.
    #[inline]
    pub const fn storage_key(&self) -> &'static str {
        self.name
    }

    /// The declared type as written, e.g. `Option<String>`.
    #[inline]
    pub const fn declared_type(&self) -> &'static str {
        self.declared_type
    }

    #[inline]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    #[inline]
    pub const fn binary(&self) -> BinaryShape {
        self.binary
    }

    #[inline]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the back-pointer key of an `OwnedBy` reference.
    pub const fn owner_field(&self) -> Option<&'static str> {
        match self.kind {
            FieldKind::Reference(ReferenceDirection::OwnedBy { owner_field }) => Some(owner_field),
            _ => None,
        }
    }

    /// Returns `true` if the field occupies a key of its own record.
    pub const fn stores_key(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Plain
                | FieldKind::TypedEncoding(_)
                | FieldKind::Reference(ReferenceDirection::Owning)
        )
    }
}
