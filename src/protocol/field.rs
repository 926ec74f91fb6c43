//! Field catalog
//!
//! Every named field of the wire protocol with its on-wire width. The table
//! is a `const`, so there is nothing to initialize before first use.

use crate::error::{Result, SysmonError};

/// A named protocol field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Alert identifier, two big-endian u32 words (high word first)
    Id,
    Stamp,
    Flags,
    Type,
    User,
    /// One group identifier
    Group,
    /// Number of group identifiers that follow
    Groups,
    /// Length prefix of a short string
    String,
    Version,
    Result,
    Matches,
}

/// Catalog entry for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    pub name: &'static str,
    /// Encoded width in bytes
    pub width: usize,
}

/// The complete field catalog
pub const FIELDS: [FieldSpec; 11] = [
    FieldSpec { field: Field::Id, name: "id", width: 8 },
    FieldSpec { field: Field::Stamp, name: "stamp", width: 4 },
    FieldSpec { field: Field::Flags, name: "flags", width: 4 },
    FieldSpec { field: Field::Type, name: "type", width: 4 },
    FieldSpec { field: Field::User, name: "user", width: 4 },
    FieldSpec { field: Field::Group, name: "group", width: 4 },
    FieldSpec { field: Field::Groups, name: "groups", width: 1 },
    FieldSpec { field: Field::String, name: "string", width: 1 },
    FieldSpec { field: Field::Version, name: "version", width: 4 },
    FieldSpec { field: Field::Result, name: "result", width: 1 },
    FieldSpec { field: Field::Matches, name: "matches", width: 4 },
];

impl Field {
    /// Look a field up by its wire name
    pub fn from_name(name: &str) -> Result<Field> {
        FIELDS
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| spec.field)
            .ok_or_else(|| SysmonError::UnknownField(name.to_string()))
    }

    /// Encoded width in bytes
    pub const fn width(self) -> usize {
        self.spec().width
    }

    pub const fn name(self) -> &'static str {
        self.spec().name
    }

    /// Largest value the field can carry
    pub const fn max_value(self) -> u64 {
        match self.width() {
            1 => u8::MAX as u64,
            4 => u32::MAX as u64,
            _ => u64::MAX,
        }
    }

    const fn spec(self) -> FieldSpec {
        // FIELDS is declared in enum order
        FIELDS[self as usize]
    }
}
