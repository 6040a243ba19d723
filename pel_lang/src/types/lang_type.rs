//! Language type descriptors and the conversion matrix
//!
//! Each `LangType` carries one full conversion row: a mode for every
//! `TypeKind`, indexed by discriminant. Built-in rows are declared as total
//! arrays, so a missing entry cannot compile; rows built through
//! `LangTypeBuilder` are validated when `build` runs. Either way a finished
//! row holds `SameType` at its own kind and nowhere else.

use crate::types::kind::TypeKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// How a conversion from one kind to another behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversionMode {
    /// Identity: source and target are the same kind
    SameType,
    /// Always succeeds regardless of the value
    Supported,
    /// Succeeds or fails depending on the actual value
    RunTimeCheck,
    /// Always fails; checked before any value inspection
    NotSupported,
}

impl ConversionMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SameType => "same type",
            Self::Supported => "supported",
            Self::RunTimeCheck => "run-time check",
            Self::NotSupported => "not supported",
        }
    }
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion row validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    #[error("Type '{type_name}' is missing a conversion entry for kind '{kind}'")]
    MissingConversion { type_name: String, kind: TypeKind },

    #[error("Type '{type_name}' defines the conversion for kind '{kind}' twice")]
    DuplicateConversion { type_name: String, kind: TypeKind },

    #[error(
        "Type '{type_name}' declares SameType for '{kind}' but its own kind is '{own_kind}'"
    )]
    MisplacedSameType {
        type_name: String,
        kind: TypeKind,
        own_kind: TypeKind,
    },

    #[error("Type '{type_name}' must declare SameType for its own kind '{own_kind}', found '{found}'")]
    SelfEntryNotSameType {
        type_name: String,
        own_kind: TypeKind,
        found: ConversionMode,
    },
}

/// A named type with its complete conversion row
#[derive(Debug, Clone, PartialEq)]
pub struct LangType {
    name: String,
    full_name: String,
    kind: TypeKind,
    is_system: bool,
    conversions: [ConversionMode; 9],
}

impl LangType {
    /// Start building a host-defined type row
    pub fn builder(name: impl Into<String>, kind: TypeKind) -> LangTypeBuilder {
        LangTypeBuilder::new(name, kind)
    }

    /// Short type name, e.g. "number"
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace-qualified name, e.g. "pel.number"
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Whether this row is one of the built-in descriptors
    pub fn is_system(&self) -> bool {
        self.is_system
    }

    /// Look up the conversion mode toward `target`
    pub fn conversion_to(&self, target: TypeKind) -> ConversionMode {
        self.conversions[target.index()]
    }

    /// Check the SameType placement invariant over a finished row
    pub fn validate(&self) -> Result<(), TypeError> {
        for kind in TypeKind::all() {
            let mode = self.conversion_to(kind);
            if mode == ConversionMode::SameType && kind != self.kind {
                return Err(TypeError::MisplacedSameType {
                    type_name: self.name.clone(),
                    kind,
                    own_kind: self.kind,
                });
            }
        }
        let self_entry = self.conversion_to(self.kind);
        if self_entry != ConversionMode::SameType {
            return Err(TypeError::SelfEntryNotSameType {
                type_name: self.name.clone(),
                own_kind: self.kind,
                found: self_entry,
            });
        }
        Ok(())
    }
}

/// Incremental, validating constructor for conversion rows
#[derive(Debug)]
pub struct LangTypeBuilder {
    name: String,
    full_name: Option<String>,
    kind: TypeKind,
    is_system: bool,
    conversions: [Option<ConversionMode>; 9],
}

impl LangTypeBuilder {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            full_name: None,
            kind,
            is_system: false,
            conversions: [None; 9],
        }
    }

    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Record the conversion mode toward `target`; each target exactly once
    pub fn conversion(
        mut self,
        target: TypeKind,
        mode: ConversionMode,
    ) -> Result<Self, TypeError> {
        let slot = &mut self.conversions[target.index()];
        if slot.is_some() {
            return Err(TypeError::DuplicateConversion {
                type_name: self.name.clone(),
                kind: target,
            });
        }
        *slot = Some(mode);
        Ok(self)
    }

    /// Finish the row, enforcing totality and SameType placement
    pub fn build(self) -> Result<LangType, TypeError> {
        let mut conversions = [ConversionMode::NotSupported; 9];
        for kind in TypeKind::all() {
            match self.conversions[kind.index()] {
                Some(mode) => conversions[kind.index()] = mode,
                None => {
                    return Err(TypeError::MissingConversion {
                        type_name: self.name.clone(),
                        kind,
                    });
                }
            }
        }

        let full_name = self
            .full_name
            .unwrap_or_else(|| format!("pel.{}", self.name));
        let lang_type = LangType {
            name: self.name,
            full_name,
            kind: self.kind,
            is_system: self.is_system,
            conversions,
        };
        lang_type.validate()?;
        Ok(lang_type)
    }
}

// ============================================================================
// Built-in descriptors
// ============================================================================

use ConversionMode::{NotSupported as NS, RunTimeCheck as RTC, SameType as Same, Supported as Sup};

/// One built-in row; the array literal keeps the row total by construction.
/// Entry order follows the `TypeKind` declaration:
/// null, bool, date, number, string, time, array, map, any.
fn system_type(name: &str, kind: TypeKind, conversions: [ConversionMode; 9]) -> LangType {
    LangType {
        name: name.to_string(),
        full_name: format!("pel.{name}"),
        kind,
        is_system: true,
        conversions,
    }
}

fn build_descriptors() -> [LangType; 9] {
    [
        // Null converts to everything; every other row converts to Null
        system_type(
            "null",
            TypeKind::Null,
            [Same, Sup, Sup, Sup, Sup, Sup, Sup, Sup, Sup],
        ),
        system_type(
            "bool",
            TypeKind::Bool,
            [Sup, Same, NS, Sup, Sup, NS, NS, NS, NS],
        ),
        system_type(
            "date",
            TypeKind::Date,
            [Sup, NS, Same, Sup, Sup, Sup, NS, NS, NS],
        ),
        system_type(
            "number",
            TypeKind::Number,
            [Sup, Sup, RTC, Same, Sup, RTC, NS, NS, NS],
        ),
        system_type(
            "string",
            TypeKind::String,
            [Sup, RTC, RTC, RTC, Same, RTC, NS, NS, NS],
        ),
        system_type(
            "time",
            TypeKind::Time,
            [Sup, NS, Sup, Sup, Sup, Same, NS, NS, NS],
        ),
        system_type(
            "array",
            TypeKind::Array,
            [Sup, NS, NS, NS, Sup, NS, Same, NS, NS],
        ),
        system_type(
            "map",
            TypeKind::Map,
            [Sup, NS, NS, NS, Sup, NS, NS, Same, NS],
        ),
        system_type(
            "any",
            TypeKind::Any,
            [Sup, NS, NS, NS, NS, NS, NS, NS, Same],
        ),
    ]
}

/// The built-in descriptor for `kind`
pub fn descriptor(kind: TypeKind) -> &'static LangType {
    static DESCRIPTORS: OnceLock<[LangType; 9]> = OnceLock::new();
    &DESCRIPTORS.get_or_init(build_descriptors)[kind.index()]
}
