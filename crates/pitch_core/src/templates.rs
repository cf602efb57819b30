//! Formation template library.
//!
//! A template lists ten outfield slots in template space: a team attacking
//! left to right, field-relative pixels. Templates are reference data; a
//! library is built once (built-in, or parsed from RON at startup) and only
//! read afterwards.
//!
//! # Example RON
//!
//! ```ron
//! FormationLibrary(
//!     templates: [
//!         FormationTemplate(
//!             name: "4-3-3",
//!             slots: [
//!                 TemplateSlot(id: 13, zone: (60.0, 120.0)),
//!                 // ... nine more
//!             ],
//!         ),
//!     ],
//! )
//! ```

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TacticsError};
use crate::formation::DEFAULT_FORMATION;

/// Outfield slots every template must define.
pub const OUTFIELD_SLOTS: usize = 10;

/// One outfield position of a template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemplateSlot {
    /// Player id reported for this slot.
    pub id: i64,
    /// `(x, y)` in template space.
    pub zone: (f64, f64),
}

/// A named formation shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationTemplate {
    /// Formation label, e.g. `"4-3-3"`.
    pub name: String,
    /// Outfield slots, back line first.
    pub slots: Vec<TemplateSlot>,
}

/// Keyed set of formation templates.
#[derive(Debug, Clone, PartialEq)]
pub struct FormationLibrary {
    templates: Vec<FormationTemplate>,
}

const fn slot(id: i64, x: f64, y: f64) -> TemplateSlot {
    TemplateSlot { id, zone: (x, y) }
}

const BUILTIN: &[(&str, [TemplateSlot; OUTFIELD_SLOTS])] = &[
    (
        "4-3-3",
        [
            slot(13, 60.0, 120.0),
            slot(14, 60.0, 180.0),
            slot(15, 120.0, 90.0),
            slot(16, 120.0, 210.0),
            slot(17, 200.0, 100.0),
            slot(18, 200.0, 150.0),
            slot(19, 200.0, 200.0),
            slot(20, 300.0, 80.0),
            slot(21, 300.0, 150.0),
            slot(22, 300.0, 220.0),
        ],
    ),
    (
        "3-5-2",
        [
            slot(13, 80.0, 120.0),
            slot(14, 80.0, 180.0),
            slot(15, 80.0, 150.0),
            slot(16, 160.0, 90.0),
            slot(17, 160.0, 120.0),
            slot(18, 160.0, 180.0),
            slot(19, 160.0, 210.0),
            slot(20, 260.0, 120.0),
            slot(21, 260.0, 180.0),
            slot(22, 300.0, 150.0),
        ],
    ),
    (
        "4-4-2",
        [
            slot(13, 60.0, 120.0),
            slot(14, 60.0, 180.0),
            slot(15, 120.0, 90.0),
            slot(16, 120.0, 210.0),
            slot(17, 200.0, 90.0),
            slot(18, 200.0, 130.0),
            slot(19, 200.0, 170.0),
            slot(20, 200.0, 210.0),
            slot(21, 300.0, 130.0),
            slot(22, 300.0, 170.0),
        ],
    ),
    (
        "4-2-3-1",
        [
            slot(13, 60.0, 120.0),
            slot(14, 60.0, 180.0),
            slot(15, 120.0, 90.0),
            slot(16, 120.0, 210.0),
            slot(17, 200.0, 120.0),
            slot(18, 200.0, 180.0),
            slot(19, 240.0, 100.0),
            slot(20, 240.0, 150.0),
            slot(21, 240.0, 200.0),
            slot(22, 300.0, 150.0),
        ],
    ),
];

impl FormationLibrary {
    /// The library shipped with the board.
    #[must_use]
    pub fn builtin() -> &'static Self {
        static LIBRARY: OnceLock<FormationLibrary> = OnceLock::new();
        LIBRARY.get_or_init(|| Self {
            templates: BUILTIN
                .iter()
                .map(|(name, slots)| FormationTemplate {
                    name: (*name).to_string(),
                    slots: slots.to_vec(),
                })
                .collect(),
        })
    }

    /// Build a library from templates, validating every one.
    pub fn new(templates: Vec<FormationTemplate>) -> Result<Self> {
        let mut seen = HashSet::new();
        for template in &templates {
            if !seen.insert(template.name.as_str()) {
                return Err(TacticsError::DuplicateFormation(template.name.clone()));
            }
            if template.slots.len() != OUTFIELD_SLOTS {
                return Err(TacticsError::SlotCount {
                    formation: template.name.clone(),
                    found: template.slots.len(),
                    expected: OUTFIELD_SLOTS,
                });
            }
            if let Some(bad) = template
                .slots
                .iter()
                .find(|s| !(s.zone.0.is_finite() && s.zone.1.is_finite()))
            {
                return Err(TacticsError::InvalidZone {
                    formation: template.name.clone(),
                    id: bad.id,
                });
            }
        }
        if !seen.contains(DEFAULT_FORMATION) {
            return Err(TacticsError::MissingDefault(DEFAULT_FORMATION.to_string()));
        }
        Ok(Self { templates })
    }

    /// Parse and validate a library from RON text.
    pub fn from_ron_str(source_name: &str, text: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(rename = "FormationLibrary")]
        struct Raw {
            templates: Vec<FormationTemplate>,
        }

        let raw: Raw = ron::from_str(text).map_err(|e| TacticsError::LibraryParse {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;
        Self::new(raw.templates)
    }

    /// Look up a template by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FormationTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Look up a template, falling back to the default formation.
    #[must_use]
    pub fn resolve(&self, name: &str) -> &FormationTemplate {
        self.get(name)
            .or_else(|| self.get(DEFAULT_FORMATION))
            .unwrap_or_else(|| Self::builtin().default_template())
    }

    /// Template names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.name.as_str())
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the library holds no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn default_template(&self) -> &FormationTemplate {
        // BUILTIN always starts with the default formation.
        &self.templates[0]
    }
}
