//! Closed library of enemy layouts stamped at every wave start.

use grid_shooter_core::{Cell, TemplateCells, TemplateId, Tier, WaveTemplate};
use thiserror::Error;

const E: Cell = Cell::Empty;
const A: Cell = Cell::Enemy(Tier::A);
const B: Cell = Cell::Enemy(Tier::B);
const C: Cell = Cell::Enemy(Tier::C);
const D: Cell = Cell::Enemy(Tier::D);

const BUILTIN_TEMPLATES: [TemplateCells; 6] = [
    // Phalanx
    [
        [E, B, B, B, B, B, B, E],
        [E, A, A, A, A, A, A, E],
        [E, E, E, E, E, E, E, E],
    ],
    // Checkerboard
    [
        [C, E, C, E, C, E, C, E],
        [E, B, E, B, E, B, E, B],
        [A, E, A, E, A, E, A, E],
    ],
    // Arrowhead
    [
        [E, E, E, D, D, E, E, E],
        [E, E, C, B, B, C, E, E],
        [E, A, E, E, E, E, A, E],
    ],
    // Twin towers
    [
        [D, C, E, E, E, E, C, D],
        [B, E, E, E, E, E, E, B],
        [E, E, E, A, A, E, E, E],
    ],
    // Curtain
    [
        [B, B, B, B, B, B, B, B],
        [E, E, E, E, E, E, E, E],
        [A, E, A, E, E, A, E, A],
    ],
    // Fortress
    [
        [E, D, E, C, C, E, D, E],
        [E, E, B, E, E, B, E, E],
        [A, E, E, E, E, E, E, A],
    ],
];

/// Reasons a wave catalog may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A catalog needs at least one template to stamp.
    #[error("wave catalog must contain at least one template")]
    Empty,
}

/// Fixed library of wave templates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaveCatalog {
    templates: Vec<WaveTemplate>,
}

impl WaveCatalog {
    /// Creates a catalog from the provided templates.
    pub fn new(templates: Vec<WaveTemplate>) -> Result<Self, CatalogError> {
        if templates.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { templates })
    }

    /// Catalog shipped with the game.
    #[must_use]
    pub fn builtin() -> Self {
        let templates = BUILTIN_TEMPLATES
            .into_iter()
            .filter_map(|cells| {
                let template = WaveTemplate::new(cells);
                debug_assert!(template.is_ok(), "built-in template rejected: {template:?}");
                template.ok()
            })
            .collect();
        Self { templates }
    }

    /// Number of templates available for selection.
    #[must_use]
    pub fn template_count(&self) -> u32 {
        self.templates.len() as u32
    }

    /// Resolves the template for `id`, wrapping identifiers past the end of the catalog.
    #[must_use]
    pub fn template(&self, id: TemplateId) -> &WaveTemplate {
        let index = id.get() as usize % self.templates.len();
        &self.templates[index]
    }

    /// Iterates the templates in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &WaveTemplate> {
        self.templates.iter()
    }
}

impl Default for WaveCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
