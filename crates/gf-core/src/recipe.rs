//! Tray recipes
//!
//! A recipe captures everything needed to rebuild a tray: the unit set and
//! the tray parameters. Recipes are stored as RON text.

use gf_cad::CadKernel;
use serde::{Deserialize, Serialize};

use crate::error::GeometryResult;
use crate::tray::{BatteryTray, TrayParams, tube_battery_tray};
use crate::units::GridUnits;

/// A named, reproducible tray description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrayRecipe {
    pub name: String,
    pub units: GridUnits,
    pub tray: TrayParams,
}

impl Default for TrayRecipe {
    fn default() -> Self {
        Self::new("Battery Tray", TrayParams::default())
    }
}

impl TrayRecipe {
    /// Create a recipe using the standard grid units
    pub fn new(name: impl Into<String>, tray: TrayParams) -> Self {
        Self {
            name: name.into(),
            units: GridUnits::default(),
            tray,
        }
    }

    /// Serialize the recipe to RON text
    pub fn to_ron(&self) -> Result<String, RecipeError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| RecipeError::Serialize(e.to_string()))
    }

    /// Parse a recipe from RON text; omitted fields take their defaults
    pub fn from_ron(text: &str) -> Result<Self, RecipeError> {
        ron::from_str(text).map_err(|e| RecipeError::Deserialize(e.to_string()))
    }

    /// Parse a recipe from UTF-8 bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, RecipeError> {
        let text = std::str::from_utf8(data).map_err(|e| RecipeError::Deserialize(e.to_string()))?;
        Self::from_ron(text)
    }

    /// Build the tray this recipe describes
    pub fn build(&self, kernel: &dyn CadKernel) -> GeometryResult<BatteryTray> {
        tracing::debug!(name = %self.name, "building recipe");
        tube_battery_tray(kernel, &self.units, &self.tray)
    }
}

/// Recipe-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum RecipeError {
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridFootprint;
    use crate::tray::Battery;
    use gf_cad::CsgKernel;

    #[test]
    fn test_partial_recipe_uses_defaults() {
        let text = r#"(
            name: "AAA drawer",
            tray: (
                battery: AAA,
                footprint: (num_x: 2, num_y: 1),
            ),
        )"#;
        let recipe = TrayRecipe::from_ron(text).unwrap();
        assert_eq!(recipe.name, "AAA drawer");
        assert_eq!(recipe.tray.battery, Battery::AAA);
        assert_eq!(recipe.tray.footprint, GridFootprint::new(2, 1).unwrap());
        assert_eq!(recipe.tray.height_units, 2.0);
        assert_eq!(recipe.units, GridUnits::default());
    }

    #[test]
    fn test_recipe_text_survives_save() {
        let recipe = TrayRecipe::new(
            "Custom cells",
            TrayParams {
                battery: Battery::Custom(18.5),
                with_magnets: true,
                ..TrayParams::default()
            },
        );
        let text = recipe.to_ron().unwrap();
        assert!(text.contains("Custom(18.5)"));
        assert_eq!(TrayRecipe::from_bytes(text.as_bytes()).unwrap(), recipe);
    }

    #[test]
    fn test_malformed_recipe() {
        assert!(matches!(
            TrayRecipe::from_ron("(tray: (battery: Z))"),
            Err(RecipeError::Deserialize(_))
        ));
    }

    #[test]
    fn test_recipe_builds_tray() {
        let kernel = CsgKernel::new();
        let tray = TrayRecipe::default().build(&kernel).unwrap();
        assert_eq!(tray.hole_centers.len(), 4);
    }
}
