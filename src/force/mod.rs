//! Forces: deployed unit groups that occupy hexes and project vision

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{Faction, ForceId, HexId};

/// Identifier of a unit type in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitTypeId(String);

impl UnitTypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Static unit type definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitType {
    pub id: UnitTypeId,
    pub name: String,
    /// Vision range in grid steps contributed by this unit type.
    pub visibility_radius: f64,
}

/// Catalog of known unit types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitCatalog {
    units: AHashMap<UnitTypeId, UnitType>,
}

impl UnitCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit: UnitType) {
        self.units.insert(unit.id.clone(), unit);
    }

    pub fn get(&self, id: &UnitTypeId) -> Option<&UnitType> {
        self.units.get(id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// One line of a force's composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitEntry {
    pub unit_id: UnitTypeId,
    pub count: u32,
}

/// A deployed force. Occupies exactly one hex at a time; its position is
/// authoritative in the hex/force index, `hex_id` mirrors it for reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Force {
    pub id: ForceId,
    pub name: String,
    pub faction: Faction,
    pub hex_id: HexId,
    /// Vision range in grid steps. Derived from composition when built
    /// through the catalog, otherwise supplied directly.
    pub visibility_radius: u32,
    pub composition: Vec<UnitEntry>,
    pub troop_strength: f64,
}

impl Force {
    pub fn new(
        id: ForceId,
        name: impl Into<String>,
        faction: Faction,
        hex_id: HexId,
        visibility_radius: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            faction,
            hex_id,
            visibility_radius,
            composition: Vec::new(),
            troop_strength: 0.0,
        }
    }

    /// Derive the vision radius from composition: the best unit's radius,
    /// rounded up to whole grid steps. Unknown unit types contribute nothing.
    /// A force with no usable composition still sees its own hex.
    pub fn derive_visibility_radius(&mut self, catalog: &UnitCatalog) -> u32 {
        let best = self
            .composition
            .iter()
            .filter_map(|entry| catalog.get(&entry.unit_id))
            .map(|unit| unit.visibility_radius)
            .fold(0.0_f64, f64::max);
        self.visibility_radius = best.ceil() as u32;
        self.visibility_radius
    }

    pub fn total_units(&self) -> u32 {
        self.composition.iter().map(|e| e.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> UnitCatalog {
        let mut catalog = UnitCatalog::new();
        catalog.insert(UnitType {
            id: UnitTypeId::new("infantry"),
            name: "Infantry".into(),
            visibility_radius: 2.0,
        });
        catalog.insert(UnitType {
            id: UnitTypeId::new("recon"),
            name: "Recon".into(),
            visibility_radius: 4.5,
        });
        catalog
    }

    fn force() -> Force {
        Force::new(
            ForceId::new("F1"),
            "1st Battalion",
            Faction::Blue,
            HexId::new("H_0_0"),
            0,
        )
    }

    #[test]
    fn test_radius_from_best_unit_rounded_up() {
        let mut f = force();
        f.composition = vec![
            UnitEntry {
                unit_id: UnitTypeId::new("infantry"),
                count: 100,
            },
            UnitEntry {
                unit_id: UnitTypeId::new("recon"),
                count: 5,
            },
        ];
        assert_eq!(f.derive_visibility_radius(&catalog()), 5);
        assert_eq!(f.total_units(), 105);
    }

    #[test]
    fn test_unknown_units_ignored() {
        let mut f = force();
        f.composition = vec![UnitEntry {
            unit_id: UnitTypeId::new("dragon"),
            count: 1,
        }];
        assert_eq!(f.derive_visibility_radius(&catalog()), 0);
    }

    #[test]
    fn test_empty_composition_sees_own_hex_only() {
        let mut f = force();
        assert_eq!(f.derive_visibility_radius(&catalog()), 0);
    }
}
