//! Visual-style presets for hex cells
//!
//! A style is a rendering hint tagged with a layer and a priority. The cell
//! style stack keeps at most one entry per `(layer, priority)` pair; the
//! renderer picks the highest-priority entry per layer.

use serde::{Deserialize, Serialize};

use crate::core::types::Faction;

/// Rendering layer a style belongs to. Ordered back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleLayer {
    /// Terrain look.
    Base,
    /// Faction markers and fog of war.
    Mark,
    /// Selection and command feedback.
    Interaction,
}

/// What a style entry represents. Removal targets entries by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleKind {
    Default,
    Plain,
    Hill,
    Mountain,
    Water,
    FactionBlue,
    FactionRed,
    Invisible,
    Selected,
    Invalid,
}

/// RGBA color, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLUE: Rgba = Rgba::new(0.0, 0.0, 1.0, 1.0);
    pub const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Rgba = Rgba::new(0.0, 1.0, 0.0, 1.0);
    pub const YELLOW: Rgba = Rgba::new(1.0, 1.0, 0.0, 1.0);
    pub const CYAN: Rgba = Rgba::new(0.0, 1.0, 1.0, 1.0);
    pub const TAN: Rgba = Rgba::new(0.87, 0.72, 0.53, 1.0);
}

/// A single entry of a cell's visual-style stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualStyle {
    pub layer: StyleLayer,
    pub kind: StyleKind,
    pub priority: i32,
    pub fill: Rgba,
    pub border: Option<Rgba>,
    pub show_fill: bool,
    pub show_border: bool,
}

impl VisualStyle {
    fn base(kind: StyleKind, fill: Rgba, border: Rgba) -> Self {
        Self {
            layer: StyleLayer::Base,
            kind,
            priority: 1,
            fill,
            border: Some(border),
            show_fill: true,
            show_border: true,
        }
    }

    pub fn default_terrain() -> Self {
        Self::base(
            StyleKind::Default,
            Rgba::BLACK.with_alpha(0.1),
            Rgba::BLACK.with_alpha(0.2),
        )
    }

    pub fn plain() -> Self {
        Self::base(
            StyleKind::Plain,
            Rgba::WHITE.with_alpha(0.1),
            Rgba::WHITE.with_alpha(0.2),
        )
    }

    pub fn hill() -> Self {
        Self::base(
            StyleKind::Hill,
            Rgba::GREEN.with_alpha(0.1),
            Rgba::WHITE.with_alpha(0.2),
        )
    }

    pub fn mountain() -> Self {
        Self::base(
            StyleKind::Mountain,
            Rgba::TAN.with_alpha(0.1),
            Rgba::WHITE.with_alpha(0.2),
        )
    }

    pub fn water() -> Self {
        Self::base(
            StyleKind::Water,
            Rgba::CYAN.with_alpha(0.1),
            Rgba::BLUE.with_alpha(0.2),
        )
    }

    /// Control marker on the mark layer. Lower priority than fog so an unseen
    /// hex renders as fog, not as its owner's color.
    pub fn faction_marker(faction: Faction) -> Self {
        let (kind, fill) = match faction {
            Faction::Blue => (StyleKind::FactionBlue, Rgba::BLUE.with_alpha(0.1)),
            Faction::Red => (StyleKind::FactionRed, Rgba::RED.with_alpha(0.1)),
        };
        Self {
            layer: StyleLayer::Mark,
            kind,
            priority: 0,
            fill,
            border: Some(Rgba::WHITE.with_alpha(0.2)),
            show_fill: true,
            show_border: true,
        }
    }

    /// Fog-of-war shroud for cells invisible to the active faction.
    pub fn invisible() -> Self {
        Self {
            layer: StyleLayer::Mark,
            kind: StyleKind::Invisible,
            priority: 1,
            fill: Rgba::BLACK.with_alpha(0.7),
            border: Some(Rgba::BLACK.with_alpha(0.7)),
            show_fill: true,
            show_border: false,
        }
    }

    pub fn selected() -> Self {
        Self {
            layer: StyleLayer::Interaction,
            kind: StyleKind::Selected,
            priority: 2,
            fill: Rgba::YELLOW.with_alpha(0.3),
            border: Some(Rgba::WHITE.with_alpha(0.2)),
            show_fill: true,
            show_border: true,
        }
    }

    pub fn invalid() -> Self {
        Self {
            layer: StyleLayer::Interaction,
            kind: StyleKind::Invalid,
            priority: 3,
            fill: Rgba::RED.with_alpha(0.6),
            border: Some(Rgba::WHITE.with_alpha(0.2)),
            show_fill: true,
            show_border: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fog_outranks_faction_marker() {
        let fog = VisualStyle::invisible();
        let marker = VisualStyle::faction_marker(Faction::Blue);
        assert_eq!(fog.layer, marker.layer);
        assert!(fog.priority > marker.priority);
    }

    #[test]
    fn test_terrain_presets_share_base_layer() {
        for style in [
            VisualStyle::plain(),
            VisualStyle::hill(),
            VisualStyle::mountain(),
            VisualStyle::water(),
        ] {
            assert_eq!(style.layer, StyleLayer::Base);
            assert_eq!(style.priority, 1);
        }
    }
}
