//! Marker styles keyed by body category.

use crate::model::category;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Marker size used for bodies without a table entry.
pub const DEFAULT_MARKER_SIZE: u32 = 5;

/// Colors the browser renderer cycles through for uncolored traces.
pub const DEFAULT_COLORWAY: [(u8, u8, u8); 10] = [
    (0x63, 0x6e, 0xfa),
    (0xef, 0x55, 0x3b),
    (0x00, 0xcc, 0x96),
    (0xab, 0x63, 0xfa),
    (0xff, 0xa1, 0x5a),
    (0x19, 0xd3, 0xf3),
    (0xff, 0x66, 0x92),
    (0xb6, 0xe8, 0x80),
    (0xff, 0x97, 0xff),
    (0xfe, 0xcb, 0x52),
];

/// Named marker colors understood by both the browser renderer and the
/// still-image exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerColor {
    Yellow,
    Gray,
    Orange,
    Blue,
    Red,
    Gold,
    Cyan,
}

impl MarkerColor {
    /// CSS color name.
    pub fn css_name(&self) -> &'static str {
        match self {
            MarkerColor::Yellow => "yellow",
            MarkerColor::Gray => "gray",
            MarkerColor::Orange => "orange",
            MarkerColor::Blue => "blue",
            MarkerColor::Red => "red",
            MarkerColor::Gold => "gold",
            MarkerColor::Cyan => "cyan",
        }
    }
    
    /// RGB value of the CSS color.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            MarkerColor::Yellow => (255, 255, 0),
            MarkerColor::Gray => (128, 128, 128),
            MarkerColor::Orange => (255, 165, 0),
            MarkerColor::Blue => (0, 0, 255),
            MarkerColor::Red => (255, 0, 0),
            MarkerColor::Gold => (255, 215, 0),
            MarkerColor::Cyan => (0, 255, 255),
        }
    }
}

impl Serialize for MarkerColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.css_name())
    }
}

/// How a body is drawn.
///
/// Without a color the renderer picks one from its default palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<MarkerColor>,
    pub size: u32,
}

impl MarkerStyle {
    pub const fn new(color: MarkerColor, size: u32) -> Self {
        Self {
            color: Some(color),
            size,
        }
    }
}

impl MarkerStyle {
    /// RGB used when drawing this style as the `trace_index`-th trace.
    ///
    /// Uncolored styles take the same colorway slot the browser would give them.
    pub fn rgb_for_trace(&self, trace_index: usize) -> (u8, u8, u8) {
        match self.color {
            Some(color) => color.rgb(),
            None => DEFAULT_COLORWAY[trace_index % DEFAULT_COLORWAY.len()],
        }
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: None,
            size: DEFAULT_MARKER_SIZE,
        }
    }
}

/// Immutable category -> style mapping.
#[derive(Debug, Clone)]
pub struct StyleTable {
    styles: HashMap<String, MarkerStyle>,
    fallback: MarkerStyle,
}

impl StyleTable {
    /// The Sun, the eight planets and the Moon.
    pub fn solar_system() -> Self {
        use MarkerColor::*;
        
        let entries = [
            ("SUN", MarkerStyle::new(Yellow, 12)),
            ("MERCURY", MarkerStyle::new(Gray, 4)),
            ("VENUS", MarkerStyle::new(Orange, 6)),
            ("EARTH", MarkerStyle::new(Blue, 6)),
            ("MOON", MarkerStyle::new(Blue, 2)),
            ("MARS", MarkerStyle::new(Red, 5)),
            ("JUPITER", MarkerStyle::new(Orange, 10)),
            ("SATURN", MarkerStyle::new(Gold, 9)),
            ("URANUS", MarkerStyle::new(Cyan, 8)),
            ("NEPTUNE", MarkerStyle::new(Blue, 8)),
        ];
        
        Self {
            styles: entries
                .into_iter()
                .map(|(name, style)| (name.to_string(), style))
                .collect(),
            fallback: MarkerStyle::default(),
        }
    }
    
    /// Looks up a category, falling back to the default style.
    pub fn for_category(&self, category: &str) -> MarkerStyle {
        self.styles.get(category).copied().unwrap_or(self.fallback)
    }
    
    /// Resolves the style of a raw body name.
    pub fn resolve(&self, body: &str) -> MarkerStyle {
        self.for_category(&category(body))
    }
    
    /// Returns true if the category has its own entry.
    pub fn contains(&self, category: &str) -> bool {
        self.styles.contains_key(category)
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::solar_system()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_known_categories() {
        let table = StyleTable::solar_system();
        
        assert_eq!(table.resolve("SUN"), MarkerStyle::new(MarkerColor::Yellow, 12));
        assert_eq!(table.resolve("1 EARTH"), MarkerStyle::new(MarkerColor::Blue, 6));
        assert_eq!(table.resolve("301 MOON"), MarkerStyle::new(MarkerColor::Blue, 2));
        assert_eq!(
            table.resolve("5 JUPITER BARYCENTER"),
            MarkerStyle::new(MarkerColor::Orange, 10)
        );
    }
    
    #[test]
    fn test_unknown_category_uses_default() {
        let table = StyleTable::solar_system();
        
        for name in ["134340 PLUTO", "CERES", "", "9 "] {
            let style = table.resolve(name);
            assert_eq!(style.color, None);
            assert_eq!(style.size, DEFAULT_MARKER_SIZE);
        }
        assert!(!table.contains("PLUTO"));
    }
    
    #[test]
    fn test_trace_colors() {
        let sun = MarkerStyle::new(MarkerColor::Yellow, 12);
        assert_eq!(sun.rgb_for_trace(3), (255, 255, 0));
        
        let plain = MarkerStyle::default();
        assert_eq!(plain.rgb_for_trace(0), DEFAULT_COLORWAY[0]);
        assert_eq!(plain.rgb_for_trace(11), DEFAULT_COLORWAY[1]);
    }
    
    #[test]
    fn test_style_serialization() {
        let styled = serde_json::to_value(MarkerStyle::new(MarkerColor::Gold, 9)).unwrap();
        assert_eq!(styled, serde_json::json!({"color": "gold", "size": 9}));
        
        let plain = serde_json::to_value(MarkerStyle::default()).unwrap();
        assert_eq!(plain, serde_json::json!({"size": 5}));
    }
}
