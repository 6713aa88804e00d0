use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Discrete palette: Set2 followed by Pastel
// ---------------------------------------------------------------------------

const DISCRETE: [(u8, u8, u8); 19] = [
    // Set2
    (102, 194, 165),
    (252, 141, 98),
    (141, 160, 203),
    (231, 138, 195),
    (166, 216, 84),
    (255, 217, 47),
    (229, 196, 148),
    (179, 179, 179),
    // Pastel
    (102, 197, 204),
    (246, 207, 113),
    (248, 156, 116),
    (220, 176, 242),
    (135, 197, 95),
    (158, 185, 243),
    (254, 136, 177),
    (201, 219, 116),
    (139, 224, 164),
    (180, 151, 231),
    (179, 179, 179),
];

/// The `i`-th colour of the discrete sequence, cycling when exhausted.
pub fn discrete_color(i: usize) -> Color32 {
    let (r, g, b) = DISCRETE[i % DISCRETE.len()];
    Color32::from_rgb(r, g, b)
}

// ---------------------------------------------------------------------------
// Continuous scale: viridis
// ---------------------------------------------------------------------------

const VIRIDIS_STOPS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

fn linear(c: (u8, u8, u8)) -> LinSrgb {
    Srgb::new(c.0, c.1, c.2).into_format::<f32>().into_linear()
}

/// Sample the viridis scale at `t ∈ [0, 1]`, interpolating in linear RGB.
pub fn viridis(t: f32) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let segments = (VIRIDIS_STOPS.len() - 1) as f32;
    let pos = t * segments;
    let i = (pos.floor() as usize).min(VIRIDIS_STOPS.len() - 2);
    let local = pos - i as f32;

    let mixed = linear(VIRIDIS_STOPS[i]).mix(linear(VIRIDIS_STOPS[i + 1]), local);
    let rgb: Srgb<u8> = Srgb::<f32>::from_linear(mixed).into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the labels of a categorical domain to distinct colours.
///
/// The domain order fixes the colours, so the same industry keeps its
/// colour across every chart and filter change.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    domain: Vec<String>,
}

impl ColorMap {
    /// Build a colour map from an ordered domain.
    pub fn new(domain: &[String]) -> Self {
        ColorMap {
            domain: domain.to_vec(),
        }
    }

    /// Look up the colour for a label; unknown labels fall back to grey.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.domain
            .iter()
            .position(|d| d == label)
            .map(discrete_color)
            .unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discrete_sequence_cycles() {
        assert_eq!(discrete_color(0), Color32::from_rgb(102, 194, 165));
        assert_eq!(discrete_color(8), Color32::from_rgb(102, 197, 204));
        assert_eq!(discrete_color(19), discrete_color(0));
    }

    #[test]
    fn viridis_endpoints() {
        assert_eq!(viridis(0.0), Color32::from_rgb(68, 1, 84));
        assert_eq!(viridis(1.0), Color32::from_rgb(253, 231, 37));
        assert_eq!(viridis(2.0), viridis(1.0));
        assert_eq!(viridis(f32::NAN), viridis(0.0));
    }

    #[test]
    fn color_map_is_stable_by_domain_position() {
        let cm = ColorMap::new(&["Bollywood".to_string(), "Hollywood".to_string()]);
        assert_eq!(cm.color_for("Hollywood"), discrete_color(1));
        assert_eq!(cm.color_for("Tollywood"), Color32::GRAY);
    }
}
