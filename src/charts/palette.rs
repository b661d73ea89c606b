//! Sequential/diverging color palettes for the box fills.

use plotters::style::RGBColor;

// Evenly spaced anchors of the matplotlib colormaps
const COOLWARM: [(u8, u8, u8); 5] = [
    (59, 76, 192),
    (141, 176, 254),
    (221, 221, 221),
    (244, 154, 123),
    (180, 4, 38),
];

const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    CoolWarm,
    Viridis,
}

impl Palette {
    fn anchors(self) -> &'static [(u8, u8, u8)] {
        match self {
            Palette::CoolWarm => &COOLWARM,
            Palette::Viridis => &VIRIDIS,
        }
    }

    /// Color at position `t` in [0, 1], linearly interpolated between anchors.
    pub fn sample(self, t: f64) -> RGBColor {
        let anchors = self.anchors();
        let scaled = t.clamp(0.0, 1.0) * (anchors.len() - 1) as f64;
        let lower = scaled.floor() as usize;
        let upper = (lower + 1).min(anchors.len() - 1);
        let frac = scaled - lower as f64;

        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
        let (r0, g0, b0) = anchors[lower];
        let (r1, g1, b1) = anchors[upper];
        RGBColor(mix(r0, r1), mix(g0, g1), mix(b0, b1))
    }

    /// Color of box `index` out of `count`, skipping the colormap extremes.
    pub fn color_at(self, index: usize, count: usize) -> RGBColor {
        let t = (index + 1) as f64 / (count + 1) as f64;
        self.sample(t)
    }
}
