//! Color-space math: RGB/HSL/Lab conversions, relative luminance, the
//! CIEDE2000 perceptual distance, and hue bucket classification.
//!
//! CIEDE2000 follows the Sharma / Wu / Dalal implementation notes; the
//! equation numbers in comments refer to that paper. The region merger's
//! thresholds are tuned against this exact formulation, so the structure
//! is kept step for step.

/// 8-bit RGBA pixel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }

    /// Unpack from a little-endian RGBA word (one 32-bit int per pixel)
    pub fn from_packed(px: u32) -> Self {
        let [r, g, b, a] = px.to_le_bytes();
        Rgba { r, g, b, a }
    }

    pub fn packed(self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }
}

/// Hue, saturation, lightness, all in `[0, 1]`; hue is normalized
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Hsl { h, s, l }
    }
}

/// CIE L*a*b*, D65/2 degree observer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

fn linearize(x: u8) -> f64 {
    let x = x as f64 / 255.0;
    if x <= 0.03928 {
        x / 12.92
    } else {
        ((x + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG relative luminance of a pixel in `[0, 1]`
pub fn luminance(c: Rgba) -> f64 {
    0.2126 * linearize(c.r) + 0.7152 * linearize(c.g) + 0.0722 * linearize(c.b)
}

/// Standard RGB to HSL conversion; alpha is ignored
pub fn rgb_to_hsl(c: Rgba) -> Hsl {
    let r = c.r as f64 / 255.0;
    let g = c.g as f64 / 255.0;
    let b = c.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        // achromatic
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let mut h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    h /= 6.0;

    Hsl { h, s, l }
}

/// Standard HSL to RGB conversion; returns an opaque pixel
pub fn hsl_to_rgb(hsl: Hsl) -> Rgba {
    let Hsl { h, s, l } = hsl;

    if s == 0.0 {
        // achromatic
        let v = (l * 255.0).round() as u8;
        return Rgba::opaque(v, v, v);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    Rgba::opaque(
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

/// Linear sRGB -> XYZ -> Lab, D65 white point
pub fn rgb_to_lab(c: Rgba) -> Lab {
    let mut r = c.r as f64 / 255.0;
    let mut g = c.g as f64 / 255.0;
    let mut b = c.b as f64 / 255.0;
    r = if r > 0.04045 { ((r + 0.055) / 1.055).powf(2.4) } else { r / 12.92 };
    g = if g > 0.04045 { ((g + 0.055) / 1.055).powf(2.4) } else { g / 12.92 };
    b = if b > 0.04045 { ((b + 0.055) / 1.055).powf(2.4) } else { b / 12.92 };

    let mut x = (r * 0.4124 + g * 0.3576 + b * 0.1805) / 0.95047;
    let mut y = (r * 0.2126 + g * 0.7152 + b * 0.0722) / 1.0;
    let mut z = (r * 0.0193 + g * 0.1192 + b * 0.9505) / 1.08883;

    x = if x > 0.008856 { x.cbrt() } else { 7.787 * x + 16.0 / 116.0 };
    y = if y > 0.008856 { y.cbrt() } else { 7.787 * y + 16.0 / 116.0 };
    z = if z > 0.008856 { z.cbrt() } else { 7.787 * z + 16.0 / 116.0 };

    Lab {
        l: 116.0 * y - 16.0,
        a: 500.0 * (x - y),
        b: 200.0 * (y - z),
    }
}

pub fn hsl_to_lab(hsl: Hsl) -> Lab {
    rgb_to_lab(hsl_to_rgb(hsl))
}

fn degrees(n: f64) -> f64 {
    n * (180.0 / std::f64::consts::PI)
}

fn radians(n: f64) -> f64 {
    n * (std::f64::consts::PI / 180.0)
}

// (7)
fn hp_f(x: f64, y: f64) -> f64 {
    if x == 0.0 && y == 0.0 {
        0.0
    } else {
        let tmphp = degrees(x.atan2(y));
        if tmphp >= 0.0 { tmphp } else { tmphp + 360.0 }
    }
}

// (10)
fn dhp_f(c1: f64, c2: f64, h1p: f64, h2p: f64) -> f64 {
    if c1 * c2 == 0.0 {
        0.0
    } else if (h2p - h1p).abs() <= 180.0 {
        h2p - h1p
    } else if h2p - h1p > 180.0 {
        h2p - h1p - 360.0
    } else if h2p - h1p < -180.0 {
        h2p - h1p + 360.0
    } else {
        // every real hue difference falls in one of the branches above
        unreachable!("hue difference out of domain: {h1p} vs {h2p}")
    }
}

// (14)
fn a_hp_f(c1: f64, c2: f64, h1p: f64, h2p: f64) -> f64 {
    if c1 * c2 == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if (h1p - h2p).abs() > 180.0 && h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else if (h1p - h2p).abs() > 180.0 && h1p + h2p >= 360.0 {
        (h1p + h2p - 360.0) / 2.0
    } else {
        unreachable!("hue average out of domain: {h1p} vs {h2p}")
    }
}

/// CIEDE2000 color difference between two HSL colors, unit weights.
pub fn ciede2000(c1: Hsl, c2: Hsl) -> f64 {
    let Lab { l: l1, a: a1, b: b1 } = hsl_to_lab(c1);
    let Lab { l: l2, a: a2, b: b2 } = hsl_to_lab(c2);

    // Weight factors
    let kl = 1.0;
    let kc = 1.0;
    let kh = 1.0;

    // Step 1: C1p, C2p, h1p, h2p
    let c_1 = (a1.powi(2) + b1.powi(2)).sqrt(); // (2)
    let c_2 = (a2.powi(2) + b2.powi(2)).sqrt(); // (2)
    let a_c1_c2 = (c_1 + c_2) / 2.0; // (3)
    let g = 0.5 * (1.0 - (a_c1_c2.powi(7) / (a_c1_c2.powi(7) + 25.0_f64.powi(7))).sqrt()); // (4)
    let a1p = (1.0 + g) * a1; // (5)
    let a2p = (1.0 + g) * a2; // (5)
    let c1p = (a1p.powi(2) + b1.powi(2)).sqrt(); // (6)
    let c2p = (a2p.powi(2) + b2.powi(2)).sqrt(); // (6)
    let h1p = hp_f(b1, a1p); // (7)
    let h2p = hp_f(b2, a2p); // (7)

    // Step 2: dLp, dCp, dHp
    let d_lp = l2 - l1; // (8)
    let d_cp = c2p - c1p; // (9)
    let dhp = dhp_f(c_1, c_2, h1p, h2p); // (10)
    let d_hp = 2.0 * (c1p * c2p).sqrt() * (radians(dhp) / 2.0).sin(); // (11)

    // Step 3: CIEDE2000 color difference
    let a_l = (l1 + l2) / 2.0; // (12)
    let a_cp = (c1p + c2p) / 2.0; // (13)
    let a_hp = a_hp_f(c_1, c_2, h1p, h2p); // (14)
    let t = 1.0 - 0.17 * radians(a_hp - 30.0).cos()
        + 0.24 * radians(2.0 * a_hp).cos()
        + 0.32 * radians(3.0 * a_hp + 6.0).cos()
        - 0.20 * radians(4.0 * a_hp - 63.0).cos(); // (15)
    let d_ro = 30.0 * (-((a_hp - 275.0) / 25.0).powi(2)).exp(); // (16)
    let rc = (a_cp.powi(7) / (a_cp.powi(7) + 25.0_f64.powi(7))).sqrt(); // (17)
    let sl = 1.0 + (0.015 * (a_l - 50.0).powi(2)) / (20.0 + (a_l - 50.0).powi(2)).sqrt(); // (18)
    let sc = 1.0 + 0.045 * a_cp; // (19)
    let sh = 1.0 + 0.015 * a_cp * t; // (20)
    let rt = -2.0 * rc * radians(2.0 * d_ro).sin(); // (21)

    ((d_lp / (sl * kl)).powi(2)
        + (d_cp / (sc * kc)).powi(2)
        + (d_hp / (sh * kh)).powi(2)
        + rt * (d_cp / (sc * kc)) * (d_hp / (sh * kh)))
        .sqrt() // (22)
}

/// A named bucket of `[min, max]` normalized hue ranges
#[derive(Clone, Copy, Debug)]
pub struct HueRange<C> {
    pub channel: C,
    pub ranges: &'static [(f64, f64)],
}

/// Primary color channels for pen selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RgbChannel {
    Red,
    Green,
    Blue,
}

/// Stock hue bucketing into red/green/blue drawing pens
pub const HUE_RANGE_RGB: [HueRange<RgbChannel>; 3] = [
    HueRange {
        channel: RgbChannel::Red,
        ranges: &[(0.0 / 360.0, 50.0 / 360.0), (280.0 / 360.0, 360.0 / 360.0)],
    },
    HueRange {
        channel: RgbChannel::Green,
        ranges: &[(50.0 / 360.0, 180.0 / 360.0)],
    },
    HueRange {
        channel: RgbChannel::Blue,
        ranges: &[(180.0 / 360.0, 280.0 / 360.0)],
    },
];

/// Classify a normalized hue into the first matching bucket
pub fn channel_from_hue<C: Copy>(value: f64, table: &[HueRange<C>]) -> Option<C> {
    table
        .iter()
        .find(|r| r.ranges.iter().any(|&(min, max)| value >= min && value <= max))
        .map(|r| r.channel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn luminance_extremes() {
        assert_eq!(luminance(Rgba::opaque(0, 0, 0)), 0.0);
        assert!((luminance(Rgba::opaque(255, 255, 255)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn achromatic_hsl() {
        let hsl = rgb_to_hsl(Rgba::opaque(128, 128, 128));
        assert_eq!(hsl.h, 0.0);
        assert_eq!(hsl.s, 0.0);
        assert!((hsl.l - 128.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn primary_hues() {
        assert!((rgb_to_hsl(Rgba::opaque(255, 0, 0)).h - 0.0).abs() < 1e-12);
        assert!((rgb_to_hsl(Rgba::opaque(0, 255, 0)).h - 1.0 / 3.0).abs() < 1e-12);
        assert!((rgb_to_hsl(Rgba::opaque(0, 0, 255)).h - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn packed_round_trip() {
        let c = Rgba::new(12, 200, 34, 255);
        assert_eq!(Rgba::from_packed(c.packed()), c);
    }

    #[test]
    fn lab_of_white() {
        let lab = rgb_to_lab(Rgba::opaque(255, 255, 255));
        assert!((lab.l - 100.0).abs() < 1e-3);
        assert!(lab.a.abs() < 1e-2);
        assert!(lab.b.abs() < 1e-2);
    }

    #[test]
    fn ciede2000_black_vs_white() {
        let black = rgb_to_hsl(Rgba::opaque(0, 0, 0));
        let white = rgb_to_hsl(Rgba::opaque(255, 255, 255));
        let d = ciede2000(black, white);
        assert!((d - 100.0).abs() < 0.5, "got {d}");
    }

    #[test]
    fn ciede2000_is_symmetric_enough() {
        let a = rgb_to_hsl(Rgba::opaque(200, 30, 40));
        let b = rgb_to_hsl(Rgba::opaque(30, 200, 40));
        assert!((ciede2000(a, b) - ciede2000(b, a)).abs() < 1e-9);
    }

    #[test]
    fn hue_buckets_cover_primaries() {
        assert_eq!(channel_from_hue(0.0, &HUE_RANGE_RGB), Some(RgbChannel::Red));
        assert_eq!(
            channel_from_hue(120.0 / 360.0, &HUE_RANGE_RGB),
            Some(RgbChannel::Green)
        );
        assert_eq!(
            channel_from_hue(240.0 / 360.0, &HUE_RANGE_RGB),
            Some(RgbChannel::Blue)
        );
        assert_eq!(
            channel_from_hue(300.0 / 360.0, &HUE_RANGE_RGB),
            Some(RgbChannel::Red)
        );
    }

    #[test]
    fn hue_out_of_range_is_unclassified() {
        assert_eq!(channel_from_hue(1.5, &HUE_RANGE_RGB), None::<RgbChannel>);
    }

    proptest! {
        #[test]
        fn hsl_round_trip_within_one(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let original = Rgba::opaque(r, g, b);
            let back = hsl_to_rgb(rgb_to_hsl(original));
            prop_assert!((back.r as i16 - r as i16).abs() <= 1);
            prop_assert!((back.g as i16 - g as i16).abs() <= 1);
            prop_assert!((back.b as i16 - b as i16).abs() <= 1);
        }

        #[test]
        fn ciede2000_identity(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let hsl = rgb_to_hsl(Rgba::opaque(r, g, b));
            prop_assert!(ciede2000(hsl, hsl).abs() < 1e-12);
        }
    }
}
