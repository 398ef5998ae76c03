//! Per-depth color palettes.
//!
//! Every nesting level owns a gradient running from its base color
//! brightened to the same base darkened. Brightness steps happen in CIE-Lab
//! (D50 white, 18 lightness units per step); the gradient itself is a plain
//! linear blend of the two sRGB endpoints.

use serde::Serialize;
use thiserror::Error;

/// Lightness units per brighten/darken step.
const LAB_K: f64 = 18.0;

const XN: f64 = 0.96422;
const YN: f64 = 1.0;
const ZN: f64 = 0.82521;
const T0: f64 = 4.0 / 29.0;
const T1: f64 = 6.0 / 29.0;
const T2: f64 = 3.0 * T1 * T1;
const T3: f64 = T1 * T1 * T1;

/// Steps applied on either side of the base color.
pub const GRADIENT_SPREAD: f64 = 1.2;

/// tomato, steel blue, medium sea green
pub const DEFAULT_BASES: [&str; 3] = ["#ff6347", "#4682b4", "#3cb371"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid hex color '{0}', expected #rrggbb or #rgb")]
    InvalidHex(String),
    #[error("palette needs at least one base color")]
    EmptyPalette,
}

/// sRGB color with unclamped 0..255 channels; clamping happens on output.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(input: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidHex(input.to_string());
        let digits = input.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map(f64::from).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Rgb::new(channel(&digits[0..2])?, channel(&digits[2..4])?, channel(&digits[4..6])?)),
            3 => {
                let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17.0);
                Ok(Rgb::new(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }

    pub fn lerp(&self, other: &Rgb, t: f64) -> Rgb {
        Rgb::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Channels rounded and clamped to 0..=255.
    pub fn channels(&self) -> [u8; 3] {
        let c = |v: f64| (v.round().clamp(0.0, 255.0)) as u8;
        [c(self.r), c(self.g), c(self.b)]
    }

    /// CSS form, e.g. `rgb(255, 99, 71)`.
    pub fn to_css(&self) -> String {
        let [r, g, b] = self.channels();
        format!("rgb({r}, {g}, {b})")
    }
}

/// CIE-Lab color (D50).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    pub fn brighter(&self, k: f64) -> Lab {
        Lab { l: self.l + LAB_K * k, ..*self }
    }

    pub fn darker(&self, k: f64) -> Lab {
        Lab { l: self.l - LAB_K * k, ..*self }
    }

    pub fn to_rgb(&self) -> Rgb {
        let y = (self.l + 16.0) / 116.0;
        let x = y + self.a / 500.0;
        let z = y - self.b / 200.0;
        let x = XN * lab2xyz(x);
        let y = YN * lab2xyz(y);
        let z = ZN * lab2xyz(z);
        Rgb::new(
            lrgb2rgb(3.1338561 * x - 1.6168667 * y - 0.4906146 * z),
            lrgb2rgb(-0.9787684 * x + 1.9161415 * y + 0.0334540 * z),
            lrgb2rgb(0.0719453 * x - 0.2289914 * y + 1.4052427 * z),
        )
    }
}

impl From<Rgb> for Lab {
    fn from(c: Rgb) -> Lab {
        let r = rgb2lrgb(c.r);
        let g = rgb2lrgb(c.g);
        let b = rgb2lrgb(c.b);
        let y = xyz2lab((0.2225045 * r + 0.7168786 * g + 0.0606169 * b) / YN);
        let (x, z) = if r == g && g == b {
            (y, y)
        } else {
            (
                xyz2lab((0.4360747 * r + 0.3850649 * g + 0.1430804 * b) / XN),
                xyz2lab((0.0139322 * r + 0.0971045 * g + 0.7141733 * b) / ZN),
            )
        };
        Lab { l: 116.0 * y - 16.0, a: 500.0 * (x - y), b: 200.0 * (y - z) }
    }
}

fn xyz2lab(t: f64) -> f64 {
    if t > T3 { t.cbrt() } else { t / T2 + T0 }
}

fn lab2xyz(t: f64) -> f64 {
    if t > T1 { t * t * t } else { T2 * (t - T0) }
}

fn rgb2lrgb(v: f64) -> f64 {
    let v = v / 255.0;
    if v <= 0.04045 { v / 12.92 } else { ((v + 0.055) / 1.055).powf(2.4) }
}

fn lrgb2rgb(v: f64) -> f64 {
    255.0 * if v <= 0.0031308 { 12.92 * v } else { 1.055 * v.powf(1.0 / 2.4) - 0.055 }
}

/// A continuous color range sampled with t in [0, 1).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Gradient {
    pub start: Rgb,
    pub end: Rgb,
}

impl Gradient {
    /// Brightened base to darkened base.
    pub fn around(base: Rgb, spread: f64) -> Self {
        let lab = Lab::from(base);
        Gradient { start: lab.brighter(spread).to_rgb(), end: lab.darker(spread).to_rgb() }
    }

    pub fn sample(&self, t: f64) -> Rgb {
        self.start.lerp(&self.end, t)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    gradients: Vec<Gradient>,
}

impl Palette {
    pub fn from_hex<S: AsRef<str>>(bases: &[S]) -> Result<Self, ColorError> {
        if bases.is_empty() {
            return Err(ColorError::EmptyPalette);
        }
        let gradients = bases
            .iter()
            .map(|hex| Rgb::from_hex(hex.as_ref()).map(|c| Gradient::around(c, GRADIENT_SPREAD)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Palette { gradients })
    }

    pub fn len(&self) -> usize {
        self.gradients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gradients.is_empty()
    }

    pub fn gradient(&self, depth: usize) -> &Gradient {
        &self.gradients[depth.min(self.gradients.len() - 1)]
    }

    /// Color for a node at `depth`, clamped to the deepest gradient.
    pub fn color_for(&self, depth: usize, sample: f64) -> Rgb {
        self.gradient(depth).sample(sample)
    }
}

impl Default for Palette {
    fn default() -> Self {
        let gradients = DEFAULT_BASES
            .iter()
            .filter_map(|hex| Rgb::from_hex(hex).ok())
            .map(|c| Gradient::around(c, GRADIENT_SPREAD))
            .collect();
        Palette { gradients }
    }
}
