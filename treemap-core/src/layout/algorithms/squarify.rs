// Squarified tiling (Bruls, Huizing, van Wijk).
//
// Children are consumed in order and packed into rows. A row keeps growing
// while its worst aspect ratio does not get worse; it is then laid along the
// shorter side of the remaining box, which shrinks by the row's share.
// Zero-weight children are swallowed by the row that follows them.

use super::{TileStrategy, dice, slice};
use crate::layout::LayoutRect;

/// Golden ratio, the default target aspect ratio.
pub const PHI: f64 = 1.618_033_988_749_895;

#[derive(Debug, Clone, Copy)]
pub struct Squarify {
    pub ratio: f64,
}

impl Default for Squarify {
    fn default() -> Self {
        Self { ratio: PHI }
    }
}

impl Squarify {
    pub fn with_ratio(ratio: f64) -> Self {
        Self { ratio: if ratio > 1.0 { ratio } else { 1.0 } }
    }
}

impl TileStrategy for Squarify {
    fn tile(&self, weights: &[f64], _depth: usize, bounds: LayoutRect) -> Vec<LayoutRect> {
        let n = weights.len();
        let mut out = vec![LayoutRect::new(bounds.x0, bounds.y0, bounds.x0, bounds.y0); n];
        let mut value: f64 = weights.iter().sum();
        let LayoutRect { mut x0, mut y0, mut x1, mut y1 } = bounds;

        let mut i0 = 0;
        while i0 < n {
            if value <= 0.0 {
                // Only empty children remain: one degenerate row.
                dice(&weights[i0..], LayoutRect::new(x0, y0, x1, y1), &mut out[i0..]);
                break;
            }

            let dx = x1 - x0;
            let dy = y1 - y0;

            // Next non-empty child opens the row.
            let mut i1 = i0;
            let mut sum_value;
            loop {
                sum_value = weights[i1];
                i1 += 1;
                if sum_value != 0.0 || i1 >= n {
                    break;
                }
            }

            let mut min_value = sum_value;
            let mut max_value = sum_value;
            let alpha = (dy / dx).max(dx / dy) / (value * self.ratio);
            let mut beta = sum_value * sum_value * alpha;
            let mut min_ratio = (max_value / beta).max(beta / min_value);

            while i1 < n {
                let node_value = weights[i1];
                let grown = sum_value + node_value;
                let lo = min_value.min(node_value);
                let hi = max_value.max(node_value);
                beta = grown * grown * alpha;
                let new_ratio = (hi / beta).max(beta / lo);
                if new_ratio > min_ratio {
                    break;
                }
                sum_value = grown;
                min_value = lo;
                max_value = hi;
                min_ratio = new_ratio;
                i1 += 1;
            }

            let row = &weights[i0..i1];
            if dx < dy {
                let ry1 = y0 + dy * sum_value / value;
                dice(row, LayoutRect::new(x0, y0, x1, ry1), &mut out[i0..i1]);
                y0 = ry1;
            } else {
                let rx1 = x0 + dx * sum_value / value;
                slice(row, LayoutRect::new(x0, y0, rx1, y1), &mut out[i0..i1]);
                x0 = rx1;
            }
            value -= sum_value;
            i0 = i1;
        }

        // Float drift can push the last row a hair past the box.
        out.into_iter().map(|r| r.clamped_to(&bounds)).collect()
    }
}
