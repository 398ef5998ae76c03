// Slice-and-dice tiling.
//
// dice: children side by side left to right, full height.
// slice: children stacked top to bottom, full width.
// SliceDice picks dice on even parent depths and slice on odd ones.

use super::TileStrategy;
use crate::layout::LayoutRect;

#[derive(Debug, Clone, Copy, Default)]
pub struct SliceDice;

impl TileStrategy for SliceDice {
    fn tile(&self, weights: &[f64], depth: usize, bounds: LayoutRect) -> Vec<LayoutRect> {
        let mut out = vec![LayoutRect::default(); weights.len()];
        if depth % 2 == 1 {
            slice(weights, bounds, &mut out);
        } else {
            dice(weights, bounds, &mut out);
        }
        out
    }
}

/// Split `bounds` along x proportionally to `weights`, writing into `out`.
pub(crate) fn dice(weights: &[f64], bounds: LayoutRect, out: &mut [LayoutRect]) {
    let total: f64 = weights.iter().sum();
    let k = if total > 0.0 { bounds.width() / total } else { 0.0 };
    let mut x = bounds.x0;
    for (w, rect) in weights.iter().zip(out.iter_mut()) {
        let x1 = x + w * k;
        *rect = LayoutRect::new(x, bounds.y0, x1, bounds.y1);
        x = x1;
    }
}

/// Split `bounds` along y proportionally to `weights`, writing into `out`.
pub(crate) fn slice(weights: &[f64], bounds: LayoutRect, out: &mut [LayoutRect]) {
    let total: f64 = weights.iter().sum();
    let k = if total > 0.0 { bounds.height() / total } else { 0.0 };
    let mut y = bounds.y0;
    for (w, rect) in weights.iter().zip(out.iter_mut()) {
        let y1 = y + w * k;
        *rect = LayoutRect::new(bounds.x0, y, bounds.x1, y1);
        y = y1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dice_splits_width() {
        let rects = SliceDice.tile(&[1.0, 3.0], 0, LayoutRect::new(0.0, 0.0, 100.0, 10.0));
        assert_eq!(rects[0], LayoutRect::new(0.0, 0.0, 25.0, 10.0));
        assert_eq!(rects[1], LayoutRect::new(25.0, 0.0, 100.0, 10.0));
    }

    #[test]
    fn test_slice_on_odd_depth() {
        let rects = SliceDice.tile(&[1.0, 1.0], 1, LayoutRect::new(0.0, 0.0, 10.0, 50.0));
        assert_eq!(rects[0], LayoutRect::new(0.0, 0.0, 10.0, 25.0));
        assert_eq!(rects[1], LayoutRect::new(0.0, 25.0, 10.0, 50.0));
    }

    #[test]
    fn test_zero_total_gives_slivers() {
        let rects = SliceDice.tile(&[0.0, 0.0], 0, LayoutRect::new(5.0, 5.0, 50.0, 50.0));
        for r in rects {
            assert_eq!(r.width(), 0.0);
            assert_eq!(r.x0, 5.0);
        }
    }
}
