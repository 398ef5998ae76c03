//! Tiling algorithms for treemap layout.
//!
//! A tiling splits one parent box among its children by weight:
//! - `squarify`: default, rows chosen to keep cells close to the golden ratio
//! - `slice_dice`: alternates horizontal and vertical strips by depth

use serde::{Deserialize, Serialize};

use crate::layout::LayoutRect;

mod slice_dice;
mod squarify;

pub use slice_dice::SliceDice;
pub use squarify::Squarify;

pub(crate) use slice_dice::{dice, slice};

/// Splits a box among weighted children.
pub trait TileStrategy {
    /// Returns one rectangle per weight, in input order. `depth` is the
    /// parent's depth in the tree.
    fn tile(&self, weights: &[f64], depth: usize, bounds: LayoutRect) -> Vec<LayoutRect>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TileMethod {
    #[default]
    Squarify,
    SliceDice,
}

impl TileMethod {
    pub fn strategy(&self) -> Box<dyn TileStrategy> {
        match self {
            TileMethod::Squarify => Box::new(Squarify::default()),
            TileMethod::SliceDice => Box::new(SliceDice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names() {
        let m: TileMethod = serde_json::from_str("\"slice-dice\"").unwrap();
        assert_eq!(m, TileMethod::SliceDice);
        assert_eq!(serde_json::to_string(&TileMethod::Squarify).unwrap(), "\"squarify\"");
        assert!(serde_json::from_str::<TileMethod>("\"binary\"").is_err());
    }
}
