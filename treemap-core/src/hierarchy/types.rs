use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A node of the input tree.
///
/// Exactly one of `value` / `children` exists per node, which the JSON
/// form enforces on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub enum HierarchyNode {
    Leaf { name: String, value: f64 },
    Internal { name: String, children: Vec<HierarchyNode> },
}

#[derive(Debug, Error)]
pub enum HierarchyError {
    #[error("invalid hierarchy JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("node '{name}' has both a value and children")]
    Ambiguous { name: String },
    #[error("node '{name}' has neither a value nor children")]
    Empty { name: String },
    #[error("leaf '{name}' has invalid weight {value}")]
    InvalidWeight { name: String, value: f64 },
}

/// Wire shape of a node: both payloads optional, validated into [`HierarchyNode`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawNode {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<RawNode>>,
}

impl TryFrom<RawNode> for HierarchyNode {
    type Error = HierarchyError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        match (raw.value, raw.children) {
            (Some(_), Some(_)) => Err(HierarchyError::Ambiguous { name: raw.name }),
            (None, None) => Err(HierarchyError::Empty { name: raw.name }),
            (Some(value), None) => {
                if !value.is_finite() || value < 0.0 {
                    return Err(HierarchyError::InvalidWeight { name: raw.name, value });
                }
                Ok(HierarchyNode::Leaf { name: raw.name, value })
            }
            (None, Some(children)) => {
                let children = children
                    .into_iter()
                    .map(HierarchyNode::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(HierarchyNode::Internal { name: raw.name, children })
            }
        }
    }
}

impl From<HierarchyNode> for RawNode {
    fn from(node: HierarchyNode) -> Self {
        match node {
            HierarchyNode::Leaf { name, value } => RawNode { name, value: Some(value), children: None },
            HierarchyNode::Internal { name, children } => RawNode {
                name,
                value: None,
                children: Some(children.into_iter().map(RawNode::from).collect()),
            },
        }
    }
}

impl HierarchyNode {
    pub fn leaf(name: impl Into<String>, value: f64) -> Self {
        HierarchyNode::Leaf { name: name.into(), value }
    }

    pub fn internal(name: impl Into<String>, children: Vec<HierarchyNode>) -> Self {
        HierarchyNode::Internal { name: name.into(), children }
    }

    /// Parse and validate a tree from its JSON form.
    ///
    /// Goes through the wire struct directly so validation failures keep
    /// their own variants instead of collapsing into a JSON error.
    pub fn from_json(input: &str) -> Result<Self, HierarchyError> {
        let raw: RawNode = serde_json::from_str(input)?;
        HierarchyNode::try_from(raw)
    }

    pub fn name(&self) -> &str {
        match self {
            HierarchyNode::Leaf { name, .. } | HierarchyNode::Internal { name, .. } => name,
        }
    }

    pub fn children(&self) -> &[HierarchyNode] {
        match self {
            HierarchyNode::Leaf { .. } => &[],
            HierarchyNode::Internal { children, .. } => children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HierarchyNode::Leaf { .. })
    }

    /// Sum of all leaf weights below (and including) this node.
    pub fn total_weight(&self) -> f64 {
        match self {
            HierarchyNode::Leaf { value, .. } => *value,
            HierarchyNode::Internal { children, .. } => children.iter().map(HierarchyNode::total_weight).sum(),
        }
    }

    /// Leaves in depth-first order.
    pub fn leaves(&self) -> Vec<&HierarchyNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                HierarchyNode::Leaf { .. } => out.push(node),
                HierarchyNode::Internal { children, .. } => stack.extend(children.iter().rev()),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let json = r#"{"name":"root","children":[{"name":"a","value":3},{"name":"b","children":[{"name":"c","value":4}]}]}"#;
        let root = HierarchyNode::from_json(json).unwrap();
        assert_eq!(root.name(), "root");
        assert_eq!(root.total_weight(), 7.0);
        let names: Vec<_> = root.leaves().iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_reject_both_payloads() {
        let err = HierarchyNode::from_json(r#"{"name":"x","value":1,"children":[]}"#).unwrap_err();
        assert!(matches!(err, HierarchyError::Ambiguous { ref name } if name == "x"), "{err}");
    }

    #[test]
    fn test_reject_missing_payload() {
        let err = HierarchyNode::from_json(r#"{"name":"x"}"#).unwrap_err();
        assert!(matches!(err, HierarchyError::Empty { ref name } if name == "x"), "{err}");
    }

    #[test]
    fn test_reject_negative_weight() {
        let err = HierarchyNode::from_json(r#"{"name":"r","children":[{"name":"x","value":-2}]}"#).unwrap_err();
        assert!(matches!(err, HierarchyError::InvalidWeight { ref name, value } if name == "x" && value == -2.0));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        assert!(matches!(HierarchyNode::from_json("{\"name\":"), Err(HierarchyError::Json(_))));
        assert!(matches!(HierarchyNode::from_json("[1, 2]"), Err(HierarchyError::Json(_))));
    }

    #[test]
    fn test_nested_error_keeps_variant() {
        let json = r#"{"name":"r","children":[{"name":"a","children":[{"name":"deep"}]}]}"#;
        let err = HierarchyNode::from_json(json).unwrap_err();
        assert!(matches!(err, HierarchyError::Empty { ref name } if name == "deep"), "{err}");
    }

    #[test]
    fn test_serialize_uses_wire_shape() {
        let root = HierarchyNode::internal("r", vec![HierarchyNode::leaf("a", 1.0)]);
        let json = serde_json::to_string(&root).unwrap();
        assert_eq!(json, r#"{"name":"r","children":[{"name":"a","value":1.0}]}"#);
        assert_eq!(HierarchyNode::from_json(&json).unwrap(), root);
    }
}
