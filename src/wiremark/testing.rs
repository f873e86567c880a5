//! Testing utilities for AST assertions
//!
//! Checking a compiled tree by hand means indexing into `children`, matching on
//! `node_type` and digging JSON values out of `props` for every node. The fluent
//! [assert_ast] API states the expected shape directly:
//!
//! ```rust-example
//! use wiremark::wiremark::testing::assert_ast;
//!
//! let result = wiremark::compile("screen Home:\n  <primary: Save>\n", None);
//! assert_ast(&result.ast)
//!     .node_count(1)
//!     .node(0, |screen| {
//!         screen
//!             .is(NodeType::Screen)
//!             .prop_str("name", "Home")
//!             .child(0, |button| {
//!                 button.is(NodeType::Button).prop_str("variant", "primary");
//!             });
//!     });
//! ```
//!
//! Failure messages carry the path to the node (`nodes[0].children[0]`) and a summary
//! of its siblings.

use serde_json::Value;

use crate::wiremark::ast::{AstForest, AstNode, NodeType};

// ============================================================================
// Entry Point
// ============================================================================

/// Create an assertion builder for a compiled forest.
pub fn assert_ast(forest: &AstForest) -> ForestAssertion<'_> {
    ForestAssertion { forest }
}

fn summarize(nodes: &[AstNode]) -> String {
    nodes
        .iter()
        .map(|n| n.node_type.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Forest Assertions
// ============================================================================

pub struct ForestAssertion<'a> {
    forest: &'a AstForest,
}

impl<'a> ForestAssertion<'a> {
    /// Assert the number of top-level nodes.
    pub fn node_count(self, expected: usize) -> Self {
        let actual = self.forest.nodes.len();
        assert_eq!(
            actual,
            expected,
            "Expected {} top-level nodes, found {}: [{}]",
            expected,
            actual,
            summarize(&self.forest.nodes)
        );
        self
    }

    /// Assert on one top-level node.
    pub fn node<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        assert!(
            index < self.forest.nodes.len(),
            "Node index {} out of bounds (forest has {} nodes: [{}])",
            index,
            self.forest.nodes.len(),
            summarize(&self.forest.nodes)
        );
        assertion(NodeAssertion {
            node: &self.forest.nodes[index],
            context: format!("nodes[{}]", index),
        });
        self
    }

    /// Assert that every node in the forest has a non-empty id.
    pub fn all_ids_assigned(self) -> Self {
        if let Some(node) = self.forest.walk().find(|n| n.id.is_empty()) {
            panic!("{} node has no id", node.node_type);
        }
        self
    }
}

// ============================================================================
// Node Assertions
// ============================================================================

pub struct NodeAssertion<'a> {
    node: &'a AstNode,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn is(self, expected: NodeType) -> Self {
        assert_eq!(
            self.node.node_type, expected,
            "{}: expected a {} node, found {}",
            self.context, expected, self.node.node_type
        );
        self
    }

    pub fn id(self, expected: &str) -> Self {
        assert_eq!(
            self.node.id, expected,
            "{}: expected id {:?}, found {:?}",
            self.context, expected, self.node.id
        );
        self
    }

    pub fn prop(self, key: &str, expected: impl Into<Value>) -> Self {
        let expected = expected.into();
        assert_eq!(
            self.node.prop(key),
            Some(&expected),
            "{}: expected {} = {}, props are {:?}",
            self.context,
            key,
            expected,
            self.node.props
        );
        self
    }

    pub fn prop_str(self, key: &str, expected: &str) -> Self {
        self.prop(key, expected)
    }

    /// Assert that `key` is not set.
    pub fn no_prop(self, key: &str) -> Self {
        assert!(
            self.node.prop(key).is_none(),
            "{}: expected no {} prop, found {:?}",
            self.context,
            key,
            self.node.prop(key)
        );
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.node.children.len();
        assert_eq!(
            actual,
            expected,
            "{}: expected {} children, found {}: [{}]",
            self.context,
            expected,
            actual,
            summarize(&self.node.children)
        );
        self
    }

    /// Assert the types of all children, in order.
    pub fn child_types(self, expected: &[NodeType]) -> Self {
        let actual: Vec<NodeType> = self.node.children.iter().map(|c| c.node_type).collect();
        assert_eq!(actual, expected, "{}: child types differ", self.context);
        self
    }

    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        assert!(
            index < self.node.children.len(),
            "{}: child index {} out of bounds ({} children: [{}])",
            self.context,
            index,
            self.node.children.len(),
            summarize(&self.node.children)
        );
        assertion(NodeAssertion {
            node: &self.node.children[index],
            context: format!("{}.children[{}]", self.context, index),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest() -> AstForest {
        AstForest::new(vec![AstNode::new(NodeType::Screen)
            .with_id("screen_000001")
            .with_prop("name", "Home")
            .with_children(vec![AstNode::new(NodeType::Separator).with_id("separator_000002")])])
    }

    #[test]
    fn test_passing_assertions() {
        assert_ast(&forest())
            .node_count(1)
            .all_ids_assigned()
            .node(0, |screen| {
                screen
                    .is(NodeType::Screen)
                    .id("screen_000001")
                    .prop_str("name", "Home")
                    .no_prop("label")
                    .child_types(&[NodeType::Separator])
                    .child(0, |sep| {
                        sep.is(NodeType::Separator).child_count(0);
                    });
            });
    }

    #[test]
    #[should_panic(expected = "nodes[0].children[0]: expected a Button node")]
    fn test_failure_names_the_path() {
        assert_ast(&forest()).node(0, |screen| {
            screen.child(0, |child| {
                child.is(NodeType::Button);
            });
        });
    }
}
