//! Abstract syntax tree for Wiremark documents
//!
//! The AST is deliberately untyped at the field level: every node is
//! `{type, id, props, children}` so that renderers written against the wire
//! format can read it without knowing this crate. The set of node types is
//! closed ([`NodeType`]) and each type documents the props it may carry
//! ([`NodeType::documented_props`]).
//!
//! Nodes leave the builder with an empty `id`; ids are filled in by
//! [identity](crate::wiremark::identity). Any later transform works on a copy.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Node properties, keyed by documented field name.
pub type Props = BTreeMap<String, Value>;

/// The closed set of element kinds a Wiremark AST can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeType {
    Screen,
    Modal,
    Drawer,
    Component,
    ComponentInstance,
    PropVariable,
    Button,
    Link,
    Image,
    Heading,
    Text,
    Paragraph,
    MutedText,
    Note,
    Quote,
    Layout,
    List,
    Navigator,
    UnorderedListItem,
    Fab,
    Separator,
    Input,
    Select,
    RadioOption,
    Checkbox,
    Styles,
    CssProperty,
    Identifier,
}

impl NodeType {
    pub const ALL: [NodeType; 28] = [
        NodeType::Screen,
        NodeType::Modal,
        NodeType::Drawer,
        NodeType::Component,
        NodeType::ComponentInstance,
        NodeType::PropVariable,
        NodeType::Button,
        NodeType::Link,
        NodeType::Image,
        NodeType::Heading,
        NodeType::Text,
        NodeType::Paragraph,
        NodeType::MutedText,
        NodeType::Note,
        NodeType::Quote,
        NodeType::Layout,
        NodeType::List,
        NodeType::Navigator,
        NodeType::UnorderedListItem,
        NodeType::Fab,
        NodeType::Separator,
        NodeType::Input,
        NodeType::Select,
        NodeType::RadioOption,
        NodeType::Checkbox,
        NodeType::Styles,
        NodeType::CssProperty,
        NodeType::Identifier,
    ];

    /// Wire name of the type, as serialized in the `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Screen => "Screen",
            NodeType::Modal => "Modal",
            NodeType::Drawer => "Drawer",
            NodeType::Component => "Component",
            NodeType::ComponentInstance => "ComponentInstance",
            NodeType::PropVariable => "PropVariable",
            NodeType::Button => "Button",
            NodeType::Link => "Link",
            NodeType::Image => "Image",
            NodeType::Heading => "Heading",
            NodeType::Text => "Text",
            NodeType::Paragraph => "Paragraph",
            NodeType::MutedText => "MutedText",
            NodeType::Note => "Note",
            NodeType::Quote => "Quote",
            NodeType::Layout => "Layout",
            NodeType::List => "List",
            NodeType::Navigator => "Navigator",
            NodeType::UnorderedListItem => "UnorderedListItem",
            NodeType::Fab => "Fab",
            NodeType::Separator => "Separator",
            NodeType::Input => "Input",
            NodeType::Select => "Select",
            NodeType::RadioOption => "RadioOption",
            NodeType::Checkbox => "Checkbox",
            NodeType::Styles => "Styles",
            NodeType::CssProperty => "CssProperty",
            NodeType::Identifier => "Identifier",
        }
    }

    /// Screens, modals, drawers and components: the named, routable declarations.
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            NodeType::Screen | NodeType::Modal | NodeType::Drawer | NodeType::Component
        )
    }

    /// The props a node of this type may carry. Renderers may rely on nothing else.
    pub fn documented_props(&self) -> &'static [&'static str] {
        match self {
            NodeType::Screen | NodeType::Modal | NodeType::Drawer | NodeType::Component => {
                &["name"]
            }
            NodeType::ComponentInstance => &["componentName"],
            NodeType::PropVariable => &["index", "content"],
            NodeType::Button => &["label", "variant", "target"],
            NodeType::Link => &["text", "target"],
            NodeType::Image => &["alt", "src"],
            NodeType::Heading => &["level", "text"],
            NodeType::Text
            | NodeType::Paragraph
            | NodeType::MutedText
            | NodeType::Note
            | NodeType::Quote => &["text"],
            NodeType::Layout => &["layout", "modifiers"],
            NodeType::List => &["componentName"],
            NodeType::Navigator | NodeType::Separator | NodeType::Styles => &[],
            NodeType::UnorderedListItem => &["text", "target"],
            NodeType::Fab => &["icon"],
            NodeType::Input => &[
                "label",
                "inputType",
                "placeholder",
                "required",
                "disabled",
                "attributes",
            ],
            NodeType::Select => &[
                "label",
                "options",
                "placeholder",
                "required",
                "disabled",
                "attributes",
            ],
            NodeType::RadioOption => &["label", "selected", "group"],
            NodeType::Checkbox => &["label", "checked"],
            NodeType::CssProperty => &["name", "value"],
            NodeType::Identifier => &["name"],
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One semantic UI element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstNode {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub props: Props,
    #[serde(default)]
    pub children: Vec<AstNode>,
}

impl AstNode {
    /// A node with no id, no props and no children.
    pub fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            id: String::new(),
            props: Props::new(),
            children: Vec::new(),
        }
    }

    pub fn with_prop(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.props.insert(key.to_string(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<AstNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// String-valued prop, `None` when absent or not a string.
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.prop_str("name")
    }

    /// Pre-order traversal starting at this node.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

/// A compiled document: the top-level declarations in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AstForest {
    pub nodes: Vec<AstNode>,
}

impl AstForest {
    pub fn new(nodes: Vec<AstNode>) -> Self {
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order traversal over every node of every root.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.nodes.iter().rev().collect(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// Top-level node of `node_type` whose `name` prop equals `name`.
    pub fn find_by_name(&self, node_type: NodeType, name: &str) -> Option<&AstNode> {
        self.nodes
            .iter()
            .find(|node| node.node_type == node_type && node.name() == Some(name))
    }

    /// Top-level nodes of one type, in source order.
    pub fn declarations(&self, node_type: NodeType) -> impl Iterator<Item = &AstNode> {
        self.nodes
            .iter()
            .filter(move |node| node.node_type == node_type)
    }
}

/// Pre-order iterator over AST nodes.
pub struct Walk<'a> {
    stack: Vec<&'a AstNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a AstNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> AstForest {
        AstForest::new(vec![
            AstNode::new(NodeType::Screen)
                .with_prop("name", "Home")
                .with_children(vec![
                    AstNode::new(NodeType::Heading)
                        .with_prop("level", 1)
                        .with_prop("text", "Hi"),
                    AstNode::new(NodeType::Layout)
                        .with_prop("layout", "row")
                        .with_children(vec![AstNode::new(NodeType::Separator)]),
                ]),
            AstNode::new(NodeType::Modal).with_prop("name", "Confirm"),
        ])
    }

    #[test]
    fn test_walk_is_pre_order() {
        let forest = sample();
        let types: Vec<NodeType> = forest.walk().map(|n| n.node_type).collect();
        assert_eq!(
            types,
            vec![
                NodeType::Screen,
                NodeType::Heading,
                NodeType::Layout,
                NodeType::Separator,
                NodeType::Modal
            ]
        );
        assert_eq!(forest.node_count(), 5);
    }

    #[test]
    fn test_find_by_name() {
        let forest = sample();
        assert!(forest.find_by_name(NodeType::Modal, "Confirm").is_some());
        assert!(forest.find_by_name(NodeType::Screen, "Confirm").is_none());
        assert_eq!(forest.declarations(NodeType::Screen).count(), 1);
    }

    #[test]
    fn test_wire_shape() {
        let node = AstNode::new(NodeType::Button)
            .with_id("button_abc123")
            .with_prop("label", "Save");
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "Button",
                "id": "button_abc123",
                "props": {"label": "Save"},
                "children": []
            })
        );
        let back: AstNode = serde_json::from_value(value).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_display_matches_wire_name() {
        for node_type in NodeType::ALL {
            let wire = serde_json::to_value(node_type).unwrap();
            assert_eq!(wire, json!(node_type.to_string()));
        }
    }
}
