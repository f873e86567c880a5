//! Treeviz formatter for the AST
//!
//! One line per node, nesting drawn with box characters, so a compiled document can be
//! scanned top to bottom:
//!
//! ```text
//! ⧉ 1 declaration(s)
//! └─ ▣ Screen screen_1x2y3z name="Home"
//!    ├─ # Heading heading_0a9b8c level=1 text="Welcome"
//!    └─ ☷ Layout layout_7f7f7f layout="row" modifiers=[]
//! ```
//!
//! Props are printed in key order as compact JSON and cut to 40 characters.

use crate::wiremark::ast::{AstForest, AstNode, NodeType};

const MAX_VALUE_CHARS: usize = 40;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn get_icon(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Screen => "▣",
        NodeType::Modal => "◫",
        NodeType::Drawer => "◧",
        NodeType::Component => "◇",
        NodeType::ComponentInstance => "◆",
        NodeType::Heading => "#",
        NodeType::Paragraph => "¶",
        NodeType::Layout => "☷",
        NodeType::List | NodeType::Navigator => "☰",
        NodeType::UnorderedListItem => "•",
        NodeType::Separator => "―",
        NodeType::Styles => "✎",
        _ => "○",
    }
}

fn format_props(node: &AstNode) -> String {
    node.props
        .iter()
        .map(|(key, value)| format!("{}={}", key, truncate(&value.to_string(), MAX_VALUE_CHARS)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_node(node: &AstNode, prefix: &str, is_last: bool, output: &mut String) {
    let connector = if is_last { "└─" } else { "├─" };
    let mut line = format!("{}{} {} {}", prefix, connector, get_icon(node.node_type), node.node_type);
    if !node.id.is_empty() {
        line.push(' ');
        line.push_str(&node.id);
    }
    let props = format_props(node);
    if !props.is_empty() {
        line.push(' ');
        line.push_str(&props);
    }
    output.push_str(&line);
    output.push('\n');

    let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        format_node(child, &child_prefix, i + 1 == count, output);
    }
}

pub fn to_treeviz_str(forest: &AstForest) -> String {
    let mut output = format!("⧉ {} declaration(s)\n", forest.nodes.len());
    let count = forest.nodes.len();
    for (i, node) in forest.nodes.iter().enumerate() {
        format_node(node, "", i + 1 == count, &mut output);
    }
    output
}
