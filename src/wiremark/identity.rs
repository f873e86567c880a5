//! Deterministic node identity
//!
//!     Every AST node gets an id derived from its content, so the same document always
//!     compiles to the same ids and small edits leave the ids of untouched nodes alone.
//!
//! Fingerprint
//!
//!     `type=<Type>`, then the stable props that are present, in the order `name,
//!     label, componentName, text, content, children`, each as `field=value` (strings
//!     raw, anything else as compact JSON), then `parent=<ParentType>` when the node has
//!     a parent. The parts are joined with `|`. The position-independent fingerprint
//!     leaves the `parent=` part out.
//!
//! Hash
//!
//!     A 32-bit wrapping `h * 31 + unit` over the UTF-16 code units of the fingerprint,
//!     made non-negative, written in base 36, left-padded with `0` to six digits and cut
//!     to the first six. The id is `<type in lowercase>_<hash>`.
//!
//! Reuse
//!
//!     With a previous revision of the AST, each of its nodes is indexed by
//!     position-independent fingerprint. A new node with a matching fingerprint takes
//!     the old id, which keeps ids stable when a node moves. Siblings that end up with
//!     the same id are told apart with `~2`, `~3`, ... in source order; the suffix is
//!     dropped when indexing so that a reused id is re-suffixed the way it was before.

use std::collections::HashMap;

use serde_json::Value;

use crate::wiremark::ast::{AstForest, AstNode, NodeType};

/// Props that take part in the fingerprint, in fingerprint order.
pub const STABLE_PROPS: [&str; 6] = ["name", "label", "componentName", "text", "content", "children"];

const HASH_WIDTH: usize = 6;

/// Fingerprint of `node`, with `parent=` when `parent` is given.
pub fn fingerprint(node: &AstNode, parent: Option<NodeType>) -> String {
    let mut parts = vec![format!("type={}", node.node_type)];
    for key in STABLE_PROPS {
        if let Some(value) = node.prop(key) {
            parts.push(format!("{}={}", key, render_value(value)));
        }
    }
    if let Some(parent) = parent {
        parts.push(format!("parent={}", parent));
    }
    parts.join("|")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Six base-36 digits derived from `input`.
pub fn hash_fingerprint(input: &str) -> String {
    let mut hash: i32 = 0;
    for unit in input.encode_utf16() {
        hash = hash.wrapping_mul(31).wrapping_add(i32::from(unit));
    }
    let digits = to_base36(i64::from(hash).unsigned_abs());
    let padded = format!("{:0>width$}", digits, width = HASH_WIDTH);
    padded[..HASH_WIDTH].to_string()
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}

/// Fresh id of `node` under `parent`.
pub fn fresh_id(node: &AstNode, parent: Option<NodeType>) -> String {
    format!(
        "{}_{}",
        node.node_type.as_str().to_lowercase(),
        hash_fingerprint(&fingerprint(node, parent))
    )
}

/// Id with any sibling suffix (`~N`) removed.
pub fn base_id(id: &str) -> &str {
    match id.rsplit_once('~') {
        Some((base, suffix)) if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) => {
            base
        }
        _ => id,
    }
}

/// Assign ids to a copy of `new`, reusing ids from `previous` where content matches.
pub fn assign_ids(new: &AstForest, previous: Option<&AstForest>) -> AstForest {
    let reuse = previous.map(reuse_map).unwrap_or_default();
    let mut forest = new.clone();
    for node in forest.nodes.iter_mut() {
        assign_node(node, None, &reuse);
    }
    dedupe_siblings(&mut forest.nodes);
    for node in forest.nodes.iter_mut() {
        assign_children(node, &reuse);
    }
    log::debug!(
        "assigned ids to {} node(s), {} reusable id(s)",
        forest.node_count(),
        reuse.len()
    );
    forest
}

/// Position-independent fingerprint to id, for every node of `previous`.
fn reuse_map(previous: &AstForest) -> HashMap<String, String> {
    previous
        .walk()
        .filter(|node| !node.id.is_empty())
        .map(|node| (fingerprint(node, None), base_id(&node.id).to_string()))
        .collect()
}

fn assign_node(node: &mut AstNode, parent: Option<NodeType>, reuse: &HashMap<String, String>) {
    if let Some(id) = reuse.get(&fingerprint(node, None)) {
        log::trace!("reusing id {} for {}", id, node.node_type);
        node.id = id.clone();
    }
    if node.id.is_empty() {
        node.id = fresh_id(node, parent);
    }
}

fn assign_children(node: &mut AstNode, reuse: &HashMap<String, String>) {
    let parent = node.node_type;
    for child in node.children.iter_mut() {
        assign_node(child, Some(parent), reuse);
    }
    dedupe_siblings(&mut node.children);
    for child in node.children.iter_mut() {
        assign_children(child, reuse);
    }
}

/// Suffix repeated ids among siblings, keeping the first occurrence unchanged.
fn dedupe_siblings(siblings: &mut [AstNode]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for node in siblings.iter_mut() {
        let count = seen.entry(node.id.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            node.id = format!("{}~{}", node.id, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn button(label: &str) -> AstNode {
        AstNode::new(NodeType::Button)
            .with_prop("label", label)
            .with_prop("variant", "default")
    }

    fn screen(name: &str, children: Vec<AstNode>) -> AstNode {
        AstNode::new(NodeType::Screen)
            .with_prop("name", name)
            .with_children(children)
    }

    #[test]
    fn test_fingerprint_shape() {
        let node = AstNode::new(NodeType::Heading)
            .with_prop("level", 2)
            .with_prop("text", "Hi");
        assert_eq!(fingerprint(&node, None), "type=Heading|text=Hi");
        assert_eq!(
            fingerprint(&node, Some(NodeType::Screen)),
            "type=Heading|text=Hi|parent=Screen"
        );

        let variable = AstNode::new(NodeType::PropVariable)
            .with_prop("index", 0)
            .with_prop("content", "x");
        assert_eq!(fingerprint(&variable, None), "type=PropVariable|content=x");
    }

    #[test]
    fn test_hash_values() {
        // "a" is 97, which is "2p" in base 36.
        assert_eq!(hash_fingerprint("a"), "00002p");
        assert_eq!(hash_fingerprint(""), "000000");
        // "ab" = 97 * 31 + 98 = 3105 = "2e9".
        assert_eq!(hash_fingerprint("ab"), "0002e9");
    }

    #[test]
    fn test_hash_wraps_and_truncates() {
        let long = "type=Paragraph|text=".to_string() + &"lorem ipsum ".repeat(50);
        let hash = hash_fingerprint(&long);
        assert_eq!(hash.len(), 6);
        assert!(hash.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
    }

    #[test]
    fn test_id_shape() {
        let forest = assign_ids(&AstForest::new(vec![screen("Home", vec![button("Save")])]), None);
        let root = &forest.nodes[0];
        assert!(root.id.starts_with("screen_"));
        assert_eq!(root.id.len(), "screen_".len() + 6);
        assert_eq!(root.id, fresh_id(root, None));
        assert_eq!(
            root.children[0].id,
            fresh_id(&root.children[0], Some(NodeType::Screen))
        );
    }

    #[test]
    fn test_input_is_not_mutated() {
        let forest = AstForest::new(vec![screen("Home", vec![])]);
        let assigned = assign_ids(&forest, None);
        assert!(forest.nodes[0].id.is_empty());
        assert!(!assigned.nodes[0].id.is_empty());
    }

    #[test]
    fn test_siblings_are_deduplicated() {
        let forest = AstForest::new(vec![screen(
            "Home",
            vec![button("Ok"), button("Ok"), button("Other"), button("Ok")],
        )]);
        let ids: Vec<String> = assign_ids(&forest, None).nodes[0]
            .children
            .iter()
            .map(|n| n.id.clone())
            .collect();
        assert_eq!(ids[1], format!("{}~2", ids[0]));
        assert_eq!(ids[3], format!("{}~3", ids[0]));
        assert_ne!(ids[2], ids[0]);
    }

    #[test]
    fn test_roots_are_siblings() {
        let forest = AstForest::new(vec![screen("Home", vec![]), screen("Home", vec![])]);
        let assigned = assign_ids(&forest, None);
        assert_eq!(
            assigned.nodes[1].id,
            format!("{}~2", assigned.nodes[0].id)
        );
    }

    #[test]
    fn test_reuse_survives_moving_a_node() {
        let mut previous = assign_ids(
            &AstForest::new(vec![screen("Home", vec![button("Save")])]),
            None,
        );
        previous.nodes[0].children[0].id = "button_abc123".to_string();

        let moved = AstForest::new(vec![screen(
            "Home",
            vec![AstNode::new(NodeType::Layout)
                .with_prop("layout", "row")
                .with_children(vec![button("Save")])],
        )]);
        let assigned = assign_ids(&moved, Some(&previous));
        assert_eq!(assigned.nodes[0].children[0].children[0].id, "button_abc123");
        assert_eq!(assigned.nodes[0].id, previous.nodes[0].id);
    }

    #[test]
    fn test_reused_ids_are_resuffixed() {
        let forest = AstForest::new(vec![screen("Home", vec![button("Ok"), button("Ok")])]);
        let first = assign_ids(&forest, None);
        let second = assign_ids(&forest, Some(&first));
        assert_eq!(first, second);
        assert!(second.nodes[0].children[1].id.ends_with("~2"));
    }

    #[test]
    fn test_reuse_without_stable_props_is_shared() {
        // Layouts carry no stable props, so every one of them fingerprints as
        // `type=Layout` and the last one in the previous tree wins.
        let layout = |children: Vec<AstNode>| {
            AstNode::new(NodeType::Layout)
                .with_prop("layout", "row")
                .with_children(children)
        };
        let forest = AstForest::new(vec![screen(
            "Home",
            vec![layout(vec![]), layout(vec![layout(vec![])])],
        )]);
        let first = assign_ids(&forest, None);
        let outer = fresh_id(&first.nodes[0].children[0], Some(NodeType::Screen));
        let inner = fresh_id(&first.nodes[0].children[1].children[0], Some(NodeType::Layout));
        assert_ne!(outer, inner);
        assert_eq!(first.nodes[0].children[0].id, outer);
        assert_eq!(first.nodes[0].children[1].id, format!("{}~2", outer));
        assert_eq!(first.nodes[0].children[1].children[0].id, inner);

        let second = assign_ids(&forest, Some(&first));
        assert_eq!(second.nodes[0].children[0].id, inner);
        assert_eq!(second.nodes[0].children[1].id, format!("{}~2", inner));
        assert_eq!(second.nodes[0].children[1].children[0].id, inner);
        // The screen has a name, so it keeps its id.
        assert_eq!(second.nodes[0].id, first.nodes[0].id);
    }

    #[test]
    fn test_base_id() {
        assert_eq!(base_id("button_abc123~2"), "button_abc123");
        assert_eq!(base_id("button_abc123"), "button_abc123");
        assert_eq!(base_id("odd~name"), "odd~name");
    }

    proptest! {
        #[test]
        fn prop_assignment_is_deterministic(labels in proptest::collection::vec("[a-zA-Z ]{0,12}", 0..8)) {
            let forest = AstForest::new(vec![screen(
                "Home",
                labels.iter().map(|l| button(l)).collect(),
            )]);
            let first = assign_ids(&forest, None);
            prop_assert_eq!(&first, &assign_ids(&forest, None));
            prop_assert_eq!(&first, &assign_ids(&forest, Some(&first)));

            let mut ids: Vec<&str> = first.nodes[0].children.iter().map(|n| n.id.as_str()).collect();
            let total = ids.len();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), total);
        }
    }
}
