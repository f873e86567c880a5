//! AST Node Creation from CST Nodes
//!
//! One builder function per CST construct. Each takes the CST node and the
//! per-build [`BuildContext`], decomposes compound tokens through
//! [extraction](super::extraction) and [attributes](super::attributes), validates
//! the resulting fields and returns AST nodes.
//!
//! # Responsibilities
//!
//! - Map every CST rule to its AST node type (a radio group flattens into sibling
//!   options, skipped regions produce nothing)
//! - Substitute the documented default for a missing or invalid field and record a
//!   diagnostic pointing at the offending token
//! - Keep children in source order
//!
//! Builders never fail on bad input. A block nested deeper than
//! [`MAX_NESTING`](super::context::MAX_NESTING) is left out with a diagnostic; the
//! rest of the document still builds.

use serde_json::Value;

use super::attributes::{parse_input, InputData};
use super::context::BuildContext;
use super::extraction::{
    extract_button, extract_image, extract_layout, extract_link, heading_level, split_target,
    split_values, strip_sigil, unquote,
};
use super::validation::{is_valid_css_name, is_valid_name, partition_modifiers};
use crate::wiremark::ast::{AstNode, NodeType};
use crate::wiremark::diagnostics::{codes, Severity};
use crate::wiremark::lexing::Token;
use crate::wiremark::parsing::cst::{
    Block, ButtonLine, ComponentInstance, CssLine, Declaration, Element, FabElement, LayoutElement,
    LeafLine, ListBlock, ListElement, ListLine, MarkedText, NavigatorElement, Program,
    RadioGroup, StyleLine, StylesBlock, ViewDecl, ViewKind,
};

const NAME_HINT: &str = "names start with an uppercase letter followed by letters, digits or `_`";

// ============================================================================
// DECLARATIONS
// ============================================================================

/// Build every declaration of a program, in source order.
pub(super) fn build_program(program: &Program, ctx: &mut BuildContext) -> Vec<AstNode> {
    let mut nodes = Vec::with_capacity(program.declarations.len());
    for declaration in &program.declarations {
        match declaration {
            Declaration::View(view) => nodes.push(build_view(view, ctx)),
            Declaration::Styles(styles) => nodes.push(build_styles(styles, ctx)),
            Declaration::Error(_) => {}
        }
    }
    nodes
}

fn view_node_type(kind: ViewKind) -> NodeType {
    match kind {
        ViewKind::Screen => NodeType::Screen,
        ViewKind::Modal => NodeType::Modal,
        ViewKind::Drawer => NodeType::Drawer,
        ViewKind::Component => NodeType::Component,
    }
}

fn build_view(view: &ViewDecl, ctx: &mut BuildContext) -> AstNode {
    let node_type = view_node_type(view.kind);
    let name = match &view.name {
        Some(token) => checked_name(ctx, node_type, token, &token.image),
        None => {
            let diagnostic = BuildContext::problem(
                Severity::Error,
                codes::BUILDER_MISSING_REQUIRED,
                node_type,
                &view.keyword,
                format!("{} is missing a name", view.kind.rule_name()),
            )
            .with_hint(format!("write `{} Name:`", view.kind.rule_name()));
            ctx.report(diagnostic);
            "Untitled".to_string()
        }
    };
    let children = build_block(&view.body, ctx);
    AstNode::new(node_type)
        .with_prop("name", name)
        .with_children(children)
}

/// Validate a declaration or component name. The name is kept either way.
fn checked_name(ctx: &mut BuildContext, node_type: NodeType, at: &Token, name: &str) -> String {
    if !is_valid_name(name) {
        let diagnostic = BuildContext::problem(
            Severity::Error,
            codes::BUILDER_INVALID_NAME,
            node_type,
            at,
            format!("invalid {} name `{}`", node_type, name),
        )
        .with_hint(NAME_HINT);
        ctx.report(diagnostic);
    }
    name.to_string()
}

fn build_styles(styles: &StylesBlock, ctx: &mut BuildContext) -> AstNode {
    let properties = styles
        .lines
        .iter()
        .filter_map(|line| match line {
            StyleLine::Property(css) => Some(build_css_property(css, ctx)),
            StyleLine::Error(_) => None,
        })
        .collect();
    AstNode::new(NodeType::Styles).with_children(properties)
}

fn build_css_property(css: &CssLine, ctx: &mut BuildContext) -> AstNode {
    let name = css.name.image.clone();
    if !is_valid_css_name(&name) {
        ctx.warn(
            codes::BUILDER_INVALID_PROPS,
            NodeType::CssProperty,
            &css.name,
            format!("invalid style property name `{}`", name),
        );
    }
    let value = css.value.text();
    if value.is_empty() {
        ctx.warn(
            codes::BUILDER_MISSING_REQUIRED,
            NodeType::CssProperty,
            &css.name,
            format!("style property `{}` has no value", name),
        );
    }
    AstNode::new(NodeType::CssProperty)
        .with_prop("name", name)
        .with_prop("value", value)
}

// ============================================================================
// BLOCKS AND ELEMENTS
// ============================================================================

/// Build the elements of an indented block one nesting level down.
fn build_block(block: &Block, ctx: &mut BuildContext) -> Vec<AstNode> {
    ctx.nested(&block.start, |ctx| {
        let mut nodes = Vec::with_capacity(block.elements.len());
        for element in &block.elements {
            build_element(element, ctx, &mut nodes);
        }
        nodes
    })
}

/// Append the nodes for one element. Most elements produce exactly one node.
fn build_element(element: &Element, ctx: &mut BuildContext, out: &mut Vec<AstNode>) {
    match element {
        Element::ComponentInstance(instance) => out.push(build_component_instance(instance, ctx)),
        Element::Button(button) => out.push(build_button(button, ctx)),
        Element::Link(link) => out.push(build_link(link, ctx)),
        Element::Image(image) => out.push(build_image(image, ctx)),
        Element::Heading(heading) => out.push(build_heading(heading, ctx)),
        Element::Quote(line) => out.push(build_marked_text(NodeType::Quote, line, ctx)),
        Element::Note(line) => out.push(build_marked_text(NodeType::Note, line, ctx)),
        Element::Muted(line) => out.push(build_marked_text(NodeType::MutedText, line, ctx)),
        Element::QuotedText(line) => out.push(build_quoted_text(line, ctx)),
        Element::List(list) => out.push(build_list(list, ctx)),
        Element::Layout(layout) => out.push(build_layout(layout, ctx)),
        Element::Navigator(nav) => out.push(build_navigator(nav, ctx)),
        Element::Fab(fab) => out.push(build_fab(fab, ctx)),
        Element::Separator(_) => out.push(AstNode::new(NodeType::Separator)),
        Element::Input(input) => out.push(build_input(input, ctx)),
        Element::RadioGroup(group) => out.extend(build_radio_group(group, ctx)),
        Element::Checkbox(checkbox) => out.push(build_checkbox(checkbox, ctx)),
        Element::ListItem(item) => out.push(build_list_item(item, ctx)),
        Element::Identifier(identifier) => out.push(
            AstNode::new(NodeType::Identifier)
                .with_prop("name", strip_sigil(&identifier.token.image)),
        ),
        Element::Paragraph(paragraph) => {
            out.push(AstNode::new(NodeType::Paragraph).with_prop("text", paragraph.text.text()))
        }
        Element::Error(_) => {}
    }
}

/// Text of a marked line, warning when it is empty.
fn required_text(ctx: &mut BuildContext, node_type: NodeType, at: &Token, text: String) -> String {
    if text.trim().is_empty() {
        ctx.warn(
            codes::BUILDER_MISSING_REQUIRED,
            node_type,
            at,
            format!("{} has no text", node_type),
        );
        return String::new();
    }
    text
}

// ============================================================================
// COMPONENTS
// ============================================================================

fn build_component_instance(instance: &ComponentInstance, ctx: &mut BuildContext) -> AstNode {
    let name = checked_name(
        ctx,
        NodeType::ComponentInstance,
        &instance.reference,
        strip_sigil(&instance.reference.image),
    );
    component_instance(name, &instance.values.text())
}

/// A component reference with its literal values as ordered `PropVariable`s.
fn component_instance(name: String, values: &str) -> AstNode {
    let variables = split_values(values)
        .into_iter()
        .enumerate()
        .map(|(index, content)| {
            AstNode::new(NodeType::PropVariable)
                .with_prop("index", index)
                .with_prop("content", content)
        })
        .collect();
    AstNode::new(NodeType::ComponentInstance)
        .with_prop("componentName", name)
        .with_children(variables)
}

// ============================================================================
// SINGLE-LINE ELEMENTS
// ============================================================================

fn build_button(button: &ButtonLine, ctx: &mut BuildContext) -> AstNode {
    let data = extract_button(button.marker.kind, &button.marker.image);

    let label = if data.label.is_empty() {
        ctx.warn(
            codes::BUILDER_MISSING_REQUIRED,
            NodeType::Button,
            &button.marker,
            "button has no label",
        );
        "Button".to_string()
    } else {
        data.label
    };

    if let Some(unknown) = &data.unknown_variant {
        let diagnostic = BuildContext::problem(
            Severity::Warning,
            codes::BUILDER_INVALID_PROPS,
            NodeType::Button,
            &button.marker,
            format!("unknown button variant `{}`", unknown),
        )
        .with_hint("variants are primary, secondary, danger, ghost and outline");
        ctx.report(diagnostic);
    }

    let mut node = AstNode::new(NodeType::Button)
        .with_prop("label", label)
        .with_prop("variant", data.variant.unwrap_or_else(|| "default".to_string()));
    if let Some(target) = &button.target {
        node = node.with_prop("target", strip_sigil(&target.image));
    }
    node
}

fn build_link(link: &LeafLine, ctx: &mut BuildContext) -> AstNode {
    let data = extract_link(&link.token.image);
    let target = if data.target.is_empty() {
        ctx.warn(
            codes::BUILDER_MISSING_REQUIRED,
            NodeType::Link,
            &link.token,
            "link has no target",
        );
        "#".to_string()
    } else {
        data.target
    };
    let text = if data.text.is_empty() {
        target.clone()
    } else {
        data.text
    };
    AstNode::new(NodeType::Link)
        .with_prop("text", text)
        .with_prop("target", target)
}

fn build_image(image: &LeafLine, ctx: &mut BuildContext) -> AstNode {
    let data = extract_image(&image.token.image);
    if data.src.is_empty() {
        ctx.error(
            codes::BUILDER_MISSING_REQUIRED,
            NodeType::Image,
            &image.token,
            "image has no source",
        );
    }
    AstNode::new(NodeType::Image)
        .with_prop("alt", data.alt)
        .with_prop("src", data.src)
}

fn build_heading(heading: &MarkedText, ctx: &mut BuildContext) -> AstNode {
    let level = heading_level(&heading.marker.image).clamp(1, 6);
    let text = required_text(ctx, NodeType::Heading, &heading.marker, heading.text.text());
    AstNode::new(NodeType::Heading)
        .with_prop("level", level)
        .with_prop("text", text)
}

fn build_marked_text(node_type: NodeType, line: &MarkedText, ctx: &mut BuildContext) -> AstNode {
    let text = required_text(ctx, node_type, &line.marker, line.text.text());
    AstNode::new(node_type).with_prop("text", text)
}

fn build_quoted_text(line: &LeafLine, ctx: &mut BuildContext) -> AstNode {
    let text = required_text(
        ctx,
        NodeType::Text,
        &line.token,
        unquote(&line.token.image).to_string(),
    );
    AstNode::new(NodeType::Text).with_prop("text", text)
}

// ============================================================================
// INPUTS
// ============================================================================

fn build_input(input: &LeafLine, ctx: &mut BuildContext) -> AstNode {
    let data = parse_input(&input.token.image);
    let node_type = if data.is_select() {
        NodeType::Select
    } else {
        NodeType::Input
    };
    let at = &input.token;

    if data.label.is_empty() {
        let diagnostic = BuildContext::problem(
            Severity::Error,
            codes::BUILDER_MISSING_REQUIRED,
            node_type,
            at,
            format!("{} has no label", node_type),
        )
        .with_hint("write the label after the input type, e.g. `[email Email]`");
        ctx.report(diagnostic);
    }
    for flag in &data.unknown_flags {
        let diagnostic = BuildContext::problem(
            Severity::Warning,
            codes::BUILDER_INVALID_MODIFIERS,
            node_type,
            at,
            format!("unknown input flag `{}`", flag),
        )
        .with_hint("flags are required, disabled, readonly and multiline");
        ctx.report(diagnostic);
    }
    for stray in &data.stray {
        ctx.warn(
            codes::BUILDER_INVALID_PROPS,
            node_type,
            at,
            format!("unrecognized input text `{}`", stray),
        );
    }

    match node_type {
        NodeType::Select => select_node(data, ctx, at),
        _ => input_node(data),
    }
}

fn input_node(data: InputData) -> AstNode {
    AstNode::new(NodeType::Input)
        .with_prop("label", data.label)
        .with_prop("inputType", data.input_type.unwrap_or_else(|| "text".to_string()))
        .with_prop("placeholder", data.placeholder.unwrap_or_default())
        .with_prop("required", data.required)
        .with_prop("disabled", data.disabled)
        .with_prop("attributes", Value::Object(data.attributes))
}

fn select_node(data: InputData, ctx: &mut BuildContext, at: &Token) -> AstNode {
    let options = match data.options {
        Some(options) if !options.is_empty() => options,
        _ => {
            let diagnostic = BuildContext::problem(
                Severity::Warning,
                codes::BUILDER_MISSING_REQUIRED,
                NodeType::Select,
                at,
                "select has no options",
            )
            .with_hint("list the options in brackets, e.g. `[a|b]`");
            ctx.report(diagnostic);
            Vec::new()
        }
    };
    AstNode::new(NodeType::Select)
        .with_prop("label", data.label)
        .with_prop("options", options)
        .with_prop("placeholder", data.placeholder.unwrap_or_default())
        .with_prop("required", data.required)
        .with_prop("disabled", data.disabled)
        .with_prop("attributes", Value::Object(data.attributes))
}

fn build_radio_group(group: &RadioGroup, ctx: &mut BuildContext) -> Vec<AstNode> {
    let name = ctx.next_radio_group();
    group
        .options
        .iter()
        .map(|option| {
            let label = required_text(ctx, NodeType::RadioOption, &option.marker, option.text.text());
            AstNode::new(NodeType::RadioOption)
                .with_prop("label", label)
                .with_prop("selected", is_marked(&option.marker, &['x', 'X', '*']))
                .with_prop("group", name.clone())
        })
        .collect()
}

/// Whether a `( )`/`[ ]` marker holds one of `marks`.
fn is_marked(marker: &Token, marks: &[char]) -> bool {
    marker.image.chars().any(|c| marks.contains(&c))
}

fn build_checkbox(checkbox: &MarkedText, ctx: &mut BuildContext) -> AstNode {
    let label = required_text(ctx, NodeType::Checkbox, &checkbox.marker, checkbox.text.text());
    AstNode::new(NodeType::Checkbox)
        .with_prop("label", label)
        .with_prop("checked", is_marked(&checkbox.marker, &['x', 'X']))
}

// ============================================================================
// CONTAINERS
// ============================================================================

fn build_layout(layout: &LayoutElement, ctx: &mut BuildContext) -> AstNode {
    let data = extract_layout(&layout.keyword.image);
    let (modifiers, rejected) = partition_modifiers(data.modifiers);
    if !rejected.is_empty() {
        let diagnostic = BuildContext::problem(
            Severity::Warning,
            codes::BUILDER_INVALID_MODIFIERS,
            NodeType::Layout,
            &layout.keyword,
            format!("unknown layout modifier(s): {}", rejected.join(", ")),
        )
        .with_hint(
            "modifiers are center, start, end, between, around, wrap, fill, scroll, \
             bordered, padded, gap-N and cols-N",
        );
        ctx.report(diagnostic);
    }
    let children = match &layout.body {
        Some(body) => build_block(body, ctx),
        None => Vec::new(),
    };
    AstNode::new(NodeType::Layout)
        .with_prop("layout", data.preset)
        .with_prop("modifiers", modifiers)
        .with_children(children)
}

fn build_list(list: &ListElement, ctx: &mut BuildContext) -> AstNode {
    let Some(reference) = &list.component else {
        let items = build_list_items(&list.items, ctx);
        return AstNode::new(NodeType::List).with_children(items);
    };

    let name = checked_name(ctx, NodeType::List, reference, strip_sigil(&reference.image));
    let instances = ctx.nested(&list.items.start, |_| {
        list.items
            .items()
            .map(|line| component_instance(name.clone(), &line.text.text()))
            .collect()
    });
    AstNode::new(NodeType::List)
        .with_prop("componentName", name)
        .with_children(instances)
}

fn build_navigator(nav: &NavigatorElement, ctx: &mut BuildContext) -> AstNode {
    let items = match &nav.items {
        Some(items) => build_list_items(items, ctx),
        None => Vec::new(),
    };
    AstNode::new(NodeType::Navigator).with_children(items)
}

fn build_fab(fab: &FabElement, ctx: &mut BuildContext) -> AstNode {
    let icon = fab
        .icon
        .as_ref()
        .map(|t| t.image.trim().to_string())
        .filter(|icon| !icon.is_empty())
        .unwrap_or_else(|| "+".to_string());
    let items = match &fab.items {
        Some(items) => build_list_items(items, ctx),
        None => Vec::new(),
    };
    AstNode::new(NodeType::Fab)
        .with_prop("icon", icon)
        .with_children(items)
}

fn build_list_items(block: &ListBlock, ctx: &mut BuildContext) -> Vec<AstNode> {
    ctx.nested(&block.start, |ctx| block.items().map(|line| build_list_item(line, ctx)).collect())
}

fn build_list_item(item: &ListLine, ctx: &mut BuildContext) -> AstNode {
    let (text, target) = split_target(&item.text);
    let text = match (&target, text.is_empty()) {
        (Some(target), true) => target.clone(),
        (None, true) => {
            ctx.warn(
                codes::BUILDER_MISSING_REQUIRED,
                NodeType::UnorderedListItem,
                &item.dash,
                "list item has no text",
            );
            String::new()
        }
        (_, false) => text,
    };
    let mut node = AstNode::new(NodeType::UnorderedListItem).with_prop("text", text);
    if let Some(target) = target {
        node = node.with_prop("target", target);
    }
    node
}
