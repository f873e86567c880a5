//! CST outline
//!
//! Every CST rule on its own line, indented two spaces per nesting level and followed
//! by the position of its head token. Skipped regions show how many tokens they
//! swallowed.
//!
//! ```text
//! program
//!   screen @1:1
//!     heading @2:3
//!     error @3:3 (4 tokens)
//! ```

use crate::wiremark::lexing::Token;
use crate::wiremark::parsing::cst::{
    Block, Declaration, Element, ListBlock, ListEntry, Program, Skipped, StyleLine,
};

struct Outline {
    output: String,
}

impl Outline {
    fn line(&mut self, depth: usize, rule: &str, head: Option<&Token>) {
        self.output.push_str(&"  ".repeat(depth));
        self.output.push_str(rule);
        if let Some(token) = head {
            self.output
                .push_str(&format!(" @{}:{}", token.line, token.column));
        }
        self.output.push('\n');
    }

    fn skipped(&mut self, depth: usize, skipped: &Skipped) {
        self.output.push_str(&"  ".repeat(depth));
        self.output.push_str("error");
        if let Some(token) = skipped.head() {
            self.output
                .push_str(&format!(" @{}:{}", token.line, token.column));
        }
        self.output
            .push_str(&format!(" ({} tokens)\n", skipped.tokens.len()));
    }

    fn declaration(&mut self, declaration: &Declaration) {
        match declaration {
            Declaration::Error(skipped) => self.skipped(1, skipped),
            Declaration::Styles(styles) => {
                self.line(1, "styles", Some(&styles.keyword));
                for line in &styles.lines {
                    match line {
                        StyleLine::Property(css) => self.line(2, "cssLine", Some(&css.name)),
                        StyleLine::Error(skipped) => self.skipped(2, skipped),
                    }
                }
            }
            Declaration::View(view) => {
                self.line(1, declaration.rule_name(), Some(&view.keyword));
                self.block(2, &view.body);
            }
        }
    }

    fn block(&mut self, depth: usize, block: &Block) {
        for element in &block.elements {
            self.element(depth, element);
        }
    }

    fn list_block(&mut self, depth: usize, block: &ListBlock) {
        for entry in &block.entries {
            match entry {
                ListEntry::Item(item) => self.line(depth, "listItem", Some(&item.dash)),
                ListEntry::Error(skipped) => self.skipped(depth, skipped),
            }
        }
    }

    fn element(&mut self, depth: usize, element: &Element) {
        if let Element::Error(skipped) = element {
            self.skipped(depth, skipped);
            return;
        }
        self.line(depth, element.rule_name(), element.head());
        match element {
            Element::Layout(layout) => {
                if let Some(body) = &layout.body {
                    self.block(depth + 1, body);
                }
            }
            Element::List(list) => self.list_block(depth + 1, &list.items),
            Element::Navigator(nav) => {
                if let Some(items) = &nav.items {
                    self.list_block(depth + 1, items);
                }
            }
            Element::Fab(fab) => {
                if let Some(items) = &fab.items {
                    self.list_block(depth + 1, items);
                }
            }
            Element::RadioGroup(group) => {
                for option in &group.options {
                    self.line(depth + 1, "radio", Some(&option.marker));
                }
            }
            _ => {}
        }
    }
}

pub fn to_cst_debug_str(program: &Program) -> String {
    let mut outline = Outline {
        output: String::from("program\n"),
    };
    for declaration in &program.declarations {
        outline.declaration(declaration);
    }
    outline.output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiremark::lexing::lex;
    use crate::wiremark::parsing::parse;

    #[test]
    fn test_outline() {
        let source = "\
styles:
  radius: 8px
screen Home:
  # Welcome
  row:
    <Save>
  ( ) A
  (x) B
  nav:
    - Home @Home
";
        let cst = parse(&lex(source).tokens).cst;
        insta::assert_snapshot!(to_cst_debug_str(&cst), @r###"
        program
          styles @1:1
            cssLine @2:3
          screen @3:1
            heading @4:3
            layout @5:3
              button @6:5
            radioGroup @7:3
              radio @7:3
              radio @8:3
            navigator @9:3
              listItem @10:5
        "###);
    }
}
