//! CSS text output for expanded stylesheets.
//!
//! Rendering runs in two steps. `flatten` turns the nested tree into flat CSS
//! items: nested rulesets get joined selectors, media blocks bubble out of
//! rulesets (keeping the selectors they were nested in) and media nested in
//! media are hoisted next to their parent. `write_item` then prints the items
//! in pretty or compressed form.

use less_eval::Options;
use less_ir::{
    Block, Directive, Media, Node, Printer, Rule, Selectors, StringInterner, Stylesheet,
};

/// Flat CSS item.
#[derive(Clone, Debug, PartialEq)]
enum Item {
    /// Declarations under a selector list. Empty selectors: bare
    /// declarations, as inside `@font-face`.
    Rule {
        selectors: Vec<String>,
        declarations: Vec<String>,
    },
    Media {
        features: String,
        items: Vec<Item>,
    },
    /// Other at-rule with a block.
    Block { header: String, items: Vec<Item> },
    /// Text emitted as-is on its own line.
    Statement(String),
}

/// Renders expanded stylesheets as CSS.
pub struct CssRenderer<'a> {
    printer: Printer<'a>,
    compress: bool,
    indent: usize,
}

impl<'a> CssRenderer<'a> {
    pub fn new(interner: &'a StringInterner, options: &Options) -> Self {
        CssRenderer {
            printer: Printer::new(interner).compress(options.compress),
            compress: options.compress,
            indent: options.indent,
        }
    }

    /// Render an expanded stylesheet.
    pub fn render(&self, sheet: &Stylesheet) -> String {
        let mut out = String::new();
        if let Some(charset) = sheet.block.charset() {
            self.line(&mut out, 0, &self.directive(charset));
        }
        for item in self.flatten(&sheet.block, &[]) {
            self.write_item(&mut out, &item, 0);
        }
        out
    }

    fn flatten(&self, block: &Block, parents: &[String]) -> Vec<Item> {
        let mut declarations = Vec::new();
        let mut nested = Vec::new();
        for node in block.rules() {
            match node {
                Node::Rule(rule) => declarations.push(self.declaration(rule)),
                Node::Ruleset(ruleset) => {
                    let selectors = self.join_selectors(parents, &ruleset.selectors);
                    nested.extend(self.flatten(&ruleset.block, &selectors));
                }
                Node::Media(media) => nested.extend(self.media(media, parents)),
                Node::BlockDirective(directive) => {
                    let items = self.flatten(&directive.block, &[]);
                    if !items.is_empty() {
                        nested.push(Item::Block {
                            header: directive.name.clone(),
                            items,
                        });
                    }
                }
                Node::Stylesheet(sheet) => nested.extend(self.flatten(&sheet.block, parents)),
                Node::Directive(directive) if !directive.is_charset() => {
                    nested.push(Item::Statement(self.directive(directive)));
                }
                Node::Import(import) => {
                    nested.push(Item::Statement(format!("{};", self.printer.import(import))));
                }
                Node::Comment(comment) if comment.block && !self.compress && parents.is_empty() => {
                    nested.push(Item::Statement(format!("/*{}*/", comment.text)));
                }
                Node::Directive(_)
                | Node::Comment(_)
                | Node::Definition(_)
                | Node::Mixin(_)
                | Node::MixinCall(_)
                | Node::ImportMarker(_) => {}
            }
        }

        let mut items = Vec::with_capacity(nested.len() + 1);
        if !declarations.is_empty() {
            items.push(Item::Rule {
                selectors: parents.to_vec(),
                declarations,
            });
        }
        items.extend(nested);
        items
    }

    /// A media block and the media blocks hoisted out of it.
    fn media(&self, media: &Media, parents: &[String]) -> Vec<Item> {
        let mut own = Vec::new();
        let mut hoisted = Vec::new();
        for item in self.flatten(&media.block, parents) {
            match item {
                Item::Media { .. } => hoisted.push(item),
                other => own.push(other),
            }
        }
        let mut items = Vec::with_capacity(hoisted.len() + 1);
        if !own.is_empty() {
            items.push(Item::Media {
                features: self.printer.features(media.effective_features()),
                items: own,
            });
        }
        items.extend(hoisted);
        items
    }

    /// Selectors of a nested ruleset: `&` is replaced by each parent,
    /// otherwise the selector is appended to the parent as a descendant.
    fn join_selectors(&self, parents: &[String], selectors: &Selectors) -> Vec<String> {
        let mut joined = Vec::new();
        if parents.is_empty() {
            for selector in &selectors.selectors {
                let text = self.printer.selector(selector);
                joined.push(text.replace('&', "").trim().to_owned());
            }
            return joined;
        }
        for parent in parents {
            for selector in &selectors.selectors {
                let text = self.printer.selector(selector);
                if selector.has_wildcard() {
                    joined.push(text.replace('&', parent));
                } else if self.compress && text.starts_with(['>', '+', '~']) {
                    joined.push(format!("{parent}{text}"));
                } else {
                    joined.push(format!("{parent} {text}"));
                }
            }
        }
        joined
    }

    fn declaration(&self, rule: &Rule) -> String {
        let colon = if self.compress { ":" } else { ": " };
        let important = match (rule.important, self.compress) {
            (false, _) => "",
            (true, false) => " !important",
            (true, true) => "!important",
        };
        format!(
            "{}{colon}{}{important}",
            rule.property,
            self.printer.expr(&rule.value)
        )
    }

    fn directive(&self, directive: &Directive) -> String {
        match &directive.value {
            Some(value) => format!("{} {};", directive.name, self.printer.expr(value)),
            None => format!("{};", directive.name),
        }
    }

    fn write_item(&self, out: &mut String, item: &Item, depth: usize) {
        match item {
            Item::Rule {
                selectors,
                declarations,
            } => {
                if selectors.is_empty() {
                    self.write_declarations(out, declarations, depth);
                    return;
                }
                let sep = if self.compress { "," } else { ", " };
                self.open(out, depth, &selectors.join(sep));
                self.write_declarations(out, declarations, depth + 1);
                self.close(out, depth);
            }
            Item::Media { features, items } => {
                self.open(out, depth, &format!("@media {features}"));
                for item in items {
                    self.write_item(out, item, depth + 1);
                }
                self.close(out, depth);
            }
            Item::Block { header, items } => {
                self.open(out, depth, header);
                for item in items {
                    self.write_item(out, item, depth + 1);
                }
                self.close(out, depth);
            }
            Item::Statement(text) => self.line(out, depth, text),
        }
    }

    fn write_declarations(&self, out: &mut String, declarations: &[String], depth: usize) {
        if self.compress {
            out.push_str(&declarations.join(";"));
            return;
        }
        for declaration in declarations {
            self.line(out, depth, &format!("{declaration};"));
        }
    }

    fn open(&self, out: &mut String, depth: usize, header: &str) {
        if self.compress {
            out.push_str(header);
            out.push('{');
        } else {
            self.line(out, depth, &format!("{header} {{"));
        }
    }

    fn close(&self, out: &mut String, depth: usize) {
        if self.compress {
            out.push('}');
        } else {
            self.line(out, depth, "}");
        }
    }

    fn line(&self, out: &mut String, depth: usize, text: &str) {
        if self.compress {
            out.push_str(text);
            return;
        }
        out.extend(std::iter::repeat(' ').take(depth * self.indent));
        out.push_str(text);
        out.push('\n');
    }
}

#[cfg(test)]
mod tests;
