//! Markdown to node tree conversion.
//!
//! Raw markdown is parsed with pulldown-cmark and folded into the same
//! [`Node`] tree that compiled documents deserialize into. Raw HTML in the
//! source is kept as text and therefore escaped on output.

use std::collections::BTreeMap;

use pulldown_cmark::{
    Alignment, BlockQuoteKind, CodeBlockKind, Event, HeadingLevel, MetadataBlockKind, Options,
    Parser, Tag, TagEnd,
};

use crate::node::{Element, Node};

/// Parsed markdown: node tree plus optional YAML front matter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkdownDocument {
    pub nodes: Vec<Node>,
    /// Raw YAML between the leading `---` fences, if present.
    pub front_matter: Option<String>,
}

/// Parser options: GFM tables, strikethrough, task lists and alerts, plus
/// YAML front matter.
#[must_use]
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
}

/// Parse markdown text into a node tree.
#[must_use]
pub fn parse_markdown(markdown: &str) -> MarkdownDocument {
    let mut builder = TreeBuilder::default();
    for event in Parser::new_ext(markdown, parser_options()) {
        builder.process_event(event);
    }
    builder.finish()
}

/// Map a GFM alert marker to a callout type name.
pub(crate) fn alert_callout_type(kind: BlockQuoteKind) -> &'static str {
    match kind {
        BlockQuoteKind::Note => "note",
        BlockQuoteKind::Tip => "tip",
        BlockQuoteKind::Important => "info",
        BlockQuoteKind::Warning => "warning",
        BlockQuoteKind::Caution => "danger",
    }
}

/// Split a fence info string into language and `key=value` attributes.
///
/// Bare words after the language become flags with an empty value, so
/// `rust showLineNumbers title="main.rs"` yields `showLineNumbers` and `title`.
pub(crate) fn parse_fence_info(info: &str) -> (String, BTreeMap<String, String>) {
    let mut parts = info.split_whitespace();
    let language = parts.next().unwrap_or("").to_owned();

    let mut attrs = BTreeMap::new();
    for part in parts {
        if let Some((key, value)) = part.split_once('=') {
            let value = value.trim_matches('"').trim_matches('\'');
            attrs.insert(key.to_owned(), value.to_owned());
        } else {
            attrs.insert(part.to_owned(), String::new());
        }
    }

    (language, attrs)
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[derive(Default)]
struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    cell_index: usize,
}

impl TableState {
    fn alignment_style(&self) -> Option<&'static str> {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => Some("text-align:left"),
            Some(Alignment::Center) => Some("text-align:center"),
            Some(Alignment::Right) => Some("text-align:right"),
            Some(Alignment::None) | None => None,
        }
    }
}

#[derive(Default)]
struct TreeBuilder {
    roots: Vec<Node>,
    stack: Vec<Element>,
    table: TableState,
    front_matter: Option<String>,
    in_metadata: bool,
}

impl TreeBuilder {
    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) if self.in_metadata => {
                self.front_matter
                    .get_or_insert_with(String::new)
                    .push_str(&text);
            }
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => self.text(&text),
            Event::Code(code) => {
                self.push_node(Element::new("code").with_text(code.as_ref()).into());
            }
            Event::SoftBreak => self.text("\n"),
            Event::HardBreak => self.push_node(Element::new("br").into()),
            Event::Rule => self.push_node(Element::new("hr").into()),
            Event::TaskListMarker(checked) => {
                let mut input = Element::new("input")
                    .with_attr("type", "checkbox")
                    .with_attr("disabled", "");
                if checked {
                    input = input.with_attr("checked", "");
                }
                self.push_node(input.into());
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open(Element::new("p")),
            Tag::Heading { level, id, .. } => {
                let mut el = Element::new(format!("h{}", heading_level_to_num(level)));
                if let Some(id) = id {
                    el = el.with_attr("id", id.as_ref());
                }
                self.open(el);
            }
            Tag::BlockQuote(kind) => {
                let mut el = Element::new("blockquote");
                if let Some(kind) = kind {
                    el = el.with_attr("data-callout", alert_callout_type(kind));
                }
                self.open(el);
            }
            Tag::CodeBlock(kind) => {
                let mut code = Element::new("code");
                if let CodeBlockKind::Fenced(info) = kind {
                    let (lang, mut attrs) = parse_fence_info(&info);
                    // The language class always leads; fence classes follow it.
                    let mut classes = Vec::new();
                    if !lang.is_empty() {
                        classes.push(format!("language-{lang}"));
                    }
                    if let Some(extra) = attrs.remove("class") {
                        classes.extend(extra.split_whitespace().map(str::to_owned));
                    }
                    code.attrs.extend(attrs);
                    if !classes.is_empty() {
                        code = code.with_attr("class", classes.join(" "));
                    }
                }
                self.open(Element::new("pre"));
                self.open(code);
            }
            Tag::List(start) => match start {
                Some(1) => self.open(Element::new("ol")),
                Some(n) => self.open(Element::new("ol").with_attr("start", n.to_string())),
                None => self.open(Element::new("ul")),
            },
            Tag::Item => self.open(Element::new("li")),
            Tag::MetadataBlock(MetadataBlockKind::YamlStyle) => self.in_metadata = true,
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.open(Element::new("dl")),
            Tag::DefinitionListTitle => self.open(Element::new("dt")),
            Tag::DefinitionListDefinition => self.open(Element::new("dd")),
            Tag::Table(alignments) => {
                self.table = TableState {
                    alignments,
                    ..TableState::default()
                };
                self.open(Element::new("table"));
            }
            Tag::TableHead => {
                self.table.in_head = true;
                self.table.cell_index = 0;
                self.open(Element::new("thead"));
                self.open(Element::new("tr"));
            }
            Tag::TableRow => {
                if self.stack.last().is_some_and(|el| el.name == "table") {
                    self.open(Element::new("tbody"));
                }
                self.table.cell_index = 0;
                self.open(Element::new("tr"));
            }
            Tag::TableCell => {
                let mut cell = Element::new(if self.table.in_head { "th" } else { "td" });
                if let Some(style) = self.table.alignment_style() {
                    cell = cell.with_attr("style", style);
                }
                self.open(cell);
            }
            Tag::Emphasis => self.open(Element::new("em")),
            Tag::Strong => self.open(Element::new("strong")),
            Tag::Strikethrough => self.open(Element::new("s")),
            Tag::Superscript => self.open(Element::new("sup")),
            Tag::Subscript => self.open(Element::new("sub")),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut el = Element::new("a").with_attr("href", dest_url.as_ref());
                if !title.is_empty() {
                    el = el.with_attr("title", title.as_ref());
                }
                self.open(el);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let mut el = Element::new("img").with_attr("src", dest_url.as_ref());
                if !title.is_empty() {
                    el = el.with_attr("title", title.as_ref());
                }
                self.open(el);
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::CodeBlock | TagEnd::TableHead => {
                self.close();
                self.close();
                self.table.in_head = false;
            }
            TagEnd::Table => {
                if self.stack.last().is_some_and(|el| el.name == "tbody") {
                    self.close();
                }
                self.close();
            }
            TagEnd::TableCell => {
                self.close();
                self.table.cell_index += 1;
            }
            TagEnd::Image => {
                // Alt text arrives as child events; fold it into the attribute.
                if let Some(mut img) = self.stack.pop() {
                    let alt = img.text_content();
                    img.children.clear();
                    img.attrs.insert("alt".to_owned(), alt);
                    self.push_node(img.into());
                }
            }
            TagEnd::MetadataBlock(MetadataBlockKind::YamlStyle) => self.in_metadata = false,
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::BlockQuote(_)
            | TagEnd::List(_)
            | TagEnd::Item
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition
            | TagEnd::TableRow
            | TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Superscript
            | TagEnd::Subscript
            | TagEnd::Link => self.close(),
        }
    }

    fn open(&mut self, el: Element) {
        self.stack.push(el);
    }

    fn close(&mut self) {
        if let Some(el) = self.stack.pop() {
            self.push_node(el.into());
        }
    }

    fn children_mut(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.roots,
        }
    }

    fn push_node(&mut self, node: Node) {
        self.children_mut().push(node);
    }

    fn text(&mut self, text: &str) {
        let children = self.children_mut();
        if let Some(Node::Text(last)) = children.last_mut() {
            last.push_str(text);
        } else {
            children.push(Node::text(text));
        }
    }

    fn finish(mut self) -> MarkdownDocument {
        while !self.stack.is_empty() {
            self.close();
        }
        MarkdownDocument {
            nodes: self.roots,
            front_matter: self.front_matter,
        }
    }
}
