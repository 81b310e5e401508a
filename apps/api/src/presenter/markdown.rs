//! Markdown handling for generated resumes.
//!
//! Parsing is CommonMark via `pulldown-cmark`. The HTML view goes through its
//! renderer with raw HTML demoted to text, so model output can never inject
//! markup. Layout works on a flattened block model built from the same events.

use pulldown_cmark::{html, Event, Options, Parser, Tag};

/// Turns markdown into displayable rich text.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}

/// Default renderer producing an HTML fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl MarkdownRenderer for HtmlRenderer {
    fn render(&self, markdown: &str) -> String {
        let events = parser(markdown).map(|event| match event {
            Event::Html(raw) => Event::Text(raw),
            other => other,
        });
        let mut out = String::with_capacity(markdown.len() * 2);
        html::push_html(&mut out, events);
        out
    }
}

fn parser(markdown: &str) -> Parser<'_, '_> {
    Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH)
}

/// A list entry, flattened. Nested lists follow their parent item with a
/// larger `depth`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub depth: usize,
    /// `-` for bullets, `N.` for ordered items. Empty for text that follows
    /// a nested list inside the same item.
    pub marker: String,
    pub text: String,
}

/// Layout block. All text is plain: inline markup is already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Level is clamped to 1..=3.
    Heading { level: u8, text: String },
    List(Vec<ListItem>),
    Paragraph(String),
    Rule,
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    text: String,
    /// Next number per open list; `None` for bullet lists.
    lists: Vec<Option<u64>>,
    items: Vec<ListItem>,
    open_item: Option<(usize, String)>,
}

impl BlockBuilder {
    fn take_text(&mut self) -> String {
        let text = std::mem::take(&mut self.text);
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn close_item(&mut self) {
        let text = self.take_text();
        match self.open_item.take() {
            Some((depth, marker)) => self.items.push(ListItem {
                depth,
                marker,
                text,
            }),
            None if !text.is_empty() => self.items.push(ListItem {
                depth: self.lists.len().saturating_sub(1),
                marker: String::new(),
                text,
            }),
            None => {}
        }
    }

    fn close_paragraph(&mut self) {
        if self.lists.is_empty() {
            let text = self.take_text();
            if !text.is_empty() {
                self.blocks.push(Block::Paragraph(text));
            }
        } else {
            // Loose list items wrap their text in paragraphs.
            self.text.push(' ');
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::List(first)) => {
                if self.open_item.is_some() {
                    self.close_item();
                }
                self.lists.push(first);
            }
            Event::End(Tag::List(_)) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blocks.push(Block::List(std::mem::take(&mut self.items)));
                }
            }
            Event::Start(Tag::Item) => {
                self.text.clear();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}.");
                        *n += 1;
                        marker
                    }
                    _ => "-".to_string(),
                };
                self.open_item = Some((depth, marker));
            }
            Event::End(Tag::Item) => self.close_item(),
            Event::End(Tag::Heading(level, _, _)) => {
                let text = self.take_text();
                self.blocks.push(Block::Heading {
                    level: (level as u8).clamp(1, 3),
                    text,
                });
            }
            Event::End(Tag::Paragraph) | Event::End(Tag::CodeBlock(_)) => self.close_paragraph(),
            Event::End(Tag::Link(_, url, _)) | Event::End(Tag::Image(_, url, _)) => {
                if !url.is_empty() && !self.text.contains(&*url) {
                    self.text.push_str(&format!(" ({url})"));
                }
            }
            Event::Text(text) | Event::Code(text) | Event::Html(text) => self.text.push_str(&text),
            Event::SoftBreak | Event::HardBreak => self.text.push(' '),
            Event::Rule if self.lists.is_empty() => self.blocks.push(Block::Rule),
            _ => {}
        }
    }
}

pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    let mut builder = BlockBuilder::default();
    for event in parser(markdown) {
        builder.handle(event);
    }
    builder.blocks
}
