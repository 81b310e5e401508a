//! Breaks parsed resume blocks into fixed-size pages.
//!
//! Every block is word-wrapped with the static font metrics, then lines are
//! poured into pages of `PageConfig::lines_per_page` slots. A blank spacing
//! line follows every block; spacing never opens a new page on its own.

use serde::Serialize;

use crate::layout::font_metrics::{get_metrics, PageConfig};
use crate::presenter::markdown::Block;

/// Each list level is indented by this many em.
pub const BULLET_INDENT_EM: f32 = 1.5;

/// Size of a heading relative to body text.
pub fn heading_scale(level: u8) -> f32 {
    match level {
        1 => 1.3,
        2 => 1.15,
        _ => 1.05,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageLine {
    Heading { level: u8, text: String },
    /// `marker` is set on the first line of an item only.
    Bullet {
        depth: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        marker: Option<String>,
        text: String,
    },
    Text { text: String },
    Rule,
    Blank,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub lines: Vec<PageLine>,
}

/// Lays `blocks` out on pages. Always returns at least one page.
pub fn paginate(blocks: &[Block], config: &PageConfig) -> Vec<Page> {
    let metrics = get_metrics(config.font);
    let width = config.text_width_em;
    let capacity = usize::from(config.lines_per_page.max(1));

    let mut lines: Vec<PageLine> = Vec::new();
    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                // Headings are set larger; shrink the usable width accordingly.
                for line in metrics.wrap(text, width / heading_scale(*level)) {
                    lines.push(PageLine::Heading {
                        level: *level,
                        text: line,
                    });
                }
            }
            Block::List(items) => {
                for item in items {
                    let indent = BULLET_INDENT_EM * (item.depth + 1) as f32;
                    let wrapped = metrics.wrap(&item.text, (width - indent).max(1.0));
                    for (i, line) in wrapped.into_iter().enumerate() {
                        let marker = (i == 0 && !item.marker.is_empty()).then(|| item.marker.clone());
                        lines.push(PageLine::Bullet {
                            depth: item.depth,
                            marker,
                            text: line,
                        });
                    }
                }
            }
            Block::Paragraph(text) => {
                for line in metrics.wrap(text, width) {
                    lines.push(PageLine::Text { text: line });
                }
            }
            Block::Rule => lines.push(PageLine::Rule),
        }
        lines.push(PageLine::Blank);
    }

    let mut pages = vec![Page::default()];
    for line in lines {
        let Some(page) = pages.last_mut() else {
            break;
        };
        if page.lines.len() == capacity {
            if line == PageLine::Blank {
                continue;
            }
            pages.push(Page { lines: vec![line] });
        } else if !(page.lines.is_empty() && line == PageLine::Blank) {
            page.lines.push(line);
        }
    }

    for page in &mut pages {
        while page.lines.last() == Some(&PageLine::Blank) {
            page.lines.pop();
        }
    }
    pages
}
