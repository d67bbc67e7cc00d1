//! Terminal rendering of markdown
//!
//! Walks the pulldown-cmark event stream and writes styled text suitable for
//! printing before the confirmation prompt.

use colored::{ColoredString, Colorize};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use tracing::debug;

const RULE_WIDTH: usize = 40;

/// Render markdown to terminal text
///
/// With `styled` false no escape sequences are emitted.
pub fn render_markdown(markdown: &str, styled: bool) -> String {
    debug!(len = markdown.len(), styled, "render_markdown: called");
    let mut renderer = Renderer::new(styled);
    for event in Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH) {
        renderer.event(event);
    }
    renderer.finish()
}

struct Renderer {
    out: String,
    styled: bool,
    strong: usize,
    emphasis: usize,
    heading: Option<HeadingLevel>,
    lists: Vec<Option<u64>>,
    link: Option<(String, String)>,
    code_block: bool,
}

impl Renderer {
    fn new(styled: bool) -> Self {
        Self {
            out: String::new(),
            styled,
            strong: 0,
            emphasis: 0,
            heading: None,
            lists: Vec::new(),
            link: None,
            code_block: false,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if let Some((_, link_text)) = self.link.as_mut() {
                    link_text.push_str(&text);
                } else if self.code_block {
                    for line in text.lines() {
                        let line = format!("    {}", line);
                        let rendered = self.paint(&line, |s| s.dimmed());
                        self.out.push_str(&rendered);
                        self.out.push('\n');
                    }
                } else {
                    let rendered = self.inline(&text);
                    self.out.push_str(&rendered);
                }
            }
            Event::Code(code) => {
                let rendered = self.paint(&code, |s| s.yellow());
                match self.link.as_mut() {
                    Some((_, link_text)) => link_text.push_str(&code),
                    None => self.out.push_str(&rendered),
                }
            }
            Event::SoftBreak | Event::HardBreak => self.out.push('\n'),
            Event::Rule => {
                let rule = "─".repeat(RULE_WIDTH);
                let rendered = self.paint(&rule, |s| s.dimmed());
                self.out.push_str(&rendered);
                self.out.push_str("\n\n");
            }
            Event::Html(html) | Event::InlineHtml(html) => self.out.push_str(&html),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => self.heading = Some(level),
            Tag::Strong => self.strong += 1,
            Tag::Emphasis => self.emphasis += 1,
            Tag::List(first) => {
                if !self.lists.is_empty() && !self.out.ends_with('\n') {
                    self.out.push('\n');
                }
                self.lists.push(first);
            }
            Tag::Item => {
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}.", n);
                        *n += 1;
                        marker
                    }
                    _ => "•".to_string(),
                };
                self.out.push_str(&format!("{}{} ", "  ".repeat(depth), marker));
            }
            Tag::Link { dest_url, .. } => self.link = Some((dest_url.to_string(), String::new())),
            Tag::CodeBlock(_) => self.code_block = true,
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.heading = None;
                self.out.push_str("\n\n");
            }
            TagEnd::Paragraph => {
                if self.lists.is_empty() {
                    self.out.push_str("\n\n");
                } else {
                    self.out.push('\n');
                }
            }
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Item => {
                if !self.out.ends_with('\n') {
                    self.out.push('\n');
                }
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.out.push('\n');
                }
            }
            TagEnd::Link => {
                if let Some((url, text)) = self.link.take() {
                    let shown = if text.is_empty() || text == url {
                        self.paint(&url, |s| s.blue().underline())
                    } else {
                        format!("{} ({})", self.inline(&text), self.paint(&url, |s| s.blue().underline()))
                    };
                    self.out.push_str(&shown);
                }
            }
            TagEnd::CodeBlock => {
                self.code_block = false;
                self.out.push('\n');
            }
            _ => {}
        }
    }

    /// Apply the styles of the enclosing inline context
    fn inline(&self, text: &str) -> String {
        if !self.styled {
            return text.to_string();
        }

        let mut s: ColoredString = text.normal();
        match self.heading {
            Some(HeadingLevel::H1) => s = s.bold().cyan(),
            Some(_) => s = s.bold(),
            None => {}
        }
        if self.strong > 0 {
            s = s.bold();
        }
        if self.emphasis > 0 {
            s = s.italic();
        }
        s.to_string()
    }

    fn paint(&self, text: &str, style: impl FnOnce(ColoredString) -> ColoredString) -> String {
        if self.styled {
            style(text.normal()).to_string()
        } else {
            text.to_string()
        }
    }

    fn finish(self) -> String {
        let mut out = self.out.trim_end().to_string();
        out.push('\n');
        out
    }
}
