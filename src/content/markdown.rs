//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};

use super::error::Result;
use super::highlight::{html_escape, CodeHighlighter};
use crate::config::{HighlightConfig, MarkdownConfig};

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    highlighter: CodeHighlighter,
    options: Options,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(&MarkdownConfig::default(), &HighlightConfig::default())
    }

    /// Create with custom settings
    pub fn with_options(markdown: &MarkdownConfig, highlight: &HighlightConfig) -> Self {
        // YAML metadata blocks stay off; FrontMatter::parse() strips them first
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, markdown.tables);
        options.set(Options::ENABLE_FOOTNOTES, markdown.footnotes);
        options.set(Options::ENABLE_STRIKETHROUGH, markdown.strikethrough);
        options.set(Options::ENABLE_TASKLISTS, markdown.tasklists);
        options.set(Options::ENABLE_HEADING_ATTRIBUTES, markdown.heading_attributes);
        options.set(Options::ENABLE_SMART_PUNCTUATION, markdown.smart_punctuation);

        Self {
            highlighter: CodeHighlighter::new(highlight),
            options,
        }
    }

    /// Render markdown to HTML, degrading to an empty string on failure
    pub fn render(&self, markdown: &str) -> String {
        or_empty(self.try_render(markdown))
    }

    /// Render markdown to HTML
    pub fn try_render(&self, markdown: &str) -> Result<String> {
        let parser = Parser::new_ext(markdown, self.options);

        let mut events: Vec<Event> = Vec::new();
        // Some(lang) while inside a code block; lang is empty when undeclared
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    code_block_lang = Some(match kind {
                        CodeBlockKind::Fenced(info) => fence_language(&info).to_string(),
                        CodeBlockKind::Indented => String::new(),
                    });
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let lang = code_block_lang.take().unwrap_or_default();
                    let block = if lang.is_empty() {
                        format!("<pre><code>{}</code></pre>\n", html_escape(&code_block_content))
                    } else {
                        let mut highlighted =
                            self.highlighter.highlight(&code_block_content, &lang)?;
                        highlighted.push('\n');
                        highlighted
                    };
                    events.push(Event::Html(CowStr::from(block)));
                }
                Event::Text(text) if code_block_lang.is_some() => {
                    code_block_content.push_str(&text);
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Language token of a fence info string (```rust title="main.rs" -> rust)
fn fence_language(info: &str) -> &str {
    info.split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .unwrap_or("")
}

fn or_empty(rendered: Result<String>) -> String {
    match rendered {
        Ok(html) => html,
        Err(e) => {
            tracing::error!("Error processing markdown: {}", e);
            String::new()
        }
    }
}
