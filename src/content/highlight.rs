//! Dual-theme syntax highlighting for fenced code blocks
//!
//! Each token carries its light and dark colors as CSS custom properties,
//! so the page picks a palette with a single rule and supplies its own
//! background.

use std::fmt::Write;

use syntect::easy::ScopeRangeIterator;
use syntect::highlighting::{FontStyle, Highlighter, Style, Theme, ThemeSet};
use syntect::parsing::{ParseState, ScopeStack, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::error::{ContentError, Result};
use crate::config::HighlightConfig;

/// Highlights code with a light and a dark syntect theme at once
pub struct CodeHighlighter {
    syntax_set: SyntaxSet,
    light: NamedTheme,
    dark: NamedTheme,
}

struct NamedTheme {
    name: String,
    theme: Theme,
}

impl CodeHighlighter {
    /// Create a highlighter with the given theme names
    ///
    /// Unknown names fall back to the default light/dark pair.
    pub fn new(config: &HighlightConfig) -> Self {
        let theme_set = ThemeSet::load_defaults();
        let defaults = HighlightConfig::default();
        let light = take_theme(&theme_set, &config.light_theme, &defaults.light_theme);
        let dark = take_theme(&theme_set, &config.dark_theme, &defaults.dark_theme);

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            light,
            dark,
        }
    }

    /// Names of the themes actually in use, light first
    pub fn theme_names(&self) -> (&str, &str) {
        (&self.light.name, &self.dark.name)
    }

    /// Highlight a code block whose fence declared `lang`
    pub fn highlight(&self, code: &str, lang: &str) -> Result<String> {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let light = Highlighter::new(&self.light.theme);
        let dark = Highlighter::new(&self.dark.theme);
        let mut parse_state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();

        let lang = html_escape(lang);
        let mut html = format!(
            r#"<figure data-code-figure=""><pre data-language="{lang}" data-theme="{} {}"><code data-language="{lang}">"#,
            html_escape(&self.light.name),
            html_escape(&self.dark.name),
        );

        let mut first = true;
        for line in LinesWithEndings::from(code) {
            let ops = parse_state
                .parse_line(line, &self.syntax_set)
                .map_err(|e| ContentError::Render(e.to_string()))?;

            if !first {
                html.push('\n');
            }
            first = false;
            html.push_str(r#"<span data-line="">"#);

            let text = line.trim_end_matches(['\n', '\r']);
            let mut pending: Option<(Style, Style, String)> = None;
            for (range, op) in ScopeRangeIterator::new(&ops, line) {
                stack
                    .apply(op)
                    .map_err(|e| ContentError::Render(format!("{:?}", e)))?;
                let range = range.start.min(text.len())..range.end.min(text.len());
                if range.is_empty() {
                    continue;
                }

                let light_style = light.style_for_stack(stack.as_slice());
                let dark_style = dark.style_for_stack(stack.as_slice());
                let piece = &text[range];

                // Merge neighbours that render identically
                let merge = matches!(
                    &pending,
                    Some((l, d, _)) if same_look(l, &light_style) && same_look(d, &dark_style)
                );
                if merge {
                    if let Some((_, _, buf)) = pending.as_mut() {
                        buf.push_str(piece);
                    }
                } else {
                    if let Some((l, d, buf)) = pending.take() {
                        push_token(&mut html, &l, &d, &buf);
                    }
                    pending = Some((light_style, dark_style, piece.to_string()));
                }
            }
            if let Some((l, d, buf)) = pending {
                push_token(&mut html, &l, &d, &buf);
            }

            html.push_str("</span>");
        }

        html.push_str("</code></pre></figure>");
        Ok(html)
    }
}

fn take_theme(theme_set: &ThemeSet, wanted: &str, fallback: &str) -> NamedTheme {
    if let Some(theme) = theme_set.themes.get(wanted) {
        return NamedTheme {
            name: wanted.to_string(),
            theme: theme.clone(),
        };
    }

    tracing::warn!(
        "Unknown highlight theme {:?}, falling back to {:?}",
        wanted,
        fallback
    );
    let theme = theme_set
        .themes
        .get(fallback)
        .cloned()
        .or_else(|| theme_set.themes.values().next().cloned())
        .unwrap_or_default();
    NamedTheme {
        name: fallback.to_string(),
        theme,
    }
}

fn same_look(a: &Style, b: &Style) -> bool {
    a.foreground == b.foreground && a.font_style == b.font_style
}

fn push_token(html: &mut String, light: &Style, dark: &Style, text: &str) {
    html.push_str(r#"<span style=""#);
    push_style_vars(html, "light", light);
    html.push(';');
    push_style_vars(html, "dark", dark);
    html.push_str(r#"">"#);
    html.push_str(&html_escape(text));
    html.push_str("</span>");
}

fn push_style_vars(html: &mut String, variant: &str, style: &Style) {
    let c = style.foreground;
    let _ = write!(
        html,
        "--code-{variant}:#{:02x}{:02x}{:02x}",
        c.r, c.g, c.b
    );
    if style.font_style.contains(FontStyle::ITALIC) {
        let _ = write!(html, ";--code-{variant}-font-style:italic");
    }
    if style.font_style.contains(FontStyle::BOLD) {
        let _ = write!(html, ";--code-{variant}-font-weight:bold");
    }
}

/// Simple HTML escaping
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
