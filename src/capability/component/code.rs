//! Highlighted code blocks.
//!
//! Tokens are wrapped in Prism class names (`token keyword`, `token string`,
//! `token comment`, `token number`) so existing Prism themes apply.

use crate::capability::BlockComponent;
use crate::capability::grammar::{Grammar, GrammarSet};
use crate::record::{Block, text};
use crate::render::RenderContext;
use crate::utils::html::{self, escape};

pub struct CodeBlock {
    grammars: GrammarSet,
}

impl CodeBlock {
    pub fn new(grammars: GrammarSet) -> Self {
        Self { grammars }
    }

    /// Highlighted HTML for `source`. Unknown languages are escaped only.
    pub fn highlight(&self, source: &str, language: &str) -> String {
        match self.grammars.for_language(language) {
            Some(grammar) => highlight(source, grammar),
            None => escape(source).into_owned(),
        }
    }
}

impl BlockComponent for CodeBlock {
    fn render(&self, block: &Block, _cx: &RenderContext<'_>) -> String {
        let source = block.property("title").map(text::plain).unwrap_or_default();
        let language = block
            .property("language")
            .map(text::plain)
            .unwrap_or_default();

        let class = format!(
            "language-{}",
            language.trim().to_ascii_lowercase().replace(' ', "-")
        );
        let code = html::element("code", &[("class", &class)], &self.highlight(&source, &language));
        html::element("pre", &[("class", &format!("notion-code {class}"))], &code)
    }
}

fn highlight(source: &str, grammar: &Grammar) -> String {
    let line_comment = grammar.line_comment.as_deref().filter(|m| !m.is_empty());
    let block_comment = grammar
        .block_comment
        .as_ref()
        .filter(|(open, close)| !open.is_empty() && !close.is_empty());

    let mut out = String::with_capacity(source.len() * 2);
    let mut rest = source;

    while let Some(c) = rest.chars().next() {
        let end = if let Some(marker) = line_comment
            && rest.starts_with(marker)
        {
            let end = rest.find('\n').unwrap_or(rest.len());
            push_token(&mut out, "comment", &rest[..end]);
            end
        } else if let Some((open, close)) = block_comment
            && rest.starts_with(open.as_str())
        {
            let end = rest[open.len()..]
                .find(close.as_str())
                .map_or(rest.len(), |i| open.len() + i + close.len());
            push_token(&mut out, "comment", &rest[..end]);
            end
        } else if grammar.quotes.contains(&c) {
            let end = string_end(rest, c);
            push_token(&mut out, "string", &rest[..end]);
            end
        } else if is_word_start(c) {
            let end = rest
                .find(|ch: char| !is_word_char(ch))
                .unwrap_or(rest.len());
            let word = &rest[..end];
            if grammar.is_keyword(word) {
                push_token(&mut out, "keyword", word);
            } else {
                out.push_str(&escape(word));
            }
            end
        } else if c.is_ascii_digit() {
            let end = rest
                .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '.' || ch == '_'))
                .unwrap_or(rest.len());
            push_token(&mut out, "number", &rest[..end]);
            end
        } else {
            let end = c.len_utf8();
            out.push_str(&escape(&rest[..end]));
            end
        };

        rest = &rest[end..];
    }

    out
}

#[inline]
fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '@'
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '@'
}

/// Byte offset just past the closing quote. Strings stop at a newline.
fn string_end(s: &str, quote: char) -> usize {
    let mut escaped = false;
    for (i, ch) in s.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '\n' => return i,
            c if c == quote => return i + c.len_utf8(),
            _ => {}
        }
    }
    s.len()
}

fn push_token(out: &mut String, kind: &str, token: &str) {
    out.push_str("<span class=\"token ");
    out.push_str(kind);
    out.push_str("\">");
    out.push_str(&escape(token));
    out.push_str("</span>");
}
