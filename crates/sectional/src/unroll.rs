// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Block loop unrolling.
//!
//! ```liquid
//! {% for block in section.blocks %}<p>{{ block.settings.title }}</p>{% endfor %}
//! ```
//!
//! becomes one guarded copy per possible block:
//!
//! ```liquid
//! {% if blocks_count > 0 %}<p>{{ block_0_title }}</p>{% endif %}
//! {% if blocks_count > 1 %}<p>{{ block_1_title }}</p>{% endif %}
//! ...
//! ```
//!
//! Loops are located with a tag scanner that tracks block depth, so the
//! matching `{% endfor %}` is found even when the body contains other block
//! tags. A body that contains any iteration tag, including a `for` line inside
//! `{% liquid %}`, is left untouched.
//!
//! `forloop.index`, `index0`, `first` and `length` become constants or
//! `blocks_count`. `forloop.last` is rewritten inside `if`, `elsif` and
//! `unless` conditions only. `forloop.rindex` and `rindex0` are left as written.

use crate::resources::ResourcePickers;
use crate::rewrite::{captured_key, flat_target, settings_accessor_pattern};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::ops::Range;
use tracing::{debug, warn};

/// Default number of copies emitted per loop.
pub const DEFAULT_MAX_BLOCKS: usize = 10;

lazy_static! {
    static ref TAG: Regex = Regex::new(r"(?s)\{%-?\s*(\w+)(.*?)-?%\}").expect("tag pattern");
    static ref BLOCK_LOOP: Regex =
        Regex::new(r"^\s*(\w+)\s+in\s+section\.blocks\s*$").expect("block loop pattern");
    static ref FORLOOP: Regex =
        Regex::new(r"\bforloop\.(index0|index|first|length)\b").expect("forloop pattern");
    static ref CONDITION_TAG: Regex =
        Regex::new(r"(?s)(\{%-?\s*(?:if|elsif|unless)\b)(.*?)(-?%\})").expect("condition tag pattern");
    static ref FORLOOP_LAST: Regex = Regex::new(r"\bforloop\.last\b").expect("forloop.last pattern");
}

const ITERATION_TAGS: [&str; 3] = ["for", "tablerow", "paginate"];

const BLOCK_TAGS: [&str; 12] = [
    "for", "tablerow", "paginate", "if", "unless", "case", "capture", "form", "style",
    "javascript", "stylesheet", "schema",
];

/// Unroller settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnrollOptions {
    /// Guarded copies emitted per loop.
    #[serde(default = "default_max_blocks")]
    pub max_blocks: usize,
}

fn default_max_blocks() -> usize {
    DEFAULT_MAX_BLOCKS
}

impl Default for UnrollOptions {
    fn default() -> Self {
        Self {
            max_blocks: default_max_blocks(),
        }
    }
}

/// Result of an unrolling pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrollOutcome {
    /// The rewritten template.
    pub code: String,
    /// Loops replaced by guarded copies.
    pub unrolled: usize,
    /// Loops left as written because their body iterates.
    pub skipped_nested: usize,
}

#[derive(Debug)]
struct Tag<'a> {
    name: &'a str,
    markup: &'a str,
    span: Range<usize>,
}

/// Tags in source order. Tags inside `raw` and `comment` are not reported.
fn scan_tags(code: &str) -> Vec<Tag<'_>> {
    let mut tags = Vec::new();
    let mut verbatim_until: Option<&'static str> = None;

    for caps in TAG.captures_iter(code) {
        let (Some(whole), Some(name), Some(markup)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let name = name.as_str();

        if let Some(end) = verbatim_until {
            if name == end {
                verbatim_until = None;
            }
            continue;
        }
        match name {
            "raw" => verbatim_until = Some("endraw"),
            "comment" => verbatim_until = Some("endcomment"),
            _ => tags.push(Tag {
                name,
                markup: markup.as_str(),
                span: whole.range(),
            }),
        }
    }

    tags
}

/// A `for <var> in section.blocks` loop located by the scanner.
struct BlockLoop<'a> {
    var: &'a str,
    span: Range<usize>,
    body: Range<usize>,
    else_body: Option<Range<usize>>,
    nested: bool,
}

/// Finds the tag closing `tags[open]`, noting iteration and a loop-level `else`.
///
/// Returns the index of the closing tag.
fn match_loop<'a>(tags: &[Tag<'a>], open: usize, var: &'a str) -> Option<(BlockLoop<'a>, usize)> {
    let mut stack: Vec<&str> = Vec::new();
    let mut nested = false;
    let mut else_tag: Option<usize> = None;

    for (index, tag) in tags.iter().enumerate().skip(open + 1) {
        if ITERATION_TAGS.contains(&tag.name) || (tag.name == "liquid" && liquid_iterates(tag.markup)) {
            nested = true;
        }

        if BLOCK_TAGS.contains(&tag.name) {
            stack.push(tag.name);
        } else if let Some(closed) = tag.name.strip_prefix("end") {
            if stack.is_empty() {
                if closed != "for" {
                    debug!("Ignoring stray {{% {} %}} inside block loop", tag.name);
                    continue;
                }
                let open_tag = &tags[open];
                let body_end = else_tag.map(|e| tags[e].span.start).unwrap_or(tag.span.start);
                let found = BlockLoop {
                    var,
                    span: open_tag.span.start..tag.span.end,
                    body: open_tag.span.end..body_end,
                    else_body: else_tag.map(|e| tags[e].span.end..tag.span.start),
                    nested,
                };
                return Some((found, index));
            }
            if let Some(pos) = stack.iter().rposition(|&open_name| open_name == closed) {
                stack.truncate(pos);
            }
        } else if tag.name == "else" && stack.is_empty() {
            else_tag = Some(index);
        }
    }

    None
}

/// True when a `{% liquid %}` tag opens an iteration on any of its lines.
fn liquid_iterates(markup: &str) -> bool {
    markup
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .any(|word| ITERATION_TAGS.contains(&word))
}

/// Loop-variable patterns for one loop, compiled once and applied per copy.
struct BodyRewriter<'a> {
    settings: Regex,
    field: Regex,
    pickers: &'a ResourcePickers,
}

impl<'a> BodyRewriter<'a> {
    fn new(var: &str, pickers: &'a ResourcePickers) -> Option<Self> {
        let var = regex::escape(var);
        let settings = Regex::new(&settings_accessor_pattern(&var)).ok()?;
        let field = Regex::new(&format!(r"\b{var}\.(type|id)\b")).ok()?;
        Some(Self {
            settings,
            field,
            pickers,
        })
    }

    /// Rewrites loop-variable references in the copy for `index`.
    fn rewrite(&self, body: &str, index: usize) -> String {
        let prefix = format!("block_{}", index);

        let result = self.settings.replace_all(body, |caps: &Captures| {
            captured_key(caps, &[1, 2, 3])
                .and_then(|key| flat_target(&prefix, key, self.pickers))
                .unwrap_or_else(|| caps[0].to_string())
        });
        let result = self
            .field
            .replace_all(&result, |caps: &Captures| format!("{}_{}", prefix, &caps[1]));
        let result = FORLOOP.replace_all(&result, |caps: &Captures| match &caps[1] {
            "index0" => index.to_string(),
            "index" => (index + 1).to_string(),
            "first" => (index == 0).to_string(),
            _ => "blocks_count".to_string(),
        });
        // Copy `index` is the last one exactly when `blocks_count == index + 1`
        let last = format!("blocks_count == {}", index + 1);
        CONDITION_TAG
            .replace_all(&result, |caps: &Captures| {
                format!("{}{}{}", &caps[1], FORLOOP_LAST.replace_all(&caps[2], last.as_str()), &caps[3])
            })
            .into_owned()
    }
}

fn unroll(code: &str, block_loop: &BlockLoop<'_>, max_blocks: usize, pickers: &ResourcePickers) -> Option<String> {
    let rewriter = BodyRewriter::new(block_loop.var, pickers)?;
    let body = &code[block_loop.body.clone()];
    let mut copies: Vec<String> = (0..max_blocks)
        .map(|i| format!("{{% if blocks_count > {} %}}{}{{% endif %}}", i, rewriter.rewrite(body, i)))
        .collect();

    if let Some(else_body) = &block_loop.else_body {
        copies.push(format!(
            "{{% if blocks_count == 0 %}}{}{{% endif %}}",
            &code[else_body.clone()]
        ));
    }

    Some(copies.join("\n"))
}

/// Replaces every `for … in section.blocks` loop with guarded copies.
///
/// Input without such a loop is returned unchanged. Each loop restarts its
/// copy numbering at `0`.
pub fn unroll_block_loops(code: &str, options: &UnrollOptions, pickers: &ResourcePickers) -> UnrollOutcome {
    let tags = scan_tags(code);
    let mut out = String::with_capacity(code.len());
    let mut cursor = 0;
    let mut unrolled = 0;
    let mut skipped_nested = 0;

    let mut index = 0;
    while index < tags.len() {
        let tag = &tags[index];
        let var = match BLOCK_LOOP.captures(tag.markup) {
            Some(caps) if tag.name == "for" => caps.get(1).map(|m| m.as_str()),
            _ => None,
        };
        let Some(var) = var else {
            index += 1;
            continue;
        };

        let Some((block_loop, close)) = match_loop(&tags, index, var) else {
            warn!("Block loop without matching endfor, leaving the rest of the template as written");
            break;
        };

        out.push_str(&code[cursor..block_loop.span.start]);
        if block_loop.nested {
            warn!("Nested loop inside block loop, skipping unroll");
            out.push_str(&code[block_loop.span.clone()]);
            skipped_nested += 1;
        } else if let Some(copies) = unroll(code, &block_loop, options.max_blocks, pickers) {
            out.push_str(&copies);
            unrolled += 1;
        } else {
            out.push_str(&code[block_loop.span.clone()]);
        }
        cursor = block_loop.span.end;
        index = close + 1;
    }

    out.push_str(&code[cursor..]);

    UnrollOutcome {
        code: out,
        unrolled,
        skipped_nested,
    }
}

/// Unrolls with default options and no schema pickers.
pub fn unroll_block_loops_default(code: &str) -> String {
    unroll_block_loops(code, &UnrollOptions::default(), &ResourcePickers::new()).code
}
