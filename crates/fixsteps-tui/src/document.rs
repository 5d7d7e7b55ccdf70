//! Step documents: plain text where each `# Heading` starts a new step.
//!
//! ```text
//! Optional intro text before the first heading.
//!
//! # Getting started {#start}
//! Body lines...
//!
//! # Next part
//! ```
//!
//! The step id is the `{#anchor}` when present, otherwise the slugified
//! heading. Non-blank text before the first heading becomes an `intro` step.

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use fixsteps_core::{Error, Result};
use regex::Regex;

/// One step of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub title: Option<String>,
    pub body: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    sections: Vec<Section>,
}

fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| {
        Regex::new(r"^#\s+(?P<title>.*?)(?:\s*\{#(?P<id>[A-Za-z0-9_-]+)\})?\s*$")
            .expect("heading pattern is valid")
    })
}

impl Document {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut sections: Vec<Section> = Vec::new();
        let mut preamble: Vec<String> = Vec::new();

        for line in text.lines() {
            if let Some(caps) = heading_regex().captures(line) {
                let title = caps["title"].trim().to_string();
                let id = match caps.name("id") {
                    Some(anchor) => anchor.as_str().to_string(),
                    None => slugify(&title),
                };
                let id = if id.is_empty() {
                    format!("step-{}", sections.len() + 1)
                } else {
                    id
                };
                sections.push(Section {
                    id,
                    title: Some(title),
                    body: Vec::new(),
                });
            } else if let Some(section) = sections.last_mut() {
                section.body.push(line.to_string());
            } else {
                preamble.push(line.to_string());
            }
        }

        if preamble.iter().any(|l| !l.trim().is_empty()) {
            sections.insert(
                0,
                Section {
                    id: "intro".to_string(),
                    title: None,
                    body: preamble,
                },
            );
        }

        if sections.is_empty() {
            return Err(Error::Document("document has no steps".to_string()));
        }

        let mut seen = HashSet::new();
        for section in &mut sections {
            trim_blank_edges(&mut section.body);
            if !seen.insert(section.id.clone()) {
                return Err(Error::DuplicateStep(section.id.clone()));
            }
        }

        Ok(Self { sections })
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Lowercase alphanumerics, everything else collapsed into single dashes
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn trim_blank_edges(lines: &mut Vec<String>) {
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|l| l.trim().is_empty()).count();
    lines.drain(..leading);
}
