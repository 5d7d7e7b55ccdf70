//! Lays a [`Document`] out as one tall column of terminal rows and measures
//! where each step starts.

use fixsteps_core::{Error, MeasuredStep, Result, StepLayout, StepSource};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::document::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading,
    Body,
    /// Filler that stretches a short step to a full viewport
    Padding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub text: String,
    pub kind: LineKind,
    /// Index of the step this row belongs to
    pub step: usize,
}

#[derive(Debug, Clone)]
pub struct DocumentLayout {
    lines: Vec<RenderedLine>,
    steps: StepLayout,
}

impl DocumentLayout {
    /// Wrap every section to `width` columns and stretch each one to at
    /// least `viewport_height` rows. Offsets are terminal rows, so the whole
    /// column must fit in `u16`.
    pub fn compute(document: &Document, width: u16, viewport_height: u16) -> Result<Self> {
        let mut lines = Vec::new();
        let mut steps = Vec::with_capacity(document.len());

        for (index, section) in document.sections().iter().enumerate() {
            let top = lines.len();

            if let Some(title) = &section.title {
                for row in wrap(title, width) {
                    lines.push(RenderedLine {
                        text: row,
                        kind: LineKind::Heading,
                        step: index,
                    });
                }
                lines.push(RenderedLine {
                    text: String::new(),
                    kind: LineKind::Body,
                    step: index,
                });
            }
            for body_line in &section.body {
                for row in wrap(body_line, width) {
                    lines.push(RenderedLine {
                        text: row,
                        kind: LineKind::Body,
                        step: index,
                    });
                }
            }
            while lines.len() - top < viewport_height as usize {
                lines.push(RenderedLine {
                    text: String::new(),
                    kind: LineKind::Padding,
                    step: index,
                });
            }

            let bottom = row(lines.len()).ok_or_else(|| {
                Error::Document(format!(
                    "document too tall: step '{}' ends past row {}",
                    section.id,
                    u16::MAX
                ))
            })?;
            let top = row(top).unwrap_or(bottom);
            steps.push(MeasuredStep {
                id: section.id.clone(),
                top,
                height: bottom - top,
            });
        }

        Ok(Self {
            lines,
            steps: StepLayout {
                viewport_height,
                steps,
            },
        })
    }

    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    /// Rows visible from `scroll` in a viewport of `height`
    pub fn visible(&self, scroll: u16, height: u16) -> &[RenderedLine] {
        let start = (scroll as usize).min(self.lines.len());
        let end = (start + height as usize).min(self.lines.len());
        &self.lines[start..end]
    }

    pub fn total_height(&self) -> u16 {
        // Bounded by compute
        row(self.lines.len()).unwrap_or(u16::MAX)
    }

    pub fn viewport_height(&self) -> u16 {
        self.steps.viewport_height
    }

    /// Largest offset that still fills the viewport
    pub fn max_scroll(&self) -> u16 {
        self.total_height().saturating_sub(self.steps.viewport_height)
    }

    pub fn step_layout(&self) -> &StepLayout {
        &self.steps
    }
}

impl StepSource for DocumentLayout {
    fn measure(&self) -> Result<StepLayout> {
        Ok(self.steps.clone())
    }
}

fn row(n: usize) -> Option<u16> {
    u16::try_from(n).ok()
}

/// Greedy word wrap by display width. Words wider than the line are split.
pub fn wrap(text: &str, width: u16) -> Vec<String> {
    let width = width.max(1) as usize;
    if text.trim().is_empty() {
        return vec![String::new()];
    }

    let mut rows = Vec::new();
    let mut row = String::new();
    let mut row_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        let gap = usize::from(row_width > 0);

        if row_width + gap + word_width <= width {
            if gap == 1 {
                row.push(' ');
            }
            row.push_str(word);
            row_width += gap + word_width;
            continue;
        }

        if row_width > 0 {
            rows.push(std::mem::take(&mut row));
            row_width = 0;
        }

        if word_width <= width {
            row.push_str(word);
            row_width = word_width;
        } else {
            for c in word.chars() {
                let w = c.width().unwrap_or(0);
                if row_width + w > width && row_width > 0 {
                    rows.push(std::mem::take(&mut row));
                    row_width = 0;
                }
                row.push(c);
                row_width += w;
            }
        }
    }

    if !row.is_empty() {
        rows.push(row);
    }
    rows
}
