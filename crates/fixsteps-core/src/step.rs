//! Step registry: the ordered, frozen list of navigable steps and their geometry.

use std::collections::HashSet;
use std::fmt;

use crate::{Error, Result};

/// A step as measured by a [`StepSource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasuredStep {
    pub id: String,
    /// Offset of the step's top edge from the document top
    pub top: u16,
    pub height: u16,
}

/// One measurement pass over the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepLayout {
    pub viewport_height: u16,
    /// Steps in document order
    pub steps: Vec<MeasuredStep>,
}

/// Anything that can discover steps and measure their position
pub trait StepSource {
    fn measure(&self) -> Result<StepLayout>;
}

impl StepSource for StepLayout {
    fn measure(&self) -> Result<StepLayout> {
        Ok(self.clone())
    }
}

/// A registered step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    id: String,
    index: usize,
    top: u16,
    height: u16,
}

impl Step {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn top(&self) -> u16 {
        self.top
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Offset of the step's bottom edge
    pub fn bottom_edge(&self) -> u16 {
        self.top.saturating_add(self.height)
    }

    /// Scroll offset at which the step's bottom meets the viewport bottom
    pub fn viewport_bottom(&self, viewport_height: u16) -> u16 {
        self.bottom_edge().saturating_sub(viewport_height)
    }
}

/// Reference to a step by id or position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StepRef {
    Id(String),
    Index(usize),
}

impl From<&str> for StepRef {
    fn from(id: &str) -> Self {
        StepRef::Id(id.to_string())
    }
}

impl From<String> for StepRef {
    fn from(id: String) -> Self {
        StepRef::Id(id)
    }
}

impl From<usize> for StepRef {
    fn from(index: usize) -> Self {
        StepRef::Index(index)
    }
}

impl fmt::Display for StepRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepRef::Id(id) => write!(f, "#{}", id),
            StepRef::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Ordered steps, discovered once. Ids and order never change afterwards;
/// only geometry is refreshed by [`StepRegistry::remeasure`].
#[derive(Debug, Clone)]
pub struct StepRegistry {
    steps: Vec<Step>,
    viewport_height: u16,
}

impl StepRegistry {
    pub fn discover(source: &dyn StepSource) -> Result<Self> {
        let layout = source.measure()?;
        if layout.steps.is_empty() {
            return Err(Error::EmptyRegistry);
        }

        let mut seen = HashSet::new();
        for step in &layout.steps {
            if !seen.insert(step.id.clone()) {
                return Err(Error::DuplicateStep(step.id.clone()));
            }
        }

        let steps = layout
            .steps
            .into_iter()
            .enumerate()
            .map(|(index, m)| Step {
                id: m.id,
                index,
                top: m.top,
                height: m.height,
            })
            .collect();

        Ok(Self {
            steps,
            viewport_height: layout.viewport_height,
        })
    }

    /// Re-derive geometry after the layout changed
    pub fn remeasure(&mut self, source: &dyn StepSource) -> Result<()> {
        let layout = source.measure()?;
        let same_ids = layout.steps.len() == self.steps.len()
            && layout
                .steps
                .iter()
                .zip(&self.steps)
                .all(|(m, s)| m.id == s.id);

        if !same_ids {
            return Err(Error::LayoutMismatch {
                expected: self.ids().map(str::to_string).collect(),
                found: layout.steps.into_iter().map(|m| m.id).collect(),
            });
        }

        for (step, m) in self.steps.iter_mut().zip(layout.steps) {
            step.top = m.top;
            step.height = m.height;
        }
        self.viewport_height = layout.viewport_height;
        Ok(())
    }

    pub fn resolve(&self, target: &StepRef) -> Option<usize> {
        match target {
            StepRef::Id(id) => self.steps.iter().position(|s| s.id == *id),
            StepRef::Index(index) => (*index < self.steps.len()).then_some(*index),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn first(&self) -> &Step {
        // discover() rejects empty layouts
        &self.steps[0]
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.id.as_str())
    }

    pub fn viewport_height(&self) -> u16 {
        self.viewport_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(ids: &[&str], height: u16) -> StepLayout {
        StepLayout {
            viewport_height: height,
            steps: ids
                .iter()
                .enumerate()
                .map(|(i, id)| MeasuredStep {
                    id: id.to_string(),
                    top: i as u16 * height,
                    height,
                })
                .collect(),
        }
    }

    #[test]
    fn test_discover_assigns_indices() {
        let registry = StepRegistry::discover(&layout(&["a", "b", "c"], 20)).unwrap();
        assert_eq!(registry.len(), 3);
        let c = registry.get(2).unwrap();
        assert_eq!(c.id(), "c");
        assert_eq!(c.index(), 2);
        assert_eq!(c.top(), 40);
        assert_eq!(c.bottom_edge(), 60);
        assert_eq!(c.viewport_bottom(20), 40);
    }

    #[test]
    fn test_discover_rejects_empty_and_duplicates() {
        assert!(matches!(
            StepRegistry::discover(&layout(&[], 20)),
            Err(Error::EmptyRegistry)
        ));
        assert!(matches!(
            StepRegistry::discover(&layout(&["a", "b", "a"], 20)),
            Err(Error::DuplicateStep(id)) if id == "a"
        ));
    }

    #[test]
    fn test_resolve() {
        let registry = StepRegistry::discover(&layout(&["a", "b"], 10)).unwrap();
        assert_eq!(registry.resolve(&"b".into()), Some(1));
        assert_eq!(registry.resolve(&"zzz".into()), None);
        assert_eq!(registry.resolve(&StepRef::Index(0)), Some(0));
        assert_eq!(registry.resolve(&StepRef::Index(2)), None);
    }

    #[test]
    fn test_remeasure_updates_geometry() {
        let mut registry = StepRegistry::discover(&layout(&["a", "b"], 10)).unwrap();
        registry.remeasure(&layout(&["a", "b"], 30)).unwrap();
        assert_eq!(registry.viewport_height(), 30);
        assert_eq!(registry.get(1).unwrap().top(), 30);

        let err = registry.remeasure(&layout(&["a", "x"], 30)).unwrap_err();
        assert!(matches!(err, Error::LayoutMismatch { .. }));
        // Unchanged after a rejected layout
        assert_eq!(registry.get(1).unwrap().id(), "b");
    }

    #[test]
    fn test_viewport_bottom_saturates() {
        let step = Step {
            id: "short".into(),
            index: 0,
            top: 0,
            height: 5,
        };
        assert_eq!(step.viewport_bottom(20), 0);
    }
}
