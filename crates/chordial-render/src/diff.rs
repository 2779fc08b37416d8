//! Three-way reconciliation between the previous render and the next one.
//!
//! Every drawn shape carries a stable identity key; diffing the previous
//! key set against the next one yields explicit enter/update/exit lists
//! that the SVG writer turns into fade-in, in-place, and fade-out output.

use crate::model::DiagramLayout;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Stable identity of a rendered shape across renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKey {
    /// Chord group arc, keyed by group index.
    Group(usize),
    /// Chord ribbon, keyed by its (source, target) group pair.
    Ribbon { source: usize, target: usize },
    /// Sankey node rectangle, keyed by node name.
    Node(String),
    /// Sankey link path, keyed by endpoint names.
    Flow { source: String, target: String },
    /// Bar rectangle, keyed by series index.
    Bar(usize),
}

/// Shared animation settings. Transitions never queue: a plan built from a
/// newer render supersedes any in-flight plan wholesale, so per element
/// there is at most one active transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub duration_ms: u32,
}

impl Default for Transition {
    fn default() -> Self {
        Self { duration_ms: 1000 }
    }
}

impl Transition {
    pub fn duration_secs(&self) -> f64 {
        f64::from(self.duration_ms) / 1000.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPlan {
    /// Shapes present in the next render only; fade in from zero opacity.
    pub enter: Vec<ShapeKey>,
    /// Shapes present in both renders; geometry moves in place.
    pub update: Vec<ShapeKey>,
    /// Shapes from the previous render with no successor; fade out, then
    /// drop from the retained set.
    pub exit: Vec<ShapeKey>,
    pub transition: Transition,
}

impl RenderPlan {
    pub fn is_entering(&self, key: &ShapeKey) -> bool {
        self.enter.contains(key)
    }

    pub fn is_noop(&self) -> bool {
        self.enter.is_empty() && self.exit.is_empty()
    }
}

/// Identity keys for every shape a layout draws, in draw order.
pub fn shape_keys(layout: &DiagramLayout) -> Vec<ShapeKey> {
    match layout {
        DiagramLayout::Chord(l) => l
            .groups
            .iter()
            .map(|g| ShapeKey::Group(g.index))
            .chain(l.ribbons.iter().map(|r| ShapeKey::Ribbon {
                source: r.source.index,
                target: r.target.index,
            }))
            .collect(),
        DiagramLayout::Sankey(l) => l
            .nodes
            .iter()
            .map(|n| ShapeKey::Node(n.name.clone()))
            .chain(l.links.iter().map(|link| ShapeKey::Flow {
                source: l.nodes[link.source].name.clone(),
                target: l.nodes[link.target].name.clone(),
            }))
            .collect(),
        DiagramLayout::Bars(l) => l.bars.iter().map(|b| ShapeKey::Bar(b.index)).collect(),
    }
}

pub fn reconcile(previous: Option<&DiagramLayout>, next: &DiagramLayout) -> RenderPlan {
    let next_keys = shape_keys(next);
    let prev_keys = previous.map(shape_keys).unwrap_or_default();

    let prev_set: HashSet<&ShapeKey> = prev_keys.iter().collect();
    let next_set: HashSet<&ShapeKey> = next_keys.iter().collect();

    let mut enter = Vec::new();
    let mut update = Vec::new();
    for key in &next_keys {
        if prev_set.contains(key) {
            update.push(key.clone());
        } else {
            enter.push(key.clone());
        }
    }
    let exit: Vec<ShapeKey> = prev_keys
        .iter()
        .filter(|key| !next_set.contains(*key))
        .cloned()
        .collect();

    RenderPlan {
        enter,
        update,
        exit,
        transition: Transition::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Surface, layout_dataset};
    use chordial_core::Dataset;

    fn bars(values: Vec<f64>) -> DiagramLayout {
        layout_dataset(&Dataset::series(values), Surface::new(800.0, 400.0).unwrap()).unwrap()
    }

    #[test]
    fn first_render_enters_everything() {
        let layout = bars(vec![1.0, 2.0, 3.0]);
        let plan = reconcile(None, &layout);
        assert_eq!(plan.enter.len(), 3);
        assert!(plan.update.is_empty());
        assert!(plan.exit.is_empty());
        assert_eq!(plan.transition.duration_ms, 1000);
    }

    #[test]
    fn identical_rerender_is_all_updates() {
        let layout = bars(vec![1.0, 2.0]);
        let plan = reconcile(Some(&layout), &layout);
        assert!(plan.is_noop());
        assert_eq!(plan.update.len(), 2);
    }

    #[test]
    fn growth_and_shrink_land_in_enter_and_exit() {
        let small = bars(vec![1.0, 2.0]);
        let large = bars(vec![1.0, 2.0, 3.0]);

        let plan = reconcile(Some(&small), &large);
        assert_eq!(plan.enter, vec![ShapeKey::Bar(2)]);
        assert_eq!(plan.update.len(), 2);
        assert!(plan.exit.is_empty());

        let plan = reconcile(Some(&large), &small);
        assert!(plan.enter.is_empty());
        assert_eq!(plan.exit, vec![ShapeKey::Bar(2)]);
    }

    #[test]
    fn sankey_keys_are_name_based() {
        let layout = layout_dataset(
            &serde_json::from_value(serde_json::json!({
                "type": "graph",
                "nodes": [{"name": "A"}, {"name": "B"}],
                "links": [{"source": "A", "target": "B", "value": 5.0}],
            }))
            .unwrap(),
            Surface::new(700.0, 300.0).unwrap(),
        )
        .unwrap();

        let keys = shape_keys(&layout);
        assert!(keys.contains(&ShapeKey::Node("A".to_string())));
        assert!(keys.contains(&ShapeKey::Flow {
            source: "A".to_string(),
            target: "B".to_string(),
        }));
    }
}
