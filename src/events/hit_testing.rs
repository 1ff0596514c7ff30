//! Hit testing: which element sits under a point
//!
//! Hit testing belongs to the layout/render collaborator. The core only
//! needs the [`HitTest`] seam; [`BoundsHitTester`] is the default
//! implementation working from the bounds stored on each element.

use std::fmt;

use crate::element::{ElementId, ElementTree};
use crate::geometry::Point;

/// Resolves the element under a window position
pub trait HitTest {
    /// Top-most element under `point` in the tree rooted at `root`
    fn hit_test(&mut self, tree: &ElementTree, root: ElementId, point: Point) -> Option<ElementId>;
}

impl<F> HitTest for F
where
    F: FnMut(&ElementTree, ElementId, Point) -> Option<ElementId>,
{
    fn hit_test(&mut self, tree: &ElementTree, root: ElementId, point: Point) -> Option<ElementId> {
        self(tree, root, point)
    }
}

/// Statistics for hit testing
#[derive(Debug, Default, Clone)]
pub struct HitTestStats {
    /// Number of hit tests performed
    pub hit_tests: u64,
    /// Number of elements tested in the last hit test
    pub nodes_tested: u32,
}

impl fmt::Display for HitTestStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hit Test Stats: {} tests, {} nodes tested",
            self.hit_tests, self.nodes_tested
        )
    }
}

/// Hit tester that uses element bounds.
///
/// An element is only searched when its own bounds contain the point.
/// Later children are drawn on top of earlier ones, so they are tested first.
#[derive(Debug, Default)]
pub struct BoundsHitTester {
    pub stats: HitTestStats,
}

impl BoundsHitTester {
    pub fn new() -> Self {
        Self::default()
    }

    fn hit_test_recursive(&mut self, tree: &ElementTree, id: ElementId, point: Point) -> Option<ElementId> {
        self.stats.nodes_tested += 1;

        let element = tree.get(id)?;
        if !element.bounds().contains_point(point) {
            return None;
        }

        for &child in element.children().iter().rev() {
            if let Some(hit) = self.hit_test_recursive(tree, child, point) {
                return Some(hit);
            }
        }

        Some(id)
    }
}

impl HitTest for BoundsHitTester {
    fn hit_test(&mut self, tree: &ElementTree, root: ElementId, point: Point) -> Option<ElementId> {
        self.stats.hit_tests += 1;
        self.stats.nodes_tested = 0;
        self.hit_test_recursive(tree, root, point)
    }
}
