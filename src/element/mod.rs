//! Element tree
//!
//! Every visual or interactive object is an element. Elements live in an
//! arena owned by [`ElementTree`]; a parent owns the ordered list of its
//! children and a child only keeps the id of its parent, so the back
//! reference never keeps anything alive.

mod error;

pub use error::{TreeError, TreeResult};

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::events::registry::HandlerMap;
use crate::geometry::Rect;

/// Unique identifier for an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Allocate a fresh id
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::SeqCst))
    }

    /// Get the raw ID value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the element tree
pub struct Element {
    id: ElementId,

    /// Type tag, e.g. `"window"` or `"label"`
    kind: String,

    parent: Option<ElementId>,

    children: Vec<ElementId>,

    /// Absolute bounds in window coordinates, used by hit testing
    bounds: Rect,

    pub(crate) handlers: HandlerMap,

    /// Widget specific state owned by the concrete widget
    state: Option<Box<dyn Any + Send>>,
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("bounds", &self.bounds)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// Arena of elements with parent/child links
#[derive(Debug, Default)]
pub struct ElementTree {
    elements: HashMap<ElementId, Element>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element with empty bounds
    pub fn create(&mut self, kind: impl Into<String>) -> ElementId {
        self.create_with_bounds(kind, Rect::zero())
    }

    /// Create a detached element occupying `bounds`
    pub fn create_with_bounds(&mut self, kind: impl Into<String>, bounds: Rect) -> ElementId {
        let id = ElementId::new();
        self.elements.insert(
            id,
            Element {
                id,
                kind: kind.into(),
                parent: None,
                children: Vec::new(),
                bounds,
                handlers: HandlerMap::default(),
                state: None,
            },
        );
        id
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(&id).and_then(|e| e.parent)
    }

    /// Children of `id` in order; empty for unknown elements
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(&id)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.elements.get(&id).map(|e| e.bounds)
    }

    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) -> TreeResult<()> {
        let element = self
            .elements
            .get_mut(&id)
            .ok_or(TreeError::ElementNotFound(id))?;
        element.bounds = bounds;
        Ok(())
    }

    /// Attach widget state to an element, replacing any previous state
    pub fn set_state<T: Any + Send>(&mut self, id: ElementId, state: T) -> TreeResult<()> {
        let element = self
            .elements
            .get_mut(&id)
            .ok_or(TreeError::ElementNotFound(id))?;
        element.state = Some(Box::new(state));
        Ok(())
    }

    pub fn state<T: Any + Send>(&self, id: ElementId) -> Option<&T> {
        self.elements
            .get(&id)
            .and_then(|e| e.state.as_ref())
            .and_then(|s| s.downcast_ref::<T>())
    }

    pub fn state_mut<T: Any + Send>(&mut self, id: ElementId) -> Option<&mut T> {
        self.elements
            .get_mut(&id)
            .and_then(|e| e.state.as_mut())
            .and_then(|s| s.downcast_mut::<T>())
    }

    /// Append `child` to the children of `parent`
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) -> TreeResult<()> {
        if !self.contains(parent) {
            return Err(TreeError::ElementNotFound(parent));
        }
        if !self.contains(child) {
            return Err(TreeError::ElementNotFound(child));
        }

        if let Some(existing) = self.parent(child) {
            if existing == parent {
                return Ok(());
            }
            return Err(TreeError::InvalidRelationship(format!(
                "element {} already has a parent {}",
                child, existing
            )));
        }

        // Parent may not sit below the child
        if self.ancestors(parent).any(|a| a == child) {
            return Err(TreeError::InvalidRelationship(format!(
                "adding {} under {} would create a cycle",
                child, parent
            )));
        }

        if let Some(p) = self.elements.get_mut(&parent) {
            p.children.push(child);
        }
        if let Some(c) = self.elements.get_mut(&child) {
            c.parent = Some(parent);
        }

        Ok(())
    }

    /// Detach `child` from its parent without destroying it
    pub fn detach(&mut self, child: ElementId) -> TreeResult<()> {
        let parent = {
            let element = self
                .elements
                .get_mut(&child)
                .ok_or(TreeError::ElementNotFound(child))?;
            element.parent.take()
        };

        if let Some(parent) = parent {
            if let Some(p) = self.elements.get_mut(&parent) {
                p.children.retain(|&c| c != child);
            }
        }

        Ok(())
    }

    /// Destroy an element and its whole subtree.
    ///
    /// Children are torn down depth-first before their parent; every
    /// handler registered on a destroyed element goes with it.
    pub fn remove(&mut self, id: ElementId) -> TreeResult<()> {
        if !self.contains(id) {
            return Err(TreeError::ElementNotFound(id));
        }

        self.detach(id)?;
        self.destroy_subtree(id);
        Ok(())
    }

    fn destroy_subtree(&mut self, id: ElementId) {
        let children = self
            .elements
            .get(&id)
            .map(|e| e.children.clone())
            .unwrap_or_default();

        for child in children {
            self.destroy_subtree(child);
        }

        if let Some(element) = self.elements.remove(&id) {
            log::trace!(
                "destroyed element {} ({}) with {} handler(s)",
                id,
                element.kind,
                element.handlers.len()
            );
        }
    }

    /// Walk from `id` up to its root, `id` included
    pub fn ancestors(&self, id: ElementId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.contains(id).then_some(id),
        }
    }

    /// Path from the root of `id`'s tree down to `id`, both included
    pub fn path_from_root(&self, id: ElementId) -> Vec<ElementId> {
        let mut path: Vec<ElementId> = self.ancestors(id).collect();
        path.reverse();
        path
    }

    /// Whether `ancestor` is `id` or lies above it
    pub fn is_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }
}

/// Iterator returned by [`ElementTree::ancestors`]
pub struct Ancestors<'a> {
    tree: &'a ElementTree,
    next: Option<ElementId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
