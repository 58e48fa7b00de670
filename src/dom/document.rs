//! Live document tree for ChatLens.
//!
//! An arena-backed element tree rooted at a `body` element, with a single
//! change-notification interface: any number of independent subscriptions,
//! each scoped to a subtree root, each receiving batched mutation records
//! in document order. Only child-list mutations (insertions and removals)
//! are observable; attribute and class changes do not generate records,
//! which is what lets the engine tag processed elements without retriggering
//! itself.

use crate::types::errors::DomError;

use super::element::{Element, ElementData};
use super::selector::Selector;

/// Handle to a node inside a [`Document`].
pub type NodeId = usize;

/// Handle to a mutation subscription.
pub type ObserverId = usize;

/// One batch of child-list mutations, as delivered to a subscription.
#[derive(Debug, Clone, Default)]
pub struct MutationRecord {
    /// Top-level nodes inserted (descendants are reached by re-scanning).
    pub added: Vec<NodeId>,
    /// Top-level nodes removed; the ids are already dead for queries.
    pub removed: Vec<NodeId>,
}

struct Subscription {
    id: ObserverId,
    root: NodeId,
    records: Vec<MutationRecord>,
}

/// Arena-backed live document tree.
pub struct Document {
    nodes: Vec<Option<ElementData>>,
    body: NodeId,
    subs: Vec<Subscription>,
    next_observer: ObserverId,
}

impl Document {
    /// Creates a document containing only an empty `body` element.
    pub fn new() -> Self {
        let body = ElementData::from_blueprint(&Element::new("body"), None);
        Self {
            nodes: vec![Some(body)],
            body: 0,
            subs: Vec::new(),
            next_observer: 0,
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn exists(&self, id: NodeId) -> bool {
        self.nodes.get(id).map_or(false, Option::is_some)
    }

    pub fn get(&self, id: NodeId) -> Option<&ElementData> {
        self.nodes.get(id).and_then(Option::as_ref)
    }

    fn get_mut_checked(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        self.nodes
            .get_mut(id)
            .and_then(Option::as_mut)
            .ok_or(DomError::NodeNotFound(id))
    }

    // ─── Structure ───

    /// Materializes a blueprint subtree under `parent` and notifies every
    /// subscription whose root contains the insertion point.
    ///
    /// Returns the id of the inserted top-level node. Each call produces
    /// one mutation batch.
    pub fn append_child(&mut self, parent: NodeId, element: &Element) -> Result<NodeId, DomError> {
        if !self.exists(parent) {
            return Err(DomError::NodeNotFound(parent));
        }
        let top = self.materialize(element, parent);
        self.get_mut_checked(parent)?.children.push(top);
        self.notify(parent, vec![top], Vec::new());
        Ok(top)
    }

    fn materialize(&mut self, element: &Element, parent: NodeId) -> NodeId {
        let id = self.nodes.len();
        self.nodes
            .push(Some(ElementData::from_blueprint(element, Some(parent))));
        for child in &element.children {
            let child_id = self.materialize(child, id);
            if let Some(Some(node)) = self.nodes.get_mut(id) {
                node.children.push(child_id);
            }
        }
        id
    }

    /// Removes a node and its subtree, notifying subscriptions that cover
    /// the former parent. The body cannot be removed.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), DomError> {
        if id == self.body {
            return Err(DomError::CannotRemoveRoot);
        }
        if !self.exists(id) {
            return Err(DomError::NodeNotFound(id));
        }
        let parent = self.get(id).and_then(|n| n.parent);
        if let Some(p) = parent {
            if let Ok(node) = self.get_mut_checked(p) {
                node.children.retain(|&c| c != id);
            }
        }
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(Some(node)) = self.nodes.get(n) {
                stack.extend(node.children.iter().copied());
            }
            if let Some(slot) = self.nodes.get_mut(n) {
                *slot = None;
            }
        }
        if let Some(p) = parent {
            self.notify(p, Vec::new(), vec![id]);
        }
        Ok(())
    }

    // ─── Attributes, classes, text ───

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.get_mut_checked(id)?
            .attrs
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn get_attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id).and_then(|n| n.attrs.get(name)).map(String::as_str)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        self.get_mut_checked(id)?.classes.insert(class.to_string());
        Ok(())
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        self.get_mut_checked(id)?.classes.remove(class);
        Ok(())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.get(id).map_or(false, |n| n.classes.contains(class))
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        self.get_mut_checked(id)?.text = text.to_string();
        Ok(())
    }

    // ─── Queries ───

    /// Whether `node` is `ancestor` or lies inside its subtree.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.get(n).and_then(|d| d.parent);
        }
        false
    }

    /// All nodes matching `selector` within the subtree rooted at `root`,
    /// in document (preorder) order. Unlike CSS `querySelectorAll`, the
    /// root itself is considered; the classifier tests inserted nodes as
    /// well as their descendants.
    pub fn query_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(root, selector, &mut out);
        out
    }

    fn walk(&self, node: NodeId, selector: &Selector, out: &mut Vec<NodeId>) {
        if let Some(data) = self.get(node) {
            if selector.matches(data) {
                out.push(node);
            }
            for &child in &data.children {
                self.walk(child, selector, out);
            }
        }
    }

    /// First match in document order, if any.
    pub fn query_first(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        self.query_all(root, selector).into_iter().next()
    }

    // ─── Mutation subscriptions ───

    /// Registers a subtree subscription rooted at `root`.
    pub fn subscribe(&mut self, root: NodeId) -> Result<ObserverId, DomError> {
        if !self.exists(root) {
            return Err(DomError::NodeNotFound(root));
        }
        let id = self.next_observer;
        self.next_observer += 1;
        self.subs.push(Subscription {
            id,
            root,
            records: Vec::new(),
        });
        Ok(id)
    }

    /// Drops a subscription. Unknown ids are ignored; unsubscribing twice
    /// is harmless.
    pub fn unsubscribe(&mut self, observer: ObserverId) {
        self.subs.retain(|s| s.id != observer);
    }

    /// Drains the pending mutation batches for a subscription.
    pub fn take_records(&mut self, observer: ObserverId) -> Result<Vec<MutationRecord>, DomError> {
        let sub = self
            .subs
            .iter_mut()
            .find(|s| s.id == observer)
            .ok_or(DomError::ObserverNotFound(observer))?;
        Ok(std::mem::take(&mut sub.records))
    }

    fn notify(&mut self, at: NodeId, added: Vec<NodeId>, removed: Vec<NodeId>) {
        // Collect covered roots first; contains() needs &self.
        let covered: Vec<ObserverId> = self
            .subs
            .iter()
            .filter(|s| self.contains(s.root, at))
            .map(|s| s.id)
            .collect();
        for sub in &mut self.subs {
            if covered.contains(&sub.id) {
                sub.records.push(MutationRecord {
                    added: added.clone(),
                    removed: removed.clone(),
                });
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
