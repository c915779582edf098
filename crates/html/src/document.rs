use crate::types::{Id, NodeData, NodeKind};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("node {0:?} does not exist or was removed")]
    MissingNode(Id),
    #[error("node {0:?} cannot have children")]
    NotAContainer(Id),
    #[error("node {0:?} is not an element")]
    NotAnElement(Id),
    #[error("node {child:?} is already attached to {parent:?}")]
    AlreadyAttached { child: Id, parent: Id },
    #[error("appending {child:?} under {parent:?} would create a cycle")]
    CycleDetected { parent: Id, child: Id },
    #[error("the document root cannot be removed")]
    RemoveRoot,
}

/// Mutable arena-backed document tree.
///
/// Slot 0 always holds the document node. Removed nodes leave an empty slot so
/// stale handles resolve to [`DomError::MissingNode`] instead of aliasing.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Option<NodeData>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub const ROOT: Id = Id(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![Some(NodeData {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document { doctype: None },
            })],
        }
    }

    pub fn root(&self) -> Id {
        Self::ROOT
    }

    pub fn set_doctype(&mut self, value: impl Into<String>) {
        if let Some(NodeKind::Document { doctype }) = self.kind_mut(Self::ROOT) {
            *doctype = Some(value.into());
        }
    }

    pub fn doctype(&self) -> Option<&str> {
        match self.kind(Self::ROOT) {
            Some(NodeKind::Document { doctype }) => doctype.as_deref(),
            _ => None,
        }
    }

    fn alloc(&mut self, kind: NodeKind) -> Id {
        let id = Id(self.nodes.len() as u32);
        self.nodes.push(Some(NodeData {
            parent: None,
            children: Vec::new(),
            kind,
        }));
        id
    }

    /// Creates a detached element. Tag names are stored lower-cased.
    pub fn create_element(&mut self, name: &str) -> Id {
        self.alloc(NodeKind::Element {
            name: name.to_ascii_lowercase(),
            attributes: Vec::new(),
        })
    }

    pub fn create_element_with(
        &mut self,
        name: &str,
        attributes: Vec<(String, Option<String>)>,
    ) -> Id {
        self.alloc(NodeKind::Element {
            name: name.to_ascii_lowercase(),
            attributes,
        })
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> Id {
        self.alloc(NodeKind::Text { text: text.into() })
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> Id {
        self.alloc(NodeKind::Comment { text: text.into() })
    }

    fn data(&self, id: Id) -> Option<&NodeData> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn data_mut(&mut self, id: Id) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    pub fn is_live(&self, id: Id) -> bool {
        self.data(id).is_some()
    }

    pub fn kind(&self, id: Id) -> Option<&NodeKind> {
        self.data(id).map(|d| &d.kind)
    }

    fn kind_mut(&mut self, id: Id) -> Option<&mut NodeKind> {
        self.data_mut(id).map(|d| &mut d.kind)
    }

    pub fn parent(&self, id: Id) -> Option<Id> {
        self.data(id).and_then(|d| d.parent)
    }

    pub fn children(&self, id: Id) -> &[Id] {
        self.data(id).map(|d| d.children.as_slice()).unwrap_or(&[])
    }

    /// True when `ancestor` is `node` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: Id, node: Id) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    pub fn append_child(&mut self, parent: Id, child: Id) -> Result<(), DomError> {
        let parent_data = self.data(parent).ok_or(DomError::MissingNode(parent))?;
        if !parent_data.kind.can_have_children() {
            return Err(DomError::NotAContainer(parent));
        }
        let child_data = self.data(child).ok_or(DomError::MissingNode(child))?;
        if let Some(existing) = child_data.parent {
            return Err(DomError::AlreadyAttached {
                child,
                parent: existing,
            });
        }
        if child == Self::ROOT || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::CycleDetected { parent, child });
        }
        if let Some(d) = self.data_mut(child) {
            d.parent = Some(parent);
        }
        if let Some(d) = self.data_mut(parent) {
            d.children.push(child);
        }
        Ok(())
    }

    /// Detaches `id` from its parent and frees the whole subtree.
    pub fn remove(&mut self, id: Id) -> Result<(), DomError> {
        if id == Self::ROOT {
            return Err(DomError::RemoveRoot);
        }
        let parent = self.data(id).ok_or(DomError::MissingNode(id))?.parent;
        if let Some(p) = parent.and_then(|p| self.data_mut(p)) {
            p.children.retain(|c| *c != id);
        }
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(slot) = self.nodes.get_mut(n.0 as usize) {
                if let Some(data) = slot.take() {
                    stack.extend(data.children);
                }
            }
        }
        Ok(())
    }

    /// Pre-order walk of the nodes below `scope` (the scope itself is excluded).
    pub fn descendants(&self, scope: Id) -> Descendants<'_> {
        let mut stack: Vec<Id> = self.children(scope).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    pub fn element_name(&self, id: Id) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Element { name, .. }) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn is_element(&self, id: Id) -> bool {
        self.element_name(id).is_some()
    }

    pub fn attributes(&self, id: Id) -> &[(String, Option<String>)] {
        match self.kind(id) {
            Some(NodeKind::Element { attributes, .. }) => attributes,
            _ => &[],
        }
    }

    /// Attribute value; a present attribute without a value reads as `""`.
    pub fn attr(&self, id: Id, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn has_attr(&self, id: Id, name: &str) -> bool {
        self.attributes(id)
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    fn attributes_mut(&mut self, id: Id) -> Result<&mut Vec<(String, Option<String>)>, DomError> {
        let err = self.element_error(id);
        match self.kind_mut(id) {
            Some(NodeKind::Element { attributes, .. }) => Ok(attributes),
            _ => Err(err),
        }
    }

    pub fn set_attr(&mut self, id: Id, name: &str, value: &str) -> Result<(), DomError> {
        let attributes = self.attributes_mut(id)?;
        match attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some((_, v)) => *v = Some(value.to_string()),
            None => attributes.push((name.to_ascii_lowercase(), Some(value.to_string()))),
        }
        Ok(())
    }

    pub fn remove_attr(&mut self, id: Id, name: &str) -> Result<(), DomError> {
        let attributes = self.attributes_mut(id)?;
        attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        Ok(())
    }

    fn element_error(&self, id: Id) -> DomError {
        if self.is_live(id) {
            DomError::NotAnElement(id)
        } else {
            DomError::MissingNode(id)
        }
    }

    pub fn has_class(&self, id: Id, class: &str) -> bool {
        self.attr(id, "class")
            .map(|list| list.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Adds `class` to the element's class list unless it is already there.
    pub fn add_class(&mut self, id: Id, class: &str) -> Result<(), DomError> {
        if !self.is_element(id) {
            return Err(self.element_error(id));
        }
        if self.has_class(id, class) {
            return Ok(());
        }
        let list = match self.attr(id, "class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr(id, "class", &list)
    }

    pub fn element_by_id(&self, value: &str) -> Option<Id> {
        self.descendants(Self::ROOT)
            .find(|&n| self.is_element(n) && self.attr(n, "id") == Some(value))
    }

    /// Concatenated text of every text node below `id` (or the node's own text).
    pub fn text_content(&self, id: Id) -> String {
        let mut out = String::new();
        match self.kind(id) {
            Some(NodeKind::Text { text }) | Some(NodeKind::Comment { text }) => {
                out.push_str(text);
            }
            Some(_) => {
                for n in self.descendants(id) {
                    if let Some(NodeKind::Text { text }) = self.kind(n) {
                        out.push_str(text);
                    }
                }
            }
            None => {}
        }
        out
    }

    /// Replaces all children of `id` with a single text node (none for `""`).
    pub fn set_text_content(&mut self, id: Id, text: &str) -> Result<(), DomError> {
        match self.kind_mut(id) {
            None => return Err(DomError::MissingNode(id)),
            Some(NodeKind::Text { text: t }) | Some(NodeKind::Comment { text: t }) => {
                *t = text.to_string();
                return Ok(());
            }
            Some(_) => {}
        }
        let children = self.children(id).to_vec();
        for child in children {
            self.remove(child)?;
        }
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node)?;
        }
        Ok(())
    }

    /// Appends `text` to the element's text, extending a trailing text node when present.
    pub fn append_text(&mut self, id: Id, text: &str) -> Result<(), DomError> {
        let last = self.children(id).last().copied();
        if let Some(last) = last {
            if let Some(NodeKind::Text { text: t }) = self.kind_mut(last) {
                t.push_str(text);
                return Ok(());
            }
        }
        let node = self.create_text(text);
        self.append_child(id, node)
    }
}

pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<Id>,
}

impl Iterator for Descendants<'_> {
    type Item = Id;

    fn next(&mut self) -> Option<Id> {
        let next = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(next).iter().rev().copied());
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, Id, Id) {
        let mut doc = Document::new();
        let body = doc.create_element("BODY");
        doc.append_child(Document::ROOT, body).unwrap();
        let p = doc.create_element("p");
        doc.append_child(body, p).unwrap();
        let t = doc.create_text("hello");
        doc.append_child(p, t).unwrap();
        (doc, body, p)
    }

    #[test]
    fn element_names_are_lowercased() {
        let (doc, body, _) = sample();
        assert_eq!(doc.element_name(body), Some("body"));
    }

    #[test]
    fn append_rejects_cycles_and_double_attach() {
        let (mut doc, body, p) = sample();
        assert_eq!(
            doc.append_child(p, body),
            Err(DomError::AlreadyAttached {
                child: body,
                parent: Document::ROOT
            })
        );
        let detached = doc.create_element("div");
        doc.append_child(p, detached).unwrap();
        let other = doc.create_element("span");
        assert_eq!(
            doc.append_child(other, other),
            Err(DomError::CycleDetected {
                parent: other,
                child: other
            })
        );
    }

    #[test]
    fn text_nodes_cannot_hold_children() {
        let (mut doc, _, p) = sample();
        let text = doc.children(p)[0];
        let span = doc.create_element("span");
        assert_eq!(doc.append_child(text, span), Err(DomError::NotAContainer(text)));
    }

    #[test]
    fn remove_frees_the_subtree() {
        let (mut doc, body, p) = sample();
        let text = doc.children(p)[0];
        doc.remove(p).unwrap();
        assert!(!doc.is_live(p));
        assert!(!doc.is_live(text));
        assert!(doc.children(body).is_empty());
        assert_eq!(doc.remove(p), Err(DomError::MissingNode(p)));
        assert_eq!(doc.remove(Document::ROOT), Err(DomError::RemoveRoot));
    }

    #[test]
    fn descendants_walk_in_document_order() {
        let (mut doc, body, p) = sample();
        let second = doc.create_element("div");
        doc.append_child(body, second).unwrap();
        let order: Vec<Id> = doc.descendants(Document::ROOT).collect();
        assert_eq!(order[0], body);
        assert_eq!(order[1], p);
        assert_eq!(*order.last().unwrap(), second);
    }

    #[test]
    fn class_list_is_idempotent() {
        let (mut doc, _, p) = sample();
        doc.add_class(p, "card").unwrap();
        doc.add_class(p, "animate-in").unwrap();
        doc.add_class(p, "card").unwrap();
        assert_eq!(doc.attr(p, "class"), Some("card animate-in"));
        assert!(doc.has_class(p, "animate-in"));
    }

    #[test]
    fn text_content_round_trip() {
        let (mut doc, body, p) = sample();
        assert_eq!(doc.text_content(body), "hello");
        doc.set_text_content(p, "").unwrap();
        assert!(doc.children(p).is_empty());
        doc.append_text(p, "a").unwrap();
        doc.append_text(p, "b").unwrap();
        assert_eq!(doc.children(p).len(), 1);
        assert_eq!(doc.text_content(p), "ab");
    }

    #[test]
    fn valueless_attribute_reads_as_empty() {
        let mut doc = Document::new();
        let b = doc.create_element_with("button", vec![("disabled".into(), None)]);
        assert_eq!(doc.attr(b, "DISABLED"), Some(""));
        doc.remove_attr(b, "disabled").unwrap();
        assert!(!doc.has_attr(b, "disabled"));
    }
}
