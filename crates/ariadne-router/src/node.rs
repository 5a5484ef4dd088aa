//! Trie node implementation.
//!
//! Each node stands for one path segment. Children hang off three
//! structurally distinct edge kinds, so a literal child can never be
//! confused with a parameter or wildcard child:
//!
//! ```text
//!                    (root)
//!          ┌───────────┼──────────────┐
//!       literal     param edges     wildcard
//!       "users"   :id{\d+}, :slug      *
//! ```

use std::collections::HashMap;

use crate::method::MethodKey;
use crate::params::Params;
use crate::pattern::{Constraint, Segment, WILDCARD_PARAM};

/// A parameter edge: the bound name, its optional constraint and the
/// child node reached through it.
#[derive(Debug, Clone)]
struct ParamEdge<H> {
    name: String,
    constraint: Option<Constraint>,
    node: Node<H>,
}

impl<H> ParamEdge<H> {
    fn new(name: &str, constraint: Option<Constraint>) -> Self {
        Self {
            name: name.to_string(),
            constraint,
            node: Node::new(),
        }
    }

    fn accepts(&self, segment: &str) -> bool {
        self.constraint.as_ref().map_or(true, |c| c.is_match(segment))
    }
}

/// Children of a node, grouped by edge kind.
#[derive(Debug, Clone)]
struct Edges<H> {
    /// Literal children keyed by exact segment text.
    literals: HashMap<String, Node<H>>,
    /// Constrained parameter edges, in registration order.
    constrained: Vec<ParamEdge<H>>,
    /// The unconstrained parameter edge.
    param: Option<Box<ParamEdge<H>>>,
    /// The catch-all child.
    wildcard: Option<Box<Node<H>>>,
}

impl<H> Default for Edges<H> {
    fn default() -> Self {
        Self {
            literals: HashMap::new(),
            constrained: Vec::new(),
            param: None,
            wildcard: None,
        }
    }
}

/// A node in the routing trie.
///
/// Nodes at the end of a registered pattern carry handler sequences keyed
/// by [`MethodKey`]. Handlers registered repeatedly under the same key
/// accumulate in registration order.
#[derive(Debug, Clone)]
pub struct Node<H> {
    handlers: HashMap<MethodKey, Vec<H>>,
    edges: Edges<H>,
}

impl<H> Default for Node<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Node<H> {
    /// Creates an empty node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            edges: Edges::default(),
        }
    }

    /// Inserts `handler` at the node reached by `segments`, creating
    /// intermediate nodes as needed.
    pub fn insert(&mut self, segments: &[Segment], method: MethodKey, handler: H) {
        let Some((segment, rest)) = segments.split_first() else {
            self.handlers.entry(method).or_default().push(handler);
            return;
        };

        match segment {
            Segment::Literal(text) => self
                .edges
                .literals
                .entry(text.clone())
                .or_default()
                .insert(rest, method, handler),
            Segment::Param {
                name,
                constraint: Some(constraint),
            } => {
                let existing = self
                    .edges
                    .constrained
                    .iter()
                    .position(|e| e.constraint.as_ref() == Some(constraint));
                let index = match existing {
                    Some(i) => i,
                    None => {
                        self.edges
                            .constrained
                            .push(ParamEdge::new(name, Some(constraint.clone())));
                        self.edges.constrained.len() - 1
                    }
                };
                let edge = &mut self.edges.constrained[index];
                edge.name.clone_from(name);
                edge.node.insert(rest, method, handler);
            }
            Segment::Param {
                name,
                constraint: None,
            } => {
                let edge = self
                    .edges
                    .param
                    .get_or_insert_with(|| Box::new(ParamEdge::new(name, None)));
                edge.name.clone_from(name);
                edge.node.insert(rest, method, handler);
            }
            Segment::Wildcard => self
                .edges
                .wildcard
                .get_or_insert_with(Box::default)
                .insert(rest, method, handler),
        }
    }

    /// Returns the handlers this node serves for `method`.
    ///
    /// An exact method falls back to the node's any-method handlers.
    fn handlers_for(&self, method: &MethodKey) -> Option<&[H]> {
        let found = match method {
            MethodKey::Any => self.handlers.get(&MethodKey::Any),
            exact => self
                .handlers
                .get(exact)
                .or_else(|| self.handlers.get(&MethodKey::Any)),
        };
        found.map(Vec::as_slice).filter(|h| !h.is_empty())
    }

    /// Finds the most specific terminal node for `segments` that serves
    /// `method`, recording captures into `params`.
    ///
    /// Per segment the order is literal, constrained parameters (first
    /// registered first), the unconstrained parameter, then the wildcard.
    /// A branch that fails anywhere below is abandoned and its captures
    /// are rolled back before the next candidate is tried.
    pub fn find<'n>(
        &'n self,
        segments: &[&str],
        method: &MethodKey,
        params: &mut Params,
    ) -> Option<&'n [H]> {
        let Some((&segment, rest)) = segments.split_first() else {
            if let Some(handlers) = self.handlers_for(method) {
                return Some(handlers);
            }
            // The wildcard also covers an empty remainder.
            let handlers = self.edges.wildcard.as_ref()?.handlers_for(method)?;
            params.push(WILDCARD_PARAM, "");
            return Some(handlers);
        };

        if let Some(child) = self.edges.literals.get(segment) {
            if let Some(found) = child.find(rest, method, params) {
                return Some(found);
            }
        }

        if !segment.is_empty() {
            let candidates = self
                .edges
                .constrained
                .iter()
                .chain(self.edges.param.as_deref());
            for edge in candidates {
                if !edge.accepts(segment) {
                    continue;
                }
                let mark = params.len();
                params.push(edge.name.as_str(), segment);
                if let Some(found) = edge.node.find(rest, method, params) {
                    return Some(found);
                }
                params.truncate(mark);
            }
        }

        let handlers = self.edges.wildcard.as_ref()?.handlers_for(method)?;
        params.push(WILDCARD_PARAM, segments.join("/"));
        Some(handlers)
    }
}
