//! Arena of validation graphs and their frontier nodes.
//!
//! A graph is one instantiation of a blueprint's automaton. Its frontier maps
//! each live [`State`] to a node. A node either waits for a document event
//! (a leaf) or owns the content graph it dived into:
//!
//! ```text
//! g0 SEQUENCE ── n0 [00 00] ──content──► g1 TAG ── n1 [00 …]
//!            └── n2 [01 01] ──content──► g2 END ── n3 [00]
//! ```
//!
//! Links are kept dual: `graph(node.parent).get(node.state) == node` and
//! `graph(node.content).parent == node`. Deleting a node drops its content
//! graph. Graphs left without nodes are collected by [`Automaton::sweep`].

use std::fmt;

use indexmap::IndexMap;
use unidoc_core::{Blueprint, BranchId, State};

/// Index of a graph in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(u32);

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl GraphId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Frontier of one blueprint instantiation.
#[derive(Debug, Clone)]
pub struct ValidationGraph {
    blueprint: Blueprint,
    /// Node whose dive created this graph.
    parent: Option<NodeId>,
    /// Roots are never collected, even when empty.
    root: bool,
    nodes: IndexMap<State, NodeId>,
}

impl ValidationGraph {
    fn new(blueprint: Blueprint, root: bool) -> Self {
        Self {
            blueprint,
            parent: None,
            root,
            nodes: IndexMap::new(),
        }
    }

    #[inline]
    pub fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.root
    }

    pub fn get(&self, state: &State) -> Option<NodeId> {
        self.nodes.get(state).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Frontier in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&State, NodeId)> {
        self.nodes.iter().map(|(state, &node)| (state, node))
    }
}

/// One frontier position.
#[derive(Debug, Clone)]
pub struct ValidationNode {
    state: State,
    branch: BranchId,
    parent: GraphId,
    content: Option<GraphId>,
}

impl ValidationNode {
    #[inline]
    pub fn state(&self) -> &State {
        &self.state
    }

    #[inline]
    pub fn branch(&self) -> BranchId {
        self.branch
    }

    #[inline]
    pub fn parent(&self) -> GraphId {
        self.parent
    }

    #[inline]
    pub fn content(&self) -> Option<GraphId> {
        self.content
    }

    /// True when the node waits for a document event instead of a subgraph.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.content.is_none()
    }
}

/// Slot storage for graphs and nodes with index reuse.
#[derive(Debug, Default)]
pub struct Automaton {
    graphs: Vec<Option<ValidationGraph>>,
    nodes: Vec<Option<ValidationNode>>,
    free_graphs: Vec<u32>,
    free_nodes: Vec<u32>,
}

impl Automaton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live graphs.
    pub fn graph_count(&self) -> usize {
        self.graphs.len() - self.free_graphs.len()
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph_count() == 0
    }

    /// Allocate a root graph for `blueprint`.
    pub fn create_root(&mut self, blueprint: Blueprint) -> GraphId {
        self.alloc_graph(ValidationGraph::new(blueprint, true))
    }

    /// Allocate a detached graph; link it with [`Automaton::set_content`].
    pub fn create_graph(&mut self, blueprint: Blueprint) -> GraphId {
        self.alloc_graph(ValidationGraph::new(blueprint, false))
    }

    pub fn get_graph(&self, id: GraphId) -> Option<&ValidationGraph> {
        self.graphs.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_node(&self, id: NodeId) -> Option<&ValidationNode> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    /// Graph by id. Panics on a dangling id.
    pub fn graph(&self, id: GraphId) -> &ValidationGraph {
        self.ensure_graph(id)
    }

    /// Node by id. Panics on a dangling id.
    pub fn node(&self, id: NodeId) -> &ValidationNode {
        self.ensure_node(id)
    }

    pub fn graphs(&self) -> impl Iterator<Item = (GraphId, &ValidationGraph)> {
        self.graphs
            .iter()
            .enumerate()
            .filter_map(|(i, g)| g.as_ref().map(|g| (GraphId(i as u32), g)))
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &ValidationNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (NodeId(i as u32), n)))
    }

    /// Node at `state` in `graph`, if any.
    pub fn get(&self, graph: GraphId, state: &State) -> Option<NodeId> {
        self.ensure_graph(graph).get(state)
    }

    /// Node at `state` in `graph`, created for `branch` when missing.
    ///
    /// An existing node keeps its branch.
    pub fn create(&mut self, graph: GraphId, state: &State, branch: BranchId) -> NodeId {
        if let Some(node) = self.get(graph, state) {
            return node;
        }
        let node = self.alloc_node(ValidationNode {
            state: state.clone(),
            branch,
            parent: graph,
            content: None,
        });
        self.ensure_graph_mut(graph).nodes.insert(state.clone(), node);
        node
    }

    /// Detach the node at `state` and drop it with its content.
    ///
    /// Returns the removed node's data (content already dropped).
    pub fn delete(&mut self, graph: GraphId, state: &State) -> Option<ValidationNode> {
        let node = self.ensure_graph_mut(graph).nodes.shift_remove(state)?;
        Some(self.drop_node(node))
    }

    /// Detach `node` from its graph and drop it with its content.
    pub fn delete_node(&mut self, node: NodeId) -> ValidationNode {
        let (parent, state) = {
            let n = self.ensure_node(node);
            (n.parent, n.state.clone())
        };
        self.ensure_graph_mut(parent).nodes.shift_remove(&state);
        self.drop_node(node)
    }

    /// Make `graph` the content of `node`.
    ///
    /// A previous content of `node` is dropped; a previous parent of `graph`
    /// loses its content link.
    pub fn set_content(&mut self, node: NodeId, graph: GraphId) {
        if let Some(old) = self.ensure_node(node).content.filter(|&old| old != graph) {
            self.ensure_graph_mut(old).parent = None;
            self.ensure_node_mut(node).content = None;
            self.drop_graph(old);
        }
        if let Some(previous) = self.ensure_graph(graph).parent.filter(|&prev| prev != node) {
            self.ensure_node_mut(previous).content = None;
        }
        self.ensure_graph_mut(graph).parent = Some(node);
        self.ensure_node_mut(node).content = Some(graph);
    }

    /// Move `node` into `graph` under its current state.
    ///
    /// A node already holding that state in `graph` is dropped.
    pub fn reparent(&mut self, node: NodeId, graph: GraphId) {
        let (old, state) = {
            let n = self.ensure_node(node);
            (n.parent, n.state.clone())
        };
        if old == graph {
            return;
        }
        self.ensure_graph_mut(old).nodes.shift_remove(&state);
        if let Some(displaced) = self.ensure_graph_mut(graph).nodes.insert(state, node) {
            self.drop_node(displaced);
        }
        self.ensure_node_mut(node).parent = graph;
    }

    /// Remove every non-root graph without nodes, together with the node
    /// that dived into it, until nothing changes. Returns the number of
    /// graphs removed.
    pub fn sweep(&mut self) -> usize {
        let mut pending: Vec<GraphId> = self
            .graphs()
            .filter(|(_, g)| g.is_empty() && !g.root)
            .map(|(id, _)| id)
            .collect();

        let mut removed = 0;
        while let Some(id) = pending.pop() {
            let Some(graph) = self.get_graph(id) else {
                continue;
            };
            if !graph.is_empty() || graph.root {
                continue;
            }
            let parent = graph.parent;
            self.free_graph(id);
            removed += 1;

            let Some(node) = parent else {
                continue;
            };
            self.ensure_node_mut(node).content = None;
            let owner = self.delete_node(node).parent;
            if self.get_graph(owner).is_some_and(|g| g.is_empty() && !g.root) {
                pending.push(owner);
            }
        }
        removed
    }

    /// Drop every graph and node.
    pub fn clear(&mut self) {
        self.graphs.clear();
        self.nodes.clear();
        self.free_graphs.clear();
        self.free_nodes.clear();
    }

    fn alloc_graph(&mut self, graph: ValidationGraph) -> GraphId {
        match self.free_graphs.pop() {
            Some(index) => {
                self.graphs[index as usize] = Some(graph);
                GraphId(index)
            }
            None => {
                self.graphs.push(Some(graph));
                GraphId((self.graphs.len() - 1) as u32)
            }
        }
    }

    fn alloc_node(&mut self, node: ValidationNode) -> NodeId {
        match self.free_nodes.pop() {
            Some(index) => {
                self.nodes[index as usize] = Some(node);
                NodeId(index)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId((self.nodes.len() - 1) as u32)
            }
        }
    }

    pub(crate) fn get_graph_mut(&mut self, id: GraphId) -> Option<&mut ValidationGraph> {
        self.graphs.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub(crate) fn get_node_mut(&mut self, id: NodeId) -> Option<&mut ValidationNode> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    fn free_graph(&mut self, id: GraphId) -> ValidationGraph {
        let graph = self.graphs.get_mut(id.index()).and_then(Option::take);
        let graph = graph.unwrap_or_else(|| self.dangling_graph(id));
        self.free_graphs.push(id.0);
        graph
    }

    fn free_node(&mut self, id: NodeId) -> ValidationNode {
        let node = self.nodes.get_mut(id.index()).and_then(Option::take);
        let node = node.unwrap_or_else(|| self.dangling_node(id));
        self.free_nodes.push(id.0);
        node
    }

    /// Free an already detached node and everything below it.
    fn drop_node(&mut self, node: NodeId) -> ValidationNode {
        let removed = self.free_node(node);
        if let Some(content) = removed.content {
            self.drop_graph(content);
        }
        removed
    }

    /// Free a graph and everything below it.
    fn drop_graph(&mut self, graph: GraphId) {
        let mut stack = vec![graph];
        while let Some(id) = stack.pop() {
            let graph = self.free_graph(id);
            for node in graph.nodes.into_values() {
                if let Some(content) = self.free_node(node).content {
                    stack.push(content);
                }
            }
        }
    }
}
