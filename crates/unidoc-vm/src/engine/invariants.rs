//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use super::graph::{Automaton, GraphId, NodeId, ValidationGraph, ValidationNode};

impl Automaton {
    pub(crate) fn ensure_graph(&self, id: GraphId) -> &ValidationGraph {
        self.get_graph(id).unwrap_or_else(|| self.dangling_graph(id))
    }

    pub(crate) fn ensure_graph_mut(&mut self, id: GraphId) -> &mut ValidationGraph {
        self.get_graph_mut(id)
            .unwrap_or_else(|| panic!("Automaton: graph {id} is not allocated"))
    }

    pub(crate) fn ensure_node(&self, id: NodeId) -> &ValidationNode {
        self.get_node(id).unwrap_or_else(|| self.dangling_node(id))
    }

    pub(crate) fn ensure_node_mut(&mut self, id: NodeId) -> &mut ValidationNode {
        self.get_node_mut(id)
            .unwrap_or_else(|| panic!("Automaton: node {id} is not allocated"))
    }

    pub(crate) fn dangling_graph(&self, id: GraphId) -> ! {
        panic!(
            "Automaton: graph {id} is not allocated ({} live graphs)",
            self.graph_count()
        )
    }

    pub(crate) fn dangling_node(&self, id: NodeId) -> ! {
        panic!(
            "Automaton: node {id} is not allocated ({} live nodes)",
            self.node_count()
        )
    }
}
