//! Access to the topology and sequences of the pangenome graph.
//!
//! The index build only needs a narrow view of the graph: the node
//! identifier range, forward successors, and the first base of a node.
//! [`GraphAccess`] captures that view. The real graph is a [`GBZ`] from the
//! [`gbwt`] crate; tests use small in-memory graphs.

use gbwt::{Orientation, GBZ};

//-----------------------------------------------------------------------------

/// Graph operations needed for resolving variants to edges.
///
/// Node identifiers are `usize` values in `min_node()..=max_node()`; the
/// range may start above zero, and identifier `0` never refers to a real
/// node. All traversal is in forward orientation: the reference path and the
/// variant edges hanging off it are forward walks in the graphs this index
/// is built for.
pub trait GraphAccess {
    /// Returns the smallest node identifier in the graph.
    fn min_node(&self) -> usize;

    /// Returns the largest node identifier in the graph.
    fn max_node(&self) -> usize;

    /// Returns the identifiers of the forward successors of the node.
    ///
    /// Returns [`None`] if the node does not exist.
    fn successors(&self, node_id: usize) -> Option<Vec<usize>>;

    /// Returns the first base of the node sequence.
    ///
    /// Returns [`None`] if the node does not exist or its sequence is empty.
    fn first_base(&self, node_id: usize) -> Option<u8>;

    /// Returns the size of the dense node identifier range.
    fn node_span(&self) -> usize {
        if self.max_node() < self.min_node() {
            0
        } else {
            self.max_node() - self.min_node() + 1
        }
    }
}

//-----------------------------------------------------------------------------

impl GraphAccess for GBZ {
    fn min_node(&self) -> usize {
        GBZ::min_node(self)
    }

    fn max_node(&self) -> usize {
        GBZ::max_node(self)
    }

    fn successors(&self, node_id: usize) -> Option<Vec<usize>> {
        let iter = GBZ::successors(self, node_id, Orientation::Forward)?;
        Some(iter.filter(|(_, o)| *o == Orientation::Forward).map(|(id, _)| id).collect())
    }

    fn first_base(&self, node_id: usize) -> Option<u8> {
        self.sequence(node_id).and_then(|sequence| sequence.first().copied())
    }
}

//-----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal;

    #[test]
    fn memory_graph_access() {
        let graph = internal::bubble_graph();
        assert_eq!(graph.min_node(), 11, "Wrong minimum node id");
        assert_eq!(graph.max_node(), 17, "Wrong maximum node id");
        assert_eq!(graph.node_span(), 7, "Wrong node id span");

        assert_eq!(graph.successors(11), Some(vec![12, 13]), "Wrong successors for node 11");
        assert_eq!(graph.successors(17), Some(Vec::new()), "Wrong successors for node 17");
        assert!(graph.successors(10).is_none(), "Successors for a nonexistent node");

        assert_eq!(graph.first_base(13), Some(b'C'), "Wrong first base for node 13");
        assert!(graph.first_base(18).is_none(), "First base for a nonexistent node");
    }
}

//-----------------------------------------------------------------------------
