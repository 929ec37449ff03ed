//! Resolving variants to graph edges.
//!
//! A variant record describes a change relative to the linear reference.
//! In the graph, carrying the alternate allele corresponds to taking a
//! specific edge where the alternate branches off the reference path.
//! [`EdgeResolver`] finds that edge.
//!
//! The resolution assumes the graph was built from the same VCF: every
//! substitution starts at a node boundary, and every deletion removes a run
//! of complete nodes. Records violating these assumptions fail instead of
//! resolving to a wrong edge.

use crate::graph::GraphAccess;
use crate::ref_path::ReferencePath;
use crate::{Error, Result};


//-----------------------------------------------------------------------------

/// Resolves substitutions and deletions to edges of the graph.
///
/// An edge is an ordered pair `(from, to)` of node identifiers in forward
/// orientation. The resolver borrows the graph and the reference path and
/// holds no other state.
pub struct EdgeResolver<'a, G: GraphAccess> {
    graph: &'a G,
    ref_path: &'a ReferencePath,
}

impl<'a, G: GraphAccess> EdgeResolver<'a, G> {
    /// Creates a resolver over the given graph and reference path.
    pub fn new(graph: &'a G, ref_path: &'a ReferencePath) -> Self {
        EdgeResolver { graph, ref_path }
    }

    // Returns the node starting exactly at the offset and the node
    // preceding it on the reference path.
    fn flanking_nodes(&self, offset: usize) -> Result<(usize, usize)> {
        let node = self.ref_path.node_at_offset(offset).ok_or_else(|| {
            Error::Graph(format!("reference offset {} is past the end of the path", offset))
        })?;
        let node_offset = self.ref_path.node_offset_at_offset(offset).ok_or_else(|| {
            Error::Graph(format!("reference offset {} is past the end of the path", offset))
        })?;
        if node_offset != 0 {
            return Err(Error::MisalignedVariant(offset));
        }
        if offset == 0 {
            return Err(Error::Graph(String::from(
                "a variant at the start of the reference path has no preceding node"
            )));
        }
        let prev = self.ref_path.node_at_offset(offset - 1).ok_or_else(|| {
            Error::Graph(format!("reference offset {} is past the end of the path", offset - 1))
        })?;
        Ok((node, prev))
    }

    /// Resolves a substitution at the given reference offset.
    ///
    /// The substituted node must start exactly at `offset`. The result is
    /// the edge from the preceding reference node to its first successor
    /// whose sequence starts with the alternate allele, compared
    /// case-insensitively. The successor on the reference path is excluded
    /// from the scan. A multi-base alternate allele never matches a single
    /// first base, so such records fail with [`Error::EdgeNotFound`].
    pub fn substitution_edge(&self, offset: usize, alternate: &[u8]) -> Result<(usize, usize)> {
        let (ref_node, prev) = self.flanking_nodes(offset)?;

        let successors = self.graph.successors(prev).ok_or_else(|| {
            Error::Graph(format!("node {} is not in the graph", prev))
        })?;
        for successor in successors {
            if successor == ref_node {
                continue;
            }
            let base = match self.graph.first_base(successor) {
                Some(base) => base,
                None => continue,
            };
            if alternate.len() == 1 && base.eq_ignore_ascii_case(&alternate[0]) {
                return Ok((prev, successor));
            }
        }

        Err(Error::EdgeNotFound {
            from: prev,
            alternate: String::from_utf8_lossy(alternate).into_owned(),
        })
    }

    /// Resolves a deletion of `length` bases starting at the given offset.
    ///
    /// `offset` is the first deleted base, which must be a node start. The
    /// reference resumes at `offset + length`, which must also be a node
    /// start; otherwise the deletion does not correspond to an edge in the
    /// graph. The result is the edge from the node preceding the deletion
    /// to the resumption node.
    pub fn deletion_edge(&self, offset: usize, length: usize) -> Result<(usize, usize)> {
        let (_, prev) = self.flanking_nodes(offset)?;

        let resumption = offset + length;
        let next_node = self.ref_path.node_at_offset(resumption).ok_or(
            Error::DeletionNotInGraph { offset, length }
        )?;
        if self.ref_path.node_offset_at_offset(resumption) != Some(0) {
            return Err(Error::DeletionNotInGraph { offset, length });
        }

        Ok((prev, next_node))
    }
}

//-----------------------------------------------------------------------------
