//! An index for random access to the reference path by sequence offsets.
//!
//! Variant records are located by their offsets on the linear reference.
//! [`ReferencePath`] maps such an offset to the node containing it and to
//! the offset within that node. The index stores the start offset of every
//! node on the path, so both queries are single predecessor lookups.

use crate::{Error, Result};

use gbwt::{FullPathName, Orientation, GBWT, GBZ};

use gbwt::support;

use simple_sds::ops::PredSucc;
use simple_sds::sparse_vector::{SparseBuilder, SparseVector};


//-----------------------------------------------------------------------------

/// The reference path of the graph, indexed by sequence offsets.
///
/// The path is a forward walk through the graph. Offsets are 0-based and
/// relative to the start of the path.
///
/// # Examples
///
/// ```
/// use vcf_map::ReferencePath;
///
/// // A path of three nodes with lengths 4, 1, and 2.
/// let path = ReferencePath::with_lengths(vec![11, 12, 14], &[4, 1, 2]).unwrap();
/// assert_eq!(path.len(), 7);
///
/// assert_eq!(path.node_at_offset(0), Some(11));
/// assert_eq!(path.node_at_offset(4), Some(12));
/// assert_eq!(path.node_offset_at_offset(6), Some(1));
/// assert_eq!(path.node_at_offset(7), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferencePath {
    // Node identifiers in path order.
    nodes: Vec<usize>,

    // Start offset of each node on the path.
    node_starts: SparseVector,

    // Length of the path in bp.
    len: usize,
}

//-----------------------------------------------------------------------------

impl ReferencePath {
    /// Creates an offset index for the path with the given name in a GBZ graph.
    ///
    /// The name is typically a generic path name
    /// ([`FullPathName::generic`]) or a reference path name.
    ///
    /// # Errors
    ///
    /// Fails if the graph does not contain the path or the path is empty.
    pub fn new(graph: &GBZ, path_name: &FullPathName) -> Result<Self> {
        let metadata = graph.metadata().ok_or_else(|| {
            Error::Graph(String::from("the graph does not contain metadata"))
        })?;
        let path_id = metadata.find_path(path_name).ok_or_else(|| {
            Error::Graph(format!("cannot find path {}", path_name))
        })?;

        let index: &GBWT = graph.as_ref();
        let mut nodes: Vec<usize> = Vec::new();
        let mut lengths: Vec<usize> = Vec::new();
        let mut curr = index.start(support::encode_path(path_id, Orientation::Forward));
        while let Some(pos) = curr {
            let node_id = support::node_id(pos.node);
            let node_len = graph.sequence_len(node_id).ok_or_else(|| {
                Error::Graph(format!("no sequence for node {}", node_id))
            })?;
            nodes.push(node_id);
            lengths.push(node_len);
            curr = index.forward(pos);
        }

        Self::with_lengths(nodes, &lengths)
    }

    /// Creates an offset index from explicit node identifiers and lengths.
    ///
    /// # Errors
    ///
    /// Fails if the path is empty, the lists have different lengths, or a
    /// node has length zero.
    pub fn with_lengths(nodes: Vec<usize>, lengths: &[usize]) -> Result<Self> {
        if nodes.is_empty() {
            return Err(Error::Graph(String::from("the reference path is empty")));
        }
        if nodes.len() != lengths.len() {
            return Err(Error::Graph(format!(
                "{} nodes with {} lengths", nodes.len(), lengths.len()
            )));
        }

        let mut len = 0;
        for (node_id, node_len) in nodes.iter().zip(lengths) {
            if *node_len == 0 {
                return Err(Error::Graph(format!("node {} has an empty sequence", node_id)));
            }
            len += node_len;
        }

        let mut builder = SparseBuilder::new(len, nodes.len()).map_err(|err| {
            Error::Graph(err.to_string())
        })?;
        let mut start = 0;
        for node_len in lengths {
            builder.set(start);
            start += node_len;
        }
        let node_starts = SparseVector::try_from(builder).map_err(|err| {
            Error::Graph(err.to_string())
        })?;

        Ok(ReferencePath { nodes, node_starts, len })
    }

    /// Returns the length of the path in bp.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the path is empty.
    ///
    /// Construction rejects empty paths, so this is always `false`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of nodes on the path.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // Returns the path rank of the node containing the offset and the start
    // offset of that node.
    fn locate(&self, offset: usize) -> Option<(usize, usize)> {
        if offset >= self.len {
            return None;
        }
        self.node_starts.predecessor(offset).next()
    }

    /// Returns the identifier of the node containing the offset.
    ///
    /// Returns [`None`] if the offset is past the end of the path.
    pub fn node_at_offset(&self, offset: usize) -> Option<usize> {
        let (rank, _) = self.locate(offset)?;
        Some(self.nodes[rank])
    }

    /// Returns the offset within the node containing the given path offset.
    ///
    /// Returns [`None`] if the offset is past the end of the path.
    pub fn node_offset_at_offset(&self, offset: usize) -> Option<usize> {
        let (_, start) = self.locate(offset)?;
        Some(offset - start)
    }
}

//-----------------------------------------------------------------------------
