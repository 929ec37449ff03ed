//! The haplotype-to-edge index.
//!
//! [`VcfMap`] records, for every node where a variant branches off the
//! reference path, which haplotypes take the variant edge and which
//! haplotypes have no genotype call at the site. The structure is frozen
//! when the build pass finishes; queries never mutate it and never fail.
//!
//! The design is closed-world: a variant node has exactly two relevant
//! outgoing edges, the recorded variant edge and the reference edge. A
//! haplotype that is not recorded on the variant edge and is not missing is
//! inferred to take the other edge. At most one variant is recorded per
//! node, so variants must not overlap.

use crate::archive::{Archive, ArchiveWriter};
use crate::{Error, Result};

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::io;
use std::path::Path;

#[cfg(test)]
mod tests;

//-----------------------------------------------------------------------------

// Entry names in the archive.
const KEY_MIN_NODE: &str = "min_node";
const KEY_N_HAPLOTYPES: &str = "n_haplotypes";
const KEY_TO_NODES: &str = "to_nodes";
const KEY_HAPLOTYPE_OFFSETS: &str = "haplotype_offsets";
const KEY_HAPLOTYPE_COUNTS: &str = "haplotype_counts";
const KEY_HAPLOTYPES: &str = "haplotypes";
const KEY_MISSING_OFFSETS: &str = "missing_offsets";
const KEY_MISSING_COUNTS: &str = "missing_counts";
const KEY_MISSING_HAPLOTYPES: &str = "missing_haplotypes";

// Number of entries written by `serialize`.
const ENTRY_COUNT: usize = 9;

//-----------------------------------------------------------------------------

/// An immutable index from graph edges to the haplotypes supporting them.
///
/// All per-node arrays are dense and indexed by `node - min_node`. In the
/// `to_nodes` array, value `0` means that no variant is recorded for the
/// node: node identifier `0` is reserved in the graph and never refers to a
/// real node. Haplotype identifiers are `u16` values below `n_haplotypes`;
/// sample `i` of the source VCF owns identifiers `2 * i` and `2 * i + 1`.
///
/// Queries take node identifiers in graph coordinates. A node outside the
/// indexed range is treated as having no recorded variant.
///
/// # Examples
///
/// ```
/// use vcf_map::VcfMap;
/// use std::collections::BTreeSet;
///
/// // Three nodes starting at identifier 11. A substitution is recorded at
/// // node 11: haplotypes 1, 2, and 3 take the edge to node 13.
/// let map = VcfMap::new(
///     11, 4,
///     vec![13, 0, 0],    // to_nodes
///     vec![0, 0, 0],     // haplotype_offsets
///     vec![3, 0, 0],     // haplotype_counts
///     vec![1, 2, 3],     // haplotypes
///     vec![0, 0, 0],     // missing_offsets
///     vec![0, 0, 0],     // missing_counts
///     Vec::new(),        // missing_haplotypes
/// );
///
/// let alt: BTreeSet<u16> = [1, 2, 3].into_iter().collect();
/// assert_eq!(map.haplotypes_on_edge(11, 13), Some(alt));
/// let other: BTreeSet<u16> = [0].into_iter().collect();
/// assert_eq!(map.haplotypes_on_edge(11, 12), Some(other));
/// assert_eq!(map.allele_frequency(11, 13), 0.75);
///
/// // Node 12 has no recorded variant.
/// assert_eq!(map.haplotypes_on_edge(12, 14), None);
/// assert_eq!(map.allele_frequency(12, 14), 1.0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VcfMap {
    // Smallest node identifier in the graph the index was built for.
    min_node: usize,

    // Size of the haplotype universe.
    n_haplotypes: usize,

    // Target node of the recorded variant edge, or 0.
    to_nodes: Vec<u32>,

    // Start and length of each node's run in `haplotypes`.
    haplotype_offsets: Vec<u32>,
    haplotype_counts: Vec<u16>,

    // Haplotypes on the variant edges, as contiguous per-node runs.
    haplotypes: Vec<u16>,

    // Start and length of each node's run in `missing_haplotypes`.
    missing_offsets: Vec<u32>,
    missing_counts: Vec<u16>,

    // Haplotypes without a genotype call, as contiguous per-node runs.
    missing_haplotypes: Vec<u16>,
}

//-----------------------------------------------------------------------------

/// Construction and persistence.
impl VcfMap {
    /// Creates an index from its parts.
    ///
    /// The caller is responsible for the consistency of the arrays: the
    /// per-node arrays must have equal lengths, and every run must lie
    /// within its buffer. Indexes built by [`crate::MapBuilder`] are
    /// consistent by construction; [`VcfMap::load`] checks what it reads.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        min_node: usize, n_haplotypes: usize,
        to_nodes: Vec<u32>,
        haplotype_offsets: Vec<u32>, haplotype_counts: Vec<u16>, haplotypes: Vec<u16>,
        missing_offsets: Vec<u32>, missing_counts: Vec<u16>, missing_haplotypes: Vec<u16>,
    ) -> Self {
        VcfMap {
            min_node, n_haplotypes,
            to_nodes,
            haplotype_offsets, haplotype_counts, haplotypes,
            missing_offsets, missing_counts, missing_haplotypes,
        }
    }

    // Checks that the arrays are mutually consistent.
    fn check_consistency(&self) -> Result<()> {
        if self.n_haplotypes > u16::MAX as usize + 1 {
            return Err(Error::Archive(format!("{} haplotypes do not fit in 16 bits", self.n_haplotypes)));
        }
        let nodes = self.to_nodes.len();
        for (name, len) in [
            ("haplotype_offsets", self.haplotype_offsets.len()),
            ("haplotype_counts", self.haplotype_counts.len()),
            ("missing_offsets", self.missing_offsets.len()),
            ("missing_counts", self.missing_counts.len()),
        ] {
            if len != nodes {
                return Err(Error::Archive(format!(
                    "array {} has {} entries for {} nodes", name, len, nodes
                )));
            }
        }
        for index in 0..nodes {
            let haplotype_end = self.haplotype_offsets[index] as usize + self.haplotype_counts[index] as usize;
            let missing_end = self.missing_offsets[index] as usize + self.missing_counts[index] as usize;
            if haplotype_end > self.haplotypes.len() || missing_end > self.missing_haplotypes.len() {
                return Err(Error::Archive(format!(
                    "node {} has a run past the end of the buffer", index + self.min_node
                )));
            }
            if self.missing_counts[index] as usize > self.n_haplotypes {
                return Err(Error::Archive(format!(
                    "node {} has more missing haplotypes than the universe", index + self.min_node
                )));
            }
        }
        for buffer in [&self.haplotypes, &self.missing_haplotypes] {
            if buffer.iter().any(|&id| id as usize >= self.n_haplotypes) {
                return Err(Error::Archive(format!(
                    "haplotype identifier outside the universe of {}", self.n_haplotypes
                )));
            }
        }
        Ok(())
    }

    /// Serializes the index to the writer.
    pub fn serialize<W: Write>(&self, writer: W) -> io::Result<()> {
        let mut archive = ArchiveWriter::new(writer, ENTRY_COUNT)?;
        archive.write_scalar(KEY_MIN_NODE, self.min_node as u64)?;
        archive.write_scalar(KEY_N_HAPLOTYPES, self.n_haplotypes as u64)?;
        archive.write_u32_array(KEY_TO_NODES, &self.to_nodes)?;
        archive.write_u32_array(KEY_HAPLOTYPE_OFFSETS, &self.haplotype_offsets)?;
        archive.write_u16_array(KEY_HAPLOTYPE_COUNTS, &self.haplotype_counts)?;
        archive.write_u16_array(KEY_HAPLOTYPES, &self.haplotypes)?;
        archive.write_u32_array(KEY_MISSING_OFFSETS, &self.missing_offsets)?;
        archive.write_u16_array(KEY_MISSING_COUNTS, &self.missing_counts)?;
        archive.write_u16_array(KEY_MISSING_HAPLOTYPES, &self.missing_haplotypes)?;
        archive.finish()?;
        Ok(())
    }

    /// Loads an index from the reader and checks its consistency.
    pub fn load<R: Read>(reader: &mut R) -> Result<Self> {
        let mut archive = Archive::load(reader)?;
        let map = VcfMap::new(
            archive.take_scalar(KEY_MIN_NODE)? as usize,
            archive.take_scalar(KEY_N_HAPLOTYPES)? as usize,
            archive.take_u32_array(KEY_TO_NODES)?,
            archive.take_u32_array(KEY_HAPLOTYPE_OFFSETS)?,
            archive.take_u16_array(KEY_HAPLOTYPE_COUNTS)?,
            archive.take_u16_array(KEY_HAPLOTYPES)?,
            archive.take_u32_array(KEY_MISSING_OFFSETS)?,
            archive.take_u16_array(KEY_MISSING_COUNTS)?,
            archive.take_u16_array(KEY_MISSING_HAPLOTYPES)?,
        );
        map.check_consistency()?;
        Ok(map)
    }

    /// Serializes the index to the given file, creating or overwriting it.
    pub fn to_file<P: AsRef<Path>>(&self, filename: P) -> Result<()> {
        let writer = BufWriter::new(File::create(filename)?);
        self.serialize(writer)?;
        Ok(())
    }

    /// Loads an index from the given file.
    pub fn from_file<P: AsRef<Path>>(filename: P) -> Result<Self> {
        let mut reader = BufReader::new(File::open(filename)?);
        Self::load(&mut reader)
    }
}

//-----------------------------------------------------------------------------

/// Statistics.
impl VcfMap {
    /// Returns the smallest node identifier in the indexed range.
    #[inline]
    pub fn min_node(&self) -> usize {
        self.min_node
    }

    /// Returns the number of nodes in the indexed range.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.to_nodes.len()
    }

    /// Returns the size of the haplotype universe.
    #[inline]
    pub fn n_haplotypes(&self) -> usize {
        self.n_haplotypes
    }

    /// Returns the number of recorded variant edges.
    pub fn variant_count(&self) -> usize {
        self.to_nodes.iter().filter(|&&to| to != 0).count()
    }

    /// Returns the full haplotype universe.
    pub fn all_haplotypes(&self) -> BTreeSet<u16> {
        (0..self.n_haplotypes).map(|id| id as u16).collect()
    }
}

//-----------------------------------------------------------------------------

/// Queries.
impl VcfMap {
    // Returns the array index for the node, if the node is in the indexed
    // range.
    fn node_index(&self, node: usize) -> Option<usize> {
        node.checked_sub(self.min_node).filter(|&index| index < self.to_nodes.len())
    }

    // Returns the run of haplotypes on the variant edge from the node.
    fn haplotype_run(&self, index: usize) -> &[u16] {
        let start = self.haplotype_offsets[index] as usize;
        &self.haplotypes[start..start + self.haplotype_counts[index] as usize]
    }

    // Returns the run of missing haplotypes at the node.
    fn missing_run(&self, index: usize) -> &[u16] {
        let start = self.missing_offsets[index] as usize;
        &self.missing_haplotypes[start..start + self.missing_counts[index] as usize]
    }

    /// Returns the target node of the variant edge recorded at the node.
    ///
    /// Returns [`None`] if no variant is recorded at the node.
    pub fn variant_to_node(&self, node: usize) -> Option<usize> {
        let index = self.node_index(node)?;
        match self.to_nodes[index] {
            0 => None,
            to => Some(to as usize),
        }
    }

    /// Returns the haplotypes that traverse the edge `(from, to)`.
    ///
    /// Returns [`None`] if no variant is recorded at `from`: every haplotype
    /// passing through `from` then traverses the edge, and the index has
    /// nothing to say about it.
    ///
    /// If a variant is recorded, the haplotypes on the recorded edge are the
    /// recorded run minus the missing run. Any other edge is "the other
    /// edge" of the closed world: its haplotypes are the universe minus the
    /// recorded run minus the missing run. Missing haplotypes are on neither
    /// side.
    pub fn haplotypes_on_edge(&self, from: usize, to: usize) -> Option<BTreeSet<u16>> {
        let index = self.node_index(from)?;
        let to_node = self.to_nodes[index];
        if to_node == 0 {
            return None;
        }

        let alt: BTreeSet<u16> = self.haplotype_run(index).iter().copied().collect();
        let missing: BTreeSet<u16> = self.missing_run(index).iter().copied().collect();
        let result = if to_node as usize == to {
            alt.difference(&missing).copied().collect()
        } else {
            (0..self.n_haplotypes)
                .map(|id| id as u16)
                .filter(|id| !alt.contains(id) && !missing.contains(id))
                .collect()
        };
        Some(result)
    }

    /// Returns the number of haplotypes with a known genotype at the node.
    ///
    /// This is the denominator of [`VcfMap::allele_frequency`]. For a node
    /// without a recorded variant, it is the size of the universe.
    pub fn known_haplotypes_at(&self, node: usize) -> usize {
        match self.node_index(node) {
            Some(index) => self.n_haplotypes - self.missing_counts[index] as usize,
            None => self.n_haplotypes,
        }
    }

    /// Returns the fraction of haplotypes with a known genotype at `from`
    /// that traverse the edge `(from, to)`.
    ///
    /// Returns `1.0` if no variant is recorded at `from`, and `0.0` if
    /// every genotype at `from` is missing.
    pub fn allele_frequency(&self, from: usize, to: usize) -> f64 {
        match self.haplotypes_on_edge(from, to) {
            None => 1.0,
            Some(haplotypes) => {
                let known = self.known_haplotypes_at(from);
                if known == 0 {
                    0.0
                } else {
                    haplotypes.len() as f64 / known as f64
                }
            },
        }
    }

    /// Returns the haplotypes consistent with every edge of the path.
    ///
    /// The path is a sequence of node identifiers. Edges without a recorded
    /// variant do not constrain the result. If no edge of the path has a
    /// recorded variant, the result is the full universe.
    pub fn haplotypes_on_path(&self, path: &[usize]) -> BTreeSet<u16> {
        let mut result: Option<BTreeSet<u16>> = None;
        for window in path.windows(2) {
            if let Some(haplotypes) = self.haplotypes_on_edge(window[0], window[1]) {
                result = Some(match result {
                    None => haplotypes,
                    Some(acc) => acc.intersection(&haplotypes).copied().collect(),
                });
            }
        }
        result.unwrap_or_else(|| self.all_haplotypes())
    }
}

//-----------------------------------------------------------------------------
