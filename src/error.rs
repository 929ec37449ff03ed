//! Error types for building and loading the index.
//!
//! All errors arise during the build pass or when loading a stored index.
//! Queries on a loaded [`crate::VcfMap`] never fail; absent information is
//! reported through sentinel values instead.

use std::io;

/// A `Result` with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from index construction and serialization.
///
/// Every variant is fatal to the build: the input is a static file, so
/// retrying a failed record would fail again. Insertions and other records
/// the index does not cover are skipped during the build instead of being
/// reported through this type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The record is neither a substitution nor an annotated indel.
    #[error("unsupported variant type at position {position}: {reference} -> {alternate}")]
    UnsupportedVariantType {
        /// 1-based position from the record.
        position: usize,
        /// Reference allele.
        reference: String,
        /// Alternate allele.
        alternate: String,
    },

    /// The record lists more than one alternate allele.
    #[error("multi-allelic variant at position {0}; only biallelic records are supported")]
    MultiAllelicVariant(usize),

    /// A heterozygous genotype without phase information.
    #[error("genotype {0} is not phased")]
    UnphasedGenotype(String),

    /// The variant does not start at a node boundary on the reference path.
    #[error("variant at reference offset {0} does not start at a node boundary")]
    MisalignedVariant(usize),

    /// No outgoing edge carries the alternate allele.
    #[error("no edge from node {from} matches alternate allele {alternate}")]
    EdgeNotFound {
        /// The node preceding the variant site.
        from: usize,
        /// Alternate allele from the record.
        alternate: String,
    },

    /// The deleted region does not end at a node boundary.
    #[error("deletion of {length} bp at reference offset {offset} does not match the graph")]
    DeletionNotInGraph {
        /// 0-based offset of the first deleted base.
        offset: usize,
        /// Number of deleted bases.
        length: usize,
    },

    /// A line that cannot be interpreted as a VCF record.
    #[error("invalid VCF record: {0}")]
    InvalidRecord(String),

    /// The graph or the reference path did not provide the expected data.
    #[error("graph error: {0}")]
    Graph(String),

    /// The stored index is corrupt or incomplete.
    #[error("invalid index archive: {0}")]
    Archive(String),

    /// An I/O error from the underlying reader or writer.
    #[error(transparent)]
    Io(#[from] io::Error),
}
