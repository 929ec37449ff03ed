//! # VCF-map: a haplotype-to-edge index for pangenome graphs.
//!
//! A variant in a phased multi-sample VCF corresponds to an edge in the
//! pangenome graph built from it: the edge where the alternate allele
//! branches off the reference path. This crate builds a compact per-node
//! index from such a VCF and answers, in constant time per node, which
//! haplotypes traverse which outgoing edge at each variant site.
//!
//! The index builds on the [`gbwt`] crate: the graph is a [`gbwt::GBZ`],
//! and the reference path is one of its paths. The build and query core is
//! written against the narrow [`GraphAccess`] trait, so it can also be used
//! (and tested) with other graph representations.
//!
//! ### Basic concepts
//!
//! Each sample of the VCF contributes two haplotypes; sample `i` owns
//! haplotype identifiers `2 * i` and `2 * i + 1`. At every variant site the
//! phased genotypes assign each haplotype to the variant edge, to the
//! reference edge, or to neither (missing genotypes).
//!
//! The design is closed-world: records are biallelic, substitutions start
//! at node boundaries, deletions remove complete nodes, and a variant node
//! has exactly two relevant outgoing edges. The index stores the haplotypes
//! of the variant edge and infers the reference edge by complement. Inputs
//! that violate the assumptions fail the build with a typed [`Error`]
//! instead of producing a wrong index.
//!
//! Insertions are recognized but not indexed; the build skips them.
//!
//! See [`MapBuilder`] for building the index and [`VcfMap`] for the query
//! interface. The index is stored as a named-array archive ([`archive`]).

pub mod archive;
pub mod builder;
pub mod error;
pub mod graph;
pub mod ref_path;
pub mod resolver;
pub mod utils;
pub mod variant;
pub mod vcf_map;

pub use builder::MapBuilder;
pub use error::{Error, Result};
pub use graph::GraphAccess;
pub use ref_path::ReferencePath;
pub use resolver::EdgeResolver;
pub use variant::{Genotype, VariantKind, VariantRecord};
pub use vcf_map::VcfMap;

#[cfg(test)]
mod internal;
