//! Building the index from a VCF file.
//!
//! [`MapBuilder`] makes one streaming pass over a phased, line-delimited
//! VCF. The `#CHROM` header fixes the haplotype universe; every data line is
//! classified, resolved to an edge, and its genotypes are appended to the
//! per-node runs. Insertions and other records the index does not cover are
//! skipped without error. Any failure aborts the whole build: the input is a
//! static file, and a partial index is not a valid index.

use crate::graph::GraphAccess;
use crate::ref_path::ReferencePath;
use crate::resolver::EdgeResolver;
use crate::variant::{Genotype, VariantKind, VariantRecord};
use crate::vcf_map::VcfMap;
use crate::{utils, Error, Result};

use std::io::BufRead;
use std::path::Path;


//-----------------------------------------------------------------------------

// Progress reporting interval in lines.
const PROGRESS_INTERVAL: usize = 1000;

/// Builds a [`VcfMap`] with a single pass over a VCF file.
///
/// The builder borrows the graph and the reference path the VCF was called
/// against. The per-node arrays are allocated once, for the full node range
/// of the graph; the haplotype runs grow as records are processed. A builder
/// is consumed by the build, successful or not.
///
/// # Examples
///
/// ```no_run
/// use vcf_map::{MapBuilder, ReferencePath};
/// use gbwt::{GBZ, FullPathName};
/// use simple_sds::serialize;
///
/// let graph: GBZ = serialize::load_from("graph.gbz").unwrap();
/// let path_name = FullPathName::generic("chr1");
/// let ref_path = ReferencePath::new(&graph, &path_name).unwrap();
///
/// let builder = MapBuilder::new(&graph, &ref_path, false);
/// let map = builder.build_from_file("variants.vcf.gz").unwrap();
/// ```
pub struct MapBuilder<'a, G: GraphAccess> {
    resolver: EdgeResolver<'a, G>,
    verbose: bool,

    min_node: usize,
    to_nodes: Vec<u32>,
    haplotype_offsets: Vec<u32>,
    haplotype_counts: Vec<u16>,
    haplotypes: Vec<u16>,
    missing_offsets: Vec<u32>,
    missing_counts: Vec<u16>,
    missing_haplotypes: Vec<u16>,

    // Set by the `#CHROM` header line.
    n_haplotypes: Option<usize>,

    n_substitutions: usize,
    n_deletions: usize,
    n_skipped: usize,
}

impl<'a, G: GraphAccess> MapBuilder<'a, G> {
    /// Creates a builder over the given graph and reference path.
    ///
    /// With `verbose`, progress information is printed to stderr.
    pub fn new(graph: &'a G, ref_path: &'a ReferencePath, verbose: bool) -> Self {
        let span = graph.node_span();
        MapBuilder {
            resolver: EdgeResolver::new(graph, ref_path),
            verbose,
            min_node: graph.min_node(),
            to_nodes: vec![0; span],
            haplotype_offsets: vec![0; span],
            haplotype_counts: vec![0; span],
            haplotypes: Vec::new(),
            missing_offsets: vec![0; span],
            missing_counts: vec![0; span],
            missing_haplotypes: Vec::new(),
            n_haplotypes: None,
            n_substitutions: 0,
            n_deletions: 0,
            n_skipped: 0,
        }
    }

    /// Builds the index from the given VCF file, which may be
    /// gzip-compressed.
    pub fn build_from_file<P: AsRef<Path>>(self, filename: P) -> Result<VcfMap> {
        let reader = utils::open_file(filename)?;
        self.build(reader)
    }

    /// Builds the index from the given reader.
    pub fn build<R: BufRead>(mut self, mut reader: R) -> Result<VcfMap> {
        let mut line_num = 0;
        loop {
            let mut buf: Vec<u8> = Vec::new();
            let len = reader.read_until(b'\n', &mut buf)?;
            if len == 0 {
                break;
            }
            line_num += 1;
            if self.verbose && line_num % PROGRESS_INTERVAL == 0 {
                eprintln!("{} lines processed, {} haplotypes stored", line_num, self.haplotypes.len());
            }

            if buf.first() == Some(&b'#') {
                if buf.starts_with(b"#CHROM") {
                    self.read_sample_header(&buf)?;
                }
                continue;
            }
            if buf.iter().all(|c| c.is_ascii_whitespace()) {
                continue;
            }
            if self.n_haplotypes.is_none() {
                return Err(Error::InvalidRecord(format!(
                    "line {}: data before the #CHROM header", line_num
                )));
            }

            if let Err(err) = self.process_line(&buf) {
                eprintln!("Error on line {}: {}", line_num, String::from_utf8_lossy(&buf).trim_end());
                return Err(err);
            }
        }

        if self.n_haplotypes.is_none() {
            return Err(Error::InvalidRecord(String::from("no #CHROM header in the input")));
        }
        if self.verbose {
            eprintln!(
                "Processed {} substitutions and {} deletions; skipped {} records",
                self.n_substitutions, self.n_deletions, self.n_skipped
            );
        }
        Ok(self.freeze())
    }

    // Determines the haplotype universe from the `#CHROM` header columns.
    fn read_sample_header(&mut self, line: &[u8]) -> Result<()> {
        let line = if line.last() == Some(&b'\n') { &line[..line.len() - 1] } else { line };
        let columns = line
            .split(|&c| c == b'\t' || c == b' ')
            .filter(|f| !f.is_empty())
            .count();
        let n_samples = columns.saturating_sub(9);
        if 2 * n_samples > u16::MAX as usize {
            return Err(Error::InvalidRecord(format!(
                "{} samples exceed the {} haplotypes the index supports", n_samples, u16::MAX
            )));
        }
        self.n_haplotypes = Some(2 * n_samples);
        if self.verbose {
            eprintln!("The VCF file contains {} samples ({} haplotypes)", n_samples, 2 * n_samples);
        }
        Ok(())
    }

    // Processes one data line.
    fn process_line(&mut self, line: &[u8]) -> Result<()> {
        let record = VariantRecord::parse(line)?;
        let edge = match record.classify()? {
            VariantKind::Snp => {
                let edge = self.resolver.substitution_edge(record.offset, &record.alternate)?;
                self.n_substitutions += 1;
                edge
            },
            VariantKind::Deletion => {
                let edge = self.resolver.deletion_edge(record.offset + 1, record.reference.len() - 1)?;
                self.n_deletions += 1;
                edge
            },
            VariantKind::Insertion => {
                self.n_skipped += 1;
                return Ok(());
            },
        };
        self.store_variant(&record, edge)
    }

    // Records the variant edge and appends the genotype contributions of
    // every sample to the haplotype and missing runs.
    fn store_variant(&mut self, record: &VariantRecord, edge: (usize, usize)) -> Result<()> {
        let (from_node, to_node) = edge;
        let index = from_node
            .checked_sub(self.min_node)
            .filter(|&index| index < self.to_nodes.len())
            .ok_or_else(|| Error::Graph(format!("node {} is outside the graph", from_node)))?;
        let to = u32::try_from(to_node).map_err(|_| {
            Error::Graph(format!("node identifier {} does not fit in 32 bits", to_node))
        })?;

        let n_haplotypes = self.n_haplotypes.unwrap_or(0);
        if 2 * record.genotypes.len() != n_haplotypes {
            return Err(Error::InvalidRecord(format!(
                "record at position {} has {} genotype columns for {} samples",
                record.position(), record.genotypes.len(), n_haplotypes / 2
            )));
        }

        self.to_nodes[index] = to;
        self.haplotype_offsets[index] = Self::buffer_offset(&self.haplotypes)?;
        self.missing_offsets[index] = Self::buffer_offset(&self.missing_haplotypes)?;

        let mut n_alt: u16 = 0;
        let mut n_missing: u16 = 0;
        for (sample, field) in record.genotypes.iter().enumerate() {
            let genotype = Genotype::parse(field)?;
            let copy0 = (2 * sample) as u16;
            let copy1 = copy0 + 1;
            match genotype {
                Genotype::RefRef => (),
                Genotype::RefAlt => {
                    self.haplotypes.push(copy1);
                    n_alt += 1;
                },
                Genotype::AltRef => {
                    self.haplotypes.push(copy0);
                    n_alt += 1;
                },
                Genotype::AltAlt => {
                    self.haplotypes.push(copy0);
                    self.haplotypes.push(copy1);
                    n_alt += 2;
                },
                Genotype::Missing => {
                    self.missing_haplotypes.push(copy0);
                    self.missing_haplotypes.push(copy1);
                    n_missing += 2;
                },
            }
        }
        self.haplotype_counts[index] = n_alt;
        self.missing_counts[index] = n_missing;
        Ok(())
    }

    // Returns the current length of the buffer as a run offset.
    fn buffer_offset(buffer: &[u16]) -> Result<u32> {
        u32::try_from(buffer.len()).map_err(|_| {
            Error::Graph(String::from("the haplotype buffer exceeds 32-bit offsets"))
        })
    }

    // Freezes the arrays into an immutable index.
    fn freeze(self) -> VcfMap {
        VcfMap::new(
            self.min_node,
            self.n_haplotypes.unwrap_or(0),
            self.to_nodes,
            self.haplotype_offsets, self.haplotype_counts, self.haplotypes,
            self.missing_offsets, self.missing_counts, self.missing_haplotypes,
        )
    }
}

//-----------------------------------------------------------------------------
