use crate::graph::GraphAccess;
use crate::ref_path::ReferencePath;

//-----------------------------------------------------------------------------

// A small in-memory graph for tests.

pub(crate) struct MemoryGraph {
    min_node: usize,
    sequences: Vec<Vec<u8>>,
    edges: Vec<Vec<usize>>,
}

impl MemoryGraph {
    pub(crate) fn new(min_node: usize, sequences: &[&[u8]], edges: &[(usize, usize)]) -> Self {
        let sequences: Vec<Vec<u8>> = sequences.iter().map(|s| s.to_vec()).collect();
        let mut graph = MemoryGraph {
            min_node,
            edges: vec![Vec::new(); sequences.len()],
            sequences,
        };
        for (from, to) in edges {
            graph.edges[from - min_node].push(*to);
        }
        graph
    }
}

impl GraphAccess for MemoryGraph {
    fn min_node(&self) -> usize {
        self.min_node
    }

    fn max_node(&self) -> usize {
        self.min_node + self.sequences.len() - 1
    }

    fn successors(&self, node_id: usize) -> Option<Vec<usize>> {
        let index = node_id.checked_sub(self.min_node)?;
        self.edges.get(index).cloned()
    }

    fn first_base(&self, node_id: usize) -> Option<u8> {
        let index = node_id.checked_sub(self.min_node)?;
        self.sequences.get(index)?.first().copied()
    }
}

//-----------------------------------------------------------------------------

// The standard test graph: a SNP bubble and a deletion over two reference
// nodes.
//
//          12: A
//         /     \
// 11: ACGT       14: GG -> 15: TT -> 16: CA -> 17: T
//         \     /      \_______________/
//          13: C           (deletion)
//
// Reference path: 11, 12, 14, 15, 16, 17 (length 12).
// Node starts on the path: 11 at 0, 12 at 4, 14 at 5, 15 at 7, 16 at 9,
// 17 at 11.

pub(crate) fn bubble_graph() -> MemoryGraph {
    MemoryGraph::new(
        11,
        &[b"ACGT", b"A", b"C", b"GG", b"TT", b"CA", b"T"],
        &[
            (11, 12), (11, 13),
            (12, 14), (13, 14),
            (14, 15), (14, 16),
            (15, 16),
            (16, 17),
        ],
    )
}

pub(crate) fn bubble_ref_path() -> ReferencePath {
    let path = ReferencePath::with_lengths(vec![11, 12, 14, 15, 16, 17], &[4, 1, 2, 2, 2, 1]);
    assert!(path.is_ok(), "Failed to build the reference path: {}", path.unwrap_err());
    path.unwrap()
}

//-----------------------------------------------------------------------------

// VCF fragments matching the standard test graph.

pub(crate) fn vcf_header(samples: &[&str]) -> String {
    let mut header = String::from("##fileformat=VCFv4.2\n");
    header.push_str("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT");
    for sample in samples {
        header.push('\t');
        header.push_str(sample);
    }
    header.push('\n');
    header
}

pub(crate) fn vcf_record(
    position: usize, reference: &str, alternate: &str, info: &str, genotypes: &[&str]
) -> String {
    let mut line = format!("ref\t{}\t.\t{}\t{}\t50\tPASS\t{}\tGT", position, reference, alternate, info);
    for genotype in genotypes {
        line.push('\t');
        line.push_str(genotype);
    }
    line.push('\n');
    line
}

// The SNP at the bubble: reference offset 4, node 12 replaced by node 13.
pub(crate) fn snp_record(genotypes: &[&str]) -> String {
    vcf_record(5, "A", "C", ".", genotypes)
}

// The deletion of node 15: anchor base at reference offset 6, resuming at
// node 16.
pub(crate) fn deletion_record(genotypes: &[&str]) -> String {
    vcf_record(7, "GTT", "G", "VT=INDEL", genotypes)
}

//-----------------------------------------------------------------------------
