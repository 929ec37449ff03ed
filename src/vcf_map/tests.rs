use super::*;

use simple_sds::serialize;

use std::fs;

//-----------------------------------------------------------------------------

fn haplotype_set(ids: &[u16]) -> BTreeSet<u16> {
    ids.iter().copied().collect()
}

// Nodes 11 to 17 with two recorded variants: a substitution at node 11
// (haplotypes 1, 2, 3 on the edge to node 13) and a deletion at node 14
// (haplotype 0 on the edge to node 16; haplotypes 2 and 3 missing).
fn example_map() -> VcfMap {
    VcfMap::new(
        11, 4,
        vec![13, 0, 0, 16, 0, 0, 0],
        vec![0, 0, 0, 3, 0, 0, 0],
        vec![3, 0, 0, 1, 0, 0, 0],
        vec![1, 2, 3, 0],
        vec![0, 0, 0, 0, 0, 0, 0],
        vec![0, 0, 0, 2, 0, 0, 0],
        vec![2, 3],
    )
}

//-----------------------------------------------------------------------------

#[test]
fn statistics() {
    let map = example_map();
    assert_eq!(map.min_node(), 11, "Wrong minimum node");
    assert_eq!(map.node_count(), 7, "Wrong node count");
    assert_eq!(map.n_haplotypes(), 4, "Wrong haplotype universe");
    assert_eq!(map.variant_count(), 2, "Wrong number of variant edges");
    assert_eq!(map.all_haplotypes(), haplotype_set(&[0, 1, 2, 3]), "Wrong haplotype universe");
}

#[test]
fn nonvariant_nodes() {
    let map = example_map();
    for node in [12, 13, 15, 16, 17] {
        assert_eq!(map.variant_to_node(node), None, "Variant edge at node {}", node);
        assert_eq!(map.haplotypes_on_edge(node, 14), None, "Haplotype set at node {}", node);
        assert_eq!(map.allele_frequency(node, 14), 1.0, "Wrong frequency at node {}", node);
        assert_eq!(map.known_haplotypes_at(node), 4, "Wrong known count at node {}", node);
    }
}

#[test]
fn nodes_outside_the_range() {
    let map = example_map();
    for node in [0, 10, 18, 1000] {
        assert_eq!(map.variant_to_node(node), None, "Variant edge at node {}", node);
        assert_eq!(map.haplotypes_on_edge(node, 14), None, "Haplotype set at node {}", node);
        assert_eq!(map.allele_frequency(node, 14), 1.0, "Wrong frequency at node {}", node);
        assert_eq!(map.known_haplotypes_at(node), 4, "Wrong known count at node {}", node);
    }
}

#[test]
fn edges_at_variant_nodes() {
    let map = example_map();
    assert_eq!(map.variant_to_node(11), Some(13), "Wrong variant edge at node 11");
    assert_eq!(
        map.haplotypes_on_edge(11, 13), Some(haplotype_set(&[1, 2, 3])),
        "Wrong haplotypes on the recorded edge of node 11"
    );
    assert_eq!(
        map.haplotypes_on_edge(11, 12), Some(haplotype_set(&[0])),
        "Wrong haplotypes on the other edge of node 11"
    );

    assert_eq!(map.variant_to_node(14), Some(16), "Wrong variant edge at node 14");
    assert_eq!(
        map.haplotypes_on_edge(14, 16), Some(haplotype_set(&[0])),
        "Wrong haplotypes on the recorded edge of node 14"
    );
    assert_eq!(
        map.haplotypes_on_edge(14, 15), Some(haplotype_set(&[1])),
        "Wrong haplotypes on the other edge of node 14"
    );
}

#[test]
fn any_other_target_is_the_other_edge() {
    // The closed world has two edges. Any target except the recorded one
    // gets the complement, whether or not such an edge exists.
    let map = example_map();
    assert_eq!(
        map.haplotypes_on_edge(11, 999), map.haplotypes_on_edge(11, 12),
        "Different complements for different non-recorded targets"
    );
}

#[test]
fn two_edge_cover() {
    let map = example_map();
    for (node, recorded, other, missing) in [(11, 13, 12, vec![]), (14, 16, 15, vec![2, 3])] {
        let on_recorded = map.haplotypes_on_edge(node, recorded).unwrap();
        let on_other = map.haplotypes_on_edge(node, other).unwrap();
        assert!(on_recorded.is_disjoint(&on_other), "Edge sets overlap at node {}", node);

        let union: BTreeSet<u16> = on_recorded.union(&on_other).copied().collect();
        let expected: BTreeSet<u16> = map.all_haplotypes()
            .difference(&haplotype_set(&missing)).copied().collect();
        assert_eq!(union, expected, "Edge sets do not cover the known universe at node {}", node);
    }
}

#[test]
fn frequencies() {
    let map = example_map();
    assert_eq!(map.allele_frequency(11, 13), 0.75, "Wrong frequency for the recorded edge");
    assert_eq!(map.allele_frequency(11, 12), 0.25, "Wrong frequency for the other edge");
    assert_eq!(map.known_haplotypes_at(14), 2, "Wrong known count with missing haplotypes");
    assert_eq!(map.allele_frequency(14, 16), 0.5, "Wrong frequency with missing haplotypes");
    assert_eq!(map.allele_frequency(14, 15), 0.5, "Wrong frequency with missing haplotypes");
}

#[test]
fn fully_missing_site() {
    let map = VcfMap::new(
        11, 4,
        vec![13], vec![0], vec![0], Vec::new(),
        vec![0], vec![4], vec![0, 1, 2, 3],
    );
    assert_eq!(map.known_haplotypes_at(11), 0, "Wrong known count at a fully missing site");
    assert_eq!(
        map.haplotypes_on_edge(11, 13), Some(BTreeSet::new()),
        "Haplotypes on the recorded edge of a fully missing site"
    );
    assert_eq!(map.allele_frequency(11, 13), 0.0, "Wrong frequency at a fully missing site");
}

//-----------------------------------------------------------------------------

#[test]
fn path_queries() {
    let map = example_map();

    // No variant edges: the path does not constrain the haplotypes.
    assert_eq!(
        map.haplotypes_on_path(&[15, 16, 17]), map.all_haplotypes(),
        "A path without variant edges constrained the haplotypes"
    );
    assert_eq!(map.haplotypes_on_path(&[11]), map.all_haplotypes(), "Wrong result for a trivial path");
    assert_eq!(map.haplotypes_on_path(&[]), map.all_haplotypes(), "Wrong result for an empty path");

    // One variant edge.
    assert_eq!(
        map.haplotypes_on_path(&[11, 13, 14]), haplotype_set(&[1, 2, 3]),
        "Wrong haplotypes for a path with one variant edge"
    );

    // Two variant edges: the intersection of the two sets.
    assert_eq!(
        map.haplotypes_on_path(&[11, 13, 14, 15]), haplotype_set(&[1]),
        "Wrong haplotypes for a path with two variant edges"
    );
    assert_eq!(
        map.haplotypes_on_path(&[11, 13, 14, 16]), BTreeSet::new(),
        "Wrong haplotypes for inconsistent variant edges"
    );
}

//-----------------------------------------------------------------------------

#[test]
fn round_trip_in_memory() {
    let map = example_map();
    let mut bytes: Vec<u8> = Vec::new();
    map.serialize(&mut bytes).unwrap();

    let loaded = VcfMap::load(&mut bytes.as_slice());
    assert!(loaded.is_ok(), "Failed to load the index: {}", loaded.unwrap_err());
    assert_eq!(loaded.unwrap(), map, "The loaded index differs from the original");
}

#[test]
fn round_trip_through_file() {
    let map = example_map();
    let filename = serialize::temp_file_name("vcf-map");
    let result = map.to_file(&filename);
    assert!(result.is_ok(), "Failed to write the index: {}", result.unwrap_err());

    let loaded = VcfMap::from_file(&filename);
    assert!(loaded.is_ok(), "Failed to load the index: {}", loaded.unwrap_err());
    let loaded = loaded.unwrap();
    assert_eq!(loaded, map, "The loaded index differs from the original");

    // Query results must be identical, not just the arrays.
    assert_eq!(
        loaded.haplotypes_on_edge(11, 13), map.haplotypes_on_edge(11, 13),
        "Different query results after the round trip"
    );
    assert_eq!(
        loaded.haplotypes_on_path(&[11, 13, 14, 15]), map.haplotypes_on_path(&[11, 13, 14, 15]),
        "Different path results after the round trip"
    );
    assert_eq!(loaded.allele_frequency(14, 16), map.allele_frequency(14, 16), "Different frequencies");

    fs::remove_file(&filename).unwrap();
}

#[test]
fn load_rejects_inconsistent_arrays() {
    // A run extending past the end of the haplotype buffer.
    let broken = VcfMap::new(
        11, 4,
        vec![13], vec![2], vec![3], vec![1, 2, 3],
        vec![0], vec![0], Vec::new(),
    );
    let mut bytes: Vec<u8> = Vec::new();
    broken.serialize(&mut bytes).unwrap();
    let result = VcfMap::load(&mut bytes.as_slice());
    assert!(matches!(result, Err(Error::Archive(_))), "An out-of-bounds run was accepted");

    // A haplotype identifier outside the universe.
    let broken = VcfMap::new(
        11, 2,
        vec![13], vec![0], vec![1], vec![5],
        vec![0], vec![0], Vec::new(),
    );
    let mut bytes: Vec<u8> = Vec::new();
    broken.serialize(&mut bytes).unwrap();
    let result = VcfMap::load(&mut bytes.as_slice());
    assert!(matches!(result, Err(Error::Archive(_))), "An out-of-universe haplotype was accepted");

    // Mismatched per-node array lengths.
    let broken = VcfMap::new(
        11, 4,
        vec![13, 0], vec![0], vec![0], Vec::new(),
        vec![0], vec![0], Vec::new(),
    );
    let mut bytes: Vec<u8> = Vec::new();
    broken.serialize(&mut bytes).unwrap();
    let result = VcfMap::load(&mut bytes.as_slice());
    assert!(matches!(result, Err(Error::Archive(_))), "Mismatched array lengths were accepted");
}

//-----------------------------------------------------------------------------
