use std::collections::HashSet;

use blake3::Hasher;
use pram_tree::*;
use test_helpers::*;

fn fingerprint(order: &DiscoveryOrder, ranks: &Ranks) -> blake3::Hash {
    let mut hasher = Hasher::new();
    for node in order.iter() {
        hasher.update(&(node.index() as u64).to_le_bytes());
    }
    for &position in order.positions() {
        hasher.update(&(position as u64).to_le_bytes());
    }
    for &depth in ranks.as_slice() {
        hasher.update(&(depth as u64).to_le_bytes());
    }
    hasher.finalize()
}

#[test]
fn parallel_rounds_are_deterministic() {
    let n = 20_000;
    let tree = build_tree(n, &scrambled_parents(n, 0x5eed)).expect("tree builds");
    let tour = tree.euler_tour();

    let mut fingerprints = HashSet::new();
    for _ in 0..5 {
        let order =
            compute_discovery_order(&tree, tour.as_slice()).expect("discovery order succeeds");
        let ranks = compute_ranks(&tree).expect("ranks converge");
        fingerprints.insert(fingerprint(&order, &ranks));
    }

    assert_eq!(fingerprints.len(), 1, "outputs diverged across runs");
}

#[test]
fn rounds_match_sequential_oracles() {
    // Holds with and without the `parallel` feature
    let n = 20_000;
    let tree = build_tree(n, &scrambled_parents(n, 0x5eed)).unwrap();
    let order = compute_discovery_order(&tree, tree.euler_tour().as_slice()).unwrap();
    let ranks = compute_ranks(&tree).unwrap();

    let ids: Vec<usize> = order.iter().map(usize::from).collect();
    assert_eq!(ids, reference_preorder(&tree));
    assert_eq!(ranks.as_slice(), tree.depths().as_slice());
}

#[test]
fn round_timeline_is_deterministic() {
    let n = 4_097;
    let tree = build_tree(n, &path_parents(n)).unwrap();

    let profiles: Vec<RoundProfile> = (0..3)
        .map(|_| {
            RankEngine::new(&tree, RankConfig::new())
                .run()
                .expect("ranks converge")
                .profile
        })
        .collect();

    assert_eq!(profiles[0].rounds, 12);
    assert!(profiles.windows(2).all(|pair| pair[0] == pair[1]));
}
