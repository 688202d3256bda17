//! Correctness tests: parallel pipelines against the example tree and
//! shapes with known answers

use pram_tree::*;
use test_helpers::*;

#[test]
fn test_fixture_discovery_order() {
    let tree = fixture_tree();
    let order = compute_discovery_order(&tree, &FIXTURE_TOUR).expect("tour is valid");

    let ids: Vec<usize> = order.iter().map(usize::from).collect();
    assert_eq!(ids, vec![0, 1, 3, 4, 5, 2]);
    assert_eq!(order[0], tree.root(), "root is discovered first");

    // D is the exact inverse of A
    for k in 0..order.len() {
        assert_eq!(order.position(order[k]), k);
    }
}

#[test]
fn test_fixture_ranks() {
    let tree = fixture_tree();
    let ranks = compute_ranks(&tree).expect("ranks converge");

    let expected: std::collections::BTreeMap<usize, usize> =
        [(0, 0), (1, 1), (2, 1), (3, 2), (4, 3), (5, 3)].into_iter().collect();
    assert_eq!(ranks.to_map(), expected);
}

#[test]
fn test_ranks_follow_parent_relation() {
    let tree = fixture_tree();
    let ranks = compute_ranks(&tree).unwrap();

    assert_eq!(ranks[tree.root()], 0);
    for node in tree.iter_nodes() {
        if let ParentId::Node(parent) = node.parent() {
            assert_eq!(ranks[node.id()], ranks[parent] + 1, "node {}", node.id());
        }
    }
}

#[test]
fn test_path_graph_worst_case_depth() {
    for n in [2, 3, 5, 8, 9, 17, 64, 100, 1025] {
        let tree = build_tree(n, &path_parents(n)).unwrap();
        let ranks = compute_ranks(&tree).unwrap();
        let expected: Vec<usize> = (0..n).collect();
        assert_eq!(ranks.as_slice(), expected.as_slice(), "path of {n}");
    }
}

#[test]
fn test_path_graph_round_count_tracks_depth() {
    let n = 1025;
    let tree = build_tree(n, &path_parents(n)).unwrap();
    let outcome = RankEngine::new(&tree, RankConfig::new()).run().unwrap();
    // height 1024 needs exactly 10 doublings
    assert_eq!(outcome.profile.rounds, 10);
    assert_eq!(outcome.profile.converged_at(n), Some(10));
}

#[test]
fn test_star_converges_without_rounds() {
    let tree = build_tree(50, &star_parents(50)).unwrap();
    let outcome = RankEngine::new(&tree, RankConfig::new()).run().unwrap();
    assert_eq!(outcome.profile.rounds, 0);
    assert!(outcome.ranks.iter().skip(1).all(|(_, depth)| depth == 1));
}

#[test]
fn test_single_node() {
    let tree = build_tree(1, &[0]).unwrap();
    let outcome = RankEngine::new(&tree, RankConfig::new()).run().unwrap();
    assert_eq!(outcome.ranks.as_slice(), &[0]);
    assert_eq!(outcome.profile.rounds, 0);

    let order = compute_discovery_order(&tree, &[0]).unwrap();
    assert_eq!(order.order(), &[NodeId::from(0)]);
}

#[test]
fn test_extra_round_is_idempotent() {
    let n = 37;
    let tree = build_tree(n, &scrambled_parents(n, 11)).unwrap();
    let mut engine = RankEngine::new(&tree, RankConfig::new());
    while !engine.is_converged() {
        engine.step();
    }

    let ranks = engine.state().ranks();
    let ancestors = engine.state().ancestors();
    for _ in 0..3 {
        let report = engine.step();
        assert_eq!(report.changed, 0);
        assert_eq!(report.settled, n);
    }
    assert_eq!(engine.state().ranks(), ranks);
    assert_eq!(engine.state().ancestors(), ancestors);
}

#[test]
fn test_parent_relation_survives_ranking() {
    let tree = fixture_tree();
    let before: Vec<ParentId> = tree.iter_nodes().map(|node| node.parent()).collect();
    compute_ranks(&tree).unwrap();
    let after: Vec<ParentId> = tree.iter_nodes().map(|node| node.parent()).collect();
    assert_eq!(before, after);
    assert_eq!(tree.parent(tree.root()), ParentId::Root);
}

#[test]
fn test_rooted_away_from_zero() {
    // Root is node 4; ids are not in preorder
    let parents = [4, 0, 4, 1, 4, 2];
    let tree = build_tree(6, &parents).unwrap();
    let tour = tree.euler_tour();
    assert_eq!(tour.as_slice(), &[4, 0, 1, 3, 1, 0, 4, 2, 5, 2, 4]);

    let order = compute_discovery_order(&tree, tour.as_slice()).unwrap();
    let ids: Vec<usize> = order.iter().map(usize::from).collect();
    assert_eq!(ids, vec![4, 0, 1, 3, 2, 5]);
    assert_eq!(compute_ranks(&tree).unwrap().as_slice(), &[1, 2, 1, 3, 0, 2]);
}
