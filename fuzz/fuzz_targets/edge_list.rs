#![no_main]

use libfuzzer_sys::fuzz_target;
use storygraph_core::{NodeId, StoryGraph, ValidationConfig, validate};

fuzz_target!(|data: &[u8]| {
    let Ok(edges) = serde_json::from_slice::<Vec<(u64, u64)>>(data) else {
        return;
    };

    let nodes = edges.iter().flat_map(|&(a, b)| [NodeId(a), NodeId(b)]);
    let graph = StoryGraph::from_edges(
        nodes,
        edges.iter().map(|&(a, b)| (NodeId(a), NodeId(b))),
    )
    .unwrap();

    let report = validate(&graph, &ValidationConfig::default());
    assert_eq!(report.stats.edge_count, edges.len());
    assert_eq!(report.is_clean(), report.cycles.is_empty() && report.self_loops.is_empty());
    for cycle in &report.cycles {
        assert!(!cycle.suggested_breaks.is_empty());
    }
});
