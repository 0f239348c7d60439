#![no_main]

use libfuzzer_sys::fuzz_target;
use storygraph_core::{NodeId, StoryGraph, find_cycle_path};

// Each 3-byte chunk is one editor operation over a small id space so that
// edges and removals actually collide.
fuzz_target!(|data: &[u8]| {
    let mut graph = StoryGraph::new();

    for op in data.chunks_exact(3) {
        let a = NodeId(u64::from(op[1] % 32));
        let b = NodeId(u64::from(op[2] % 32));
        match op[0] % 5 {
            0 => {
                graph.insert_node(a);
            }
            1 => {
                graph.remove_node(a);
            }
            2 => {
                let _ = graph.insert_edge(a, b);
            }
            3 => {
                graph.remove_edge(a, b);
            }
            _ => {
                let probe = graph.would_create_cycle(a, b);
                assert_eq!(probe, find_cycle_path(&graph, a, b).is_some());
                if !probe && graph.contains_node(a) && graph.contains_node(b) {
                    let before = graph.detect_cycles();
                    let mut after = graph.clone();
                    after.insert_edge(a, b).unwrap();
                    assert_eq!(before.len(), after.detect_cycles().len());
                }
            }
        }
    }

    let cycles = graph.detect_cycles();
    let mut seen = std::collections::HashSet::new();
    for component in &cycles {
        assert!(component.len() > 1);
        for node in component {
            assert!(graph.contains_node(*node));
            assert!(seen.insert(*node));
        }
    }
});
