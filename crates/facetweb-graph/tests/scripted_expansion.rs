//! End-to-end expansion over a script loaded from disk.

use std::sync::Arc;

use facetweb_graph::{ExpansionConfig, GraphBuilder, compute_stats, validate_graph};
use facetweb_search::{FacetQuery, ScriptedSearchBackend};
use serde_json::json;

fn write_script(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("script.json");
    let script = json!({
        "aspirin": ["headache", "fever", "chest pain"],
        "(aspirin) AND \"headache\"": ["migraine", "fever"],
        "(aspirin) AND \"fever\"": ["headache"],
        "(aspirin) AND \"chest pain\"": ["heart attack", "aspirin"]
    });
    std::fs::write(&path, script.to_string()).unwrap();
    path
}

#[tokio::test]
async fn test_expansion_from_script_file() {
    let dir = tempfile::tempdir().unwrap();
    let backend = ScriptedSearchBackend::from_json_file(write_script(&dir)).unwrap();
    let builder = GraphBuilder::new(
        FacetQuery::new(Arc::new(backend)),
        ExpansionConfig::default(),
    );

    let (graph, report) = builder.build_with_report("aspirin", "symptom").await;

    let json: serde_json::Value = serde_json::from_str(&graph.to_json().unwrap()).unwrap();
    assert_eq!(
        json,
        json!({
            "nodes": [
                {"name": "aspirin"},
                {"name": "headache"},
                {"name": "fever"},
                {"name": "chest pain"},
                {"name": "migraine"},
                {"name": "heart attack"}
            ],
            "edges": [
                {"source": 0, "target": 1},
                {"source": 0, "target": 2},
                {"source": 0, "target": 3},
                {"source": 1, "target": 4},
                {"source": 1, "target": 2},
                {"source": 2, "target": 1},
                {"source": 3, "target": 5},
                {"source": 3, "target": 0}
            ]
        })
    );
    assert_eq!(report.queries_issued, 4);
    assert!(report.is_complete());

    let stats = compute_stats(&graph);
    assert_eq!(stats.node_count, 6);
    assert_eq!(stats.edge_count, 8);
    assert_eq!(stats.orphan_count, 0);
    assert!(validate_graph(&graph).valid);
}

#[tokio::test]
async fn test_small_limits_trim_each_level() {
    let dir = tempfile::tempdir().unwrap();
    let backend = ScriptedSearchBackend::from_json_file(write_script(&dir)).unwrap();
    let config = ExpansionConfig {
        level2_max_facets: 1,
        level3_max_facets_per_branch: 1,
        ..Default::default()
    };
    let builder = GraphBuilder::new(FacetQuery::new(Arc::new(backend)), config);

    let graph = builder.build("aspirin", "symptom").await;

    let labels: Vec<&str> = graph.nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(labels, vec!["aspirin", "headache", "migraine"]);
    assert_eq!(graph.edge_count(), 2);
}
