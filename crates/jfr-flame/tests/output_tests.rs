use jfr_flame::aggregator::parse_collapsed;
use jfr_flame::decode::DecodeOptions;
use jfr_flame::flamegraph::{build_graph_data, render_svg, FlamegraphConfig, WeightKind};
use jfr_flame::model::{DiffDetails, Frame, FrameType, GraphData, Level, Serie};
use jfr_flame::output::{read_graph_json, validate_path, write_graph_json, write_svg, write_wire};
use jfr_flame::source::{load_graph, FileSource};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::NamedTempFile;

fn create_test_graph() -> GraphData {
    let mut root = Frame::new(0, 10, "all", FrameType::Unknown);
    root.diff_details = Some(DiffDetails {
        samples: -2,
        weight: 0,
        percent_samples: 20.0,
        percent_weight: 0.0,
    });
    let mut leaf = Frame::new(0, 10, "Main.run", FrameType::JitCompiled);
    leaf.self_samples = Some(10);
    leaf.before_marker = true;

    let mut graph = GraphData::default();
    graph.flamegraph.depth = 2;
    graph.flamegraph.levels = vec![Level::new(vec![root]), Level::new(vec![leaf])];
    graph.timeseries.series = vec![Serie::new("Samples", vec![(1_000, 10)])];
    graph
}

#[test]
fn test_write_and_read_graph_json() {
    let graph = create_test_graph();
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    write_graph_json(&graph, path).unwrap();
    let loaded = read_graph_json(path).unwrap();

    assert_eq!(loaded, graph);
}

#[test]
fn test_validate_output_path_empty() {
    assert!(validate_path(Path::new("")).is_err());
}

#[test]
fn test_validate_output_path_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    assert!(validate_path(temp_dir.path()).is_err());
}

#[test]
fn test_write_creates_parent_dirs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let nested_path = temp_dir.path().join("nested/dirs/graph.json");

    write_graph_json(&create_test_graph(), &nested_path).unwrap();
    assert!(nested_path.exists());
}

#[test]
fn test_rendered_svg_is_written() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("graph.svg");

    let graph = create_test_graph();
    let svg = render_svg(&graph.flamegraph, &FlamegraphConfig::new()).unwrap();
    write_svg(&svg, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("<svg"));
    assert!(written.contains("Main.run"));
}

#[test]
fn test_wire_file_loads_through_file_source() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("graph.pb");

    let stacks = parse_collapsed("main;work_[j] 3\nmain 1\n").unwrap();
    write_wire(&build_graph_data(&stacks, WeightKind::Samples).unwrap(), &path).unwrap();

    let graph = load_graph(&FileSource::new(&path), &DecodeOptions::default()).unwrap();
    assert_eq!(graph.flamegraph.levels.len(), 3);
    assert_eq!(graph.flamegraph.levels[2].frames[0].title, "work");
    assert_eq!(graph.flamegraph.levels[1].frames[0].self_samples, Some(1));
}
