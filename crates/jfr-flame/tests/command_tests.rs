use jfr_flame::color::RED_COLORS;
use jfr_flame::commands::{
    execute_build, execute_decode, execute_diff, resolve_color, validate_args, BuildArgs,
    ColorArgs, DecodeArgs, DiffArgs,
};
use jfr_flame::decode::{decode_graph_data, DecodeOptions};
use jfr_flame::flamegraph::WeightKind;
use jfr_flame::output::read_graph_json;
use std::fs;
use std::path::PathBuf;

#[test]
fn test_validate_args_valid() {
    let args = DecodeArgs {
        input: Some(PathBuf::from("graph.pb")),
        ..Default::default()
    };
    assert!(validate_args(&args).is_ok());

    let args = DecodeArgs {
        url: Some("https://localhost:8585/api/flamegraph".to_string()),
        body: Some(r#"{"eventType":"jdk.ExecutionSample"}"#.to_string()),
        ..Default::default()
    };
    assert!(validate_args(&args).is_ok());
}

#[test]
fn test_validate_args_invalid_scheme() {
    let args = DecodeArgs {
        url: Some("localhost:8585".to_string()),
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_build_then_decode() {
    let temp_dir = tempfile::tempdir().unwrap();
    let stacks = temp_dir.path().join("stacks.collapsed");
    let wire = temp_dir.path().join("out/graph.pb");
    let json = temp_dir.path().join("graph.json");
    let svg = temp_dir.path().join("graph.svg");
    fs::write(&stacks, "main;a_[j] 3 300\nmain;b 1 100\n").unwrap();

    execute_build(BuildArgs {
        input: stacks,
        output: wire.clone(),
        kind: WeightKind::Allocation,
    })
    .unwrap();
    assert!(wire.exists());

    execute_decode(DecodeArgs {
        input: Some(wire),
        output_json: Some(json.clone()),
        output_svg: Some(svg.clone()),
        use_weight: true,
        print_summary: true,
        print_tree: true,
        ..Default::default()
    })
    .unwrap();

    let graph = read_graph_json(&json).unwrap();
    assert_eq!(graph.flamegraph.levels[0].frames[0].total_weight, 400);
    assert!(svg.exists());
}

#[test]
fn test_build_merges_repeated_stacks() {
    let temp_dir = tempfile::tempdir().unwrap();
    let stacks = temp_dir.path().join("stacks.collapsed");
    let wire = temp_dir.path().join("graph.pb");
    fs::write(&stacks, "main;a 1\nmain;a 2\n").unwrap();

    execute_build(BuildArgs {
        input: stacks,
        output: wire.clone(),
        kind: WeightKind::Samples,
    })
    .unwrap();

    let bytes = fs::read(&wire).unwrap();
    let graph = decode_graph_data(&bytes, &DecodeOptions::default()).unwrap();
    let levels = &graph.flamegraph.levels;
    assert_eq!(levels[0].frames[0].title, "3 Event(s)");
    assert_eq!(levels[2].frames.len(), 1);
    assert_eq!(levels[2].frames[0].total_samples, 3);
}

#[test]
fn test_diff_command_writes_outputs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let primary = temp_dir.path().join("primary.collapsed");
    let secondary = temp_dir.path().join("secondary.collapsed");
    fs::write(&primary, "main;a 8\nmain;b 2\n").unwrap();
    fs::write(&secondary, "main;a 4\n").unwrap();

    let output = temp_dir.path().join("diff.pb");
    let svg = temp_dir.path().join("diff.svg");
    execute_diff(DiffArgs {
        primary,
        secondary,
        output: output.clone(),
        output_svg: Some(svg.clone()),
        summary: true,
    })
    .unwrap();

    assert!(output.exists());
    let rendered = fs::read_to_string(&svg).unwrap();
    assert!(rendered.contains(RED_COLORS[4]));
    assert!(!rendered.contains(RED_COLORS[5]));
}

#[test]
fn test_decode_missing_file_fails() {
    let args = DecodeArgs {
        input: Some(PathBuf::from("/nonexistent/graph.pb")),
        ..Default::default()
    };
    assert!(execute_decode(args).is_err());
}

#[test]
fn test_resolve_color_command() {
    let args = ColorArgs {
        frame_type: "NATIVE".to_string(),
        primary: Some(100.0),
        secondary: Some(50.0),
        ..Default::default()
    };
    assert_eq!(resolve_color(&args).unwrap(), RED_COLORS[2]);
}
