use std::fs;

use pretty_assertions::assert_eq;
use tempfile::tempdir;
use topo::{OutputFormat, TopoOptions, run_main};
use topo_error::ErrorKind;
use topo_render::{RenderableNodes, TopologyKind};
use topo_report::{EdgeMetadata, Report};

const TWO_HOSTS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../testdata/two_hosts.json"
));

fn write_fixture() -> (tempfile::TempDir, String) {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("report.json");
    fs::write(&path, TWO_HOSTS).expect("write fixture");
    (dir, path.display().to_string())
}

fn base_options(report: String, topology: TopologyKind) -> TopoOptions {
    TopoOptions {
        report,
        topology,
        ..TopoOptions::default()
    }
}

#[test]
fn renders_hosts_as_json() {
    let (_dir, path) = write_fixture();
    let output = run_main(&base_options(path, TopologyKind::Hosts)).expect("hosts run");

    let nodes: RenderableNodes = serde_json::from_str(&output).expect("parse output");
    assert_eq!(
        nodes.ids().collect::<Vec<_>>(),
        vec!["host:h1", "host:h2", "theinternet"]
    );
    assert_eq!(nodes.get("host:h2").unwrap().label_major, "db-1");
}

#[test]
fn renders_process_names_as_dot() {
    let (_dir, path) = write_fixture();
    let mut opts = base_options(path, TopologyKind::ProcessNames);
    opts.format = OutputFormat::Dot;

    let output = run_main(&opts).expect("dot run");
    assert!(output.starts_with("digraph topology {"), "unexpected dot: {output}");
    assert!(output.contains(r#""process_name:app" -> "process_name:nginx";"#));
    assert!(output.contains(r#""theinternet"[label="the Internet", style="dashed"];"#));
    assert!(!output.contains("sshd"));
}

#[test]
fn show_unconnected_keeps_isolated_nodes() {
    let (_dir, path) = write_fixture();
    let mut opts = base_options(path, TopologyKind::ProcessNames);
    opts.show_unconnected = true;

    let output = run_main(&opts).expect("process names run");
    let nodes: RenderableNodes = serde_json::from_str(&output).expect("parse output");
    assert!(nodes.contains("process_name:sshd"));
}

#[test]
fn edge_query_returns_metrics() {
    let (_dir, path) = write_fixture();
    let mut opts = base_options(path, TopologyKind::Processes);
    opts.edge = Some(("process:h2:201".to_string(), "process:h1:100".to_string()));

    let output = run_main(&opts).expect("edge run");
    let metadata: EdgeMetadata = serde_json::from_str(&output).expect("parse output");
    assert_eq!(
        metadata,
        EdgeMetadata::new().with_bytes(100, 10).with_max_conn_count_tcp(2)
    );
}

#[test]
fn missing_report_is_file_not_found() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("absent.json").display().to_string();
    let err = run_main(&base_options(path, TopologyKind::Endpoints)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
}

#[test]
fn garbage_report_fails_to_parse() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bad.json");
    fs::write(&path, "{ not json").expect("write");
    let err = run_main(&base_options(path.display().to_string(), TopologyKind::Hosts))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DeserializationFailed);
}

#[test]
fn empty_report_renders_empty_set() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("empty.json");
    fs::write(&path, Report::default().to_json().expect("to json")).expect("write");

    let output = run_main(&base_options(path.display().to_string(), TopologyKind::Endpoints))
        .expect("empty run");
    assert_eq!(output, "{}");
}
