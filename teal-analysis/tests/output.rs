use std::fs;

use serde_json::{json, Value};
use teal_analysis::prelude::*;

const SUBROUTINE_CALLED_TWICE: &str = "#pragma version 7
callsub s
callsub s
int 1
return
s:
retsub";

#[test]
fn dot_export_has_one_node_per_block_and_one_edge_per_link() {
    let teal = parse_teal(SUBROUTINE_CALLED_TWICE, "t").unwrap();
    let dot = render_dot(&teal);

    assert!(dot.starts_with("digraph g {"));
    for block in teal.blocks() {
        assert!(dot.contains(&format!("block {}; cost = {}", block.idx(), block.cost())));
    }
    assert!(dot.contains("0 -> 1\n"));
    assert!(dot.contains("1 -> 2\n"));
    assert!(!dot.contains("3 -> "));
}

#[test]
fn dot_export_escapes_quotes() {
    let teal = parse_teal("#pragma version 7\nbyte \"hi\"\npop\nint 1\nreturn", "t").unwrap();
    let dot = render_dot(&teal);
    assert!(dot.contains("byte \\\"hi\\\""));
}

#[test]
fn cfg_export_writes_the_requested_file() {
    let teal = parse_teal(SUBROUTINE_CALLED_TWICE, "t").unwrap();
    let path = std::env::temp_dir().join("teal_analysis_cfg_export_test.dot");
    teal.export_cfg(&path).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, render_dot(&teal));
    fs::remove_file(&path).unwrap();
}

#[test]
fn cfg_printer_writes_into_the_destination() {
    let mut teal = parse_teal(SUBROUTINE_CALLED_TWICE, "approval").unwrap();
    teal.register_printer(Box::new(CfgPrinter));
    let dest = std::env::temp_dir();
    teal.run_printers(&dest).unwrap();
    let path = dest.join("approval_cfg.dot");
    assert!(path.exists());
    fs::remove_file(&path).unwrap();
}

#[test]
fn printer_registry_resolves_names() {
    assert_eq!(printers_by_name(&["cfg"]).unwrap().len(), 1);
    let err = printers_by_name(&["nonsense"]).unwrap_err();
    assert!(matches!(err, TealError::UnknownPrinter(name) if name == "nonsense"));
}

#[test]
fn json_report_shape() {
    let mut teal = parse_teal(SUBROUTINE_CALLED_TWICE, "t").unwrap();
    teal.register_detector(Box::new(CanUpdate));
    let report = AnalysisReport::completed(teal.run_detectors());
    let value: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(value["success"], json!(true));
    assert_eq!(value["error"], Value::Null);
    assert_eq!(value["result"][0]["check"], json!("can-update"));
    assert_eq!(value["result"][0]["paths"], json!([[0, 3, 1, 3, 2]]));
}

#[test]
fn failed_report_carries_the_error() {
    let report =
        AnalysisReport::failed(TealError::UnknownDetector("nonsense".to_string()).to_string());
    let value: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(value["success"], json!(false));
    assert_eq!(value["error"], json!("nonsense is not a detector"));
    assert_eq!(value["result"], json!([]));
}
