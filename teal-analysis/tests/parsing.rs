use teal_analysis::prelude::*;

#[test]
fn pragma_only_program() {
    let teal = parse_teal("#pragma version 7", "t").unwrap();
    assert_eq!(teal.version(), 7);
    assert_eq!(teal.mode(), ContractType::Any);
    assert_eq!(teal.blocks().len(), 1);
    assert_eq!(teal.instructions().len(), 1);
    assert!(teal.diagnostics().is_empty());
}

#[test]
fn version_defaults_to_one() {
    let teal = parse_teal("int 1\nreturn", "t").unwrap();
    assert_eq!(teal.version(), 1);
}

#[test]
fn line_numbers_are_one_based_and_unique() {
    let source = "#pragma version 7\n\n// a comment\nint 1\nreturn";
    let teal = parse_teal(source, "t").unwrap();
    let lines: Vec<usize> = teal.instructions().iter().map(|i| i.line()).collect();
    assert_eq!(lines, vec![1, 4, 5]);
    assert!(lines.iter().all(|l| *l >= 1));
}

#[test]
fn comments_attach_to_the_next_instruction() {
    let source = "// reject by default\n// unless approved\nint 0\nreturn";
    let teal = parse_teal(source, "t").unwrap();
    let first = &teal.instructions()[0];
    assert_eq!(
        first.comments_before(),
        &[
            "// reject by default".to_string(),
            "// unless approved".to_string()
        ]
    );
    assert!(teal.instructions()[1].comments_before().is_empty());
}

#[test]
fn parse_error_carries_zero_based_line() {
    let err = parse_teal("int 1\nfrobnicate\nreturn", "t").unwrap_err();
    assert_eq!(err.line, 1);
    assert!(err.reason.contains("frobnicate"));
}

#[test]
fn empty_source_is_a_parse_error() {
    assert!(parse_teal("", "t").is_err());
    assert!(parse_teal("// nothing but comments", "t").is_err());
}

#[test]
fn version_mismatch_is_diagnosed_but_not_fatal() {
    let teal = parse_teal("#pragma version 3\nlog\nint 1\nreturn", "t").unwrap();
    assert_eq!(teal.version(), 3);
    let diagnostic = teal
        .diagnostics()
        .iter()
        .find_map(|d| match d {
            ValidationDiagnostic::InstructionVersion { line, required, .. } => {
                Some((*line, *required))
            }
            _ => None,
        })
        .expect("log requires version 5");
    assert_eq!(diagnostic, (2, 5));
}

#[test]
fn field_version_mismatch_is_diagnosed() {
    // StateProofPK appeared in version 6
    let teal = parse_teal("#pragma version 5\ntxn StateProofPK\nreturn", "t").unwrap();
    assert!(teal.diagnostics().iter().any(|d| matches!(
        d,
        ValidationDiagnostic::FieldVersion { required: 6, .. }
    )));
}

#[test]
fn mode_conflict_is_diagnosed_and_first_restricted_instruction_wins() {
    let source = "#pragma version 2\nint 0\napp_global_get\npop\narg 0\npop\nint 1\nreturn";
    let teal = parse_teal(source, "t").unwrap();
    assert_eq!(teal.mode(), ContractType::Stateful);
    let conflict = teal
        .diagnostics()
        .iter()
        .find_map(|d| match d {
            ValidationDiagnostic::ModeConflict {
                stateless,
                stateful,
            } => Some((stateless.len(), stateful.len())),
            _ => None,
        })
        .expect("mode conflict expected");
    assert_eq!(conflict, (1, 1));
}

#[test]
fn stateless_program_mode() {
    let teal = parse_teal("arg 0\nreturn", "t").unwrap();
    assert_eq!(teal.mode(), ContractType::Stateless);
}

#[test]
fn method_selector_annotation_hashes_the_stored_signature() {
    let source = "#pragma version 7\nmethod \"add(uint64,uint64)uint64\"\nreturn";
    let teal = parse_teal(source, "t").unwrap();
    let method_ins = &teal.instructions()[1];

    // the signature keeps its quotes, and the selector is derived from
    // the quoted string
    let selector = teal_asm::method_selector("\"add(uint64,uint64)uint64\"");
    let hex: String = selector.iter().map(|b| format!("{b:02x}")).collect();
    assert_eq!(
        method_ins.annotations(),
        &[format!("method-selector: 0x{hex}")]
    );
}

#[test]
fn application_id_reads_are_annotated() {
    let teal = parse_teal("#pragma version 2\ntxn ApplicationID\nreturn", "t").unwrap();
    assert_eq!(
        teal.instructions()[1].annotations(),
        &["ApplicationID is 0 in Creation Txn".to_string()]
    );
}
