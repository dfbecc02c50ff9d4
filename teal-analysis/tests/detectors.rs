use teal_analysis::prelude::*;

const SUBROUTINE_CALLED_TWICE: &str = "#pragma version 7
callsub s
callsub s
int 1
return
s:
retsub";

#[test]
fn subroutine_entry_repeats_in_the_path_when_called_twice() {
    let mut teal = parse_teal(SUBROUTINE_CALLED_TWICE, "t").unwrap();
    teal.register_detector(Box::new(CanUpdate));
    let reports = teal.run_detectors();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].check, "can-update");
    assert_eq!(reports[0].paths, vec![vec![0, 3, 1, 3, 2]]);
}

#[test]
fn on_completion_guard_suppresses_the_finding() {
    let source = "#pragma version 6
txn OnCompletion
int UpdateApplication
==
bnz reject
int 1
return
reject:
int 0
return";
    let mut teal = parse_teal(source, "t").unwrap();
    teal.register_detector(Box::new(CanUpdate));
    teal.register_detector(Box::new(CanDelete));
    let reports = teal.run_detectors();

    // the approving path cannot carry UpdateApplication, and the
    // UpdateApplication path rejects
    assert_eq!(reports[0].check, "can-update");
    assert!(reports[0].paths.is_empty());

    // DeleteApplication is still approved along the fall-through
    assert_eq!(reports[1].check, "can-delete");
    assert_eq!(reports[1].paths, vec![vec![0, 1]]);
}

#[test]
fn explicit_rejection_is_not_an_approval() {
    let source = "#pragma version 6
int 0
return";
    let mut teal = parse_teal(source, "t").unwrap();
    teal.register_detector(Box::new(CanUpdate));
    let reports = teal.run_detectors();
    assert!(reports[0].paths.is_empty());
}

#[test]
fn err_leaves_are_never_vulnerable() {
    let source = "#pragma version 6
txn OnCompletion
int UpdateApplication
==
bnz fail
int 1
return
fail:
err";
    let mut teal = parse_teal(source, "t").unwrap();
    teal.register_detector(Box::new(CanUpdate));
    let reports = teal.run_detectors();
    assert!(reports[0].paths.is_empty());
}

#[test]
fn branching_program_reports_each_approving_path() {
    let source = "#pragma version 6
int 1
bnz right
int 1
return
right:
int 1
return";
    let mut teal = parse_teal(source, "t").unwrap();
    teal.register_detector(Box::new(CanUpdate));
    let reports = teal.run_detectors();
    let mut paths = reports[0].paths.clone();
    paths.sort();
    assert_eq!(paths, vec![vec![0, 1], vec![0, 2]]);
}

#[test]
fn detector_registry_resolves_names() {
    let detectors = detectors_by_name(&["can-update", "can-delete"]).unwrap();
    assert_eq!(detectors.len(), 2);

    let err = detectors_by_name(&["can-update", "nonsense"]).unwrap_err();
    assert!(matches!(err, TealError::UnknownDetector(name) if name == "nonsense"));
}

#[test]
fn all_detectors_have_distinct_names() {
    let detectors = all_detectors();
    let mut names: Vec<&str> = detectors.iter().map(|d| d.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), detectors.len());
}
