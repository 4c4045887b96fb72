//! Integration tests for diagnosis over the clinical decision tree.

use std::sync::Arc;

use rstest::rstest;

use mediassist::application::services::{DiagnosisService, Outcome};
use mediassist::domain::knowledge::{
    AMBULANCE, DOCTOR_BP, DOCTOR_FLU, FINE, HOME_ALLERGY, HOME_COLD, HOME_FATIGUE,
    HOME_SORE_THROAT, PULMONOLOGY_REFERRAL,
};
use mediassist::domain::{adjust_for_age, clinical_tree, Answer, Severity};
use mediassist::infrastructure::traits::ScriptedReader;
use mediassist::util::testing;

fn service() -> DiagnosisService {
    testing::init_test_setup();
    DiagnosisService::new(Arc::new(clinical_tree().expect("clinical tree")), 64)
}

#[rstest]
#[case(&["yes", "yes", "yes", "yes"], PULMONOLOGY_REFERRAL)]
#[case(&["yes", "yes", "yes", "no"], DOCTOR_FLU)]
#[case(&["yes", "yes", "no", "yes", "yes"], HOME_SORE_THROAT)]
#[case(&["yes", "yes", "no", "yes", "no", "yes"], AMBULANCE)]
#[case(&["yes", "yes", "no", "yes", "no", "no"], DOCTOR_FLU)]
#[case(&["yes", "yes", "no", "no"], HOME_COLD)]
#[case(&["yes", "no", "yes"], HOME_ALLERGY)]
#[case(&["yes", "no", "no", "yes"], HOME_ALLERGY)]
#[case(&["yes", "no", "no", "no"], HOME_COLD)]
#[case(&["no", "yes"], DOCTOR_BP)]
#[case(&["no", "no", "no"], HOME_FATIGUE)]
fn given_answer_sequence_when_diagnosing_then_reaches_expected_leaf(
    #[case] answers: &[&str],
    #[case] expected: &str,
) {
    let reader = ScriptedReader::new(answers.iter().copied());

    let traversal = service().diagnose(&reader).unwrap();

    assert_eq!(traversal.diagnosis.message, expected);
    assert_eq!(traversal.path.len(), answers.len());
    assert_eq!(reader.remaining(), 0);
    assert!(matches!(traversal.outcome, Outcome::Leaf(_)));
}

#[test]
fn given_breathing_path_all_no_when_diagnosing_then_flu_advice_after_six_questions() {
    let traversal = service()
        .diagnose(&ScriptedReader::new(["yes", "yes", "no", "yes", "no", "no"]))
        .unwrap();

    assert_eq!(traversal.diagnosis.message, DOCTOR_FLU);
    assert_eq!(traversal.diagnosis.severity, Severity::Medium);
    assert_eq!(
        traversal.path.last().map(|s| (s.question.as_str(), s.answer)),
        Some(("Do you have shortness of breath or chest pain?", Answer::No))
    );
}

#[test]
fn given_no_cough_no_body_ache_when_diagnosing_then_stops_at_cold_with_answers_left() {
    let reader = ScriptedReader::new(["yes", "yes", "no", "no", "no", "no"]);

    let traversal = service().diagnose(&reader).unwrap();

    assert_eq!(traversal.diagnosis.message, HOME_COLD);
    assert_eq!(traversal.path.len(), 4);
    assert_eq!(reader.remaining(), 2);
}

#[test]
fn given_same_answers_when_diagnosing_twice_then_results_are_equal() {
    let svc = service();
    let answers = ["no", "no", "yes"];

    let first = svc.diagnose(&ScriptedReader::new(answers)).unwrap();
    let second = svc.diagnose(&ScriptedReader::new(answers)).unwrap();

    assert_eq!(first, second);
}

#[test]
fn given_shared_leaf_when_result_is_adjusted_then_tree_leaf_is_untouched() {
    let svc = service();
    // home_cold is reachable from two different parents
    let child = svc
        .diagnose(&ScriptedReader::new(["yes", "yes", "no", "no"]))
        .unwrap();
    let adjusted = adjust_for_age(child.diagnosis, 6.0);
    assert_eq!(adjusted.specialty, "Pediatrics");

    let adult = svc
        .diagnose(&ScriptedReader::new(["yes", "no", "no", "no"]))
        .unwrap();

    assert_eq!(adult.diagnosis.message, HOME_COLD);
    assert_eq!(adult.diagnosis.specialty, "General Practitioner");
    assert!(adult.diagnosis.notes.is_empty());
}

#[test]
fn given_emergency_leaf_when_child_then_still_emergency_medicine() {
    let traversal = service()
        .diagnose(&ScriptedReader::new(["yes", "yes", "no", "yes", "no", "yes"]))
        .unwrap();

    let adjusted = adjust_for_age(traversal.diagnosis.clone(), 4.0);

    assert_eq!(adjusted, traversal.diagnosis);
    assert_eq!(adjusted.severity, Severity::Emergency);
}

#[test]
fn given_clinical_tree_then_detached_outcomes_are_never_produced() {
    let tree = clinical_tree().unwrap();
    assert!(tree.leaves().iter().all(|(_, d)| d.message != FINE));
}

#[test]
fn given_clinical_tree_when_rendering_then_every_reachable_question_is_shown() {
    let tree = clinical_tree().unwrap();
    let rendered = tree.to_termtree(tree.root()).to_string();

    assert!(rendered.starts_with("Do you have a fever?"));
    assert!(rendered.contains("yes: Do you have flu-like symptoms (fever, cough, cold)?"));
    assert!(rendered.contains("no: Do you feel dizzy or lightheaded?"));
    assert!(!rendered.contains("<missing branch>"));
    assert!(!rendered.contains("Were you hit or injured recently?"));
}
