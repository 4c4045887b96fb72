//! The built-in clinical knowledge base.
//!
//! Leaves are created first and then wired into questions bottom-up, so the
//! function body reads like the tree from its leaves to its root.

use crate::domain::arena::DecisionTree;
use crate::domain::builder::{TreeBuilder, TreeResult};
use crate::domain::entities::{Diagnosis, Severity};

pub const ROOT_QUESTION: &str = "Do you have a fever?";

pub const AMBULANCE: &str = "Call an ambulance immediately!";
pub const DOCTOR_FLU: &str = "You might have flu or an infection. Visit the doctor.";
pub const DOCTOR_INJURY: &str = "You might have a physical injury. Consult the doctor.";
pub const DOCTOR_FOOD: &str = "Possible food poisoning. Visit the doctor.";
pub const DOCTOR_MIGRAINE: &str = "You may have a migraine. Consult your doctor.";
pub const DOCTOR_DEHYDRATION: &str =
    "Possible dehydration. Drink fluids and visit doctor if persists.";
pub const DOCTOR_BP: &str = "Possible blood pressure issue. Visit the doctor soon.";
pub const DOCTOR_INFECTION: &str = "Possible bacterial infection. Visit the doctor soon.";
pub const HOME_ALLERGY: &str = "Allergy detected. Avoid triggers and take antihistamines.";
pub const HOME_COLD: &str = "Common cold detected. Stay hydrated and rest well.";
pub const HOME_FATIGUE: &str = "Fatigue detected. Sleep, rest, and maintain a healthy diet.";
pub const FINE: &str = "No serious symptoms detected. You're fine for now!";
pub const HOME_SORE_THROAT: &str = "Mild sore throat: try warm honey-lemon water and rest; \
     monitor for 3 days. Visit a doctor if worsens.";
pub const PULMONOLOGY_REFERRAL: &str =
    "Cough lasting more than 3 weeks — refer to Pulmonology for evaluation.";

/// Build the clinical decision tree rooted at [`ROOT_QUESTION`].
pub fn clinical_tree() -> TreeResult<DecisionTree> {
    let mut b = TreeBuilder::new();

    let ambulance = b.leaf(
        Diagnosis::new(AMBULANCE)
            .with_severity(Severity::Emergency)
            .with_specialty("Emergency Medicine")
            .with_notes("Critical condition: shortness of breath or chest pain"),
    );
    let doctor_flu = b.leaf(Diagnosis::new(DOCTOR_FLU).with_severity(Severity::Medium));
    let doctor_injury = b.leaf(Diagnosis::new(DOCTOR_INJURY).with_severity(Severity::Medium));
    let doctor_food = b.leaf(
        Diagnosis::new(DOCTOR_FOOD)
            .with_severity(Severity::Medium)
            .with_specialty("Gastroenterology"),
    );
    let doctor_migraine = b.leaf(
        Diagnosis::new(DOCTOR_MIGRAINE)
            .with_severity(Severity::Medium)
            .with_specialty("Neurology"),
    );
    // not referenced by any question yet
    let _doctor_dehydration =
        b.leaf(Diagnosis::new(DOCTOR_DEHYDRATION).with_severity(Severity::Medium));
    let doctor_bp = b.leaf(
        Diagnosis::new(DOCTOR_BP)
            .with_severity(Severity::High)
            .with_specialty("Cardiology"),
    );
    let doctor_infection = b.leaf(
        Diagnosis::new(DOCTOR_INFECTION)
            .with_severity(Severity::Medium)
            .with_specialty("Urology"),
    );

    let home_allergy = b.leaf(Diagnosis::new(HOME_ALLERGY).with_specialty("Allergy"));
    let home_cold = b.leaf(Diagnosis::new(HOME_COLD));
    let home_fatigue = b.leaf(Diagnosis::new(HOME_FATIGUE));
    let fine = b.leaf(Diagnosis::new(FINE));
    let home_sore_throat = b.leaf(
        Diagnosis::new(HOME_SORE_THROAT)
            .with_specialty("Home Remedy")
            .with_notes("Home remedy suggested; monitor for 3 days."),
    );
    let pulmonology_referral = b.leaf(
        Diagnosis::new(PULMONOLOGY_REFERRAL)
            .with_severity(Severity::High)
            .with_specialty("Pulmonology")
            .with_notes("Prolonged cough referral (>= 3 weeks)."),
    );

    let cough_duration = b.question(
        "Has your cough lasted more than 3 weeks?",
        pulmonology_referral,
        doctor_flu,
    );
    let breathing = b.question(
        "Do you have shortness of breath or chest pain?",
        ambulance,
        doctor_flu,
    );
    let sore_throat = b.question(
        "Do you have a sore throat or dry cough?",
        home_sore_throat,
        breathing,
    );
    let body_ache = b.question("Do you feel muscle pain or body ache?", sore_throat, home_cold);
    let itchy_eyes = b.question("Do you have itchy eyes or runny nose?", home_allergy, home_cold);
    let rashes = b.question("Do you have skin rashes or redness?", home_allergy, itchy_eyes);

    // digestive/injury/urinary branch, not yet attached to the root
    let vomiting = b.question("Are you vomiting or have diarrhea?", doctor_food, doctor_injury);
    let stomach_pain = b.question("Do you have stomach pain or cramps?", vomiting, fine);
    let injury = b.question("Were you hit or injured recently?", doctor_injury, stomach_pain);
    let _infection = b.question(
        "Do you have burning sensation while urinating?",
        doctor_infection,
        injury,
    );

    let headache = b.question("Do you have a severe headache?", doctor_migraine, home_fatigue);
    let dizziness = b.question("Do you feel dizzy or lightheaded?", doctor_bp, headache);
    let ask_cough = b.question("Do you have a cough?", cough_duration, body_ache);
    let flu = b.question(
        "Do you have flu-like symptoms (fever, cough, cold)?",
        ask_cough,
        rashes,
    );
    let fever = b.question(ROOT_QUESTION, flu, dizziness);

    b.build(fever)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::Node;

    #[test]
    fn given_clinical_tree_then_root_is_fever_question() {
        let tree = clinical_tree().unwrap();
        match tree.node(tree.root()) {
            Some(Node::Question { text, .. }) => assert_eq!(text, ROOT_QUESTION),
            other => panic!("unexpected root: {other:?}"),
        }
    }

    #[test]
    fn given_clinical_tree_then_has_no_gaps() {
        let tree = clinical_tree().unwrap();
        assert!(tree.gaps().is_empty());
    }

    #[test]
    fn given_clinical_tree_then_reachable_leaves_cover_all_outcome_classes() {
        let tree = clinical_tree().unwrap();
        let leaves = tree.leaves();
        // ambulance, pulmonology, doctor_flu, home_sore_throat, home_cold,
        // home_allergy, doctor_bp, doctor_migraine, home_fatigue
        assert_eq!(leaves.len(), 9);
        assert!(leaves.iter().any(|(_, r)| r.severity == Severity::Emergency));
        assert!(leaves.iter().any(|(_, r)| r.message == HOME_COLD));
        assert!(leaves.iter().all(|(_, r)| r.message != FINE));
    }

    #[test]
    fn given_clinical_tree_then_detached_nodes_are_owned_but_unreachable() {
        let tree = clinical_tree().unwrap();
        // doctor_injury, doctor_food, doctor_dehydration, doctor_infection, fine,
        // vomiting, stomach_pain, injury, infection
        assert_eq!(tree.unreachable().len(), 9);
        assert_eq!(tree.len(), 29);
    }

    #[test]
    fn test_depth_is_longest_question_chain_plus_leaf() {
        // fever -> flu -> cough -> body_ache -> sore_throat -> breathing -> leaf
        let tree = clinical_tree().unwrap();
        assert_eq!(tree.depth(), 7);
    }
}
