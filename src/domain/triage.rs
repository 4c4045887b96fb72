//! Post-processing rules applied to a traversal result.

use crate::domain::entities::Diagnosis;

/// Oldest age (in years) that is still routed to pediatrics.
pub const PEDIATRIC_MAX_AGE: f64 = 18.0;

pub const PEDIATRICS: &str = "Pediatrics";
pub const AGE_REFERRAL_NOTE: &str = "Age-based referral applied.";

/// Route children to pediatrics.
///
/// Emergencies are returned untouched. Takes the diagnosis by value: pass the
/// copy returned by the traversal, never a tree template.
pub fn adjust_for_age(mut diagnosis: Diagnosis, age: f64) -> Diagnosis {
    if diagnosis.is_emergency() {
        return diagnosis;
    }
    if age <= PEDIATRIC_MAX_AGE {
        diagnosis.specialty = PEDIATRICS.to_string();
        diagnosis.append_note(AGE_REFERRAL_NOTE);
    }
    diagnosis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Severity;
    use rstest::rstest;

    fn referral() -> Diagnosis {
        Diagnosis::new("Visit the doctor.")
            .with_severity(Severity::Medium)
            .with_specialty("Neurology")
    }

    #[test]
    fn given_age_18_when_adjusting_then_pediatrics() {
        let adjusted = adjust_for_age(referral(), 18.0);
        assert_eq!(adjusted.specialty, PEDIATRICS);
        assert_eq!(adjusted.notes, AGE_REFERRAL_NOTE);
    }

    #[test]
    fn given_age_19_when_adjusting_then_unchanged() {
        assert_eq!(adjust_for_age(referral(), 19.0), referral());
    }

    #[test]
    fn given_existing_notes_when_adjusting_then_joined_with_separator() {
        let adjusted = adjust_for_age(referral().with_notes("Prolonged cough."), 0.5);
        assert_eq!(adjusted.notes, "Prolonged cough. | Age-based referral applied.");
    }

    #[rstest]
    #[case(0.5)]
    #[case(18.0)]
    #[case(40.0)]
    #[case(90.0)]
    fn given_emergency_when_adjusting_any_age_then_unchanged(#[case] age: f64) {
        let emergency = Diagnosis::new("Call an ambulance immediately!")
            .with_severity(Severity::Emergency)
            .with_specialty("Emergency Medicine")
            .with_notes("Critical condition");
        assert_eq!(adjust_for_age(emergency.clone(), age), emergency);
    }
}
