//! Room-clearing flags inferred from panel descriptions.

use crate::config::ClearancePhrases;
use crate::models::Clearance;

fn infer(description: &str, yes: &[String], no: &[String]) -> Clearance {
    let lowered = description.to_lowercase();
    let mentions = |phrases: &[String]| {
        phrases
            .iter()
            .any(|p| lowered.contains(p.to_lowercase().as_str()))
    };

    if mentions(yes) {
        Clearance::Yes
    } else if mentions(no) {
        Clearance::No
    } else {
        Clearance::Unknown
    }
}

/// Is the room cleared before this panel starts?
pub fn cleared_prior(description: &str, phrases: &ClearancePhrases) -> Clearance {
    infer(description, &phrases.prior_yes, &phrases.prior_no)
}

/// Is the room cleared for the next panel once this one ends?
pub fn cleared_after(description: &str, phrases: &ClearancePhrases) -> Clearance {
    infer(description, &phrases.after_yes, &phrases.after_no)
}
