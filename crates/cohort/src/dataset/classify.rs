//! Risk classification of merged student records.
//!
//! The rule is evaluated in fixed priority order, first match wins:
//!
//! 1. attendance below 0.8 **or** more than 2 discipline incidents: At-Risk
//! 2. attendance at least 0.8 **and** at most 2 incidents **and** an
//!    extracurricular activity other than `none` (any case): High Potential
//! 3. otherwise: Average
//!
//! Missing inputs follow SQL three-valued logic. A comparison against a null
//! is unknown, and a branch fires only when its condition is definitely true,
//! so a null can still produce At-Risk through the other operand of the `OR`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::{JoinedRecord, StudentRecord};

/// Attendance strictly below this is at risk.
pub const MIN_ATTENDANCE_RATE: f64 = 0.8;

/// More incidents than this is at risk.
pub const MAX_DISCIPLINE_INCIDENTS: i64 = 2;

/// ExtraCurAct value meaning "no activity", compared case-insensitively.
pub const NO_ACTIVITY: &str = "none";

/// Student segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "At-Risk")]
    AtRisk,
    #[serde(rename = "High Potential")]
    HighPotential,
    #[serde(rename = "Average")]
    Average,
}

impl Classification {
    pub const ALL: [Classification; 3] = [
        Classification::AtRisk,
        Classification::HighPotential,
        Classification::Average,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Classification::AtRisk => "At-Risk",
            Classification::HighPotential => "High Potential",
            Classification::Average => "Average",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn sql_or(a: Option<bool>, b: Option<bool>) -> Option<bool> {
    match (a, b) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (Some(false), Some(false)) => Some(false),
        _ => None,
    }
}

fn sql_and(terms: &[Option<bool>]) -> Option<bool> {
    if terms.contains(&Some(false)) {
        Some(false)
    } else if terms.iter().all(|t| *t == Some(true)) {
        Some(true)
    } else {
        None
    }
}

/// Classify one student from its three inputs. Pure and total.
pub fn classify(
    attendance_rate: Option<f64>,
    discipline_incidents: Option<i64>,
    extra_cur_act: Option<&str>,
) -> Classification {
    let at_risk = sql_or(
        attendance_rate.map(|a| a < MIN_ATTENDANCE_RATE),
        discipline_incidents.map(|d| d > MAX_DISCIPLINE_INCIDENTS),
    );
    if at_risk == Some(true) {
        return Classification::AtRisk;
    }

    let high_potential = sql_and(&[
        attendance_rate.map(|a| a >= MIN_ATTENDANCE_RATE),
        discipline_incidents.map(|d| d <= MAX_DISCIPLINE_INCIDENTS),
        extra_cur_act.map(|e| e.to_lowercase() != NO_ACTIVITY),
    ]);
    if high_potential == Some(true) {
        return Classification::HighPotential;
    }

    Classification::Average
}

/// Classify a joined record.
pub fn classify_record(record: &JoinedRecord) -> Classification {
    classify(
        record.academic.attendance_rate,
        record.core.discipline_incidents,
        record.core.extra_cur_act.as_deref(),
    )
}

/// Label every joined record, producing the final immutable rows.
pub fn classify_all(records: Vec<JoinedRecord>) -> Vec<StudentRecord> {
    records
        .into_iter()
        .map(|r| {
            let label = classify_record(&r);
            StudentRecord::new(r, label)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_attendance_is_at_risk() {
        assert_eq!(classify(Some(0.75), Some(0), Some("Debate")), Classification::AtRisk);
    }

    #[test]
    fn test_discipline_is_at_risk_even_with_good_attendance() {
        assert_eq!(classify(Some(0.99), Some(3), Some("Chess")), Classification::AtRisk);
    }

    #[test]
    fn test_boundaries() {
        // 0.8 is not below the threshold and 2 incidents is allowed.
        assert_eq!(
            classify(Some(0.8), Some(2), Some("Band")),
            Classification::HighPotential
        );
        assert_eq!(classify(Some(0.8), Some(2), Some("None")), Classification::Average);
    }

    #[test]
    fn test_none_sentinel_is_case_insensitive() {
        assert_eq!(classify(Some(0.9), Some(0), Some("NONE")), Classification::Average);
        assert_eq!(classify(Some(0.9), Some(0), Some("none")), Classification::Average);
        assert_eq!(
            classify(Some(0.9), Some(0), Some("Nonet")),
            Classification::HighPotential
        );
    }

    #[test]
    fn test_null_inputs() {
        // Unknown OR true is true.
        assert_eq!(classify(None, Some(5), Some("Art")), Classification::AtRisk);
        assert_eq!(classify(Some(0.5), None, Some("Art")), Classification::AtRisk);
        // Unknown everywhere else falls through to Average.
        assert_eq!(classify(None, Some(0), Some("Art")), Classification::Average);
        assert_eq!(classify(Some(0.95), None, Some("Art")), Classification::Average);
        assert_eq!(classify(Some(0.95), Some(0), None), Classification::Average);
        assert_eq!(classify(None, None, None), Classification::Average);
    }

    #[test]
    fn test_nan_attendance_is_not_at_risk() {
        assert_eq!(classify(Some(f64::NAN), Some(0), Some("Art")), Classification::Average);
    }

    #[test]
    fn test_serde_labels() {
        let json = serde_json::to_string(&Classification::HighPotential).unwrap();
        assert_eq!(json, "\"High Potential\"");
    }
}
