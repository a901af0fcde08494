//! Equi-joins of the three source datasets on StudentID.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::record::{AcademicRecord, CoreRecord, InternshipRecord, JoinedRecord};

/// Row counts observed while merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStats {
    pub core_rows: usize,
    pub academic_rows: usize,
    pub internship_rows: usize,
    /// Rows in the merged output.
    pub merged_rows: usize,
    /// Core rows with no academic match, removed by the inner join.
    pub dropped_core_rows: usize,
    /// Merged rows whose internship columns were null-filled.
    pub without_internship: usize,
}

/// Index a source by key, keeping every row for a key in input order.
fn index_by_key<'a, T>(
    rows: &'a [T],
    key: impl Fn(&T) -> &str,
) -> HashMap<&'a str, Vec<&'a T>> {
    let mut index: HashMap<&str, Vec<&T>> = HashMap::with_capacity(rows.len());
    for row in rows {
        index.entry(key(row)).or_default().push(row);
    }
    index
}

/// Inner-join core with academic, then left-join internship.
///
/// Output order follows core input order; duplicate keys fan out in the
/// order of the matching rows on the right side.
pub fn merge(
    core: &[CoreRecord],
    academic: &[AcademicRecord],
    internship: &[InternshipRecord],
) -> (Vec<JoinedRecord>, JoinStats) {
    let academic_index = index_by_key(academic, |r| r.student_id.as_str());
    let internship_index = index_by_key(internship, |r| r.student_id.as_str());

    let mut merged = Vec::with_capacity(core.len().min(academic.len()));
    let mut matched_core: HashSet<usize> = HashSet::new();
    let mut without_internship = 0;

    for (position, core_row) in core.iter().enumerate() {
        let Some(scores) = academic_index.get(core_row.student_id.as_str()) else {
            continue;
        };
        matched_core.insert(position);

        for academic_row in scores {
            match internship_index.get(core_row.student_id.as_str()) {
                Some(internships) => {
                    for internship_row in internships {
                        merged.push(JoinedRecord {
                            core: core_row.clone(),
                            academic: academic_row.scores,
                            internship: Some(internship_row.details.clone()),
                        });
                    }
                }
                None => {
                    without_internship += 1;
                    merged.push(JoinedRecord {
                        core: core_row.clone(),
                        academic: academic_row.scores,
                        internship: None,
                    });
                }
            }
        }
    }

    let stats = JoinStats {
        core_rows: core.len(),
        academic_rows: academic.len(),
        internship_rows: internship.len(),
        merged_rows: merged.len(),
        dropped_core_rows: core.len() - matched_core.len(),
        without_internship,
    };

    log::debug!(
        "merged {} core x {} academic rows into {} ({} dropped, {} without internship)",
        stats.core_rows,
        stats.academic_rows,
        stats.merged_rows,
        stats.dropped_core_rows,
        stats.without_internship
    );

    (merged, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::record::{AcademicScores, InternshipDetails};

    fn core(id: &str) -> CoreRecord {
        CoreRecord {
            student_id: id.to_string(),
            location: Some("Tampa".to_string()),
            gender: Some("F".to_string()),
            grade_level: Some(11),
            dob: Some("01-09-1999".to_string()),
            extra_cur_act: Some("None".to_string()),
            discipline_incidents: Some(0),
            school_type: Some("Public".to_string()),
            socio_economic_status: Some("Low".to_string()),
            dropout_status: Some("Enrolled".to_string()),
            expected_status: Some("On Track".to_string()),
        }
    }

    fn academic(id: &str, gpa: f64) -> AcademicRecord {
        AcademicRecord {
            student_id: id.to_string(),
            scores: AcademicScores {
                gpa: Some(gpa),
                attendance_rate: Some(0.9),
            },
        }
    }

    fn internship(id: &str, role: &str) -> InternshipRecord {
        InternshipRecord {
            student_id: id.to_string(),
            details: InternshipDetails {
                done: Some("Yes".to_string()),
                company: Some("Acme".to_string()),
                location: Some("Miami".to_string()),
                role: Some(role.to_string()),
            },
        }
    }

    #[test]
    fn test_inner_join_drops_unmatched_core() {
        let (merged, stats) = merge(
            &[core("S1"), core("S2"), core("S3")],
            &[academic("S3", 3.0), academic("S1", 2.0)],
            &[],
        );

        let ids: Vec<_> = merged.iter().map(|r| r.student_id()).collect();
        assert_eq!(ids, vec!["S1", "S3"]);
        assert_eq!(stats.dropped_core_rows, 1);
        assert_eq!(stats.merged_rows, 2);
    }

    #[test]
    fn test_left_join_null_fills() {
        let (merged, stats) = merge(
            &[core("S1"), core("S2")],
            &[academic("S1", 2.0), academic("S2", 3.0)],
            &[internship("S2", "Analyst"), internship("S9", "Intern")],
        );

        assert_eq!(merged.len(), 2);
        assert!(merged[0].internship.is_none());
        assert_eq!(
            merged[1].internship.as_ref().and_then(|i| i.role.as_deref()),
            Some("Analyst")
        );
        assert_eq!(stats.without_internship, 1);
    }

    #[test]
    fn test_duplicate_keys_fan_out() {
        let (merged, _) = merge(
            &[core("S1")],
            &[academic("S1", 2.0), academic("S1", 3.0)],
            &[internship("S1", "A"), internship("S1", "B")],
        );

        assert_eq!(merged.len(), 4);
        let pairs: Vec<_> = merged
            .iter()
            .map(|r| {
                (
                    r.academic.gpa.unwrap(),
                    r.internship.as_ref().unwrap().role.clone().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            pairs,
            vec![
                (2.0, "A".to_string()),
                (2.0, "B".to_string()),
                (3.0, "A".to_string()),
                (3.0, "B".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_inputs() {
        let (merged, stats) = merge(&[], &[academic("S1", 2.0)], &[]);
        assert!(merged.is_empty());
        assert_eq!(stats.dropped_core_rows, 0);
    }
}
