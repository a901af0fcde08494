//! Typed rows for the source datasets and the merged student record.

use serde::{Deserialize, Serialize};

use crate::schema::{Column, Value};

use super::classify::Classification;

/// One row of the core (identity/demographics) dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreRecord {
    pub student_id: String,
    pub location: Option<String>,
    pub gender: Option<String>,
    pub grade_level: Option<i64>,
    /// Date of birth as written in the source, usually `DD-MM-YYYY`.
    pub dob: Option<String>,
    /// Activity name, or the literal `None` when the student has none.
    pub extra_cur_act: Option<String>,
    pub discipline_incidents: Option<i64>,
    /// Public, Private or Charter.
    pub school_type: Option<String>,
    pub socio_economic_status: Option<String>,
    pub dropout_status: Option<String>,
    pub expected_status: Option<String>,
}

/// GPA and attendance for one student.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AcademicScores {
    pub gpa: Option<f64>,
    /// Fraction of days attended, in `[0, 1]`.
    pub attendance_rate: Option<f64>,
}

/// One row of the academic dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicRecord {
    pub student_id: String,
    pub scores: AcademicScores,
}

/// Internship columns for one student.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InternshipDetails {
    /// `Yes` or `No`.
    pub done: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub role: Option<String>,
}

/// One row of the internship dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternshipRecord {
    pub student_id: String,
    pub details: InternshipDetails,
}

/// Result of the inner + left join, before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRecord {
    pub core: CoreRecord,
    pub academic: AcademicScores,
    /// `None` when the student has no internship row.
    pub internship: Option<InternshipDetails>,
}

impl JoinedRecord {
    pub fn student_id(&self) -> &str {
        &self.core.student_id
    }
}

/// A merged, classified student. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(flatten)]
    joined: JoinedRecord,
    classification: Classification,
}

impl StudentRecord {
    pub(crate) fn new(joined: JoinedRecord, classification: Classification) -> Self {
        Self {
            joined,
            classification,
        }
    }

    pub fn student_id(&self) -> &str {
        self.joined.student_id()
    }

    pub fn joined(&self) -> &JoinedRecord {
        &self.joined
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    /// Typed accessor behind every column name in the schema.
    pub fn value(&self, column: Column) -> Value {
        let core = &self.joined.core;
        let internship = self.joined.internship.as_ref();
        let text = |v: &Option<String>| Value::from(v.as_deref());

        match column {
            Column::StudentId => Value::from(core.student_id.as_str()),
            Column::Location => text(&core.location),
            Column::Gender => text(&core.gender),
            Column::GradeLevel => Value::from(core.grade_level),
            Column::Dob => text(&core.dob),
            Column::ExtraCurAct => text(&core.extra_cur_act),
            Column::DisciplineIncidents => Value::from(core.discipline_incidents),
            Column::SchoolType => text(&core.school_type),
            Column::SocioEconomicStatus => text(&core.socio_economic_status),
            Column::DropoutStatus => text(&core.dropout_status),
            Column::ExpectedStatus => text(&core.expected_status),
            Column::Gpa => Value::from(self.joined.academic.gpa),
            Column::AttendanceRate => Value::from(self.joined.academic.attendance_rate),
            Column::InternshipDone => Value::from(internship.and_then(|i| i.done.as_deref())),
            Column::InternshipCompany => {
                Value::from(internship.and_then(|i| i.company.as_deref()))
            }
            Column::InternshipLocation => {
                Value::from(internship.and_then(|i| i.location.as_deref()))
            }
            Column::InternshipRole => Value::from(internship.and_then(|i| i.role.as_deref())),
            Column::StudentClassification => Value::from(self.classification.label()),
        }
    }
}
