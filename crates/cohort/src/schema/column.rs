//! Typed column descriptors for the merged student dataset.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::input::DatasetKind;

/// Data type of a merged column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers.
    Integer,
    /// Floating-point numbers.
    Float,
    /// Text values.
    Text,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

/// Where a merged column comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOrigin {
    /// Join key, present in every source.
    Key,
    /// Copied from one source dataset.
    Source(DatasetKind),
    /// Computed by the classification engine.
    Derived,
}

/// Every column of a classified student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    StudentId,
    Location,
    Gender,
    GradeLevel,
    Dob,
    ExtraCurAct,
    DisciplineIncidents,
    SchoolType,
    SocioEconomicStatus,
    DropoutStatus,
    ExpectedStatus,
    Gpa,
    AttendanceRate,
    InternshipDone,
    InternshipCompany,
    InternshipLocation,
    InternshipRole,
    StudentClassification,
}

impl Column {
    /// All columns in merged-schema order.
    pub const ALL: [Column; 18] = [
        Column::StudentId,
        Column::Location,
        Column::Gender,
        Column::GradeLevel,
        Column::Dob,
        Column::ExtraCurAct,
        Column::DisciplineIncidents,
        Column::SchoolType,
        Column::SocioEconomicStatus,
        Column::DropoutStatus,
        Column::ExpectedStatus,
        Column::Gpa,
        Column::AttendanceRate,
        Column::InternshipDone,
        Column::InternshipCompany,
        Column::InternshipLocation,
        Column::InternshipRole,
        Column::StudentClassification,
    ];

    /// Header name as it appears in the source files and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Column::StudentId => "StudentID",
            Column::Location => "Location",
            Column::Gender => "Gender",
            Column::GradeLevel => "GradeLevel",
            Column::Dob => "DOB",
            Column::ExtraCurAct => "ExtraCurAct",
            Column::DisciplineIncidents => "DisciplineIncidents",
            Column::SchoolType => "Public_Private_Charter",
            Column::SocioEconomicStatus => "SocioEconomicStatus",
            Column::DropoutStatus => "DropoutStatus",
            Column::ExpectedStatus => "ExpectedStatus",
            Column::Gpa => "GPA",
            Column::AttendanceRate => "AttendanceRate",
            Column::InternshipDone => "InternshipDone",
            Column::InternshipCompany => "InternshipCompany",
            Column::InternshipLocation => "InternshipLocation",
            Column::InternshipRole => "InternshipRole",
            Column::StudentClassification => "StudentClassification",
        }
    }

    /// Look up a column by its exact header name.
    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.iter().copied().find(|c| c.name() == name)
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::GradeLevel | Column::DisciplineIncidents => ColumnType::Integer,
            Column::Gpa | Column::AttendanceRate => ColumnType::Float,
            _ => ColumnType::Text,
        }
    }

    pub fn origin(&self) -> ColumnOrigin {
        match self {
            Column::StudentId => ColumnOrigin::Key,
            Column::Gpa | Column::AttendanceRate => ColumnOrigin::Source(DatasetKind::Academic),
            Column::InternshipDone
            | Column::InternshipCompany
            | Column::InternshipLocation
            | Column::InternshipRole => ColumnOrigin::Source(DatasetKind::Internship),
            Column::StudentClassification => ColumnOrigin::Derived,
            _ => ColumnOrigin::Source(DatasetKind::Core),
        }
    }

    /// True for the columns a left join may null-fill.
    pub fn is_internship(&self) -> bool {
        self.origin() == ColumnOrigin::Source(DatasetKind::Internship)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip_for_every_column() {
        for column in Column::ALL {
            assert_eq!(Column::from_name(column.name()), Some(column));
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(Column::from_name("gpa"), None);
        assert_eq!(Column::from_name("GPA"), Some(Column::Gpa));
    }

    #[test]
    fn test_column_types() {
        assert!(Column::Gpa.column_type().is_numeric());
        assert!(Column::GradeLevel.column_type().is_numeric());
        assert!(!Column::ExtraCurAct.column_type().is_numeric());
    }

    #[test]
    fn test_internship_columns() {
        let internship: Vec<_> = Column::ALL.iter().filter(|c| c.is_internship()).collect();
        assert_eq!(internship.len(), 4);
    }
}
