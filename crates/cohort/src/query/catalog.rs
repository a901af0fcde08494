//! The catalog of analytic questions, expressed as data.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CohortError, Result};

use super::aggregate::Aggregate;
use super::predicate::Predicate;

/// One ordering key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    #[serde(default)]
    pub descending: bool,
}

impl SortKey {
    pub fn asc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            descending: false,
        }
    }

    pub fn desc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            descending: true,
        }
    }
}

/// How an entry's result is shaped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputKind {
    /// A bounded table.
    #[default]
    Table,
    /// A single value, printed as `label: value`.
    Scalar { label: String },
    /// The grouped table plus the row with the smallest `column`.
    TableWithMinimum { column: String, label: String },
}

/// A declarative analytic operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u32,
    pub heading: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Predicate>,
    /// Projection for ungrouped entries; empty means every column.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub select: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aggregates: Vec<Aggregate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<SortKey>,
    /// Cap on the result itself. Rows past it are dropped, not hidden.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Rows shown for this entry; the executor default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_rows: Option<usize>,
    #[serde(default)]
    pub output: OutputKind,
}

impl CatalogEntry {
    pub fn new(id: u32, heading: impl Into<String>) -> Self {
        Self {
            id,
            heading: heading.into(),
            filter: None,
            select: Vec::new(),
            group_by: Vec::new(),
            aggregates: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            display_rows: None,
            output: OutputKind::Table,
        }
    }

    pub fn with_filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(predicate);
        self
    }

    pub fn with_select(mut self, columns: &[&str]) -> Self {
        self.select = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_group_by(mut self, columns: &[&str]) -> Self {
        self.group_by = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregates.push(aggregate);
        self
    }

    pub fn with_order(mut self, key: SortKey) -> Self {
        self.order_by.push(key);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_display_rows(mut self, rows: usize) -> Self {
        self.display_rows = Some(rows);
        self
    }

    /// Reduce to a single counted value.
    pub fn as_count(mut self, label: &str) -> Self {
        self.aggregates = vec![Aggregate::count("count")];
        self.output = OutputKind::Scalar {
            label: label.to_string(),
        };
        self
    }

    pub fn with_minimum(mut self, column: &str, label: &str) -> Self {
        self.output = OutputKind::TableWithMinimum {
            column: column.to_string(),
            label: label.to_string(),
        };
        self
    }

    pub fn is_grouped(&self) -> bool {
        !self.group_by.is_empty() || !self.aggregates.is_empty()
    }
}

/// An ordered collection of entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
}

const INTERNSHIP_DONE: &str = "InternshipDone";

fn interned() -> Predicate {
    Predicate::equals(INTERNSHIP_DONE, "Yes")
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// The twenty questions of the institutional report.
    pub fn builtin() -> Self {
        let sept_oct = [
            "09-1998", "10-1998", "09-1999", "10-1999", "09-2000", "10-2000",
        ];

        Self::new(vec![
            CatalogEntry::new(1, "1. Students from 'Tampa' city:")
                .with_filter(Predicate::equals("Location", "Tampa"))
                .with_select(&["StudentID", "Location", "GPA"]),
            CatalogEntry::new(2, "2. Students with an Extracurricular Activity:")
                .with_filter(Predicate::not_eq_ignore_case("ExtraCurAct", "none"))
                .with_select(&["StudentID", "ExtraCurAct", "GPA"]),
            CatalogEntry::new(3, "3. Students in Grade 12 with GPA > 3.5:")
                .with_filter(Predicate::and(vec![
                    Predicate::equals("GradeLevel", 12i64),
                    Predicate::gt("GPA", 3.5),
                ]))
                .with_select(&["StudentID", "GradeLevel", "GPA"]),
            CatalogEntry::new(4, "4. Students born in Sept or Oct of 1998, 1999, 2000:")
                .with_filter(Predicate::month_year_in("DOB", &sept_oct))
                .with_select(&["StudentID", "DOB", "GPA"]),
            CatalogEntry::new(
                5,
                "5. Average Academic Performance (GPA, AttendanceRate) by Gender:",
            )
            .with_group_by(&["Gender"])
            .with_aggregate(Aggregate::avg("GPA", "Avg_GPA"))
            .with_aggregate(Aggregate::avg("AttendanceRate", "Avg_AttendanceRate")),
            CatalogEntry::new(6, "6. Student Population Distribution by Grade Level:")
                .with_group_by(&["GradeLevel"])
                .with_aggregate(Aggregate::count("Student_Count"))
                .with_order(SortKey::asc("GradeLevel")),
            CatalogEntry::new(7, "7. Total Number of Students Dropped Out:")
                .with_filter(Predicate::equals("DropoutStatus", "Dropped"))
                .as_count("Total students dropped out"),
            CatalogEntry::new(8, "8. Top 3 Students by GPA:")
                .with_order(SortKey::desc("GPA"))
                .with_limit(3)
                .with_select(&["StudentID", "GPA", "Location"]),
            CatalogEntry::new(9, "9. Average GPA by School Type:")
                .with_group_by(&["Public_Private_Charter"])
                .with_aggregate(Aggregate::avg("GPA", "Avg_GPA")),
            CatalogEntry::new(10, "10. List of Students with GPA < 2.0 (At-Risk Academics):")
                .with_filter(Predicate::lt("GPA", 2.0))
                .with_select(&["StudentID", "GPA", "AttendanceRate"]),
            CatalogEntry::new(
                11,
                "11. Graduation Rate by Socio-Economic Status (Grade 12 as Proxy):",
            )
            .with_group_by(&["SocioEconomicStatus"])
            .with_aggregate(Aggregate::percent_where(
                Predicate::equals("GradeLevel", 12i64),
                "Graduation_Rate_Percent",
            )),
            CatalogEntry::new(
                12,
                "12. Student Segmentation (At-Risk, High Potential, Average) - Count:",
            )
            .with_group_by(&["StudentClassification"])
            .with_aggregate(Aggregate::count("count"))
            .with_order(SortKey::desc("count")),
            CatalogEntry::new(13, "13. Count of Students Who Haven't Done Internships:")
                .with_filter(Predicate::equals(INTERNSHIP_DONE, "No"))
                .as_count("Total students without internships"),
            CatalogEntry::new(14, "14. Internships Completed by Company:")
                .with_filter(interned())
                .with_group_by(&["InternshipCompany"])
                .with_aggregate(Aggregate::count("count"))
                .with_order(SortKey::desc("count")),
            CatalogEntry::new(15, "15. Internships Completed by Location:")
                .with_filter(interned())
                .with_group_by(&["InternshipLocation"])
                .with_aggregate(Aggregate::count("count"))
                .with_order(SortKey::desc("count")),
            CatalogEntry::new(16, "16. Internship Completion Count by Gender (and Minimum):")
                .with_filter(interned())
                .with_group_by(&["Gender"])
                .with_aggregate(Aggregate::count("count"))
                .with_minimum("count", "Minimum Internship completions by gender:"),
            CatalogEntry::new(17, "17. Internships Completed by Role:")
                .with_filter(interned())
                .with_group_by(&["InternshipRole"])
                .with_aggregate(Aggregate::count("count"))
                .with_order(SortKey::desc("count")),
            CatalogEntry::new(18, "18. Internships by Socio-Economic Status and Role:")
                .with_filter(interned())
                .with_group_by(&["SocioEconomicStatus", "InternshipRole"])
                .with_aggregate(Aggregate::count("count"))
                .with_order(SortKey::asc("SocioEconomicStatus"))
                .with_order(SortKey::desc("count"))
                .with_display_rows(10),
            CatalogEntry::new(
                19,
                "19. Low Attendance Students (< 0.8) Who Completed Internships:",
            )
            .with_filter(Predicate::and(vec![
                Predicate::lt("AttendanceRate", 0.8),
                interned(),
            ]))
            .with_select(&["StudentID", "AttendanceRate", "InternshipRole"]),
            CatalogEntry::new(
                20,
                "20. At-Risk Students (Expected Status) Who Completed Internships:",
            )
            .with_filter(Predicate::and(vec![
                Predicate::equals("ExpectedStatus", "At Risk"),
                interned(),
            ]))
            .as_count("Total At-Risk (ExpectedStatus) students who completed internships"),
        ])
    }

    /// Parse a catalog from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.check_ids()?;
        Ok(catalog)
    }

    /// Read a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CohortError::Config(format!("cannot read catalog '{}': {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn check_ids(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.id) {
                return Err(CohortError::Config(format!(
                    "catalog entry id {} is used more than once",
                    entry.id
                )));
            }
        }
        Ok(())
    }

    /// Keep only the listed ids, in catalog order.
    pub fn only(&self, ids: &[u32]) -> Result<Self> {
        if let Some(missing) = ids.iter().find(|id| self.get(**id).is_none()) {
            return Err(CohortError::Config(format!(
                "catalog has no entry with id {}",
                missing
            )));
        }
        Ok(Self::new(
            self.entries
                .iter()
                .filter(|e| ids.contains(&e.id))
                .cloned()
                .collect(),
        ))
    }

    pub fn get(&self, id: u32) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
