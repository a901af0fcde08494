//! Catalog entry behavior: ordering, truncation, minimums and isolation.

use cohort::dataset::{Dataset, DatasetLoader};
use cohort::query::{OutputKind, Section};
use cohort::report::render_table;
use cohort::{Catalog, DatasetKind, MemorySource, QueryError, QueryExecutor, QueryOutput, Value};

/// One core row: id, gender, grade, SES, ExtraCurAct.
struct Student<'a> {
    id: &'a str,
    gender: &'a str,
    grade: i64,
    ses: &'a str,
    activity: &'a str,
    gpa: &'a str,
}

fn student<'a>(id: &'a str, gender: &'a str, grade: i64, ses: &'a str, gpa: &'a str) -> Student<'a> {
    Student {
        id,
        gender,
        grade,
        ses,
        activity: "Chess",
        gpa,
    }
}

/// Build a dataset; `internships` are (id, company, role) rows marked done.
fn build(students: &[Student], internships: &[(&str, &str, &str)]) -> Dataset {
    let mut core = String::from(
        "StudentID,Location,Gender,GradeLevel,DOB,ExtraCurAct,DisciplineIncidents,Public_Private_Charter,SocioEconomicStatus,DropoutStatus,ExpectedStatus\n",
    );
    let mut academic = String::from("StudentID,GPA,AttendanceRate\n");
    for s in students {
        core.push_str(&format!(
            "{},Tampa,{},{},01-01-2000,{},0,Public,{},Enrolled,On Track\n",
            s.id, s.gender, s.grade, s.activity, s.ses
        ));
        academic.push_str(&format!("{},{},0.9\n", s.id, s.gpa));
    }
    let mut internship =
        String::from("StudentID,InternshipDone,InternshipCompany,InternshipLocation,InternshipRole\n");
    for (id, company, role) in internships {
        internship.push_str(&format!("{},Yes,{},Tampa,{}\n", id, company, role));
    }
    if internships.is_empty() {
        internship.push_str("X0,No,,,\n");
    }

    let source = MemorySource::new()
        .with_csv(DatasetKind::Core, &core)
        .and_then(|s| s.with_csv(DatasetKind::Academic, &academic))
        .and_then(|s| s.with_csv(DatasetKind::Internship, &internship))
        .expect("Failed to build source");
    let data = DatasetLoader::default().load(&source).expect("Failed to load");
    Dataset::build(&data)
}

fn run(id: u32, dataset: &Dataset) -> QueryOutput {
    let catalog = Catalog::builtin();
    let entry = catalog.get(id).expect("entry exists");
    QueryExecutor::new()
        .execute(entry, dataset)
        .expect("entry runs")
}

// =============================================================================
// Built-in entries
// =============================================================================

#[test]
fn test_top_gpa_ties_keep_input_order() {
    let dataset = build(
        &[
            student("S1", "F", 11, "Low", "3.8"),
            student("S2", "M", 11, "Low", "4.0"),
            student("S3", "F", 12, "Low", "4.0"),
            student("S4", "M", 12, "Low", "3.9"),
        ],
        &[],
    );
    let output = run(8, &dataset);
    let table = output.table().unwrap();

    assert_eq!(table.columns, vec!["StudentID", "GPA", "Location"]);
    assert_eq!(
        table.column("StudentID").unwrap(),
        vec![&Value::from("S2"), &Value::from("S3"), &Value::from("S4")]
    );
    assert_eq!(table.total_rows, 3);
    assert!(!render_table(table).contains("only showing"));
}

#[test]
fn test_graduation_rate_truncates_toward_zero() {
    let dataset = build(
        &[
            student("L1", "F", 12, "Low", "3.0"),
            student("H1", "M", 12, "High", "3.0"),
            student("L2", "F", 12, "Low", "3.0"),
            student("L3", "M", 11, "Low", "3.0"),
            student("H2", "M", 10, "High", "3.0"),
            student("L4", "F", 10, "Low", "3.0"),
            student("L5", "F", 9, "Low", "3.0"),
            student("H3", "F", 11, "High", "3.0"),
        ],
        &[],
    );
    let output = run(11, &dataset);
    let table = output.table().unwrap();

    assert_eq!(
        table.rows,
        vec![
            vec![Value::from("Low"), Value::Int(40)],
            vec![Value::from("High"), Value::Int(33)],
        ]
    );
}

#[test]
fn test_average_gpa_by_gender() {
    let dataset = build(
        &[
            student("S1", "F", 12, "Low", "3.0"),
            student("S2", "M", 12, "Low", "2.0"),
            student("S3", "F", 12, "Low", ""),
            student("S4", "F", 12, "Low", "4.0"),
        ],
        &[],
    );
    let output = run(5, &dataset);
    let table = output.table().unwrap();

    assert_eq!(table.columns, vec!["Gender", "Avg_GPA", "Avg_AttendanceRate"]);
    assert_eq!(table.get(0, "Avg_GPA"), Some(&Value::Float(3.5)));
    assert_eq!(table.get(1, "Avg_GPA"), Some(&Value::Float(2.0)));
}

#[test]
fn test_extracurricular_filter_ignores_case() {
    let mut students = vec![
        student("S1", "F", 12, "Low", "3.0"),
        student("S2", "M", 12, "Low", "3.0"),
        student("S3", "F", 12, "Low", "3.0"),
    ];
    students[0].activity = "NONE";
    students[1].activity = "none";
    let dataset = build(&students, &[]);
    let output = run(2, &dataset);

    assert_eq!(
        output.table().unwrap().column("StudentID").unwrap(),
        vec![&Value::from("S3")]
    );
}

#[test]
fn test_minimum_by_gender_takes_first_tie() {
    let dataset = build(
        &[
            student("S1", "M", 12, "Low", "3.0"),
            student("S2", "F", 12, "Low", "3.0"),
            student("S3", "M", 12, "Low", "3.0"),
            student("S4", "X", 12, "Low", "3.0"),
            student("S5", "M", 12, "Low", "3.0"),
        ],
        &[
            ("S1", "Acme", "Analyst"),
            ("S2", "Acme", "Analyst"),
            ("S3", "Beta", "Engineer"),
            ("S4", "Beta", "Engineer"),
        ],
    );
    let output = run(16, &dataset);

    let table = output.table().unwrap();
    assert_eq!(
        table.rows,
        vec![
            vec![Value::from("M"), Value::Int(2)],
            vec![Value::from("F"), Value::Int(1)],
            vec![Value::from("X"), Value::Int(1)],
        ]
    );
    assert_eq!(
        output.minimum().unwrap().rows,
        vec![vec![Value::from("F"), Value::Int(1)]]
    );
}

#[test]
fn test_internships_by_company_sorted_by_count() {
    let dataset = build(
        &[
            student("S1", "M", 12, "Low", "3.0"),
            student("S2", "F", 12, "Low", "3.0"),
            student("S3", "M", 12, "Low", "3.0"),
        ],
        &[
            ("S1", "Acme", "Analyst"),
            ("S2", "Beta", "Analyst"),
            ("S3", "Beta", "Engineer"),
        ],
    );
    let output = run(14, &dataset);
    let table = output.table().unwrap();

    assert_eq!(table.columns, vec!["InternshipCompany", "count"]);
    assert_eq!(table.get(0, "InternshipCompany"), Some(&Value::from("Beta")));
    assert_eq!(table.get(0, "count"), Some(&Value::Int(2)));
    assert_eq!(table.get(1, "InternshipCompany"), Some(&Value::from("Acme")));
}

#[test]
fn test_status_role_breakdown_orders_and_limits() {
    let statuses = ["Low", "High", "Middle"];
    let roles = ["Analyst", "Engineer", "Designer", "Tester"];
    let mut students = Vec::new();
    let mut internships = Vec::new();
    let ids: Vec<String> = (0..12).map(|i| format!("S{:02}", i)).collect();
    for (i, id) in ids.iter().enumerate() {
        students.push(student(id, "F", 12, statuses[i % 3], "3.0"));
        internships.push((id.as_str(), "Acme", roles[i % 4]));
    }
    let dataset = build(&students, &internships);
    let output = run(18, &dataset);
    let table = output.table().unwrap();

    assert_eq!(table.total_rows, 12);
    assert_eq!(table.rows.len(), 10);
    assert!(render_table(table).ends_with("only showing top 10 rows\n"));
    let statuses: Vec<String> = table
        .column("SocioEconomicStatus")
        .unwrap()
        .into_iter()
        .map(|v| v.to_string())
        .collect();
    let mut sorted = statuses.clone();
    sorted.sort();
    assert_eq!(statuses, sorted);
    assert_eq!(statuses[0], "High");
}

#[test]
fn test_empty_filter_result_is_empty_table() {
    let dataset = build(&[student("S1", "F", 11, "Low", "3.0")], &[]);
    let output = run(3, &dataset);
    let table = output.table().unwrap();

    assert!(table.rows.is_empty());
    assert_eq!(table.columns, vec!["StudentID", "GradeLevel", "GPA"]);
    assert_eq!(run(20, &dataset).scalar(), Some(&Value::Int(0)));
}

// =============================================================================
// Catalog as data
// =============================================================================

#[test]
fn test_builtin_catalog_validates() {
    let executor = QueryExecutor::new();
    for entry in &Catalog::builtin().entries {
        assert!(executor.validate(entry).is_ok(), "entry {} invalid", entry.id);
    }
}

#[test]
fn test_builtin_catalog_json_round_trip() {
    let catalog = Catalog::builtin();
    let json = catalog.to_json().unwrap();
    assert_eq!(Catalog::from_json(&json).unwrap(), catalog);
}

#[test]
fn test_custom_catalog_isolates_bad_entry() {
    let json = r#"{
        "entries": [
            {"id": 1, "heading": "Unknown column", "select": ["Nickname"]},
            {"id": 2, "heading": "Average nickname",
             "group_by": ["Gender"],
             "aggregates": [{"fn": "avg", "column": "Gender", "alias": "x"}]},
            {"id": 3, "heading": "Everyone",
             "aggregates": [{"fn": "count", "alias": "n"}],
             "output": {"kind": "scalar", "label": "Students"}}
        ]
    }"#;
    let catalog = Catalog::from_json(json).unwrap();
    let dataset = build(
        &[
            student("S1", "F", 12, "Low", "3.0"),
            student("S2", "M", 11, "High", "2.0"),
        ],
        &[],
    );
    let sections: Vec<Section> = QueryExecutor::new().run(&catalog, &dataset);

    assert_eq!(sections.len(), 3);
    assert_eq!(
        sections[0].outcome,
        Err(QueryError::UnknownColumn {
            entry: 1,
            column: "Nickname".to_string()
        })
    );
    assert!(matches!(
        sections[1].outcome,
        Err(QueryError::NonNumericAggregate { entry: 2, .. })
    ));
    assert_eq!(
        sections[2].outcome.as_ref().unwrap().scalar(),
        Some(&Value::Int(2))
    );
}

#[test]
fn test_only_keeps_catalog_order() {
    let subset = Catalog::builtin().only(&[12, 3, 7]).unwrap();
    let ids: Vec<u32> = subset.entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![3, 7, 12]);
    assert!(matches!(
        subset.get(7).map(|e| &e.output),
        Some(OutputKind::Scalar { .. })
    ));
    assert!(Catalog::builtin().only(&[21]).is_err());
}

#[test]
fn test_duplicate_ids_rejected() {
    let json = r#"{"entries": [{"id": 1, "heading": "a"}, {"id": 1, "heading": "b"}]}"#;
    assert!(Catalog::from_json(json).is_err());
}
