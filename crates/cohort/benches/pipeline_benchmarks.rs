//! Full pipeline performance benchmarks.
//!
//! Measures dataset construction (load, join, classify) and catalog execution.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use cohort::dataset::{DatasetLoader, SourceData};
use cohort::{Catalog, Dataset, DatasetKind, MemorySource, QueryExecutor};

/// Generate the three CSV texts for `rows` students.
fn generate_sources(rows: usize) -> (String, String, String) {
    let locations = ["Tampa", "Miami", "Orlando", "Jacksonville"];
    let genders = ["Female", "Male"];
    let activities = ["Debate", "Chess", "None", "Soccer", "none"];
    let schools = ["Public", "Private", "Charter"];
    let statuses = ["Low", "Middle", "High"];
    let companies = ["Acme", "Globex", "Initech", "Umbrella"];
    let roles = ["Analyst", "Engineer", "Designer"];

    let mut core = String::from(
        "StudentID,Location,Gender,GradeLevel,DOB,ExtraCurAct,DisciplineIncidents,Public_Private_Charter,SocioEconomicStatus,DropoutStatus,ExpectedStatus\n",
    );
    let mut academic = String::from("StudentID,GPA,AttendanceRate\n");
    let mut internship =
        String::from("StudentID,InternshipDone,InternshipCompany,InternshipLocation,InternshipRole\n");

    for row in 0..rows {
        core.push_str(&format!(
            "S{:06},{},{},{},{:02}-{:02}-{},{},{},{},{},{},{}\n",
            row,
            locations[row % locations.len()],
            genders[row % genders.len()],
            9 + row % 4,
            1 + row % 28,
            1 + row % 12,
            1997 + row % 5,
            activities[row % activities.len()],
            row % 5,
            schools[row % schools.len()],
            statuses[row % statuses.len()],
            if row % 17 == 0 { "Dropped" } else { "Enrolled" },
            if row % 7 == 0 { "At Risk" } else { "On Track" },
        ));
        // Every 20th student has no academic row.
        if row % 20 != 0 {
            academic.push_str(&format!(
                "S{:06},{:.2},{:.2}\n",
                row,
                1.5 + (row % 26) as f64 * 0.1,
                0.6 + (row % 40) as f64 * 0.01
            ));
        }
        if row % 3 != 0 {
            let done = if row % 2 == 0 { "Yes" } else { "No" };
            internship.push_str(&format!(
                "S{:06},{},{},{},{}\n",
                row,
                done,
                companies[row % companies.len()],
                locations[(row / 2) % locations.len()],
                roles[row % roles.len()]
            ));
        }
    }

    (core, academic, internship)
}

fn source(rows: usize) -> MemorySource {
    let (core, academic, internship) = generate_sources(rows);
    MemorySource::new()
        .with_csv(DatasetKind::Core, &core)
        .and_then(|s| s.with_csv(DatasetKind::Academic, &academic))
        .and_then(|s| s.with_csv(DatasetKind::Internship, &internship))
        .expect("valid generated sources")
}

fn bench_build_dataset(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_dataset");

    for rows in [100, 1_000, 10_000] {
        let source = source(rows);
        let data: SourceData = DatasetLoader::default().load(&source).expect("load");

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("load", rows), &source, |b, source| {
            b.iter(|| DatasetLoader::default().load(black_box(source)).expect("load"))
        });
        group.bench_with_input(BenchmarkId::new("join_classify", rows), &data, |b, data| {
            b.iter(|| Dataset::build(black_box(data)))
        });
    }

    group.finish();
}

fn bench_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog");
    let catalog = Catalog::builtin();
    let executor = QueryExecutor::new();

    for rows in [1_000, 10_000] {
        let data = DatasetLoader::default().load(&source(rows)).expect("load");
        let dataset = Dataset::build(&data);

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("builtin", rows), &dataset, |b, dataset| {
            b.iter(|| executor.run(black_box(&catalog), black_box(dataset)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_dataset, bench_catalog);
criterion_main!(benches);
