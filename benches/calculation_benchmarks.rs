//! Performance benchmarks for the Grade Engine.
//!
//! This benchmark suite covers:
//! - A single class report through the HTTP router
//! - A whole-school report (several hundred students)
//! - The calculation core without HTTP or JSON overhead
//! - Scaling of report computation with cohort size
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use grade_engine::api::{AppState, ExamReportRequest, create_router};
use grade_engine::calculation::compute_exam_report;
use grade_engine::config::ConfigLoader;
use grade_engine::models::ExamSnapshot;

use axum::{Router, body::Body, http::Request};
use tower::ServiceExt;

const COMPULSORY_SUBJECTS: u64 = 6;
const ELECTIVE_SUBJECTS: u64 = 5;

/// Creates a test state with loaded configuration.
fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config").expect("Failed to load config");
    AppState::new(config)
}

/// Creates an exam request for a cohort of the given size.
///
/// Eleven subjects, two of them paper-based electives with two papers each.
/// Students are spread over two classes of three streams; every fifth student
/// sits only four subjects.
fn create_request_with_students(student_count: usize) -> ExamReportRequest {
    let subject_count = COMPULSORY_SUBJECTS + ELECTIVE_SUBJECTS;

    let subjects: Vec<serde_json::Value> = (1..=subject_count)
        .map(|id| {
            serde_json::json!({
                "id": id,
                "name": format!("Subject {}", id),
                "type": if id <= COMPULSORY_SUBJECTS { "compulsory" } else { "elective" },
                "uses_papers": id > subject_count - 2
            })
        })
        .collect();

    let papers: Vec<serde_json::Value> = (subject_count - 1..=subject_count)
        .flat_map(|subject_id| {
            [(1, 100.0, 60.0), (2, 80.0, 40.0)].map(|(n, max, weight)| {
                serde_json::json!({
                    "id": subject_id * 10 + n,
                    "subject_id": subject_id,
                    "name": format!("Paper {}", n),
                    "max_score": max,
                    "contribution_percentage": weight
                })
            })
        })
        .collect();

    let students: Vec<serde_json::Value> = (1..=student_count as u64)
        .map(|id| {
            serde_json::json!({
                "id": id,
                "name": format!("Student {:04}", id),
                "gender": if id % 2 == 0 { "female" } else { "male" },
                "class_id": id % 2 + 1,
                "stream_id": id % 6 + 1,
                "groups": if id % 4 == 0 { vec!["boarders"] } else { vec![] }
            })
        })
        .collect();

    let mut results = Vec::new();
    for student_id in 1..=student_count as u64 {
        let sat = if student_id % 5 == 0 { 4 } else { subject_count };
        for subject_id in 1..=sat {
            let score = ((student_id * 37 + subject_id * 11) % 100) as f64;
            if subject_id > subject_count - 2 {
                for n in 1..=2 {
                    results.push(serde_json::json!({
                        "student_id": student_id,
                        "subject_id": subject_id,
                        "paper_id": subject_id * 10 + n,
                        "score": score * 0.8
                    }));
                }
            } else {
                results.push(serde_json::json!({
                    "student_id": student_id,
                    "subject_id": subject_id,
                    "score": score
                }));
            }
        }
    }

    let request_json = serde_json::json!({
        "exam": {"id": 1, "name": "End Term", "min_subjects": 7},
        "subjects": subjects,
        "papers": papers,
        "students": students,
        "results": results
    });

    serde_json::from_value(request_json).expect("Failed to create request")
}

async fn post_report(router: Router, body: String) -> axum::response::Response {
    router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/reports/exam")
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Benchmark: One class of 40 students through the router.
fn bench_single_class(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let body = serde_json::to_string(&create_request_with_students(40)).unwrap();

    c.bench_function("single_class_40", |b| {
        b.to_async(&rt).iter(|| async {
            let response = post_report(router.clone(), body.clone()).await;
            black_box(response)
        })
    });
}

/// Benchmark: A whole school of 600 students through the router.
fn bench_whole_school(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let body = serde_json::to_string(&create_request_with_students(600)).unwrap();

    let mut group = c.benchmark_group("whole_school");
    group.throughput(Throughput::Elements(600));
    // Reduce sample size for large cohorts to keep benchmark time reasonable
    group.sample_size(20);

    group.bench_function("school_600", |b| {
        b.to_async(&rt).iter(|| async {
            let response = post_report(router.clone(), body.clone()).await;
            black_box(response)
        })
    });

    group.finish();
}

/// Benchmark: The calculation core on a prepared snapshot.
fn bench_compute_only(c: &mut Criterion) {
    let config = ConfigLoader::load("./config").expect("Failed to load config");
    let system = config
        .default_grading_system()
        .expect("Default grading system missing");
    let snapshot: ExamSnapshot = create_request_with_students(200).into();

    let mut group = c.benchmark_group("compute_only");
    group.throughput(Throughput::Elements(200));

    group.bench_function("students_200", |b| {
        b.iter(|| black_box(compute_exam_report(&snapshot, system, config.settings())))
    });

    group.finish();
}

/// Benchmark: Various cohort sizes to understand scaling behavior.
fn bench_scaling(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state();

    let mut group = c.benchmark_group("scaling");

    for student_count in [10, 50, 100, 250, 500].iter() {
        let router = create_router(state.clone());
        let body = serde_json::to_string(&create_request_with_students(*student_count)).unwrap();

        group.throughput(Throughput::Elements(*student_count as u64));
        group.bench_with_input(
            BenchmarkId::new("students", student_count),
            student_count,
            |b, _| {
                b.to_async(&rt).iter(|| async {
                    let response = post_report(router.clone(), body.clone()).await;
                    black_box(response)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_class,
    bench_whole_school,
    bench_compute_only,
    bench_scaling,
);
criterion_main!(benches);
