//! End-to-end exam report computation.
//!
//! Runs one exam snapshot through the whole pipeline: paper normalization,
//! subject scoring and grading, subject selection, student aggregation,
//! merit ranking and group summaries.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::EngineSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ExamReport, ExamSnapshot, Gender, GradingSystem, GroupKey, GroupSummary, NormalizedPaper,
    RawResult, ReportWarning, ScoredSubject, Severity, Student, StudentResult, Subject,
    SubjectPlacement,
};

use super::rounding::round_for_display;
use super::{
    RankingPolicy, SelectionPolicy, WeightAdjustment, aggregate_student, classify_score,
    normalize_papers, rank, ranks_in_input_order, roll_up, score_subject, select_subjects,
    summarize_group, summarize_subject,
};

/// Computes the full report of one exam.
///
/// The effective minimum subject count is the exam's own, or
/// `settings.default_min_subjects` when the exam has none; zero is treated
/// as one. Configuration anomalies never fail the computation: they are
/// repaired and recorded in [`ExamReport::warnings`].
///
/// Students are returned grouped by class, each class in merit order
/// (dense ranking on total points, ties in snapshot order).
pub fn compute_exam_report(
    snapshot: &ExamSnapshot,
    system: &GradingSystem,
    settings: &EngineSettings,
) -> ExamReport {
    let min_subjects = snapshot
        .exam
        .min_subjects
        .unwrap_or(settings.default_min_subjects)
        .max(1);
    let uses_papers = snapshot.uses_papers();

    debug!(
        exam_id = snapshot.exam.id,
        grading_system = %system.id,
        students = snapshot.students.len(),
        subjects = snapshot.subjects.len(),
        min_subjects,
        uses_papers,
        "Computing exam report"
    );

    let mut warnings = Vec::new();
    let context = ReportContext {
        snapshot,
        system,
        papers: normalize_exam_papers(snapshot, &mut warnings),
        results: index_results(&snapshot.results),
        policy: settings.selection_policy(),
        min_subjects,
        uses_papers,
    };

    let mut fallback_grades = 0;
    let mut students: Vec<StudentResult> = snapshot
        .students
        .iter()
        .map(|student| {
            let (result, fallbacks) = context.student_result(student);
            fallback_grades += fallbacks;
            result
        })
        .collect();

    if fallback_grades > 0 {
        warnings.push(ReportWarning {
            code: "FALLBACK_GRADES".to_string(),
            message: format!(
                "{} grade(s) fell outside every rule of '{}' and received the fallback grade",
                fallback_grades, system.id
            ),
            severity: Severity::Low,
        });
    }

    assign_ranks(&mut students);
    students.sort_by_key(|s| (s.class_id, s.class_rank));

    let stream_summaries = summarize_streams(&students, system);
    let classes = summarize_classes(&stream_summaries, system);
    let genders = summarize_genders(&students, system);
    let groups = summarize_custom_groups(&students, system);
    let subjects = snapshot
        .subjects
        .iter()
        .map(|subject| summarize_subject(subject, &students, system))
        .collect();

    for warning in &warnings {
        warn!(
            exam_id = snapshot.exam.id,
            code = %warning.code,
            severity = ?warning.severity,
            "{}",
            warning.message
        );
    }

    debug!(
        exam_id = snapshot.exam.id,
        streams = stream_summaries.len(),
        classes = classes.len(),
        warnings = warnings.len(),
        "Exam report computed"
    );

    ExamReport {
        report_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        exam_id: snapshot.exam.id,
        grading_system_id: system.id.clone(),
        min_subjects,
        uses_papers,
        students,
        streams: stream_summaries.into_iter().map(|(_, summary)| summary).collect(),
        classes,
        genders,
        groups,
        subjects,
        warnings,
    }
}

/// Ranks students on one subject's score.
///
/// Only students with a score above zero for the subject are ranked. When
/// `group` is given, only members of that custom group are considered.
/// Ranking uses [`RankingPolicy::Competition`]; ties keep the report's
/// student order.
///
/// # Errors
///
/// Returns `EngineError::SubjectNotFound` if the subject is not part of the
/// report.
pub fn subject_ranking(
    report: &ExamReport,
    subject_id: u64,
    group: Option<&str>,
) -> EngineResult<Vec<SubjectPlacement>> {
    if !report.subjects.iter().any(|s| s.subject_id == subject_id) {
        return Err(EngineError::SubjectNotFound { subject_id });
    }

    let entries: Vec<(&StudentResult, &ScoredSubject)> = report
        .students
        .iter()
        .filter(|student| group.is_none_or(|name| student.in_group(name)))
        .filter_map(|student| student.subject(subject_id).map(|scored| (student, scored)))
        .filter(|(_, scored)| scored.score > 0.0)
        .collect();

    let scores: Vec<f64> = entries.iter().map(|(_, scored)| scored.score).collect();

    Ok(rank(&scores, RankingPolicy::Competition)
        .into_iter()
        .map(|placement| {
            let (student, scored) = entries[placement.index];
            SubjectPlacement {
                student_id: student.student_id,
                name: student.name.clone(),
                score: scored.score,
                grade: scored.grade.clone(),
                rank: placement.rank,
            }
        })
        .collect())
}

// ============================================================================
// Pipeline stages
// ============================================================================

struct ReportContext<'a> {
    snapshot: &'a ExamSnapshot,
    system: &'a GradingSystem,
    papers: HashMap<u64, Vec<NormalizedPaper>>,
    results: HashMap<(u64, u64), Vec<RawResult>>,
    policy: SelectionPolicy,
    min_subjects: u32,
    uses_papers: bool,
}

impl ReportContext<'_> {
    /// Scores, selects and aggregates one student. Also returns how many of
    /// the student's grades came from a fallback rule.
    fn student_result(&self, student: &Student) -> (StudentResult, usize) {
        let mut fallbacks = 0;
        let mut subjects = Vec::new();

        for subject in &self.snapshot.subjects {
            let Some(results) = self.results.get(&(student.id, subject.id)) else {
                continue;
            };
            let (scored, fallback) = self.score(subject, results);
            if fallback {
                fallbacks += 1;
            }
            subjects.push(scored);
        }

        let selection = select_subjects(&subjects, self.uses_papers, &self.policy);
        let aggregate = aggregate_student(&selection.selected, self.min_subjects, self.system);
        if aggregate.overall_grade.is_fallback() {
            fallbacks += 1;
        }

        let result = StudentResult {
            student_id: student.id,
            name: student.name.clone(),
            gender: student.gender,
            class_id: student.class_id,
            stream_id: student.stream_id,
            groups: student.groups.clone(),
            selected_subjects: selection.selected.iter().map(|s| s.subject_id).collect(),
            subjects,
            total_score: aggregate.total_score,
            total_points: aggregate.total_points,
            mean_points_display: aggregate.mean_points.map(round_for_display),
            mean_points: aggregate.mean_points,
            overall_grade: aggregate.overall_grade,
            qualified: aggregate.qualified,
            class_rank: None,
            stream_rank: None,
        };

        (result, fallbacks)
    }

    /// Scores and grades one subject, flagging a fallback grade.
    fn score(&self, subject: &Subject, results: &[RawResult]) -> (ScoredSubject, bool) {
        let papers = self
            .papers
            .get(&subject.id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let score = score_subject(subject, papers, results).score;
        let grade = classify_score(score, self.system);
        let fallback = grade.is_fallback();

        let scored = ScoredSubject {
            subject_id: subject.id,
            subject_type: subject.subject_type,
            score,
            grade: grade.grade,
            points: grade.points,
        };
        (scored, fallback)
    }
}

/// Normalizes the papers of every paper-based subject, recording a warning
/// for each repair.
fn normalize_exam_papers(
    snapshot: &ExamSnapshot,
    warnings: &mut Vec<ReportWarning>,
) -> HashMap<u64, Vec<NormalizedPaper>> {
    let mut normalized = HashMap::new();

    for subject in snapshot.subjects.iter().filter(|s| s.uses_papers) {
        let normalization = normalize_papers(snapshot.papers_for(subject.id));

        if normalization.papers.is_empty() {
            warnings.push(ReportWarning {
                code: "SUBJECT_WITHOUT_PAPERS".to_string(),
                message: format!(
                    "Subject '{}' uses papers but has none configured; every score is 0",
                    subject.name
                ),
                severity: Severity::Medium,
            });
        }

        match normalization.adjustment {
            WeightAdjustment::Unchanged => {}
            WeightAdjustment::EqualSplit => warnings.push(ReportWarning {
                code: "PAPER_WEIGHTS_EQUAL_SPLIT".to_string(),
                message: format!(
                    "Paper weights of '{}' were missing or zero and were split equally",
                    subject.name
                ),
                severity: Severity::Medium,
            }),
            WeightAdjustment::Rescaled { original_sum } => warnings.push(ReportWarning {
                code: "PAPER_WEIGHTS_RESCALED".to_string(),
                message: format!(
                    "Paper weights of '{}' summed to {} and were rescaled to 100",
                    subject.name, original_sum
                ),
                severity: Severity::Low,
            }),
        }

        for paper in normalization.papers.iter().filter(|p| !(p.max_score > 0.0)) {
            warnings.push(ReportWarning {
                code: "PAPER_MAX_SCORE_INVALID".to_string(),
                message: format!(
                    "Paper {} of '{}' has max score {} and is ignored",
                    paper.paper_id.unwrap_or_default(),
                    subject.name,
                    paper.max_score
                ),
                severity: Severity::High,
            });
        }

        normalized.insert(subject.id, normalization.papers);
    }

    normalized
}

/// Groups usable results by (student, subject).
fn index_results(results: &[RawResult]) -> HashMap<(u64, u64), Vec<RawResult>> {
    let mut index: HashMap<(u64, u64), Vec<RawResult>> = HashMap::new();
    for result in results.iter().filter(|r| r.usable_score().is_some()) {
        index
            .entry((result.student_id, result.subject_id))
            .or_default()
            .push(result.clone());
    }
    index
}

/// Assigns dense class and stream positions on total points.
fn assign_ranks(students: &mut [StudentResult]) {
    let mut classes: BTreeMap<u64, Vec<usize>> = BTreeMap::new();
    let mut streams: BTreeMap<(u64, u64), Vec<usize>> = BTreeMap::new();

    for (index, student) in students.iter().enumerate() {
        classes.entry(student.class_id).or_default().push(index);
        streams
            .entry((student.class_id, student.stream_id))
            .or_default()
            .push(index);
    }

    for members in classes.values() {
        for (&index, position) in members.iter().zip(dense_positions(students, members)) {
            students[index].class_rank = Some(position);
        }
    }
    for members in streams.values() {
        for (&index, position) in members.iter().zip(dense_positions(students, members)) {
            students[index].stream_rank = Some(position);
        }
    }
}

fn dense_positions(students: &[StudentResult], members: &[usize]) -> Vec<u32> {
    let totals: Vec<f64> = members
        .iter()
        .map(|&index| f64::from(students[index].total_points))
        .collect();
    ranks_in_input_order(&totals, RankingPolicy::Dense)
}

// ============================================================================
// Group summaries
// ============================================================================

/// Stream summaries keyed by (class, stream).
fn summarize_streams(
    students: &[StudentResult],
    system: &GradingSystem,
) -> Vec<((u64, u64), GroupSummary)> {
    let mut streams: BTreeMap<(u64, u64), Vec<&StudentResult>> = BTreeMap::new();
    for student in students {
        streams
            .entry((student.class_id, student.stream_id))
            .or_default()
            .push(student);
    }

    streams
        .into_iter()
        .map(|((class_id, stream_id), members)| {
            let key = GroupKey::Stream {
                class_id,
                stream_id,
            };
            let summary = summarize_group(key, members, system);
            ((class_id, stream_id), summary)
        })
        .collect()
}

/// Class summaries rolled up from their stream summaries.
fn summarize_classes(
    streams: &[((u64, u64), GroupSummary)],
    system: &GradingSystem,
) -> Vec<GroupSummary> {
    let mut classes: BTreeMap<u64, Vec<&GroupSummary>> = BTreeMap::new();
    for ((class_id, _), summary) in streams {
        classes.entry(*class_id).or_default().push(summary);
    }

    classes
        .into_iter()
        .map(|(class_id, parts)| roll_up(GroupKey::Class(class_id), parts, system))
        .collect()
}

fn summarize_genders(students: &[StudentResult], system: &GradingSystem) -> Vec<GroupSummary> {
    let mut genders: BTreeMap<Gender, Vec<&StudentResult>> = BTreeMap::new();
    for student in students {
        genders.entry(student.gender).or_default().push(student);
    }

    genders
        .into_iter()
        .map(|(gender, members)| summarize_group(GroupKey::Gender(gender), members, system))
        .collect()
}

fn summarize_custom_groups(
    students: &[StudentResult],
    system: &GradingSystem,
) -> Vec<GroupSummary> {
    let mut groups: BTreeMap<&str, Vec<&StudentResult>> = BTreeMap::new();
    for student in students {
        let names: BTreeSet<&str> = student.groups.iter().map(String::as_str).collect();
        for name in names {
            groups.entry(name).or_default().push(student);
        }
    }

    groups
        .into_iter()
        .map(|(name, members)| {
            summarize_group(GroupKey::Custom(name.to_string()), members, system)
        })
        .collect()
}
