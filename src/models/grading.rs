//! Grading system models.
//!
//! This module contains the [`GradingSystem`] and [`GradingRule`] types that
//! drive grade classification, together with the [`GradeResult`] produced by
//! the classifier. Configurable systems loaded from storage and the fixed CBC
//! scheme are both plain [`GradingSystem`] values.

use serde::{Deserialize, Serialize};

/// Grade assigned to a student holding fewer subjects than the exam minimum.
pub const INSUFFICIENT_SUBJECTS_GRADE: &str = "X";

/// Label returned when a value cannot be graded.
pub const NO_GRADE: &str = "-";

/// Label of the last-resort grade used when a system has no usable rule.
pub const MINIMAL_PASS_GRADE: &str = "E";

/// Points of the last-resort grade.
pub const MINIMAL_PASS_POINTS: u32 = 1;

/// Identifier of the built-in 8-level CBC grading system.
pub const CBC_EIGHT_LEVEL_ID: &str = "cbc_8_level";

fn default_sentinel_grades() -> Vec<String> {
    vec![INSUFFICIENT_SUBJECTS_GRADE.to_string(), "Y".to_string()]
}

/// The curriculum a grading rule belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curriculum {
    /// The conventional 8-4-4 style curriculum.
    #[default]
    Conventional,
    /// The competency based curriculum.
    Cbc,
}

/// A single grade band within a grading system.
///
/// In score mode the inclusive `[min_score, max_score]` range is matched
/// against a subject score. In points mode the `points` value identifies the
/// rule.
///
/// # Example
///
/// ```
/// use grade_engine::models::{Curriculum, GradingRule};
///
/// let rule = GradingRule {
///     grade: "B".to_string(),
///     min_score: 60.0,
///     max_score: 79.0,
///     points: 9,
///     description: None,
///     curriculum: Curriculum::Conventional,
/// };
/// assert!(rule.contains(79.0));
/// assert!(!rule.contains(79.5));
/// assert_eq!(rule.midpoint(), 69.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingRule {
    /// The grade label (e.g. "A-", "EE1").
    pub grade: String,
    /// Lowest score in the band (inclusive).
    pub min_score: f64,
    /// Highest score in the band (inclusive).
    pub max_score: f64,
    /// Points awarded for this grade.
    pub points: u32,
    /// Optional human readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Curriculum this rule was defined for.
    #[serde(default)]
    pub curriculum: Curriculum,
}

impl GradingRule {
    /// Returns true if `value` lies within the inclusive score range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min_score && value <= self.max_score
    }

    /// Returns the midpoint of the score range.
    pub fn midpoint(&self) -> f64 {
        (self.min_score + self.max_score) / 2.0
    }
}

/// A named set of grading rules.
///
/// The rule list is ordered as configured. Labels listed in
/// `sentinel_grades` mark disqualifying outcomes (insufficient subjects and
/// similar); rules carrying those labels are never selected by the
/// classifier and only contribute to the grade-label universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingSystem {
    /// Unique identifier of the grading system.
    pub id: String,
    /// Human readable name.
    pub name: String,
    /// The school that owns this grading system, if any.
    #[serde(default)]
    pub school_id: Option<u64>,
    /// The curriculum this system grades.
    #[serde(default)]
    pub curriculum: Curriculum,
    /// The ordered grade bands.
    pub rules: Vec<GradingRule>,
    /// Labels reserved for disqualifying outcomes.
    #[serde(default = "default_sentinel_grades")]
    pub sentinel_grades: Vec<String>,
}

impl GradingSystem {
    /// Creates a conventional grading system with the default sentinel grades.
    pub fn new(id: impl Into<String>, name: impl Into<String>, rules: Vec<GradingRule>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            school_id: None,
            curriculum: Curriculum::Conventional,
            rules,
            sentinel_grades: default_sentinel_grades(),
        }
    }

    /// Returns the fixed 8-level CBC grading scheme.
    ///
    /// Thresholds are 90/75/58/41/31/21/11/0, mapped to 8 down to 1 points.
    /// Bands are contiguous: each band ends at the largest `f64` strictly
    /// below the next band's threshold.
    ///
    /// # Example
    ///
    /// ```
    /// use grade_engine::models::GradingSystem;
    ///
    /// let cbc = GradingSystem::cbc_eight_level();
    /// assert_eq!(cbc.rules.len(), 8);
    /// assert_eq!(cbc.rules[0].grade, "EE1");
    /// assert_eq!(cbc.rules[7].points, 1);
    /// ```
    pub fn cbc_eight_level() -> Self {
        const LEVELS: [(&str, f64, u32, &str); 8] = [
            ("EE1", 90.0, 8, "Exceeding Expectations"),
            ("EE2", 75.0, 7, "Exceeding Expectations"),
            ("ME1", 58.0, 6, "Meeting Expectations"),
            ("ME2", 41.0, 5, "Meeting Expectations"),
            ("AE1", 31.0, 4, "Approaching Expectations"),
            ("AE2", 21.0, 3, "Approaching Expectations"),
            ("BE1", 11.0, 2, "Below Expectations"),
            ("BE2", 0.0, 1, "Below Expectations"),
        ];

        let mut upper = 100.0;
        let mut rules = Vec::with_capacity(LEVELS.len());
        for (grade, threshold, points, description) in LEVELS {
            rules.push(GradingRule {
                grade: grade.to_string(),
                min_score: threshold,
                max_score: upper,
                points,
                description: Some(description.to_string()),
                curriculum: Curriculum::Cbc,
            });
            if threshold > 0.0 {
                upper = just_below(threshold);
            }
        }

        Self {
            id: CBC_EIGHT_LEVEL_ID.to_string(),
            name: "CBC 8-level rubric".to_string(),
            school_id: None,
            curriculum: Curriculum::Cbc,
            rules,
            sentinel_grades: default_sentinel_grades(),
        }
    }

    /// Returns true if `grade` is one of this system's sentinel labels.
    pub fn is_sentinel(&self, grade: &str) -> bool {
        self.sentinel_grades.iter().any(|s| s == grade)
    }

    /// Iterates over the rules the classifier may select (non-sentinel).
    pub fn graded_rules(&self) -> impl Iterator<Item = &GradingRule> {
        self.rules.iter().filter(|r| !self.is_sentinel(&r.grade))
    }

    /// Returns the fixed universe of grade labels for histograms.
    ///
    /// Non-sentinel labels come first ordered by points descending (ties keep
    /// configuration order), followed by the sentinel labels.
    ///
    /// # Example
    ///
    /// ```
    /// use grade_engine::models::GradingSystem;
    ///
    /// let labels = GradingSystem::cbc_eight_level().grade_labels();
    /// assert_eq!(labels.first().map(String::as_str), Some("EE1"));
    /// assert_eq!(labels[7], "BE2");
    /// assert_eq!(&labels[8..], &["X".to_string(), "Y".to_string()]);
    /// ```
    pub fn grade_labels(&self) -> Vec<String> {
        let mut graded: Vec<&GradingRule> = self.graded_rules().collect();
        graded.sort_by(|a, b| b.points.cmp(&a.points));

        let mut labels: Vec<String> = Vec::with_capacity(graded.len() + self.sentinel_grades.len());
        for rule in graded {
            if !labels.contains(&rule.grade) {
                labels.push(rule.grade.clone());
            }
        }
        for sentinel in &self.sentinel_grades {
            if !labels.contains(sentinel) {
                labels.push(sentinel.clone());
            }
        }
        labels
    }
}

/// Largest `f64` strictly below a positive threshold.
fn just_below(threshold: f64) -> f64 {
    f64::from_bits(threshold.to_bits() - 1)
}

/// How a [`GradeResult`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeSource {
    /// A rule matched the value directly.
    Rule,
    /// No rule matched; the system's lowest non-sentinel rule was used.
    FallbackRule,
    /// No rule matched and the system has no usable rule.
    MinimalPass,
    /// The value could not be graded.
    NoGrade,
    /// The student holds fewer subjects than the exam minimum.
    InsufficientSubjects,
}

/// A (grade, points) classification outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeResult {
    /// The grade label.
    pub grade: String,
    /// The points associated with the grade.
    pub points: u32,
    /// How the grade was determined.
    pub source: GradeSource,
}

impl GradeResult {
    /// Builds a result from a matched rule.
    pub fn from_rule(rule: &GradingRule, source: GradeSource) -> Self {
        Self {
            grade: rule.grade.clone(),
            points: rule.points,
            source,
        }
    }

    /// The "no grade" sentinel with zero points.
    pub fn no_grade() -> Self {
        Self {
            grade: NO_GRADE.to_string(),
            points: 0,
            source: GradeSource::NoGrade,
        }
    }

    /// The hard-coded minimal pass grade.
    pub fn minimal_pass() -> Self {
        Self {
            grade: MINIMAL_PASS_GRADE.to_string(),
            points: MINIMAL_PASS_POINTS,
            source: GradeSource::MinimalPass,
        }
    }

    /// The insufficient-subjects sentinel ("X").
    pub fn insufficient_subjects() -> Self {
        Self {
            grade: INSUFFICIENT_SUBJECTS_GRADE.to_string(),
            points: 0,
            source: GradeSource::InsufficientSubjects,
        }
    }

    /// Returns true when the grade came from a fallback path.
    pub fn is_fallback(&self) -> bool {
        matches!(
            self.source,
            GradeSource::FallbackRule | GradeSource::MinimalPass
        )
    }
}
