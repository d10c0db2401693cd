//! Coarse discipline bucketing from `## DBsubject(...)` metadata lines.
//!
//! Subjects are normalized (first argument, unquoted, lowercased, whitespace
//! collapsed) and bucketed by ordered substring tables. Order matters: more
//! specific disciplines are checked before broader ones.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static DBSUBJECT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*##[ \t]*DBsubject\(([^)]*)\)").expect("valid DBsubject pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discipline {
    Chemistry,
    LifeSciences,
    Engineering,
    Physics,
    Stats,
    Math,
    Cs,
    Finance,
    GradeLevel,
    MetaNoise,
    MetaMissing,
    Other,
}

impl Discipline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Discipline::Chemistry => "chemistry",
            Discipline::LifeSciences => "life_sciences",
            Discipline::Engineering => "engineering",
            Discipline::Physics => "physics",
            Discipline::Stats => "stats",
            Discipline::Math => "math",
            Discipline::Cs => "cs",
            Discipline::Finance => "finance",
            Discipline::GradeLevel => "grade_level",
            Discipline::MetaNoise => "meta_noise",
            Discipline::MetaMissing => "meta_missing",
            Discipline::Other => "other",
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const CHEMISTRY: &[&str] = &[
    "chem",
    "organic",
    "inorganic",
    "biochem",
    "analytical",
    "physical chemistry",
    "pchem",
    "spectroscopy",
    "kinetics",
    "equilibrium",
];

const LIFE_SCIENCES: &[&str] = &[
    "biology",
    "biological",
    "anatomy",
    "physiology",
    "life science",
];

const ENGINEERING: &[&str] = &[
    "engineering",
    "material science",
    "materials science",
    "circuits",
    "control",
    "signal",
    "system",
    "statics",
    "dynamics",
    "mechanics of materials",
    "strength of materials",
    "fluid",
    "thermodynamics",
    "heat transfer",
    "numerical methods",
    "finite element",
    "fea",
];

const PHYSICS: &[&str] = &[
    "physics",
    "mechanics",
    "optics",
    "electricity",
    "quantum",
    "nuclear",
    "particle",
    "atomic",
    "waves",
    "gravitation",
];

const STATS: &[&str] = &["stat", "probab", "stochastic", "bayes", "regression", "inference"];

const MATH: &[&str] = &[
    "arithmetic",
    "integers",
    "numbers",
    "linear functions",
    "algebra",
    "calculus",
    "trigon",
    "geometry",
    "number theory",
    "differential equations",
    "analysis",
    "discrete",
    "combinatorics",
    "set theory",
    "logic",
];

const CS: &[&str] = &[
    "computer science",
    "programming",
    "algorithm",
    "data structure",
];

const FINANCE: &[&str] = &["financial", "finance", "econom", "accounting"];

const META_NOISE: &[&str] = &["webwork", "zzz-inserted text", "history", "necap"];

const GRADE_LEVEL: &[&str] = &["middle school", "elementary school"];

/// Placeholder subjects, matched exactly rather than as substrings.
const MISSING: &[&str] = &["tba", "subject", "course"];

const TYPO_FIXUPS: &[(&str, &str)] = &[
    ("thermodyanmics", "thermodynamics"),
    ("thermodyanamics", "thermodynamics"),
    ("mechanica", "mechanical"),
];

/// Disciplines checked by substring after the grade-level and meta buckets.
const SUBJECT_TABLES: &[(Discipline, &[&str])] = &[
    (Discipline::Chemistry, CHEMISTRY),
    (Discipline::LifeSciences, LIFE_SCIENCES),
    (Discipline::Engineering, ENGINEERING),
    (Discipline::Physics, PHYSICS),
    (Discipline::Stats, STATS),
    (Discipline::Math, MATH),
    (Discipline::Cs, CS),
    (Discipline::Finance, FINANCE),
];

/// Normalized subjects from every `## DBsubject(...)` line, in file order.
///
/// A single `#` prefix is not enough; the line must carry `##`.
pub fn extract_dbsubjects(text: &str) -> Vec<String> {
    DBSUBJECT_LINE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|arg| normalize_subject_arg(arg.as_str()))
        .collect()
}

pub fn bucket_subject(subject: &str) -> Discipline {
    let s = normalize_subject(subject);
    if s.is_empty() || MISSING.contains(&s.as_str()) {
        return Discipline::MetaMissing;
    }
    if contains_any(&s, GRADE_LEVEL) {
        return Discipline::GradeLevel;
    }
    if contains_any(&s, META_NOISE) {
        return Discipline::MetaNoise;
    }
    SUBJECT_TABLES
        .iter()
        .find(|(_, table)| contains_any(&s, table))
        .map(|(discipline, _)| *discipline)
        .unwrap_or(Discipline::Other)
}

/// Bucket of the first non-blank subject, or `Other` when there is none.
pub fn primary_discipline(subjects: &[String]) -> Discipline {
    subjects
        .iter()
        .find(|s| !s.trim().is_empty())
        .map(|s| bucket_subject(s))
        .unwrap_or(Discipline::Other)
}

/// First non-blank subject, normalized; empty when there is none.
pub fn primary_subject(subjects: &[String]) -> String {
    subjects
        .iter()
        .find(|s| !s.trim().is_empty())
        .map(|s| normalize_subject(s))
        .unwrap_or_default()
}

fn normalize_subject_arg(arg_text: &str) -> String {
    normalize_subject(first_argument(arg_text))
}

/// First argument of the call: a whole quoted string, or text up to a comma.
fn first_argument(arg_text: &str) -> &str {
    let s = arg_text.trim();
    match s.chars().next() {
        Some(quote @ ('\'' | '"')) => match s[1..].find(quote) {
            Some(end) => &s[1..1 + end],
            None => &s[1..],
        },
        _ => s.split(',').next().unwrap_or_default(),
    }
}

fn normalize_subject(value: &str) -> String {
    let mut s = value.trim().to_lowercase();
    for (bad, good) in TYPO_FIXUPS {
        if s.contains(bad) {
            s = s.replace(bad, good);
        }
    }
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}
