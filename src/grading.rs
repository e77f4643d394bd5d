use crate::models::{Course, GradeOption, GradingSystem};

pub const GRADING_SYSTEMS: [GradingSystem; 4] = [
    GradingSystem::Turkish,
    GradingSystem::Extended,
    GradingSystem::American,
    GradingSystem::Numeric,
];

pub const MIN_CREDIT: f64 = 0.5;
pub const MAX_CREDIT: f64 = 30.0;
pub const CREDIT_STEP: f64 = 0.5;

pub const DEFAULT_CREDIT: f64 = 6.0;
pub const DEFAULT_COURSE_COUNT: usize = 5;
pub const MAX_COURSE_COUNT: usize = 90;

const fn grade(symbol: &'static str, point: f64) -> GradeOption {
    GradeOption {
        symbol,
        label: symbol,
        point,
    }
}

pub static TURKISH_GRADES: [GradeOption; 9] = [
    grade("AA", 4.0),
    grade("BA", 3.5),
    grade("BB", 3.0),
    grade("CB", 2.5),
    grade("CC", 2.0),
    grade("DC", 1.5),
    grade("DD", 1.0),
    grade("FD", 0.5),
    grade("FF", 0.0),
];

pub static EXTENDED_GRADES: [GradeOption; 11] = [
    grade("AA", 4.0),
    grade("AB", 3.75),
    grade("BA", 3.5),
    grade("BB", 3.0),
    grade("BC", 2.75),
    grade("CB", 2.5),
    grade("CC", 2.0),
    grade("CD", 1.75),
    grade("DC", 1.5),
    grade("DD", 1.0),
    grade("FF", 0.0),
];

pub static AMERICAN_GRADES: [GradeOption; 12] = [
    grade("A", 4.0),
    grade("A-", 3.7),
    grade("B+", 3.3),
    grade("B", 3.0),
    grade("B-", 2.7),
    grade("C+", 2.3),
    grade("C", 2.0),
    grade("C-", 1.7),
    grade("D+", 1.3),
    grade("D", 1.0),
    grade("D-", 0.7),
    grade("F", 0.0),
];

pub static NUMERIC_GRADES: [GradeOption; 11] = [
    grade("A1", 4.0),
    grade("A2", 3.7),
    grade("A3", 3.3),
    grade("B1", 3.0),
    grade("B2", 2.7),
    grade("B3", 2.3),
    grade("C1", 2.0),
    grade("C2", 1.7),
    grade("C3", 1.3),
    grade("D", 1.0),
    grade("F", 0.0),
];

pub fn grades_for(system: GradingSystem) -> &'static [GradeOption] {
    match system {
        GradingSystem::Turkish => &TURKISH_GRADES,
        GradingSystem::Extended => &EXTENDED_GRADES,
        GradingSystem::American => &AMERICAN_GRADES,
        GradingSystem::Numeric => &NUMERIC_GRADES,
    }
}

pub fn lookup_point(symbol: &str, system: GradingSystem) -> Option<f64> {
    grades_for(system)
        .iter()
        .find(|option| option.symbol == symbol)
        .map(|option| option.point)
}

// Unknown symbols score zero.
pub fn point_for(symbol: &str, system: GradingSystem) -> f64 {
    lookup_point(symbol, system).unwrap_or(0.0)
}

pub fn max_point(system: GradingSystem) -> f64 {
    grades_for(system)
        .iter()
        .map(|option| option.point)
        .fold(f64::MIN, f64::max)
}

pub fn min_point(system: GradingSystem) -> f64 {
    grades_for(system)
        .iter()
        .map(|option| option.point)
        .fold(f64::MAX, f64::min)
}

pub fn default_grade(system: GradingSystem) -> &'static str {
    grades_for(system)[0].symbol
}

pub fn allowed_credits() -> impl Iterator<Item = f64> {
    let steps = ((MAX_CREDIT - MIN_CREDIT) / CREDIT_STEP) as usize;
    (0..=steps).map(|i| MIN_CREDIT + i as f64 * CREDIT_STEP)
}

pub fn is_allowed_credit(credit: f64) -> bool {
    (MIN_CREDIT..=MAX_CREDIT).contains(&credit) && (credit / CREDIT_STEP).fract() == 0.0
}

pub fn clamp_course_count(count: usize) -> usize {
    count.clamp(1, MAX_COURSE_COUNT)
}

impl Course {
    pub fn blank(index: usize, system: GradingSystem) -> Self {
        Course {
            id: format!("course-{index}"),
            name: String::new(),
            credit: DEFAULT_CREDIT,
            grade: default_grade(system).to_string(),
        }
    }
}

pub fn resize_courses(courses: &mut Vec<Course>, count: usize, system: GradingSystem) {
    let count = clamp_course_count(count);
    if count > courses.len() {
        let start = courses.len();
        courses.extend((start..count).map(|index| Course::blank(index, system)));
    } else {
        courses.truncate(count);
    }
}

pub fn letter_grade(gpa: f64) -> &'static str {
    match gpa {
        g if g >= 3.75 => "AA",
        g if g >= 3.25 => "BA",
        g if g >= 2.75 => "BB",
        g if g >= 2.25 => "CB",
        g if g >= 1.75 => "CC",
        g if g >= 1.25 => "DC",
        g if g >= 0.75 => "DD",
        g if g >= 0.25 => "FD",
        _ => "FF",
    }
}

pub fn required_grade_band(required: f64) -> &'static str {
    match required {
        r if r >= 3.75 => "AA (excellent)",
        r if r >= 3.25 => "BA (very good)",
        r if r >= 2.75 => "BB (good)",
        r if r >= 2.25 => "CB (average)",
        r if r >= 1.75 => "CC (pass)",
        r if r >= 1.25 => "DC (conditional pass)",
        r if r >= 0.75 => "DD (weak)",
        _ => "very low",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    Excellent,
    Good,
    Pass,
    Fail,
}

impl Standing {
    pub fn from_gpa(gpa: f64) -> Self {
        match gpa {
            g if g >= 3.5 => Standing::Excellent,
            g if g >= 2.5 => Standing::Good,
            g if g >= 1.0 => Standing::Pass,
            _ => Standing::Fail,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Standing::Excellent => "Excellent",
            Standing::Good => "Good",
            Standing::Pass => "Pass",
            Standing::Fail => "Fail",
        }
    }
}
