use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::error::CalcError;
use crate::grading;
use crate::models::{Course, GradingSystem};

// GRADE:CREDIT[:NAME]
pub fn parse_course(index: usize, entry: &str, system: GradingSystem) -> Result<Course, CalcError> {
    let mut parts = entry.splitn(3, ':');
    let (Some(grade), Some(credit)) = (parts.next(), parts.next()) else {
        return Err(CalcError::MalformedCourse(entry.to_string()));
    };
    let credit: f64 = credit
        .trim()
        .parse()
        .map_err(|_| CalcError::MalformedCourse(entry.to_string()))?;

    let course = Course {
        id: format!("course-{index}"),
        name: parts.next().unwrap_or_default().trim().to_string(),
        credit,
        grade: grade.trim().to_string(),
    };
    validate_course(&course, system)?;
    Ok(course)
}

pub fn parse_courses(entries: &[String], system: GradingSystem) -> Result<Vec<Course>, CalcError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_course(index, entry, system))
        .collect()
}

pub fn validate_course(course: &Course, system: GradingSystem) -> Result<(), CalcError> {
    if !grading::is_allowed_credit(course.credit) {
        return Err(CalcError::InvalidCredit(course.credit));
    }
    if grading::lookup_point(&course.grade, system).is_none() {
        return Err(CalcError::UnknownGrade {
            symbol: course.grade.clone(),
            system,
        });
    }
    Ok(())
}

pub fn read_sheet<R: std::io::Read>(
    reader: R,
    system: GradingSystem,
) -> anyhow::Result<Vec<Course>> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        #[serde(default)]
        name: Option<String>,
        credit: f64,
        grade: String,
    }

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut courses = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("bad course row {}", index + 1))?;
        let course = Course {
            id: format!("course-{index}"),
            name: row.name.unwrap_or_default(),
            credit: row.credit,
            grade: row.grade,
        };
        validate_course(&course, system).with_context(|| format!("course row {}", index + 1))?;
        courses.push(course);
    }

    debug!(count = courses.len(), "read course sheet");
    Ok(courses)
}

pub fn read_csv(path: &Path, system: GradingSystem) -> anyhow::Result<Vec<Course>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_sheet(file, system)
}
