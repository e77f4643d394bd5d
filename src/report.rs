use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::gpa;
use crate::grading::{self, Standing};
use crate::models::{CalculationResult, GradingSystem, HistoryEntry, TargetInput, TargetOutcome};

pub fn render_result(result: &CalculationResult, system: GradingSystem) -> String {
    let mut output = String::new();
    let kind = if result.is_cumulative {
        "Cumulative"
    } else {
        "Semester"
    };

    let _ = writeln!(output, "{kind} GPA ({system} scale)");
    let _ = writeln!(
        output,
        "GPA {:.2} ({}, {})",
        result.gpa,
        grading::letter_grade(result.gpa),
        Standing::from_gpa(result.gpa).label()
    );
    let _ = writeln!(output, "100-point scale: {:.2}", gpa::to_100_scale(result.gpa));
    let _ = writeln!(output, "Total credits: {}", result.total_credits);

    if let (Some(prev_gpa), Some(prev_credits)) = (result.prev_gpa, result.prev_credits) {
        let _ = writeln!(
            output,
            "Previous standing: {prev_gpa:.2} over {prev_credits} credits"
        );
    }

    if let Some(courses) = result.courses.as_ref().filter(|c| !c.is_empty()) {
        let _ = writeln!(output);
        for (index, course) in courses.iter().enumerate() {
            let name = if course.name.is_empty() {
                course.id.as_str()
            } else {
                course.name.as_str()
            };
            let _ = writeln!(
                output,
                "{:>3}. {:<24} {:>5} credits  {:<3} ({:.2})",
                index,
                name,
                course.credit,
                course.grade,
                grading::point_for(&course.grade, system)
            );
        }
    }

    output
}

pub fn render_target(input: &TargetInput, outcome: &TargetOutcome) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "Current {:.2} over {} credits, target {:.2} after {} more credits",
        input.current_gpa, input.current_credits, input.target_gpa, input.new_credits
    );
    let _ = writeln!(output, "Required GPA: {:.2}", outcome.required_gpa);

    if outcome.is_achievable {
        let _ = writeln!(
            output,
            "Reachable: average {} on the new credits.",
            grading::required_grade_band(outcome.required_gpa)
        );
    } else if outcome.required_gpa > gpa::MAX_SCALE_POINT {
        let _ = writeln!(
            output,
            "Not reachable: the maximum GPA is {:.2}. Take more credits or lower the target.",
            gpa::MAX_SCALE_POINT
        );
    } else {
        let _ = writeln!(output, "Already secured: the target holds with any grades.");
    }

    output
}

fn format_timestamp(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp)
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

pub fn history_line(index: usize, entry: &HistoryEntry) -> String {
    let result = &entry.result;
    let kind = if result.is_cumulative {
        "cumulative"
    } else {
        "semester"
    };
    let mut line = format!(
        "#{index} {} {kind} {:.2} ({}) {} credits, {}",
        format_timestamp(entry.timestamp),
        result.gpa,
        grading::letter_grade(result.gpa),
        result.total_credits,
        entry.grading_system
    );
    if let Some(courses) = &result.courses {
        let _ = write!(line, ", {} courses", courses.len());
    }
    line
}

pub fn build_history_report(entries: &[HistoryEntry]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# GPA Calculation History");
    let _ = writeln!(output);

    if entries.is_empty() {
        let _ = writeln!(output, "No calculations recorded yet.");
        return output;
    }

    let mean = entries.iter().map(|e| e.result.gpa).sum::<f64>() / entries.len() as f64;
    let best = entries
        .iter()
        .map(|e| e.result.gpa)
        .fold(f64::MIN, f64::max);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(output, "- {} calculations", entries.len());
    let _ = writeln!(output, "- mean GPA {mean:.2}, best {best:.2}");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Calculations");

    for (index, entry) in entries.iter().enumerate() {
        let _ = writeln!(output, "- {}", history_line(index, entry));
    }

    output
}
