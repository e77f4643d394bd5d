use tracing::debug;

use crate::error::CalcError;
use crate::grading;
use crate::models::{
    CalculationResult, Course, GradingSystem, SemesterAverage, TargetInput, TargetOutcome,
};

pub const MAX_SCALE_POINT: f64 = 4.0;

pub fn weighted_average<I>(pairs: I) -> SemesterAverage
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (total_points, total_credits) = pairs
        .into_iter()
        .fold((0.0_f64, 0.0_f64), |(points, credits), (point, credit)| {
            (points + point * credit, credits + credit)
        });

    SemesterAverage {
        gpa: if total_credits > 0.0 {
            total_points / total_credits
        } else {
            0.0
        },
        total_credits,
    }
}

pub fn semester_gpa(courses: &[Course], system: GradingSystem) -> SemesterAverage {
    let average = weighted_average(
        courses
            .iter()
            .map(|course| (grading::point_for(&course.grade, system), course.credit)),
    );
    debug!(
        system = %system,
        courses = courses.len(),
        gpa = average.gpa,
        total_credits = average.total_credits,
        "semester average"
    );
    average
}

pub fn cumulative_gpa(
    prev_gpa: f64,
    prev_credits: f64,
    new_gpa: f64,
    new_credits: f64,
) -> SemesterAverage {
    weighted_average([(prev_gpa, prev_credits), (new_gpa, new_credits)])
}

// Unchecked: zero new credits divides by zero. Callers validate first.
pub fn required_gpa(input: &TargetInput) -> TargetOutcome {
    let total_credits = input.current_credits + input.new_credits;
    let required_total_points = input.target_gpa * total_credits;
    let current_total_points = input.current_gpa * input.current_credits;
    let required_gpa = (required_total_points - current_total_points) / input.new_credits;

    TargetOutcome {
        required_gpa,
        is_achievable: (0.0..=MAX_SCALE_POINT).contains(&required_gpa),
    }
}

pub fn to_100_scale(gpa: f64) -> f64 {
    gpa * 25.0
}

impl TargetInput {
    pub fn validate(&self) -> Result<(), CalcError> {
        positive("current credits", self.current_credits)?;
        positive("new credits", self.new_credits)?;
        positive("target GPA", self.target_gpa)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), CalcError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(CalcError::NotPositive { field, value })
    }
}

pub fn validate_previous(prev_gpa: f64, prev_credits: f64) -> Result<(), CalcError> {
    if !(0.0..=MAX_SCALE_POINT).contains(&prev_gpa) {
        return Err(CalcError::PreviousGpaOutOfRange(prev_gpa));
    }
    positive("previous credits", prev_credits)
}

pub fn semester_result(courses: Vec<Course>, system: GradingSystem) -> CalculationResult {
    let average = semester_gpa(&courses, system);
    CalculationResult {
        gpa: average.gpa,
        total_credits: average.total_credits,
        courses: Some(courses),
        is_cumulative: false,
        prev_gpa: None,
        prev_credits: None,
    }
}

pub fn cumulative_result(
    prev_gpa: f64,
    prev_credits: f64,
    courses: Vec<Course>,
    system: GradingSystem,
) -> CalculationResult {
    let semester = semester_gpa(&courses, system);
    let average = cumulative_gpa(prev_gpa, prev_credits, semester.gpa, semester.total_credits);
    CalculationResult {
        gpa: average.gpa,
        total_credits: average.total_credits,
        courses: Some(courses),
        is_cumulative: true,
        prev_gpa: Some(prev_gpa),
        prev_credits: Some(prev_credits),
    }
}

pub fn recalculate(result: &CalculationResult, system: GradingSystem) -> CalculationResult {
    let Some(courses) = result.courses.clone() else {
        return result.clone();
    };

    match (result.is_cumulative, result.prev_gpa, result.prev_credits) {
        (true, Some(prev_gpa), Some(prev_credits)) => {
            cumulative_result(prev_gpa, prev_credits, courses, system)
        }
        _ => {
            let mut recalculated = semester_result(courses, system);
            recalculated.is_cumulative = result.is_cumulative;
            recalculated
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(grade: &str, credit: f64) -> Course {
        Course {
            id: format!("course-{grade}-{credit}"),
            name: String::new(),
            credit,
            grade: grade.to_string(),
        }
    }

    #[test]
    fn turkish_semester_weights_by_credit() {
        let courses = vec![course("AA", 3.0), course("BB", 4.0)];
        let average = semester_gpa(&courses, GradingSystem::Turkish);
        assert_eq!(average.total_credits, 7.0);
        assert!((average.gpa - 24.0 / 7.0).abs() < 1e-9);
        assert!((average.gpa - 3.4286).abs() < 0.0001);
    }

    #[test]
    fn american_single_course() {
        let average = semester_gpa(&[course("B-", 4.0)], GradingSystem::American);
        assert!((average.gpa - 2.7).abs() < 1e-9);
        assert_eq!(average.total_credits, 4.0);
    }

    #[test]
    fn empty_semester_is_zero() {
        for system in grading::GRADING_SYSTEMS {
            let average = semester_gpa(&[], system);
            assert_eq!(average.gpa, 0.0);
            assert_eq!(average.total_credits, 0.0);
        }
    }

    #[test]
    fn semester_average_stays_within_scale() {
        for system in grading::GRADING_SYSTEMS {
            let courses: Vec<Course> = grading::grades_for(system)
                .iter()
                .zip(grading::allowed_credits().step_by(7))
                .map(|(option, credit)| course(option.symbol, credit))
                .collect();
            let average = semester_gpa(&courses, system);
            assert!(average.gpa >= grading::min_point(system), "{system}");
            assert!(average.gpa <= grading::max_point(system), "{system}");
        }
    }

    #[test]
    fn course_order_does_not_matter() {
        let forward = vec![course("A", 3.0), course("C+", 1.5), course("D-", 4.0)];
        let mut reversed = forward.clone();
        reversed.reverse();
        let a = semester_gpa(&forward, GradingSystem::American);
        let b = semester_gpa(&reversed, GradingSystem::American);
        assert!((a.gpa - b.gpa).abs() < 1e-9);
        assert_eq!(a.total_credits, b.total_credits);
    }

    #[test]
    fn unknown_grades_count_as_zero_points() {
        let courses = vec![course("AA", 2.0), course("A+", 2.0)];
        let average = semester_gpa(&courses, GradingSystem::Turkish);
        assert!((average.gpa - 2.0).abs() < 1e-9);
        assert_eq!(average.total_credits, 4.0);
    }

    #[test]
    fn cumulative_blends_prior_standing() {
        let average = cumulative_gpa(3.0, 60.0, 3.5, 15.0);
        assert_eq!(average.total_credits, 75.0);
        assert!((average.gpa - 3.1).abs() < 1e-9);
    }

    #[test]
    fn cumulative_with_no_credits_is_zero() {
        let average = cumulative_gpa(3.0, 0.0, 2.0, 0.0);
        assert_eq!(average.gpa, 0.0);
        assert_eq!(average.total_credits, 0.0);
    }

    #[test]
    fn cumulative_matches_folding_prior_standing_as_a_course() {
        let system = GradingSystem::Extended;
        let courses = vec![course("AB", 5.0), course("CD", 2.5), course("FF", 6.0)];
        let semester = semester_gpa(&courses, system);
        let folded = cumulative_gpa(2.85, 48.0, semester.gpa, semester.total_credits);

        let pseudo = std::iter::once((2.85, 48.0)).chain(
            courses
                .iter()
                .map(|c| (grading::point_for(&c.grade, system), c.credit)),
        );
        let direct = weighted_average(pseudo);

        assert!((folded.gpa - direct.gpa).abs() < 1e-9);
        assert!((folded.total_credits - direct.total_credits).abs() < 1e-9);
    }

    #[test]
    fn reachable_target() {
        let input = TargetInput {
            current_gpa: 2.5,
            current_credits: 60.0,
            target_gpa: 3.0,
            new_credits: 30.0,
        };
        let outcome = required_gpa(&input);
        assert!((outcome.required_gpa - 4.0).abs() < 1e-9);
        assert!(outcome.is_achievable);
    }

    #[test]
    fn unreachable_target() {
        let input = TargetInput {
            current_gpa: 2.0,
            current_credits: 90.0,
            target_gpa: 3.8,
            new_credits: 10.0,
        };
        let outcome = required_gpa(&input);
        assert!((outcome.required_gpa - 20.0).abs() < 1e-9);
        assert!(!outcome.is_achievable);
    }

    #[test]
    fn target_already_exceeded_needs_negative_average() {
        let input = TargetInput {
            current_gpa: 3.9,
            current_credits: 120.0,
            target_gpa: 2.0,
            new_credits: 10.0,
        };
        let outcome = required_gpa(&input);
        assert!(outcome.required_gpa < 0.0);
        assert!(!outcome.is_achievable);
    }

    #[test]
    fn required_average_closes_the_balance() {
        let input = TargetInput {
            current_gpa: 3.17,
            current_credits: 42.5,
            target_gpa: 3.33,
            new_credits: 17.5,
        };
        let outcome = required_gpa(&input);
        let lhs = input.current_gpa * input.current_credits
            + outcome.required_gpa * input.new_credits;
        let rhs = input.target_gpa * (input.current_credits + input.new_credits);
        assert!((lhs - rhs).abs() < 1e-9);
        assert_eq!(
            outcome.is_achievable,
            (0.0..=4.0).contains(&outcome.required_gpa)
        );
    }

    #[test]
    fn target_input_rejects_non_positive_fields() {
        let mut input = TargetInput {
            current_gpa: 2.0,
            current_credits: 30.0,
            target_gpa: 3.0,
            new_credits: 0.0,
        };
        assert_eq!(
            input.validate(),
            Err(CalcError::NotPositive {
                field: "new credits",
                value: 0.0
            })
        );
        input.new_credits = 15.0;
        assert_eq!(input.validate(), Ok(()));
        input.target_gpa = 0.0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn previous_standing_validation() {
        assert!(validate_previous(4.0, 30.0).is_ok());
        assert_eq!(
            validate_previous(4.2, 30.0),
            Err(CalcError::PreviousGpaOutOfRange(4.2))
        );
        assert!(validate_previous(3.0, 0.0).is_err());
    }

    #[test]
    fn hundred_point_scale() {
        assert_eq!(to_100_scale(0.0), 0.0);
        assert_eq!(to_100_scale(4.0), 100.0);
        assert_eq!(to_100_scale(3.1), 3.1 * 25.0);
        assert_eq!(to_100_scale(5.0), 125.0);
    }

    #[test]
    fn recalculating_an_edited_cumulative_result() {
        let mut result =
            cumulative_result(3.0, 60.0, vec![course("BA", 15.0)], GradingSystem::Turkish);
        assert!((result.gpa - 3.1).abs() < 1e-9);

        if let Some(courses) = result.courses.as_mut() {
            courses[0].grade = "AA".to_string();
        }
        let updated = recalculate(&result, GradingSystem::Turkish);
        assert!((updated.gpa - (180.0 + 60.0) / 75.0).abs() < 1e-9);
        assert!(updated.is_cumulative);
        assert_eq!(updated.prev_credits, Some(60.0));
    }

    #[test]
    fn recalculating_a_semester_result() {
        let mut result = semester_result(vec![course("C", 3.0)], GradingSystem::American);
        if let Some(courses) = result.courses.as_mut() {
            courses[0].credit = 6.0;
            courses.push(course("A", 2.0));
        }
        let updated = recalculate(&result, GradingSystem::American);
        assert_eq!(updated.total_credits, 8.0);
        assert!((updated.gpa - 20.0 / 8.0).abs() < 1e-9);
        assert!(!updated.is_cumulative);
    }

    #[test]
    fn results_without_courses_are_left_alone() {
        let result = CalculationResult {
            gpa: 2.2,
            total_credits: 30.0,
            courses: None,
            is_cumulative: false,
            prev_gpa: None,
            prev_credits: None,
        };
        assert_eq!(recalculate(&result, GradingSystem::Numeric), result);
    }
}
