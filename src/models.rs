use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum GradingSystem {
    Turkish,
    Extended,
    American,
    Numeric,
}

impl GradingSystem {
    pub fn as_str(self) -> &'static str {
        match self {
            GradingSystem::Turkish => "turkish",
            GradingSystem::Extended => "extended",
            GradingSystem::American => "american",
            GradingSystem::Numeric => "numeric",
        }
    }

    // Unrecognised ids fall back to Turkish.
    pub fn from_id(id: &str) -> Self {
        match id {
            "turkish" => GradingSystem::Turkish,
            "extended" => GradingSystem::Extended,
            "american" => GradingSystem::American,
            "numeric" => GradingSystem::Numeric,
            _ => GradingSystem::Turkish,
        }
    }
}

impl From<String> for GradingSystem {
    fn from(value: String) -> Self {
        GradingSystem::from_id(&value)
    }
}

impl std::fmt::Display for GradingSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeOption {
    pub symbol: &'static str,
    pub label: &'static str,
    pub point: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub credit: f64,
    pub grade: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CourseUpdate {
    Name(String),
    Credit(f64),
    Grade(String),
}

impl Course {
    pub fn apply(&mut self, update: CourseUpdate) {
        match update {
            CourseUpdate::Name(name) => self.name = name,
            CourseUpdate::Credit(credit) => self.credit = credit,
            CourseUpdate::Grade(grade) => self.grade = grade,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub gpa: f64,
    pub total_credits: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courses: Option<Vec<Course>>,
    #[serde(default)]
    pub is_cumulative: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_gpa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_credits: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub result: CalculationResult,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(default = "default_system")]
    pub grading_system: GradingSystem,
}

fn default_system() -> GradingSystem {
    GradingSystem::Turkish
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SemesterAverage {
    pub gpa: f64,
    pub total_credits: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetInput {
    pub current_gpa: f64,
    pub current_credits: f64,
    pub target_gpa: f64,
    pub new_credits: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetOutcome {
    pub required_gpa: f64,
    pub is_achievable: bool,
}
