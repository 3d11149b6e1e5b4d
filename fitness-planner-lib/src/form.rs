// src/form.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

pub const MIN_AGE: u8 = 1;
pub const MAX_AGE: u8 = 120;
pub const DEFAULT_AGE: u8 = 30;

// The workflow expects the Japanese literals, so those are the canonical
// serialized form. English aliases are accepted when parsing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter, EnumString,
    Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Gender {
    #[serde(rename = "男性")]
    #[strum(to_string = "男性", serialize = "male")]
    Male,
    #[serde(rename = "女性")]
    #[strum(to_string = "女性", serialize = "female")]
    Female,
    #[default]
    #[serde(rename = "回答しない")]
    #[strum(to_string = "回答しない", serialize = "no-answer")]
    NoAnswer,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter, EnumString,
    Display,
)]
#[strum(ascii_case_insensitive)]
pub enum FitnessLevel {
    #[default]
    #[serde(rename = "初心者")]
    #[strum(to_string = "初心者", serialize = "beginner")]
    Beginner,
    #[serde(rename = "中級者")]
    #[strum(to_string = "中級者", serialize = "intermediate")]
    Intermediate,
    #[serde(rename = "上級者")]
    #[strum(to_string = "上級者", serialize = "advanced")]
    Advanced,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter, EnumString,
    Display,
)]
#[strum(ascii_case_insensitive)]
pub enum ExerciseFrequency {
    #[serde(rename = "週1回")]
    #[strum(to_string = "週1回", serialize = "once-a-week")]
    OnceAWeek,
    #[default]
    #[serde(rename = "週2-3回")]
    #[strum(to_string = "週2-3回", serialize = "two-to-three")]
    TwoToThree,
    #[serde(rename = "週4回以上")]
    #[strum(to_string = "週4回以上", serialize = "four-plus")]
    FourPlus,
}

/// Steps to the neighbouring variant of a closed option set, wrapping at both ends.
pub fn cycle_option<T>(current: T, forward: bool) -> T
where
    T: IntoEnumIterator + PartialEq + Copy,
{
    let options: Vec<T> = T::iter().collect();
    let len = options.len();
    let index = options.iter().position(|o| *o == current).unwrap_or(0);
    let next = if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    };
    options[next]
}

/// Every field of the planner form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum FormField {
    Age,
    Gender,
    FitnessLevel,
    ExerciseFrequency,
}

impl FormField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Age => "年齢",
            Self::Gender => "性別",
            Self::FitnessLevel => "フィットネスレベル",
            Self::ExerciseFrequency => "運動頻度",
        }
    }

    /// Helper text shown under the field, or the select placeholder.
    pub const fn hint(self) -> &'static str {
        match self {
            Self::Age => "あなたの年齢を入力してください。",
            Self::Gender => "性別を選択してください",
            Self::FitnessLevel => "フィットネスレベルを選択してください",
            Self::ExerciseFrequency => "運動頻度を選択してください",
        }
    }

    /// Name of the field in the workflow `inputs` object.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Gender => "gender",
            Self::FitnessLevel => "fitness_level",
            Self::ExerciseFrequency => "exercise_frequency",
        }
    }
}

/// Validated form values, serialized as the workflow `inputs` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValues {
    pub age: u8,
    pub gender: Gender,
    pub fitness_level: FitnessLevel,
    pub exercise_frequency: ExerciseFrequency,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            age: DEFAULT_AGE,
            gender: Gender::default(),
            fitness_level: FitnessLevel::default(),
            exercise_frequency: ExerciseFrequency::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

/// Per-field validation failures, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn first_field(&self) -> Option<FormField> {
        self.errors.first().map(|e| e.field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field.key(), e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw, unvalidated field contents as typed or passed on a command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub age: String,
    pub gender: String,
    pub fitness_level: String,
    pub exercise_frequency: String,
}

impl Default for FormInput {
    fn default() -> Self {
        Self::from(&FormValues::default())
    }
}

impl From<&FormValues> for FormInput {
    fn from(values: &FormValues) -> Self {
        Self {
            age: values.age.to_string(),
            gender: values.gender.to_string(),
            fitness_level: values.fitness_level.to_string(),
            exercise_frequency: values.exercise_frequency.to_string(),
        }
    }
}

impl FormInput {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Age => &self.age,
            FormField::Gender => &self.gender,
            FormField::FitnessLevel => &self.fitness_level,
            FormField::ExerciseFrequency => &self.exercise_frequency,
        }
    }

    /// Checks every field and collects all failures rather than stopping at the first.
    ///
    /// # Errors
    /// Returns `ValidationErrors` naming each field that is out of range or
    /// outside its option set.
    pub fn validate(&self) -> Result<FormValues, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let age = parse_age(&self.age).map_err(|msg| errors.push(FormField::Age, msg));
        let gender = parse_option::<Gender>(&self.gender)
            .ok_or_else(|| errors.push(FormField::Gender, FormField::Gender.hint()));
        let fitness_level = parse_option::<FitnessLevel>(&self.fitness_level)
            .ok_or_else(|| errors.push(FormField::FitnessLevel, FormField::FitnessLevel.hint()));
        let exercise_frequency = parse_option::<ExerciseFrequency>(&self.exercise_frequency)
            .ok_or_else(|| {
                errors.push(
                    FormField::ExerciseFrequency,
                    FormField::ExerciseFrequency.hint(),
                )
            });

        match (age, gender, fitness_level, exercise_frequency) {
            (Ok(age), Ok(gender), Ok(fitness_level), Ok(exercise_frequency)) => Ok(FormValues {
                age,
                gender,
                fitness_level,
                exercise_frequency,
            }),
            _ => Err(errors),
        }
    }
}

fn parse_age(input: &str) -> Result<u8, String> {
    let trimmed = input.trim();
    let age: i64 = trimmed
        .parse()
        .map_err(|_| "年齢は数値で入力してください。".to_string())?;
    if age < i64::from(MIN_AGE) || age > i64::from(MAX_AGE) {
        return Err(format!(
            "年齢は{MIN_AGE}から{MAX_AGE}の間で入力してください。"
        ));
    }
    u8::try_from(age).map_err(|_| "年齢は数値で入力してください。".to_string())
}

fn parse_option<T: FromStr>(input: &str) -> Option<T> {
    T::from_str(input.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_page_defaults() {
        let values = FormValues::default();
        assert_eq!(values.age, 30);
        assert_eq!(values.gender.to_string(), "回答しない");
        assert_eq!(values.fitness_level.to_string(), "初心者");
        assert_eq!(values.exercise_frequency.to_string(), "週2-3回");
        assert_eq!(FormInput::default().validate(), Ok(values));
    }

    #[test]
    fn parses_literals_and_english_aliases() {
        assert_eq!("女性".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!("Male".parse::<Gender>(), Ok(Gender::Male));
        assert_eq!("ADVANCED".parse::<FitnessLevel>(), Ok(FitnessLevel::Advanced));
        assert_eq!(
            "four-plus".parse::<ExerciseFrequency>(),
            Ok(ExerciseFrequency::FourPlus)
        );
        assert!("毎日".parse::<ExerciseFrequency>().is_err());
    }

    #[test]
    fn age_bounds_are_inclusive() {
        for ok in ["1", "120", " 45 "] {
            let input = FormInput {
                age: ok.to_string(),
                ..Default::default()
            };
            assert!(input.validate().is_ok(), "age {ok:?} should pass");
        }
        for bad in ["0", "121", "-3", "", "abc", "12.5", "99999999999999999999"] {
            let input = FormInput {
                age: bad.to_string(),
                ..Default::default()
            };
            let errors = input.validate().unwrap_err();
            assert_eq!(errors.len(), 1, "age {bad:?}");
            assert!(errors.get(FormField::Age).is_some());
        }
    }

    #[test]
    fn collects_every_invalid_field() {
        let input = FormInput {
            age: "200".into(),
            gender: "robot".into(),
            fitness_level: "初心者".into(),
            exercise_frequency: "daily".into(),
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.first_field(), Some(FormField::Age));
        assert_eq!(errors.get(FormField::Gender), Some("性別を選択してください"));
        assert!(errors.get(FormField::FitnessLevel).is_none());
        assert!(errors.to_string().contains("exercise_frequency"));
    }

    #[test]
    fn cycle_option_wraps_both_ways() {
        assert_eq!(cycle_option(Gender::NoAnswer, true), Gender::Male);
        assert_eq!(cycle_option(Gender::Male, false), Gender::NoAnswer);
        assert_eq!(
            cycle_option(FitnessLevel::Beginner, true),
            FitnessLevel::Intermediate
        );
    }

    #[test]
    fn serializes_inputs_with_wire_literals() {
        let json = serde_json::to_value(FormValues::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "age": 30,
                "gender": "回答しない",
                "fitness_level": "初心者",
                "exercise_frequency": "週2-3回",
            })
        );
    }
}
