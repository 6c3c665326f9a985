//! Intake form: risk-factor fields, their validation schema, and the
//! numeric payload submitted to the predictor.
//!
//! Feature set follows the Framingham heart study questionnaire.

use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::validation::{FieldErrors, FormValues, Rule, Schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const OPTIONS: [&'static str; 3] = ["male", "female", "other"];

    /// `(value, label)` pairs for the choice widget.
    pub const CHOICES: [(&'static str, &'static str); 3] = [
        (Self::OPTIONS[0], Self::Male.label()),
        (Self::OPTIONS[1], Self::Female.label()),
        (Self::OPTIONS[2], Self::Other.label()),
    ];

    /// Numeric encoding expected by the predictor.
    #[must_use]
    pub fn code(&self) -> u8 {
        match self {
            Self::Male => 1,
            Self::Female => 0,
            Self::Other => 2,
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown gender: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Education {
    None,
    Primary,
    Secondary,
    Higher,
}

impl Education {
    /// Fixed option list; the predictor receives the index into it.
    pub const ALL: [Education; 4] = [
        Education::None,
        Education::Primary,
        Education::Secondary,
        Education::Higher,
    ];

    pub const OPTIONS: [&'static str; 4] = ["none", "primary", "secondary", "higher"];

    pub const CHOICES: [(&'static str, &'static str); 4] = [
        (Self::OPTIONS[0], Self::None.label()),
        (Self::OPTIONS[1], Self::Primary.label()),
        (Self::OPTIONS[2], Self::Secondary.label()),
        (Self::OPTIONS[3], Self::Higher.label()),
    ];

    #[must_use]
    pub fn code(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Primary => 1,
            Self::Secondary => 2,
            Self::Higher => 3,
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::None => "No School",
            Self::Primary => "Primary School",
            Self::Secondary => "Secondary School",
            Self::Higher => "Higher Education",
        }
    }
}

impl FromStr for Education {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::OPTIONS
            .iter()
            .position(|o| *o == s)
            .map(|i| Self::ALL[i])
            .ok_or_else(|| format!("Unknown education level: {s}"))
    }
}

/// Yes/no option values as stored in [`FormValues`].
pub const YES_NO: [&str; 2] = ["yes", "no"];

fn yes(s: &str) -> bool {
    s == "yes"
}

/// Field names, in form order. These are also the JSON keys of the payload.
pub mod fields {
    pub const GENDER: &str = "gender";
    pub const AGE: &str = "age";
    pub const EDUCATION: &str = "education";
    pub const CURRENT_SMOKER: &str = "currentSmoker";
    pub const BP_MEDS: &str = "bpMeds";
    pub const PREVALENT_STROKE: &str = "prevalentStroke";
    pub const PREVALENT_HYP: &str = "prevalentHyp";
    pub const DIABETES: &str = "diabetes";
    pub const TOT_CHOL: &str = "totChol";
    pub const SYS_BP: &str = "sysBP";
    pub const DIA_BP: &str = "diaBP";
    pub const BMI: &str = "bmi";
    pub const HEART_RATE: &str = "heartRate";
    pub const GLUCOSE: &str = "glucose";
}

fn measurement(
    required: &'static str,
    positive: &'static str,
    min: f64,
    low: &'static str,
    max: f64,
    high: &'static str,
    not_number: &'static str,
) -> Vec<Rule> {
    vec![
        Rule::Required(required),
        Rule::Number(not_number),
        Rule::Positive(positive),
        Rule::Min(min, low),
        Rule::Max(max, high),
    ]
}

/// Validation schema for the intake form.
pub fn intake_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        use fields::*;
        Schema::new()
            .field(
                GENDER,
                vec![
                    Rule::Required("Gender is required"),
                    Rule::OneOf(&Gender::OPTIONS, "Gender is required"),
                ],
            )
            .field(
                AGE,
                vec![
                    Rule::Required("Age is required"),
                    Rule::Number("Age must be a number"),
                    Rule::Positive("Age must be positive"),
                    Rule::Integer("Age must be a whole number"),
                    Rule::Min(1.0, "Age must be at least 1"),
                    Rule::Max(120.0, "Age must be less than 120"),
                ],
            )
            .field(
                EDUCATION,
                vec![
                    Rule::Required("Education level is required"),
                    Rule::OneOf(&Education::OPTIONS, "Education level is required"),
                ],
            )
            .field(
                CURRENT_SMOKER,
                yes_no("Please specify if you are a current smoker"),
            )
            .field(
                BP_MEDS,
                yes_no("Please specify if you are on blood pressure medication"),
            )
            .field(
                PREVALENT_STROKE,
                yes_no("Please specify if you have had a stroke"),
            )
            .field(
                PREVALENT_HYP,
                yes_no("Please specify if you have hypertension"),
            )
            .field(DIABETES, yes_no("Please specify if you have diabetes"))
            .field(
                TOT_CHOL,
                measurement(
                    "Total cholesterol is required",
                    "Total cholesterol must be positive",
                    100.0,
                    "Total cholesterol seems too low",
                    500.0,
                    "Total cholesterol seems too high",
                    "Total cholesterol must be a number",
                ),
            )
            .field(
                SYS_BP,
                measurement(
                    "Systolic blood pressure is required",
                    "Systolic BP must be positive",
                    70.0,
                    "Systolic BP seems too low",
                    250.0,
                    "Systolic BP seems too high",
                    "Systolic BP must be a number",
                ),
            )
            .field(
                DIA_BP,
                measurement(
                    "Diastolic blood pressure is required",
                    "Diastolic BP must be positive",
                    40.0,
                    "Diastolic BP seems too low",
                    150.0,
                    "Diastolic BP seems too high",
                    "Diastolic BP must be a number",
                ),
            )
            .field(
                BMI,
                measurement(
                    "BMI is required",
                    "BMI must be positive",
                    10.0,
                    "BMI seems too low",
                    60.0,
                    "BMI seems too high",
                    "BMI must be a number",
                ),
            )
            .field(
                HEART_RATE,
                measurement(
                    "Heart rate is required",
                    "Heart rate must be positive",
                    40.0,
                    "Heart rate seems too low",
                    200.0,
                    "Heart rate seems too high",
                    "Heart rate must be a number",
                ),
            )
            .field(
                GLUCOSE,
                measurement(
                    "Glucose level is required",
                    "Glucose level must be positive",
                    50.0,
                    "Glucose level seems too low",
                    400.0,
                    "Glucose level seems too high",
                    "Glucose level must be a number",
                ),
            )
    })
}

fn choice<T>(name: &'static str, parsed: Result<T, String>) -> Result<T, FieldErrors> {
    parsed.map_err(|msg| {
        let mut e = FieldErrors::new();
        e.insert(name, msg);
        e
    })
}

fn yes_no(message: &'static str) -> Vec<Rule> {
    vec![Rule::Required(message), Rule::OneOf(&YES_NO, message)]
}

/// Validated, typed intake record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeForm {
    pub gender: Gender,
    pub age: u8,
    pub education: Education,
    pub current_smoker: bool,
    pub bp_meds: bool,
    pub prevalent_stroke: bool,
    pub prevalent_hyp: bool,
    pub diabetes: bool,
    pub tot_chol: f64,
    pub sys_bp: f64,
    pub dia_bp: f64,
    pub bmi: f64,
    pub heart_rate: f64,
    pub glucose: f64,
}

impl IntakeForm {
    /// Validate raw values against [`intake_schema`] and build the typed record.
    ///
    /// # Errors
    /// Returns every failing field; nothing is built from partial input.
    pub fn parse(values: &FormValues) -> Result<Self, FieldErrors> {
        use fields::*;

        intake_schema().validate(values)?;

        // The schema has accepted every field, so each lookup below succeeds.
        let num = |name: &'static str| -> Result<f64, FieldErrors> {
            values.number(name).ok_or_else(|| {
                let mut e = FieldErrors::new();
                e.insert(name, "Invalid number");
                e
            })
        };
        Ok(Self {
            gender: choice(GENDER, values.get(GENDER).parse())?,
            age: num(AGE)? as u8,
            education: choice(EDUCATION, values.get(EDUCATION).parse())?,
            current_smoker: yes(values.get(CURRENT_SMOKER)),
            bp_meds: yes(values.get(BP_MEDS)),
            prevalent_stroke: yes(values.get(PREVALENT_STROKE)),
            prevalent_hyp: yes(values.get(PREVALENT_HYP)),
            diabetes: yes(values.get(DIABETES)),
            tot_chol: num(TOT_CHOL)?,
            sys_bp: num(SYS_BP)?,
            dia_bp: num(DIA_BP)?,
            bmi: num(BMI)?,
            heart_rate: num(HEART_RATE)?,
            glucose: num(GLUCOSE)?,
        })
    }

    /// Numeric encoding for the predictor.
    #[must_use]
    pub fn to_payload(&self) -> IntakePayload {
        IntakePayload::from(self)
    }
}

/// Normalized, numerically encoded record posted to `/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakePayload {
    pub gender: u8,
    pub age: u8,
    pub education: u8,
    pub current_smoker: u8,
    pub bp_meds: u8,
    pub prevalent_stroke: u8,
    pub prevalent_hyp: u8,
    pub diabetes: u8,
    pub tot_chol: f64,
    #[serde(rename = "sysBP")]
    pub sys_bp: f64,
    #[serde(rename = "diaBP")]
    pub dia_bp: f64,
    pub bmi: f64,
    pub heart_rate: f64,
    pub glucose: f64,
}

impl From<&IntakeForm> for IntakePayload {
    fn from(form: &IntakeForm) -> Self {
        let flag = |b: bool| u8::from(b);
        Self {
            gender: form.gender.code(),
            age: form.age,
            education: form.education.code(),
            current_smoker: flag(form.current_smoker),
            bp_meds: flag(form.bp_meds),
            prevalent_stroke: flag(form.prevalent_stroke),
            prevalent_hyp: flag(form.prevalent_hyp),
            diabetes: flag(form.diabetes),
            tot_chol: form.tot_chol,
            sys_bp: form.sys_bp,
            dia_bp: form.dia_bp,
            bmi: form.bmi,
            heart_rate: form.heart_rate,
            glucose: form.glucose,
        }
    }
}

/// A typical moderate-risk profile, used by the form's sample shortcut and tests.
#[must_use]
pub fn sample_values() -> FormValues {
    use fields::*;
    FormValues::new()
        .with(GENDER, "male")
        .with(AGE, "52")
        .with(EDUCATION, "secondary")
        .with(CURRENT_SMOKER, "yes")
        .with(BP_MEDS, "no")
        .with(PREVALENT_STROKE, "no")
        .with(PREVALENT_HYP, "yes")
        .with(DIABETES, "no")
        .with(TOT_CHOL, "240")
        .with(SYS_BP, "142")
        .with(DIA_BP, "90")
        .with(BMI, "27.4")
        .with(HEART_RATE, "76")
        .with(GLUCOSE, "98")
}

#[cfg(test)]
mod tests {
    use super::fields::*;
    use super::*;

    #[test]
    fn test_sample_parses() {
        let form = IntakeForm::parse(&sample_values()).expect("Sample should validate");
        assert_eq!(form.gender, Gender::Male);
        assert_eq!(form.age, 52);
        assert!(form.current_smoker);
        assert!(!form.bp_meds);
        assert!((form.bmi - 27.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_choice_values_parse_back() {
        for (value, label) in Gender::CHOICES {
            let gender: Gender = value.parse().expect("gender option");
            assert_eq!(gender.label(), label);
        }
        for (value, label) in Education::CHOICES {
            let education: Education = value.parse().expect("education option");
            assert_eq!(education.label(), label);
        }
        assert_eq!(Education::CHOICES[0], ("none", "No School"));
    }

    #[test]
    fn test_age_bounds() {
        let schema = intake_schema();
        for (age, ok) in [("0", false), ("1", true), ("120", true), ("121", false)] {
            let values = sample_values().with(AGE, age);
            assert_eq!(schema.validate_field(AGE, &values).is_none(), ok, "age={age}");
        }
        let values = sample_values().with(AGE, "45.5");
        assert_eq!(
            schema.validate_field(AGE, &values),
            Some("Age must be a whole number")
        );
    }

    #[test]
    fn test_cholesterol_bounds() {
        let schema = intake_schema();
        let values = sample_values().with(TOT_CHOL, "99");
        assert_eq!(
            schema.validate_field(TOT_CHOL, &values),
            Some("Total cholesterol seems too low")
        );
        let values = sample_values().with(TOT_CHOL, "100");
        assert_eq!(schema.validate_field(TOT_CHOL, &values), None);
    }

    #[test]
    fn test_non_numeric_is_type_error() {
        let values = sample_values().with(SYS_BP, "high");
        assert_eq!(
            intake_schema().validate_field(SYS_BP, &values),
            Some("Systolic BP must be a number")
        );
    }

    #[test]
    fn test_partial_submission_rejected() {
        let values = sample_values().with(DIABETES, "");
        let errors = IntakeForm::parse(&values).expect_err("Should reject");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(DIABETES),
            Some("Please specify if you have diabetes")
        );

        let errors = IntakeForm::parse(&FormValues::new()).expect_err("Should reject");
        assert_eq!(errors.len(), 14);
    }

    #[test]
    fn test_gender_encoding() {
        assert_eq!(Gender::Male.code(), 1);
        assert_eq!(Gender::Female.code(), 0);
        assert_eq!(Gender::Other.code(), 2);

        for (raw, code) in [("male", 1), ("female", 0), ("other", 2)] {
            let form = IntakeForm::parse(&sample_values().with(GENDER, raw)).expect("valid");
            assert_eq!(form.to_payload().gender, code);
        }
    }

    #[test]
    fn test_education_encoding() {
        for (i, raw) in Education::OPTIONS.iter().enumerate() {
            let form = IntakeForm::parse(&sample_values().with(EDUCATION, *raw)).expect("valid");
            assert_eq!(usize::from(form.to_payload().education), i);
        }
    }

    #[test]
    fn test_payload_is_stable_when_reencoded() {
        let payload = IntakeForm::parse(&sample_values()).expect("valid").to_payload();
        assert_eq!(payload.current_smoker, 1);
        assert_eq!(payload.bp_meds, 0);
        assert_eq!(payload.prevalent_hyp, 1);

        let again = IntakeForm::parse(&sample_values()).expect("valid").to_payload();
        assert_eq!(payload, again);
    }

    #[test]
    fn test_payload_wire_names() {
        let payload = IntakeForm::parse(&sample_values()).expect("valid").to_payload();
        let json = serde_json::to_value(&payload).expect("Should serialize");
        for key in intake_schema().field_names() {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["sysBP"], 142.0);
        assert_eq!(json["currentSmoker"], 1);
    }
}
