//! TOML job configuration: inputs, weight field, target, budget, output.

use std::fmt;

use serde::Deserialize;
use sumfit_solver::SearchBudget;

#[derive(Debug)]
pub enum JobError {
    /// TOML parse / deserialization error.
    Parse(String),
    /// Config validation error (no inputs, bad target, zero budget, ...).
    Validation(String),
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Validation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for JobError {}

#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub target: f64,
    /// Dotted path to the numeric weight field on each record.
    #[serde(default = "default_field")]
    pub field: String,
    /// Dotted path to a key field; when set, records are grouped by key and
    /// the search runs over per-group totals (weight field `total`).
    #[serde(default)]
    pub group_by: Option<String>,
    pub inputs: Vec<InputConfig>,
    #[serde(default)]
    pub budget: SearchBudget,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_field() -> String {
    "value".into()
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    pub file: String,
    /// Inferred from the file extension when omitted.
    #[serde(default)]
    pub format: Option<InputFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    Json,
    Csv,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<String>,
}

impl JobConfig {
    pub fn from_toml(input: &str) -> Result<Self, JobError> {
        let config: JobConfig = toml::from_str(input).map_err(|e| JobError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), JobError> {
        if !self.target.is_finite() {
            return Err(JobError::Validation(format!(
                "target must be finite, got {}",
                self.target
            )));
        }

        if self.field.is_empty() {
            return Err(JobError::Validation("field must not be empty".into()));
        }

        if self.inputs.is_empty() {
            return Err(JobError::Validation("at least 1 input is required".into()));
        }

        if let Some(key) = &self.group_by {
            if key.is_empty() {
                return Err(JobError::Validation("group_by must not be empty".into()));
            }
        }

        if self.budget.max_nodes == 0 {
            return Err(JobError::Validation(
                "budget.max_nodes must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
name = "Invoice match"
target = 100000
field = "InvoiceValue"

[[inputs]]
file = "invoices.json"

[[inputs]]
file = "credits.csv"
format = "csv"

[budget]
max_nodes = 20000

[output]
json = "result.json"
"#;

    #[test]
    fn parse_valid() {
        let config = JobConfig::from_toml(VALID).unwrap();
        assert_eq!(config.name, "Invoice match");
        assert_eq!(config.target, 100_000.0);
        assert_eq!(config.field, "InvoiceValue");
        assert_eq!(config.inputs.len(), 2);
        assert_eq!(config.inputs[0].format, None);
        assert_eq!(config.inputs[1].format, Some(InputFormat::Csv));
        assert_eq!(config.budget.max_nodes, 20_000);
        assert_eq!(config.output.json.as_deref(), Some("result.json"));
        assert!(config.group_by.is_none());
    }

    #[test]
    fn field_defaults_to_value() {
        let config = JobConfig::from_toml(
            r#"
name = "Defaults"
target = 10

[[inputs]]
file = "items.json"
"#,
        )
        .unwrap();
        assert_eq!(config.field, "value");
        assert_eq!(config.budget.max_nodes, 500_000);
        assert!(config.output.json.is_none());
    }

    #[test]
    fn parse_group_by() {
        let config = JobConfig::from_toml(
            r#"
name = "Grouped"
target = 10101
field = "InvoiceValue"
group_by = "customer.id"

[[inputs]]
file = "items.json"
"#,
        )
        .unwrap();
        assert_eq!(config.group_by.as_deref(), Some("customer.id"));
    }

    #[test]
    fn reject_no_inputs() {
        let err = JobConfig::from_toml(
            r#"
name = "Bad"
target = 10
inputs = []
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("at least 1 input"));
    }

    #[test]
    fn reject_non_finite_target() {
        let err = JobConfig::from_toml(
            r#"
name = "Bad"
target = inf

[[inputs]]
file = "items.json"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("target must be finite"));
    }

    #[test]
    fn reject_zero_budget() {
        let err = JobConfig::from_toml(
            r#"
name = "Bad"
target = 10

[[inputs]]
file = "items.json"

[budget]
max_nodes = 0
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("max_nodes"));
    }

    #[test]
    fn reject_unknown_format() {
        let err = JobConfig::from_toml(
            r#"
name = "Bad"
target = 10

[[inputs]]
file = "items.xlsx"
format = "xlsx"
"#,
        );
        assert!(err.is_err(), "unknown format should fail deserialization");
    }
}
