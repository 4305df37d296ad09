use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single job application as posted by the careers form.
///
/// Required fields are checked against the raw JSON before this type is
/// built, so they deserialize leniently to an empty string when absent.
/// Optional text fields are `None` when missing, `null` or empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub office: String,
    #[serde(default, deserialize_with = "optional_string")]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub position: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "optional_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub bar_admissions: Option<String>,

    #[serde(default, deserialize_with = "optional_string")]
    pub law_school: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub grad_year: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub undergrad: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub undergrad_degree: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub undergrad_year: Option<String>,

    #[serde(default, deserialize_with = "optional_string")]
    pub years_practice: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub areas_focus: Vec<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub federal_court_exp: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trial_cases: Vec<TrialCase>,
    #[serde(default, deserialize_with = "optional_string")]
    pub work_history: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub skills: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub why_trembach: String,
    #[serde(default, deserialize_with = "optional_string")]
    pub challenging_scenario: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub salary: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub start_date: Option<String>,
}

impl ApplicationPayload {
    pub fn category(&self) -> Category {
        Category::from_code(&self.category)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One row of an attorney's trial history.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialCase {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub court: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub case_number: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub outcome: String,
}

impl TrialCase {
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    /// Only cases identifying both the matter and the court make it into the table.
    pub fn is_renderable(&self) -> bool {
        self.has_name() && !self.court.is_empty()
    }
}

/// The position family an applicant is applying under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Attorney,
    Compliance,
    Paralegal,
    Students,
    Other(String),
}

impl Category {
    pub fn from_code(code: &str) -> Self {
        match code {
            "attorney" => Self::Attorney,
            "compliance" => Self::Compliance,
            "paralegal" => Self::Paralegal,
            "students" => Self::Students,
            other => Self::Other(other.to_string()),
        }
    }

    /// Display label used in notifications. Unknown codes are shown as sent.
    pub fn label(&self) -> &str {
        match self {
            Self::Attorney => "Trial Attorney",
            Self::Compliance => "Trade Compliance Professional",
            Self::Paralegal => "Paralegal",
            Self::Students => "Law Student / Clerk",
            Self::Other(code) => code.as_str(),
        }
    }
}

/// Per-channel delivery results. `false` means that channel failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOutcome {
    pub firm_email: bool,
    pub applicant_email: bool,
    pub sms: bool,
}

/// Renders a scalar JSON value as text. Objects and arrays are rejected.
fn scalar_text(value: Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(format!("expected a scalar value, found {other}")),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_text(value)
        .map(Option::unwrap_or_default)
        .map_err(serde::de::Error::custom)
}

fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_text(value)
        .map(|s| s.filter(|s| !s.is_empty()))
        .map_err(serde::de::Error::custom)
}

/// A list of scalars rendered as text. Null and empty entries are dropped and
/// a bare scalar counts as a one-item list.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        other => vec![other],
    };
    items
        .into_iter()
        .filter_map(|item| {
            scalar_text(item)
                .map(|s| s.filter(|s| !s.is_empty()))
                .transpose()
        })
        .collect::<Result<_, _>>()
        .map_err(serde::de::Error::custom)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::from_code("attorney").label(), "Trial Attorney");
        assert_eq!(
            Category::from_code("compliance").label(),
            "Trade Compliance Professional"
        );
        assert_eq!(Category::from_code("paralegal").label(), "Paralegal");
        assert_eq!(Category::from_code("students").label(), "Law Student / Clerk");
    }

    #[test]
    fn test_unknown_category_passes_through() {
        let category = Category::from_code("intern");
        assert_eq!(category, Category::Other("intern".into()));
        assert_eq!(category.label(), "intern");
    }

    #[test]
    fn test_payload_deserializes_camel_case_fields() {
        let payload: ApplicationPayload = serde_json::from_value(json!({
            "category": "attorney",
            "firstName": "Ada",
            "whyTrembach": "Trial work",
            "areasFocus": ["Personal Injury", "Employment"],
            "trialCases": [{"name": "Doe v. Roe", "court": "LASC", "caseNumber": "BC123"}]
        }))
        .expect("payload parses");

        assert_eq!(payload.first_name, "Ada");
        assert_eq!(payload.why_trembach, "Trial work");
        assert_eq!(payload.areas_focus.len(), 2);
        assert_eq!(payload.trial_cases[0].case_number, "BC123");
        assert_eq!(payload.category(), Category::Attorney);
    }

    #[test]
    fn test_optional_fields_treat_empty_and_null_as_absent() {
        let payload: ApplicationPayload = serde_json::from_value(json!({
            "address": "",
            "salary": null,
            "trialCases": null,
            "areasFocus": null
        }))
        .expect("payload parses");

        assert!(payload.address.is_none());
        assert!(payload.salary.is_none());
        assert!(payload.trial_cases.is_empty());
        assert!(payload.areas_focus.is_empty());
    }

    #[test]
    fn test_numeric_scalars_become_text() {
        let payload: ApplicationPayload = serde_json::from_value(json!({
            "phone": 3105551234u64,
            "gradYear": 2015,
            "trialCases": [{"name": "A", "court": "B", "year": 2019}]
        }))
        .expect("payload parses");

        assert_eq!(payload.phone, "3105551234");
        assert_eq!(payload.grad_year.as_deref(), Some("2015"));
        assert_eq!(payload.trial_cases[0].year, "2019");
    }

    #[test]
    fn test_areas_focus_accepts_mixed_scalars() {
        let cases = [
            (json!([2019, "Employment"]), vec!["2019", "Employment"]),
            (json!(["PI", null, ""]), vec!["PI"]),
            (json!("Personal Injury"), vec!["Personal Injury"]),
            (json!([true]), vec!["true"]),
            (json!(""), vec![]),
        ];
        for (areas, expected) in cases {
            let payload: ApplicationPayload =
                serde_json::from_value(json!({ "areasFocus": areas.clone() }))
                    .unwrap_or_else(|e| panic!("{areas} should parse: {e}"));
            assert_eq!(payload.areas_focus, expected, "areasFocus = {areas}");
        }
    }

    #[test]
    fn test_areas_focus_rejects_nested_objects() {
        let result: Result<ApplicationPayload, _> =
            serde_json::from_value(json!({ "areasFocus": [{ "area": "PI" }] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_nested_object_in_text_field_is_rejected() {
        let result: Result<ApplicationPayload, _> =
            serde_json::from_value(json!({ "office": { "city": "LA" } }));
        assert!(result.is_err());
    }

    #[test]
    fn test_renderable_requires_name_and_court() {
        let full = TrialCase {
            name: "Doe v. Roe".into(),
            court: "LASC".into(),
            ..Default::default()
        };
        let name_only = TrialCase {
            name: "Smith v. Jones".into(),
            ..Default::default()
        };
        assert!(full.is_renderable());
        assert!(name_only.has_name());
        assert!(!name_only.is_renderable());
    }
}
