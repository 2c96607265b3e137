//! Coercion of loosely-typed form payloads
//!
//! Form clients send whatever JSON they like for each field. Scalars become
//! their string form and list fields always end up as a sequence; nothing
//! here can fail.

use serde_json::{Map, Value};

use crate::models::CompanyProfile;

/// Field name to arbitrary JSON value, as posted by the form
pub type Payload = Map<String, Value>;

/// String form of a scalar field. `null` and absent stay `None`.
///
/// Numbers and booleans use their JSON text; arrays and objects are kept as
/// compact JSON.
pub fn as_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Sequence form of a list field.
///
/// Arrays are stringified element-wise, absent or `null` gives an empty
/// list, and any other value is wrapped as a single element.
///
/// `null` elements are dropped, so the result can be shorter than the input
/// array. Callers must not rely on positions matching the posted list.
pub fn as_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(|item| as_text(Some(item))).collect(),
        Some(other) => as_text(Some(other)).into_iter().collect(),
    }
}

impl CompanyProfile {
    pub fn from_payload(payload: &Payload) -> Self {
        let text = |key: &str| as_text(payload.get(key));
        let list = |key: &str| as_list(payload.get(key));

        Self {
            company_name: text("companyName"),
            credit_code: text("creditCode"),
            company_scale: text("companyScale"),
            company_type: text("companyType"),
            company_address: text("companyAddress"),
            business_intro: text("businessIntro"),
            core_products: list("coreProducts"),
            intellectual_properties: list("intellectualProperties"),
            patents: list("patents"),
            contact_name: text("contactName"),
            contact_info: text("contactInfo"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    #[test]
    fn test_as_text_scalars() {
        assert_eq!(as_text(None), None);
        assert_eq!(as_text(Some(&Value::Null)), None);
        assert_eq!(as_text(Some(&json!("Acme"))), Some("Acme".to_string()));
        assert_eq!(as_text(Some(&json!(250))), Some("250".to_string()));
        assert_eq!(as_text(Some(&json!(2.5))), Some("2.5".to_string()));
        assert_eq!(as_text(Some(&json!(true))), Some("true".to_string()));
    }

    #[test]
    fn test_as_text_structured_values_become_json() {
        assert_eq!(as_text(Some(&json!(["a", 1]))), Some(r#"["a",1]"#.to_string()));
        assert_eq!(as_text(Some(&json!({"k": "v"}))), Some(r#"{"k":"v"}"#.to_string()));
    }

    #[test]
    fn test_as_list_array() {
        assert_eq!(
            as_list(Some(&json!(["widgets", 7, null, false]))),
            vec!["widgets", "7", "false"]
        );
    }

    #[test]
    fn test_as_list_drops_null_elements() {
        let items = as_list(Some(&json!(["a", null, "b"])));
        assert_eq!(items, vec!["a", "b"]);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_as_list_absent_or_null_is_empty() {
        assert!(as_list(None).is_empty());
        assert!(as_list(Some(&Value::Null)).is_empty());
    }

    #[test]
    fn test_as_list_scalar_wraps() {
        assert_eq!(as_list(Some(&json!("widgets"))), vec!["widgets"]);
        assert_eq!(as_list(Some(&json!(42))), vec!["42"]);
    }

    #[test]
    fn test_profile_from_payload() {
        let payload = payload(json!({
            "companyName": "Acme Robotics",
            "creditCode": 913100001234_u64,
            "companyScale": null,
            "coreProducts": "arm controllers",
            "intellectualProperties": ["SW-2021-001", "SW-2022-014"],
            "contactName": "Li Wei",
            "unexpected": {"ignored": true}
        }));

        let profile = CompanyProfile::from_payload(&payload);
        assert_eq!(profile.company_name.as_deref(), Some("Acme Robotics"));
        assert_eq!(profile.credit_code.as_deref(), Some("913100001234"));
        assert_eq!(profile.company_scale, None);
        assert_eq!(profile.company_type, None);
        assert_eq!(profile.core_products, vec!["arm controllers"]);
        assert_eq!(
            profile.intellectual_properties,
            vec!["SW-2021-001", "SW-2022-014"]
        );
        assert!(profile.patents.is_empty());
        assert_eq!(profile.contact_name.as_deref(), Some("Li Wei"));
        assert_eq!(profile.contact_info, None);
    }
}
