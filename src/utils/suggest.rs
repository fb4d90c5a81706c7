use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single address suggestion as returned by the Dadata API: a display
/// value plus the structured address payload, passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub value: String,
    #[serde(default)]
    pub data: Value,
}

/// Country filter accepted from the dashboard: either a comma-separated
/// string or an array of ISO codes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Countries {
    One(String),
    Many(Vec<String>),
}

/// Resolve the country filter to a list of ISO codes. Absent filter and the
/// literal "all" both fall back to the configured default set.
pub fn normalize_countries(countries: Option<&Countries>, defaults: &[String]) -> Vec<String> {
    match countries {
        None => defaults.to_vec(),
        Some(Countries::One(raw)) => {
            if raw.trim().eq_ignore_ascii_case("all") {
                return defaults.to_vec();
            }
            raw.split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        }
        Some(Countries::Many(items)) => items
            .iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
    }
}

fn field_set(data: &Value, key: &str) -> bool {
    match data.get(key) {
        None => false,
        Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn string_field(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Keep city/settlement-level suggestions only, resolve each to its city
/// value, and collapse duplicates by (city, country code) keeping the first
/// occurrence in order.
pub fn normalize_suggestions(raw: Vec<Suggestion>) -> Vec<Suggestion> {
    let mut seen = std::collections::HashSet::new();
    let mut result = Vec::new();

    for suggestion in raw {
        let data = &suggestion.data;
        // Street or house present means the match is below city level
        if field_set(data, "street")
            || field_set(data, "street_with_type")
            || field_set(data, "house")
            || field_set(data, "house_fias_id")
        {
            continue;
        }

        let city_value = string_field(data, "city")
            .or_else(|| string_field(data, "settlement"))
            .or_else(|| string_field(data, "settlement_with_type"))
            .or_else(|| Some(suggestion.value.clone()).filter(|v| !v.is_empty()));

        let Some(city_value) = city_value else {
            continue;
        };

        let country_code = string_field(data, "country_iso_code").unwrap_or_default();
        if seen.insert((city_value.clone(), country_code)) {
            result.push(Suggestion {
                value: city_value,
                data: suggestion.data,
            });
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn suggestion(value: &str, data: Value) -> Suggestion {
        Suggestion {
            value: value.to_string(),
            data,
        }
    }

    #[test]
    fn default_countries_when_absent_or_all() {
        let defaults = vec!["RU".to_string(), "KZ".to_string()];
        assert_eq!(normalize_countries(None, &defaults), defaults);
        assert_eq!(
            normalize_countries(Some(&Countries::One("All".into())), &defaults),
            defaults
        );
    }

    #[test]
    fn splits_and_trims_country_string() {
        let defaults = vec!["RU".to_string()];
        assert_eq!(
            normalize_countries(Some(&Countries::One(" kz , uz ,".into())), &defaults),
            vec!["kz".to_string(), "uz".to_string()]
        );
        assert_eq!(
            normalize_countries(
                Some(&Countries::Many(vec!["KG".into(), " ".into()])),
                &defaults
            ),
            vec!["KG".to_string()]
        );
    }

    #[test]
    fn drops_street_level_matches() {
        let kept = suggestion("г Алматы", json!({ "city": "Алматы", "country_iso_code": "KZ" }));
        let street = suggestion(
            "г Алматы, ул Абая",
            json!({ "city": "Алматы", "street": "Абая", "country_iso_code": "KZ" }),
        );
        let house = suggestion(
            "г Алматы, ул Абая, д 1",
            json!({ "city": "Алматы", "house": "1", "country_iso_code": "KZ" }),
        );

        let result = normalize_suggestions(vec![kept, street, house]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].value, "Алматы");
    }

    #[test]
    fn dedupes_by_city_and_country_preserving_order() {
        let first = suggestion("г Москва", json!({ "city": "Москва", "country_iso_code": "RU" }));
        let duplicate = suggestion(
            "Москва г",
            json!({ "city": "Москва", "country_iso_code": "RU" }),
        );
        let other_country = suggestion(
            "с Москва",
            json!({ "settlement": "Москва", "country_iso_code": "KZ" }),
        );

        let result = normalize_suggestions(vec![first, duplicate, other_country]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].value, "Москва");
        assert_eq!(result[0].data["country_iso_code"], "RU");
        assert_eq!(result[1].data["country_iso_code"], "KZ");
    }

    #[test]
    fn falls_back_to_suggestion_value() {
        let result = normalize_suggestions(vec![suggestion(
            "Караганда",
            json!({ "country_iso_code": "KZ" }),
        )]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].value, "Караганда");
    }
}
