//! crates/result_admin_core/src/filter.rs
//!
//! Filter-bar state and the predicate builder shared by every screen.
//!
//! A screen declares its filter fields once. Each field is either forwarded
//! to the backend as a query parameter or evaluated in memory over the last
//! full fetch. An empty string always means "no constraint".

use std::collections::BTreeMap;

/// Field name -> current value. Every recognized key is always present.
pub type FilterMapping = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("unknown filter field `{0}`")]
    UnknownField(String),
    #[error("filter `{field}` expects a number, got `{value}`")]
    InvalidNumber { field: String, value: String },
}

/// A record attribute as seen by client-side predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    fn as_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Implemented by every record that can be filtered in memory.
pub trait Filterable {
    /// Looks up one attribute by the name used in filter declarations.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Case-insensitive substring over any of the listed fields.
    Contains,
    /// Case-insensitive equality against any of the listed fields.
    Equals,
    /// Lower bound of a numeric range (inclusive).
    AtLeast,
    /// Upper bound of a numeric range (inclusive).
    AtMost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPolicy {
    Server {
        param: &'static str,
    },
    Client {
        comparison: Comparison,
        fields: &'static [&'static str],
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub name: &'static str,
    pub label: &'static str,
    pub policy: FilterPolicy,
}

impl FilterField {
    pub const fn server(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            policy: FilterPolicy::Server { param: name },
        }
    }

    pub const fn client(
        name: &'static str,
        label: &'static str,
        comparison: Comparison,
        fields: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            label,
            policy: FilterPolicy::Client { comparison, fields },
        }
    }
}

//=========================================================================================
// Predicates
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    comparison: Comparison,
    fields: &'static [&'static str],
    needle: String,
    bound: Option<f64>,
}

impl Predicate {
    pub fn new(
        filter: &str,
        comparison: Comparison,
        fields: &'static [&'static str],
        value: &str,
    ) -> Result<Self, FilterError> {
        let needle = value.trim().to_lowercase();
        let bound = match comparison {
            Comparison::AtLeast | Comparison::AtMost => {
                let bound = needle
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| FilterError::InvalidNumber {
                        field: filter.to_string(),
                        value: value.to_string(),
                    })?;
                Some(bound)
            }
            _ => None,
        };
        Ok(Self {
            comparison,
            fields,
            needle,
            bound,
        })
    }

    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        self.fields.iter().any(|name| {
            let Some(value) = record.field(name) else {
                return false;
            };
            match (self.comparison, self.bound) {
                (Comparison::Contains, _) => value.as_text().to_lowercase().contains(&self.needle),
                (Comparison::Equals, _) => value.as_text().trim().to_lowercase() == self.needle,
                (Comparison::AtLeast, Some(min)) => value.as_number().is_some_and(|n| n >= min),
                (Comparison::AtMost, Some(max)) => value.as_number().is_some_and(|n| n <= max),
                _ => false,
            }
        })
    }
}

/// How one filter mapping is split between the backend and memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPlan {
    pub server_params: Vec<(String, String)>,
    pub predicates: Vec<Predicate>,
}

impl SearchPlan {
    /// Splits `mapping` per the declared policies, skipping empty values.
    pub fn build(fields: &[FilterField], mapping: &FilterMapping) -> Result<Self, FilterError> {
        if let Some(unknown) = mapping
            .keys()
            .find(|key| !fields.iter().any(|f| f.name == key.as_str()))
        {
            return Err(FilterError::UnknownField(unknown.clone()));
        }

        let mut plan = SearchPlan::default();
        for field in fields {
            let value = mapping.get(field.name).map(|v| v.trim()).unwrap_or("");
            if value.is_empty() {
                continue;
            }
            match field.policy {
                FilterPolicy::Server { param } => {
                    plan.server_params.push((param.to_string(), value.to_string()));
                }
                FilterPolicy::Client { comparison, fields: targets } => {
                    plan.predicates
                        .push(Predicate::new(field.name, comparison, targets, value)?);
                }
            }
        }
        Ok(plan)
    }

    pub fn is_unconstrained(&self) -> bool {
        self.server_params.is_empty() && self.predicates.is_empty()
    }

    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }
}

//=========================================================================================
// Filter State Controller
//=========================================================================================

#[derive(Debug, Clone)]
pub struct FilterState {
    fields: &'static [FilterField],
    values: FilterMapping,
}

impl FilterState {
    pub fn new(fields: &'static [FilterField]) -> Self {
        Self {
            fields,
            values: Self::defaults(fields),
        }
    }

    /// The screen's fixed default: every field present and empty.
    pub fn defaults(fields: &[FilterField]) -> FilterMapping {
        fields
            .iter()
            .map(|f| (f.name.to_string(), String::new()))
            .collect()
    }

    pub fn values(&self) -> &FilterMapping {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Merges one key, leaving all others untouched.
    pub fn update(&mut self, name: &str, value: impl Into<String>) -> Result<(), FilterError> {
        let slot = self
            .values
            .get_mut(name)
            .ok_or_else(|| FilterError::UnknownField(name.to_string()))?;
        *slot = value.into();
        Ok(())
    }

    /// Replaces the whole mapping; keys the caller omitted fall back to empty.
    pub fn replace(&mut self, mapping: &FilterMapping) -> Result<(), FilterError> {
        let mut next = Self::defaults(self.fields);
        for (key, value) in mapping {
            let slot = next
                .get_mut(key)
                .ok_or_else(|| FilterError::UnknownField(key.clone()))?;
            *slot = value.clone();
        }
        self.values = next;
        Ok(())
    }

    /// Restores the defaults and hands back the mapping to search with.
    pub fn reset(&mut self) -> FilterMapping {
        self.values = Self::defaults(self.fields);
        self.values.clone()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.values.values().all(|v| v.trim().is_empty())
    }

    pub fn plan(&self) -> Result<SearchPlan, FilterError> {
        SearchPlan::build(self.fields, &self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static FIELDS: &[FilterField] = &[
        FilterField::client("query", "Search", Comparison::Contains, &["name", "email"]),
        FilterField::server("department", "Department"),
        FilterField::client("minMark", "Min mark", Comparison::AtLeast, &["mark"]),
        FilterField::client("maxMark", "Max mark", Comparison::AtMost, &["mark"]),
    ];

    struct Row {
        name: &'static str,
        email: &'static str,
        mark: Option<f64>,
    }

    impl Filterable for Row {
        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "name" => Some(FieldValue::Text(self.name.to_string())),
                "email" => Some(FieldValue::Text(self.email.to_string())),
                "mark" => self.mark.map(FieldValue::Number),
                _ => None,
            }
        }
    }

    #[test]
    fn new_state_has_every_key_empty() {
        let state = FilterState::new(FIELDS);
        assert_eq!(state.values().len(), 4);
        assert!(state.values().values().all(String::is_empty));
        assert!(state.is_unconstrained());
    }

    #[test]
    fn update_merges_one_key() {
        let mut state = FilterState::new(FIELDS);
        state.update("query", "rah").expect("known field");
        state.update("department", "cse").expect("known field");
        state.update("query", "kar").expect("known field");

        assert_eq!(state.get("query"), Some("kar"));
        assert_eq!(state.get("department"), Some("cse"));
        assert_eq!(state.get("minMark"), Some(""));
    }

    #[test]
    fn update_rejects_unknown_fields() {
        let mut state = FilterState::new(FIELDS);
        assert_eq!(
            state.update("semester", "1"),
            Err(FilterError::UnknownField("semester".to_string()))
        );
    }

    #[test]
    fn reset_returns_the_default_mapping() {
        let mut state = FilterState::new(FIELDS);
        state.update("query", "x").expect("known field");
        let committed = state.reset();
        assert_eq!(committed, FilterState::defaults(FIELDS));
        assert_eq!(state.values(), &committed);
    }

    #[test]
    fn replace_fills_omitted_keys() {
        let mut state = FilterState::new(FIELDS);
        state.update("query", "x").expect("known field");
        let mut mapping = FilterMapping::new();
        mapping.insert("department".into(), "eee".into());
        state.replace(&mapping).expect("known fields");
        assert_eq!(state.get("query"), Some(""));
        assert_eq!(state.get("department"), Some("eee"));
    }

    #[test]
    fn plan_splits_server_and_client_fields() {
        let mut state = FilterState::new(FIELDS);
        state.update("query", " Rah ").expect("known field");
        state.update("department", "cse").expect("known field");
        let plan = state.plan().expect("valid plan");

        assert_eq!(
            plan.server_params,
            vec![("department".to_string(), "cse".to_string())]
        );
        assert_eq!(plan.predicates.len(), 1);
    }

    #[test]
    fn substring_match_is_case_insensitive_across_fields() {
        let mut mapping = FilterState::defaults(FIELDS);
        mapping.insert("query".into(), "UNI.EDU".into());
        let plan = SearchPlan::build(FIELDS, &mapping).expect("valid plan");

        let row = Row {
            name: "Rahim",
            email: "rahim@uni.edu",
            mark: None,
        };
        assert!(plan.matches(&row));
    }

    #[test]
    fn range_bounds_are_inclusive_and_skip_missing_values() {
        let mut mapping = FilterState::defaults(FIELDS);
        mapping.insert("minMark".into(), "40".into());
        mapping.insert("maxMark".into(), "60".into());
        let plan = SearchPlan::build(FIELDS, &mapping).expect("valid plan");

        let at = |mark| Row {
            name: "a",
            email: "b",
            mark,
        };
        assert!(plan.matches(&at(Some(40.0))));
        assert!(plan.matches(&at(Some(60.0))));
        assert!(!plan.matches(&at(Some(60.5))));
        assert!(!plan.matches(&at(None)));
    }

    #[test]
    fn non_numeric_range_bound_is_rejected() {
        let mut mapping = FilterState::defaults(FIELDS);
        mapping.insert("minMark".into(), "forty".into());
        assert!(matches!(
            SearchPlan::build(FIELDS, &mapping),
            Err(FilterError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn non_finite_bounds_are_rejected() {
        for raw in ["nan", "inf", "-Infinity"] {
            let mut mapping = FilterMapping::new();
            mapping.insert("maxMark".into(), raw.into());
            assert_eq!(
                SearchPlan::build(FIELDS, &mapping).unwrap_err(),
                FilterError::InvalidNumber {
                    field: "maxMark".to_string(),
                    value: raw.to_string(),
                }
            );
        }
    }

    #[test]
    fn empty_mapping_is_unconstrained() {
        let plan = SearchPlan::build(FIELDS, &FilterMapping::new()).expect("valid plan");
        assert!(plan.is_unconstrained());
    }
}
