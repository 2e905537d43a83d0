use crate::state::{humanize, Destination, DynamicFilter, Score, TripType};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Query suffix the backend uses for set membership (`region__in=a,b`).
const IN_SUFFIX: &str = "__in";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    Country,
    Region,
    BudgetLevel,
    Score(Score),
    TripType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ordering {
    Lexical,
    Numeric,
    Fixed,
}

impl FilterField {
    pub fn all() -> Vec<FilterField> {
        let mut fields = vec![
            FilterField::Country,
            FilterField::Region,
            FilterField::BudgetLevel,
        ];
        fields.extend(Score::ALL.into_iter().map(FilterField::Score));
        fields.push(FilterField::TripType);
        fields
    }

    pub fn name(self) -> &'static str {
        match self {
            FilterField::Country => "country",
            FilterField::Region => "region",
            FilterField::BudgetLevel => "budget_level",
            FilterField::Score(score) => score.name(),
            FilterField::TripType => "trip_type",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|field| field.name() == name)
    }

    pub fn label(self) -> String {
        humanize(self.name())
    }

    fn ordering(self) -> Ordering {
        match self {
            FilterField::Country | FilterField::Region | FilterField::BudgetLevel => {
                Ordering::Lexical
            }
            FilterField::Score(_) => Ordering::Numeric,
            FilterField::TripType => Ordering::Fixed,
        }
    }

    fn values_of(self, destination: &Destination) -> Vec<String> {
        match self {
            FilterField::Country => vec![destination.country.clone()],
            FilterField::Region => vec![destination.region.clone()],
            FilterField::BudgetLevel => destination.budget_level.iter().cloned().collect(),
            FilterField::Score(score) => destination
                .score(score)
                .map(|value| value.to_string())
                .into_iter()
                .collect(),
            FilterField::TripType => destination
                .trips()
                .into_iter()
                .map(|trip| trip.flag().to_string())
                .collect(),
        }
    }
}

/// One constraint of a destination query, each with its own wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Equals(FilterField, String),
    In(FilterField, BTreeSet<String>),
    Flag(TripType),
}

impl Predicate {
    pub fn query_pair(&self) -> (String, String) {
        match self {
            Predicate::Equals(field, value) => (field.name().to_string(), value.clone()),
            Predicate::In(field, values) => (
                format!("{}{IN_SUFFIX}", field.name()),
                values.iter().cloned().collect::<Vec<_>>().join(","),
            ),
            Predicate::Flag(trip) => (trip.flag().to_string(), "true".to_string()),
        }
    }

    /// Inverse of [`Predicate::query_pair`], used for deep links.
    pub fn from_query_pair(key: &str, value: &str) -> Option<Self> {
        if let Some(trip) = TripType::from_flag(key) {
            return value.eq_ignore_ascii_case("true").then_some(Predicate::Flag(trip));
        }
        if let Some(name) = key.strip_suffix(IN_SUFFIX) {
            let field = FilterField::from_name(name)?;
            let values: BTreeSet<String> = value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
                .collect();
            return (!values.is_empty()).then_some(Predicate::In(field, values));
        }
        let field = FilterField::from_name(key).filter(|f| *f != FilterField::TripType)?;
        (!value.is_empty()).then(|| Predicate::Equals(field, value.to_string()))
    }
}

/// Predicates currently sent with every destination request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter(Vec<Predicate>);

impl Filter {
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Self(predicates)
    }

    pub fn from_query<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self(
            pairs
                .into_iter()
                .filter_map(|(key, value)| Predicate::from_query_pair(key, value))
                .collect(),
        )
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        self.0.iter().map(Predicate::query_pair).collect()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Checkbox state of the filter panel. Nothing here reaches the backend
/// until it is turned into a [`Filter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    staged: BTreeMap<FilterField, BTreeSet<String>>,
}

impl Selection {
    pub fn from_filter(filter: &Filter) -> Self {
        let mut selection = Self::default();
        for predicate in filter.predicates() {
            match predicate {
                Predicate::Equals(field, value) => selection.select(*field, value),
                Predicate::In(field, values) => {
                    for value in values {
                        selection.select(*field, value);
                    }
                }
                Predicate::Flag(trip) => selection.select(FilterField::TripType, trip.flag()),
            }
        }
        selection
    }

    fn select(&mut self, field: FilterField, value: &str) {
        self.staged
            .entry(field)
            .or_default()
            .insert(value.to_string());
    }

    pub fn toggle(&mut self, field: FilterField, value: &str) {
        let values = self.staged.entry(field).or_default();
        if !values.remove(value) {
            values.insert(value.to_string());
        }
        if values.is_empty() {
            self.staged.remove(&field);
        }
    }

    pub fn is_selected(&self, field: FilterField, value: &str) -> bool {
        self.staged
            .get(&field)
            .map(|values| values.contains(value))
            .unwrap_or(false)
    }

    pub fn values(&self, field: FilterField) -> Vec<String> {
        self.staged
            .get(&field)
            .map(|values| values.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.staged.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn to_filter(&self) -> Filter {
        let mut predicates = Vec::new();
        for (field, values) in &self.staged {
            if values.is_empty() {
                continue;
            }
            match field {
                FilterField::TripType => predicates.extend(
                    values
                        .iter()
                        .filter_map(|flag| TripType::from_flag(flag))
                        .map(Predicate::Flag),
                ),
                field => predicates.push(Predicate::In(*field, values.clone())),
            }
        }
        Filter(predicates)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    /// Sent to the backend.
    pub value: String,
    /// Shown to the user.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet {
    pub field: FilterField,
    pub options: Vec<FilterOption>,
}

impl OptionSet {
    fn build(field: FilterField, values: impl IntoIterator<Item = String>) -> Self {
        let values: BTreeSet<String> = values
            .into_iter()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .collect();
        let options = match field.ordering() {
            Ordering::Lexical => values
                .into_iter()
                .map(|value| FilterOption {
                    label: value.clone(),
                    value,
                })
                .collect(),
            Ordering::Numeric => {
                let mut numbers: Vec<(f64, String)> = values
                    .into_iter()
                    .filter_map(|value| value.parse::<f64>().ok().map(|n| (n, value)))
                    .collect();
                numbers.sort_by(|a, b| a.0.total_cmp(&b.0));
                numbers
                    .into_iter()
                    .map(|(_, value)| FilterOption {
                        label: value.clone(),
                        value,
                    })
                    .collect()
            }
            Ordering::Fixed => TripType::ALL
                .into_iter()
                .filter(|trip| values.contains(trip.flag()))
                .map(|trip| FilterOption {
                    value: trip.flag().to_string(),
                    label: trip.label(),
                })
                .collect(),
        };
        Self { field, options }
    }
}

/// Option sets derived from whatever records were fetched.
pub fn options_from_destinations(destinations: &[Destination]) -> Vec<OptionSet> {
    FilterField::all()
        .into_iter()
        .map(|field| {
            OptionSet::build(
                field,
                destinations
                    .iter()
                    .flat_map(|destination| field.values_of(destination)),
            )
        })
        .collect()
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => s == "true" || s == "1",
        _ => false,
    }
}

/// Option sets from the backend's `possible_values`. Trip types come either
/// as one list of flag names under `trip_type` or as one boolean list per flag.
pub fn options_from_possible_values(possible: &BTreeMap<String, Vec<Value>>) -> Vec<OptionSet> {
    FilterField::all()
        .into_iter()
        .map(|field| {
            let values: Vec<String> = match field {
                FilterField::TripType => {
                    let mut flags: Vec<String> = possible
                        .get(field.name())
                        .map(|values| values.iter().filter_map(scalar).collect())
                        .unwrap_or_default();
                    flags.extend(
                        TripType::ALL
                            .into_iter()
                            .filter(|trip| {
                                possible
                                    .get(trip.flag())
                                    .map(|values| values.iter().any(truthy))
                                    .unwrap_or(false)
                            })
                            .map(|trip| trip.flag().to_string()),
                    );
                    flags
                }
                field => possible
                    .get(field.name())
                    .map(|values| values.iter().filter_map(scalar).collect())
                    .unwrap_or_default(),
            };
            OptionSet::build(field, values)
        })
        .collect()
}

pub fn hint_for(field: FilterField, hints: &[DynamicFilter]) -> Option<&DynamicFilter> {
    hints.iter().find(|hint| {
        hint.feature == field.name()
            || (field == FilterField::TripType && TripType::from_flag(&hint.feature).is_some())
    })
}
