use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Backend identifiers come as integers for users and as strings (uuids) for
/// most other records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Id {
    Num(i64),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Num(n) => write!(f, "{n}"),
            Id::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Score {
    Culture,
    Adventure,
    Nature,
    Beaches,
    Nightlife,
    Cuisine,
    Wellness,
    Urban,
    Seclusion,
}

impl Score {
    pub const ALL: [Score; 9] = [
        Score::Culture,
        Score::Adventure,
        Score::Nature,
        Score::Beaches,
        Score::Nightlife,
        Score::Cuisine,
        Score::Wellness,
        Score::Urban,
        Score::Seclusion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Score::Culture => "culture",
            Score::Adventure => "adventure",
            Score::Nature => "nature",
            Score::Beaches => "beaches",
            Score::Nightlife => "nightlife",
            Score::Cuisine => "cuisine",
            Score::Wellness => "wellness",
            Score::Urban => "urban",
            Score::Seclusion => "seclusion",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TripType {
    DayTrip,
    ShortTrip,
    OneWeek,
    LongTrip,
    Weekend,
}

impl TripType {
    pub const ALL: [TripType; 5] = [
        TripType::DayTrip,
        TripType::ShortTrip,
        TripType::OneWeek,
        TripType::LongTrip,
        TripType::Weekend,
    ];

    pub fn flag(self) -> &'static str {
        match self {
            TripType::DayTrip => "day_trip",
            TripType::ShortTrip => "short_trip",
            TripType::OneWeek => "one_week",
            TripType::LongTrip => "long_trip",
            TripType::Weekend => "weekend",
        }
    }

    pub fn from_flag(flag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|trip| trip.flag() == flag)
    }

    pub fn label(self) -> String {
        humanize(self.flag())
    }
}

/// `day_trip` -> `Day Trip`
pub fn humanize(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Coordinates are strings in the database but some payloads send numbers.
fn coordinate<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }
    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Destination {
    pub id: String,
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub budget_level: Option<String>,
    #[serde(default, deserialize_with = "coordinate")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "coordinate")]
    pub longitude: Option<String>,

    #[serde(default)]
    pub culture: Option<i64>,
    #[serde(default)]
    pub adventure: Option<i64>,
    #[serde(default)]
    pub nature: Option<i64>,
    #[serde(default)]
    pub beaches: Option<i64>,
    #[serde(default)]
    pub nightlife: Option<i64>,
    #[serde(default)]
    pub cuisine: Option<i64>,
    #[serde(default)]
    pub wellness: Option<i64>,
    #[serde(default)]
    pub urban: Option<i64>,
    #[serde(default)]
    pub seclusion: Option<i64>,

    #[serde(default)]
    pub day_trip: Option<bool>,
    #[serde(default)]
    pub short_trip: Option<bool>,
    #[serde(default)]
    pub one_week: Option<bool>,
    #[serde(default)]
    pub long_trip: Option<bool>,
    #[serde(default)]
    pub weekend: Option<bool>,
}

impl Destination {
    pub fn score(&self, score: Score) -> Option<i64> {
        match score {
            Score::Culture => self.culture,
            Score::Adventure => self.adventure,
            Score::Nature => self.nature,
            Score::Beaches => self.beaches,
            Score::Nightlife => self.nightlife,
            Score::Cuisine => self.cuisine,
            Score::Wellness => self.wellness,
            Score::Urban => self.urban,
            Score::Seclusion => self.seclusion,
        }
    }

    pub fn has_trip(&self, trip: TripType) -> bool {
        let flag = match trip {
            TripType::DayTrip => self.day_trip,
            TripType::ShortTrip => self.short_trip,
            TripType::OneWeek => self.one_week,
            TripType::LongTrip => self.long_trip,
            TripType::Weekend => self.weekend,
        };
        flag.unwrap_or(false)
    }

    pub fn trips(&self) -> Vec<TripType> {
        TripType::ALL
            .into_iter()
            .filter(|trip| self.has_trip(*trip))
            .collect()
    }

    pub fn href(&self) -> String {
        format!("/destinations/{}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NewDestination {
    pub city: String,
    pub country: String,
    pub region: String,
    pub longitude: String,
    pub latitude: String,
}

impl NewDestination {
    pub fn is_complete(&self) -> bool {
        [
            &self.city,
            &self.country,
            &self.region,
            &self.longitude,
            &self.latitude,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

/// `GET /destinations` answers either with a bare list or, on newer backends,
/// with the list plus the values still selectable for each field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DestinationListing {
    Plain(Vec<Destination>),
    WithOptions {
        destinations: Vec<Destination>,
        #[serde(default)]
        possible_values: BTreeMap<String, Vec<serde_json::Value>>,
    },
}

impl DestinationListing {
    pub fn into_parts(
        self,
    ) -> (
        Vec<Destination>,
        Option<BTreeMap<String, Vec<serde_json::Value>>>,
    ) {
        match self {
            DestinationListing::Plain(destinations) => (destinations, None),
            DestinationListing::WithOptions {
                destinations,
                possible_values,
            } => (destinations, Some(possible_values)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Binary,
    Categorical,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DynamicFilter {
    pub question: String,
    pub feature: String,
    #[serde(rename = "type")]
    pub kind: FilterKind,
    #[serde(default)]
    pub value_meanings: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "Human", alias = "user")]
    Human,
    #[serde(alias = "AI", alias = "assistant")]
    Ai,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub sources: Option<String>,
}

impl Message {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
            sources: None,
        }
    }

    pub fn ai(content: impl Into<String>, sources: Option<String>) -> Self {
        Self {
            role: Role::Ai,
            content: content.into(),
            sources,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Chat {
    pub id: Id,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Chat {
    /// Local calendar date of the last update, if the backend sent one we can read.
    pub fn updated_label(&self) -> Option<String> {
        let raw = self.updated_at.as_deref()?;
        let utc = DateTime::parse_from_rfc3339(raw)
            .map(|date| date.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|naive| naive.and_utc())
            })
            .ok()?;
        Some(format!("{}", DateTime::<Local>::from(utc).format("%Y-%m-%d")))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct History {
    pub history: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Prompt<'a> {
    pub prompt: &'a str,
    pub chat_id: Option<&'a Id>,
    pub user_id: &'a Id,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Reply {
    pub message: String,
    #[serde(default)]
    pub sources: Option<String>,
    pub chat_id: Id,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewChat<'a> {
    pub user_id: &'a Id,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[allow(dead_code)]
    #[serde(default)]
    pub token_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanizes_flags() {
        assert_eq!(humanize("day_trip"), "Day Trip");
        assert_eq!(humanize("weekend"), "Weekend");
        assert_eq!(TripType::OneWeek.label(), "One Week");
        assert_eq!(TripType::from_flag("long_trip"), Some(TripType::LongTrip));
        assert_eq!(TripType::from_flag("nightlife"), None);
    }

    #[test]
    fn destination_accepts_numeric_coordinates() {
        let destination: Destination = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "city": "Lisbon",
            "country": "Portugal",
            "region": "europe",
            "latitude": 38.72,
            "longitude": "-9.14",
            "culture": 5,
            "weekend": true,
            "day_trip": false
        }))
        .unwrap();
        assert_eq!(destination.latitude.as_deref(), Some("38.72"));
        assert_eq!(destination.longitude.as_deref(), Some("-9.14"));
        assert_eq!(destination.score(Score::Culture), Some(5));
        assert_eq!(destination.score(Score::Urban), None);
        assert_eq!(destination.trips(), vec![TripType::Weekend]);
        assert_eq!(destination.href(), "/destinations/a1");
    }

    #[test]
    fn listing_shapes() {
        let plain: DestinationListing =
            serde_json::from_str(r#"[{"id":"1","city":"Oslo","country":"Norway"}]"#).unwrap();
        let (destinations, options) = plain.into_parts();
        assert_eq!(destinations.len(), 1);
        assert!(options.is_none());

        let wrapped: DestinationListing = serde_json::from_str(
            r#"{"destinations":[],"possible_values":{"region":["europe","asia"]}}"#,
        )
        .unwrap();
        let (destinations, options) = wrapped.into_parts();
        assert!(destinations.is_empty());
        assert_eq!(options.unwrap()["region"].len(), 2);
    }

    #[test]
    fn message_roles() {
        let history: History = serde_json::from_str(
            r#"{"history":[{"role":"human","content":"hi"},{"role":"ai","content":"hello","sources":"x"}]}"#,
        )
        .unwrap();
        assert_eq!(history.history[0], Message::human("hi"));
        assert_eq!(
            history.history[1],
            Message::ai("hello", Some("x".to_string()))
        );
    }

    #[test]
    fn ids_keep_their_shape() {
        let chat: Chat = serde_json::from_str(r#"{"id":7,"updated_at":"2024-05-01T10:00:00"}"#).unwrap();
        assert_eq!(chat.id, Id::Num(7));
        assert_eq!(chat.id.to_string(), "7");
        assert!(chat.updated_label().is_some());

        let chat: Chat = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(chat.id, Id::from("abc"));
        assert_eq!(chat.updated_label(), None);
    }

    #[test]
    fn new_destination_requires_every_field() {
        let mut new = NewDestination {
            city: "Kyoto".into(),
            country: "Japan".into(),
            region: "asia".into(),
            longitude: "135.76".into(),
            latitude: "35.01".into(),
        };
        assert!(new.is_complete());
        new.region = "  ".into();
        assert!(!new.is_complete());
    }
}
