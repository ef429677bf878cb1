use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AppError;

/// Fixed set of issue categories. Declaration order is significant: it breaks ties
/// wherever categories are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Pothole,
    Streetlight,
    Garbage,
    WaterSupply,
    Drainage,
    TrafficSignal,
    RoadMaintenance,
    ParkMaintenance,
    NoisePollution,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Pothole,
        Category::Streetlight,
        Category::Garbage,
        Category::WaterSupply,
        Category::Drainage,
        Category::TrafficSignal,
        Category::RoadMaintenance,
        Category::ParkMaintenance,
        Category::NoisePollution,
        Category::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::Pothole => "pothole",
            Category::Streetlight => "streetlight",
            Category::Garbage => "garbage",
            Category::WaterSupply => "water_supply",
            Category::Drainage => "drainage",
            Category::TrafficSignal => "traffic_signal",
            Category::RoadMaintenance => "road_maintenance",
            Category::ParkMaintenance => "park_maintenance",
            Category::NoisePollution => "noise_pollution",
            Category::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Pothole => "Pothole",
            Category::Streetlight => "Street Light",
            Category::Garbage => "Garbage Collection",
            Category::WaterSupply => "Water Supply",
            Category::Drainage => "Drainage",
            Category::TrafficSignal => "Traffic Signal",
            Category::RoadMaintenance => "Road Maintenance",
            Category::ParkMaintenance => "Park Maintenance",
            Category::NoisePollution => "Noise Pollution",
            Category::Other => "Other",
        }
    }

    /// Accepts the snake_case key or the display label, case-insensitively.
    pub fn parse(raw: &str) -> Result<Category, AppError> {
        let needle = raw.trim();
        Category::ALL
            .into_iter()
            .find(|c| {
                c.key().eq_ignore_ascii_case(needle) || c.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| {
                AppError::validation("Unknown report category")
                    .with_details(format!("category={needle}"))
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 4] = [
        ReportStatus::Pending,
        ReportStatus::InProgress,
        ReportStatus::Resolved,
        ReportStatus::Rejected,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::InProgress => "In Progress",
            ReportStatus::Resolved => "Resolved",
            ReportStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Canonical structured location. Coordinates are absent when only a display string is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub address: String,
}

impl Location {
    pub fn at(coordinates: Coordinates, address: impl Into<String>) -> Self {
        Self {
            latitude: Some(coordinates.latitude),
            longitude: Some(coordinates.longitude),
            address: address.into(),
        }
    }

    pub fn address_only(address: impl Into<String>) -> Self {
        Self {
            latitude: None,
            longitude: None,
            address: address.into(),
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }
}

/// Location as submitted: either free text ("40.7128, -74.0060" or an address) or structured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationInput {
    Text(String),
    Structured {
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        address: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub status: ReportStatus,
    pub priority: Priority,
    pub location: Location,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub citizen_name: Option<String>,
    #[serde(default)]
    pub citizen_phone: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub estimated_resolution: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub actual_resolution: Option<OffsetDateTime>,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Citizen submission. `category` stays a raw string so unknown values surface as
/// validation errors instead of decode failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub priority: Option<Priority>,
    pub location: LocationInput,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub citizen_name: Option<String>,
    #[serde(default)]
    pub citizen_phone: Option<String>,
}

impl NewReport {
    pub fn new(category: impl Into<String>, location: LocationInput) -> Self {
        Self {
            title: None,
            description: String::new(),
            category: category.into(),
            priority: None,
            location,
            images: Vec::new(),
            citizen_name: None,
            citizen_phone: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl From<&AppError> for ValidationWarning {
    fn from(err: &AppError) -> Self {
        let warning = ValidationWarning::new(err.code.clone(), err.message.clone());
        match &err.details {
            Some(d) => warning.with_details(d.clone()),
            None => warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_key_and_label() {
        assert_eq!(Category::parse("water_supply").unwrap(), Category::WaterSupply);
        assert_eq!(Category::parse(" Street Light ").unwrap(), Category::Streetlight);
        let err = Category::parse("volcano").unwrap_err();
        assert_eq!(err.code, crate::error::REPORT_VALIDATION_FAILED);
    }

    #[test]
    fn status_serializes_with_source_names() {
        let s = serde_json::to_string(&ReportStatus::InProgress).unwrap();
        assert_eq!(s, "\"in-progress\"");
        let c = serde_json::to_string(&Category::TrafficSignal).unwrap();
        assert_eq!(c, "\"traffic_signal\"");
    }

    #[test]
    fn location_input_accepts_text_and_structured() {
        let text: LocationInput = serde_json::from_str("\"40.7128, -74.0060\"").unwrap();
        assert_eq!(text, LocationInput::Text("40.7128, -74.0060".to_string()));
        let structured: LocationInput =
            serde_json::from_str(r#"{"latitude":1.5,"longitude":2.5,"address":"Main St"}"#)
                .unwrap();
        assert_eq!(
            structured,
            LocationInput::Structured {
                latitude: 1.5,
                longitude: 2.5,
                address: "Main St".to_string()
            }
        );
    }
}
