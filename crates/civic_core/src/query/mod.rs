use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::{Category, Priority, Report, ReportStatus};

/// Report filter. Every populated field must match (logical AND); `None` matches anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub status: Option<ReportStatus>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub search_text: Option<String>,
    /// Inclusive lower bound on `created_at`.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_from: Option<OffsetDateTime>,
    /// Inclusive upper bound on `created_at`.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_to: Option<OffsetDateTime>,
}

impl FilterCriteria {
    pub fn status(status: ReportStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search_text: Some(text.into()),
            ..Self::default()
        }
    }

    fn needle(&self) -> Option<String> {
        self.search_text
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.needle().is_none()
            && self.created_from.is_none()
            && self.created_to.is_none()
    }
}

fn matches_text(report: &Report, needle: &str) -> bool {
    [
        report.description.as_str(),
        report.location.address.as_str(),
        report.category.key(),
        report.category.label(),
        report.title.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

pub fn matches(report: &Report, criteria: &FilterCriteria) -> bool {
    if criteria.status.is_some_and(|s| s != report.status) {
        return false;
    }
    if criteria.category.is_some_and(|c| c != report.category) {
        return false;
    }
    if criteria.priority.is_some_and(|p| p != report.priority) {
        return false;
    }
    if criteria.created_from.is_some_and(|from| report.created_at < from) {
        return false;
    }
    if criteria.created_to.is_some_and(|to| report.created_at > to) {
        return false;
    }
    match criteria.needle() {
        Some(needle) => matches_text(report, &needle),
        None => true,
    }
}

/// Reports matching `criteria`, in input order. Empty criteria returns the input unchanged.
pub fn filter(reports: &[Report], criteria: &FilterCriteria) -> Vec<Report> {
    if criteria.is_empty() {
        return reports.to_vec();
    }
    reports
        .iter()
        .filter(|r| matches(r, criteria))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::seed_reports;

    #[test]
    fn empty_criteria_is_identity() {
        let seeds = seed_reports();
        assert_eq!(filter(&seeds, &FilterCriteria::default()), seeds);
    }

    #[test]
    fn blank_search_text_matches_everything() {
        let seeds = seed_reports();
        assert_eq!(filter(&seeds, &FilterCriteria::search("   ")), seeds);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let seeds = seed_reports();
        let by_address = filter(&seeds, &FilterCriteria::search("CIVIL LINES"));
        assert_eq!(by_address.len(), 1);
        assert_eq!(by_address[0].category, Category::Drainage);

        let by_label = filter(&seeds, &FilterCriteria::search("street light"));
        assert!(by_label.iter().any(|r| r.category == Category::Streetlight));

        let by_key = filter(&seeds, &FilterCriteria::search("water_supply"));
        assert_eq!(by_key.len(), 1);
    }
}
