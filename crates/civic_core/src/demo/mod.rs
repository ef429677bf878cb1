use time::macros::datetime;
use time::OffsetDateTime;

use crate::domain::{Category, Coordinates, Location, Priority, Report, ReportStatus};

pub const SEED_ID_PREFIX: &str = "seed-";

struct Seed {
    n: u32,
    title: &'static str,
    description: &'static str,
    category: Category,
    status: ReportStatus,
    priority: Priority,
    at: (f64, f64),
    address: &'static str,
    citizen: (&'static str, &'static str),
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    assigned_to: Option<&'static str>,
    estimated_resolution: Option<OffsetDateTime>,
    actual_resolution: Option<OffsetDateTime>,
    notes: &'static [&'static str],
}

impl Seed {
    fn into_report(self) -> Report {
        Report {
            id: format!("{SEED_ID_PREFIX}{}", self.n),
            title: self.title.to_string(),
            description: self.description.to_string(),
            category: self.category,
            status: self.status,
            priority: self.priority,
            location: Location::at(Coordinates::new(self.at.0, self.at.1), self.address),
            images: vec!["/placeholder.svg".to_string()],
            citizen_name: Some(self.citizen.0.to_string()),
            citizen_phone: Some(self.citizen.1.to_string()),
            created_at: self.created_at,
            updated_at: self.updated_at,
            assigned_to: self.assigned_to.map(str::to_string),
            estimated_resolution: self.estimated_resolution,
            actual_resolution: self.actual_resolution,
            notes: self.notes.iter().map(|n| n.to_string()).collect(),
        }
    }
}

/// Deterministic sample reports shown alongside persisted ones. Fixed timestamps keep
/// dashboards and tests stable.
pub fn seed_reports() -> Vec<Report> {
    vec![
        Seed {
            n: 1,
            title: "Pothole on Main Street",
            description: "Large pothole causing traffic issues near the hospital entrance",
            category: Category::Pothole,
            status: ReportStatus::Pending,
            priority: Priority::High,
            at: (28.6139, 77.2090),
            address: "Main Street, Near City Hospital, New Delhi",
            citizen: ("Rajesh Kumar", "+91-9876543210"),
            created_at: datetime!(2024-01-15 10:30 UTC),
            updated_at: datetime!(2024-01-15 10:30 UTC),
            assigned_to: None,
            estimated_resolution: None,
            actual_resolution: None,
            notes: &[],
        },
        Seed {
            n: 2,
            title: "Street Light Not Working",
            description: "Street light has been out for 3 days, creating safety concerns",
            category: Category::Streetlight,
            status: ReportStatus::InProgress,
            priority: Priority::Medium,
            at: (28.6129, 77.2295),
            address: "Park Avenue, Sector 12, New Delhi",
            citizen: ("Priya Sharma", "+91-9876543211"),
            created_at: datetime!(2024-01-14 18:45 UTC),
            updated_at: datetime!(2024-01-15 09:00 UTC),
            assigned_to: Some("Electrical Team A"),
            estimated_resolution: Some(datetime!(2024-01-17 17:00 UTC)),
            actual_resolution: None,
            notes: &["Electrical team dispatched", "Parts ordered"],
        },
        Seed {
            n: 3,
            title: "Garbage Collection Issue",
            description: "Garbage has not been collected for over a week",
            category: Category::Garbage,
            status: ReportStatus::Resolved,
            priority: Priority::High,
            at: (28.5355, 77.3910),
            address: "Green Park Extension, New Delhi",
            citizen: ("Amit Gupta", "+91-9876543212"),
            created_at: datetime!(2024-01-10 08:20 UTC),
            updated_at: datetime!(2024-01-12 14:30 UTC),
            assigned_to: Some("Sanitation Team B"),
            estimated_resolution: None,
            actual_resolution: Some(datetime!(2024-01-12 14:30 UTC)),
            notes: &["Schedule updated", "Extra collection arranged", "Issue resolved"],
        },
        Seed {
            n: 4,
            title: "Water Supply Disruption",
            description: "No water supply for the past 2 days in our area",
            category: Category::WaterSupply,
            status: ReportStatus::Pending,
            priority: Priority::Critical,
            at: (28.4595, 77.0266),
            address: "Gurgaon Sector 29, Haryana",
            citizen: ("Sunita Devi", "+91-9876543213"),
            created_at: datetime!(2024-01-15 06:00 UTC),
            updated_at: datetime!(2024-01-15 06:00 UTC),
            assigned_to: None,
            estimated_resolution: None,
            actual_resolution: None,
            notes: &[],
        },
        Seed {
            n: 5,
            title: "Blocked Drainage System",
            description: "Drainage is completely blocked causing water logging",
            category: Category::Drainage,
            status: ReportStatus::InProgress,
            priority: Priority::High,
            at: (28.7041, 77.1025),
            address: "Civil Lines, Delhi",
            citizen: ("Mohamed Ali", "+91-9876543214"),
            created_at: datetime!(2024-01-13 16:20 UTC),
            updated_at: datetime!(2024-01-14 11:45 UTC),
            assigned_to: Some("Drainage Team C"),
            estimated_resolution: Some(datetime!(2024-01-16 15:00 UTC)),
            actual_resolution: None,
            notes: &["Team inspected the area", "Heavy machinery required"],
        },
        Seed {
            n: 6,
            title: "Loud Construction at Night",
            description: "Construction noise continues past midnight on weekdays",
            category: Category::NoisePollution,
            status: ReportStatus::Rejected,
            priority: Priority::Low,
            at: (28.6304, 77.2177),
            address: "Connaught Place, New Delhi",
            citizen: ("Kavita Singh", "+91-9876543215"),
            created_at: datetime!(2024-01-11 22:10 UTC),
            updated_at: datetime!(2024-01-12 09:15 UTC),
            assigned_to: None,
            estimated_resolution: None,
            actual_resolution: None,
            notes: &["Status changed from Pending to Rejected: permitted work window"],
        },
    ]
    .into_iter()
    .map(Seed::into_report)
    .collect()
}

pub fn is_seed_id(id: &str) -> bool {
    id.starts_with(SEED_ID_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn seed_ids_are_unique_and_prefixed() {
        let seeds = seed_reports();
        let ids: BTreeSet<_> = seeds.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids.len(), seeds.len());
        assert!(seeds.iter().all(|r| is_seed_id(&r.id)));
    }

    #[test]
    fn seeds_cover_every_status() {
        let seeds = seed_reports();
        for status in ReportStatus::ALL {
            assert!(seeds.iter().any(|r| r.status == status), "missing {status:?}");
        }
    }
}
