use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::{Category, Priority, Report, ReportStatus};
use crate::normalize::timestamps::utc_date;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCount {
    pub status: ReportStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: Category,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriorityCount {
    pub priority: Priority,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryResolution {
    pub category: Category,
    pub total: i64,
    pub resolved: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyCount {
    pub date: Date,
    pub count: i64,
}

/// Dashboard aggregates. Breakdowns list every enum value in declaration order, zeros
/// included, so they always reconcile to `total`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub total: i64,
    pub count_by_status: Vec<StatusCount>,
    pub count_by_category: Vec<CategoryCount>,
    pub count_by_priority: Vec<PriorityCount>,
    pub resolution_rate_percent: i64,
}

impl Stats {
    pub fn status_count(&self, status: ReportStatus) -> i64 {
        self.count_by_status
            .iter()
            .find(|c| c.status == status)
            .map_or(0, |c| c.count)
    }
}

fn count_where(reports: &[Report], pred: impl Fn(&Report) -> bool) -> i64 {
    reports.iter().filter(|r| pred(r)).count() as i64
}

/// `round(100 * resolved / total)`, rounding half up; 0 for an empty collection.
pub fn resolution_rate_percent(resolved: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (200 * resolved + total) / (2 * total)
}

pub fn aggregate(reports: &[Report]) -> Stats {
    let total = reports.len() as i64;
    let count_by_status = ReportStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: count_where(reports, |r| r.status == status),
        })
        .collect::<Vec<_>>();
    let count_by_category = Category::ALL
        .into_iter()
        .map(|category| CategoryCount {
            category,
            count: count_where(reports, |r| r.category == category),
        })
        .collect();
    let count_by_priority = Priority::ALL
        .into_iter()
        .map(|priority| PriorityCount {
            priority,
            count: count_where(reports, |r| r.priority == priority),
        })
        .collect();

    let resolved = count_where(reports, |r| r.status == ReportStatus::Resolved);

    Stats {
        total,
        count_by_status,
        count_by_category,
        count_by_priority,
        resolution_rate_percent: resolution_rate_percent(resolved, total),
    }
}

/// Categories by descending count, ties in declaration order. Empty categories are omitted.
pub fn top_categories(reports: &[Report], n: usize) -> Vec<CategoryCount> {
    let mut items = Category::ALL
        .into_iter()
        .map(|category| CategoryCount {
            category,
            count: count_where(reports, |r| r.category == category),
        })
        .filter(|c| c.count > 0)
        .collect::<Vec<_>>();
    // Stable sort keeps declaration order among equal counts.
    items.sort_by(|a, b| b.count.cmp(&a.count));
    items.truncate(n);
    items
}

pub fn category_resolution(reports: &[Report]) -> Vec<CategoryResolution> {
    Category::ALL
        .into_iter()
        .map(|category| CategoryResolution {
            category,
            total: count_where(reports, |r| r.category == category),
            resolved: count_where(reports, |r| {
                r.category == category && r.status == ReportStatus::Resolved
            }),
        })
        .collect()
}

/// Report counts per UTC calendar date, newest date first, limited to `n` distinct dates.
pub fn recent_by_date(reports: &[Report], n: usize) -> Vec<DailyCount> {
    let mut sorted = reports.iter().collect::<Vec<_>>();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut out: Vec<DailyCount> = Vec::new();
    for r in sorted {
        let date = utc_date(r.created_at);
        match out.last_mut() {
            Some(last) if last.date == date => last.count += 1,
            _ => {
                if out.len() == n {
                    break;
                }
                out.push(DailyCount { date, count: 1 });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_rounds_half_up() {
        assert_eq!(resolution_rate_percent(0, 0), 0);
        assert_eq!(resolution_rate_percent(1, 3), 33);
        assert_eq!(resolution_rate_percent(2, 3), 67);
        assert_eq!(resolution_rate_percent(1, 8), 13);
        assert_eq!(resolution_rate_percent(5, 5), 100);
    }

    #[test]
    fn empty_collection_has_zero_rate() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.resolution_rate_percent, 0);
        assert!(stats.count_by_status.iter().all(|c| c.count == 0));
    }

    #[test]
    fn recent_by_date_with_zero_limit_is_empty() {
        assert!(recent_by_date(&crate::demo::seed_reports(), 0).is_empty());
    }
}
