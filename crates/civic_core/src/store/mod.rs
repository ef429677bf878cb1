//! The report store owns the canonical collection.
//!
//! Lifecycle: open (seed + persisted) -> mutate -> write-through save after each
//! successful mutation. One logical writer is assumed; the last save to the backing
//! store wins and there is no cross-writer conflict detection.

use time::{Duration, OffsetDateTime};

use crate::clock::Clock;
use crate::config::StoreConfig;
use crate::demo::seed_reports;
use crate::domain::{
    Category, Coordinates, LocationInput, NewReport, Report, ReportStatus, ValidationWarning,
};
use crate::error::AppError;
use crate::geo::{resolve_display_address, ReverseGeocoder};
use crate::normalize::location::normalize_location;
use crate::normalize::timestamps::strictly_after;
use crate::status::{apply_transition, StatusChange};
use crate::storage::ReportStorage;

pub struct ReportStore<S: ReportStorage, C: Clock> {
    reports: Vec<Report>,
    storage: S,
    clock: C,
    config: StoreConfig,
    warnings: Vec<ValidationWarning>,
}

/// Seed reports first; a persisted report replaces the entry with the same id, anything
/// else is appended in persisted order.
fn merge(seeds: Vec<Report>, persisted: Vec<Report>) -> Vec<Report> {
    let mut out = seeds;
    for report in persisted {
        match out.iter().position(|r| r.id == report.id) {
            Some(idx) => out[idx] = report,
            None => out.push(report),
        }
    }
    out
}

impl<S: ReportStorage, C: Clock> ReportStore<S, C> {
    /// Build the store from seed data and whatever `storage` holds.
    ///
    /// A failing backend does not abort: the store starts from seed data only and the
    /// failure is returned as a `PERSISTENCE_FAILED` warning.
    pub fn open(storage: S, clock: C, config: StoreConfig) -> (Self, Vec<ValidationWarning>) {
        let mut warnings = Vec::new();
        let persisted = match storage.load() {
            Ok(reports) => reports,
            Err(e) => {
                log::warn!("report storage unavailable, continuing in memory: {e}");
                warnings.push(ValidationWarning::from(&e));
                Vec::new()
            }
        };
        let seeds = if config.include_seed_reports {
            seed_reports()
        } else {
            Vec::new()
        };
        log::debug!(
            "opened report store: seeds={} persisted={}",
            seeds.len(),
            persisted.len()
        );

        let store = Self {
            reports: merge(seeds, persisted),
            storage,
            clock,
            config,
            warnings: Vec::new(),
        };
        (store, warnings)
    }

    pub fn list(&self) -> &[Report] {
        &self.reports
    }

    pub fn get(&self, id: &str) -> Result<&Report, AppError> {
        self.reports
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::not_found(id))
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Persistence warnings recorded since the last call. Check after each mutation to
    /// detect in-memory-only operation.
    pub fn take_warnings(&mut self) -> Vec<ValidationWarning> {
        std::mem::take(&mut self.warnings)
    }

    fn next_id(&self, now: OffsetDateTime) -> String {
        let base = (now.unix_timestamp_nanos() / 1_000_000).to_string();
        let taken = |candidate: &str| self.reports.iter().any(|r| r.id == candidate);
        if !taken(&base) {
            return base;
        }
        let mut n = 1u32;
        loop {
            let candidate = format!("{base}-{n}");
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn resolution_due(&self, now: OffsetDateTime) -> Result<OffsetDateTime, AppError> {
        let days = self.config.estimated_resolution_days;
        days.checked_mul(86_400)
            .map(Duration::seconds)
            .and_then(|window| now.checked_add(window))
            .ok_or_else(|| {
                AppError::validation("Estimated resolution date is out of range")
                    .with_details(format!("estimated_resolution_days={days}"))
            })
    }

    fn persist(&mut self) {
        if let Err(e) = self.storage.save(&self.reports) {
            log::warn!("failed to persist reports, change kept in memory only: {e}");
            self.warnings.push(ValidationWarning::from(&e));
        }
    }

    /// Submit a new report. Validation failures leave the collection untouched.
    ///
    /// A failed save does not fail the call: the report is kept in memory and a
    /// `PERSISTENCE_FAILED` warning is queued for [`ReportStore::take_warnings`].
    pub fn create(&mut self, input: NewReport) -> Result<Report, AppError> {
        let category = Category::parse(&input.category)?;
        let location = normalize_location(&input.location)?;
        let now = self.clock.now();
        let estimated_resolution = self.resolution_due(now)?;

        let title = input
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(category.label())
            .to_string();

        let report = Report {
            id: self.next_id(now),
            title,
            description: input.description,
            category,
            status: ReportStatus::Pending,
            priority: input.priority.unwrap_or_default(),
            location,
            images: input.images,
            citizen_name: input.citizen_name,
            citizen_phone: input.citizen_phone,
            created_at: now,
            updated_at: now,
            assigned_to: None,
            estimated_resolution: Some(estimated_resolution),
            actual_resolution: None,
            notes: Vec::new(),
        };

        log::info!(
            "created report id={} category={}",
            report.id,
            report.category
        );
        self.reports.push(report.clone());
        self.persist();
        Ok(report)
    }

    /// Submit a report located at a device position; the display address comes from the
    /// reverse geocoder, or `"lat, lng"` when the lookup fails.
    pub fn create_at_position(
        &mut self,
        mut input: NewReport,
        at: Coordinates,
        geocoder: &dyn ReverseGeocoder,
    ) -> Result<Report, AppError> {
        input.location = LocationInput::Structured {
            latitude: at.latitude,
            longitude: at.longitude,
            address: resolve_display_address(at, geocoder),
        };
        self.create(input)
    }

    /// Move a report to `to` through the status machine and persist the result.
    ///
    /// As with [`ReportStore::create`], a failed save keeps the change in memory and is
    /// reported through [`ReportStore::take_warnings`].
    pub fn update_status(
        &mut self,
        id: &str,
        to: ReportStatus,
        change: StatusChange,
    ) -> Result<Report, AppError> {
        let idx = self
            .reports
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| AppError::not_found(id))?;

        let mut updated = self.reports[idx].clone();
        let from = updated.status;
        let now = strictly_after(updated.updated_at, self.clock.now());
        let changed = apply_transition(&mut updated, to, &change, now)?;
        if !changed {
            return Ok(updated);
        }

        log::info!("report status changed id={id} from={from} to={to}");
        self.reports[idx] = updated.clone();
        self.persist();
        Ok(updated)
    }
}
