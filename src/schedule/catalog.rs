//! The catalog of payment schedules available for assignment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::descriptor::ScheduleDescriptor;
use crate::error::{PayrollError, PayrollResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CatalogEntry {
    descriptor: ScheduleDescriptor,
    custom: bool,
}

/// Registered payment schedules keyed by canonical form.
///
/// A fresh catalog holds the three built-in schedules. Schedules added with
/// [`register`](ScheduleCatalog::register) are flagged custom; only those are
/// persisted.
///
/// # Example
///
/// ```
/// use payroll_engine::schedule::ScheduleCatalog;
///
/// let mut catalog = ScheduleCatalog::new();
/// assert_eq!(catalog.resolve("SEMANAL 2 5").unwrap(), "semanal 2 5");
///
/// assert_eq!(catalog.register("mensal 15").unwrap(), "mensal 15");
/// assert!(catalog.register("Mensal 15").is_err());
/// assert_eq!(catalog.custom_schedules(), vec!["mensal 15".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Default for ScheduleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleCatalog {
    /// Creates a catalog seeded with the built-in schedules.
    pub fn new() -> Self {
        let mut catalog = Self {
            entries: BTreeMap::new(),
        };
        catalog.seed_built_ins();
        catalog
    }

    fn seed_built_ins(&mut self) {
        for descriptor in ScheduleDescriptor::BUILT_INS {
            self.entries.insert(
                descriptor.to_string(),
                CatalogEntry {
                    descriptor,
                    custom: false,
                },
            );
        }
    }

    /// Parses and stores a custom schedule, returning its canonical form.
    ///
    /// # Errors
    ///
    /// - [`PayrollError::InvalidScheduleSyntax`] if the text is malformed
    /// - [`PayrollError::ScheduleAlreadyExists`] if an equivalent schedule is
    ///   already registered (built-in or custom)
    pub fn register(&mut self, text: &str) -> PayrollResult<String> {
        let descriptor = ScheduleDescriptor::parse(text)?;
        let canonical = descriptor.to_string();
        if self.entries.contains_key(&canonical) {
            return Err(PayrollError::ScheduleAlreadyExists { schedule: canonical });
        }
        debug!(schedule = %canonical, "Registered custom schedule");
        self.entries.insert(
            canonical.clone(),
            CatalogEntry {
                descriptor,
                custom: true,
            },
        );
        Ok(canonical)
    }

    /// Looks a schedule up case-insensitively and returns its canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::ScheduleUnavailable`] if no registered schedule
    /// matches, including when the text is not a valid descriptor at all.
    pub fn resolve(&self, text: &str) -> PayrollResult<String> {
        self.lookup(text).map(|descriptor| descriptor.to_string())
    }

    /// Looks a schedule up and returns the parsed descriptor.
    pub fn lookup(&self, text: &str) -> PayrollResult<ScheduleDescriptor> {
        let unavailable = || PayrollError::ScheduleUnavailable {
            text: text.to_string(),
        };
        let canonical = ScheduleDescriptor::parse(text)
            .map_err(|_| unavailable())?
            .to_string();
        self.entries
            .get(&canonical)
            .map(|entry| entry.descriptor)
            .ok_or_else(unavailable)
    }

    /// Returns true if the canonical form is registered.
    pub fn contains(&self, canonical: &str) -> bool {
        self.entries.contains_key(canonical)
    }

    /// Returns true if the canonical form is registered and user-defined.
    pub fn is_custom(&self, canonical: &str) -> bool {
        self.entries.get(canonical).is_some_and(|entry| entry.custom)
    }

    /// Canonical forms of all user-defined schedules, in sorted order.
    pub fn custom_schedules(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.custom)
            .map(|(canonical, _)| canonical.clone())
            .collect()
    }

    /// Canonical forms of every registered schedule, in sorted order.
    pub fn schedules(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Drops every custom schedule and re-seeds the built-ins.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.seed_built_ins();
    }

    /// Returns an independent copy of the catalog.
    pub fn snapshot(&self) -> ScheduleCatalog {
        self.clone()
    }

    /// Replaces the catalog contents with a previously taken snapshot.
    pub fn restore(&mut self, snapshot: ScheduleCatalog) {
        *self = snapshot;
    }
}
