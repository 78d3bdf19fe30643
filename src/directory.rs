//! The employee directory.
//!
//! Employees are keyed by id. Ids are allocated from a counter that only
//! moves forward, so an id is never reused within a session even after the
//! employee it named is dismissed.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::error::{PayrollError, PayrollResult};
use crate::models::Employee;

/// Prefix of every allocated employee id.
pub const EMPLOYEE_ID_PREFIX: &str = "EMP";

/// Employees by id plus the next-id counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    employees: BTreeMap<String, Employee>,
    next_id: u64,
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

impl Directory {
    /// Creates an empty directory whose first id is `EMP1`.
    pub fn new() -> Self {
        Self {
            employees: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Rebuilds a directory from persisted parts.
    ///
    /// The counter is raised past every numeric id already present so that a
    /// stale counter can never hand out an id that is in use.
    ///
    /// # Errors
    ///
    /// [`PayrollError::DuplicateUnionId`] if two employees hold the same
    /// union id.
    pub fn from_parts(employees: Vec<Employee>, next_id: u64) -> PayrollResult<Self> {
        let mut union_ids = HashSet::new();
        for union_id in employees.iter().filter_map(Employee::union_id) {
            if !union_ids.insert(union_id) {
                warn!(%union_id, "Union id held by more than one stored employee");
                return Err(PayrollError::DuplicateUnionId {
                    union_id: union_id.to_string(),
                });
            }
        }

        let highest = employees
            .iter()
            .filter_map(|e| e.id.strip_prefix(EMPLOYEE_ID_PREFIX))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Ok(Self {
            employees: employees.into_iter().map(|e| (e.id.clone(), e)).collect(),
            next_id: next_id.max(highest + 1).max(1),
        })
    }

    /// The counter value the next [`allocate_id`](Self::allocate_id) call uses.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Hands out a fresh id.
    pub fn allocate_id(&mut self) -> String {
        let id = format!("{}{}", EMPLOYEE_ID_PREFIX, self.next_id);
        self.next_id += 1;
        id
    }

    /// Adds or replaces an employee.
    pub fn insert(&mut self, employee: Employee) {
        debug!(employee_id = %employee.id, "Storing employee");
        self.employees.insert(employee.id.clone(), employee);
    }

    /// Removes an employee, returning it.
    pub fn remove(&mut self, id: &str) -> PayrollResult<Employee> {
        self.employees
            .remove(id)
            .ok_or_else(|| PayrollError::EmployeeNotFound { id: id.to_string() })
    }

    /// Looks up an employee by id.
    pub fn get(&self, id: &str) -> PayrollResult<&Employee> {
        self.employees
            .get(id)
            .ok_or_else(|| PayrollError::EmployeeNotFound { id: id.to_string() })
    }

    /// Looks up an employee by id for modification.
    pub fn get_mut(&mut self, id: &str) -> PayrollResult<&mut Employee> {
        self.employees
            .get_mut(id)
            .ok_or_else(|| PayrollError::EmployeeNotFound { id: id.to_string() })
    }

    /// Finds the union member holding `union_id`.
    pub fn find_union_member_mut(&mut self, union_id: &str) -> PayrollResult<&mut Employee> {
        self.employees
            .values_mut()
            .find(|e| e.union_id() == Some(union_id))
            .ok_or_else(|| PayrollError::UnionMemberNotFound {
                union_id: union_id.to_string(),
            })
    }

    /// Fails if any employee other than `except` already holds `union_id`.
    pub fn ensure_union_id_available(&self, union_id: &str, except: &str) -> PayrollResult<()> {
        let taken = self
            .employees
            .values()
            .any(|e| e.id != except && e.union_id() == Some(union_id));
        if taken {
            return Err(PayrollError::DuplicateUnionId {
                union_id: union_id.to_string(),
            });
        }
        Ok(())
    }

    /// The id of the `index`-th (1-based) employee named `name`, compared
    /// case-insensitively, in id allocation order.
    pub fn find_by_name(&self, name: &str, index: usize) -> PayrollResult<String> {
        let needle = name.to_lowercase();
        let mut matches: Vec<&Employee> = self
            .employees
            .values()
            .filter(|e| e.name.to_lowercase() == needle)
            .collect();
        if matches.is_empty() {
            return Err(PayrollError::NameNotFound {
                name: name.to_string(),
            });
        }
        matches.sort_by_key(|e| id_sequence(&e.id));

        index
            .checked_sub(1)
            .and_then(|i| matches.get(i))
            .map(|e| e.id.clone())
            .ok_or_else(|| PayrollError::InvalidNameIndex {
                name: name.to_string(),
                index,
            })
    }

    /// Iterates over every employee in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Employee> {
        self.employees.values()
    }

    /// Number of employees.
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// Returns true if the directory has no employees.
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Removes every employee and restarts ids at `EMP1`.
    pub fn clear(&mut self) {
        self.employees.clear();
        self.next_id = 1;
    }
}

/// Numeric part of an allocated id, for ordering `EMP2` before `EMP10`.
fn id_sequence(id: &str) -> (u64, String) {
    let sequence = id
        .strip_prefix(EMPLOYEE_ID_PREFIX)
        .and_then(|n| n.parse::<u64>().ok())
        .unwrap_or(u64::MAX);
    (sequence, id.to_string())
}
