use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    /// Finished course, grade locked in. Always counts toward the average.
    Past,
    /// In-progress course, candidate for a pass/fail conversion.
    Current,
}

impl Term {
    pub fn label(&self) -> &'static str {
        match self {
            Term::Past => "past",
            Term::Current => "current",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Ledger-assigned identifier, stable for the record's lifetime.
    /// Membership tests use this, never position or pointer identity.
    pub id: u64,
    pub name: String,
    /// Numeric score, 0-100 by convention. Out-of-range values are not
    /// rejected; behavior is only documented for this domain.
    pub grade: f64,
    /// Non-negative credit weight. Zero-credit courses contribute nothing
    /// to either side of a weighted average.
    pub credits: f64,
    pub term: Term,
    pub added_at: DateTime<Utc>,
}

impl CourseRecord {
    /// Age since the record was added
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.added_at
    }

    pub fn weighted_points(&self) -> f64 {
        self.grade * self.credits
    }
}

/// The persisted course collection. Insertion order is preserved; the
/// optimizer's tie-breaks depend on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub version: u32,
    #[serde(default)]
    pub next_id: u64,
    #[serde(default)]
    pub courses: Vec<CourseRecord>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Create a new empty ledger with version 1
    pub fn new() -> Self {
        Self {
            version: 1,
            next_id: 1,
            courses: Vec::new(),
        }
    }

    /// Append a course and return its assigned id
    pub fn add_course(&mut self, name: String, grade: f64, credits: f64, term: Term) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.courses.push(CourseRecord {
            id,
            name,
            grade,
            credits,
            term,
            added_at: Utc::now(),
        });
        id
    }

    /// Re-insert a previously removed course (undo path). The id is kept;
    /// `next_id` is bumped past it so it can never be handed out twice.
    pub fn restore_course(&mut self, course: CourseRecord, position: usize) {
        if course.id >= self.next_id {
            self.next_id = course.id + 1;
        }
        let position = position.min(self.courses.len());
        self.courses.insert(position, course);
    }

    /// Remove a course by id. Returns the record and its former position,
    /// or None if no course had that id.
    pub fn remove_course(&mut self, id: u64) -> Option<(CourseRecord, usize)> {
        let pos = self.courses.iter().position(|c| c.id == id)?;
        Some((self.courses.remove(pos), pos))
    }

    pub fn course(&self, id: u64) -> Option<&CourseRecord> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn course_mut(&mut self, id: u64) -> Option<&mut CourseRecord> {
        self.courses.iter_mut().find(|c| c.id == id)
    }

    /// Courses for one term, in ledger order
    pub fn term_courses(&self, term: Term) -> Vec<CourseRecord> {
        self.courses
            .iter()
            .filter(|c| c.term == term)
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ledger_empty() {
        let ledger = Ledger::new();
        assert_eq!(ledger.version, 1);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut ledger = Ledger::new();
        let a = ledger.add_course("Calculus".to_string(), 87.0, 5.0, Term::Current);
        let b = ledger.add_course("Physics".to_string(), 72.0, 3.0, Term::Current);
        assert_ne!(a, b);
        assert_eq!(b, a + 1);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_remove_returns_record_and_position() {
        let mut ledger = Ledger::new();
        ledger.add_course("Calculus".to_string(), 87.0, 5.0, Term::Past);
        let id = ledger.add_course("Physics".to_string(), 72.0, 3.0, Term::Current);

        let (removed, pos) = ledger.remove_course(id).unwrap();
        assert_eq!(removed.name, "Physics");
        assert_eq!(pos, 1);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_remove_missing_id() {
        let mut ledger = Ledger::new();
        assert!(ledger.remove_course(42).is_none());
    }

    #[test]
    fn test_restore_keeps_id_unique() {
        let mut ledger = Ledger::new();
        let id = ledger.add_course("Calculus".to_string(), 87.0, 5.0, Term::Current);
        let (removed, pos) = ledger.remove_course(id).unwrap();

        ledger.restore_course(removed, pos);
        let next = ledger.add_course("Physics".to_string(), 72.0, 3.0, Term::Current);
        assert_ne!(next, id);
        assert_eq!(ledger.course(id).unwrap().name, "Calculus");
    }

    #[test]
    fn test_term_courses_preserve_order() {
        let mut ledger = Ledger::new();
        ledger.add_course("A".to_string(), 90.0, 3.0, Term::Current);
        ledger.add_course("B".to_string(), 80.0, 3.0, Term::Past);
        ledger.add_course("C".to_string(), 70.0, 3.0, Term::Current);

        let current = ledger.term_courses(Term::Current);
        assert_eq!(current.len(), 2);
        assert_eq!(current[0].name, "A");
        assert_eq!(current[1].name, "C");
    }

    #[test]
    fn test_weighted_points() {
        let mut ledger = Ledger::new();
        let id = ledger.add_course("A".to_string(), 90.0, 3.0, Term::Current);
        assert_eq!(ledger.course(id).unwrap().weighted_points(), 270.0);
    }
}
