use crate::config::Config;
use crate::records::{CourseRecord, Ledger, Term};
use crate::scoring::PassPlan;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Instant;

const MAX_UNDO: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Current,
    Past,
}

impl View {
    pub fn term(&self) -> Term {
        match self {
            View::Current => Term::Current,
            View::Past => Term::Past,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    CourseInput,
    Help,
    PlanView,
}

#[derive(Debug, Clone)]
pub enum UndoAction {
    Added { id: u64, name: String },
    Removed { course: CourseRecord, position: usize },
    Edited { before: CourseRecord },
}

pub struct App {
    pub ledger: Ledger,
    pub ledger_path: PathBuf,
    pub table_state: ratatui::widgets::TableState,
    pub current_view: View,
    pub input_mode: InputMode,
    pub course_input: String,
    /// Some(id) while editing an existing course, None while adding
    pub editing_id: Option<u64>,
    pub flash_message: Option<(String, Instant)>,
    pub undo_stack: VecDeque<UndoAction>,
    pub should_quit: bool,
    pub config: Config,
    pub plan: Option<PassPlan>,
    /// Set by the 'p' key; the event loop picks it up and spawns the search
    pub plan_requested: bool,
    pub is_planning: bool,
    pub spinner_frame: usize,
}

impl App {
    pub fn new(ledger: Ledger, ledger_path: PathBuf, config: Config) -> Self {
        let mut table_state = ratatui::widgets::TableState::default();
        if ledger
            .courses
            .iter()
            .any(|c| c.term == Term::Current)
        {
            table_state.select(Some(0));
        }

        Self {
            ledger,
            ledger_path,
            table_state,
            current_view: View::Current,
            input_mode: InputMode::Normal,
            course_input: String::new(),
            editing_id: None,
            flash_message: None,
            undo_stack: VecDeque::new(),
            should_quit: false,
            config,
            plan: None,
            plan_requested: false,
            is_planning: false,
            spinner_frame: 0,
        }
    }

    /// Courses in the active view, in ledger order
    pub fn visible_courses(&self) -> Vec<&CourseRecord> {
        let term = self.current_view.term();
        self.ledger
            .courses
            .iter()
            .filter(|c| c.term == term)
            .collect()
    }

    pub fn selected_course(&self) -> Option<&CourseRecord> {
        let courses = self.visible_courses();
        self.table_state
            .selected()
            .and_then(|i| courses.get(i).copied())
    }

    pub fn next_row(&mut self) {
        let len = self.visible_courses().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.visible_courses().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    /// Toggle between Current and Past views
    pub fn toggle_view(&mut self) {
        self.current_view = match self.current_view {
            View::Current => View::Past,
            View::Past => View::Current,
        };
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        if self.visible_courses().is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(0));
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_courses().len();
        if len == 0 {
            self.table_state.select(None);
        } else if let Some(selected) = self.table_state.selected() {
            if selected >= len {
                self.table_state.select(Some(len - 1));
            }
        } else {
            self.table_state.select(Some(0));
        }
    }

    pub fn push_undo(&mut self, action: UndoAction) {
        self.undo_stack.push_front(action);
        if self.undo_stack.len() > MAX_UNDO {
            self.undo_stack.pop_back();
        }
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    pub fn overall_average(&self) -> f64 {
        crate::scoring::weighted_average(&self.ledger.courses)
    }

    /// Save the ledger to disk, flashing on failure. Returns false when the
    /// save failed (callers then skip the success flash).
    fn persist(&mut self) -> bool {
        if let Err(e) = crate::records::save_ledger(&self.ledger_path, &self.ledger) {
            self.show_flash(format!("Failed to save courses: {}", e));
            false
        } else {
            true
        }
    }

    /// Start input mode to add a course to the active view's term
    pub fn start_add_input(&mut self) {
        self.input_mode = InputMode::CourseInput;
        self.editing_id = None;
        self.course_input.clear();
    }

    /// Start input mode prefilled with the selected course
    pub fn start_edit_input(&mut self) {
        let (id, prefill) = match self.selected_course() {
            Some(course) => (
                course.id,
                format!(
                    "{} {} {}",
                    course.name,
                    crate::output::format_grade(course.grade),
                    crate::output::format_grade(course.credits)
                ),
            ),
            None => return,
        };
        self.input_mode = InputMode::CourseInput;
        self.editing_id = Some(id);
        self.course_input = prefill;
    }

    /// Confirm and apply the course input (add or edit)
    pub fn confirm_course_input(&mut self) {
        let (name, grade, credits) = match parse_course_input(&self.course_input) {
            Some(parsed) => parsed,
            None => {
                self.show_flash(format!(
                    "Invalid input: '{}' (want: name grade credits)",
                    self.course_input
                ));
                self.input_mode = InputMode::Normal;
                self.course_input.clear();
                return;
            }
        };

        match self.editing_id.take() {
            Some(id) => {
                let before = match self.ledger.course(id) {
                    Some(course) => course.clone(),
                    None => {
                        self.input_mode = InputMode::Normal;
                        return;
                    }
                };
                if let Some(course) = self.ledger.course_mut(id) {
                    course.name = name.clone();
                    course.grade = grade;
                    course.credits = credits;
                }
                if self.persist() {
                    self.push_undo(UndoAction::Edited { before });
                    self.show_flash(format!("Updated: {} (z to undo)", name));
                } else {
                    // Save failed; put the old values back
                    if let Some(course) = self.ledger.course_mut(id) {
                        *course = before;
                    }
                }
            }
            None => {
                let term = self.current_view.term();
                let id = self.ledger.add_course(name.clone(), grade, credits, term);
                if self.persist() {
                    self.push_undo(UndoAction::Added { id, name: name.clone() });
                    self.show_flash(format!("Added: {} (z to undo)", name));
                }
                self.clamp_selection();
            }
        }

        self.input_mode = InputMode::Normal;
        self.course_input.clear();
    }

    /// Cancel course input
    pub fn cancel_course_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.editing_id = None;
        self.course_input.clear();
    }

    /// Remove the selected course
    pub fn remove_selected(&mut self) {
        let id = match self.selected_course() {
            Some(course) => course.id,
            None => return,
        };

        let (course, position) = match self.ledger.remove_course(id) {
            Some(removed) => removed,
            None => return,
        };

        let name = course.name.clone();
        if self.persist() {
            self.push_undo(UndoAction::Removed { course, position });
            self.show_flash(format!("Removed: {} (z to undo)", name));
        } else {
            // Save failed; put the record back rather than losing it
            self.ledger.restore_course(course, position);
        }
        self.clamp_selection();
    }

    /// Undo the last add, remove or edit
    pub fn undo_last(&mut self) {
        let action = match self.undo_stack.pop_front() {
            Some(action) => action,
            None => {
                self.show_flash("Nothing to undo".to_string());
                return;
            }
        };

        match action {
            UndoAction::Added { id, name } => {
                self.ledger.remove_course(id);
                if self.persist() {
                    self.show_flash(format!("Undid add: {}", name));
                }
            }
            UndoAction::Removed { course, position } => {
                let name = course.name.clone();
                self.ledger.restore_course(course, position);
                if self.persist() {
                    self.show_flash(format!("Undid remove: {}", name));
                }
            }
            UndoAction::Edited { before } => {
                let name = before.name.clone();
                let id = before.id;
                if let Some(course) = self.ledger.course_mut(id) {
                    *course = before;
                }
                if self.persist() {
                    self.show_flash(format!("Undid edit: {}", name));
                }
            }
        }
        self.clamp_selection();
    }

    /// Request a pass/fail plan; the event loop spawns the actual search
    pub fn request_plan(&mut self) {
        if self.is_planning {
            return;
        }
        self.plan_requested = true;
    }

    pub fn show_plan(&mut self, plan: PassPlan) {
        self.plan = Some(plan);
        self.input_mode = InputMode::PlanView;
    }

    pub fn dismiss_plan(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }
}

/// Parse a "name grade credits" line. The name may contain spaces; the last
/// two whitespace-separated tokens are the grade and the credits.
pub fn parse_course_input(input: &str) -> Option<(String, f64, f64)> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.len() < 3 {
        return None;
    }

    let credits: f64 = tokens[tokens.len() - 1].parse().ok()?;
    let grade: f64 = tokens[tokens.len() - 2].parse().ok()?;
    if credits < 0.0 || !credits.is_finite() || !grade.is_finite() {
        return None;
    }

    let name = tokens[..tokens.len() - 2].join(" ");
    Some((name, grade, credits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(
            parse_course_input("Calculus 87 5"),
            Some(("Calculus".to_string(), 87.0, 5.0))
        );
    }

    #[test]
    fn test_parse_name_with_spaces() {
        assert_eq!(
            parse_course_input("Linear Algebra II 72.5 3"),
            Some(("Linear Algebra II".to_string(), 72.5, 3.0))
        );
    }

    #[test]
    fn test_parse_too_few_tokens() {
        assert!(parse_course_input("Calculus 87").is_none());
        assert!(parse_course_input("").is_none());
    }

    #[test]
    fn test_parse_non_numeric_rejected() {
        assert!(parse_course_input("Calculus eighty 5").is_none());
        assert!(parse_course_input("Calculus 87 five").is_none());
    }

    #[test]
    fn test_parse_negative_credits_rejected() {
        assert!(parse_course_input("Calculus 87 -1").is_none());
    }

    #[test]
    fn test_visible_courses_follow_view() {
        let mut ledger = Ledger::new();
        ledger.add_course("A".to_string(), 90.0, 3.0, Term::Current);
        ledger.add_course("B".to_string(), 80.0, 3.0, Term::Past);

        let mut app = App::new(
            ledger,
            std::env::temp_dir().join("gpa_bro_test_app.json"),
            Config::default(),
        );
        assert_eq!(app.visible_courses().len(), 1);
        assert_eq!(app.visible_courses()[0].name, "A");

        app.toggle_view();
        assert_eq!(app.visible_courses()[0].name, "B");
    }

    #[test]
    fn test_row_navigation_wraps() {
        let mut ledger = Ledger::new();
        ledger.add_course("A".to_string(), 90.0, 3.0, Term::Current);
        ledger.add_course("B".to_string(), 80.0, 3.0, Term::Current);

        let mut app = App::new(
            ledger,
            std::env::temp_dir().join("gpa_bro_test_nav.json"),
            Config::default(),
        );
        assert_eq!(app.table_state.selected(), Some(0));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(1));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(0));
        app.previous_row();
        assert_eq!(app.table_state.selected(), Some(1));
    }

    #[test]
    fn test_edit_reverted_when_save_fails() {
        // A regular file where the ledger's parent directory should be
        // makes every save fail
        let blocker = std::env::temp_dir().join("gpa_bro_test_edit_blocker");
        std::fs::write(&blocker, b"").unwrap();

        let mut ledger = Ledger::new();
        let id = ledger.add_course("Calculus".to_string(), 87.0, 5.0, Term::Current);
        let mut app = App::new(ledger, blocker.join("courses.json"), Config::default());

        app.start_edit_input();
        app.course_input = "Calculus 95 5".to_string();
        app.confirm_course_input();

        let course = app.ledger.course(id).unwrap();
        assert_eq!(course.grade, 87.0);
        assert!(app.undo_stack.is_empty());
        let (msg, _) = app.flash_message.as_ref().unwrap();
        assert!(msg.starts_with("Failed to save"));

        let _ = std::fs::remove_file(&blocker);
    }

    #[test]
    fn test_undo_stack_bounded() {
        let mut app = App::new(
            Ledger::new(),
            std::env::temp_dir().join("gpa_bro_test_undo.json"),
            Config::default(),
        );
        for i in 0..60 {
            app.push_undo(UndoAction::Added {
                id: i,
                name: format!("C{}", i),
            });
        }
        assert_eq!(app.undo_stack.len(), MAX_UNDO);
    }
}
