use std::io::IsTerminal;

use chrono::Duration;
use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::records::{CourseRecord, Term};
use crate::scoring::{PassPlan, PASS_ELIGIBLE_MIN};

/// A course with its computed lift (how much a perfect grade in it would
/// raise the overall average), ready for display
pub struct ScoredCourse<'a> {
    pub course: &'a CourseRecord,
    pub lift: f64,
}

/// Compute display rows for a course list: each course paired with its lift
/// over the whole collection.
pub fn score_courses(courses: &[CourseRecord]) -> Vec<ScoredCourse<'_>> {
    courses
        .iter()
        .map(|course| ScoredCourse {
            lift: crate::scoring::single_course_lift(course, courses),
            course,
        })
        .collect()
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a grade or average with up to two decimals, trailing zeros trimmed
/// (81.25 -> "81.25", 90.00 -> "90", 21.666... -> "21.67")
pub fn format_grade(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a course name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format courses as a table with columns: Index, Term, Grade, Credits, Lift, Age, Name
/// Index column: 3 chars (fits "99."), right-aligned
/// Grade and lift are right-aligned, 6 chars wide (fits "100.00")
pub fn format_course_table(rows: &[ScoredCourse], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No courses tracked yet. Add one with `gpa-bro add`.".to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 3;
    let grade_width = 6;
    let separator = "  ";
    // term(7) + grade(6) + credits(4) + lift(7) + age(4) + separators
    let fixed_width = index_width + 1 + 7 + grade_width + 4 + 7 + 4 + separator.len() * 6;

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let index_str = format!("{:>2}.", idx + 1);
            let term_str = format!("{:<7}", row.course.term.label());
            let grade_str = format!("{:>width$}", format_grade(row.course.grade), width = grade_width);
            let credits_str = format!("{:>4}", format_grade(row.course.credits));
            let lift_str = format!("{:>7}", format!("+{}", format_grade(row.lift)));
            let age_str = format!("{:>4}", format_age(row.course.age()));

            let name = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_name(&row.course.name, width - fixed_width)
                } else {
                    // Very narrow terminal, show truncated
                    truncate_name(&row.course.name, 20)
                }
            } else {
                // No terminal (pipe), don't truncate
                row.course.name.clone()
            };

            if use_colors {
                let grade_colored = if row.course.grade < PASS_ELIGIBLE_MIN {
                    grade_str.red().to_string()
                } else if row.course.grade >= 85.0 {
                    grade_str.green().to_string()
                } else {
                    grade_str.yellow().to_string()
                };
                format!(
                    "{} {}{}{}{}{}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    term_str.cyan(),
                    separator,
                    grade_colored,
                    separator,
                    credits_str,
                    separator,
                    lift_str.dimmed(),
                    separator,
                    age_str.dimmed(),
                    separator,
                    name.bold()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}{}{}",
                    index_str,
                    term_str,
                    separator,
                    grade_str,
                    separator,
                    credits_str,
                    separator,
                    lift_str,
                    separator,
                    age_str,
                    separator,
                    name
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format courses as tab-separated values for scripting
/// Columns: term, grade, credits, lift, name (no headers, no colors)
pub fn format_tsv(rows: &[ScoredCourse]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                row.course.term.label(),
                format_grade(row.course.grade),
                format_grade(row.course.credits),
                format_grade(row.lift),
                row.course.name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the overall / past / current averages as a short multi-line summary
pub fn format_average_summary(courses: &[CourseRecord], use_colors: bool) -> String {
    let overall = crate::scoring::weighted_average(courses);
    let past: Vec<&CourseRecord> = courses.iter().filter(|c| c.term == Term::Past).collect();
    let current: Vec<&CourseRecord> = courses.iter().filter(|c| c.term == Term::Current).collect();
    let past_avg = crate::scoring::weighted_average(past.iter().copied());
    let current_avg = crate::scoring::weighted_average(current.iter().copied());

    let overall_str = format_grade(overall);
    if use_colors {
        format!(
            "Overall: {}\n  Past ({} courses): {}\n  Current ({} courses): {}",
            overall_str.bold(),
            past.len(),
            format_grade(past_avg),
            current.len(),
            format_grade(current_avg)
        )
    } else {
        format!(
            "Overall: {}\n  Past ({} courses): {}\n  Current ({} courses): {}",
            overall_str,
            past.len(),
            format_grade(past_avg),
            current.len(),
            format_grade(current_avg)
        )
    }
}

/// Format a pass/fail plan as a human-readable recommendation
pub fn format_plan(plan: &PassPlan, use_colors: bool) -> String {
    let baseline = format_grade(plan.baseline);
    let best = format_grade(plan.best_average);
    let gain = format_grade(plan.gain());

    if plan.converted.is_empty() {
        return format!(
            "Current average: {}\nNo conversion beats keeping everything numeric.",
            baseline
        );
    }

    let mut lines = Vec::new();
    if use_colors {
        lines.push(format!(
            "Current average: {}  ->  with conversions: {} ({})",
            baseline,
            best.bold().green().to_string(),
            format!("+{}", gain).green().to_string()
        ));
    } else {
        lines.push(format!(
            "Current average: {}  ->  with conversions: {} (+{})",
            baseline, best, gain
        ));
    }
    lines.push("Convert to pass/fail:".to_string());
    for course in &plan.converted {
        lines.push(format!(
            "  - {} (grade {}, {} credits)",
            course.name,
            format_grade(course.grade),
            format_grade(course.credits)
        ));
    }
    lines.join("\n")
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}
