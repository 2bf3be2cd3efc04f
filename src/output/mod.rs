pub mod formatter;

pub use formatter::{
    format_age, format_average_summary, format_course_table, format_grade, format_plan,
    format_tsv, score_courses, should_use_colors, ScoredCourse,
};
