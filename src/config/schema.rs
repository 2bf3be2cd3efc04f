use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_pass_limit() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// How many current-term courses may be converted to pass/fail in one
    /// plan. Overridable per run with `plan --limit`.
    #[serde(default = "default_pass_limit")]
    pub pass_limit: usize,

    /// Override the course file location (default: ~/.config/gpa-bro/courses.json)
    #[serde(default)]
    pub courses_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pass_limit: default_pass_limit(),
            courses_path: None,
        }
    }
}
