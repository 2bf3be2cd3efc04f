pub mod average;
pub mod optimizer;

pub use average::{single_course_lift, weighted_average};
pub use optimizer::{best_pass_plan, PassPlan, PASS_ELIGIBLE_MIN};
