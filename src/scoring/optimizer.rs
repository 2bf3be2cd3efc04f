use super::average::weighted_average;
use crate::records::CourseRecord;

/// Minimum grade a current-term course needs to qualify for a pass/fail
/// conversion. Converting a failing course to "pass" is not a valid policy
/// action; those stay numeric no matter the limit.
pub const PASS_ELIGIBLE_MIN: f64 = 55.0;

/// Outcome of a pass/fail search.
#[derive(Debug, Clone)]
pub struct PassPlan {
    /// Weighted average with no conversions applied
    pub baseline: f64,
    /// Best weighted average found
    pub best_average: f64,
    /// Courses to convert, in ledger order. Empty when no conversion
    /// strictly beats the baseline.
    pub converted: Vec<CourseRecord>,
}

impl PassPlan {
    fn keep_everything(baseline: f64) -> Self {
        Self {
            baseline,
            best_average: baseline,
            converted: Vec::new(),
        }
    }

    /// Gain over the no-conversion baseline
    pub fn gain(&self) -> f64 {
        self.best_average - self.baseline
    }
}

/// Find the set of pass/fail conversions that maximizes the weighted average.
///
/// Past courses always count; eligible current courses (grade >=
/// [`PASS_ELIGIBLE_MIN`]) may be dropped from the computation, at most
/// `pass_limit` of them. Every allowed subset is scored and the best one
/// kept. Replacement happens only on a strict improvement, so among equally
/// good subsets the first one enumerated wins: smaller subsets before larger
/// ones, and within a size, lexicographic order over the eligible courses'
/// ledger order. Exhaustive by design; fine at classroom scale, the caller
/// is responsible for keeping the eligible set small enough to be responsive.
pub fn best_pass_plan(
    past: &[CourseRecord],
    current: &[CourseRecord],
    pass_limit: usize,
) -> PassPlan {
    let universe: Vec<&CourseRecord> = past.iter().chain(current.iter()).collect();
    let baseline = weighted_average(universe.iter().copied());

    if pass_limit == 0 || current.is_empty() {
        return PassPlan::keep_everything(baseline);
    }

    let eligible: Vec<&CourseRecord> = current
        .iter()
        .filter(|c| c.grade >= PASS_ELIGIBLE_MIN)
        .collect();
    if eligible.is_empty() {
        return PassPlan::keep_everything(baseline);
    }

    let cap = pass_limit.min(eligible.len());

    // The size-0 subset is the baseline itself, so the search starts at 1.
    let mut best = baseline;
    let mut best_subset: Vec<&CourseRecord> = Vec::new();
    for size in 1..=cap {
        for combo in Combinations::new(eligible.len(), size) {
            let dropped: Vec<u64> = combo.iter().map(|&i| eligible[i].id).collect();
            let candidate = weighted_average(
                universe
                    .iter()
                    .copied()
                    .filter(|c| !dropped.contains(&c.id)),
            );
            if candidate > best {
                best = candidate;
                best_subset = combo.iter().map(|&i| eligible[i]).collect();
            }
        }
    }

    PassPlan {
        baseline,
        best_average: best,
        converted: best_subset.into_iter().cloned().collect(),
    }
}

/// Lazy lexicographic enumeration of the size-`r` index combinations of
/// `0..n`. Yields one `Vec<usize>` at a time; nothing is materialized up
/// front, so large search spaces stay cheap per step.
struct Combinations {
    n: usize,
    r: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    fn new(n: usize, r: usize) -> Self {
        Self {
            n,
            r,
            indices: Vec::new(),
            started: false,
            done: r > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }

        if !self.started {
            self.started = true;
            self.indices = (0..self.r).collect();
            return Some(self.indices.clone());
        }

        // Advance the rightmost index that still has room, then reset
        // everything to its right to the run just above it.
        let mut i = self.r;
        loop {
            if i == 0 {
                self.done = true;
                return None;
            }
            i -= 1;
            if self.indices[i] < self.n - self.r + i {
                break;
            }
        }
        self.indices[i] += 1;
        for j in i + 1..self.r {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(self.indices.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Term;
    use chrono::Utc;

    fn course(id: u64, grade: f64, credits: f64, term: Term) -> CourseRecord {
        CourseRecord {
            id,
            name: format!("Course {}", id),
            grade,
            credits,
            term,
            added_at: Utc::now(),
        }
    }

    fn current(id: u64, grade: f64, credits: f64) -> CourseRecord {
        course(id, grade, credits, Term::Current)
    }

    fn past(id: u64, grade: f64, credits: f64) -> CourseRecord {
        course(id, grade, credits, Term::Past)
    }

    fn ids(plan: &PassPlan) -> Vec<u64> {
        plan.converted.iter().map(|c| c.id).collect()
    }

    // Combinations generator

    #[test]
    fn test_combinations_lexicographic_order() {
        let combos: Vec<Vec<usize>> = Combinations::new(4, 2).collect();
        assert_eq!(
            combos,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3],
            ]
        );
    }

    #[test]
    fn test_combinations_size_zero_yields_one_empty() {
        let combos: Vec<Vec<usize>> = Combinations::new(3, 0).collect();
        assert_eq!(combos, vec![Vec::<usize>::new()]);
    }

    #[test]
    fn test_combinations_r_larger_than_n_is_empty() {
        let combos: Vec<Vec<usize>> = Combinations::new(2, 3).collect();
        assert!(combos.is_empty());
    }

    #[test]
    fn test_combinations_full_size_single() {
        let combos: Vec<Vec<usize>> = Combinations::new(3, 3).collect();
        assert_eq!(combos, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_combinations_count_matches_binomial() {
        // C(6, 3) = 20
        assert_eq!(Combinations::new(6, 3).count(), 20);
    }

    // Plan edge cases

    #[test]
    fn test_plan_zero_limit_keeps_everything() {
        let p = vec![past(1, 80.0, 3.0)];
        let c = vec![current(2, 60.0, 3.0)];
        let plan = best_pass_plan(&p, &c, 0);
        assert!(plan.converted.is_empty());
        assert_eq!(plan.best_average, plan.baseline);
        assert_eq!(plan.baseline, 70.0);
    }

    #[test]
    fn test_plan_no_current_courses() {
        let p = vec![past(1, 80.0, 3.0), past(2, 90.0, 3.0)];
        let plan = best_pass_plan(&p, &[], 3);
        assert!(plan.converted.is_empty());
        assert_eq!(plan.best_average, 85.0);
    }

    #[test]
    fn test_plan_empty_everything() {
        let plan = best_pass_plan(&[], &[], 2);
        assert!(plan.converted.is_empty());
        assert_eq!(plan.best_average, 0.0);
    }

    #[test]
    fn test_plan_no_eligible_candidates() {
        // Both current courses are failing; nothing may be converted.
        let p = vec![past(1, 90.0, 3.0)];
        let c = vec![current(2, 40.0, 3.0), current(3, 54.9, 3.0)];
        let plan = best_pass_plan(&p, &c, 2);
        assert!(plan.converted.is_empty());
        assert_eq!(plan.best_average, plan.baseline);
    }

    #[test]
    fn test_plan_threshold_boundary_is_eligible() {
        let p = vec![past(1, 90.0, 3.0)];
        let c = vec![current(2, 55.0, 3.0)];
        let plan = best_pass_plan(&p, &c, 1);
        // (270 + 165) / 6 = 72.5 baseline; dropping the 55 leaves 90.
        assert_eq!(plan.baseline, 72.5);
        assert_eq!(plan.best_average, 90.0);
        assert_eq!(ids(&plan), vec![2]);
    }

    #[test]
    fn test_plan_end_to_end_scenario() {
        // Current term: 90, 40 and 60, three credits each. The 40 is below
        // the threshold, so only the 90 and the 60 are candidates. With a
        // limit of one, dropping the 60 wins.
        let c = vec![
            current(1, 90.0, 3.0),
            current(2, 40.0, 3.0),
            current(3, 60.0, 3.0),
        ];
        let plan = best_pass_plan(&[], &c, 1);

        let baseline = (90.0 * 3.0 + 40.0 * 3.0 + 60.0 * 3.0) / 9.0;
        assert!((plan.baseline - baseline).abs() < 1e-9);
        // Dropping the 60: (270 + 120) / 6 = 65. Dropping the 90: 50.
        assert!((plan.best_average - 65.0).abs() < 1e-9);
        assert_eq!(ids(&plan), vec![3]);
        assert!(plan.gain() > 0.0);
    }

    #[test]
    fn test_plan_never_converts_failing_course() {
        let c = vec![
            current(1, 54.0, 3.0),
            current(2, 70.0, 3.0),
            current(3, 30.0, 5.0),
        ];
        let plan = best_pass_plan(&[], &c, 3);
        for converted in &plan.converted {
            assert!(converted.grade >= PASS_ELIGIBLE_MIN);
        }
    }

    #[test]
    fn test_plan_subset_never_exceeds_cap() {
        let p = vec![past(1, 95.0, 4.0)];
        let c = vec![
            current(2, 56.0, 3.0),
            current(3, 57.0, 3.0),
            current(4, 58.0, 3.0),
        ];
        let plan = best_pass_plan(&p, &c, 2);
        assert!(plan.converted.len() <= 2);

        // Limit above the eligible count is clamped, not an error
        let plan = best_pass_plan(&p, &c, 10);
        assert!(plan.converted.len() <= 3);
    }

    #[test]
    fn test_plan_converts_multiple_when_beneficial() {
        let p = vec![past(1, 95.0, 4.0)];
        let c = vec![current(2, 60.0, 3.0), current(3, 58.0, 3.0)];
        let plan = best_pass_plan(&p, &c, 2);
        // Dropping both leaves the lone 95.
        assert_eq!(plan.best_average, 95.0);
        assert_eq!(ids(&plan), vec![2, 3]);
    }

    #[test]
    fn test_plan_tie_prefers_smaller_subset() {
        // The zero-credit eligible course changes nothing when dropped, so
        // dropping it ties the baseline. Strict improvement only: the empty
        // subset stands.
        let p = vec![past(1, 50.0, 3.0)];
        let c = vec![current(2, 60.0, 0.0)];
        let plan = best_pass_plan(&p, &c, 1);
        assert!(plan.converted.is_empty());
        assert_eq!(plan.best_average, plan.baseline);
    }

    #[test]
    fn test_plan_tie_prefers_earlier_course() {
        // Two identical candidates; dropping either scores the same. The
        // one earlier in ledger order is enumerated first and kept.
        let p = vec![past(1, 90.0, 3.0)];
        let c = vec![current(2, 60.0, 3.0), current(3, 60.0, 3.0)];
        let plan = best_pass_plan(&p, &c, 1);
        assert_eq!(ids(&plan), vec![2]);
    }

    #[test]
    fn test_plan_dropping_everything_never_beats_positive_baseline() {
        // Removing the only course would leave an empty universe scoring
        // 0.0, which can't strictly beat it.
        let c = vec![current(1, 100.0, 3.0)];
        let plan = best_pass_plan(&[], &c, 1);
        assert!(plan.converted.is_empty());
        assert_eq!(plan.best_average, 100.0);
    }

    #[test]
    fn test_plan_deterministic() {
        let p = vec![past(1, 77.0, 4.0), past(2, 82.0, 2.0)];
        let c = vec![
            current(3, 61.0, 3.0),
            current(4, 61.0, 3.0),
            current(5, 48.0, 3.0),
        ];
        let a = best_pass_plan(&p, &c, 2);
        let b = best_pass_plan(&p, &c, 2);
        assert_eq!(a.best_average, b.best_average);
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn test_plan_does_not_mutate_inputs() {
        let p = vec![past(1, 77.0, 4.0)];
        let c = vec![current(2, 61.0, 3.0)];
        let p_before: Vec<u64> = p.iter().map(|x| x.id).collect();
        let c_before: Vec<u64> = c.iter().map(|x| x.id).collect();
        let _ = best_pass_plan(&p, &c, 1);
        assert_eq!(p_before, p.iter().map(|x| x.id).collect::<Vec<_>>());
        assert_eq!(c_before, c.iter().map(|x| x.id).collect::<Vec<_>>());
    }
}
