use crate::records::CourseRecord;

/// Credit-weighted average over any collection of courses.
///
/// Computes `sum(grade * credits) / sum(credits)`. An empty collection or a
/// zero credit total yields `0.0` - that is the defined zero-division
/// policy, not a failure.
pub fn weighted_average<'a, I>(courses: I) -> f64
where
    I: IntoIterator<Item = &'a CourseRecord>,
{
    let mut points = 0.0;
    let mut credits = 0.0;
    for course in courses {
        points += course.weighted_points();
        credits += course.credits;
    }

    if credits == 0.0 {
        return 0.0;
    }
    points / credits
}

/// How much the overall average would rise if `target` were a perfect 100.
///
/// Scores `courses` as-is, then with the record matching `target.id` graded
/// 100.0 (credits unchanged), and returns the difference. If no record
/// matches `target.id` the hypothetical equals the current average and the
/// lift is `0.0`; a missing target is a defined no-op, not an error.
pub fn single_course_lift(target: &CourseRecord, courses: &[CourseRecord]) -> f64 {
    let current = weighted_average(courses);

    let mut points = 0.0;
    let mut credits = 0.0;
    for course in courses {
        if course.id == target.id {
            points += 100.0 * course.credits;
        } else {
            points += course.weighted_points();
        }
        credits += course.credits;
    }

    let hypothetical = if credits == 0.0 { 0.0 } else { points / credits };
    hypothetical - current
}
