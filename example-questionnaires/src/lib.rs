pub mod course_evaluation;
pub mod workshop_feedback;

// Re-export course_evaluation items
pub use course_evaluation::{
    ATTENDANCE, COMMENTS, OVERALL, PACE, PACE_BY_SEMESTER, SEMESTER, course_evaluation,
    course_evaluation_with_box_size,
};

// Re-export workshop_feedback items
pub use workshop_feedback::{RATING, workshop_feedback};
