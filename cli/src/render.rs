//! Plain-text rendering for terminal output

use capability_review::{StatusCounts, Submission};

/// One line per submission: id, status, company, owner and creation time
pub fn summary_line(submission: &Submission) -> String {
    format!(
        "{} [{}] {} - {} ({})",
        submission.id,
        submission.status,
        submission
            .profile
            .company_name
            .as_deref()
            .unwrap_or("(unnamed company)"),
        submission
            .submitted_by_username
            .as_deref()
            .unwrap_or("unknown"),
        submission.created_at.format("%Y-%m-%d %H:%M")
    )
}

pub fn stats(counts: &StatusCounts) -> String {
    format!(
        "total: {}\npending: {}\napproved: {}\nrejected: {}",
        counts.total, counts.pending, counts.approved, counts.rejected
    )
}
