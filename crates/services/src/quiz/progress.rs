/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizProgress {
    pub total: usize,
    /// 1-based position of the current question; 0 for an empty quiz.
    pub position: usize,
    pub answered: usize,
    pub score: u32,
    pub percent: f64,
    pub is_complete: bool,
}
