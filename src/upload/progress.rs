use std::fmt;

/// バッチ進捗（成功したファイルのみ数える）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    completed: usize,
    total: usize,
}

impl BatchProgress {
    pub fn new(total: usize) -> Self {
        Self { completed: 0, total }
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// round(completed / total * 100)、空バッチは0
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.completed as f64 / self.total as f64 * 100.0).round() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }

    pub(crate) fn advance(&mut self) {
        debug_assert!(self.completed < self.total);
        self.completed += 1;
    }
}

impl fmt::Display for BatchProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.completed, self.total, self.percent())
    }
}
