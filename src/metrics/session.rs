use std::time::{Duration, Instant};

/// Session-scoped stats shown in the header: how many runs this session has
/// seen, the best score among them, and how long the current run has been
/// going. Nothing here is persisted.
pub struct SessionStats {
    run_started: Instant,
    elapsed: Duration,
    pub runs: u32,
    pub high_score: u32,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            run_started: Instant::now(),
            elapsed: Duration::ZERO,
            runs: 1,
            high_score: 0,
        }
    }

    /// Refresh the elapsed clock; called once per rendered frame
    pub fn update(&mut self) {
        self.elapsed = self.run_started.elapsed();
    }

    /// Record a loss: the finished run's score counts toward the high
    /// score, and the clock restarts with the fresh run
    pub fn on_restart(&mut self, final_score: u32) {
        self.runs += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
        self.run_started = Instant::now();
        self.elapsed = Duration::ZERO;
    }

    /// Current run time as mm:ss
    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}
