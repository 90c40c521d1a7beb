use std::time::{Duration, Instant};

/// One debounced edit line. The draft tracks every keystroke immediately;
/// the commit only fires once the quiet period has elapsed with no newer
/// edit. Each line owns its own deadline, so keyword edits can never cancel
/// a pending tag commit or the other way round.
#[derive(Debug)]
pub struct DebounceLine<T> {
    draft: T,
    pending: Option<(T, Instant)>,
    quiet: Duration,
}

impl<T: Clone> DebounceLine<T> {
    pub fn new(initial: T, quiet: Duration) -> Self {
        Self {
            draft: initial,
            pending: None,
            quiet,
        }
    }

    /// Record an edit and (re)arm the deadline. A newer edit replaces any
    /// pending commit wholesale.
    pub fn edit(&mut self, value: T, now: Instant) {
        self.draft = value.clone();
        self.pending = Some((value, now + self.quiet));
    }

    /// Explicit clear/reset path: bypasses the timer entirely and returns
    /// the value to commit right away.
    pub fn commit_now(&mut self, value: T) -> T {
        self.draft = value.clone();
        self.pending = None;
        value
    }

    /// Tick poll. Returns the value to commit once the deadline passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, due_at)) if now >= *due_at => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    pub fn draft(&self) -> &T {
        &self.draft
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(500);

    #[test]
    fn rapid_edits_coalesce_into_the_last_value() {
        let start = Instant::now();
        let mut line = DebounceLine::new(String::new(), QUIET);

        line.edit("bot".to_string(), start);
        line.edit("bo".to_string(), start + Duration::from_millis(200));
        line.edit("bots".to_string(), start + Duration::from_millis(400));

        assert_eq!(line.poll(start + Duration::from_millis(850)), None);
        assert_eq!(
            line.poll(start + Duration::from_millis(900)),
            Some("bots".to_string())
        );
        assert_eq!(line.poll(start + Duration::from_millis(2000)), None);
    }

    #[test]
    fn draft_reflects_keystrokes_before_the_commit() {
        let start = Instant::now();
        let mut line = DebounceLine::new(String::new(), QUIET);

        line.edit("b".to_string(), start);
        assert_eq!(line.draft(), "b");
        assert!(line.is_pending());
    }

    #[test]
    fn explicit_clear_skips_the_timer() {
        let start = Instant::now();
        let mut line = DebounceLine::new("bots".to_string(), QUIET);

        line.edit("bot".to_string(), start);
        let committed = line.commit_now(String::new());

        assert_eq!(committed, "");
        assert!(!line.is_pending());
        assert_eq!(line.poll(start + QUIET), None);
    }

    #[test]
    fn lines_are_independent() {
        let start = Instant::now();
        let mut keywords = DebounceLine::new(String::new(), QUIET);
        let mut tags = DebounceLine::new(Vec::<String>::new(), QUIET);

        keywords.edit("ops".to_string(), start);
        tags.edit(vec!["billing".to_string()], start + Duration::from_millis(100));
        keywords.commit_now(String::new());

        assert_eq!(
            tags.poll(start + Duration::from_millis(600)),
            Some(vec!["billing".to_string()])
        );
    }
}
