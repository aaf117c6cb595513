//! Loading state for one view's fetch.
//!
//! Each fetch takes a [`Ticket`]. Only the response holding the most recent
//! ticket is applied; a response from a superseded fetch is dropped, so a
//! slow old request can never overwrite a newer one.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

/// Identifies one fetch issued through [`Retrieval::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Retrieval<T> {
    phase: Phase,
    data: Option<T>,
    error: Option<String>,
    generation: u64,
}

impl<T> Default for Retrieval<T> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            data: None,
            error: None,
            generation: 0,
        }
    }
}

impl<T> Retrieval<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch: clears the error but keeps the last good data.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.error = None;
        Ticket(self.generation)
    }

    /// Apply a response. Returns `false` when `ticket` has been superseded
    /// and the response was ignored.
    pub fn resolve(&mut self, ticket: Ticket, result: Result<T, String>) -> bool {
        if ticket.0 != self.generation {
            log::debug!(
                "Dropping stale response (ticket {}, current {})",
                ticket.0,
                self.generation
            );
            return false;
        }
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.phase = Phase::Success;
            }
            Err(message) => {
                self.error = Some(message);
                self.phase = Phase::Error;
            }
        }
        true
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_path() {
        let mut r: Retrieval<Vec<u32>> = Retrieval::new();
        assert_eq!(r.phase(), Phase::Idle);
        let t = r.begin();
        assert!(r.is_loading());
        assert!(r.resolve(t, Ok(vec![1, 2])));
        assert_eq!(r.phase(), Phase::Success);
        assert_eq!(r.data(), Some(&vec![1, 2]));
        assert_eq!(r.error(), None);
    }

    #[test]
    fn test_error_keeps_stale_data() {
        let mut r = Retrieval::new();
        let t = r.begin();
        r.resolve(t, Ok("first"));
        let t = r.begin();
        r.resolve(t, Err("Failed to fetch historical data".to_string()));
        assert_eq!(r.phase(), Phase::Error);
        assert_eq!(r.data(), Some(&"first"));
        assert_eq!(r.error(), Some("Failed to fetch historical data"));
    }

    #[test]
    fn test_begin_clears_error() {
        let mut r: Retrieval<u8> = Retrieval::new();
        let t = r.begin();
        r.resolve(t, Err("boom".to_string()));
        r.begin();
        assert_eq!(r.error(), None);
        assert!(r.is_loading());
    }

    #[test]
    fn test_superseded_response_is_dropped() {
        let mut r = Retrieval::new();
        let old = r.begin();
        let new = r.begin();
        assert!(r.resolve(new, Ok("new")));
        // The older request lands last but must not win
        assert!(!r.resolve(old, Ok("old")));
        assert_eq!(r.data(), Some(&"new"));
        assert_eq!(r.phase(), Phase::Success);
    }

    #[test]
    fn test_stale_error_does_not_end_loading() {
        let mut r: Retrieval<u8> = Retrieval::new();
        let old = r.begin();
        let _new = r.begin();
        assert!(!r.resolve(old, Err("late failure".to_string())));
        assert!(r.is_loading());
        assert_eq!(r.error(), None);
    }
}
