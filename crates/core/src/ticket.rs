//! Latest-only bookkeeping for asynchronous results.
//!
//! Each new request takes a [`Ticket`] from a [`Tickets`] counter. A result
//! is only applied if its ticket is still the latest one issued, so a slow
//! response can never overwrite a newer one.

/// Generation number handed out with a request
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct Tickets {
    issued: u64,
}

impl Tickets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier ticket
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_is_current() {
        let mut tickets = Tickets::new();
        let first = tickets.issue();
        assert!(tickets.is_current(first));

        let second = tickets.issue();
        assert!(!tickets.is_current(first));
        assert!(tickets.is_current(second));
        assert!(second > first);
    }
}
