//! Request sequencing tokens
//!
//! Each read that writes into client state takes a token for its resource
//! before going to the network. When the response arrives it is applied only
//! if no newer request for the same resource was issued since. This keeps a
//! slow, stale response from overwriting a fresher one.

use std::collections::HashMap;
use std::sync::Mutex;

/// Client-state resources fed by backend reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Config,
    Profiles,
    Status,
    Logs,
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    resource: Resource,
    seq: u64,
}

#[derive(Debug, Default)]
pub struct Sequencer {
    latest: Mutex<HashMap<Resource, u64>>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a ticket for a request that is about to be issued
    pub fn issue(&self, resource: Resource) -> Ticket {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        let seq = latest.entry(resource).or_insert(0);
        *seq += 1;
        Ticket {
            resource,
            seq: *seq,
        }
    }

    /// Whether `ticket` still belongs to the newest request of its resource
    pub fn is_current(&self, ticket: Ticket) -> bool {
        let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        latest.get(&ticket.resource).copied() == Some(ticket.seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let seq = Sequencer::new();
        let first = seq.issue(Resource::Config);
        let second = seq.issue(Resource::Config);
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[test]
    fn resources_are_tracked_independently() {
        let seq = Sequencer::new();
        let config = seq.issue(Resource::Config);
        let _logs = seq.issue(Resource::Logs);
        let _logs = seq.issue(Resource::Logs);
        assert!(seq.is_current(config));
    }
}
