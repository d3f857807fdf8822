use std::collections::HashMap;
use std::sync::Mutex;

/// Proof that a request was started; only the newest ticket per key is
/// current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    key: String,
    seq: u64,
}

impl Ticket {
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Issues increasing tickets per key so that a response which completes
/// after a newer request for the same key can be recognised and dropped.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: Mutex<HashMap<String, u64>>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, key: &str) -> Ticket {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        let seq = latest.entry(key.to_string()).or_insert(0);
        *seq += 1;
        Ticket {
            key: key.to_string(),
            seq: *seq,
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        latest.get(&ticket.key).copied() == Some(ticket.seq)
    }
}
