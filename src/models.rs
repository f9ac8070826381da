use std::fmt;

use chrono::{DateTime, Local};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    Unknown,
    Online,
    Offline,
}

impl HostState {
    pub fn icon(self) -> &'static str {
        match self {
            HostState::Online => "\u{1F7E2}",
            HostState::Offline => "\u{1F534}",
            HostState::Unknown => "\u{2753}",
        }
    }
}

impl fmt::Display for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostState::Unknown => "unknown",
            HostState::Online => "online",
            HostState::Offline => "offline",
        };
        f.write_str(name)
    }
}

/// One monitored host. Created at startup, mutated only by [`Host::evaluate`].
#[derive(Debug, Clone)]
pub struct Host {
    pub name: String,
    pub state: HostState,
    pub last_state_change: DateTime<Local>,
    pub offline_counter: u32,
}

impl Host {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: HostState::Unknown,
            last_state_change: Local::now(),
            offline_counter: 0,
        }
    }

    /// Feed one probe outcome through the debounced state machine.
    ///
    /// A reachable probe moves the host to online immediately and clears the
    /// failure counter; unreachable probes only move it to offline once
    /// `offline_threshold` consecutive failures have accumulated. Returns the
    /// notification text when (and only when) the state actually changed.
    /// The transition is committed before returning, so a failed notification
    /// never leaves the record behind the message.
    pub fn evaluate(&mut self, reachable: bool, offline_threshold: u32) -> Option<String> {
        let mut new_state = self.state;

        if reachable {
            self.offline_counter = 0;
            new_state = HostState::Online;
        } else {
            self.offline_counter += 1;
            if self.offline_counter >= offline_threshold {
                new_state = HostState::Offline;
            } else {
                info!(
                    host = %self.name,
                    counter = self.offline_counter,
                    threshold = offline_threshold,
                    "probe returned offline, still within threshold"
                );
            }
        }

        if new_state == self.state {
            return None;
        }

        info!(host = %self.name, from = %self.state, to = %new_state, "state change");

        let mut message = format!("{} *{}* is now *{}*", new_state.icon(), self.name, new_state);
        if new_state == HostState::Offline {
            message.push_str(&format!(" after {offline_threshold} failed probes"));
        }
        if self.state != HostState::Unknown {
            message.push_str(&format!(
                ". Previously *{}* since {}.",
                self.state,
                self.last_state_change.format("%c")
            ));
        }

        self.state = new_state;
        self.last_state_change = Local::now();

        Some(message)
    }
}
