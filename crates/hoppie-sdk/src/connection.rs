//! CPDLC connection state.
//!
//! A session is in exactly one [`ConnectionState`] at a time:
//!
//! ```text
//! Disconnected ──connect──▶ Waiting ──LOGON ACCEPTED──▶ Connected
//!       ▲                      │
//!       └──── logon timeout ───┘
//! ```
//!
//! The record is shared between the caller-facing manager and the poll
//! loop, so every read-modify-write happens under one lock and no lock is
//! held across an `.await`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use hoppie_models::{AcarsEndpointCallsign, CpdlcPacket};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::SdkError;

/// First MIN used by a fresh session.
pub const INITIAL_MIN: u32 = 1;

/// Where a session is in the logon handshake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum ConnectionState {
    /// No logon in progress.
    #[default]
    Disconnected,
    /// Logon request sent; waiting for `LOGON ACCEPTED`.
    Waiting,
    /// The station accepted the logon.
    Connected,
}

impl ConnectionState {
    /// Returns `true` if moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Disconnected, Self::Waiting)
                | (Self::Waiting, Self::Connected | Self::Disconnected)
        )
    }
}

#[derive(Debug)]
struct Connection {
    state: ConnectionState,
    station: Option<AcarsEndpointCallsign>,
    last_min: u32,
}

impl Connection {
    fn transition(&mut self, next: ConnectionState) -> Result<(), SdkError> {
        if !self.state.can_transition_to(next) {
            warn!(from = %self.state, to = %next, "rejected connection state transition");
            return Err(SdkError::State(format!(
                "cannot move from {} to {next}",
                self.state
            )));
        }
        debug!(from = %self.state, to = %next, "connection state changed");
        self.state = next;
        Ok(())
    }
}

/// Connection record shared between the manager and its poll loop.
#[derive(Debug)]
pub(crate) struct SharedConnection(Mutex<Connection>);

impl Default for SharedConnection {
    fn default() -> Self {
        Self(Mutex::new(Connection {
            state: ConnectionState::Disconnected,
            station: None,
            last_min: INITIAL_MIN,
        }))
    }
}

impl SharedConnection {
    // Every critical section leaves the record consistent, so a poisoned
    // lock still holds valid data.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn state(&self) -> ConnectionState {
        self.lock().state
    }

    pub(crate) fn station(&self) -> Option<AcarsEndpointCallsign> {
        self.lock().station.clone()
    }

    pub(crate) fn last_min(&self) -> u32 {
        self.lock().last_min
    }

    /// Reserve the session for a logon to `station` and return the MIN to
    /// send the request with.
    ///
    /// Moves `Disconnected → Waiting` under one lock, so a concurrent
    /// caller fails before anything is sent.
    pub(crate) fn begin_logon(&self, station: AcarsEndpointCallsign) -> Result<u32, SdkError> {
        let mut conn = self.lock();
        if conn.state != ConnectionState::Disconnected {
            return Err(SdkError::State(format!(
                "logon already {} with {}",
                conn.state.to_string().to_lowercase(),
                conn.station.as_ref().map_or("unknown", AcarsEndpointCallsign::as_str)
            )));
        }
        conn.transition(ConnectionState::Waiting)?;
        conn.station = Some(station);
        Ok(conn.last_min)
    }

    /// Release a reservation taken by [`begin_logon`](Self::begin_logon)
    /// whose request never reached the network.
    pub(crate) fn abort_logon(&self) {
        let mut conn = self.lock();
        if conn.state == ConnectionState::Waiting {
            conn.station = None;
            let _ = conn.transition(ConnectionState::Disconnected);
        }
    }

    /// Apply an inbound CPDLC packet from `sender` to a pending logon.
    ///
    /// Returns `true` if the packet was the acceptance of the outstanding
    /// logon request and the session is now `Connected`.
    pub(crate) fn accept_logon(
        &self,
        sender: &AcarsEndpointCallsign,
        packet: &CpdlcPacket,
    ) -> bool {
        let mut conn = self.lock();
        if conn.state != ConnectionState::Waiting {
            return false;
        }
        let from_station = conn.station.as_ref() == Some(sender);
        if !from_station || !packet.accepts_logon(conn.last_min) {
            return false;
        }
        conn.transition(ConnectionState::Connected).is_ok()
    }

    /// Drop a pending logon back to `Disconnected`.
    ///
    /// Returns `false` if the session was not waiting.
    pub(crate) fn expire_logon(&self) -> bool {
        let mut conn = self.lock();
        if conn.state != ConnectionState::Waiting {
            return false;
        }
        conn.station = None;
        conn.transition(ConnectionState::Disconnected).is_ok()
    }

    /// Allocate the next MIN for an outbound CPDLC message.
    ///
    /// Allocation is atomic: concurrent callers never receive the same MIN.
    pub(crate) fn next_min(&self) -> Result<(AcarsEndpointCallsign, u32), SdkError> {
        let mut conn = self.lock();
        if conn.state != ConnectionState::Connected {
            return Err(SdkError::State(format!(
                "CPDLC requires a connected station (state is {})",
                conn.state
            )));
        }
        let station = conn
            .station
            .clone()
            .ok_or_else(|| SdkError::State("connected without a station".into()))?;
        conn.last_min += 1;
        Ok((station, conn.last_min))
    }
}
