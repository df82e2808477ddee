//! The Hoppie session engine.
//!
//! A [`HoppieManager`] owns one CPDLC session for one aircraft callsign:
//! the connection record, the supervised poll loop, the inbound event
//! channel and the state-notification stream. Handles are cheap to clone
//! and every clone drives the same session.
//!
//! # Lifecycle
//!
//! 1. [`connect`](HoppieManager::connect) sends the logon request and starts
//!    polling the station.
//! 2. The poll loop publishes every inbound envelope on the event channel
//!    ([`recv`](HoppieManager::recv)) and moves the session to `Connected`
//!    when the station accepts the logon ([`recv_state`](HoppieManager::recv_state)).
//! 3. [`shutdown`](HoppieManager::shutdown) cancels the session, waits for
//!    every task and closes both channels.
//!
//! ```rust,no_run
//! use hoppie_sdk::{HoppieManager, ManagerOptions};
//!
//! # async fn run() -> Result<(), hoppie_sdk::SdkError> {
//! let manager = HoppieManager::new("s3cr3t", "AFR1234", ManagerOptions::from_env())?;
//! manager.connect("WLS2").await?;
//!
//! while let Some(envelope) = manager.recv().await {
//!     println!("{envelope}");
//! }
//! manager.wait().await
//! # }
//! ```

use std::future::Future;
use std::sync::{Arc, Weak};

use hoppie_models::{
    decode_cpdlc, decode_envelopes, encode_cpdlc, AcarsEndpointCallsign, AcarsEnvelope,
    AdscReport, ICAOAirportCode, MessageType, ResponseRequirement, Status, WeatherRequestKind,
    LOGON_REQUEST,
};
use tokio::sync::{mpsc, Mutex};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ManagerOptions;
use crate::connection::{ConnectionState, SharedConnection};
use crate::error::SdkError;
use crate::status;
use crate::supervisor::Supervisor;
use crate::transport::{AcarsRequest, HttpTransport, Transport};

/// Station that answers information requests.
pub const SERVER_STATION: &str = "SERVER";

const EVENT_CHANNEL_CAPACITY: usize = 1;
const STATE_CHANNEL_CAPACITY: usize = 4;

/// Handle to one Hoppie CPDLC session.
#[derive(Clone)]
pub struct HoppieManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    logon: String,
    callsign: AcarsEndpointCallsign,
    options: ManagerOptions,
    transport: Arc<dyn Transport>,
    http: reqwest::Client,
    connection: SharedConnection,
    messages_tx: mpsc::Sender<AcarsEnvelope>,
    messages_rx: Mutex<mpsc::Receiver<AcarsEnvelope>>,
    states_tx: mpsc::Sender<ConnectionState>,
    states_rx: Mutex<mpsc::Receiver<ConnectionState>>,
    cancel: CancellationToken,
    supervisor: Supervisor,
}

impl std::fmt::Debug for HoppieManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoppieManager")
            .field("callsign", &self.inner.callsign)
            .field("connection", &self.inner.connection)
            .field("cancelled", &self.inner.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl HoppieManager {
    /// Create a session talking to Hoppie over HTTP at
    /// [`ManagerOptions::connect_url`].
    ///
    /// # Errors
    ///
    /// [`SdkError::Validation`] if the connect URL is invalid.
    pub fn new(
        logon: impl Into<String>,
        callsign: impl Into<AcarsEndpointCallsign>,
        options: ManagerOptions,
    ) -> Result<Self, SdkError> {
        let http = reqwest::Client::new();
        let transport = HttpTransport::with_client(http.clone(), &options.connect_url)?;
        Ok(Self::build(logon.into(), callsign.into(), options, Arc::new(transport), http))
    }

    /// Create a session over a custom [`Transport`].
    pub fn with_transport(
        logon: impl Into<String>,
        callsign: impl Into<AcarsEndpointCallsign>,
        options: ManagerOptions,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self::build(
            logon.into(),
            callsign.into(),
            options,
            transport,
            reqwest::Client::new(),
        )
    }

    fn build(
        logon: String,
        callsign: AcarsEndpointCallsign,
        options: ManagerOptions,
        transport: Arc<dyn Transport>,
        http: reqwest::Client,
    ) -> Self {
        let (messages_tx, messages_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (states_tx, states_rx) = mpsc::channel(STATE_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();

        Self {
            inner: Arc::new(ManagerInner {
                logon,
                callsign,
                options,
                transport,
                http,
                connection: SharedConnection::default(),
                messages_tx,
                messages_rx: Mutex::new(messages_rx),
                states_tx,
                states_rx: Mutex::new(states_rx),
                supervisor: Supervisor::new(cancel.clone()),
                cancel,
            }),
        }
    }

    /// The aircraft callsign this session sends from.
    pub fn callsign(&self) -> &AcarsEndpointCallsign {
        &self.inner.callsign
    }

    /// The options this session was created with.
    pub fn options(&self) -> &ManagerOptions {
        &self.inner.options
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.inner.connection.state()
    }

    /// The station of the current or pending logon.
    pub fn station(&self) -> Option<AcarsEndpointCallsign> {
        self.inner.connection.station()
    }

    /// The MIN most recently used by this session.
    pub fn last_min(&self) -> u32 {
        self.inner.connection.last_min()
    }

    /// The token cancelled when this session ends.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.inner.cancel.clone()
    }

    /// Send a CPDLC logon request to `station` and start polling it.
    ///
    /// The logon timeout, if configured, starts now.
    ///
    /// # Errors
    ///
    /// - [`SdkError::State`] if `station` or the session callsign is empty.
    ///   The session is cancelled.
    /// - [`SdkError::State`] if a logon is already pending or established,
    ///   or the session has ended.
    /// - Any transport error from sending the request. The session is
    ///   cancelled.
    pub async fn connect(&self, station: impl Into<AcarsEndpointCallsign>) -> Result<(), SdkError> {
        let inner = &self.inner;
        let station = station.into();

        if station.is_empty() || inner.callsign.is_empty() {
            warn!(station = %station, callsign = %inner.callsign, "cannot log on without a station and callsign");
            inner.cancel.cancel();
            return Err(SdkError::State(
                "logon requires a station and a callsign".into(),
            ));
        }
        if inner.cancel.is_cancelled() {
            return Err(SdkError::State("session has ended".into()));
        }

        let deadline = inner.options.logon_timeout.map(|t| Instant::now() + t);
        let min = inner.connection.begin_logon(station.clone())?;
        let packet = encode_cpdlc(min, None, ResponseRequirement::Required, LOGON_REQUEST);

        if let Err(err) = inner.send(&station, MessageType::Cpdlc, packet).await {
            warn!(station = %station, error = %err, "logon request failed");
            inner.connection.abort_logon();
            inner.cancel.cancel();
            return Err(err);
        }

        info!(station = %station, min, "logon requested");
        inner.publish_state(ConnectionState::Waiting).await?;

        let poller = ManagerInner::poll_loop(
            Arc::downgrade(inner),
            inner.cancel.clone(),
            inner.options.clone(),
            station,
            deadline,
        );
        inner.supervisor.spawn(poller);
        Ok(())
    }

    /// Send a CPDLC message to the connected station.
    ///
    /// # Errors
    ///
    /// - [`SdkError::Validation`] if `data` contains `/`.
    /// - [`SdkError::State`] unless the session is `Connected`.
    /// - Any transport error.
    pub async fn cpdlc_request(
        &self,
        data: &str,
        response_requirement: ResponseRequirement,
    ) -> Result<(), SdkError> {
        if data.contains('/') {
            return Err(SdkError::Validation(format!(
                "CPDLC text must not contain '/': {data}"
            )));
        }
        let (station, min) = self.inner.connection.next_min()?;
        let packet = encode_cpdlc(min, None, response_requirement, data);
        debug!(station = %station, min, "sending CPDLC message");
        self.inner.send(&station, MessageType::Cpdlc, packet).await?;
        Ok(())
    }

    /// Send a free-text telex to `station`. Works in any connection state.
    ///
    /// # Errors
    ///
    /// [`SdkError::Validation`] if `data` or `station` is empty, or any
    /// transport error.
    pub async fn telex(
        &self,
        data: &str,
        station: impl Into<AcarsEndpointCallsign>,
    ) -> Result<(), SdkError> {
        let station = station.into();
        if data.is_empty() || station.is_empty() {
            return Err(SdkError::Validation(
                "telex requires a station and a message".into(),
            ));
        }
        self.inner
            .send(&station, MessageType::Telex, data.to_string())
            .await?;
        Ok(())
    }

    /// Request a weather report for `icao` from the `SERVER` station.
    ///
    /// The reply is published on the event channel and also returned.
    ///
    /// # Errors
    ///
    /// - [`SdkError::Model`] if `icao` is not four characters.
    /// - [`SdkError::Validation`] if the reply does not hold exactly one
    ///   envelope.
    /// - Any transport error.
    pub async fn weather_request(
        &self,
        icao: &str,
        kind: WeatherRequestKind,
    ) -> Result<AcarsEnvelope, SdkError> {
        let icao = ICAOAirportCode::try_from(icao)?;
        let body = self
            .inner
            .send(&SERVER_STATION.into(), MessageType::InfoRequest, kind.packet(&icao))
            .await?;

        let mut envelopes = decode_envelopes(&body);
        if envelopes.len() != 1 {
            return Err(SdkError::Validation(format!(
                "expected one {kind} reply for {icao}, got {}",
                envelopes.len()
            )));
        }
        let envelope = envelopes.remove(0);
        self.inner.publish(envelope.clone()).await?;
        Ok(envelope)
    }

    /// Send an ADS-C report to `station`.
    ///
    /// # Errors
    ///
    /// [`SdkError::State`] if ADS-C reporting is disabled in the options, or
    /// any transport error.
    pub async fn send_adsc_report(
        &self,
        station: impl Into<AcarsEndpointCallsign>,
        report: &AdscReport,
    ) -> Result<(), SdkError> {
        if !self.inner.options.adsc_reporting {
            return Err(SdkError::State("ADS-C reporting is disabled".into()));
        }
        let station = station.into();
        self.inner
            .send(&station, MessageType::Adsc, report.to_string())
            .await?;
        Ok(())
    }

    /// Fetch the Hoppie status document.
    ///
    /// # Errors
    ///
    /// As [`status::fetch_status`].
    pub async fn status(&self) -> Result<Status, SdkError> {
        status::fetch_status(&self.inner.http, &self.inner.options.status_url).await
    }

    /// Receive the next inbound envelope.
    ///
    /// Returns `None` once the session has ended and nothing is buffered.
    pub async fn recv(&self) -> Option<AcarsEnvelope> {
        let mut rx = self.inner.messages_rx.lock().await;
        tokio::select! {
            biased;
            envelope = rx.recv() => envelope,
            () = self.inner.cancel.cancelled() => None,
        }
    }

    /// Receive the next connection-state notification.
    ///
    /// Returns `None` once the session has ended and nothing is buffered.
    pub async fn recv_state(&self) -> Option<ConnectionState> {
        let mut rx = self.inner.states_rx.lock().await;
        tokio::select! {
            biased;
            state = rx.recv() => state,
            () = self.inner.cancel.cancelled() => None,
        }
    }

    /// Run `on_connect` each time the session reaches `Connected`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Cancelled`] when the session ends, or the first
    /// error from `on_connect`.
    pub async fn on_connected<F, Fut>(&self, mut on_connect: F) -> Result<(), SdkError>
    where
        F: FnMut(AcarsEndpointCallsign) -> Fut,
        Fut: Future<Output = Result<(), SdkError>>,
    {
        while let Some(state) = self.recv_state().await {
            match (state, self.station()) {
                (ConnectionState::Connected, Some(station)) => on_connect(station).await?,
                (state, _) => debug!(%state, "connection state notification"),
            }
        }
        Err(SdkError::Cancelled)
    }

    /// Run `task` under this session's supervisor. An error cancels the
    /// session and is reported by [`wait`](Self::wait).
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = Result<(), SdkError>> + Send + 'static,
    {
        self.inner.supervisor.spawn(task);
    }

    /// Wait for every supervised task to finish.
    ///
    /// # Errors
    ///
    /// The first error returned by any supervised task, reported once.
    pub async fn wait(&self) -> Result<(), SdkError> {
        self.inner.supervisor.wait().await
    }

    /// End the session: cancel, wait for every task, close both channels.
    ///
    /// # Errors
    ///
    /// The first error a supervised task failed with before shutdown.
    /// Cancellation itself is not an error.
    pub async fn shutdown(&self) -> Result<(), SdkError> {
        info!(callsign = %self.inner.callsign, "shutting down session");
        self.inner.cancel.cancel();
        let result = self.inner.supervisor.wait().await;
        self.inner.messages_rx.lock().await.close();
        self.inner.states_rx.lock().await.close();

        match result {
            Err(SdkError::Cancelled) => Ok(()),
            other => other,
        }
    }
}

impl Drop for ManagerInner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl ManagerInner {
    async fn send(
        &self,
        to: &AcarsEndpointCallsign,
        message_type: MessageType,
        packet: String,
    ) -> Result<String, SdkError> {
        let request = AcarsRequest {
            logon: self.logon.clone(),
            from: self.callsign.clone(),
            to: to.clone(),
            message_type,
            packet,
        };
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(SdkError::Cancelled),
            response = self.transport.send(request) => response,
        }
    }

    async fn publish(&self, envelope: AcarsEnvelope) -> Result<(), SdkError> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(SdkError::Cancelled),
            sent = self.messages_tx.send(envelope) => sent.map_err(|_| SdkError::Cancelled),
        }
    }

    async fn publish_state(&self, state: ConnectionState) -> Result<(), SdkError> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(SdkError::Cancelled),
            sent = self.states_tx.send(state) => sent.map_err(|_| SdkError::Cancelled),
        }
    }

    // Holds the session only weakly between ticks, so dropping the last
    // handle ends the loop.
    async fn poll_loop(
        session: Weak<Self>,
        cancel: CancellationToken,
        options: ManagerOptions,
        station: AcarsEndpointCallsign,
        deadline: Option<Instant>,
    ) -> Result<(), SdkError> {
        let interval = options.poll_interval;
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let logon_timeout = async {
            match deadline {
                Some(deadline) => time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(logon_timeout);
        let mut logon_pending = deadline.is_some();

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(SdkError::Cancelled),
                () = &mut logon_timeout, if logon_pending => {
                    logon_pending = false;
                    let Some(inner) = session.upgrade() else {
                        debug!(station = %station, "session dropped; stopping poll loop");
                        return Ok(());
                    };
                    if inner.connection.expire_logon() {
                        warn!(station = %station, "logon not accepted in time");
                        inner.publish_state(ConnectionState::Disconnected).await?;
                        return Err(SdkError::Timeout(options.logon_timeout.unwrap_or_default()));
                    }
                }
                _ = ticker.tick() => {
                    let Some(inner) = session.upgrade() else {
                        debug!(station = %station, "session dropped; stopping poll loop");
                        return Ok(());
                    };
                    inner.poll_once(&station).await?;
                    if logon_pending && inner.connection.state() == ConnectionState::Connected {
                        logon_pending = false;
                    }
                }
            }
        }
    }

    async fn poll_once(&self, station: &AcarsEndpointCallsign) -> Result<(), SdkError> {
        debug!(station = %station, "polling for messages");
        let body = self.send(station, MessageType::Poll, String::new()).await?;

        for envelope in decode_envelopes(&body) {
            if envelope.message_type == MessageType::Cpdlc
                && self.connection.state() == ConnectionState::Waiting
            {
                let packet = decode_cpdlc(&envelope.payload)?;
                if self.connection.accept_logon(&envelope.sender, &packet) {
                    info!(station = %envelope.sender, min = packet.min, "logon successful");
                    self.publish_state(ConnectionState::Connected).await?;
                } else {
                    debug!(
                        sender = %envelope.sender,
                        mrn = ?packet.mrn,
                        data = %packet.data,
                        "received reply to logon but failed match"
                    );
                }
            }
            self.publish(envelope).await?;
        }
        Ok(())
    }
}
