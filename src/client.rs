//! Asynchronous duplex client over a dealer-style transport.
//!
//! Each [`Client`] owns one transport socket and one dedicated worker
//! thread. The caller enqueues messages from any thread; the worker
//! performs the versioned handshake, multiplexes the outbound queue with
//! the inbound callback stream, keeps the connection alive with periodic
//! pings, and tears down cleanly on timeout, transport error, or caller
//! request.
//!
//! # Lifecycle
//!
//! ```text
//! Constructed ──▶ SocketReady ──▶ Connected ──▶ Handshaking ──▶ Serving ──▶ Draining ──▶ Stopped
//!                     │              │               │             │
//!                     └──error───────┴──error────────┴──timeout────┘──▶ Stopped
//! ```
//!
//! The constructor blocks until the worker has created and configured the
//! socket, so [`Client::connect`] is safe immediately afterwards. `connect`
//! attaches a random identity, connects the transport, and releases the
//! worker to handshake and serve.
//!
//! # Roles
//!
//! An [`Exporter`](ClientRole::Exporter) client carries data. A
//! [`Heartbeat`](ClientRole::Heartbeat) client carries no user data and
//! exists only to detect peer death: it treats peer silence beyond its ping
//! timeout as fatal. The recommended deployment runs one of each against
//! the same peer, sharing fate through [`Client::good`].
//!
//! # Example
//!
//! ```no_run
//! use renderwire::client::Client;
//! use renderwire::message::Message;
//! use renderwire::protocol::ClientRole;
//! use renderwire::transport::pair;
//!
//! let (transport, _peer) = pair();
//! let mut client = Client::new(ClientRole::Exporter, move || Ok(transport)).unwrap();
//! client.connect("inproc://render").unwrap();
//! client.send(&Message::plugin_create("teapot_01", "GeomMeshFile")).unwrap();
//! client.sync_stop();
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::{debug, error, info, warn};

use crate::error::{Result, WireError};
use crate::message::Message;
use crate::protocol::{
    ClientRole, ControlCode, ControlFrame, EXPORTER_TIMEOUT, HEARTBEAT_TIMEOUT,
    MAX_BATCH_MESSAGES, PROTOCOL_VERSION,
};
use crate::transport::{Transport, TransportError};

/// Callback invoked by the worker for every inbound data message.
///
/// Callbacks are serialised: at most one runs at a time, on the worker
/// thread. The [`Sender`] handle lets a callback enqueue messages; it
/// deliberately cannot stop the client (stopping joins the worker, and the
/// callback runs on it).
pub type Callback = Box<dyn FnMut(Message, &Sender) + Send>;

/// Timing knobs of a client.
///
/// Defaults are the protocol constants; tests compress them to keep the
/// suite fast.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Receive timeout for the handshake reply.
    pub handshake_timeout: Duration,
    /// Ping timeout of the exporter role.
    pub exporter_ping_timeout: Duration,
    /// Ping timeout of the heartbeat role.
    pub heartbeat_ping_timeout: Duration,
    /// Send timeout while serving.
    pub serve_send_timeout: Duration,
    /// Per-message send timeout while draining at shutdown.
    pub drain_send_timeout: Duration,
    /// Poll timeout of one serve iteration.
    pub poll_interval: Duration,
    /// Sleep after an iteration that did no work.
    pub idle_sleep: Duration,
    /// Upper bound on messages moved per direction per iteration.
    pub batch_limit: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            handshake_timeout: EXPORTER_TIMEOUT,
            exporter_ping_timeout: EXPORTER_TIMEOUT,
            heartbeat_ping_timeout: HEARTBEAT_TIMEOUT,
            serve_send_timeout: Duration::from_millis(1000),
            drain_send_timeout: Duration::from_millis(200),
            poll_interval: Duration::from_millis(10),
            idle_sleep: Duration::from_millis(1),
            batch_limit: MAX_BATCH_MESSAGES,
        }
    }
}

impl ClientConfig {
    fn ping_timeout(&self, role: ClientRole) -> Duration {
        match role {
            ClientRole::Heartbeat => self.heartbeat_ping_timeout,
            _ => self.exporter_ping_timeout,
        }
    }
}

struct Gate {
    /// Set by `connect` (or `sync_stop`) to release the parked worker.
    start_serving: bool,
}

/// State shared between the caller-facing handles and the worker.
struct Shared {
    role: ClientRole,
    config: ClientConfig,
    /// Outbound FIFO of encoded payloads.
    queue: Mutex<VecDeque<Bytes>>,
    /// Callback slot; held across dispatch so `set_callback` cannot race an
    /// in-flight invocation.
    callback: Mutex<Option<Callback>>,
    gate: Mutex<Gate>,
    gate_cond: Condvar,
    working: AtomicBool,
    connect_error: AtomicBool,
    flush_on_exit: AtomicBool,
    /// Transport parked here between construction and serving.
    transport: Mutex<Option<Box<dyn Transport>>>,
    interrupter: Mutex<Option<Arc<dyn Fn() + Send + Sync>>>,
}

/// Why the worker left the serve loop. Flush-on-exit only applies to exits
/// where the transport is still usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitReason {
    Stopped,
    ConnectError,
    HandshakeFailed,
    PeerSilent,
    TransportFatal,
}

impl ExitReason {
    fn may_flush(self) -> bool {
        matches!(self, Self::Stopped | Self::PeerSilent)
    }
}

/// Poison-tolerant lock: a panicked holder must not wedge shutdown.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Shared {
    fn enqueue(&self, payload: Bytes) -> Result<()> {
        if !lock(&self.gate).start_serving {
            return Err(WireError::NotConnected);
        }
        lock(&self.queue).push_back(payload);
        Ok(())
    }

    fn outstanding(&self) -> usize {
        lock(&self.queue).len()
    }
}

/// Cloneable enqueue-only handle, safe to use from inside callbacks.
#[derive(Clone)]
pub struct Sender {
    shared: Arc<Shared>,
}

impl Sender {
    /// Enqueue a logical message.
    pub fn send(&self, message: &Message) -> Result<()> {
        self.shared.enqueue(message.encode()?)
    }

    /// Enqueue an already-encoded payload.
    pub fn send_bytes(&self, payload: impl Into<Bytes>) -> Result<()> {
        self.shared.enqueue(payload.into())
    }

    /// Number of messages not yet handed to the transport.
    pub fn outstanding_messages(&self) -> usize {
        self.shared.outstanding()
    }

    /// Whether the worker is still serving.
    pub fn good(&self) -> bool {
        self.shared.working.load(Ordering::Acquire)
    }
}

/// Client over a dealer-style transport; see the module docs.
pub struct Client {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl Client {
    /// Create a client and spin up its worker.
    ///
    /// The factory runs on the worker thread to create the socket; the call
    /// blocks until the socket exists and is configured, so `connect` is
    /// safe immediately after this returns.
    pub fn new<T, F>(role: ClientRole, factory: F) -> Result<Self>
    where
        T: Transport + 'static,
        F: FnOnce() -> std::result::Result<T, TransportError> + Send + 'static,
    {
        Self::with_config(role, ClientConfig::default(), factory)
    }

    /// Create a client with custom timing knobs.
    pub fn with_config<T, F>(role: ClientRole, config: ClientConfig, factory: F) -> Result<Self>
    where
        T: Transport + 'static,
        F: FnOnce() -> std::result::Result<T, TransportError> + Send + 'static,
    {
        if role == ClientRole::None {
            return Err(WireError::WorkerInit(
                "client role must be Exporter or Heartbeat".into(),
            ));
        }

        let shared = Arc::new(Shared {
            role,
            config,
            queue: Mutex::new(VecDeque::new()),
            callback: Mutex::new(None),
            gate: Mutex::new(Gate {
                start_serving: false,
            }),
            gate_cond: Condvar::new(),
            working: AtomicBool::new(true),
            connect_error: AtomicBool::new(false),
            flush_on_exit: AtomicBool::new(false),
            transport: Mutex::new(None),
            interrupter: Mutex::new(None),
        });

        let (ready_tx, ready_rx) = mpsc::channel();
        let worker_shared = shared.clone();
        let worker = thread::Builder::new()
            .name("renderwire-client".into())
            .spawn(move || worker_main(worker_shared, factory, ready_tx))
            .map_err(|e| WireError::WorkerInit(e.to_string()))?;

        // Rendezvous: wait for the worker to finish creating the socket.
        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                shared,
                worker: Some(worker),
            }),
            Ok(Err(e)) => {
                let _ = worker.join();
                Err(WireError::Transport(e))
            }
            Err(_) => {
                let _ = worker.join();
                Err(WireError::WorkerInit("worker exited during socket init".into()))
            }
        }
    }

    /// Connect the socket and release the worker to handshake and serve.
    ///
    /// A random 64-bit identity is attached before connecting. On failure
    /// the connect-error flag is set and the worker stops; either way the
    /// worker is released.
    pub fn connect(&self, endpoint: &str) -> Result<()> {
        if lock(&self.shared.gate).start_serving {
            return Err(WireError::AlreadyConnected);
        }

        let result = {
            let mut slot = lock(&self.shared.transport);
            match slot.as_mut() {
                Some(transport) => {
                    let identity: u64 = rand::random();
                    transport
                        .set_identity(identity)
                        .and_then(|_| transport.connect(endpoint))
                }
                None => Err(TransportError::Closed),
            }
        };

        if result.is_err() {
            self.shared.connect_error.store(true, Ordering::Release);
        }

        {
            let mut gate = lock(&self.shared.gate);
            gate.start_serving = true;
        }
        self.shared.gate_cond.notify_all();

        result.map_err(WireError::from)
    }

    /// Enqueue a logical message for delivery in FIFO order.
    pub fn send(&self, message: &Message) -> Result<()> {
        self.shared.enqueue(message.encode()?)
    }

    /// Enqueue an already-encoded payload for delivery in FIFO order.
    pub fn send_bytes(&self, payload: impl Into<Bytes>) -> Result<()> {
        self.shared.enqueue(payload.into())
    }

    /// Install the inbound-message callback.
    ///
    /// Safe to call while the worker is dispatching; the previous callback
    /// finishes before the new one is installed. Messages received while no
    /// callback is set are discarded.
    pub fn set_callback(&self, callback: impl FnMut(Message, &Sender) + Send + 'static) {
        *lock(&self.shared.callback) = Some(Box::new(callback));
    }

    /// Enqueue-only handle for use outside the client's lifetime rules.
    pub fn sender(&self) -> Sender {
        Sender {
            shared: self.shared.clone(),
        }
    }

    /// Whether to flush the outbound queue (best effort) when stopping.
    pub fn set_flush_on_exit(&self, flush: bool) {
        self.shared.flush_on_exit.store(flush, Ordering::Release);
    }

    /// Number of messages not yet handed to the transport.
    pub fn outstanding_messages(&self) -> usize {
        self.shared.outstanding()
    }

    /// Whether the worker is still serving (or still waiting to serve).
    pub fn good(&self) -> bool {
        self.shared.working.load(Ordering::Acquire)
    }

    /// Whether `connect` succeeded.
    pub fn connected(&self) -> bool {
        lock(&self.shared.gate).start_serving
            && !self.shared.connect_error.load(Ordering::Acquire)
    }

    /// Stop the worker and wait for it to join. Idempotent.
    ///
    /// With flush-on-exit set the worker drains the queue first (stopping
    /// at the first send failure); otherwise any blocked transport call is
    /// aborted and queued messages are discarded.
    pub fn sync_stop(&mut self) {
        {
            let mut gate = lock(&self.shared.gate);
            self.shared.working.store(false, Ordering::Release);
            gate.start_serving = true;
        }
        self.shared.gate_cond.notify_all();

        // Interrupting kills the transport, so only do it when the caller
        // did not ask for a flush; every blocking call the worker makes is
        // bounded, so the join below terminates regardless.
        if !self.shared.flush_on_exit.load(Ordering::Acquire) {
            if let Some(interrupt) = lock(&self.shared.interrupter).clone() {
                interrupt();
            }
        }

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.sync_stop();
    }
}

fn worker_main<T, F>(shared: Arc<Shared>, factory: F, ready_tx: mpsc::Sender<std::result::Result<(), TransportError>>)
where
    T: Transport + 'static,
    F: FnOnce() -> std::result::Result<T, TransportError>,
{
    let mut transport: Box<dyn Transport> = match factory() {
        Ok(t) => Box::new(t),
        Err(e) => {
            error!("failed to create transport: {e}");
            shared.working.store(false, Ordering::Release);
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    let setup = transport
        .set_linger(Duration::ZERO)
        .and_then(|_| transport.set_send_timeout(Some(shared.config.serve_send_timeout)));
    if let Err(e) = setup {
        error!("failed to configure transport: {e}");
        shared.working.store(false, Ordering::Release);
        let _ = ready_tx.send(Err(e));
        return;
    }

    *lock(&shared.interrupter) = Some(transport.interrupter());
    *lock(&shared.transport) = Some(transport);
    let _ = ready_tx.send(Ok(()));

    // Park until connect() or sync_stop() releases the gate.
    {
        let mut gate = lock(&shared.gate);
        while !gate.start_serving {
            gate = shared
                .gate_cond
                .wait(gate)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    let Some(mut transport) = lock(&shared.transport).take() else {
        shared.working.store(false, Ordering::Release);
        return;
    };

    let reason = run_connection(&shared, transport.as_mut());

    if reason.may_flush() && shared.flush_on_exit.load(Ordering::Acquire) {
        drain_queue(&shared, transport.as_mut());
    }
    transport.close();
    shared.working.store(false, Ordering::Release);
    debug!(?reason, "worker stopped");
}

fn run_connection(shared: &Arc<Shared>, transport: &mut dyn Transport) -> ExitReason {
    if shared.connect_error.load(Ordering::Acquire) {
        debug!("connect failed, worker stopping");
        return ExitReason::ConnectError;
    }
    if !shared.working.load(Ordering::Acquire) {
        return ExitReason::Stopped;
    }

    if !handshake(shared, transport) {
        return ExitReason::HandshakeFailed;
    }
    info!(role = ?shared.role, "connected to server");

    serve(shared, transport)
}

fn control_parts(role: ClientRole, control: ControlCode) -> Vec<Bytes> {
    vec![
        Bytes::copy_from_slice(&ControlFrame::new(role, control).encode()),
        Bytes::new(),
    ]
}

/// Send the connect control and validate the peer's `*_CREATE` reply.
fn handshake(shared: &Shared, transport: &mut dyn Transport) -> bool {
    let role = shared.role;
    let (connect_code, create_code) = match (role.connect_code(), role.create_code()) {
        (Some(connect), Some(create)) => (connect, create),
        _ => return false,
    };

    match transport.send_multipart(control_parts(role, connect_code)) {
        Ok(true) => {}
        Ok(false) => {
            warn!("handshake send timed out");
            return false;
        }
        Err(e) => {
            error!("failed to send handshake: {e}");
            return false;
        }
    }

    if let Err(e) = transport.set_recv_timeout(Some(shared.config.handshake_timeout)) {
        error!("failed to arm handshake timeout: {e}");
        return false;
    }

    let parts = match transport.recv_multipart() {
        Ok(Some(parts)) => parts,
        Ok(None) => {
            warn!("server did not respond within the handshake timeout, stopping client");
            return false;
        }
        Err(e) => {
            error!("failed to receive handshake: {e}");
            return false;
        }
    };

    let Some(frame) = parts.first().and_then(|raw| ControlFrame::decode(raw)) else {
        warn!("malformed handshake control frame");
        return false;
    };
    if !frame.version_ok() {
        warn!(
            expected = PROTOCOL_VERSION,
            received = frame.version,
            "protocol version mismatch in handshake"
        );
        return false;
    }
    if frame.role != role {
        warn!("server created a mismatching client role for us");
        return false;
    }
    if frame.control != create_code {
        warn!(control = ?frame.control, "unexpected handshake reply control code");
        return false;
    }
    true
}

fn serve(shared: &Arc<Shared>, transport: &mut dyn Transport) -> ExitReason {
    let role = shared.role;
    let ping_timeout = shared.config.ping_timeout(role);
    let mut last_hb_recv = Instant::now();
    // None forces a ping on the first writable iteration
    let mut last_hb_send: Option<Instant> = None;

    while shared.working.load(Ordering::Acquire) {
        let mut did_work = false;

        let ready = match transport.poll(shared.config.poll_interval) {
            Ok(ready) => ready,
            Err(e) => {
                error!("poll failed: {e} - stopping client");
                return ExitReason::TransportFatal;
            }
        };

        if ready.readable {
            did_work = true;
            for _ in 0..shared.config.batch_limit {
                if !shared.working.load(Ordering::Acquire) {
                    break;
                }
                let parts = match transport.recv_multipart() {
                    Ok(Some(parts)) => parts,
                    Ok(None) => break,
                    Err(e) => {
                        error!("receive failed: {e} - stopping client");
                        return ExitReason::TransportFatal;
                    }
                };
                handle_inbound(shared, &parts, &mut last_hb_recv);

                match transport.poll(Duration::ZERO) {
                    Ok(ready) if ready.readable => {}
                    Ok(_) => break,
                    Err(e) => {
                        error!("poll failed: {e} - stopping client");
                        return ExitReason::TransportFatal;
                    }
                }
            }
        }

        if ready.writable {
            let ping_due = last_hb_send.map_or(true, |sent| sent.elapsed() > ping_timeout / 2);
            if ping_due {
                match transport.send_multipart(control_parts(role, ControlCode::Ping)) {
                    Ok(true) => {
                        last_hb_send = Some(Instant::now());
                        did_work = true;
                    }
                    Ok(false) => {}
                    Err(e) => {
                        error!("ping send failed: {e} - stopping client");
                        return ExitReason::TransportFatal;
                    }
                }
            }

            match send_outbound(shared, transport, &mut last_hb_send) {
                Ok(sent_any) => did_work |= sent_any,
                Err(e) => {
                    error!("send failed: {e} - stopping client");
                    return ExitReason::TransportFatal;
                }
            }
        }

        if role == ClientRole::Heartbeat && last_hb_recv.elapsed() > ping_timeout {
            warn!("server unresponsive, stopping client");
            return ExitReason::PeerSilent;
        }

        if !did_work {
            thread::sleep(shared.config.idle_sleep);
        }
    }

    ExitReason::Stopped
}

/// Validate, classify and dispatch one inbound wire message.
///
/// Malformed frames are logged and dropped; the connection continues.
fn handle_inbound(shared: &Arc<Shared>, parts: &[Bytes], last_hb_recv: &mut Instant) {
    let Some(frame) = parts.first().and_then(|raw| ControlFrame::decode(raw)) else {
        warn!("malformed control frame, dropping message");
        return;
    };
    if !frame.version_ok() {
        warn!(
            expected = PROTOCOL_VERSION,
            received = frame.version,
            "protocol version mismatch, dropping message"
        );
        return;
    }
    if frame.role != shared.role {
        warn!(role = ?frame.role, "server sent a mismatching client role, dropping message");
        return;
    }

    *last_hb_recv = Instant::now();

    let payload = parts.get(1).cloned().unwrap_or_default();
    match frame.control {
        ControlCode::Data => match Message::parse(&payload) {
            Ok(message) => {
                let mut slot = lock(&shared.callback);
                if let Some(callback) = slot.as_mut() {
                    let sender = Sender {
                        shared: shared.clone(),
                    };
                    callback(message, &sender);
                }
            }
            Err(e) => warn!("dropping malformed data frame: {e}"),
        },
        ControlCode::Ping | ControlCode::Pong => {
            if !payload.is_empty() {
                warn!("missing empty frame after ping/pong");
            }
        }
        other => {
            warn!(?other, "unexpected control code while serving, dropping message");
        }
    }
}

/// Drain up to one batch of queued messages onto the transport.
fn send_outbound(
    shared: &Shared,
    transport: &mut dyn Transport,
    last_hb_send: &mut Option<Instant>,
) -> std::result::Result<bool, TransportError> {
    let mut sent_any = false;
    for _ in 0..shared.config.batch_limit {
        if !shared.working.load(Ordering::Acquire) {
            break;
        }
        let Some(payload) = lock(&shared.queue).front().cloned() else {
            break;
        };

        let parts = vec![
            Bytes::copy_from_slice(&ControlFrame::new(shared.role, ControlCode::Data).encode()),
            payload,
        ];
        if !transport.send_multipart(parts)? {
            // send timeout; leave the message queued and retry next round
            break;
        }
        lock(&shared.queue).pop_front();
        // a data frame counts as liveness from our side
        *last_hb_send = Some(Instant::now());
        sent_any = true;
    }
    Ok(sent_any)
}

/// Best-effort flush at shutdown; the first failure abandons the rest.
fn drain_queue(shared: &Shared, transport: &mut dyn Transport) {
    if let Err(e) = transport.set_send_timeout(Some(shared.config.drain_send_timeout)) {
        warn!("failed to arm drain timeout: {e}");
        return;
    }

    let mut queue = lock(&shared.queue);
    let mut flushed = 0usize;
    while let Some(payload) = queue.front().cloned() {
        let parts = vec![
            Bytes::copy_from_slice(&ControlFrame::new(shared.role, ControlCode::Data).encode()),
            payload,
        ];
        match transport.send_multipart(parts) {
            Ok(true) => {
                queue.pop_front();
                flushed += 1;
            }
            Ok(false) => break,
            Err(e) => {
                warn!("flush aborted: {e}");
                break;
            }
        }
    }
    debug!(flushed, remaining = queue.len(), "flush-on-exit finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::pair;

    #[test]
    fn test_config_defaults_match_protocol_constants() {
        let config = ClientConfig::default();
        assert_eq!(config.handshake_timeout, EXPORTER_TIMEOUT);
        assert_eq!(config.exporter_ping_timeout, EXPORTER_TIMEOUT);
        assert_eq!(config.heartbeat_ping_timeout, HEARTBEAT_TIMEOUT);
        assert_eq!(config.serve_send_timeout, Duration::from_millis(1000));
        assert_eq!(config.drain_send_timeout, Duration::from_millis(200));
        assert_eq!(config.poll_interval, Duration::from_millis(10));
        assert_eq!(config.batch_limit, MAX_BATCH_MESSAGES);
    }

    #[test]
    fn test_role_none_rejected() {
        let (transport, _peer) = pair();
        let result = Client::new(ClientRole::None, move || Ok(transport));
        assert!(matches!(result, Err(WireError::WorkerInit(_))));
    }

    #[test]
    fn test_send_before_connect_is_an_error() {
        let (transport, _peer) = pair();
        let mut client = Client::new(ClientRole::Exporter, move || Ok(transport)).unwrap();

        let result = client.send(&Message::plugin_remove("node"));
        assert!(matches!(result, Err(WireError::NotConnected)));
        assert_eq!(client.outstanding_messages(), 0);

        client.sync_stop();
    }

    #[test]
    fn test_stop_without_connect_joins_cleanly() {
        let (transport, _peer) = pair();
        let mut client = Client::new(ClientRole::Exporter, move || Ok(transport)).unwrap();
        assert!(client.good());
        assert!(!client.connected());

        client.sync_stop();
        assert!(!client.good());

        // idempotent
        client.sync_stop();
    }

    #[test]
    fn test_factory_failure_surfaces_from_constructor() {
        let result = Client::new(ClientRole::Exporter, || {
            Err::<crate::transport::MemoryTransport, _>(TransportError::Failed("no socket".into()))
        });
        assert!(matches!(result, Err(WireError::Transport(_))));
    }

    #[test]
    fn test_connect_error_flag_set_on_refused_connect() {
        let (transport, peer) = pair();
        peer.refuse_connections();

        let mut client = Client::new(ClientRole::Exporter, move || Ok(transport)).unwrap();
        assert!(client.connect("inproc://refused").is_err());
        assert!(!client.connected());

        client.sync_stop();
        assert!(!client.good());
    }

    #[test]
    fn test_double_connect_rejected() {
        let (transport, _peer) = pair();
        let mut client = Client::new(ClientRole::Exporter, move || Ok(transport)).unwrap();

        client.connect("inproc://render").unwrap();
        assert!(matches!(
            client.connect("inproc://render"),
            Err(WireError::AlreadyConnected)
        ));

        client.sync_stop();
    }
}
