//! In-process transport pair.
//!
//! [`pair`] connects a [`MemoryTransport`] (the client end, implementing
//! [`Transport`]) to a [`MemoryPeer`] (the far end, driven directly by test
//! code standing in for the render server). Two crossbeam channels carry
//! whole multipart messages per direction, so framing is preserved exactly.
//!
//! The peer side can stop accepting writes ([`MemoryPeer::set_accepting`])
//! to simulate an offline or stalled server, and refuse connections
//! ([`MemoryPeer::refuse_connections`]) to exercise the connect-error path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use bytes::Bytes;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use super::{Readiness, Transport, TransportError};

/// Granularity of the poll/timeout simulation loops.
const TICK: Duration = Duration::from_millis(1);

enum Packet {
    Frames(Vec<Bytes>),
    /// Injected by the interrupter to wake a blocked receive.
    Interrupt,
}

struct Link {
    /// Peer is accepting writes (the analogue of socket writability).
    accepting: AtomicBool,
    /// Peer refuses the initial connect call.
    refuse_connect: AtomicBool,
    /// Set once the client end is interrupted or closed.
    interrupted: AtomicBool,
}

/// Client end of an in-process transport pair.
pub struct MemoryTransport {
    to_peer: Sender<Packet>,
    from_peer: Receiver<Packet>,
    /// Feeds the client's own inbound queue; used to wake blocked receives.
    wakeup: Sender<Packet>,
    link: Arc<Link>,
    identity: Option<u64>,
    endpoint: Option<String>,
    send_timeout: Option<Duration>,
    recv_timeout: Option<Duration>,
}

/// Far end of an in-process transport pair, driven by test code.
pub struct MemoryPeer {
    to_client: Sender<Packet>,
    from_client: Receiver<Packet>,
    link: Arc<Link>,
}

/// Create a connected transport/peer pair.
pub fn pair() -> (MemoryTransport, MemoryPeer) {
    let (to_peer, from_client) = unbounded();
    let (to_client, from_peer) = unbounded();
    let link = Arc::new(Link {
        accepting: AtomicBool::new(true),
        refuse_connect: AtomicBool::new(false),
        interrupted: AtomicBool::new(false),
    });

    let transport = MemoryTransport {
        to_peer,
        wakeup: to_client.clone(),
        from_peer,
        link: link.clone(),
        identity: None,
        endpoint: None,
        send_timeout: None,
        recv_timeout: None,
    };
    let peer = MemoryPeer {
        to_client,
        from_client,
        link,
    };
    (transport, peer)
}

impl MemoryTransport {
    /// Identity attached by the client, if any.
    pub fn identity(&self) -> Option<u64> {
        self.identity
    }

    /// Endpoint passed to `connect`, if any.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    fn check_open(&self) -> Result<(), TransportError> {
        if self.link.interrupted.load(Ordering::Acquire) {
            return Err(TransportError::Closed);
        }
        Ok(())
    }
}

impl Transport for MemoryTransport {
    fn connect(&mut self, endpoint: &str) -> Result<(), TransportError> {
        self.check_open()?;
        if self.link.refuse_connect.load(Ordering::Acquire) {
            return Err(TransportError::Failed(format!(
                "connection refused: {endpoint}"
            )));
        }
        self.endpoint = Some(endpoint.to_owned());
        Ok(())
    }

    fn set_identity(&mut self, identity: u64) -> Result<(), TransportError> {
        self.check_open()?;
        self.identity = Some(identity);
        Ok(())
    }

    fn set_linger(&mut self, _linger: Duration) -> Result<(), TransportError> {
        // nothing queues past close in the in-process pair
        self.check_open()
    }

    fn set_send_timeout(&mut self, timeout: Option<Duration>) -> Result<(), TransportError> {
        self.check_open()?;
        self.send_timeout = timeout;
        Ok(())
    }

    fn set_recv_timeout(&mut self, timeout: Option<Duration>) -> Result<(), TransportError> {
        self.check_open()?;
        self.recv_timeout = timeout;
        Ok(())
    }

    fn poll(&mut self, timeout: Duration) -> Result<Readiness, TransportError> {
        let deadline = Instant::now() + timeout;
        loop {
            self.check_open()?;
            let ready = Readiness {
                readable: !self.from_peer.is_empty(),
                writable: self.link.accepting.load(Ordering::Acquire),
            };
            if ready.readable || ready.writable || Instant::now() >= deadline {
                return Ok(ready);
            }
            thread::sleep(TICK);
        }
    }

    fn send_multipart(&mut self, parts: Vec<Bytes>) -> Result<bool, TransportError> {
        self.check_open()?;

        if !self.link.accepting.load(Ordering::Acquire) {
            // Simulate a blocked write running out its timeout.
            let deadline = self.send_timeout.map(|t| Instant::now() + t);
            loop {
                self.check_open()?;
                if self.link.accepting.load(Ordering::Acquire) {
                    break;
                }
                match deadline {
                    Some(d) if Instant::now() >= d => return Ok(false),
                    _ => thread::sleep(TICK),
                }
            }
        }

        self.to_peer
            .send(Packet::Frames(parts))
            .map_err(|_| TransportError::Closed)?;
        Ok(true)
    }

    fn recv_multipart(&mut self) -> Result<Option<Vec<Bytes>>, TransportError> {
        self.check_open()?;

        let packet = match self.recv_timeout {
            Some(timeout) => match self.from_peer.recv_timeout(timeout) {
                Ok(p) => p,
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => return Err(TransportError::Closed),
            },
            None => self
                .from_peer
                .recv()
                .map_err(|_| TransportError::Closed)?,
        };

        match packet {
            Packet::Frames(parts) => Ok(Some(parts)),
            Packet::Interrupt => Err(TransportError::Closed),
        }
    }

    fn interrupter(&self) -> Arc<dyn Fn() + Send + Sync> {
        let link = self.link.clone();
        let wakeup = self.wakeup.clone();
        Arc::new(move || {
            link.interrupted.store(true, Ordering::Release);
            let _ = wakeup.send(Packet::Interrupt);
        })
    }

    fn close(&mut self) {
        self.link.interrupted.store(true, Ordering::Release);
    }
}

impl MemoryPeer {
    /// Deliver one multipart message to the client.
    ///
    /// Returns false if the client end is gone.
    pub fn send(&self, parts: Vec<Bytes>) -> bool {
        self.to_client.send(Packet::Frames(parts)).is_ok()
    }

    /// Receive one multipart message from the client, waiting up to `timeout`.
    pub fn recv(&self, timeout: Duration) -> Option<Vec<Bytes>> {
        match self.from_client.recv_timeout(timeout) {
            Ok(Packet::Frames(parts)) => Some(parts),
            _ => None,
        }
    }

    /// Receive without waiting.
    pub fn try_recv(&self) -> Option<Vec<Bytes>> {
        match self.from_client.try_recv() {
            Ok(Packet::Frames(parts)) => Some(parts),
            _ => None,
        }
    }

    /// Toggle write acceptance; `false` simulates an offline/stalled peer.
    pub fn set_accepting(&self, accepting: bool) {
        self.link.accepting.store(accepting, Ordering::Release);
    }

    /// Make the next `connect` call fail.
    pub fn refuse_connections(&self) {
        self.link.refuse_connect.store(true, Ordering::Release);
    }

    /// Number of client messages waiting to be received.
    pub fn pending(&self) -> usize {
        self.from_client.len()
    }
}
