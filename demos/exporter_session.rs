//! Minimal exporter session against an in-process fake server.
//!
//! Run with: `cargo run --example exporter_session`

use std::thread;
use std::time::Duration;

use bytes::Bytes;

use renderwire::attr::AttrValue;
use renderwire::client::Client;
use renderwire::message::Message;
use renderwire::protocol::{ClientRole, ControlCode, ControlFrame};
use renderwire::transport::pair;

fn main() {
    tracing_subscriber::fmt().init();

    let (transport, peer) = pair();

    // Fake render server: answer the handshake, then acknowledge each data
    // frame with a log line.
    let server = thread::spawn(move || {
        let parts = peer.recv(Duration::from_secs(1)).expect("no handshake");
        let frame = ControlFrame::decode(&parts[0]).expect("bad handshake frame");
        assert_eq!(frame.control, ControlCode::ExporterConnect);
        peer.send(vec![
            Bytes::copy_from_slice(
                &ControlFrame::new(ClientRole::Exporter, ControlCode::RendererCreate).encode(),
            ),
            Bytes::new(),
        ]);

        let mut seen = 0;
        while seen < 2 {
            let Some(parts) = peer.recv(Duration::from_secs(1)) else {
                break;
            };
            let frame = ControlFrame::decode(&parts[0]).expect("bad control frame");
            if frame.control != ControlCode::Data {
                continue;
            }
            let message = Message::parse(&parts[1]).expect("bad payload");
            println!("server received: {message:?}");
            seen += 1;
            peer.send(vec![
                Bytes::copy_from_slice(
                    &ControlFrame::new(ClientRole::Exporter, ControlCode::Data).encode(),
                ),
                Message::vray_log(3, format!("applied #{seen}"))
                    .encode()
                    .expect("encode log"),
            ]);
        }
    });

    let mut client =
        Client::new(ClientRole::Exporter, move || Ok(transport)).expect("client start");
    client.set_callback(|message, _sender| println!("client received: {message:?}"));
    client.connect("inproc://render").expect("connect");

    client
        .send(&Message::plugin_create("teapot_01", "GeomMeshFile"))
        .expect("send create");
    client
        .send(&Message::plugin_update(
            "teapot_01",
            "subdivs",
            AttrValue::from(2),
        ))
        .expect("send update");

    thread::sleep(Duration::from_millis(300));
    server.join().expect("server thread");
    client.sync_stop();
}
