//! WebSocket transport backed by tokio-tungstenite.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info};
use url::Url;

use crate::{
    error::TransportError,
    link::{Transport, TransportEvent},
};

/// Write half handed to the link session. Frames are queued to the socket task
/// and written in the order they were transmitted.
#[derive(Debug, Clone)]
pub struct WsTransport {
    outbound: mpsc::UnboundedSender<String>,
    ready: Arc<AtomicBool>,
}

impl Transport for WsTransport {
    fn is_writable(&self) -> bool {
        self.ready.load(Ordering::Acquire) && !self.outbound.is_closed()
    }

    fn transmit(&mut self, frame: String) -> Result<(), TransportError> {
        self.outbound.send(frame).map_err(|_| TransportError::Closed)
    }
}

pub struct WsLink {
    pub transport: WsTransport,
    pub events: mpsc::UnboundedReceiver<TransportEvent>,
    pub task: JoinHandle<()>,
}

/// Starts connecting to `url` in the background. Lifecycle changes arrive on
/// `events`; exactly one `Closed` is emitted when the socket task ends.
pub fn spawn_ws_link(url: Url) -> WsLink {
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let ready = Arc::new(AtomicBool::new(false));

    let task = tokio::spawn(run_socket(
        url,
        outbound_rx,
        events_tx,
        Arc::clone(&ready),
    ));

    WsLink {
        transport: WsTransport {
            outbound: outbound_tx,
            ready,
        },
        events: events_rx,
        task,
    }
}

async fn run_socket(
    url: Url,
    mut outbound: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<TransportEvent>,
    ready: Arc<AtomicBool>,
) {
    info!(%url, "connecting to actuator");
    let ws_stream = match connect_async(url.as_str()).await {
        Ok((stream, _)) => stream,
        Err(err) => {
            error!(%url, %err, "failed to connect websocket");
            let _ = events.send(TransportEvent::Error(format!(
                "failed to connect websocket: {err}"
            )));
            let _ = events.send(TransportEvent::Closed);
            return;
        }
    };
    let (mut writer, mut reader) = ws_stream.split();

    ready.store(true, Ordering::Release);
    let _ = events.send(TransportEvent::Opened);

    let failure = loop {
        tokio::select! {
            frame = outbound.recv() => match frame {
                Some(frame) => {
                    if let Err(err) = writer.send(Message::Text(frame)).await {
                        break Some(format!("websocket send failed: {err}"));
                    }
                }
                None => {
                    debug!("link session dropped; closing websocket");
                    let _ = writer.close().await;
                    break None;
                }
            },
            incoming = reader.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let _ = events.send(TransportEvent::Message(text));
                }
                Some(Ok(Message::Close(frame))) => {
                    info!(?frame, "actuator closed the link");
                    break None;
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => break Some(format!("websocket receive failed: {err}")),
                None => break None,
            },
        }
    };

    ready.store(false, Ordering::Release);
    if let Some(reason) = failure {
        let _ = events.send(TransportEvent::Error(reason));
    }
    let _ = events.send(TransportEvent::Closed);
}
