use std::collections::HashMap;
use std::io;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use widget_logging::{widget_debug, widget_warn};

use crate::upload::{ChannelProgressSink, ReqwestUploader, UploadSettings, Uploader};
use crate::{EngineEvent, SessionId, UploadError, UploadRequest};

enum EngineCommand {
    Start {
        session_id: SessionId,
        request: UploadRequest,
    },
    Cancel {
        session_id: SessionId,
    },
}

type InFlight = Arc<Mutex<HashMap<SessionId, CancellationToken>>>;

/// Runs uploads on a background tokio runtime and reports their events.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: UploadSettings) -> io::Result<Self> {
        Self::with_uploader(Arc::new(ReqwestUploader::new(settings)))
    }

    pub fn with_uploader(uploader: Arc<dyn Uploader>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("widget-engine".to_string())
            .spawn(move || {
                let in_flight: InFlight = Arc::default();
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::Start {
                            session_id,
                            request,
                        } => {
                            let token = CancellationToken::new();
                            if let Ok(mut map) = in_flight.lock() {
                                map.insert(session_id, token.clone());
                            }
                            runtime.spawn(run_upload(
                                uploader.clone(),
                                session_id,
                                request,
                                token,
                                in_flight.clone(),
                                event_tx.clone(),
                            ));
                        }
                        EngineCommand::Cancel { session_id } => {
                            let token = in_flight
                                .lock()
                                .ok()
                                .and_then(|mut map| map.remove(&session_id));
                            match token {
                                Some(token) => token.cancel(),
                                None => widget_debug!(
                                    "Cancel for session {} which is not in flight",
                                    session_id
                                ),
                            }
                        }
                    }
                }
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn start(&self, session_id: SessionId, request: UploadRequest) {
        if self
            .cmd_tx
            .send(EngineCommand::Start {
                session_id,
                request,
            })
            .is_err()
        {
            widget_warn!("Engine thread gone; upload {} dropped", session_id);
        }
    }

    pub fn cancel(&self, session_id: SessionId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { session_id });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn run_upload(
    uploader: Arc<dyn Uploader>,
    session_id: SessionId,
    request: UploadRequest,
    token: CancellationToken,
    in_flight: InFlight,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let sink = Arc::new(ChannelProgressSink::new(event_tx.clone()));
    let result = tokio::select! {
        biased;
        _ = token.cancelled() => Err(UploadError::cancelled()),
        result = uploader.upload(session_id, &request, sink) => result,
    };
    if let Ok(mut map) = in_flight.lock() {
        map.remove(&session_id);
    }
    let _ = event_tx.send(EngineEvent::UploadCompleted { session_id, result });
}
