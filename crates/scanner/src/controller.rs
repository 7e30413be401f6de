use std::{sync::Arc, time::Duration};

use api::ParticipantApi;
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::camera::{Camera, CameraDevice, DecodeEvent, DecoderSession, DecoderState, ScanConfig, pick_device};
use crate::checkin::{ScanOutcome, process_payload};
use crate::error::{ScanError, ScanFailure};
use crate::gate::{CheckInGate, GatePermit};
use crate::notice::ScanNotice;

pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1500);

/// Decoder errors logged per session before the rest are suppressed
const MAX_LOGGED_DECODER_ERRORS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Starting,
    Scanning,
    Processing,
    Failed(ScanFailure),
}

#[derive(Debug)]
pub enum ScanCommand {
    /// Out-of-band payload, e.g. typed by an operator. Carries the gate
    /// permit taken at submission, so at most one is ever in flight.
    Manual(String, GatePermit),
    Stop,
}

#[derive(Default)]
struct ScanSession {
    decoder: Option<DecoderSession>,
    device: Option<CameraDevice>,
    decoder_errors: u32,
}

enum Step {
    Command(Option<ScanCommand>),
    Event(Option<DecodeEvent>),
}

/// Cloneable remote for a running controller.
#[derive(Clone)]
pub struct ScanHandle {
    commands: mpsc::UnboundedSender<ScanCommand>,
    gate: CheckInGate,
}

impl ScanHandle {
    /// Hands a manual payload to the controller. Returns false when a
    /// check-in is already in flight, in which case the payload is dropped.
    pub fn submit(&self, raw: impl Into<String>) -> bool {
        let Some(permit) = self.gate.try_acquire() else {
            debug!("Check-in in progress, dropping manual payload");
            return false;
        };
        self.commands
            .send(ScanCommand::Manual(raw.into(), permit))
            .is_ok()
    }

    pub fn stop(&self) {
        let _ = self.commands.send(ScanCommand::Stop);
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }
}

/// Drives one scan session: camera selection, decode handling, the
/// check-in round trip and the restart afterwards.
pub struct ScanController {
    camera: Arc<dyn Camera>,
    api: Arc<dyn ParticipantApi>,
    config: ScanConfig,
    settle_delay: Duration,
    gate: CheckInGate,
    state: ScanState,
    session: ScanSession,
    notices: mpsc::UnboundedSender<ScanNotice>,
    commands_tx: mpsc::UnboundedSender<ScanCommand>,
    commands_rx: mpsc::UnboundedReceiver<ScanCommand>,
}

impl ScanController {
    pub fn new(
        camera: Arc<dyn Camera>,
        api: Arc<dyn ParticipantApi>,
    ) -> (Self, mpsc::UnboundedReceiver<ScanNotice>) {
        let (notices, notices_rx) = mpsc::unbounded_channel();
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();

        let controller = Self {
            camera,
            api,
            config: ScanConfig::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            gate: CheckInGate::new(),
            state: ScanState::Idle,
            session: ScanSession::default(),
            notices,
            commands_tx,
            commands_rx,
        };

        (controller, notices_rx)
    }

    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn handle(&self) -> ScanHandle {
        ScanHandle {
            commands: self.commands_tx.clone(),
            gate: self.gate.clone(),
        }
    }

    /// Picks a device and starts the decoder.
    pub async fn activate(&mut self) -> Result<(), ScanError> {
        if self.session.decoder.is_some() {
            return Ok(());
        }

        self.state = ScanState::Starting;
        self.session.decoder_errors = 0;

        let devices = match self.camera.list_devices().await {
            Ok(devices) => devices,
            Err(e) => {
                warn!("Failed to enumerate cameras: {}", e);
                Vec::new()
            }
        };

        let Some(device) = pick_device(&devices, self.config.facing).cloned() else {
            return Err(self.fail(ScanError::NoCameraDetected));
        };

        info!("Using camera {} ({})", device.label, device.id);

        match self.camera.start(&device, &self.config).await {
            Ok(decoder) => {
                self.session.decoder = Some(decoder);
                self.session.device = Some(device);
                self.state = ScanState::Scanning;
                Ok(())
            }
            Err(e) => Err(self.fail(ScanError::CameraStart(e))),
        }
    }

    /// Handles one payload end to end. Returns `Ok(None)` when the payload was
    /// dropped because a check-in is already in flight.
    pub async fn submit(&mut self, raw: &str) -> Result<Option<ScanOutcome>, ScanError> {
        let Some(permit) = self.gate.try_acquire() else {
            debug!("Check-in in progress, dropping payload");
            return Ok(None);
        };

        self.check_in(raw, permit).await
    }

    async fn check_in(
        &mut self,
        raw: &str,
        permit: GatePermit,
    ) -> Result<Option<ScanOutcome>, ScanError> {
        if let ScanState::Failed(failure) = self.state {
            debug!("Session failed ({:?}), ignoring payload", failure);
            return Ok(None);
        }

        self.state = ScanState::Processing;
        self.release_decoder().await;

        let outcome = process_payload(self.api.as_ref(), raw).await;
        self.publish(outcome.notice());

        tokio::time::sleep(self.settle_delay).await;
        drop(permit);

        self.restart().await?;
        Ok(Some(outcome))
    }

    /// Releases the decoder and resets the session. Safe to call repeatedly.
    pub async fn deactivate(&mut self) {
        self.release_decoder().await;
        self.session.device = None;
        self.session.decoder_errors = 0;

        if !matches!(self.state, ScanState::Failed(_)) {
            self.state = ScanState::Idle;
        }
    }

    /// Runs until stopped, the decoder stream ends, or the session fails.
    pub async fn run(mut self) -> Result<(), ScanError> {
        let result = self.run_session().await;
        self.deactivate().await;
        result
    }

    async fn run_session(&mut self) -> Result<(), ScanError> {
        self.activate().await?;

        loop {
            let step = tokio::select! {
                command = self.commands_rx.recv() => Step::Command(command),
                event = next_event(&mut self.session) => Step::Event(event),
            };

            match step {
                Step::Command(Some(ScanCommand::Manual(raw, permit))) => {
                    self.check_in(&raw, permit).await?;
                }
                Step::Command(Some(ScanCommand::Stop)) | Step::Command(None) => {
                    info!("Scan session stopped");
                    return Ok(());
                }
                Step::Event(Some(DecodeEvent::Decoded(text))) => {
                    self.submit(&text).await?;
                }
                Step::Event(Some(DecodeEvent::NoCodeInFrame)) => {}
                Step::Event(Some(DecodeEvent::Error(message))) => {
                    self.record_decoder_error(&message);
                }
                Step::Event(None) => {
                    warn!("Decoder stream ended, closing scan session");
                    return Ok(());
                }
            }
        }
    }

    async fn restart(&mut self) -> Result<(), ScanError> {
        let Some(device) = self.session.device.clone() else {
            self.state = ScanState::Idle;
            return Ok(());
        };

        match self.camera.start(&device, &self.config).await {
            Ok(decoder) => {
                self.session.decoder = Some(decoder);
                self.state = ScanState::Scanning;
                Ok(())
            }
            Err(e) => Err(self.fail(ScanError::RestartFailed(e))),
        }
    }

    async fn release_decoder(&mut self) {
        let Some(mut decoder) = self.session.decoder.take() else {
            return;
        };

        if matches!(
            decoder.handle.state(),
            DecoderState::Scanning | DecoderState::Paused
        ) {
            if let Err(e) = decoder.handle.stop().await {
                debug!("Ignoring decoder stop error: {}", e);
            }
        }

        if let Err(e) = decoder.handle.clear() {
            debug!("Ignoring decoder clear error: {}", e);
        }
    }

    /// Returns whether the error was logged.
    fn record_decoder_error(&mut self, message: &str) -> bool {
        self.session.decoder_errors += 1;
        let count = self.session.decoder_errors;

        if count <= MAX_LOGGED_DECODER_ERRORS {
            warn!("Decoder error: {}", message);
            true
        } else {
            if count == MAX_LOGGED_DECODER_ERRORS + 1 {
                debug!("Suppressing further decoder errors for this session");
            }
            false
        }
    }

    fn fail(&mut self, error: ScanError) -> ScanError {
        error!("Scan session failed: {}", error);
        let failure = error.failure();
        self.state = ScanState::Failed(failure);
        self.publish(ScanNotice::from_failure(failure));
        error
    }

    fn publish(&self, notice: ScanNotice) {
        debug!("Notice: {}", notice);
        let _ = self.notices.send(notice);
    }
}

async fn next_event(session: &mut ScanSession) -> Option<DecodeEvent> {
    match session.decoder.as_mut() {
        Some(decoder) => decoder.events.next().await,
        None => futures::future::pending().await,
    }
}
