use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    sync::mpsc,
    task::JoinHandle,
};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, info, warn};

use super::{Camera, CameraDevice, DecodeEvent, DecoderHandle, DecoderSession, DecoderState, Facing, ScanConfig};
use crate::error::CameraError;

/// Consecutive read errors after which a reader is given up on
const MAX_CONSECUTIVE_READ_ERRORS: u32 = 5;

const READ_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Treats line-oriented readers as cameras: hardware QR scanners exposed as
/// serial or HID character devices, or FIFOs fed by another decoder.
///
/// Each non-empty line is one decoded code; blank lines count as "no code in frame".
/// Devices and FIFOs are read through the reactor, so stopping a decoder closes
/// its descriptor right away. Regular files are read from the start on every
/// restart, so prefer devices or FIFOs.
pub struct LineCamera {
    paths: Vec<PathBuf>,
}

impl LineCamera {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Camera for LineCamera {
    async fn list_devices(&self) -> Result<Vec<CameraDevice>, CameraError> {
        let mut devices = Vec::new();

        for path in &self.paths {
            match tokio::fs::metadata(path).await {
                Ok(_) => devices.push(CameraDevice {
                    id: path.display().to_string(),
                    label: path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string()),
                    facing: Facing::Unknown,
                }),
                Err(e) => debug!("Skipping reader {}: {}", path.display(), e),
            }
        }

        Ok(devices)
    }

    async fn start(
        &self,
        device: &CameraDevice,
        config: &ScanConfig,
    ) -> Result<DecoderSession, CameraError> {
        let path = Path::new(&device.id);
        let (tx, rx) = mpsc::unbounded_channel();

        let task = if tokio::fs::metadata(path).await?.is_file() {
            tokio::spawn(read_lines(File::open(path).await?, tx))
        } else {
            tokio::spawn(read_lines(open_stream(path)?, tx))
        };

        info!(
            "Reading codes from {} (fps hint {}, box {})",
            device.id, config.fps, config.qr_box
        );

        Ok(DecoderSession {
            handle: Box::new(LineDecoder {
                task: Some(task),
                state: DecoderState::Scanning,
            }),
            events: Box::pin(UnboundedReceiverStream::new(rx)),
        })
    }
}

/// Opens a FIFO or character device non-blocking and registers it with the reactor.
#[cfg(unix)]
fn open_stream(path: &Path) -> io::Result<tokio::net::unix::pipe::Receiver> {
    let mut options = tokio::net::unix::pipe::OpenOptions::new();
    // Holding a write end keeps a FIFO from reporting EOF between writers
    #[cfg(target_os = "linux")]
    options.read_write(true);
    options.unchecked(true).open_receiver(path)
}

#[cfg(not(unix))]
fn open_stream(path: &Path) -> io::Result<File> {
    std::fs::File::open(path).map(File::from_std)
}

async fn read_lines<R>(reader: R, tx: mpsc::UnboundedSender<DecodeEvent>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut failures = 0;

    loop {
        let event = match lines.next_line().await {
            Ok(Some(line)) => {
                failures = 0;
                let text = line.trim();
                if text.is_empty() {
                    DecodeEvent::NoCodeInFrame
                } else {
                    DecodeEvent::Decoded(text.to_string())
                }
            }
            Ok(None) => break,
            Err(e) => {
                failures += 1;
                DecodeEvent::Error(e.to_string())
            }
        };

        if tx.send(event).is_err() {
            break;
        }

        if failures >= MAX_CONSECUTIVE_READ_ERRORS {
            warn!("Giving up on reader after {} consecutive errors", failures);
            break;
        }
        if failures > 0 {
            tokio::time::sleep(READ_ERROR_BACKOFF).await;
        }
    }
}

struct LineDecoder {
    task: Option<JoinHandle<()>>,
    state: DecoderState,
}

#[async_trait]
impl DecoderHandle for LineDecoder {
    fn state(&self) -> DecoderState {
        self.state
    }

    async fn stop(&mut self) -> Result<(), CameraError> {
        let task = self
            .task
            .take()
            .ok_or_else(|| CameraError::Decoder("reader is not running".to_string()))?;

        task.abort();
        // Cancelled is the expected result here
        let _ = task.await;
        self.state = DecoderState::NotStarted;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CameraError> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.state = DecoderState::NotStarted;
        Ok(())
    }
}

impl Drop for LineDecoder {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
