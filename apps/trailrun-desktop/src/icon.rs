use std::path::PathBuf;
use std::thread;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use trailrun_render_wgpu::{CapturedFrame, SnapshotError, Thumbnail};
use winit::window::{Icon, Window};

/// Edge length of the window icon in pixels.
pub const ICON_SIZE: u32 = 64;

const THUMBNAIL_FILE: &str = "thumbnail.png";

/// Turns captured frames into window icons off the render thread.
///
/// A worker thread scales and encodes each frame and, when a snapshot
/// directory is configured, writes the PNG there. The frame loop polls
/// for finished thumbnails and never blocks. At most one frame is in
/// flight; later exports while busy are dropped.
pub struct IconExporter {
    jobs: Sender<CapturedFrame>,
    results: Receiver<Result<Thumbnail, SnapshotError>>,
    in_flight: bool,
}

impl IconExporter {
    pub fn spawn(size: u32, snapshot_dir: Option<PathBuf>) -> std::io::Result<Self> {
        let (jobs, job_rx) = crossbeam_channel::bounded::<CapturedFrame>(1);
        let (result_tx, results) = crossbeam_channel::bounded(1);

        thread::Builder::new()
            .name("icon-export".into())
            .spawn(move || {
                for frame in job_rx {
                    let result = frame.thumbnail(size);
                    if let (Ok(thumb), Some(dir)) = (&result, &snapshot_dir) {
                        let path = dir.join(THUMBNAIL_FILE);
                        match std::fs::write(&path, &thumb.png) {
                            Ok(()) => tracing::debug!(path = %path.display(), "thumbnail written"),
                            Err(e) => tracing::debug!("failed to write thumbnail: {e}"),
                        }
                    }
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            jobs,
            results,
            in_flight: false,
        })
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Hand a captured frame to the worker. Ignored while one is in flight.
    pub fn submit(&mut self, frame: CapturedFrame) {
        if self.in_flight {
            return;
        }
        match self.jobs.try_send(frame) {
            Ok(()) => self.in_flight = true,
            Err(e) => tracing::debug!("icon worker unavailable: {e}"),
        }
    }

    /// Next finished thumbnail, if any.
    pub fn poll(&mut self) -> Option<Thumbnail> {
        let result = match self.results.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                self.in_flight = false;
                return None;
            }
        };
        self.in_flight = false;
        match result {
            Ok(thumb) => Some(thumb),
            Err(e) => {
                tracing::debug!("thumbnail failed: {e}");
                None
            }
        }
    }

    /// Apply a finished thumbnail as the window icon.
    pub fn apply(&mut self, window: &Window) {
        let Some(thumb) = self.poll() else {
            return;
        };
        match Icon::from_rgba(thumb.rgba, thumb.size, thumb.size) {
            Ok(icon) => {
                window.set_window_icon(Some(icon));
                tracing::debug!(size = thumb.size, "window icon updated");
            }
            Err(e) => tracing::debug!("rejected icon: {e}"),
        }
    }
}
