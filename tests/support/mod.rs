//! Shared mock collaborators for orchestrator integration tests.
//!
//! Every mock records into a shared `EventLog`, so tests can assert not
//! just what happened but in which order (hide before capture, restore
//! before the result surfaces).

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::RgbaImage;
use textgrab_lib::capture::{RasterFrame, ScreenCapturer};
use textgrab_lib::error::CaptureError;
use textgrab_lib::geometry::{
    DisplayGeometryProvider, DisplaySnapshot, LogicalRect, PhysicalRect,
};
use textgrab_lib::windows::{WindowOpError, WindowOps};

#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count_of(&self, event: &str) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }

    pub fn index_of(&self, event: &str) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }
}

/// The reference display: 1440x900 logical at scale 2, with a
/// 25px menu bar excluded from the work area.
pub fn retina_snapshot() -> DisplaySnapshot {
    DisplaySnapshot {
        scale_factor: 2.0,
        screen_bounds: LogicalRect::new(0.0, 0.0, 1440.0, 900.0),
        work_area: LogicalRect::new(0.0, 25.0, 1440.0, 875.0),
    }
}

pub struct MockGeometry {
    snapshot: DisplaySnapshot,
    pub calls: AtomicUsize,
}

impl MockGeometry {
    pub fn new(snapshot: DisplaySnapshot) -> Arc<Self> {
        Arc::new(Self {
            snapshot,
            calls: AtomicUsize::new(0),
        })
    }
}

impl DisplayGeometryProvider for MockGeometry {
    fn snapshot(&self) -> Result<DisplaySnapshot, CaptureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot.clone())
    }
}

pub struct MockWindow {
    label: String,
    visible: AtomicBool,
    pub destroyed: AtomicBool,
    pub fail_show: AtomicBool,
    bounds: PhysicalRect,
    log: EventLog,
}

impl MockWindow {
    pub fn new(label: &str, visible: bool, bounds: PhysicalRect, log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            visible: AtomicBool::new(visible),
            destroyed: AtomicBool::new(false),
            fail_show: AtomicBool::new(false),
            bounds,
            log: log.clone(),
        })
    }

    pub fn is_currently_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

impl WindowOps for MockWindow {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_visible(&self) -> Result<bool, WindowOpError> {
        Ok(self.visible.load(Ordering::SeqCst))
    }

    fn hide(&self) -> Result<(), WindowOpError> {
        self.log.record(format!("hide:{}", self.label));
        self.visible.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn show(&self) -> Result<(), WindowOpError> {
        if self.fail_show.load(Ordering::SeqCst) {
            return Err(WindowOpError(format!("show failed for {}", self.label)));
        }
        self.log.record(format!("show:{}", self.label));
        self.visible.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn outer_bounds(&self) -> Result<PhysicalRect, WindowOpError> {
        Ok(self.bounds)
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }
}

pub enum CaptureBehavior {
    /// Return a raster of the given dimensions.
    Frame(u32, u32),
    /// Fail as if the OS reported no capturable source.
    Fail,
    /// Block for the given duration, then return a full-resolution raster.
    Hang(Duration),
}

pub struct MockCapturer {
    behavior: CaptureBehavior,
    log: EventLog,
}

impl MockCapturer {
    pub fn new(behavior: CaptureBehavior, log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            log: log.clone(),
        })
    }
}

impl ScreenCapturer for MockCapturer {
    fn capture_screen(&self) -> Result<RasterFrame, CaptureError> {
        self.log.record("capture");
        match self.behavior {
            CaptureBehavior::Frame(width, height) => {
                Ok(RasterFrame::new(RgbaImage::new(width, height)))
            }
            CaptureBehavior::Fail => Err(CaptureError::NoCapturableSurface(
                "simulated: no sources".to_string(),
            )),
            CaptureBehavior::Hang(duration) => {
                std::thread::sleep(duration);
                Ok(RasterFrame::new(RgbaImage::new(2880, 1800)))
            }
        }
    }
}
