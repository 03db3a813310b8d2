//! textgrab — Tauri application entry point.
//!
//! This is the app shell that wires together all domains and commands.
//! No business logic lives here — only module declarations, plugin
//! registration, state management, and the command registry.
//!
//! Commands are split across:
//!   - commands.rs — simple one-step commands (start, cancel, clipboard)
//!   - pipeline.rs — the multi-step capture attempt (finish_selection)

pub mod capture;
pub mod commands;
pub mod config;
pub mod error;
pub mod geometry;
pub mod ocr;
pub mod orchestrator;
pub mod overlay;
pub mod pipeline;
pub mod windows;

use std::sync::{Arc, Mutex, PoisonError};

use tauri::Manager;
use tauri_plugin_global_shortcut::ShortcutState;
use tokio_util::sync::CancellationToken;

use capture::{CaptureState, XcapCapturer};
use config::CapturePolicy;
use geometry::{DisplayGeometryProvider, TauriGeometryProvider};
use ocr::{OcrEngine, TesseractCli};
use orchestrator::CaptureOrchestrator;
use windows::{OwnedWindowRegistry, TauriWindowOps, WindowTag};

/// Hotkey that opens the selection overlay.
const CAPTURE_SHORTCUT: &str = "CmdOrCtrl+Shift+T";

/// Everything the commands need, managed as Tauri state.
pub struct AppState {
    pub orchestrator: Arc<CaptureOrchestrator>,
    pub registry: Arc<OwnedWindowRegistry>,
    pub geometry: Arc<dyn DisplayGeometryProvider>,
    pub ocr: Option<Arc<dyn OcrEngine>>,
    pub capture: CaptureState,
    /// Token for the current gesture/attempt, replaced per gesture.
    cancel: Mutex<CancellationToken>,
}

impl AppState {
    pub fn new(app: tauri::AppHandle) -> Self {
        let registry = Arc::new(OwnedWindowRegistry::new());
        let geometry: Arc<dyn DisplayGeometryProvider> =
            Arc::new(TauriGeometryProvider::new(app));
        let policy = CapturePolicy::from_env();
        log::info!("[STARTUP] policy: {:?}", policy);

        let orchestrator = Arc::new(CaptureOrchestrator::new(
            geometry.clone(),
            Arc::new(XcapCapturer),
            registry.clone(),
            policy,
        ));

        let ocr: Option<Arc<dyn OcrEngine>> = match TesseractCli::discover() {
            Ok(engine) => Some(Arc::new(engine)),
            Err(e) => {
                log::warn!("[OCR] {} — captures will fail until an engine is installed", e);
                None
            }
        };

        Self {
            orchestrator,
            registry,
            geometry,
            ocr,
            capture: CaptureState::new(),
            cancel: Mutex::new(CancellationToken::new()),
        }
    }

    /// Arm a fresh token for a new gesture. The previous token is
    /// dropped un-cancelled; any attempt still holding it finishes on
    /// its own terms.
    pub fn begin_attempt(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.cancel_lock() = token.clone();
        token
    }

    pub fn current_token(&self) -> CancellationToken {
        self.cancel_lock().clone()
    }

    pub fn cancel_current(&self) {
        self.cancel_lock().cancel();
    }

    fn cancel_lock(&self) -> std::sync::MutexGuard<'_, CancellationToken> {
        self.cancel.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Entry point — called by the Tauri runtime.
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Load .env.local -> .env from the project root. CARGO_MANIFEST_DIR
    // finds the project regardless of the binary's working directory.
    let manifest_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    'env_load: for env_file in [".env.local", ".env"] {
        let path = manifest_dir.join(env_file);
        if path.exists() {
            match dotenvy::from_path(&path) {
                Ok(_) => eprintln!("[STARTUP] Loaded {}", path.display()),
                Err(e) => eprintln!("[STARTUP] Failed to load {}: {}", path.display(), e),
            }
            break 'env_load;
        }
    }

    env_logger::init();

    tauri::Builder::default()
        .plugin(
            tauri_plugin_global_shortcut::Builder::new()
                .with_shortcuts([CAPTURE_SHORTCUT])
                .expect("capture shortcut must parse")
                .with_handler(|app, _shortcut, event| {
                    if event.state() == ShortcutState::Pressed {
                        log::info!("[SHORTCUT] capture hotkey pressed");
                        let state = app.state::<AppState>();
                        if let Err(e) = overlay::open_overlay(app, &state) {
                            log::error!("[SHORTCUT] failed to open overlay: {}", e);
                        }
                    }
                })
                .build(),
        )
        .invoke_handler(tauri::generate_handler![
            // Simple commands (commands.rs)
            commands::start_capture,
            commands::cancel_capture,
            commands::copy_to_clipboard,
            commands::get_last_capture,
            commands::get_capturable_surfaces,
            // Pipeline command (pipeline.rs)
            pipeline::finish_selection,
        ])
        .setup(|app| {
            log::info!("textgrab starting up");
            let state = AppState::new(app.handle().clone());

            // The main window comes from tauri.conf.json; register it so
            // hide/restore and the self-capture guard know about it.
            if let Some(main) = app.get_webview_window("main") {
                state
                    .registry
                    .register(WindowTag::Main, Arc::new(TauriWindowOps::new(main)));
            }

            app.manage(state);
            log::info!("[STARTUP] ready — press {} to capture", CAPTURE_SHORTCUT);
            Ok(())
        })
        .on_window_event(|window, event| {
            if matches!(event, tauri::WindowEvent::Destroyed) {
                let app = window.app_handle();
                if let Some(state) = app.try_state::<AppState>() {
                    state.registry.unregister(window.label());
                }
            }
        })
        .run(tauri::generate_context!())
        .expect("error running textgrab");
}
