//! The multi-step capture pipeline command.
//!
//! `finish_selection` drives one full attempt: orchestrator (guard,
//! hide, capture, crop, restore) -> OCR -> clipboard -> terminal event.
//! Exactly one of `capture-succeeded` / `capture-rejected` /
//! `capture-failed` is emitted per attempt, never zero, never more.
//!
//! OCR runs strictly after the orchestrator returns — windows are
//! already restored while recognition is still chewing on the crop.

use base64::Engine as _;
use tauri::Emitter;

use crate::capture::LastCapture;
use crate::error::CaptureError;
use crate::geometry::{SelectionOrigin, SelectionRect};
use crate::AppState;

#[derive(Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct CaptureSucceeded {
    text: String,
    confidence: f64,
    png_base64: String,
}

#[derive(Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct CaptureRejected {
    reason: &'static str,
    message: String,
}

#[derive(Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct CaptureFailed {
    error: String,
    message: String,
}

fn rejection_reason(error: &CaptureError) -> &'static str {
    match error {
        CaptureError::SelfCaptureRejected => "self-capture",
        CaptureError::SelectionTooSmall { .. } => "too-small",
        CaptureError::AttemptInProgress => "busy",
        CaptureError::Cancelled => "cancelled",
        _ => "rejected",
    }
}

/// Tauri command: run the pipeline for a finished drag gesture.
///
/// The frontend reports the selection in the coordinate space it was
/// drawn in; the origin tag travels with the rectangle from here on.
#[tauri::command]
pub async fn finish_selection(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    origin: SelectionOrigin,
    language: Option<String>,
) -> Result<(), String> {
    let pipeline_start = std::time::Instant::now();
    let selection = SelectionRect::new(x, y, width, height, origin);
    let cancel = state.current_token();

    // The overlay's job ends with the gesture: tear it down before the
    // attempt so the capture sees the clean screen underneath, not the
    // dimmed selection surface.
    crate::overlay::close_overlay(&app, &state.registry);

    let result = state.orchestrator.run(selection, &cancel).await;

    let region = match result {
        Ok(region) => region,
        Err(e) if e.is_rejection() => {
            log::info!("[PIPELINE] attempt rejected: {}", e);
            emit(
                &app,
                "capture-rejected",
                CaptureRejected {
                    reason: rejection_reason(&e),
                    message: e.user_message(),
                },
            );
            return Ok(());
        }
        Err(e) => {
            log::error!("[PIPELINE] attempt failed: {}", e);
            emit(
                &app,
                "capture-failed",
                CaptureFailed {
                    error: e.to_string(),
                    message: e.user_message(),
                },
            );
            return Ok(());
        }
    };

    let capture_ms = pipeline_start.elapsed().as_millis();
    log::info!(
        "[PIPELINE] capture+crop: {}ms ({} bytes PNG)",
        capture_ms,
        region.png.len()
    );

    // Windows are back; hand the crop to the OCR collaborator.
    let Some(engine) = state.ocr.clone() else {
        emit(
            &app,
            "capture-failed",
            CaptureFailed {
                error: "no OCR engine available".to_string(),
                message: "No OCR engine found — install tesseract and restart".to_string(),
            },
        );
        return Ok(());
    };

    let png_for_ocr = region.png.clone();
    let ocr_joined =
        tokio::task::spawn_blocking(move || engine.recognize(&png_for_ocr, language.as_deref()))
            .await;
    let ocr_result = match ocr_joined {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            log::error!("[PIPELINE] OCR failed: {}", e);
            emit(
                &app,
                "capture-failed",
                CaptureFailed {
                    error: e.to_string(),
                    message: "Text recognition failed — please retry".to_string(),
                },
            );
            return Ok(());
        }
        Err(e) => {
            log::error!("[PIPELINE] OCR task failed: {}", e);
            emit(
                &app,
                "capture-failed",
                CaptureFailed {
                    error: e.to_string(),
                    message: "Text recognition failed — please retry".to_string(),
                },
            );
            return Ok(());
        }
    };

    // Clipboard is best-effort: the text still reaches the UI if the
    // clipboard is unavailable (common over remote sessions).
    match arboard::Clipboard::new().and_then(|mut c| c.set_text(&ocr_result.text)) {
        Ok(()) => log::info!(
            "[PIPELINE] copied {} chars to clipboard",
            ocr_result.char_count
        ),
        Err(e) => log::warn!("[PIPELINE] clipboard unavailable: {}", e),
    }

    let png_base64 = base64::engine::general_purpose::STANDARD.encode(&region.png);
    state.capture.store(LastCapture {
        text: ocr_result.text.clone(),
        confidence: ocr_result.confidence,
        png_base64: png_base64.clone(),
    });

    let total_ms = pipeline_start.elapsed().as_millis();
    log::info!(
        "[PIPELINE] total: {}ms (capture={}ms + ocr={:.0}ms)",
        total_ms,
        capture_ms,
        ocr_result.latency_ms
    );

    emit(
        &app,
        "capture-succeeded",
        CaptureSucceeded {
            text: ocr_result.text,
            confidence: ocr_result.confidence,
            png_base64,
        },
    );
    Ok(())
}

fn emit<P: serde::Serialize + Clone>(app: &tauri::AppHandle, event: &str, payload: P) {
    if let Err(e) = app.emit(event, payload) {
        log::error!("[PIPELINE] failed to emit {}: {}", event, e);
    }
}
