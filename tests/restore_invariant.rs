//! The central failure-handling invariant: once windows are hidden,
//! every exit path restores them exactly once before the attempt
//! reports — and the paths that exit earlier never touch visibility.

mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use support::{retina_snapshot, CaptureBehavior, EventLog, MockCapturer, MockGeometry, MockWindow};
use textgrab_lib::config::CapturePolicy;
use textgrab_lib::error::CaptureError;
use textgrab_lib::geometry::{PhysicalRect, SelectionOrigin, SelectionRect};
use textgrab_lib::orchestrator::CaptureOrchestrator;
use textgrab_lib::windows::{OwnedWindowRegistry, WindowTag};
use tokio_util::sync::CancellationToken;

fn fast_policy() -> CapturePolicy {
    CapturePolicy {
        min_selection: 15.0,
        settle_delay: Duration::from_millis(1),
        capture_timeout: Duration::from_secs(5),
    }
}

fn selection() -> SelectionRect {
    SelectionRect::new(591.0, 213.0, 231.0, 304.0, SelectionOrigin::OverlayGlobal)
}

struct Harness {
    log: EventLog,
    main: Arc<MockWindow>,
    orchestrator: Arc<CaptureOrchestrator>,
}

fn harness(behavior: CaptureBehavior, policy: CapturePolicy) -> Harness {
    let log = EventLog::new();
    let registry = Arc::new(OwnedWindowRegistry::new());
    let main = MockWindow::new("main", true, PhysicalRect::new(0, 0, 200, 200), &log);
    registry.register(WindowTag::Main, main.clone());

    let orchestrator = Arc::new(CaptureOrchestrator::new(
        MockGeometry::new(retina_snapshot()),
        MockCapturer::new(behavior, &log),
        registry,
        policy,
    ));
    Harness {
        log,
        main,
        orchestrator,
    }
}

fn assert_restored_exactly_once(h: &Harness) {
    assert_eq!(h.log.count_of("hide:main"), 1);
    assert_eq!(h.log.count_of("show:main"), 1);
    assert!(h.main.is_currently_visible());
}

#[tokio::test]
async fn capture_failure_still_restores() {
    let h = harness(CaptureBehavior::Fail, fast_policy());
    let err = h
        .orchestrator
        .run(selection(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CaptureError::NoCapturableSurface(_)));
    assert_restored_exactly_once(&h);
}

#[tokio::test]
async fn crop_out_of_bounds_still_restores() {
    // Selection runs past the right screen edge, so the crop overflows
    // whatever raster comes back.
    let h = harness(CaptureBehavior::Frame(1000, 700), fast_policy());
    let wide = SelectionRect::new(1305.0, 800.0, 140.0, 100.0, SelectionOrigin::OverlayGlobal);
    let err = h
        .orchestrator
        .run(wide, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CaptureError::OutOfBounds { .. }));
    assert_restored_exactly_once(&h);
}

#[tokio::test]
async fn capture_timeout_still_restores() {
    let policy = CapturePolicy {
        capture_timeout: Duration::from_millis(30),
        ..fast_policy()
    };
    let h = harness(CaptureBehavior::Hang(Duration::from_millis(300)), policy);
    let err = h
        .orchestrator
        .run(selection(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CaptureError::CaptureTimedOut(_)));
    assert_restored_exactly_once(&h);
}

#[tokio::test]
async fn overlapping_selection_short_circuits_before_hiding() {
    let log = EventLog::new();
    let registry = Arc::new(OwnedWindowRegistry::new());
    // Sitting right on the candidate rectangle (physical 1182,426 462x608).
    let main = MockWindow::new("main", true, PhysicalRect::new(1100, 400, 400, 300), &log);
    registry.register(WindowTag::Main, main.clone());
    let orchestrator = CaptureOrchestrator::new(
        MockGeometry::new(retina_snapshot()),
        MockCapturer::new(CaptureBehavior::Frame(2880, 1800), &log),
        registry,
        fast_policy(),
    );

    let err = orchestrator
        .run(selection(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CaptureError::SelfCaptureRejected));
    // No hide, no capture, nothing to restore.
    assert!(log.events().is_empty());
    assert!(main.is_currently_visible());
}

#[tokio::test]
async fn hidden_overlapping_window_does_not_trigger_the_guard() {
    let log = EventLog::new();
    let registry = Arc::new(OwnedWindowRegistry::new());
    let hidden = MockWindow::new("main", false, PhysicalRect::new(1100, 400, 400, 300), &log);
    registry.register(WindowTag::Main, hidden);
    let orchestrator = CaptureOrchestrator::new(
        MockGeometry::new(retina_snapshot()),
        MockCapturer::new(CaptureBehavior::Frame(2880, 1800), &log),
        registry,
        fast_policy(),
    );

    let result = orchestrator.run(selection(), &CancellationToken::new()).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn window_hidden_by_the_user_stays_hidden_after_restore() {
    let log = EventLog::new();
    let registry = Arc::new(OwnedWindowRegistry::new());
    let user_hidden = MockWindow::new("settings", false, PhysicalRect::new(0, 0, 50, 50), &log);
    let visible = MockWindow::new("main", true, PhysicalRect::new(0, 0, 200, 200), &log);
    registry.register(WindowTag::Auxiliary, user_hidden.clone());
    registry.register(WindowTag::Main, visible.clone());
    let orchestrator = CaptureOrchestrator::new(
        MockGeometry::new(retina_snapshot()),
        MockCapturer::new(CaptureBehavior::Frame(2880, 1800), &log),
        registry,
        fast_policy(),
    );

    orchestrator
        .run(selection(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(!user_hidden.is_currently_visible());
    assert!(visible.is_currently_visible());
    assert_eq!(log.count_of("show:settings"), 0);
    assert_eq!(log.count_of("show:main"), 1);
}

#[tokio::test]
async fn partial_restore_failure_reports_but_restores_the_rest() {
    let log = EventLog::new();
    let registry = Arc::new(OwnedWindowRegistry::new());
    let stuck = MockWindow::new("stuck", true, PhysicalRect::new(0, 0, 50, 50), &log);
    stuck.fail_show.store(true, Ordering::SeqCst);
    let fine = MockWindow::new("main", true, PhysicalRect::new(0, 0, 200, 200), &log);
    registry.register(WindowTag::Auxiliary, stuck.clone());
    registry.register(WindowTag::Main, fine.clone());
    let orchestrator = CaptureOrchestrator::new(
        MockGeometry::new(retina_snapshot()),
        MockCapturer::new(CaptureBehavior::Frame(2880, 1800), &log),
        registry,
        fast_policy(),
    );

    let err = orchestrator
        .run(selection(), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        CaptureError::VisibilityOperationFailed { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].0, "stuck");
        }
        other => panic!("expected VisibilityOperationFailed, got {other:?}"),
    }
    assert!(fine.is_currently_visible());
}

#[tokio::test]
async fn second_attempt_while_one_is_in_flight_is_rejected() {
    let h = harness(
        CaptureBehavior::Hang(Duration::from_millis(200)),
        fast_policy(),
    );

    let first = {
        let orchestrator = h.orchestrator.clone();
        tokio::spawn(async move {
            orchestrator
                .run(selection(), &CancellationToken::new())
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let err = h
        .orchestrator
        .run(selection(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, CaptureError::AttemptInProgress));

    // The in-flight attempt is unaffected and restores normally.
    first.await.unwrap().unwrap();
    assert_restored_exactly_once(&h);
}

#[tokio::test]
async fn cancel_before_hide_has_no_side_effects() {
    let h = harness(CaptureBehavior::Frame(2880, 1800), fast_policy());
    let token = CancellationToken::new();
    token.cancel();

    let err = h.orchestrator.run(selection(), &token).await.unwrap_err();
    assert!(matches!(err, CaptureError::Cancelled));
    assert!(h.log.events().is_empty());
    assert!(h.main.is_currently_visible());
}

#[tokio::test]
async fn cancel_during_capture_still_restores() {
    let h = harness(
        CaptureBehavior::Hang(Duration::from_millis(300)),
        fast_policy(),
    );
    let token = CancellationToken::new();
    {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            token.cancel();
        });
    }

    let err = h.orchestrator.run(selection(), &token).await.unwrap_err();
    assert!(matches!(err, CaptureError::Cancelled));
    assert_restored_exactly_once(&h);
}
