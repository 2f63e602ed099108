//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `scoresketch_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use scoresketch_core::CaptureSession;

fn main() {
    let mut session = CaptureSession::new();
    let event_id = session.mark_event(0.0);
    let frame = session.render_frame(0.0);

    println!("scoresketch_core version={}", scoresketch_core::core_version());
    println!("smoke event_id={event_id} frame_lanes={}", frame.lanes.len());
}
