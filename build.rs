//! Build script for the textgrab Tauri app.
//!
//! Nothing beyond the standard Tauri code generation — the OCR engine is
//! an external binary resolved at runtime, so no FFI glue is compiled here.

fn main() {
    tauri_build::build();
}
