//! Build script for Desktop Volume Mixer
//!
//! Embeds the Windows application manifest for DPI awareness and
//! links required Windows libraries.

fn main() {
    // Re-run if resources change
    println!("cargo:rerun-if-changed=resources/app.rc");
    println!("cargo:rerun-if-changed=resources/app.manifest");

    // Only run on Windows
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return;
    }

    embed_resource::compile("resources/app.rc", embed_resource::NONE);

    // Core Audio and window placement
    println!("cargo:rustc-link-lib=ole32");
    println!("cargo:rustc-link-lib=user32");
}
