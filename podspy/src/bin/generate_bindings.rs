//! Generate UniFFI Swift bindings for the POD Spy host app
//!
//! Run: cargo run --bin generate-bindings [-- <out-dir>]
//!
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │ Inputs:                                                                     │
//! │   target/release/libpodspy.{dylib,so}   ← Built library for bindgen         │
//! │                                                                             │
//! │ Outputs (default out-dir: ../bindings):                                     │
//! │   PodSpyCore/podspyFFI.h                ← C header                          │
//! │   PodSpyCore/module.modulemap           ← Clang module map                  │
//! │   PodSpyCore/libpodspy.a                ← Static lib for the host target    │
//! │   PodSpyWrapper/podspy.swift            ← Swift bindings                    │
//! └─────────────────────────────────────────────────────────────────────────────┘

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    let rust_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = rust_dir.parent().expect("No parent directory");
    let out_root = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| workspace_root.join("bindings"));

    println!("Building Rust library...");
    run_cmd("cargo", &["build", "--release", "-p", "podspy"], &rust_dir);

    let dylib = if cfg!(target_os = "macos") {
        "libpodspy.dylib"
    } else {
        "libpodspy.so"
    };
    let target_dir = workspace_root.join("target/release");

    println!("Generating Swift bindings...");
    let generated = rust_dir.join("generated");
    run_cmd(
        "cargo",
        &[
            "run",
            "-p",
            "podspy",
            "--bin",
            "uniffi-bindgen",
            "generate",
            "--library",
            &target_dir.join(dylib).to_string_lossy(),
            "--language",
            "swift",
            "--out-dir",
            &generated.to_string_lossy(),
        ],
        &rust_dir,
    );

    let core_dest = out_root.join("PodSpyCore");
    let wrapper_dest = out_root.join("PodSpyWrapper");
    fs::create_dir_all(&core_dest).expect("Create core dir");
    fs::create_dir_all(&wrapper_dest).expect("Create wrapper dir");

    // Swift 6 strict concurrency + renamed FFI module
    println!("Copying generated Swift file...");
    let mut swift_content =
        fs::read_to_string(generated.join("podspy.swift")).expect("Read swift file");
    swift_content = swift_content.replace(
        "private var initializationResult",
        "nonisolated(unsafe) private var initializationResult",
    );
    swift_content = swift_content.replace("#if canImport(podspyFFI)", "#if canImport(PodSpyCoreFFI)");
    swift_content = swift_content.replace("import podspyFFI", "import PodSpyCoreFFI");
    fs::write(wrapper_dest.join("podspy.swift"), swift_content).expect("Write swift");

    fs::copy(generated.join("podspyFFI.h"), core_dest.join("podspyFFI.h")).expect("Copy header");

    println!("Writing modulemap...");
    fs::write(
        core_dest.join("module.modulemap"),
        "module PodSpyCoreFFI {\n    header \"podspyFFI.h\"\n    export *\n}\n",
    )
    .expect("Write modulemap");

    fs::copy(target_dir.join("libpodspy.a"), core_dest.join("libpodspy.a")).expect("Copy static lib");

    println!("Done! Bindings written to {}", out_root.display());
    println!("  - {}/podspy.swift", wrapper_dest.display());
    println!("  - {}/podspyFFI.h", core_dest.display());
    println!("  - {}/module.modulemap", core_dest.display());
    println!("  - {}/libpodspy.a", core_dest.display());
}

fn run_cmd(program: &str, args: &[&str], dir: &Path) {
    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap_or_else(|e| panic!("Failed to run {}: {}", program, e));

    if !status.success() {
        panic!("{} failed with status: {}", program, status);
    }
}
