use std::env;

/// Widths every backend needs native atomics for.
const REQUIRED_WIDTHS: [&str; 4] = ["8", "16", "32", "64"];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!(
        "cargo:rustc-check-cfg=cfg(axiom_backend, values(\"builtin\", \"interlocked\", \"library\"))"
    );

    let target = env::var("TARGET").unwrap_or_default();
    let target_env = env::var("CARGO_CFG_TARGET_ENV").unwrap_or_default();
    let has_atomic = env::var("CARGO_CFG_TARGET_HAS_ATOMIC").unwrap_or_default();

    let missing: Vec<&str> = REQUIRED_WIDTHS
        .iter()
        .copied()
        .filter(|width| !has_atomic.split(',').any(|w| w == *width))
        .collect();
    if !missing.is_empty() {
        panic!(
            "no supported atomic backend for target {}: missing {}-bit atomics",
            target,
            missing.join("/")
        );
    }

    let requested: Vec<&str> = [
        ("builtin", "CARGO_FEATURE_BACKEND_BUILTIN"),
        ("interlocked", "CARGO_FEATURE_BACKEND_INTERLOCKED"),
        ("library", "CARGO_FEATURE_BACKEND_LIBRARY"),
    ]
    .iter()
    .filter(|(_, feature)| env::var_os(feature).is_some())
    .map(|(name, _)| *name)
    .collect();
    let loom = env::var_os("CARGO_FEATURE_LOOM").is_some();

    let backend = match (loom, requested.as_slice()) {
        (true, []) | (true, ["library"]) => "library",
        (true, [other]) => panic!(
            "backend-{} cannot be combined with the loom feature; loom only models the library backend",
            other
        ),
        (_, [one]) => *one,
        (false, []) => match target_env.as_str() {
            "msvc" => "interlocked",
            "gnu" | "musl" | "" => "builtin",
            _ => "library",
        },
        (_, many) => panic!(
            "at most one backend feature may be enabled, got: {}",
            many.join(", ")
        ),
    };

    println!("cargo:rustc-cfg=axiom_backend=\"{}\"", backend);
}
