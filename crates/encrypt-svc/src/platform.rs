//! Host CPU architecture identifier reported in every response.
//!
//! Identifiers follow the short names used across the deployment's fleet
//! labels (`amd64`, `arm64`, `386`, …) rather than Rust target triples.

/// Architecture of the running binary, e.g. `"amd64"` or `"arm64"`.
pub fn architecture() -> &'static str {
    normalize(std::env::consts::ARCH, cfg!(target_endian = "little"))
}

/// Map a Rust `target_arch` value to its fleet identifier.
///
/// Unknown architectures are passed through unchanged.
fn normalize(arch: &'static str, little_endian: bool) -> &'static str {
    match (arch, little_endian) {
        ("x86_64", _) => "amd64",
        ("x86", _) => "386",
        ("aarch64", _) => "arm64",
        ("arm", _) => "arm",
        ("powerpc64", true) => "ppc64le",
        ("powerpc64", false) => "ppc64",
        ("mips", true) => "mipsle",
        ("mips", false) => "mips",
        ("mips64", true) => "mips64le",
        ("mips64", false) => "mips64",
        ("loongarch64", _) => "loong64",
        ("wasm32", _) => "wasm",
        (other, _) => other,
    }
}
