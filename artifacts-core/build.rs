use std::env;

/// Variables read with `option_env!` by `config::build_config`.
const BUILD_VARS: [&str; 3] = ["VCPKG_ARTIFACTS_PATH", "VCPKG_CE_SHA", "VCPKG_BASE_VERSION"];

fn main() {
    for var in BUILD_VARS {
        println!("cargo:rerun-if-env-changed={var}");
    }

    // A malformed pin would only surface as a checksum mismatch on first
    // use, after a full download.
    if let Some(sha) = non_empty_var("VCPKG_CE_SHA") {
        if !is_sha256_hex(&sha) {
            panic!("VCPKG_CE_SHA must be 64 hex digits, got {sha:?}");
        }
        if non_empty_var("VCPKG_BASE_VERSION").is_none() {
            println!(
                "cargo:warning=VCPKG_CE_SHA is set without VCPKG_BASE_VERSION; \
                 the pinned bundle will use the crate version"
            );
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn is_sha256_hex(value: &str) -> bool {
    value.len() == 64 && value.bytes().all(|b| b.is_ascii_hexdigit())
}
