// Build script for cursor-reroll - embeds version at compile time

fn main() {
    // Release pipelines can pin the reported version; local builds fall
    // back to Cargo.toml
    let version =
        std::env::var("REROLL_VERSION").unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=REROLL_VERSION={}", version);

    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=REROLL_VERSION");
}
