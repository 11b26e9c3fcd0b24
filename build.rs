fn main() {
    // version string for the CLI: git info, target, rustc, build time
    built::write_built_file().expect("Failed to acquire build-time information");
}
