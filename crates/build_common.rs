// Shared build script utilities for README-to-rustdoc transformation.
// Include this in build.rs files with: include!("../build_common.rs");
//
// Required imports in the including file:
//   use std::env;
//   use std::fs;
//   use std::path::Path;

/// Render a crate's README.md into `OUT_DIR/README_GENERATED.md` for rustdoc.
///
/// Transformations:
/// 1. Strip 'src/' prefix from links so rustdoc can resolve modules
/// 2. Strip '.rs' extension so links go to modules, not files
/// 3. Point sibling crate READMEs (../voxcache-*/README.md) at their crate docs
///
/// A crate without a README gets an empty generated file so `include_str!`
/// in lib.rs still resolves.
fn process_readme_for_rustdoc(crate_dir: &str) {
    println!("cargo:rerun-if-changed=README.md");

    let readme_path = Path::new(crate_dir).join("README.md");
    let content = fs::read_to_string(&readme_path).unwrap_or_default();

    let mut rustdoc_content = content
        .replace("](src/", "](")
        .replace(".rs)", ")");

    for sibling in sibling_crates(crate_dir) {
        let from = format!("](../{sibling}/README.md)");
        let to = format!("]({})", sibling.replace('-', "_"));
        rustdoc_content = rustdoc_content.replace(&from, &to);
    }

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("README_GENERATED.md");
    fs::write(dest_path, rustdoc_content).unwrap();
}

/// List the other workspace crates living next to this one under `crates/`.
fn sibling_crates(crate_dir: &str) -> Vec<String> {
    let Some(crates_dir) = Path::new(crate_dir).parent() else {
        return Vec::new();
    };
    let Ok(entries) = fs::read_dir(crates_dir) else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().join("Cargo.toml").exists())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with("voxcache-"))
        .collect()
}
