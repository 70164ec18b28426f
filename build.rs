fn main() {
    // Only generate C headers when ffi feature is enabled
    #[cfg(feature = "ffi")]
    generate_header();

    // Rerun if FFI source files change
    println!("cargo:rerun-if-changed=src/ffi/");
    println!("cargo:rerun-if-changed=cbindgen.toml");
}

#[cfg(feature = "ffi")]
fn generate_header() {
    let Ok(crate_dir) = std::env::var("CARGO_MANIFEST_DIR") else {
        return;
    };
    let crate_dir = std::path::PathBuf::from(crate_dir);
    let include_dir = crate_dir.join("include");
    std::fs::create_dir_all(&include_dir).ok();

    let mut config = match cbindgen::Config::from_file(crate_dir.join("cbindgen.toml")) {
        Ok(config) => config,
        Err(e) => {
            println!("cargo:warning=cbindgen.toml unreadable: {e}");
            return;
        }
    };
    if config.sys_includes.is_empty() {
        config.sys_includes = vec!["stdint.h".to_string(), "stddef.h".to_string()];
    }

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(include_dir.join("keypunk.h"));
        }
        // Don't fail the build, just warn
        Err(e) => println!("cargo:warning=cbindgen failed: {e}"),
    }
}
