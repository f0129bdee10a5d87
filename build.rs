//! Build script for dupescan
//!
//! On Windows the application manifest is embedded so that deep trees
//! (paths longer than 260 characters) can be walked. The manifest
//! (`dupescan.manifest`) sets `longPathAware`, which takes effect together
//! with the Windows 10 v1607+ registry switch.
//!
//! On other platforms the script does nothing.

fn main() {
    #[cfg(windows)]
    {
        embed_resource::compile("dupescan.rc", embed_resource::NONE);

        println!("cargo:rerun-if-changed=dupescan.rc");
        println!("cargo:rerun-if-changed=dupescan.manifest");
    }
}
