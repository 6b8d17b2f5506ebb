use lazy_static::lazy_static;
use std::path::PathBuf;

lazy_static! {
    static ref ROOT: PathBuf = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
}

pub fn get_root() -> PathBuf {
    ROOT.clone()
}

/// Path of a file under assets/, resolved against the crate root.
pub fn asset_path(name: &str) -> PathBuf {
    get_root().join("assets").join(name)
}
