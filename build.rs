// Assembles the deployable site: copies `static/` (page + wasm pkg) to `dist/`.
use std::{fs, path::Path};

fn main() {
    println!("cargo:rerun-if-changed=static");

    let out_dir = Path::new("dist");
    if out_dir.exists() {
        fs::remove_dir_all(out_dir).ok();
    }
    fs::create_dir_all(out_dir).ok();

    let static_dir = Path::new("static");
    if static_dir.exists() {
        fn copy_dir(src: &Path, dst: &Path) {
            fs::create_dir_all(dst).ok();
            let Ok(entries) = fs::read_dir(src) else {
                return;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                let dst_path = dst.join(entry.file_name());
                if path.is_dir() {
                    copy_dir(&path, &dst_path);
                } else {
                    fs::copy(&path, &dst_path).ok();
                }
            }
        }
        copy_dir(static_dir, out_dir);
    }
}
