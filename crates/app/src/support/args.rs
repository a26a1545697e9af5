#![forbid(unsafe_code)]

use std::path::PathBuf;

const DEFAULT_STORAGE_DIR: &str = ".check_matrix";
const STORAGE_DIR_ENV: &str = "CHECK_MATRIX_STORAGE_DIR";

fn flag_value(flag: &str) -> Option<String> {
    let mut args = std::env::args().skip(1);
    let mut value = None;
    while let Some(arg) = args.next() {
        if arg.as_str() == flag
            && let Some(next) = args.next()
        {
            value = Some(next);
        }
    }
    value
}

fn has_flag(flag: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg.as_str() == flag)
}

pub(crate) fn parse_storage_dir() -> PathBuf {
    if let Some(dir) = flag_value("--storage-dir") {
        return PathBuf::from(dir);
    }
    match std::env::var(STORAGE_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(DEFAULT_STORAGE_DIR),
    }
}

/// An explicit `--config` path; `None` means "use the storage-dir default if it exists".
pub(crate) fn parse_config_path() -> Option<PathBuf> {
    flag_value("--config").map(PathBuf::from)
}

/// `--read-only` / `--writable`; the last one given wins.
pub(crate) fn parse_read_only_override() -> Option<bool> {
    std::env::args()
        .skip(1)
        .filter_map(|arg| match arg.as_str() {
            "--read-only" => Some(true),
            "--writable" => Some(false),
            _ => None,
        })
        .last()
}

pub(crate) fn parse_ephemeral() -> bool {
    has_flag("--ephemeral")
}
