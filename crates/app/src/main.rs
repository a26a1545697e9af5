#![forbid(unsafe_code)]

mod entry;
mod error;
mod server;
mod state;
mod support;

pub(crate) use error::AppError;
pub(crate) use server::CheckMatrixServer;
pub(crate) use support::*;

use cm_storage::{KeyValueStore, MemoryStore, SqliteStore};

const SERVER_NAME: &str = "check-matrix";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

fn usage() -> &'static str {
    "check-matrix: checklist matrix engine over newline-delimited JSON-RPC (stdio)\n\n\
USAGE:\n\
  check-matrix [--storage-dir DIR] [--config FILE] [--read-only|--writable] [--ephemeral]\n\
\n\
FLAGS:\n\
  -h, --help       Print this help and exit\n\
  -V, --version    Print version and exit\n\
\n\
ENV:\n\
  CHECK_MATRIX_STORAGE_DIR   Storage directory (default: ./.check_matrix)\n\
  CHECK_MATRIX_LOG           Log filter, e.g. `debug` (falls back to RUST_LOG, then `warn`)\n"
}

fn version_line() -> String {
    format!("{SERVER_NAME} {SERVER_VERSION}")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = std::env::args().collect::<Vec<_>>();
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-h" | "--help"))
    {
        print!("{}", usage());
        return Ok(());
    }
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-V" | "--version"))
    {
        println!("{}", version_line());
        return Ok(());
    }

    let storage_dir = parse_storage_dir();
    let config = AppConfig::load(parse_config_path().as_deref(), &storage_dir)?;
    init_logging(config.log.as_deref());

    let store: Box<dyn KeyValueStore> = if parse_ephemeral() {
        Box::new(MemoryStore::new())
    } else {
        Box::new(SqliteStore::open(&storage_dir)?)
    };
    tracing::info!(storage_dir = %storage_dir.display(), "starting");

    let mut server = CheckMatrixServer::new(store, config, parse_read_only_override())?;
    entry::run_stdio(&mut server)
}
