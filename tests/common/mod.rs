//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use vcd_trace::{Reader, Trace, Writer, WriterConfig};

/// Route library logs to the test output. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vcd_trace=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Config with a fixed date so output is reproducible
pub fn test_config() -> WriterConfig {
    WriterConfig::new("10ps".parse().unwrap()).with_date("01-02-2006 15:04:05")
}

/// Path for a trace file inside a temporary directory
pub fn trace_path(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

/// Write a trace to `path` through `body`, then close it
pub fn write_trace<F>(path: &Path, body: F)
where
    F: FnOnce(&mut Writer<BufWriter<File>>),
{
    let mut writer = Writer::create(path, &test_config()).unwrap();
    body(&mut writer);
    writer.close().unwrap();
}

/// Read a whole trace file
pub fn read_trace(path: &Path) -> Trace {
    Reader::open(path).unwrap().read_all().unwrap()
}
