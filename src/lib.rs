//! # vcd-trace: Value Change Dump reader and writer
//!
//! Records and replays discrete-event simulation waveforms (bus values,
//! analog samples, string annotations) in the textual VCD format.
//!
//! ## Architecture
//!
//! - **Codec**: per-type encoding of caller text into wire tokens and back
//! - **Catalog**: qualified names ↔ short identifiers, with bound codecs
//! - **Writer**: header/declaration emission and time-ordered value changes
//! - **Reader**: header state machine plus streaming body decoder
//!
//! Both engines are synchronous and own their I/O resource exclusively.
//! Diagnostics go through `tracing`; install a subscriber to see them.
//!
//! ## Example
//!
//! ```no_run
//! use vcd_trace::{Reader, VariableDecl, Writer, WriterConfig};
//!
//! fn main() -> vcd_trace::Result<()> {
//!     let config = WriterConfig::new("10ps".parse()?).with_version("1.0.0");
//!     let mut writer = Writer::create("example.vcd", &config)?;
//!     writer.register(
//!         "logic",
//!         &[VariableDecl::wire("cs", 1), VariableDecl::string("command")],
//!     )?;
//!     writer.set_value(0, "1", "logic.cs")?;
//!     writer.set_value(100, "0", "logic.cs")?;
//!     writer.set_value(100, "String command", "logic.command")?;
//!     writer.set_timestamp(600)?;
//!     writer.close()?;
//!
//!     let trace = Reader::open("example.vcd")?.read_all()?;
//!     for value in trace.history("logic.cs").unwrap_or_default() {
//!         println!("#{} {}", value.time, value.value);
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod reader;
pub mod trace;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use catalog::{Catalog, IdCode};
pub use codec::{Codec, Encoded};
pub use config::{TimeUnit, Timescale, WriterConfig};
pub use error::{Result, ResultExt, ValueError, VcdError};
pub use reader::{HeaderInfo, Reader, ReaderState};
pub use trace::Trace;
pub use types::{BitValue, Event, ReadValue, Value, VarType, Variable, VariableDecl};
pub use writer::Writer;
