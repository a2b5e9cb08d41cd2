//! tidydown - a folder organization utility
//!
//! This library sorts the files of one directory into category subfolders
//! determined by file extension. It provides extension classification,
//! conflict-safe moving, deletion and skipping with running counters, a
//! per-run operation log, and both automatic and interactive drivers.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod op_logger;
pub mod output;

pub use config::{CompiledExcludes, ConfigError, ExcludeRules, OrganizerConfig, Settings, is_ignorable};
pub use file_category::{CategoryTable, DEFAULT_CATEGORY};
pub use file_organizer::{
    ActionOutcome, ActionProvider, FileAction, FileDescriptor, FileOrganizer, OperationCounters,
    OrganizeError, OrganizeResult, format_size, resolve_unique,
};
pub use op_logger::{EventKind, OperationLogger};

pub use cli::{Cli, run};
