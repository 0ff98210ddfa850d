//! External command execution and host facts.

pub mod command;
pub mod mock;
pub mod platform;

pub use command::{CommandResult, CommandRunner, CommandSpec, SystemRunner};
pub use mock::MockRunner;
pub use platform::{
    effective_gid, effective_uid, is_executable, parse_system_path,
    resolve_tool_path,
};
