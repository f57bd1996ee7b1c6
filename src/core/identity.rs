//! Process identity stamped into `context.system`

use std::ffi::OsString;
use sysinfo::System;

/// Source of hostname, pid and process name
pub trait IdentityProvider: Send + Sync {
    fn hostname(&self) -> String;
    fn pid(&self) -> u32;
    fn process_name(&self) -> String;
}

/// Reads the identity of the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemIdentity;

impl IdentityProvider for SystemIdentity {
    fn hostname(&self) -> String {
        System::host_name().unwrap_or_else(|| "localhost".to_string())
    }

    fn pid(&self) -> u32 {
        std::process::id()
    }

    /// argv[0], falling back to the executable path
    fn process_name(&self) -> String {
        process_name_from(std::env::args_os().next())
    }
}

/// Non-UTF-8 bytes in argv[0] are replaced rather than rejected
fn process_name_from(arg0: Option<OsString>) -> String {
    arg0.map(|arg| arg.to_string_lossy().into_owned())
        .or_else(|| {
            std::env::current_exe()
                .ok()
                .map(|path| path.display().to_string())
        })
        .unwrap_or_default()
}

/// Fixed identity, used for deterministic output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticIdentity {
    pub hostname: String,
    pub pid: u32,
    pub process_name: String,
}

impl StaticIdentity {
    pub fn new(hostname: impl Into<String>, pid: u32, process_name: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            pid,
            process_name: process_name.into(),
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn hostname(&self) -> String {
        self.hostname.clone()
    }

    fn pid(&self) -> u32 {
        self.pid
    }

    fn process_name(&self) -> String {
        self.process_name.clone()
    }
}
