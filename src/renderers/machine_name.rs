//! Host name renderer

use super::LayoutRenderer;
use crate::core::LogEvent;
use std::sync::OnceLock;

/// Look up the host name once per process.
///
/// Returns an empty string (and warns on stderr) when no source yields a
/// name.
pub fn machine_name() -> &'static str {
    static MACHINE_NAME: OnceLock<String> = OnceLock::new();
    MACHINE_NAME.get_or_init(|| match detect_machine_name() {
        Some(name) => name,
        None => {
            eprintln!("[LOGGER WARNING] Unable to determine machine name, rendering empty value");
            String::new()
        }
    })
}

fn detect_machine_name() -> Option<String> {
    ["HOSTNAME", "COMPUTERNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .chain(std::fs::read_to_string("/etc/hostname").ok())
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
}

/// Renders the name of the machine the process runs on
#[derive(Debug, Clone, Copy, Default)]
pub struct MachineNameRenderer;

impl MachineNameRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl LayoutRenderer for MachineNameRenderer {
    fn append(&self, out: &mut String, _event: &LogEvent) {
        out.push_str(machine_name());
    }

    fn name(&self) -> &str {
        "machinename"
    }
}
