use std::env;

use super::{run_command, SystemProbe};

/// Probe backed by `getmac`, `reg`, and the processor environment.
pub struct WindowsProbe;

impl SystemProbe for WindowsProbe {
    fn cpu_model(&self) -> Option<String> {
        if let Some(model) = env::var("PROCESSOR_IDENTIFIER")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            return Some(model);
        }

        // Output format: "Name=Intel(R) Core(TM) ..."
        run_command("wmic", &["cpu", "get", "name", "/value"])?
            .lines()
            .find_map(|line| line.trim().strip_prefix("Name="))
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }

    fn mac_addresses(&self) -> Vec<String> {
        let Some(output) = run_command("getmac", &["/NH", "/FO", "CSV"]) else {
            return Vec::new();
        };

        // First CSV field per row is the quoted MAC, "XX-XX-XX-XX-XX-XX".
        output
            .lines()
            .filter_map(|line| line.split(',').next())
            .map(|field| field.trim().trim_matches('"').to_string())
            .filter(|mac| mac.len() == 17 && mac.contains('-'))
            .collect()
    }

    fn machine_id(&self) -> Option<String> {
        let output = run_command(
            "reg",
            &[
                "query",
                r"HKLM\SOFTWARE\Microsoft\Cryptography",
                "/v",
                "MachineGuid",
            ],
        )?;

        output
            .lines()
            .find(|line| line.contains("MachineGuid"))
            .and_then(|line| line.split_whitespace().last())
            .map(|guid| guid.to_string())
            .filter(|guid| !guid.is_empty())
    }
}
