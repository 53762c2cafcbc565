use std::fs;

use super::{run_command, SystemProbe};

/// Probe backed by procfs, sysfs, and `lscpu`.
pub struct LinuxProbe;

impl SystemProbe for LinuxProbe {
    fn cpu_model(&self) -> Option<String> {
        if let Ok(cpuinfo) = fs::read_to_string("/proc/cpuinfo") {
            if let Some(model) = cpuinfo
                .lines()
                .find(|line| line.starts_with("model name"))
                .and_then(|line| line.split(':').nth(1))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
            {
                return Some(model);
            }
        }

        // Some ARM kernels omit "model name" from cpuinfo.
        run_command("lscpu", &[])?
            .lines()
            .find(|line| line.contains("Model name"))
            .and_then(|line| line.split(':').nth(1))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn mac_addresses(&self) -> Vec<String> {
        let mut macs = Vec::new();
        let Ok(entries) = fs::read_dir("/sys/class/net") else {
            return macs;
        };

        for entry in entries.flatten() {
            if entry.file_name() == "lo" {
                continue;
            }
            if let Ok(address) = fs::read_to_string(entry.path().join("address")) {
                let address = address.trim().to_string();
                if !address.is_empty() {
                    macs.push(address);
                }
            }
        }

        macs
    }

    fn machine_id(&self) -> Option<String> {
        fs::read_to_string("/etc/machine-id")
            .or_else(|_| fs::read_to_string("/var/lib/dbus/machine-id"))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
