use super::{run_command, SystemProbe};

/// Probe backed by `sysctl`, `ifconfig`, and `ioreg`.
pub struct MacosProbe;

impl SystemProbe for MacosProbe {
    fn cpu_model(&self) -> Option<String> {
        run_command("sysctl", &["-n", "machdep.cpu.brand_string"])
    }

    fn mac_addresses(&self) -> Vec<String> {
        let Some(output) = run_command("ifconfig", &[]) else {
            return Vec::new();
        };

        output
            .lines()
            .filter_map(|line| line.trim().strip_prefix("ether "))
            .map(|mac| mac.trim().to_string())
            .filter(|mac| !mac.is_empty())
            .collect()
    }

    fn machine_id(&self) -> Option<String> {
        // Line format: "IOPlatformUUID" = "XXXXXXXX-XXXX-..."
        run_command("ioreg", &["-rd1", "-c", "IOPlatformExpertDevice"])?
            .lines()
            .find(|line| line.contains("IOPlatformUUID"))
            .and_then(|line| line.split('"').nth(3))
            .map(|uuid| uuid.to_string())
            .filter(|uuid| !uuid.is_empty())
    }
}
