//! Hardware fingerprint derivation.
//!
//! The fingerprint is a SHA-256 over a fixed-order list of machine
//! properties: CPU model, hostname, platform, architecture, the sorted set
//! of network MAC addresses, and a platform-specific machine identifier.
//! Every component is collected best-effort; a failed probe degrades the
//! fingerprint instead of aborting derivation.

use std::collections::BTreeSet;
use std::env;
use std::process::Command;
use std::sync::Mutex;

use tracing::debug;

use crate::errors::{VerifyError, VerifyResult};
use crate::signature::sha256_hex;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

/// Delimiter between fingerprint components.
const COMPONENT_DELIMITER: &str = "|";

/// MAC address reported by interfaces with no burned-in address.
const ZERO_MAC: &str = "00:00:00:00:00:00";

/// Capability interface for the platform-specific machine probes.
///
/// One implementation exists per operating system; tests substitute their
/// own to make derivation deterministic and to count invocations.
pub trait SystemProbe: Send + Sync {
    /// CPU model string, if the platform exposes one.
    fn cpu_model(&self) -> Option<String>;

    /// MAC addresses of all network interfaces, unfiltered.
    fn mac_addresses(&self) -> Vec<String>;

    /// Platform-specific stable machine identifier (machine GUID,
    /// machine-id, hardware UUID). `None` when the lookup fails.
    fn machine_id(&self) -> Option<String>;
}

/// Returns the probe for the current operating system.
pub fn platform_probe() -> Box<dyn SystemProbe> {
    #[cfg(target_os = "linux")]
    {
        Box::new(linux::LinuxProbe)
    }
    #[cfg(target_os = "macos")]
    {
        Box::new(macos::MacosProbe)
    }
    #[cfg(target_os = "windows")]
    {
        Box::new(windows::WindowsProbe)
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        Box::new(UnsupportedProbe)
    }
}

/// Probe for platforms without a dedicated implementation. Contributes
/// nothing; the fingerprint still covers hostname, platform, and arch.
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
struct UnsupportedProbe;

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
impl SystemProbe for UnsupportedProbe {
    fn cpu_model(&self) -> Option<String> {
        None
    }

    fn mac_addresses(&self) -> Vec<String> {
        Vec::new()
    }

    fn machine_id(&self) -> Option<String> {
        None
    }
}

/// Run a probe command, returning trimmed stdout on success.
pub(crate) fn run_command(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[derive(Default)]
struct HwidState {
    custom: Option<String>,
    cached: Option<String>,
}

/// Derives and caches the machine fingerprint for one client instance.
///
/// A custom fingerprint set via [`set_hwid`](HwidGenerator::set_hwid) always
/// wins over derivation. Derivation runs at most once per instance unless a
/// new custom value replaces the memoized result.
pub struct HwidGenerator {
    probe: Box<dyn SystemProbe>,
    auto: bool,
    state: Mutex<HwidState>,
}

impl HwidGenerator {
    /// Create a generator backed by the current platform's probe.
    pub fn new(auto: bool) -> Self {
        Self::with_probe(auto, platform_probe())
    }

    /// Create a generator with an explicit probe.
    pub fn with_probe(auto: bool, probe: Box<dyn SystemProbe>) -> Self {
        Self {
            probe,
            auto,
            state: Mutex::new(HwidState::default()),
        }
    }

    /// Derive the machine fingerprint, memoizing the result.
    ///
    /// Concurrent first calls may derive redundantly; derivation is
    /// deterministic over stable inputs, so they converge on one value.
    pub fn generate(&self) -> String {
        if let Some(cached) = self.lock_state().cached.clone() {
            return cached;
        }

        let fingerprint = self.derive();
        debug!(fingerprint = %fingerprint, "derived hardware fingerprint");

        let mut state = self.lock_state();
        state.cached.get_or_insert(fingerprint).clone()
    }

    /// Resolve the fingerprint to attach to a request.
    ///
    /// A custom value always wins; otherwise the fingerprint is derived and
    /// cached when auto-generation is enabled. With auto-generation disabled
    /// and no override, fails with [`VerifyError::HwidNotSet`].
    pub fn hwid(&self) -> VerifyResult<String> {
        if let Some(custom) = self.lock_state().custom.clone() {
            return Ok(custom);
        }
        if self.auto {
            return Ok(self.generate());
        }
        Err(VerifyError::HwidNotSet)
    }

    /// Set a custom fingerprint, replacing the memoized value.
    ///
    /// Takes effect immediately for subsequent calls. Empty input fails with
    /// [`VerifyError::InvalidHwid`].
    pub fn set_hwid(&self, value: &str) -> VerifyResult<()> {
        if value.trim().is_empty() {
            return Err(VerifyError::InvalidHwid(
                "must be a non-empty string".to_string(),
            ));
        }

        let mut state = self.lock_state();
        state.custom = Some(value.to_string());
        state.cached = Some(value.to_string());
        Ok(())
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, HwidState> {
        self.state.lock().expect("hwid state lock poisoned")
    }

    fn derive(&self) -> String {
        let mut components: Vec<String> = Vec::new();

        components.push(
            self.probe
                .cpu_model()
                .filter(|model| !model.is_empty())
                .unwrap_or_else(|| "unknown".to_string()),
        );
        components.push(get_hostname());
        components.push(env::consts::OS.to_string());
        components.push(env::consts::ARCH.to_string());

        // Sorted and deduplicated; interfaces without a burned-in address
        // report all zeroes and are excluded.
        let macs: BTreeSet<String> = self
            .probe
            .mac_addresses()
            .into_iter()
            .map(|mac| mac.trim().to_ascii_lowercase().replace('-', ":"))
            .filter(|mac| !mac.is_empty() && mac != ZERO_MAC)
            .collect();
        components.extend(macs);

        // Best-effort: a failed machine-id lookup degrades the fingerprint
        // rather than aborting derivation.
        if let Some(id) = self.probe.machine_id() {
            let id = id.trim().to_string();
            if !id.is_empty() {
                components.push(id);
            }
        }

        sha256_hex(components.join(COMPONENT_DELIMITER).as_bytes())
    }
}

/// Machine hostname, `"unknown"` when unavailable.
fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}
