//! Machine metrics collection
//!
//! Every probe degrades to a placeholder value instead of failing; the
//! fallback is written to the collector log.

use crate::debug_log::collector_log;
use crate::render::UsageRatio;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use sysinfo::System;

const UNKNOWN: &str = "Unknown";
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineStatus {
    pub os: OsInfo,
    pub network: NetworkIdentity,
    pub cpu: CpuInfo,
    pub disk: VolumeInfo,
    pub memory: MemoryInfo,
    pub last_login: Option<LastLogin>,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsInfo {
    pub name: String,
    pub kernel: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkIdentity {
    pub hostname: String,
    pub machine_ip: String,
    pub client_ip: String,
    pub dns_ips: Vec<String>,
    pub user: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuInfo {
    pub brand: String,
    pub logical_cores: usize,
    pub physical_cores: Option<usize>,
    pub hypervisor: String,
    pub frequency_mhz: Option<u64>,
    pub load_avg_1min: f64,
    pub load_avg_5min: f64,
    pub load_avg_15min: f64,
}

impl CpuInfo {
    /// Load average against the logical core count.
    pub fn load_ratio(&self, load: f64) -> UsageRatio {
        UsageRatio::new(load, self.logical_cores as f64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeInfo {
    pub mount_point: String,
    pub used_bytes: u64,
    pub total_bytes: u64,
}

impl VolumeInfo {
    pub fn ratio(&self) -> UsageRatio {
        UsageRatio::new(self.used_bytes as f64, self.total_bytes as f64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub used_bytes: u64,
    pub total_bytes: u64,
}

impl MemoryInfo {
    pub fn ratio(&self) -> UsageRatio {
        UsageRatio::new(self.used_bytes as f64, self.total_bytes as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastLogin {
    pub when: String,
    pub from: Option<String>,
}

/// Gather the full set of machine metrics.
///
/// Fails only when no CPU, memory or host data could be read at all.
pub fn gather_status(system: &mut System) -> Result<MachineStatus> {
    // CPU frequency and brand need a refresh before they are populated
    system.refresh_cpu_all();
    std::thread::sleep(Duration::from_millis(20));
    system.refresh_cpu_all();
    system.refresh_memory();

    let os = gather_os_info();
    let network = gather_network_identity();
    let cpu = gather_cpu_info(system);
    let disk = gather_volume_info();
    let memory = MemoryInfo {
        used_bytes: system.used_memory(),
        total_bytes: system.total_memory(),
    };
    let last_login = gather_last_login(&network.user);
    let uptime_seconds = System::uptime();

    if cpu.logical_cores == 0 && memory.total_bytes == 0 && network.hostname == UNKNOWN {
        anyhow::bail!("no machine metrics could be read on this platform");
    }

    Ok(MachineStatus {
        os,
        network,
        cpu,
        disk,
        memory,
        last_login,
        uptime_seconds,
    })
}

fn or_unknown(value: Option<String>, probe: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => {
            collector_log(&format!("{probe}: not available"));
            UNKNOWN.to_string()
        }
    }
}

fn gather_os_info() -> OsInfo {
    OsInfo {
        name: or_unknown(System::long_os_version(), "os name"),
        kernel: or_unknown(System::kernel_version(), "kernel version"),
    }
}

fn gather_network_identity() -> NetworkIdentity {
    use sysinfo::Networks;

    let networks = Networks::new_with_refreshed_list();
    let mut interfaces: Vec<_> = networks.iter().collect();
    interfaces.sort_by(|a, b| a.0.cmp(b.0));
    let addresses = interfaces
        .iter()
        .flat_map(|(_, data)| data.ip_networks().iter().map(|net| net.addr));

    let machine_ip = or_unknown(pick_machine_ip(addresses).map(|ip| ip.to_string()), "machine ip");

    let client_ip = std::env::var("SSH_CLIENT")
        .ok()
        .and_then(|v| parse_ssh_client(&v))
        .unwrap_or_else(|| "Not connected".to_string());

    let dns_ips = match std::fs::read_to_string("/etc/resolv.conf") {
        Ok(text) => parse_nameservers(&text, 2),
        Err(e) => {
            collector_log(&format!("dns: cannot read /etc/resolv.conf: {e}"));
            Vec::new()
        }
    };

    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok();

    NetworkIdentity {
        hostname: or_unknown(System::host_name(), "hostname"),
        machine_ip,
        client_ip,
        dns_ips,
        user: or_unknown(user, "user"),
    }
}

/// First non-loopback IPv4 address, else the first non-loopback address.
fn pick_machine_ip(addresses: impl Iterator<Item = IpAddr>) -> Option<IpAddr> {
    let candidates: Vec<IpAddr> = addresses
        .filter(|ip| !ip.is_loopback() && !ip.is_unspecified())
        .collect();
    candidates
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| candidates.first())
        .copied()
}

/// `SSH_CLIENT` is "<client ip> <client port> <server port>".
fn parse_ssh_client(value: &str) -> Option<String> {
    value.split_whitespace().next().map(str::to_string)
}

fn parse_nameservers(resolv_conf: &str, limit: usize) -> Vec<String> {
    resolv_conf
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next()) {
                (Some("nameserver"), Some(addr)) => Some(addr.to_string()),
                _ => None,
            }
        })
        .take(limit)
        .collect()
}

fn gather_cpu_info(system: &System) -> CpuInfo {
    let cpus = system.cpus();
    let brand = or_unknown(cpus.first().map(|c| c.brand().to_string()), "cpu brand");
    let frequency_mhz = cpus.first().map(|c| c.frequency()).filter(|&mhz| mhz > 0);
    let load_avg = System::load_average();

    CpuInfo {
        brand,
        logical_cores: cpus.len(),
        physical_cores: system.physical_core_count(),
        hypervisor: gather_hypervisor(),
        frequency_mhz,
        load_avg_1min: load_avg.one,
        load_avg_5min: load_avg.five,
        load_avg_15min: load_avg.fifteen,
    }
}

#[cfg(target_os = "linux")]
fn gather_hypervisor() -> String {
    let cpuinfo = std::fs::read_to_string("/proc/cpuinfo").unwrap_or_else(|e| {
        collector_log(&format!("hypervisor: cannot read /proc/cpuinfo: {e}"));
        String::new()
    });
    let vendor = std::fs::read_to_string("/sys/class/dmi/id/sys_vendor").ok();
    detect_hypervisor(&cpuinfo, vendor.as_deref())
}

#[cfg(not(target_os = "linux"))]
fn gather_hypervisor() -> String {
    UNKNOWN.to_string()
}

/// Guests expose a `hypervisor` CPU flag; the DMI vendor names the host.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn detect_hypervisor(cpuinfo: &str, dmi_vendor: Option<&str>) -> String {
    let virtualized = cpuinfo
        .lines()
        .filter(|line| line.starts_with("flags"))
        .any(|line| line.split_whitespace().any(|flag| flag == "hypervisor"));

    if !virtualized {
        return "Bare Metal".to_string();
    }
    match dmi_vendor.map(str::trim) {
        Some(vendor) if !vendor.is_empty() => vendor.to_string(),
        _ => "Virtualized".to_string(),
    }
}

fn gather_volume_info() -> VolumeInfo {
    use sysinfo::Disks;

    let disks = Disks::new_with_refreshed_list();
    let volumes = disks
        .list()
        .iter()
        .map(|disk| {
            (
                disk.mount_point().to_path_buf(),
                disk.total_space(),
                disk.available_space(),
            )
        })
        .collect::<Vec<_>>();

    match pick_root_volume(&volumes) {
        Some((mount, total, available)) => VolumeInfo {
            mount_point: mount.display().to_string(),
            used_bytes: total.saturating_sub(*available),
            total_bytes: *total,
        },
        None => {
            collector_log("volume: no disks reported");
            VolumeInfo {
                mount_point: UNKNOWN.to_string(),
                used_bytes: 0,
                total_bytes: 0,
            }
        }
    }
}

/// The volume mounted at `/`, else the largest one.
fn pick_root_volume(volumes: &[(PathBuf, u64, u64)]) -> Option<&(PathBuf, u64, u64)> {
    volumes
        .iter()
        .find(|(mount, _, _)| mount == Path::new("/"))
        .or_else(|| volumes.iter().max_by_key(|(_, total, _)| *total))
}

#[cfg(unix)]
fn gather_last_login(user: &str) -> Option<LastLogin> {
    if user == UNKNOWN {
        return None;
    }
    let mut command = std::process::Command::new("last");
    if cfg!(target_os = "linux") {
        command.args(["-i", "-w"]);
    }
    let output = match command.args(["-n", "2", user]).output() {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            collector_log(&format!("last login: `last` exited with {}", output.status));
            return None;
        }
        Err(e) => {
            collector_log(&format!("last login: cannot run `last`: {e}"));
            return None;
        }
    };
    parse_last_output(&String::from_utf8_lossy(&output.stdout), user)
}

#[cfg(not(unix))]
fn gather_last_login(_user: &str) -> Option<LastLogin> {
    None
}

/// Parse `last` output, skipping the entry for the current session.
///
/// Lines look like `user pts/0 10.0.0.5 Sat Oct 18 09:12 still logged in`;
/// local logins carry `0.0.0.0` or no address at all.
#[cfg_attr(not(unix), allow(dead_code))]
fn parse_last_output(output: &str, user: &str) -> Option<LastLogin> {
    let sessions: Vec<LastLogin> = output
        .lines()
        .filter(|line| line.split_whitespace().next() == Some(user))
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let (from, rest) = match fields.get(2)?.parse::<IpAddr>() {
                Ok(ip) if ip.is_unspecified() => (None, &fields[3..]),
                Ok(ip) => (Some(ip.to_string()), &fields[3..]),
                Err(_) => (None, &fields[2..]),
            };
            // weekday, month, day, time
            if rest.len() < 4 {
                return None;
            }
            Some(LastLogin {
                when: rest[..4].join(" "),
                from,
            })
        })
        .collect();

    sessions.get(1).or_else(|| sessions.first()).cloned()
}

/// Uptime as `Nd Nh Nm`, dropping zero units.
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    let parts: Vec<String> = [(days, "d"), (hours, "h"), (minutes, "m")]
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| format!("{n}{unit}"))
        .collect();

    if parts.is_empty() {
        "0m".to_string()
    } else {
        parts.join(" ")
    }
}

/// `used/total GB [pct%]`.
pub fn format_usage(used_bytes: u64, total_bytes: u64) -> String {
    let ratio = UsageRatio::new(used_bytes as f64, total_bytes as f64);
    format!(
        "{:.2}/{:.2} GB [{:.2}%]",
        used_bytes as f64 / BYTES_PER_GB,
        total_bytes as f64 / BYTES_PER_GB,
        ratio.percent()
    )
}

pub fn format_frequency(mhz: Option<u64>) -> String {
    match mhz {
        Some(mhz) => format!("{:.2} GHz", mhz as f64 / 1000.0),
        None => UNKNOWN.to_string(),
    }
}

pub fn format_cores(cpu: &CpuInfo) -> String {
    match cpu.physical_cores {
        Some(physical) => format!("{} vCPU(s) / {} core(s)", cpu.logical_cores, physical),
        None => format!("{} vCPU(s)", cpu.logical_cores),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0), "0m");
        assert_eq!(format_uptime(59), "0m");
        assert_eq!(format_uptime(2 * 86_400 + 3 * 3_600), "2d 3h");
        assert_eq!(format_uptime(3_600 + 5 * 60), "1h 5m");
        assert_eq!(format_uptime(86_400 + 60), "1d 1m");
    }

    #[test]
    fn test_format_usage() {
        let gb = 1024 * 1024 * 1024;
        assert_eq!(format_usage(25 * gb, 100 * gb), "25.00/100.00 GB [25.00%]");
        assert_eq!(format_usage(0, 0), "0.00/0.00 GB [0.00%]");
    }

    #[test]
    fn test_format_frequency() {
        assert_eq!(format_frequency(Some(3400)), "3.40 GHz");
        assert_eq!(format_frequency(None), "Unknown");
    }

    #[test]
    fn test_pick_machine_ip_prefers_ipv4() {
        let addrs = vec![
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6("fe80::1".parse().unwrap()),
            IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20)),
        ];
        assert_eq!(
            pick_machine_ip(addrs.into_iter()),
            Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20)))
        );
    }

    #[test]
    fn test_pick_machine_ip_falls_back_to_ipv6() {
        let v6: IpAddr = "2001:db8::5".parse().unwrap();
        let addrs = vec![IpAddr::V6(Ipv6Addr::LOCALHOST), v6];
        assert_eq!(pick_machine_ip(addrs.into_iter()), Some(v6));
        assert_eq!(pick_machine_ip(std::iter::empty()), None);
    }

    #[test]
    fn test_parse_ssh_client() {
        assert_eq!(
            parse_ssh_client("203.0.113.7 51234 22"),
            Some("203.0.113.7".to_string())
        );
        assert_eq!(parse_ssh_client("   "), None);
    }

    #[test]
    fn test_parse_nameservers() {
        let conf = "\
# generated by resolvconf
nameserver 1.1.1.1
; nameserver 9.9.9.9
search lan
nameserver 8.8.8.8
nameserver 8.8.4.4
";
        assert_eq!(parse_nameservers(conf, 2), vec!["1.1.1.1", "8.8.8.8"]);
        assert!(parse_nameservers("", 2).is_empty());
    }

    #[test]
    fn test_detect_hypervisor() {
        let guest = "processor : 0\nflags : fpu vme hypervisor lahf_lm\n";
        let host = "processor : 0\nflags : fpu vme lahf_lm\n";
        assert_eq!(detect_hypervisor(host, Some("Dell Inc.")), "Bare Metal");
        assert_eq!(detect_hypervisor(guest, Some("QEMU\n")), "QEMU");
        assert_eq!(detect_hypervisor(guest, None), "Virtualized");
    }

    #[test]
    fn test_pick_root_volume() {
        let volumes = vec![
            (PathBuf::from("/boot"), 1_000, 500),
            (PathBuf::from("/"), 100, 40),
            (PathBuf::from("/data"), 5_000, 100),
        ];
        assert_eq!(pick_root_volume(&volumes).map(|v| v.1), Some(100));
        assert_eq!(pick_root_volume(&volumes[..1]).map(|v| v.1), Some(1_000));
        assert_eq!(pick_root_volume(&[]), None);
    }

    #[test]
    fn test_parse_last_output_skips_current_session() {
        let output = "\
alice    pts/0        192.168.1.10     Sat Oct 18 09:12   still logged in
alice    pts/1        10.0.0.5         Fri Oct 17 14:02 - 18:30  (04:28)

wtmp begins Mon Oct  1 00:00:01 2026
";
        assert_eq!(
            parse_last_output(output, "alice"),
            Some(LastLogin {
                when: "Fri Oct 17 14:02".to_string(),
                from: Some("10.0.0.5".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_last_output_local_login() {
        let output = "alice    tty1         0.0.0.0          Sat Oct 18 09:12   still logged in\n";
        assert_eq!(
            parse_last_output(output, "alice"),
            Some(LastLogin {
                when: "Sat Oct 18 09:12".to_string(),
                from: None,
            })
        );
        let no_host = "alice    console                       Sat Oct 18 09:12   still logged in\n";
        assert_eq!(
            parse_last_output(no_host, "alice").map(|l| l.when),
            Some("Sat Oct 18 09:12".to_string())
        );
        assert_eq!(parse_last_output("", "alice"), None);
    }

    #[test]
    fn test_load_ratio_uses_logical_cores() {
        let cpu = CpuInfo {
            brand: "Test CPU".to_string(),
            logical_cores: 4,
            physical_cores: Some(2),
            hypervisor: "Bare Metal".to_string(),
            frequency_mhz: Some(2400),
            load_avg_1min: 2.0,
            load_avg_5min: 1.0,
            load_avg_15min: 0.5,
        };
        assert_eq!(cpu.load_ratio(cpu.load_avg_1min).percent(), 50.0);
        assert_eq!(format_cores(&cpu), "4 vCPU(s) / 2 core(s)");
    }
}
