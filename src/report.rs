//! Report assembly: turns collected metrics into a frozen report body

use crate::error::RenderError;
use crate::render::{self, Entry, LayoutConfig, MetricRow, ReportBody, UsageRatio};
use crate::status::{self, MachineStatus};

#[derive(Debug, Clone)]
enum Pending {
    Text(MetricRow),
    Bar { label: String, ratio: UsageRatio },
    Divider,
}

/// Collects rows in display order. Bar rows are sized once the data column
/// width is known, so a bar always spans the full data cell.
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    pending: Vec<Pending>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(&mut self, label: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.pending.push(Pending::Text(MetricRow::new(label, value)));
        self
    }

    pub fn continuation(&mut self, value: impl Into<String>) -> &mut Self {
        self.pending.push(Pending::Text(MetricRow::continuation(value)));
        self
    }

    pub fn bar(&mut self, label: impl Into<String>, ratio: UsageRatio) -> &mut Self {
        self.pending.push(Pending::Bar {
            label: label.into(),
            ratio,
        });
        self
    }

    pub fn divider(&mut self) -> &mut Self {
        self.pending.push(Pending::Divider);
        self
    }

    /// Freeze the body. Text rows decide the column widths; bar rows only
    /// contribute their labels.
    pub fn finish(self, cfg: &LayoutConfig) -> Result<ReportBody, RenderError> {
        cfg.validate()?;

        let sizing: Vec<Entry> = self
            .pending
            .iter()
            .map(|p| match p {
                Pending::Text(row) => Entry::Row(row.clone()),
                Pending::Bar { label, .. } => Entry::Row(MetricRow::new(label.clone(), "")),
                Pending::Divider => Entry::Divider,
            })
            .collect();
        let widths = render::negotiate(&sizing, cfg);

        Ok(self
            .pending
            .into_iter()
            .map(|p| match p {
                Pending::Text(row) => Entry::Row(row),
                Pending::Bar { label, ratio } => {
                    Entry::Row(MetricRow::new(label, ratio.bar(widths.data)))
                }
                Pending::Divider => Entry::Divider,
            })
            .collect())
    }
}

/// Lay out the machine report in its fixed section order.
pub fn build_report(
    status: &MachineStatus,
    cfg: &LayoutConfig,
) -> Result<ReportBody, RenderError> {
    let mut report = ReportBuilder::new();
    let cpu = &status.cpu;
    let net = &status.network;

    report
        .row("OS", &status.os.name)
        .row("KERNEL", &status.os.kernel)
        .divider()
        .row("HOSTNAME", &net.hostname)
        .row("MACHINE IP", &net.machine_ip)
        .row("CLIENT IP", &net.client_ip);

    match net.dns_ips.split_first() {
        Some((first, rest)) => {
            report.row("DNS IP", first);
            for ip in rest {
                report.continuation(ip);
            }
        }
        None => {
            report.row("DNS IP", "Unknown");
        }
    }

    report
        .row("USER", &net.user)
        .divider()
        .row("PROCESSOR", &cpu.brand)
        .row("CORES", status::format_cores(cpu))
        .row("HYPERVISOR", &cpu.hypervisor)
        .row("CPU FREQ", status::format_frequency(cpu.frequency_mhz))
        .bar("LOAD  1m", cpu.load_ratio(cpu.load_avg_1min))
        .bar("LOAD  5m", cpu.load_ratio(cpu.load_avg_5min))
        .bar("LOAD 15m", cpu.load_ratio(cpu.load_avg_15min))
        .divider()
        .row(
            "VOLUME",
            status::format_usage(status.disk.used_bytes, status.disk.total_bytes),
        )
        .bar("DISK USAGE", status.disk.ratio())
        .divider()
        .row(
            "MEMORY",
            status::format_usage(status.memory.used_bytes, status.memory.total_bytes),
        )
        .bar("USAGE", status.memory.ratio())
        .divider();

    match &status.last_login {
        Some(login) => {
            report.row("LAST LOGIN", &login.when);
            if let Some(from) = &login.from {
                report.continuation(from);
            }
        }
        None => {
            report.row("LAST LOGIN", "Login tracking unavailable");
        }
    }

    report.row("UPTIME", status::format_uptime(status.uptime_seconds));

    report.finish(cfg)
}

/// Build and render the report in one step.
pub fn render_report(status: &MachineStatus, cfg: &LayoutConfig) -> Result<String, RenderError> {
    let body = build_report(status, cfg)?;
    render::render(&body, cfg)
}
