//! System information tool.
//!
//! Reports OS, host, CPU, memory, root disk and network counters. Sampling
//! CPU usage needs two refreshes a short interval apart, so collection runs on
//! the blocking pool.

use std::path::Path;

use async_trait::async_trait;
use rmcp::model::Content;
use sysinfo::{Disks, Networks, System};
use tracing::{debug, instrument};

use crate::domains::tools::{NoParams, ToolContext, ToolDefinition, ToolError};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Returns a text report of the host's resources.
pub struct SystemInfoTool;

#[async_trait]
impl ToolDefinition for SystemInfoTool {
    type Params = NoParams;

    const NAME: &'static str = "System Info";
    const DESCRIPTION: &'static str = "Retrieve system information (CPU, memory, disk, etc.)";

    #[instrument(skip_all)]
    async fn execute(&self, _params: NoParams, _ctx: &ToolContext) -> Result<Vec<Content>, ToolError> {
        let report = tokio::task::spawn_blocking(collect_report)
            .await
            .map_err(|e| ToolError::upstream(format!("Failed to retrieve system info: {}", e)))?;

        debug!("Collected system report ({} bytes)", report.len());
        Ok(vec![Content::text(report)])
    }
}

fn collect_report() -> String {
    let mut sys = System::new_all();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu_usage();

    let cpu_usage: Vec<String> = sys
        .cpus()
        .iter()
        .map(|cpu| format!("{:.1}%", cpu.cpu_usage()))
        .collect();

    let total_memory = sys.total_memory();
    let used_memory = sys.used_memory();
    let memory_percent = percent(used_memory, total_memory);

    let disks = Disks::new_with_refreshed_list();
    let root_disk = disks
        .list()
        .iter()
        .find(|disk| disk.mount_point() == Path::new("/"))
        .map(|disk| {
            let total = disk.total_space();
            let free = disk.available_space();
            let used = total.saturating_sub(free);
            format!(
                "   - Total Space: {:.2}GB\n   - Used Space: {:.2}GB\n   - Free Space: {:.2}GB\n   - Usage: {:.1}%",
                total as f64 / GIB,
                used as f64 / GIB,
                free as f64 / GIB,
                percent(used, total)
            )
        })
        .unwrap_or_else(|| "   - No root filesystem found".to_string());

    let networks = Networks::new_with_refreshed_list();
    let (sent, received) = networks
        .list()
        .values()
        .fold((0u64, 0u64), |(tx, rx), data| {
            (tx + data.total_transmitted(), rx + data.total_received())
        });

    let unknown = || "unknown".to_string();

    // Battery state is not collected; sysinfo has no battery API.
    format!(
        "System Information:\n\
         1. Operating System: {} {}\n\
         2. Device Name: {}\n\
         3. CPU Info:\n   - CPU Core Count: {}\n   - CPU Usage: [{}]\n\
         4. Memory Info:\n   - Total Memory: {:.2}GB\n   - Used Memory: {:.2}GB\n   - Available Memory: {:.2}GB\n   - Usage: {:.1}%\n\
         5. Disk Info (Root Directory):\n{}\n\
         6. Network Info:\n   - Sent: {:.2}MB\n   - Received: {:.2}MB\n\
         7. No battery information",
        System::name().unwrap_or_else(unknown),
        System::kernel_version().unwrap_or_else(unknown),
        System::host_name().unwrap_or_else(unknown),
        sys.cpus().len(),
        cpu_usage.join(", "),
        total_memory as f64 / GIB,
        used_memory as f64 / GIB,
        sys.available_memory() as f64 / GIB,
        memory_percent,
        root_disk,
        sent as f64 / MIB,
        received as f64 / MIB,
    )
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(50, 200), 25.0);
    }

    #[test]
    fn test_report_sections() {
        let report = collect_report();
        assert!(report.starts_with("System Information:"));
        assert!(report.contains("CPU Core Count"));
        assert!(report.contains("Memory Info"));
        assert!(report.contains("Network Info"));
    }
}
