//! Run Metadata
//!
//! What a report records besides the timing: the gmmbench version, the host
//! the fit ran on, and the shape of the dataset that was fitted. Host details
//! come from `/proc` on Linux and degrade to "Unknown" / 0 elsewhere.

use chrono::Utc;
use gmmbench_core::load_csv;
use gmmbench_report::{DatasetShape, ReportMeta, SystemInfo};
use std::path::Path;

/// Build report metadata including host info
pub fn build_report_meta() -> ReportMeta {
    let system = SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu: proc_field("/proc/cpuinfo", "model name").unwrap_or_else(|| "Unknown".to_string()),
        cpu_cores: std::thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or(1),
        memory_gb: proc_field("/proc/meminfo", "MemTotal")
            .as_deref()
            .and_then(parse_meminfo_kb)
            .map(|kb| kb as f64 / (1024.0 * 1024.0))
            .unwrap_or(0.0),
    };

    ReportMeta {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        system,
    }
}

/// Samples and features of the dataset, or `None` when it does not load.
///
/// Reads the file again after the run; this never contributes to the timing.
pub fn describe_dataset(path: &Path) -> Option<DatasetShape> {
    let data = load_csv(path).ok()?;
    Some(DatasetShape {
        samples: data.nrows(),
        features: data.ncols(),
    })
}

/// Value of the first `key: value` line in a `/proc` file (Linux only)
fn proc_field(file: &str, key: &str) -> Option<String> {
    if !cfg!(target_os = "linux") {
        return None;
    }
    let content = std::fs::read_to_string(file).ok()?;
    content
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim() == key)
        .map(|(_, value)| value.trim().to_string())
}

/// `"16314248 kB"` → 16314248
fn parse_meminfo_kb(value: &str) -> Option<u64> {
    value.split_whitespace().next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_report_meta() {
        let meta = build_report_meta();
        assert_eq!(meta.version, env!("CARGO_PKG_VERSION"));
        assert!(meta.system.cpu_cores >= 1);
        assert!(!meta.system.os.is_empty());
        assert!(meta.system.memory_gb >= 0.0);
    }

    #[test]
    fn test_parse_meminfo_kb() {
        assert_eq!(parse_meminfo_kb("16314248 kB"), Some(16314248));
        assert_eq!(parse_meminfo_kb(""), None);
        assert_eq!(parse_meminfo_kb("lots"), None);
    }

    #[test]
    fn test_describe_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "# x,y,z\n1,2,3\n4,5,6\n").unwrap();

        assert_eq!(
            describe_dataset(&path),
            Some(DatasetShape {
                samples: 2,
                features: 3
            })
        );
        assert_eq!(describe_dataset(&dir.path().join("missing.csv")), None);
    }
}
