//! fOS Audit Replay - Main Entry Point
//!
//! Usage: fos-audit-replay <fixture.json> [--config <config.json>] [--device <name>|all] [--json]

use anyhow::{bail, Context};
use fos_audit::{AuditConfig, DeviceProfile};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Args {
    fixture: String,
    config: Option<String>,
    devices: Vec<DeviceProfile>,
    json: bool,
}

fn device_by_name(name: &str) -> anyhow::Result<Vec<DeviceProfile>> {
    Ok(match name {
        "iphone-15" => vec![DeviceProfile::iphone_15()],
        "galaxy-s21" => vec![DeviceProfile::galaxy_s21()],
        "ipad" => vec![DeviceProfile::ipad()],
        "all" => DeviceProfile::presets(),
        other => bail!("Unknown device '{}' (expected iphone-15, galaxy-s21, ipad or all)", other),
    })
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Args> {
    let mut fixture = None;
    let mut config = None;
    let mut devices = vec![DeviceProfile::default()];
    let mut json = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(args.next().context("--config needs a path")?),
            "--device" => devices = device_by_name(&args.next().context("--device needs a name")?)?,
            "--json" => json = true,
            flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
            path if fixture.is_none() => fixture = Some(path.to_string()),
            other => bail!("Unexpected argument: {}", other),
        }
    }

    let fixture = fixture.context("usage: fos-audit-replay <fixture.json> [--config <config.json>] [--device <name>|all] [--json]")?;
    Ok(Args { fixture, config, devices, json })
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    tracing::info!("fOS Audit v{} replaying {}", fos_audit::VERSION, args.fixture);

    let fixture = std::fs::read_to_string(&args.fixture)
        .with_context(|| format!("Failed to read fixture {}", args.fixture))?;
    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path))?;
            AuditConfig::from_json(&json)?
        }
        None => AuditConfig::default(),
    };

    let reports = fos_audit::audit_fixture(&fixture, &config, &args.devices)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            let (passed, failed, warning, error) = report.count_by_status();
            println!("=== {} ===", report.device);
            for verdict in &report.verdicts {
                println!("{}", verdict);
            }
            println!(
                "Passed: {}, Failed: {}, Warnings: {}, Errors: {}\n",
                passed, failed, warning, error
            );
        }
    }

    if reports.iter().any(|r| !r.passes()) {
        bail!("Audit found failures");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Args> {
        parse_args(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_parse_fixture_and_options() {
        let args = parse(&["page.json", "--device", "all", "--json"]).unwrap();
        assert_eq!(args.fixture, "page.json");
        assert_eq!(args.devices.len(), 3);
        assert!(args.json);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let err = parse(&["--jsn", "page.json"]).unwrap_err();
        assert_eq!(err.to_string(), "Unknown option: --jsn");
        assert!(parse(&["page.json", "--jsn"]).is_err());
    }

    #[test]
    fn test_missing_fixture() {
        assert!(parse(&["--json"]).is_err());
        assert!(parse(&["--device", "pixel"]).is_err());
    }
}
