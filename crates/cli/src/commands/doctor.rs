use regulus_agent::agencies::AgencyDirectory;
use regulus_agent::pdf::PdfToTextExtractor;
use regulus_client::RegulationsClient;
use regulus_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use serde::Serialize;

use super::config::redact_key;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

const DEPENDENT_CHECKS: &[&str] = &["api_key_readiness", "pdf_extractor", "agency_directory"];

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_api_key(&config));
            checks.push(check_pdf_extractor(&config));
            checks.push(check_agency_directory(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for &name in DEPENDENT_CHECKS {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

/// Builds the real HTTP client, which rejects keys that cannot be sent as a header.
fn check_api_key(config: &AppConfig) -> DoctorCheck {
    let key = redact_key(config.api.api_key.expose_secret());
    match RegulationsClient::from_config(&config.api) {
        Ok(client) => DoctorCheck {
            name: "api_key_readiness",
            status: CheckStatus::Pass,
            details: format!("api key {key} accepted; requests go to {}", client.base_url()),
        },
        Err(error) => DoctorCheck {
            name: "api_key_readiness",
            status: CheckStatus::Fail,
            details: format!("api key {key} cannot be used: {error}"),
        },
    }
}

fn check_pdf_extractor(config: &AppConfig) -> DoctorCheck {
    let extractor = PdfToTextExtractor::new(config.pdf.extractor.clone());
    match extractor.locate() {
        Ok(path) => DoctorCheck {
            name: "pdf_extractor",
            status: CheckStatus::Pass,
            details: format!("found `{}`", path.display()),
        },
        Err(error) => DoctorCheck {
            name: "pdf_extractor",
            status: CheckStatus::Fail,
            details: format!("{error}; get_pdf_content will fail until it is installed"),
        },
    }
}

fn check_agency_directory(config: &AppConfig) -> DoctorCheck {
    match AgencyDirectory::load(config.agents.agency_directory.as_deref()) {
        Ok(directory) => DoctorCheck {
            name: "agency_directory",
            status: CheckStatus::Pass,
            details: format!("{} agencies available", directory.len()),
        },
        Err(error) => {
            DoctorCheck { name: "agency_directory", status: CheckStatus::Fail, details: error.to_string() }
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
