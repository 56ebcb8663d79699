//! Local state backend
//!
//! Applies [`StateAction`]s directly to the machine: idempotent file
//! writes for resolver and master.d state, shell-outs for adapter DNS and
//! service restarts.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

use super::{ApplyResult, OsFamily, StateAction, StateBackend};
use crate::BootstrapError;

/// State backend operating on the local machine
pub struct LocalState {
    os_family: OsFamily,
}

impl LocalState {
    pub fn new(os_family: OsFamily) -> Self {
        Self { os_family }
    }

    /// Append the lines that are not already present in the file
    ///
    /// Unrelated existing lines are preserved; re-running with the same
    /// lines is a no-op.
    async fn ensure_lines(&self, path: &Path, lines: &[String]) -> Result<ApplyResult, BootstrapError> {
        let name = path.display().to_string();
        let existing = fs::read_to_string(path).await.unwrap_or_default();
        let present: HashSet<&str> = existing.lines().collect();

        let missing: Vec<&String> = lines
            .iter()
            .filter(|line| !present.contains(line.as_str()))
            .collect();

        if missing.is_empty() {
            return Ok(ApplyResult::unchanged(name, "all lines already present"));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(BootstrapError::Io)?;
        }

        let mut updated = existing;
        if !updated.is_empty() && !updated.ends_with('\n') {
            updated.push('\n');
        }
        for line in &missing {
            updated.push_str(line);
            updated.push('\n');
        }
        fs::write(path, updated).await.map_err(BootstrapError::Io)?;

        info!("Appended {} line(s) to {}", missing.len(), path.display());
        Ok(ApplyResult::changed(
            name,
            format!("appended {} line(s)", missing.len()),
            json!({ "appended": missing }),
        ))
    }

    /// Serialize a structured value to a YAML file, writing only on change
    async fn serialize_file(
        &self,
        path: &Path,
        data: &serde_json::Value,
    ) -> Result<ApplyResult, BootstrapError> {
        let name = path.display().to_string();
        let rendered = serde_yaml::to_string(data)?;

        let existing = fs::read_to_string(path).await.ok();
        if existing.as_deref() == Some(rendered.as_str()) {
            return Ok(ApplyResult::unchanged(name, "file is in the correct state"));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(BootstrapError::Io)?;
        }
        fs::write(path, &rendered).await.map_err(BootstrapError::Io)?;

        info!("Wrote {}", path.display());
        let comment = if existing.is_some() {
            "file updated"
        } else {
            "file written"
        };
        Ok(ApplyResult::changed(name, comment, json!({ "diff": rendered })))
    }

    /// Configure static DNS servers on a network adapter via netsh
    ///
    /// netsh gives no changed/unchanged signal, so success is reported as
    /// a change.
    async fn static_dns(
        &self,
        interface: &str,
        servers: &[String],
    ) -> Result<ApplyResult, BootstrapError> {
        let name_arg = format!("name={interface}");
        for (index, server) in servers.iter().enumerate() {
            let args: Vec<String> = if index == 0 {
                vec![
                    "interface".into(),
                    "ip".into(),
                    "set".into(),
                    "dns".into(),
                    name_arg.clone(),
                    "static".into(),
                    server.clone(),
                    "primary".into(),
                ]
            } else {
                vec![
                    "interface".into(),
                    "ip".into(),
                    "add".into(),
                    "dns".into(),
                    name_arg.clone(),
                    server.clone(),
                    format!("index={}", index + 1),
                ]
            };
            run_command("netsh", &args).await?;
        }

        Ok(ApplyResult::changed(
            interface,
            "static DNS servers configured",
            json!({ "dns_servers": servers }),
        ))
    }

    /// Restart a system service
    async fn restart_service(&self, service: &str) -> Result<ApplyResult, BootstrapError> {
        match self.os_family {
            OsFamily::Windows => {
                run_command(
                    "powershell",
                    &[
                        "-Command".to_string(),
                        format!("Restart-Service -Name {service}"),
                    ],
                )
                .await?;
            }
            OsFamily::Default => {
                run_command("systemctl", &["restart".to_string(), service.to_string()]).await?;
            }
        }

        info!("Restarted service {}", service);
        Ok(ApplyResult::changed(
            service,
            "service restarted",
            json!({ "restarted": service }),
        ))
    }
}

async fn run_command(program: &str, args: &[String]) -> Result<(), BootstrapError> {
    debug!("Running: {} {}", program, args.join(" "));

    let output = tokio::process::Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| BootstrapError::Command(format!("{program}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BootstrapError::Command(format!(
            "{program} failed: {stderr}"
        )));
    }

    Ok(())
}

#[async_trait]
impl StateBackend for LocalState {
    async fn apply(&self, action: &StateAction) -> Result<ApplyResult, BootstrapError> {
        match action {
            StateAction::EnsureLines { path, lines } => self.ensure_lines(path, lines).await,
            StateAction::StaticDns { interface, servers } => {
                self.static_dns(interface, servers).await
            }
            StateAction::SerializeFile { path, data } => self.serialize_file(path, data).await,
            StateAction::RestartService { name } => self.restart_service(name).await,
        }
    }
}
