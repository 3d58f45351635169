use std::future::Future;
use std::path::{Path, PathBuf};

use nksctx_config::AuthenticatorConfig;
use tokio::process::Command;

use crate::client::Cluster;
use crate::error::NksError;

pub const INSTALL_HINT: &str = "https://guide.ncloud-docs.com/docs/nks-nkstoken";

#[derive(Debug, Clone, Copy)]
pub struct UpdateRequest<'a> {
    pub cluster: &'a Cluster,
    pub kubeconfig: &'a Path,
    pub profile: Option<&'a str>,
    pub overwrite: bool,
}

impl UpdateRequest<'_> {
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "update-kubeconfig".to_string(),
            "--region".into(),
            self.cluster.region.clone(),
            "--clusterUuid".into(),
            self.cluster.uuid.clone(),
            "--clusterName".into(),
            self.cluster.name.clone(),
            "--kubeconfig".into(),
            self.kubeconfig.to_string_lossy().into_owned(),
        ];
        if let Some(profile) = self.profile.filter(|p| !p.is_empty()) {
            args.push("--profile".into());
            args.push(profile.to_string());
        }
        if self.overwrite {
            args.push("--overwrite".into());
        }
        args
    }
}

/// Turns a cluster identity into a kubeconfig context, out of process.
pub trait Materializer: Send + Sync {
    /// Resolved binary, if it can be run.
    fn locate(&self) -> Option<PathBuf>;

    fn is_installed(&self) -> bool {
        self.locate().is_some()
    }

    fn update_kubeconfig(&self, request: UpdateRequest<'_>) -> impl Future<Output = Result<(), NksError>> + Send;
}

/// Runs `ncp-iam-authenticator update-kubeconfig`.
pub struct Authenticator {
    binary: PathBuf,
}

impl Authenticator {
    pub fn new(config: &AuthenticatorConfig) -> Self {
        let path_var = std::env::var_os("PATH");
        let search_dirs: Vec<PathBuf> = path_var.as_deref().map(|p| std::env::split_paths(p).collect()).unwrap_or_default();
        Self { binary: find_binary(&config.binary, &config.search_paths, &search_dirs) }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

/// Fixed install locations first, then `PATH`, then the bare name.
fn find_binary(name: &str, candidates: &[String], search_dirs: &[PathBuf]) -> PathBuf {
    candidates
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
        .or_else(|| search_dirs.iter().map(|dir| dir.join(name)).find(|p| p.is_file()))
        .unwrap_or_else(|| PathBuf::from(name))
}

impl Materializer for Authenticator {
    fn locate(&self) -> Option<PathBuf> {
        self.binary.is_file().then(|| self.binary.clone())
    }

    async fn update_kubeconfig(&self, request: UpdateRequest<'_>) -> Result<(), NksError> {
        let failed = |reason: String| NksError::Materialization { cluster: request.cluster.name.clone(), reason };

        if let Some(dir) = request.kubeconfig.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| failed(format!("failed to create kubeconfig directory: {e}")))?;
        }

        let args = request.args();
        tracing::debug!(binary = %self.binary.display(), ?args, "running authenticator");

        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .await
            .map_err(|e| failed(format!("failed to run {}: {e}", self.binary.display())))?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(failed(format!("ncp-iam-authenticator failed: {}\nOutput: {combined}", output.status)));
        }
        Ok(())
    }
}
