use std::io::Write;

use anyhow::Result;

use crate::client::{CloudClient, Cluster};
use crate::context::ContextStore;
use crate::error::NksError;
use crate::materializer::{Materializer, UpdateRequest, INSTALL_HINT};
use crate::transport::Transport;

/// One line of the cluster list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub cluster: String,
    pub context: Option<String>,
    pub active: bool,
}

impl ListEntry {
    pub fn render(&self) -> String {
        let marker = if self.active { "* " } else { "  " };
        format!("{marker}{}", self.cluster)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: usize,
    pub skipped: usize,
    pub failed: usize,
    pub entries: Vec<ListEntry>,
}

/// Brings the kubeconfig in line with the remote cluster list and prints it.
pub struct Syncer<'a, T, M> {
    client: &'a CloudClient<T>,
    materializer: &'a M,
    profile: Option<&'a str>,
}

impl<'a, T: Transport, M: Materializer> Syncer<'a, T, M> {
    pub fn new(client: &'a CloudClient<T>, materializer: &'a M) -> Self {
        Self { client, materializer, profile: None }
    }

    pub fn profile(mut self, profile: Option<&'a str>) -> Self {
        self.profile = profile;
        self
    }

    pub async fn run<O: Write, E: Write>(&self, store: &mut ContextStore, out: &mut O, err: &mut E) -> Result<SyncReport> {
        if !self.materializer.is_installed() {
            return Err(NksError::Configuration(format!(
                "ncp-iam-authenticator not found.\nInstall it from: {INSTALL_HINT}"
            ))
            .into());
        }

        let listing = self.client.list_clusters().await?;
        for failure in &listing.failures {
            writeln!(err, "  Warning: {failure}")?;
        }

        if listing.clusters.is_empty() {
            writeln!(out, "No clusters found.")?;
            return Ok(SyncReport::default());
        }

        let mut report = SyncReport::default();
        for cluster in &listing.clusters {
            if let Some(context) = store.find_by_cluster_reference(&cluster.name) {
                tracing::debug!(cluster = %cluster.name, %context, "already configured");
                report.skipped += 1;
                continue;
            }

            let request =
                UpdateRequest { cluster, kubeconfig: store.path(), profile: self.profile, overwrite: false };
            match self.materializer.update_kubeconfig(request).await {
                Ok(()) => report.synced += 1,
                Err(e) => {
                    tracing::warn!(cluster = %cluster.name, error = %e, "materialization failed");
                    writeln!(err, "  Warning: {e}")?;
                    report.failed += 1;
                }
            }
        }

        if report.synced > 0 || report.skipped > 0 {
            writeln!(
                out,
                "Synced {} cluster(s), skipped {} already configured. ({} total)\n",
                report.synced,
                report.skipped,
                listing.clusters.len()
            )?;
        }

        if report.synced > 0 {
            store.reload()?;
        }

        report.entries = list_entries(&listing.clusters, store);
        for entry in &report.entries {
            writeln!(out, "{}", entry.render())?;
        }

        Ok(report)
    }
}

/// Resolve each remote cluster to its local context and mark the active one.
pub fn list_entries(clusters: &[Cluster], store: &ContextStore) -> Vec<ListEntry> {
    let current = store.current_context();
    clusters
        .iter()
        .map(|cluster| {
            let context = store.find_by_cluster_reference(&cluster.name);
            let active = context.is_some() && context.as_deref() == current;
            ListEntry { cluster: cluster.name.clone(), context, active }
        })
        .collect()
}

/// Make the context for `cluster` the active one. Returns the context name.
pub fn switch_to_cluster(store: &mut ContextStore, cluster: &str) -> Result<String, NksError> {
    let context = store.find(cluster)?;
    store.switch_active(&context)?;
    Ok(context)
}
