use std::io;

use anyhow::Result;
use nksctx_config::{AppConfig, Credentials};
use nksctx_core::{switch_to_cluster, Authenticator, CloudClient, ContextStore, NksError, Syncer};

use crate::command::Command;

pub struct App {
    config: AppConfig,
    profile: Option<String>,
}

impl App {
    pub fn new(config: AppConfig, profile: Option<String>) -> Self {
        Self { config, profile }
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Sync => self.sync().await,
            Command::Switch(cluster) => self.switch(&cluster),
            Command::Complete(prefix) => self.complete(&prefix),
        }
    }

    async fn sync(&self) -> Result<()> {
        let credentials = Credentials::load(self.profile.as_deref()).map_err(NksError::from)?;
        let authenticator = Authenticator::new(&self.config.authenticator);
        let client = CloudClient::from_credentials(&credentials, &self.config.api)?;
        let mut store = ContextStore::load()?;

        tracing::debug!(api_url = client.api_url(), endpoints = client.base_urls().len(), "syncing clusters");
        let report = Syncer::new(&client, &authenticator)
            .profile(self.profile.as_deref())
            .run(&mut store, &mut io::stdout(), &mut io::stderr())
            .await?;
        tracing::debug!(synced = report.synced, skipped = report.skipped, failed = report.failed, "sync finished");
        Ok(())
    }

    fn switch(&self, cluster: &str) -> Result<()> {
        let mut store = ContextStore::load()?;
        let context = switch_to_cluster(&mut store, cluster)?;
        println!("Switched to context \"{context}\"");
        Ok(())
    }

    fn complete(&self, prefix: &str) -> Result<()> {
        // Completion must never fail loudly; an unreadable kubeconfig completes nothing.
        let Ok(store) = ContextStore::load() else { return Ok(()) };
        for name in completions(&store, prefix) {
            println!("{name}");
        }
        Ok(())
    }
}

pub fn completions(store: &ContextStore, prefix: &str) -> Vec<String> {
    store.list_distinct_cluster_references().into_iter().filter(|name| name.starts_with(prefix)).collect()
}
