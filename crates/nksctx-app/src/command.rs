use clap::Parser;

const LONG_ABOUT: &str = "\
kubectl plugin for managing NKS (Ncloud Kubernetes Service) cluster contexts.

Run without arguments to sync all NKS clusters to kubeconfig and display the list.
Run with a cluster name to switch to that cluster's context.

Examples:
  # Sync clusters and show list
  kubectl nks-ctx

  # Switch to a specific cluster
  kubectl nks-ctx my-cluster

  # Use a specific NCP profile
  kubectl nks-ctx --profile finance";

#[derive(Debug, Parser)]
#[command(
    name = "kubectl-nks_ctx",
    version,
    about = "Manage NKS (Ncloud Kubernetes Service) cluster contexts",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    /// Cluster to switch to
    pub cluster: Option<String>,

    /// NCP profile name (default: DEFAULT)
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Print known cluster names starting with PREFIX, for shell completion
    #[arg(long, hide = true, value_name = "PREFIX", conflicts_with = "cluster")]
    pub complete: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Sync,
    Switch(String),
    Complete(String),
}

impl Cli {
    pub fn command(&self) -> Command {
        match (&self.complete, &self.cluster) {
            (Some(prefix), _) => Command::Complete(prefix.clone()),
            (None, Some(cluster)) => Command::Switch(cluster.clone()),
            (None, None) => Command::Sync,
        }
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref().filter(|p| !p.is_empty())
    }
}
