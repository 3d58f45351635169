use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use kube::config::{Kubeconfig, NamedContext};

use crate::error::NksError;

/// The kubeconfig as a set of named contexts plus the active pointer.
///
/// Lookups walk contexts in lexicographic name order, so when several contexts match the
/// smallest name wins.
pub struct ContextStore {
    path: PathBuf,
    config: Kubeconfig,
}

impl ContextStore {
    /// First non-empty entry of `KUBECONFIG`, else `~/.kube/config`.
    pub fn default_path() -> PathBuf {
        let from_env = std::env::var_os("KUBECONFIG")
            .and_then(|paths| std::env::split_paths(&paths).find(|p| !p.as_os_str().is_empty()));

        from_env.unwrap_or_else(|| {
            dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".kube").join("config")
        })
    }

    pub fn load() -> Result<Self, NksError> {
        Self::load_from(&Self::default_path())
    }

    /// A missing or empty file is an empty store.
    pub fn load_from(path: &Path) -> Result<Self, NksError> {
        let config = match std::fs::read_to_string(path) {
            Ok(text) if text.trim().is_empty() => Kubeconfig::default(),
            Ok(text) => Kubeconfig::from_yaml(&text)
                .map_err(|e| NksError::Store(format!("failed to load kubeconfig {}: {e}", path.display())))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Kubeconfig::default(),
            Err(e) => return Err(NksError::Store(format!("failed to read kubeconfig {}: {e}", path.display()))),
        };

        Ok(Self { path: path.to_path_buf(), config })
    }

    pub fn reload(&mut self) -> Result<(), NksError> {
        *self = Self::load_from(&self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current_context(&self) -> Option<&str> {
        self.config.current_context.as_deref().filter(|c| !c.is_empty())
    }

    fn sorted_contexts(&self) -> Vec<&NamedContext> {
        let mut contexts: Vec<&NamedContext> = self.config.contexts.iter().collect();
        contexts.sort_by(|a, b| a.name.cmp(&b.name));
        contexts
    }

    pub fn find_exact(&self, name: &str) -> Option<String> {
        self.config.contexts.iter().find(|ctx| ctx.name == name).map(|ctx| ctx.name.clone())
    }

    /// Context that points at `cluster`, either through its cluster reference or because
    /// its name contains the cluster name (`user@cluster` style names).
    pub fn find_by_cluster_reference(&self, cluster: &str) -> Option<String> {
        if cluster.is_empty() {
            return None;
        }
        self.sorted_contexts()
            .into_iter()
            .find(|ctx| cluster_reference(ctx) == Some(cluster) || ctx.name.contains(cluster))
            .map(|ctx| ctx.name.clone())
    }

    /// Exact context name first, then the first context whose name contains `input`.
    pub fn find(&self, input: &str) -> Result<String, NksError> {
        if input.is_empty() {
            return Err(NksError::NotFound(input.to_string()));
        }
        if let Some(name) = self.find_exact(input) {
            return Ok(name);
        }
        self.sorted_contexts()
            .into_iter()
            .find(|ctx| ctx.name.contains(input))
            .map(|ctx| ctx.name.clone())
            .ok_or_else(|| NksError::NotFound(input.to_string()))
    }

    /// Point `current-context` at `name` and rewrite the whole file.
    pub fn switch_active(&mut self, name: &str) -> Result<(), NksError> {
        if self.find_exact(name).is_none() {
            return Err(NksError::Store(format!("context '{name}' not found in kubeconfig")));
        }

        let previous = self.config.current_context.replace(name.to_string());
        if let Err(e) = self.save() {
            self.config.current_context = previous;
            return Err(e);
        }
        tracing::debug!(context = name, path = %self.path.display(), "switched current context");
        Ok(())
    }

    pub fn list_context_names(&self) -> Vec<String> {
        self.sorted_contexts().into_iter().map(|ctx| ctx.name.clone()).collect()
    }

    pub fn list_distinct_cluster_references(&self) -> Vec<String> {
        self.config
            .contexts
            .iter()
            .filter_map(cluster_reference)
            .filter(|cluster| !cluster.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Write to a sibling temp file, then rename over the original.
    fn save(&self) -> Result<(), NksError> {
        let data = serde_yaml::to_string(&self.config)
            .map_err(|e| NksError::Store(format!("failed to serialize kubeconfig: {e}")))?;
        write_atomically(&self.path, data.as_bytes())
            .map_err(|e| NksError::Store(format!("failed to write kubeconfig {}: {e}", self.path.display())))
    }
}

fn cluster_reference(ctx: &NamedContext) -> Option<&str> {
    ctx.context.as_ref().map(|c| c.cluster.as_str())
}

/// A symlinked kubeconfig is written through to its target.
fn write_atomically(path: &Path, data: &[u8]) -> io::Result<()> {
    let path = match std::fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(e) if e.kind() == io::ErrorKind::NotFound => path.to_path_buf(),
        Err(e) => return Err(e),
    };
    let path = path.as_path();

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "config".into());
    let tmp = dir.join(format!(".{file_name}.nks-ctx.tmp"));

    std::fs::write(&tmp, data)?;
    let permissions = match std::fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => owner_only(),
    };
    if let Some(permissions) = permissions {
        std::fs::set_permissions(&tmp, permissions)?;
    }

    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

#[cfg(unix)]
fn owner_only() -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn owner_only() -> Option<std::fs::Permissions> {
    None
}
