use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::anyhow;

use crate::transport::{HttpResponse, Transport};

pub type RecordedRequest = (String, Vec<(&'static str, String)>);

#[derive(Default)]
pub struct FakeTransport {
    responses: HashMap<String, Result<HttpResponse, String>>,
    pub requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    pub fn ok(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.into(), Ok(HttpResponse { status: 200, body: body.into() }));
        self
    }

    pub fn status(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses.insert(url.into(), Ok(HttpResponse { status, body: body.into() }));
        self
    }

    pub fn refuse(mut self, url: &str, reason: &str) -> Self {
        self.responses.insert(url.into(), Err(reason.into()));
        self
    }
}

impl Transport for FakeTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
        _timeout: Duration,
    ) -> anyhow::Result<HttpResponse> {
        self.requests.lock().unwrap().push((url.to_string(), headers.to_vec()));
        match self.responses.get(url) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(reason)) => Err(anyhow!("{reason}")),
            None => Err(anyhow!("no route to {url}")),
        }
    }
}

/// Kubeconfig YAML with one cluster, one user and one context per `(context, cluster)` pair.
pub fn kubeconfig_yaml(contexts: &[(&str, &str)], current: Option<&str>) -> String {
    let section = |key: &str, entries: Vec<String>| {
        if entries.is_empty() {
            format!("{key}: []\n")
        } else {
            format!("{key}:\n{}", entries.concat())
        }
    };

    let clusters: Vec<String> = contexts
        .iter()
        .map(|(_, cluster)| format!("- name: {cluster}\n  cluster:\n    server: https://{cluster}.example.com\n"))
        .collect();
    let users: Vec<String> = contexts
        .iter()
        .map(|(context, _)| format!("- name: user-{context}\n  user:\n    token: token-{context}\n"))
        .collect();
    let named: Vec<String> = contexts
        .iter()
        .map(|(context, cluster)| format!("- name: {context}\n  context:\n    cluster: {cluster}\n    user: user-{context}\n"))
        .collect();

    let mut yaml = String::from("apiVersion: v1\nkind: Config\n");
    yaml.push_str(&section("clusters", clusters));
    yaml.push_str(&section("users", users));
    yaml.push_str(&section("contexts", named));
    if let Some(current) = current {
        yaml.push_str(&format!("current-context: {current}\n"));
    }
    yaml
}

pub fn write_kubeconfig(path: &Path, contexts: &[(&str, &str)], current: Option<&str>) {
    std::fs::write(path, kubeconfig_yaml(contexts, current)).unwrap();
}

/// Append a context (with its cluster and user) the way an out-of-process writer would.
pub fn append_context(path: &Path, context: &str, cluster: &str) {
    use serde_yaml::Value;

    let mut doc: Value = match std::fs::read_to_string(path) {
        Ok(text) if !text.trim().is_empty() => serde_yaml::from_str(&text).unwrap(),
        _ => serde_yaml::from_str("apiVersion: v1\nkind: Config\n").unwrap(),
    };
    let root = doc.as_mapping_mut().unwrap();

    let mut push = |key: &str, entry: String| {
        if !root.get(key).is_some_and(Value::is_sequence) {
            root.insert(Value::from(key), Value::Sequence(Vec::new()));
        }
        let entry: Value = serde_yaml::from_str(&entry).unwrap();
        root.get_mut(key).and_then(Value::as_sequence_mut).unwrap().push(entry);
    };
    push("clusters", format!("name: {cluster}\ncluster:\n  server: https://{cluster}.example.com\n"));
    push("users", format!("name: user-{context}\nuser:\n  token: token-{context}\n"));
    push("contexts", format!("name: {context}\ncontext:\n  cluster: {cluster}\n  user: user-{context}\n"));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, serde_yaml::to_string(&doc).unwrap()).unwrap();
}
