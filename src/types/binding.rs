// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{CorrelatorError, Result};
use crate::kubernetes::Referable;
use kube::core::{GroupVersionKind, GroupVersionResource};
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(
    group = "binding.operators.coreos.com",
    version = "v1alpha1",
    kind = "ServiceBinding",
    plural = "servicebindings"
)]
#[kube(namespaced)]
#[kube(status = "ServiceBindingStatus")]
#[serde(rename_all = "camelCase")]
pub struct ServiceBindingSpec {
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub naming_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_as_files: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detect_binding_resources: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_env_var: Option<Vec<EnvVar>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBindingStatus {
    /// Name of the secret holding the projected binding data
    #[serde(default)]
    pub secret: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applications: Option<Vec<BoundApplication>>,
}

impl ServiceBinding {
    /// Name of the secret recorded in status, empty when none has been created yet
    pub fn secret_name(&self) -> &str {
        self.status.as_ref().map(|s| s.secret.as_str()).unwrap_or("")
    }
}

/// Type and name of a referenced object. Exactly one of `kind` and `resource`
/// is usually set; the other is resolved through cluster type metadata.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ref {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl Referable for Ref {
    fn group_version_kind(&self) -> Result<GroupVersionKind> {
        if self.kind.is_empty() {
            return Err(CorrelatorError::MalformedReference(format!(
                "kind undefined for {}/{} {:?}",
                self.group, self.version, self.name
            )));
        }
        Ok(GroupVersionKind::gvk(&self.group, &self.version, &self.kind))
    }

    fn group_version_resource(&self) -> Result<GroupVersionResource> {
        if self.resource.is_empty() {
            return Err(CorrelatorError::MalformedReference(format!(
                "resource undefined for {}/{} {:?}",
                self.group, self.version, self.name
            )));
        }
        Ok(GroupVersionResource::gvr(
            &self.group,
            &self.version,
            &self.resource,
        ))
    }
}

/// A backing service declared by a binding
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(flatten)]
    pub reference: Ref,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Referable for Service {
    fn group_version_kind(&self) -> Result<GroupVersionKind> {
        self.reference.group_version_kind()
    }

    fn group_version_resource(&self) -> Result<GroupVersionResource> {
        self.reference.group_version_resource()
    }
}

/// The workload a binding projects service data into
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(flatten)]
    pub reference: Ref,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_selector: Option<LabelSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding_path: Option<BindingPath>,
}

impl Application {
    /// Explicit object name, if the reference pins one
    pub fn name(&self) -> Option<&str> {
        Some(self.reference.name.as_str()).filter(|n| !n.is_empty())
    }
}

impl Referable for Application {
    fn group_version_kind(&self) -> Result<GroupVersionKind> {
        self.reference.group_version_kind()
    }

    fn group_version_resource(&self) -> Result<GroupVersionResource> {
        self.reference.group_version_resource()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_labels: Option<BTreeMap<String, String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BindingPath {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_path: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoundApplication {
    #[serde(flatten)]
    pub reference: Ref,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::ResourceExt;

    const BINDING_YAML: &str = r#"
apiVersion: binding.operators.coreos.com/v1alpha1
kind: ServiceBinding
metadata:
  name: db-binding
  namespace: ns1
spec:
  services:
    - group: postgresql.example.dev
      version: v1alpha1
      kind: Database
      name: db-demo
      id: db
  application:
    group: apps
    version: v1
    resource: deployments
    name: app1
  bindAsFiles: false
status:
  secret: db-binding-secret
"#;

    fn decode(yaml: &str) -> ServiceBinding {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_decode_binding_manifest() {
        let binding = decode(BINDING_YAML);

        assert_eq!(binding.name_any(), "db-binding");
        assert_eq!(binding.namespace().as_deref(), Some("ns1"));
        assert_eq!(binding.spec.services.len(), 1);
        assert_eq!(binding.spec.services[0].reference.kind, "Database");
        assert_eq!(binding.spec.services[0].id.as_deref(), Some("db"));
        assert_eq!(binding.spec.bind_as_files, Some(false));
        assert_eq!(binding.secret_name(), "db-binding-secret");
    }

    #[test]
    fn test_secret_name_without_status() {
        let mut binding = decode(BINDING_YAML);
        binding.status = None;
        assert_eq!(binding.secret_name(), "");
    }

    #[test]
    fn test_ref_kind_form_carried() {
        let binding = decode(BINDING_YAML);
        let service = &binding.spec.services[0];

        let gvk = service.group_version_kind().unwrap();
        assert_eq!(
            gvk,
            GroupVersionKind::gvk("postgresql.example.dev", "v1alpha1", "Database")
        );
        assert!(matches!(
            service.group_version_resource(),
            Err(CorrelatorError::MalformedReference(_))
        ));
    }

    #[test]
    fn test_ref_resource_form_carried() {
        let binding = decode(BINDING_YAML);
        let app = binding.spec.application.unwrap();

        assert_eq!(
            app.group_version_resource().unwrap(),
            GroupVersionResource::gvr("apps", "v1", "deployments")
        );
        assert!(app.group_version_kind().is_err());
        assert_eq!(app.name(), Some("app1"));
    }

    #[test]
    fn test_application_without_name() {
        let app = Application {
            reference: Ref {
                group: "apps".to_string(),
                version: "v1".to_string(),
                kind: "Deployment".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(app.name(), None);
    }

    #[test]
    fn test_decode_rejects_malformed_services() {
        let raw = serde_json::json!({
            "apiVersion": "binding.operators.coreos.com/v1alpha1",
            "kind": "ServiceBinding",
            "metadata": { "name": "broken", "namespace": "ns1" },
            "spec": { "services": "not-a-list" }
        });
        assert!(serde_json::from_value::<ServiceBinding>(raw).is_err());
    }
}
