//! CustomResourceDefinition model
//!
//! A structural subset of `apiextensions.k8s.io/v1` covering the fields the
//! compatibility checks read: identity, scope, conversion strategy, versions
//! with their validation schemas, and the stored versions recorded in status.

use serde::{Deserialize, Serialize};

use super::props::JsonSchemaProps;

/// A CustomResourceDefinition as parsed from a manifest or API object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomResourceDefinition {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_version: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,

    pub metadata: ObjectMeta,
    pub spec: CustomResourceDefinitionSpec,
    pub status: CustomResourceDefinitionStatus,
}

impl CustomResourceDefinition {
    /// Full CRD name (e.g. `certificates.cert-manager.io`).
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Look up a version by name.
    pub fn version(&self, name: &str) -> Option<&CustomResourceDefinitionVersion> {
        self.spec.versions.iter().find(|v| v.name == name)
    }

    /// All versions currently served by the API server.
    pub fn served_versions(&self) -> impl Iterator<Item = &CustomResourceDefinitionVersion> {
        self.spec.versions.iter().filter(|v| v.served)
    }

    /// Whether the CRD declares a conversion webhook.
    pub fn has_conversion_webhook(&self) -> bool {
        self.spec
            .conversion
            .as_ref()
            .is_some_and(|c| c.strategy == ConversionStrategy::Webhook)
    }
}

/// Object metadata; only the name is relevant here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomResourceDefinitionSpec {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub group: String,

    pub scope: Scope,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion: Option<CustomResourceConversion>,

    pub versions: Vec<CustomResourceDefinitionVersion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomResourceDefinitionStatus {
    /// Version names that have ever been persisted to etcd.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stored_versions: Vec<String>,
}

/// Whether custom resources live in namespaces or at cluster scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Scope {
    #[default]
    Namespaced,
    Cluster,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Namespaced => write!(f, "Namespaced"),
            Self::Cluster => write!(f, "Cluster"),
        }
    }
}

/// Conversion settings between versions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomResourceConversion {
    pub strategy: ConversionStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConversionStrategy {
    #[default]
    None,
    Webhook,
}

/// A single named version of a CRD.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomResourceDefinitionVersion {
    pub name: String,

    /// Whether this version is reachable at the API.
    pub served: bool,

    /// Whether this is the persisted form.
    pub storage: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub deprecated: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation_warning: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<VersionSchema>,
}

impl CustomResourceDefinitionVersion {
    /// The root validation schema, if the version declares one.
    pub fn root_schema(&self) -> Option<&JsonSchemaProps> {
        self.schema.as_ref().and_then(|s| s.open_api_v3_schema.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionSchema {
    #[serde(rename = "openAPIV3Schema", skip_serializing_if = "Option::is_none")]
    pub open_api_v3_schema: Option<JsonSchemaProps>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crd(yaml: &str) -> CustomResourceDefinition {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_parse_manifest() {
        let parsed = crd(
            r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.com
spec:
  group: example.com
  scope: Cluster
  conversion:
    strategy: Webhook
  versions:
    - name: v1alpha1
      served: true
      storage: false
      schema:
        openAPIV3Schema:
          type: object
    - name: v1
      served: true
      storage: true
status:
  storedVersions: [v1alpha1, v1]
"#,
        );

        assert_eq!(parsed.name(), "widgets.example.com");
        assert_eq!(parsed.spec.scope, Scope::Cluster);
        assert!(parsed.has_conversion_webhook());
        assert_eq!(parsed.served_versions().count(), 2);
        assert!(parsed.version("v1alpha1").unwrap().root_schema().is_some());
        assert!(parsed.version("v1").unwrap().root_schema().is_none());
        assert_eq!(parsed.status.stored_versions.len(), 2);
    }

    #[test]
    fn test_scope_defaults_to_namespaced() {
        let parsed = crd(
            r#"
metadata:
  name: things.example.com
spec:
  group: example.com
  versions: []
"#,
        );

        assert_eq!(parsed.spec.scope, Scope::Namespaced);
        assert!(!parsed.has_conversion_webhook());
    }
}
