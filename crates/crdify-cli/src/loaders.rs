//! CRD loaders for URI-style references
//!
//! A reference names where a CustomResourceDefinition manifest comes from:
//!
//! - `file://<path>` reads a YAML or JSON manifest from disk
//! - `git://<ref>?path=<path>` reads the manifest as it existed at a git
//!   revision, via `git show <ref>:<path>` in the current repository
//!
//! `kube://<name>` (reading from a live cluster) is recognized but not
//! supported by this build.

use std::path::PathBuf;
use std::process::Command;

use crdify_core::CustomResourceDefinition;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoadError>;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reference {reference:?} has no scheme; expected file://<path> or git://<ref>?path=<path>")]
    MissingScheme { reference: String },

    #[error("unsupported scheme {scheme:?}; supported schemes are file and git")]
    UnsupportedScheme { scheme: String },

    #[error("kube:// references need cluster access, which this build does not include; export the CRD to a file instead")]
    KubeUnsupported,

    #[error("git reference {reference:?} is missing its path query parameter (git://<ref>?path=<path>)")]
    MissingGitPath { reference: String },

    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("running `git show {spec}`: {message}")]
    Git { spec: String, message: String },

    #[error("parsing CustomResourceDefinition from {source_name}: {source}")]
    Parse {
        source_name: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{source_name} is not a CustomResourceDefinition (kind is {kind:?})")]
    NotACrd { source_name: String, kind: String },
}

/// Load a CustomResourceDefinition from a URI-style reference.
pub fn load(reference: &str) -> Result<CustomResourceDefinition> {
    let Some((scheme, rest)) = reference.split_once("://") else {
        return Err(LoadError::MissingScheme {
            reference: reference.to_string(),
        });
    };

    match scheme {
        "file" => load_file(rest),
        "git" => load_git(rest, reference),
        "kube" => Err(LoadError::KubeUnsupported),
        other => Err(LoadError::UnsupportedScheme {
            scheme: other.to_string(),
        }),
    }
}

fn load_file(path: &str) -> Result<CustomResourceDefinition> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: PathBuf::from(path),
        source,
    })?;

    parse_crd(path, &text)
}

fn load_git(rest: &str, reference: &str) -> Result<CustomResourceDefinition> {
    let (git_ref, path) = split_git_reference(rest).ok_or_else(|| LoadError::MissingGitPath {
        reference: reference.to_string(),
    })?;

    let spec = format!("{git_ref}:{path}");
    let output = Command::new("git")
        .args(["show", &spec])
        .output()
        .map_err(|source| LoadError::Git {
            spec: spec.clone(),
            message: source.to_string(),
        })?;

    if !output.status.success() {
        return Err(LoadError::Git {
            spec,
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let text = String::from_utf8_lossy(&output.stdout);
    parse_crd(&spec, &text)
}

/// Split `<ref>?path=<path>` into its revision and path parts.
fn split_git_reference(rest: &str) -> Option<(&str, &str)> {
    let (git_ref, query) = rest.split_once('?')?;

    let path = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("path="))?;
    if git_ref.is_empty() || path.is_empty() {
        return None;
    }

    Some((git_ref, path))
}

fn parse_crd(source_name: &str, text: &str) -> Result<CustomResourceDefinition> {
    let crd: CustomResourceDefinition =
        serde_yaml::from_str(text).map_err(|source| LoadError::Parse {
            source_name: source_name.to_string(),
            source,
        })?;

    if !crd.kind.is_empty() && crd.kind != "CustomResourceDefinition" {
        return Err(LoadError::NotACrd {
            source_name: source_name.to_string(),
            kind: crd.kind,
        });
    }

    Ok(crd)
}
