//! Document loaders.
//!
//! A loader produces a [`LoadedDocument`]: either a compiled node tree
//! (rendered with the full component library) or raw markdown (standard
//! elements only).

use std::future::Future;
use std::path::{Path, PathBuf};

use folio_renderer::{DispatchMode, Node, parse_markdown};
use serde::Deserialize;

use crate::{DocumentMetadata, LoadError};

/// Where a document body came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentSource {
    /// Node tree produced by an external compiler.
    Compiled,
    /// Markdown text parsed at load time.
    Raw,
}

impl DocumentSource {
    /// Dispatch mode for documents of this source.
    #[must_use]
    pub fn dispatch_mode(self) -> DispatchMode {
        match self {
            Self::Compiled => DispatchMode::Compiled,
            Self::Raw => DispatchMode::Restricted,
        }
    }
}

/// A loaded document body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedDocument {
    pub source: DocumentSource,
    pub nodes: Vec<Node>,
    pub metadata: DocumentMetadata,
}

impl LoadedDocument {
    #[must_use]
    pub fn compiled(nodes: Vec<Node>) -> Self {
        Self {
            source: DocumentSource::Compiled,
            nodes,
            metadata: DocumentMetadata::default(),
        }
    }

    /// Parse markdown, taking metadata from its front matter.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Metadata`] if the front matter is malformed.
    pub fn from_markdown(text: &str) -> Result<Self, LoadError> {
        let document = parse_markdown(text);
        let metadata = match &document.front_matter {
            Some(yaml) => DocumentMetadata::from_yaml(yaml)?,
            None => DocumentMetadata::default(),
        };
        Ok(Self {
            source: DocumentSource::Raw,
            nodes: document.nodes,
            metadata,
        })
    }

    /// Parse a compiled document: a JSON node array, or an object with
    /// `nodes` and optional `metadata`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidDocument`] for any other JSON.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum CompiledFile {
            Nodes(Vec<Node>),
            Document {
                nodes: Vec<Node>,
                #[serde(default)]
                metadata: DocumentMetadata,
            },
        }

        Ok(match serde_json::from_str(json)? {
            CompiledFile::Nodes(nodes) => Self::compiled(nodes),
            CompiledFile::Document { nodes, metadata } => Self::compiled(nodes).with_metadata(metadata),
        })
    }

    /// Replace the metadata. Host-supplied metadata wins over front matter.
    #[must_use]
    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn dispatch_mode(&self) -> DispatchMode {
        self.source.dispatch_mode()
    }
}

/// Asynchronous source of a document body.
pub trait DocumentLoader: Send + Sync {
    /// Stable identity of what is loaded. A shell reloads only when this
    /// changes.
    fn identity(&self) -> &str;

    fn load(&self) -> impl Future<Output = Result<LoadedDocument, LoadError>> + Send;
}

/// Loads a document from disk.
///
/// `.json` files are compiled documents; anything else is markdown.
#[derive(Debug)]
pub struct FileLoader {
    path: PathBuf,
    identity: String,
}

impl FileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let identity = path.to_string_lossy().into_owned();
        Self { path, identity }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_compiled(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }
}

impl DocumentLoader for FileLoader {
    fn identity(&self) -> &str {
        &self.identity
    }

    async fn load(&self) -> Result<LoadedDocument, LoadError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| LoadError::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "Loaded document");
        if self.is_compiled() {
            LoadedDocument::from_json(&text)
        } else {
            LoadedDocument::from_markdown(&text)
        }
    }
}

/// Loader over an in-memory document or a fixed failure.
#[derive(Debug)]
pub struct StaticLoader {
    identity: String,
    result: Result<LoadedDocument, String>,
}

impl StaticLoader {
    pub fn new(identity: impl Into<String>, document: LoadedDocument) -> Self {
        Self {
            identity: identity.into(),
            result: Ok(document),
        }
    }

    /// Raw markdown text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Metadata`] if the front matter is malformed.
    pub fn markdown(identity: impl Into<String>, text: &str) -> Result<Self, LoadError> {
        Ok(Self::new(identity, LoadedDocument::from_markdown(text)?))
    }

    /// A loader that always fails with `message`.
    pub fn failing(identity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            result: Err(message.into()),
        }
    }
}

impl DocumentLoader for StaticLoader {
    fn identity(&self) -> &str {
        &self.identity
    }

    async fn load(&self) -> Result<LoadedDocument, LoadError> {
        self.result.clone().map_err(LoadError::Failed)
    }
}

#[cfg(test)]
mod tests {
    use folio_renderer::Element;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_markdown_front_matter() {
        let document =
            LoadedDocument::from_markdown("---\ntitle: Setup\n---\n\n# Install\n").unwrap();
        assert_eq!(document.source, DocumentSource::Raw);
        assert_eq!(document.dispatch_mode(), DispatchMode::Restricted);
        assert_eq!(document.metadata.title.as_deref(), Some("Setup"));
        assert!(!document.nodes.is_empty());
    }

    #[test]
    fn test_json_node_array() {
        let document =
            LoadedDocument::from_json(r#"[{"name": "p", "children": ["Hello"]}]"#).unwrap();
        assert_eq!(document.dispatch_mode(), DispatchMode::Compiled);
        assert_eq!(
            document.nodes,
            vec![Node::Element(Element::new("p").with_text("Hello"))]
        );
        assert!(document.metadata.is_empty());
    }

    #[test]
    fn test_json_with_metadata() {
        let document = LoadedDocument::from_json(
            r#"{"metadata": {"title": "API", "updatedAt": "2024-05-01"}, "nodes": ["text"]}"#,
        )
        .unwrap();
        assert_eq!(document.metadata.title.as_deref(), Some("API"));
        assert_eq!(document.metadata.updated_at.as_deref(), Some("2024-05-01"));
        assert_eq!(document.nodes, vec![Node::text("text")]);
    }

    #[test]
    fn test_json_invalid() {
        let err = LoadedDocument::from_json(r#"{"body": 3}"#).unwrap_err();
        assert!(matches!(err, LoadError::InvalidDocument(_)));
    }

    #[tokio::test]
    async fn test_file_loader_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide.md");
        std::fs::write(&path, "# Guide\n\nBody text.\n").unwrap();

        let loader = FileLoader::new(&path);
        assert_eq!(loader.identity(), path.to_string_lossy());
        let document = loader.load().await.unwrap();
        assert_eq!(document.source, DocumentSource::Raw);
    }

    #[tokio::test]
    async fn test_file_loader_compiled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide.JSON");
        std::fs::write(&path, r#"[{"name": "Callout", "children": ["Hi"]}]"#).unwrap();

        let document = FileLoader::new(&path).load().await.unwrap();
        assert_eq!(document.source, DocumentSource::Compiled);
    }

    #[tokio::test]
    async fn test_file_loader_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileLoader::new(dir.path().join("missing.md"))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
        assert!(err.to_string().contains("missing.md"));
    }

    #[tokio::test]
    async fn test_static_loader_failing() {
        let err = StaticLoader::failing("remote", "network unreachable")
            .load()
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "network unreachable");
    }
}
