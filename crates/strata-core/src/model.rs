//! Core data structures for the repository graph

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a tree entry is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Blob,
    Tree,
}

/// One entry of a recursive repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeItem {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl TreeItem {
    pub fn blob(path: impl Into<String>, size: Option<u64>) -> Self {
        TreeItem {
            path: path.into(),
            kind: ItemKind::Blob,
            size,
        }
    }

    pub fn tree(path: impl Into<String>) -> Self {
        TreeItem {
            path: path.into(),
            kind: ItemKind::Tree,
            size: None,
        }
    }

    pub fn is_blob(&self) -> bool {
        self.kind == ItemKind::Blob
    }
}

/// How a node is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    File,
    Api,
}

/// Architectural role of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Entry,
    Controller,
    Service,
    Model,
    Util,
    Config,
    Test,
    Api,
    File,
    Folder,
}

impl Role {
    /// Roles that make a file an HTTP endpoint.
    pub fn is_endpoint(self) -> bool {
        matches!(self, Role::Api | Role::Controller)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Entry => "entry",
            Role::Controller => "controller",
            Role::Service => "service",
            Role::Model => "model",
            Role::Util => "util",
            Role::Config => "config",
            Role::Test => "test",
            Role::Api => "api",
            Role::File => "file",
            Role::Folder => "folder",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display language of a file, derived from its extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
    Go,
    Rust,
    Java,
    Ruby,
    Php,
    Json,
    Yaml,
    Markdown,
    Css,
    Scss,
    Html,
    Sql,
    Prisma,
    Toml,
    Xml,
    Shell,
    /// Unknown extension, stored upper-cased.
    Other(String),
}

impl Language {
    /// Detect language from a file name or path.
    ///
    /// A name without a dot is treated as its own extension, so `Dockerfile`
    /// becomes `DOCKERFILE`. Returns `None` for names ending in a dot.
    pub fn from_path(path: &str) -> Option<Self> {
        let name = path.rsplit('/').next().unwrap_or(path);
        let ext = name.rsplit('.').next().unwrap_or(name).to_lowercase();
        if ext.is_empty() {
            return None;
        }
        let language = match ext.as_str() {
            "ts" | "tsx" => Language::TypeScript,
            "js" | "jsx" => Language::JavaScript,
            "py" => Language::Python,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "java" => Language::Java,
            "rb" => Language::Ruby,
            "php" => Language::Php,
            "json" => Language::Json,
            "yaml" | "yml" => Language::Yaml,
            "md" => Language::Markdown,
            "css" => Language::Css,
            "scss" => Language::Scss,
            "html" => Language::Html,
            "sql" => Language::Sql,
            "prisma" => Language::Prisma,
            "toml" => Language::Toml,
            "xml" => Language::Xml,
            "sh" => Language::Shell,
            other => Language::Other(other.to_uppercase()),
        };
        Some(language)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Language::TypeScript => "TypeScript",
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
            Language::Go => "Go",
            Language::Rust => "Rust",
            Language::Java => "Java",
            Language::Ruby => "Ruby",
            Language::Php => "PHP",
            Language::Json => "JSON",
            Language::Yaml => "YAML",
            Language::Markdown => "Markdown",
            Language::Css => "CSS",
            Language::Scss => "SCSS",
            Language::Html => "HTML",
            Language::Sql => "SQL",
            Language::Prisma => "Prisma",
            Language::Toml => "TOML",
            Language::Xml => "XML",
            Language::Shell => "Shell",
            Language::Other(name) => name,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.as_str().to_string()
    }
}

impl From<String> for Language {
    fn from(name: String) -> Self {
        const KNOWN: [Language; 19] = [
            Language::TypeScript,
            Language::JavaScript,
            Language::Python,
            Language::Go,
            Language::Rust,
            Language::Java,
            Language::Ruby,
            Language::Php,
            Language::Json,
            Language::Yaml,
            Language::Markdown,
            Language::Css,
            Language::Scss,
            Language::Html,
            Language::Sql,
            Language::Prisma,
            Language::Toml,
            Language::Xml,
            Language::Shell,
        ];
        KNOWN
            .into_iter()
            .find(|known| known.as_str() == name)
            .unwrap_or(Language::Other(name))
    }
}

/// Top-left corner of a laid-out node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Symbols a file was seen calling on one of its resolved imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallTrace {
    /// Node id of the imported file.
    pub target: String,
    pub functions: Vec<String>,
}

/// A folder or file in the repository graph, keyed by its path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imports: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exports: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_apis: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_methods: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_calls: Option<Vec<CallTrace>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl RepoNode {
    pub fn folder(path: &str) -> Self {
        RepoNode::bare(path, NodeKind::Folder, Role::Folder)
    }

    pub fn file(path: &str, role: Role, size: Option<u64>) -> Self {
        let kind = if role.is_endpoint() { NodeKind::Api } else { NodeKind::File };
        RepoNode {
            language: Language::from_path(path),
            size,
            ..RepoNode::bare(path, kind, role)
        }
    }

    fn bare(path: &str, kind: NodeKind, role: Role) -> Self {
        RepoNode {
            id: path.to_string(),
            label: basename(path).to_string(),
            kind,
            role,
            language: None,
            size: None,
            imports: None,
            exports: None,
            external_apis: None,
            api_methods: None,
            function_calls: None,
            position: None,
        }
    }

    /// Path of the containing folder, `None` at the repository root.
    pub fn parent(&self) -> Option<&str> {
        parent_path(&self.id)
    }
}

/// What relationship an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeCategory {
    /// Folder containment.
    Tree,
    /// Static import of a sibling file.
    Import,
    /// Import with traced function usage.
    Call,
}

impl EdgeCategory {
    pub fn is_dependency(self) -> bool {
        matches!(self, EdgeCategory::Import | EdgeCategory::Call)
    }
}

/// A directed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoEdge {
    /// Deterministic id built from source, target and category.
    pub id: String,
    pub source: String,
    pub target: String,
    pub category: EdgeCategory,
    pub animated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RepoEdge {
    /// Containment edge from a folder to one of its children.
    pub fn tree(parent: &str, child: &str) -> Self {
        RepoEdge {
            id: format!("{parent}->{child}"),
            source: parent.to_string(),
            target: child.to_string(),
            category: EdgeCategory::Tree,
            animated: false,
            label: None,
        }
    }

    /// Dependency edge. Becomes a `call` edge labelled with up to two symbol
    /// names when `functions` is non-empty.
    pub fn dependency(source: &str, target: &str, functions: &[String]) -> Self {
        let (category, label) = if functions.is_empty() {
            (EdgeCategory::Import, "imports".to_string())
        } else {
            let shown: Vec<&str> = functions.iter().take(2).map(String::as_str).collect();
            (EdgeCategory::Call, format!("calls {}", shown.join(", ")))
        };
        RepoEdge {
            id: format!("dep:{source}->{target}"),
            source: source.to_string(),
            target: target.to_string(),
            category,
            animated: true,
            label: Some(label),
        }
    }
}

/// One column of a parsed schema entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub is_primary: bool,
    pub is_relation: bool,
}

/// A table or model definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaEntity {
    pub name: String,
    pub fields: Vec<SchemaField>,
}

/// Repository metadata reported by the source host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMeta {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub default_branch: String,
}

/// Last path segment.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Everything before the last `/`, or `None` for a root-level path.
pub fn parent_path(path: &str) -> Option<&str> {
    path.rfind('/').map(|idx| &path[..idx])
}
