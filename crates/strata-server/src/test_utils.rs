//! In-memory repository source for tests

use std::collections::BTreeMap;
use std::sync::Mutex;

use strata_core::{RepoMeta, TreeItem};
use strata_github::{RepoId, RepoSource, SourceError};

pub struct FakeSource {
    pub meta: RepoMeta,
    pub tree: Vec<TreeItem>,
    pub files: BTreeMap<String, String>,
    /// HTTP status returned by `get_tree` instead of the listing.
    pub tree_status: Option<u16>,
    fetched: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new(tree: Vec<TreeItem>) -> Self {
        Self {
            meta: RepoMeta {
                name: "app".to_string(),
                full_name: "octo/app".to_string(),
                description: Some("Sample app".to_string()),
                language: Some("TypeScript".to_string()),
                stars: 12,
                forks: 3,
                default_branch: "main".to_string(),
            },
            tree,
            files: BTreeMap::new(),
            tree_status: None,
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Paths passed to `get_file_content`, in call order.
    pub fn fetched_paths(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetched.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl RepoSource for FakeSource {
    async fn get_meta(&self, _repo: &RepoId) -> Result<RepoMeta, SourceError> {
        Ok(self.meta.clone())
    }

    async fn get_tree(&self, repo: &RepoId, _reference: &str) -> Result<Vec<TreeItem>, SourceError> {
        if let Some(status) = self.tree_status {
            return Err(SourceError::Status {
                status,
                url: format!("fake://{repo}/tree"),
            });
        }
        Ok(self.tree.clone())
    }

    async fn get_file_content(&self, _repo: &RepoId, path: &str) -> String {
        self.fetched.lock().unwrap().push(path.to_string());
        self.files.get(path).cloned().unwrap_or_default()
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// A Next.js-style app: one API route, a helper module, a model and a
/// Prisma schema.
pub fn sample_source() -> FakeSource {
    let mut source = FakeSource::new(vec![
        TreeItem::tree("app"),
        TreeItem::tree("app/api"),
        TreeItem::tree("app/api/users"),
        TreeItem::blob("app/api/users/route.ts", Some(410)),
        TreeItem::tree("lib"),
        TreeItem::blob("lib/users.ts", Some(520)),
        TreeItem::tree("models"),
        TreeItem::blob("models/user.ts", Some(180)),
        TreeItem::tree("prisma"),
        TreeItem::blob("prisma/schema.prisma", Some(300)),
        TreeItem::blob("README.md", Some(90)),
        TreeItem::blob("package.json", Some(640)),
    ]);
    let files = [
        (
            "app/api/users/route.ts",
            "import { listUsers, createUser } from '../../../lib/users'\n\n\
             export async function GET() {\n  return Response.json(await listUsers())\n}\n\n\
             export async function POST(req: Request) {\n  return Response.json(await createUser(await req.json()))\n}\n",
        ),
        (
            "lib/users.ts",
            "import { PrismaClient } from '@prisma/client'\n\
             import { User } from '../models/user'\n\n\
             const db = new PrismaClient()\n\n\
             export async function listUsers(): Promise<User[]> {\n  return db.user.findMany()\n}\n\n\
             export async function createUser(data: User) {\n  await fetch(`https://hooks.example.com/users/${data.id}`)\n  return db.user.create({ data })\n}\n",
        ),
        ("models/user.ts", "export interface User {\n  id: number\n  email: string\n}\n"),
        (
            "prisma/schema.prisma",
            "model User {\n  id    Int    @id\n  email String\n  posts Post[]\n}\n\n\
             model Post {\n  id     Int  @id\n  author User @relation(fields: [authorId], references: [id])\n  authorId Int\n}\n",
        ),
        ("README.md", "# app\n"),
    ];
    for (path, text) in files {
        source.files.insert(path.to_string(), text.to_string());
    }
    source
}

/// State over [`sample_source`] with default cache limits and the local
/// AI provider.
pub fn test_state() -> std::sync::Arc<crate::state::AppState> {
    test_state_with(sample_source())
}

pub fn test_state_with(source: FakeSource) -> std::sync::Arc<crate::state::AppState> {
    use std::sync::Arc;

    use crate::config::CacheSettings;
    use crate::pipeline::Analyzer;
    use crate::state::{AppState, Caches};
    use strata_ai::{AiBridge, ProviderKind, create_provider};

    let caches = Caches::new(&CacheSettings::default());
    let analyzer = Analyzer::new(
        Arc::new(source),
        Arc::clone(&caches.repos),
        strata_indexer::AnalysisConfig::default(),
    );
    let ai = AiBridge::new(
        create_provider(ProviderKind::Local, None),
        Arc::clone(&caches.summaries),
    );
    Arc::new(AppState::new(analyzer, ai, caches))
}
