//! Fixtures for analysis tests

use std::collections::BTreeMap;

use strata_core::TreeItem;

/// A small Next.js-style app with an API route, a service, a model, and a
/// Prisma schema.
pub fn sample_tree() -> Vec<TreeItem> {
    vec![
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
    ]
}

/// Texts for every file of [`sample_tree`] that the analysis reads.
pub fn sample_contents() -> BTreeMap<String, String> {
    let files = [
        (
            "app/api/users/route.ts",
            r#"import { listUsers, createUser } from '../../../lib/users'

export async function GET() {
  return Response.json(await listUsers())
}

export async function POST(req: Request) {
  return Response.json(await createUser(await req.json()))
}
"#,
        ),
        (
            "lib/users.ts",
            r#"import { PrismaClient } from '@prisma/client'
import { User } from '../models/user'

const db = new PrismaClient()

export async function listUsers(): Promise<User[]> {
  return db.user.findMany()
}

export async function createUser(data: User) {
  await fetch(`https://hooks.example.com/users/${data.id}`)
  return db.user.create({ data })
}
"#,
        ),
        (
            "models/user.ts",
            "export interface User {\n  id: number\n  email: string\n}\n",
        ),
        (
            "prisma/schema.prisma",
            r#"model User {
  id    Int    @id
  email String
  posts Post[]
}

model Post {
  id     Int  @id
  author User @relation(fields: [authorId], references: [id])
  authorId Int
}
"#,
        ),
    ];
    files
        .into_iter()
        .map(|(path, text)| (path.to_string(), text.to_string()))
        .collect()
}
