//! Primary language guess from file extensions

use strata_core::TreeItem;

const EXTENSION_LANGUAGES: [(&str, &str); 17] = [
    ("ts", "TypeScript"),
    ("tsx", "TypeScript"),
    ("js", "JavaScript"),
    ("jsx", "JavaScript"),
    ("py", "Python"),
    ("go", "Go"),
    ("rs", "Rust"),
    ("java", "Java"),
    ("rb", "Ruby"),
    ("php", "PHP"),
    ("cs", "C#"),
    ("cpp", "C++"),
    ("c", "C"),
    ("swift", "Swift"),
    ("kt", "Kotlin"),
    ("scala", "Scala"),
    ("ex", "Elixir"),
];

/// Most common language among blobs; ties go to the language seen first.
/// Returns `"Unknown"` when no extension is recognised.
pub fn detect_primary_language(tree: &[TreeItem]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for item in tree.iter().filter(|item| item.is_blob()) {
        let name = strata_core::basename(&item.path);
        let Some((_, ext)) = name.rsplit_once('.') else {
            continue;
        };
        let ext = ext.to_lowercase();
        let Some(&(_, language)) = EXTENSION_LANGUAGES.iter().find(|(known, _)| *known == ext) else {
            continue;
        };
        match counts.iter_mut().find(|(seen, _)| *seen == language) {
            Some((_, count)) => *count += 1,
            None => counts.push((language, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (language, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((language, count));
        }
    }
    best.map_or_else(|| "Unknown".to_string(), |(language, _)| language.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_languages_across_extensions() {
        let tree = vec![
            TreeItem::blob("a.py", None),
            TreeItem::blob("b.ts", None),
            TreeItem::blob("c.tsx", None),
            TreeItem::blob("d.py", None),
            TreeItem::blob("e.TS", None),
            TreeItem::tree("src.rs"),
        ];
        assert_eq!(detect_primary_language(&tree), "TypeScript");
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let tree = vec![TreeItem::blob("main.go", None), TreeItem::blob("lib.rs", None)];
        assert_eq!(detect_primary_language(&tree), "Go");
    }

    #[test]
    fn test_unknown() {
        let tree = vec![TreeItem::blob("README.md", None), TreeItem::blob("Makefile", None)];
        assert_eq!(detect_primary_language(&tree), "Unknown");
        assert_eq!(detect_primary_language(&[]), "Unknown");
    }
}
