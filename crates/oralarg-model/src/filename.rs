use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

fn non_word_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\-]+").expect("valid regex"))
}

fn underscore_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"__+").expect("valid regex"))
}

/// Turn a case name into a filesystem-safe file stem.
///
/// Runs of anything other than word characters and `-` become a single `_`,
/// and leading/trailing underscores are dropped. Word characters are
/// Unicode-aware, so accented party names survive intact.
pub fn sanitize_filename(name: &str) -> String {
    let replaced = non_word_run().replace_all(name.trim(), "_");
    let collapsed = underscore_run().replace_all(&replaced, "_");
    collapsed.trim_matches('_').to_string()
}

/// Hands out unique file stems for the cases of a single run.
///
/// Two listing rows can sanitize to the same stem (re-argued cases, or
/// names differing only in punctuation or case); later ones get `_2`,
/// `_3`, ... Stems keep the casing of the listing.
#[derive(Debug, Default)]
pub struct FileNamer {
    seen: HashMap<String, usize>,
}

impl FileNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stem for the case at `index` (1-based listing position).
    pub fn stem_for(&mut self, name: &str, index: usize) -> String {
        let mut stem = sanitize_filename(name);
        if stem.is_empty() {
            stem = format!("case_{index}");
        }

        // Keys are lowercased: macOS and Windows download folders are
        // case-insensitive, so `Smith` and `SMITH` would share a file.
        let count = self.seen.entry(stem.to_lowercase()).or_insert(0);
        *count += 1;
        if *count == 1 {
            return stem;
        }

        // A suffixed stem can itself collide with a later literal name.
        let mut n = *count;
        loop {
            let candidate = format!("{stem}_{n}");
            let key = candidate.to_lowercase();
            if !self.seen.contains_key(&key) {
                self.seen.insert(key, 1);
                return candidate;
            }
            n += 1;
        }
    }
}
