//! Filtering and ordering of the loaded collection.

use std::cmp::Ordering;

use crate::Project;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    NameAsc,
    NameDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::DateDesc,
        SortKey::DateAsc,
        SortKey::NameAsc,
        SortKey::NameDesc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::DateDesc => "date-desc",
            SortKey::DateAsc => "date-asc",
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(raw))
    }

    /// Unknown keys order newest first.
    pub fn parse_or_default(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_default()
    }
}

pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// `needle` must already be normalized.
pub fn matches_query(project: &Project, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let in_name = project
        .filename
        .as_deref()
        .is_some_and(|name| name.to_lowercase().contains(needle));
    in_name || project.id.to_lowercase().contains(needle)
}

/// Indices into `source` of the matching projects, in display order.
///
/// Filters first, then applies a stable sort so ties keep source order.
pub fn compute_projection(source: &[Project], query: &str, sort_key: SortKey) -> Vec<usize> {
    let needle = normalize_query(query);
    let mut indices: Vec<usize> = source
        .iter()
        .enumerate()
        .filter(|(_, project)| matches_query(project, &needle))
        .map(|(index, _)| index)
        .collect();
    indices.sort_by(|&a, &b| compare_projects(&source[a], &source[b], sort_key));
    indices
}

pub fn compare_projects(a: &Project, b: &Project, sort_key: SortKey) -> Ordering {
    match sort_key {
        SortKey::DateDesc => b.created_at.cmp(&a.created_at),
        SortKey::DateAsc => a.created_at.cmp(&b.created_at),
        SortKey::NameAsc => compare_names(a.sort_name(), b.sort_name()),
        SortKey::NameDesc => compare_names(b.sort_name(), a.sort_name()),
    }
}

/// Case-insensitive name comparison in the manner of a default locale collation.
///
/// Case and common Latin accents are ignored at the first level, and
/// separators sort before digits, digits before letters. Names equal at
/// that level are ordered by their lowercase form.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    primary_keys(a)
        .cmp(primary_keys(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
}

fn primary_keys(name: &str) -> impl Iterator<Item = (u8, char)> + '_ {
    name.chars().flat_map(char::to_lowercase).map(|c| {
        let folded = fold_accent(c);
        (char_class(folded), folded)
    })
}

fn char_class(c: char) -> u8 {
    if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    }
}

fn fold_accent(c: char) -> char {
    match c {
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}
