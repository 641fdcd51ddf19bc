use sha2::{Digest, Sha256};

const MAX_STEM_LEN: usize = 80;

/// Save name for a project's rendered artifact: `project-{id}.pdf`.
///
/// Ids are server-assigned and opaque, so characters that are unsafe in a
/// file name are replaced. When that changes the id, a short hash of the
/// original is appended to keep distinct ids apart.
pub fn download_filename(project_id: &str) -> String {
    let stem = sanitize_stem(project_id);
    if stem == project_id {
        format!("project-{stem}.pdf")
    } else {
        format!("project-{stem}--{}.pdf", short_hash(project_id))
    }
}

fn sanitize_stem(input: &str) -> String {
    let mut stem = String::with_capacity(input.len());
    for c in input.chars() {
        let c = if is_forbidden(c) { '_' } else { c };
        if c == '_' && stem.ends_with('_') {
            continue;
        }
        stem.push(c);
    }
    let mut stem = stem.trim_matches(&['_', ' ', '.'][..]).to_string();
    if stem.is_empty() {
        stem.push_str("unnamed");
    }
    if stem.len() > MAX_STEM_LEN {
        let mut end = MAX_STEM_LEN;
        while !stem.is_char_boundary(end) {
            end -= 1;
        }
        stem.truncate(end);
    }
    stem
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().take(4).map(|byte| format!("{byte:02x}")).collect()
}
