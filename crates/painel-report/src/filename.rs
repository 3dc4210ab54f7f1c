use chrono::NaiveDateTime;

/// File name of an exported report.
///
/// `relatorio_<slug>.pdf`, or `relatorio_<slug>_<YYYYmmdd_HHMM>.pdf` when a
/// generation time is given.
pub fn report_filename(subject: &str, generated_at: Option<NaiveDateTime>) -> String {
    let slug = slugify(subject);
    let slug = if slug.is_empty() { "painel".to_string() } else { slug };
    match generated_at {
        Some(at) => format!("relatorio_{slug}_{}.pdf", at.format("%Y%m%d_%H%M")),
        None => format!("relatorio_{slug}.pdf"),
    }
}

/// Lowercase ASCII slug: accents folded, other characters become `_`,
/// runs of `_` collapsed and trimmed.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.chars().flat_map(char::to_lowercase) {
        let ch = fold_accent(ch);
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}

fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}
