//! Localized display strings for imported entities
//!
//! The destination shows migrated albums next to originals, so titles
//! carry a locale-aware "copy of" marker. The job's user locale comes from
//! the job metadata store and falls back to English when missing.

/// Template for a copied-album title in the given locale
///
/// Accepts full language tags ("it-IT", "pt_BR"); only the primary
/// subtag is considered.
pub fn copy_of_template(locale: &str) -> &'static str {
    let primary = locale
        .split(['-', '_'])
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    match primary.as_str() {
        "de" => "Kopie von {title}",
        "es" => "Copia de {title}",
        "fr" => "Copie de {title}",
        "it" => "Copia di {title}",
        "pt" => "Cópia de {title}",
        _ => "Copy of {title}",
    }
}

/// Apply a copy-of template to an album title
pub fn apply_template(template: &str, title: &str) -> String {
    template.replacen("{title}", title, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_locales() {
        assert_eq!(copy_of_template("it"), "Copia di {title}");
        assert_eq!(copy_of_template("de"), "Kopie von {title}");
        assert_eq!(copy_of_template("en"), "Copy of {title}");
    }

    #[test]
    fn test_language_tag_normalization() {
        assert_eq!(copy_of_template("it-IT"), "Copia di {title}");
        assert_eq!(copy_of_template("pt_BR"), "Cópia de {title}");
        assert_eq!(copy_of_template("FR"), "Copie de {title}");
    }

    #[test]
    fn test_unknown_locale_falls_back_to_english() {
        assert_eq!(copy_of_template("zz"), "Copy of {title}");
        assert_eq!(copy_of_template(""), "Copy of {title}");
    }

    #[test]
    fn test_apply_template() {
        let title = apply_template(copy_of_template("it"), "Vacation");
        assert_eq!(title, "Copia di Vacation");
    }
}
