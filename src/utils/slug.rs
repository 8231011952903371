/// URL-safe identifier for a title: ASCII, lowercase, words joined by `-`.
///
/// "Viaje a Fez" becomes "viaje-a-fez".
pub fn slug_for(title: &str) -> String {
    ::slug::slugify(title)
}

/// Image name used when a trip is saved without an upload: the lowercased
/// title with each whitespace run replaced by `-`. Accents are kept.
pub fn placeholder_image_name(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_for_simple_title() {
        assert_eq!(slug_for("Viaje a Fez"), "viaje-a-fez");
        assert_eq!(slug_for("Viaje a Marrakech"), "viaje-a-marrakech");
    }

    #[test]
    fn test_slug_for_accents_and_punctuation() {
        assert_eq!(slug_for("Ruta por Túnez: 7 días!"), "ruta-por-tunez-7-dias");
        assert_eq!(slug_for("  Sáhara   Express "), "sahara-express");
    }

    #[test]
    fn test_slug_is_deterministic() {
        assert_eq!(slug_for("Atlas y Desierto"), slug_for("Atlas y Desierto"));
    }

    #[test]
    fn test_placeholder_image_name() {
        assert_eq!(placeholder_image_name("Viaje a Fez"), "viaje-a-fez");
        assert_eq!(placeholder_image_name("Noches  en\tEl Cairo"), "noches-en-el-cairo");
        assert_eq!(placeholder_image_name("Túnez"), "túnez");
    }
}
