//! Image URL resolution for storage paths returned by the backend

/// Turns a storage path into an absolute URL under `base_url`
///
/// Absolute (`http://`, `https://`, `//host`) and `data:` URLs are returned
/// unchanged, which makes the transform idempotent.
pub fn resolve_image_url(base_url: &str, path: &str) -> String {
    let path = path.trim();

    if path.is_empty() || is_absolute(path) {
        return path.to_string();
    }

    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn is_absolute(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();

    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("data:")
        || lower.starts_with("blob:")
        || lower.starts_with("//")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.thepub.example/api";

    #[test]
    fn test_relative_path_is_prefixed() {
        assert_eq!(
            resolve_image_url(BASE, "uploads/menu/pie.jpg"),
            "https://api.thepub.example/api/uploads/menu/pie.jpg"
        );
        assert_eq!(
            resolve_image_url(&format!("{}/", BASE), "/uploads/pie.jpg"),
            "https://api.thepub.example/api/uploads/pie.jpg"
        );
    }

    #[test]
    fn test_absolute_and_data_urls_unchanged() {
        for url in [
            "https://cdn.example.com/a.png",
            "HTTP://cdn.example.com/b.png",
            "//cdn.example.com/c.png",
            "data:image/png;base64,iVBORw0KGgo=",
        ] {
            assert_eq!(resolve_image_url(BASE, url), url);
        }
    }

    #[test]
    fn test_empty_path_stays_empty() {
        assert_eq!(resolve_image_url(BASE, ""), "");
        assert_eq!(resolve_image_url(BASE, "   "), "");
    }

    #[test]
    fn test_applying_twice_does_not_double_prefix() {
        for input in ["uploads/a.jpg", "/b.jpg", "https://x.example/c.jpg"] {
            let once = resolve_image_url(BASE, input);
            let twice = resolve_image_url(BASE, &once);
            assert_eq!(once, twice);
        }
    }
}
