use std::path::Path;

pub fn display_path(path: &Path, base: Option<&Path>) -> String {
    if let Some(base) = base {
        if let Ok(relative) = path.strip_prefix(base) {
            return relative.display().to_string();
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::display_path;
    use std::path::Path;

    #[test]
    fn strips_base_when_nested() {
        let base = Path::new("/docs/generated");
        assert_eq!(
            display_path(Path::new("/docs/generated/Visit_unit.tex"), Some(base)),
            "Visit_unit.tex"
        );
        assert_eq!(display_path(Path::new("/elsewhere/x.dot"), Some(base)), "/elsewhere/x.dot");
        assert_eq!(display_path(Path::new("x.dot"), None), "x.dot");
    }
}
