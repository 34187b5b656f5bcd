//! Utility Module
//!
//! Small path/string helpers consumed by the asset-resolution layer.

/// Strips a path down to its bare file name.
///
/// Handles both `/` and `\` separators regardless of host platform, so a
/// Windows-authored asset reference inside a model file resolves the same
/// way everywhere.
///
/// ```
/// use smalt::utils::strip_path_to_file_name;
///
/// assert_eq!(strip_path_to_file_name("textures/wood.png"), "wood.png");
/// assert_eq!(strip_path_to_file_name(r"..\..\evil\wood.png"), "wood.png");
/// assert_eq!(strip_path_to_file_name("wood.png"), "wood.png");
/// ```
#[must_use]
pub fn strip_path_to_file_name(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::strip_path_to_file_name;

    #[test]
    fn keeps_bare_file_names() {
        assert_eq!(strip_path_to_file_name("brick.png"), "brick.png");
    }

    #[test]
    fn strips_mixed_separators() {
        assert_eq!(strip_path_to_file_name("a/b\\c/d.gltf"), "d.gltf");
    }

    #[test]
    fn trailing_separator_yields_empty_name() {
        assert_eq!(strip_path_to_file_name("models/"), "");
    }
}
