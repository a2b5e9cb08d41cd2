/// File categorization by extension.
///
/// This module maps file extensions to broad category labels such as
/// "Documents" or "Images". Categories become the names of the destination
/// subdirectories during organization.
///
/// # Examples
///
/// ```
/// use tidydown::file_category::CategoryTable;
/// use std::path::Path;
///
/// let table = CategoryTable::builtin();
/// assert_eq!(table.classify(Path::new("report.pdf")), "Documents");
/// assert_eq!(table.classify(Path::new("photo.JPG")), "Images");
/// assert_eq!(table.classify(Path::new("notes.xyz")), "Others");
/// ```
use std::collections::HashMap;
use std::path::Path;

/// Category label used for files whose extension is not in the table.
pub const DEFAULT_CATEGORY: &str = "Others";

/// Maps file extensions to category labels.
///
/// Keys are lower-cased extensions including the leading dot (".pdf").
/// The table is immutable for the lifetime of a run; alternate tables can be
/// built for tests or future configuration via [`CategoryTable::empty`] and
/// [`CategoryTable::add_mapping`].
#[derive(Debug, Clone)]
pub struct CategoryTable {
    extension_map: HashMap<String, String>,
    default: String,
}

impl CategoryTable {
    /// Creates an empty table with the given default category label.
    pub fn empty(default: &str) -> Self {
        Self {
            extension_map: HashMap::new(),
            default: default.to_string(),
        }
    }

    /// Creates the built-in table used by the application.
    pub fn builtin() -> Self {
        let mut table = Self::empty(DEFAULT_CATEGORY);

        for ext in [
            ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".tiff", ".ico", ".heic",
        ] {
            table.add_mapping(ext, "Images");
        }

        for ext in [".pdf", ".doc", ".docx", ".txt", ".rtf", ".odt", ".md", ".epub"] {
            table.add_mapping(ext, "Documents");
        }

        for ext in [".xls", ".xlsx", ".csv", ".ods"] {
            table.add_mapping(ext, "Spreadsheets");
        }

        for ext in [".ppt", ".pptx", ".odp"] {
            table.add_mapping(ext, "Presentations");
        }

        for ext in [".mp3", ".wav", ".flac", ".aac", ".ogg", ".m4a", ".wma"] {
            table.add_mapping(ext, "Music");
        }

        for ext in [".mp4", ".mkv", ".avi", ".mov", ".wmv", ".flv", ".webm", ".3gp"] {
            table.add_mapping(ext, "Videos");
        }

        for ext in [".zip", ".rar", ".7z", ".tar", ".gz", ".bz2", ".xz"] {
            table.add_mapping(ext, "Archives");
        }

        for ext in [
            ".py", ".js", ".ts", ".rs", ".go", ".c", ".cpp", ".h", ".java", ".sh", ".html",
            ".css", ".json", ".xml", ".yaml", ".yml", ".toml",
        ] {
            table.add_mapping(ext, "Code");
        }

        for ext in [".exe", ".msi", ".dmg", ".pkg", ".deb", ".rpm", ".appimage"] {
            table.add_mapping(ext, "Programs");
        }

        for ext in [".ttf", ".otf", ".woff", ".woff2"] {
            table.add_mapping(ext, "Fonts");
        }

        table
    }

    /// Adds an extension-to-category mapping.
    ///
    /// The extension is stored lower-cased; a missing leading dot is added.
    pub fn add_mapping(&mut self, ext: &str, category: &str) {
        let mut key = ext.to_lowercase();
        if !key.starts_with('.') {
            key.insert(0, '.');
        }
        self.extension_map.insert(key, category.to_string());
    }

    /// Returns the default category label.
    pub fn default_category(&self) -> &str {
        &self.default
    }

    /// Determines the category label for a file path.
    ///
    /// Looks up the lower-cased extension (with leading dot); files with an
    /// unknown extension or no extension at all get the default label.
    /// Pure and total: never fails, performs no I/O.
    pub fn classify(&self, path: &Path) -> &str {
        let Some(ext) = path.extension() else {
            return &self.default;
        };
        let key = format!(".{}", ext.to_string_lossy().to_lowercase());
        self.extension_map
            .get(&key)
            .map(String::as_str)
            .unwrap_or(&self.default)
    }

    /// Returns the sorted, de-duplicated list of category labels, including
    /// the default. Used by the interactive manual-category picker.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.extension_map.values().cloned().collect();
        labels.push(self.default.clone());
        labels.sort();
        labels.dedup();
        labels
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::builtin()
    }
}
