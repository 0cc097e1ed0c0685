use std::fmt;
use std::path::PathBuf;

/// Every file the record store persists, in lock order.
///
/// Multi-file use cases acquire locks sorted by this ordering, so the
/// variant order must not change without reviewing those call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataFile {
    Products,
    Releases,
    Artifacts,
    UpdateLogs,
    Clients,
    Licenses,
    Settings,
    ClientProducts,
}

impl DataFile {
    pub const ALL: [DataFile; 8] = [
        DataFile::Products,
        DataFile::Releases,
        DataFile::Artifacts,
        DataFile::UpdateLogs,
        DataFile::Clients,
        DataFile::Licenses,
        DataFile::Settings,
        DataFile::ClientProducts,
    ];

    /// Path of the file relative to the data directory.
    pub fn relative_path(&self) -> PathBuf {
        match self {
            DataFile::Products => PathBuf::from("products.json"),
            DataFile::Releases => PathBuf::from("releases.json"),
            DataFile::Artifacts => PathBuf::from("artifacts.json"),
            DataFile::UpdateLogs => PathBuf::from("update_logs.json"),
            DataFile::Clients => PathBuf::from("clients.json"),
            DataFile::Licenses => PathBuf::from("licenses.json"),
            DataFile::Settings => PathBuf::from("settings.json"),
            DataFile::ClientProducts => PathBuf::from("data").join("client_product.json"),
        }
    }
}

impl fmt::Display for DataFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relative_path().display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_file_is_nested() {
        assert_eq!(
            DataFile::ClientProducts.relative_path(),
            PathBuf::from("data/client_product.json")
        );
        assert_eq!(DataFile::UpdateLogs.to_string(), "update_logs.json");
    }

    #[test]
    fn test_all_is_sorted() {
        let mut sorted = DataFile::ALL;
        sorted.sort();
        assert_eq!(sorted, DataFile::ALL);
    }
}
