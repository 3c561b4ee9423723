use std::ffi::OsString;
use std::path::PathBuf;

pub const TEXT_EXPORT_FILE: &str = "bank_data.txt";
pub const CSV_EXPORT_FILE: &str = "bank_ledger.csv";

/// Where exports are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub text_export_path: PathBuf,
    pub csv_export_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            text_export_path: PathBuf::from(TEXT_EXPORT_FILE),
            csv_export_path: PathBuf::from(CSV_EXPORT_FILE),
        }
    }
}

impl Config {
    /// Both export files go into `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Config {
            text_export_path: dir.join(TEXT_EXPORT_FILE),
            csv_export_path: dir.join(CSV_EXPORT_FILE),
        }
    }

    /// Reads process arguments (program name first). An optional first argument is the export directory.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = OsString>,
    {
        match args.into_iter().nth(1) {
            None => Config::default(),
            Some(dir) => {
                log::debug!("Extracted export directory from args: {dir:?}");
                Config::in_dir(dir)
            }
        }
    }
}
