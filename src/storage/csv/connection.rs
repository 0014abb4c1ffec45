use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::info;

/// CsvConnection manages the base directory and per-collection file paths.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Create a new CSV connection in the default per-user data directory.
    pub fn new_default() -> Result<Self> {
        let documents_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;

        let data_dir = documents_dir.join("Seva Ledger");
        info!("Using data directory: {}", data_dir.display());
        Self::new(data_dir)
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn customers_file_path(&self) -> PathBuf {
        self.base_directory.join("customers.csv")
    }

    pub fn services_file_path(&self) -> PathBuf {
        self.base_directory.join("services.csv")
    }

    pub fn transactions_file_path(&self) -> PathBuf {
        self.base_directory.join("transactions.csv")
    }

    /// Create a collection file with its header row if it doesn't exist yet.
    pub fn ensure_file_exists(&self, path: &Path, header: &[&str]) -> Result<()> {
        if path.exists() {
            return Ok(());
        }
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(header)?;
        writer.flush()?;
        info!("Created collection file {}", path.display());
        Ok(())
    }
}
