//! Common test utilities and constants for the Shoko crate.
//!
//! Provides a throwaway library directory per test and helpers to fill it
//! with empty files that only matter for their names.

use rand::{Rng, distributions::Alphanumeric};
use shoko::error::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

#[allow(dead_code)]
pub const TEST_TMP_DIR: &str = "tests/tmp";
#[allow(dead_code)]
pub const TEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A unique library root under [`TEST_TMP_DIR`].
#[allow(dead_code)]
pub struct TestDirs {
    pub test_dir: PathBuf,
    pub library_dir: PathBuf,
}

#[allow(dead_code)]
impl TestDirs {
    /// Absolute path of `relative` inside the library.
    pub fn file(&self, relative: &str) -> PathBuf {
        self.library_dir.join(relative)
    }

    pub async fn cleanup(&self) {
        if self.test_dir.exists() {
            let _ = fs::remove_dir_all(&self.test_dir).await;
        }
    }
}

/// Creates a clean, uniquely named test directory with a `library` root.
#[allow(dead_code)]
pub async fn setup_test_dirs(sub_path: &str) -> TestDirs {
    let rand_string: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    let unique_sub_path = format!("{}-{}", sub_path, rand_string);
    let test_dir = std::env::current_dir()
        .unwrap()
        .join(TEST_TMP_DIR)
        .join(unique_sub_path);
    if test_dir.exists() {
        fs::remove_dir_all(&test_dir).await.unwrap();
    }
    let library_dir = test_dir.join("library");
    fs::create_dir_all(&library_dir).await.unwrap();

    TestDirs {
        test_dir,
        library_dir,
    }
}

/// Creates an empty file, and its parent folders, at `path`.
#[allow(dead_code)]
pub async fn create_dummy_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, b"").await?;
    Ok(())
}

/// Creates every `relative` file below `root`.
#[allow(dead_code)]
pub async fn create_dummy_files(root: &Path, relative: &[&str]) -> Result<()> {
    for file in relative {
        create_dummy_file(&root.join(file)).await?;
    }
    Ok(())
}
