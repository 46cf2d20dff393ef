//! File-backed [`TokenStore`] for CLI tools and single-process deployments.

// std
use std::{
	fs::{self, File},
	io::{ErrorKind, Write},
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	store::{self, StoreError, StoreFuture, TokenStore},
};

/// Persists the token record as JSON, replacing the file atomically on each write.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
	path: PathBuf,
	write_lock: Arc<Mutex<()>>,
}
impl FileTokenStore {
	/// Creates a store at `path`, creating parent directories as needed.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		Ok(Self { path, write_lock: Default::default() })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load(path: &Path) -> Result<Option<AccessToken>, StoreError> {
		let raw = match fs::read_to_string(path) {
			Ok(raw) => raw,
			Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
			Err(e) => {
				return Err(StoreError::Backend {
					message: format!("Failed to read {}: {e}", path.display()),
				});
			},
		};

		Ok(store::decode_record(&raw, "file"))
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist(&self, token: &AccessToken) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized = store::encode_record(token)?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(serialized.as_bytes()).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl TokenStore for FileTokenStore {
	fn read(&self) -> StoreFuture<'_, Option<AccessToken>> {
		Box::pin(async move { Self::load(&self.path) })
	}

	fn write(&self, token: AccessToken) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let _guard = self.write_lock.lock();

			self.persist(&token)
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn temp_path(label: &str) -> PathBuf {
		let unique = format!(
			"commerce_cart_token_{label}_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	#[tokio::test]
	async fn write_and_reopen_round_trip() {
		let path = temp_path("round_trip");
		let store = FileTokenStore::open(&path).expect("File store should open.");
		let token = AccessToken::new("access-token", macros::datetime!(2030-01-01 00:00 UTC));

		assert!(store.read().await.expect("Missing file should read as empty.").is_none());

		store.write(token.clone()).await.expect("Token should persist.");
		drop(store);

		let reopened = FileTokenStore::open(&path).expect("File store should reopen.");
		let fetched = reopened
			.read()
			.await
			.expect("Persisted token should load.")
			.expect("File store lost the token after reopen.");

		assert_eq!(fetched, token);

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary token file {}: {e}", path.display())
		});
	}

	#[tokio::test]
	async fn garbage_file_reads_as_absent() {
		let path = temp_path("garbage");

		fs::write(&path, "{not json").expect("Fixture file should be writable.");

		let store = FileTokenStore::open(&path).expect("File store should open.");

		assert!(store.read().await.expect("Garbage should not surface as an error.").is_none());

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary token file {}: {e}", path.display())
		});
	}
}
