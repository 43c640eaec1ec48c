// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Member storage abstraction with in-memory and flat-file implementations.
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use tokio::{fs as tokio_fs, io::AsyncWriteExt};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::member::Member;

/// Trait for member storage backends
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Look up a member by its unique username
    async fn find_by_username(&self, username: &str) -> Result<Option<Member>, AppError>;

    /// Insert a new member. Fails with `DuplicateMember` if the username is taken.
    async fn save(&self, member: Member) -> Result<(), AppError>;
}

/// Process-local member store
#[derive(Clone, Default)]
pub struct InMemoryMemberStore {
    members: Arc<DashMap<String, Member>>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[async_trait]
impl MemberStore for InMemoryMemberStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Member>, AppError> {
        Ok(self.members.get(username).map(|m| m.value().clone()))
    }

    async fn save(&self, member: Member) -> Result<(), AppError> {
        match self.members.entry(member.username().to_string()) {
            Entry::Occupied(_) => Err(AppError::DuplicateMember(member.username().to_string())),
            Entry::Vacant(slot) => {
                slot.insert(member);
                Ok(())
            }
        }
    }
}

/// Flat-file implementation: one JSON document per member under `<root>/members`.
#[derive(Clone)]
pub struct FlatFileMemberStore {
    root: PathBuf,
}

impl FlatFileMemberStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, AppError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("members"))?;
        Ok(Self { root })
    }

    fn members_dir(&self) -> PathBuf {
        self.root.join("members")
    }

    /// File names are the SHA-256 of the username, so every username maps to
    /// one fixed-length name inside the store.
    fn member_path(&self, username: &str) -> PathBuf {
        let digest = hex::encode(Sha256::digest(username.as_bytes()));
        self.members_dir().join(format!("{digest}.json"))
    }

    fn staging_path(&self) -> PathBuf {
        self.members_dir()
            .join(format!(".{}.tmp", Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl MemberStore for FlatFileMemberStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Member>, AppError> {
        let path = self.member_path(username);

        let content = match tokio_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let member: Member = serde_json::from_str(&content)?;

        if member.username() != username {
            return Err(AppError::Internal(format!(
                "member file {} holds a different username",
                path.display()
            )));
        }

        Ok(Some(member))
    }

    async fn save(&self, member: Member) -> Result<(), AppError> {
        let path = self.member_path(member.username());
        let json = serde_json::to_string_pretty(&member)?;

        // The document is written in full under a staging name first, then
        // linked into place. A failed write never leaves a partial member file.
        let staging = self.staging_path();
        let staged = write_staged(&staging, json.as_bytes()).await;
        let linked = match staged {
            Ok(()) => tokio_fs::hard_link(&staging, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = tokio_fs::remove_file(&staging).await {
            if e.kind() != ErrorKind::NotFound {
                warn!(path = %staging.display(), error = %e, "failed to remove staging file");
            }
        }

        match linked {
            Ok(()) => {
                debug!(username = %member.username(), path = %path.display(), "member stored");
                Ok(())
            }
            // link never replaces an existing file
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(AppError::DuplicateMember(member.username().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

async fn write_staged(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio_fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}
