use bytes::Bytes;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// A user-selected file: its descriptive metadata plus async access to
/// its bytes.
pub trait FileSource: Send + Sync {
    fn name(&self) -> &str;
    fn size(&self) -> u64;
    fn mime_type(&self) -> &str;
    fn last_modified_ms(&self) -> i64;
    fn read_all(&self) -> BoxFuture<'_, io::Result<Vec<u8>>>;
    /// Reads bytes in `[start, end)`, clamped to the file length.
    fn read_range(&self, start: u64, end: u64) -> BoxFuture<'_, io::Result<Vec<u8>>>;
}

#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    mime_type: String,
    last_modified_ms: i64,
    contents: Bytes,
}

impl MemoryFile {
    pub fn new(name: &str, mime_type: &str, contents: impl Into<Bytes>) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            last_modified_ms: 0,
            contents: contents.into(),
        }
    }

    pub fn with_last_modified(mut self, last_modified_ms: i64) -> Self {
        self.last_modified_ms = last_modified_ms;
        self
    }
}

impl FileSource for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.contents.len() as u64
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn last_modified_ms(&self) -> i64 {
        self.last_modified_ms
    }

    fn read_all(&self) -> BoxFuture<'_, io::Result<Vec<u8>>> {
        let contents = self.contents.to_vec();
        async move { Ok(contents) }.boxed()
    }

    fn read_range(&self, start: u64, end: u64) -> BoxFuture<'_, io::Result<Vec<u8>>> {
        let len = self.contents.len();
        let end = (end as usize).min(len);
        let start = (start as usize).min(end);
        let slice = self.contents.slice(start..end).to_vec();
        async move { Ok(slice) }.boxed()
    }
}

/// File on local disk; bytes are read lazily through tokio.
#[derive(Debug, Clone)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
    mime_type: String,
    size: u64,
    last_modified_ms: i64,
}

impl DiskFile {
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let mime_type = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let last_modified_ms = metadata
            .modified()
            .map(|t| chrono::DateTime::<chrono::Utc>::from(t).timestamp_millis())
            .unwrap_or(0);

        Ok(Self {
            path,
            name,
            mime_type,
            size: metadata.len(),
            last_modified_ms,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileSource for DiskFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn last_modified_ms(&self) -> i64 {
        self.last_modified_ms
    }

    fn read_all(&self) -> BoxFuture<'_, io::Result<Vec<u8>>> {
        tokio::fs::read(&self.path).boxed()
    }

    fn read_range(&self, start: u64, end: u64) -> BoxFuture<'_, io::Result<Vec<u8>>> {
        async move {
            let end = end.min(self.size);
            let start = start.min(end);
            let mut file = tokio::fs::File::open(&self.path).await?;
            file.seek(io::SeekFrom::Start(start)).await?;
            let mut buf = vec![0u8; (end - start) as usize];
            file.read_exact(&mut buf).await?;
            Ok(buf)
        }
        .boxed()
    }
}
