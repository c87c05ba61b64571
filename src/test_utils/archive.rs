//! In-memory `.tar.gz` construction for tests

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::path::Path;

#[derive(Debug, Clone)]
enum Entry {
    File {
        path: String,
        contents: Vec<u8>,
        mode: u32,
    },
    Dir {
        path: String,
    },
    Symlink {
        path: String,
        target: String,
    },
}

/// Builder for gzip-compressed tar archives.
///
/// Entries are written in the order they are added. Parent directories are
/// not added implicitly; `tar` creates them on extraction.
#[derive(Debug, Clone, Default)]
pub struct ArchiveBuilder {
    entries: Vec<Entry>,
}

impl ArchiveBuilder {
    /// Empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Regular file with mode `0o644`.
    #[must_use]
    pub fn file(self, path: &str, contents: &str) -> Self {
        self.file_with_mode(path, contents.as_bytes(), 0o644)
    }

    /// Regular file with mode `0o755`.
    #[must_use]
    pub fn executable(self, path: &str, contents: &str) -> Self {
        self.file_with_mode(path, contents.as_bytes(), 0o755)
    }

    /// Regular file with an explicit mode.
    #[must_use]
    pub fn file_with_mode(mut self, path: &str, contents: &[u8], mode: u32) -> Self {
        self.entries.push(Entry::File {
            path: path.to_string(),
            contents: contents.to_vec(),
            mode,
        });
        self
    }

    /// Empty directory.
    #[must_use]
    pub fn dir(mut self, path: &str) -> Self {
        self.entries.push(Entry::Dir {
            path: path.to_string(),
        });
        self
    }

    /// Symbolic link pointing at `target`.
    #[must_use]
    pub fn symlink(mut self, path: &str, target: &str) -> Self {
        self.entries.push(Entry::Symlink {
            path: path.to_string(),
            target: target.to_string(),
        });
        self
    }

    /// Archive bytes.
    pub fn build(&self) -> Result<Vec<u8>> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);

        for entry in &self.entries {
            let mut header = tar::Header::new_gnu();
            header.set_mtime(1_700_000_000);
            match entry {
                Entry::File {
                    path,
                    contents,
                    mode,
                } => {
                    header.set_entry_type(tar::EntryType::Regular);
                    header.set_size(contents.len() as u64);
                    header.set_mode(*mode);
                    builder
                        .append_data(&mut header, path, contents.as_slice())
                        .with_context(|| format!("Failed to add {path} to archive"))?;
                }
                Entry::Dir {
                    path,
                } => {
                    header.set_entry_type(tar::EntryType::Directory);
                    header.set_size(0);
                    header.set_mode(0o755);
                    builder
                        .append_data(&mut header, path, std::io::empty())
                        .with_context(|| format!("Failed to add {path} to archive"))?;
                }
                Entry::Symlink {
                    path,
                    target,
                } => {
                    header.set_entry_type(tar::EntryType::Symlink);
                    header.set_size(0);
                    header.set_mode(0o777);
                    builder
                        .append_link(&mut header, path, target)
                        .with_context(|| format!("Failed to add {path} to archive"))?;
                }
            }
        }

        let encoder = builder.into_inner().context("Failed to finish tar stream")?;
        encoder.finish().context("Failed to finish gzip stream")
    }

    /// Writes the archive to `path`.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let bytes = self.build()?;
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write archive to {}", path.display()))
    }
}

/// `product.json` contents as shipped in windsurf releases.
#[must_use]
pub fn product_json(version: &str) -> String {
    serde_json::json!({
        "nameShort": "Windsurf",
        "windsurfVersion": version,
        "codeiumVersion": format!("{version}-codeium"),
        "version": "1.94.0",
    })
    .to_string()
}

/// A windsurf-shaped release: a `Windsurf/` wrapper directory holding an
/// executable, `product.json`, a library directory and a relative symlink.
#[must_use]
pub fn windsurf_archive(version: &str) -> ArchiveBuilder {
    ArchiveBuilder::new()
        .dir("Windsurf")
        .executable("Windsurf/windsurf", &format!("#!/bin/sh\necho windsurf {version}\n"))
        .file("Windsurf/resources/app/product.json", &product_json(version))
        .file("Windsurf/resources/app/resources/linux/code.png", "PNG")
        .file(&format!("Windsurf/lib/release-{version}.txt"), version)
        .symlink("Windsurf/bin/windsurf", "../windsurf")
}
