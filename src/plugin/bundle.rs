//! In-memory model of bundler output.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use jwalk::WalkDir;

/// Kind of an output file, as the bundler reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Script produced from modules.
    Chunk,
    /// Anything else (stylesheets, images, generated JSON).
    Asset,
}

impl OutputKind {
    /// Guess from a file name; scripts are chunks.
    pub fn for_file(file_name: &str) -> Self {
        if file_name.ends_with(".js") || file_name.ends_with(".mjs") {
            Self::Chunk
        } else {
            Self::Asset
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub file_name: String,
    pub kind: OutputKind,
    pub content: Vec<u8>,
}

impl OutputFile {
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Output files keyed by file name relative to the output root.
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    files: IndexMap<String, OutputFile>,
    emitted: Vec<String>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file produced by the bundler.
    pub fn insert(&mut self, file_name: impl Into<String>, content: impl Into<Vec<u8>>) {
        let file_name = normalize(file_name.into());
        let kind = OutputKind::for_file(&file_name);
        self.files.insert(
            file_name.clone(),
            OutputFile {
                file_name,
                kind,
                content: content.into(),
            },
        );
    }

    /// Add a file produced by a plugin hook. Replaces any file of that name.
    pub fn emit(&mut self, file_name: impl Into<String>, content: impl Into<Vec<u8>>) {
        let file_name = normalize(file_name.into());
        self.insert(file_name.clone(), content);
        if !self.emitted.contains(&file_name) {
            self.emitted.push(file_name);
        }
    }

    pub fn get(&self, file_name: &str) -> Option<&OutputFile> {
        self.files.get(file_name)
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.files.contains_key(file_name)
    }

    pub fn remove(&mut self, file_name: &str) -> Option<OutputFile> {
        self.emitted.retain(|f| f != file_name);
        self.files.shift_remove(file_name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> impl Iterator<Item = &OutputFile> {
        self.files.values()
    }

    /// Files emitted by hooks, in emission order.
    pub fn emitted(&self) -> impl Iterator<Item = &OutputFile> {
        self.emitted.iter().filter_map(|name| self.files.get(name))
    }

    /// Load every file under `dir`, in sorted order.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(dir).sort(true) {
            let entry = entry.with_context(|| format!("failed to walk {}", dir.display()))?;
            if entry.file_type().is_file() {
                paths.push(entry.path());
            }
        }
        paths.sort();

        let mut bundle = Self::new();
        for path in paths {
            let content =
                fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
            let relative = path.strip_prefix(dir).unwrap_or(&path);
            bundle.insert(relative.to_string_lossy(), content);
        }
        Ok(bundle)
    }

    /// Write the emitted files into `dir`.
    pub fn write_emitted(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for file in self.emitted() {
            let path = dir.join(&file.file_name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(&path, &file.content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            written.push(path);
        }
        Ok(written)
    }
}

fn normalize(file_name: String) -> String {
    let file_name = file_name.replace('\\', "/");
    match file_name.strip_prefix('/') {
        Some(stripped) => stripped.to_string(),
        None => file_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_insert_and_emit() {
        let mut bundle = Bundle::new();
        bundle.insert("/assets/a.js", "code");
        bundle.insert("assets\\a.css", "css");
        bundle.emit("asset-manifest.js", "m1");
        bundle.emit("asset-manifest.js", "m2");

        assert_eq!(bundle.len(), 3);
        assert_eq!(bundle.get("assets/a.js").unwrap().kind, OutputKind::Chunk);
        assert_eq!(bundle.get("assets/a.css").unwrap().kind, OutputKind::Asset);

        let emitted: Vec<_> = bundle.emitted().collect();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].content, b"m2");
    }

    #[test]
    fn test_dir_round_trip() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("assets/b.js"), "b").unwrap();
        fs::write(dir.path().join("a.css"), "a").unwrap();

        let mut bundle = Bundle::from_dir(dir.path()).unwrap();
        let names: Vec<_> = bundle.files().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["a.css", "assets/b.js"]);

        bundle.emit("out/new.json", "{}");
        let written = bundle.write_emitted(dir.path()).unwrap();
        assert_eq!(written, [dir.path().join("out/new.json")]);
        assert_eq!(fs::read_to_string(&written[0]).unwrap(), "{}");
    }
}
