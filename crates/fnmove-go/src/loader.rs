//! Loading a directory tree into a resolved [`Program`].
//!
//! Every directory containing `.go` files is one package. Its import path
//! is the module path from `go.mod` joined with the directory relative to
//! the root. Hidden directories are skipped, as are files matching the
//! configured exclude globs and `_test.go` files unless tests are included.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use fnmove_core::config::RelocateConfig;
use fnmove_core::error::FnMoveError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::ast::NodeIdGen;
use crate::parser::{parse_file, ParseError};
use crate::program::{CompilationUnit, Package, Program};
use crate::resolve::resolve_program;

/// Errors building a program.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("directory {dir} declares both package {first} and package {second}")]
    PackageMismatch {
        dir: String,
        first: String,
        second: String,
    },

    #[error("invalid exclude pattern {pattern}: {message}")]
    Pattern { pattern: String, message: String },

    #[error("no Go source files found under {root}")]
    Empty { root: String },
}

impl From<LoadError> for FnMoveError {
    fn from(err: LoadError) -> Self {
        FnMoveError::Load {
            message: err.to_string(),
        }
    }
}

/// Source of a fully resolved program.
pub trait SemanticModel {
    fn load(&self, root: &Path) -> Result<Program, LoadError>;
}

/// Loads Go-dialect sources from the filesystem.
#[derive(Debug, Clone)]
pub struct GoLoader {
    pub exclude: Vec<String>,
    pub include_tests: bool,
}

impl Default for GoLoader {
    fn default() -> Self {
        GoLoader::from_config(&RelocateConfig::default())
    }
}

impl GoLoader {
    pub fn from_config(config: &RelocateConfig) -> Self {
        GoLoader {
            exclude: config.exclude.clone(),
            include_tests: config.include_tests,
        }
    }

    fn exclude_set(&self) -> Result<GlobSet, LoadError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob = Glob::new(pattern).map_err(|e| LoadError::Pattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| LoadError::Pattern {
            pattern: self.exclude.join(", "),
            message: e.to_string(),
        })
    }

    /// Go files under `root` grouped by directory relative to `root`.
    fn collect_files(&self, root: &Path) -> Result<BTreeMap<String, Vec<String>>, LoadError> {
        let excluded = self.exclude_set()?;
        let mut dirs: BTreeMap<String, Vec<String>> = BTreeMap::new();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
        for entry in walker {
            let entry = entry.map_err(|e| LoadError::Io {
                path: e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string()),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(root) else {
                continue;
            };
            let rel = rel.to_string_lossy().replace('\\', "/");
            if !rel.ends_with(".go") {
                continue;
            }
            if !self.include_tests && rel.ends_with("_test.go") {
                continue;
            }
            if excluded.is_match(&rel) {
                debug!(file = %rel, "excluded");
                continue;
            }
            let dir = match rel.rfind('/') {
                Some(idx) => rel[..idx].to_string(),
                None => String::new(),
            };
            dirs.entry(dir).or_default().push(rel);
        }
        Ok(dirs)
    }
}

impl SemanticModel for GoLoader {
    fn load(&self, root: &Path) -> Result<Program, LoadError> {
        let root = root.canonicalize().map_err(|e| LoadError::Io {
            path: root.display().to_string(),
            message: e.to_string(),
        })?;
        let module = module_path(&root)?;
        let dirs = self.collect_files(&root)?;
        if dirs.is_empty() {
            return Err(LoadError::Empty {
                root: root.display().to_string(),
            });
        }

        let mut ids = NodeIdGen::new();
        let mut parsed = Vec::new();
        for (dir, files) in dirs {
            let mut units = Vec::new();
            let mut name: Option<String> = None;
            for rel in files {
                let path = root.join(&rel);
                let source = fs::read_to_string(&path).map_err(|e| LoadError::Io {
                    path: rel.clone(),
                    message: e.to_string(),
                })?;
                let file = parse_file(&rel, &source, &mut ids)?;
                let declared = file.package.name.clone();
                let first = name.get_or_insert_with(|| declared.clone());
                if *first != declared {
                    if self.include_tests && declared == format!("{first}_test") {
                        debug!(file = %rel, "skipping external test package");
                        continue;
                    }
                    return Err(LoadError::PackageMismatch {
                        dir: if dir.is_empty() { ".".to_string() } else { dir.clone() },
                        first: first.clone(),
                        second: declared,
                    });
                }
                units.push((path, rel, source, file));
            }
            if let Some(name) = name {
                parsed.push((dir, name, units));
            }
        }

        let mut program = Program::new(root, module.clone(), ids);
        for (dir, name, units) in parsed {
            let import_path = if dir.is_empty() {
                module.clone()
            } else {
                format!("{module}/{dir}")
            };
            let package = program.add_package(Package {
                name,
                import_path,
                dir: PathBuf::from(&dir),
                units: Vec::new(),
                scope: BTreeMap::new(),
            });
            for (path, rel_path, source, file) in units {
                program.add_unit(CompilationUnit {
                    path,
                    rel_path,
                    package,
                    contents: source.clone(),
                    source,
                    file,
                    imports: BTreeMap::new(),
                });
            }
        }

        resolve_program(&mut program);
        info!(
            module = %program.module,
            packages = program.packages.len(),
            units = program.units.len(),
            "loaded program"
        );
        Ok(program)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Module path declared in `root/go.mod`, or the root directory's name.
fn module_path(root: &Path) -> Result<String, LoadError> {
    let go_mod = root.join("go.mod");
    if go_mod.is_file() {
        let content = fs::read_to_string(&go_mod).map_err(|e| LoadError::Io {
            path: go_mod.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(module) = parse_module_line(&content) {
            return Ok(module);
        }
    }
    Ok(root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "main".to_string()))
}

fn parse_module_line(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or("").trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let module = rest.trim().trim_matches('"');
        (!module.is_empty()).then(|| module.to_string())
    })
}
