//! One packaging run: the module-graph worklist.

use super::dest::DestinationMapper;
use super::dirs::DirectorySet;
use super::options::PackageOptions;
use super::resolve::{resolve_import, ResolvedImport};
use super::rewrite::{relative_specifier, splice_specifier};
use crate::error::{Error, Result};
use crate::imports::ImportScanner;
use esmpack_util::path::normalize;
use esmpack_util::FileSystem;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// A file written by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackagedFile {
    /// Absolute source path.
    pub source: PathBuf,
    /// Absolute output path.
    pub destination: PathBuf,
    /// Number of bare specifiers rewritten to relative paths.
    pub rewritten: usize,
}

/// What a run produced, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageSummary {
    pub files: Vec<PackagedFile>,
    /// Directories visited by the materializer (created or already present).
    pub directories: usize,
}

/// State of one packaging run.
///
/// Files move from unseen to pending (queued) to processed. The pending set
/// covers both queued and processed files, so nothing is read twice.
pub struct PackageSession<'a, F: ?Sized, S: ?Sized> {
    options: PackageOptions,
    mapper: DestinationMapper,
    fs: &'a F,
    scanner: &'a S,
    queue: VecDeque<PathBuf>,
    pending: HashSet<PathBuf>,
    dirs: DirectorySet,
    summary: PackageSummary,
}

impl<'a, F, S> PackageSession<'a, F, S>
where
    F: FileSystem + ?Sized,
    S: ImportScanner + ?Sized,
{
    /// Validate `options` and seed the queue with the entry points.
    pub fn new(options: &PackageOptions, fs: &'a F, scanner: &'a S) -> Result<Self> {
        let options = options.normalized()?;
        let mapper = DestinationMapper::new(&options);

        let mut session = Self {
            options,
            mapper,
            fs,
            scanner,
            queue: VecDeque::new(),
            pending: HashSet::new(),
            dirs: DirectorySet::new(),
            summary: PackageSummary::default(),
        };

        let entries: Vec<PathBuf> = session
            .options
            .entry_points
            .iter()
            .map(|entry| normalize(&session.mapper.source_dir().join(entry)))
            .collect();
        for entry in entries {
            session.enqueue(entry);
        }

        Ok(session)
    }

    /// The normalized options this session runs with.
    #[must_use]
    pub fn options(&self) -> &PackageOptions {
        &self.options
    }

    #[must_use]
    pub fn mapper(&self) -> &DestinationMapper {
        &self.mapper
    }

    /// Whether `path` has been queued or processed.
    #[must_use]
    pub fn is_pending(&self, path: &Path) -> bool {
        self.pending.contains(path)
    }

    /// Files waiting to be processed.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn directories(&self) -> &DirectorySet {
        &self.dirs
    }

    /// Queue `path` unless it was seen before. Returns whether it was queued.
    fn enqueue(&mut self, path: PathBuf) -> bool {
        if self.pending.contains(&path) {
            return false;
        }
        trace!(file = %path.display(), "queued");
        self.pending.insert(path.clone());
        self.queue.push_back(path);
        true
    }

    /// Process the next queued file. Returns `false` once the queue is empty.
    pub fn step(&mut self) -> Result<bool> {
        let Some(file) = self.queue.pop_front() else {
            return Ok(false);
        };
        self.process(file)?;
        Ok(true)
    }

    /// Drain the queue.
    pub fn run(mut self) -> Result<PackageSummary> {
        while self.step()? {}
        self.summary.directories = self.dirs.len();
        Ok(self.summary)
    }

    fn process(&mut self, file: PathBuf) -> Result<()> {
        let mut text = self
            .fs
            .read_to_string(&file)
            .map_err(|source| Error::Read {
                path: file.clone(),
                source,
            })?;

        let mut references = self.scanner.scan(&text);
        // Splice from the end so earlier offsets stay valid
        references.sort_by_key(|r| Reverse(r.start));

        let destination = self.mapper.destination(&file);
        let mut rewritten = 0;

        for reference in &references {
            let resolved = resolve_import(self.fs, &self.options, &reference.specifier, &file)?;
            trace!(
                importer = %file.display(),
                specifier = %reference.specifier,
                resolved = ?resolved,
                "resolved import"
            );

            match resolved {
                ResolvedImport::Skipped => {}
                // Relative specifiers stay as written
                ResolvedImport::Relative(target) => {
                    self.enqueue(target);
                }
                ResolvedImport::Bare(target) => {
                    let target_destination = self.mapper.destination(&target);
                    let specifier = relative_specifier(&destination, &target_destination);
                    if !splice_specifier(&mut text, reference, &specifier) {
                        return Err(Error::InvalidImportSpan {
                            path: file,
                            start: reference.start,
                            end: reference.end,
                        });
                    }
                    rewritten += 1;
                    self.enqueue(target);
                }
            }
        }

        if let Some(parent) = destination.parent() {
            self.dirs.ensure(self.fs, parent)?;
        }
        self.fs
            .write(&destination, &text)
            .map_err(|source| Error::Write {
                path: destination.clone(),
                source,
            })?;

        debug!(
            source = %file.display(),
            destination = %destination.display(),
            rewritten,
            "packaged module"
        );

        self.summary.files.push(PackagedFile {
            source: file,
            destination,
            rewritten,
        });
        Ok(())
    }
}
