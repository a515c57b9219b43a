//! Batch export of several jobs into one directory.
//!
//! The host decides which clips belong to which object or armature; the batch
//! only runs the jobs: movements first, then meshes, then armatures. The
//! first failing job stops the batch; files written before it stay on disk.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::options::{ArmatureOptions, MeshOptions, MovementOptions};
use crate::scene::{ActionData, ArmatureData, MeshData};
use crate::util::Result;

use super::{export_armature, export_mesh, export_movements, ExportReport, ExportWarning};

/// Rotation mode of an animated object in the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RotationMode {
    #[default]
    Quaternion,
    Euler,
    AxisAngle,
}

/// Clips of one animated object.
#[derive(Clone, Debug)]
pub struct MovementJob<'a> {
    pub name: String,
    pub rotation_mode: RotationMode,
    pub clips: &'a [ActionData],
    pub options: MovementOptions,
}

impl<'a> MovementJob<'a> {
    pub fn new(name: impl Into<String>, clips: &'a [ActionData]) -> Self {
        Self {
            name: name.into(),
            rotation_mode: RotationMode::Quaternion,
            clips,
            options: MovementOptions::default(),
        }
    }

    pub fn with_rotation_mode(mut self, mode: RotationMode) -> Self {
        self.rotation_mode = mode;
        self
    }

    pub fn with_options(mut self, options: MovementOptions) -> Self {
        self.options = options;
        self
    }
}

/// One mesh, optionally bound to an armature for skin weights.
#[derive(Clone, Debug)]
pub struct MeshJob<'a> {
    pub name: String,
    pub mesh: &'a MeshData,
    pub armature: Option<&'a ArmatureData>,
    pub options: MeshOptions,
}

impl<'a> MeshJob<'a> {
    pub fn new(name: impl Into<String>, mesh: &'a MeshData) -> Self {
        Self { name: name.into(), mesh, armature: None, options: MeshOptions::default() }
    }

    pub fn with_armature(mut self, armature: &'a ArmatureData) -> Self {
        self.armature = Some(armature);
        self
    }

    pub fn with_options(mut self, options: MeshOptions) -> Self {
        self.options = options;
        self
    }
}

/// One armature with its associated clips.
#[derive(Clone, Debug)]
pub struct ArmatureJob<'a> {
    pub name: String,
    pub armature: &'a ArmatureData,
    pub clips: &'a [ActionData],
    pub options: ArmatureOptions,
}

impl<'a> ArmatureJob<'a> {
    pub fn new(name: impl Into<String>, armature: &'a ArmatureData, clips: &'a [ActionData]) -> Self {
        Self { name: name.into(), armature, clips, options: ArmatureOptions::default() }
    }

    pub fn with_options(mut self, options: ArmatureOptions) -> Self {
        self.options = options;
        self
    }
}

/// Outcome of a batch run.
#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    /// Written files, in write order.
    pub files: Vec<ExportReport>,
    /// Jobs that produced no file.
    pub skipped: Vec<ExportWarning>,
}

impl BatchReport {
    /// All warnings of the run, skipped jobs first.
    pub fn warnings(&self) -> impl Iterator<Item = &ExportWarning> {
        self.skipped.iter().chain(self.files.iter().flat_map(|f| f.warnings.iter()))
    }
}

/// Ordered set of export jobs sharing one destination directory.
#[derive(Clone, Debug)]
pub struct ExportBatch<'a> {
    directory: PathBuf,
    movements: Vec<MovementJob<'a>>,
    meshes: Vec<MeshJob<'a>>,
    armatures: Vec<ArmatureJob<'a>>,
}

impl<'a> ExportBatch<'a> {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            movements: Vec::new(),
            meshes: Vec::new(),
            armatures: Vec::new(),
        }
    }

    /// Destination directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn add_movements(&mut self, job: MovementJob<'a>) -> &mut Self {
        self.movements.push(job);
        self
    }

    pub fn add_mesh(&mut self, job: MeshJob<'a>) -> &mut Self {
        self.meshes.push(job);
        self
    }

    pub fn add_armature(&mut self, job: ArmatureJob<'a>) -> &mut Self {
        self.armatures.push(job);
        self
    }

    /// Number of queued jobs.
    pub fn len(&self) -> usize {
        self.movements.len() + self.meshes.len() + self.armatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every job in order.
    pub fn run(&self) -> Result<BatchReport> {
        let _span = tracing::info_span!("export_batch", dir = %self.directory.display()).entered();
        let start = Instant::now();
        let mut report = BatchReport::default();

        for job in &self.movements {
            if job.rotation_mode != RotationMode::Quaternion {
                tracing::warn!(
                    object = %job.name,
                    mode = ?job.rotation_mode,
                    "object is not in quaternion rotation mode; movements skipped"
                );
                report.skipped.push(ExportWarning::Skipped {
                    name: job.name.clone(),
                    reason: "not in quaternion rotation mode".into(),
                });
                continue;
            }
            if job.clips.is_empty() {
                tracing::debug!(object = %job.name, "no clips; movements skipped");
                report.skipped.push(ExportWarning::Skipped {
                    name: job.name.clone(),
                    reason: "no clips".into(),
                });
                continue;
            }
            report
                .files
                .push(export_movements(&self.directory, &job.name, job.clips, &job.options)?);
        }

        for job in &self.meshes {
            report.files.push(export_mesh(
                &self.directory,
                &job.name,
                job.mesh,
                job.armature,
                &job.options,
            )?);
        }

        for job in &self.armatures {
            if job.clips.is_empty() {
                tracing::debug!(armature = %job.name, "no clips; armature skipped");
                report.skipped.push(ExportWarning::Skipped {
                    name: job.name.clone(),
                    reason: "no clips".into(),
                });
                continue;
            }
            report.files.push(export_armature(
                &self.directory,
                &job.name,
                job.armature,
                job.clips,
                &job.options,
            )?);
        }

        tracing::info!(
            files = report.files.len(),
            skipped = report.skipped.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "batch finished"
        );
        Ok(report)
    }
}
