/// Output sinks: MakeCode Python scripts on disk and an in-memory collector
use crate::batch::Batch;
use crate::error::Result;
use crate::point::VoxelRecord;
use constants::pipeline::OUTPUT_UNIT_PREFIX;
use log::{debug, info};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Receiver of classified batches for one conversion run
///
/// Batches written between `begin` and `commit` replace the previous run's
/// units only once `commit` succeeds.
pub trait BatchSink {
    /// Start a new run, discarding anything staged by an unfinished one
    fn begin(&mut self) -> Result<()>;

    /// Stage one batch as a named unit
    fn write_batch(&mut self, batch: &Batch<'_>) -> Result<()>;

    /// Replace the previous run's units with the staged ones
    fn commit(&mut self) -> Result<()>;

    /// Names of the units written so far
    fn units(&self) -> Vec<String>;
}

/// Directory under the output directory holding scripts until commit
pub const STAGING_DIR: &str = ".staging";

/// Unit name of a 1-based batch index
pub fn unit_name(index: usize) -> String {
    format!("{}{}", OUTPUT_UNIT_PREFIX, index)
}

/// Chat-triggered MakeCode script placing every block of the batch
pub fn render_script(batch: &Batch<'_>) -> String {
    let mut code = String::with_capacity(64 * batch.len() + 128);
    code.push_str("def on_on_chat():\n");
    for record in batch.records {
        // Writing to a String cannot fail
        let _ = writeln!(
            code,
            "    blocks.place({}, world({}, {}, {}))",
            record.label, record.key.x, record.key.y, record.key.z
        );
    }
    code.push_str("    player.tell(mobs.target(LOCAL_PLAYER), \"fin\")\n");
    code.push_str("player.on_chat(\"run\", on_on_chat)\n");
    code
}

/// Writes one `.py` script per batch into an output directory
pub struct ScriptWriter {
    output_dir: PathBuf,
    staging_dir: PathBuf,
    written: Vec<String>,
}

impl ScriptWriter {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            staging_dir: output_dir.join(STAGING_DIR),
            written: Vec::new(),
        }
    }

    fn script_file(index: usize) -> String {
        format!("{}.py", unit_name(index))
    }

    fn is_script(path: &Path) -> bool {
        path.is_file() && path.extension().is_some_and(|ext| ext == "py")
    }

    /// Remove every script left by an earlier run
    fn remove_previous_scripts(&self) -> Result<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.output_dir)? {
            let path = entry?.path();
            if Self::is_script(&path) {
                fs::remove_file(&path)?;
                debug!("Removed {}", path.display());
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl BatchSink for ScriptWriter {
    fn begin(&mut self) -> Result<()> {
        if self.staging_dir.exists() {
            fs::remove_dir_all(&self.staging_dir)?;
        }
        fs::create_dir_all(&self.staging_dir)?;
        self.written.clear();
        Ok(())
    }

    fn write_batch(&mut self, batch: &Batch<'_>) -> Result<()> {
        let path = self.staging_dir.join(Self::script_file(batch.index));
        fs::write(&path, render_script(batch))?;
        debug!("Staged {} ({} blocks)", path.display(), batch.len());
        self.written.push(unit_name(batch.index));
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let removed = self.remove_previous_scripts()?;
        if removed > 0 {
            info!(
                "Removed {} existing scripts from {}",
                removed,
                self.output_dir.display()
            );
        }

        for entry in fs::read_dir(&self.staging_dir)? {
            let staged = entry?.path();
            if let Some(name) = staged.file_name() {
                fs::rename(&staged, self.output_dir.join(name))?;
            }
        }
        fs::remove_dir(&self.staging_dir)?;

        info!(
            "Saved {} scripts to {}",
            self.written.len(),
            self.output_dir.display()
        );
        Ok(())
    }

    fn units(&self) -> Vec<String> {
        self.written.clone()
    }
}

/// Collects batches in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub begun: bool,
    pub committed: bool,
    pub batches: Vec<(usize, Vec<VoxelRecord>)>,
}

impl BatchSink for MemorySink {
    fn begin(&mut self) -> Result<()> {
        self.begun = true;
        self.committed = false;
        self.batches.clear();
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.committed = true;
        Ok(())
    }

    fn write_batch(&mut self, batch: &Batch<'_>) -> Result<()> {
        self.batches.push((batch.index, batch.records.to_vec()));
        Ok(())
    }

    fn units(&self) -> Vec<String> {
        self.batches.iter().map(|(index, _)| unit_name(*index)).collect()
    }
}
