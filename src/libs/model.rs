use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use itertools::Itertools;
use tracing::debug;

use crate::libs::error::GactError;
use crate::libs::onehot::Encoded;

/// An opaque scoring model: one scalar per encoded input, order-preserving.
///
/// Classification models emit values already squashed into [0,1];
/// regression models emit raw, unbounded values (typically negative).
pub trait ScoringModel {
    fn call(&self, batch: &[Encoded]) -> Result<Vec<f64>, GactError>;
}

/// Runs `model` on `batch`.
///
/// An empty batch returns an empty vector without touching the model;
/// invoking an external runtime on zero rows may be undefined behavior.
/// A model returning the wrong number of outputs is a fatal setup error.
pub fn predict(model: &dyn ScoringModel, batch: &[Encoded]) -> Result<Vec<f64>, GactError> {
    if batch.is_empty() {
        return Ok(Vec::new());
    }

    let scores = model.call(batch)?;
    if scores.len() != batch.len() {
        return Err(GactError::Config(format!(
            "model returned {} outputs for {} inputs",
            scores.len(),
            batch.len()
        )));
    }

    debug!("scored batch of {}", batch.len());
    Ok(scores)
}

/// Companion metadata shipped alongside a serialized model.
///
/// The model directory carries `assets.extra/context_nt.arg` (single
/// integer line) and `assets.extra/default_threshold.arg` (single float
/// line). The serialized network itself is opaque to this crate.
#[derive(Debug, Clone, Copy)]
pub struct ModelMeta {
    pub context_nt: usize,
    pub default_threshold: f64,
}

impl ModelMeta {
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, GactError> {
        let dir = dir.as_ref();

        let context_nt = read_arg(dir, "context_nt.arg")?
            .parse::<usize>()
            .map_err(|e| {
                GactError::Config(format!("bad context_nt.arg in {}: {}", dir.display(), e))
            })?;
        let default_threshold = read_arg(dir, "default_threshold.arg")?
            .parse::<f64>()
            .map_err(|e| {
                GactError::Config(format!(
                    "bad default_threshold.arg in {}: {}",
                    dir.display(),
                    e
                ))
            })?;

        Ok(Self {
            context_nt,
            default_threshold,
        })
    }
}

fn read_arg(dir: &Path, name: &str) -> Result<String, GactError> {
    let path = dir.join("assets.extra").join(name);
    if !path.is_file() {
        return Err(GactError::Config(format!(
            "model {} should have an assets.extra/{} file",
            dir.display(),
            name
        )));
    }

    let contents = std::fs::read_to_string(&path)?;
    let line = contents.lines().next().unwrap_or("").trim();
    if line.is_empty() {
        return Err(GactError::Config(format!("{} is empty", path.display())));
    }
    Ok(line.to_string())
}

/// A scoring model hosted by an external runner process.
///
/// The runner is invoked as `<program> [args...] <model_dir>`, receives
/// one flattened encoding per stdin line (row-major, tab-separated
/// floats) and writes one score per stdout line.
pub struct CommandModel {
    program: PathBuf,
    args: Vec<String>,
    model_dir: PathBuf,
}

impl CommandModel {
    /// `runner` is a whitespace-split command line, e.g.
    /// `"python3 run_model.py"`. The program is resolved on PATH.
    pub fn new<P: AsRef<Path>>(runner: &str, model_dir: P) -> Result<Self, GactError> {
        let mut parts = runner.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| GactError::Config("empty runner command".to_string()))?;
        let program = which::which(program)
            .map_err(|e| GactError::Config(format!("runner {:?}: {}", program, e)))?;

        Ok(Self {
            program,
            args: parts.map(|s| s.to_string()).collect(),
            model_dir: model_dir.as_ref().to_path_buf(),
        })
    }
}

impl ScoringModel for CommandModel {
    fn call(&self, batch: &[Encoded]) -> Result<Vec<f64>, GactError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(&self.model_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()?;

        let payload = batch.iter().map(|enc| flatten(enc)).join("\n") + "\n";

        // Feed stdin from a thread so a runner that streams its output
        // cannot deadlock against us.
        let mut stdin = child.stdin.take().expect("stdin was piped");
        let feeder = std::thread::spawn(move || stdin.write_all(payload.as_bytes()));

        let output = child.wait_with_output()?;
        feeder
            .join()
            .map_err(|_| GactError::Model("runner stdin feeder panicked".to_string()))??;

        if !output.status.success() {
            return Err(GactError::Model(format!(
                "{} exited with {}",
                self.program.display(),
                output.status
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| GactError::Model(format!("runner output is not UTF-8: {}", e)))?;
        stdout
            .lines()
            .map(|line| {
                line.trim().parse::<f64>().map_err(|e| {
                    GactError::Model(format!("bad score line {:?} from runner: {}", line, e))
                })
            })
            .collect()
    }
}

/// One encoding as a single tab-separated line, row-major
pub fn flatten(enc: &Encoded) -> String {
    enc.iter().flatten().map(|v| v.to_string()).join("\t")
}
