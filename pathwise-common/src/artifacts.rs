//! On-disk model artifacts
//!
//! Five vocabularies and three forests, one bincode file each, loaded
//! read-only at service startup. The training job stages all eight files in a
//! sibling directory and swaps it in with renames, so a reader never sees new
//! vocabularies next to old forests. A reader that races the swap finds no
//! directory and gets `ModelUnavailable`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::encoder::{Career, Column, Degree, Field, PrimaryInterest, SecondaryInterest, Vocabulary};
use crate::forest::{Classifier, RandomForest};
use crate::{Error, Result};

pub const PRIMARY_VOCAB_FILE: &str = "le_interest_1.bin";
pub const SECONDARY_VOCAB_FILE: &str = "le_interest_2.bin";
pub const FIELD_VOCAB_FILE: &str = "le_suggested_field.bin";
pub const DEGREE_VOCAB_FILE: &str = "le_degree_options.bin";
pub const CAREER_VOCAB_FILE: &str = "le_career_paths.bin";
pub const FIELD_MODEL_FILE: &str = "field_model.bin";
pub const DEGREE_MODEL_FILE: &str = "degree_model.bin";
pub const CAREER_MODEL_FILE: &str = "career_model.bin";

/// The five per-column vocabularies
#[derive(Debug, Clone)]
pub struct LabelEncoders {
    pub primary: Vocabulary<PrimaryInterest>,
    pub secondary: Vocabulary<SecondaryInterest>,
    pub field: Vocabulary<Field>,
    pub degree: Vocabulary<Degree>,
    pub career: Vocabulary<Career>,
}

/// Everything the recommendation service needs to serve
#[derive(Debug)]
pub struct ModelBundle {
    pub encoders: LabelEncoders,
    pub field_model: RandomForest<Field>,
    pub degree_model: RandomForest<Degree>,
    pub career_model: RandomForest<Career>,
}

impl ModelBundle {
    /// Load all eight artifacts; any failure is `ModelUnavailable`
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::ModelUnavailable(format!(
                "models directory not found: {}",
                dir.display()
            )));
        }

        let encoders = LabelEncoders {
            primary: read_artifact(dir, PRIMARY_VOCAB_FILE)?,
            secondary: read_artifact(dir, SECONDARY_VOCAB_FILE)?,
            field: read_artifact(dir, FIELD_VOCAB_FILE)?,
            degree: read_artifact(dir, DEGREE_VOCAB_FILE)?,
            career: read_artifact(dir, CAREER_VOCAB_FILE)?,
        };

        let field_model: RandomForest<Field> = read_artifact(dir, FIELD_MODEL_FILE)?;
        let degree_model: RandomForest<Degree> = read_artifact(dir, DEGREE_MODEL_FILE)?;
        let career_model: RandomForest<Career> = read_artifact(dir, CAREER_MODEL_FILE)?;

        check_model(&field_model, &encoders.field, FIELD_MODEL_FILE)?;
        check_model(&degree_model, &encoders.degree, DEGREE_MODEL_FILE)?;
        check_model(&career_model, &encoders.career, CAREER_MODEL_FILE)?;

        info!(
            "Loaded models from {} (interests {}/{}, fields {}, degrees {}, careers {})",
            dir.display(),
            encoders.primary.len(),
            encoders.secondary.len(),
            encoders.field.len(),
            encoders.degree.len(),
            encoders.career.len()
        );

        Ok(Self {
            encoders,
            field_model,
            degree_model,
            career_model,
        })
    }

    /// Write all eight artifacts as one set, replacing any previous set in `dir`
    pub fn save(&self, dir: &Path) -> Result<()> {
        let name = dir
            .file_name()
            .ok_or_else(|| Error::Config(format!("invalid models directory: {}", dir.display())))?;
        let parent = match dir.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let staging = tempfile::Builder::new()
            .prefix(".pathwise-models-")
            .tempdir_in(parent)?;
        let staged = staging.path();

        write_artifact(staged, PRIMARY_VOCAB_FILE, &self.encoders.primary)?;
        write_artifact(staged, SECONDARY_VOCAB_FILE, &self.encoders.secondary)?;
        write_artifact(staged, FIELD_VOCAB_FILE, &self.encoders.field)?;
        write_artifact(staged, DEGREE_VOCAB_FILE, &self.encoders.degree)?;
        write_artifact(staged, CAREER_VOCAB_FILE, &self.encoders.career)?;
        write_artifact(staged, FIELD_MODEL_FILE, &self.field_model)?;
        write_artifact(staged, DEGREE_MODEL_FILE, &self.degree_model)?;
        write_artifact(staged, CAREER_MODEL_FILE, &self.career_model)?;

        let mut retired_name = OsString::from(".");
        retired_name.push(name);
        retired_name.push(".retired");
        let retired = parent.join(retired_name);
        if retired.exists() {
            fs::remove_dir_all(&retired)?;
        }

        let replacing = dir.exists();
        if replacing {
            fs::rename(dir, &retired)?;
        }
        if let Err(e) = fs::rename(staged, dir) {
            if replacing {
                if let Err(restore) = fs::rename(&retired, dir) {
                    warn!("Could not restore previous models at {}: {}", dir.display(), restore);
                }
            }
            return Err(Error::Io(e));
        }
        // The staging path is gone after the rename; dropping `staging` is a no-op
        drop(staging);

        if replacing {
            if let Err(e) = fs::remove_dir_all(&retired) {
                warn!("Could not remove retired models at {}: {}", retired.display(), e);
            }
        }

        info!("Saved models to {}", dir.display());
        Ok(())
    }
}

fn check_model<C: Column>(model: &RandomForest<C>, vocab: &Vocabulary<C>, file: &str) -> Result<()> {
    model
        .validate()
        .map_err(|e| Error::ModelUnavailable(format!("{}: {}", file, e)))?;
    if model.n_classes() != vocab.len() {
        return Err(Error::ModelUnavailable(format!(
            "{}: model has {} classes but {} vocabulary has {} labels",
            file,
            model.n_classes(),
            C::NAME,
            vocab.len()
        )));
    }
    Ok(())
}

fn read_artifact<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T> {
    let path = dir.join(name);
    let file = File::open(&path)
        .map_err(|e| Error::ModelUnavailable(format!("{}: {}", path.display(), e)))?;
    let value = bincode::deserialize_from(BufReader::new(file))
        .map_err(|e| Error::ModelUnavailable(format!("{}: {}", path.display(), e)))?;
    debug!("Read artifact {}", path.display());
    Ok(value)
}

fn write_artifact<T: Serialize>(dir: &Path, name: &str, value: &T) -> Result<()> {
    let temp_file = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        bincode::serialize_into(&mut writer, value)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        writer.flush()?;
    }
    temp_file.as_file().sync_all()?;
    let path = dir.join(name);
    temp_file.persist(&path).map_err(|e| Error::Io(e.error))?;
    debug!("Wrote artifact {}", path.display());
    Ok(())
}
