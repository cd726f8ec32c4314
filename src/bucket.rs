use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::navigate::CursorPosition;

pub const SUPPORTED_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg"];

const STEP_DELIMITER: &str = "__";
const TOKEN_DELIMITER: char = '_';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRow {
    pub step: u64,
    pub paths: Vec<PathBuf>,
}

/// Images grouped into rows of ascending step. Rows may differ in length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<StepRow>,
}

impl Grid {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[StepRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&StepRow> {
        self.rows.get(index)
    }

    pub fn row_len(&self, index: usize) -> Option<usize> {
        self.row(index).map(|row| row.paths.len())
    }

    pub fn path(&self, position: CursorPosition) -> Option<&Path> {
        self.row(position.row)
            .and_then(|row| row.paths.get(position.col))
            .map(PathBuf::as_path)
    }

    pub fn image_count(&self) -> usize {
        self.rows.iter().map(|row| row.paths.len()).sum()
    }
}

pub fn is_supported_image(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|extension| lower.ends_with(extension))
}

/// Extracts the step from names shaped like `<prefix>__<step>_<suffix>.<ext>`.
/// Whitespace around the step is ignored; negative steps are rejected.
pub fn parse_step(file_name: &str) -> Option<u64> {
    let segment = file_name.split(STEP_DELIMITER).nth(1)?;
    let token = segment.split(TOKEN_DELIMITER).next()?;
    token.trim().parse().ok()
}

pub fn bucket<I, P>(paths: I) -> Grid
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut by_step: BTreeMap<u64, Vec<PathBuf>> = BTreeMap::new();

    for path in paths {
        let path = path.into();
        let step = path
            .file_name()
            .and_then(|value| value.to_str())
            .and_then(parse_step);

        match step {
            Some(step) => by_step.entry(step).or_default().push(path),
            None => log::debug!("Skipping {}: no step in file name", path.display()),
        }
    }

    Grid {
        rows: by_step
            .into_iter()
            .map(|(step, paths)| StepRow { step, paths })
            .collect(),
    }
}

pub fn scan_folder(folder: &Path) -> Result<Grid> {
    let entries =
        fs::read_dir(folder).with_context(|| format!("Could not read folder {}", folder.display()))?;

    let mut file_names = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Could not list entry in {}", folder.display()))?;
        if entry.file_type().map(|kind| kind.is_dir()).unwrap_or(false) {
            continue;
        }

        let Ok(file_name) = entry.file_name().into_string() else {
            log::debug!("Skipping non UTF-8 file name in {}", folder.display());
            continue;
        };
        if is_supported_image(&file_name) {
            file_names.push(file_name);
        }
    }
    file_names.sort();

    let grid = bucket(file_names.iter().map(|name| folder.join(name)));
    log::info!(
        "Scanned {}: {} of {} images across {} steps",
        folder.display(),
        grid.image_count(),
        file_names.len(),
        grid.len()
    );
    Ok(grid)
}
