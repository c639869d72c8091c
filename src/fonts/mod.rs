//! Font discovery for the brief.
//!
//! `genpdf` needs TrueType files for text metrics even when the PDF references one of the builtin
//! fonts.  Directories are searched in order: an explicit directory (configuration or the
//! `PROPWELL_BRIEF_FONTS_DIR` environment variable), `assets/fonts` next to the executable,
//! `assets/fonts` in this crate, then the usual system font locations.  In every directory the
//! families below are tried in order.  Liberation Sans and Arial share Helvetica's metrics, so
//! they are emitted as the builtin Helvetica and nothing is embedded; DejaVu Sans is embedded.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{FontData, FontFamily};
use log::{debug, info, warn};
use printpdf::BuiltinFont;

/// Environment variable naming a directory with the brand fonts.
pub const FONTS_DIR_ENV: &str = "PROPWELL_BRIEF_FONTS_DIR";

struct FamilyFiles {
    name: &'static str,
    files: [&'static str; 4],
    builtin: Option<[BuiltinFont; 4]>,
}

const HELVETICA: [BuiltinFont; 4] = [
    BuiltinFont::Helvetica,
    BuiltinFont::HelveticaBold,
    BuiltinFont::HelveticaOblique,
    BuiltinFont::HelveticaBoldOblique,
];

const FAMILIES: &[FamilyFiles] = &[
    FamilyFiles {
        name: "Liberation Sans",
        files: [
            "LiberationSans-Regular.ttf",
            "LiberationSans-Bold.ttf",
            "LiberationSans-Italic.ttf",
            "LiberationSans-BoldItalic.ttf",
        ],
        builtin: Some(HELVETICA),
    },
    FamilyFiles {
        name: "Arial",
        files: ["arial.ttf", "arialbd.ttf", "ariali.ttf", "arialbi.ttf"],
        builtin: Some(HELVETICA),
    },
    FamilyFiles {
        name: "DejaVu Sans",
        files: [
            "DejaVuSans.ttf",
            "DejaVuSans-Bold.ttf",
            "DejaVuSans-Oblique.ttf",
            "DejaVuSans-BoldOblique.ttf",
        ],
        builtin: None,
    },
];

const SYSTEM_DIRECTORIES: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/liberation",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu-sans-fonts",
    "/usr/share/fonts/dejavu",
    "/Library/Fonts",
    "/System/Library/Fonts/Supplemental",
];

/// Where the loaded family came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontSource {
    /// Display name of the family.
    pub family: &'static str,
    /// Directory the TrueType files were read from.
    pub directory: PathBuf,
    /// Whether the PDF references builtin Helvetica instead of embedding the files.
    pub builtin: bool,
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn push_unique(candidates: &mut Vec<PathBuf>, candidate: PathBuf) {
    if !candidates.iter().any(|existing| existing == &candidate) {
        candidates.push(candidate);
    }
}

fn bundled_directories(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = explicit {
        push_unique(&mut candidates, path.to_path_buf());
    }
    if let Some(path) = env_path(FONTS_DIR_ENV) {
        push_unique(&mut candidates, path);
    }
    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            push_unique(&mut candidates, bin_dir.join("assets/fonts"));
        }
    }
    push_unique(
        &mut candidates,
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts"),
    );

    candidates
}

fn system_directories() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    for dir in SYSTEM_DIRECTORIES {
        push_unique(&mut candidates, PathBuf::from(dir));
    }
    if let Some(user_fonts) = dirs::font_dir() {
        push_unique(&mut candidates, user_fonts);
    }
    for var in ["WINDIR", "SystemRoot"] {
        if let Some(root) = env_path(var) {
            push_unique(&mut candidates, root.join("Fonts"));
        }
    }

    candidates
}

fn load_family(directory: &Path, family: &FamilyFiles) -> Result<FontFamily<FontData>, Error> {
    let load = |index: usize| {
        let path = directory.join(family.files[index]);
        let builtin = family.builtin.as_ref().map(|fonts| fonts[index].clone());
        FontData::load(&path, builtin).map_err(|err| {
            Error::new(
                format!("failed to load {}: {}", path.display(), err),
                io::Error::new(io::ErrorKind::Other, err.to_string()),
            )
        })
    };

    Ok(FontFamily {
        regular: load(0)?,
        bold: load(1)?,
        italic: load(2)?,
        bold_italic: load(3)?,
    })
}

fn has_family(directory: &Path, family: &FamilyFiles) -> bool {
    family.files.iter().all(|file| directory.join(file).is_file())
}

fn search(
    directories: &[PathBuf],
    attempts: &mut Vec<String>,
) -> Option<(FontFamily<FontData>, FontSource)> {
    for directory in directories {
        if !directory.is_dir() {
            debug!("font directory {} does not exist", directory.display());
            attempts.push(format!("{} (missing)", directory.display()));
            continue;
        }
        for family in FAMILIES {
            if !has_family(directory, family) {
                continue;
            }
            match load_family(directory, family) {
                Ok(fonts) => {
                    let source = FontSource {
                        family: family.name,
                        directory: directory.clone(),
                        builtin: family.builtin.is_some(),
                    };
                    return Some((fonts, source));
                }
                Err(err) => {
                    warn!("skipping {} in {}: {}", family.name, directory.display(), err);
                    attempts.push(format!("{} ({})", directory.display(), err));
                }
            }
        }
        debug!("no usable font family in {}", directory.display());
        attempts.push(format!("{} (no complete family)", directory.display()));
    }
    None
}

/// Finds and loads the first usable font family.
pub fn resolve_font_family(
    explicit: Option<&Path>,
) -> Result<(FontFamily<FontData>, FontSource), Error> {
    let mut attempts = Vec::new();

    if let Some(found) = search(&bundled_directories(explicit), &mut attempts) {
        info!("using {} fonts from {}", found.1.family, found.1.directory.display());
        return Ok(found);
    }
    if let Some(found) = search(&system_directories(), &mut attempts) {
        warn!(
            "bundled fonts unavailable; falling back to system {} in {}",
            found.1.family,
            found.1.directory.display()
        );
        return Ok(found);
    }

    Err(Error::new(
        format!(
            "no usable font family found. Checked: {}. Set {} to a directory with Liberation Sans, Arial or DejaVu Sans.",
            attempts.join(", "),
            FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "fonts not found"),
    ))
}

/// Indicates whether any candidate directory holds a complete supported family.
pub fn fonts_available(explicit: Option<&Path>) -> bool {
    bundled_directories(explicit)
        .into_iter()
        .chain(system_directories())
        .any(|directory| FAMILIES.iter().any(|family| has_family(&directory, family)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_directory_is_searched_first() {
        let explicit = Path::new("/opt/brand/fonts");
        let candidates = bundled_directories(Some(explicit));
        assert_eq!(candidates.first().map(PathBuf::as_path), Some(explicit));
        assert!(candidates
            .iter()
            .any(|dir| dir.ends_with("assets/fonts") && dir.starts_with(env!("CARGO_MANIFEST_DIR"))));
    }

    #[test]
    fn candidates_are_unique() {
        let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
        let candidates = bundled_directories(Some(&manifest));
        let count = candidates.iter().filter(|dir| **dir == manifest).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn metric_compatible_families_use_builtin_helvetica() {
        for family in FAMILIES {
            let expected = family.name != "DejaVu Sans";
            assert_eq!(family.builtin.is_some(), expected, "{}", family.name);
        }
    }

    #[test]
    fn empty_directory_has_no_family() {
        let dir = env::temp_dir().join(format!("propwell-brief-fonts-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let mut attempts = Vec::new();
        assert!(search(&[dir.clone()], &mut attempts).is_none());
        assert_eq!(attempts.len(), 1);
        std::fs::remove_dir_all(&dir).ok();
    }
}
