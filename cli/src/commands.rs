//! Command-line interface and command handlers

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use deck_model::{Deck, DeckSession, JsonDeckProvider};
use grading::{CategoryReport, GradeReport, Grader, Warnings, WarningsCollector};
use layout_engine::{GeometryResolver, LayoutTemplate};
use serde::Serialize;
use store::{
    default_export_path, export_report, import_reference_images, load_reference_images, AverageHasher,
    LayoutStore, RubricStore, StoreError,
};

use crate::state::AppPaths;

#[derive(Parser, Debug)]
#[command(name = "deck-grader", about = "Grade slide decks against a layout and typography rubric", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding rubric.toml, layouts.toml and original_images/
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Log decisions at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Grade a deck snapshot
    Grade(GradeArgs),

    /// List advisory warnings for a deck snapshot
    Warnings {
        /// Deck snapshot (JSON)
        deck: PathBuf,
    },

    /// List layout templates
    Layouts,

    /// Add or update a layout template
    AddLayout {
        /// Template name
        name: String,
        /// Zones as `<kind>_<slide>=<rect>|<rect>`, e.g. `title_2=0-e,0-e,1-w,4-h`
        #[arg(long = "zone", required = true)]
        zones: Vec<String>,
    },

    /// Replace the reference image set with the images in a directory
    ImportReferences {
        /// Directory of .png/.jpg/.jpeg originals
        from: PathBuf,
    },

    /// Set a rubric value
    Set {
        /// Table: analyze or constants
        section: String,
        key: String,
        value: String,
    },
}

#[derive(Args, Debug)]
pub struct GradeArgs {
    /// Deck snapshot (JSON)
    pub deck: PathBuf,

    /// Reference image directory, overriding the managed set
    #[arg(long)]
    pub references: Option<PathBuf>,

    /// Write a CSV report
    #[arg(long)]
    pub export: bool,

    /// CSV report path; defaults to the downloads directory
    #[arg(long, requires = "export")]
    pub output: Option<PathBuf>,
}

impl Cli {
    pub fn paths(&self) -> AppPaths {
        match &self.config_dir {
            Some(dir) => AppPaths::new(dir),
            None => AppPaths::from_platform(),
        }
    }

    /// Run the command and return what should be printed
    pub fn run(&self) -> Result<String> {
        let paths = self.paths();
        match &self.command {
            Commands::Grade(args) => grade(&paths, args, self.json),
            Commands::Warnings { deck } => warnings(&paths, deck, self.json),
            Commands::Layouts => layouts(&paths, self.json),
            Commands::AddLayout { name, zones } => add_layout(&paths, name, zones),
            Commands::ImportReferences { from } => import_references(&paths, from),
            Commands::Set {
                section,
                key,
                value,
            } => set(&paths, section, key, value),
        }
    }
}

#[derive(Serialize)]
struct GradeOutput<'a> {
    deck: &'a str,
    report: &'a GradeReport,
    warnings: &'a Warnings,
}

fn grader(paths: &AppPaths, references: Option<&Path>) -> Result<Grader> {
    let rubric_store = RubricStore::load(paths.rubric())?;
    let rubric = rubric_store.rubric().context("Invalid rubric")?;
    let calibration = rubric_store.calibration().context("Invalid rubric constants")?;
    let registry = LayoutStore::load(paths.layouts())?
        .registry()
        .context("Invalid layout file")?;

    let grader = Grader::new(rubric, registry, calibration);
    let dir = references.map(Path::to_path_buf).unwrap_or_else(|| paths.references());
    match load_reference_images(&dir, &AverageHasher) {
        Ok(references) => Ok(grader.with_references(references, Box::new(AverageHasher))),
        Err(StoreError::ReferenceSetMissing(dir)) => {
            tracing::warn!("Reference images not found at {}", dir.display());
            Ok(grader)
        }
        Err(e) => Err(e).context("Failed to load reference images"),
    }
}

fn grade(paths: &AppPaths, args: &GradeArgs, json: bool) -> Result<String> {
    let grader = grader(paths, args.references.as_deref())?;
    let provider = JsonDeckProvider::new();
    let mut session = DeckSession::open(&provider, &args.deck)
        .with_context(|| format!("Failed to open {}", args.deck.display()))?;

    let report = grader.grade(session.deck_mut())?;
    let warnings = WarningsCollector::new(grader.resolver()).collect(session.deck_mut())?;
    let name = session.deck().name().to_string();
    session.close()?;

    let mut out = if json {
        serde_json::to_string_pretty(&GradeOutput {
            deck: &name,
            report: &report,
            warnings: &warnings,
        })?
    } else {
        format_report(&name, &report, &warnings)
    };

    if args.export {
        let path = args.output.clone().unwrap_or_else(|| default_export_path(&name));
        export_report(&path, &report, &warnings)?;
        if !json {
            let _ = write!(out, "\nReport written to {}", path.display());
        }
    }
    Ok(out)
}

fn warnings(paths: &AppPaths, deck: &Path, json: bool) -> Result<String> {
    let calibration = RubricStore::load(paths.rubric())?.calibration()?;
    let resolver = GeometryResolver::new(calibration);
    let provider = JsonDeckProvider::new();
    let mut session =
        DeckSession::open(&provider, deck).with_context(|| format!("Failed to open {}", deck.display()))?;
    let warnings = WarningsCollector::new(&resolver).collect(session.deck_mut())?;
    session.close()?;

    if json {
        return Ok(serde_json::to_string_pretty(&warnings)?);
    }
    let mut out = String::new();
    write_warnings(&mut out, &warnings);
    Ok(out)
}

fn layouts(paths: &AppPaths, json: bool) -> Result<String> {
    let store = LayoutStore::load(paths.layouts())?;
    let registry = store.registry()?;
    if json {
        let names: Vec<&str> = registry.names().collect();
        return Ok(serde_json::to_string_pretty(&names)?);
    }

    let mut out = String::new();
    for template in registry.iter() {
        let _ = writeln!(out, "{}", template.name());
        for (key, value) in template.entries() {
            let _ = writeln!(out, "  {} = {}", key, value);
        }
    }
    Ok(out.trim_end().to_string())
}

fn add_layout(paths: &AppPaths, name: &str, zones: &[String]) -> Result<String> {
    let mut entries = Vec::with_capacity(zones.len());
    for zone in zones {
        let Some((key, value)) = zone.split_once('=') else {
            bail!("Zone {:?} must look like <kind>_<slide>=<rect>", zone);
        };
        entries.push((key.trim(), value.trim()));
    }
    let template = LayoutTemplate::from_entries(name, entries)?;

    let mut store = LayoutStore::load(paths.layouts())?;
    store.add_layout(&template);
    store.save()?;
    Ok(format!("Saved layout {} to {}", name, store.path().display()))
}

fn import_references(paths: &AppPaths, from: &Path) -> Result<String> {
    let into = paths.references();
    if !import_reference_images(from, &into)? {
        bail!("{} is not a directory", from.display());
    }
    Ok(format!("Imported reference images into {}", into.display()))
}

fn set(paths: &AppPaths, section: &str, key: &str, value: &str) -> Result<String> {
    let mut store = RubricStore::load(paths.rubric())?;
    store.update(section, key, value)?;
    Ok(format!("[{}] {} = {}", section, key, value))
}

fn write_category(out: &mut String, title: &str, category: &CategoryReport) {
    let _ = writeln!(out, "{}", title);
    for line in category.summary().lines() {
        let _ = writeln!(out, "  {}", line);
    }
}

fn write_warnings(out: &mut String, warnings: &Warnings) {
    let buckets = [
        ("Warnings", warnings.global.as_slice()),
        ("Slide 1", warnings.slide(1)),
        ("Slide 2", warnings.slide(2)),
        ("Slide 3", warnings.slide(3)),
    ];
    for (title, items) in buckets {
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}", title);
        for item in items {
            let _ = writeln!(out, "  {}", item);
        }
    }
}

fn format_report(name: &str, report: &GradeReport, warnings: &Warnings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", name);
    write_category(&mut out, "Presentation", &report.presentation);
    write_category(&mut out, "Structure", &report.structure);
    write_category(&mut out, "Fonts", &report.fonts);
    write_category(&mut out, "Images", &report.images);
    let _ = writeln!(out, "Layout: {}", report.layout.as_deref().unwrap_or("none"));
    let _ = writeln!(out, "Grade: {}", report.grade);
    write_warnings(&mut out, warnings);
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DECK: &str = r#"{
        "name": "coursework",
        "page": { "width": 960.0, "height": 540.0 },
        "slides": [
            { "shapes": [
                { "name": "Title 1", "id": 1,
                  "kind": { "type": "placeholder", "placeholder": "center_title" },
                  "geometry": { "left": 60.0, "top": 150.0, "width": 840.0, "height": 80.0 },
                  "text_frame": { "text": "Deck", "font": { "name": "Arial", "size": 40.0 } } }
            ] },
            { "transition": true, "shapes": [] }
        ]
    }"#;

    fn run(args: &[&str]) -> Result<String> {
        Cli::try_parse_from(args)?.run()
    }

    #[test]
    fn test_set_and_grade_with_config_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("config");
        let config = config.to_str().unwrap();
        let deck = temp_dir.path().join("deck.json");
        std::fs::write(&deck, DECK).unwrap();

        run(&["deck-grader", "--config-dir", config, "set", "analyze", "slides", "2"]).unwrap();
        let out = run(&["deck-grader", "--config-dir", config, "grade", deck.to_str().unwrap()]).unwrap();
        assert!(out.starts_with("coursework"));
        assert!(out.contains("2 slides in the presentation: Passed"));
        assert!(out.contains("Slide transition on slide 2."));
    }

    #[test]
    fn test_grade_json_and_export() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("config");
        let deck = temp_dir.path().join("deck.json");
        let csv = temp_dir.path().join("out").join("report.csv");
        std::fs::write(&deck, DECK).unwrap();

        let out = run(&[
            "deck-grader",
            "--config-dir",
            config.to_str().unwrap(),
            "--json",
            "grade",
            deck.to_str().unwrap(),
            "--export",
            "--output",
            csv.to_str().unwrap(),
        ])
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["deck"], "coursework");
        assert_eq!(value["report"]["grade"], 0);
        assert!(csv.exists());
    }

    #[test]
    fn test_add_layout_then_list() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().to_str().unwrap();

        run(&[
            "deck-grader",
            "--config-dir",
            config,
            "add-layout",
            "STACKED",
            "--zone",
            "title_2=0-e,0-e,1-w,4-h",
            "--zone",
            "text_2=0-e,4-h,1-w,4*3-h",
        ])
        .unwrap();
        let out = run(&["deck-grader", "--config-dir", config, "--json", "layouts"]).unwrap();
        let names: Vec<String> = serde_json::from_str(&out).unwrap();
        assert_eq!(names.last().map(String::as_str), Some("STACKED"));
    }

    #[test]
    fn test_add_layout_rejects_malformed_zone() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().to_str().unwrap();
        assert!(run(&["deck-grader", "--config-dir", config, "add-layout", "X", "--zone", "title_2"]).is_err());
        assert!(run(&["deck-grader", "--config-dir", config, "add-layout", "X", "--zone", "title_9=0-e,0-e,1-w,1-h"]).is_err());
    }

    #[test]
    fn test_import_references_requires_directory() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().to_str().unwrap();
        let missing = temp_dir.path().join("missing");
        assert!(run(&["deck-grader", "--config-dir", config, "import-references", missing.to_str().unwrap()]).is_err());
    }

    #[test]
    fn test_set_rejects_invalid_value() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().to_str().unwrap();
        assert!(run(&["deck-grader", "--config-dir", config, "set", "analyze", "aspect_ratio", "wide"]).is_err());
    }
}
