//! CSV report export

use std::io::Write;
use std::path::{Path, PathBuf};

use grading::{GradeReport, Warnings};

use crate::Result;

pub const REPORT_HEADER: [&str; 8] = [
    "Presentation",
    "Structure",
    "Fonts",
    "Images",
    "Warnings",
    "Slide 1",
    "Slide 2",
    "Slide 3",
];

/// Where a deck's report goes when no path is given
pub fn default_export_path(deck_name: &str) -> PathBuf {
    let dir = dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("downloads")))
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join(format!("{}.csv", deck_name))
}

/// Header and one row: category summaries, then warning buckets
pub fn write_report<W: Write>(writer: W, report: &GradeReport, warnings: &Warnings) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(REPORT_HEADER)?;
    csv.write_record([
        report.presentation.summary(),
        report.structure.summary(),
        report.fonts.summary(),
        report.images.summary(),
        warnings.global.join("\n"),
        warnings.slide(1).join("\n"),
        warnings.slide(2).join("\n"),
        warnings.slide(3).join("\n"),
    ])?;
    csv.flush()?;
    Ok(())
}

/// Write the report to `path`, creating parent directories
pub fn export_report(path: &Path, report: &GradeReport, warnings: &Warnings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_report(file, report, warnings)?;
    tracing::info!("Exported report to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grading::{CategoryReport, Check, Grade};
    use tempfile::TempDir;

    fn report() -> GradeReport {
        GradeReport {
            presentation: CategoryReport::new(vec![
                Check::new("Aspect ratio 16:9", true),
                Check::new("Landscape orientation", true),
            ]),
            structure: CategoryReport::new(vec![Check::new("3 slides in the presentation", false)]),
            fonts: CategoryReport::new(vec![Check::new("Font sizes", true)]),
            images: CategoryReport::new(vec![Check::new("Original images", true)]),
            layout: None,
            grade: Grade::Partial,
        }
    }

    fn warnings() -> Warnings {
        Warnings {
            global: vec!["Slide transition on slide 1.".into(), "Animations on objects: 2.".into()],
            slides: [vec!["Image Photo with ID 5".into()], Vec::new(), Vec::new()],
        }
    }

    #[test]
    fn test_write_report() {
        let mut out = Vec::new();
        write_report(&mut out, &report(), &warnings()).unwrap();

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, REPORT_HEADER);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(&row[0], "Aspect ratio 16:9: Passed\nLandscape orientation: Passed");
        assert_eq!(&row[1], "3 slides in the presentation: Failed");
        assert_eq!(&row[4], "Slide transition on slide 1.\nAnimations on objects: 2.");
        assert_eq!(&row[5], "Image Photo with ID 5");
        assert_eq!(&row[7], "");
    }

    #[test]
    fn test_export_report_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports").join("deck.csv");
        export_report(&path, &report(), &warnings()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Presentation,Structure,Fonts,Images,Warnings,Slide 1,Slide 2,Slide 3"));
    }

    #[test]
    fn test_default_export_path() {
        let path = default_export_path("coursework");
        assert_eq!(path.file_name().unwrap(), "coursework.csv");
    }
}
