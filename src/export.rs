use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use log::info;

use crate::error::ModelError;
use crate::models::Project;

const EXPORT_STEM: &str = "projects";
const CSV_HEADERS: [&str; 5] = ["Name", "Client", "Budget", "Profitability", "Status"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Pdf,
    Csv,
    Excel,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Csv => "csv",
            Self::Excel => "excel",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Csv => "csv",
            Self::Excel => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Csv => "text/csv",
            Self::Excel => "application/vnd.ms-excel",
        }
    }

    pub fn filename(&self) -> String {
        format!("{EXPORT_STEM}.{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(Self::Pdf),
            "csv" => Ok(Self::Csv),
            "excel" => Ok(Self::Excel),
            _ => Err(ModelError::InvalidExportFormat {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: &'static str,
}

/// Serializes projects for download.
///
/// Only the CSV output is a real format. The PDF and Excel payloads are
/// pretty-printed JSON carrying the document MIME type, so consumers that
/// expect genuine documents must not rely on them.
pub fn format_export(projects: &[&Project], format: ExportFormat) -> anyhow::Result<ExportPayload> {
    let bytes = match format {
        ExportFormat::Csv => to_csv(projects)?,
        ExportFormat::Pdf | ExportFormat::Excel => serde_json::to_vec_pretty(projects)
            .with_context(|| format!("failed to serialize {format} export"))?,
    };

    Ok(ExportPayload {
        bytes,
        filename: format.filename(),
        mime_type: format.mime_type(),
    })
}

/// Fields are written verbatim: embedded commas and quotes are not escaped.
fn to_csv(projects: &[&Project]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADERS)?;
    for project in projects {
        let budget = project.budget.to_string();
        let profitability = project.profitability.to_string();
        writer.write_record([
            project.name.as_str(),
            project.client.as_deref().unwrap_or(""),
            budget.as_str(),
            profitability.as_str(),
            project.status.as_str(),
        ])?;
    }

    let mut bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("failed to flush csv export: {}", err.error()))?;
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    Ok(bytes)
}

/// Hands a finished export to whatever persists it for the user.
pub trait DownloadTrigger {
    fn save(&self, payload: &ExportPayload) -> anyhow::Result<PathBuf>;
}

/// Saves exports as files inside a directory.
#[derive(Debug, Clone)]
pub struct DirectoryDownload {
    dir: PathBuf,
}

impl DirectoryDownload {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadTrigger for DirectoryDownload {
    fn save(&self, payload: &ExportPayload) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.dir.join(&payload.filename);
        std::fs::write(&path, &payload.bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(
            "Saved {} ({}, {} bytes)",
            path.display(),
            payload.mime_type,
            payload.bytes.len()
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectStatus;

    fn neo() -> Project {
        Project {
            name: "Neo".to_string(),
            client: Some("Acme".to_string()),
            budget: 70000,
            profitability: 4000,
            hours: "1:00".to_string(),
            status: ProjectStatus::Warning,
            over_by: "800 left hours".to_string(),
            start_date: None,
            end_date: None,
        }
    }

    #[test]
    fn csv_has_header_and_one_line_per_project() {
        let project = neo();
        let payload = format_export(&[&project], ExportFormat::Csv).unwrap();
        let text = String::from_utf8(payload.bytes).unwrap();
        assert_eq!(
            text,
            "Name,Client,Budget,Profitability,Status\nNeo,Acme,70000,4000,warning"
        );
        assert_eq!(payload.filename, "projects.csv");
        assert_eq!(payload.mime_type, "text/csv");
    }

    #[test]
    fn csv_leaves_missing_client_blank_and_does_not_quote() {
        let mut project = neo();
        project.name = "Neo, Phase 2".to_string();
        project.client = None;
        project.profitability = -2500;
        project.status = ProjectStatus::Over;

        let payload = format_export(&[&project], ExportFormat::Csv).unwrap();
        let text = String::from_utf8(payload.bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "Neo, Phase 2,,70000,-2500,over");
    }

    #[test]
    fn csv_of_no_projects_is_just_the_header() {
        let payload = format_export(&[], ExportFormat::Csv).unwrap();
        assert_eq!(payload.bytes, b"Name,Client,Budget,Profitability,Status".to_vec());
    }

    #[test]
    fn document_formats_carry_json_under_their_mime_types() {
        let project = neo();
        let pdf = format_export(&[&project], ExportFormat::Pdf).unwrap();
        assert_eq!(pdf.filename, "projects.pdf");
        assert_eq!(pdf.mime_type, "application/pdf");
        let parsed: serde_json::Value = serde_json::from_slice(&pdf.bytes).unwrap();
        assert_eq!(parsed[0]["name"], "Neo");
        assert_eq!(parsed[0]["overBy"], "800 left hours");

        let excel = format_export(&[&project], ExportFormat::Excel).unwrap();
        assert_eq!(excel.filename, "projects.xlsx");
        assert_eq!(excel.mime_type, "application/vnd.ms-excel");
        assert_eq!(excel.bytes, pdf.bytes);
    }

    #[test]
    fn directory_download_writes_payload() {
        let temp = tempfile::tempdir().unwrap();
        let trigger = DirectoryDownload::new(temp.path().join("exports"));
        let project = neo();
        let payload = format_export(&[&project], ExportFormat::Csv).unwrap();

        let path = trigger.save(&payload).unwrap();
        assert_eq!(path, temp.path().join("exports").join("projects.csv"));
        assert_eq!(std::fs::read(path).unwrap(), payload.bytes);
    }

    #[test]
    fn formats_parse_from_names() {
        assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert!("docx".parse::<ExportFormat>().is_err());
    }
}
