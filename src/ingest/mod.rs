//! Plain-text extraction for the supported document types
//!
//! The upload allow-list is {pdf, txt, doc, docx, csv}; each type gets a
//! best-effort text extractor. Output feeds the chunker, so formatting
//! fidelity matters less than not losing content.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::errors::DocChatError;
use crate::errors::Result;
use crate::store::file_extension;

/// Extract plain text from a staged file, dispatching on extension
pub fn extract_text(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = file_extension(&name).unwrap_or_default();

    debug!("Extracting text from {name} (type: {ext})");

    let text = match ext.as_str() {
        "txt" => read_utf8(path)?,
        "csv" => extract_csv(path)?,
        "pdf" => extract_pdf(path)?,
        "docx" => extract_docx(path)?,
        "doc" => extract_doc(path)?,
        other => return Err(DocChatError::UnsupportedFileType(other.to_string())),
    };

    Ok(text)
}

fn read_utf8(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Flatten CSV rows into comma-joined lines so cell values stay queryable
fn extract_csv(path: &Path) -> Result<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| extraction_error(path, e))?;

    let mut out = String::new();
    for record in reader.records() {
        let record = record.map_err(|e| extraction_error(path, e))?;
        let line: Vec<&str> = record.iter().collect();
        out.push_str(&line.join(", "));
        out.push('\n');
    }
    Ok(out)
}

fn extract_pdf(path: &Path) -> Result<String> {
    pdf_extract::extract_text(path).map_err(|e| extraction_error(path, e))
}

/// Pull text out of a docx container: word/document.xml with tags stripped
fn extract_docx(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| extraction_error(path, e))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| extraction_error(path, e))?
        .read_to_string(&mut xml)
        .map_err(|e| extraction_error(path, e))?;

    // Paragraph ends become line breaks before the tags are stripped
    let xml = xml.replace("</w:p>", "</w:p>\n");
    let tag_re = regex::Regex::new(r"<[^>]+>").expect("valid regex");
    let text = tag_re.replace_all(&xml, "");

    Ok(decode_entities(&text))
}

/// Legacy .doc fallback: keep printable runs from the binary stream
fn extract_doc(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;

    let mut out = String::new();
    let mut run = String::new();
    for &b in &bytes {
        let c = b as char;
        if c.is_ascii_graphic() || c == ' ' {
            run.push(c);
        } else {
            if run.trim().len() >= 4 {
                out.push_str(run.trim());
                out.push('\n');
            }
            run.clear();
        }
    }
    if run.trim().len() >= 4 {
        out.push_str(run.trim());
        out.push('\n');
    }
    Ok(out)
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
}

fn extraction_error(path: &Path, err: impl std::fmt::Display) -> DocChatError {
    DocChatError::Extraction {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        reason: err.to_string(),
    }
}
