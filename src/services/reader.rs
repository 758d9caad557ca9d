use crate::error::{BookDistillerError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use url::Url;

/// One page-oriented document, addressable page by page.
///
/// The pipeline only ever needs the page count and the plain text of a
/// single page, so stand-ins for tests are trivial to write.
pub trait PageSource: Send + Sync {
    fn page_count(&self) -> usize;
    fn page_text(&self, index: usize) -> Result<String>;
}

pub struct PdfPages {
    doc: lopdf::Document,
    page_numbers: Vec<u32>,
}

impl PdfPages {
    pub fn open(path: &Path) -> Result<Self> {
        let doc = lopdf::Document::load(path)?;
        Ok(Self::from_document(doc))
    }

    pub fn from_document(doc: lopdf::Document) -> Self {
        // BTreeMap keys, so page numbers come out in reading order.
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        Self { doc, page_numbers }
    }
}

impl PageSource for PdfPages {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Result<String> {
        let number = self.page_numbers.get(index).copied().ok_or(
            BookDistillerError::PageOutOfRange {
                index,
                pages: self.page_numbers.len(),
            },
        )?;
        Ok(self.doc.extract_text(&[number])?)
    }
}

/// Plain-text book with form-feed page separators, the format `pdftotext`
/// emits.
pub struct TextPages {
    pages: Vec<String>,
}

impl TextPages {
    pub async fn open(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        Ok(Self::from_content(&content))
    }

    pub fn from_content(content: &str) -> Self {
        let mut pages: Vec<String> = content.split('\u{c}').map(|s| s.to_string()).collect();
        // pdftotext terminates every page with a form feed; don't let the
        // trailing separator produce a phantom empty page.
        if pages.last().map_or(false, |p| p.is_empty()) {
            pages.pop();
        }
        Self { pages }
    }
}

impl PageSource for TextPages {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String> {
        self.pages
            .get(index)
            .cloned()
            .ok_or(BookDistillerError::PageOutOfRange {
                index,
                pages: self.pages.len(),
            })
    }
}

/// Open a staged book as a page source, routed by file extension.
pub async fn open_pages(path: &Path) -> Result<Box<dyn PageSource>> {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        info!("Opening PDF: {}", path.display());
        let owned = path.to_path_buf();
        let pdf = tokio::task::spawn_blocking(move || PdfPages::open(&owned))
            .await
            .map_err(|e| {
                BookDistillerError::Anyhow(anyhow::anyhow!("PDF load task failed: {e}"))
            })??;
        Ok(Box::new(pdf))
    } else {
        info!("Opening text book: {}", path.display());
        Ok(Box::new(TextPages::open(path).await?))
    }
}

pub struct SourceFetcher;

impl SourceFetcher {
    /// Ensure the book is present in `pdf_dir` and return its staged path
    /// together with the document identifier (the file stem).
    ///
    /// URLs are downloaded, local paths copied; both are skipped when the
    /// staged copy already exists.
    pub async fn stage(source: &str, pdf_dir: &Path) -> Result<(PathBuf, String)> {
        let staged = if Self::is_url(source) {
            Self::stage_from_url(source, pdf_dir).await?
        } else {
            Self::stage_from_file(source, pdf_dir).await?
        };

        let document = Self::document_stem(&staged);
        debug!("Staged '{}' as document '{}'", staged.display(), document);
        Ok((staged, document))
    }

    async fn stage_from_url(url: &str, pdf_dir: &Path) -> Result<PathBuf> {
        let parsed_url = Url::parse(url)?;
        let filename = Self::filename_from_url(&parsed_url);
        let dest = pdf_dir.join(&filename);

        if dest.exists() {
            info!("Book already staged: {}", dest.display());
            return Ok(dest);
        }

        info!("Downloading book from URL: {}", url);
        let client = reqwest::Client::new();
        let response = client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(BookDistillerError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        fs::write(&dest, &bytes).await?;
        info!("Downloaded {} bytes to {}", bytes.len(), dest.display());

        Ok(dest)
    }

    async fn stage_from_file(file_path: &str, pdf_dir: &Path) -> Result<PathBuf> {
        let path = Path::new(file_path);
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("book.pdf")
            .to_string();
        let dest = pdf_dir.join(&filename);

        if dest.exists() {
            info!("Book already staged: {}", dest.display());
            return Ok(dest);
        }

        if !path.exists() {
            return Err(BookDistillerError::SourceNotFound {
                path: file_path.to_string(),
            });
        }

        fs::copy(path, &dest).await?;
        info!("Copied book into analysis directory: {}", dest.display());

        Ok(dest)
    }

    pub fn is_url(source: &str) -> bool {
        source.starts_with("http://") || source.starts_with("https://")
    }

    pub fn document_stem(path: &Path) -> String {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("book")
            .to_string()
    }

    fn filename_from_url(url: &Url) -> String {
        url.path_segments()
            .and_then(|segments| segments.last())
            .and_then(|name| if name.is_empty() { None } else { Some(name) })
            .unwrap_or("downloaded.pdf")
            .to_string()
    }
}
