//! Overlapping text chunker feeding the embedding step

/// Splits document text into overlapping character windows
///
/// Windows prefer to end on whitespace so words are not cut mid-token,
/// and consecutive windows share `chunk_overlap` characters of context.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        // Overlap must leave room for forward progress
        let chunk_overlap = chunk_overlap.min(chunk_size / 2);
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split text into chunks; short input yields a single chunk
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < chars.len() {
            let mut end = (start + self.chunk_size).min(chars.len());

            // Pull the break back to whitespace when one is available in
            // the second half of the window
            if end < chars.len() {
                let floor = start + self.chunk_size / 2;
                if let Some(ws) = (floor..end).rev().find(|&i| chars[i].is_whitespace()) {
                    end = ws + 1;
                }
            }

            let piece: String = chars[start..end].iter().collect();
            let piece = piece.trim();
            if !piece.is_empty() {
                chunks.push(piece.to_string());
            }

            if end >= chars.len() {
                break;
            }
            start = end.saturating_sub(self.chunk_overlap).max(start + 1);
        }

        chunks
    }
}
