//! Prompt assembly for document question answering

use crate::index::ScoredChunk;

/// Join retrieved chunks into a context block with source markers
pub fn assemble_context(hits: &[ScoredChunk]) -> String {
    let mut context = String::new();
    for hit in hits {
        context.push_str(&format!("[{} #{}]\n{}\n\n", hit.doc_name, hit.ordinal, hit.text));
    }
    context
}

/// Build the question-answering prompt
pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        r"You are an assistant answering questions about the user's uploaded documents.

Context: The following excerpts were retrieved from the documents and may be relevant to the question:

{context}

Question: {question}

Instructions:
1. Answer using only the excerpts above
2. When citing information, mention the source document name
3. If the excerpts do not contain the answer, say so
4. Be concise but informative

Answer:"
    )
}
