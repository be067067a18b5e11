//! Basic Pipeline
//!
//! The minimal example: cut a document into token-bounded chunks, send each
//! one through a transform, and merge the results.
//!
//! ```bash
//! RUST_LOG=seams=debug cargo run --example 01_basic_pipeline
//! ```

use seams::{
    ChunkAssembler, Pipeline, PipelineConfig, TokenBudget, TransformError, WordCounter,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seams=info".into()),
        )
        .init();

    let document = "Machine learning models learn patterns from data. \
        They generalize these patterns to make predictions.\n\n\
        This is fundamentally different from traditional programming. \
        Deep learning extends this with multiple hidden layers. \
        Each layer learns increasingly abstract representations.\n\n\
        REFERENCES\n\n\
        [1] Someone. A paper. 2020.";

    // Stand-in for a model call: collapse blank lines, fail on one chunk
    let clean = |chunk: &str| -> Result<String, TransformError> {
        if chunk.contains("hidden") {
            return Err(TransformError::new("model unavailable"));
        }
        Ok(chunk.replace("\n\n", "\n"))
    };

    let assembler = ChunkAssembler::new(WordCounter, TokenBudget::new(16).unwrap());
    let pipeline = Pipeline::new(assembler, clean)
        .with_config(PipelineConfig::new().with_strip_references(true));

    let output = match pipeline.run(document) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("pipeline failed: {e}");
            return;
        }
    };

    println!("Document: {} bytes", document.len());
    println!("Chunks: {}\n", output.chunks.len());

    for outcome in &output.chunks {
        println!(
            "[{}] {} tokens, oversized: {}, fell back: {}",
            outcome.index,
            outcome.tokens,
            outcome.oversized,
            outcome.fell_back()
        );
    }

    println!("\nMerged ({} bytes):\n{}", output.text.len(), output.text);
}
