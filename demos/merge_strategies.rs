//! Merge Strategies Comparison
//!
//! Shows how the overlap window and minimum overlap change the merged text
//! when a transform echoes the end of the previous chunk.
//!
//! ```bash
//! cargo run --example merge_strategies
//! ```

use seams::OverlapMerger;

fn main() {
    println!("Overlap Merge Strategies");
    println!("========================\n");

    // The second chunk repeats " brown fox"; the third starts with a
    // coincidental "s" that matches the end of the second.
    let chunks = [
        "The quick brown fox",
        " brown fox jumps over the dogs",
        "s and cats.",
    ];

    for (label, merger) in [
        ("no window (plain concatenation)", OverlapMerger::new(0)),
        ("window 5 (too small for the echo)", OverlapMerger::new(5)),
        ("window 100 (default)", OverlapMerger::default()),
        (
            "window 100, minimum 3",
            OverlapMerger::default()
                .with_min_overlap(3)
                .unwrap_or_default(),
        ),
    ] {
        let (text, seams) = merger.merge_with_seams(&chunks);
        println!("{label}");
        for seam in &seams {
            println!("   seam {}: {} chars removed", seam.index, seam.overlap_chars);
        }
        println!("   \"{text}\"\n");
    }

    // Window 100 collapses both seams, including the single "s" that was
    // never an echo. A minimum overlap keeps it.
}
