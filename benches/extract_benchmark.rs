//! Benchmarks for pdfquest classification and assembly performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks drive the pipeline with synthetic block streams so no
//! document parsing or disk IO is measured.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pdfquest::model::{ImageBlock, PageBlock, TextBlock, TextLine};
use pdfquest::{Assembler, Classifier, CleanupPipeline};
use std::path::Path;

/// Build a block stream of `question_count` questions, one image after
/// every fourth question stem.
fn create_block_stream(question_count: usize) -> Vec<PageBlock> {
    let mut blocks = Vec::new();

    for i in 0..question_count {
        let page = (i / 5 + 1) as u32;
        let number = i + 1;

        let mut block = TextBlock::new(page);
        block.add_line(TextLine::from_text(format!(
            "{}. Which of the following statements about sample topic {} is correct?",
            number, number
        )));
        block.add_line(TextLine::from_text("[A] the first statement"));
        block.add_line(TextLine::from_text("[B] the second statement"));
        block.add_line(TextLine::from_text("[C] the third statement"));
        block.add_line(TextLine::from_text("[D] the fourth statement"));
        block.add_line(TextLine::from_text(format!("Ans [{}]", ['A', 'B', 'C', 'D'][i % 4])));
        blocks.push(PageBlock::Text(block));

        if i % 4 == 0 {
            blocks.push(PageBlock::Image(ImageBlock::new(
                page,
                vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10],
                "jpg",
            )));
        }
    }

    blocks
}

fn joined_text(question_count: usize) -> String {
    let blocks = create_block_stream(question_count);
    Classifier::new().classify(&blocks).unwrap().joined_text()
}

/// Benchmark stream classification at various sizes.
fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for question_count in [10, 50, 200].iter() {
        let blocks = create_block_stream(*question_count);
        let classifier = Classifier::new();

        group.bench_function(format!("{}_questions", question_count), |b| {
            b.iter(|| classifier.classify(black_box(&blocks)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark boundary splitting plus cleanup over a whole paper.
///
/// The image list is empty so nothing touches the filesystem.
fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");

    for question_count in [10, 50, 200].iter() {
        let text = joined_text(*question_count);
        let assembler = Assembler::new();

        group.bench_function(format!("{}_questions", question_count), |b| {
            b.iter(|| {
                assembler
                    .assemble(black_box(&text), &[], Path::new("unused"))
                    .unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark the cleanup pass on a single dirty span.
fn bench_cleanup(c: &mut Criterion) {
    let pipeline = CleanupPipeline::new();
    let span = "Which of the following is correct?\n\
                [A] the first statement\n[B] the second statement\n\
                [C] the third statement\n[D] the fourth statement\n\
                Ans [C] see chapter twelve\nSECTION II - PHYSICS\n\n\
                stray note after a blank line";

    c.bench_function("cleanup_single_span", |b| {
        b.iter(|| pipeline.clean(black_box(span)));
    });
}

criterion_group!(benches, bench_classify, bench_assemble, bench_cleanup);
criterion_main!(benches);
