use std::hint::black_box;

use bambara_bpe::{BpeTokenizer, Trainer, TrainerConfig};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode, Throughput};

const SENTENCES: [&str; 6] = [
    "A bɛ taa sugu la",
    "N'a fɛ ka kɛ nyɛ",
    "Ne tɔgɔ ye Sali ye",
    "I ni ce, i ka kɛnɛ wa?",
    "An bɛ ɲɔgɔn dɛmɛ ka baara kɛ",
    "Muso ye ji min ka taa so kɔnɔ",
];

fn build_corpus() -> Vec<String> {
    (0..512)
        .map(|idx| {
            let first = SENTENCES[idx % SENTENCES.len()];
            let second = SENTENCES[(idx / SENTENCES.len()) % SENTENCES.len()];
            format!("{first} {second}")
        })
        .collect()
}

fn bench_training(c: &mut Criterion) {
    let corpus = build_corpus();
    let total_bytes: usize = corpus.iter().map(String::len).sum();
    let cfg = TrainerConfig::builder()
        .num_merges(200)
        .show_progress(false)
        .build()
        .expect("configuration");

    let mut group = c.benchmark_group("train_bambara_corpus");
    group.throughput(Throughput::Bytes(total_bytes as u64));
    group.sampling_mode(SamplingMode::Flat);
    group.bench_function(BenchmarkId::from_parameter("merges_200"), |b| {
        b.iter(|| {
            let trainer = Trainer::new(cfg.clone());
            let artefacts = trainer.train_from_lines(&corpus).expect("training");
            let _ = black_box(artefacts);
        });
    });
    group.finish();
}

fn bench_encoding(c: &mut Criterion) {
    let corpus = build_corpus();
    let tokenizer = BpeTokenizer::learn_bpe(&corpus, 200);
    let text = corpus.join(" ");

    c.bench_function("encode_cold_cache", |b| {
        b.iter(|| {
            let mut fresh = tokenizer.clone();
            black_box(fresh.encode(&text))
        });
    });
}

criterion_group!(benches, bench_training, bench_encoding);
criterion_main!(benches);
