use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pixel_words::encoding::LetterStringGenerator;
use pixel_words::imaging::{GrayscaleSampler, RgbImage};
use pixel_words::lexicon::{Lexicon, LexiconConfig};
use pixel_words::seeding::{BinAlphabetMapping, DailySeed};
use pixel_words::words::{WordExtractor, WordRanker};
use std::hint::black_box;
use std::sync::Arc;

fn setup_lexicon() -> Arc<Lexicon> {
    // Every 3-5 letter word over a skewed alphabet gives a dense automaton
    let alphabet = b"aeinorst";
    let mut words = Vec::new();
    for &a in alphabet {
        for &b in alphabet {
            for &c in alphabet {
                words.push(String::from_utf8(vec![a, b, c]).unwrap());
                for &d in &alphabet[..4] {
                    words.push(String::from_utf8(vec![a, b, c, d]).unwrap());
                    words.push(String::from_utf8(vec![a, b, c, d, b'e']).unwrap());
                }
            }
        }
    }
    Arc::new(Lexicon::from_words(&words, &LexiconConfig::default()).unwrap())
}

fn setup_image(width: u32, height: u32) -> RgbImage {
    let mut state = 0x2545_f491_u32;
    let data = (0..width as usize * height as usize * 3)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect();
    RgbImage::new(data, width, height)
}

fn bench_stages(c: &mut Criterion) {
    let lexicon = setup_lexicon();
    let mapping = BinAlphabetMapping::from_seed(DailySeed::from_raw(20_261_017));
    let sampler = GrayscaleSampler::new();
    let generator = LetterStringGenerator::new(mapping);

    let mut group = c.benchmark_group("pipeline");
    for &(w, h) in &[(256u32, 256u32), (1024, 1024)] {
        let image = setup_image(w, h);
        let pixels = sampler.sample(&image);
        let letters = generator.generate(&pixels);
        group.throughput(Throughput::Elements(u64::from(w) * u64::from(h)));

        group.bench_with_input(BenchmarkId::new("sample", w), &image, |b, image| {
            b.iter(|| sampler.sample(black_box(image)))
        });
        group.bench_with_input(BenchmarkId::new("encode", w), &pixels, |b, pixels| {
            b.iter(|| generator.generate(black_box(pixels)))
        });
        group.bench_with_input(BenchmarkId::new("extract", w), &letters, |b, letters| {
            let extractor = WordExtractor::new(Arc::clone(&lexicon));
            b.iter(|| extractor.extract(black_box(letters)))
        });
    }
    group.finish();
}

fn bench_chunking(c: &mut Criterion) {
    let lexicon = setup_lexicon();
    let mapping = BinAlphabetMapping::from_seed(DailySeed::from_raw(20_261_017));
    let pixels = GrayscaleSampler::new().sample(&setup_image(1024, 1024));
    let letters = LetterStringGenerator::new(mapping).generate(&pixels);
    let ranker = WordRanker::default();

    let mut group = c.benchmark_group("scan_chunk_len");
    for &chunk_len in &[1usize << 14, 1 << 16, 1 << 18, usize::MAX] {
        let extractor = WordExtractor::new(Arc::clone(&lexicon)).with_chunk_len(chunk_len);
        group.bench_function(BenchmarkId::from_parameter(chunk_len), |b| {
            b.iter(|| ranker.rank(&extractor.extract(black_box(&letters))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_stages, bench_chunking);
criterion_main!(benches);
