use pixel_words::encoding::LetterStringGenerator;
use pixel_words::imaging::PixelBuffer;
use pixel_words::lexicon::{Lexicon, LexiconConfig};
use pixel_words::seeding::{bin_index, BinAlphabetMapping, DailySeed, BIN_COUNT};
use pixel_words::words::{ScoringWeights, WordExtractor, WordRanker};
use pixel_words::LetterString;
use proptest::prelude::*;
use std::sync::Arc;

// --- STRATEGIES ---

prop_compose! {
    fn arb_date_seed()(
        year in 1970u64..2200,
        month in 1u64..=12,
        day in 1u64..=28
    ) -> DailySeed {
        DailySeed::from_raw(year * 10_000 + month * 100 + day)
    }
}

// Small alphabet so dictionary words actually show up.
prop_compose! {
    fn arb_letters(max_len: usize)(
        text in proptest::collection::vec(prop::sample::select(b"abcrt".to_vec()), 0..max_len)
    ) -> LetterString {
        LetterString::new(String::from_utf8(text).unwrap()).unwrap()
    }
}

prop_compose! {
    fn arb_weights()(
        length in 0.01..10.0f64,
        frequency in 0.0..10.0f64
    ) -> ScoringWeights {
        ScoringWeights { length, frequency }
    }
}

fn lexicon() -> Arc<Lexicon> {
    Arc::new(
        Lexicon::from_words(
            ["cat", "rat", "bat", "tab", "art", "arc", "cart", "tart", "abba", "attract"],
            &LexiconConfig::default(),
        )
        .unwrap(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_mapping_is_bijection(seed in arb_date_seed()) {
        let mapping = BinAlphabetMapping::from_seed(seed);
        let mut letters = mapping.letters().to_vec();
        letters.sort_unstable();
        prop_assert_eq!(letters, b"abcdefghijklmnopqrstuvwxyz".to_vec());
        prop_assert_eq!(mapping, BinAlphabetMapping::from_seed(seed));
    }

    #[test]
    fn test_every_intensity_has_a_bin(v in prop::num::f32::ANY) {
        prop_assert!(bin_index(v) < BIN_COUNT);
    }

    #[test]
    fn test_one_letter_per_pixel(
        seed in arb_date_seed(),
        values in proptest::collection::vec(0.0..=1.0f32, 0..2_000),
        chunk in 1usize..300
    ) {
        let pixels = PixelBuffer::from_intensities(values);
        let letters = LetterStringGenerator::new(BinAlphabetMapping::from_seed(seed))
            .with_chunk_pixels(chunk)
            .generate(&pixels);
        prop_assert_eq!(letters.len(), pixels.len());
    }

    #[test]
    fn test_chunked_scan_matches_single_pass(
        letters in arb_letters(400),
        chunk_len in 1usize..64
    ) {
        let lexicon = lexicon();
        let single = WordExtractor::new(Arc::clone(&lexicon))
            .with_chunk_len(usize::MAX)
            .extract(&letters);
        let chunked = WordExtractor::new(lexicon)
            .with_chunk_len(chunk_len)
            .extract(&letters);
        prop_assert_eq!(single, chunked);
    }

    #[test]
    fn test_scores_bounded_and_ordered(
        letters in arb_letters(400),
        weights in arb_weights(),
        top_n in 0usize..12
    ) {
        let stats = WordExtractor::new(lexicon()).extract(&letters);
        let ranked = WordRanker::new(weights, top_n).unwrap().rank(&stats);

        prop_assert!(ranked.len() <= top_n);
        prop_assert!(ranked.len() <= stats.len());
        for word in &ranked {
            prop_assert!((0.0..=1.0).contains(&word.score));
        }
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }
}
