use std::collections::HashSet;

use rand::{SeedableRng, rngs::StdRng};

use postcraft::post::{
    emotion::pick_emojis,
    palettes::{FALLBACK_EMOJIS, emojis_for_label},
};

fn glyphs(emojis: &str) -> Vec<String> {
    emojis.chars().map(|glyph| glyph.to_string()).collect()
}

#[test]
fn given_positive_label_when_picking_then_three_distinct_positive_emojis_are_returned() {
    let palette = emojis_for_label("positive").expect("positive palette");
    let mut rng = StdRng::seed_from_u64(11);

    let picked = glyphs(&pick_emojis("POSITIVE", &mut rng));
    assert_eq!(picked.len(), 3);
    assert_eq!(picked.iter().collect::<HashSet<_>>().len(), 3);
    assert!(picked.iter().all(|glyph| palette.contains(&glyph.as_str())));
}

#[test]
fn given_negative_label_when_picking_then_emojis_come_from_negative_palette() {
    let palette = emojis_for_label("negative").expect("negative palette");
    let mut rng = StdRng::seed_from_u64(12);

    let picked = glyphs(&pick_emojis("Negative", &mut rng));
    assert_eq!(picked.len(), 3);
    assert!(picked.iter().all(|glyph| palette.contains(&glyph.as_str())));
}

#[test]
fn given_unknown_label_when_picking_then_fallback_is_returned() {
    let mut rng = StdRng::seed_from_u64(13);
    assert_eq!(pick_emojis("LABEL_1", &mut rng), FALLBACK_EMOJIS);
    assert_eq!(pick_emojis("", &mut rng), FALLBACK_EMOJIS);
}
