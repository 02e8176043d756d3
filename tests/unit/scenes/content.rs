use super::*;

#[test]
fn guess_scores_one_bull_and_one_cow() {
    let bulls = SECRET
        .chars()
        .zip(GUESS.chars())
        .filter(|(s, g)| s == g)
        .count();
    let present = GUESS.chars().filter(|g| SECRET.contains(*g)).count();
    assert_eq!(bulls, 1);
    assert_eq!(present - bulls, 1);
}

#[test]
fn gated_toggle_stays_english_through_frame_45() {
    for f in 0..=45 {
        assert_eq!(language_at(f, 15, Some(45)), Language::English, "frame {f}");
    }
    assert_eq!(language_at(46, 15, Some(45)), Language::Spanish);
    assert_eq!(language_at(59, 15, Some(45)), Language::Spanish);
    assert_eq!(language_at(60, 15, Some(45)), Language::English);
    assert_eq!(language_at(75, 15, Some(45)), Language::Spanish);
}

#[test]
fn ungated_toggle_flips_every_period() {
    assert_eq!(language_at(0, 20, None), Language::English);
    assert_eq!(language_at(19, 20, None), Language::English);
    assert_eq!(language_at(20, 20, None), Language::Spanish);
    assert_eq!(language_at(40, 20, None), Language::English);
    assert_eq!(language_at(89, 20, None), Language::English);
}

#[test]
fn frames_before_start_are_english() {
    for f in [-1, -15, -20, -21, -100] {
        assert_eq!(language_at(f, 20, None), Language::English, "frame {f}");
        assert_eq!(language_at(f, 15, Some(45)), Language::English, "frame {f}");
    }
}

#[test]
fn bilingual_picks_language() {
    assert_eq!(CTA_TAGLINE.get(Language::English), "Play now!");
    assert_eq!(CTA_TAGLINE.get(Language::Spanish), "¡Juega ahora!");
}
