use super::*;

fn seq(id: &str, scene: SceneKind, from: u64, len: u64) -> Sequence {
    Sequence {
        id: id.to_owned(),
        scene,
        from: FrameIndex(from),
        duration_frames: len,
    }
}

fn basic_comp() -> Composition {
    Composition {
        id: "Test".to_owned(),
        fps: Fps::new(30, 1).unwrap(),
        canvas: Canvas {
            width: 64,
            height: 64,
        },
        duration: FrameIndex(60),
        background: Rgba8Premul::opaque(235, 235, 211),
        font_family: "monospace".to_owned(),
        assets: AssetPaths::logo_only("logo.png"),
        sequences: vec![
            seq("a", SceneKind::Logo, 0, 30),
            seq("b", SceneKind::Guess, 30, 30),
        ],
    }
}

#[test]
fn valid_composition_passes() {
    basic_comp().validate().unwrap();
}

#[test]
fn sequence_range_and_local_frame() {
    let s = seq("x", SceneKind::CowExplanation, 150, 60);
    assert_eq!(s.range(), FrameRange::new(FrameIndex(150), FrameIndex(210)).unwrap());
    assert_eq!(s.local_frame(FrameIndex(165)), 15);
    assert_eq!(s.local_frame(FrameIndex(140)), -10);
}

#[test]
fn sequence_at_finds_active_scene() {
    let comp = basic_comp();
    assert_eq!(comp.sequence_at(FrameIndex(0)).unwrap().id, "a");
    assert_eq!(comp.sequence_at(FrameIndex(29)).unwrap().id, "a");
    assert_eq!(comp.sequence_at(FrameIndex(30)).unwrap().id, "b");
    assert!(comp.sequence_at(FrameIndex(60)).is_none());
}

#[test]
fn rejects_sequence_past_duration() {
    let mut comp = basic_comp();
    comp.sequences[1].duration_frames = 31;
    let err = comp.validate().unwrap_err().to_string();
    assert!(err.contains("exceeds composition duration"), "{err}");
}

#[test]
fn rejects_overlap_even_when_not_adjacent() {
    let mut comp = basic_comp();
    comp.sequences = vec![
        seq("long", SceneKind::Logo, 0, 50),
        seq("short", SceneKind::Guess, 50, 5),
        seq("late", SceneKind::BullExplanation, 55, 5),
    ];
    comp.validate().unwrap();

    comp.sequences[1].from = FrameIndex(10);
    comp.sequences[2].from = FrameIndex(40);
    let err = comp.validate().unwrap_err().to_string();
    assert!(err.contains("overlaps"), "{err}");
}

#[test]
fn rejects_unordered_duplicate_and_empty_sequences() {
    let mut comp = basic_comp();
    comp.sequences.swap(0, 1);
    assert!(comp.validate().unwrap_err().to_string().contains("ordered"));

    let mut comp = basic_comp();
    comp.sequences[1].id = "a".to_owned();
    assert!(comp.validate().unwrap_err().to_string().contains("duplicate"));

    let mut comp = basic_comp();
    comp.sequences[0].duration_frames = 0;
    assert!(comp.validate().is_err());

    let mut comp = basic_comp();
    comp.sequences.clear();
    assert!(comp.validate().is_err());
}

#[test]
fn rejects_bad_asset_paths() {
    for bad in ["", "/abs/logo.png", "../logo.png", "img\\..\\logo.png"] {
        let mut comp = basic_comp();
        comp.assets.logo = bad.to_owned();
        assert!(comp.validate().is_err(), "{bad:?}");
    }
    let mut comp = basic_comp();
    comp.assets.font_bold = Some("../fonts/bold.ttf".to_owned());
    assert!(comp.validate().is_err());
}

#[test]
fn json_roundtrip_preserves_composition() {
    let comp = basic_comp();
    let json = comp.to_json_pretty().unwrap();
    assert!(!json.contains("font_regular"));
    let back = Composition::from_json_str(&json).unwrap();
    assert_eq!(back, comp);
}

#[test]
fn from_json_reports_parse_and_validation_errors() {
    let err = Composition::from_json_str("{").unwrap_err();
    assert!(matches!(err, VideoError::Serde { .. }));

    let mut comp = basic_comp();
    comp.duration = FrameIndex(0);
    let json = serde_json::to_string(&comp).unwrap();
    let err = Composition::from_json_str(&json).unwrap_err();
    assert!(matches!(err, VideoError::Validation(_)));
}
