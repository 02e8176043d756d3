use super::*;

#[test]
fn then_places_scenes_back_to_back() {
    let comp = CompositionBuilder::new(
        "Chain",
        Fps::new(24, 1).unwrap(),
        Canvas {
            width: 100,
            height: 200,
        },
        FrameIndex(50),
    )
    .then("one", SceneKind::Logo, 10)
    .then("two", SceneKind::Guess, 15)
    .sequence("three", SceneKind::CallToAction, FrameIndex(40), 10)
    .build()
    .unwrap();

    let starts: Vec<u64> = comp.sequences.iter().map(|s| s.from.0).collect();
    assert_eq!(starts, vec![0, 10, 40]);
    assert!(comp.sequence_at(FrameIndex(30)).is_none());
}

#[test]
fn build_validates() {
    let res = CompositionBuilder::new(
        "TooLong",
        Fps::new(30, 1).unwrap(),
        Canvas {
            width: 10,
            height: 10,
        },
        FrameIndex(20),
    )
    .then("only", SceneKind::Logo, 21)
    .build();
    assert!(res.is_err());
}
