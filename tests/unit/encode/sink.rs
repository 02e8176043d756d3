use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "picas_video_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::whole(30),
        background: Rgba8Premul::opaque(235, 235, 211),
    }
}

fn frame(px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data: px.repeat(2),
        premultiplied: true,
    }
}

#[test]
fn in_memory_sink_captures_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2, 1)).unwrap();
    sink.push_frame(FrameIndex(3), &frame([1, 2, 3, 255])).unwrap();
    sink.push_frame(FrameIndex(4), &frame([4, 5, 6, 255])).unwrap();
    assert!(sink.push_frame(FrameIndex(4), &frame([0; 4])).is_err());
    sink.end().unwrap();

    assert_eq!(sink.config(), Some(cfg(2, 1)));
    let frames = sink.into_frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[1].0, FrameIndex(4));
    assert_eq!(frames[1].1.data[..4], [4, 5, 6, 255]);
}

#[test]
fn begin_clears_previous_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2, 1)).unwrap();
    sink.push_frame(FrameIndex(0), &frame([0; 4])).unwrap();
    sink.begin(cfg(2, 1)).unwrap();
    assert!(sink.frames().is_empty());
}

#[test]
fn png_sequence_writes_straight_alpha_files() {
    let dir = temp_dir("png_seq");
    let mut sink = PngSequenceSink::new(&dir).with_prefix("f");
    sink.begin(cfg(2, 1)).unwrap();
    sink.push_frame(FrameIndex(7), &frame([64, 32, 0, 128])).unwrap();
    sink.end().unwrap();

    let path = dir.join("f00007.png");
    assert_eq!(sink.written(), &[path.clone()]);
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(0, 0).0, [128, 64, 0, 128]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn png_sequence_validates_frames() {
    let dir = temp_dir("png_seq_bad");
    let mut sink = PngSequenceSink::new(&dir);
    assert!(sink.push_frame(FrameIndex(0), &frame([0; 4])).is_err());

    sink.begin(cfg(4, 4)).unwrap();
    let err = sink.push_frame(FrameIndex(0), &frame([0; 4])).unwrap_err();
    assert!(err.to_string().contains("size mismatch"), "{err}");

    sink.begin(cfg(2, 1)).unwrap();
    sink.push_frame(FrameIndex(2), &frame([0; 4])).unwrap();
    assert!(sink.push_frame(FrameIndex(1), &frame([0; 4])).is_err());
    assert_eq!(sink.frame_path(FrameIndex(12)), dir.join("frame_00012.png"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn write_png_rejects_short_buffers() {
    let mut f = frame([0; 4]);
    f.data.truncate(4);
    assert!(write_png(Path::new("never.png"), &f).is_err());
}

#[test]
fn ensure_parent_dir_creates_nested_dirs() {
    let tmp = temp_dir("parent_dir");
    let out = tmp.join("a/b/video.mp4");
    ensure_parent_dir(&out).unwrap();
    assert!(tmp.join("a/b").is_dir());
    assert!(!out.exists());
    // A bare file name has an empty parent and needs nothing.
    ensure_parent_dir(Path::new("video.mp4")).unwrap();
    std::fs::remove_dir_all(&tmp).ok();
}
