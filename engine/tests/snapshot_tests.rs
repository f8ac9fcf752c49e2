use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use engine::{
    GameLogic, HeadlessRunner,
    graphics::{CpuRenderer, Renderer2d},
    snapshot::{load_snapshot_record, rgba_sha256_hex, write_snapshot},
    surface::{RgbaBufferSurface, Surface, SurfaceSize},
    ui::Rect,
};

fn unique_temp_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("engine_snapshot_tests_{nanos}"))
}

#[derive(Debug, Clone, Copy)]
struct BoxGame;

#[derive(Debug, Clone, Copy)]
struct MoveBox(i32);

impl GameLogic for BoxGame {
    type State = i32;
    type Input = MoveBox;

    fn initial_state(&self) -> Self::State {
        0
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
        (state + input.0).clamp(0, 12)
    }
}

fn render(x: i32) -> RgbaBufferSurface {
    let size = SurfaceSize::new(16, 8);
    let mut surface = RgbaBufferSurface::new(size);
    let mut gfx = CpuRenderer::new(surface.frame_mut(), size);
    gfx.clear([0, 0, 0, 255]);
    gfx.fill_rect(Rect::new(x as u32, 2, 4, 4), [255, 0, 0, 255]);
    surface
}

#[test]
fn snapshot_writes_raw_frame_and_sidecar() {
    let dir = unique_temp_dir();
    let surface = render(3);
    let path = dir.join("frame.rgba");

    let record = write_snapshot(&path, surface.size(), surface.frame()).expect("write snapshot");
    assert_eq!(record.width, 16);
    assert_eq!(record.height, 8);
    assert_eq!(record.hash, rgba_sha256_hex(surface.frame()));

    let bytes = fs::read(&path).expect("read raw frame");
    assert_eq!(bytes, surface.frame());
    let loaded = load_snapshot_record(&path).expect("load sidecar");
    assert_eq!(loaded, record);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn replaying_the_same_inputs_gives_the_same_frame_hash() {
    let script = [MoveBox(2), MoveBox(5), MoveBox(-1), MoveBox(20)];

    let mut a = HeadlessRunner::new(BoxGame);
    a.run(script);
    let mut b = HeadlessRunner::new(BoxGame);
    b.run(script);

    let hashes_a: Vec<String> = a.history().iter().map(|s| rgba_sha256_hex(render(*s).frame())).collect();
    let hashes_b: Vec<String> = b.history().iter().map(|s| rgba_sha256_hex(render(*s).frame())).collect();
    assert_eq!(hashes_a, hashes_b);
    assert_eq!(*a.state(), 12);
    assert_ne!(hashes_a[0], hashes_a[1]);
}
