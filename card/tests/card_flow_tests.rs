use std::time::Duration;

use card::dodge::DODGE_DIRECTIONS;
use card::particles::{BURST_COUNT, RAIN_COUNT};
use card::playtest::{CardInput, CardLogic};
use card::screen::Screen;
use card::state::ACCEPT_DELAY;
use engine::HeadlessRunner;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn runner(seed: u64) -> HeadlessRunner<CardLogic> {
    HeadlessRunner::new(CardLogic::new(seed, (800, 600)))
}

#[test]
fn every_dodge_lands_on_one_of_six_offsets() {
    let mut r = runner(2024);
    for _ in 0..200 {
        r.step(CardInput::PointerEnterNo);
        r.step(CardInput::Tick(ms(16)));
        let offset = r.state().prompt().map(|p| p.dodge.offset()).expect("prompt mounted");
        assert!(DODGE_DIRECTIONS.contains(&offset), "unexpected offset {offset:?}");
    }
}

#[test]
fn tooltip_is_visible_until_1500_ms_after_a_lone_trigger() {
    let mut r = runner(1);
    r.step(CardInput::TouchStartNo);
    let visible = |r: &HeadlessRunner<CardLogic>| r.state().prompt().is_some_and(|p| p.dodge.tooltip_visible());
    assert!(visible(&r));

    for _ in 0..93 {
        r.step(CardInput::Tick(ms(16)));
    }
    assert_eq!(r.state().clock(), ms(1488));
    assert!(visible(&r));

    r.step(CardInput::Tick(ms(12)));
    assert!(!visible(&r));
}

#[test]
fn confirm_click_bursts_twelve_hearts_at_the_click_point() {
    let mut r = runner(1);
    r.step(CardInput::ConfirmClick { x: 100.0, y: 200.0 });
    let prompt = r.state().prompt().expect("prompt still mounted");
    assert_eq!(prompt.burst.len(), BURST_COUNT);
    assert!(prompt.burst.items().all(|i| i.x == 100.0 && i.y == 200.0));
}

#[test]
fn screen_swaps_once_and_not_before_800_ms() {
    let mut r = runner(1);
    r.step(CardInput::ConfirmClick { x: 100.0, y: 200.0 });
    let clicked_at = r.state().clock();

    let mut swapped_at = Vec::new();
    let mut previous = r.state().screen();
    for _ in 0..150 {
        r.step(CardInput::Tick(ms(10)));
        r.step(CardInput::ConfirmClick { x: 5.0, y: 5.0 });
        let now = r.state().screen();
        if previous == Screen::Prompt && now == Screen::Success {
            swapped_at.push(r.state().clock());
        }
        previous = now;
    }

    assert_eq!(swapped_at, vec![clicked_at + ACCEPT_DELAY]);
    assert!(r.state().accepted());
}

#[test]
fn rain_keeps_twenty_five_items_for_the_life_of_the_screen() {
    let mut r = runner(77);
    r.step(CardInput::ConfirmClick { x: 0.0, y: 0.0 });
    r.step(CardInput::Tick(ACCEPT_DELAY));
    let first: Vec<_> = r.state().success().expect("success").rain.items().to_vec();
    assert_eq!(first.len(), RAIN_COUNT);

    for _ in 0..600 {
        r.step(CardInput::Tick(ms(16)));
    }
    let later = r.state().success().expect("success").rain.items().to_vec();
    assert_eq!(later, first);
}

#[test]
fn history_keeps_every_frame_of_the_script() {
    let mut r = runner(3);
    let frame = r.run([
        CardInput::Resize {
            width: 1024,
            height: 768,
        },
        CardInput::PointerEnterNo,
        CardInput::Tick(ms(500)),
    ]);
    assert_eq!(frame, 3);
    assert_eq!(r.history().len(), 4);
    assert_eq!(r.history()[0].viewport(), (800, 600));
    assert_eq!(r.state().viewport(), (1024, 768));
}
