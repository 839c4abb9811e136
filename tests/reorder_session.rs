use ai_shorts_maker::config::SessionConfig;
use ai_shorts_maker::render::{Renderer, SequenceView, TextRenderer};
use ai_shorts_maker::{Candidate, Command, Mode, Outcome, SequenceStore, Session, Stage};

fn jpg(name: &str) -> Candidate {
    Candidate::from_bytes(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF])
}

#[derive(Default)]
struct Frames(Vec<Vec<String>>);

impl Renderer for Frames {
    fn render(&mut self, view: &SequenceView<'_>) {
        self.0.push(view.names().into_iter().map(String::from).collect());
    }
}

#[test]
fn sort_then_type_a_position() {
    let mut session = Session::new(&SessionConfig::default(), Frames::default());
    session.dispatch(Command::Admit(vec![jpg("b.jpg"), jpg("a.jpg"), jpg("c.jpg")]));
    session.dispatch(Command::SetMode(Mode::Ascending));
    assert_eq!(session.store().names(), vec!["a.jpg", "b.jpg", "c.jpg"]);

    session.dispatch(Command::SetPosition {
        index: 0,
        requested: "3".to_string(),
    });
    assert_eq!(session.store().names(), vec!["b.jpg", "c.jpg", "a.jpg"]);
    assert_eq!(session.store().mode(), Mode::Numeric);

    let last = session.renderer().0.last().cloned().unwrap();
    assert_eq!(last, vec!["b.jpg", "c.jpg", "a.jpg"]);
}

#[test]
fn store_level_scenario_in_numeric_mode() {
    let mut store = SequenceStore::new(&SessionConfig::default());
    store
        .admit(vec![jpg("b.jpg"), jpg("a.jpg"), jpg("c.jpg")])
        .unwrap();
    store.set_mode(Mode::Ascending);
    store.set_mode(Mode::Numeric);
    assert_eq!(store.set_position(0, 3), Outcome::Applied);
    assert_eq!(store.names(), vec!["b.jpg", "c.jpg", "a.jpg"]);

    let before: Vec<u64> = store.items().iter().map(|i| i.id().0).collect();
    for bad in ["0", "4", "2.5", "x"] {
        store.set_position_text(1, bad);
    }
    let after: Vec<u64> = store.items().iter().map(|i| i.id().0).collect();
    assert_eq!(before, after);
}

#[test]
fn reset_starts_a_clean_session() {
    let mut session = Session::new(&SessionConfig::default(), Frames::default());
    let batch = (1..=25).map(|i| jpg(&format!("shot{i}.jpg"))).collect();
    session.dispatch(Command::Admit(batch));
    assert_eq!(session.store().len(), 20);
    assert_eq!(session.store().previews().live(), 20);

    session.dispatch(Command::Reset);
    assert!(session.store().is_empty());
    assert_eq!(session.store().mode(), Mode::Descending);
    assert_eq!(session.store().previews().live(), 0);
    assert_eq!(session.stage(), Stage::Upload);

    session.dispatch(Command::Admit(vec![jpg("fresh.jpg")]));
    assert_eq!(session.store().names(), vec!["fresh.jpg"]);
}

#[test]
fn text_renderer_shows_rank_fields_in_numeric_mode() {
    let mut session = Session::new(&SessionConfig::default(), TextRenderer::new(Vec::new()));
    session.dispatch(Command::Admit(vec![jpg("img2.jpg"), jpg("img10.jpg")]));
    session.dispatch(Command::SetMode(Mode::Numeric));

    let mut renderer = TextRenderer::new(Vec::new());
    renderer.render(&session.store().view());
    let text = String::from_utf8(renderer.into_inner()).unwrap();
    assert!(text.starts_with("mode: numeric (2 files)\n"));
    assert!(text.contains("  1. img10.jpg (3 bytes) [#1]"));
    assert!(text.contains("  2. img2.jpg (3 bytes) [#2]"));
}
