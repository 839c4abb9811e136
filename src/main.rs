use raylib::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ai_shorts_maker::config::SessionConfig;
use ai_shorts_maker::drag::DragGesture;
use ai_shorts_maker::render::{Controls, Notice, Renderer, SequenceView};
use ai_shorts_maker::scan;
use ai_shorts_maker::set_log_hook;
use ai_shorts_maker::{Command, Mode, Session, Stage};

const LOG_MAX_LINES: usize = 300;
const LOG_LINE_MAX: usize = 600;
const RANK_TEXT_MAX: usize = 6;

const TILE_W: f32 = 150.0;
const TILE_H: f32 = 120.0;
const TILE_GAP: f32 = 14.0;
const GRID_TOP: f32 = 80.0;
const LOG_H: f32 = 150.0;

const COLOR_BG: Color = Color::new(25, 25, 25, 255);
const COLOR_BTN: Color = Color::new(40, 90, 170, 255);
const COLOR_BTN_HOVER: Color = Color::new(70, 120, 200, 255);
const COLOR_BTN_ACTIVE: Color = Color::new(200, 120, 40, 255);
const COLOR_TILE: Color = Color::new(45, 45, 45, 255);
const COLOR_TILE_TARGET: Color = Color::new(60, 110, 60, 255);
const COLOR_TILE_DRAGGED: Color = Color::new(45, 45, 45, 110);
const COLOR_LOG_BG: Color = Color::new(18, 18, 18, 255);
const COLOR_LOG_TEXT: Color = Color::new(210, 210, 210, 255);

struct Tile {
    rank: usize,
    name: String,
    size: u64,
    controls: Controls,
    preview: Option<u64>,
}

/// Keeps the last rendered sequence so the frame loop can draw it.
#[derive(Default)]
struct GridModel {
    mode: Mode,
    tiles: Vec<Tile>,
    log: Arc<Mutex<Vec<String>>>,
}

impl Renderer for GridModel {
    fn render(&mut self, view: &SequenceView<'_>) {
        self.mode = view.mode;
        self.tiles = view
            .entries
            .iter()
            .map(|e| Tile {
                rank: e.rank,
                name: e.item.name().to_string(),
                size: e.item.size(),
                controls: e.controls,
                preview: e.item.preview().map(|p| p.id()),
            })
            .collect();
    }

    fn notify(&mut self, notice: &Notice) {
        let line = match notice {
            Notice::Blocking(msg) => format!("[ERROR] {msg}"),
            Notice::Warning(msg) => format!("[WARN] {msg}"),
        };
        push_log_line(&self.log, &line);
    }
}

struct RankEdit {
    index: usize,
    text: String,
}

fn push_log_line(buffer: &Arc<Mutex<Vec<String>>>, line: &str) {
    let mut guard = buffer.lock().unwrap_or_else(|e| e.into_inner());
    if guard.len() >= LOG_MAX_LINES {
        let excess = guard.len() + 1 - LOG_MAX_LINES;
        guard.drain(0..excess);
    }
    let mut text = line.to_string();
    if text.len() > LOG_LINE_MAX {
        let mut cut = LOG_LINE_MAX;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }
    guard.push(text);
}

fn snapshot_logs(buffer: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    buffer.lock().unwrap_or_else(|e| e.into_inner()).clone()
}

fn draw_button(
    d: &mut RaylibDrawHandle,
    rect: Rectangle,
    label: &str,
    active: bool,
    font_size: f32,
) -> bool {
    let mouse = d.get_mouse_position();
    let hot = rect.check_collision_point_rec(mouse);

    let bg = if active {
        COLOR_BTN_ACTIVE
    } else if hot {
        COLOR_BTN_HOVER
    } else {
        COLOR_BTN
    };

    d.draw_rectangle_rounded(rect, 0.25, 10, bg);
    d.draw_rectangle_rounded_lines(rect, 0.25, 10, Color::new(20, 20, 20, 255));

    let ts = d.measure_text(label, font_size as i32);
    let pos_x = rect.x + (rect.width - ts as f32) * 0.5;
    let pos_y = rect.y + (rect.height - font_size) * 0.5;

    d.draw_text(label, pos_x as i32, pos_y as i32, font_size as i32, Color::RAYWHITE);

    hot && d.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT)
}

fn draw_log_panel(d: &mut RaylibDrawHandle, rect: Rectangle, lines: &[String]) {
    d.draw_rectangle_rec(rect, COLOR_LOG_BG);
    d.draw_rectangle_lines_ex(rect, 2.0, Color::new(40, 40, 40, 255));

    let font_size = 14;
    let pad = 8.0;
    let line_h = 16.0;
    let max_lines = ((rect.height - 2.0 * pad) / line_h).floor().max(1.0) as usize;

    let start = lines.len().saturating_sub(max_lines);

    let mut y = rect.y + pad;
    for line in lines.iter().skip(start) {
        let pos_x = rect.x + pad;
        d.draw_text(line, pos_x as i32, y as i32, font_size, COLOR_LOG_TEXT);
        y += line_h;
    }
}

fn tile_rect(index: usize, columns: usize) -> Rectangle {
    let col = (index % columns) as f32;
    let row = (index / columns) as f32;
    Rectangle::new(
        30.0 + col * (TILE_W + TILE_GAP),
        GRID_TOP + row * (TILE_H + TILE_GAP),
        TILE_W,
        TILE_H,
    )
}

fn short_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let head: String = name.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{head}...")
}

fn load_initial(rt: &tokio::runtime::Runtime, dir: &Path) -> (SessionConfig, Vec<ai_shorts_maker::Candidate>) {
    rt.block_on(async {
        let config = match SessionConfig::load("session.json").await {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!("[INFO] Using default session settings ({err:#})");
                SessionConfig::default()
            }
        };
        let candidates = match scan::load_dir(dir).await {
            Ok(found) => found,
            Err(err) => {
                eprintln!("[INFO] {err:#}; drop images on the window to start");
                Vec::new()
            }
        };
        (config, candidates)
    })
}

fn main() {
    tracing_subscriber::fmt::init();

    let dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "uploads".to_string()));
    let rt = tokio::runtime::Runtime::new().expect("Failed to create async runtime");
    let (config, candidates) = load_initial(&rt, &dir);

    let log = Arc::new(Mutex::new(Vec::with_capacity(LOG_MAX_LINES)));
    let hook_buffer = Arc::clone(&log);
    set_log_hook(Some(Arc::new(Mutex::new(move |line: &str| {
        push_log_line(&hook_buffer, line);
    }))));

    let model = GridModel {
        log: Arc::clone(&log),
        ..GridModel::default()
    };
    let mut session = Session::new(&config, model);
    let tx = session.sender();
    if !candidates.is_empty() {
        tx.send(Command::Admit(candidates));
    }
    session.pump();

    let (mut rl, thread) = raylib::init()
        .size(1100, 720)
        .resizable()
        .title("AI Shorts Maker")
        .build();
    rl.set_target_fps(60);
    rl.set_exit_key(None);

    let mut drag = DragGesture::default();
    let mut edit: Option<RankEdit> = None;

    while !rl.window_should_close() {
        if rl.is_file_dropped() {
            let dropped = rl.load_dropped_files();
            let paths: Vec<PathBuf> = dropped.paths().into_iter().map(PathBuf::from).collect();
            match rt.block_on(scan::load_paths(&paths)) {
                Ok(found) => tx.send(Command::Admit(found)),
                Err(err) => push_log_line(&log, &format!("[ERROR] {err:#}")),
            }
        }

        if let Some(current) = edit.as_mut() {
            while let Some(ch) = rl.get_char_pressed() {
                if (ch.is_ascii_digit() || ch == '.' || ch == '-') && current.text.len() < RANK_TEXT_MAX {
                    current.text.push(ch);
                }
            }
            if rl.is_key_pressed(KeyboardKey::KEY_BACKSPACE) {
                current.text.pop();
            }
        }
        if rl.is_key_pressed(KeyboardKey::KEY_ENTER) {
            if let Some(done) = edit.take() {
                tx.send(Command::SetPosition {
                    index: done.index,
                    requested: done.text,
                });
            }
        }
        if rl.is_key_pressed(KeyboardKey::KEY_ESCAPE) {
            edit = None;
            drag.cancel();
        }

        let width = rl.get_screen_width() as f32;
        let height = rl.get_screen_height() as f32;
        let columns = (((width - 60.0) / (TILE_W + TILE_GAP)).floor() as usize).max(1);

        let model = session.renderer();
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(COLOR_BG);

        let mut x = 30.0;
        for mode in Mode::ALL {
            if draw_button(&mut d, Rectangle::new(x, 20.0, 110.0, 40.0), mode.label(), model.mode == mode, 18.0) {
                edit = None;
                drag.cancel();
                tx.send(Command::SetMode(mode));
            }
            x += 120.0;
        }
        if draw_button(&mut d, Rectangle::new(x + 20.0, 20.0, 110.0, 40.0), "original", false, 18.0) {
            tx.send(Command::RestoreSubmissionOrder);
        }
        if draw_button(&mut d, Rectangle::new(x + 140.0, 20.0, 110.0, 40.0), "reset", false, 18.0) {
            edit = None;
            drag.cancel();
            tx.send(Command::Reset);
        }
        let key = session.store().sort_key();
        let key_label = format!("by {key}");
        if draw_button(&mut d, Rectangle::new(x + 260.0, 20.0, 110.0, 40.0), &key_label, false, 18.0) {
            tx.send(Command::SetSortKey(key.next()));
        }

        if session.stage() == Stage::Upload {
            d.draw_text(
                "Drop up to 20 images (jpg, png, gif, webp) on this window",
                30,
                GRID_TOP as i32 + 20,
                20,
                Color::new(170, 170, 170, 255),
            );
        }

        let mouse = d.get_mouse_position();
        let pressed = d.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT);
        let released = d.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT);

        for (i, tile) in model.tiles.iter().enumerate() {
            let rect = tile_rect(i, columns);
            let hot = rect.check_collision_point_rec(mouse);
            let remove_rect = Rectangle::new(rect.x + rect.width - 26.0, rect.y + 4.0, 22.0, 22.0);
            let rank_rect = Rectangle::new(rect.x + 6.0, rect.y + 6.0, 56.0, 24.0);
            let on_remove = remove_rect.check_collision_point_rec(mouse);

            if tile.controls == Controls::Draggable && drag.is_active() {
                if hot {
                    drag.enter(i);
                } else {
                    drag.leave(i);
                }
            }
            if pressed && hot && !on_remove {
                match tile.controls {
                    Controls::Draggable => drag.start(i),
                    Controls::RankField { .. } if rank_rect.check_collision_point_rec(mouse) => {
                        edit = Some(RankEdit {
                            index: i,
                            text: String::new(),
                        });
                    }
                    _ => {}
                }
            }

            let bg = if drag.source() == Some(i) {
                COLOR_TILE_DRAGGED
            } else if drag.over() == Some(i) {
                COLOR_TILE_TARGET
            } else {
                COLOR_TILE
            };
            d.draw_rectangle_rounded(rect, 0.1, 8, bg);

            let rank_label = match (&tile.controls, edit.as_ref()) {
                (Controls::RankField { .. }, Some(e)) if e.index == i => format!("{}_", e.text),
                (Controls::RankField { value }, _) => format!("#{value}"),
                _ => format!("{}", tile.rank),
            };
            if matches!(tile.controls, Controls::RankField { .. }) {
                d.draw_rectangle_rec(rank_rect, Color::new(230, 230, 230, 255));
                d.draw_text(&rank_label, rank_rect.x as i32 + 4, rank_rect.y as i32 + 4, 16, Color::BLACK);
            } else {
                d.draw_text(&rank_label, rect.x as i32 + 8, rect.y as i32 + 8, 20, Color::RAYWHITE);
            }

            let preview = match tile.preview {
                Some(id) => format!("preview {id}"),
                None => "no preview".to_string(),
            };
            d.draw_text(&preview, rect.x as i32 + 8, rect.y as i32 + 44, 12, Color::new(150, 150, 150, 255));
            d.draw_text(&short_name(&tile.name, 18), rect.x as i32 + 8, rect.y as i32 + 70, 14, Color::RAYWHITE);
            d.draw_text(
                &format!("{} KB", tile.size / 1024),
                rect.x as i32 + 8,
                rect.y as i32 + 92,
                12,
                Color::new(150, 150, 150, 255),
            );

            if draw_button(&mut d, remove_rect, "x", false, 14.0) {
                edit = None;
                drag.cancel();
                tx.send(Command::Remove(i));
            }
        }

        if released && drag.is_active() {
            match drag.over() {
                Some(target) => {
                    if let Some(cmd) = drag.drop_on(target) {
                        tx.send(cmd);
                    }
                }
                None => drag.cancel(),
            }
        }

        let lines = snapshot_logs(&log);
        draw_log_panel(
            &mut d,
            Rectangle::new(30.0, height - LOG_H - 20.0, width - 60.0, LOG_H),
            &lines,
        );

        drop(d);
        session.pump();
    }

    set_log_hook(None);
}
