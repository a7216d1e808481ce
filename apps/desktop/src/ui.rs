use glide_engine::{Candidate, Rect};
use macroquad::prelude::*;

use crate::EngineBackend;

/// The on-screen keyboard area: full width with a margin, bottom half of
/// the window.
fn keyboard_rect() -> Rect {
    let margin = 20.0;
    let height = screen_height() * 0.42;
    Rect::new(
        margin,
        screen_height() - height - margin,
        screen_width() - 2.0 * margin,
        height,
    )
}

pub async fn run_app(mut backend: EngineBackend) {
    let mut stroke: Vec<(f32, f32)> = Vec::new();
    let mut drawing = false;
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut selected: usize = 0;
    let mut committed = String::new();

    loop {
        clear_background(Color::from_rgba(30, 30, 35, 255));

        let rect = keyboard_rect();
        let (mouse_x, mouse_y) = mouse_position();
        let now = get_time();

        if is_mouse_button_pressed(MouseButton::Left) {
            drawing = true;
            stroke.clear();
            candidates.clear();
            selected = 0;
            backend.press(rect, mouse_x, mouse_y, now);
            stroke.push((mouse_x, mouse_y));
        }

        if drawing && is_mouse_button_down(MouseButton::Left) {
            backend.drag(mouse_x, mouse_y, now);
            let should_add = stroke.last().map_or(true, |(lx, ly)| {
                let dx = mouse_x - lx;
                let dy = mouse_y - ly;
                (dx * dx + dy * dy).sqrt() > 3.0
            });
            if should_add {
                stroke.push((mouse_x, mouse_y));
            }
        }

        if drawing && is_mouse_button_released(MouseButton::Left) {
            drawing = false;
            stroke.push((mouse_x, mouse_y));
            candidates = backend.release(mouse_x, mouse_y, now, &committed);
        }

        if is_key_pressed(KeyCode::Space) {
            stroke.clear();
            candidates.clear();
            selected = 0;
        }
        if is_key_pressed(KeyCode::Backspace) {
            committed.clear();
        }
        if is_key_pressed(KeyCode::Up) && selected > 0 {
            selected -= 1;
        }
        if is_key_pressed(KeyCode::Down) && selected < candidates.len().saturating_sub(1) {
            selected += 1;
        }
        if is_key_pressed(KeyCode::Enter) {
            if let Some(c) = candidates.get(selected) {
                if !committed.is_empty() {
                    committed.push(' ');
                }
                committed.push_str(&c.word);
                stroke.clear();
                candidates.clear();
                selected = 0;
            }
        }

        draw_keyboard(&backend, rect);

        if stroke.len() >= 2 {
            for i in 1..stroke.len() {
                let (x1, y1) = stroke[i - 1];
                let (x2, y2) = stroke[i];
                draw_line(x1, y1, x2, y2, 4.0, WHITE);
            }
            for (x, y) in &stroke {
                draw_circle(*x, *y, 3.0, Color::from_rgba(100, 200, 255, 200));
            }
        }

        if !candidates.is_empty() {
            draw_candidates_panel(&candidates, selected);
        }

        if !committed.is_empty() {
            draw_text(&committed, 20.0, 24.0, 26.0, WHITE);
        }

        let instructions = if drawing {
            "Drawing... release to decode"
        } else if candidates.is_empty() {
            "Swipe a word over the keyboard | Backspace=clear text"
        } else {
            "Up/Down=select | Enter=commit | Space=clear | swipe again"
        };
        draw_text(instructions, 20.0, screen_height() - 8.0, 18.0, GRAY);

        next_frame().await
    }
}

fn draw_keyboard(backend: &EngineBackend, rect: Rect) {
    let layout = backend.decoder().layout();
    let key_w = rect.width * 0.1;
    let key_h = rect.height / 3.0;

    draw_rectangle_lines(
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        2.0,
        Color::from_rgba(70, 70, 85, 255),
    );

    for c in 'a'..='z' {
        let Some(center) = layout.center(c) else {
            continue;
        };
        let cx = rect.x + center.x * rect.width;
        let cy = rect.y + center.y * rect.height;
        draw_rectangle_lines(
            cx - key_w * 0.45,
            cy - key_h * 0.42,
            key_w * 0.9,
            key_h * 0.84,
            1.5,
            Color::from_rgba(80, 80, 100, 255),
        );
        draw_text(
            &c.to_string(),
            cx - 5.0,
            cy + 6.0,
            22.0,
            Color::from_rgba(170, 170, 190, 255),
        );
    }
}

fn draw_candidates_panel(candidates: &[Candidate], selected: usize) {
    let box_x = 20.0;
    let box_y = 40.0;
    let box_w = 380.0;
    let row_h = 24.0;
    let box_h = 38.0 + candidates.len() as f32 * row_h;

    draw_rectangle(box_x, box_y, box_w, box_h, Color::from_rgba(40, 40, 50, 240));
    draw_rectangle_lines(box_x, box_y, box_w, box_h, 2.0, Color::from_rgba(80, 80, 100, 255));

    draw_text("Word", box_x + 10.0, box_y + 18.0, 16.0, GRAY);
    draw_text("Shape", box_x + 150.0, box_y + 18.0, 16.0, GRAY);
    draw_text("Lang", box_x + 225.0, box_y + 18.0, 16.0, GRAY);
    draw_text("Combined", box_x + 295.0, box_y + 18.0, 16.0, GRAY);

    for (i, c) in candidates.iter().enumerate() {
        let y = box_y + 42.0 + i as f32 * row_h;
        if i == selected {
            draw_rectangle(
                box_x + 2.0,
                y - 16.0,
                box_w - 4.0,
                row_h - 2.0,
                Color::from_rgba(60, 90, 130, 200),
            );
        }
        draw_text(&c.word, box_x + 10.0, y, 20.0, WHITE);
        draw_text(&format!("{:.2}", c.geometric), box_x + 150.0, y, 18.0, LIGHTGRAY);
        draw_text(&format!("{:.2}", c.language), box_x + 225.0, y, 18.0, LIGHTGRAY);
        draw_text(&format!("{:.2}", c.combined), box_x + 295.0, y, 18.0, LIGHTGRAY);
    }
}
