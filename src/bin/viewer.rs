//! Real-time double pendulum viewer.
//!
//! Run with:
//!   cargo run --release --features viewer --bin viewer [config.json]
//!
//! Press Escape or close the window to quit.

use double_pendulum::{Config, InputSource, Point, Renderer, Rgb, Simulation};
use macroquad::prelude::*;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

/// Draws through macroquad's immediate-mode shape API
struct ShapeRenderer {
    background: Color,
}

fn color(rgb: Rgb) -> Color {
    Color::from_rgba(rgb[0], rgb[1], rgb[2], 255)
}

impl Renderer for ShapeRenderer {
    fn begin_frame(&mut self) {
        clear_background(self.background);
    }

    fn draw_segment(&mut self, from: Point, to: Point, width: f64, rgb: Rgb) {
        draw_line(
            from.x as f32,
            from.y as f32,
            to.x as f32,
            to.y as f32,
            width as f32,
            color(rgb),
        );
    }

    fn draw_bob(&mut self, center: Point, radius: f64, rgb: Rgb) {
        draw_circle(center.x as f32, center.y as f32, radius as f32, color(rgb));
    }

    fn draw_trail_point(&mut self, at: Point, size: f64, rgb: Rgb) {
        draw_rectangle(at.x as f32, at.y as f32, size as f32, size as f32, color(rgb));
    }
}

/// Quit on window close or Escape
struct WindowInput;

impl InputSource for WindowInput {
    fn terminate_requested(&mut self) -> bool {
        is_quit_requested() || is_key_pressed(KeyCode::Escape)
    }
}

async fn run(config: Config) {
    prevent_quit();

    let config = config.for_window_width(f64::from(screen_width()));
    let origin = Point::new(
        f64::from(screen_width()) / 2.0,
        f64::from(screen_height()) / 2.0,
    );

    let mut sim = match Simulation::from_config(&config, origin) {
        Ok(sim) => sim,
        Err(err) => {
            error!(%err, "invalid configuration");
            return;
        }
    };
    let mut input = WindowInput;
    let mut renderer = ShapeRenderer {
        background: color(config.display.background),
    };

    // Vsync paces frames; ticks are gated to the configured rate on top of it
    let frame_budget = 1.0 / config.display.fps as f32;
    let mut pending = 0.0_f32;
    info!(
        width = screen_width(),
        height = screen_height(),
        fps = config.display.fps,
        dt = config.physics.dt,
        "viewer started"
    );

    loop {
        pending += get_frame_time();
        if pending >= frame_budget {
            pending = (pending - frame_budget).min(frame_budget);
            if sim.tick(&mut input, &mut renderer).is_stop() {
                break;
            }
        } else {
            if input.terminate_requested() {
                break;
            }
            sim.render(&mut renderer);
        }
        next_frame().await;
    }

    info!(
        steps = sim.steps(),
        simulated_time = sim.elapsed(),
        energy = sim.energy(),
        diverged = sim.has_diverged(),
        "viewer closed"
    );
}

fn main() -> anyhow::Result<()> {
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(LevelFilter::INFO)
            .finish(),
    )?;

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let window = Conf {
        window_title: "Double Pendulum".to_owned(),
        window_width: config.display.width as i32,
        window_height: config.display.height as i32,
        fullscreen: config.display.fullscreen,
        ..Default::default()
    };
    macroquad::Window::from_config(window, run(config));
    Ok(())
}
