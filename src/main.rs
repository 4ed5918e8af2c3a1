/// Entry point and frame loop.

mod config;
mod domain;
mod render;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::camera::MovementIntent;
use sim::world::World;
use ui::input::InputState;
use ui::term::Term;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();
    let mut world = World::new(&config);
    let mut term = Term::new();

    if let Err(e) = term.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = run(&mut world, &mut term, &config);

    if let Err(e) = term.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }
}

// ── Key Constants ──

const KEYS_FORWARD: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_BACKWARD: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_STRAFE_L: &[KeyCode] = &[KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_STRAFE_R: &[KeyCode] = &[KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_TURN_L: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('q'), KeyCode::Char('Q')];
const KEYS_TURN_R: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('e'), KeyCode::Char('E')];
const KEYS_REGEN: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_MAP: &[KeyCode] = &[KeyCode::Char('m'), KeyCode::Char('M')];

fn detect_intent(kb: &InputState) -> MovementIntent {
    MovementIntent {
        forward: kb.any_held(KEYS_FORWARD),
        backward: kb.any_held(KEYS_BACKWARD),
        strafe_left: kb.any_held(KEYS_STRAFE_L),
        strafe_right: kb.any_held(KEYS_STRAFE_R),
    }
}

fn run(
    world: &mut World,
    term: &mut Term,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut last_tick = Instant::now();
    let frame_interval = Duration::from_millis(config.display.frame_interval_ms);

    // First frame: paint synchronously, canceling the pending paint the
    // initial render scheduled.
    term.draw(&world.grid, &status_line(world))?;
    world.scheduler.cancel();

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() || kb.any_pressed(&[KeyCode::Esc]) {
            break;
        }

        // ── Edge-triggered actions (apply on the input event) ──

        if kb.any_pressed(KEYS_TURN_L) {
            world.rotate(-config.camera.rotation_speed);
        }
        if kb.any_pressed(KEYS_TURN_R) {
            world.rotate(config.camera.rotation_speed);
        }
        if kb.any_pressed(KEYS_MAP) {
            world.toggle_map();
        }
        if kb.any_pressed(KEYS_REGEN) {
            // Regenerate is atomic: rebuild, reposition, render — then
            // paint immediately, bypassing the debounce.
            world.regenerate();
            term.draw(&world.grid, &status_line(world))?;
            world.scheduler.cancel();
        }

        // Mouse drag: rotate by accumulated column delta.
        let drag = kb.take_drag_dx();
        if drag != 0 {
            world.rotate(drag as f64 * config.camera.mouse_sensitivity);
        }

        // ── Held movement, applied once per frame interval ──

        if last_tick.elapsed() >= frame_interval {
            world.apply_intent(detect_intent(&kb), config.camera.move_speed);

            // Holding a rotation key keeps turning; the fresh press was
            // already applied above, so skip it this frame.
            if kb.any_held(KEYS_TURN_L) && !kb.any_pressed(KEYS_TURN_L) {
                world.rotate(-config.camera.rotation_speed);
            }
            if kb.any_held(KEYS_TURN_R) && !kb.any_pressed(KEYS_TURN_R) {
                world.rotate(config.camera.rotation_speed);
            }

            last_tick = Instant::now();
        }

        // ── One paint per iteration, however many mutations occurred ──

        if world.scheduler.take() {
            term.draw(&world.grid, &status_line(world))?;
        }

        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn status_line(world: &World) -> String {
    let seed = match world.seed() {
        Some(s) => format!("seed {s}"),
        None => String::from("random"),
    };
    format!(
        " ({:.1}, {:.1})  {:.0}°  {}  │  WASD move  Q/E turn  drag look  M map  R new maze  ESC quit",
        world.camera.x,
        world.camera.y,
        world.camera.angle.to_degrees(),
        seed,
    )
}
