//! Headless scripted session
//!
//! Replays a list of timed window events through the input controller and
//! drives the simulation on a fixed frame clock. Used by the binary in place
//! of a window, and by tests to exercise the whole pipeline end to end.

use tether_input::{InputAction, InputController};
use tether_math::Vec3;
use tether_physics::{GrapplePhase, Terrain};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

use super::simulation::Simulation;
use crate::config::AppConfig;

/// A raw input event, as a window would deliver it
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionEvent {
    Key(KeyCode, ElementState),
    Button(MouseButton, ElementState),
    MouseMotion(f64, f64),
}

/// An event delivered just before the given frame is simulated
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptedEvent {
    pub frame: u64,
    pub event: SessionEvent,
}

impl ScriptedEvent {
    pub fn new(frame: u64, event: SessionEvent) -> Self {
        Self { frame, event }
    }

    pub fn press(frame: u64, key: KeyCode) -> Self {
        Self::new(frame, SessionEvent::Key(key, ElementState::Pressed))
    }

    pub fn release(frame: u64, key: KeyCode) -> Self {
        Self::new(frame, SessionEvent::Key(key, ElementState::Released))
    }

    pub fn click(frame: u64, button: MouseButton) -> Self {
        Self::new(frame, SessionEvent::Button(button, ElementState::Pressed))
    }

    pub fn unclick(frame: u64, button: MouseButton) -> Self {
        Self::new(frame, SessionEvent::Button(button, ElementState::Released))
    }
}

/// Aggregate outcome of a session run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionSummary {
    pub frames: u64,
    pub ticks: u64,
    pub final_position: Vec3,
    pub final_speed: f32,
    pub final_phase: GrapplePhase,
    /// Frames on which the player touched terrain
    pub contact_frames: u64,
    /// Frames the grapple spent attached
    pub attached_frames: u64,
    /// Set when Escape was pressed with the cursor free
    pub exit_requested: bool,
}

/// Simulation plus a scripted input source
pub struct ScriptedSession<T: Terrain> {
    simulation: Simulation<T>,
    controller: InputController,
    script: Vec<ScriptedEvent>,
    frame_interval_ms: f64,
    status_interval: u64,
}

impl<T: Terrain> ScriptedSession<T> {
    pub fn new(simulation: Simulation<T>, config: &AppConfig, mut script: Vec<ScriptedEvent>) -> Self {
        script.sort_by_key(|e| e.frame);
        Self {
            simulation,
            controller: InputController::new().with_mouse_sensitivity(config.input.mouse_sensitivity),
            script,
            frame_interval_ms: config.session.frame_interval_ms,
            status_interval: config.debug.status_interval,
        }
    }

    pub fn simulation(&self) -> &Simulation<T> {
        &self.simulation
    }

    /// Run `frames` frames; frame 0 establishes the time base
    ///
    /// Stops early if the script asks to exit.
    pub fn run(&mut self, frames: u64) -> SessionSummary {
        let mut next_event = 0;
        let mut contact_frames = 0;
        let mut attached_frames = 0;
        let mut exit_requested = false;
        let mut frame = 0;

        while frame < frames {
            while let Some(scripted) = self.script.get(next_event).copied().filter(|e| e.frame <= frame) {
                if self.dispatch(scripted.event) == Some(InputAction::Exit) {
                    exit_requested = true;
                }
                next_event += 1;
            }
            if exit_requested {
                log::info!("exit requested at frame {}", frame);
                break;
            }

            let snapshot = self.controller.snapshot();
            let timestamp = frame as f64 * self.frame_interval_ms;
            let result = self.simulation.update(timestamp, &snapshot);

            if result.contact.is_some() {
                contact_frames += 1;
            }
            if self.simulation.grapple_phase() == GrapplePhase::Attached {
                attached_frames += 1;
            }
            if self.status_interval > 0 && frame % self.status_interval == 0 {
                self.log_status(frame);
            }
            frame += 1;
        }

        let player = self.simulation.player();
        SessionSummary {
            frames: frame,
            ticks: self.simulation.ticks(),
            final_position: player.position,
            final_speed: player.speed(),
            final_phase: self.simulation.grapple_phase(),
            contact_frames,
            attached_frames,
            exit_requested,
        }
    }

    fn dispatch(&mut self, event: SessionEvent) -> Option<InputAction> {
        match event {
            SessionEvent::Key(key, state) => self.controller.process_keyboard(key, state),
            SessionEvent::Button(button, state) => self.controller.process_mouse_button(button, state),
            SessionEvent::MouseMotion(dx, dy) => {
                self.controller.process_mouse_motion(dx, dy);
                None
            }
        }
    }

    fn log_status(&self, frame: u64) {
        let sim = &self.simulation;
        let player = sim.player();
        let grapple = sim.grapple();
        let altitude = player.position.distance(sim.planet().center);
        log::info!(
            "frame {:4}: r={:7.2} speed={:6.2} grapple={:?} progress={} rope points={}",
            frame,
            altitude,
            player.speed(),
            grapple.phase(),
            grapple.progress(),
            grapple.rope().visible_points()
        );
    }
}

/// Fall, look down, hook the ground, reel in, let go and walk
pub fn demo_script() -> Vec<ScriptedEvent> {
    vec![
        // Capture the cursor; this click never fires
        ScriptedEvent::click(1, MouseButton::Left),
        ScriptedEvent::unclick(2, MouseButton::Left),
        // Look down toward the surface
        ScriptedEvent::new(10, SessionEvent::MouseMotion(0.0, 400.0)),
        ScriptedEvent::click(180, MouseButton::Left),
        ScriptedEvent::click(230, MouseButton::Right),
        ScriptedEvent::unclick(260, MouseButton::Right),
        ScriptedEvent::unclick(300, MouseButton::Left),
        // Level the view and walk
        ScriptedEvent::new(320, SessionEvent::MouseMotion(150.0, -400.0)),
        ScriptedEvent::press(330, KeyCode::KeyW),
        ScriptedEvent::press(380, KeyCode::KeyD),
        ScriptedEvent::release(430, KeyCode::KeyW),
        ScriptedEvent::release(450, KeyCode::KeyD),
        // Hook once more while standing, then release the cursor
        ScriptedEvent::click(480, MouseButton::Left),
        ScriptedEvent::unclick(520, MouseButton::Left),
        ScriptedEvent::press(580, KeyCode::Escape),
    ]
}
