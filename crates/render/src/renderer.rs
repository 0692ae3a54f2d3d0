use glam::Vec3;
use kartway_kernel::Session;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 5.0, 10.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
        }
    }
}

/// Renderer-agnostic interface.
///
/// A renderer reads the session and a view, then produces output. It never
/// mutates the session.
pub trait Renderer {
    type Output;

    /// Render one frame from the given session state and view.
    fn render(&self, session: &Session, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable summary of one frame.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, session: &Session, view: &RenderView) -> String {
        let mut out = String::new();
        let pose = session.pose();
        let p = pose.position;
        out.push_str(&format!("=== Session State (tick={}) ===\n", session.tick()));
        out.push_str(&format!("{}\n", session.track().stats()));
        out.push_str(&format!(
            "Kart: pos=({:.2}, {:.2}, {:.2}) yaw={:.3}",
            p.x, p.y, p.z, pose.yaw
        ));
        out.push_str(&format!(
            " pitch={:.2} roll={:.2} steer={:.2} spin={:.2}\n",
            pose.pitch_tilt, pose.roll_tilt, pose.wheel_steer, pose.wheel_spin
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));
        match session.inputs().last() {
            Some(last) => out.push_str(&format!(
                "Inputs: {} recorded (last: {})\n",
                session.inputs().len(),
                last.mode_name()
            )),
            None => out.push_str("Inputs: none\n"),
        }
        out
    }
}
