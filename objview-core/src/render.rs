//! The render loop.
//!
//! The loop only decides what happens each frame and in which order. The actual
//! graphics calls live behind [`RenderBackend`], which the client implements on
//! top of OpenGL.

use glam::Vec4;

use crate::transform::{Camera, TransformSet};

/// The operations the render loop needs from a window and graphics context.
pub trait RenderBackend {
    /// GPU-side representation of one shape.
    type Shape;

    /// Whether the window has been asked to close.
    fn close_requested(&mut self) -> bool;

    /// Clears the color and depth buffers.
    fn clear(&mut self, color: Vec4);

    /// Uploads the model, view and projection matrices.
    fn upload_transforms(&mut self, transforms: &TransformSet);

    /// Issues the indexed draw call for one shape.
    fn draw_shape(&mut self, shape: &Self::Shape);

    /// Presents the frame and polls window events.
    fn present(&mut self);
}

/// Draws every shape once per frame until the backend reports a close request.
///
/// `clock` returns the seconds elapsed since start, which drives the model
/// rotation. Returns the number of frames presented.
pub fn run<B, C>(
    backend: &mut B,
    shapes: &[B::Shape],
    camera: &Camera,
    clear_color: Vec4,
    mut clock: C,
) -> u64
where
    B: RenderBackend,
    C: FnMut() -> f32,
{
    let mut frames = 0;

    while !backend.close_requested() {
        backend.clear(clear_color);
        backend.upload_transforms(&TransformSet::at(camera, clock()));
        for shape in shapes {
            backend.draw_shape(shape);
        }
        backend.present();
        frames += 1;
    }

    log::debug!("Render loop finished after {} frames", frames);
    frames
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::*;
    use crate::transform::model_matrix;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear(Vec4),
        Transforms(Mat4),
        Draw(&'static str),
        Present,
    }

    /// Records every call and requests a close after a fixed number of frames.
    struct RecordingBackend {
        frames_until_close: usize,
        presented: usize,
        calls: Vec<Call>,
    }

    impl RecordingBackend {
        fn closing_after(frames: usize) -> Self {
            Self {
                frames_until_close: frames,
                presented: 0,
                calls: Vec::new(),
            }
        }

        /// The calls made between two presents, one entry per frame.
        fn frames(&self) -> Vec<Vec<Call>> {
            self.calls
                .split(|call| *call == Call::Present)
                .filter(|frame| !frame.is_empty())
                .map(|frame| frame.to_vec())
                .collect()
        }
    }

    impl RenderBackend for RecordingBackend {
        type Shape = &'static str;

        fn close_requested(&mut self) -> bool {
            self.presented >= self.frames_until_close
        }

        fn clear(&mut self, color: Vec4) {
            self.calls.push(Call::Clear(color));
        }

        fn upload_transforms(&mut self, transforms: &TransformSet) {
            self.calls.push(Call::Transforms(transforms.model));
        }

        fn draw_shape(&mut self, shape: &Self::Shape) {
            self.calls.push(Call::Draw(*shape));
        }

        fn present(&mut self) {
            self.calls.push(Call::Present);
            self.presented += 1;
        }
    }

    fn camera() -> Camera {
        Camera {
            position: Vec3::new(0.0, 0.0, 3.0),
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            fov_degrees: 45.0,
            aspect: 800.0 / 600.0,
            near: 0.1,
            far: 100.0,
        }
    }

    const BACKGROUND: Vec4 = Vec4::new(0.2, 0.3, 0.3, 1.0);

    #[test]
    fn test_every_shape_drawn_every_frame() {
        let shapes = ["floor", "ceiling", "left_wall", "short_box"];
        let mut backend = RecordingBackend::closing_after(5);

        let frames = run(&mut backend, &shapes, &camera(), BACKGROUND, || 0.0);
        assert_eq!(frames, 5);

        let recorded = backend.frames();
        assert_eq!(recorded.len(), 5);
        for frame in recorded {
            let drawn: Vec<&str> = frame
                .iter()
                .filter_map(|call| match call {
                    Call::Draw(name) => Some(*name),
                    _ => None,
                })
                .collect();
            assert_eq!(drawn, shapes);
        }
    }

    #[test]
    fn test_frame_order() {
        let mut backend = RecordingBackend::closing_after(1);
        run(&mut backend, &["a", "b"], &camera(), BACKGROUND, || 0.0);

        assert_eq!(
            backend.calls,
            vec![
                Call::Clear(BACKGROUND),
                Call::Transforms(Mat4::IDENTITY),
                Call::Draw("a"),
                Call::Draw("b"),
                Call::Present,
            ]
        );
    }

    #[test]
    fn test_closed_before_first_frame() {
        let mut backend = RecordingBackend::closing_after(0);
        let frames = run(&mut backend, &["a"], &camera(), BACKGROUND, || 0.0);
        assert_eq!(frames, 0);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_rotation_follows_clock() {
        let times = [0.0_f32, 0.016, 1.5];
        let mut next = times.iter().copied();
        let mut backend = RecordingBackend::closing_after(times.len());

        run(&mut backend, &["a"], &camera(), BACKGROUND, || {
            next.next().unwrap_or(0.0)
        });

        let models: Vec<Mat4> = backend
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Transforms(model) => Some(*model),
                _ => None,
            })
            .collect();
        assert_eq!(models.len(), times.len());
        for (model, t) in models.iter().zip(times) {
            assert!(model.abs_diff_eq(model_matrix(t), 1e-6));
        }
    }

    #[test]
    fn test_no_shapes_still_presents() {
        let mut backend = RecordingBackend::closing_after(2);
        let frames = run(&mut backend, &[], &camera(), BACKGROUND, || 0.0);
        assert_eq!(frames, 2);
        assert!(!backend.calls.iter().any(|call| matches!(call, Call::Draw(_))));
    }
}
