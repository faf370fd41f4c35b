//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which owns the window, the OpenGL 3.3
//! core context and the event pump.

use std::sync::Arc;

use glow::HasContext;

use crate::error::ViewerError;

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
}

impl App {
    /// Creates a fixed-size window with a current OpenGL 3.3 core context.
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, ViewerError> {
        let sdl = sdl2::init().map_err(ViewerError::window)?;
        let video_subsystem = sdl.video().map_err(ViewerError::window)?;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);

        let window = video_subsystem
            .window(title, width, height)
            .opengl()
            .position_centered()
            .build()
            .map_err(ViewerError::window)?;
        let gl_context = window.gl_create_context().map_err(ViewerError::window)?;
        window
            .gl_make_current(&gl_context)
            .map_err(ViewerError::window)?;

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let version = gl.version();
        if (version.major, version.minor) < (3, 3) {
            return Err(ViewerError::gl(format!(
                "OpenGL 3.3 required, got {}.{}",
                version.major, version.minor
            )));
        }
        log::info!(
            "Created {}x{} window with OpenGL {}.{}",
            width,
            height,
            version.major,
            version.minor
        );

        let event_pump = sdl.event_pump().map_err(ViewerError::window)?;

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl: Arc::new(gl),
            event_pump,
        })
    }

    /// Drains pending window events. Returns `true` if the window was asked to close.
    pub fn poll_close(&mut self) -> bool {
        let mut close = false;
        for event in self.event_pump.poll_iter() {
            match event {
                sdl2::event::Event::Quit { .. }
                | sdl2::event::Event::Window {
                    win_event: sdl2::event::WindowEvent::Close,
                    ..
                } => close = true,
                _ => {}
            }
        }
        close
    }
}
