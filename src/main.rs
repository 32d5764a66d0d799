use anyhow::{anyhow, Context, Result};
use glutin::{
    config::{ConfigTemplateBuilder, GlConfig},
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{error, info, warn, LevelFilter};
use raw_window_handle::HasRawWindowHandle;
use simple_logger::SimpleLogger;
use std::{ffi::CString, num::NonZeroU32, ptr};
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

use hello_triangle::{
    config::AppConfig,
    render::{mesh::TriangleMesh, TriangleRenderer},
    shader::{build_program, parse_shader_source, GlDevice},
};

struct App {
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    renderer: Option<TriangleRenderer>,
}

impl App {
    fn new(config: &AppConfig) -> Result<(Self, EventLoop<()>)> {
        info!("Initializing application...");

        let event_loop = EventLoop::new()?;
        let window_builder = WindowBuilder::new()
            .with_title(config.window.title.as_str())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));

        let template = ConfigTemplateBuilder::new();
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("glutin offers at least one matching config")
            })
            .map_err(|e| anyhow!("Failed to create window: {}", e))?;

        let window = window.context("Display builder did not create a window")?;
        let raw_window_handle = window.raw_window_handle();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .context("Failed to create OpenGL context")?;

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .context("Failed to create GL surface")?;

        let gl_context = gl_context
            .make_current(&gl_surface)
            .context("Failed to make context current")?;

        let device = GlDevice::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()) as *const _,
            Err(_) => ptr::null(),
        });
        if let Some(version) = device.version() {
            info!("OpenGL {}", version);
        }

        if config.rendering.vsync {
            let interval = SwapInterval::Wait(NonZeroU32::MIN);
            if let Err(e) = gl_surface.set_swap_interval(&gl_context, interval) {
                warn!("Failed to enable vsync: {}", e);
            }
        }

        let [r, g, b, a] = config.rendering.clear_color;
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Enable(gl::FRAMEBUFFER_SRGB);
        }

        let mesh = TriangleMesh::upload();

        let source = parse_shader_source(&config.rendering.shader_path)?;
        // Validation checks against the bound vertex array on some drivers.
        mesh.bind();
        let program = build_program(&device, &source);
        mesh.unbind();
        let program = program.context("Failed to build shader program")?;
        info!("Shader program {} ready", program.id());

        let renderer = TriangleRenderer::new(program, mesh, config.animation);

        Ok((
            Self {
                window,
                gl_context,
                gl_surface,
                renderer: Some(renderer),
            },
            event_loop,
        ))
    }

    fn resize(&self, width: u32, height: u32) {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return;
        };
        self.gl_surface.resize(&self.gl_context, w, h);
        unsafe {
            gl::Viewport(0, 0, width as i32, height as i32);
        }
    }

    fn render(&mut self) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };

        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
        renderer.draw();

        if let Err(e) = self.gl_surface.swap_buffers(&self.gl_context) {
            error!("Failed to swap buffers: {}", e);
        }
    }

    fn cleanup(&mut self) {
        if let Some(renderer) = self.renderer.take() {
            if let Err(e) = self.gl_context.make_current(&self.gl_surface) {
                warn!("Context not current during cleanup: {}", e);
            }
            renderer.destroy();
        }
    }
}

fn main() -> Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Info).env().init()?;

    let config = AppConfig::load()?;
    let (mut app, event_loop) = App::new(&config)?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => {
                info!("Close requested");
                app.cleanup();
                elwt.exit();
            }
            WindowEvent::Resized(size) => app.resize(size.width, size.height),
            WindowEvent::RedrawRequested => app.render(),
            _ => (),
        },
        Event::AboutToWait => {
            app.window.request_redraw();
        }
        _ => (),
    })?;

    Ok(())
}
