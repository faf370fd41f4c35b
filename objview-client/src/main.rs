use std::{rc::Rc, time::Instant};

use objview_core::{
    config::ViewerConfig,
    geometry::{self, MeshVertex},
    model::Model,
};

use crate::{
    abs::*,
    error::{ViewerError, exit_code},
    render::GlBackend,
};

mod abs;
mod error;
mod logging;
mod render;

#[macro_export]
macro_rules! shader_program {
    ($name:ident, $gl:expr, $path_prefix:literal) => {
        $crate::abs::ShaderProgram::compile(
            &$gl,
            include_str!(concat!(
                $path_prefix,
                "/render/shaders/",
                stringify!($name),
                "/vert.glsl"
            )),
            include_str!(concat!(
                $path_prefix,
                "/render/shaders/",
                stringify!($name),
                "/frag.glsl"
            )),
        )
    };
}

fn main() {
    let config = ViewerConfig::load_or_default();

    let configured_level = match &config {
        Ok((config, _)) => config.log_level.as_str(),
        Err(_) => "info",
    };
    if let Err(e) = logging::init(logging::resolve_level(configured_level)) {
        eprintln!("{}", ViewerError::from(e));
    }

    let result = config
        .map_err(ViewerError::from)
        .and_then(|(config, source)| {
            match source {
                Some(path) => log::info!("Using config from {}", path.display()),
                None => log::info!("No config file found, using defaults"),
            }
            run(&config)
        });

    match &result {
        Ok(frames) => log::info!("Exiting after {} frames", frames),
        Err(e) => log::error!("{}", e),
    }

    std::process::exit(exit_code(&result));
}

/// Opens the window, uploads the model and renders it until the window is closed.
/// Returns the number of frames drawn.
fn run(config: &ViewerConfig) -> Result<u64, ViewerError> {
    let mut app = App::new(&config.title, config.width, config.height)?;

    let model = Model::load(&config.model_path)?;
    log::info!(
        "Loaded {}: {} shapes, {} positions, {} indices, {} materials",
        config.model_path.display(),
        model.shapes.len(),
        model.attributes.position_count(),
        model.index_count(),
        model.materials.len()
    );

    let program = shader_program!(textured, app.gl, ".")?;
    log::debug!("Compiled textured shader program");

    // The sampler is never given a loaded texture; keep it defined.
    let texture = Texture::white(&app.gl)?;
    texture.bind(0);
    program.use_program();
    program.set_uniform("texture1", 0_i32);

    let vertices = geometry::assemble_vertices(&model.attributes, &model.shapes);
    let vertex_buffer = Rc::new(VertexBuffer::new(&app.gl, &vertices)?);
    let meshes = model
        .shapes
        .iter()
        .map(|shape| {
            Mesh::new::<MeshVertex>(&app.gl, &vertex_buffer, &geometry::extract_indices(shape))
        })
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!(
        "Uploaded {} vertices and {} indices for {} meshes",
        vertex_buffer.vertex_count(),
        meshes.iter().map(Mesh::index_count).sum::<usize>(),
        meshes.len()
    );

    let camera = config.camera();
    let start = Instant::now();
    let mut backend = GlBackend::new(&mut app, &program);

    Ok(objview_core::render::run(
        &mut backend,
        &meshes,
        &camera,
        config.clear_color,
        || start.elapsed().as_secs_f32(),
    ))
}
