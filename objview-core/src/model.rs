//! Loading OBJ models.
//!
//! Parsing is delegated to [`tobj`]. The per-object buffers it reports are merged
//! into one shared [`AttributeBuffer`] so that every [`Shape`] refers into the same
//! position, normal and texture coordinate arrays.

use std::{io::BufRead, path::Path};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("failed to load model: {0}")]
    Failed(String),

    #[error("model loader reported success with an error: {0}")]
    Inconsistent(String),
}

/// What the loader said about a load attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderReport {
    pub success: bool,
    pub error: String,
    pub warning: String,
}

impl LoaderReport {
    fn from_result(result: &TobjResult) -> Self {
        match result {
            Ok((_, Ok(_))) => Self {
                success: true,
                ..Default::default()
            },
            Ok((_, Err(e))) => Self {
                success: true,
                warning: format!("materials not loaded: {}", e),
                ..Default::default()
            },
            Err(e) => Self {
                success: false,
                error: e.to_string(),
                ..Default::default()
            },
        }
    }
}

/// Decides whether a load attempt can be used.
///
/// A failed load is always an error. A load that claims success but still
/// carries an error message is rejected too, since the loader contradicted
/// itself. Warnings never fail a load.
pub fn check_report(report: &LoaderReport) -> Result<(), LoadError> {
    if !report.success {
        let message = if report.error.is_empty() {
            "unknown loader error".to_string()
        } else {
            report.error.clone()
        };
        return Err(LoadError::Failed(message));
    }

    if !report.error.is_empty() {
        return Err(LoadError::Inconsistent(report.error.clone()));
    }

    Ok(())
}

/// Flat per-vertex data shared by all shapes of a model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeBuffer {
    /// `xyz` triples.
    pub positions: Vec<f32>,
    /// `xyz` triples, empty when the model has no normals.
    pub normals: Vec<f32>,
    /// `uv` pairs, empty when the model has no texture coordinates.
    pub texcoords: Vec<f32>,
}

impl AttributeBuffer {
    pub fn position_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn normal_count(&self) -> usize {
        self.normals.len() / 3
    }

    pub fn texcoord_count(&self) -> usize {
        self.texcoords.len() / 2
    }
}

/// One face corner, as indices into the [`AttributeBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub position: u32,
    pub normal: Option<u32>,
    pub texcoord: Option<u32>,
}

/// A named group of triangles.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub name: String,
    pub corners: Vec<Corner>,
}

impl Shape {
    pub fn face_count(&self) -> usize {
        self.corners.len() / 3
    }
}

/// A loaded model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub attributes: AttributeBuffer,
    pub shapes: Vec<Shape>,
    pub materials: Vec<String>,
}

type TobjResult = Result<
    (Vec<tobj::Model>, Result<Vec<tobj::Material>, tobj::LoadError>),
    tobj::LoadError,
>;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: false,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

impl Model {
    /// Loads the OBJ file at `path`, along with any material library it names.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        log::debug!("Loading model from {}", path.display());
        Self::from_result(tobj::load_obj(path, &load_options()))
    }

    /// Parses OBJ text from a reader. Material libraries are not resolved.
    pub fn from_reader<R: BufRead>(reader: &mut R) -> Result<Self, LoadError> {
        Self::from_result(tobj::load_obj_buf(reader, &load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        }))
    }

    fn from_result(result: TobjResult) -> Result<Self, LoadError> {
        let report = LoaderReport::from_result(&result);
        check_report(&report)?;
        if !report.warning.is_empty() {
            log::warn!("{}", report.warning);
        }

        let (models, materials) = result.map_err(|e| LoadError::Failed(e.to_string()))?;
        let mut model = Self::merge(models);
        model.materials = materials
            .map(|materials| materials.into_iter().map(|m| m.name).collect())
            .unwrap_or_default();
        Ok(model)
    }

    /// Concatenates the per-object buffers and rebases every corner onto them.
    fn merge(models: Vec<tobj::Model>) -> Self {
        let mut attributes = AttributeBuffer::default();
        let mut shapes = Vec::with_capacity(models.len());

        for model in models {
            let mesh = model.mesh;
            let position_base = attributes.position_count() as u32;
            let normal_base = attributes.normal_count() as u32;
            let texcoord_base = attributes.texcoord_count() as u32;

            let corners = mesh
                .indices
                .iter()
                .enumerate()
                .map(|(i, &position)| Corner {
                    position: position_base + position,
                    normal: mesh.normal_indices.get(i).map(|&n| normal_base + n),
                    texcoord: mesh.texcoord_indices.get(i).map(|&t| texcoord_base + t),
                })
                .collect();

            attributes.positions.extend_from_slice(&mesh.positions);
            attributes.normals.extend_from_slice(&mesh.normals);
            attributes.texcoords.extend_from_slice(&mesh.texcoords);

            shapes.push(Shape {
                name: model.name,
                corners,
            });
        }

        Self {
            attributes,
            shapes,
            materials: Vec::new(),
        }
    }

    pub fn index_count(&self) -> usize {
        self.shapes.iter().map(|s| s.corners.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_OBJECTS: &str = "\
o floor
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 0.0 1.0
v 0.0 0.0 1.0
f 1 2 3
f 1 3 4
o wall
v 0.0 0.0 0.0
v 0.0 1.0 0.0
v 0.0 1.0 1.0
f 5 6 7
";

    fn parse(text: &str) -> Result<Model, LoadError> {
        Model::from_reader(&mut text.as_bytes())
    }

    #[test]
    fn test_check_report_all_clear() {
        let report = LoaderReport {
            success: true,
            ..Default::default()
        };
        assert_eq!(check_report(&report), Ok(()));
    }

    #[test]
    fn test_check_report_ignores_warning() {
        let report = LoaderReport {
            success: true,
            warning: "material 'white' not found".to_string(),
            ..Default::default()
        };
        assert_eq!(check_report(&report), Ok(()));
    }

    #[test]
    fn test_check_report_failure_with_error() {
        let report = LoaderReport {
            success: false,
            error: "cannot open cornell_box.obj".to_string(),
            ..Default::default()
        };
        assert_eq!(
            check_report(&report),
            Err(LoadError::Failed("cannot open cornell_box.obj".to_string()))
        );
    }

    #[test]
    fn test_check_report_failure_without_error() {
        let report = LoaderReport::default();
        assert!(matches!(check_report(&report), Err(LoadError::Failed(_))));
    }

    #[test]
    fn test_check_report_success_with_error_is_inconsistent() {
        let report = LoaderReport {
            success: true,
            error: "unexpected token".to_string(),
            ..Default::default()
        };
        assert_eq!(
            check_report(&report),
            Err(LoadError::Inconsistent("unexpected token".to_string()))
        );
    }

    #[test]
    fn test_missing_file_fails() {
        let path = std::env::temp_dir().join("objview-no-such-model.obj");
        assert!(matches!(Model::load(&path), Err(LoadError::Failed(_))));
    }

    #[test]
    fn test_single_triangle() {
        let model = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(model.shapes.len(), 1);
        assert_eq!(model.attributes.position_count(), 3);
        assert_eq!(model.shapes[0].face_count(), 1);

        let positions: Vec<u32> = model.shapes[0].corners.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert!(model.shapes[0].corners.iter().all(|c| c.normal.is_none() && c.texcoord.is_none()));
    }

    #[test]
    fn test_quads_are_triangulated() {
        let model = parse("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n").unwrap();
        assert_eq!(model.shapes[0].corners.len(), 6);
        assert_eq!(model.shapes[0].face_count(), 2);
    }

    #[test]
    fn test_objects_share_one_attribute_buffer() {
        let model = parse(TWO_OBJECTS).unwrap();
        assert_eq!(model.shapes.len(), 2);
        assert_eq!(model.shapes[0].name, "floor");
        assert_eq!(model.shapes[1].name, "wall");
        assert_eq!(model.attributes.position_count(), 7);
        assert_eq!(model.index_count(), 9);

        let wall = &model.shapes[1];
        let positions: Vec<u32> = wall.corners.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![4, 5, 6]);

        let p = positions[1] as usize * 3;
        assert_eq!(&model.attributes.positions[p..p + 3], &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_texcoords_and_normals() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
";
        let model = parse(text).unwrap();
        assert_eq!(model.attributes.texcoord_count(), 3);
        assert_eq!(model.attributes.normal_count(), 1);

        let corners = &model.shapes[0].corners;
        assert!(corners.iter().all(|c| c.normal == Some(0)));
        assert_eq!(corners[2].texcoord, Some(2));

        let t = corners[1].texcoord.unwrap() as usize * 2;
        assert_eq!(&model.attributes.texcoords[t..t + 2], &[1.0, 0.0]);
    }

    #[test]
    fn test_missing_material_library_is_only_a_warning() {
        let text = format!("mtllib missing.mtl\n{}", TWO_OBJECTS);
        let model = parse(&text).unwrap();
        assert_eq!(model.shapes.len(), 2);
        assert!(model.materials.is_empty());
    }
}
