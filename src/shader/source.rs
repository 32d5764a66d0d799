use super::{ShaderError, ShaderStage};
use std::fs;
use std::path::Path;

const VERTEX_MARKER: &str = "#shader vertex";
const FRAGMENT_MARKER: &str = "#shader fragment";

/// Vertex and fragment sources split out of one tagged shader file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    /// Splits `text` on `#shader vertex` / `#shader fragment` marker lines.
    ///
    /// Marker lines are compared after trimming and are dropped from the
    /// output. Every other line is copied verbatim, terminator included, into
    /// the section most recently opened. Lines before the first marker are
    /// discarded.
    pub fn parse(text: &str) -> Self {
        let mut source = ShaderSource::default();
        let mut current: Option<ShaderStage> = None;

        for line in text.split_inclusive('\n') {
            match line.trim() {
                VERTEX_MARKER => current = Some(ShaderStage::Vertex),
                FRAGMENT_MARKER => current = Some(ShaderStage::Fragment),
                _ => match current {
                    Some(ShaderStage::Vertex) => source.vertex.push_str(line),
                    Some(ShaderStage::Fragment) => source.fragment.push_str(line),
                    None => {}
                },
            }
        }

        source
    }

    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

/// Reads a tagged shader file and splits it into its two stages.
pub fn parse_shader_source(path: impl AsRef<Path>) -> Result<ShaderSource, ShaderError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ShaderError::ResourceNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let source = ShaderSource::parse(&text);
    log::debug!(
        "Parsed {}: {} vertex bytes, {} fragment bytes",
        path.display(),
        source.vertex.len(),
        source.fragment.len()
    );
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASE_SHADER: &str = "\
#shader vertex
#version 330 core
layout(location = 0) in vec2 position;
void main() { gl_Position = vec4(position, 0.0, 1.0); }
#shader fragment
#version 330 core
out vec4 colour;
void main() { colour = vec4(1.0); }
";

    #[test]
    fn test_sections_split_in_order() {
        let source = ShaderSource::parse(BASE_SHADER);

        assert_eq!(
            source.vertex,
            "#version 330 core\n\
             layout(location = 0) in vec2 position;\n\
             void main() { gl_Position = vec4(position, 0.0, 1.0); }\n"
        );
        assert_eq!(
            source.fragment,
            "#version 330 core\nout vec4 colour;\nvoid main() { colour = vec4(1.0); }\n"
        );
        assert!(!source.vertex.contains("#shader"));
        assert!(!source.fragment.contains("#shader"));
    }

    #[test]
    fn test_fragment_only() {
        let source = ShaderSource::parse("#shader fragment\nvoid main() {}\n");
        assert!(source.vertex.is_empty());
        assert_eq!(source.fragment, "void main() {}\n");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(ShaderSource::parse(""), ShaderSource::default());
    }

    #[test]
    fn test_lines_before_first_marker_are_dropped() {
        let source = ShaderSource::parse("preamble\n\n#shader vertex\nv\n");
        assert_eq!(source.vertex, "v\n");
        assert!(source.fragment.is_empty());
    }

    #[test]
    fn test_markers_match_after_trimming() {
        let source =
            ShaderSource::parse("#shader vertex  \r\nv\r\n\t#shader fragment\r\nf");
        assert_eq!(source.vertex, "v\r\n");
        assert_eq!(source.fragment, "f");
    }

    #[test]
    fn test_marker_must_be_whole_line() {
        let source = ShaderSource::parse(
            "#shader vertex\n// #shader fragment\n#shader vertexx\n",
        );
        assert_eq!(source.vertex, "// #shader fragment\n#shader vertexx\n");
        assert!(source.fragment.is_empty());
    }

    #[test]
    fn test_repeated_marker_keeps_appending() {
        let source =
            ShaderSource::parse("#shader vertex\na\n#shader fragment\nb\n#shader vertex\nc\n");
        assert_eq!(source.vertex, "a\nc\n");
        assert_eq!(source.fragment, "b\n");
        assert_eq!(source.stage(ShaderStage::Vertex), "a\nc\n");
        assert_eq!(source.stage(ShaderStage::Fragment), "b\n");
    }

    #[test]
    fn test_parse_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(BASE_SHADER.as_bytes()).unwrap();

        let source = parse_shader_source(file.path()).unwrap();
        assert_eq!(source, ShaderSource::parse(BASE_SHADER));
    }

    #[test]
    fn test_bundled_base_shader() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("res/shaders/Base.shader");
        let source = parse_shader_source(path).unwrap();

        assert!(source.vertex.starts_with("#version 330 core\n"));
        assert!(source.fragment.starts_with("#version 330 core\n"));
        assert!(source.vertex.contains("uniform mat4 model;"));
        assert!(source.fragment.contains("void main()"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Missing.shader");

        match parse_shader_source(&path) {
            Err(ShaderError::ResourceNotFound { path: reported, .. }) => {
                assert_eq!(reported, path)
            }
            other => panic!("expected ResourceNotFound, got {:?}", other),
        }
    }
}
