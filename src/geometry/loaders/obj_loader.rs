/// OBJ 文件加载器
///
/// 使用 tobj crate 加载 Wavefront OBJ 格式的3D模型。
/// 文件中的每个对象成为一个网格片段；边由三角形推导，缺失的法线会被重建。
use super::MeshLoader;
use crate::core::error::{MeshLoadError, Result};
use crate::core::math::geometry::reconstruct_normals;
use crate::geometry::mesh::{edges_from_triangles, MeshFragment};
use crate::geometry::vertex::Vertex;
use std::io::BufReader;
use std::path::Path;

/// OBJ 格式加载器
///
/// # 特性
///
/// - 自动三角化
/// - UV 坐标翻转（V轴：1.0 - v）
/// - 自动重建缺失的法线
/// - OBJ 没有对象变换，片段变换为单位矩阵
pub struct ObjLoader;

impl ObjLoader {
    fn load_options() -> tobj::LoadOptions {
        tobj::LoadOptions {
            triangulate: true,    // 自动三角化
            single_index: true,   // 使用单一索引（简化处理）
            ..Default::default()
        }
    }

    fn convert(models: Vec<tobj::Model>) -> Result<Vec<MeshFragment>> {
        if models.is_empty() {
            return Err(MeshLoadError::InvalidGeometry("OBJ 文件不包含任何模型".to_string()).into());
        }

        let mut fragments = Vec::with_capacity(models.len());
        for model in models {
            let mesh = &model.mesh;
            let positions = &mesh.positions;
            let normals = &mesh.normals;
            let texcoords = &mesh.texcoords;

            if positions.len() % 3 != 0 {
                return Err(MeshLoadError::InvalidGeometry(
                    format!("顶点位置数据不完整: {} 个浮点数", positions.len())
                ).into());
            }

            let vertex_count = positions.len() / 3;
            let has_normals = normals.len() >= vertex_count * 3;
            let has_texcoords = texcoords.len() >= vertex_count * 2;

            let mut vertices: Vec<Vertex> = (0..vertex_count)
                .map(|i| {
                    let position = [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]];
                    let normal = if has_normals {
                        [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]]
                    } else {
                        [0.0, 0.0, 0.0]
                    };
                    let texcoord = if has_texcoords {
                        [texcoords[i * 2], 1.0 - texcoords[i * 2 + 1]]  // 翻转V坐标
                    } else {
                        [0.0, 0.0]
                    };
                    Vertex::new(position, normal, texcoord)
                })
                .collect();

            if let Some(&bad) = mesh.indices.iter().find(|&&idx| idx as usize >= vertex_count) {
                return Err(MeshLoadError::InvalidGeometry(
                    format!("对象 '{}' 的索引 {} 超出顶点范围", model.name, bad)
                ).into());
            }

            if !has_normals && vertex_count > 0 {
                tracing::debug!("OBJ 对象 '{}' 缺少法线数据，正在重建...", model.name);
                let raw: Vec<[f32; 3]> = vertices.iter().map(|v| v.position).collect();
                for (vertex, normal) in vertices.iter_mut().zip(reconstruct_normals(&raw, &mesh.indices)) {
                    vertex.normal = normal;
                }
            }

            let edges = edges_from_triangles(&mesh.indices);
            let fragment = MeshFragment::new(vertices, mesh.indices.clone(), edges)
                .with_name(model.name.clone());
            fragments.push(fragment);
        }

        tracing::info!(
            fragments = fragments.len(),
            vertices = fragments.iter().map(|f| f.vertices.len()).sum::<usize>(),
            "成功加载 OBJ 数据"
        );

        Ok(fragments)
    }
}

impl MeshLoader for ObjLoader {
    fn load_from_file(path: &Path) -> Result<Vec<MeshFragment>> {
        if !path.exists() {
            return Err(MeshLoadError::FileNotFound(path.to_path_buf()).into());
        }

        let (models, _materials) = tobj::load_obj(path, &Self::load_options())
            .map_err(|e| MeshLoadError::ParseError(format!("tobj 解析失败: {}", e)))?;

        Self::convert(models)
    }

    fn load_from_memory(data: &[u8]) -> Result<Vec<MeshFragment>> {
        let mut reader = BufReader::new(data);
        // 内存数据没有 mtllib 可用，材质加载直接失败（不影响几何）
        let (models, _materials) = tobj::load_obj_buf(&mut reader, &Self::load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .map_err(|e| MeshLoadError::ParseError(format!("tobj 解析失败: {}", e)))?;

        Self::convert(models)
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["obj"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "o Quad\nv 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf 1 2 3\nf 2 4 3\n";

    #[test]
    fn test_supported_extensions() {
        assert_eq!(ObjLoader::supported_extensions(), &["obj"]);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ObjLoader::load_from_file(Path::new("nonexistent.obj"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_memory() {
        let fragments = ObjLoader::load_from_memory(QUAD.as_bytes()).unwrap();
        assert_eq!(fragments.len(), 1);

        let quad = &fragments[0];
        assert_eq!(quad.name.as_deref(), Some("Quad"));
        assert_eq!(quad.vertices.len(), 4);
        assert_eq!(quad.indices.len(), 6);
        // 两个三角形共享一条对角线
        assert_eq!(quad.edges.len(), 5);
        // 法线已重建，垂直于 XY 平面
        for v in &quad.vertices {
            assert!((v.normal[2].abs() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.obj");
        std::fs::write(&path, QUAD).unwrap();

        let fragments = super::super::load_fragments(&path).unwrap();
        assert_eq!(fragments[0].vertices.len(), 4);
    }
}
