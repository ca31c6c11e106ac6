//! 绑定产物
//!
//! 最终网格、顶点组和骨骼引用打包为一个值，作为单次调用交给导出端。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{ExportError, Result};
use crate::geometry::{Mesh, Vertex};
use crate::rig::groups::VertexGroups;
use crate::skeleton::{Skeleton, SkeletonDef};

/// 绑定到骨骼的网格
#[derive(Debug, Clone)]
pub struct BoundMesh {
    pub mesh: Mesh,
    pub skeleton: Skeleton,
    /// 顶点组，顺序与骨骼顺序一致
    pub groups: VertexGroups,
    /// 网格的父节点（骨架名称）
    pub parent: String,
}

/// 产物的文件表示
///
/// 标量和数组在前，表在后，保证 TOML 输出合法。
#[derive(Debug, Serialize, Deserialize)]
struct ArtifactDoc {
    name: String,
    parent: String,
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    texcoords: Vec<[f32; 2]>,
    #[serde(default)]
    indices: Vec<u32>,
    #[serde(default)]
    edges: Vec<[u32; 2]>,
    skeleton: SkeletonDef,
    #[serde(default)]
    groups: Vec<GroupDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GroupDoc {
    bone: String,
    vertices: Vec<u32>,
    weights: Vec<f32>,
}

impl BoundMesh {
    /// 组装产物，父节点为骨架
    pub fn new(mesh: Mesh, skeleton: Skeleton, groups: VertexGroups) -> Self {
        let parent = skeleton.name.clone();
        Self {
            mesh,
            skeleton,
            groups,
            parent,
        }
    }

    pub fn name(&self) -> &str {
        self.mesh.name.as_deref().unwrap_or("Mesh")
    }

    pub fn to_toml_string(&self) -> Result<String> {
        let groups = (0..self.groups.group_count())
            .map(|bone| {
                let group = self.groups.group(bone);
                GroupDoc {
                    bone: self
                        .skeleton
                        .bones
                        .get(bone)
                        .map(|b| b.name.clone())
                        .unwrap_or_else(|| format!("group.{}", bone)),
                    vertices: group.keys().copied().collect(),
                    weights: group.values().copied().collect(),
                }
            })
            .collect();

        let doc = ArtifactDoc {
            name: self.name().to_string(),
            parent: self.parent.clone(),
            positions: self.mesh.vertices.iter().map(|v| v.position).collect(),
            normals: self.mesh.vertices.iter().map(|v| v.normal).collect(),
            texcoords: self.mesh.vertices.iter().map(|v| v.texcoord).collect(),
            indices: self.mesh.indices.clone(),
            edges: self.mesh.edges.clone(),
            skeleton: self.skeleton.to_def(),
            groups,
        };

        toml::to_string(&doc).map_err(|e| ExportError::Serialize(e.to_string()).into())
    }

    /// 从 TOML 文本回读
    ///
    /// 第 i 个顶点组必须对应第 i 根骨骼；顶点组可以少于骨骼，不能多于骨骼。
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let doc: ArtifactDoc = toml::from_str(contents)
            .map_err(|e| ExportError::Deserialize(e.to_string()))?;

        let vertex_count = doc.positions.len();
        if doc.normals.len() != vertex_count || doc.texcoords.len() != vertex_count {
            return Err(ExportError::Inconsistent(format!(
                "{} positions, {} normals, {} texcoords",
                vertex_count,
                doc.normals.len(),
                doc.texcoords.len()
            ))
            .into());
        }

        let skeleton = Skeleton::from_def(doc.skeleton)?;
        if doc.groups.len() > skeleton.bone_count() {
            return Err(ExportError::Inconsistent(format!(
                "{} vertex groups for {} bones",
                doc.groups.len(),
                skeleton.bone_count()
            ))
            .into());
        }

        let mut groups = VertexGroups::new(doc.groups.len(), vertex_count);
        for (bone, group) in doc.groups.into_iter().enumerate() {
            if group.bone != skeleton.bones[bone].name {
                return Err(ExportError::Inconsistent(format!(
                    "vertex group '{}' does not match bone '{}'",
                    group.bone, skeleton.bones[bone].name
                ))
                .into());
            }
            if group.vertices.len() != group.weights.len() {
                return Err(ExportError::Inconsistent(format!(
                    "vertex group '{}' has {} vertices and {} weights",
                    group.bone,
                    group.vertices.len(),
                    group.weights.len()
                ))
                .into());
            }
            for (&vertex, &weight) in group.vertices.iter().zip(&group.weights) {
                if vertex as usize >= vertex_count {
                    return Err(ExportError::Inconsistent(format!(
                        "vertex group '{}' references vertex {}",
                        group.bone, vertex
                    ))
                    .into());
                }
                groups.set(bone, vertex as usize, weight);
            }
        }

        let mesh = Mesh {
            name: Some(doc.name),
            vertices: doc
                .positions
                .into_iter()
                .zip(doc.normals)
                .zip(doc.texcoords)
                .map(|((position, normal), texcoord)| Vertex::new(position, normal, texcoord))
                .collect(),
            indices: doc.indices,
            edges: doc.edges,
        };
        mesh.validate().map_err(ExportError::Inconsistent)?;

        Ok(Self {
            mesh,
            skeleton,
            groups,
            parent: doc.parent,
        })
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        tracing::info!(
            vertices = self.mesh.vertex_count(),
            groups = self.groups.group_count(),
            "Saved bound mesh '{}' to {}",
            self.name(),
            path.display()
        );
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DistRigError;
    use crate::rig::fixtures;

    fn sample() -> BoundMesh {
        let skeleton = fixtures::humanoid_skeleton();
        let mut mesh = Mesh::with_name("Body");
        mesh.vertices = vec![
            Vertex::new([0.0, 0.0, 0.5], [1.0, 0.0, 0.0], [0.5, 0.5]),
            Vertex::at([0.0, 0.1, 0.9]),
            Vertex::at([0.1, 0.0, 1.3]),
        ];
        mesh.indices = vec![0, 1, 2];
        mesh.edges = vec![[0, 1], [0, 2], [1, 2]];

        let mut groups = VertexGroups::new(skeleton.bone_count(), 3);
        groups.set(1, 0, 0.75);
        groups.set(2, 0, 0.25);
        groups.set(3, 1, 1.0);
        groups.set(4, 2, 1.0);
        BoundMesh::new(mesh, skeleton, groups)
    }

    #[test]
    fn test_parent_is_skeleton() {
        let bound = sample();
        assert_eq!(bound.parent, "Rig_Medium");
        assert_eq!(bound.name(), "Body");
    }

    #[test]
    fn test_toml_round_trip_keeps_counts() {
        let bound = sample();
        let text = bound.to_toml_string().unwrap();
        let back = BoundMesh::from_toml_str(&text).unwrap();

        assert_eq!(back.parent, bound.parent);
        assert_eq!(back.skeleton.bone_count(), 23);
        assert_eq!(back.groups.group_count(), 23);
        assert_eq!(back.mesh.vertex_count(), 3);
        assert_eq!(back.mesh.edges, bound.mesh.edges);
        assert_eq!(back.groups.get(1, 0), 0.75);
        assert_eq!(back.mesh.vertices[0], bound.mesh.vertices[0]);
    }

    #[test]
    fn test_mismatched_group_rejected() {
        let text = sample()
            .to_toml_string()
            .unwrap()
            .replacen("bone = \"hips\"", "bone = \"pelvis\"", 1);
        assert!(matches!(
            BoundMesh::from_toml_str(&text),
            Err(DistRigError::Export(ExportError::Inconsistent(_)))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("body.toml");

        sample().save_to_file(&path).unwrap();
        let back = BoundMesh::load_from_file(&path).unwrap();
        assert_eq!(back.groups.nonzero_groups(), 4);
    }
}
