//! Background loading of the optional scene model.
//!
//! The model file is read, parsed, and triangulated on a worker thread,
//! which sends one result over a channel and exits. The render thread polls
//! for that result once per tick and performs the GPU upload itself, so
//! every scene-graph mutation stays on the render thread and a slow or
//! failing load never stalls the animation. Failures are reported once and
//! the scene simply runs without the model; there is no retry.

use glamx::{Vec2, Vec3};
use kiss3d::procedural::RenderMesh;
use log::{debug, warn};
use obj::ObjData;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use thiserror::Error;

/// Reasons the model cannot be attached. All of them are non-fatal: the
/// caller logs the error and the scene continues without the model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("cannot read model {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("cannot parse model {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: obj::ObjError,
    },
    #[error("model {path:?} contains no triangles")]
    Empty { path: PathBuf },
    #[error("model loader thread exited without reporting a result")]
    Lost,
}

/// One named batch of triangles from the model file.
#[derive(Debug)]
pub struct ModelPart {
    pub name: String,
    pub mesh: RenderMesh,
}

/// A parsed model, ready for GPU upload on the render thread.
#[derive(Debug)]
pub struct LoadedModel {
    pub path: PathBuf,
    pub parts: Vec<ModelPart>,
}

/// Handle to the one-shot background load.
pub struct ModelLoader {
    rx: Receiver<Result<LoadedModel, ModelError>>,
    delivered: bool,
}

impl ModelLoader {
    /// Starts loading `path` on a worker thread.
    pub fn spawn(path: &Path) -> ModelLoader {
        let (tx, rx) = mpsc::channel();
        let path = path.to_path_buf();
        thread::spawn(move || {
            // The receiver may already be gone if the window closed.
            let _ = tx.send(load(&path));
        });
        ModelLoader {
            rx,
            delivered: false,
        }
    }

    /// Non-blocking poll. Yields the load result exactly once, then `None`
    /// forever.
    pub fn poll(&mut self) -> Option<Result<LoadedModel, ModelError>> {
        if self.delivered {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.delivered = true;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.delivered = true;
                Some(Err(ModelError::Lost))
            }
        }
    }
}

/// Reads and triangulates the Wavefront OBJ at `path`.
///
/// Runs on the worker thread; touches no GPU state. Polygons are
/// fan-triangulated, one [`ModelPart`] per named object. Parts without
/// normals get them recomputed so the model is lit like everything else.
pub fn load(path: &Path) -> Result<LoadedModel, ModelError> {
    let bytes = std::fs::read(path).map_err(|source| ModelError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let data = ObjData::load_buf(&bytes[..]).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let parts = build_parts(&data, path);
    if parts.is_empty() {
        return Err(ModelError::Empty {
            path: path.to_path_buf(),
        });
    }
    debug!(
        "parsed {path:?}: {} parts, {} triangles",
        parts.len(),
        parts.iter().map(|p| p.mesh.coords.len() / 3).sum::<usize>()
    );
    Ok(LoadedModel {
        path: path.to_path_buf(),
        parts,
    })
}

/// Flattens every object of `data` into triangle soup. Faces referencing
/// out-of-range indices are dropped with a warning rather than failing the
/// whole model.
fn build_parts(data: &ObjData, path: &Path) -> Vec<ModelPart> {
    let mut parts = Vec::new();
    let mut skipped = 0usize;

    for object in &data.objects {
        let mut coords: Vec<Vec3> = Vec::new();
        let mut normals: Vec<Option<Vec3>> = Vec::new();
        let mut uvs: Vec<Option<Vec2>> = Vec::new();

        for group in &object.groups {
            for poly in &group.polys {
                let corners = &poly.0;
                if corners.len() < 3 {
                    skipped += 1;
                    continue;
                }
                for k in 1..corners.len() - 1 {
                    let tri = [corners[0], corners[k], corners[k + 1]];
                    let resolved: Option<Vec<_>> = tri
                        .iter()
                        .map(|&obj::IndexTuple(vi, uvi, ni)| {
                            let pos = data.position.get(vi)?;
                            let uv = match uvi {
                                Some(i) => Some(Vec2::from_array(*data.texture.get(i)?)),
                                None => None,
                            };
                            let normal = match ni {
                                Some(i) => Some(Vec3::from_array(*data.normal.get(i)?)),
                                None => None,
                            };
                            Some((Vec3::from_array(*pos), uv, normal))
                        })
                        .collect();
                    match resolved {
                        Some(tri) => {
                            for (pos, uv, normal) in tri {
                                coords.push(pos);
                                uvs.push(uv);
                                normals.push(normal);
                            }
                        }
                        None => skipped += 1,
                    }
                }
            }
        }

        if coords.is_empty() {
            continue;
        }
        // Attribute arrays are kept only when every corner has the
        // attribute; a partially attributed mesh falls back to recomputed
        // normals and no UVs.
        let normals: Option<Vec<Vec3>> = normals.into_iter().collect();
        let uvs: Option<Vec<Vec2>> = uvs.into_iter().collect();
        let mut mesh = RenderMesh::new(coords, normals, uvs, None);
        if !mesh.has_normals() {
            mesh.recompute_normals();
        }
        parts.push(ModelPart {
            name: object.name.clone(),
            mesh,
        });
    }

    if skipped > 0 {
        warn!("{skipped} malformed faces skipped in {path:?}");
    }
    parts
}
