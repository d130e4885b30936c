//! Save/restore of the entire model state.
//!
//! `save_state` walks every entity in the graph — model entities, use
//! objects, groups, materials — and emits one [`Record`] each, together with
//! every Face/Edge's reverse-classification cell list and every model
//! entity's appearance. `restore_state` resets the graph, rebuilds every
//! record with its exact id (forward references resolve once all records are
//! in), re-applies classification, then appearances, and restores the id
//! counter.
//!
//! [`StateSerializer`] wraps the two as one operator with an explicit
//! save/restore mode flag.

use crate::io::archive::{Archive, PropertyBag, Record};
use crate::materials::Material;
use crate::groups::EntityGroup;
use crate::model::Model;
use crate::model_error::ModelError;
use crate::ops::operator::ModelOperator;
use crate::topology::entity::{
    Appearance, Edge, EdgeUse, Face, FaceUse, LoopUse, Region, ShellUse, Vertex, VertexUse,
};
use crate::topology::entity_id::EntityId;
use crate::topology::graph::{EntityGraph, RawRecord};
use crate::topology::kind::EntityKind;

const KEY_POINT: &str = "point";
const KEY_USE_ENDS: &str = "use_ends";
const KEY_VERTEX_SLOTS: &str = "vertex_slots";
const KEY_FORWARD: &str = "forward";
const KEY_ORIENTATION: &str = "orientation";
const KEY_CELLS: &str = "cells";
const KEY_COLOR: &str = "color";
const KEY_VISIBLE: &str = "visible";
const KEY_NAME: &str = "name";
const KEY_MEMBER_KIND: &str = "member_kind";

fn kind_code(kind: EntityKind) -> i64 {
    match kind {
        EntityKind::Vertex => 0,
        EntityKind::Edge => 1,
        EntityKind::Face => 2,
        EntityKind::Region => 3,
        EntityKind::EdgeUse => 4,
        EntityKind::LoopUse => 5,
        EntityKind::FaceUse => 6,
        EntityKind::ShellUse => 7,
        EntityKind::Group => 8,
        EntityKind::Material => 9,
    }
}

fn kind_from_code(record: u64, code: i64) -> Result<EntityKind, ModelError> {
    Ok(match code {
        0 => EntityKind::Vertex,
        1 => EntityKind::Edge,
        2 => EntityKind::Face,
        3 => EntityKind::Region,
        4 => EntityKind::EdgeUse,
        5 => EntityKind::LoopUse,
        6 => EntityKind::FaceUse,
        7 => EntityKind::ShellUse,
        8 => EntityKind::Group,
        9 => EntityKind::Material,
        other => {
            return Err(ModelError::MalformedRecord {
                id: record,
                reason: format!("unknown kind code {other}"),
            });
        }
    })
}

fn put_appearance(properties: &mut PropertyBag, appearance: &Appearance) {
    properties.set_doubles(KEY_COLOR, appearance.color.to_vec());
    properties.set_longs(KEY_VISIBLE, vec![i64::from(appearance.visible)]);
}

fn put_classification(model: &Model, record: &mut Record, id: EntityId) {
    let cells = model.classification.reverse_classification(id);
    if !cells.is_empty() {
        record
            .properties
            .set_longs(KEY_CELLS, cells.iter().map(|&c| c as i64).collect());
    }
}

/// Walks the whole model into a flat archive.
pub fn save_state(model: &Model) -> Result<Archive, ModelError> {
    let graph = &model.graph;
    let mut records = Vec::new();
    let mut root = Vec::new();

    for id in graph.iter(EntityKind::Vertex) {
        let vertex = graph.vertex(id)?;
        let mut record = Record::new(id.get(), EntityKind::Vertex);
        if let Some(point) = vertex.point {
            record.properties.set_longs(KEY_POINT, vec![point as i64]);
        }
        record.associate(EntityKind::Edge, vertex.uses.iter().map(|u| u.edge.get()));
        record.properties.set_longs(
            KEY_USE_ENDS,
            vertex.uses.iter().map(|u| i64::from(u.end)).collect(),
        );
        put_appearance(&mut record.properties, &vertex.appearance);
        root.push(record.id);
        records.push(record);
    }

    for id in graph.iter(EntityKind::Edge) {
        let edge = graph.edge(id)?;
        let mut record = Record::new(id.get(), EntityKind::Edge);
        record.properties.set_longs(
            KEY_VERTEX_SLOTS,
            edge.vertices
                .iter()
                .map(|v| v.map_or(0, |v| v.get() as i64))
                .collect(),
        );
        record.associate(EntityKind::Vertex, edge.vertices.iter().flatten().map(|v| v.get()));
        record.associate(EntityKind::EdgeUse, edge.uses.iter().map(|u| u.get()));
        put_classification(model, &mut record, id);
        put_appearance(&mut record.properties, &edge.appearance);
        root.push(record.id);
        records.push(record);
    }

    for id in graph.iter(EntityKind::EdgeUse) {
        let edge_use = graph.edge_use(id)?;
        let mut record = Record::new(id.get(), EntityKind::EdgeUse);
        record
            .properties
            .set_longs(KEY_FORWARD, vec![i64::from(edge_use.forward)]);
        record.associate(EntityKind::Edge, [edge_use.edge.get()]);
        record.associate(EntityKind::LoopUse, edge_use.loop_use.map(|l| l.get()));
        records.push(record);
    }

    for id in graph.iter(EntityKind::LoopUse) {
        let loop_use = graph.loop_use(id)?;
        let mut record = Record::new(id.get(), EntityKind::LoopUse);
        record.associate(EntityKind::FaceUse, [loop_use.face_use.get()]);
        record.associate(EntityKind::EdgeUse, loop_use.edge_uses.iter().map(|u| u.get()));
        records.push(record);
    }

    for id in graph.iter(EntityKind::Face) {
        let face = graph.face(id)?;
        let mut record = Record::new(id.get(), EntityKind::Face);
        record.associate(EntityKind::FaceUse, face.uses.iter().map(|u| u.get()));
        put_classification(model, &mut record, id);
        put_appearance(&mut record.properties, &face.appearance);
        root.push(record.id);
        records.push(record);
    }

    for id in graph.iter(EntityKind::FaceUse) {
        let face_use = graph.face_use(id)?;
        let mut record = Record::new(id.get(), EntityKind::FaceUse);
        record
            .properties
            .set_longs(KEY_ORIENTATION, vec![i64::from(face_use.orientation)]);
        record.associate(EntityKind::Face, [face_use.face.get()]);
        record.associate(EntityKind::ShellUse, face_use.shell_use.map(|s| s.get()));
        record.associate(EntityKind::LoopUse, face_use.loop_uses.iter().map(|l| l.get()));
        records.push(record);
    }

    for id in graph.iter(EntityKind::ShellUse) {
        let shell = graph.shell_use(id)?;
        let mut record = Record::new(id.get(), EntityKind::ShellUse);
        record.associate(EntityKind::Region, [shell.region.get()]);
        record.associate(EntityKind::FaceUse, shell.face_uses.iter().map(|u| u.get()));
        records.push(record);
    }

    for id in graph.iter(EntityKind::Region) {
        let region = graph.region(id)?;
        let mut record = Record::new(id.get(), EntityKind::Region);
        record.associate(EntityKind::ShellUse, region.shell_uses.iter().map(|s| s.get()));
        put_appearance(&mut record.properties, &region.appearance);
        root.push(record.id);
        records.push(record);
    }

    for group in model.groups.iter() {
        let mut record = Record::new(group.id.get(), EntityKind::Group);
        record.properties.set_text(KEY_NAME, group.name.clone());
        record
            .properties
            .set_longs(KEY_MEMBER_KIND, vec![kind_code(group.kind)]);
        record.associate(group.kind, group.members().map(|m| m.get()));
        root.push(record.id);
        records.push(record);
    }

    for material in model.materials.iter() {
        let mut record = Record::new(material.id.get(), EntityKind::Material);
        record.properties.set_text(KEY_NAME, material.name.clone());
        record.associate(
            EntityKind::Face,
            material.members_of(EntityKind::Face).map(|m| m.get()),
        );
        record.associate(
            EntityKind::Region,
            material.members_of(EntityKind::Region).map(|m| m.get()),
        );
        root.push(record.id);
        records.push(record);
    }

    Ok(Archive {
        next_id: graph.next_id(),
        records,
        root,
    })
}

fn required_longs<'a>(
    record: &'a Record,
    key: &str,
    len: usize,
) -> Result<&'a [i64], ModelError> {
    let values = record
        .properties
        .longs(key)
        .ok_or_else(|| ModelError::MalformedRecord {
            id: record.id,
            reason: format!("missing `{key}` property"),
        })?;
    if values.len() != len {
        return Err(ModelError::MalformedRecord {
            id: record.id,
            reason: format!("`{key}` has {} values, expected {len}", values.len()),
        });
    }
    Ok(values)
}

fn id_pair(record: &Record, kind: EntityKind) -> Result<[EntityId; 2], ModelError> {
    match record.associated(kind) {
        &[a, b] => Ok([EntityId::new(a)?, EntityId::new(b)?]),
        other => Err(ModelError::MalformedRecord {
            id: record.id,
            reason: format!("expected two {kind:?} associations, found {}", other.len()),
        }),
    }
}

fn id_list(record: &Record, kind: EntityKind) -> Result<Vec<EntityId>, ModelError> {
    record
        .associated(kind)
        .iter()
        .map(|&raw| EntityId::new(raw))
        .collect()
}

fn optional_id(record: &Record, kind: EntityKind) -> Result<Option<EntityId>, ModelError> {
    record.optional_one(kind)?.map(EntityId::new).transpose()
}

fn required_id(record: &Record, kind: EntityKind) -> Result<EntityId, ModelError> {
    EntityId::new(record.required_one(kind)?)
}

fn topological_record(record: &Record) -> Result<Option<RawRecord>, ModelError> {
    let raw = match record.kind {
        EntityKind::Vertex => {
            let point = match record.properties.longs(KEY_POINT) {
                Some(&[p]) => Some(usize::try_from(p).map_err(|_| ModelError::MalformedRecord {
                    id: record.id,
                    reason: format!("negative point index {p}"),
                })?),
                Some(other) => {
                    return Err(ModelError::MalformedRecord {
                        id: record.id,
                        reason: format!("`point` has {} values, expected 1", other.len()),
                    });
                }
                None => None,
            };
            let edges = record.associated(EntityKind::Edge);
            let ends = record.properties.longs(KEY_USE_ENDS).unwrap_or(&[]);
            if edges.len() != ends.len() {
                return Err(ModelError::MalformedRecord {
                    id: record.id,
                    reason: "vertex-use edges and ends differ in length".into(),
                });
            }
            let uses = edges
                .iter()
                .zip(ends)
                .map(|(&edge, &end)| {
                    Ok(VertexUse {
                        edge: EntityId::new(edge)?,
                        end: end as u8,
                    })
                })
                .collect::<Result<_, ModelError>>()?;
            RawRecord::Vertex(Vertex {
                point,
                uses,
                appearance: Appearance::default(),
            })
        }
        EntityKind::Edge => {
            let slots = required_longs(record, KEY_VERTEX_SLOTS, 2)?;
            let mut vertices = [None, None];
            for (slot, &raw) in slots.iter().enumerate() {
                if raw != 0 {
                    vertices[slot] = Some(EntityId::new(raw as u64)?);
                }
            }
            RawRecord::Edge(Edge {
                vertices,
                uses: id_pair(record, EntityKind::EdgeUse)?,
                appearance: Appearance::default(),
            })
        }
        EntityKind::EdgeUse => RawRecord::EdgeUse(EdgeUse {
            edge: required_id(record, EntityKind::Edge)?,
            forward: required_longs(record, KEY_FORWARD, 1)?[0] != 0,
            loop_use: optional_id(record, EntityKind::LoopUse)?,
        }),
        EntityKind::LoopUse => RawRecord::LoopUse(LoopUse {
            face_use: required_id(record, EntityKind::FaceUse)?,
            edge_uses: id_list(record, EntityKind::EdgeUse)?,
        }),
        EntityKind::Face => RawRecord::Face(Face {
            uses: id_pair(record, EntityKind::FaceUse)?,
            appearance: Appearance::default(),
        }),
        EntityKind::FaceUse => RawRecord::FaceUse(FaceUse {
            face: required_id(record, EntityKind::Face)?,
            orientation: required_longs(record, KEY_ORIENTATION, 1)?[0] != 0,
            shell_use: optional_id(record, EntityKind::ShellUse)?,
            loop_uses: id_list(record, EntityKind::LoopUse)?,
        }),
        EntityKind::ShellUse => RawRecord::ShellUse(ShellUse {
            region: required_id(record, EntityKind::Region)?,
            face_uses: id_list(record, EntityKind::FaceUse)?,
        }),
        EntityKind::Region => RawRecord::Region(Region {
            shell_uses: id_list(record, EntityKind::ShellUse)?,
            appearance: Appearance::default(),
        }),
        EntityKind::Group | EntityKind::Material => return Ok(None),
    };
    Ok(Some(raw))
}

fn restore_registries(model: &mut Model, archive: &Archive) -> Result<(), ModelError> {
    for record in &archive.records {
        match record.kind {
            EntityKind::Group => {
                let id = EntityId::new(record.id)?;
                let name = record.properties.text(KEY_NAME).unwrap_or_default();
                let member_kind = kind_from_code(
                    record.id,
                    required_longs(record, KEY_MEMBER_KIND, 1)?[0],
                )?;
                model.graph.register_external_with_id(id, EntityKind::Group)?;
                let mut group = EntityGroup::new(id, name, member_kind);
                for member in id_list(record, member_kind)? {
                    if model.graph.entity_kind(member) != Some(member_kind) {
                        return Err(ModelError::UnresolvedReference(member.get()));
                    }
                    group.add(member, member_kind)?;
                }
                model.groups.insert(group);
            }
            EntityKind::Material => {
                let id = EntityId::new(record.id)?;
                let name = record.properties.text(KEY_NAME).unwrap_or_default();
                model
                    .graph
                    .register_external_with_id(id, EntityKind::Material)?;
                model.materials.insert(Material::new(id, name));
                for kind in [EntityKind::Face, EntityKind::Region] {
                    for member in id_list(record, kind)? {
                        if model.graph.entity_kind(member) != Some(kind) {
                            return Err(ModelError::UnresolvedReference(member.get()));
                        }
                        model.materials.assign(id, member, kind);
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn restore_classification(model: &mut Model, archive: &Archive) -> Result<(), ModelError> {
    for record in &archive.records {
        if !record.kind.has_owned_geometry() {
            continue;
        }
        let Some(raw_cells) = record.properties.longs(KEY_CELLS) else {
            continue;
        };
        let mut cells = Vec::with_capacity(raw_cells.len());
        for &raw in raw_cells {
            let cell = usize::try_from(raw).map_err(|_| ModelError::MalformedRecord {
                id: record.id,
                reason: format!("negative cell index {raw}"),
            })?;
            if cell >= model.mesh.cell_count() {
                return Err(ModelError::CellOutOfRange {
                    cell,
                    count: model.mesh.cell_count(),
                });
            }
            cells.push(cell);
        }
        model
            .classification
            .classify_cells(EntityId::new(record.id)?, &cells);
    }
    Ok(())
}

fn restore_appearances(model: &mut Model, archive: &Archive) -> Result<(), ModelError> {
    for record in &archive.records {
        let (Some(color), Some(&[visible])) = (
            record.properties.doubles(KEY_COLOR),
            record.properties.longs(KEY_VISIBLE),
        ) else {
            continue;
        };
        if color.len() != 4 {
            return Err(ModelError::MalformedRecord {
                id: record.id,
                reason: format!("`color` has {} components, expected 4", color.len()),
            });
        }
        let appearance = Appearance {
            color: [color[0], color[1], color[2], color[3]],
            visible: visible != 0,
        };
        let id = EntityId::new(record.id)?;
        match record.kind {
            EntityKind::Vertex => model.graph.vertex_mut(id)?.appearance = appearance,
            EntityKind::Edge => model.graph.edge_mut(id)?.appearance = appearance,
            EntityKind::Face => model.graph.face_mut(id)?.appearance = appearance,
            EntityKind::Region => model.graph.region_mut(id)?.appearance = appearance,
            _ => {}
        }
    }
    Ok(())
}

/// Rebuilds the whole model from an archive, preserving every id.
///
/// Fails up front on an empty archive. After the graph reset there is no
/// pre-restore state to fall back to; a malformed archive leaves the model
/// empty.
pub fn restore_state(model: &mut Model, archive: &Archive) -> Result<(), ModelError> {
    if archive.is_empty() {
        return Err(ModelError::EmptyArchive);
    }
    model.graph = EntityGraph::new();
    model.classification.clear();
    model.groups.clear();
    model.materials.clear();

    for record in &archive.records {
        if let Some(raw) = topological_record(record)? {
            model.graph.insert_raw(EntityId::new(record.id)?, raw)?;
        }
    }
    model.graph.validate_references()?;
    restore_registries(model, archive)?;
    restore_classification(model, archive)?;
    restore_appearances(model, archive)?;
    model.graph.advance_id_counter(archive.next_id);
    Ok(())
}

/// Whether the serializer writes the model out or reads it back.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SerializerMode {
    Save,
    Restore,
}

/// Operator wrapper around [`save_state`] / [`restore_state`], with an
/// explicit mode flag.
#[derive(Debug)]
pub struct StateSerializer {
    mode: SerializerMode,
    archive: Option<Archive>,
    succeeded: bool,
}

impl StateSerializer {
    /// A serializer that will capture the model into an archive.
    pub fn saver() -> Self {
        Self {
            mode: SerializerMode::Save,
            archive: None,
            succeeded: false,
        }
    }

    /// A serializer that will re-ingest `archive`.
    pub fn restorer(archive: Archive) -> Self {
        Self {
            mode: SerializerMode::Restore,
            archive: Some(archive),
            succeeded: false,
        }
    }

    pub fn mode(&self) -> SerializerMode {
        self.mode
    }

    /// The captured archive, after a successful save.
    pub fn archive(&self) -> Option<&Archive> {
        self.archive.as_ref()
    }

    pub fn into_archive(self) -> Option<Archive> {
        self.archive
    }
}

impl ModelOperator for StateSerializer {
    fn able_to_operate(&self, _model: &Model) -> bool {
        match self.mode {
            SerializerMode::Save => true,
            SerializerMode::Restore => match &self.archive {
                Some(archive) if !archive.is_empty() => true,
                _ => {
                    log::warn!("state restore: archive is empty or absent");
                    false
                }
            },
        }
    }

    fn operate(&mut self, model: &mut Model) -> bool {
        self.succeeded = false;
        match self.mode {
            SerializerMode::Save => match save_state(model) {
                Ok(archive) => {
                    self.archive = Some(archive);
                    self.succeeded = true;
                    true
                }
                Err(err) => {
                    log::warn!("state save failed: {err}");
                    false
                }
            },
            SerializerMode::Restore => {
                let Some(archive) = self.archive.take() else {
                    log::warn!("state restore: no archive to ingest");
                    return false;
                };
                match restore_state(model, &archive) {
                    Ok(()) => {
                        self.archive = Some(archive);
                        self.succeeded = true;
                        true
                    }
                    Err(err) => {
                        log::warn!("state restore failed: {err}");
                        self.archive = Some(archive);
                        false
                    }
                }
            }
        }
    }

    fn succeeded(&self) -> bool {
        self.succeeded
    }
}
