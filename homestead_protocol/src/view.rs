// Citizen view — the public snapshot of one citizen for remote display.
//
// A `CitizenView` carries only fields a viewer is allowed to see: name,
// gender, level/experience, health, the five attribute scores, home/work
// building locations, and the current job name. Private sim state (scan
// caches, path cursors, work-order claims) never crosses this boundary.
//
// The wire layout is a fixed field order (documented on `write`), so the
// same citizen state always produces the same bytes. Receivers that hit a
// decode error drop the view rather than crashing — the caller logs the
// originating citizen id and treats it as "no data available".

use crate::codec;
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};

/// A grid position as it appears on the wire. Mirrors the sim's block
/// coordinate type without depending on the sim crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Read-only snapshot of a citizen's public fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CitizenView {
    pub id: u32,
    pub name: String,
    pub female: bool,
    pub home_building: Option<ViewPos>,
    pub work_building: Option<ViewPos>,
    pub level: i32,
    pub experience: f64,
    pub health: f32,
    pub max_health: f32,
    pub strength: i32,
    pub endurance: i32,
    pub charisma: i32,
    pub intelligence: i32,
    pub dexterity: i32,
    /// Empty string when the citizen has no job.
    pub job_name: String,
}

impl CitizenView {
    /// Serialize in fixed field order:
    /// id, name, female, home flag (+pos), work flag (+pos), level,
    /// experience, health, max health, strength, endurance, charisma,
    /// intelligence, dexterity, job name.
    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        codec::write_u32(w, self.id)?;
        codec::write_str(w, &self.name)?;
        codec::write_bool(w, self.female)?;

        write_opt_pos(w, self.home_building)?;
        write_opt_pos(w, self.work_building)?;

        codec::write_i32(w, self.level)?;
        codec::write_f64(w, self.experience)?;
        codec::write_f32(w, self.health)?;
        codec::write_f32(w, self.max_health)?;

        codec::write_i32(w, self.strength)?;
        codec::write_i32(w, self.endurance)?;
        codec::write_i32(w, self.charisma)?;
        codec::write_i32(w, self.intelligence)?;
        codec::write_i32(w, self.dexterity)?;

        codec::write_str(w, &self.job_name)
    }

    /// Deserialize a view written by [`CitizenView::write`].
    pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        let id = codec::read_u32(r)?;
        let name = codec::read_str(r)?;
        let female = codec::read_bool(r)?;

        let home_building = read_opt_pos(r)?;
        let work_building = read_opt_pos(r)?;

        let level = codec::read_i32(r)?;
        let experience = codec::read_f64(r)?;
        let health = codec::read_f32(r)?;
        let max_health = codec::read_f32(r)?;

        let strength = codec::read_i32(r)?;
        let endurance = codec::read_i32(r)?;
        let charisma = codec::read_i32(r)?;
        let intelligence = codec::read_i32(r)?;
        let dexterity = codec::read_i32(r)?;

        let job_name = codec::read_str(r)?;

        Ok(Self {
            id,
            name,
            female,
            home_building,
            work_building,
            level,
            experience,
            health,
            max_health,
            strength,
            endurance,
            charisma,
            intelligence,
            dexterity,
            job_name,
        })
    }
}

fn write_opt_pos<W: Write>(w: &mut W, pos: Option<ViewPos>) -> io::Result<()> {
    codec::write_bool(w, pos.is_some())?;
    if let Some(p) = pos {
        codec::write_i32(w, p.x)?;
        codec::write_i32(w, p.y)?;
        codec::write_i32(w, p.z)?;
    }
    Ok(())
}

fn read_opt_pos<R: Read>(r: &mut R) -> io::Result<Option<ViewPos>> {
    if codec::read_bool(r)? {
        let x = codec::read_i32(r)?;
        let y = codec::read_i32(r)?;
        let z = codec::read_i32(r)?;
        Ok(Some(ViewPos { x, y, z }))
    } else {
        Ok(None)
    }
}
