#![forbid(unsafe_code)]

use super::support::*;
use super::*;
use rusqlite::params;
use tl_core::ids::{ProjectId, SectionId, UserId};
use tl_core::model::{NewSection, Section};
use tl_core::patch::SectionPatch;
use tl_core::validate::{self, InputError};
use tl_core::{EntityRef, Patch};
use tracing::{debug_span, info};

impl SqliteStore {
    pub fn create_section(
        &mut self,
        actor: UserId,
        request: NewSection,
    ) -> Result<Section, StoreError> {
        let _span = debug_span!(
            "section.create",
            actor = %actor,
            project_id = %request.project_id
        )
        .entered();

        let tx = self.write_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Project(request.project_id))?;
        let name = validate::required_text("name", &request.name)?;

        tx.execute(
            "INSERT INTO sections(project_id, name, position, created_at_ms) \
             VALUES (?1, ?2, ?3, ?4)",
            params![request.project_id.get(), name, request.position, now_ms()],
        )?;
        let section_id = SectionId::new(tx.last_insert_rowid());
        let section = found(section_tx(&tx, section_id)?, EntityKind::Section)?;

        tx.commit()?;
        Ok(section)
    }

    pub fn get_section(&self, actor: UserId, section_id: SectionId) -> Result<Section, StoreError> {
        let _span =
            debug_span!("section.get", actor = %actor, section_id = %section_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Section(section_id))?;
        found(section_tx(&tx, section_id)?, EntityKind::Section)
    }

    pub fn list_sections(
        &self,
        actor: UserId,
        project_id: ProjectId,
    ) -> Result<Vec<Section>, StoreError> {
        let _span =
            debug_span!("section.list", actor = %actor, project_id = %project_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Project(project_id))?;
        collect_rows(
            &tx,
            &format!(
                "SELECT {SECTION_COLUMNS} FROM sections s WHERE s.project_id = ?1 \
                 ORDER BY s.position ASC, s.id ASC"
            ),
            params![project_id.get()],
            section_row,
        )
    }

    pub fn update_section(
        &mut self,
        actor: UserId,
        section_id: SectionId,
        patch: SectionPatch,
    ) -> Result<Section, StoreError> {
        let _span =
            debug_span!("section.update", actor = %actor, section_id = %section_id).entered();

        let tx = self.write_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Section(section_id))?;
        let current = found(section_tx(&tx, section_id)?, EntityKind::Section)?;
        if patch.is_empty() {
            return Err(InputError::EmptyPatch.into());
        }
        let patch = SectionPatch {
            name: patch
                .name
                .as_deref()
                .map(|name| validate::required_text("name", name))
                .transpose()?,
            ..patch
        };

        let next = patch.apply(&current, now_ms());
        tx.execute(
            "UPDATE sections SET name = ?2, position = ?3 WHERE id = ?1",
            params![next.id.get(), next.name, next.position],
        )?;

        tx.commit()?;
        Ok(next)
    }

    /// Tasks in the section survive with `section_id` cleared.
    pub fn delete_section(
        &mut self,
        actor: UserId,
        section_id: SectionId,
    ) -> Result<(), StoreError> {
        let _span =
            debug_span!("section.delete", actor = %actor, section_id = %section_id).entered();

        let tx = self.write_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Section(section_id))?;
        tx.execute("DELETE FROM sections WHERE id = ?1", params![section_id.get()])?;

        tx.commit()?;
        info!(actor = %actor, section_id = %section_id, "section deleted");
        Ok(())
    }
}
