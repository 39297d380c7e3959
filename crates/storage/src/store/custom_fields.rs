#![forbid(unsafe_code)]

use super::support::*;
use super::*;
use rusqlite::params;
use tl_core::ids::{CustomFieldId, ProjectId, TaskId, UserId};
use tl_core::model::{
    CustomField, CustomFieldValue, CustomFieldValuePayload, FieldValue, NewCustomField,
};
use tl_core::patch::CustomFieldPatch;
use tl_core::validate::{self, InputError};
use tl_core::{EntityRef, OwnedRef, Patch};
use tracing::{debug_span, info};

impl SqliteStore {
    /// Any project member may define a field. Options are kept only for dropdowns and an option
    /// without an explicit position takes its index in the request.
    pub fn create_custom_field(
        &mut self,
        actor: UserId,
        request: NewCustomField,
    ) -> Result<CustomField, StoreError> {
        let _span = debug_span!(
            "field.create",
            actor = %actor,
            project_id = %request.project_id,
            field_type = request.field_type.as_str()
        )
        .entered();

        let tx = self.write_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Project(request.project_id))?;
        let name = validate::required_text("name", &request.name)?;
        validate::custom_field_definition(request.field_type, &request.options)?;

        tx.execute(
            "INSERT INTO custom_fields(project_id, name, field_type, created_at_ms) \
             VALUES (?1, ?2, ?3, ?4)",
            params![
                request.project_id.get(),
                name,
                request.field_type.as_str(),
                now_ms()
            ],
        )?;
        let field_id = CustomFieldId::new(tx.last_insert_rowid());

        for (index, option) in request.options.iter().enumerate() {
            let value = validate::required_text("option", &option.value)?;
            let position = option
                .position
                .unwrap_or_else(|| i64::try_from(index).unwrap_or(i64::MAX));
            tx.execute(
                "INSERT INTO custom_field_options(custom_field_id, value, color, position) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![field_id.get(), value, option.color, position],
            )
            .map_err(|err| map_write_conflict(err, "duplicate dropdown option"))?;
        }
        let field = found(custom_field_tx(&tx, field_id)?, EntityKind::CustomField)?;

        tx.commit()?;
        Ok(field)
    }

    pub fn get_custom_field(
        &self,
        actor: UserId,
        field_id: CustomFieldId,
    ) -> Result<CustomField, StoreError> {
        let _span = debug_span!("field.get", actor = %actor, field_id = %field_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::CustomField(field_id))?;
        found(custom_field_tx(&tx, field_id)?, EntityKind::CustomField)
    }

    /// Oldest first, each with its options.
    pub fn list_custom_fields(
        &self,
        actor: UserId,
        project_id: ProjectId,
    ) -> Result<Vec<CustomField>, StoreError> {
        let _span = debug_span!("field.list", actor = %actor, project_id = %project_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Project(project_id))?;
        let records = collect_rows(
            &tx,
            &format!(
                "SELECT {CUSTOM_FIELD_COLUMNS} FROM custom_fields f WHERE f.project_id = ?1 \
                 ORDER BY f.created_at_ms ASC, f.id ASC"
            ),
            params![project_id.get()],
            custom_field_row,
        )?;
        records
            .into_iter()
            .map(|record| {
                let options = field_options_tx(&tx, record.id)?;
                record.into_field(options)
            })
            .collect()
    }

    /// Owner of the field's project only.
    pub fn update_custom_field(
        &mut self,
        actor: UserId,
        field_id: CustomFieldId,
        patch: CustomFieldPatch,
    ) -> Result<CustomField, StoreError> {
        let _span = debug_span!("field.update", actor = %actor, field_id = %field_id).entered();

        let tx = self.write_tx()?;
        authorize_owner_tx(&tx, actor, OwnedRef::CustomField(field_id))?;
        let current = found(custom_field_tx(&tx, field_id)?, EntityKind::CustomField)?;
        if patch.is_empty() {
            return Err(InputError::EmptyPatch.into());
        }
        let patch = CustomFieldPatch {
            name: patch
                .name
                .as_deref()
                .map(|name| validate::required_text("name", name))
                .transpose()?,
        };

        let next = patch.apply(&current, now_ms());
        tx.execute(
            "UPDATE custom_fields SET name = ?2 WHERE id = ?1",
            params![next.id.get(), next.name],
        )?;

        tx.commit()?;
        Ok(next)
    }

    /// Owner of the field's project only. Options and stored values go with the field.
    pub fn delete_custom_field(
        &mut self,
        actor: UserId,
        field_id: CustomFieldId,
    ) -> Result<(), StoreError> {
        let _span = debug_span!("field.delete", actor = %actor, field_id = %field_id).entered();

        let tx = self.write_tx()?;
        authorize_owner_tx(&tx, actor, OwnedRef::CustomField(field_id))?;
        tx.execute(
            "DELETE FROM custom_fields WHERE id = ?1",
            params![field_id.get()],
        )?;

        tx.commit()?;
        info!(actor = %actor, field_id = %field_id, "custom field deleted");
        Ok(())
    }

    /// Stores the one value the field's type allows, replacing any previous value for the pair.
    pub fn set_field_value(
        &mut self,
        actor: UserId,
        task_id: TaskId,
        field_id: CustomFieldId,
        payload: CustomFieldValuePayload,
    ) -> Result<CustomFieldValue, StoreError> {
        let _span = debug_span!(
            "field.value.set",
            actor = %actor,
            task_id = %task_id,
            field_id = %field_id
        )
        .entered();

        let tx = self.write_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Task(task_id))?;
        let task = found(task_tx(&tx, task_id)?, EntityKind::Task)?;
        let field = found(custom_field_tx(&tx, field_id)?, EntityKind::CustomField)?;
        let value = validate::custom_field_value(&field, &task, &payload)?;

        let (text, number, date, flag) = match &value {
            FieldValue::Text(text) => (Some(text.as_str()), None, None, None),
            FieldValue::Number(number) => (None, Some(*number), None, None),
            FieldValue::Date(date) => (None, None, Some(*date), None),
            FieldValue::Boolean(flag) => (None, None, None, Some(*flag)),
        };
        tx.execute(
            "INSERT INTO custom_field_values(\
               task_id, custom_field_id, value_text, value_number, value_date, value_boolean, \
               created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) \
             ON CONFLICT(task_id, custom_field_id) DO UPDATE SET \
               value_text = excluded.value_text, \
               value_number = excluded.value_number, \
               value_date = excluded.value_date, \
               value_boolean = excluded.value_boolean, \
               updated_at_ms = excluded.updated_at_ms",
            params![task_id.get(), field_id.get(), text, number, date, flag, now_ms()],
        )?;
        let stored = found(
            field_value_tx(&tx, task_id, field_id)?,
            EntityKind::CustomFieldValue,
        )?;

        tx.commit()?;
        Ok(stored)
    }

    /// The field must exist and belong to the task's project before a missing value is reported.
    pub fn clear_field_value(
        &mut self,
        actor: UserId,
        task_id: TaskId,
        field_id: CustomFieldId,
    ) -> Result<(), StoreError> {
        let _span = debug_span!(
            "field.value.clear",
            actor = %actor,
            task_id = %task_id,
            field_id = %field_id
        )
        .entered();

        let tx = self.write_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Task(task_id))?;
        let task = found(task_tx(&tx, task_id)?, EntityKind::Task)?;
        let field = found(custom_field_tx(&tx, field_id)?, EntityKind::CustomField)?;
        validate::field_placement(&field, task.project_id)?;
        let removed = tx.execute(
            "DELETE FROM custom_field_values WHERE task_id = ?1 AND custom_field_id = ?2",
            params![task_id.get(), field_id.get()],
        )?;
        if removed == 0 {
            return Err(StoreError::NotFound(EntityKind::CustomFieldValue));
        }

        tx.commit()?;
        Ok(())
    }

    pub fn list_field_values(
        &self,
        actor: UserId,
        task_id: TaskId,
    ) -> Result<Vec<CustomFieldValue>, StoreError> {
        let _span =
            debug_span!("field.value.list", actor = %actor, task_id = %task_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Task(task_id))?;
        collect_rows(
            &tx,
            &format!(
                "SELECT {VALUE_COLUMNS} FROM custom_field_values v WHERE v.task_id = ?1 \
                 ORDER BY v.custom_field_id ASC"
            ),
            params![task_id.get()],
            value_row,
        )
    }
}
