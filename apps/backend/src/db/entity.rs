//! Typed mapping between API payloads and CRUD tables.
//!
//! An [`Entity`] names its table, its selected columns and the payload types
//! used to create and update it. [`Database`](super::Database) builds the
//! generic get/add/update/delete operations on top of it.

use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    FromRow, Postgres,
};

use crate::models::{
    CreateLessonRequest, DbLesson, DbStep, DbStepText, NewStep, NewStepText, UpdateLessonRequest,
    UpdateStepRequest, UpdateTextRequest,
};

pub type EntityQuery<'q, E> = QueryAs<'q, Postgres, E, PgArguments>;

/// A table row with its create and update payloads.
///
/// `INSERT` binds its parameters from `$1` via `bind_create`. `UPDATE` takes the
/// row id as `$1` and the changes from `$2` via `bind_update`; it must use
/// `COALESCE` so absent fields keep their stored value. Both return `COLUMNS`.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static {
    type Create: Sync;
    type Update: Sync;

    /// Human readable name used in not-found messages.
    const NAME: &'static str;
    const TABLE: &'static str;
    const COLUMNS: &'static str;
    const ORDER_BY: &'static str;
    const INSERT: &'static str;
    const UPDATE: &'static str;

    fn bind_create<'q>(query: EntityQuery<'q, Self>, new: &'q Self::Create) -> EntityQuery<'q, Self>;

    fn bind_update<'q>(
        query: EntityQuery<'q, Self>,
        changes: &'q Self::Update,
    ) -> EntityQuery<'q, Self>;
}

impl Entity for DbLesson {
    type Create = CreateLessonRequest;
    type Update = UpdateLessonRequest;

    const NAME: &'static str = "Lesson";
    const TABLE: &'static str = "lessons";
    const COLUMNS: &'static str = "id, name, description, language";
    const ORDER_BY: &'static str = "id";
    const INSERT: &'static str = r#"
        INSERT INTO lessons (name, description, language)
        VALUES ($1, $2, $3)
        RETURNING id, name, description, language
    "#;
    const UPDATE: &'static str = r#"
        UPDATE lessons
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            language = COALESCE($4, language)
        WHERE id = $1
        RETURNING id, name, description, language
    "#;

    fn bind_create<'q>(query: EntityQuery<'q, Self>, new: &'q Self::Create) -> EntityQuery<'q, Self> {
        query
            .bind(&new.name)
            .bind(&new.description)
            .bind(&new.language)
    }

    fn bind_update<'q>(
        query: EntityQuery<'q, Self>,
        changes: &'q Self::Update,
    ) -> EntityQuery<'q, Self> {
        query
            .bind(&changes.name)
            .bind(&changes.description)
            .bind(&changes.language)
    }
}

impl Entity for DbStep {
    type Create = NewStep;
    type Update = UpdateStepRequest;

    const NAME: &'static str = "Step";
    const TABLE: &'static str = "lesson_steps";
    const COLUMNS: &'static str = "id, lesson_id, position, name, description";
    const ORDER_BY: &'static str = "lesson_id, position, id";
    const INSERT: &'static str = r#"
        INSERT INTO lesson_steps (lesson_id, position, name, description)
        VALUES ($1, $2, $3, $4)
        RETURNING id, lesson_id, position, name, description
    "#;
    const UPDATE: &'static str = r#"
        UPDATE lesson_steps
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            position = COALESCE($4, position)
        WHERE id = $1
        RETURNING id, lesson_id, position, name, description
    "#;

    fn bind_create<'q>(query: EntityQuery<'q, Self>, new: &'q Self::Create) -> EntityQuery<'q, Self> {
        query
            .bind(new.lesson_id)
            .bind(new.position)
            .bind(&new.name)
            .bind(&new.description)
    }

    fn bind_update<'q>(
        query: EntityQuery<'q, Self>,
        changes: &'q Self::Update,
    ) -> EntityQuery<'q, Self> {
        query
            .bind(&changes.name)
            .bind(&changes.description)
            .bind(changes.position)
    }
}

impl Entity for DbStepText {
    type Create = NewStepText;
    type Update = UpdateTextRequest;

    const NAME: &'static str = "Text";
    const TABLE: &'static str = "lesson_step_texts";
    const COLUMNS: &'static str = "id, lesson_step_id, name, text";
    const ORDER_BY: &'static str = "lesson_step_id, id";
    const INSERT: &'static str = r#"
        INSERT INTO lesson_step_texts (lesson_step_id, name, text)
        VALUES ($1, $2, $3)
        RETURNING id, lesson_step_id, name, text
    "#;
    const UPDATE: &'static str = r#"
        UPDATE lesson_step_texts
        SET name = COALESCE($2, name),
            text = COALESCE($3, text)
        WHERE id = $1
        RETURNING id, lesson_step_id, name, text
    "#;

    fn bind_create<'q>(query: EntityQuery<'q, Self>, new: &'q Self::Create) -> EntityQuery<'q, Self> {
        query
            .bind(new.lesson_step_id)
            .bind(&new.name)
            .bind(&new.text)
    }

    fn bind_update<'q>(
        query: EntityQuery<'q, Self>,
        changes: &'q Self::Update,
    ) -> EntityQuery<'q, Self> {
        query.bind(&changes.name).bind(&changes.text)
    }
}
