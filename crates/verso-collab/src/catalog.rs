//! Template availability for the current period.

use std::collections::HashSet;

use rusqlite::Connection;

use verso_db::queries::{collabs, memberships, periods, templates};
use verso_db::DbError;
use verso_types::template::{Template, TemplateGroups, TemplateKind};
use verso_types::ProfileId;

use crate::Result;

/// Templates the actor may instantiate right now, grouped by kind.
///
/// Bound to the current period; templates the actor is already actively
/// participating in (through any collaboration they created) are
/// suppressed. No configured period degrades to empty groups rather than
/// an error.
pub fn available_templates(conn: &Connection, actor: ProfileId) -> Result<TemplateGroups> {
    let period = match periods::current(conn) {
        Ok(p) => p,
        Err(DbError::NotFound(_)) => {
            tracing::debug!("no active period; template catalog is empty");
            return Ok(TemplateGroups::default());
        }
        Err(e) => return Err(e.into()),
    };

    let bound = templates::bound_to_period(conn, period.id)?;
    if bound.is_empty() {
        return Ok(TemplateGroups::default());
    }

    let active_collabs = memberships::active_collab_ids(conn, actor)?;
    let active_templates: HashSet<i64> = collabs::template_ids(conn, &active_collabs)?
        .into_iter()
        .collect();

    let mut groups = TemplateGroups::default();
    for row in bound {
        if active_templates.contains(&row.id) {
            continue;
        }
        groups.push(to_template(row));
    }

    Ok(groups)
}

fn to_template(row: templates::TemplateRow) -> Template {
    Template {
        id: row.id,
        name: row.name,
        display_text: row.display_text,
        kind: row.kind.as_deref().and_then(TemplateKind::parse),
        phases: row.phases,
        duration: row.duration,
        requirements: row.requirements,
        connection_rules: row.connection_rules,
        internal_reference: row.internal_reference,
    }
}
