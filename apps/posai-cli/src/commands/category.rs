//! Category commands.

use std::io::Write;

use crate::error::CliResult;
use crate::render::{CategoryDto, Output};
use posai_core::validation::validate_category_name;
use posai_core::NewCategory;
use posai_db::Database;

pub async fn list<W: Write>(db: &Database, out: &mut Output<W>) -> CliResult<()> {
    let categories: Vec<CategoryDto> = db
        .categories()
        .list()
        .await?
        .into_iter()
        .map(CategoryDto::from)
        .collect();

    out.emit(&categories, |o, c| o.category_table(c))
}

pub async fn add<W: Write>(
    db: &Database,
    out: &mut Output<W>,
    name: &str,
    description: Option<String>,
    parent: Option<i64>,
) -> CliResult<()> {
    let name = name.trim();
    validate_category_name(name)?;

    let mut category = NewCategory::new(name);
    if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
        category = category.with_description(description.trim());
    }
    if let Some(parent_id) = parent {
        category = category.with_parent(parent_id);
    }

    let created = CategoryDto::from(db.categories().insert(&category).await?);

    out.emit(&created, |o, c| {
        o.line(format!("Category added: {} (ID {})", c.name, c.id))
    })
}
