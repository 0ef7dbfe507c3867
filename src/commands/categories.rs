use crate::commands::Out;
use crate::model::{Category, IconMap};
use crate::Result;
use anyhow::Context;
use serde::Serialize;
use std::fmt::Write;

/// One row of the `categories` listing.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    bit: usize,
    name: &'static str,
    icon: &'static str,
}

/// Lists the fixed category enumeration with each category's bitmask
/// position and icon name. Does not need a loaded ledger.
pub fn categories() -> Result<Out<Vec<CategoryInfo>>> {
    let icons = IconMap::new()?;
    let rows = Category::ALL
        .iter()
        .map(|category| {
            let icon = icons
                .icon_for(*category)
                .with_context(|| format!("no icon mapped for [{category}]"))?;
            Ok(CategoryInfo {
                bit: category.bit_index(),
                name: category.as_str(),
                icon,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut message = String::from("bit  category                        icon");
    for row in &rows {
        write!(message, "\n{:>3}  {:<30}  {}", row.bit, row.name, row.icon)?;
    }
    Ok(Out::new(message, rows))
}
