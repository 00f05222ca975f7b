use rusqlite::{Connection, Row, named_params};

use crate::{
    CompanyId, Error,
    export::{Cell, Export},
    item::ItemId,
};

/// Exports a company's items ordered by name.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemsExport {
    /// The company whose items are exported.
    pub company_id: CompanyId,
    /// Only export these items, or all of them if `None`.
    pub ids: Option<Vec<ItemId>>,
}

/// An item joined with its category name.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    id: ItemId,
    name: String,
    item_type: String,
    description: String,
    sale_price: f64,
    purchase_price: f64,
    category_name: Option<String>,
    enabled: bool,
}

impl Export for ItemsExport {
    type Record = ItemRecord;

    fn title(&self) -> &'static str {
        "items"
    }

    fn fields(&self) -> &'static [&'static str] {
        &[
            "name",
            "type",
            "description",
            "sale_price",
            "purchase_price",
            "category_name",
            "enabled",
        ]
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["name"]
    }

    fn collection(&self, connection: &Connection) -> Result<Vec<ItemRecord>, Error> {
        let records: Vec<ItemRecord> = connection
            .prepare(
                "SELECT i.id, i.name, i.type, i.description, i.sale_price, i.purchase_price,
                    c.name, i.enabled
                FROM item i
                LEFT JOIN category c ON c.id = i.category_id AND c.company_id = i.company_id
                WHERE i.company_id = :company_id
                ORDER BY i.name ASC, i.id ASC;",
            )?
            .query_map(named_params! { ":company_id": self.company_id }, map_row)?
            .collect::<Result<_, _>>()?;

        Ok(match &self.ids {
            Some(ids) => records
                .into_iter()
                .filter(|record| ids.contains(&record.id))
                .collect(),
            None => records,
        })
    }

    fn map(&self, record: &ItemRecord) -> Vec<Cell> {
        vec![
            Cell::Text(record.name.clone()),
            Cell::Text(record.item_type.clone()),
            Cell::Text(record.description.clone()),
            Cell::Decimal(record.sale_price),
            Cell::Decimal(record.purchase_price),
            Cell::from(record.category_name.clone()),
            Cell::Bool(record.enabled),
        ]
    }
}

fn map_row(row: &Row) -> Result<ItemRecord, rusqlite::Error> {
    Ok(ItemRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        item_type: row.get(2)?,
        description: row.get(3)?,
        sale_price: row.get(4)?,
        purchase_price: row.get(5)?,
        category_name: row.get(6)?,
        enabled: row.get(7)?,
    })
}
