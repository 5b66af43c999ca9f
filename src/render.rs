// src/render.rs
use crate::dom::{Document, Element, NodeId, Selector};
use crate::error::DashboardError;
use crate::models::{find_stock, Stock, UserRecord};
use crate::page::{
    self, ACTIVE, FIELD_ADDRESS, FIELD_CITY, FIELD_EMAIL, FIELD_FIRSTNAME, FIELD_LASTNAME,
    FIELD_USER_ID, LOGO, PORTFOLIO_LIST, PORTFOLIO_ROW, PORTFOLIO_SHARES, PORTFOLIO_SYMBOL,
    STOCK_ADDRESS, STOCK_AREA, STOCK_INDUSTRY, STOCK_NAME, STOCK_NOT_FOUND, STOCK_SECTOR,
    USER_ITEM, USER_LIST, VIEW_STOCK,
};
use log::debug;

fn require(doc: &Document, selector: Selector) -> Result<NodeId, DashboardError> {
    doc.query(&selector)
        .ok_or_else(|| DashboardError::MissingElement(selector.to_string()))
}

pub fn render_user_list(doc: &mut Document, users: &[UserRecord]) -> Result<(), DashboardError> {
    let list = require(doc, Selector::class(USER_LIST))?;
    doc.clear_children(list);

    for record in users {
        doc.append(
            list,
            Element::new("li")
                .with_class(USER_ITEM)
                .with_attr("data-id", record.id.as_str())
                .with_text(record.display_name()),
        );
    }
    debug!("Rendered {} users.", users.len());
    Ok(())
}

/// The list item tagged with `id`, if the list currently shows it.
pub fn find_list_item(doc: &Document, id: &str) -> Option<NodeId> {
    doc.query(&Selector::class(USER_ITEM).and_attr("data-id", id))
}

/// Moves the `active` highlight onto `item`, clearing it everywhere else in
/// the list first.
pub fn set_active(doc: &mut Document, item: NodeId) {
    for list in doc.query_all(&Selector::class(USER_LIST)) {
        for node in doc.query_all_in(list, &Selector::class(ACTIVE)) {
            doc.remove_class(node, ACTIVE);
        }
    }
    doc.add_class(item, ACTIVE);
}

fn set_field(doc: &mut Document, id: &str, value: &str) {
    if let Some(input) = doc.query(&Selector::id(id)) {
        doc.set_value(input, value);
    }
}

pub fn populate_form(doc: &mut Document, record: Option<&UserRecord>) {
    let Some(record) = record else {
        return;
    };
    let user = &record.user;
    set_field(doc, FIELD_USER_ID, record.id.as_str());
    set_field(doc, FIELD_FIRSTNAME, &user.firstname);
    set_field(doc, FIELD_LASTNAME, &user.lastname);
    set_field(doc, FIELD_ADDRESS, &user.address);
    set_field(doc, FIELD_CITY, &user.city);
    set_field(doc, FIELD_EMAIL, &user.email);
}

pub fn render_portfolio(doc: &mut Document, record: &UserRecord) -> Result<(), DashboardError> {
    let container = require(doc, Selector::class(PORTFOLIO_LIST))?;
    doc.clear_children(container);

    for entry in &record.user.portfolio {
        let row = doc.append(container, Element::new("div").with_class(PORTFOLIO_ROW));
        doc.append(
            row,
            Element::new("p")
                .with_class(PORTFOLIO_SYMBOL)
                .with_text(entry.symbol.as_str()),
        );
        doc.append(
            row,
            Element::new("p")
                .with_class(PORTFOLIO_SHARES)
                .with_text(entry.owned_display()),
        );
        doc.append(
            row,
            Element::new("button")
                .with_class(VIEW_STOCK)
                .with_attr("type", "button")
                .with_attr("data-symbol", &entry.symbol)
                .with_text("View"),
        );
    }
    debug!(
        "Rendered {} portfolio rows for user {}.",
        record.user.portfolio.len(),
        record.id
    );
    Ok(())
}

pub fn clear_portfolio(doc: &mut Document) {
    if let Some(container) = doc.query(&Selector::class(PORTFOLIO_LIST)) {
        doc.clear_children(container);
    }
}

fn set_detail(doc: &mut Document, id: &str, text: &str) {
    if let Some(node) = doc.query(&Selector::id(id)) {
        doc.set_text(node, text);
    }
}

/// Shows the stock behind `symbol`, or the not-found message when the
/// reference data has no such symbol.
pub fn view_stock(doc: &mut Document, symbol: &str, stocks: &[Stock]) -> Result<(), DashboardError> {
    if symbol.is_empty() {
        return Ok(());
    }
    let area = require(doc, Selector::class(STOCK_AREA))?;

    let Some(stock) = find_stock(stocks, symbol) else {
        debug!("No reference data for {}.", symbol);
        doc.set_text(area, STOCK_NOT_FOUND);
        return Ok(());
    };

    // A previous not-found message or delete leaves the area bare.
    if doc.children(area).is_empty() {
        doc.set_text(area, "");
        page::append_stock_fields(doc, area);
    }

    set_detail(doc, STOCK_NAME, stock.display_name());
    set_detail(doc, STOCK_SECTOR, stock.sector());
    set_detail(doc, STOCK_INDUSTRY, stock.industry());
    set_detail(doc, STOCK_ADDRESS, stock.address());

    if let Some(logo) = doc.query(&Selector::id(LOGO)) {
        doc.set_attr(logo, "src", &page::logo_path(symbol));
        doc.set_attr(logo, "alt", &format!("{} logo", symbol));
    }
    Ok(())
}

pub fn clear_stock_detail(doc: &mut Document) {
    if let Some(area) = doc.query(&Selector::class(STOCK_AREA)) {
        doc.set_text(area, "");
    }
}
